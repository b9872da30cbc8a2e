//! Prelude module - common imports for panelcalc users
//!
//! ```rust
//! use panelcalc::prelude::*;
//! ```

#[cfg(feature = "serde")]
pub use crate::Catalog;
pub use crate::{
    // Calculation
    CalcError,
    CalculationOptions,
    Calculator,
    // Evaluation seam
    ExpressionEvaluator,
    // Catalog types
    Formula,
    FormulaStore,
    InMemoryStore,
    Inputs,
    Interpreter,
    Model,
    OutputKind,
    OutputVariable,
    Outputs,
    Value,
};
