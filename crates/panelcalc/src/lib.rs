//! # panelcalc
//!
//! Formula calculation engine for glass panel assembly models.
//!
//! A model owns an ordered chain of formulas written in a localized spreadsheet
//! dialect (`SI(VAN0>1600;900;700)`). Given the input measurements for an order,
//! [`Calculator::compute`] evaluates the chain front to back, letting each formula
//! read the inputs and every output computed before it, and returns the outputs.
//!
//! ## Features
//!
//! - Dialect translation to canonical spreadsheet syntax
//! - Ordered, fail-fast evaluation with per-variable error reporting
//! - Numeric and text outputs
//! - Optional up-front dependency validation
//! - JSON catalog files (`serde` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use panelcalc::prelude::*;
//!
//! let mut store = InMemoryStore::new();
//! store.add_model(Model::new("4000-A1i")).unwrap();
//! store.add_variable(OutputVariable::numeric("HPF1")).unwrap();
//! store.add_formula(Formula::new("4000-A1i", "HPF1", "ALT1-7", 1)).unwrap();
//!
//! let calculator = Calculator::new(store);
//! let inputs = Inputs::from([("ALT1".to_string(), 2000.0)]);
//! let outputs = calculator.compute("4000-A1i", &inputs).unwrap();
//! assert_eq!(outputs["HPF1"].to_string(), "1993");
//! ```

pub mod calculation;
pub mod error;
pub mod prelude;

// Re-export calculation types
pub use calculation::{CalculationOptions, Calculator};
pub use error::{CalcError, Result};

// Re-export core types
#[cfg(feature = "serde")]
pub use panelcalc_core::Catalog;
pub use panelcalc_core::{
    format_number, parse_number, ActiveFormula, Formula, FormulaStore, InMemoryStore, Inputs,
    Model, OutputKind, OutputVariable, Outputs, Value,
};

// Re-export formula types
pub use panelcalc_formula::{
    parse_formula, translate, ExpressionEvaluator, FormulaError, FormulaExpr, FormulaResult,
    Interpreter, DIALECT_TABLE,
};
