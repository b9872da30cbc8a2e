//! # panelcalc-formula
//!
//! Expression handling for the panelcalc engine.
//!
//! This crate provides:
//! - Dialect translation (`SI(a; b; c)` → `IF(a, b, c)`)
//! - Expression parsing (text → AST)
//! - Expression evaluation against named variables
//! - Built-in logical, math and text functions
//!
//! ## Example
//!
//! ```rust
//! use panelcalc_core::Value;
//! use panelcalc_formula::{translate, ExpressionEvaluator, Interpreter};
//!
//! let canonical = translate("SI(ALT1>1000; ALT1-7; 0)");
//! assert_eq!(canonical, "IF(ALT1>1000, ALT1-7, 0)");
//!
//! let mut interpreter = Interpreter::new();
//! interpreter.set_variable("ALT1", Value::Number(2000.0));
//! assert_eq!(interpreter.evaluate(&canonical).unwrap(), Value::Number(1993.0));
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod value;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use dialect::{translate, DIALECT_TABLE};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext, ExpressionEvaluator, Interpreter};
pub use functions::FunctionRegistry;
pub use parser::parse_formula;
pub use value::{ErrorValue, FormulaValue};
