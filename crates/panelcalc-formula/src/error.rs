//! Formula error types

use crate::value::ErrorValue;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Reference to a variable that has no value yet
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Operand of the wrong type (e.g. arithmetic on text)
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// The expression evaluated to an error value such as `#DIV/0!`
    #[error("Expression evaluated to {0}")]
    ErrorValue(ErrorValue),

    /// Failure inside the evaluator itself rather than in the expression
    #[error("Internal evaluator error: {0}")]
    Internal(String),
}
