//! Values produced while evaluating an expression

use crate::error::{FormulaError, FormulaResult};
use panelcalc_core::{format_number, parse_number, Value};
use std::fmt;

/// Error values an expression can evaluate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorValue {
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #NAME? - Unrecognized name
    Name,
}

impl ErrorValue {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorValue::Div0 => "#DIV/0!",
            ErrorValue::Value => "#VALUE!",
            ErrorValue::Num => "#NUM!",
            ErrorValue::Na => "#N/A",
            ErrorValue::Name => "#NAME?",
        }
    }

    /// Parse an error literal
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#DIV/0!" => Some(ErrorValue::Div0),
            "#VALUE!" => Some(ErrorValue::Value),
            "#NUM!" => Some(ErrorValue::Num),
            "#N/A" => Some(ErrorValue::Na),
            "#NAME?" => Some(ErrorValue::Name),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Error(ErrorValue),
}

impl FormulaValue {
    /// Wrap an arithmetic result; NaN and the infinities become `#NUM!`
    pub fn finite(n: f64) -> Self {
        if n.is_finite() {
            FormulaValue::Number(n)
        } else {
            FormulaValue::Error(ErrorValue::Num)
        }
    }

    /// Convert to number, if possible
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::Boolean(true) => Some(1.0),
            FormulaValue::Boolean(false) => Some(0.0),
            FormulaValue::String(s) => parse_number(s),
            FormulaValue::Error(_) => None,
        }
    }

    /// Force conversion to number for arithmetic
    pub fn to_number(&self) -> FormulaResult<f64> {
        self.as_number().ok_or_else(|| FormulaError::TypeMismatch {
            expected: "number",
            actual: self.describe(),
        })
    }

    /// Convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormulaValue::Boolean(b) => Some(*b),
            FormulaValue::Number(n) => Some(*n != 0.0),
            FormulaValue::String(s) => {
                let upper = s.to_uppercase();
                if upper == "TRUE" {
                    Some(true)
                } else if upper == "FALSE" {
                    Some(false)
                } else {
                    None
                }
            }
            FormulaValue::Error(_) => None,
        }
    }

    /// Convert to string
    pub fn as_string(&self) -> String {
        match self {
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::String(s) => s.clone(),
            FormulaValue::Boolean(true) => "TRUE".to_string(),
            FormulaValue::Boolean(false) => "FALSE".to_string(),
            FormulaValue::Error(e) => e.to_string(),
        }
    }

    /// Get the error if this is one
    pub fn get_error(&self) -> Option<ErrorValue> {
        match self {
            FormulaValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Short description used in type-mismatch messages
    fn describe(&self) -> String {
        match self {
            FormulaValue::Number(n) => format!("number {}", format_number(*n)),
            FormulaValue::String(s) => format!("text {:?}", s),
            FormulaValue::Boolean(b) => format!("boolean {}", b),
            FormulaValue::Error(e) => format!("error {}", e),
        }
    }

    /// Convert a final result into a context value
    ///
    /// Booleans become `1`/`0`; error values become [`FormulaError::ErrorValue`].
    pub fn into_value(self) -> FormulaResult<Value> {
        match self {
            FormulaValue::Number(n) => Ok(Value::Number(n)),
            FormulaValue::String(s) => Ok(Value::Text(s)),
            FormulaValue::Boolean(b) => Ok(Value::Number(if b { 1.0 } else { 0.0 })),
            FormulaValue::Error(e) => Err(FormulaError::ErrorValue(e)),
        }
    }
}

impl From<Value> for FormulaValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => FormulaValue::Number(n),
            Value::Text(s) => FormulaValue::String(s),
        }
    }
}
