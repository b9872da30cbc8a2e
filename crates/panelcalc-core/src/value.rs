//! Scalar values held in an evaluation context

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared kind of an output variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputKind {
    /// Numeric output (lengths, counts, quantities)
    #[default]
    Numeric,
    /// Free text output (codes, labels)
    Text,
}

impl OutputKind {
    /// Lowercase name used in catalog files and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Numeric => "numeric",
            OutputKind::Text => "text",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value bound to a variable code: either a number or a piece of text
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// The kind this value would satisfy
    pub fn kind(&self) -> OutputKind {
        match self {
            Value::Number(_) => OutputKind::Numeric,
            Value::Text(_) => OutputKind::Text,
        }
    }

    /// Get the number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Get the text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }
}

/// Parse numeric text, rejecting `nan` and the infinities
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(1993.0).to_string(), "1993");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Value::text("VT-12").to_string(), "VT-12");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::from(3).kind(), OutputKind::Numeric);
        assert_eq!(Value::from("x").kind(), OutputKind::Text);
        assert_eq!(OutputKind::Text.to_string(), "text");
    }

    #[test]
    fn test_accessors() {
        let v = Value::Number(4.0);
        assert_eq!(v.as_number(), Some(4.0));
        assert_eq!(v.as_text(), None);

        let v = Value::text("abc");
        assert_eq!(v.as_number(), None);
        assert_eq!(v.as_text(), Some("abc"));
        assert_eq!(v.type_name(), "text");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1800.5 "), Some(1800.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-Infinity"), None);
    }
}
