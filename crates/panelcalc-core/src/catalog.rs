//! Catalog entities: models, output variables and formulas
//!
//! A [`Model`] is a product configuration (e.g. `4000-A1i`). Each model owns a set of
//! [`Formula`]s, and each formula computes exactly one [`OutputVariable`] from the
//! input measurements and the outputs of formulas ordered before it.
//!
//! # Example
//!
//! ```text
//! HPF1  = ALT1-7                    (order 1)
//! BPF1  = SI(VAN0>1600;900;700)     (order 2)
//! ```

use crate::error::{Error, Result};
use crate::value::OutputKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A product configuration that owns formulas
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    /// Unique model code (e.g. "4000-A1i")
    pub code: String,
    /// Human-readable description
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl Model {
    /// Create a new model
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A named, typed output slot that formulas write to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputVariable {
    /// Short unique code (e.g. "HPF1"); formulas reference it by this name
    pub code: String,
    /// Human-readable description
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Declared output kind
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: OutputKind,
}

impl OutputVariable {
    /// Create a numeric output variable
    pub fn numeric(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
            kind: OutputKind::Numeric,
        }
    }

    /// Create a text output variable
    pub fn text(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
            kind: OutputKind::Text,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A formula computing one output variable for one model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Formula {
    /// Code of the owning model
    pub model: String,
    /// Code of the output variable this formula computes
    pub variable: String,
    /// Expression text in the authoring dialect
    pub expression: String,
    /// Evaluation order (ascending)
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: u32,
    /// Inactive formulas are ignored entirely
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub active: bool,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

impl Formula {
    /// Create a new active formula
    pub fn new(
        model: impl Into<String>,
        variable: impl Into<String>,
        expression: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            model: model.into(),
            variable: variable.into(),
            expression: expression.into(),
            order,
            active: true,
        }
    }

    /// Mark the formula inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A formula as handed to the calculation engine: active, with its variable resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFormula {
    /// Expression text in the authoring dialect
    pub expression: String,
    /// Evaluation order
    pub order: u32,
    /// The output variable this formula computes
    pub variable: OutputVariable,
}

/// Check that a variable code can be referenced from an expression.
///
/// Codes must start with a letter or `_` and contain only ASCII letters, digits and `_`.
pub fn validate_variable_code(code: &str) -> Result<()> {
    let mut chars = code.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidCode(code.to_string()))
    }
}

/// Check that a model code is usable
pub fn validate_model_code(code: &str) -> Result<()> {
    if code.trim().is_empty() || code.trim() != code {
        return Err(Error::InvalidCode(code.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_codes() {
        assert!(validate_variable_code("HPF1").is_ok());
        assert!(validate_variable_code("_tmp").is_ok());
        assert!(validate_variable_code("VAN0").is_ok());

        assert!(validate_variable_code("").is_err());
        assert!(validate_variable_code("1ABC").is_err());
        assert!(validate_variable_code("A B").is_err());
        assert!(validate_variable_code("A-B").is_err());
    }

    #[test]
    fn test_model_codes() {
        assert!(validate_model_code("4000-A1i").is_ok());
        assert!(validate_model_code("").is_err());
        assert!(validate_model_code(" 4000").is_err());
    }

    #[test]
    fn test_formula_builder() {
        let f = Formula::new("4000-A1i", "HPF1", "ALT1-7", 1);
        assert!(f.active);
        assert!(!f.inactive().active);
    }
}
