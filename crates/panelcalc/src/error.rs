//! Calculation errors

use thiserror::Error;

/// Result type alias using [`CalcError`]
pub type Result<T> = std::result::Result<T, CalcError>;

/// Why a `compute` call failed
///
/// Every variant except [`CalcError::Store`] names the output variable whose
/// formula was being processed.
#[derive(Debug, Error)]
pub enum CalcError {
    /// The formula store failed; `ModelNotFound` arrives here unchanged
    #[error(transparent)]
    Store(#[from] panelcalc_core::Error),

    /// A formula could not be parsed or evaluated, or produced the wrong kind of value
    #[error("Failed to evaluate formula for '{variable_code}': {detail}")]
    ExpressionEvaluation {
        variable_code: String,
        detail: String,
    },

    /// The evaluator broke its own contract (internal error or panic)
    #[error("Evaluator failed unexpectedly on '{variable_code}': {detail}")]
    UnexpectedEvaluator {
        variable_code: String,
        detail: String,
    },

    /// A formula reads a variable that is neither an input nor an earlier output
    #[error("Formula for '{variable_code}' references '{reference}', which is not available at that point")]
    UnresolvedReference {
        variable_code: String,
        reference: String,
    },
}

impl CalcError {
    /// Short name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::Store(panelcalc_core::Error::ModelNotFound(_)) => "ModelNotFound",
            CalcError::Store(_) => "Store",
            CalcError::ExpressionEvaluation { .. } => "ExpressionEvaluation",
            CalcError::UnexpectedEvaluator { .. } => "UnexpectedEvaluator",
            CalcError::UnresolvedReference { .. } => "UnresolvedReference",
        }
    }

    /// Code of the output variable whose formula failed, if any
    pub fn variable_code(&self) -> Option<&str> {
        match self {
            CalcError::Store(_) => None,
            CalcError::ExpressionEvaluation { variable_code, .. }
            | CalcError::UnexpectedEvaluator { variable_code, .. }
            | CalcError::UnresolvedReference { variable_code, .. } => Some(variable_code),
        }
    }

    /// Underlying detail, without the variable prefix
    pub fn detail(&self) -> String {
        match self {
            CalcError::Store(e) => e.to_string(),
            CalcError::ExpressionEvaluation { detail, .. }
            | CalcError::UnexpectedEvaluator { detail, .. } => detail.clone(),
            CalcError::UnresolvedReference { reference, .. } => {
                format!("unresolved reference '{}'", reference)
            }
        }
    }

    /// Whether the requested model does not exist
    pub fn is_model_not_found(&self) -> bool {
        matches!(
            self,
            CalcError::Store(panelcalc_core::Error::ModelNotFound(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = CalcError::ExpressionEvaluation {
            variable_code: "HPF1".into(),
            detail: "Unknown variable: ALT1".into(),
        };
        assert_eq!(err.kind(), "ExpressionEvaluation");
        assert_eq!(err.variable_code(), Some("HPF1"));
        assert_eq!(err.detail(), "Unknown variable: ALT1");
        assert!(!err.is_model_not_found());
        assert!(err.to_string().contains("HPF1"));
    }

    #[test]
    fn test_model_not_found_passes_through() {
        let err: CalcError = panelcalc_core::Error::ModelNotFound("X".into()).into();
        assert!(err.is_model_not_found());
        assert_eq!(err.kind(), "ModelNotFound");
        assert_eq!(err.variable_code(), None);
        assert_eq!(err.to_string(), "Model not found: X");
    }
}
