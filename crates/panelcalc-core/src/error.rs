//! Error types for panelcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by catalog handling and formula stores
#[derive(Debug, Error)]
pub enum Error {
    /// Requested model does not exist in the store
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A formula refers to a model that was never registered
    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// A formula refers to an output variable that was never registered
    #[error("Unknown output variable '{0}'")]
    UnknownVariable(String),

    /// A second formula for the same (model, variable) pair
    #[error("Model '{model}' already has a formula for '{variable}'")]
    DuplicateFormula { model: String, variable: String },

    /// Duplicate model or variable code
    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    /// Invalid model or variable code
    #[error("Invalid code: {0:?}")]
    InvalidCode(String),

    /// Catalog file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be decoded
    #[error("Invalid catalog: {0}")]
    Catalog(String),
}
