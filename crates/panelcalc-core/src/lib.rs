//! # panelcalc-core
//!
//! Core data contracts for the panelcalc formula engine.
//!
//! This crate provides:
//! - [`Value`] and [`OutputKind`] - numeric or text values bound to variable codes
//! - [`Model`], [`OutputVariable`], [`Formula`] - catalog entities
//! - [`FormulaStore`] - the read path the engine uses to fetch a model's formulas
//! - [`InMemoryStore`] - a validating in-memory catalog
//!
//! ## Example
//!
//! ```rust
//! use panelcalc_core::{Formula, FormulaStore, InMemoryStore, Model, OutputVariable};
//!
//! let mut store = InMemoryStore::new();
//! store.add_model(Model::new("4000-A1i")).unwrap();
//! store.add_variable(OutputVariable::numeric("HPF1")).unwrap();
//! store.add_formula(Formula::new("4000-A1i", "HPF1", "ALT1-7", 1)).unwrap();
//!
//! let formulas = store.list_active_formulas("4000-A1i").unwrap();
//! assert_eq!(formulas[0].variable.code, "HPF1");
//! ```

pub mod catalog;
pub mod error;
#[cfg(feature = "serde")]
pub mod file;
pub mod store;
pub mod value;

use std::collections::{BTreeMap, HashMap};

// Re-exports for convenience
pub use catalog::{ActiveFormula, Formula, Model, OutputVariable};
pub use error::{Error, Result};
#[cfg(feature = "serde")]
pub use file::Catalog;
pub use store::{FormulaStore, InMemoryStore};
pub use value::{format_number, parse_number, OutputKind, Value};

/// Input measurements keyed by variable code
pub type Inputs = HashMap<String, f64>;

/// Computed outputs keyed by variable code
pub type Outputs = BTreeMap<String, Value>;
