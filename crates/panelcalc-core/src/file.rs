//! JSON catalog files
//!
//! A catalog file lists models, output variables and formulas:
//!
//! ```json
//! {
//!   "models": [{ "code": "4000-A1i" }],
//!   "variables": [{ "code": "HPF1", "kind": "numeric" }],
//!   "formulas": [{ "model": "4000-A1i", "variable": "HPF1", "expression": "ALT1-7", "order": 1 }]
//! }
//! ```

use crate::catalog::{Formula, Model, OutputVariable};
use crate::error::{Error, Result};
use crate::store::InMemoryStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable catalog contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub variables: Vec<OutputVariable>,
    #[serde(default)]
    pub formulas: Vec<Formula>,
}

impl Catalog {
    /// Parse a catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))
    }

    /// Read a catalog from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the catalog as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Catalog(e.to_string()))
    }

    /// Build an in-memory store, validating every reference
    pub fn into_store(self) -> Result<InMemoryStore> {
        let mut store = InMemoryStore::new();
        for model in self.models {
            store.add_model(model)?;
        }
        for variable in self.variables {
            store.add_variable(variable)?;
        }
        for formula in self.formulas {
            store.add_formula(formula)?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FormulaStore;
    use crate::value::OutputKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "models": [{ "code": "4000-A1i", "description": "Sliding panel" }],
        "variables": [
            { "code": "HPF1", "kind": "numeric" },
            { "code": "REF", "kind": "text" }
        ],
        "formulas": [
            { "model": "4000-A1i", "variable": "HPF1", "expression": "ALT1-7", "order": 1 },
            { "model": "4000-A1i", "variable": "REF", "expression": "\"A\"", "order": 2, "active": false }
        ]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.models.len(), 1);
        assert_eq!(catalog.variables[1].kind, OutputKind::Text);
        assert!(catalog.formulas[0].active);
        assert!(!catalog.formulas[1].active);
    }

    #[test]
    fn test_into_store() {
        let store = Catalog::from_json_str(SAMPLE).unwrap().into_store().unwrap();
        let formulas = store.list_active_formulas("4000-A1i").unwrap();
        assert_eq!(formulas.len(), 1);
        assert_eq!(formulas[0].variable.code, "HPF1");
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalog::from_json_str("{ \"models\": 3 }").unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_dangling_reference() {
        let json = r#"{ "formulas": [{ "model": "X", "variable": "Y", "expression": "1" }] }"#;
        let err = Catalog::from_json_str(json).unwrap().into_store().unwrap_err();
        assert!(matches!(err, Error::UnknownModel(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        let json = catalog.to_json_string().unwrap();
        assert_eq!(Catalog::from_json_str(&json).unwrap(), catalog);
    }
}
