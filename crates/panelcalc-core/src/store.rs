//! Formula store: the read path the calculation engine depends on

use crate::catalog::{
    validate_model_code, validate_variable_code, ActiveFormula, Formula, Model, OutputVariable,
};
use crate::error::{Error, Result};
use ahash::{AHashMap, AHashSet};
use std::sync::Arc;

/// Source of formula definitions for the calculation engine.
///
/// Implementations must:
/// - report an unknown model as [`Error::ModelNotFound`]
/// - return only active formulas
/// - sort them ascending by `order`, keeping the original relative order on ties
pub trait FormulaStore {
    /// List the active formulas of a model in evaluation order
    fn list_active_formulas(&self, model: &str) -> Result<Vec<ActiveFormula>>;
}

impl<S: FormulaStore + ?Sized> FormulaStore for &S {
    fn list_active_formulas(&self, model: &str) -> Result<Vec<ActiveFormula>> {
        (**self).list_active_formulas(model)
    }
}

impl<S: FormulaStore + ?Sized> FormulaStore for Box<S> {
    fn list_active_formulas(&self, model: &str) -> Result<Vec<ActiveFormula>> {
        (**self).list_active_formulas(model)
    }
}

impl<S: FormulaStore + ?Sized> FormulaStore for Arc<S> {
    fn list_active_formulas(&self, model: &str) -> Result<Vec<ActiveFormula>> {
        (**self).list_active_formulas(model)
    }
}

/// In-memory catalog of models, output variables and formulas
///
/// Enforces the catalog invariants on insert: codes are unique, formulas only
/// reference registered models and variables, and a model has at most one
/// formula per output variable.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    models: Vec<Model>,
    model_index: AHashMap<String, usize>,
    variables: Vec<OutputVariable>,
    variable_index: AHashMap<String, usize>,
    /// Formulas in insertion order
    formulas: Vec<Formula>,
    /// (model, variable) pairs that already have a formula
    pairs: AHashSet<(String, String)>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model
    pub fn add_model(&mut self, model: Model) -> Result<()> {
        validate_model_code(&model.code)?;
        if self.model_index.contains_key(&model.code) {
            return Err(Error::DuplicateCode(model.code));
        }
        self.model_index.insert(model.code.clone(), self.models.len());
        self.models.push(model);
        Ok(())
    }

    /// Register an output variable
    pub fn add_variable(&mut self, variable: OutputVariable) -> Result<()> {
        validate_variable_code(&variable.code)?;
        if self.variable_index.contains_key(&variable.code) {
            return Err(Error::DuplicateCode(variable.code));
        }
        self.variable_index
            .insert(variable.code.clone(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    /// Register a formula
    pub fn add_formula(&mut self, formula: Formula) -> Result<()> {
        if !self.model_index.contains_key(&formula.model) {
            return Err(Error::UnknownModel(formula.model));
        }
        if !self.variable_index.contains_key(&formula.variable) {
            return Err(Error::UnknownVariable(formula.variable));
        }

        let pair = (formula.model.clone(), formula.variable.clone());
        if self.pairs.contains(&pair) {
            return Err(Error::DuplicateFormula {
                model: formula.model,
                variable: formula.variable,
            });
        }

        self.pairs.insert(pair);
        self.formulas.push(formula);
        Ok(())
    }

    /// Look up a model by code
    pub fn model(&self, code: &str) -> Option<&Model> {
        self.model_index.get(code).map(|&idx| &self.models[idx])
    }

    /// Look up an output variable by code
    pub fn variable(&self, code: &str) -> Option<&OutputVariable> {
        self.variable_index
            .get(code)
            .map(|&idx| &self.variables[idx])
    }

    /// All models in registration order
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// All output variables in registration order
    pub fn variables(&self) -> &[OutputVariable] {
        &self.variables
    }

    /// All formulas of a model, including inactive ones, in insertion order
    pub fn formulas_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a Formula> + 'a {
        self.formulas.iter().filter(move |f| f.model == model)
    }

    /// Total number of formulas
    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }
}

impl FormulaStore for InMemoryStore {
    fn list_active_formulas(&self, model: &str) -> Result<Vec<ActiveFormula>> {
        if self.model(model).is_none() {
            return Err(Error::ModelNotFound(model.to_string()));
        }

        let mut active = Vec::new();
        for formula in self.formulas_for(model).filter(|f| f.active) {
            let variable = self
                .variable(&formula.variable)
                .ok_or_else(|| Error::UnknownVariable(formula.variable.clone()))?;
            active.push(ActiveFormula {
                expression: formula.expression.clone(),
                order: formula.order,
                variable: variable.clone(),
            });
        }

        // Stable: equal orders keep their insertion order
        active.sort_by_key(|f| f.order);
        Ok(active)
    }
}
