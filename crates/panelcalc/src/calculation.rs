//! Model calculation engine
//!
//! Runs a model's active formulas in ascending `order`, feeding every result back
//! into the evaluation scope so later formulas can read it.
//!
//! # Example
//!
//! ```rust
//! use panelcalc::prelude::*;
//!
//! let mut store = InMemoryStore::new();
//! store.add_model(Model::new("4000-A1i")).unwrap();
//! store.add_variable(OutputVariable::numeric("HPF1")).unwrap();
//! store.add_variable(OutputVariable::numeric("BPF1")).unwrap();
//! store.add_formula(Formula::new("4000-A1i", "HPF1", "ALT1-7", 1)).unwrap();
//! store.add_formula(Formula::new("4000-A1i", "BPF1", "SI(VAN0>1600;900;700)", 2)).unwrap();
//!
//! let calculator = Calculator::new(store);
//! let inputs = Inputs::from([("ALT1".to_string(), 2000.0), ("VAN0".to_string(), 1800.0)]);
//! let outputs = calculator.compute("4000-A1i", &inputs).unwrap();
//!
//! assert_eq!(outputs["HPF1"], Value::Number(1993.0));
//! assert_eq!(outputs["BPF1"], Value::Number(900.0));
//! ```

use crate::error::{CalcError, Result};
use panelcalc_core::{
    format_number, parse_number, ActiveFormula, FormulaStore, Inputs, OutputKind, Outputs,
    Value,
};
use panelcalc_formula::{parse_formula, translate, ExpressionEvaluator, FormulaError, Interpreter};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info_span, trace, warn};

/// Options for model calculation
#[derive(Debug, Clone, Default)]
pub struct CalculationOptions {
    /// Check every formula's references before evaluating anything.
    ///
    /// With this off, a reference to a variable that is not yet available only
    /// fails when the formula reading it runs (and not at all if it sits in an
    /// `IF` branch that is never taken).
    pub validate_dependencies: bool,
}

impl CalculationOptions {
    /// Options with dependency validation switched on
    pub fn validating() -> Self {
        Self {
            validate_dependencies: true,
        }
    }
}

/// Computes output variables for models held in a [`FormulaStore`]
///
/// A calculator holds no per-call state, so one instance can serve concurrent
/// `compute` calls when the store is `Sync`.
#[derive(Debug, Clone)]
pub struct Calculator<S> {
    store: S,
    options: CalculationOptions,
}

impl<S: FormulaStore> Calculator<S> {
    /// Create a calculator with default options
    pub fn new(store: S) -> Self {
        Self::with_options(store, CalculationOptions::default())
    }

    /// Create a calculator with custom options
    pub fn with_options(store: S, options: CalculationOptions) -> Self {
        Self { store, options }
    }

    /// The formulas `compute` would run for `model`, in evaluation order
    pub fn plan(&self, model: &str) -> Result<Vec<ActiveFormula>> {
        Ok(self.store.list_active_formulas(model)?)
    }

    /// Compute every output of `model` from `inputs` using the bundled interpreter
    ///
    /// Besides evaluation failures, the call fails with
    /// [`CalcError::ExpressionEvaluation`] when a result does not fit its variable's
    /// [`OutputKind`]: a `Numeric` variable whose formula yields text that is not a
    /// finite number is a type mismatch. A `Text` variable stores a numeric result
    /// in its text form.
    pub fn compute(&self, model: &str, inputs: &Inputs) -> Result<Outputs> {
        self.compute_with(model, inputs, Interpreter::new())
    }

    /// Compute every output of `model` from `inputs` using `evaluator`
    ///
    /// The evaluator should be fresh: it receives all inputs, then each output as it
    /// is computed. The first failing formula aborts the call and no outputs are
    /// returned. Results are fitted to their variable's [`OutputKind`] as described
    /// on [`compute`](Self::compute), so a `Numeric` variable given non-numeric text
    /// also aborts the call.
    pub fn compute_with<E: ExpressionEvaluator>(
        &self,
        model: &str,
        inputs: &Inputs,
        mut evaluator: E,
    ) -> Result<Outputs> {
        let span = info_span!("compute", model);
        let _enter = span.enter();

        let formulas = self.store.list_active_formulas(model).map_err(|e| {
            warn!(error = %e, "failed to load formulas");
            CalcError::from(e)
        })?;

        if formulas.is_empty() {
            debug!("no active formulas");
            return Ok(Outputs::new());
        }

        if self.options.validate_dependencies {
            if let Err(e) = validate_references(&formulas, inputs.keys().map(String::as_str)) {
                warn!(error = %e, "dependency validation failed");
                return Err(e);
            }
        }

        let mut context: HashMap<String, Value> = inputs
            .iter()
            .map(|(code, value)| (code.clone(), Value::Number(*value)))
            .collect();

        for (code, value) in &context {
            evaluator.set_variable(code, value.clone());
        }

        for formula in &formulas {
            let code = &formula.variable.code;
            let value = match evaluate_formula(&mut evaluator, formula) {
                Ok(value) => value,
                Err(e) => {
                    warn!(variable = %code, error = %e, "formula failed");
                    return Err(e);
                }
            };

            debug!(variable = %code, order = formula.order, value = %value, "computed");
            evaluator.set_variable(code, value.clone());
            context.insert(code.clone(), value);
        }

        let outputs: Outputs = formulas
            .iter()
            .filter_map(|f| {
                let code = &f.variable.code;
                context.get(code).map(|v| (code.clone(), v.clone()))
            })
            .collect();

        debug!(outputs = outputs.len(), "compute finished");
        Ok(outputs)
    }

    /// Report static problems in a model's formula chain without evaluating it
    ///
    /// Flags expressions that do not parse and references to an output of the same
    /// model that is only computed by the formula itself or a later one. Any other
    /// reference is assumed to be an input.
    pub fn check(&self, model: &str) -> Result<Vec<CalcError>> {
        let formulas = self.store.list_active_formulas(model)?;
        let targets: HashSet<&str> = formulas.iter().map(|f| f.variable.code.as_str()).collect();

        let mut problems = Vec::new();
        let mut computed: HashSet<&str> = HashSet::new();
        for formula in &formulas {
            let code = formula.variable.code.as_str();
            match references_of(formula) {
                Ok(references) => {
                    for reference in references {
                        if targets.contains(reference.as_str())
                            && !computed.contains(reference.as_str())
                        {
                            problems.push(CalcError::UnresolvedReference {
                                variable_code: code.to_string(),
                                reference,
                            });
                        }
                    }
                }
                Err(e) => problems.push(e),
            }
            computed.insert(code);
        }

        Ok(problems)
    }
}

/// Translate, evaluate and coerce one formula
fn evaluate_formula<E: ExpressionEvaluator>(
    evaluator: &mut E,
    formula: &ActiveFormula,
) -> Result<Value> {
    let code = &formula.variable.code;
    let canonical = translate(&formula.expression);
    trace!(variable = %code, expression = %canonical, "evaluating");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&canonical)));
    let value = match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(FormulaError::Internal(detail))) => {
            return Err(CalcError::UnexpectedEvaluator {
                variable_code: code.clone(),
                detail,
            })
        }
        Ok(Err(e)) => {
            return Err(CalcError::ExpressionEvaluation {
                variable_code: code.clone(),
                detail: e.to_string(),
            })
        }
        Err(payload) => {
            return Err(CalcError::UnexpectedEvaluator {
                variable_code: code.clone(),
                detail: panic_message(payload.as_ref()),
            })
        }
    };

    coerce(value, formula.variable.kind).map_err(|detail| CalcError::ExpressionEvaluation {
        variable_code: code.clone(),
        detail,
    })
}

/// Fit an evaluated value to the declared output kind
fn coerce(value: Value, kind: OutputKind) -> std::result::Result<Value, String> {
    match (kind, value) {
        (_, Value::Number(n)) if !n.is_finite() => Err(format!("Invalid number: {}", n)),
        (OutputKind::Numeric, Value::Number(n)) => Ok(Value::Number(n)),
        (OutputKind::Numeric, Value::Text(s)) => match parse_number(&s) {
            Some(n) => Ok(Value::Number(n)),
            None => Err(format!("Type mismatch: expected number, got text {:?}", s)),
        },
        (OutputKind::Text, Value::Number(n)) => Ok(Value::Text(format_number(n))),
        (OutputKind::Text, Value::Text(s)) => Ok(Value::Text(s)),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("evaluator panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("evaluator panicked: {}", s)
    } else {
        "evaluator panicked".to_string()
    }
}

/// Parse a formula and list the variables it reads
fn references_of(formula: &ActiveFormula) -> Result<Vec<String>> {
    let canonical = translate(&formula.expression);
    let ast = parse_formula(&canonical).map_err(|e| CalcError::ExpressionEvaluation {
        variable_code: formula.variable.code.clone(),
        detail: e.to_string(),
    })?;
    Ok(ast.references().into_iter().collect())
}

/// Check that every formula reads only inputs and outputs computed before it
fn validate_references<'a>(
    formulas: &'a [ActiveFormula],
    inputs: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut available: HashSet<&str> = inputs.into_iter().collect();

    for formula in formulas {
        for reference in references_of(formula)? {
            if !available.contains(reference.as_str()) {
                return Err(CalcError::UnresolvedReference {
                    variable_code: formula.variable.code.clone(),
                    reference,
                });
            }
        }
        available.insert(formula.variable.code.as_str());
    }

    Ok(())
}
