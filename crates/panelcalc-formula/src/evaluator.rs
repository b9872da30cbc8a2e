//! Formula evaluator
//!
//! Evaluates formula ASTs against a set of named variables.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{logical, FunctionRegistry};
use crate::parser::parse_formula;
use crate::value::{ErrorValue, FormulaValue};
use ahash::AHashMap;
use panelcalc_core::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;
use tracing::trace;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Something that can evaluate canonical expressions against named variables.
///
/// Variables set on an evaluator stay visible to every later `evaluate` call on
/// the same instance.
pub trait ExpressionEvaluator {
    /// Bind (or rebind) a variable
    fn set_variable(&mut self, code: &str, value: Value);

    /// Evaluate a canonical expression to a scalar
    fn evaluate(&mut self, expression: &str) -> FormulaResult<Value>;
}

/// Variables visible to an expression
#[derive(Debug, Default, Clone)]
pub struct EvaluationContext {
    variables: AHashMap<String, FormulaValue>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable
    pub fn set_variable(&mut self, code: impl Into<String>, value: FormulaValue) {
        self.variables.insert(code.into(), value);
    }

    /// Look up a variable; unknown codes are an error
    pub fn get_variable(&self, code: &str) -> FormulaResult<FormulaValue> {
        self.variables
            .get(code)
            .cloned()
            .ok_or_else(|| FormulaError::UnknownVariable(code.to_string()))
    }
}

/// The bundled expression evaluator
///
/// # Example
/// ```rust
/// use panelcalc_core::Value;
/// use panelcalc_formula::{ExpressionEvaluator, Interpreter};
///
/// let mut interpreter = Interpreter::new();
/// interpreter.set_variable("ALT1", Value::Number(2000.0));
/// assert_eq!(interpreter.evaluate("ALT1-7").unwrap(), Value::Number(1993.0));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Interpreter {
    context: EvaluationContext,
}

impl Interpreter {
    /// Create an interpreter with no variables
    pub fn new() -> Self {
        Self::default()
    }

    /// The variables currently bound
    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }
}

impl ExpressionEvaluator for Interpreter {
    fn set_variable(&mut self, code: &str, value: Value) {
        self.context.set_variable(code, value.into());
    }

    fn evaluate(&mut self, expression: &str) -> FormulaResult<Value> {
        let ast = parse_formula(expression)?;
        let result = evaluate(&ast, &self.context)?;
        trace!(expression, result = ?result, "evaluated");
        result.into_value()
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaExpr::String(s) => Ok(FormulaValue::String(s.clone())),
        FormulaExpr::Boolean(b) => Ok(FormulaValue::Boolean(*b)),
        FormulaExpr::Error(e) => Ok(FormulaValue::Error(*e)),

        // === References ===
        FormulaExpr::Variable(name) => ctx.get_variable(name),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),

        FormulaExpr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, ctx),

        // === Functions ===
        FormulaExpr::Function { name, args } if name == "IF" => evaluate_if(args, ctx),
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    // Evaluate operands first
    let left_val = evaluate(left, ctx)?;
    let right_val = evaluate(right, ctx)?;

    // Propagate errors
    if let Some(e) = left_val.get_error() {
        return Ok(FormulaValue::Error(e));
    }
    if let Some(e) = right_val.get_error() {
        return Ok(FormulaValue::Error(e));
    }

    match op {
        // Arithmetic operators
        BinaryOperator::Add => Ok(FormulaValue::finite(
            left_val.to_number()? + right_val.to_number()?,
        )),
        BinaryOperator::Subtract => Ok(FormulaValue::finite(
            left_val.to_number()? - right_val.to_number()?,
        )),
        BinaryOperator::Multiply => Ok(FormulaValue::finite(
            left_val.to_number()? * right_val.to_number()?,
        )),
        BinaryOperator::Divide => {
            let l = left_val.to_number()?;
            let r = right_val.to_number()?;
            if r == 0.0 {
                Ok(FormulaValue::Error(ErrorValue::Div0))
            } else {
                Ok(FormulaValue::finite(l / r))
            }
        }
        BinaryOperator::Power => Ok(FormulaValue::finite(
            left_val.to_number()?.powf(right_val.to_number()?),
        )),

        // Comparison operators
        BinaryOperator::Equal => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Equal,
        )),
        BinaryOperator::NotEqual => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Equal,
        )),
        BinaryOperator::LessThan => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Less,
        )),
        BinaryOperator::LessEqual => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Greater,
        )),
        BinaryOperator::GreaterThan => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) == Ordering::Greater,
        )),
        BinaryOperator::GreaterEqual => Ok(FormulaValue::Boolean(
            compare_values(&left_val, &right_val) != Ordering::Less,
        )),

        // Concatenation
        BinaryOperator::Concat => {
            let l = left_val.as_string();
            let r = right_val.as_string();
            Ok(FormulaValue::String(l + &r))
        }
    }
}

/// Compare two values for ordering (spreadsheet-style comparison)
fn compare_values(left: &FormulaValue, right: &FormulaValue) -> Ordering {
    match (left, right) {
        // Numbers compare numerically
        (FormulaValue::Number(l), FormulaValue::Number(r)) => {
            l.partial_cmp(r).unwrap_or(Ordering::Equal)
        }

        // Strings compare case-insensitively
        (FormulaValue::String(l), FormulaValue::String(r)) => {
            l.to_lowercase().cmp(&r.to_lowercase())
        }

        // Booleans: FALSE < TRUE
        (FormulaValue::Boolean(l), FormulaValue::Boolean(r)) => l.cmp(r),

        // Mixed types: number < string < boolean
        (FormulaValue::Number(_), FormulaValue::String(_)) => Ordering::Less,
        (FormulaValue::String(_), FormulaValue::Number(_)) => Ordering::Greater,
        (FormulaValue::Number(_), FormulaValue::Boolean(_)) => Ordering::Less,
        (FormulaValue::Boolean(_), FormulaValue::Number(_)) => Ordering::Greater,
        (FormulaValue::String(_), FormulaValue::Boolean(_)) => Ordering::Less,
        (FormulaValue::Boolean(_), FormulaValue::String(_)) => Ordering::Greater,

        // Errors are propagated before comparison
        _ => Ordering::Equal,
    }
}

/// Evaluate a unary operation
fn evaluate_unary_op(
    op: UnaryOperator,
    operand: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let val = evaluate(operand, ctx)?;

    // Propagate errors
    if let Some(e) = val.get_error() {
        return Ok(FormulaValue::Error(e));
    }

    match op {
        UnaryOperator::Negate => Ok(FormulaValue::finite(-val.to_number()?)),
        UnaryOperator::Percent => Ok(FormulaValue::finite(val.to_number()? / 100.0)),
    }
}

/// IF(test, if_true, [if_false])
///
/// Only the selected branch is evaluated, so the other branch may reference
/// variables that are not bound.
fn evaluate_if(args: &[FormulaExpr], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    if args.len() < 2 || args.len() > 3 {
        return Err(FormulaError::ArgumentCount {
            function: "IF".to_string(),
            expected: "2 or 3".to_string(),
            actual: args.len(),
        });
    }

    let condition = evaluate(&args[0], ctx)?;
    match logical::condition_of(&condition) {
        Ok(true) => evaluate(&args[1], ctx),
        Ok(false) => match args.get(2) {
            Some(if_false) => evaluate(if_false, ctx),
            None => Ok(FormulaValue::Boolean(false)),
        },
        Err(e) => Ok(FormulaValue::Error(e)),
    }
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let registry = get_function_registry();

    let func = registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    // Check argument count
    if args.len() < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    // Evaluate arguments
    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(evaluate(arg, ctx)?);
    }

    // Call the function
    (func.implementation)(&evaluated_args, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(formula: &str) -> FormulaResult<FormulaValue> {
        let ast = parse_formula(formula)?;
        let ctx = EvaluationContext::new();
        evaluate(&ast, &ctx)
    }

    fn eval_with(formula: &str, vars: &[(&str, FormulaValue)]) -> FormulaResult<FormulaValue> {
        let ast = parse_formula(formula)?;
        let mut ctx = EvaluationContext::new();
        for (code, value) in vars {
            ctx.set_variable(*code, value.clone());
        }
        evaluate(&ast, &ctx)
    }

    #[test]
    fn test_evaluate_literals() {
        assert_eq!(eval("42").unwrap(), FormulaValue::Number(42.0));
        assert_eq!(eval("\"Hello\"").unwrap(), FormulaValue::String("Hello".into()));
        assert_eq!(eval("TRUE").unwrap(), FormulaValue::Boolean(true));
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2").unwrap(), FormulaValue::Number(3.0));
        assert_eq!(eval("10-3").unwrap(), FormulaValue::Number(7.0));
        assert_eq!(eval("4*5").unwrap(), FormulaValue::Number(20.0));
        assert_eq!(eval("20/4").unwrap(), FormulaValue::Number(5.0));
        assert_eq!(eval("2^10").unwrap(), FormulaValue::Number(1024.0));
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("1+2*3").unwrap(), FormulaValue::Number(7.0));
        assert_eq!(eval("(1+2)*3").unwrap(), FormulaValue::Number(9.0));
        assert_eq!(eval("2+3*4-5").unwrap(), FormulaValue::Number(9.0));
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(eval("-5").unwrap(), FormulaValue::Number(-5.0));
        assert_eq!(eval("50%").unwrap(), FormulaValue::Number(0.5));
        assert_eq!(eval("--5").unwrap(), FormulaValue::Number(5.0));
    }

    #[test]
    fn test_evaluate_comparison() {
        assert_eq!(eval("1<2").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("1>2").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("5=5").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("5<>5").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("5<=5").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("5>=6").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("\"abc\"=\"ABC\"").unwrap(), FormulaValue::Boolean(true));
    }

    #[test]
    fn test_evaluate_concatenation() {
        assert_eq!(
            eval("\"Panel \"&42").unwrap(),
            FormulaValue::String("Panel 42".into())
        );
    }

    #[test]
    fn test_evaluate_variables() {
        let vars = [("ALT1", FormulaValue::Number(2000.0))];
        assert_eq!(
            eval_with("ALT1-7", &vars).unwrap(),
            FormulaValue::Number(1993.0)
        );
    }

    #[test]
    fn test_unknown_variable() {
        assert_eq!(
            eval("ALT1-7").unwrap_err(),
            FormulaError::UnknownVariable("ALT1".into())
        );
    }

    #[test]
    fn test_arithmetic_on_text() {
        let vars = [("REF", FormulaValue::String("VT-12".into()))];
        assert!(matches!(
            eval_with("REF*2", &vars),
            Err(FormulaError::TypeMismatch { .. })
        ));
        // Numeric text coerces
        let vars = [("N", FormulaValue::String("12".into()))];
        assert_eq!(eval_with("N*2", &vars).unwrap(), FormulaValue::Number(24.0));
    }

    #[test]
    fn test_non_finite_text_is_not_a_number() {
        for text in ["nan", "inf", "-Infinity"] {
            let vars = [("T", FormulaValue::String(text.into()))];
            assert!(
                matches!(eval_with("T*2", &vars), Err(FormulaError::TypeMismatch { .. })),
                "{text}"
            );
        }
        assert!(matches!(
            eval("\"nan\"*2"),
            Err(FormulaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow_is_num_error() {
        let num = FormulaValue::Error(ErrorValue::Num);
        assert_eq!(eval("1E308*10").unwrap(), num);
        assert_eq!(eval("-1E308-1E308").unwrap(), num);
        assert_eq!(eval("1E308/1E-10").unwrap(), num);
        assert_eq!(eval("10^400").unwrap(), num);

        // inf - inf would be NaN; the first overflow already yields #NUM!
        let vars = [("X", FormulaValue::Number(1.0))];
        assert_eq!(
            eval_with("X*1E308*1E308-X*1E308*1E308", &vars).unwrap(),
            num
        );
        assert_eq!(eval("SUM(1E308,1E308)").unwrap(), num);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert_eq!(eval("1/0").unwrap(), FormulaValue::Error(ErrorValue::Div0));
        assert_eq!(eval("1/0+1").unwrap(), FormulaValue::Error(ErrorValue::Div0));
    }

    #[test]
    fn test_evaluate_if() {
        assert_eq!(eval("IF(TRUE,1,2)").unwrap(), FormulaValue::Number(1.0));
        assert_eq!(eval("IF(FALSE,1,2)").unwrap(), FormulaValue::Number(2.0));
        assert_eq!(eval("IF(FALSE,1)").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(
            eval("IF(1>0,\"Yes\",\"No\")").unwrap(),
            FormulaValue::String("Yes".into())
        );
        assert!(matches!(
            eval("IF(TRUE)"),
            Err(FormulaError::ArgumentCount { .. })
        ));
    }

    #[test]
    fn test_if_only_evaluates_selected_branch() {
        let vars = [("VAN0", FormulaValue::Number(1800.0))];
        assert_eq!(
            eval_with("IF(VAN0>1600,900,MISSING)", &vars).unwrap(),
            FormulaValue::Number(900.0)
        );
        assert!(eval_with("IF(VAN0<1600,900,MISSING)", &vars).is_err());
    }

    #[test]
    fn test_evaluate_and_or() {
        assert_eq!(eval("AND(TRUE,1>0)").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("AND(TRUE,FALSE)").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("OR(FALSE,2)").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("OR(FALSE,0)").unwrap(), FormulaValue::Boolean(false));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("FOO(1)").unwrap_err(),
            FormulaError::UnknownFunction("FOO".into())
        );
    }

    #[test]
    fn test_interpreter_keeps_variables() {
        let mut interpreter = Interpreter::new();
        interpreter.set_variable("ALT1", Value::Number(2000.0));
        let hpf1 = interpreter.evaluate("ALT1-7").unwrap();
        interpreter.set_variable("HPF1", hpf1);

        assert_eq!(
            interpreter.evaluate("HPF1*2").unwrap(),
            Value::Number(3986.0)
        );
        assert_eq!(
            interpreter.context().get_variable("HPF1").unwrap(),
            FormulaValue::Number(1993.0)
        );
    }

    #[test]
    fn test_interpreter_result_conversion() {
        let mut interpreter = Interpreter::new();
        assert_eq!(interpreter.evaluate("3>2").unwrap(), Value::Number(1.0));
        assert_eq!(
            interpreter.evaluate("\"A\"&\"B\"").unwrap(),
            Value::text("AB")
        );
        assert_eq!(
            interpreter.evaluate("1/0").unwrap_err(),
            FormulaError::ErrorValue(ErrorValue::Div0)
        );
    }
}
