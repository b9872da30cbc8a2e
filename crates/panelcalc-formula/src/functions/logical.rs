//! Logical functions
//!
//! `IF` itself is evaluated by the evaluator so that only the selected branch runs;
//! [`condition_of`] is the test it shares with the functions here.

use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use crate::value::{ErrorValue, FormulaValue};

/// Interpret a value as a condition
pub fn condition_of(value: &FormulaValue) -> Result<bool, ErrorValue> {
    match value {
        FormulaValue::Boolean(b) => Ok(*b),
        FormulaValue::Number(n) => Ok(*n != 0.0),
        FormulaValue::Error(e) => Err(*e),
        FormulaValue::String(_) => value.as_bool().ok_or(ErrorValue::Value),
    }
}

/// AND function
pub fn fn_and(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let mut result = true;
    for arg in args {
        match condition_of(arg) {
            Ok(b) => result &= b,
            Err(e) => return Ok(FormulaValue::Error(e)),
        }
    }

    Ok(FormulaValue::Boolean(result))
}

/// OR function
pub fn fn_or(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let mut result = false;
    for arg in args {
        match condition_of(arg) {
            Ok(b) => result |= b,
            Err(e) => return Ok(FormulaValue::Error(e)),
        }
    }

    Ok(FormulaValue::Boolean(result))
}

/// NOT function
pub fn fn_not(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match condition_of(&args[0]) {
        Ok(b) => Ok(FormulaValue::Boolean(!b)),
        Err(e) => Ok(FormulaValue::Error(e)),
    }
}

/// XOR(logical1, [logical2], ...) - TRUE if an odd number of arguments are TRUE
pub fn fn_xor(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let mut true_count = 0;
    for arg in args {
        match condition_of(arg) {
            Ok(true) => true_count += 1,
            Ok(false) => {}
            Err(e) => return Ok(FormulaValue::Error(e)),
        }
    }

    Ok(FormulaValue::Boolean(true_count % 2 == 1))
}

/// IFERROR(value, value_if_error) - Returns value_if_error if value is an error value
///
/// Only error values such as `#DIV/0!` are caught; an unknown variable still fails
/// the whole evaluation.
pub fn fn_iferror(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match &args[0] {
        FormulaValue::Error(_) => Ok(args[1].clone()),
        value => Ok(value.clone()),
    }
}

/// TRUE() - Returns the logical value TRUE
pub fn fn_true(_args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(true))
}

/// FALSE() - Returns the logical value FALSE
pub fn fn_false(_args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(
        f: fn(&[FormulaValue], &EvaluationContext) -> FormulaResult<FormulaValue>,
        args: &[FormulaValue],
    ) -> FormulaValue {
        f(args, &EvaluationContext::new()).unwrap()
    }

    #[test]
    fn test_condition_of() {
        assert_eq!(condition_of(&FormulaValue::Number(2.0)), Ok(true));
        assert_eq!(condition_of(&FormulaValue::String("true".into())), Ok(true));
        assert_eq!(
            condition_of(&FormulaValue::String("maybe".into())),
            Err(ErrorValue::Value)
        );
        assert_eq!(
            condition_of(&FormulaValue::Error(ErrorValue::Div0)),
            Err(ErrorValue::Div0)
        );
    }

    #[test]
    fn test_and_propagates_errors() {
        let args = [
            FormulaValue::Boolean(false),
            FormulaValue::Error(ErrorValue::Div0),
        ];
        assert_eq!(call(fn_and, &args), FormulaValue::Error(ErrorValue::Div0));
    }

    #[test]
    fn test_xor() {
        let args = [
            FormulaValue::Boolean(true),
            FormulaValue::Number(1.0),
            FormulaValue::Boolean(true),
        ];
        assert_eq!(call(fn_xor, &args), FormulaValue::Boolean(true));
    }

    #[test]
    fn test_iferror() {
        let args = [
            FormulaValue::Error(ErrorValue::Div0),
            FormulaValue::Number(0.0),
        ];
        assert_eq!(call(fn_iferror, &args), FormulaValue::Number(0.0));

        let args = [FormulaValue::Number(5.0), FormulaValue::Number(0.0)];
        assert_eq!(call(fn_iferror, &args), FormulaValue::Number(5.0));
    }

    #[test]
    fn test_not() {
        assert_eq!(
            call(fn_not, &[FormulaValue::Number(0.0)]),
            FormulaValue::Boolean(true)
        );
    }
}
