//! Text functions

use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use crate::value::{ErrorValue, FormulaValue};
use panelcalc_core::parse_number;

fn to_int_trunc(v: &FormulaValue) -> Option<i64> {
    v.as_number().map(|n| n.trunc() as i64)
}

fn take_left(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn take_right(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if n >= len {
        return s.to_string();
    }
    s.chars().skip(len - n).collect()
}

/// Optional character count argument (defaults to 1); negative counts are `#VALUE!`
fn char_count(args: &[FormulaValue], idx: usize) -> Result<usize, ErrorValue> {
    match args.get(idx) {
        None => Ok(1),
        Some(FormulaValue::Error(e)) => Err(*e),
        Some(v) => match to_int_trunc(v) {
            Some(n) if n >= 0 => Ok(n as usize),
            _ => Err(ErrorValue::Value),
        },
    }
}

/// CONCATENATE(text1, [text2], ...)
pub fn fn_concatenate(
    args: &[FormulaValue],
    _ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let mut out = String::new();
    for arg in args {
        if let FormulaValue::Error(e) = arg {
            return Ok(FormulaValue::Error(*e));
        }
        out.push_str(&arg.as_string());
    }
    Ok(FormulaValue::String(out))
}

/// LEN(text)
pub fn fn_len(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    if let FormulaValue::Error(e) = &args[0] {
        return Ok(FormulaValue::Error(*e));
    }
    let s = args[0].as_string();
    Ok(FormulaValue::Number(s.chars().count() as f64))
}

/// LEFT(text, [num_chars])
pub fn fn_left(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    if let FormulaValue::Error(e) = &args[0] {
        return Ok(FormulaValue::Error(*e));
    }
    match char_count(args, 1) {
        Ok(n) => Ok(FormulaValue::String(take_left(&args[0].as_string(), n))),
        Err(e) => Ok(FormulaValue::Error(e)),
    }
}

/// RIGHT(text, [num_chars])
pub fn fn_right(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    if let FormulaValue::Error(e) = &args[0] {
        return Ok(FormulaValue::Error(*e));
    }
    match char_count(args, 1) {
        Ok(n) => Ok(FormulaValue::String(take_right(&args[0].as_string(), n))),
        Err(e) => Ok(FormulaValue::Error(e)),
    }
}

/// UPPER(text)
pub fn fn_upper(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match &args[0] {
        FormulaValue::Error(e) => Ok(FormulaValue::Error(*e)),
        v => Ok(FormulaValue::String(v.as_string().to_uppercase())),
    }
}

/// LOWER(text)
pub fn fn_lower(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match &args[0] {
        FormulaValue::Error(e) => Ok(FormulaValue::Error(*e)),
        v => Ok(FormulaValue::String(v.as_string().to_lowercase())),
    }
}

/// TRIM(text) - removes leading/trailing spaces and collapses inner runs
pub fn fn_trim(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match &args[0] {
        FormulaValue::Error(e) => Ok(FormulaValue::Error(*e)),
        v => {
            let s = v.as_string();
            Ok(FormulaValue::String(
                s.split_whitespace().collect::<Vec<_>>().join(" "),
            ))
        }
    }
}

/// VALUE(text) - converts text to a number
pub fn fn_value(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match &args[0] {
        FormulaValue::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaValue::Error(e) => Ok(FormulaValue::Error(*e)),
        v => match parse_number(&v.as_string()) {
            Some(n) => Ok(FormulaValue::Number(n)),
            None => Ok(FormulaValue::Error(ErrorValue::Value)),
        },
    }
}
