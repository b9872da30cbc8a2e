//! Math functions

use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use crate::value::{ErrorValue, FormulaValue};

/// Read a numeric argument, falling back to `default` when it is absent
fn number_arg(args: &[FormulaValue], idx: usize, default: f64) -> Result<f64, ErrorValue> {
    match args.get(idx) {
        None => Ok(default),
        Some(FormulaValue::Error(e)) => Err(*e),
        Some(v) => v.as_number().ok_or(ErrorValue::Value),
    }
}

/// Collect every numeric argument; text is ignored, errors short-circuit
fn numbers(args: &[FormulaValue]) -> Result<Vec<f64>, ErrorValue> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            FormulaValue::Number(n) => out.push(*n),
            FormulaValue::Boolean(b) => out.push(if *b { 1.0 } else { 0.0 }),
            FormulaValue::Error(e) => return Err(*e),
            FormulaValue::String(_) => {} // Ignore non-numeric
        }
    }
    Ok(out)
}

macro_rules! try_num {
    ($e:expr) => {
        match $e {
            Ok(n) => n,
            Err(e) => return Ok(FormulaValue::Error(e)),
        }
    };
}

/// 2^52: every `f64` at or above this magnitude is a whole number
const WHOLE_NUMBER_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Round `number` at `num_digits` decimal places with `round`
///
/// Digit counts are clamped to the range an `f64` can scale by. When the scaled
/// number has no fractional part left to round, `number` is returned as is.
fn round_at(number: f64, num_digits: f64, round: fn(f64) -> f64) -> FormulaValue {
    let num_digits = num_digits.clamp(-308.0, 308.0) as i32;
    let multiplier = 10_f64.powi(num_digits);
    let scaled = number * multiplier;
    if !scaled.is_finite() || scaled.abs() >= WHOLE_NUMBER_LIMIT {
        return FormulaValue::finite(number);
    }
    FormulaValue::finite(round(scaled) / multiplier)
}

/// SUM function
pub fn fn_sum(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let values = try_num!(numbers(args));
    Ok(FormulaValue::finite(values.iter().sum()))
}

/// AVERAGE function
pub fn fn_average(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let values = try_num!(numbers(args));
    if values.is_empty() {
        return Ok(FormulaValue::Error(ErrorValue::Div0));
    }
    Ok(FormulaValue::finite(
        values.iter().sum::<f64>() / values.len() as f64,
    ))
}

/// MIN function
pub fn fn_min(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let values = try_num!(numbers(args));
    let min = values.into_iter().reduce(f64::min).unwrap_or(0.0);
    Ok(FormulaValue::Number(min))
}

/// MAX function
pub fn fn_max(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let values = try_num!(numbers(args));
    let max = values.into_iter().reduce(f64::max).unwrap_or(0.0);
    Ok(FormulaValue::Number(max))
}

/// ABS function
pub fn fn_abs(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    Ok(FormulaValue::Number(number.abs()))
}

/// SIGN function
pub fn fn_sign(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let sign = if number > 0.0 {
        1.0
    } else if number < 0.0 {
        -1.0
    } else {
        0.0
    };
    Ok(FormulaValue::Number(sign))
}

/// ROUND(number, [num_digits]) - rounds half away from zero
pub fn fn_round(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let num_digits = try_num!(number_arg(args, 1, 0.0));
    Ok(round_at(number, num_digits, f64::round))
}

/// ROUNDUP(number, [num_digits]) - rounds away from zero
pub fn fn_roundup(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let num_digits = try_num!(number_arg(args, 1, 0.0));
    Ok(round_at(number, num_digits, |n| {
        if n >= 0.0 {
            n.ceil()
        } else {
            n.floor()
        }
    }))
}

/// ROUNDDOWN(number, [num_digits]) - rounds toward zero
pub fn fn_rounddown(
    args: &[FormulaValue],
    _ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let num_digits = try_num!(number_arg(args, 1, 0.0));
    Ok(round_at(number, num_digits, f64::trunc))
}

/// INT function - rounds down to the nearest integer
pub fn fn_int(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    Ok(FormulaValue::Number(number.floor()))
}

/// TRUNC(number, [num_digits])
pub fn fn_trunc(args: &[FormulaValue], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    fn_rounddown(args, ctx)
}

/// MOD(number, divisor) - result has the sign of the divisor
pub fn fn_mod(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let divisor = try_num!(number_arg(args, 1, 0.0));

    if divisor == 0.0 {
        return Ok(FormulaValue::Error(ErrorValue::Div0));
    }

    Ok(FormulaValue::finite(
        number - divisor * (number / divisor).floor(),
    ))
}

/// SQRT function
pub fn fn_sqrt(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    if number < 0.0 {
        return Ok(FormulaValue::Error(ErrorValue::Num));
    }
    Ok(FormulaValue::Number(number.sqrt()))
}

/// POWER(number, power)
pub fn fn_power(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let base = try_num!(number_arg(args, 0, 0.0));
    let exponent = try_num!(number_arg(args, 1, 0.0));

    Ok(FormulaValue::finite(base.powf(exponent)))
}

/// CEILING(number, [significance]) - rounds up to a multiple of significance
pub fn fn_ceiling(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let significance = try_num!(number_arg(args, 1, 1.0)).abs();

    if significance == 0.0 {
        return Ok(FormulaValue::Number(0.0));
    }
    Ok(FormulaValue::finite(
        (number / significance).ceil() * significance,
    ))
}

/// FLOOR(number, [significance]) - rounds down to a multiple of significance
pub fn fn_floor(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = try_num!(number_arg(args, 0, 0.0));
    let significance = try_num!(number_arg(args, 1, 1.0)).abs();

    if significance == 0.0 {
        return Ok(FormulaValue::Error(ErrorValue::Div0));
    }
    Ok(FormulaValue::finite(
        (number / significance).floor() * significance,
    ))
}
