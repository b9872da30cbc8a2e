//! Tests for dialect translation and expression evaluation through the public API

use panelcalc::prelude::*;
use panelcalc::{parse_formula, translate, FormulaError};

fn eval(expression: &str, vars: &[(&str, Value)]) -> Result<Value, FormulaError> {
    let mut interpreter = Interpreter::new();
    for (code, value) in vars {
        interpreter.set_variable(code, value.clone());
    }
    interpreter.evaluate(&translate(expression))
}

/// Dialect formulas as they are authored in the catalog
#[test]
fn test_translate_dialect() {
    assert_eq!(translate("SI(VAN0>1600;900;700)"), "IF(VAN0>1600,900,700)");
    assert_eq!(
        translate("SI(Y(A>1;B<2);1;SI(O(C=1;D=2);2;3))"),
        "IF(AND(A>1,B<2),1,IF(OR(C=1,D=2),2,3))"
    );
    assert_eq!(translate("ALT1-7"), "ALT1-7");
}

/// Identifiers that only contain the dialect names are left alone
#[test]
fn test_translate_respects_word_boundaries() {
    assert_eq!(translate("VSI(1)"), "VSI(1)");
    assert_eq!(translate("OY(1;2)"), "OY(1,2)");
    assert_eq!(translate("SIX+Y2"), "SIX+Y2");
}

/// Text constants keep dialect spellings
#[test]
fn test_translate_leaves_string_literals() {
    assert_eq!(translate("\"O(1;2)\""), "\"O(1;2)\"");
    assert_eq!(eval("\"O(1;2)\"", &[]).unwrap(), Value::text("O(1;2)"));
    assert_eq!(
        eval("SI(1;\"a;b\";\"c\")", &[]).unwrap(),
        Value::text("a;b")
    );
}

/// Translating canonical text is a no-op
#[test]
fn test_translate_is_idempotent() {
    for expression in [
        "SI(VAN0>1600;900;700)",
        "SI(Y(A>1;O(B=2;C=3));1;0)",
        "ROUND(ALT1/3;2)",
    ] {
        let once = translate(expression);
        assert_eq!(translate(&once), once);
    }
}

#[test]
fn test_evaluate_arithmetic_and_logic() {
    assert_eq!(eval("1+2*3", &[]).unwrap(), Value::Number(7.0));
    assert_eq!(eval("2^3^2", &[]).unwrap(), Value::Number(512.0));
    assert_eq!(eval("50%", &[]).unwrap(), Value::Number(0.5));
    assert_eq!(eval("5>3", &[]).unwrap(), Value::Number(1.0));
    assert_eq!(eval("Y(1;0)", &[]).unwrap(), Value::Number(0.0));
    assert_eq!(eval("O(1;0)", &[]).unwrap(), Value::Number(1.0));
}

#[test]
fn test_evaluate_with_variables() {
    let vars = [("ALT1", Value::Number(2000.0)), ("VAN0", Value::Number(1800.0))];
    assert_eq!(eval("ALT1-7", &vars).unwrap(), Value::Number(1993.0));
    assert_eq!(
        eval("SI(VAN0>1600;900;700)", &vars).unwrap(),
        Value::Number(900.0)
    );
    assert_eq!(
        eval("ROUNDUP(VAN0/7;0)", &vars).unwrap(),
        Value::Number(258.0)
    );
}

#[test]
fn test_evaluate_text() {
    let vars = [("COLOR", Value::text("bronce"))];
    assert_eq!(
        eval("UPPER(COLOR)&\"-\"&LEN(COLOR)", &vars).unwrap(),
        Value::text("BRONCE-6")
    );
}

#[test]
fn test_evaluate_errors() {
    assert!(matches!(
        eval("ALT1+1", &[]),
        Err(FormulaError::UnknownVariable(code)) if code == "ALT1"
    ));
    assert!(matches!(eval("1/0", &[]), Err(FormulaError::ErrorValue(_))));
    assert!(matches!(
        eval("NOPE(1)", &[]),
        Err(FormulaError::UnknownFunction(_))
    ));
    assert!(matches!(eval("1+", &[]), Err(FormulaError::Parse(_))));
}

#[test]
fn test_non_finite_results_are_errors() {
    assert!(matches!(
        eval("1E308*10", &[]),
        Err(FormulaError::ErrorValue(_))
    ));
    assert!(matches!(
        eval("\"nan\"*2", &[]),
        Err(FormulaError::TypeMismatch { .. })
    ));
    assert_eq!(eval("ROUND(1.5;400)", &[]).unwrap(), Value::Number(1.5));
}

#[test]
fn test_references() {
    let ast = parse_formula(&translate("SI(VAN0>1600;HPF1;ALT1)+SUM(1;2)")).unwrap();
    let refs: Vec<_> = ast.references().into_iter().collect();
    assert_eq!(refs, vec!["ALT1", "HPF1", "VAN0"]);
}
