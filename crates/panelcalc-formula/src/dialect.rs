//! Dialect translation
//!
//! Formulas are authored in a localized dialect: arguments are separated by `;`
//! and the logical functions use Spanish names. The parser only understands
//! the canonical spelling, so every expression goes through [`translate`] first.
//!
//! | Dialect | Canonical |
//! |---------|-----------|
//! | `;`     | `,`       |
//! | `SI(`   | `IF(`     |
//! | `Y(`    | `AND(`    |
//! | `O(`    | `OR(`     |
//!
//! Function names are matched case-sensitively, as whole words, and only in
//! call position, so a variable such as `VSI` or `OY2` is never rewritten.
//! Text inside string literals is left as written: `"O(1;2)"` stays a constant.

use lazy_regex::regex;

/// The fixed dialect → canonical token table, in application order
pub const DIALECT_TABLE: &[(&str, &str)] = &[(";", ","), ("SI", "IF"), ("Y", "AND"), ("O", "OR")];

/// Translate a dialect expression into canonical syntax
///
/// # Example
/// ```rust
/// use panelcalc_formula::translate;
///
/// assert_eq!(translate("SI(VAN0>1600;900;700)"), "IF(VAN0>1600,900,700)");
/// assert_eq!(translate("Y(A>1;O(B;C))"), "AND(A>1,OR(B,C))");
/// ```
pub fn translate(expression: &str) -> String {
    // Odd segments sit between quotes; an escaped `""` keeps the parity intact
    let mut out = String::with_capacity(expression.len());
    for (i, segment) in expression.split('"').enumerate() {
        if i > 0 {
            out.push('"');
        }
        if i % 2 == 0 {
            out.push_str(&translate_code(segment));
        } else {
            out.push_str(segment);
        }
    }
    out
}

/// Apply the table to text outside string literals
fn translate_code(code: &str) -> String {
    let text = code.replace(';', ",");
    let text = regex!(r"\bSI\(").replace_all(&text, "IF(");
    let text = regex!(r"\bY\(").replace_all(&text, "AND(");
    let text = regex!(r"\bO\(").replace_all(&text, "OR(");
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_translate_conditional() {
        assert_eq!(translate("SI(VAN0>1600;900;700)"), "IF(VAN0>1600,900,700)");
    }

    #[test]
    fn test_translate_and_or() {
        assert_eq!(translate("Y(A;B)"), "AND(A,B)");
        assert_eq!(translate("O(A;B)"), "OR(A,B)");
    }

    #[test]
    fn test_translate_nested() {
        assert_eq!(
            translate("SI(Y(ALT1>2000;O(VAN0<500;VAN0>1500));1;0)"),
            "IF(AND(ALT1>2000,OR(VAN0<500,VAN0>1500)),1,0)"
        );
    }

    #[test]
    fn test_identifiers_containing_names_untouched() {
        // Letters inside longer identifiers
        assert_eq!(translate("VSI(1)"), "VSI(1)");
        assert_eq!(translate("SIX+OY2-Y1"), "SIX+OY2-Y1");
        assert_eq!(translate("NO(1)"), "NO(1)");
        assert_eq!(translate("_Y(1)"), "_Y(1)");
        // Not in call position
        assert_eq!(translate("SI+Y-O"), "SI+Y-O");
        assert_eq!(translate("SI (1;2;3)"), "SI (1,2,3)");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(translate("si(1;2;3)"), "si(1,2,3)");
        assert_eq!(translate("y(1;2)"), "y(1,2)");
    }

    #[test]
    fn test_string_literals_untouched() {
        assert_eq!(translate("\"O(1;2)\""), "\"O(1;2)\"");
        assert_eq!(
            translate("SI(A>1;\"SI(x;y)\";\"a;b\")"),
            "IF(A>1,\"SI(x;y)\",\"a;b\")"
        );
        // Escaped quotes do not end the literal
        assert_eq!(
            translate("\"say \"\"Y(1;2)\"\"\"&Y(1;2)"),
            "\"say \"\"Y(1;2)\"\"\"&AND(1,2)"
        );
    }

    #[test]
    fn test_canonical_passthrough() {
        let canonical = "IF(AND(A1>0,B<100),A1*B/100,0)";
        assert_eq!(translate(canonical), canonical);
        assert_eq!(translate("ALT1-7"), "ALT1-7");
    }

    #[test]
    fn test_table_order() {
        assert_eq!(DIALECT_TABLE[0], (";", ","));
        assert_eq!(DIALECT_TABLE.len(), 4);
    }

    proptest! {
        #[test]
        fn canonical_input_is_unchanged(expr in "[A-NP-RT-XZ0-9_+*/()<>=,. -]{0,40}") {
            prop_assert_eq!(translate(&expr), expr);
        }

        #[test]
        fn translation_is_idempotent(expr in "[A-Z0-9;+()<>=\"-]{0,40}") {
            let once = translate(&expr);
            prop_assert_eq!(translate(&once), once.clone());
        }
    }
}
