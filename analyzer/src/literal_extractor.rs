//! Extracts numeric values from literal tokens.
//!
//! Literal tokens keep the source lexeme, so conversion to a value happens
//! here, exactly once, for each interpretation a literal can have. Each
//! extraction reports whether the magnitude exceeds the range of the
//! target representation; the caller records that as an overflow
//! annotation rather than an error.
//!
//! Underscores in the lexeme are digit separators and are ignored.
use std::num::IntErrorKind;

use ferroplc_dsl::common::{Integer, Real};
use ferroplc_dsl::core::Located;
use ferroplc_dsl::diagnostic::{Diagnostic, Label};
use ferroplc_problems::Problem;

/// Extracts the value of an integer token as a signed 64-bit integer.
///
/// Returns the value and an overflow flag. The value is meaningful only
/// when the flag is false.
pub(crate) fn extract_int64(node: &Integer) -> Result<(i64, bool), Diagnostic> {
    let digits = strip_separators(node.digits());
    match i64::from_str_radix(digits.as_str(), node.base.radix()) {
        Ok(value) => Ok((value, false)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Ok((0, true)),
            _ => Err(invalid_integer(node)),
        },
    }
}

/// Extracts the value of an integer token as an unsigned 64-bit integer.
///
/// Returns the value and an overflow flag. The value is meaningful only
/// when the flag is false.
pub(crate) fn extract_uint64(node: &Integer) -> Result<(u64, bool), Diagnostic> {
    let digits = strip_separators(node.digits());
    match u64::from_str_radix(digits.as_str(), node.base.radix()) {
        Ok(value) => Ok((value, false)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Ok((0, true)),
            _ => Err(invalid_integer(node)),
        },
    }
}

/// Extracts the value of a real token as a 64-bit IEEE 754 value.
///
/// A magnitude beyond the range of the representation parses to infinity,
/// which is reported through the overflow flag.
pub(crate) fn extract_real64(node: &Real) -> Result<(f64, bool), Diagnostic> {
    let text = strip_separators(&node.text);
    match text.parse::<f64>() {
        Ok(value) => Ok((value, value.is_infinite())),
        Err(_) => Err(Diagnostic::problem(
            Problem::InvalidLiteral,
            Label::span(node.span(), "Real literal"),
        )
        .with_context("text", &node.text)),
    }
}

fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| *c != '_').collect()
}

fn invalid_integer(node: &Integer) -> Diagnostic {
    Diagnostic::problem(
        Problem::InvalidLiteral,
        Label::span(node.span(), "Integer literal"),
    )
    .with_context("text", &node.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferroplc_dsl::core::SourceSpan;

    fn integer(lexeme: &str) -> Integer {
        Integer::try_from_lexeme(lexeme, SourceSpan::default()).unwrap()
    }

    fn real(lexeme: &str) -> Real {
        Real::new(lexeme, SourceSpan::default()).unwrap()
    }

    #[test]
    fn extract_int64_when_decimal_then_value() {
        assert_eq!(extract_int64(&integer("100")).unwrap(), (100, false));
    }

    #[test]
    fn extract_int64_when_separators_then_ignored() {
        assert_eq!(extract_int64(&integer("1_024")).unwrap(), (1024, false));
    }

    #[test]
    fn extract_int64_when_bases_then_radix_applied() {
        assert_eq!(extract_int64(&integer("16#FF")).unwrap(), (255, false));
        assert_eq!(extract_int64(&integer("16#ff")).unwrap(), (255, false));
        assert_eq!(extract_int64(&integer("8#777")).unwrap(), (511, false));
        assert_eq!(extract_int64(&integer("2#1010_1010")).unwrap(), (170, false));
    }

    #[test]
    fn extract_int64_when_at_maximum_then_no_overflow() {
        assert_eq!(
            extract_int64(&integer("9223372036854775807")).unwrap(),
            (i64::MAX, false)
        );
    }

    #[test]
    fn extract_int64_when_beyond_maximum_then_overflow() {
        let (_, overflow) = extract_int64(&integer("9223372036854775808")).unwrap();
        assert!(overflow);
    }

    #[test]
    fn extract_uint64_when_beyond_signed_maximum_then_no_overflow() {
        assert_eq!(
            extract_uint64(&integer("9223372036854775808")).unwrap(),
            (9223372036854775808, false)
        );
    }

    #[test]
    fn extract_uint64_when_at_maximum_then_no_overflow() {
        assert_eq!(
            extract_uint64(&integer("18446744073709551615")).unwrap(),
            (u64::MAX, false)
        );
    }

    #[test]
    fn extract_uint64_when_beyond_maximum_then_overflow() {
        let (_, overflow) = extract_uint64(&integer("18446744073709551616")).unwrap();
        assert!(overflow);

        let (_, overflow) = extract_uint64(&integer("16#1_0000_0000_0000_0000")).unwrap();
        assert!(overflow);
    }

    #[test]
    fn extract_real64_when_fraction_and_exponent_then_value() {
        assert_eq!(extract_real64(&real("3.5")).unwrap(), (3.5, false));
        assert_eq!(extract_real64(&real("1.0e3")).unwrap(), (1000.0, false));
        assert_eq!(extract_real64(&real("1_0.5")).unwrap(), (10.5, false));
    }

    #[test]
    fn extract_real64_when_beyond_range_then_overflow() {
        let (value, overflow) = extract_real64(&real("1.0e999")).unwrap();
        assert!(value.is_infinite());
        assert!(overflow);
    }
}
