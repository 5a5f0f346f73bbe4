//! Combines constant value candidates through overflow-checked operations.
//!
//! Integer overflow is decided before the operation is performed, through
//! the checked operations of the built-in integer types (wrapping a signed
//! operation and inspecting the result would not be equivalent: the result
//! candidate must never hold a wrapped value). Floating point is the
//! exception: IEEE 754 arithmetic is total, so the operation is performed
//! and the result is tested for NaN or infinity afterwards.
use ferroplc_dsl::constant::ConstantValue;

/// Combines two candidates through a checked binary operation.
///
/// The result is a candidate only when both operands hold values; an
/// operand that is undefined or overflowed leaves the result undefined.
/// A checked operation that returns `None` marks the result as overflow.
pub(crate) fn combine<T, F>(l: &ConstantValue<T>, r: &ConstantValue<T>, op: F) -> ConstantValue<T>
where
    T: Copy,
    F: FnOnce(T, T) -> Option<T>,
{
    match (l.value(), r.value()) {
        (Some(a), Some(b)) => match op(a, b) {
            Some(result) => ConstantValue::Const(result),
            None => ConstantValue::Overflow,
        },
        _ => ConstantValue::Undefined,
    }
}

/// Combines two floating point candidates, testing the result afterwards.
pub(crate) fn combine_real<F>(
    l: &ConstantValue<f64>,
    r: &ConstantValue<f64>,
    op: F,
) -> ConstantValue<f64>
where
    F: FnOnce(f64, f64) -> f64,
{
    match (l.value(), r.value()) {
        (Some(a), Some(b)) => real_result(op(a, b)),
        _ => ConstantValue::Undefined,
    }
}

/// Transforms a candidate through a checked unary operation.
pub(crate) fn unary<T, F>(operand: &ConstantValue<T>, op: F) -> ConstantValue<T>
where
    T: Copy,
    F: FnOnce(T) -> Option<T>,
{
    match operand.value() {
        Some(a) => match op(a) {
            Some(result) => ConstantValue::Const(result),
            None => ConstantValue::Overflow,
        },
        None => ConstantValue::Undefined,
    }
}

/// Transforms a floating point candidate, testing the result afterwards.
pub(crate) fn unary_real<F>(operand: &ConstantValue<f64>, op: F) -> ConstantValue<f64>
where
    F: FnOnce(f64) -> f64,
{
    match operand.value() {
        Some(a) => real_result(op(a)),
        None => ConstantValue::Undefined,
    }
}

/// Compares two candidates. A comparison never overflows.
pub(crate) fn compare<T, F>(
    l: &ConstantValue<T>,
    r: &ConstantValue<T>,
    op: F,
) -> ConstantValue<bool>
where
    T: Copy,
    F: FnOnce(T, T) -> bool,
{
    match (l.value(), r.value()) {
        (Some(a), Some(b)) => ConstantValue::Const(op(a, b)),
        _ => ConstantValue::Undefined,
    }
}

/// Classifies an IEEE 754 result as a candidate.
///
/// Section 2.5.1.5.2 of the standard makes a result outside the range of
/// the output data type an error, so positive and negative infinity are
/// overflow, as is NaN.
pub(crate) fn real_result(value: f64) -> ConstantValue<f64> {
    if real_overflows(value) {
        ConstantValue::Overflow
    } else {
        ConstantValue::Const(value)
    }
}

pub(crate) fn real_overflows(value: f64) -> bool {
    value.is_nan() || value.is_infinite()
}

/// Reports whether the host floating point type implements IEC 60559.
///
/// This is the `numeric_limits::is_iec559` test expressed with the
/// constants the host type exposes: radix 2, 53 mantissa digits and the
/// binary64 exponent range.
pub(crate) fn host_real_is_iec559() -> bool {
    f64::RADIX == 2 && f64::MANTISSA_DIGITS == 53 && f64::MAX_EXP == 1024 && f64::MIN_EXP == -1021
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const UNDEFINED: ConstantValue<i64> = ConstantValue::Undefined;

    #[test]
    fn combine_when_operand_undefined_then_undefined() {
        let result = combine(&UNDEFINED, &ConstantValue::Const(1), i64::checked_add);
        assert_eq!(result, ConstantValue::Undefined);
    }

    #[test]
    fn combine_when_operand_overflow_then_undefined() {
        // Overflow does not propagate from operand to result; the result
        // is simply not a candidate.
        let result = combine(
            &ConstantValue::Overflow,
            &ConstantValue::Const(1),
            i64::checked_add,
        );
        assert_eq!(result, ConstantValue::Undefined);
    }

    #[test]
    fn combine_when_division_overflows_then_overflow() {
        let result = combine(
            &ConstantValue::Const(i64::MIN),
            &ConstantValue::Const(-1),
            i64::checked_div,
        );
        assert_eq!(result, ConstantValue::Overflow);
    }

    #[test]
    fn unary_when_negating_minimum_then_overflow() {
        let result = unary(&ConstantValue::Const(i64::MIN), i64::checked_neg);
        assert_eq!(result, ConstantValue::Overflow);
    }

    #[test]
    fn combine_real_when_finite_then_const() {
        let result = combine_real(
            &ConstantValue::Const(22.2),
            &ConstantValue::Const(5.0),
            |a, b| a - b,
        );
        assert_eq!(result.value(), Some(17.2));
    }

    #[test]
    fn combine_real_when_result_infinite_then_overflow() {
        let result = combine_real(
            &ConstantValue::Const(f64::MAX),
            &ConstantValue::Const(f64::MAX),
            |a, b| a + b,
        );
        assert_eq!(result, ConstantValue::Overflow);
    }

    #[test]
    fn combine_real_when_result_nan_then_overflow() {
        let result = combine_real(
            &ConstantValue::Const(0.0),
            &ConstantValue::Const(0.0),
            |a, b| a / b,
        );
        assert_eq!(result, ConstantValue::Overflow);
    }

    #[test]
    fn compare_when_both_const_then_const() {
        let result = compare(
            &ConstantValue::Const(1i64),
            &ConstantValue::Const(2i64),
            |a, b| a < b,
        );
        assert_eq!(result.value(), Some(true));
    }

    #[test]
    fn host_real_when_this_platform_then_iec559() {
        assert!(host_real_is_iec559());
    }

    fn in_range(value: i128) -> bool {
        value >= i64::MIN as i128 && value <= i64::MAX as i128
    }

    fn in_range_unsigned(value: u128) -> bool {
        value <= u64::MAX as u128
    }

    proptest! {
        // The checked operations flag overflow exactly when the result
        // computed in a wider type escapes the 64-bit range: overflow is
        // never spurious and never missed.

        #[test]
        fn int64_sum_matches_wide_arithmetic(a in any::<i64>(), b in any::<i64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), i64::checked_add);
            let wide = a as i128 + b as i128;
            if in_range(wide) {
                prop_assert_eq!(result.value(), Some(wide as i64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn int64_sub_matches_wide_arithmetic(a in any::<i64>(), b in any::<i64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), i64::checked_sub);
            let wide = a as i128 - b as i128;
            if in_range(wide) {
                prop_assert_eq!(result.value(), Some(wide as i64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn int64_mul_matches_wide_arithmetic(a in any::<i64>(), b in any::<i64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), i64::checked_mul);
            let wide = a as i128 * b as i128;
            if in_range(wide) {
                prop_assert_eq!(result.value(), Some(wide as i64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn int64_neg_matches_wide_arithmetic(a in any::<i64>()) {
            let result = unary(&ConstantValue::Const(a), i64::checked_neg);
            let wide = -(a as i128);
            if in_range(wide) {
                prop_assert_eq!(result.value(), Some(wide as i64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn uint64_sum_matches_wide_arithmetic(a in any::<u64>(), b in any::<u64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), u64::checked_add);
            let wide = a as u128 + b as u128;
            if in_range_unsigned(wide) {
                prop_assert_eq!(result.value(), Some(wide as u64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn uint64_sub_overflows_only_when_subtrahend_larger(a in any::<u64>(), b in any::<u64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), u64::checked_sub);
            if b > a {
                prop_assert!(result.is_overflow());
            } else {
                prop_assert_eq!(result.value(), Some(a - b));
            }
        }

        #[test]
        fn uint64_mul_matches_wide_arithmetic(a in any::<u64>(), b in any::<u64>()) {
            // The widest product is (2^64 - 1)^2, which fits in u128.
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), u64::checked_mul);
            let wide = a as u128 * b as u128;
            if in_range_unsigned(wide) {
                prop_assert_eq!(result.value(), Some(wide as u64));
            } else {
                prop_assert!(result.is_overflow());
            }
        }

        #[test]
        fn uint64_div_overflows_only_for_zero_divisor(a in any::<u64>(), b in any::<u64>()) {
            let result = combine(&ConstantValue::Const(a), &ConstantValue::Const(b), u64::checked_div);
            if b == 0 {
                prop_assert!(result.is_overflow());
            } else {
                prop_assert_eq!(result.value(), Some(a / b));
            }
        }
    }
}
