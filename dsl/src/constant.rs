//! Provides the constant value annotations that semantic analysis attaches
//! to expression elements.
//!
//! A literal or an operation on literals can have multiple data types. For
//! example, `1 AND 0` may be a BOOL, BYTE, WORD or LWORD, and `1 + 2` may be
//! signed (e.g. INT) or unsigned (e.g. UINT). Data types are not resolved
//! when constant folding runs, so instead of a single folded value, every
//! expression element carries one candidate value per interpretation:
//!
//! * BOOL
//! * unsigned 64-bit integer
//! * signed 64-bit integer
//! * 64-bit IEEE 754 floating point
//!
//! An operation may overflow in one interpretation and not in another
//! (`9223372036854775807 + 1` overflows as a signed value but not as an
//! unsigned value), so each candidate records its own status.

/// A single folded candidate value for one interpretation of an expression.
///
/// The default is `Undefined`: the expression has no folded value in this
/// interpretation, either because it was never a candidate (a real literal
/// has no BOOL interpretation) or because an operand was not constant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ConstantValue<T> {
    /// No folded value for this interpretation.
    #[default]
    Undefined,
    /// The expression folds to this value.
    Const(T),
    /// The expression folds, but the result is outside the representable
    /// range of this interpretation (or is not finite, for floating point).
    Overflow,
}

impl<T: Copy> ConstantValue<T> {
    /// Creates a candidate from an extracted value and its overflow flag.
    pub fn from_extraction(value: T, overflow: bool) -> Self {
        if overflow {
            ConstantValue::Overflow
        } else {
            ConstantValue::Const(value)
        }
    }

    /// Returns the folded value, if there is one.
    pub fn value(&self) -> Option<T> {
        match self {
            ConstantValue::Const(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, ConstantValue::Const(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, ConstantValue::Overflow)
    }
}

impl ConstantValue<i64> {
    pub fn is_zero(&self) -> bool {
        matches!(self, ConstantValue::Const(0))
    }
}

impl ConstantValue<u64> {
    pub fn is_zero(&self) -> bool {
        matches!(self, ConstantValue::Const(0))
    }
}

impl ConstantValue<f64> {
    pub fn is_zero(&self) -> bool {
        matches!(self, ConstantValue::Const(value) if *value == 0.0)
    }
}

/// The set of candidate values for an expression, one per interpretation.
///
/// The candidates are independent: the status of one places no constraint
/// on any other. Analysis that runs after data types are resolved selects
/// the candidate matching the resolved type and reports overflow then —
/// an `Overflow` candidate here is an annotation, not an error.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantValues {
    pub bool_value: ConstantValue<bool>,
    pub int_value: ConstantValue<i64>,
    pub uint_value: ConstantValue<u64>,
    pub real_value: ConstantValue<f64>,
}

impl ConstantValues {
    /// Returns true when no interpretation has a folded value or overflow.
    pub fn is_undefined(&self) -> bool {
        *self == ConstantValues::default()
    }
}
