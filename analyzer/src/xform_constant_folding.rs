//! Transformation that determines the value of all expressions in which
//! only constant values (i.e. literals) are used, and annotates each
//! expression element with the result.
//!
//! For example:
//!
//! * `2 + 3` stores the constant value `5` on the addition.
//! * `22.2 - 5.0` stores the constant value `17.2` on the subtraction.
//!
//! A constant expression may have multiple data types (`1 + 2` may be
//! signed or unsigned and `1 AND 0` may be BOOL or a bit string), and data
//! types are not resolved when this transformation runs. Every candidate
//! interpretation is therefore computed and stored independently; see
//! `ferroplc_dsl::constant` for the candidate representation.
//!
//! This transformation does not report overflow. Some interpretations of
//! an expression can overflow while others do not, and only the later
//! data type checking stage knows which interpretation the program means,
//! so that stage reads the annotations and reports. Integer overflow is
//! decided without performing the operation on the host (see
//! `checked_arithmetic`); floating point overflow is decided by testing
//! the IEEE 754 result, which requires the host floating point type to
//! implement IEC 60559 - checked once when the transformation is created.
use ferroplc_dsl::common::*;
use ferroplc_dsl::constant::{ConstantValue, ConstantValues};
use ferroplc_dsl::diagnostic::Diagnostic;
use ferroplc_dsl::fold::Fold;
use ferroplc_dsl::textual::*;
use ferroplc_problems::Problem;
use log::{debug, warn};

use crate::checked_arithmetic::{
    combine, combine_real, compare, host_real_is_iec559, real_result, unary, unary_real,
};
use crate::literal_extractor;

/// Annotates every expression in the library with its constant value
/// candidates.
///
/// The library shape is unchanged: only the annotations on expression
/// elements are (re)computed. Overflow is an annotation, not an error;
/// the transformation fails only when a literal token cannot be read at
/// all, which indicates a defect in the stage that built the library.
pub fn apply(lib: Library) -> Result<Library, Vec<Diagnostic>> {
    let mut folder = ConstantFolder::new();
    let result = folder.fold_library(lib).map_err(|e| vec![e]);
    debug!(
        "Constant folding finished with {} internal errors",
        folder.error_count()
    );
    result
}

/// Folds one comparison operator across every interpretation that both
/// operands hold. The result of a comparison is always a BOOL candidate.
/// BOOL operands compare with the standard's FALSE < TRUE ordering.
macro_rules! fold_comparison {
    ($l:expr, $r:expr, $op:tt) => {{
        let mut result = ConstantValue::Undefined;
        let candidates = [
            compare(&$l.bool_value, &$r.bool_value, |a, b| a $op b),
            compare(&$l.uint_value, &$r.uint_value, |a, b| a $op b),
            compare(&$l.int_value, &$r.int_value, |a, b| a $op b),
            compare(&$l.real_value, &$r.real_value, |a, b| a $op b),
        ];
        for candidate in candidates {
            if candidate.is_const() {
                result = candidate;
            }
        }
        result
    }};
}

struct ConstantFolder {
    error_count: usize,
    warning_found: bool,
}

impl ConstantFolder {
    fn new() -> Self {
        let mut warning_found = false;
        if !host_real_is_iec559() {
            warn!("{}", Problem::PlatformRealNotIec559.message());
            warning_found = true;
        }
        ConstantFolder {
            error_count: 0,
            warning_found,
        }
    }

    fn error_count(&self) -> usize {
        self.error_count
    }

    #[cfg(test)]
    fn warning_found(&self) -> bool {
        self.warning_found
    }

    fn fatal(&mut self, diagnostic: Diagnostic) -> Diagnostic {
        self.error_count += 1;
        diagnostic
    }
}

/// Computes the signed and unsigned candidates of an integer literal.
///
/// The lexeme holds the magnitude; a sign in the source is part of the
/// literal, not a negation expression.
fn integer_candidates(
    literal: &SignedInteger,
) -> Result<(ConstantValue<i64>, ConstantValue<u64>), Diagnostic> {
    let (int, int_overflow) = literal_extractor::extract_int64(&literal.value)?;
    let (uint, uint_overflow) = literal_extractor::extract_uint64(&literal.value)?;

    if !literal.is_neg {
        return Ok((
            ConstantValue::from_extraction(int, int_overflow),
            ConstantValue::from_extraction(uint, uint_overflow),
        ));
    }

    // The magnitude of the most negative signed value does not fit in the
    // signed extraction, but does fit in the unsigned one. This is the
    // only way to write the most negative value as a literal.
    let int_value = if !int_overflow {
        ConstantValue::Const(-int)
    } else if !uint_overflow && uint == i64::MIN.unsigned_abs() {
        ConstantValue::Const(i64::MIN)
    } else {
        ConstantValue::Overflow
    };
    // A negative value has no unsigned interpretation (other than zero).
    let uint_value = if !uint_overflow && uint == 0 {
        ConstantValue::Const(0)
    } else {
        ConstantValue::Overflow
    };
    Ok((int_value, uint_value))
}

impl Fold<Diagnostic> for ConstantFolder {
    // B 1.2.1 - numeric literals seed the candidates that every other
    // expression element combines.
    fn fold_constant_kind(&mut self, node: ConstantKind) -> Result<ConstantKind, Diagnostic> {
        match node {
            ConstantKind::IntegerLiteral(node) => {
                let (int_value, uint_value) =
                    integer_candidates(&node.value).map_err(|e| self.fatal(e))?;
                Ok(ConstantKind::IntegerLiteral(IntegerLiteral {
                    const_value: ConstantValues {
                        int_value,
                        uint_value,
                        ..Default::default()
                    },
                    ..node
                }))
            }
            ConstantKind::RealLiteral(node) => {
                let (value, overflow) =
                    literal_extractor::extract_real64(&node.value).map_err(|e| self.fatal(e))?;
                Ok(ConstantKind::RealLiteral(RealLiteral {
                    const_value: ConstantValues {
                        real_value: ConstantValue::from_extraction(value, overflow),
                        ..Default::default()
                    },
                    ..node
                }))
            }
            ConstantKind::Boolean(node) => {
                let value = matches!(node.value, Boolean::True);
                Ok(ConstantKind::Boolean(BooleanLiteral {
                    const_value: ConstantValues {
                        bool_value: ConstantValue::Const(value),
                        ..Default::default()
                    },
                    ..node
                }))
            }
            // Bit string literals receive no candidates; they are bound
            // to a value during data type resolution.
            ConstantKind::BitStringLiteral(node) => Ok(ConstantKind::BitStringLiteral(node)),
            ConstantKind::CharacterString(node) => Ok(ConstantKind::CharacterString(node)),
        }
    }

    // B 3.1 - expressions. Operands fold first, left before right, and
    // the element combines the candidates its operands hold.
    fn fold_compare_expr(&mut self, node: CompareExpr) -> Result<CompareExpr, Diagnostic> {
        let left = self.fold_expr_kind(node.left)?;
        let right = self.fold_expr_kind(node.right)?;
        let l = left.const_value();
        let r = right.const_value();

        let mut value = ConstantValues::default();
        match node.op {
            CompareOp::Or => {
                value.bool_value = combine(&l.bool_value, &r.bool_value, |a, b| Some(a || b));
                value.uint_value = combine(&l.uint_value, &r.uint_value, |a, b| Some(a | b));
            }
            CompareOp::Xor => {
                value.bool_value = combine(&l.bool_value, &r.bool_value, |a, b| Some(a ^ b));
                value.uint_value = combine(&l.uint_value, &r.uint_value, |a, b| Some(a ^ b));
            }
            CompareOp::And => {
                value.bool_value = combine(&l.bool_value, &r.bool_value, |a, b| Some(a && b));
                value.uint_value = combine(&l.uint_value, &r.uint_value, |a, b| Some(a & b));
            }
            CompareOp::Eq => value.bool_value = fold_comparison!(l, r, ==),
            CompareOp::Ne => value.bool_value = fold_comparison!(l, r, !=),
            CompareOp::Lt => value.bool_value = fold_comparison!(l, r, <),
            CompareOp::Gt => value.bool_value = fold_comparison!(l, r, >),
            CompareOp::LtEq => value.bool_value = fold_comparison!(l, r, <=),
            CompareOp::GtEq => value.bool_value = fold_comparison!(l, r, >=),
        }

        Ok(CompareExpr {
            op: node.op,
            left,
            right,
            const_value: value,
        })
    }

    fn fold_binary_expr(&mut self, node: BinaryExpr) -> Result<BinaryExpr, Diagnostic> {
        let left = self.fold_expr_kind(node.left)?;
        let right = self.fold_expr_kind(node.right)?;
        let l = left.const_value();
        let r = right.const_value();

        let mut value = ConstantValues::default();
        match node.op {
            Operator::Add => {
                value.uint_value = combine(&l.uint_value, &r.uint_value, u64::checked_add);
                value.int_value = combine(&l.int_value, &r.int_value, i64::checked_add);
                value.real_value = combine_real(&l.real_value, &r.real_value, |a, b| a + b);
            }
            Operator::Sub => {
                value.uint_value = combine(&l.uint_value, &r.uint_value, u64::checked_sub);
                value.int_value = combine(&l.int_value, &r.int_value, i64::checked_sub);
                value.real_value = combine_real(&l.real_value, &r.real_value, |a, b| a - b);
            }
            Operator::Mul => {
                value.uint_value = combine(&l.uint_value, &r.uint_value, u64::checked_mul);
                value.int_value = combine(&l.int_value, &r.int_value, i64::checked_mul);
                value.real_value = combine_real(&l.real_value, &r.real_value, |a, b| a * b);
            }
            Operator::Div => {
                // Division by a constant zero is an overflow annotation in
                // that interpretation, whatever the left operand holds.
                value.uint_value = if r.uint_value.is_zero() {
                    ConstantValue::Overflow
                } else {
                    combine(&l.uint_value, &r.uint_value, u64::checked_div)
                };
                value.int_value = if r.int_value.is_zero() {
                    ConstantValue::Overflow
                } else {
                    combine(&l.int_value, &r.int_value, i64::checked_div)
                };
                value.real_value = if r.real_value.is_zero() {
                    ConstantValue::Overflow
                } else {
                    combine_real(&l.real_value, &r.real_value, |a, b| a / b)
                };
            }
            Operator::Mod => {
                // IN1 MOD IN2 is defined as
                //   IF (IN2 = 0) THEN OUT:=0;
                //   ELSE OUT:=IN1 - (IN1/IN2)*IN2; END_IF
                // so a zero right operand yields zero rather than an
                // error. The expansion contains IN1/IN2, which overflows
                // for the most negative value MOD -1 even though the
                // mathematical result is zero.
                value.uint_value = if r.uint_value.is_zero() {
                    ConstantValue::Const(0)
                } else {
                    combine(&l.uint_value, &r.uint_value, u64::checked_rem)
                };
                value.int_value = if r.int_value.is_zero() {
                    ConstantValue::Const(0)
                } else {
                    combine(&l.int_value, &r.int_value, i64::checked_rem)
                };
            }
            Operator::Pow => {
                // The base folds as a real; the exponent folds as an
                // integer of either signedness. When the exponent holds
                // both integer candidates they agree, so the second
                // assignment computes the same value.
                if let (Some(base), Some(exp)) = (l.real_value.value(), r.int_value.value()) {
                    value.real_value = real_result(base.powf(exp as f64));
                }
                if let (Some(base), Some(exp)) = (l.real_value.value(), r.uint_value.value()) {
                    value.real_value = real_result(base.powf(exp as f64));
                }
            }
        }

        Ok(BinaryExpr {
            op: node.op,
            left,
            right,
            const_value: value,
        })
    }

    fn fold_unary_expr(&mut self, node: UnaryExpr) -> Result<UnaryExpr, Diagnostic> {
        let term = self.fold_expr_kind(node.term)?;
        let operand = term.const_value();

        let mut value = ConstantValues::default();
        match node.op {
            UnaryOp::Neg => {
                value.int_value = unary(&operand.int_value, i64::checked_neg);
                value.real_value = unary_real(&operand.real_value, |a| -a);
            }
            UnaryOp::Not => {
                value.bool_value = unary(&operand.bool_value, |a| Some(!a));
                value.uint_value = unary(&operand.uint_value, |a| Some(!a));
            }
        }

        Ok(UnaryExpr {
            op: node.op,
            term,
            const_value: value,
        })
    }
}
