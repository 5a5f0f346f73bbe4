// Allow large errors because this is a compiler - we expect large errors.
#![allow(clippy::result_large_err)]

extern crate ferroplc_dsl;

mod checked_arithmetic;
mod literal_extractor;
pub mod stages;
pub mod xform_constant_folding;

#[cfg(test)]
mod test_helpers;
