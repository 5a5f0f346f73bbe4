//! The analysis as individual stages (to enable testing).

use ferroplc_dsl::{
    common::Library,
    core::{FileId, SourceSpan},
    diagnostic::{Diagnostic, Label},
};
use ferroplc_problems::Problem;
use log::debug;

use crate::xform_constant_folding;

/// Analyze runs semantic analysis on the set of files as a self-contained
/// and complete unit.
///
/// Returns the annotated library when analysis succeeds. Overflowing
/// constant expressions are not errors at this stage: they are recorded as
/// annotations on the library for later stages that know the data types.
///
/// Returns `Err` when no sources are provided or when a source contains an
/// element the analysis cannot read.
pub fn analyze(sources: &[&Library]) -> Result<Library, Vec<Diagnostic>> {
    if sources.is_empty() {
        let span = SourceSpan::range(0, 0).with_file_id(&FileId::default());
        return Err(vec![Diagnostic::problem(
            Problem::NoContent,
            Label::span(span, "First location"),
        )]);
    }

    // We want to analyze this as a complete set, so we need to join the
    // items together into a single library. Extend owns the item so after
    // this we are free to modify.
    let mut library = Library::new();
    for x in sources {
        library = library.extend((*x).clone());
    }

    debug!(
        "Constant folding {} library elements",
        library.elements.len()
    );
    xform_constant_folding::apply(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use ferroplc_dsl::textual::{ExprKind, Operator};

    #[test]
    fn analyze_when_no_sources_then_error() {
        init_logging();
        let result = analyze(&[]);

        let diagnostics = result.unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Problem::NoContent.code());
    }

    #[test]
    fn analyze_when_single_source_then_annotated() {
        init_logging();
        let library = library_with_expression(ExprKind::binary(
            Operator::Add,
            ExprKind::integer_literal("40"),
            ExprKind::integer_literal("2"),
        ));

        let result = analyze(&[&library]).unwrap();

        let value = expression_in(&result).const_value();
        assert_eq!(value.int_value.value(), Some(42));
    }

    #[test]
    fn analyze_when_split_across_multiple_sources_then_joined() {
        init_logging();
        let first = library_with_expression(ExprKind::integer_literal("1"));
        let second = library_with_expression(ExprKind::integer_literal("2"));

        let result = analyze(&[&first, &second]).unwrap();

        assert_eq!(result.elements.len(), 2);
    }
}
