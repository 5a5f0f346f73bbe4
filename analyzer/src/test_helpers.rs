//! Helpers for constructing libraries in tests.
//!
//! There is no parser in this crate, so tests build the library elements
//! directly with the DSL builder functions.
use ferroplc_dsl::common::*;
use ferroplc_dsl::core::Id;
use ferroplc_dsl::textual::*;

/// Initializes logging so that test runs show stage progress.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a library with a single program whose body assigns the
/// expression to a variable.
pub(crate) fn library_with_expression(expr: ExprKind) -> Library {
    Library {
        elements: vec![LibraryElementKind::ProgramDeclaration(ProgramDeclaration {
            name: Id::from("plc_prg"),
            variables: vec![VarDecl::simple("Out", "LREAL")],
            body: vec![StmtKind::assignment(Variable::named("Out"), expr)],
        })],
    }
}

/// Returns the expression placed by `library_with_expression`.
pub(crate) fn expression_in(library: &Library) -> &ExprKind {
    match &library.elements[0] {
        LibraryElementKind::ProgramDeclaration(program) => match &program.body[0] {
            StmtKind::Assignment(assignment) => &assignment.value,
            _ => panic!("Library does not have the expected shape"),
        },
        _ => panic!("Library does not have the expected shape"),
    }
}

/// Returns the expression placed by `library_with_expression`, mutably.
pub(crate) fn expression_in_mut(library: &mut Library) -> &mut ExprKind {
    match &mut library.elements[0] {
        LibraryElementKind::ProgramDeclaration(program) => match &mut program.body[0] {
            StmtKind::Assignment(assignment) => &mut assignment.value,
            _ => panic!("Library does not have the expected shape"),
        },
        _ => panic!("Library does not have the expected shape"),
    }
}
