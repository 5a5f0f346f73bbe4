//! A set of traits and functions for folding all nodes in a library.
//!
//! Folding the library returns a new instance with changes to the
//! library defined based on the fold_* functions. The default behavior
//! returns a copy of the input.
//!
//! To fold a library, define a struct and implement the Fold trait
//! for the struct. Then implement fold_* functions from the trait to
//! customize the behavior.
//!
//! Children are always folded before (and left to right of) the item
//! that contains them, so an implementation that overrides a fold_*
//! function observes its children already folded.
use crate::common::*;
use crate::textual::*;
use paste::paste;

/// Defines a macro for the Fold trait that dispatches folding
/// to a function. In other words, creates a function of the form:
///
/// ```ignore
/// fn fold_type_name(&mut self, node: TypeName) -> Result<TypeName, E> {
///    fold_type_name(self, node)
/// }
/// ```
macro_rules! dispatch {
    ($struct_name:ident) => {
        paste! {
            fn [<fold_ $struct_name:snake >](&mut self, node: $struct_name) -> Result<$struct_name, E> {
                [< fold_ $struct_name:snake >](self, node)
            }
        }
    };
}

/// Defines a macro for the Fold trait that returns the input unchanged.
macro_rules! leaf {
    ($struct_name:ident) => {
        paste! {
            fn [<fold_ $struct_name:snake >](&mut self, node: $struct_name) -> Result<$struct_name, E> {
                Ok(node)
            }
        }
    };
}

/// Defines an object as being able to be folded. That is, return a new
/// folded version of itself.
pub trait Folder {
    type Mapped;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E>;
}

impl<X> Folder for Vec<X>
where
    X: Folder,
{
    type Mapped = Vec<X::Mapped>;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        self.into_iter().map(|x| x.fold(folder)).collect()
    }
}

impl<X> Folder for Option<X>
where
    X: Folder,
{
    type Mapped = Option<X::Mapped>;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        self.map(|x| x.fold(folder)).transpose()
    }
}

pub trait Fold<E> {
    fn fold_library(&mut self, node: Library) -> Result<Library, E> {
        Ok(Library {
            elements: Folder::fold(node.elements, self)?,
        })
    }

    dispatch!(LibraryElementKind);

    // 2.5.1
    dispatch!(FunctionDeclaration);

    // 2.5.2
    dispatch!(FunctionBlockDeclaration);

    // 2.5.3
    dispatch!(ProgramDeclaration);

    // 2.4.3
    dispatch!(VarDecl);

    // 2.4.3.2
    dispatch!(InitialValueAssignmentKind);

    // 2.4.3.2
    dispatch!(SimpleInitializer);

    // 2.2.1 - literals hold no sub-expressions, so the default keeps
    // them unchanged.
    leaf!(ConstantKind);

    dispatch!(StmtKind);

    // 3.3.2.1
    dispatch!(Assignment);

    // 3.2.3
    dispatch!(FbCall);

    // 3.3.2.3
    dispatch!(If);

    // 3.3.2.3
    dispatch!(ElseIf);

    // 3.3.2.3
    dispatch!(Case);

    // 3.3.2.3
    dispatch!(CaseStatementGroup);

    // 3.3.2.3
    leaf!(CaseSelectionKind);

    dispatch!(For);

    dispatch!(While);

    dispatch!(Repeat);

    dispatch!(ExprKind);

    // 3.3.1
    dispatch!(CompareExpr);

    // 3.3.1
    dispatch!(BinaryExpr);

    // 3.3.1
    dispatch!(UnaryExpr);

    dispatch!(Function);

    dispatch!(Variable);

    dispatch!(ParamAssignmentKind);
}

fn fold_library_element_kind<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: LibraryElementKind,
) -> Result<LibraryElementKind, E> {
    match node {
        LibraryElementKind::FunctionDeclaration(node) => Ok(
            LibraryElementKind::FunctionDeclaration(f.fold_function_declaration(node)?),
        ),
        LibraryElementKind::FunctionBlockDeclaration(node) => Ok(
            LibraryElementKind::FunctionBlockDeclaration(f.fold_function_block_declaration(node)?),
        ),
        LibraryElementKind::ProgramDeclaration(node) => Ok(
            LibraryElementKind::ProgramDeclaration(f.fold_program_declaration(node)?),
        ),
    }
}

fn fold_function_declaration<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: FunctionDeclaration,
) -> Result<FunctionDeclaration, E> {
    Ok(FunctionDeclaration {
        name: node.name,
        return_type: node.return_type,
        variables: Folder::fold(node.variables, f)?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_function_block_declaration<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: FunctionBlockDeclaration,
) -> Result<FunctionBlockDeclaration, E> {
    Ok(FunctionBlockDeclaration {
        name: node.name,
        variables: Folder::fold(node.variables, f)?,
        body: Folder::fold(node.body, f)?,
        span: node.span,
    })
}

fn fold_program_declaration<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: ProgramDeclaration,
) -> Result<ProgramDeclaration, E> {
    Ok(ProgramDeclaration {
        name: node.name,
        variables: Folder::fold(node.variables, f)?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_var_decl<F: Fold<E> + ?Sized, E>(f: &mut F, node: VarDecl) -> Result<VarDecl, E> {
    Ok(VarDecl {
        identifier: node.identifier,
        var_type: node.var_type,
        qualifier: node.qualifier,
        initializer: f.fold_initial_value_assignment_kind(node.initializer)?,
    })
}

fn fold_initial_value_assignment_kind<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: InitialValueAssignmentKind,
) -> Result<InitialValueAssignmentKind, E> {
    match node {
        InitialValueAssignmentKind::None(span) => Ok(InitialValueAssignmentKind::None(span)),
        InitialValueAssignmentKind::Simple(node) => Ok(InitialValueAssignmentKind::Simple(
            f.fold_simple_initializer(node)?,
        )),
    }
}

fn fold_simple_initializer<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: SimpleInitializer,
) -> Result<SimpleInitializer, E> {
    Ok(SimpleInitializer {
        type_name: node.type_name,
        initial_value: Folder::fold(node.initial_value, f)?,
    })
}

fn fold_stmt_kind<F: Fold<E> + ?Sized, E>(f: &mut F, node: StmtKind) -> Result<StmtKind, E> {
    match node {
        StmtKind::Assignment(node) => Ok(StmtKind::Assignment(f.fold_assignment(node)?)),
        StmtKind::FbCall(node) => Ok(StmtKind::FbCall(f.fold_fb_call(node)?)),
        StmtKind::If(node) => Ok(StmtKind::If(f.fold_if(node)?)),
        StmtKind::Case(node) => Ok(StmtKind::Case(f.fold_case(node)?)),
        StmtKind::For(node) => Ok(StmtKind::For(f.fold_for(node)?)),
        StmtKind::While(node) => Ok(StmtKind::While(f.fold_while(node)?)),
        StmtKind::Repeat(node) => Ok(StmtKind::Repeat(f.fold_repeat(node)?)),
        StmtKind::Return => Ok(StmtKind::Return),
        StmtKind::Exit => Ok(StmtKind::Exit),
    }
}

fn fold_assignment<F: Fold<E> + ?Sized, E>(f: &mut F, node: Assignment) -> Result<Assignment, E> {
    Ok(Assignment {
        target: f.fold_variable(node.target)?,
        value: f.fold_expr_kind(node.value)?,
    })
}

fn fold_fb_call<F: Fold<E> + ?Sized, E>(f: &mut F, node: FbCall) -> Result<FbCall, E> {
    Ok(FbCall {
        var_name: node.var_name,
        params: Folder::fold(node.params, f)?,
        position: node.position,
    })
}

fn fold_if<F: Fold<E> + ?Sized, E>(f: &mut F, node: If) -> Result<If, E> {
    Ok(If {
        expr: f.fold_expr_kind(node.expr)?,
        body: Folder::fold(node.body, f)?,
        else_ifs: Folder::fold(node.else_ifs, f)?,
        else_body: Folder::fold(node.else_body, f)?,
    })
}

fn fold_else_if<F: Fold<E> + ?Sized, E>(f: &mut F, node: ElseIf) -> Result<ElseIf, E> {
    Ok(ElseIf {
        expr: f.fold_expr_kind(node.expr)?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_case<F: Fold<E> + ?Sized, E>(f: &mut F, node: Case) -> Result<Case, E> {
    Ok(Case {
        selector: f.fold_expr_kind(node.selector)?,
        statement_groups: Folder::fold(node.statement_groups, f)?,
        else_body: Folder::fold(node.else_body, f)?,
    })
}

fn fold_case_statement_group<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: CaseStatementGroup,
) -> Result<CaseStatementGroup, E> {
    Ok(CaseStatementGroup {
        selectors: Folder::fold(node.selectors, f)?,
        statements: Folder::fold(node.statements, f)?,
    })
}

fn fold_for<F: Fold<E> + ?Sized, E>(f: &mut F, node: For) -> Result<For, E> {
    Ok(For {
        control: node.control,
        from: f.fold_expr_kind(node.from)?,
        to: f.fold_expr_kind(node.to)?,
        step: node.step.map(|step| f.fold_expr_kind(step)).transpose()?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_while<F: Fold<E> + ?Sized, E>(f: &mut F, node: While) -> Result<While, E> {
    Ok(While {
        condition: f.fold_expr_kind(node.condition)?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_repeat<F: Fold<E> + ?Sized, E>(f: &mut F, node: Repeat) -> Result<Repeat, E> {
    Ok(Repeat {
        until: f.fold_expr_kind(node.until)?,
        body: Folder::fold(node.body, f)?,
    })
}

fn fold_expr_kind<F: Fold<E> + ?Sized, E>(f: &mut F, node: ExprKind) -> Result<ExprKind, E> {
    match node {
        ExprKind::Compare(node) => Ok(ExprKind::Compare(Box::new(f.fold_compare_expr(*node)?))),
        ExprKind::BinaryOp(node) => Ok(ExprKind::BinaryOp(Box::new(f.fold_binary_expr(*node)?))),
        ExprKind::UnaryOp(node) => Ok(ExprKind::UnaryOp(Box::new(f.fold_unary_expr(*node)?))),
        ExprKind::Expression(node) => Ok(ExprKind::Expression(Box::new(f.fold_expr_kind(*node)?))),
        ExprKind::Const(node) => Ok(ExprKind::Const(f.fold_constant_kind(node)?)),
        ExprKind::Variable(node) => Ok(ExprKind::Variable(f.fold_variable(node)?)),
        ExprKind::Function(node) => Ok(ExprKind::Function(f.fold_function(node)?)),
    }
}

fn fold_compare_expr<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: CompareExpr,
) -> Result<CompareExpr, E> {
    Ok(CompareExpr {
        op: node.op,
        left: f.fold_expr_kind(node.left)?,
        right: f.fold_expr_kind(node.right)?,
        const_value: node.const_value,
    })
}

fn fold_binary_expr<F: Fold<E> + ?Sized, E>(f: &mut F, node: BinaryExpr) -> Result<BinaryExpr, E> {
    Ok(BinaryExpr {
        op: node.op,
        left: f.fold_expr_kind(node.left)?,
        right: f.fold_expr_kind(node.right)?,
        const_value: node.const_value,
    })
}

fn fold_unary_expr<F: Fold<E> + ?Sized, E>(f: &mut F, node: UnaryExpr) -> Result<UnaryExpr, E> {
    Ok(UnaryExpr {
        op: node.op,
        term: f.fold_expr_kind(node.term)?,
        const_value: node.const_value,
    })
}

fn fold_function<F: Fold<E> + ?Sized, E>(f: &mut F, node: Function) -> Result<Function, E> {
    Ok(Function {
        name: node.name,
        param_assignment: Folder::fold(node.param_assignment, f)?,
    })
}

fn fold_variable<F: Fold<E> + ?Sized, E>(f: &mut F, node: Variable) -> Result<Variable, E> {
    match node {
        Variable::Named(node) => Ok(Variable::Named(node)),
        Variable::Array(node) => Ok(Variable::Array(ArrayVariable {
            subscripted_variable: Box::new(f.fold_variable(*node.subscripted_variable)?),
            subscripts: Folder::fold(node.subscripts, f)?,
        })),
        Variable::Structured(node) => Ok(Variable::Structured(StructuredVariable {
            record: Box::new(f.fold_variable(*node.record)?),
            field: node.field,
        })),
    }
}

fn fold_param_assignment_kind<F: Fold<E> + ?Sized, E>(
    f: &mut F,
    node: ParamAssignmentKind,
) -> Result<ParamAssignmentKind, E> {
    match node {
        ParamAssignmentKind::PositionalInput(node) => Ok(ParamAssignmentKind::PositionalInput(
            PositionalInput {
                expr: f.fold_expr_kind(node.expr)?,
            },
        )),
        ParamAssignmentKind::NamedInput(node) => Ok(ParamAssignmentKind::NamedInput(NamedInput {
            name: node.name,
            expr: f.fold_expr_kind(node.expr)?,
        })),
        ParamAssignmentKind::Output(node) => Ok(ParamAssignmentKind::Output(Output {
            not: node.not,
            src: node.src,
            tgt: f.fold_variable(node.tgt)?,
        })),
    }
}

impl Folder for LibraryElementKind {
    type Mapped = LibraryElementKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_library_element_kind(self)
    }
}

impl Folder for VarDecl {
    type Mapped = VarDecl;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_var_decl(self)
    }
}

impl Folder for ConstantKind {
    type Mapped = ConstantKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_constant_kind(self)
    }
}

impl Folder for StmtKind {
    type Mapped = StmtKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_stmt_kind(self)
    }
}

impl Folder for ExprKind {
    type Mapped = ExprKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_expr_kind(self)
    }
}

impl Folder for ElseIf {
    type Mapped = ElseIf;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_else_if(self)
    }
}

impl Folder for CaseStatementGroup {
    type Mapped = CaseStatementGroup;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_case_statement_group(self)
    }
}

impl Folder for CaseSelectionKind {
    type Mapped = CaseSelectionKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_case_selection_kind(self)
    }
}

impl Folder for ParamAssignmentKind {
    type Mapped = ParamAssignmentKind;
    fn fold<F: Fold<E> + ?Sized, E>(self, folder: &mut F) -> Result<Self::Mapped, E> {
        folder.fold_param_assignment_kind(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Id;

    struct Identity {}
    impl Fold<()> for Identity {
        // No overrides: the fold returns an unchanged copy.
    }

    #[test]
    fn fold_when_no_overrides_then_returns_input() {
        let library = Library {
            elements: vec![LibraryElementKind::ProgramDeclaration(ProgramDeclaration {
                name: Id::from("plc_prg"),
                variables: vec![VarDecl::simple("Cnt", "INT")],
                body: vec![StmtKind::if_then(
                    ExprKind::compare(
                        CompareOp::Eq,
                        ExprKind::named_variable("Cnt"),
                        ExprKind::integer_literal("10"),
                    ),
                    vec![StmtKind::assignment(
                        Variable::named("Cnt"),
                        ExprKind::integer_literal("0"),
                    )],
                )],
            })],
        };

        let mut folder = Identity {};
        let result = folder.fold_library(library.clone()).unwrap();

        assert_eq!(library, result);
    }
}
