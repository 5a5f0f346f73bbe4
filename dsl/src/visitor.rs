//! A set of traits and functions for visiting all nodes in a library.
//!
//! To use the visitor, define a struct and implement the Visitor trait
//! for the struct.
//!
//! Visitor trait functions call functions that implement walking through
//! the library. Selectively call these functions to selectively descend
//! into the library.
//!
//! # Example
//!
//! ```
//! use ferroplc_dsl::common::FunctionDeclaration;
//! use ferroplc_dsl::diagnostic::Diagnostic;
//! use ferroplc_dsl::visitor::{ Visitor, visit_function_declaration };
//!
//! struct Dummy {}
//! impl Dummy {
//!   fn do_work() {}
//! }
//!
//! impl Visitor<Diagnostic> for Dummy {
//!     type Value = ();
//!
//!     fn visit_function_declaration(&mut self, node: &FunctionDeclaration) -> Result<Self::Value, Diagnostic> {
//!         // Do something custom before visiting the FunctionDeclaration node
//!         Dummy::do_work();
//!
//!         // Continue the recursion
//!         visit_function_declaration(self, &node)
//!     }
//! }
//! ```

use crate::common::*;
use crate::core::Id;
use crate::diagnostic::Diagnostic;
use crate::textual::*;
use paste::paste;

/// Defines a macro for the `Visitor` trait that dispatches visiting
/// to a function. In other words, creates a function of the form:
///
/// ```ignore
/// fn visit_type_name(&mut self, node: &TypeName) -> Result<Self::Value, E> {
///    visit_type_name(self, node)
/// }
/// ```
///
/// The visitor generally dispatches to a dedicated function so that
/// implementations can re-use the behavior.
macro_rules! dispatch {
    ($struct_name:ident) => {
        paste! {
            fn [<visit_ $struct_name:snake >](&mut self, node: &$struct_name) -> Result<Self::Value, E> {
                [< visit_ $struct_name:snake >](self, node)
            }
        }
    };
}

/// Defines a macro for the `Visitor` trait that returns `Ok`.
/// In other words, creates a function of the form:
///
/// ```ignore
/// fn visit_type_name(&mut self, node: &TypeName) -> Result<Self::Value, E> {
///    Ok(Self::Value::default())
/// }
/// ```
macro_rules! leaf {
    ($struct_name:ident) => {
        paste! {
            fn [<visit_ $struct_name:snake >](&mut self, node: &$struct_name) -> Result<Self::Value, E> {
                let _ = node;
                Ok(Self::Value::default())
            }
        }
    };
}

/// Defines a way to recurse into an object in the AST or DSL.
pub trait Acceptor {
    fn accept<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
        &self,
        visitor: &mut V,
    ) -> Result<V::Value, E>;
}

/// Recurses into a vec of objects.
impl<X> Acceptor for Vec<X>
where
    X: Acceptor,
{
    fn accept<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
        &self,
        visitor: &mut V,
    ) -> Result<V::Value, E> {
        match self.iter().map(|x| x.accept(visitor)).find(|r| r.is_err()) {
            Some(err) => {
                // At least one of the items returned an error, so
                // return the first error.
                err
            }
            None => Ok(V::Value::default()),
        }
    }
}

/// Recurses into an optional object. Does nothing if the option is none.
impl<X> Acceptor for Option<X>
where
    X: Acceptor,
{
    fn accept<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
        &self,
        visitor: &mut V,
    ) -> Result<V::Value, E> {
        match self.as_ref() {
            Some(x) => x.accept(visitor),
            None => Ok(V::Value::default()),
        }
    }
}

/// Defines a macro for the `Acceptor` trait that dispatches to the
/// visitor. (The `Acceptor` trait defines a handler for lists and
/// optionals of 61131-3 elements.)
macro_rules! acceptor_impl {
    ($struct_name:ident) => {
        paste! {
            impl Acceptor for $struct_name {
                fn accept<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
                    &self,
                    visitor: &mut V,
                ) -> Result<V::Value, E> {
                    visitor.[<visit_ $struct_name:snake >](self)
                }
            }
        }
    };
}

/// Defines a visitor for the object tree. The default visitor recursively
/// walks to visit items in the tree.
///
/// Functions in the visitor are named based on the snake-case variant of
/// the element name. For example, the `Id` element's visitor function is
/// `visit_id`.
pub trait Visitor<E: std::convert::From<Diagnostic>> {
    /// Value produced by this visitor when the result is not an error.
    ///
    /// The returned value is usually not meaningful because no guarantee
    /// is provided when returning from vectors of objects.
    type Value: Default;

    fn walk(&mut self, node: &Library) -> Result<Self::Value, E> {
        Acceptor::accept(&node.elements, self)
    }

    // Declarations from Core

    // 2.1.2.
    leaf!(Id);

    // Declarations from Common

    // 2.2.1
    dispatch!(ConstantKind);

    // 2.2.1
    dispatch!(IntegerLiteral);

    // 2.2.1
    dispatch!(SignedInteger);

    // 2.2.1
    leaf!(Integer);

    // 2.2.1
    dispatch!(RealLiteral);

    // 2.2.1
    leaf!(Real);

    // 2.2.1
    leaf!(BooleanLiteral);

    // 2.2.2
    leaf!(CharacterStringLiteral);

    // 2.2.1
    dispatch!(BitStringLiteral);

    // 2.4.2.1
    leaf!(Subrange);

    // 2.4.3
    dispatch!(VarDecl);

    // 2.4.3.2
    dispatch!(InitialValueAssignmentKind);

    // 2.4.3.2
    dispatch!(SimpleInitializer);

    dispatch!(LibraryElementKind);

    // 2.5.1
    dispatch!(FunctionDeclaration);

    // 2.5.2
    dispatch!(FunctionBlockDeclaration);

    // 2.5.3
    dispatch!(ProgramDeclaration);

    // Declarations from Textual

    dispatch!(Variable);

    leaf!(NamedVariable);

    dispatch!(ArrayVariable);

    dispatch!(StructuredVariable);

    // 3.2.3
    dispatch!(FbCall);

    // 3.2.3
    dispatch!(PositionalInput);

    // 3.2.3
    dispatch!(NamedInput);

    // 3.2.3
    dispatch!(Output);

    // 3.2.3
    dispatch!(ParamAssignmentKind);

    dispatch!(StmtKind);

    // 3.3.1
    dispatch!(CompareExpr);

    // 3.3.1
    dispatch!(BinaryExpr);

    // 3.3.1
    dispatch!(UnaryExpr);

    dispatch!(Function);

    dispatch!(ExprKind);

    // 3.3.2.1
    dispatch!(Assignment);

    // 3.3.2.3
    dispatch!(If);

    // 3.3.2.3
    dispatch!(ElseIf);

    // 3.3.2.3
    dispatch!(Case);

    // 3.3.2.3
    dispatch!(CaseStatementGroup);

    // 3.3.2.3
    dispatch!(CaseSelectionKind);

    dispatch!(For);

    dispatch!(While);

    dispatch!(Repeat);
}

pub fn visit_constant_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ConstantKind,
) -> Result<V::Value, E> {
    match node {
        ConstantKind::IntegerLiteral(node) => v.visit_integer_literal(node),
        ConstantKind::RealLiteral(node) => v.visit_real_literal(node),
        ConstantKind::Boolean(node) => v.visit_boolean_literal(node),
        ConstantKind::CharacterString(node) => v.visit_character_string_literal(node),
        ConstantKind::BitStringLiteral(node) => v.visit_bit_string_literal(node),
    }
}

pub fn visit_integer_literal<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &IntegerLiteral,
) -> Result<V::Value, E> {
    v.visit_signed_integer(&node.value)
}

pub fn visit_signed_integer<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &SignedInteger,
) -> Result<V::Value, E> {
    v.visit_integer(&node.value)
}

pub fn visit_real_literal<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &RealLiteral,
) -> Result<V::Value, E> {
    v.visit_real(&node.value)
}

pub fn visit_bit_string_literal<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &BitStringLiteral,
) -> Result<V::Value, E> {
    v.visit_integer(&node.value)
}

pub fn visit_var_decl<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &VarDecl,
) -> Result<V::Value, E> {
    v.visit_id(&node.identifier)?;
    v.visit_initial_value_assignment_kind(&node.initializer)
}

pub fn visit_initial_value_assignment_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &InitialValueAssignmentKind,
) -> Result<V::Value, E> {
    match node {
        InitialValueAssignmentKind::None(_) => Ok(V::Value::default()),
        InitialValueAssignmentKind::Simple(si) => v.visit_simple_initializer(si),
    }
}

pub fn visit_simple_initializer<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &SimpleInitializer,
) -> Result<V::Value, E> {
    Acceptor::accept(&node.initial_value, v)
}

pub fn visit_library_element_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &LibraryElementKind,
) -> Result<V::Value, E> {
    match node {
        LibraryElementKind::FunctionDeclaration(func_decl) => {
            v.visit_function_declaration(func_decl)
        }
        LibraryElementKind::FunctionBlockDeclaration(func_block_decl) => {
            v.visit_function_block_declaration(func_block_decl)
        }
        LibraryElementKind::ProgramDeclaration(prog_decl) => v.visit_program_declaration(prog_decl),
    }
}

pub fn visit_function_declaration<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &FunctionDeclaration,
) -> Result<V::Value, E> {
    v.visit_id(&node.name)?;
    Acceptor::accept(&node.variables, v)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_function_block_declaration<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &FunctionBlockDeclaration,
) -> Result<V::Value, E> {
    v.visit_id(&node.name)?;
    Acceptor::accept(&node.variables, v)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_program_declaration<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ProgramDeclaration,
) -> Result<V::Value, E> {
    v.visit_id(&node.name)?;
    Acceptor::accept(&node.variables, v)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_variable<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Variable,
) -> Result<V::Value, E> {
    match node {
        Variable::Named(var) => v.visit_named_variable(var),
        Variable::Array(var) => v.visit_array_variable(var),
        Variable::Structured(var) => v.visit_structured_variable(var),
    }
}

pub fn visit_array_variable<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ArrayVariable,
) -> Result<V::Value, E> {
    v.visit_variable(node.subscripted_variable.as_ref())?;
    Acceptor::accept(&node.subscripts, v)
}

pub fn visit_structured_variable<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &StructuredVariable,
) -> Result<V::Value, E> {
    v.visit_variable(node.record.as_ref())?;
    v.visit_id(&node.field)
}

// 3.2.3
pub fn visit_fb_call<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &FbCall,
) -> Result<V::Value, E> {
    v.visit_id(&node.var_name)?;
    Acceptor::accept(&node.params, v)
}

// 3.2.3
pub fn visit_positional_input<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &PositionalInput,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.expr)
}

// 3.2.3
pub fn visit_named_input<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &NamedInput,
) -> Result<V::Value, E> {
    v.visit_id(&node.name)?;
    v.visit_expr_kind(&node.expr)
}

// 3.2.3
pub fn visit_output<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Output,
) -> Result<V::Value, E> {
    v.visit_id(&node.src)?;
    v.visit_variable(&node.tgt)
}

pub fn visit_param_assignment_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ParamAssignmentKind,
) -> Result<V::Value, E> {
    match node {
        ParamAssignmentKind::PositionalInput(node) => v.visit_positional_input(node),
        ParamAssignmentKind::NamedInput(node) => v.visit_named_input(node),
        ParamAssignmentKind::Output(node) => v.visit_output(node),
    }
}

pub fn visit_stmt_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &StmtKind,
) -> Result<V::Value, E> {
    match node {
        StmtKind::Assignment(node) => v.visit_assignment(node),
        StmtKind::FbCall(node) => v.visit_fb_call(node),
        StmtKind::If(node) => v.visit_if(node),
        StmtKind::Case(node) => v.visit_case(node),
        StmtKind::For(node) => v.visit_for(node),
        StmtKind::While(node) => v.visit_while(node),
        StmtKind::Repeat(node) => v.visit_repeat(node),
        StmtKind::Return => Ok(V::Value::default()),
        StmtKind::Exit => Ok(V::Value::default()),
    }
}

pub fn visit_compare_expr<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &CompareExpr,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.left)?;
    v.visit_expr_kind(&node.right)
}

pub fn visit_binary_expr<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &BinaryExpr,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.left)?;
    v.visit_expr_kind(&node.right)
}

pub fn visit_unary_expr<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &UnaryExpr,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.term)
}

pub fn visit_function<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Function,
) -> Result<V::Value, E> {
    v.visit_id(&node.name)?;
    Acceptor::accept(&node.param_assignment, v)
}

pub fn visit_expr_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ExprKind,
) -> Result<V::Value, E> {
    match node {
        ExprKind::Compare(node) => v.visit_compare_expr(node.as_ref()),
        ExprKind::BinaryOp(node) => v.visit_binary_expr(node.as_ref()),
        ExprKind::UnaryOp(node) => v.visit_unary_expr(node.as_ref()),
        ExprKind::Expression(node) => v.visit_expr_kind(node.as_ref()),
        ExprKind::Const(node) => v.visit_constant_kind(node),
        ExprKind::Variable(node) => v.visit_variable(node),
        ExprKind::Function(node) => v.visit_function(node),
    }
}

pub fn visit_assignment<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Assignment,
) -> Result<V::Value, E> {
    v.visit_variable(&node.target)?;
    v.visit_expr_kind(&node.value)
}

pub fn visit_if<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &If,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.expr)?;
    Acceptor::accept(&node.body, v)?;
    Acceptor::accept(&node.else_ifs, v)?;
    Acceptor::accept(&node.else_body, v)
}

pub fn visit_else_if<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &ElseIf,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.expr)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_case<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Case,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.selector)?;
    Acceptor::accept(&node.statement_groups, v)?;
    Acceptor::accept(&node.else_body, v)
}

pub fn visit_case_statement_group<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &CaseStatementGroup,
) -> Result<V::Value, E> {
    Acceptor::accept(&node.selectors, v)?;
    Acceptor::accept(&node.statements, v)
}

pub fn visit_case_selection_kind<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &CaseSelectionKind,
) -> Result<V::Value, E> {
    match node {
        CaseSelectionKind::Subrange(sr) => v.visit_subrange(sr),
        CaseSelectionKind::SignedInteger(si) => v.visit_signed_integer(si),
    }
}

pub fn visit_for<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &For,
) -> Result<V::Value, E> {
    v.visit_id(&node.control)?;
    v.visit_expr_kind(&node.from)?;
    v.visit_expr_kind(&node.to)?;
    Acceptor::accept(&node.step, v)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_while<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &While,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.condition)?;
    Acceptor::accept(&node.body, v)
}

pub fn visit_repeat<V: Visitor<E> + ?Sized, E: From<Diagnostic>>(
    v: &mut V,
    node: &Repeat,
) -> Result<V::Value, E> {
    v.visit_expr_kind(&node.until)?;
    Acceptor::accept(&node.body, v)
}

acceptor_impl!(Id);
acceptor_impl!(ConstantKind);
acceptor_impl!(LibraryElementKind);
acceptor_impl!(VarDecl);
acceptor_impl!(ExprKind);
acceptor_impl!(ElseIf);
acceptor_impl!(CaseStatementGroup);
acceptor_impl!(CaseSelectionKind);
acceptor_impl!(ParamAssignmentKind);
acceptor_impl!(StmtKind);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Id;
    use std::collections::LinkedList;

    struct Descender {
        names: LinkedList<String>,
    }
    impl Descender {
        fn new() -> Descender {
            Descender {
                names: LinkedList::new(),
            }
        }
    }

    impl Visitor<()> for Descender {
        type Value = ();

        fn visit_integer(&mut self, node: &Integer) -> Result<(), ()> {
            self.names.push_back(node.text.clone());
            Ok(())
        }

        fn visit_named_variable(&mut self, var: &NamedVariable) -> Result<(), ()> {
            self.names.push_back(var.name.to_string());
            Ok(())
        }

        fn visit_fb_call(&mut self, fb_call: &FbCall) -> Result<(), ()> {
            self.names.push_back(fb_call.var_name.to_string());
            Ok(())
        }
    }

    #[test]
    fn walk_when_has_statements_then_visits_in_order() {
        let library = Library {
            elements: vec![LibraryElementKind::ProgramDeclaration(ProgramDeclaration {
                name: Id::from("plc_prg"),
                variables: vec![VarDecl::simple("Reset", "BOOL").with_type(VariableType::Input)],
                body: vec![StmtKind::assignment(
                    Variable::named("Cnt1"),
                    ExprKind::binary(
                        Operator::Add,
                        ExprKind::integer_literal("1"),
                        ExprKind::integer_literal("2"),
                    ),
                )],
            })],
        };

        let mut descender = Descender::new();

        descender.walk(&library).unwrap();

        // Both operands are visited, left operand before right operand.
        let names: Vec<String> = descender.names.into_iter().collect();
        assert_eq!(names, vec!["Cnt1", "1", "2"]);
    }

    #[test]
    fn walk_when_nested_expressions_then_visits_depth_first() {
        let expr = ExprKind::binary(
            Operator::Mul,
            ExprKind::paren(ExprKind::binary(
                Operator::Add,
                ExprKind::integer_literal("1"),
                ExprKind::integer_literal("2"),
            )),
            ExprKind::integer_literal("3"),
        );
        let library = Library {
            elements: vec![LibraryElementKind::ProgramDeclaration(ProgramDeclaration {
                name: Id::from("plc_prg"),
                variables: vec![],
                body: vec![StmtKind::assignment(Variable::named("Out"), expr)],
            })],
        };

        let mut descender = Descender::new();

        descender.walk(&library).unwrap();

        let names: Vec<String> = descender.names.into_iter().collect();
        assert_eq!(names, vec!["Out", "1", "2", "3"]);
    }
}
