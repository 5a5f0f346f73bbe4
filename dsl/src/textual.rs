//! Provides definitions of objects from IEC 61131-3 textual languages.
//!
//! See section 3.
use crate::common::{ConstantKind, SignedInteger, Subrange};
use crate::constant::ConstantValues;
use crate::core::{Id, Located, SourceSpan};
use std::fmt;

/// A variable reference.
///
/// See section B.1.4.
#[derive(Debug, PartialEq, Clone)]
pub enum Variable {
    Named(NamedVariable),
    Array(ArrayVariable),
    Structured(StructuredVariable),
}

impl Variable {
    pub fn named(name: &str) -> Variable {
        Variable::Named(NamedVariable {
            name: Id::from(name),
        })
    }

    pub fn structured(record: &str, field: &str) -> Variable {
        Variable::Structured(StructuredVariable {
            record: Box::new(Variable::named(record)),
            field: Id::from(field),
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Named(named) => f.write_fmt(format_args!("{named}")),
            Variable::Array(array) => f.write_fmt(format_args!("{array}")),
            Variable::Structured(structured) => f.write_fmt(format_args!("{structured}")),
        }
    }
}

impl Located for Variable {
    fn span(&self) -> SourceSpan {
        match self {
            Variable::Named(named) => named.span(),
            Variable::Array(array) => array.span(),
            Variable::Structured(structured) => structured.span(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct NamedVariable {
    pub name: Id,
}

impl fmt::Display for NamedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}", self.name))
    }
}

impl Located for NamedVariable {
    fn span(&self) -> SourceSpan {
        self.name.span()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ArrayVariable {
    /// The variable that is being accessed by subscript (the array).
    pub subscripted_variable: Box<Variable>,
    /// The ordered set of subscripts. These should be expressions that
    /// evaluate to an index.
    pub subscripts: Vec<ExprKind>,
}

impl fmt::Display for ArrayVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{} {:?}",
            self.subscripted_variable, self.subscripts
        ))
    }
}

impl Located for ArrayVariable {
    fn span(&self) -> SourceSpan {
        self.subscripted_variable.as_ref().span()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct StructuredVariable {
    pub record: Box<Variable>,
    pub field: Id,
}

impl fmt::Display for StructuredVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}.{}", self.record.as_ref(), self.field))
    }
}

impl Located for StructuredVariable {
    fn span(&self) -> SourceSpan {
        SourceSpan::join2(self.record.as_ref(), &self.field)
    }
}

/// Function block invocation.
///
/// See section 3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct FbCall {
    /// Name of the variable that is associated with the function block
    /// call.
    pub var_name: Id,
    pub params: Vec<ParamAssignmentKind>,
    pub position: SourceSpan,
}

impl Located for FbCall {
    fn span(&self) -> SourceSpan {
        self.position.clone()
    }
}

/// A binary expression that produces a Boolean result by comparing
/// operands (or combines Boolean or bit string operands).
///
/// See section 3.3.1.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareExpr {
    pub op: CompareOp,
    pub left: ExprKind,
    pub right: ExprKind,
    pub const_value: ConstantValues,
}

/// A binary expression that produces an arithmetic result by operating on
/// two operands.
///
/// See section 3.3.1.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: Operator,
    pub left: ExprKind,
    pub right: ExprKind,
    pub const_value: ConstantValues,
}

/// A unary expression that produces a boolean or arithmetic result by
/// transforming the operand.
///
/// See section 3.3.1.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub term: ExprKind,
    pub const_value: ConstantValues,
}

/// A function invocation in an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Id,
    pub param_assignment: Vec<ParamAssignmentKind>,
}

/// Expression that yields a value derived from the input(s) to the
/// expression.
#[derive(Debug, PartialEq, Clone)]
pub enum ExprKind {
    Compare(Box<CompareExpr>),
    BinaryOp(Box<BinaryExpr>),
    UnaryOp(Box<UnaryExpr>),
    /// A parenthesized expression.
    Expression(Box<ExprKind>),
    Const(ConstantKind),
    Variable(Variable),
    Function(Function),
}

impl ExprKind {
    pub fn compare(op: CompareOp, left: ExprKind, right: ExprKind) -> ExprKind {
        ExprKind::Compare(Box::new(CompareExpr {
            op,
            left,
            right,
            const_value: ConstantValues::default(),
        }))
    }

    pub fn binary(op: Operator, left: ExprKind, right: ExprKind) -> ExprKind {
        ExprKind::BinaryOp(Box::new(BinaryExpr {
            op,
            left,
            right,
            const_value: ConstantValues::default(),
        }))
    }

    pub fn unary(op: UnaryOp, term: ExprKind) -> ExprKind {
        ExprKind::UnaryOp(Box::new(UnaryExpr {
            op,
            term,
            const_value: ConstantValues::default(),
        }))
    }

    pub fn paren(expr: ExprKind) -> ExprKind {
        ExprKind::Expression(Box::new(expr))
    }

    pub fn named_variable(name: &str) -> ExprKind {
        ExprKind::Variable(Variable::named(name))
    }

    pub fn integer_literal(value: &str) -> ExprKind {
        ExprKind::Const(ConstantKind::integer_literal(value).unwrap())
    }

    pub fn real_literal(value: &str) -> ExprKind {
        ExprKind::Const(ConstantKind::real_literal(value).unwrap())
    }

    pub fn bool_literal(value: bool) -> ExprKind {
        ExprKind::Const(ConstantKind::boolean(value))
    }

    /// Returns the constant value candidates attached to the expression.
    ///
    /// Expression kinds that are never folded (variables and invocations)
    /// report every interpretation as undefined. A parenthesized
    /// expression reports the candidates of the inner expression.
    pub fn const_value(&self) -> ConstantValues {
        match self {
            ExprKind::Compare(node) => node.const_value,
            ExprKind::BinaryOp(node) => node.const_value,
            ExprKind::UnaryOp(node) => node.const_value,
            ExprKind::Expression(node) => node.const_value(),
            ExprKind::Const(node) => node.const_value(),
            ExprKind::Variable(_) => ConstantValues::default(),
            ExprKind::Function(_) => ConstantValues::default(),
        }
    }
}

/// Input argument to a function or function block invocation.
/// The input is mapped based on the order in a sequence. Also known
/// as a non-formal input.
///
/// See section 3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct PositionalInput {
    pub expr: ExprKind,
}

/// Input argument to a function or function block invocation.
/// The input is mapped based on the specified name. Also known as
/// a formal input.
///
/// See section 3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct NamedInput {
    pub name: Id,
    pub expr: ExprKind,
}

/// Output argument captured from a function or function block invocation.
///
/// See section 3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct Output {
    pub not: bool,
    pub src: Id,
    pub tgt: Variable,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ParamAssignmentKind {
    PositionalInput(PositionalInput),
    NamedInput(NamedInput),
    Output(Output),
}

impl ParamAssignmentKind {
    pub fn positional(expr: ExprKind) -> ParamAssignmentKind {
        ParamAssignmentKind::PositionalInput(PositionalInput { expr })
    }

    pub fn named(name: &str, expr: ExprKind) -> ParamAssignmentKind {
        ParamAssignmentKind::NamedInput(NamedInput {
            name: Id::from(name),
            expr,
        })
    }
}

/// Comparison and Boolean operators.
///
/// See section 3.2.2, especially table 52.
#[derive(Debug, PartialEq, Clone)]
pub enum CompareOp {
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

/// Arithmetic operators.
///
/// See section 3.2.2, especially table 52.
#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Local operators (with single operand).
///
/// See section 3.2.2, especially table 52.
#[derive(Debug, PartialEq, Clone)]
pub enum UnaryOp {
    Neg,
    // Complement operator (for Boolean and bit string values)
    Not,
}

/// Statements.
///
/// See section 3.3.2.
#[derive(Debug, PartialEq, Clone)]
pub enum StmtKind {
    Assignment(Assignment),
    // Function and function block control
    FbCall(FbCall),
    // Selection statements
    If(If),
    Case(Case),
    // Iteration statements
    For(For),
    While(While),
    Repeat(Repeat),
    Return,
    Exit,
}

impl StmtKind {
    pub fn assignment(target: Variable, value: ExprKind) -> StmtKind {
        StmtKind::Assignment(Assignment { target, value })
    }

    pub fn if_then(condition: ExprKind, body: Vec<StmtKind>) -> StmtKind {
        StmtKind::If(If {
            expr: condition,
            body,
            else_ifs: vec![],
            else_body: vec![],
        })
    }
}

/// Assigns a variable as the evaluation of an expression.
///
/// See section 3.3.2.1.
#[derive(Debug, PartialEq, Clone)]
pub struct Assignment {
    pub target: Variable,
    pub value: ExprKind,
}

/// If selection statement.
///
/// See section 3.3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct If {
    pub expr: ExprKind,
    pub body: Vec<StmtKind>,
    pub else_ifs: Vec<ElseIf>,
    pub else_body: Vec<StmtKind>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ElseIf {
    pub expr: ExprKind,
    pub body: Vec<StmtKind>,
}

/// Case selection statement.
///
/// See section 3.3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct Case {
    /// An expression, the result of which is used to select a particular
    /// case.
    pub selector: ExprKind,
    pub statement_groups: Vec<CaseStatementGroup>,
    pub else_body: Vec<StmtKind>,
}

/// A group of statements that can be selected within a case.
///
/// See section 3.3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub struct CaseStatementGroup {
    pub selectors: Vec<CaseSelectionKind>,
    pub statements: Vec<StmtKind>,
}

/// A particular value that selects a case statement group.
///
/// See section 3.3.2.3.
#[derive(Debug, PartialEq, Clone)]
pub enum CaseSelectionKind {
    Subrange(Subrange),
    SignedInteger(SignedInteger),
}

/// The for loop statement.
///
/// See section 3.3.2.4.
#[derive(Debug, PartialEq, Clone)]
pub struct For {
    /// The variable that is assigned and contains the value for each loop
    /// iteration.
    pub control: Id,
    pub from: ExprKind,
    pub to: ExprKind,
    pub step: Option<ExprKind>,
    pub body: Vec<StmtKind>,
}

/// The while loop statement.
///
/// See section 3.3.2.4.
#[derive(Debug, PartialEq, Clone)]
pub struct While {
    pub condition: ExprKind,
    pub body: Vec<StmtKind>,
}

/// The repeat loop statement.
///
/// See section 3.3.2.4.
#[derive(Debug, PartialEq, Clone)]
pub struct Repeat {
    pub until: ExprKind,
    pub body: Vec<StmtKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantValue;

    #[test]
    fn const_value_when_variable_then_undefined() {
        let expr = ExprKind::named_variable("Cnt1");
        assert!(expr.const_value().is_undefined());
    }

    #[test]
    fn const_value_when_parenthesized_then_delegates_to_inner() {
        let mut inner = BinaryExpr {
            op: Operator::Add,
            left: ExprKind::integer_literal("1"),
            right: ExprKind::integer_literal("2"),
            const_value: ConstantValues::default(),
        };
        inner.const_value.int_value = ConstantValue::Const(3);
        let expr = ExprKind::paren(ExprKind::BinaryOp(Box::new(inner)));
        assert_eq!(expr.const_value().int_value.value(), Some(3));
    }
}
