//! Provides definitions of objects from IEC 61131-3 common elements.
//!
//! See section 2.
use core::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use std::hash::{Hash, Hasher};

use crate::constant::ConstantValues;
use crate::core::{Id, Located, SourceSpan};
use crate::textual::StmtKind;

lazy_static! {
    // Lexical grammars for numeric literals. Underscores are digit
    // separators and carry no meaning. See section 2.2.1.
    static ref DECIMAL_INTEGER: Regex = Regex::new(r"^[0-9](_?[0-9])*$").unwrap();
    static ref HEX_INTEGER: Regex = Regex::new(r"^16#[0-9A-Fa-f](_?[0-9A-Fa-f])*$").unwrap();
    static ref OCTAL_INTEGER: Regex = Regex::new(r"^8#[0-7](_?[0-7])*$").unwrap();
    static ref BINARY_INTEGER: Regex = Regex::new(r"^2#[01](_?[01])*$").unwrap();
    static ref REAL: Regex =
        Regex::new(r"^[0-9](_?[0-9])*\.[0-9](_?[0-9])*([Ee][+-]?[0-9](_?[0-9])*)?$").unwrap();
}

/// Container for elementary constants.
///
/// See section 2.2.
#[derive(PartialEq, Clone, Debug)]
pub enum ConstantKind {
    IntegerLiteral(IntegerLiteral),
    RealLiteral(RealLiteral),
    Boolean(BooleanLiteral),
    CharacterString(CharacterStringLiteral),
    BitStringLiteral(BitStringLiteral),
}

impl ConstantKind {
    pub fn integer_literal(value: &str) -> Result<Self, &'static str> {
        Ok(Self::IntegerLiteral(IntegerLiteral {
            value: SignedInteger::new(value, SourceSpan::default())?,
            data_type: None,
            const_value: ConstantValues::default(),
        }))
    }

    pub fn real_literal(value: &str) -> Result<Self, &'static str> {
        Ok(Self::RealLiteral(RealLiteral {
            value: Real::new(value, SourceSpan::default())?,
            data_type: None,
            const_value: ConstantValues::default(),
        }))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean(BooleanLiteral {
            value: if value {
                Boolean::True
            } else {
                Boolean::False
            },
            const_value: ConstantValues::default(),
        })
    }

    /// Returns the constant value candidates attached to the literal.
    pub fn const_value(&self) -> ConstantValues {
        match self {
            ConstantKind::IntegerLiteral(node) => node.const_value,
            ConstantKind::RealLiteral(node) => node.const_value,
            ConstantKind::Boolean(node) => node.const_value,
            ConstantKind::BitStringLiteral(node) => node.const_value,
            ConstantKind::CharacterString(_) => ConstantValues::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Boolean {
    True,
    False,
}

/// The base (radix) of an integer literal as written in source.
///
/// See section 2.2.1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntegerBase {
    Decimal,
    Hex,
    Octal,
    Binary,
}

impl IntegerBase {
    pub fn radix(&self) -> u32 {
        match self {
            IntegerBase::Decimal => 10,
            IntegerBase::Hex => 16,
            IntegerBase::Octal => 8,
            IntegerBase::Binary => 2,
        }
    }
}

/// Integer literal. The literal keeps the source text (less any base
/// prefix handling) so that later stages can convert it to the largest
/// type that the context allows. An integer is inherently unsigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub span: SourceSpan,
    /// The lexeme as written, including any base prefix and any
    /// underscore digit separators.
    pub text: String,
    pub base: IntegerBase,
}

impl Integer {
    pub fn new(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if !DECIMAL_INTEGER.is_match(a) {
            return Err("Not a valid decimal integer");
        }
        Ok(Integer {
            span,
            text: a.to_owned(),
            base: IntegerBase::Decimal,
        })
    }

    pub fn hex(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if !HEX_INTEGER.is_match(a) {
            return Err("Not a valid hex integer");
        }
        Ok(Integer {
            span,
            text: a.to_owned(),
            base: IntegerBase::Hex,
        })
    }

    pub fn octal(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if !OCTAL_INTEGER.is_match(a) {
            return Err("Not a valid octal integer");
        }
        Ok(Integer {
            span,
            text: a.to_owned(),
            base: IntegerBase::Octal,
        })
    }

    pub fn binary(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if !BINARY_INTEGER.is_match(a) {
            return Err("Not a valid binary integer");
        }
        Ok(Integer {
            span,
            text: a.to_owned(),
            base: IntegerBase::Binary,
        })
    }

    /// Creates an integer from a lexeme, selecting the base from the
    /// `16#`, `8#` or `2#` prefix (decimal when there is no prefix).
    pub fn try_from_lexeme(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if a.starts_with("16#") {
            Integer::hex(a, span)
        } else if a.starts_with("8#") {
            Integer::octal(a, span)
        } else if a.starts_with("2#") {
            Integer::binary(a, span)
        } else {
            Integer::new(a, span)
        }
    }

    /// Returns the digit characters of the lexeme, without the base prefix
    /// (underscore separators are retained).
    pub fn digits(&self) -> &str {
        match self.base {
            IntegerBase::Decimal => &self.text,
            IntegerBase::Hex => &self.text[3..],
            IntegerBase::Octal | IntegerBase::Binary => &self.text[2..],
        }
    }
}

impl Located for Integer {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An integer with an optional leading sign, from the `signed_integer`
/// production. The sign is part of the literal rather than a negation
/// expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedInteger {
    pub value: Integer,
    pub is_neg: bool,
}

impl SignedInteger {
    pub fn new(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        match a.chars().next() {
            Some('+') => {
                let whole = a.get(1..).ok_or("Not a valid signed integer")?;
                Ok(Self {
                    value: Integer::try_from_lexeme(whole, span)?,
                    is_neg: false,
                })
            }
            Some('-') => {
                let whole = a.get(1..).ok_or("Not a valid signed integer")?;
                Ok(Self {
                    value: Integer::try_from_lexeme(whole, span)?,
                    is_neg: true,
                })
            }
            _ => Ok(Self {
                value: Integer::try_from_lexeme(a, span)?,
                is_neg: false,
            }),
        }
    }

    pub fn positive(a: &str) -> Result<Self, &'static str> {
        Ok(Self {
            value: Integer::try_from_lexeme(a, SourceSpan::default())?,
            is_neg: false,
        })
    }

    pub fn negative(a: &str) -> Result<Self, &'static str> {
        Ok(Self {
            value: Integer::try_from_lexeme(a, SourceSpan::default())?,
            is_neg: true,
        })
    }
}

impl From<Integer> for SignedInteger {
    fn from(value: Integer) -> SignedInteger {
        SignedInteger {
            value,
            is_neg: false,
        }
    }
}

impl Located for SignedInteger {
    fn span(&self) -> SourceSpan {
        self.value.span()
    }
}

impl fmt::Display for SignedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg {
            f.write_fmt(format_args!("-{}", self.value))
        } else {
            f.write_fmt(format_args!("{}", self.value))
        }
    }
}

/// A signed integer literal with an optional type name.
///
/// See section 2.2.1.
#[derive(Debug, PartialEq, Clone)]
pub struct IntegerLiteral {
    pub value: SignedInteger,
    pub data_type: Option<ElementaryTypeName>,
    pub const_value: ConstantValues,
}

impl IntegerLiteral {
    pub fn with_type(mut self, data_type: ElementaryTypeName) -> Self {
        self.data_type = Some(data_type);
        self
    }
}

impl Located for IntegerLiteral {
    fn span(&self) -> SourceSpan {
        self.value.span()
    }
}

/// A real (floating point) literal. The literal keeps the source text so
/// that conversion happens exactly once, during analysis.
///
/// See section 2.2.1.
#[derive(Debug, Clone, PartialEq)]
pub struct Real {
    pub span: SourceSpan,
    /// The lexeme as written, including any underscore digit separators
    /// and any exponent.
    pub text: String,
}

impl Real {
    pub fn new(a: &str, span: SourceSpan) -> Result<Self, &'static str> {
        if !REAL.is_match(a) {
            return Err("Not a valid real");
        }
        Ok(Real {
            span,
            text: a.to_owned(),
        })
    }
}

impl Located for Real {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// See section 2.2.1.
#[derive(Debug, PartialEq, Clone)]
pub struct RealLiteral {
    pub value: Real,
    pub data_type: Option<ElementaryTypeName>,
    pub const_value: ConstantValues,
}

impl RealLiteral {
    pub fn with_type(mut self, data_type: ElementaryTypeName) -> Self {
        self.data_type = Some(data_type);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BooleanLiteral {
    pub value: Boolean,
    pub const_value: ConstantValues,
}

impl BooleanLiteral {
    pub fn new(value: Boolean) -> Self {
        Self {
            value,
            const_value: ConstantValues::default(),
        }
    }
}

/// See section 2.2.2.
#[derive(Debug, PartialEq, Clone)]
pub struct CharacterStringLiteral {
    pub value: Vec<char>,
}

impl CharacterStringLiteral {
    pub fn new(value: Vec<char>) -> Self {
        Self { value }
    }
}

/// A bit string literal, always with a type name prefix (`WORD#16#FF`).
///
/// See section 2.2.1.
#[derive(Debug, PartialEq, Clone)]
pub struct BitStringLiteral {
    pub value: Integer,
    pub data_type: Option<ElementaryTypeName>,
    pub const_value: ConstantValues,
}

/// Implements a type identifier.
///
/// Types are all identifiers but we use a separate structure
/// because it is convenient to treat types and other identifiers
/// separately.
#[derive(Clone, Debug, PartialEq)]
pub struct Type {
    pub name: Id,
}

impl Type {
    pub fn from(str: &str) -> Self {
        Self {
            name: Id::from(str),
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Located for Type {
    fn span(&self) -> SourceSpan {
        self.name.span()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}", &self.name))
    }
}

/// Elementary type names.
///
/// See section 2.3.1.
#[derive(Debug, PartialEq, Clone)]
pub enum ElementaryTypeName {
    BOOL,
    SINT,
    INT,
    DINT,
    LINT,
    USINT,
    UINT,
    UDINT,
    ULINT,
    REAL,
    LREAL,
    STRING,
    BYTE,
    WORD,
    DWORD,
    LWORD,
}

impl ElementaryTypeName {
    pub fn as_id(&self) -> Id {
        match self {
            ElementaryTypeName::BOOL => Id::from("BOOL"),
            ElementaryTypeName::SINT => Id::from("SINT"),
            ElementaryTypeName::INT => Id::from("INT"),
            ElementaryTypeName::DINT => Id::from("DINT"),
            ElementaryTypeName::LINT => Id::from("LINT"),
            ElementaryTypeName::USINT => Id::from("USINT"),
            ElementaryTypeName::UINT => Id::from("UINT"),
            ElementaryTypeName::UDINT => Id::from("UDINT"),
            ElementaryTypeName::ULINT => Id::from("ULINT"),
            ElementaryTypeName::REAL => Id::from("REAL"),
            ElementaryTypeName::LREAL => Id::from("LREAL"),
            ElementaryTypeName::STRING => Id::from("STRING"),
            ElementaryTypeName::BYTE => Id::from("BYTE"),
            ElementaryTypeName::WORD => Id::from("WORD"),
            ElementaryTypeName::DWORD => Id::from("DWORD"),
            ElementaryTypeName::LWORD => Id::from("LWORD"),
        }
    }
}

/// Subrange of an integer type, inclusive on both ends.
///
/// See section 2.4.2.1.
#[derive(Clone, Debug, PartialEq)]
pub struct Subrange {
    pub start: SignedInteger,
    pub end: SignedInteger,
}

/// Variable declaration.
///
/// See section 2.4.3.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub identifier: Id,
    pub var_type: VariableType,
    pub qualifier: DeclarationQualifier,
    pub initializer: InitialValueAssignmentKind,
}

impl VarDecl {
    /// Creates a variable declaration for a simple type and no
    /// initialization. The declaration has type `VAR` and no qualifier.
    pub fn simple(name: &str, type_name: &str) -> Self {
        Self {
            identifier: Id::from(name),
            var_type: VariableType::Var,
            qualifier: DeclarationQualifier::Unspecified,
            initializer: InitialValueAssignmentKind::simple_uninitialized(Type::from(type_name)),
        }
    }

    /// Assigns the type of the variable declaration.
    pub fn with_type(mut self, var_type: VariableType) -> Self {
        self.var_type = var_type;
        self
    }

    /// Assigns the qualifier of the variable declaration.
    pub fn with_qualifier(mut self, qualifier: DeclarationQualifier) -> Self {
        self.qualifier = qualifier;
        self
    }
}

impl Located for VarDecl {
    fn span(&self) -> SourceSpan {
        self.identifier.span()
    }
}

/// Keywords for declarations.
///
/// IEC 61131-3 defines groups that can contain multiple variables. These
/// groups introduce complexity in parsing and in iterating. This
/// implementation treats the groups as labels on individual variables; in
/// effect, there are no groups.
///
/// See section 2.4.3.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableType {
    /// Local to a POU.
    Var,
    /// Local to a POU. Does not need to be maintained
    /// between calls to a POU.
    VarTemp,
    /// Variable that is visible to a calling POU as an input.
    Input,
    /// Variable that is visible to a calling POU and can only
    /// be read from the calling POU.
    Output,
    /// Variable that is visible to a calling POU and is readable and
    /// writeable by the calling POU.
    InOut,
    /// Enables a POU to read and (possibly) write to a global variable.
    External,
    /// A variable that may be read and written by multiple POUs that
    /// also declare the variable as external.
    Global,
}

/// Qualifier types for declarations.
///
/// See section 2.4.3.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationQualifier {
    Unspecified,
    Constant,
    /// Stored so that the value is retained through power loss.
    Retain,
    /// Stored so that the value is NOT retained through power loss.
    NonRetain,
}

/// Container for initial value assignments.
///
/// Declarations of variables can be associated with an initial value. The
/// initial value assignment is not necessarily compatible with the
/// associated variable.
///
/// See section 2.4.3.2.
#[derive(Clone, PartialEq, Debug)]
pub enum InitialValueAssignmentKind {
    /// Represents no type initializer.
    ///
    /// Some types allow no initializer and this avoids nesting of the
    /// enumeration with an Option enumeration.
    None(SourceSpan),
    Simple(SimpleInitializer),
}

impl InitialValueAssignmentKind {
    pub fn simple_uninitialized(type_name: Type) -> Self {
        InitialValueAssignmentKind::Simple(SimpleInitializer {
            type_name,
            initial_value: None,
        })
    }

    /// Creates an initial value from the initializer.
    pub fn simple(type_name: &str, value: ConstantKind) -> Self {
        InitialValueAssignmentKind::Simple(SimpleInitializer {
            type_name: Type::from(type_name),
            initial_value: Some(value),
        })
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SimpleInitializer {
    pub type_name: Type,
    pub initial_value: Option<ConstantKind>,
}

/// Container for top-level elements that are valid top-level declarations
/// in a library.
#[derive(Clone, Debug, PartialEq)]
pub enum LibraryElementKind {
    FunctionDeclaration(FunctionDeclaration),
    FunctionBlockDeclaration(FunctionBlockDeclaration),
    ProgramDeclaration(ProgramDeclaration),
}

/// Function Program Organization Unit Declaration.
///
/// A function is stateless and has no "memory". Functions
/// consist of a series of statements that provide outputs through the
/// return value and bound variables.
///
/// See section 2.5.1.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Id,
    pub return_type: Type,
    pub variables: Vec<VarDecl>,
    pub body: Vec<StmtKind>,
}

/// Function Block Program Organization Unit Declaration.
///
/// A function block declaration (as distinct from a particular
/// instance of a function block). The function block instance is stateful
/// and variables retain values between invocations.
///
/// See section 2.5.2.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionBlockDeclaration {
    pub name: Id,
    pub variables: Vec<VarDecl>,
    pub body: Vec<StmtKind>,
    pub span: SourceSpan,
}

impl Located for FunctionBlockDeclaration {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

/// "Program" Program Organization Unit Declaration.
///
/// Programs assemble the units into a whole that embodies a measurement
/// or control objective.
///
/// See section 2.5.3.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramDeclaration {
    pub name: Id,
    pub variables: Vec<VarDecl>,
    pub body: Vec<StmtKind>,
}

/// Container for a library that contains top-level elements. Libraries are
/// typically represented as a file resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Library {
    pub elements: Vec<LibraryElementKind>,
}

impl Default for Library {
    fn default() -> Self {
        Library::new()
    }
}

impl Library {
    /// Constructs a new empty library.
    pub fn new() -> Self {
        Library {
            elements: Vec::new(),
        }
    }

    /// Extends a library with the contents of another library.
    pub fn extend(mut self, other: Library) -> Self {
        self.elements.extend(other.elements);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_when_underscores_then_accepted() {
        let integer = Integer::new("1_234_567", SourceSpan::default()).unwrap();
        assert_eq!(integer.digits(), "1_234_567");
        assert_eq!(integer.base.radix(), 10);
    }

    #[test]
    fn integer_when_trailing_underscore_then_rejected() {
        assert!(Integer::new("123_", SourceSpan::default()).is_err());
    }

    #[test]
    fn integer_when_hex_lexeme_then_base_from_prefix() {
        let integer = Integer::try_from_lexeme("16#FF_FF", SourceSpan::default()).unwrap();
        assert_eq!(integer.base, IntegerBase::Hex);
        assert_eq!(integer.digits(), "FF_FF");
    }

    #[test]
    fn integer_when_octal_digit_out_of_range_then_rejected() {
        assert!(Integer::octal("8#778", SourceSpan::default()).is_err());
    }

    #[test]
    fn integer_when_binary_lexeme_then_base_from_prefix() {
        let integer = Integer::try_from_lexeme("2#1010", SourceSpan::default()).unwrap();
        assert_eq!(integer.base, IntegerBase::Binary);
        assert_eq!(integer.digits(), "1010");
    }

    #[test]
    fn signed_integer_when_minus_prefix_then_negative() {
        let value = SignedInteger::new("-42", SourceSpan::default()).unwrap();
        assert!(value.is_neg);
        assert_eq!(value.value.digits(), "42");
        assert_eq!(format!("{value}"), "-42");
    }

    #[test]
    fn real_when_exponent_then_accepted() {
        let real = Real::new("3.14_15e+2", SourceSpan::default()).unwrap();
        assert_eq!(real.text, "3.14_15e+2");
    }

    #[test]
    fn real_when_no_fraction_then_rejected() {
        assert!(Real::new("10.", SourceSpan::default()).is_err());
        assert!(Real::new("10", SourceSpan::default()).is_err());
    }
}
