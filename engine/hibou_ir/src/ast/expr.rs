//! Expression nodes.

use super::{ClassId, ExprId, FuncId, PatternId, StmtId};
use crate::{Name, Span};

/// An expression with its source span.
#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Binary operators (strict evaluation of both operands).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Instanceof,
    In,
}

/// Short-circuiting operators.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

/// Compound assignment operators; `None` is plain `=`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    /// `&&=` — assign only if target is truthy.
    LogicalAnd,
    /// `||=` — assign only if target is falsy.
    LogicalOr,
    /// `??=` — assign only if target is nullish.
    Nullish,
}

/// `++` / `--`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Element of an array literal.
#[derive(Copy, Clone, Debug)]
pub enum ArrayElement {
    /// An elision (`[1, , 3]`).
    Hole,
    Item(ExprId),
    Spread(ExprId),
}

/// A property key in object literals, class bodies, and patterns.
#[derive(Copy, Clone, Debug)]
pub enum PropKey {
    Ident(Name),
    String(Name),
    Number(f64),
    Computed(ExprId),
}

/// What an object-literal property defines.
#[derive(Copy, Clone, Debug)]
pub enum PropValue {
    /// `key: expr` (also covers shorthand after parsing).
    Init(ExprId),
    Method(FuncId),
    Getter(FuncId),
    Setter(FuncId),
}

/// One entry in an object literal.
#[derive(Copy, Clone, Debug)]
pub enum ObjectProp {
    Entry { key: PropKey, value: PropValue },
    Spread(ExprId),
}

/// Call/new argument.
#[derive(Copy, Clone, Debug)]
pub enum Argument {
    Item(ExprId),
    Spread(ExprId),
}

/// Property access form of a member expression.
#[derive(Copy, Clone, Debug)]
pub enum MemberProp {
    Ident(Name),
    Private(Name),
    Computed(ExprId),
}

/// Assignment target: a simple expression target (identifier or member) or
/// a destructuring pattern.
#[derive(Copy, Clone, Debug)]
pub enum AssignTarget {
    Expr(ExprId),
    Pattern(PatternId),
}

#[derive(Debug)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Number(f64),
    String(Name),
    /// `quasis.len() == exprs.len() + 1`, interleaved text/substitution.
    Template {
        quasis: Vec<Name>,
        exprs: Vec<ExprId>,
    },
    Regex {
        source: Name,
        flags: Name,
    },
    Ident(Name),
    This,
    Super,
    Array(Vec<ArrayElement>),
    Object(Vec<ObjectProp>),
    Function(FuncId),
    Arrow(FuncId),
    Class(ClassId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Assign {
        op: AssignOp,
        target: AssignTarget,
        value: ExprId,
    },
    Member {
        object: ExprId,
        property: MemberProp,
        /// `?.` access: short-circuits the chain on nullish objects.
        optional: bool,
    },
    Call {
        callee: ExprId,
        args: Vec<Argument>,
        /// `?.()` call.
        optional: bool,
    },
    New {
        callee: ExprId,
        args: Vec<Argument>,
    },
    /// Root of a member/call chain containing at least one `?.`;
    /// a nullish short-circuit anywhere inside yields `undefined` for the
    /// whole chain.
    OptionalChain(ExprId),
    /// `#field in obj`.
    PrivateIn {
        name: Name,
        object: ExprId,
    },
    Sequence(Vec<ExprId>),
    Await(ExprId),
}

/// How a function binds `this`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ThisMode {
    /// Plain functions and methods: `this` from the call form.
    Dynamic,
    /// Arrow functions: `this` captured lexically.
    Lexical,
}

/// A function parameter.
#[derive(Copy, Clone, Debug)]
pub struct Param {
    pub pattern: PatternId,
    pub default: Option<ExprId>,
    pub rest: bool,
}

/// Body of a function.
#[derive(Debug)]
pub enum FunctionBody {
    /// Block body; statements run with an implicit `undefined` completion.
    Block(Vec<StmtId>),
    /// Arrow expression body; implicit return.
    Expression(ExprId),
}

/// A function definition (declaration, expression, arrow, or method).
#[derive(Debug)]
pub struct Function {
    /// `None` for anonymous functions until naming assigns one.
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub this_mode: ThisMode,
    pub is_async: bool,
    pub span: Span,
}

impl Function {
    /// `Function.length`: count of parameters before the first default or
    /// rest parameter.
    pub fn expected_arg_count(&self) -> usize {
        self.params
            .iter()
            .take_while(|p| p.default.is_none() && !p.rest)
            .count()
    }
}

/// Key of a class member.
#[derive(Copy, Clone, Debug)]
pub enum ClassKey {
    Public(PropKey),
    Private(Name),
}

/// Kinds of class members.
#[derive(Debug)]
pub enum ClassMemberKind {
    Constructor(FuncId),
    Method(FuncId),
    Getter(FuncId),
    Setter(FuncId),
    Field(Option<ExprId>),
    /// `static { ... }` — runs once at class creation in its own scope.
    StaticBlock(Vec<StmtId>),
}

/// One member of a class body.
#[derive(Debug)]
pub struct ClassMember {
    pub key: ClassKey,
    pub kind: ClassMemberKind,
    pub is_static: bool,
    pub span: Span,
}

/// A class definition.
#[derive(Debug)]
pub struct Class {
    pub name: Option<Name>,
    pub parent: Option<ExprId>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}
