//! Statement and pattern nodes.

use super::{ClassId, ExprId, FuncId, PatternId, StmtId};
use crate::{Name, Span};

/// A statement with its source span.
#[derive(Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Declaration kind of a variable statement.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DeclKind {
    /// Function-scoped, hoisted, initialized to `undefined`.
    Var,
    /// Block-scoped, temporal dead zone until initialized.
    Let,
    /// Block-scoped, TDZ, immutable after initialization.
    Const,
}

/// One `pattern = init` declarator of a variable statement.
#[derive(Copy, Clone, Debug)]
pub struct Declarator {
    pub pattern: PatternId,
    pub init: Option<ExprId>,
}

/// Head of a `for..in` / `for..of` loop.
#[derive(Copy, Clone, Debug)]
pub enum ForHead {
    Decl { kind: DeclKind, pattern: PatternId },
    Pattern(PatternId),
}

/// Initializer clause of a classic `for` loop.
#[derive(Copy, Clone, Debug)]
pub enum ForInit {
    Decl(StmtId),
    Expr(ExprId),
}

/// One `case`/`default` clause. Fallthrough is preserved: clause bodies are
/// plain statement lists with no implicit break.
#[derive(Debug)]
pub struct SwitchCase {
    /// `None` for `default`.
    pub test: Option<ExprId>,
    pub body: Vec<StmtId>,
    pub span: Span,
}

/// `catch (param) { ... }`.
#[derive(Debug)]
pub struct CatchClause {
    /// `None` for a bare `catch { ... }`.
    pub param: Option<PatternId>,
    pub body: Vec<StmtId>,
}

#[derive(Debug)]
pub enum StmtKind {
    Expr(ExprId),
    VarDecl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    FunctionDecl(FuncId),
    ClassDecl(ClassId),
    Return(Option<ExprId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    Block(Vec<StmtId>),
    Empty,
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    For {
        init: Option<ForInit>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    ForIn {
        head: ForHead,
        object: ExprId,
        body: StmtId,
    },
    ForOf {
        head: ForHead,
        iterable: ExprId,
        body: StmtId,
    },
    Break(Option<Name>),
    Continue(Option<Name>),
    Labeled {
        label: Name,
        body: StmtId,
    },
    Switch {
        discriminant: ExprId,
        cases: Vec<SwitchCase>,
    },
    Throw(ExprId),
    Try {
        block: Vec<StmtId>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<StmtId>>,
    },
}

/// A binding or assignment pattern.
#[derive(Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }
}

/// Element of an array pattern; `None` means an elision.
#[derive(Copy, Clone, Debug)]
pub struct ArrayPatternElement {
    pub pattern: PatternId,
    pub default: Option<ExprId>,
}

/// One property of an object pattern.
#[derive(Copy, Clone, Debug)]
pub struct ObjectPatternProp {
    pub key: super::PropKey,
    pub value: PatternId,
    pub default: Option<ExprId>,
}

#[derive(Debug)]
pub enum PatternKind {
    Ident(Name),
    Array {
        elements: Vec<Option<ArrayPatternElement>>,
        rest: Option<PatternId>,
    },
    Object {
        props: Vec<ObjectPatternProp>,
        rest: Option<PatternId>,
    },
    /// Member-expression target in assignment patterns (`[a.b] = xs`).
    Member(ExprId),
}
