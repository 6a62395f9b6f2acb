//! Flat arena AST.
//!
//! Nodes live in typed vectors inside [`ProgramArena`] and reference each
//! other through 4-byte ids. The parser allocates, the evaluator walks.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use crate::Span;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) const fn from_index(idx: usize) -> Self {
                $name(idx as u32)
            }
        }
    };
}

arena_id!(
    /// Id of an [`Expr`] in the arena.
    ExprId
);
arena_id!(
    /// Id of a [`Stmt`] in the arena.
    StmtId
);
arena_id!(
    /// Id of a [`Pattern`] in the arena.
    PatternId
);
arena_id!(
    /// Id of a [`Function`] in the arena.
    FuncId
);
arena_id!(
    /// Id of a [`Class`] in the arena.
    ClassId
);

/// Arena owning every AST node of one parse.
#[derive(Debug, Default)]
pub struct ProgramArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    patterns: Vec<Pattern>,
    functions: Vec<Function>,
    classes: Vec<Class>,
}

impl ProgramArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_index(self.exprs.len());
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::from_index(self.stmts.len());
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = PatternId::from_index(self.patterns.len());
        self.patterns.push(pattern);
        id
    }

    pub fn alloc_function(&mut self, function: Function) -> FuncId {
        let id = FuncId::from_index(self.functions.len());
        self.functions.push(function);
        id
    }

    pub fn alloc_class(&mut self, class: Class) -> ClassId {
        let id = ClassId::from_index(self.classes.len());
        self.classes.push(class);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    /// Rename an anonymous function after the fact.
    ///
    /// Used by the parser for `let f = function() {}` style declarations,
    /// which name the function from the binding identifier.
    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

/// A parsed program: top-level statements plus the arena they live in.
#[derive(Debug)]
pub struct Program {
    pub body: Vec<StmtId>,
    pub arena: ProgramArena,
    pub span: Span,
}
