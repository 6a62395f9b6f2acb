//! Recursive descent parser for the hibou engine.
//!
//! Produces a flat [`Program`] with nodes in a [`ProgramArena`]. One
//! precedence level per method on the expression side; automatic semicolon
//! insertion is driven by the `newline_before` flag the lexer records on
//! each token.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use hibou_diagnostic::{Diagnostic, ErrorCode};
use hibou_ir::{
    Expr, ExprId, ExprKind, Name, Pattern, PatternId, PatternKind, Program, ProgramArena, Span,
    Stmt, StmtId, StmtKind, StringInterner, Token, TokenKind, TokenList,
};
use rustc_hash::FxHashSet;

/// Parse source text to a program.
///
/// Lex and parse errors are both fatal: the program is only returned when
/// the whole unit is well-formed.
pub fn parse_source(source: &str, interner: &StringInterner) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, lex_errors) = hibou_lexer::tokenize(source, interner);
    if !lex_errors.is_empty() {
        return Err(lex_errors.iter().map(|e| e.to_diagnostic()).collect());
    }
    let (program, parse_errors) = Parser::new(&tokens, interner).parse_program();
    if parse_errors.is_empty() {
        Ok(program)
    } else {
        Err(parse_errors.iter().map(|e| e.to_diagnostic()).collect())
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ProgramArena,
    errors: Vec<ParseError>,
    /// Expressions produced by an explicit `( ... )` group. Consulted when
    /// rejecting unparenthesized `??` mixed with `&&`/`||`.
    parenthesized: FxHashSet<ExprId>,
    /// Suppresses the `in` operator while parsing a classic `for` head.
    no_in: bool,
    /// Nesting depth of class method bodies; `super` is only valid inside.
    class_method_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ProgramArena::new(),
            errors: Vec::new(),
            parenthesized: FxHashSet::default(),
            no_in: false,
            class_method_depth: 0,
        }
    }

    // Cursor delegation.

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn newline_before(&self) -> bool {
        self.cursor.newline_before()
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> &'a TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident()
    }

    #[inline]
    fn expect_property_name(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_property_name()
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    // Arena shortcuts.

    #[inline]
    fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    #[inline]
    fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    #[inline]
    fn alloc_pattern(&mut self, kind: PatternKind, span: Span) -> PatternId {
        self.arena.alloc_pattern(Pattern::new(kind, span))
    }

    #[inline]
    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.expr(id).span
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>) -> ParseError {
        ParseError::new(code, message, self.current_span())
    }

    /// Consume a statement terminator, applying automatic semicolon
    /// insertion: a `;` is inserted before a line terminator, a `}`, or
    /// end of input.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_at_end()
            || self.newline_before()
        {
            Ok(())
        } else {
            Err(self.error(
                ErrorCode::E1001,
                format!("expected `;`, found {}", self.current_kind().describe()),
            ))
        }
    }

    /// Skip to the next likely statement boundary after an error.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(self.current_kind(), TokenKind::Semicolon) {
                self.advance();
                return;
            }
            match self.current_kind() {
                TokenKind::Var
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::Function
                | TokenKind::Class
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Switch
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Parse a whole program.
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut body = Vec::new();
        let start = self.current_span();
        while !self.is_at_end() {
            match self.parse_stmt() {
                Ok(stmt) => {
                    tracing::trace!(span = %self.arena.stmt(stmt).span, "top-level statement");
                    body.push(stmt);
                }
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }
        let span = start.merge(self.previous_span());
        (
            Program {
                body,
                arena: self.arena,
                span,
            },
            self.errors,
        )
    }
}
