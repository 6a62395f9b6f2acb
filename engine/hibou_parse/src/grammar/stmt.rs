//! Statement productions.

use crate::{ParseError, Parser};
use hibou_diagnostic::ErrorCode;
use hibou_ir::{
    CatchClause, DeclKind, Declarator, ExprKind, ForHead, ForInit, Name, PatternKind, StmtId,
    StmtKind, SwitchCase, TokenKind,
};
use hibou_stack::ensure_sufficient_stack;

impl<'a> Parser<'a> {
    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.advance();
                Ok(self.alloc_stmt(StmtKind::Empty, span))
            }
            // At statement position `{` always opens a block, never an
            // object literal.
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::Var => self.parse_var_stmt(DeclKind::Var),
            TokenKind::Let => self.parse_var_stmt(DeclKind::Let),
            TokenKind::Const => self.parse_var_stmt(DeclKind::Const),
            TokenKind::Function => self.parse_function_decl(false),
            TokenKind::Async if matches!(self.peek_kind(1), TokenKind::Function) => {
                self.advance();
                self.parse_function_decl(true)
            }
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_jump_stmt(true),
            TokenKind::Continue => self.parse_jump_stmt(false),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::Ident(_) if matches!(self.peek_kind(1), TokenKind::Colon) => {
                self.parse_labeled_stmt()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_block_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Block(body), span))
    }

    /// `{ stmt* }`, returning the inner statement list.
    pub(crate) fn parse_block_body(&mut self) -> Result<Vec<StmtId>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(body)
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Expr(expr), span))
    }

    fn parse_var_stmt(&mut self, kind: DeclKind) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        let declarators = self.parse_declarators(kind)?;
        self.consume_semicolon()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::VarDecl { kind, declarators }, span))
    }

    fn parse_declarators(&mut self, kind: DeclKind) -> Result<Vec<Declarator>, ParseError> {
        let mut declarators = Vec::new();
        loop {
            declarators.push(self.parse_declarator(kind)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(declarators)
    }

    fn parse_declarator(&mut self, kind: DeclKind) -> Result<Declarator, ParseError> {
        let pattern = self.parse_binding_pattern()?;
        let init = if self.eat(&TokenKind::Eq) {
            let value = self.parse_assignment_expr()?;
            if let PatternKind::Ident(name) = &self.arena.pattern(pattern).kind {
                let name = *name;
                self.name_anonymous_function(value, name);
            }
            Some(value)
        } else {
            if kind == DeclKind::Const {
                return Err(self.error(
                    ErrorCode::E1002,
                    "missing initializer in `const` declaration",
                ));
            }
            None
        };
        Ok(Declarator { pattern, init })
    }

    /// Give an anonymous function or class the name of the binding it is
    /// assigned to (`let f = function() {}` names the function `f`).
    pub(crate) fn name_anonymous_function(&mut self, value: hibou_ir::ExprId, name: Name) {
        match &self.arena.expr(value).kind {
            ExprKind::Function(func) | ExprKind::Arrow(func) => {
                let func = *func;
                let function = self.arena.function_mut(func);
                if function.name.is_none() {
                    function.name = Some(name);
                }
            }
            _ => {}
        }
    }

    fn parse_function_decl(&mut self, is_async: bool) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let func = self.parse_function_rest(Some(name), is_async)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::FunctionDecl(func), span))
    }

    fn parse_if_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_stmt()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::While { cond, body }, span))
    }

    fn parse_do_while_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        let body = self.parse_stmt()?;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        // The trailing `;` of do-while is always optional.
        self.eat(&TokenKind::Semicolon);
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::DoWhile { body, cond }, span))
    }

    fn parse_for_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen)?;

        // Declaration head: `for (let x ...`.
        let decl_kind = match self.current_kind() {
            TokenKind::Var => Some(DeclKind::Var),
            TokenKind::Let => Some(DeclKind::Let),
            TokenKind::Const => Some(DeclKind::Const),
            _ => None,
        };

        if let Some(kind) = decl_kind {
            let decl_start = self.current_span();
            self.advance();
            let pattern = self.parse_binding_pattern()?;

            if self.eat(&TokenKind::In) {
                let object = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_stmt()?;
                let span = start.merge(self.previous_span());
                return Ok(self.alloc_stmt(
                    StmtKind::ForIn {
                        head: ForHead::Decl { kind, pattern },
                        object,
                        body,
                    },
                    span,
                ));
            }
            if self.eat(&TokenKind::Of) {
                let iterable = self.parse_assignment_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_stmt()?;
                let span = start.merge(self.previous_span());
                return Ok(self.alloc_stmt(
                    StmtKind::ForOf {
                        head: ForHead::Decl { kind, pattern },
                        iterable,
                        body,
                    },
                    span,
                ));
            }

            // Classic loop with a declaration initializer.
            let mut declarators = Vec::new();
            let init = if self.eat(&TokenKind::Eq) {
                let no_in = std::mem::replace(&mut self.no_in, true);
                let value = self.parse_assignment_expr();
                self.no_in = no_in;
                Some(value?)
            } else if kind == DeclKind::Const {
                return Err(self.error(
                    ErrorCode::E1002,
                    "missing initializer in `const` declaration",
                ));
            } else {
                None
            };
            declarators.push(Declarator { pattern, init });
            while self.eat(&TokenKind::Comma) {
                let no_in = std::mem::replace(&mut self.no_in, true);
                let declarator = self.parse_declarator(kind);
                self.no_in = no_in;
                declarators.push(declarator?);
            }
            let decl_span = decl_start.merge(self.previous_span());
            let decl = self.alloc_stmt(StmtKind::VarDecl { kind, declarators }, decl_span);
            self.expect(&TokenKind::Semicolon)?;
            return self.parse_for_tail(start, Some(ForInit::Decl(decl)));
        }

        // Empty head: `for (;;)`.
        if self.eat(&TokenKind::Semicolon) {
            return self.parse_for_tail(start, None);
        }

        // Expression head; `in` suppressed so `for (x in o)` is not parsed
        // as the binary operator.
        let no_in = std::mem::replace(&mut self.no_in, true);
        let head_expr = self.parse_expression();
        self.no_in = no_in;
        let head_expr = head_expr?;

        if self.eat(&TokenKind::In) {
            let pattern = self.expr_to_pattern(head_expr)?;
            let object = self.parse_expression()?;
            self.expect(&TokenKind::RParen)?;
            let body = self.parse_stmt()?;
            let span = start.merge(self.previous_span());
            return Ok(self.alloc_stmt(
                StmtKind::ForIn {
                    head: ForHead::Pattern(pattern),
                    object,
                    body,
                },
                span,
            ));
        }
        if self.eat(&TokenKind::Of) {
            let pattern = self.expr_to_pattern(head_expr)?;
            let iterable = self.parse_assignment_expr()?;
            self.expect(&TokenKind::RParen)?;
            let body = self.parse_stmt()?;
            let span = start.merge(self.previous_span());
            return Ok(self.alloc_stmt(
                StmtKind::ForOf {
                    head: ForHead::Pattern(pattern),
                    iterable,
                    body,
                },
                span,
            ));
        }

        self.expect(&TokenKind::Semicolon)?;
        self.parse_for_tail(start, Some(ForInit::Expr(head_expr)))
    }

    /// Test, update, and body of a classic `for`, after the first `;`.
    fn parse_for_tail(
        &mut self,
        start: hibou_ir::Span,
        init: Option<ForInit>,
    ) -> Result<StmtId, ParseError> {
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            span,
        ))
    }

    fn parse_return_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        // Restricted production: a line terminator after `return` ends the
        // statement with no value.
        let value = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_at_end()
            || self.newline_before()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Return(value), span))
    }

    fn parse_jump_stmt(&mut self, is_break: bool) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        // Restricted production: a label must be on the same line.
        let label = match self.current_kind() {
            TokenKind::Ident(name) if !self.newline_before() => {
                let name = *name;
                self.advance();
                Some(name)
            }
            _ => None,
        };
        self.consume_semicolon()?;
        let span = start.merge(self.previous_span());
        let kind = if is_break {
            StmtKind::Break(label)
        } else {
            StmtKind::Continue(label)
        };
        Ok(self.alloc_stmt(kind, span))
    }

    fn parse_throw_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        if self.newline_before() {
            return Err(self.error(ErrorCode::E1002, "illegal newline after `throw`"));
        }
        let value = self.parse_expression()?;
        self.consume_semicolon()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Throw(value), span))
    }

    fn parse_switch_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let case_start = self.current_span();
            let test = if self.eat(&TokenKind::Case) {
                let test = self.parse_expression()?;
                Some(test)
            } else if self.check(&TokenKind::Default) {
                if seen_default {
                    return Err(self.error(ErrorCode::E1001, "duplicate `default` clause"));
                }
                seen_default = true;
                self.advance();
                None
            } else {
                return Err(self.error(
                    ErrorCode::E1001,
                    format!(
                        "expected `case` or `default`, found {}",
                        self.current_kind().describe()
                    ),
                ));
            };
            self.expect(&TokenKind::Colon)?;
            let mut body = Vec::new();
            while !matches!(
                self.current_kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                body.push(self.parse_stmt()?);
            }
            let span = case_start.merge(self.previous_span());
            cases.push(SwitchCase { test, body, span });
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::Switch {
                discriminant,
                cases,
            },
            span,
        ))
    }

    fn parse_try_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        let block = self.parse_block_body()?;

        let handler = if self.eat(&TokenKind::Catch) {
            let param = if self.eat(&TokenKind::LParen) {
                let param = self.parse_binding_pattern()?;
                self.expect(&TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block_body()?;
            Some(CatchClause { param, body })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block_body()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(
                ErrorCode::E1001,
                "`try` requires a `catch` or `finally` clause",
            ));
        }

        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            span,
        ))
    }

    fn parse_labeled_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let label = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_stmt()?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Labeled { label, body }, span))
    }
}
