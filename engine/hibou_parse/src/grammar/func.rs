//! Function, method, and arrow-function productions.

use crate::{ParseError, Parser};
use hibou_diagnostic::ErrorCode;
use hibou_ir::{
    ExprId, ExprKind, FuncId, Function, FunctionBody, Name, Param, PatternKind, Span, ThisMode,
    TokenKind,
};

impl<'a> Parser<'a> {
    /// Function expression tail; the `function` keyword (and `async`) has
    /// been consumed, `start` covers it.
    pub(crate) fn parse_function_expr(
        &mut self,
        is_async: bool,
        start: Span,
    ) -> Result<ExprId, ParseError> {
        let name = match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let func = self.parse_function_rest(name, is_async)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::Function(func), span))
    }

    /// Parameter list and block body; cursor at `(`.
    pub(crate) fn parse_function_rest(
        &mut self,
        name: Option<Name>,
        is_async: bool,
    ) -> Result<FuncId, ParseError> {
        let start = self.current_span();
        let params = self.parse_params()?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous_span());
        Ok(self.arena.alloc_function(Function {
            name,
            params,
            body: FunctionBody::Block(body),
            this_mode: ThisMode::Dynamic,
            is_async,
            span,
        }))
    }

    /// Method tail (object literals and classes); cursor at `(`.
    pub(crate) fn parse_method_rest(&mut self, is_async: bool) -> Result<FuncId, ParseError> {
        self.parse_function_rest(None, is_async)
    }

    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.eat(&TokenKind::DotDotDot) {
                let pattern = self.parse_binding_pattern()?;
                params.push(Param {
                    pattern,
                    default: None,
                    rest: true,
                });
                if !self.check(&TokenKind::RParen) {
                    return Err(
                        self.error(ErrorCode::E1001, "rest parameter must be the last parameter")
                    );
                }
                break;
            }
            let pattern = self.parse_binding_pattern()?;
            let default = if self.eat(&TokenKind::Eq) {
                Some(self.parse_assignment_expr()?)
            } else {
                None
            };
            params.push(Param {
                pattern,
                default,
                rest: false,
            });
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `x => body` (single-identifier parameter).
    pub(crate) fn parse_arrow_from_ident(&mut self, is_async: bool) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let name = self.expect_ident()?;
        let pattern = self.alloc_pattern(PatternKind::Ident(name), start);
        self.expect(&TokenKind::Arrow)?;
        let params = vec![Param {
            pattern,
            default: None,
            rest: false,
        }];
        self.parse_arrow_body(params, is_async, start)
    }

    /// `(params) => body`.
    pub(crate) fn parse_arrow_from_parens(&mut self, is_async: bool) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let params = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        self.parse_arrow_body(params, is_async, start)
    }

    fn parse_arrow_body(
        &mut self,
        params: Vec<Param>,
        is_async: bool,
        start: Span,
    ) -> Result<ExprId, ParseError> {
        let body = if self.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block_body()?)
        } else {
            FunctionBody::Expression(self.parse_assignment_expr()?)
        };
        let span = start.merge(self.previous_span());
        let func = self.arena.alloc_function(Function {
            name: None,
            params,
            body,
            this_mode: ThisMode::Lexical,
            is_async,
            span,
        });
        Ok(self.alloc_expr(ExprKind::Arrow(func), span))
    }
}
