//! Expression productions, one method per precedence level.

use crate::{ParseError, Parser};
use hibou_diagnostic::ErrorCode;
use hibou_ir::{
    Argument, ArrayElement, AssignOp, AssignTarget, BinaryOp, ExprId, ExprKind, LogicalOp,
    MemberProp, ObjectProp, PropKey, PropValue, TemplateSegment, TokenKind, TokenList, UnaryOp,
    UpdateOp,
};
use hibou_stack::ensure_sufficient_stack;

fn assign_op_of(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::StarStarEq => AssignOp::Exp,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::AmpAmpEq => AssignOp::LogicalAnd,
        TokenKind::PipePipeEq => AssignOp::LogicalOr,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    /// Full expression, including comma sequences.
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        let first = self.parse_assignment_expr()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = self.expr_span(first);
        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_assignment_expr()?);
        }
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::Sequence(exprs), span))
    }

    /// Assignment expression (no comma operator).
    pub(crate) fn parse_assignment_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<ExprId, ParseError> {
        // Arrow functions are detected by lookahead, not backtracking.
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::Of
            | TokenKind::Get
            | TokenKind::Set
            | TokenKind::Static
                if matches!(self.peek_kind(1), TokenKind::Arrow) =>
            {
                return self.parse_arrow_from_ident(false);
            }
            TokenKind::Async
                if matches!(self.peek_kind(1), TokenKind::Ident(_))
                    && matches!(self.peek_kind(2), TokenKind::Arrow) =>
            {
                self.advance();
                return self.parse_arrow_from_ident(true);
            }
            TokenKind::Async
                if matches!(self.peek_kind(1), TokenKind::LParen)
                    && self.cursor.paren_group_is_arrow_params(1) =>
            {
                self.advance();
                return self.parse_arrow_from_parens(true);
            }
            TokenKind::LParen if self.cursor.paren_group_is_arrow_params(0) => {
                return self.parse_arrow_from_parens(false);
            }
            _ => {}
        }

        let left = self.parse_conditional()?;

        let Some(op) = assign_op_of(self.current_kind()) else {
            return Ok(left);
        };
        self.advance();

        let target = if op == AssignOp::Assign {
            self.expr_to_assign_target(left)?
        } else {
            // Compound assignment needs a simple target.
            match &self.arena.expr(left).kind {
                ExprKind::Ident(_) | ExprKind::Member { .. } => AssignTarget::Expr(left),
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        "invalid assignment target",
                        self.expr_span(left),
                    ));
                }
            }
        };

        let value = self.parse_assignment_expr()?;
        if op == AssignOp::Assign {
            if let ExprKind::Ident(name) = &self.arena.expr(left).kind {
                let name = *name;
                self.name_anonymous_function(value, name);
            }
        }
        let span = self.expr_span(left).merge(self.expr_span(value));
        Ok(self.alloc_expr(ExprKind::Assign { op, target, value }, span))
    }

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_nullish()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_branch = self.parse_assignment_expr()?;
        self.expect(&TokenKind::Colon)?;
        let else_branch = self.parse_assignment_expr()?;
        let span = self.expr_span(cond).merge(self.expr_span(else_branch));
        Ok(self.alloc_expr(
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `??`. Mixing with `&&`/`||` requires parentheses.
    fn parse_nullish(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_logical_or()?;
        if self.check(&TokenKind::QuestionQuestion) {
            self.check_nullish_operand(left)?;
        }
        while self.eat(&TokenKind::QuestionQuestion) {
            let right = self.parse_logical_or()?;
            self.check_nullish_operand(right)?;
            let span = self.expr_span(left).merge(self.expr_span(right));
            left = self.alloc_expr(
                ExprKind::Logical {
                    op: LogicalOp::Nullish,
                    left,
                    right,
                },
                span,
            );
        }
        Ok(left)
    }

    fn check_nullish_operand(&self, operand: ExprId) -> Result<(), ParseError> {
        if let ExprKind::Logical {
            op: LogicalOp::And | LogicalOp::Or,
            ..
        } = &self.arena.expr(operand).kind
        {
            if !self.parenthesized.contains(&operand) {
                return Err(ParseError::new(
                    ErrorCode::E1006,
                    "`??` cannot be mixed with `&&` or `||` without parentheses",
                    self.expr_span(operand),
                ));
            }
        }
        Ok(())
    }

    fn parse_logical_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_logical_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_logical_and()?;
            let span = self.expr_span(left).merge(self.expr_span(right));
            left = self.alloc_expr(
                ExprKind::Logical {
                    op: LogicalOp::Or,
                    left,
                    right,
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_bit_or()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_bit_or()?;
            let span = self.expr_span(left).merge(self.expr_span(right));
            left = self.alloc_expr(
                ExprKind::Logical {
                    op: LogicalOp::And,
                    left,
                    right,
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_bit_xor()?;
        while self.eat(&TokenKind::Pipe) {
            let right = self.parse_bit_xor()?;
            left = self.binary(BinaryOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_bit_and()?;
        while self.eat(&TokenKind::Caret) {
            let right = self.parse_bit_and()?;
            left = self.binary(BinaryOp::BitXor, left, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::Amp) {
            let right = self.parse_equality()?;
            left = self.binary(BinaryOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        // `#field in obj` brand check.
        if let TokenKind::PrivateIdent(name) = self.current_kind() {
            if matches!(self.peek_kind(1), TokenKind::In) && !self.no_in {
                let name = *name;
                let start = self.current_span();
                self.advance();
                self.advance();
                let object = self.parse_shift()?;
                let span = start.merge(self.expr_span(object));
                return Ok(self.alloc_expr(ExprKind::PrivateIn { name, object }, span));
            }
        }

        let mut left = self.parse_shift()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                TokenKind::Instanceof => BinaryOp::Instanceof,
                TokenKind::In if !self.no_in => BinaryOp::In,
                _ => break,
            };
            self.advance();
            let right = self.parse_shift()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                TokenKind::UShr => BinaryOp::UShr,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_exponent()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_exponent()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// `**` is right-associative.
    fn parse_exponent(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_unary()?;
        if self.eat(&TokenKind::StarStar) {
            let right = self.parse_exponent()?;
            return Ok(self.binary(BinaryOp::Exp, left, right));
        }
        Ok(left)
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.expr_span(left).merge(self.expr_span(right));
        self.alloc_expr(ExprKind::Binary { op, left, right }, span)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.expr_span(operand));
            return Ok(self.alloc_expr(ExprKind::Unary { op, operand }, span));
        }

        match self.current_kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if matches!(self.current_kind(), TokenKind::PlusPlus) {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                self.advance();
                let target = self.parse_unary()?;
                self.check_update_target(target)?;
                let span = start.merge(self.expr_span(target));
                Ok(self.alloc_expr(
                    ExprKind::Update {
                        op,
                        prefix: true,
                        target,
                    },
                    span,
                ))
            }
            TokenKind::Await => {
                self.advance();
                let operand = self.parse_unary()?;
                let span = start.merge(self.expr_span(operand));
                Ok(self.alloc_expr(ExprKind::Await(operand), span))
            }
            _ => self.parse_postfix(),
        }
    }

    fn check_update_target(&self, target: ExprId) -> Result<(), ParseError> {
        match &self.arena.expr(target).kind {
            ExprKind::Ident(_) | ExprKind::Member { .. } => Ok(()),
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                "invalid increment/decrement target",
                self.expr_span(target),
            )),
        }
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let expr = self.parse_call_or_member()?;
        // Restricted production: no line terminator before postfix `++`/`--`.
        let op = match self.current_kind() {
            TokenKind::PlusPlus if !self.newline_before() => UpdateOp::Increment,
            TokenKind::MinusMinus if !self.newline_before() => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        self.check_update_target(expr)?;
        self.advance();
        let span = self.expr_span(expr).merge(self.previous_span());
        Ok(self.alloc_expr(
            ExprKind::Update {
                op,
                prefix: false,
                target: expr,
            },
            span,
        ))
    }

    /// Member/call chain. A chain containing `?.` anywhere is wrapped in
    /// an `OptionalChain` root so a nullish short-circuit skips the whole
    /// rest of the chain.
    pub(crate) fn parse_call_or_member(&mut self) -> Result<ExprId, ParseError> {
        let mut saw_optional = false;
        let expr = self.parse_chain(&mut saw_optional, true)?;
        if saw_optional {
            let span = self.expr_span(expr);
            Ok(self.alloc_expr(ExprKind::OptionalChain(expr), span))
        } else {
            Ok(expr)
        }
    }

    fn parse_chain(
        &mut self,
        saw_optional: &mut bool,
        allow_call: bool,
    ) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    let span = start.merge(self.previous_span());
                    expr = self.alloc_expr(
                        ExprKind::Member {
                            object: expr,
                            property,
                            optional: false,
                        },
                        span,
                    );
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    *saw_optional = true;
                    match self.current_kind() {
                        TokenKind::LParen if allow_call => {
                            let args = self.parse_args()?;
                            let span = start.merge(self.previous_span());
                            expr = self.alloc_expr(
                                ExprKind::Call {
                                    callee: expr,
                                    args,
                                    optional: true,
                                },
                                span,
                            );
                        }
                        TokenKind::LBracket => {
                            self.advance();
                            let index = self.parse_expression()?;
                            self.expect(&TokenKind::RBracket)?;
                            let span = start.merge(self.previous_span());
                            expr = self.alloc_expr(
                                ExprKind::Member {
                                    object: expr,
                                    property: MemberProp::Computed(index),
                                    optional: true,
                                },
                                span,
                            );
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            let span = start.merge(self.previous_span());
                            expr = self.alloc_expr(
                                ExprKind::Member {
                                    object: expr,
                                    property,
                                    optional: true,
                                },
                                span,
                            );
                        }
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let no_in = std::mem::replace(&mut self.no_in, false);
                    let index = self.parse_expression();
                    self.no_in = no_in;
                    let index = index?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = start.merge(self.previous_span());
                    expr = self.alloc_expr(
                        ExprKind::Member {
                            object: expr,
                            property: MemberProp::Computed(index),
                            optional: false,
                        },
                        span,
                    );
                }
                TokenKind::LParen if allow_call => {
                    let args = self.parse_args()?;
                    let span = start.merge(self.previous_span());
                    expr = self.alloc_expr(
                        ExprKind::Call {
                            callee: expr,
                            args,
                            optional: false,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_member_name(&mut self) -> Result<MemberProp, ParseError> {
        if let TokenKind::PrivateIdent(name) = self.current_kind() {
            let name = *name;
            self.advance();
            return Ok(MemberProp::Private(name));
        }
        Ok(MemberProp::Ident(self.expect_property_name()?))
    }

    /// `new Callee(args)`. The callee is a member chain without calls, so
    /// `new a.b.C()` constructs `a.b.C`. Optional chaining is not allowed
    /// in a `new` callee.
    fn parse_new(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::New)?;
        let mut saw_optional = false;
        let callee = self.parse_chain(&mut saw_optional, false)?;
        if saw_optional {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "optional chaining is not allowed in a `new` callee",
                self.expr_span(callee),
            ));
        }
        let args = if self.check(&TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::New { callee, args }, span))
    }

    pub(crate) fn parse_args(&mut self) -> Result<Vec<Argument>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let no_in = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_args_inner();
        self.no_in = no_in;
        result
    }

    fn parse_args_inner(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            if self.eat(&TokenKind::DotDotDot) {
                args.push(Argument::Spread(self.parse_assignment_expr()?));
            } else {
                args.push(Argument::Item(self.parse_assignment_expr()?));
            }
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current();
        let span = token.span;
        match &token.kind {
            TokenKind::Number(value) => {
                let value = *value;
                self.advance();
                Ok(self.alloc_expr(ExprKind::Number(value), span))
            }
            TokenKind::String(name) => {
                let name = *name;
                self.advance();
                Ok(self.alloc_expr(ExprKind::String(name), span))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.alloc_expr(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.alloc_expr(ExprKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.alloc_expr(ExprKind::Null, span))
            }
            TokenKind::This => {
                self.advance();
                Ok(self.alloc_expr(ExprKind::This, span))
            }
            TokenKind::Super => {
                if self.class_method_depth == 0 {
                    return Err(self.error(
                        ErrorCode::E1009,
                        "`super` is only valid inside a class method",
                    ));
                }
                self.advance();
                Ok(self.alloc_expr(ExprKind::Super, span))
            }
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Ok(self.alloc_expr(ExprKind::Ident(name), span))
            }
            TokenKind::Async if matches!(self.peek_kind(1), TokenKind::Function) => {
                self.advance();
                self.advance();
                self.parse_function_expr(true, span)
            }
            kind @ (TokenKind::Of
            | TokenKind::Get
            | TokenKind::Set
            | TokenKind::Static
            | TokenKind::Async) => {
                let name = self.interner().intern(kind.keyword_text().unwrap_or(""));
                self.advance();
                Ok(self.alloc_expr(ExprKind::Ident(name), span))
            }
            TokenKind::Regex { source, flags } => {
                let (source, flags) = (*source, *flags);
                self.advance();
                Ok(self.alloc_expr(ExprKind::Regex { source, flags }, span))
            }
            TokenKind::Template(segments) => self.parse_template(segments),
            TokenKind::LParen => {
                self.advance();
                let no_in = std::mem::replace(&mut self.no_in, false);
                let expr = self.parse_expression();
                self.no_in = no_in;
                let expr = expr?;
                self.expect(&TokenKind::RParen)?;
                self.parenthesized.insert(expr);
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::Function => {
                self.advance();
                self.parse_function_expr(false, span)
            }
            TokenKind::Class => {
                let class = self.parse_class_tail()?;
                let span = span.merge(self.previous_span());
                Ok(self.alloc_expr(ExprKind::Class(class), span))
            }
            other => Err(self.error(
                ErrorCode::E1002,
                format!("expected expression, found {}", other.describe()),
            )),
        }
    }

    fn parse_template(&mut self, segments: &'a [TemplateSegment]) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        self.advance();
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        for segment in segments {
            match segment {
                TemplateSegment::Text(name) => quasis.push(*name),
                TemplateSegment::Substitution(tokens) => {
                    exprs.push(self.parse_substream(tokens)?);
                }
            }
        }
        debug_assert_eq!(quasis.len(), exprs.len() + 1);
        Ok(self.alloc_expr(ExprKind::Template { quasis, exprs }, span))
    }

    /// Parse an expression out of a template substitution's token stream.
    fn parse_substream(&mut self, tokens: &'a TokenList) -> Result<ExprId, ParseError> {
        let interner = self.interner();
        let saved = std::mem::replace(&mut self.cursor, crate::Cursor::new(tokens, interner));
        let result = self.parse_expression().and_then(|expr| {
            if self.is_at_end() {
                Ok(expr)
            } else {
                Err(self.error(
                    ErrorCode::E1001,
                    format!(
                        "unexpected {} in template substitution",
                        self.current_kind().describe()
                    ),
                ))
            }
        });
        self.cursor = saved;
        result
    }

    fn parse_array_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.check(&TokenKind::Comma) {
                // Elision: `[1, , 3]`.
                elements.push(ArrayElement::Hole);
                self.advance();
                continue;
            }
            if self.eat(&TokenKind::DotDotDot) {
                elements.push(ArrayElement::Spread(self.parse_assignment_expr()?));
            } else {
                elements.push(ArrayElement::Item(self.parse_assignment_expr()?));
            }
            if !self.check(&TokenKind::RBracket) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::Array(elements), span))
    }

    fn parse_object_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(&TokenKind::DotDotDot) {
                props.push(ObjectProp::Spread(self.parse_assignment_expr()?));
            } else {
                props.push(self.parse_object_prop()?);
            }
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_expr(ExprKind::Object(props), span))
    }

    fn parse_object_prop(&mut self) -> Result<ObjectProp, ParseError> {
        // `get name() {}` / `set name(v) {}`, unless `get`/`set` is itself
        // the property name.
        let accessor = match self.current_kind() {
            TokenKind::Get if self.starts_accessor_body() => Some(true),
            TokenKind::Set if self.starts_accessor_body() => Some(false),
            _ => None,
        };
        if let Some(is_getter) = accessor {
            self.advance();
            let key = self.parse_prop_key()?;
            let func = self.parse_method_rest(false)?;
            let value = if is_getter {
                PropValue::Getter(func)
            } else {
                PropValue::Setter(func)
            };
            return Ok(ObjectProp::Entry { key, value });
        }

        let is_async = matches!(self.current_kind(), TokenKind::Async)
            && !matches!(
                self.peek_kind(1),
                TokenKind::Colon
                    | TokenKind::Comma
                    | TokenKind::RBrace
                    | TokenKind::LParen
                    | TokenKind::Eq
            );
        if is_async {
            self.advance();
        }

        let key = self.parse_prop_key()?;

        if self.check(&TokenKind::LParen) {
            let func = self.parse_method_rest(is_async)?;
            return Ok(ObjectProp::Entry {
                key,
                value: PropValue::Method(func),
            });
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assignment_expr()?;
            if let PropKey::Ident(name) = key {
                self.name_anonymous_function(value, name);
            }
            return Ok(ObjectProp::Entry {
                key,
                value: PropValue::Init(value),
            });
        }

        // Shorthand `{ a }` (and `{ a = dflt }`, valid only when the object
        // literal is converted to a destructuring pattern).
        let PropKey::Ident(name) = key else {
            return Err(self.error(
                ErrorCode::E1001,
                format!("expected `:`, found {}", self.current_kind().describe()),
            ));
        };
        let span = self.previous_span();
        let ident = self.alloc_expr(ExprKind::Ident(name), span);
        if self.eat(&TokenKind::Eq) {
            let default = self.parse_assignment_expr()?;
            let span = span.merge(self.expr_span(default));
            let value = self.alloc_expr(
                ExprKind::Assign {
                    op: AssignOp::Assign,
                    target: AssignTarget::Expr(ident),
                    value: default,
                },
                span,
            );
            return Ok(ObjectProp::Entry {
                key,
                value: PropValue::Init(value),
            });
        }
        Ok(ObjectProp::Entry {
            key,
            value: PropValue::Init(ident),
        })
    }

    /// Whether a `get`/`set` at the cursor introduces an accessor (rather
    /// than being a plain property named `get`/`set`).
    fn starts_accessor_body(&self) -> bool {
        !matches!(
            self.peek_kind(1),
            TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::LParen
                | TokenKind::Eq
                | TokenKind::Eof
        )
    }

    pub(crate) fn parse_prop_key(&mut self) -> Result<PropKey, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Ok(PropKey::Ident(name))
            }
            TokenKind::String(name) => {
                let name = *name;
                self.advance();
                Ok(PropKey::String(name))
            }
            TokenKind::Number(value) => {
                let value = *value;
                self.advance();
                Ok(PropKey::Number(value))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = self.parse_assignment_expr()?;
                self.expect(&TokenKind::RBracket)?;
                Ok(PropKey::Computed(expr))
            }
            kind => match kind.keyword_text() {
                Some(text) => {
                    let name = self.interner().intern(text);
                    self.advance();
                    Ok(PropKey::Ident(name))
                }
                None => Err(self.error(
                    ErrorCode::E1003,
                    format!("expected property name, found {}", kind.describe()),
                )),
            },
        }
    }
}
