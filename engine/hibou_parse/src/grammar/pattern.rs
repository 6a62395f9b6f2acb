//! Binding patterns and expression-to-pattern conversion.
//!
//! Destructuring assignment (`[a, b] = xs`) is parsed with a cover
//! grammar: the left side is first parsed as an ordinary array or object
//! literal, then converted to a pattern when `=` is seen.

use crate::{ParseError, Parser};
use hibou_diagnostic::ErrorCode;
use hibou_ir::{
    ArrayElement, ArrayPatternElement, AssignOp, AssignTarget, ExprId, ExprKind, ObjectPatternProp,
    ObjectProp, PatternId, PatternKind, PropKey, PropValue, Span, TokenKind,
};

impl<'a> Parser<'a> {
    pub(crate) fn parse_binding_pattern(&mut self) -> Result<PatternId, ParseError> {
        match self.current_kind() {
            TokenKind::LBracket => self.parse_array_binding(),
            TokenKind::LBrace => self.parse_object_binding(),
            _ => {
                let span = self.current_span();
                let name = self.expect_ident()?;
                Ok(self.alloc_pattern(PatternKind::Ident(name), span))
            }
        }
    }

    fn parse_array_binding(&mut self) -> Result<PatternId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        let mut rest = None;
        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.check(&TokenKind::Comma) {
                elements.push(None);
                self.advance();
                continue;
            }
            if self.eat(&TokenKind::DotDotDot) {
                rest = Some(self.parse_binding_pattern()?);
                if !self.check(&TokenKind::RBracket) {
                    return Err(
                        self.error(ErrorCode::E1001, "rest element must be the last element")
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
            elements.push(Some(ArrayPatternElement { pattern, default }));
            if !self.check(&TokenKind::RBracket) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_pattern(PatternKind::Array { elements, rest }, span))
    }

    fn parse_object_binding(&mut self) -> Result<PatternId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        let mut rest = None;
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(&TokenKind::DotDotDot) {
                let span = self.current_span();
                let name = self.expect_ident()?;
                rest = Some(self.alloc_pattern(PatternKind::Ident(name), span));
                if !self.check(&TokenKind::RBrace) {
                    return Err(
                        self.error(ErrorCode::E1001, "rest property must be the last property")
                    );
                }
                break;
            }
            let key = self.parse_prop_key()?;
            let value = if self.eat(&TokenKind::Colon) {
                self.parse_binding_pattern()?
            } else {
                // Shorthand `{ a }` binds the property to a same-named
                // variable.
                let PropKey::Ident(name) = key else {
                    return Err(self.error(
                        ErrorCode::E1003,
                        "shorthand pattern property must be an identifier",
                    ));
                };
                self.alloc_pattern(PatternKind::Ident(name), self.previous_span())
            };
            let default = if self.eat(&TokenKind::Eq) {
                Some(self.parse_assignment_expr()?)
            } else {
                None
            };
            props.push(ObjectPatternProp {
                key,
                value,
                default,
            });
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_pattern(PatternKind::Object { props, rest }, span))
    }

    /// Convert a parsed expression into an assignment target.
    pub(crate) fn expr_to_assign_target(
        &mut self,
        expr: ExprId,
    ) -> Result<AssignTarget, ParseError> {
        match &self.arena.expr(expr).kind {
            ExprKind::Ident(_) | ExprKind::Member { .. } => Ok(AssignTarget::Expr(expr)),
            ExprKind::Array(_) | ExprKind::Object(_) => {
                Ok(AssignTarget::Pattern(self.expr_to_pattern(expr)?))
            }
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                "invalid assignment target",
                self.expr_span(expr),
            )),
        }
    }

    /// Reinterpret an expression as a destructuring pattern (cover grammar
    /// resolution for `[a, b] = xs` and `for ({x} of xs)`).
    pub(crate) fn expr_to_pattern(&mut self, expr: ExprId) -> Result<PatternId, ParseError> {
        let span = self.expr_span(expr);
        match &self.arena.expr(expr).kind {
            ExprKind::Ident(name) => {
                let name = *name;
                Ok(self.alloc_pattern(PatternKind::Ident(name), span))
            }
            ExprKind::Member { .. } => Ok(self.alloc_pattern(PatternKind::Member(expr), span)),
            ExprKind::Array(elements) => {
                let elements = elements.clone();
                self.array_literal_to_pattern(&elements, span)
            }
            ExprKind::Object(props) => {
                let props = props.clone();
                self.object_literal_to_pattern(&props, span)
            }
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                "invalid destructuring target",
                span,
            )),
        }
    }

    /// Split a parsed `target = default` expression back into its parts;
    /// other expressions convert with no default.
    fn expr_to_pattern_with_default(
        &mut self,
        expr: ExprId,
    ) -> Result<(PatternId, Option<ExprId>), ParseError> {
        if let ExprKind::Assign {
            op: AssignOp::Assign,
            target,
            value,
        } = &self.arena.expr(expr).kind
        {
            let (target, value) = (*target, *value);
            let pattern = match target {
                AssignTarget::Pattern(pattern) => pattern,
                AssignTarget::Expr(target_expr) => self.expr_to_pattern(target_expr)?,
            };
            return Ok((pattern, Some(value)));
        }
        Ok((self.expr_to_pattern(expr)?, None))
    }

    fn array_literal_to_pattern(
        &mut self,
        elements: &[ArrayElement],
        span: Span,
    ) -> Result<PatternId, ParseError> {
        let mut converted = Vec::new();
        let mut rest = None;
        for (idx, element) in elements.iter().enumerate() {
            match element {
                ArrayElement::Hole => converted.push(None),
                ArrayElement::Item(item) => {
                    let (pattern, default) = self.expr_to_pattern_with_default(*item)?;
                    converted.push(Some(ArrayPatternElement { pattern, default }));
                }
                ArrayElement::Spread(target) => {
                    if idx + 1 != elements.len() {
                        return Err(ParseError::new(
                            ErrorCode::E1005,
                            "rest element must be the last element",
                            self.expr_span(*target),
                        ));
                    }
                    rest = Some(self.expr_to_pattern(*target)?);
                }
            }
        }
        Ok(self.alloc_pattern(
            PatternKind::Array {
                elements: converted,
                rest,
            },
            span,
        ))
    }

    fn object_literal_to_pattern(
        &mut self,
        props: &[ObjectProp],
        span: Span,
    ) -> Result<PatternId, ParseError> {
        let mut converted = Vec::new();
        let mut rest = None;
        for (idx, prop) in props.iter().enumerate() {
            match prop {
                ObjectProp::Entry {
                    key,
                    value: PropValue::Init(value),
                } => {
                    let (pattern, default) = self.expr_to_pattern_with_default(*value)?;
                    converted.push(ObjectPatternProp {
                        key: *key,
                        value: pattern,
                        default,
                    });
                }
                ObjectProp::Entry { .. } => {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        "invalid destructuring target",
                        span,
                    ));
                }
                ObjectProp::Spread(target) => {
                    if idx + 1 != props.len() {
                        return Err(ParseError::new(
                            ErrorCode::E1005,
                            "rest property must be the last property",
                            self.expr_span(*target),
                        ));
                    }
                    rest = Some(self.expr_to_pattern(*target)?);
                }
            }
        }
        Ok(self.alloc_pattern(
            PatternKind::Object {
                props: converted,
                rest,
            },
            span,
        ))
    }
}
