//! Class productions.

use crate::{ParseError, Parser};
use hibou_diagnostic::ErrorCode;
use hibou_ir::{
    Class, ClassId, ClassKey, ClassMember, ClassMemberKind, Name, PropKey, StmtId, StmtKind,
    TokenKind,
};

impl<'a> Parser<'a> {
    pub(crate) fn parse_class_decl(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let class = self.parse_class_tail()?;
        if self.arena.class(class).name.is_none() {
            return Err(self.error(ErrorCode::E1003, "class declaration requires a name"));
        }
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::ClassDecl(class), span))
    }

    /// `class [name] [extends parent] { members }`; cursor at `class`.
    pub(crate) fn parse_class_tail(&mut self) -> Result<ClassId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::Class)?;
        let name = match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let parent = if self.eat(&TokenKind::Extends) {
            Some(self.parse_call_or_member()?)
        } else {
            None
        };
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            members.push(self.parse_class_member()?);
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Ok(self.arena.alloc_class(Class {
            name,
            parent,
            members,
            span,
        }))
    }

    fn parse_class_member(&mut self) -> Result<ClassMember, ParseError> {
        let start = self.current_span();

        // `static` is a modifier unless it is itself the member name
        // (`static() {}`, `static = 1`).
        let is_static = matches!(self.current_kind(), TokenKind::Static)
            && !matches!(
                self.peek_kind(1),
                TokenKind::LParen | TokenKind::Eq | TokenKind::Semicolon | TokenKind::RBrace
            );
        if is_static {
            self.advance();
            // `static { ... }` initialization block.
            if self.check(&TokenKind::LBrace) {
                let body = self.parse_block_body()?;
                let span = start.merge(self.previous_span());
                return Ok(ClassMember {
                    key: ClassKey::Public(PropKey::Ident(Name::EMPTY)),
                    kind: ClassMemberKind::StaticBlock(body),
                    is_static: true,
                    span,
                });
            }
        }

        let is_async = matches!(self.current_kind(), TokenKind::Async)
            && !matches!(
                self.peek_kind(1),
                TokenKind::LParen | TokenKind::Eq | TokenKind::Semicolon | TokenKind::RBrace
            );
        if is_async {
            self.advance();
        }

        let accessor = match self.current_kind() {
            TokenKind::Get if self.class_member_name_follows() => Some(true),
            TokenKind::Set if self.class_member_name_follows() => Some(false),
            _ => None,
        };
        if let Some(is_getter) = accessor {
            self.advance();
            let key = self.parse_class_key()?;
            let func = self.parse_class_method_body(is_async)?;
            let kind = if is_getter {
                ClassMemberKind::Getter(func)
            } else {
                ClassMemberKind::Setter(func)
            };
            let span = start.merge(self.previous_span());
            return Ok(ClassMember {
                key,
                kind,
                is_static,
                span,
            });
        }

        let key = self.parse_class_key()?;

        if self.check(&TokenKind::LParen) {
            let func = self.parse_class_method_body(is_async)?;
            let is_constructor = !is_static
                && matches!(&key, ClassKey::Public(PropKey::Ident(name))
                    if self.interner().lookup(*name) == "constructor");
            let kind = if is_constructor {
                ClassMemberKind::Constructor(func)
            } else {
                ClassMemberKind::Method(func)
            };
            let span = start.merge(self.previous_span());
            return Ok(ClassMember {
                key,
                kind,
                is_static,
                span,
            });
        }

        // Field, with optional initializer.
        let value = if self.eat(&TokenKind::Eq) {
            let value = self.parse_assignment_expr()?;
            if let ClassKey::Public(PropKey::Ident(name)) = key {
                self.name_anonymous_function(value, name);
            }
            Some(value)
        } else {
            None
        };
        self.consume_semicolon().map_err(|_| {
            self.error(
                ErrorCode::E1008,
                format!("unexpected {} in class body", self.current_kind().describe()),
            )
        })?;
        let span = start.merge(self.previous_span());
        Ok(ClassMember {
            key,
            kind: ClassMemberKind::Field(value),
            is_static,
            span,
        })
    }

    /// Whether `get`/`set` at the cursor is a modifier (a member name or
    /// `[` follows) rather than the member name itself.
    fn class_member_name_follows(&self) -> bool {
        !matches!(
            self.peek_kind(1),
            TokenKind::LParen
                | TokenKind::Eq
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Eof
        )
    }

    fn parse_class_key(&mut self) -> Result<ClassKey, ParseError> {
        if let TokenKind::PrivateIdent(name) = self.current_kind() {
            let name = *name;
            self.advance();
            return Ok(ClassKey::Private(name));
        }
        Ok(ClassKey::Public(self.parse_prop_key()?))
    }

    /// Method body with `super` made valid for its duration.
    fn parse_class_method_body(&mut self, is_async: bool) -> Result<hibou_ir::FuncId, ParseError> {
        self.class_method_depth += 1;
        let result = self.parse_method_rest(is_async);
        self.class_method_depth -= 1;
        result
    }
}
