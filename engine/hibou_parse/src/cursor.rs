//! Token cursor for navigating the token stream.
//!
//! Low-level token access, lookahead, and consumption; the grammar modules
//! drive it through delegation methods on [`crate::Parser`].

use crate::error::ParseError;
use hibou_diagnostic::ErrorCode;
use hibou_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a token stream.
    ///
    /// The stream must be `Eof`-terminated, which [`hibou_lexer::tokenize`]
    /// guarantees for both top-level streams and template substitutions.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        debug_assert!(
            matches!(tokens[tokens.len() - 1].kind, TokenKind::Eof),
            "token stream must end with Eof"
        );
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current token, with the stream's lifetime (not the cursor's).
    ///
    /// Invariant: the position never passes the final `Eof` token.
    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Whether a line terminator precedes the current token.
    #[inline]
    pub fn newline_before(&self) -> bool {
        self.current().newline_before
    }

    /// Kind of the token `n` positions ahead (`Eof` past the end).
    #[inline]
    pub fn peek_kind(&self, n: usize) -> &'a TokenKind {
        match self.tokens.get(self.pos + n) {
            Some(token) => &token.kind,
            None => &TokenKind::Eof,
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance and return the passed token.
    #[inline]
    pub fn advance(&mut self) -> &'a Token {
        let token = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    #[inline]
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected {}, found {}",
                    kind.describe(),
                    self.current_kind().describe()
                ),
                self.current_span(),
            ))
        }
    }

    /// Identifier in binding position. Contextual keywords (`of`, `get`,
    /// `set`, `static`, `async`) are valid identifiers.
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Ok(name)
            }
            kind @ (TokenKind::Of
            | TokenKind::Get
            | TokenKind::Set
            | TokenKind::Static
            | TokenKind::Async) => {
                let name = self.interner.intern(kind.keyword_text().unwrap_or(""));
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::new(
                ErrorCode::E1003,
                format!("expected identifier, found {}", other.describe()),
                self.current_span(),
            )),
        }
    }

    /// Property name after `.` — any identifier or keyword.
    pub fn expect_property_name(&mut self) -> Result<Name, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                self.advance();
                Ok(name)
            }
            kind => match kind.keyword_text() {
                Some(text) => {
                    let name = self.interner.intern(text);
                    self.advance();
                    Ok(name)
                }
                None => Err(ParseError::new(
                    ErrorCode::E1003,
                    format!("expected property name, found {}", kind.describe()),
                    self.current_span(),
                )),
            },
        }
    }

    /// Whether the parenthesized group starting at `offset` tokens ahead
    /// (which must be a `(`) is followed by `=>`, making it an arrow
    /// function parameter list.
    ///
    /// Scans forward over balanced delimiters without consuming anything.
    pub fn paren_group_is_arrow_params(&self, offset: usize) -> bool {
        debug_assert!(matches!(self.peek_kind(offset), TokenKind::LParen));
        let mut depth = 0usize;
        let mut idx = self.pos + offset;
        loop {
            let Some(token) = self.tokens.get(idx) else {
                return false;
            };
            match token.kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(idx + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            idx += 1;
        }
    }
}
