//! Hand-written scanner.
//!
//! Main dispatch is over the current byte; non-ASCII lead bytes fall
//! through to char-based identifier scanning so Unicode identifiers
//! (`résultat`, `développement`) work.
//!
//! Context the scanner tracks across tokens:
//! - whether a `/` starts a regex literal or a division operator (decided
//!   from the previous significant token),
//! - whether a line terminator precedes the next token (recorded on the
//!   token for automatic semicolon insertion),
//! - template-literal nesting, since `${ ... }` substitutions contain full
//!   token streams of their own, including nested templates.

use crate::cursor::Cursor;
use crate::error::LexError;
use hibou_diagnostic::ErrorCode;
use hibou_ir::{Name, Span, StringInterner, TemplateSegment, Token, TokenKind, TokenList};

pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    errors: Vec<LexError>,
    /// `/` at the next token position starts a regex literal.
    regex_ok: bool,
    /// Line terminator seen since the last emitted token.
    newline_pending: bool,
}

/// Lex an entire source text.
///
/// Always returns a token list terminated by `Eof`; malformed tokens are
/// reported in the error vector and emitted as `TokenKind::Error`.
pub fn tokenize(source: &str, interner: &StringInterner) -> (TokenList, Vec<LexError>) {
    let mut scanner = Scanner::new(source, interner);
    let tokens = scanner.run();
    (tokens, scanner.errors)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, interner: &'a StringInterner) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            interner,
            errors: Vec::new(),
            regex_ok: true,
            newline_pending: false,
        }
    }

    fn run(&mut self) -> TokenList {
        let mut tokens = TokenList::new();
        loop {
            self.skip_trivia();
            let start = self.cursor.pos();
            if self.cursor.is_eof() {
                tokens.push(Token::new(
                    TokenKind::Eof,
                    Span::point(start as u32),
                    self.newline_pending,
                ));
                break;
            }
            let kind = self.scan_token();
            self.regex_ok = kind.allows_regex_after();
            let span = Span::from_range(start..self.cursor.pos());
            tokens.push(Token::new(kind, span, self.newline_pending));
            self.newline_pending = false;
        }
        tokens
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, start: usize) {
        let span = Span::from_range(start..self.cursor.pos().max(start + 1));
        self.errors.push(LexError::new(code, message, span));
    }

    // ─── Trivia ────────────────────────────────────────────────────────

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' => self.cursor.advance(),
                b'\r' => {
                    self.cursor.advance();
                    self.cursor.eat(b'\n');
                    self.newline_pending = true;
                }
                b'\n' => {
                    self.cursor.advance();
                    self.newline_pending = true;
                }
                b'/' if self.cursor.peek(1) == b'/' => {
                    self.cursor.advance_by(2);
                    self.cursor.eat_until_newline();
                }
                b'/' if self.cursor.peek(1) == b'*' => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Skip a `/* ... */` comment, ending at the *first* `*/`.
    ///
    /// `/*/*/` is therefore a complete comment: the scan does not nest and
    /// does not treat the interior `/*` as an opener.
    fn skip_block_comment(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance_by(2);
        loop {
            if self.cursor.is_eof() {
                self.error(ErrorCode::E0006, "unterminated block comment", start);
                break;
            }
            let b = self.cursor.current();
            if b == b'*' && self.cursor.peek(1) == b'/' {
                self.cursor.advance_by(2);
                break;
            }
            if b == b'\n' {
                self.newline_pending = true;
            }
            self.cursor.advance();
        }
    }

    // ─── Token dispatch ────────────────────────────────────────────────

    fn scan_token(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        match self.cursor.current() {
            b'0'..=b'9' => self.scan_number(start),
            b'"' | b'\'' => self.scan_string(start),
            b'`' => self.scan_template(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.scan_ident(start),
            b'#' => {
                self.cursor.advance();
                if self.cursor.current_char().is_some_and(is_ident_start) {
                    let name_start = self.cursor.pos();
                    self.eat_ident_continue();
                    let name = self.interner.intern(self.cursor.slice_from(name_start));
                    TokenKind::PrivateIdent(name)
                } else {
                    self.error(ErrorCode::E0002, "expected identifier after `#`", start);
                    TokenKind::Error
                }
            }
            b'/' => {
                if self.regex_ok {
                    self.scan_regex(start)
                } else {
                    self.cursor.advance();
                    if self.cursor.eat(b'=') {
                        TokenKind::SlashEq
                    } else {
                        TokenKind::Slash
                    }
                }
            }
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b'~' => self.single(TokenKind::Tilde),
            b'.' => self.scan_dot(start),
            b'?' => self.scan_question(),
            b'=' => self.scan_equal(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less(),
            b'>' => self.scan_greater(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'%' => self.scan_op_eq(TokenKind::Percent, TokenKind::PercentEq),
            b'^' => self.scan_op_eq(TokenKind::Caret, TokenKind::CaretEq),
            b'&' => self.scan_amp(),
            b'|' => self.scan_pipe(),
            _ => {
                if self.cursor.current_char().is_some_and(is_ident_start) {
                    self.scan_ident(start)
                } else {
                    let c = self.cursor.current_char().unwrap_or('\0');
                    self.cursor.advance_char();
                    self.error(ErrorCode::E0002, format!("invalid character `{c}`"), start);
                    TokenKind::Error
                }
            }
        }
    }

    #[inline]
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    fn scan_op_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'=') {
            with_eq
        } else {
            plain
        }
    }

    fn scan_dot(&mut self, start: usize) -> TokenKind {
        if self.cursor.peek(1).is_ascii_digit() {
            return self.scan_number(start);
        }
        self.cursor.advance();
        if self.cursor.current() == b'.' && self.cursor.peek(1) == b'.' {
            self.cursor.advance_by(2);
            TokenKind::DotDotDot
        } else {
            TokenKind::Dot
        }
    }

    /// `?` family. `?.` followed by a digit is NOT optional chaining:
    /// `a?.5:.25` must parse as the conditional `a ? .5 : .25`, so the `.`
    /// is left for the number scanner.
    fn scan_question(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.current() {
            b'.' if !self.cursor.peek(1).is_ascii_digit() => {
                self.cursor.advance();
                TokenKind::QuestionDot
            }
            b'?' => {
                self.cursor.advance();
                if self.cursor.eat(b'=') {
                    TokenKind::QuestionQuestionEq
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'=') {
            if self.cursor.eat(b'=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else if self.cursor.eat(b'>') {
            TokenKind::Arrow
        } else {
            TokenKind::Eq
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'=') {
            if self.cursor.eat(b'=') {
                TokenKind::NotEqEq
            } else {
                TokenKind::NotEq
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_less(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'<') {
            if self.cursor.eat(b'=') {
                TokenKind::ShlEq
            } else {
                TokenKind::Shl
            }
        } else if self.cursor.eat(b'=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    fn scan_greater(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.current() == b'>' {
            self.cursor.advance();
            if self.cursor.current() == b'>' {
                self.cursor.advance();
                if self.cursor.eat(b'=') {
                    TokenKind::UShrEq
                } else {
                    TokenKind::UShr
                }
            } else if self.cursor.eat(b'=') {
                TokenKind::ShrEq
            } else {
                TokenKind::Shr
            }
        } else if self.cursor.eat(b'=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'+') {
            TokenKind::PlusPlus
        } else if self.cursor.eat(b'=') {
            TokenKind::PlusEq
        } else {
            TokenKind::Plus
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'-') {
            TokenKind::MinusMinus
        } else if self.cursor.eat(b'=') {
            TokenKind::MinusEq
        } else {
            TokenKind::Minus
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'*') {
            if self.cursor.eat(b'=') {
                TokenKind::StarStarEq
            } else {
                TokenKind::StarStar
            }
        } else if self.cursor.eat(b'=') {
            TokenKind::StarEq
        } else {
            TokenKind::Star
        }
    }

    fn scan_amp(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'&') {
            if self.cursor.eat(b'=') {
                TokenKind::AmpAmpEq
            } else {
                TokenKind::AmpAmp
            }
        } else if self.cursor.eat(b'=') {
            TokenKind::AmpEq
        } else {
            TokenKind::Amp
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(b'|') {
            if self.cursor.eat(b'=') {
                TokenKind::PipePipeEq
            } else {
                TokenKind::PipePipe
            }
        } else if self.cursor.eat(b'=') {
            TokenKind::PipeEq
        } else {
            TokenKind::Pipe
        }
    }

    // ─── Identifiers ───────────────────────────────────────────────────

    fn eat_ident_continue(&mut self) {
        while let Some(c) = self.cursor.current_char() {
            if is_ident_continue(c) {
                self.cursor.advance_char();
            } else {
                break;
            }
        }
    }

    fn scan_ident(&mut self, start: usize) -> TokenKind {
        self.cursor.advance_char();
        self.eat_ident_continue();
        let text = self.cursor.slice_from(start);
        match TokenKind::keyword(text) {
            Some(kind) => kind,
            None => TokenKind::Ident(self.interner.intern(text)),
        }
    }

    // ─── Numbers ───────────────────────────────────────────────────────

    fn scan_number(&mut self, start: usize) -> TokenKind {
        let radix = if self.cursor.current() == b'0' {
            match self.cursor.peek(1) {
                b'x' | b'X' => Some(16),
                b'b' | b'B' => Some(2),
                b'o' | b'O' => Some(8),
                _ => None,
            }
        } else {
            None
        };

        if let Some(radix) = radix {
            self.cursor.advance_by(2);
            let digits_start = self.cursor.pos();
            self.cursor.eat_digits(radix);
            let digits = self.cursor.slice_from(digits_start).replace('_', "");
            if digits.is_empty() {
                self.error(ErrorCode::E0003, "missing digits in number literal", start);
                return TokenKind::Error;
            }
            return match u64::from_str_radix(&digits, radix) {
                Ok(value) => TokenKind::Number(value as f64),
                Err(_) => {
                    self.error(ErrorCode::E0003, "invalid number literal", start);
                    TokenKind::Error
                }
            };
        }

        // Decimal: integer part, optional fraction, optional exponent.
        self.cursor.eat_digits(10);
        if self.cursor.current() == b'.' && self.cursor.peek(1).is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_digits(10);
        } else if self.cursor.current() == b'.' && start < self.cursor.pos() {
            // Trailing-dot form `5.` (but not the leading-dot entry point).
            self.cursor.advance();
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            let next = self.cursor.peek(1);
            let has_sign = matches!(next, b'+' | b'-');
            let digit_at = if has_sign { 2 } else { 1 };
            if self.cursor.peek(digit_at).is_ascii_digit() {
                self.cursor.advance_by(digit_at);
                self.cursor.eat_digits(10);
            }
        }

        let text = self.cursor.slice_from(start).replace('_', "");
        match text.parse::<f64>() {
            Ok(value) => TokenKind::Number(value),
            Err(_) => {
                self.error(ErrorCode::E0003, "invalid number literal", start);
                TokenKind::Error
            }
        }
    }

    // ─── Strings ───────────────────────────────────────────────────────

    fn scan_string(&mut self, start: usize) -> TokenKind {
        let quote = self.cursor.current();
        self.cursor.advance();
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                b'\n' | b'\r' => {
                    self.error(ErrorCode::E0001, "unterminated string literal", start);
                    return TokenKind::Error;
                }
                0 if self.cursor.is_eof() => {
                    self.error(ErrorCode::E0001, "unterminated string literal", start);
                    return TokenKind::Error;
                }
                b'\\' => self.scan_escape(&mut text),
                b if b == quote => {
                    self.cursor.advance();
                    return TokenKind::String(self.interner.intern(&text));
                }
                _ => {
                    if let Some(c) = self.cursor.current_char() {
                        text.push(c);
                        self.cursor.advance_char();
                    }
                }
            }
        }
    }

    /// Cook one escape sequence (cursor on the backslash). A backslash
    /// before a line terminator is a line continuation and contributes
    /// nothing.
    fn scan_escape(&mut self, out: &mut String) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'\n' => self.cursor.advance(),
            b'\r' => {
                self.cursor.advance();
                self.cursor.eat(b'\n');
            }
            b'n' => {
                out.push('\n');
                self.cursor.advance();
            }
            b't' => {
                out.push('\t');
                self.cursor.advance();
            }
            b'r' => {
                out.push('\r');
                self.cursor.advance();
            }
            b'b' => {
                out.push('\u{0008}');
                self.cursor.advance();
            }
            b'f' => {
                out.push('\u{000C}');
                self.cursor.advance();
            }
            b'v' => {
                out.push('\u{000B}');
                self.cursor.advance();
            }
            b'0' if !self.cursor.peek(1).is_ascii_digit() => {
                out.push('\0');
                self.cursor.advance();
            }
            b'x' => {
                self.cursor.advance();
                let hex_start = self.cursor.pos();
                for _ in 0..2 {
                    if self.cursor.current().is_ascii_hexdigit() {
                        self.cursor.advance();
                    }
                }
                match u32::from_str_radix(self.cursor.slice_from(hex_start), 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    Some(c) if self.cursor.pos() - hex_start == 2 => out.push(c),
                    _ => self.error(ErrorCode::E0007, "invalid `\\x` escape", start),
                }
            }
            b'u' => {
                self.cursor.advance();
                let code = if self.cursor.eat(b'{') {
                    let hex_start = self.cursor.pos();
                    while self.cursor.current().is_ascii_hexdigit() {
                        self.cursor.advance();
                    }
                    let hex = self.cursor.slice_from(hex_start);
                    let ok = self.cursor.eat(b'}');
                    if ok {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        None
                    }
                } else {
                    let hex_start = self.cursor.pos();
                    for _ in 0..4 {
                        if self.cursor.current().is_ascii_hexdigit() {
                            self.cursor.advance();
                        }
                    }
                    if self.cursor.pos() - hex_start == 4 {
                        u32::from_str_radix(self.cursor.slice_from(hex_start), 16).ok()
                    } else {
                        None
                    }
                };
                match code.and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => self.error(ErrorCode::E0007, "invalid unicode escape", start),
                }
            }
            _ => {
                // `\'`, `\"`, `\``, `\$`, `\\`, and any other char: itself.
                if let Some(c) = self.cursor.current_char() {
                    out.push(c);
                    self.cursor.advance_char();
                }
            }
        }
    }

    // ─── Template literals ─────────────────────────────────────────────

    /// Scan a whole template literal as one token: interleaved text and
    /// substitution segments, with substitutions lexed into nested token
    /// streams.
    fn scan_template(&mut self, start: usize) -> TokenKind {
        self.cursor.advance();
        let mut segments = Vec::new();
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => {
                    self.error(ErrorCode::E0004, "unterminated template literal", start);
                    return TokenKind::Error;
                }
                b'`' => {
                    self.cursor.advance();
                    segments.push(TemplateSegment::Text(self.intern_text(&mut text)));
                    return TokenKind::Template(segments);
                }
                b'\\' => self.scan_escape(&mut text),
                b'$' if self.cursor.peek(1) == b'{' => {
                    segments.push(TemplateSegment::Text(self.intern_text(&mut text)));
                    self.cursor.advance_by(2);
                    let sub = self.scan_substitution(start);
                    segments.push(TemplateSegment::Substitution(sub));
                }
                b'\r' => {
                    // Normalize CRLF / lone CR to LF in the cooked text.
                    text.push('\n');
                    self.cursor.advance();
                    self.cursor.eat(b'\n');
                }
                _ => {
                    if let Some(c) = self.cursor.current_char() {
                        text.push(c);
                        self.cursor.advance_char();
                    }
                }
            }
        }
    }

    fn intern_text(&mut self, text: &mut String) -> Name {
        let name = self.interner.intern(text);
        text.clear();
        name
    }

    /// Lex tokens of one `${ ... }` substitution up to its matching `}`,
    /// tracking brace depth so object literals and blocks nest correctly.
    fn scan_substitution(&mut self, template_start: usize) -> TokenList {
        let mut tokens = TokenList::new();
        let mut depth = 0u32;
        // Substitutions open a fresh expression context: `/` is a regex.
        self.regex_ok = true;
        loop {
            self.skip_trivia();
            let start = self.cursor.pos();
            if self.cursor.is_eof() {
                self.error(
                    ErrorCode::E0004,
                    "unterminated template substitution",
                    template_start,
                );
                break;
            }
            if self.cursor.current() == b'}' && depth == 0 {
                self.cursor.advance();
                break;
            }
            let kind = self.scan_token();
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.regex_ok = kind.allows_regex_after();
            let span = Span::from_range(start..self.cursor.pos());
            tokens.push(Token::new(kind, span, self.newline_pending));
            self.newline_pending = false;
        }
        tokens.push(Token::new(
            TokenKind::Eof,
            Span::point(self.cursor.pos() as u32),
            false,
        ));
        tokens
    }

    // ─── Regex literals ────────────────────────────────────────────────

    fn scan_regex(&mut self, start: usize) -> TokenKind {
        self.cursor.advance();
        let body_start = self.cursor.pos();
        let mut in_class = false;
        loop {
            match self.cursor.current() {
                b'\n' | b'\r' => {
                    self.error(ErrorCode::E0005, "unterminated regex literal", start);
                    return TokenKind::Error;
                }
                0 if self.cursor.is_eof() => {
                    self.error(ErrorCode::E0005, "unterminated regex literal", start);
                    return TokenKind::Error;
                }
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance_char();
                }
                b'[' => {
                    in_class = true;
                    self.cursor.advance();
                }
                b']' => {
                    in_class = false;
                    self.cursor.advance();
                }
                b'/' if !in_class => break,
                _ => self.cursor.advance_char(),
            }
        }
        let source = self.interner.intern(self.cursor.slice_from(body_start));
        self.cursor.advance();
        let flags_start = self.cursor.pos();
        self.eat_ident_continue();
        let flags = self.interner.intern(self.cursor.slice_from(flags_start));
        TokenKind::Regex { source, flags }
    }
}
