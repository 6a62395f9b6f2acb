//! Token definitions shared between the lexer and parser.

use crate::{Name, Span};
use std::ops::Index;

/// A single token with its source span.
///
/// `newline_before` records whether a line terminator appeared between this
/// token and the previous one; the parser consults it for automatic
/// semicolon insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Token {
            kind,
            span,
            newline_before,
        }
    }
}

/// One segment of a template literal token.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSegment {
    /// Literal text between backticks / substitutions (cooked: escapes
    /// resolved, line continuations removed).
    Text(Name),
    /// A `${ ... }` substitution, lexed into its own token stream.
    Substitution(TokenList),
}

/// Token kinds for the ECMAScript grammar subset hibou implements.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(Name),
    /// Template literal as a single unit of text and substitution segments.
    Template(Vec<TemplateSegment>),
    /// Regex literal: source pattern and flags.
    Regex { source: Name, flags: Name },
    Ident(Name),
    /// Private class member name, without the leading `#`.
    PrivateIdent(Name),

    // Keywords
    Var,
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    New,
    Delete,
    Typeof,
    Void,
    Instanceof,
    In,
    Of,
    This,
    Null,
    True,
    False,
    Class,
    Extends,
    Super,
    Static,
    Get,
    Set,
    Switch,
    Case,
    Default,
    Throw,
    Try,
    Catch,
    Finally,
    Async,
    Await,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    DotDotDot,
    Arrow,
    Colon,
    Question,
    QuestionDot,
    QuestionQuestion,

    // Operators
    Eq,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AmpEq,
    PipeEq,
    CaretEq,
    AmpAmpEq,
    PipePipeEq,
    QuestionQuestionEq,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,

    /// Lexing error (unterminated literal, invalid character).
    Error,
    Eof,
}

impl TokenKind {
    /// Resolve an identifier to its keyword kind, if any.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "var" => TokenKind::Var,
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "new" => TokenKind::New,
            "delete" => TokenKind::Delete,
            "typeof" => TokenKind::Typeof,
            "void" => TokenKind::Void,
            "instanceof" => TokenKind::Instanceof,
            "in" => TokenKind::In,
            "of" => TokenKind::Of,
            "this" => TokenKind::This,
            "null" => TokenKind::Null,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "super" => TokenKind::Super,
            "static" => TokenKind::Static,
            "get" => TokenKind::Get,
            "set" => TokenKind::Set,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "throw" => TokenKind::Throw,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            _ => return None,
        })
    }

    /// Keyword spelling for contextual keywords that may be used as
    /// identifiers or property names (`of`, `get`, `set`, ...).
    pub fn keyword_text(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Var => "var",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::New => "new",
            TokenKind::Delete => "delete",
            TokenKind::Typeof => "typeof",
            TokenKind::Void => "void",
            TokenKind::Instanceof => "instanceof",
            TokenKind::In => "in",
            TokenKind::Of => "of",
            TokenKind::This => "this",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Class => "class",
            TokenKind::Extends => "extends",
            TokenKind::Super => "super",
            TokenKind::Static => "static",
            TokenKind::Get => "get",
            TokenKind::Set => "set",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Async => "async",
            TokenKind::Await => "await",
            _ => return None,
        })
    }

    /// Whether a `/` after this token starts a regex literal rather than a
    /// division operator. Regex follows operators, keywords, and opening
    /// punctuation; division follows identifiers, literals, and closing
    /// brackets.
    pub fn allows_regex_after(&self) -> bool {
        !matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::PrivateIdent(_)
                | TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Template(_)
                | TokenKind::Regex { .. }
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number literal",
            TokenKind::String(_) => "string literal",
            TokenKind::Template(_) => "template literal",
            TokenKind::Regex { .. } => "regex literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::PrivateIdent(_) => "private name",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDotDot => "`...`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Colon => "`:`",
            TokenKind::Question => "`?`",
            TokenKind::QuestionDot => "`?.`",
            TokenKind::QuestionQuestion => "`??`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::EqEqEq => "`===`",
            TokenKind::NotEq => "`!=`",
            TokenKind::NotEqEq => "`!==`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Shl => "`<<`",
            TokenKind::Shr => "`>>`",
            TokenKind::UShr => "`>>>`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::StarStar => "`**`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::StarStarEq => "`**=`",
            TokenKind::ShlEq => "`<<=`",
            TokenKind::ShrEq => "`>>=`",
            TokenKind::UShrEq => "`>>>=`",
            TokenKind::AmpEq => "`&=`",
            TokenKind::PipeEq => "`|=`",
            TokenKind::CaretEq => "`^=`",
            TokenKind::AmpAmpEq => "`&&=`",
            TokenKind::PipePipeEq => "`||=`",
            TokenKind::QuestionQuestionEq => "`??=`",
            TokenKind::Amp => "`&`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::Pipe => "`|`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Caret => "`^`",
            TokenKind::Tilde => "`~`",
            TokenKind::Bang => "`!`",
            _ => self.keyword_text().unwrap_or("token"),
        }
    }
}

/// A lexed token stream, always terminated by an `Eof` token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, idx: usize) -> &Token {
        &self.tokens[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_round_trip() {
        let kind = TokenKind::keyword("instanceof").unwrap();
        assert_eq!(kind, TokenKind::Instanceof);
        assert_eq!(kind.keyword_text(), Some("instanceof"));
        assert_eq!(TokenKind::keyword("résultat"), None);
    }

    #[test]
    fn regex_context() {
        assert!(TokenKind::Eq.allows_regex_after());
        assert!(TokenKind::LParen.allows_regex_after());
        assert!(TokenKind::Return.allows_regex_after());
        assert!(!TokenKind::RParen.allows_regex_after());
        assert!(!TokenKind::RBracket.allows_regex_after());
        assert!(!TokenKind::Number(1.0).allows_regex_after());
    }
}
