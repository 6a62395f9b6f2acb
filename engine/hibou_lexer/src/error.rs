//! Lexer errors.

use hibou_diagnostic::{Diagnostic, ErrorCode};
use hibou_ir::Span;
use std::fmt;

/// A malformed token, reported with its source position.
///
/// Lexing continues past errors (an `Error` token is emitted) so the host
/// can report everything wrong with a compile unit at once, but any lex
/// error is fatal to that unit: a program that failed to tokenize is never
/// executed.
#[derive(Clone, Debug, PartialEq)]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code, self.message.clone(), self.span)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for LexError {}
