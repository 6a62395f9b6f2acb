//! Parser errors.

use hibou_diagnostic::{Diagnostic, ErrorCode};
use hibou_ir::Span;
use std::fmt;

/// A syntax error with its source position.
///
/// The parser recovers to the next statement boundary and keeps going, so
/// one run can report several errors, but any parse error is fatal to the
/// compile unit: a program with syntax errors is never executed.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code, self.message.clone(), self.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
