//! Diagnostic representation and rendering.

use crate::ErrorCode;
use hibou_ir::Span;
use std::fmt;

/// Diagnostic severity.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic attached to a source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Render against the source text with a line/column location and a
    /// caret line pointing at the offending span.
    pub fn render(&self, source: &str) -> String {
        let (line, col) = self.span.line_col(source);
        let mut out = String::new();
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        out.push_str(&format!(
            "{severity}[{}]: {} at {line}:{col}\n",
            self.code, self.message
        ));
        if let Some(text) = source.lines().nth(line as usize - 1) {
            out.push_str(&format!("  {line} | {text}\n"));
            let pad = line.to_string().len() + col as usize + 4;
            out.push_str(&" ".repeat(pad));
            let width = (self.span.len() as usize).clamp(1, text.len().saturating_sub(col as usize - 1).max(1));
            out.push_str(&"^".repeat(width));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.code, self.message, self.span)
    }
}
