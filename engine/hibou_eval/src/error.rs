//! Engine-level errors returned to the host.

use hibou_diagnostic::Diagnostic;
use thiserror::Error;

/// Error surface of [`crate::Interpreter::evaluate`].
///
/// Lex and parse failures carry the collected diagnostics; a runtime
/// exception that reaches the top level is rendered to its message string
/// (the thrown value itself dies with the evaluation).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{}", render_diagnostics(.0))]
    Syntax(Vec<Diagnostic>),
    #[error("uncaught exception: {0}")]
    Uncaught(String),
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let rendered: Vec<String> = diagnostics
        .iter()
        .map(|d| format!("[{}] {}", d.code, d.message))
        .collect();
    rendered.join("\n")
}
