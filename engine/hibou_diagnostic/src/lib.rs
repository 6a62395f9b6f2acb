//! Diagnostics and error codes for the hibou engine.
//!
//! Lexer and parser errors carry an [`ErrorCode`] and a span; the CLI and
//! test harnesses render them with [`Diagnostic::render`].

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
