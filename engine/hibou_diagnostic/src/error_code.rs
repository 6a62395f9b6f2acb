//! Error codes for engine diagnostics.

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: lexer errors
/// - E1xxx: parser errors
/// - E2xxx: runtime errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Unterminated template literal
    E0004,
    /// Unterminated regex literal
    E0005,
    /// Unterminated block comment
    E0006,
    /// Invalid escape sequence
    E0007,

    // Parser errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Expected identifier
    E1003,
    /// Unclosed delimiter
    E1004,
    /// Invalid assignment / destructuring target
    E1005,
    /// Nullish coalescing mixed with `&&`/`||` without parentheses
    E1006,
    /// Redeclaration of a lexical binding
    E1007,
    /// Invalid class member
    E1008,
    /// `super` / `this` misuse outside a class or function
    E1009,

    // Runtime errors (E2xxx) — reported when a thrown error escapes to the host
    /// Type error (non-callable call, private-name misuse, cyclic prototype)
    E2001,
    /// Reference error (unresolved identifier, TDZ read)
    E2002,
    /// Range error
    E2003,
    /// Uncaught user exception
    E2004,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
