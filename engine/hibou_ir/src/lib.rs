//! hibou IR - tokens, spans, interner, and AST arena.
//!
//! Shared data types flowing between the lexer, parser, and evaluator:
//! source text lexes to a [`TokenList`], which parses to a [`Program`]
//! of arena-allocated nodes addressed by typed 4-byte ids.

mod ast;
mod interner;
mod span;
mod token;

pub use ast::*;
pub use interner::{Name, SharedInterner, StringInterner};
pub use span::Span;
pub use token::{TemplateSegment, Token, TokenKind, TokenList};
