// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Language conformance tests.
//!
//! Each module drives complete source programs through the public
//! [`hibou_eval::Interpreter`] surface and checks the completion value,
//! captured console output, or the rendering of an uncaught error.
//!
//! # Organization
//!
//! - `language` - operators, coercion, control flow, scoping
//! - `functions` - closures, `this`, parameters, call/apply/bind
//! - `objects` - literals, prototypes, destructuring, enumeration
//! - `classes` - inheritance, `super`, private members, static parts
//! - `errors` - throw/try/catch/finally and the Error hierarchy
//! - `builtins` - global objects and prototype methods
//! - `tasks` - async functions, promises, the microtask queue, `eval`
//! - `embedding` - host natives and the embedding contract

#[path = "conformance/common.rs"]
mod common;

#[path = "conformance/language.rs"]
mod language;

#[path = "conformance/functions.rs"]
mod functions;

#[path = "conformance/objects.rs"]
mod objects;

#[path = "conformance/classes.rs"]
mod classes;

#[path = "conformance/errors.rs"]
mod errors;

#[path = "conformance/builtins.rs"]
mod builtins;

#[path = "conformance/tasks.rs"]
mod tasks;

#[path = "conformance/embedding.rs"]
mod embedding;
