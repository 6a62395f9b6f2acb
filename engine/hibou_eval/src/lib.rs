//! Tree-walking evaluator for the hibou engine.
//!
//! The embedding surface is [`Interpreter`]: feed it source text with
//! [`Interpreter::evaluate`] and it returns the completion [`Value`] of
//! the last expression statement. Host functions register through
//! [`Interpreter::register_native`].
//!
//! ```no_run
//! use hibou_eval::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! let result = interp.evaluate("1 + 2 * 3")?;
//! assert_eq!(interp.display(&result), "7");
//! # Ok::<(), hibou_eval::EngineError>(())
//! ```

mod builtins;
mod env;
mod error;
mod heap;
mod interpreter;
mod object;
mod value;

pub use error::EngineError;
pub use heap::Handle;
pub use interpreter::{Interpreter, InterpreterBuilder, PrintHandler};
pub use value::{JsStr, Value};
