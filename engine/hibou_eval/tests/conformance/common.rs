//! Shared helpers: run a program and capture its result, error, or output.

use hibou_eval::{EngineError, Interpreter};
use std::cell::RefCell;
use std::rc::Rc;

/// Evaluate a program and render its completion value.
pub fn eval(source: &str) -> String {
    let mut interp = Interpreter::new();
    match interp.evaluate(source) {
        Ok(value) => interp.display(&value),
        Err(error) => panic!("evaluation failed: {error}\nsource: {source}"),
    }
}

/// Evaluate a program that must end in an uncaught exception; returns the
/// rendered thrown value (`Name: message` for errors).
pub fn eval_err(source: &str) -> String {
    let mut interp = Interpreter::new();
    match interp.evaluate(source) {
        Ok(value) => panic!(
            "expected an uncaught exception, got {}\nsource: {source}",
            interp.display(&value)
        ),
        Err(EngineError::Uncaught(message)) => message,
        Err(EngineError::Syntax(diagnostics)) => {
            panic!("unexpected syntax error: {diagnostics:?}\nsource: {source}")
        }
    }
}

/// Evaluate a program and collect everything it printed through `console`.
pub fn logged(source: &str) -> Vec<String> {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    let mut interp = Interpreter::builder()
        .print_handler(Box::new(move |line: &str| {
            sink.borrow_mut().push(line.to_owned());
        }))
        .build();
    if let Err(error) = interp.evaluate(source) {
        panic!("evaluation failed: {error}\nsource: {source}");
    }
    let out = lines.borrow().clone();
    out
}
