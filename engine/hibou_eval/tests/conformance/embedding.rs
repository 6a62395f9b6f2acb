//! The embedding contract: host natives, non-ASCII sources, repeated use.

use hibou_eval::{EngineError, Interpreter, Value};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

/// The assertion natives the conformance harness installs before running
/// a suite file.
fn harness() -> (Interpreter, Rc<RefCell<Vec<String>>>) {
    let failures: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut interp = Interpreter::new();

    let sink = Rc::clone(&failures);
    interp.register_native("vérifie", 1, move |_interp, _this, args| {
        let ok = args.first().is_some_and(Value::to_boolean);
        if !ok {
            sink.borrow_mut().push("vérifie failed".to_owned());
        }
        Ok(Value::Undefined)
    });

    let sink = Rc::clone(&failures);
    interp.register_native("vérifie_égalité", 2, move |interp, _this, args| {
        let left = args.first().cloned().unwrap_or(Value::Undefined);
        let right = args.get(1).cloned().unwrap_or(Value::Undefined);
        if !left.strict_equals(&right) {
            sink.borrow_mut().push(format!(
                "expected {}, got {}",
                interp.display(&right),
                interp.display(&left)
            ));
        }
        Ok(Value::Undefined)
    });

    (interp, failures)
}

#[test]
fn host_natives_are_callable_from_scripts() {
    let (mut interp, failures) = harness();
    interp
        .evaluate("vérifie(1 < 2); vérifie_égalité(2 + 2, 4);")
        .expect("harness program failed");
    assert_eq!(failures.borrow().len(), 0, "{:?}", failures.borrow());
}

#[test]
fn host_natives_report_failures() {
    let (mut interp, failures) = harness();
    interp
        .evaluate("vérifie_égalité('1' + 1, 2);")
        .expect("harness program failed");
    assert_eq!(failures.borrow().as_slice(), ["expected 2, got 11"]);
}

#[test]
fn non_ascii_identifiers_are_accepted() {
    let mut interp = Interpreter::new();
    let value = interp
        .evaluate("const café = 'au lait'; const 数 = 3; café.length + 数")
        .expect("non-ascii program failed");
    assert_eq!(interp.display(&value), "10");
}

#[test]
fn registered_natives_receive_this_and_arguments() {
    let mut interp = Interpreter::new();
    interp.register_native("argCount", 0, |_interp, _this, args| {
        Ok(Value::Number(args.len() as f64))
    });
    let value = interp.evaluate("argCount(1, 2, 3)").expect("eval failed");
    assert_eq!(interp.display(&value), "3");
}

#[test]
fn natives_can_throw_into_the_script() {
    let mut interp = Interpreter::new();
    interp.register_native("refuse", 0, |_interp, _this, _args| {
        Err(Value::string("refused by host"))
    });
    let value = interp
        .evaluate("try { refuse(); } catch (e) { 'caught: ' + e }")
        .expect("eval failed");
    assert_eq!(interp.display(&value), "caught: refused by host");
}

#[test]
fn one_interpreter_accumulates_state_across_evaluations() {
    let mut interp = Interpreter::new();
    interp.evaluate("let total = 1;").expect("first program failed");
    interp.evaluate("total += 9;").expect("second program failed");
    let value = interp.evaluate("total").expect("third program failed");
    assert_eq!(interp.display(&value), "10");
}

#[test]
fn syntax_errors_surface_before_any_execution() {
    let mut interp = Interpreter::new();
    interp.evaluate("let witness = 'untouched';").expect("setup failed");
    let error = interp.evaluate("witness = 'changed'; let ) = ;").unwrap_err();
    assert!(matches!(error, EngineError::Syntax(_)), "got: {error}");
    let value = interp.evaluate("witness").expect("readback failed");
    assert_eq!(interp.display(&value), "untouched");
}
