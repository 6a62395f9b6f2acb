//! Minimal promise surface for the synchronous-completion async model.
//!
//! Promises are always settled by the time user code sees them; `then`
//! callbacks still run as microtasks, after the current top-level
//! statement finishes.

use super::arg;
use crate::interpreter::Interpreter;
use crate::object::{ObjectKind, PromiseState};
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.promise_proto;

    let ctor = interp.define_constructor("Promise", 1, proto, |interp, _this, _args| {
        Err(interp.throw_type_error(
            "the Promise executor form is not supported; use Promise.resolve or async functions",
        ))
    });

    interp.define_method(ctor, "resolve", 1, |interp, _this, args| {
        Ok(interp.promise_resolve(arg(args, 0)))
    });
    interp.define_method(ctor, "reject", 1, |interp, _this, args| {
        Ok(interp.promise_reject(arg(args, 0)))
    });

    interp.define_method(proto, "then", 2, |interp, this, args| {
        let state = promise_state(interp, &this)?;
        match state {
            PromiseState::Fulfilled(value) => {
                enqueue_callable(interp, arg(args, 0), value);
            }
            PromiseState::Rejected(error) => {
                enqueue_callable(interp, arg(args, 1), error);
            }
        }
        Ok(this)
    });

    interp.define_method(proto, "catch", 1, |interp, this, args| {
        let state = promise_state(interp, &this)?;
        if let PromiseState::Rejected(error) = state {
            enqueue_callable(interp, arg(args, 0), error);
        }
        Ok(this)
    });

    interp.define_method(proto, "finally", 1, |interp, this, args| {
        enqueue_callable(interp, arg(args, 0), Value::Undefined);
        Ok(this)
    });
}

fn promise_state(interp: &mut Interpreter, this: &Value) -> Result<PromiseState, Value> {
    let state = this.as_object().and_then(|handle| {
        match &interp.heap.get(handle).kind {
            ObjectKind::Promise(state) => Some(state.clone()),
            _ => None,
        }
    });
    match state {
        Some(state) => Ok(state),
        None => Err(interp.throw_type_error("receiver is not a promise")),
    }
}

fn enqueue_callable(interp: &mut Interpreter, callback: Value, argument: Value) {
    let callable = callback
        .as_object()
        .is_some_and(|handle| interp.heap.get(handle).is_callable());
    if callable {
        interp.enqueue_microtask(callback, vec![argument]);
    }
}
