//! The `console` namespace, writing through the host print handler.

use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let console = interp.alloc_ordinary();
    interp.define_method(console, "log", 0, log);
    interp.define_method(console, "error", 0, log);
    interp.define_method(console, "warn", 0, log);
    interp.declare_global("console", Value::Object(console));
}

fn log(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Value> {
    let line = args
        .iter()
        .map(|value| interp.display_value(value))
        .collect::<Vec<_>>()
        .join(" ");
    (interp.print)(&line);
    Ok(Value::Undefined)
}
