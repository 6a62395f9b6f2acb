//! The `Error` hierarchy: Error, TypeError, RangeError, ReferenceError,
//! and SyntaxError.

use crate::heap::Handle;
use crate::interpreter::Interpreter;
use crate::object::{JsObject, Property, PropertyKey};
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let base = interp.intrinsics.error_proto;
    install_one(interp, "Error", base);
    let proto = interp.intrinsics.type_error_proto;
    install_one(interp, "TypeError", proto);
    let proto = interp.intrinsics.range_error_proto;
    install_one(interp, "RangeError", proto);
    let proto = interp.intrinsics.reference_error_proto;
    install_one(interp, "ReferenceError", proto);
    let proto = interp.intrinsics.syntax_error_proto;
    install_one(interp, "SyntaxError", proto);

    // Shared behavior lives on Error.prototype only.
    interp.define_value(base, "message", Value::string(""));
    interp.define_method(base, "toString", 0, |interp, this, _args| {
        let name = interp.get_member(&this, &PropertyKey::from_str("name"))?;
        let message = interp.get_member(&this, &PropertyKey::from_str("message"))?;
        let name = interp.to_string_value(&name)?;
        let message = interp.to_string_value(&message)?;
        Ok(Value::string(if message.is_empty() {
            name.to_string()
        } else {
            format!("{name}: {message}")
        }))
    });
}

fn install_one(interp: &mut Interpreter, name: &'static str, proto: Handle) {
    interp.define_value(proto, "name", Value::string(name));
    interp.define_constructor(name, 1, proto, move |interp, _this, args| {
        let mut error = JsObject::error(Some(proto));
        if let Some(message) = args.first() {
            if !matches!(message, Value::Undefined) {
                let message = interp.to_string_value(message)?;
                error.define_own(
                    PropertyKey::from_str("message"),
                    Property::method(Value::String(message)),
                );
            }
        }
        Ok(Value::Object(interp.heap.alloc(error)))
    });
}
