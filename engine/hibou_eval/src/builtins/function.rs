//! `Function.prototype` methods.

use super::arg;
use crate::interpreter::{Interpreter, JsResult};
use crate::heap::Handle;
use crate::object::{Callable, FunctionData, JsObject, Property, PropertyKey};
use crate::value::Value;
use std::rc::Rc;

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.function_proto;

    interp.define_method(proto, "call", 1, |interp, this, args| {
        let this_arg = arg(args, 0);
        let rest = args.get(1..).unwrap_or(&[]).to_vec();
        interp.call_value(this, this_arg, &rest)
    });

    interp.define_method(proto, "apply", 2, |interp, this, args| {
        let this_arg = arg(args, 0);
        let mut call_args = Vec::new();
        match arg(args, 1) {
            Value::Undefined | Value::Null => {}
            list => interp.spread_into(&list, &mut call_args)?,
        }
        interp.call_value(this, this_arg, &call_args)
    });

    interp.define_method(proto, "bind", 1, |interp, this, args| {
        let target = this_function(interp, &this)?;
        let this_arg = arg(args, 0);
        let bound_args = args.get(1..).unwrap_or(&[]).to_vec();
        let (name, length) = {
            let data = interp.heap.get(target).function_data();
            match data {
                Some(data) => (
                    format!("bound {}", data.name),
                    data.length.saturating_sub(bound_args.len() as u32),
                ),
                None => ("bound".to_owned(), 0),
            }
        };
        let proto = interp.intrinsics.function_proto;
        let bound = interp.heap.alloc(JsObject::function(
            Some(proto),
            FunctionData {
                name: Rc::from(name.as_str()),
                length,
                callable: Callable::Bound {
                    target,
                    this_value: this_arg,
                    bound_args,
                },
                home_object: None,
            },
        ));
        interp.heap.get_mut(bound).define_own(
            PropertyKey::from_str("name"),
            Property::Data {
                value: Value::string(name),
                writable: false,
                enumerable: false,
                configurable: true,
            },
        );
        interp.heap.get_mut(bound).define_own(
            PropertyKey::from_str("length"),
            Property::Data {
                value: Value::Number(f64::from(length)),
                writable: false,
                enumerable: false,
                configurable: true,
            },
        );
        Ok(Value::Object(bound))
    });

    interp.define_method(proto, "toString", 0, |interp, this, _args| {
        let target = this_function(interp, &this)?;
        let name = interp
            .heap
            .get(target)
            .function_data()
            .map(|data| data.name.to_string())
            .unwrap_or_default();
        Ok(Value::string(format!("function {name}() {{ [native code] }}")))
    });
}

fn this_function(interp: &mut Interpreter, this: &Value) -> JsResult<Handle> {
    match this.as_object().filter(|h| interp.heap.get(*h).is_callable()) {
        Some(handle) => Ok(handle),
        None => Err(interp.throw_type_error("receiver is not a function")),
    }
}
