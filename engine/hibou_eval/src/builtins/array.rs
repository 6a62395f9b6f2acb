//! The `Array` constructor and prototype.

use super::{arg, clamp_index, to_integer_or_infinity};
use crate::heap::Handle;
use crate::interpreter::{Interpreter, JsResult};
use crate::object::{Property, PropertyKey};
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.array_proto;

    interp.define_constructor("Array", 1, proto, |interp, _this, args| {
        // A single numeric argument sets the length with no elements.
        if let [Value::Number(n)] = args {
            let length = *n as u32;
            if f64::from(length) != *n {
                return Err(interp.throw_range_error("invalid array length"));
            }
            let array = interp.alloc_array(Vec::new());
            interp.heap.get_mut(array).set_array_length(length);
            return Ok(Value::Object(array));
        }
        Ok(Value::Object(interp.alloc_array(args.to_vec())))
    });

    interp.define_method(proto, "push", 1, |interp, this, args| {
        let array = this_array(interp, &this)?;
        let mut length = interp.heap.get(array).array_length().unwrap_or(0);
        for value in args {
            interp
                .heap
                .get_mut(array)
                .define_own(PropertyKey::Index(length), Property::data(value.clone()));
            length += 1;
        }
        Ok(Value::Number(f64::from(length)))
    });

    interp.define_method(proto, "pop", 0, |interp, this, _args| {
        let array = this_array(interp, &this)?;
        let length = interp.heap.get(array).array_length().unwrap_or(0);
        if length == 0 {
            return Ok(Value::Undefined);
        }
        let value = interp.get_member(&this, &PropertyKey::Index(length - 1))?;
        interp.heap.get_mut(array).set_array_length(length - 1);
        Ok(value)
    });

    interp.define_method(proto, "join", 1, |interp, this, args| {
        let array = this_array(interp, &this)?;
        let separator = match args.first() {
            Some(Value::Undefined) | None => ",".into(),
            Some(value) => interp.to_string_value(value)?,
        };
        let length = interp.heap.get(array).array_length().unwrap_or(0);
        let mut parts = Vec::with_capacity(length as usize);
        for index in 0..length {
            let value = interp.get_member(&this, &PropertyKey::Index(index))?;
            // Holes, undefined, and null join as empty strings.
            parts.push(match value {
                Value::Undefined | Value::Null => String::new(),
                other => interp.to_string_value(&other)?.to_string(),
            });
        }
        Ok(Value::string(parts.join(separator.as_ref())))
    });

    interp.define_method(proto, "indexOf", 1, |interp, this, args| {
        let array = this_array(interp, &this)?;
        let search = arg(args, 0);
        let length = interp.heap.get(array).array_length().unwrap_or(0);
        let from = to_integer_or_infinity(interp, &arg(args, 1))?;
        let start = clamp_index(from, length as usize) as u32;
        for index in start..length {
            let value = interp.get_member(&this, &PropertyKey::Index(index))?;
            if value.strict_equals(&search) {
                return Ok(Value::Number(f64::from(index)));
            }
        }
        Ok(Value::Number(-1.0))
    });

    interp.define_method(proto, "includes", 1, |interp, this, args| {
        let array = this_array(interp, &this)?;
        let search = arg(args, 0);
        let length = interp.heap.get(array).array_length().unwrap_or(0);
        for index in 0..length {
            let value = interp.get_member(&this, &PropertyKey::Index(index))?;
            if value.same_value_zero(&search) {
                return Ok(Value::Bool(true));
            }
        }
        Ok(Value::Bool(false))
    });

    interp.define_method(proto, "slice", 2, |interp, this, args| {
        let array = this_array(interp, &this)?;
        let length = interp.heap.get(array).array_length().unwrap_or(0) as usize;
        let start = clamp_index(to_integer_or_infinity(interp, &arg(args, 0))?, length);
        let end = match args.get(1) {
            Some(Value::Undefined) | None => length,
            Some(value) => {
                let relative = to_integer_or_infinity(interp, &value.clone())?;
                clamp_index(relative, length)
            }
        };
        let mut values = Vec::new();
        for index in start..end {
            values.push(interp.get_member(&this, &PropertyKey::Index(index as u32))?);
        }
        Ok(Value::Object(interp.alloc_array(values)))
    });

    // Array text form is its joined elements.
    interp.define_method(proto, "toString", 0, |interp, this, _args| {
        if this_array(interp, &this).is_err() {
            return Ok(Value::string("[object Object]"));
        }
        let join = interp.get_member(&this, &PropertyKey::from_str("join"))?;
        interp.call_value(join, this, &[])
    });
}

fn this_array(interp: &mut Interpreter, this: &Value) -> JsResult<Handle> {
    match this.as_object().filter(|h| interp.heap.get(*h).is_array()) {
        Some(handle) => Ok(handle),
        None => Err(interp.throw_type_error("receiver is not an array")),
    }
}
