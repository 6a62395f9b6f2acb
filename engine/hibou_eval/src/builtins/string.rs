//! The `String` constructor and prototype. Methods index by character,
//! and accept any receiver that coerces to a string.

use super::{arg, clamp_index, to_integer_or_infinity};
use crate::interpreter::{Interpreter, JsResult};
use crate::value::{JsStr, Value};

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.string_proto;

    interp.define_constructor("String", 1, proto, |interp, _this, args| {
        match args.first() {
            Some(value) => Ok(Value::String(interp.to_string_value(value)?)),
            None => Ok(Value::string("")),
        }
    });

    interp.define_method(proto, "toString", 0, |interp, this, _args| {
        Ok(Value::String(this_string(interp, &this)?))
    });
    interp.define_method(proto, "valueOf", 0, |interp, this, _args| {
        Ok(Value::String(this_string(interp, &this)?))
    });

    interp.define_method(proto, "indexOf", 1, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let search = interp.to_string_value(&arg(args, 0))?;
        let chars: Vec<char> = text.chars().collect();
        // fromIndex clamps to [0, length].
        let from = to_integer_or_infinity(interp, &arg(args, 1))?;
        let start = (from.max(0.0) as usize).min(chars.len());
        let needle: Vec<char> = search.chars().collect();
        if needle.is_empty() {
            return Ok(Value::Number(start as f64));
        }
        let mut index = start;
        while index + needle.len() <= chars.len() {
            if chars[index..index + needle.len()] == needle[..] {
                return Ok(Value::Number(index as f64));
            }
            index += 1;
        }
        Ok(Value::Number(-1.0))
    });

    interp.define_method(proto, "includes", 1, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let search = interp.to_string_value(&arg(args, 0))?;
        Ok(Value::Bool(text.contains(search.as_ref())))
    });

    interp.define_method(proto, "slice", 2, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let chars: Vec<char> = text.chars().collect();
        let start = clamp_index(to_integer_or_infinity(interp, &arg(args, 0))?, chars.len());
        let end = match args.get(1) {
            Some(Value::Undefined) | None => chars.len(),
            Some(value) => {
                let relative = to_integer_or_infinity(interp, &value.clone())?;
                clamp_index(relative, chars.len())
            }
        };
        if start >= end {
            return Ok(Value::string(""));
        }
        Ok(Value::string(chars[start..end].iter().collect::<String>()))
    });

    interp.define_method(proto, "charAt", 1, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let index = to_integer_or_infinity(interp, &arg(args, 0))?;
        if index < 0.0 {
            return Ok(Value::string(""));
        }
        Ok(match text.chars().nth(index as usize) {
            Some(c) => Value::string(c.to_string()),
            None => Value::string(""),
        })
    });

    interp.define_method(proto, "repeat", 1, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let count = to_integer_or_infinity(interp, &arg(args, 0))?;
        if count < 0.0 || count.is_infinite() {
            return Err(interp.throw_range_error("invalid count value"));
        }
        Ok(Value::string(text.repeat(count as usize)))
    });

    interp.define_method(proto, "toUpperCase", 0, |interp, this, _args| {
        let text = this_string(interp, &this)?;
        Ok(Value::string(text.to_uppercase()))
    });
    interp.define_method(proto, "toLowerCase", 0, |interp, this, _args| {
        let text = this_string(interp, &this)?;
        Ok(Value::string(text.to_lowercase()))
    });
    interp.define_method(proto, "trim", 0, |interp, this, _args| {
        let text = this_string(interp, &this)?;
        Ok(Value::string(text.trim()))
    });
    interp.define_method(proto, "split", 1, |interp, this, args| {
        let text = this_string(interp, &this)?;
        let parts: Vec<Value> = match args.first() {
            Some(Value::Undefined) | None => vec![Value::String(text)],
            Some(separator) => {
                let separator = interp.to_string_value(&separator.clone())?;
                if separator.is_empty() {
                    text.chars().map(|c| Value::string(c.to_string())).collect()
                } else {
                    text.split(separator.as_ref()).map(Value::string).collect()
                }
            }
        };
        Ok(Value::Object(interp.alloc_array(parts)))
    });
}

fn this_string(interp: &mut Interpreter, this: &Value) -> JsResult<JsStr> {
    interp.to_string_value(this)
}
