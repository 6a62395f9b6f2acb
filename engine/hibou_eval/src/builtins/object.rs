//! The `Object` constructor, its statics, and `Object.prototype`.

use super::arg;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.object_proto;

    let ctor = interp.define_constructor("Object", 1, proto, |interp, _this, args| {
        match args.first() {
            Some(Value::Object(handle)) => Ok(Value::Object(*handle)),
            _ => Ok(Value::Object(interp.alloc_ordinary())),
        }
    });

    interp.define_method(ctor, "getPrototypeOf", 1, |interp, _this, args| {
        let Some(handle) = arg(args, 0).as_object() else {
            return Err(interp.throw_type_error("Object.getPrototypeOf called on non-object"));
        };
        Ok(match interp.heap.get(handle).proto {
            Some(proto) => Value::Object(proto),
            None => Value::Null,
        })
    });

    interp.define_method(ctor, "setPrototypeOf", 2, |interp, _this, args| {
        let Some(handle) = arg(args, 0).as_object() else {
            return Err(interp.throw_type_error("Object.setPrototypeOf called on non-object"));
        };
        let new_proto = match arg(args, 1) {
            Value::Null => None,
            Value::Object(proto) => Some(proto),
            _ => {
                return Err(
                    interp.throw_type_error("object prototype may only be an object or null")
                )
            }
        };
        // A prototype chain must stay acyclic.
        let mut current = new_proto;
        while let Some(ancestor) = current {
            if ancestor == handle {
                return Err(interp.throw_type_error("cyclic prototype chain is not allowed"));
            }
            current = interp.heap.get(ancestor).proto;
        }
        interp.heap.get_mut(handle).proto = new_proto;
        Ok(arg(args, 0))
    });

    interp.define_method(ctor, "keys", 1, |interp, _this, args| {
        let Some(handle) = arg(args, 0).as_object() else {
            return Ok(Value::Object(interp.alloc_array(Vec::new())));
        };
        let keys: Vec<Value> = interp
            .heap
            .get(handle)
            .own_keys(true)
            .into_iter()
            .map(|key| Value::string(key.as_display()))
            .collect();
        Ok(Value::Object(interp.alloc_array(keys)))
    });

    interp.define_method(ctor, "assign", 2, |interp, _this, args| {
        let target = arg(args, 0);
        let Some(handle) = target.as_object() else {
            return Err(interp.throw_type_error("Object.assign target must be an object"));
        };
        for source in args.iter().skip(1) {
            let Some(source_handle) = source.as_object() else {
                continue;
            };
            let keys = interp.heap.get(source_handle).own_keys(true);
            for key in keys {
                let value = interp.get_member(source, &key)?;
                interp.set_member(&Value::Object(handle), key, value)?;
            }
        }
        Ok(target)
    });

    interp.define_method(proto, "hasOwnProperty", 1, |interp, this, args| {
        let key = interp.to_property_key(&arg(args, 0))?;
        Ok(Value::Bool(match &this {
            Value::Object(handle) => interp.heap.get(*handle).has_own(&key),
            Value::String(s) => match &key {
                crate::object::PropertyKey::Index(index) => {
                    (*index as usize) < s.chars().count()
                }
                crate::object::PropertyKey::Str(k) => &**k == "length",
            },
            _ => false,
        }))
    });

    interp.define_method(proto, "toString", 0, |_interp, _this, _args| {
        Ok(Value::string("[object Object]"))
    });

    interp.define_method(proto, "valueOf", 0, |_interp, this, _args| Ok(this));

    interp.define_method(proto, "isPrototypeOf", 1, |interp, this, args| {
        let Some(target) = this.as_object() else {
            return Ok(Value::Bool(false));
        };
        let Some(mut current) = arg(args, 0).as_object() else {
            return Ok(Value::Bool(false));
        };
        loop {
            match interp.heap.get(current).proto {
                Some(proto) if proto == target => return Ok(Value::Bool(true)),
                Some(proto) => current = proto,
                None => return Ok(Value::Bool(false)),
            }
        }
    });
}
