//! The `Number` and `Boolean` constructors and prototypes.

use super::arg;
use crate::interpreter::{Interpreter, JsResult};
use crate::value::{number_to_string, Value};

pub(super) fn install(interp: &mut Interpreter) {
    let proto = interp.intrinsics.number_proto;

    let ctor = interp.define_constructor("Number", 1, proto, |interp, _this, args| {
        match args.first() {
            Some(value) => Ok(Value::Number(interp.to_number_value(value)?)),
            None => Ok(Value::Number(0.0)),
        }
    });

    interp.define_value(ctor, "MAX_SAFE_INTEGER", Value::Number(9007199254740991.0));
    interp.define_value(ctor, "MIN_SAFE_INTEGER", Value::Number(-9007199254740991.0));
    interp.define_value(ctor, "EPSILON", Value::Number(f64::EPSILON));
    interp.define_value(ctor, "NaN", Value::Number(f64::NAN));
    interp.define_value(ctor, "POSITIVE_INFINITY", Value::Number(f64::INFINITY));
    interp.define_value(ctor, "NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY));

    interp.define_method(ctor, "isInteger", 1, |_interp, _this, args| {
        Ok(Value::Bool(match arg(args, 0) {
            Value::Number(n) => n.is_finite() && n.fract() == 0.0,
            _ => false,
        }))
    });
    interp.define_method(ctor, "isFinite", 1, |_interp, _this, args| {
        Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_finite())))
    });
    interp.define_method(ctor, "isNaN", 1, |_interp, _this, args| {
        Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_nan())))
    });

    interp.define_method(proto, "toString", 0, |interp, this, _args| {
        let n = this_number(interp, &this)?;
        Ok(Value::string(number_to_string(n)))
    });
    interp.define_method(proto, "valueOf", 0, |interp, this, _args| {
        Ok(Value::Number(this_number(interp, &this)?))
    });
    interp.define_method(proto, "toFixed", 1, |interp, this, args| {
        let n = this_number(interp, &this)?;
        let digits = interp.to_number_value(&arg(args, 0))?;
        if !(0.0..=100.0).contains(&digits) {
            return Err(interp.throw_range_error("toFixed() digits argument must be between 0 and 100"));
        }
        Ok(Value::string(format!("{:.*}", digits as usize, n)))
    });

    let boolean_proto = interp.intrinsics.boolean_proto;
    interp.define_constructor("Boolean", 1, boolean_proto, |_interp, _this, args| {
        Ok(Value::Bool(arg(args, 0).to_boolean()))
    });
    interp.define_method(boolean_proto, "toString", 0, |_interp, this, _args| {
        Ok(Value::string(if this.to_boolean() { "true" } else { "false" }))
    });
    interp.define_method(boolean_proto, "valueOf", 0, |_interp, this, _args| {
        Ok(Value::Bool(this.to_boolean()))
    });
}

fn this_number(interp: &mut Interpreter, this: &Value) -> JsResult<f64> {
    match this {
        Value::Number(n) => Ok(*n),
        other => interp.to_number_value(other),
    }
}
