//! The `Math` namespace object.

use super::arg;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    let math = interp.alloc_ordinary();

    interp.define_value(math, "PI", Value::Number(std::f64::consts::PI));
    interp.define_value(math, "E", Value::Number(std::f64::consts::E));

    interp.define_method(math, "abs", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(n.abs()))
    });
    interp.define_method(math, "floor", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(n.floor()))
    });
    interp.define_method(math, "ceil", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(n.ceil()))
    });
    interp.define_method(math, "sqrt", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(n.sqrt()))
    });
    interp.define_method(math, "trunc", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(n.trunc()))
    });
    interp.define_method(math, "pow", 2, |interp, _this, args| {
        let base = interp.to_number_value(&arg(args, 0))?;
        let exp = interp.to_number_value(&arg(args, 1))?;
        Ok(Value::Number(base.powf(exp)))
    });
    interp.define_method(math, "round", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Number(round_half_up(n)))
    });
    interp.define_method(math, "max", 2, |interp, _this, args| {
        let mut best = f64::NEG_INFINITY;
        for value in args {
            let n = interp.to_number_value(value)?;
            if n.is_nan() {
                return Ok(Value::Number(f64::NAN));
            }
            if n > best || (n == best && best.is_sign_negative() && !n.is_sign_negative()) {
                best = n;
            }
        }
        Ok(Value::Number(best))
    });
    interp.define_method(math, "min", 2, |interp, _this, args| {
        let mut best = f64::INFINITY;
        for value in args {
            let n = interp.to_number_value(value)?;
            if n.is_nan() {
                return Ok(Value::Number(f64::NAN));
            }
            if n < best || (n == best && !best.is_sign_negative() && n.is_sign_negative()) {
                best = n;
            }
        }
        Ok(Value::Number(best))
    });

    interp.declare_global("Math", Value::Object(math));
}

/// Round with halves toward positive infinity; results between -0.5 and
/// 0 keep the negative zero.
fn round_half_up(n: f64) -> f64 {
    if !n.is_finite() || n.fract() == 0.0 {
        return n;
    }
    let rounded = (n + 0.5).floor();
    if rounded == 0.0 && n < 0.0 {
        -0.0
    } else {
        rounded
    }
}
