//! Top-level global bindings that belong to no namespace object.

use super::arg;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn install(interp: &mut Interpreter) {
    interp.declare_global("undefined", Value::Undefined);
    interp.declare_global("NaN", Value::Number(f64::NAN));
    interp.declare_global("Infinity", Value::Number(f64::INFINITY));

    let eval = interp.intrinsics.eval_function;
    interp.declare_global("eval", Value::Object(eval));

    interp.register_native("isNaN", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Bool(n.is_nan()))
    });
    interp.register_native("isFinite", 1, |interp, _this, args| {
        let n = interp.to_number_value(&arg(args, 0))?;
        Ok(Value::Bool(n.is_finite()))
    });
    interp.register_native("parseFloat", 1, |interp, _this, args| {
        let text = interp.to_string_value(&arg(args, 0))?;
        Ok(Value::Number(parse_float_prefix(text.trim())))
    });
    interp.register_native("parseInt", 2, |interp, _this, args| {
        let text = interp.to_string_value(&arg(args, 0))?;
        let radix = interp.to_number_value(&arg(args, 1))?;
        Ok(Value::Number(parse_int_prefix(text.trim(), radix)))
    });
}

/// Longest numeric prefix, `parseFloat` style.
fn parse_float_prefix(s: &str) -> f64 {
    if s.starts_with("Infinity") || s.starts_with("+Infinity") {
        return f64::INFINITY;
    }
    if s.starts_with("-Infinity") {
        return f64::NEG_INFINITY;
    }
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        let b = bytes[end];
        let ok = match b {
            b'0'..=b'9' => true,
            b'+' | b'-' => end == 0 || matches!(bytes[end - 1], b'e' | b'E'),
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                true
            }
            b'e' | b'E' if !seen_exp && end > 0 => {
                seen_exp = true;
                true
            }
            _ => false,
        };
        if !ok {
            break;
        }
        end += 1;
    }
    // Backtrack over a dangling exponent marker.
    while end > 0 && matches!(bytes[end - 1], b'e' | b'E' | b'+' | b'-') {
        end -= 1;
    }
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Digit-prefix parse with radix handling, `parseInt` style.
fn parse_int_prefix(s: &str, radix: f64) -> f64 {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut radix = if radix.is_nan() || radix == 0.0 {
        10u32
    } else {
        let r = radix as i64;
        if !(2..=36).contains(&r) {
            return f64::NAN;
        }
        r as u32
    };
    let mut digits = rest;
    if (radix == 16 || radix == 10) && (digits.starts_with("0x") || digits.starts_with("0X")) {
        digits = &digits[2..];
        radix = 16;
    }
    let mut value = 0f64;
    let mut any = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value * f64::from(radix) + f64::from(d);
        any = true;
    }
    if !any {
        return f64::NAN;
    }
    if negative {
        -value
    } else {
        value
    }
}
