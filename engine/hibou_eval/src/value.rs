//! Runtime values and the coercions that stay within primitives.
//!
//! Coercions that may call user code (`ToPrimitive` on objects, and the
//! object-aware `ToString`/`ToNumber`) live on the interpreter; everything
//! here is pure.

use crate::heap::Handle;
use std::rc::Rc;

/// A runtime string. Cheap to clone and share; content is immutable.
pub type JsStr = Rc<str>;

/// A runtime value.
///
/// Primitives are stored inline; objects (including functions and arrays)
/// live on the heap behind a [`Handle`].
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(JsStr),
    Object(Handle),
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Value {
        Value::String(Rc::from(text.as_ref()))
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn as_object(&self) -> Option<Handle> {
        match self {
            Value::Object(handle) => Some(*handle),
            _ => None,
        }
    }

    /// `ToBoolean`: falsy values are `undefined`, `null`, `false`, `0`,
    /// `-0`, `NaN`, and `""`.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// `ToNumber` for primitives. Objects must go through the interpreter.
    pub fn to_number_primitive(&self) -> Option<f64> {
        Some(match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(_) => return None,
        })
    }

    /// `typeof`, except that functions need a heap lookup and are handled
    /// by the caller.
    pub fn type_of_primitive(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            // Historical quirk: `typeof null` is "object".
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
        }
    }

    /// Strict equality (`===`) — no coercion; objects compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // NaN != NaN, +0 == -0.
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }

    /// `SameValueZero`, used by `Array.prototype.includes`: like strict
    /// equality but NaN equals NaN.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        if let (Value::Number(a), Value::Number(b)) = (self, other) {
            return a == b || (a.is_nan() && b.is_nan());
        }
        self.strict_equals(other)
    }
}

/// `ToNumber` on a string: whitespace-trimmed, empty means 0, honors the
/// `0x`/`0o`/`0b` prefixes and `Infinity`.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return match u64::from_str_radix(hex, 16) {
            Ok(value) => value as f64,
            Err(_) => f64::NAN,
        };
    }
    if let Some(oct) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        return match u64::from_str_radix(oct, 8) {
            Ok(value) => value as f64,
            Err(_) => f64::NAN,
        };
    }
    if let Some(bin) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        return match u64::from_str_radix(bin, 2) {
            Ok(value) => value as f64,
            Err(_) => f64::NAN,
        };
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// `ToString` on a number, matching the engine-visible formatting rules:
/// no trailing `.0` on integers, `NaN`, signed `Infinity`, exponent form
/// past 1e21.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    if n.abs() >= 1e21 {
        // Rust prints `1e21`; the expected form is `1e+21`.
        let formatted = format!("{n:e}");
        return match formatted.find('e') {
            Some(pos) if !formatted[pos + 1..].starts_with('-') => {
                format!("{}e+{}", &formatted[..pos], &formatted[pos + 1..])
            }
            _ => formatted,
        };
    }
    let mut formatted = format!("{n}");
    // Rust may print small magnitudes as `1e-7`; keep that form but with
    // the shortest mantissa `format!` already produced.
    if let Some(pos) = formatted.find('e') {
        if !formatted[pos + 1..].starts_with('-') {
            formatted = format!("{}e+{}", &formatted[..pos], &formatted[pos + 1..]);
        }
    }
    formatted
}

/// `ToInt32` for bitwise operators.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToUint32` for `>>>` and array index handling.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    let modulus = 2f64.powi(32);
    let mut m = n.trunc() % modulus;
    if m < 0.0 {
        m += modulus;
    }
    m as u32
}

/// Interpret a property key string as an array index, per the canonical
/// numeric-string rule (`"2"` is an index, `"02"` and `"-1"` are not).
pub fn array_index_of(key: &str) -> Option<u32> {
    if key == "0" {
        return Some(0);
    }
    if key.is_empty() || key.starts_with('0') || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // u32::MAX itself is not a valid index (length must be representable).
    key.parse::<u32>().ok().filter(|&idx| idx != u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn boolean_coercion() {
        assert!(!Value::Undefined.to_boolean());
        assert!(!Value::Null.to_boolean());
        assert!(!Value::Number(0.0).to_boolean());
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(!Value::string("").to_boolean());
        assert!(Value::string("0").to_boolean());
        assert!(Value::Number(-1.0).to_boolean());
    }

    #[test]
    fn string_to_number_rules() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  42  "), 42.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("Infinity"), f64::INFINITY);
        assert!(string_to_number("12abc").is_nan());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
    }

    #[test]
    fn int32_wrapping() {
        assert_eq!(to_int32(4294967296.0), 0);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_uint32(-1.0), 4294967295);
        assert_eq!(to_int32(2147483648.0), -2147483648);
    }

    #[test]
    fn canonical_array_indices() {
        assert_eq!(array_index_of("0"), Some(0));
        assert_eq!(array_index_of("17"), Some(17));
        assert_eq!(array_index_of("02"), None);
        assert_eq!(array_index_of("-1"), None);
        assert_eq!(array_index_of("1.5"), None);
        assert_eq!(array_index_of("longueur"), None);
    }

    #[test]
    fn strict_equality_is_identity_for_objects() {
        let a = Value::Object(Handle::from_index(1));
        let b = Value::Object(Handle::from_index(2));
        assert!(!a.strict_equals(&b));
        assert!(a.strict_equals(&a.clone()));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
    }
}
