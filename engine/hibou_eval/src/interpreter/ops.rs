//! Runtime operations that may touch the heap or call user code:
//! object-aware coercions, property access, and value display.

use super::{Frame, Interpreter, JsResult};
use crate::heap::Handle;
use crate::object::{ObjectKind, Property, PropertyKey};
use crate::value::{number_to_string, JsStr, Value};
use hibou_ir::{BinaryOp, ExprId};
use rustc_hash::FxHashSet;
use std::rc::Rc;

/// Preferred primitive type for `ToPrimitive`.
#[derive(Copy, Clone, Eq, PartialEq)]
pub(crate) enum Hint {
    Default,
    Number,
    String,
}

impl Interpreter {
    /// `ToPrimitive`: objects try `valueOf` then `toString` (reversed for
    /// the string hint); a non-primitive result from both is a TypeError.
    pub(crate) fn to_primitive(&mut self, value: &Value, hint: Hint) -> JsResult<Value> {
        let Some(handle) = value.as_object() else {
            return Ok(value.clone());
        };
        let methods: [&str; 2] = match hint {
            Hint::String => ["toString", "valueOf"],
            Hint::Default | Hint::Number => ["valueOf", "toString"],
        };
        for name in methods {
            let method = self.get_member(value, &PropertyKey::from_str(name))?;
            if let Some(m) = method.as_object() {
                if self.heap.get(m).is_callable() {
                    let result = self.call_value(method, Value::Object(handle), &[])?;
                    if result.as_object().is_none() {
                        return Ok(result);
                    }
                }
            }
        }
        Err(self.throw_type_error("cannot convert object to primitive value"))
    }

    pub(crate) fn to_number_value(&mut self, value: &Value) -> JsResult<f64> {
        match value.to_number_primitive() {
            Some(n) => Ok(n),
            None => {
                let primitive = self.to_primitive(value, Hint::Number)?;
                // ToPrimitive never returns an object here.
                Ok(primitive.to_number_primitive().unwrap_or(f64::NAN))
            }
        }
    }

    pub(crate) fn to_string_value(&mut self, value: &Value) -> JsResult<JsStr> {
        match value {
            Value::Undefined => Ok(Rc::from("undefined")),
            Value::Null => Ok(Rc::from("null")),
            Value::Bool(true) => Ok(Rc::from("true")),
            Value::Bool(false) => Ok(Rc::from("false")),
            Value::Number(n) => Ok(Rc::from(number_to_string(*n).as_str())),
            Value::String(s) => Ok(s.clone()),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, Hint::String)?;
                self.to_string_value(&primitive)
            }
        }
    }

    pub(crate) fn to_property_key(&mut self, value: &Value) -> JsResult<PropertyKey> {
        let text = self.to_string_value(value)?;
        Ok(PropertyKey::from_js_str(&text))
    }

    /// `typeof`, including the function case that needs a heap lookup.
    pub(crate) fn type_of(&self, value: &Value) -> &'static str {
        if let Value::Object(handle) = value {
            if self.heap.get(*handle).is_callable() {
                return "function";
            }
        }
        value.type_of_primitive()
    }

    /// Loose equality (`==`).
    pub(crate) fn abstract_equals(&mut self, left: &Value, right: &Value) -> JsResult<bool> {
        use Value::*;
        match (left, right) {
            (Undefined | Null, Undefined | Null) => Ok(true),
            (Number(_), Number(_))
            | (String(_), String(_))
            | (Bool(_), Bool(_))
            | (Object(_), Object(_)) => Ok(left.strict_equals(right)),
            (Number(a), String(s)) | (String(s), Number(a)) => {
                Ok(*a == crate::value::string_to_number(s))
            }
            (Bool(b), other) | (other, Bool(b)) => {
                let as_number = Number(if *b { 1.0 } else { 0.0 });
                self.abstract_equals(&as_number, other)
            }
            (Object(_), Number(_) | String(_)) => {
                let primitive = self.to_primitive(left, Hint::Default)?;
                self.abstract_equals(&primitive, right)
            }
            (Number(_) | String(_), Object(_)) => {
                let primitive = self.to_primitive(right, Hint::Default)?;
                self.abstract_equals(left, &primitive)
            }
            _ => Ok(false),
        }
    }

    // ─── Property access ───────────────────────────────────────────────

    /// Property read, with primitive bases routed through their
    /// prototypes. Reading from `undefined`/`null` throws.
    pub(crate) fn get_member(&mut self, base: &Value, key: &PropertyKey) -> JsResult<Value> {
        match base {
            Value::Object(handle) => self.get_object_property(*handle, key, base.clone()),
            Value::String(s) => {
                if matches!(key, PropertyKey::Str(k) if &**k == "length") {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let PropertyKey::Index(index) = key {
                    return Ok(match s.chars().nth(*index as usize) {
                        Some(c) => Value::string(c.to_string()),
                        None => Value::Undefined,
                    });
                }
                let proto = self.intrinsics.string_proto;
                self.get_object_property(proto, key, base.clone())
            }
            Value::Number(_) => {
                let proto = self.intrinsics.number_proto;
                self.get_object_property(proto, key, base.clone())
            }
            Value::Bool(_) => {
                let proto = self.intrinsics.boolean_proto;
                self.get_object_property(proto, key, base.clone())
            }
            Value::Undefined | Value::Null => Err(self.throw_type_error(format!(
                "cannot read properties of {} (reading '{}')",
                if matches!(base, Value::Null) {
                    "null"
                } else {
                    "undefined"
                },
                key.as_display()
            ))),
        }
    }

    /// Prototype-chain read. Getters run with `this` bound to the
    /// original receiver.
    pub(crate) fn get_object_property(
        &mut self,
        start: Handle,
        key: &PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        let mut current = start;
        loop {
            match self.heap.get(current).own_property(key) {
                Some(Property::Data { value, .. }) => return Ok(value),
                Some(Property::Accessor { get, .. }) => {
                    return match get {
                        Some(getter) => self.call_value(getter, receiver, &[]),
                        None => Ok(Value::Undefined),
                    };
                }
                None => match self.heap.get(current).proto {
                    Some(parent) => current = parent,
                    None => return Ok(Value::Undefined),
                },
            }
        }
    }

    /// Property write. Setters anywhere on the chain intercept; otherwise
    /// the receiver gets an own data property.
    pub(crate) fn set_member(
        &mut self,
        base: &Value,
        key: PropertyKey,
        value: Value,
    ) -> JsResult<()> {
        let Some(receiver) = base.as_object() else {
            if base.is_nullish() {
                return Err(self.throw_type_error(format!(
                    "cannot set properties of {}",
                    if matches!(base, Value::Null) {
                        "null"
                    } else {
                        "undefined"
                    }
                )));
            }
            // Writes to other primitives are silently dropped.
            return Ok(());
        };
        // Array `length` writes coerce and validate here; anything that
        // is not a whole number in u32 range is a RangeError.
        if self.heap.get(receiver).array_length().is_some()
            && matches!(&key, PropertyKey::Str(s) if &**s == "length")
        {
            let n = self.to_number_value(&value)?;
            let new_length = n as u32;
            if f64::from(new_length) != n {
                return Err(self.throw_range_error("invalid array length"));
            }
            self.heap.get_mut(receiver).set_array_length(new_length);
            return Ok(());
        }
        let mut current = receiver;
        loop {
            match self.heap.get(current).own_property(&key) {
                Some(Property::Data { writable, .. }) => {
                    if current == receiver {
                        if writable {
                            self.heap.get_mut(receiver).define_own(key, Property::data(value));
                        }
                        return Ok(());
                    }
                    // Inherited data property: shadow on the receiver.
                    if !writable {
                        return Ok(());
                    }
                    self.heap.get_mut(receiver).define_own(key, Property::data(value));
                    return Ok(());
                }
                Some(Property::Accessor { set, .. }) => {
                    return match set {
                        Some(setter) => {
                            self.call_value(setter, Value::Object(receiver), &[value])?;
                            Ok(())
                        }
                        None => Ok(()),
                    };
                }
                None => match self.heap.get(current).proto {
                    Some(parent) => current = parent,
                    None => {
                        self.heap.get_mut(receiver).define_own(key, Property::data(value));
                        return Ok(());
                    }
                },
            }
        }
    }

    /// `in` operator: own-or-inherited property check.
    pub(crate) fn has_property(&self, start: Handle, key: &PropertyKey) -> bool {
        let mut current = start;
        loop {
            let object = self.heap.get(current);
            if object.has_own(key) {
                return true;
            }
            match object.proto {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// `instanceof`: walks the left operand's prototype chain looking for
    /// the constructor's `.prototype`.
    pub(crate) fn instance_of(&mut self, left: &Value, right: &Value) -> JsResult<bool> {
        let Some(ctor) = right.as_object().filter(|h| self.heap.get(*h).is_callable()) else {
            return Err(self.throw_type_error("right-hand side of 'instanceof' is not callable"));
        };
        let prototype = self.get_member(
            &Value::Object(ctor),
            &PropertyKey::from_str("prototype"),
        )?;
        let Some(prototype) = prototype.as_object() else {
            return Ok(false);
        };
        let Some(mut current) = left.as_object() else {
            return Ok(false);
        };
        loop {
            match self.heap.get(current).proto {
                Some(parent) if parent == prototype => return Ok(true),
                Some(parent) => current = parent,
                None => return Ok(false),
            }
        }
    }

    /// Relational comparison (`<` family): numeric unless both operands
    /// coerce to strings, which compare lexicographically.
    pub(crate) fn compare_values(
        &mut self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
    ) -> JsResult<bool> {
        let lp = self.to_primitive(left, Hint::Number)?;
        let rp = self.to_primitive(right, Hint::Number)?;
        if let (Value::String(a), Value::String(b)) = (&lp, &rp) {
            return Ok(match op {
                BinaryOp::Lt => a < b,
                BinaryOp::LtEq => a <= b,
                BinaryOp::Gt => a > b,
                BinaryOp::GtEq => a >= b,
                _ => unreachable!("not a relational operator"),
            });
        }
        let a = self.to_number_value(&lp)?;
        let b = self.to_number_value(&rp)?;
        Ok(match op {
            BinaryOp::Lt => a < b,
            BinaryOp::LtEq => a <= b,
            BinaryOp::Gt => a > b,
            BinaryOp::GtEq => a >= b,
            _ => unreachable!("not a relational operator"),
        })
    }

    /// `+`: string concatenation if either primitive is a string,
    /// numeric addition otherwise.
    pub(crate) fn add_values(&mut self, left: &Value, right: &Value) -> JsResult<Value> {
        let lp = self.to_primitive(left, Hint::Default)?;
        let rp = self.to_primitive(right, Hint::Default)?;
        if matches!(lp, Value::String(_)) || matches!(rp, Value::String(_)) {
            let a = self.to_string_value(&lp)?;
            let b = self.to_string_value(&rp)?;
            return Ok(Value::string(format!("{a}{b}")));
        }
        let a = self.to_number_value(&lp)?;
        let b = self.to_number_value(&rp)?;
        Ok(Value::Number(a + b))
    }

    // ─── Display ───────────────────────────────────────────────────────

    /// Inspect-style rendering used by `console.log` and error reporting.
    /// Never calls user code.
    pub(crate) fn display_value(&self, value: &Value) -> String {
        let mut seen = FxHashSet::default();
        self.display_inner(value, false, &mut seen)
    }

    /// Rendering for an uncaught thrown value: errors show
    /// `Name: message`, everything else displays as usual.
    pub(crate) fn display_thrown(&self, value: &Value) -> String {
        if let Some(handle) = value.as_object() {
            if matches!(self.heap.get(handle).kind, ObjectKind::Error) {
                return self.display_error(handle);
            }
        }
        self.display_value(value)
    }

    fn display_error(&self, handle: Handle) -> String {
        let name = self.own_or_inherited_data(handle, &PropertyKey::from_str("name"));
        let message = self.own_or_inherited_data(handle, &PropertyKey::from_str("message"));
        let name = match &name {
            Some(Value::String(s)) => s.to_string(),
            _ => "Error".to_owned(),
        };
        match &message {
            Some(Value::String(s)) if !s.is_empty() => format!("{name}: {s}"),
            _ => name,
        }
    }

    /// Data-property chain read without running accessors.
    fn own_or_inherited_data(&self, start: Handle, key: &PropertyKey) -> Option<Value> {
        let mut current = start;
        loop {
            let object = self.heap.get(current);
            if let Some(Property::Data { value, .. }) = object.own_property(key) {
                return Some(value);
            }
            current = object.proto?;
        }
    }

    fn display_inner(&self, value: &Value, nested: bool, seen: &mut FxHashSet<Handle>) -> String {
        match value {
            Value::Undefined => "undefined".to_owned(),
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if *n == 0.0 && n.is_sign_negative() {
                    // Inspect output distinguishes -0 even though
                    // ToString does not.
                    "-0".to_owned()
                } else {
                    number_to_string(*n)
                }
            }
            Value::String(s) => {
                if nested {
                    format!("'{s}'")
                } else {
                    s.to_string()
                }
            }
            Value::Object(handle) => self.display_object(*handle, seen),
        }
    }

    fn display_object(&self, handle: Handle, seen: &mut FxHashSet<Handle>) -> String {
        if !seen.insert(handle) {
            return "[Circular]".to_owned();
        }
        let object = self.heap.get(handle);
        let rendered = match &object.kind {
            ObjectKind::Function(data) => {
                if data.name.is_empty() {
                    "[Function (anonymous)]".to_owned()
                } else {
                    format!("[Function: {}]", data.name)
                }
            }
            ObjectKind::Error => self.display_error(handle),
            ObjectKind::Array { length } => {
                let mut parts = Vec::with_capacity(*length as usize);
                for index in 0..*length {
                    let entry = match object.own_property(&PropertyKey::Index(index)) {
                        Some(Property::Data { value, .. }) => {
                            self.display_inner(&value, true, seen)
                        }
                        Some(Property::Accessor { .. }) => "[Getter/Setter]".to_owned(),
                        None => "<1 empty item>".to_owned(),
                    };
                    parts.push(entry);
                }
                format!("[ {} ]", parts.join(", "))
            }
            ObjectKind::Promise(_) => "Promise { ... }".to_owned(),
            ObjectKind::Ordinary => {
                let mut parts = Vec::new();
                for key in object.own_keys(true) {
                    let entry = match object.own_property(&key) {
                        Some(Property::Data { value, .. }) => format!(
                            "{}: {}",
                            key.as_display(),
                            self.display_inner(&value, true, seen)
                        ),
                        Some(Property::Accessor { .. }) => {
                            format!("{}: [Getter/Setter]", key.as_display())
                        }
                        None => continue,
                    };
                    parts.push(entry);
                }
                if parts.is_empty() {
                    "{}".to_owned()
                } else {
                    format!("{{ {} }}", parts.join(", "))
                }
            }
        };
        seen.remove(&handle);
        rendered
    }

    /// Evaluate all arguments of a call, flattening spreads.
    pub(crate) fn eval_arguments(
        &mut self,
        frame: &Frame,
        args: &[hibou_ir::Argument],
    ) -> JsResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                hibou_ir::Argument::Item(expr) => values.push(self.eval_expr(frame, *expr)?),
                hibou_ir::Argument::Spread(expr) => {
                    let spread = self.eval_expr(frame, *expr)?;
                    self.spread_into(&spread, &mut values)?;
                }
            }
        }
        Ok(values)
    }

    /// Spread an iterable (array or string) into a vector.
    pub(crate) fn spread_into(&mut self, value: &Value, out: &mut Vec<Value>) -> JsResult<()> {
        match value {
            Value::Object(handle) if self.heap.get(*handle).is_array() => {
                let length = self.heap.get(*handle).array_length().unwrap_or(0);
                for index in 0..length {
                    out.push(self.get_member(value, &PropertyKey::Index(index))?);
                }
                Ok(())
            }
            Value::String(s) => {
                for c in s.chars() {
                    out.push(Value::string(c.to_string()));
                }
                Ok(())
            }
            _ => {
                let shown = self.type_of(value);
                Err(self.throw_type_error(format!("{shown} is not iterable")))
            }
        }
    }

    pub(crate) fn eval_exprs(&mut self, frame: &Frame, exprs: &[ExprId]) -> JsResult<Vec<Value>> {
        exprs.iter().map(|&e| self.eval_expr(frame, e)).collect()
    }
}
