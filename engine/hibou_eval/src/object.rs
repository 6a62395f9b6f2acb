//! Heap objects: ordinary objects, arrays, functions, and class data.
//!
//! Own properties split into canonically-indexed elements (kept sorted)
//! and string-keyed properties (insertion order); enumeration yields
//! indices in ascending order first, then strings in insertion order.

use crate::env::EnvRef;
use crate::heap::Handle;
use crate::interpreter::Interpreter;
use crate::value::{array_index_of, JsStr, Value};
use hibou_ir::{ExprId, FuncId, Program};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Identity of a private class member. Two classes (or two evaluations of
/// the same class text) never share ids, so a brand check distinguishes
/// their instances.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrivateId(pub u32);

/// An own-property key. Canonical array indices are kept numeric so they
/// enumerate in ascending order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PropertyKey {
    Index(u32),
    Str(JsStr),
}

impl PropertyKey {
    pub fn from_str(key: &str) -> PropertyKey {
        match array_index_of(key) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Str(Rc::from(key)),
        }
    }

    pub fn from_js_str(key: &JsStr) -> PropertyKey {
        match array_index_of(key) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Str(key.clone()),
        }
    }

    pub fn from_index(index: u32) -> PropertyKey {
        PropertyKey::Index(index)
    }

    pub fn as_display(&self) -> String {
        match self {
            PropertyKey::Index(index) => index.to_string(),
            PropertyKey::Str(s) => s.to_string(),
        }
    }
}

/// An own property: a data slot or an accessor pair.
#[derive(Clone, Debug)]
pub enum Property {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
        configurable: bool,
    },
}

impl Property {
    /// Ordinary assignment-created property.
    pub fn data(value: Value) -> Property {
        Property::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Method-like property: writable and configurable but not enumerable,
    /// the shape of class methods and builtins.
    pub fn method(value: Value) -> Property {
        Property::Data {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    pub fn accessor(get: Option<Value>, set: Option<Value>, enumerable: bool) -> Property {
        Property::Accessor {
            get,
            set,
            enumerable,
            configurable: true,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            Property::Data { enumerable, .. } | Property::Accessor { enumerable, .. } => {
                *enumerable
            }
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            Property::Data { configurable, .. } | Property::Accessor { configurable, .. } => {
                *configurable
            }
        }
    }
}

/// Script function: AST plus captured environment.
#[derive(Clone)]
pub struct ScriptFunction {
    pub program: Rc<Program>,
    pub func: FuncId,
    pub env: EnvRef,
}

/// Host function signature. `this` first, then the argument slice.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Value>>;

/// Key of a class field, with computed keys already evaluated.
#[derive(Clone, Debug)]
pub enum ClassFieldKey {
    Prop(PropertyKey),
    Private(PrivateId),
}

/// One instance field, initialized per construction.
#[derive(Clone, Debug)]
pub struct ClassField {
    pub key: ClassFieldKey,
    pub init: Option<ExprId>,
}

/// Evaluated class: everything `new` needs.
pub struct ClassData {
    /// Explicit constructor body, if the class declared one.
    pub constructor: Option<FuncId>,
    pub program: Rc<Program>,
    /// Class scope (captures outer bindings and the private-name table).
    pub env: EnvRef,
    /// Parent constructor for `extends`.
    pub parent: Option<Handle>,
    pub fields: Rc<Vec<ClassField>>,
    /// Private methods and accessors, installed on each instance's private
    /// table at construction (values are shared).
    pub instance_privates: Rc<Vec<(PrivateId, Value)>>,
}

/// What calling a function object does.
pub enum Callable {
    Script(ScriptFunction),
    Native(NativeFn),
    /// The global `eval`; the call evaluator runs the source in the
    /// caller's environment instead of dispatching here.
    Eval,
    Class(Box<ClassData>),
    /// Result of `Function.prototype.bind`.
    Bound {
        target: Handle,
        this_value: Value,
        bound_args: Vec<Value>,
    },
}

pub struct FunctionData {
    pub name: JsStr,
    pub length: u32,
    pub callable: Callable,
    /// Method's home object, for `super.m()` lookups.
    pub home_object: Option<Handle>,
}

/// Resolved state of a promise.
#[derive(Clone, Debug)]
pub enum PromiseState {
    Fulfilled(Value),
    Rejected(Value),
}

pub enum ObjectKind {
    Ordinary,
    /// Array exotic object; `length` is virtual and tracks element writes.
    Array { length: u32 },
    Function(Box<FunctionData>),
    /// Error instances; lets display show `name: message` instead of raw
    /// properties.
    Error,
    Promise(PromiseState),
}

pub struct JsObject {
    pub proto: Option<Handle>,
    props: IndexMap<JsStr, Property>,
    elements: BTreeMap<u32, Property>,
    pub kind: ObjectKind,
    pub extensible: bool,
    private: FxHashMap<PrivateId, Value>,
}

impl JsObject {
    pub fn ordinary(proto: Option<Handle>) -> JsObject {
        JsObject {
            proto,
            props: IndexMap::new(),
            elements: BTreeMap::new(),
            kind: ObjectKind::Ordinary,
            extensible: true,
            private: FxHashMap::default(),
        }
    }

    pub fn array(proto: Option<Handle>) -> JsObject {
        JsObject {
            kind: ObjectKind::Array { length: 0 },
            ..JsObject::ordinary(proto)
        }
    }

    pub fn function(proto: Option<Handle>, data: FunctionData) -> JsObject {
        JsObject {
            kind: ObjectKind::Function(Box::new(data)),
            ..JsObject::ordinary(proto)
        }
    }

    pub fn error(proto: Option<Handle>) -> JsObject {
        JsObject {
            kind: ObjectKind::Error,
            ..JsObject::ordinary(proto)
        }
    }

    pub fn promise(proto: Option<Handle>, state: PromiseState) -> JsObject {
        JsObject {
            kind: ObjectKind::Promise(state),
            ..JsObject::ordinary(proto)
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn function_data(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }

    pub fn array_length(&self) -> Option<u32> {
        match self.kind {
            ObjectKind::Array { length } => Some(length),
            _ => None,
        }
    }

    /// Own property lookup. For arrays, `length` is materialized here.
    pub fn own_property(&self, key: &PropertyKey) -> Option<Property> {
        if let ObjectKind::Array { length } = self.kind {
            if matches!(key, PropertyKey::Str(s) if &**s == "length") {
                return Some(Property::Data {
                    value: Value::Number(f64::from(length)),
                    writable: true,
                    enumerable: false,
                    configurable: false,
                });
            }
        }
        match key {
            PropertyKey::Index(index) => self.elements.get(index).cloned(),
            PropertyKey::Str(s) => self.props.get(s).cloned(),
        }
    }

    pub fn has_own(&self, key: &PropertyKey) -> bool {
        if let ObjectKind::Array { .. } = self.kind {
            if matches!(key, PropertyKey::Str(s) if &**s == "length") {
                return true;
            }
        }
        match key {
            PropertyKey::Index(index) => self.elements.contains_key(index),
            PropertyKey::Str(s) => self.props.contains_key(s),
        }
    }

    /// Install or overwrite an own property, applying the array `length`
    /// invariant: writing index `n` grows `length` to `n + 1`, writing
    /// `length` truncates.
    pub fn define_own(&mut self, key: PropertyKey, property: Property) {
        if let ObjectKind::Array { ref mut length } = self.kind {
            match &key {
                PropertyKey::Index(index) => {
                    if *index >= *length {
                        *length = index + 1;
                    }
                }
                PropertyKey::Str(s) if &**s == "length" => {
                    if let Property::Data { value, .. } = &property {
                        if let Value::Number(n) = value {
                            let new_length = *n as u32;
                            if f64::from(new_length) == *n {
                                self.set_array_length(new_length);
                            }
                        }
                    }
                    return;
                }
                _ => {}
            }
        }
        match key {
            PropertyKey::Index(index) => {
                self.elements.insert(index, property);
            }
            PropertyKey::Str(s) => {
                self.props.insert(s, property);
            }
        }
    }

    /// Truncating `length` drops every element at or past the new length.
    pub fn set_array_length(&mut self, new_length: u32) {
        if let ObjectKind::Array { ref mut length } = self.kind {
            if new_length < *length {
                self.elements.split_off(&new_length);
            }
            *length = new_length;
        }
    }

    /// Delete an own property; false when it exists but is
    /// non-configurable.
    pub fn delete_own(&mut self, key: &PropertyKey) -> bool {
        if let ObjectKind::Array { .. } = self.kind {
            if matches!(key, PropertyKey::Str(s) if &**s == "length") {
                return false;
            }
        }
        match key {
            PropertyKey::Index(index) => match self.elements.get(index) {
                Some(property) if !property.is_configurable() => false,
                Some(_) => {
                    self.elements.remove(index);
                    true
                }
                None => true,
            },
            PropertyKey::Str(s) => match self.props.get(s) {
                Some(property) if !property.is_configurable() => false,
                Some(_) => {
                    self.props.shift_remove(s);
                    true
                }
                None => true,
            },
        }
    }

    /// Own keys in enumeration order: ascending indices, then strings in
    /// insertion order. `enumerable_only` filters for `for..in` and
    /// `Object.keys`.
    pub fn own_keys(&self, enumerable_only: bool) -> Vec<PropertyKey> {
        let mut keys = Vec::with_capacity(self.elements.len() + self.props.len());
        for (index, property) in &self.elements {
            if !enumerable_only || property.is_enumerable() {
                keys.push(PropertyKey::Index(*index));
            }
        }
        for (name, property) in &self.props {
            if !enumerable_only || property.is_enumerable() {
                keys.push(PropertyKey::Str(name.clone()));
            }
        }
        keys
    }

    pub fn get_private(&self, id: PrivateId) -> Option<&Value> {
        self.private.get(&id)
    }

    pub fn set_private(&mut self, id: PrivateId, value: Value) {
        self.private.insert(id, value);
    }

    pub fn has_private(&self, id: PrivateId) -> bool {
        self.private.contains_key(&id)
    }

    /// Visit every value and environment this object keeps alive.
    pub(crate) fn trace(&self, mut value: impl FnMut(&Value), mut env: impl FnMut(&EnvRef)) {
        if let Some(proto) = self.proto {
            value(&Value::Object(proto));
        }
        let visit_property = |property: &Property, value: &mut dyn FnMut(&Value)| match property
        {
            Property::Data { value: v, .. } => value(v),
            Property::Accessor { get, set, .. } => {
                if let Some(get) = get {
                    value(get);
                }
                if let Some(set) = set {
                    value(set);
                }
            }
        };
        for property in self.elements.values() {
            visit_property(property, &mut value);
        }
        for property in self.props.values() {
            visit_property(property, &mut value);
        }
        for v in self.private.values() {
            value(v);
        }
        match &self.kind {
            ObjectKind::Function(data) => {
                if let Some(home) = data.home_object {
                    value(&Value::Object(home));
                }
                match &data.callable {
                    Callable::Script(script) => env(&script.env),
                    Callable::Class(class) => {
                        env(&class.env);
                        if let Some(parent) = class.parent {
                            value(&Value::Object(parent));
                        }
                        for (_, v) in class.instance_privates.iter() {
                            value(v);
                        }
                    }
                    Callable::Bound {
                        target,
                        this_value,
                        bound_args,
                    } => {
                        value(&Value::Object(*target));
                        value(this_value);
                        for arg in bound_args {
                            value(arg);
                        }
                    }
                    Callable::Native(_) | Callable::Eval => {}
                }
            }
            ObjectKind::Promise(state) => match state {
                PromiseState::Fulfilled(v) | PromiseState::Rejected(v) => value(v),
            },
            ObjectKind::Ordinary | ObjectKind::Array { .. } | ObjectKind::Error => {}
        }
    }
}
