//! The global environment: intrinsic prototypes, constructors, and the
//! standard library surface.

mod array;
mod console;
mod error;
mod function;
mod global;
mod math;
mod number;
mod object;
mod promise;
mod string;

use crate::heap::{Handle, Heap};
use crate::interpreter::{Interpreter, Intrinsics, JsResult};
use crate::object::{Callable, FunctionData, JsObject, Property, PropertyKey};
use crate::value::Value;
use std::rc::Rc;

/// Allocate the intrinsic prototype objects and wire their inheritance.
/// Properties are installed later by [`install_globals`], which has an
/// interpreter to build native functions with.
pub(crate) fn bootstrap_prototypes(heap: &mut Heap) -> Intrinsics {
    let object_proto = heap.alloc(JsObject::ordinary(None));
    let function_proto = heap.alloc(JsObject::function(
        Some(object_proto),
        FunctionData {
            name: Rc::from(""),
            length: 0,
            // Function.prototype is callable and returns undefined.
            callable: Callable::Native(Rc::new(|_, _, _| Ok(Value::Undefined))),
            home_object: None,
        },
    ));
    let array_proto = heap.alloc(JsObject::array(Some(object_proto)));
    let string_proto = heap.alloc(JsObject::ordinary(Some(object_proto)));
    let number_proto = heap.alloc(JsObject::ordinary(Some(object_proto)));
    let boolean_proto = heap.alloc(JsObject::ordinary(Some(object_proto)));
    let error_proto = heap.alloc(JsObject::ordinary(Some(object_proto)));
    let type_error_proto = heap.alloc(JsObject::ordinary(Some(error_proto)));
    let range_error_proto = heap.alloc(JsObject::ordinary(Some(error_proto)));
    let reference_error_proto = heap.alloc(JsObject::ordinary(Some(error_proto)));
    let syntax_error_proto = heap.alloc(JsObject::ordinary(Some(error_proto)));
    let promise_proto = heap.alloc(JsObject::ordinary(Some(object_proto)));
    let eval_function = heap.alloc(JsObject::function(
        Some(function_proto),
        FunctionData {
            name: Rc::from("eval"),
            length: 1,
            callable: Callable::Eval,
            home_object: None,
        },
    ));
    Intrinsics {
        object_proto,
        function_proto,
        array_proto,
        string_proto,
        number_proto,
        boolean_proto,
        error_proto,
        type_error_proto,
        range_error_proto,
        reference_error_proto,
        syntax_error_proto,
        promise_proto,
        eval_function,
    }
}

/// Populate the global environment and the intrinsic prototypes.
pub(crate) fn install_globals(interp: &mut Interpreter) {
    global::install(interp);
    object::install(interp);
    function::install(interp);
    array::install(interp);
    string::install(interp);
    number::install(interp);
    math::install(interp);
    error::install(interp);
    console::install(interp);
    promise::install(interp);
}

impl Interpreter {
    /// Install a native function as a method-shaped property.
    pub(crate) fn define_method<F>(&mut self, target: Handle, name: &str, length: u32, f: F)
    where
        F: Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Value> + 'static,
    {
        let function = self.make_native(name, length, Rc::new(f));
        self.heap.get_mut(target).define_own(
            PropertyKey::from_str(name),
            Property::method(Value::Object(function)),
        );
    }

    /// Install a non-enumerable data property.
    pub(crate) fn define_value(&mut self, target: Handle, name: &str, value: Value) {
        self.heap
            .get_mut(target)
            .define_own(PropertyKey::from_str(name), Property::method(value));
    }

    /// Declare an immutable global binding.
    pub(crate) fn declare_global(&mut self, name: &str, value: Value) {
        let name = self.interner.intern(name);
        self.global_env.borrow_mut().declare(name, value, false);
    }

    /// Build a constructor: a native function with a `.prototype` link
    /// and a `constructor` back-reference, bound as a global.
    pub(crate) fn define_constructor<F>(
        &mut self,
        name: &str,
        length: u32,
        prototype: Handle,
        f: F,
    ) -> Handle
    where
        F: Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Value> + 'static,
    {
        let ctor = self.make_native(name, length, Rc::new(f));
        self.heap.get_mut(ctor).define_own(
            PropertyKey::from_str("prototype"),
            Property::Data {
                value: Value::Object(prototype),
                writable: false,
                enumerable: false,
                configurable: false,
            },
        );
        self.heap.get_mut(prototype).define_own(
            PropertyKey::from_str("constructor"),
            Property::method(Value::Object(ctor)),
        );
        self.declare_global(name, Value::Object(ctor));
        ctor
    }
}

/// Argument access: absent arguments read as `undefined`.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// `ToIntegerOrInfinity`, the index-coercion step shared by the string
/// and array methods.
pub(crate) fn to_integer_or_infinity(interp: &mut Interpreter, value: &Value) -> JsResult<f64> {
    let n = interp.to_number_value(value)?;
    if n.is_nan() {
        return Ok(0.0);
    }
    Ok(n.trunc())
}

/// Clamp a possibly-negative index against a length, per the `slice`
/// family's rules.
pub(crate) fn clamp_index(relative: f64, length: usize) -> usize {
    if relative < 0.0 {
        let from_end = length as f64 + relative;
        if from_end < 0.0 {
            0
        } else {
            from_end as usize
        }
    } else if relative > length as f64 {
        length
    } else {
        relative as usize
    }
}
