//! The interpreter: engine state, public API, and shared runtime helpers.

mod call;
mod class;
mod exec_expr;
mod exec_stmt;
mod ops;
mod pattern;

use crate::builtins;
use crate::env::{self, EnvRef, Environment};
use crate::error::EngineError;
use crate::heap::{Handle, Heap};
use crate::object::{
    Callable, FunctionData, JsObject, NativeFn, ObjectKind, PrivateId, Property, PropertyKey,
    ScriptFunction,
};
use crate::value::Value;
use hibou_ir::{FuncId, Name, Program, SharedInterner, StringInterner, ThisMode};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;

/// Expression results either produce a value or unwind with a thrown one.
pub(crate) type JsResult<T> = Result<T, Value>;

/// Statement completions. Thrown values travel in the `Err` channel of
/// [`JsResult`]; everything else is a completion.
#[derive(Debug)]
pub(crate) enum Completion {
    Normal(Option<Value>),
    Return(Value),
    Break(Option<Name>),
    Continue(Option<Name>),
}

/// One execution frame: the program unit being walked and the environment
/// it executes in. Cheap to clone (two `Rc`s).
#[derive(Clone)]
pub(crate) struct Frame {
    pub program: Rc<Program>,
    pub env: EnvRef,
}

impl Frame {
    pub fn with_env(&self, env: EnvRef) -> Frame {
        Frame {
            program: self.program.clone(),
            env,
        }
    }
}

struct Microtask {
    callback: Value,
    args: Vec<Value>,
}

/// Heap addresses of the prototype objects and other well-known values.
pub(crate) struct Intrinsics {
    pub object_proto: Handle,
    pub function_proto: Handle,
    pub array_proto: Handle,
    pub string_proto: Handle,
    pub number_proto: Handle,
    pub boolean_proto: Handle,
    pub error_proto: Handle,
    pub type_error_proto: Handle,
    pub range_error_proto: Handle,
    pub reference_error_proto: Handle,
    pub syntax_error_proto: Handle,
    pub promise_proto: Handle,
    /// The global `eval` function object, for direct-call detection.
    pub eval_function: Handle,
}

/// Output sink for `console.log`.
pub type PrintHandler = Box<dyn FnMut(&str)>;

/// Builder for an [`Interpreter`], letting hosts replace the print
/// handler before the globals are installed.
pub struct InterpreterBuilder {
    print: Option<PrintHandler>,
}

impl InterpreterBuilder {
    pub fn new() -> InterpreterBuilder {
        InterpreterBuilder { print: None }
    }

    /// Route `console.log` output to the given sink instead of stdout.
    pub fn print_handler(mut self, handler: PrintHandler) -> InterpreterBuilder {
        self.print = Some(handler);
        self
    }

    pub fn build(self) -> Interpreter {
        let print = self
            .print
            .unwrap_or_else(|| Box::new(|line: &str| println!("{line}")));
        Interpreter::with_print_handler(print)
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const MAX_CALL_DEPTH: usize = 8_000;

pub struct Interpreter {
    pub(crate) heap: Heap,
    pub(crate) interner: SharedInterner,
    pub(crate) global_env: EnvRef,
    pub(crate) intrinsics: Intrinsics,
    microtasks: VecDeque<Microtask>,
    pub(crate) print: PrintHandler,
    next_private_id: u32,
    pub(crate) call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    fn with_print_handler(print: PrintHandler) -> Interpreter {
        let interner: SharedInterner = std::sync::Arc::new(StringInterner::new());
        let mut heap = Heap::new();
        let global_env = Environment::global();
        let intrinsics = builtins::bootstrap_prototypes(&mut heap);
        let mut interpreter = Interpreter {
            heap,
            interner,
            global_env,
            intrinsics,
            microtasks: VecDeque::new(),
            print,
            next_private_id: 0,
            call_depth: 0,
        };
        builtins::install_globals(&mut interpreter);
        interpreter
    }

    /// Evaluate a source text in the engine's global environment.
    ///
    /// The returned value is the completion value of the last expression
    /// statement, `Undefined` otherwise.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, EngineError> {
        let program =
            hibou_parse::parse_source(source, &self.interner).map_err(EngineError::Syntax)?;
        let program = Rc::new(program);
        debug!(statements = program.body.len(), "program start");

        let frame = Frame {
            program: program.clone(),
            env: self.global_env.clone(),
        };
        if let Err(thrown) = self.enter_scope(&frame, &program.body) {
            return Err(self.uncaught(thrown));
        }

        let mut last = Value::Undefined;
        for &stmt in &program.body {
            match self.exec_stmt(&frame, stmt) {
                Ok(Completion::Normal(Some(value))) => last = value,
                Ok(_) => {}
                Err(thrown) => return Err(self.uncaught(thrown)),
            }
            if let Err(thrown) = self.drain_microtasks() {
                return Err(self.uncaught(thrown));
            }
            if self.heap.should_collect() {
                self.collect_garbage(&last);
            }
        }
        Ok(last)
    }

    /// Install a host function as a global binding.
    pub fn register_native<F>(&mut self, name: &str, length: u32, f: F)
    where
        F: Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Value> + 'static,
    {
        let handle = self.make_native(name, length, Rc::new(f));
        let name = self.interner.intern(name);
        self.global_env
            .borrow_mut()
            .declare(name, Value::Object(handle), true);
    }

    /// Render a value the way `console.log` would.
    pub fn display(&self, value: &Value) -> String {
        self.display_value(value)
    }

    fn uncaught(&mut self, thrown: Value) -> EngineError {
        EngineError::Uncaught(self.display_thrown(&thrown))
    }

    /// Schedule a callback on the microtask queue.
    pub(crate) fn enqueue_microtask(&mut self, callback: Value, args: Vec<Value>) {
        self.microtasks.push_back(Microtask { callback, args });
    }

    /// Run queued microtasks to exhaustion, FIFO. Tasks may enqueue more.
    fn drain_microtasks(&mut self) -> JsResult<()> {
        while let Some(task) = self.microtasks.pop_front() {
            self.call_value(task.callback, Value::Undefined, &task.args)?;
        }
        Ok(())
    }

    fn collect_garbage(&mut self, last: &Value) {
        let mut roots: Vec<Value> = vec![last.clone()];
        roots.extend(self.intrinsic_roots());
        for task in &self.microtasks {
            roots.push(task.callback.clone());
            roots.extend(task.args.iter().cloned());
        }
        let envs = [self.global_env.clone()];
        debug!(live = self.heap.live_count(), "gc start");
        self.heap.collect(&roots, &envs);
        debug!(live = self.heap.live_count(), "gc done");
    }

    fn intrinsic_roots(&self) -> Vec<Value> {
        let i = &self.intrinsics;
        [
            i.object_proto,
            i.function_proto,
            i.array_proto,
            i.string_proto,
            i.number_proto,
            i.boolean_proto,
            i.error_proto,
            i.type_error_proto,
            i.range_error_proto,
            i.reference_error_proto,
            i.syntax_error_proto,
            i.promise_proto,
            i.eval_function,
        ]
        .into_iter()
        .map(Value::Object)
        .collect()
    }

    pub(crate) fn fresh_private_id(&mut self) -> PrivateId {
        let id = PrivateId(self.next_private_id);
        self.next_private_id += 1;
        id
    }

    // ─── Object construction helpers ───────────────────────────────────

    pub(crate) fn alloc_ordinary(&mut self) -> Handle {
        let proto = self.intrinsics.object_proto;
        self.heap.alloc(JsObject::ordinary(Some(proto)))
    }

    pub(crate) fn alloc_array(&mut self, values: Vec<Value>) -> Handle {
        let proto = self.intrinsics.array_proto;
        let mut object = JsObject::array(Some(proto));
        for (index, value) in values.into_iter().enumerate() {
            object.define_own(PropertyKey::Index(index as u32), Property::data(value));
        }
        self.heap.alloc(object)
    }

    /// Create a function object for a script function, with `name`,
    /// `length`, and (for non-arrows) a fresh `.prototype`.
    pub(crate) fn make_function(
        &mut self,
        program: &Rc<Program>,
        func: FuncId,
        env: &EnvRef,
    ) -> Handle {
        let function = program.arena.function(func);
        let name: crate::value::JsStr = match function.name {
            Some(name) => Rc::from(self.interner.lookup(name)),
            None => Rc::from(""),
        };
        let length = function.expected_arg_count() as u32;
        let this_mode = function.this_mode;
        let data = FunctionData {
            name: name.clone(),
            length,
            callable: Callable::Script(ScriptFunction {
                program: program.clone(),
                func,
                env: env.clone(),
            }),
            home_object: None,
        };
        let proto = self.intrinsics.function_proto;
        let handle = self.heap.alloc(JsObject::function(Some(proto), data));
        self.install_function_props(handle, &name, length);
        if this_mode == ThisMode::Dynamic {
            let object_proto = self.intrinsics.object_proto;
            let mut prototype = JsObject::ordinary(Some(object_proto));
            prototype.define_own(
                PropertyKey::from_str("constructor"),
                Property::method(Value::Object(handle)),
            );
            let prototype = self.heap.alloc(prototype);
            self.heap.get_mut(handle).define_own(
                PropertyKey::from_str("prototype"),
                Property::Data {
                    value: Value::Object(prototype),
                    writable: true,
                    enumerable: false,
                    configurable: false,
                },
            );
        }
        handle
    }

    pub(crate) fn make_native(&mut self, name: &str, length: u32, f: NativeFn) -> Handle {
        let data = FunctionData {
            name: Rc::from(name),
            length,
            callable: Callable::Native(f),
            home_object: None,
        };
        let proto = self.intrinsics.function_proto;
        let handle = self.heap.alloc(JsObject::function(Some(proto), data));
        self.install_function_props(handle, name, length);
        handle
    }

    fn install_function_props(&mut self, handle: Handle, name: &str, length: u32) {
        let object = self.heap.get_mut(handle);
        object.define_own(
            PropertyKey::from_str("name"),
            Property::Data {
                value: Value::string(name),
                writable: false,
                enumerable: false,
                configurable: true,
            },
        );
        object.define_own(
            PropertyKey::from_str("length"),
            Property::Data {
                value: Value::Number(f64::from(length)),
                writable: false,
                enumerable: false,
                configurable: true,
            },
        );
    }

    /// Named evaluation: an anonymous function expression takes the name
    /// of the binding or property that receives it.
    pub(crate) fn name_anonymous_function(&mut self, value: &Value, name: &str) {
        let Some(handle) = value.as_object() else {
            return;
        };
        let renamed = match &mut self.heap.get_mut(handle).kind {
            ObjectKind::Function(data) if data.name.is_empty() => {
                data.name = Rc::from(name);
                true
            }
            _ => false,
        };
        if renamed {
            self.heap.get_mut(handle).define_own(
                PropertyKey::from_str("name"),
                Property::Data {
                    value: Value::string(name),
                    writable: false,
                    enumerable: false,
                    configurable: true,
                },
            );
        }
    }

    // ─── Error construction ────────────────────────────────────────────

    /// Build an error instance on the given prototype. The `name` comes
    /// from the prototype; only `message` is an own property.
    pub(crate) fn make_error(&mut self, proto: Handle, message: &str) -> Value {
        let mut object = JsObject::error(Some(proto));
        object.define_own(
            PropertyKey::from_str("message"),
            Property::method(Value::string(message)),
        );
        Value::Object(self.heap.alloc(object))
    }

    pub(crate) fn throw_type_error(&mut self, message: impl AsRef<str>) -> Value {
        let proto = self.intrinsics.type_error_proto;
        self.make_error(proto, message.as_ref())
    }

    pub(crate) fn throw_range_error(&mut self, message: impl AsRef<str>) -> Value {
        let proto = self.intrinsics.range_error_proto;
        self.make_error(proto, message.as_ref())
    }

    pub(crate) fn throw_reference_error(&mut self, message: impl AsRef<str>) -> Value {
        let proto = self.intrinsics.reference_error_proto;
        self.make_error(proto, message.as_ref())
    }

    pub(crate) fn throw_syntax_error(&mut self, message: impl AsRef<str>) -> Value {
        let proto = self.intrinsics.syntax_error_proto;
        self.make_error(proto, message.as_ref())
    }

    /// Enter a function-level scope: hoist `var` and function
    /// declarations, then block-level declarations for the same list.
    pub(crate) fn enter_scope(&mut self, frame: &Frame, body: &[hibou_ir::StmtId]) -> JsResult<()> {
        self.hoist_vars(frame, body);
        self.hoist_block(frame, body)
    }

    /// Guard recursive calls; deep recursion throws rather than aborting.
    pub(crate) fn check_call_depth(&mut self) -> JsResult<()> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(self.throw_range_error("maximum call stack size exceeded"));
        }
        Ok(())
    }

    /// Resolve a name in the current environment, or throw a
    /// ReferenceError.
    pub(crate) fn lookup_binding(&mut self, frame: &Frame, name: Name) -> JsResult<Value> {
        match env::lookup(&frame.env, name) {
            env::Lookup::Value(value) => Ok(value),
            env::Lookup::Uninitialized => {
                let text = self.interner.lookup(name);
                Err(self
                    .throw_reference_error(format!("cannot access '{text}' before initialization")))
            }
            env::Lookup::NotFound => {
                let text = self.interner.lookup(name);
                Err(self.throw_reference_error(format!("{text} is not defined")))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}
