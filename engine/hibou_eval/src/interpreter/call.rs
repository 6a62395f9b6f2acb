//! Function invocation: script calls, natives, `new`, bound functions,
//! and `eval`.

use super::{Completion, Frame, Interpreter, JsResult};
use crate::env::Environment;
use crate::heap::Handle;
use crate::object::{
    Callable, JsObject, NativeFn, ObjectKind, PromiseState, PropertyKey, ScriptFunction,
};
use crate::value::Value;
use hibou_ir::{FunctionBody, Param, ThisMode};
use hibou_stack::ensure_sufficient_stack;

/// Snapshot of a function object's callable, cloned out of the heap so
/// the call can mutate it.
enum CallKind {
    Script(ScriptFunction, Option<Handle>),
    Native(NativeFn),
    Eval,
    Class,
    Bound {
        target: Handle,
        this_value: Value,
        bound_args: Vec<Value>,
    },
}

impl Interpreter {
    fn call_kind(&self, handle: Handle) -> Option<CallKind> {
        let data = self.heap.get(handle).function_data()?;
        Some(match &data.callable {
            Callable::Script(script) => CallKind::Script(script.clone(), data.home_object),
            Callable::Native(f) => CallKind::Native(f.clone()),
            Callable::Eval => CallKind::Eval,
            Callable::Class(_) => CallKind::Class,
            Callable::Bound {
                target,
                this_value,
                bound_args,
            } => CallKind::Bound {
                target: *target,
                this_value: this_value.clone(),
                bound_args: bound_args.clone(),
            },
        })
    }

    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        this: Value,
        args: &[Value],
    ) -> JsResult<Value> {
        let kind = callee.as_object().and_then(|handle| self.call_kind(handle));
        let Some(kind) = kind else {
            let shown = self.display_value(&callee);
            return Err(self.throw_type_error(format!("{shown} is not a function")));
        };
        match kind {
            CallKind::Script(script, home) => self.call_script(script, home, this, args),
            CallKind::Native(f) => f(self, this, args),
            // An aliased `eval` loses its caller scope and runs globally.
            CallKind::Eval => {
                let env = self.global_env.clone();
                self.direct_eval(&env, args)
            }
            CallKind::Class => {
                Err(self
                    .throw_type_error("class constructor cannot be invoked without 'new'"))
            }
            CallKind::Bound {
                target,
                this_value,
                bound_args,
            } => {
                let mut all = bound_args;
                all.extend_from_slice(args);
                self.call_value(Value::Object(target), this_value, &all)
            }
        }
    }

    pub(crate) fn call_script(
        &mut self,
        script: ScriptFunction,
        home: Option<Handle>,
        this: Value,
        args: &[Value],
    ) -> JsResult<Value> {
        self.check_call_depth()?;
        let program = script.program.clone();
        let function = program.arena.function(script.func);
        let env = match function.this_mode {
            ThisMode::Dynamic => Environment::function_scope(&script.env, Some(this), home),
            ThisMode::Lexical => Environment::child(&script.env),
        };
        let frame = Frame {
            program: program.clone(),
            env,
        };
        self.bind_params(&frame, &function.params, args)?;
        if function.this_mode == ThisMode::Dynamic {
            self.install_arguments(&frame, args);
        }
        self.call_depth += 1;
        let outcome =
            ensure_sufficient_stack(|| self.run_function_body(&frame, &function.body));
        self.call_depth -= 1;
        if function.is_async {
            // Async bodies complete synchronously; the wrapper promise is
            // already settled.
            return Ok(match outcome {
                Ok(value) => self.promise_resolve(value),
                Err(error) => self.promise_reject(error),
            });
        }
        outcome
    }

    fn run_function_body(&mut self, frame: &Frame, body: &FunctionBody) -> JsResult<Value> {
        match body {
            FunctionBody::Expression(expr) => self.eval_expr(frame, *expr),
            FunctionBody::Block(stmts) => {
                self.enter_scope(frame, stmts)?;
                match self.exec_stmt_list(frame, stmts)? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    pub(crate) fn bind_params(
        &mut self,
        frame: &Frame,
        params: &[Param],
        args: &[Value],
    ) -> JsResult<()> {
        use super::pattern::BindMode;
        for (index, param) in params.iter().enumerate() {
            if param.rest {
                let rest: Vec<Value> = args.get(index..).unwrap_or(&[]).to_vec();
                let array = self.alloc_array(rest);
                self.bind_pattern(frame, param.pattern, Value::Object(array), BindMode::Param)?;
                break;
            }
            let mut value = args.get(index).cloned().unwrap_or(Value::Undefined);
            if let Some(default) = param.default {
                if matches!(value, Value::Undefined) {
                    value = self.eval_expr(frame, default)?;
                }
            }
            self.bind_pattern(frame, param.pattern, value, BindMode::Param)?;
        }
        Ok(())
    }

    /// Non-arrow functions see an `arguments` array unless a parameter
    /// shadows the name.
    fn install_arguments(&mut self, frame: &Frame, args: &[Value]) {
        let name = self.interner.intern("arguments");
        if frame.env.borrow().has_own(name) {
            return;
        }
        let array = self.alloc_array(args.to_vec());
        frame
            .env
            .borrow_mut()
            .declare(name, Value::Object(array), false);
    }

    pub(crate) fn construct(&mut self, callee: Value, args: &[Value]) -> JsResult<Value> {
        let Some(handle) = callee.as_object() else {
            let shown = self.display_value(&callee);
            return Err(self.throw_type_error(format!("{shown} is not a constructor")));
        };
        let Some(kind) = self.call_kind(handle) else {
            let shown = self.display_value(&callee);
            return Err(self.throw_type_error(format!("{shown} is not a constructor")));
        };
        match kind {
            CallKind::Script(script, home) => {
                let function = script.program.arena.function(script.func);
                if function.this_mode == ThisMode::Lexical {
                    let shown = self.display_value(&callee);
                    return Err(self.throw_type_error(format!("{shown} is not a constructor")));
                }
                let this = self.alloc_instance(handle)?;
                let result = self.call_script(script, home, Value::Object(this), args)?;
                // An object return overrides the fresh instance.
                Ok(match result {
                    Value::Object(_) => result,
                    _ => Value::Object(this),
                })
            }
            CallKind::Class => self.construct_class(handle, args, None),
            CallKind::Bound { target, bound_args, .. } => {
                let mut all = bound_args;
                all.extend_from_slice(args);
                self.construct(Value::Object(target), &all)
            }
            // Builtin constructors (Error, Array, ...) construct through
            // their call behavior.
            CallKind::Native(f) => f(self, Value::Undefined, args),
            CallKind::Eval => {
                Err(self.throw_type_error("eval is not a constructor"))
            }
        }
    }

    /// Fresh instance whose prototype is the constructor's `.prototype`.
    pub(crate) fn alloc_instance(&mut self, ctor: Handle) -> JsResult<Handle> {
        let prototype = self.get_member(
            &Value::Object(ctor),
            &PropertyKey::from_str("prototype"),
        )?;
        let proto = prototype.as_object().unwrap_or(self.intrinsics.object_proto);
        Ok(self.heap.alloc(JsObject::ordinary(Some(proto))))
    }

    /// Evaluate `eval` source in the given environment.
    pub(crate) fn direct_eval(&mut self, env: &crate::env::EnvRef, args: &[Value]) -> JsResult<Value> {
        let source = match args.first() {
            Some(Value::String(s)) => s.clone(),
            // Non-string arguments pass through unevaluated.
            Some(other) => return Ok(other.clone()),
            None => return Ok(Value::Undefined),
        };
        let program = match hibou_parse::parse_source(&source, &self.interner) {
            Ok(program) => std::rc::Rc::new(program),
            Err(diagnostics) => {
                let message = diagnostics
                    .first()
                    .map(|d| d.message.clone())
                    .unwrap_or_else(|| "invalid source".to_owned());
                return Err(self.throw_syntax_error(message));
            }
        };
        let eval_frame = Frame {
            program: program.clone(),
            env: env.clone(),
        };
        self.enter_scope(&eval_frame, &program.body)?;
        match self.exec_stmt_list(&eval_frame, &program.body)? {
            Completion::Normal(Some(value)) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }

    // ─── Promises ──────────────────────────────────────────────────────

    /// Wrap a value in a fulfilled promise; promises pass through.
    pub(crate) fn promise_resolve(&mut self, value: Value) -> Value {
        if let Some(handle) = value.as_object() {
            if matches!(self.heap.get(handle).kind, ObjectKind::Promise(_)) {
                return value;
            }
        }
        let proto = self.intrinsics.promise_proto;
        Value::Object(
            self.heap
                .alloc(JsObject::promise(Some(proto), PromiseState::Fulfilled(value))),
        )
    }

    pub(crate) fn promise_reject(&mut self, error: Value) -> Value {
        let proto = self.intrinsics.promise_proto;
        Value::Object(
            self.heap
                .alloc(JsObject::promise(Some(proto), PromiseState::Rejected(error))),
        )
    }
}
