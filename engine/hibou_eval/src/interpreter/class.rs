//! Class evaluation and construction.

use super::{Completion, Frame, Interpreter, JsResult};
use crate::env::{self, Environment, EnvRef};
use crate::heap::Handle;
use crate::object::{
    Callable, ClassData, ClassField, ClassFieldKey, FunctionData, JsObject, ObjectKind,
    PrivateId, Property, PropertyKey, ScriptFunction,
};
use crate::value::{JsStr, Value};
use hibou_ir::{ClassId, ClassKey, ClassMemberKind, FuncId, Name};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Constructor-side snapshot of a class, cloned out of the heap.
struct ClassSnapshot {
    constructor: Option<FuncId>,
    program: Rc<hibou_ir::Program>,
    env: EnvRef,
    parent: Option<Handle>,
    fields: Rc<Vec<ClassField>>,
    instance_privates: Rc<Vec<(PrivateId, Value)>>,
}

impl Interpreter {
    fn class_snapshot(&mut self, ctor: Handle) -> JsResult<ClassSnapshot> {
        let data = self.heap.get(ctor).function_data();
        if let Some(data) = data {
            if let Callable::Class(class) = &data.callable {
                return Ok(ClassSnapshot {
                    constructor: class.constructor,
                    program: class.program.clone(),
                    env: class.env.clone(),
                    parent: class.parent,
                    fields: class.fields.clone(),
                    instance_privates: class.instance_privates.clone(),
                });
            }
        }
        Err(self.throw_type_error("not a class constructor"))
    }

    /// Evaluate a class body into its constructor function object.
    pub(crate) fn eval_class(&mut self, frame: &Frame, class_id: ClassId) -> JsResult<Value> {
        let class = frame.program.arena.class(class_id);

        let parent_ctor = match class.parent {
            Some(parent) => {
                let value = self.eval_expr(frame, parent)?;
                let handle = value
                    .as_object()
                    .filter(|h| self.heap.get(*h).is_callable());
                match handle {
                    Some(handle) => Some(handle),
                    None => {
                        return Err(
                            self.throw_type_error("class extends value is not a constructor")
                        )
                    }
                }
            }
            None => None,
        };
        let parent_proto = match parent_ctor {
            Some(ctor) => {
                let prototype = self.get_member(
                    &Value::Object(ctor),
                    &PropertyKey::from_str("prototype"),
                )?;
                match prototype.as_object() {
                    Some(proto) => Some(proto),
                    None => {
                        return Err(self
                            .throw_type_error("class extends value has no valid prototype"))
                    }
                }
            }
            None => Some(self.intrinsics.object_proto),
        };

        let proto_handle = self.heap.alloc(JsObject::ordinary(parent_proto));
        let class_scope = Environment::child(&frame.env);

        // Every `#name` in the body gets one PrivateId for this
        // evaluation; a re-evaluation of the same text mints fresh ids.
        let mut private_names: FxHashMap<Name, PrivateId> = FxHashMap::default();
        for member in &class.members {
            if let ClassKey::Private(name) = member.key {
                private_names
                    .entry(name)
                    .or_insert_with(|| self.fresh_private_id());
            }
        }
        let private_names = Rc::new(private_names);
        class_scope
            .borrow_mut()
            .set_private_names(private_names.clone());

        let mut constructor = None;
        for member in &class.members {
            if let ClassMemberKind::Constructor(func) = member.kind {
                constructor = Some(func);
            }
        }

        let name: JsStr = match class.name {
            Some(name) => Rc::from(self.interner.lookup(name)),
            None => Rc::from(""),
        };
        let length = constructor
            .map(|func| frame.program.arena.function(func).expected_arg_count() as u32)
            .unwrap_or(0);
        let data = FunctionData {
            name: name.clone(),
            length,
            callable: Callable::Class(Box::new(ClassData {
                constructor,
                program: frame.program.clone(),
                env: class_scope.clone(),
                parent: parent_ctor,
                fields: Rc::new(Vec::new()),
                instance_privates: Rc::new(Vec::new()),
            })),
            home_object: Some(proto_handle),
        };
        // Static members inherit through the parent constructor.
        let ctor_proto = parent_ctor.unwrap_or(self.intrinsics.function_proto);
        let ctor_handle = self.heap.alloc(JsObject::function(Some(ctor_proto), data));
        self.install_function_props(ctor_handle, &name, length);
        self.heap.get_mut(ctor_handle).define_own(
            PropertyKey::from_str("prototype"),
            Property::Data {
                value: Value::Object(proto_handle),
                writable: false,
                enumerable: false,
                configurable: false,
            },
        );
        self.heap.get_mut(proto_handle).define_own(
            PropertyKey::from_str("constructor"),
            Property::method(Value::Object(ctor_handle)),
        );
        // The class name is visible inside its own body.
        if let Some(binding) = class.name {
            class_scope
                .borrow_mut()
                .declare(binding, Value::Object(ctor_handle), false);
        }

        let class_frame = frame.with_env(class_scope.clone());
        let mut fields: Vec<ClassField> = Vec::new();
        let mut instance_privates: Vec<(PrivateId, Value)> = Vec::new();

        for member in &class.members {
            let target = if member.is_static {
                ctor_handle
            } else {
                proto_handle
            };
            match &member.kind {
                ClassMemberKind::Constructor(_) => {}
                ClassMemberKind::Method(func) => {
                    let method = self.make_function(&frame.program, *func, &class_scope);
                    self.set_home_object(method, target);
                    match &member.key {
                        ClassKey::Public(key) => {
                            let key = self.eval_prop_key(&class_frame, key)?;
                            self.heap
                                .get_mut(target)
                                .define_own(key, Property::method(Value::Object(method)));
                        }
                        ClassKey::Private(name) => {
                            let id = private_names[name];
                            if member.is_static {
                                self.heap
                                    .get_mut(ctor_handle)
                                    .set_private(id, Value::Object(method));
                            } else {
                                instance_privates.push((id, Value::Object(method)));
                            }
                        }
                    }
                }
                ClassMemberKind::Getter(func) | ClassMemberKind::Setter(func) => {
                    let accessor = self.make_function(&frame.program, *func, &class_scope);
                    self.set_home_object(accessor, target);
                    let is_getter = matches!(member.kind, ClassMemberKind::Getter(_));
                    match &member.key {
                        ClassKey::Public(key) => {
                            let key = self.eval_prop_key(&class_frame, key)?;
                            let (get, set) = if is_getter {
                                (Some(Value::Object(accessor)), None)
                            } else {
                                (None, Some(Value::Object(accessor)))
                            };
                            self.merge_accessor_with(target, key, get, set, false);
                        }
                        // Private accessors store the function under the
                        // private id; access goes through it directly.
                        ClassKey::Private(name) => {
                            let id = private_names[name];
                            if member.is_static {
                                self.heap
                                    .get_mut(ctor_handle)
                                    .set_private(id, Value::Object(accessor));
                            } else {
                                instance_privates.push((id, Value::Object(accessor)));
                            }
                        }
                    }
                }
                ClassMemberKind::Field(init) => {
                    if member.is_static {
                        // Static fields evaluate now, with `this` bound
                        // to the constructor.
                        let field_env = Environment::function_scope(
                            &class_scope,
                            Some(Value::Object(ctor_handle)),
                            Some(ctor_handle),
                        );
                        let field_frame = frame.with_env(field_env);
                        let value = match init {
                            Some(init) => self.eval_expr(&field_frame, *init)?,
                            None => Value::Undefined,
                        };
                        match &member.key {
                            ClassKey::Public(key) => {
                                let key = self.eval_prop_key(&class_frame, key)?;
                                self.heap
                                    .get_mut(ctor_handle)
                                    .define_own(key, Property::data(value));
                            }
                            ClassKey::Private(name) => {
                                let id = private_names[name];
                                self.heap.get_mut(ctor_handle).set_private(id, value);
                            }
                        }
                    } else {
                        let key = match &member.key {
                            ClassKey::Public(key) => {
                                ClassFieldKey::Prop(self.eval_prop_key(&class_frame, key)?)
                            }
                            ClassKey::Private(name) => ClassFieldKey::Private(private_names[name]),
                        };
                        fields.push(ClassField { key, init: *init });
                    }
                }
                ClassMemberKind::StaticBlock(body) => {
                    let block_env = Environment::function_scope(
                        &class_scope,
                        Some(Value::Object(ctor_handle)),
                        Some(ctor_handle),
                    );
                    let block_frame = frame.with_env(block_env);
                    self.enter_scope(&block_frame, body)?;
                    self.exec_stmt_list(&block_frame, body)?;
                }
            }
        }

        if let ObjectKind::Function(data) = &mut self.heap.get_mut(ctor_handle).kind {
            if let Callable::Class(class_data) = &mut data.callable {
                class_data.fields = Rc::new(fields);
                class_data.instance_privates = Rc::new(instance_privates);
            }
        }
        Ok(Value::Object(ctor_handle))
    }

    /// `new C(...)`. `existing_this` is set when a subclass construction
    /// reaches a parent class through `super()`.
    pub(crate) fn construct_class(
        &mut self,
        ctor: Handle,
        args: &[Value],
        existing_this: Option<Value>,
    ) -> JsResult<Value> {
        self.check_call_depth()?;
        let snapshot = self.class_snapshot(ctor)?;
        let this = match existing_this {
            Some(this) => this,
            None => Value::Object(self.alloc_instance(ctor)?),
        };
        if let Some(handle) = this.as_object() {
            for (id, value) in snapshot.instance_privates.iter() {
                self.heap.get_mut(handle).set_private(*id, value.clone());
            }
        }

        let Some(ctor_func) = snapshot.constructor else {
            // Implicit constructor: a derived class forwards its
            // arguments to the parent, then fields initialize.
            if let Some(parent) = snapshot.parent {
                self.construct_on_this(parent, args, this.clone())?;
            }
            self.run_field_inits(ctor, &this)?;
            return Ok(this);
        };

        let home = self.class_prototype(ctor);
        let ctor_env = Environment::function_scope(&snapshot.env, Some(this.clone()), home);
        ctor_env.borrow_mut().set_active_class(ctor);
        let frame = Frame {
            program: snapshot.program.clone(),
            env: ctor_env,
        };
        let function = snapshot.program.arena.function(ctor_func);
        self.bind_params(&frame, &function.params, args)?;
        // Base classes initialize fields before the body runs; derived
        // classes initialize them when `super()` returns.
        if snapshot.parent.is_none() {
            self.run_field_inits(ctor, &this)?;
        }
        self.call_depth += 1;
        let outcome = match &function.body {
            hibou_ir::FunctionBody::Block(body) => self
                .enter_scope(&frame, body)
                .and_then(|()| self.exec_stmt_list(&frame, body)),
            hibou_ir::FunctionBody::Expression(expr) => self
                .eval_expr(&frame, *expr)
                .map(|value| Completion::Return(value)),
        };
        self.call_depth -= 1;
        match outcome? {
            // A constructor returning an object overrides `this`.
            Completion::Return(Value::Object(handle)) => Ok(Value::Object(handle)),
            _ => Ok(this),
        }
    }

    /// `super(...)` inside a derived constructor.
    pub(crate) fn super_call(&mut self, frame: &Frame, args: &[Value]) -> JsResult<Value> {
        let Some(class) = env::active_class_of(&frame.env) else {
            return Err(self.throw_syntax_error("'super' keyword unexpected here"));
        };
        let snapshot = self.class_snapshot(class)?;
        let Some(parent) = snapshot.parent else {
            return Err(self.throw_syntax_error("'super' called in a class with no parent"));
        };
        let this = env::this_of(&frame.env);
        self.construct_on_this(parent, args, this.clone())?;
        self.run_field_inits(class, &this)?;
        Ok(Value::Undefined)
    }

    /// Run a parent constructor against an already-allocated instance.
    /// The parent may be another class or a plain function.
    fn construct_on_this(&mut self, parent: Handle, args: &[Value], this: Value) -> JsResult<()> {
        enum Parent {
            Class,
            Function(ScriptFunction, Option<Handle>),
        }
        let kind = self.heap.get(parent).function_data().and_then(|data| {
            match &data.callable {
                Callable::Class(_) => Some(Parent::Class),
                Callable::Script(script) => {
                    Some(Parent::Function(script.clone(), data.home_object))
                }
                _ => None,
            }
        });
        match kind {
            Some(Parent::Class) => {
                self.construct_class(parent, args, Some(this))?;
                Ok(())
            }
            Some(Parent::Function(script, home)) => {
                self.call_script(script, home, this, args)?;
                Ok(())
            }
            None => Err(self.throw_type_error("superclass is not a constructor")),
        }
    }

    fn class_prototype(&mut self, ctor: Handle) -> Option<Handle> {
        match self
            .heap
            .get(ctor)
            .own_property(&PropertyKey::from_str("prototype"))
        {
            Some(Property::Data { value, .. }) => value.as_object(),
            _ => None,
        }
    }

    /// Initialize declared instance fields on a new instance.
    fn run_field_inits(&mut self, ctor: Handle, this: &Value) -> JsResult<()> {
        let snapshot = self.class_snapshot(ctor)?;
        if snapshot.fields.is_empty() {
            return Ok(());
        }
        let home = self.class_prototype(ctor);
        for field in snapshot.fields.iter() {
            let field_env = Environment::function_scope(&snapshot.env, Some(this.clone()), home);
            let frame = Frame {
                program: snapshot.program.clone(),
                env: field_env,
            };
            let value = match field.init {
                Some(init) => self.eval_expr(&frame, init)?,
                None => Value::Undefined,
            };
            let Some(handle) = this.as_object() else {
                return Ok(());
            };
            match &field.key {
                ClassFieldKey::Prop(key) => {
                    self.heap
                        .get_mut(handle)
                        .define_own(key.clone(), Property::data(value));
                }
                ClassFieldKey::Private(id) => {
                    self.heap.get_mut(handle).set_private(*id, value);
                }
            }
        }
        Ok(())
    }
}
