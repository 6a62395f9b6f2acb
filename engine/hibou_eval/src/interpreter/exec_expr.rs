//! Expression evaluation.

use super::pattern::BindMode;
use super::{Frame, Interpreter, JsResult};
use crate::env;
use crate::heap::Handle;
use crate::object::{
    Callable, JsObject, ObjectKind, PrivateId, PromiseState, Property, PropertyKey,
};
use crate::value::{to_int32, to_uint32, Value};
use hibou_ir::{
    ArrayElement, AssignOp, AssignTarget, BinaryOp, ExprId, ExprKind, LogicalOp, MemberProp, Name,
    ObjectProp, Program, PropValue, UnaryOp, UpdateOp,
};
use hibou_stack::ensure_sufficient_stack;

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, frame: &Frame, expr: ExprId) -> JsResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr_inner(frame, expr))
    }

    fn eval_expr_inner(&mut self, frame: &Frame, expr: ExprId) -> JsResult<Value> {
        match &frame.program.arena.expr(expr).kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(name) => Ok(Value::string(self.interner.lookup(*name))),
            ExprKind::Template { quasis, exprs } => self.eval_template(frame, quasis, exprs),
            ExprKind::Regex { source, flags } => {
                // Regex objects carry their text; there is no match engine.
                let mut object = JsObject::ordinary(Some(self.intrinsics.object_proto));
                object.define_own(
                    PropertyKey::from_str("source"),
                    Property::data(Value::string(self.interner.lookup(*source))),
                );
                object.define_own(
                    PropertyKey::from_str("flags"),
                    Property::data(Value::string(self.interner.lookup(*flags))),
                );
                Ok(Value::Object(self.heap.alloc(object)))
            }
            ExprKind::Ident(name) => self.lookup_binding(frame, *name),
            ExprKind::This => Ok(env::this_of(&frame.env)),
            ExprKind::Super => Err(self.throw_syntax_error("'super' is only valid in methods")),
            ExprKind::Array(elements) => self.eval_array_literal(frame, elements),
            ExprKind::Object(props) => self.eval_object_literal(frame, props),
            ExprKind::Function(func) | ExprKind::Arrow(func) => {
                let handle = self.make_function(&frame.program, *func, &frame.env);
                Ok(Value::Object(handle))
            }
            ExprKind::Class(class) => self.eval_class(frame, *class),
            ExprKind::Unary { op, operand } => self.eval_unary(frame, *op, *operand),
            ExprKind::Update { op, prefix, target } => {
                self.eval_update(frame, *op, *prefix, *target)
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(frame, *op, *left, *right),
            ExprKind::Logical { op, left, right } => {
                let lhs = self.eval_expr(frame, *left)?;
                let short_circuit = match op {
                    LogicalOp::And => !lhs.to_boolean(),
                    LogicalOp::Or => lhs.to_boolean(),
                    LogicalOp::Nullish => !lhs.is_nullish(),
                };
                if short_circuit {
                    Ok(lhs)
                } else {
                    self.eval_expr(frame, *right)
                }
            }
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(frame, *cond)?.to_boolean() {
                    self.eval_expr(frame, *then_branch)
                } else {
                    self.eval_expr(frame, *else_branch)
                }
            }
            ExprKind::Assign { op, target, value } => self.eval_assign(frame, *op, target, *value),
            ExprKind::Member { .. } | ExprKind::Call { .. } => {
                Ok(self.eval_chain(frame, expr)?.unwrap_or(Value::Undefined))
            }
            ExprKind::New { callee, args } => {
                let callee = self.eval_expr(frame, *callee)?;
                let args = self.eval_arguments(frame, args)?;
                self.construct(callee, &args)
            }
            ExprKind::OptionalChain(inner) => {
                Ok(self.eval_chain(frame, *inner)?.unwrap_or(Value::Undefined))
            }
            ExprKind::PrivateIn { name, object } => {
                let Some(id) = env::resolve_private(&frame.env, *name) else {
                    let text = self.interner.lookup(*name);
                    return Err(self.throw_syntax_error(format!(
                        "private field '#{text}' must be declared in an enclosing class"
                    )));
                };
                let object = self.eval_expr(frame, *object)?;
                Ok(Value::Bool(match object.as_object() {
                    Some(handle) => self.heap.get(handle).has_private(id),
                    None => false,
                }))
            }
            ExprKind::Sequence(exprs) => {
                let mut last = Value::Undefined;
                for &inner in exprs {
                    last = self.eval_expr(frame, inner)?;
                }
                Ok(last)
            }
            ExprKind::Await(operand) => {
                let value = self.eval_expr(frame, *operand)?;
                self.await_value(value)
            }
        }
    }

    /// Unwrap an awaited value: settled promises yield or throw their
    /// value, anything else passes through.
    pub(crate) fn await_value(&mut self, value: Value) -> JsResult<Value> {
        if let Some(handle) = value.as_object() {
            if let ObjectKind::Promise(state) = &self.heap.get(handle).kind {
                return match state.clone() {
                    PromiseState::Fulfilled(inner) => Ok(inner),
                    PromiseState::Rejected(error) => Err(error),
                };
            }
        }
        Ok(value)
    }

    fn eval_template(
        &mut self,
        frame: &Frame,
        quasis: &[Name],
        exprs: &[ExprId],
    ) -> JsResult<Value> {
        let mut text = String::new();
        for (index, quasi) in quasis.iter().enumerate() {
            text.push_str(self.interner.lookup(*quasi));
            if let Some(&expr) = exprs.get(index) {
                let value = self.eval_expr(frame, expr)?;
                text.push_str(&self.to_string_value(&value)?);
            }
        }
        Ok(Value::string(text))
    }

    fn eval_array_literal(&mut self, frame: &Frame, elements: &[ArrayElement]) -> JsResult<Value> {
        let proto = self.intrinsics.array_proto;
        let mut object = JsObject::array(Some(proto));
        let mut index: u32 = 0;
        let mut spread_values = Vec::new();
        for element in elements {
            match element {
                ArrayElement::Hole => index += 1,
                ArrayElement::Item(expr) => {
                    let value = self.eval_expr(frame, *expr)?;
                    object.define_own(PropertyKey::Index(index), Property::data(value));
                    index += 1;
                }
                ArrayElement::Spread(expr) => {
                    let value = self.eval_expr(frame, *expr)?;
                    spread_values.clear();
                    self.spread_into(&value, &mut spread_values)?;
                    for item in spread_values.drain(..) {
                        object.define_own(PropertyKey::Index(index), Property::data(item));
                        index += 1;
                    }
                }
            }
        }
        // Trailing holes still count toward length.
        if object.array_length().unwrap_or(0) < index {
            object.set_array_length(index);
        }
        Ok(Value::Object(self.heap.alloc(object)))
    }

    fn eval_object_literal(&mut self, frame: &Frame, props: &[ObjectProp]) -> JsResult<Value> {
        let handle = self.alloc_ordinary();
        for prop in props {
            match prop {
                ObjectProp::Entry { key, value } => {
                    let key = self.eval_prop_key(frame, key)?;
                    match value {
                        PropValue::Init(expr) => {
                            let value = self.eval_expr(frame, *expr)?;
                            if is_anonymous_fn(&frame.program, *expr) {
                                let text = key.as_display();
                                self.name_anonymous_function(&value, &text);
                            }
                            self.heap.get_mut(handle).define_own(key, Property::data(value));
                        }
                        PropValue::Method(func) => {
                            let method = self.make_function(&frame.program, *func, &frame.env);
                            self.set_home_object(method, handle);
                            self.heap
                                .get_mut(handle)
                                .define_own(key, Property::data(Value::Object(method)));
                        }
                        PropValue::Getter(func) => {
                            let getter = self.make_function(&frame.program, *func, &frame.env);
                            self.set_home_object(getter, handle);
                            self.merge_accessor(handle, key, Some(Value::Object(getter)), None);
                        }
                        PropValue::Setter(func) => {
                            let setter = self.make_function(&frame.program, *func, &frame.env);
                            self.set_home_object(setter, handle);
                            self.merge_accessor(handle, key, None, Some(Value::Object(setter)));
                        }
                    }
                }
                ObjectProp::Spread(expr) => {
                    let source = self.eval_expr(frame, *expr)?;
                    self.spread_props_into(&source, handle)?;
                }
            }
        }
        Ok(Value::Object(handle))
    }

    pub(crate) fn set_home_object(&mut self, function: Handle, home: Handle) {
        if let ObjectKind::Function(data) = &mut self.heap.get_mut(function).kind {
            data.home_object = Some(home);
        }
    }

    /// Install a getter or setter, merging with an existing accessor on
    /// the same key.
    pub(crate) fn merge_accessor(
        &mut self,
        target: Handle,
        key: PropertyKey,
        get: Option<Value>,
        set: Option<Value>,
    ) {
        self.merge_accessor_with(target, key, get, set, true);
    }

    pub(crate) fn merge_accessor_with(
        &mut self,
        target: Handle,
        key: PropertyKey,
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
    ) {
        let object = self.heap.get_mut(target);
        let merged = match object.own_property(&key) {
            Some(Property::Accessor {
                get: old_get,
                set: old_set,
                ..
            }) => Property::accessor(get.or(old_get), set.or(old_set), enumerable),
            _ => Property::accessor(get, set, enumerable),
        };
        object.define_own(key, merged);
    }

    /// `{...source}`: copy own enumerable properties.
    fn spread_props_into(&mut self, source: &Value, target: Handle) -> JsResult<()> {
        match source {
            Value::Object(handle) => {
                let keys = self.heap.get(*handle).own_keys(true);
                for key in keys {
                    let value = self.get_member(source, &key)?;
                    self.heap.get_mut(target).define_own(key, Property::data(value));
                }
            }
            Value::String(s) => {
                for (index, c) in s.chars().enumerate() {
                    self.heap.get_mut(target).define_own(
                        PropertyKey::Index(index as u32),
                        Property::data(Value::string(c.to_string())),
                    );
                }
            }
            // Spreading other primitives adds nothing.
            _ => {}
        }
        Ok(())
    }

    fn eval_unary(&mut self, frame: &Frame, op: UnaryOp, operand: ExprId) -> JsResult<Value> {
        match op {
            UnaryOp::Typeof => {
                // `typeof missing` must not throw.
                if let ExprKind::Ident(name) = &frame.program.arena.expr(operand).kind {
                    if matches!(env::lookup(&frame.env, *name), env::Lookup::NotFound) {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval_expr(frame, operand)?;
                Ok(Value::string(self.type_of(&value)))
            }
            UnaryOp::Delete => self.eval_delete(frame, operand),
            UnaryOp::Void => {
                self.eval_expr(frame, operand)?;
                Ok(Value::Undefined)
            }
            UnaryOp::Not => {
                let value = self.eval_expr(frame, operand)?;
                Ok(Value::Bool(!value.to_boolean()))
            }
            UnaryOp::Neg => {
                let value = self.eval_expr(frame, operand)?;
                let n = self.to_number_value(&value)?;
                Ok(Value::Number(-n))
            }
            UnaryOp::Pos => {
                let value = self.eval_expr(frame, operand)?;
                let n = self.to_number_value(&value)?;
                Ok(Value::Number(n))
            }
            UnaryOp::BitNot => {
                let value = self.eval_expr(frame, operand)?;
                let n = self.to_number_value(&value)?;
                Ok(Value::Number(f64::from(!to_int32(n))))
            }
        }
    }

    fn eval_delete(&mut self, frame: &Frame, operand: ExprId) -> JsResult<Value> {
        let ExprKind::Member {
            object, property, ..
        } = &frame.program.arena.expr(operand).kind
        else {
            // `delete` on a non-member expression is a no-op that
            // answers true.
            self.eval_expr(frame, operand)?;
            return Ok(Value::Bool(true));
        };
        let base = self.eval_expr(frame, *object)?;
        let Some(handle) = base.as_object() else {
            return Ok(Value::Bool(true));
        };
        let key = match property {
            MemberProp::Ident(name) => PropertyKey::from_str(self.interner.lookup(*name)),
            MemberProp::Computed(expr) => {
                let value = self.eval_expr(frame, *expr)?;
                self.to_property_key(&value)?
            }
            MemberProp::Private(_) => {
                return Err(self.throw_syntax_error("private fields cannot be deleted"));
            }
        };
        Ok(Value::Bool(self.heap.get_mut(handle).delete_own(&key)))
    }

    fn eval_update(
        &mut self,
        frame: &Frame,
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    ) -> JsResult<Value> {
        let reference = self.resolve_reference(frame, target)?;
        let old = {
            let value = self.read_reference(frame, &reference)?;
            self.to_number_value(&value)?
        };
        let new = match op {
            UpdateOp::Increment => old + 1.0,
            UpdateOp::Decrement => old - 1.0,
        };
        self.write_reference(frame, &reference, Value::Number(new))?;
        Ok(Value::Number(if prefix { new } else { old }))
    }

    fn eval_binary(
        &mut self,
        frame: &Frame,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> JsResult<Value> {
        let lhs = self.eval_expr(frame, left)?;
        let rhs = self.eval_expr(frame, right)?;
        self.apply_binary(op, &lhs, &rhs)
    }

    pub(crate) fn apply_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Value,
        rhs: &Value,
    ) -> JsResult<Value> {
        match op {
            BinaryOp::Add => self.add_values(lhs, rhs),
            BinaryOp::Sub => self.numeric_binary(lhs, rhs, |a, b| a - b),
            BinaryOp::Mul => self.numeric_binary(lhs, rhs, |a, b| a * b),
            BinaryOp::Div => self.numeric_binary(lhs, rhs, |a, b| a / b),
            // The sign of the remainder follows the dividend.
            BinaryOp::Mod => self.numeric_binary(lhs, rhs, |a, b| a % b),
            BinaryOp::Exp => self.numeric_binary(lhs, rhs, f64::powf),
            BinaryOp::Shl => self.int_binary(lhs, rhs, |a, b| f64::from(a << (b & 31))),
            BinaryOp::Shr => self.int_binary(lhs, rhs, |a, b| f64::from(a >> (b & 31))),
            BinaryOp::UShr => {
                let a = {
                    let n = self.to_number_value(lhs)?;
                    to_uint32(n)
                };
                let b = {
                    let n = self.to_number_value(rhs)?;
                    to_uint32(n)
                };
                Ok(Value::Number(f64::from(a >> (b & 31))))
            }
            BinaryOp::BitAnd => self.int_binary(lhs, rhs, |a, b| f64::from(a & b)),
            BinaryOp::BitOr => self.int_binary(lhs, rhs, |a, b| f64::from(a | b)),
            BinaryOp::BitXor => self.int_binary(lhs, rhs, |a, b| f64::from(a ^ b)),
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                Ok(Value::Bool(self.compare_values(op, lhs, rhs)?))
            }
            BinaryOp::Eq => Ok(Value::Bool(self.abstract_equals(lhs, rhs)?)),
            BinaryOp::NotEq => Ok(Value::Bool(!self.abstract_equals(lhs, rhs)?)),
            BinaryOp::StrictEq => Ok(Value::Bool(lhs.strict_equals(rhs))),
            BinaryOp::StrictNotEq => Ok(Value::Bool(!lhs.strict_equals(rhs))),
            BinaryOp::Instanceof => Ok(Value::Bool(self.instance_of(lhs, rhs)?)),
            BinaryOp::In => {
                let Some(handle) = rhs.as_object() else {
                    return Err(
                        self.throw_type_error("cannot use 'in' operator on a non-object")
                    );
                };
                let key = self.to_property_key(lhs)?;
                Ok(Value::Bool(self.has_property(handle, &key)))
            }
        }
    }

    fn numeric_binary(
        &mut self,
        lhs: &Value,
        rhs: &Value,
        f: impl Fn(f64, f64) -> f64,
    ) -> JsResult<Value> {
        let a = self.to_number_value(lhs)?;
        let b = self.to_number_value(rhs)?;
        Ok(Value::Number(f(a, b)))
    }

    fn int_binary(
        &mut self,
        lhs: &Value,
        rhs: &Value,
        f: impl Fn(i32, i32) -> f64,
    ) -> JsResult<Value> {
        let a = {
            let n = self.to_number_value(lhs)?;
            to_int32(n)
        };
        let b = {
            let n = self.to_number_value(rhs)?;
            to_int32(n)
        };
        Ok(Value::Number(f(a, b)))
    }

    fn eval_assign(
        &mut self,
        frame: &Frame,
        op: AssignOp,
        target: &AssignTarget,
        value: ExprId,
    ) -> JsResult<Value> {
        match op {
            AssignOp::Assign => {
                let rhs = self.eval_expr(frame, value)?;
                match target {
                    AssignTarget::Expr(expr) => {
                        if let ExprKind::Ident(name) = &frame.program.arena.expr(*expr).kind {
                            if is_anonymous_fn(&frame.program, value) {
                                let text = self.interner.lookup(*name);
                                self.name_anonymous_function(&rhs, text);
                            }
                        }
                        self.assign_to_expr(frame, *expr, rhs.clone())?;
                    }
                    AssignTarget::Pattern(pattern) => {
                        self.bind_pattern(frame, *pattern, rhs.clone(), BindMode::Assign)?;
                    }
                }
                Ok(rhs)
            }
            AssignOp::LogicalAnd | AssignOp::LogicalOr | AssignOp::Nullish => {
                let AssignTarget::Expr(expr) = target else {
                    return Err(self.throw_syntax_error("invalid assignment target"));
                };
                let reference = self.resolve_reference(frame, *expr)?;
                let old = self.read_reference(frame, &reference)?;
                let proceed = match op {
                    AssignOp::LogicalAnd => old.to_boolean(),
                    AssignOp::LogicalOr => !old.to_boolean(),
                    _ => old.is_nullish(),
                };
                if !proceed {
                    return Ok(old);
                }
                let rhs = self.eval_expr(frame, value)?;
                if let Reference::Ident(name) = &reference {
                    if is_anonymous_fn(&frame.program, value) {
                        let text = self.interner.lookup(*name);
                        self.name_anonymous_function(&rhs, text);
                    }
                }
                self.write_reference(frame, &reference, rhs.clone())?;
                Ok(rhs)
            }
            _ => {
                let AssignTarget::Expr(expr) = target else {
                    return Err(self.throw_syntax_error("invalid assignment target"));
                };
                let binary = match op {
                    AssignOp::Add => BinaryOp::Add,
                    AssignOp::Sub => BinaryOp::Sub,
                    AssignOp::Mul => BinaryOp::Mul,
                    AssignOp::Div => BinaryOp::Div,
                    AssignOp::Mod => BinaryOp::Mod,
                    AssignOp::Exp => BinaryOp::Exp,
                    AssignOp::Shl => BinaryOp::Shl,
                    AssignOp::Shr => BinaryOp::Shr,
                    AssignOp::UShr => BinaryOp::UShr,
                    AssignOp::BitAnd => BinaryOp::BitAnd,
                    AssignOp::BitOr => BinaryOp::BitOr,
                    AssignOp::BitXor => BinaryOp::BitXor,
                    _ => unreachable!("handled above"),
                };
                let reference = self.resolve_reference(frame, *expr)?;
                let old = self.read_reference(frame, &reference)?;
                let rhs = self.eval_expr(frame, value)?;
                let new = self.apply_binary(binary, &old, &rhs)?;
                self.write_reference(frame, &reference, new.clone())?;
                Ok(new)
            }
        }
    }

    /// Store a value through an identifier or member target.
    pub(crate) fn assign_to_expr(
        &mut self,
        frame: &Frame,
        target: ExprId,
        value: Value,
    ) -> JsResult<()> {
        match &frame.program.arena.expr(target).kind {
            ExprKind::Ident(name) => self.bind_ident(frame, *name, value, BindMode::Assign),
            ExprKind::Member {
                object, property, ..
            } => {
                if matches!(frame.program.arena.expr(*object).kind, ExprKind::Super) {
                    // `super.x = v` writes onto the method receiver.
                    let this = env::this_of(&frame.env);
                    let key = self.member_prop_key(frame, property)?;
                    return self.set_member(&this, key, value);
                }
                let base = self.eval_expr(frame, *object)?;
                match property {
                    MemberProp::Private(name) => {
                        let id = self.resolve_private_or_throw(frame, *name)?;
                        self.private_set(&base, id, value)
                    }
                    _ => {
                        let key = self.member_prop_key(frame, property)?;
                        self.set_member(&base, key, value)
                    }
                }
            }
            _ => Err(self.throw_syntax_error("invalid assignment target")),
        }
    }

    /// Resolve a read-modify-write target once. `a[k()] += 1` and
    /// `a[k()]++` must evaluate the base and the computed key a single
    /// time, then read and write through the resolved reference.
    fn resolve_reference(&mut self, frame: &Frame, target: ExprId) -> JsResult<Reference> {
        match &frame.program.arena.expr(target).kind {
            ExprKind::Ident(name) => Ok(Reference::Ident(*name)),
            ExprKind::Member {
                object, property, ..
            } => {
                if matches!(frame.program.arena.expr(*object).kind, ExprKind::Super) {
                    let key = self.member_prop_key(frame, property)?;
                    return Ok(Reference::SuperMember { key });
                }
                let base = self.eval_expr(frame, *object)?;
                match property {
                    MemberProp::Private(name) => {
                        let id = self.resolve_private_or_throw(frame, *name)?;
                        Ok(Reference::Private {
                            base,
                            id,
                            name: *name,
                        })
                    }
                    _ => {
                        let key = self.member_prop_key(frame, property)?;
                        Ok(Reference::Member { base, key })
                    }
                }
            }
            _ => Err(self.throw_syntax_error("invalid assignment target")),
        }
    }

    fn read_reference(&mut self, frame: &Frame, reference: &Reference) -> JsResult<Value> {
        match reference {
            Reference::Ident(name) => self.lookup_binding(frame, *name),
            Reference::Member { base, key } => self.get_member(base, key),
            Reference::SuperMember { key } => {
                let Some(home) = env::home_object_of(&frame.env) else {
                    return Err(self.throw_syntax_error("'super' is only valid in methods"));
                };
                let Some(start) = self.heap.get(home).proto else {
                    return Ok(Value::Undefined);
                };
                let this = env::this_of(&frame.env);
                self.get_object_property(start, key, this)
            }
            Reference::Private { base, id, name } => self.private_get(base, *id, *name),
        }
    }

    fn write_reference(
        &mut self,
        frame: &Frame,
        reference: &Reference,
        value: Value,
    ) -> JsResult<()> {
        match reference {
            Reference::Ident(name) => self.bind_ident(frame, *name, value, BindMode::Assign),
            Reference::Member { base, key } => self.set_member(base, key.clone(), value),
            // `super.x = v` writes onto the method receiver.
            Reference::SuperMember { key } => {
                let this = env::this_of(&frame.env);
                self.set_member(&this, key.clone(), value)
            }
            Reference::Private { base, id, .. } => self.private_set(base, *id, value),
        }
    }

    fn member_prop_key(&mut self, frame: &Frame, property: &MemberProp) -> JsResult<PropertyKey> {
        match property {
            MemberProp::Ident(name) => Ok(PropertyKey::from_str(self.interner.lookup(*name))),
            MemberProp::Computed(expr) => {
                let value = self.eval_expr(frame, *expr)?;
                self.to_property_key(&value)
            }
            MemberProp::Private(_) => unreachable!("private access handled by caller"),
        }
    }

    pub(crate) fn resolve_private_or_throw(
        &mut self,
        frame: &Frame,
        name: Name,
    ) -> JsResult<PrivateId> {
        match env::resolve_private(&frame.env, name) {
            Some(id) => Ok(id),
            None => {
                let text = self.interner.lookup(name);
                Err(self.throw_syntax_error(format!(
                    "private field '#{text}' must be declared in an enclosing class"
                )))
            }
        }
    }

    fn private_get(&mut self, base: &Value, id: PrivateId, name: Name) -> JsResult<Value> {
        let found = base
            .as_object()
            .and_then(|handle| self.heap.get(handle).get_private(id).cloned());
        match found {
            Some(value) => Ok(value),
            None => {
                let text = self.interner.lookup(name);
                Err(self.throw_type_error(format!(
                    "cannot read private member #{text} from an object whose class did not declare it"
                )))
            }
        }
    }

    fn private_set(&mut self, base: &Value, id: PrivateId, value: Value) -> JsResult<()> {
        let Some(handle) = base.as_object().filter(|h| self.heap.get(*h).has_private(id)) else {
            return Err(self.throw_type_error(
                "cannot write private member to an object whose class did not declare it",
            ));
        };
        self.heap.get_mut(handle).set_private(id, value);
        Ok(())
    }

    /// Walk a member/call chain. `None` means a `?.` short-circuited on a
    /// nullish base and the whole chain answers `undefined`.
    pub(crate) fn eval_chain(&mut self, frame: &Frame, expr: ExprId) -> JsResult<Option<Value>> {
        match &frame.program.arena.expr(expr).kind {
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                if matches!(frame.program.arena.expr(*object).kind, ExprKind::Super) {
                    return Ok(Some(self.super_get(frame, property)?));
                }
                let Some(base) = self.eval_chain(frame, *object)? else {
                    return Ok(None);
                };
                if *optional && base.is_nullish() {
                    return Ok(None);
                }
                match property {
                    MemberProp::Private(name) => {
                        let id = self.resolve_private_or_throw(frame, *name)?;
                        Ok(Some(self.private_get(&base, id, *name)?))
                    }
                    _ => {
                        let key = self.member_prop_key(frame, property)?;
                        Ok(Some(self.get_member(&base, &key)?))
                    }
                }
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                // `super(...)`.
                if matches!(frame.program.arena.expr(*callee).kind, ExprKind::Super) {
                    let args = self.eval_arguments(frame, args)?;
                    return Ok(Some(self.super_call(frame, &args)?));
                }
                // Method call: `base.m(...)` keeps `base` as `this`.
                if let ExprKind::Member {
                    object,
                    property,
                    optional: member_optional,
                } = &frame.program.arena.expr(*callee).kind
                {
                    if matches!(frame.program.arena.expr(*object).kind, ExprKind::Super) {
                        let method = self.super_get(frame, property)?;
                        let this = env::this_of(&frame.env);
                        let args = self.eval_arguments(frame, args)?;
                        return Ok(Some(self.call_value(method, this, &args)?));
                    }
                    let Some(base) = self.eval_chain(frame, *object)? else {
                        return Ok(None);
                    };
                    if *member_optional && base.is_nullish() {
                        return Ok(None);
                    }
                    let method = match property {
                        MemberProp::Private(name) => {
                            let id = self.resolve_private_or_throw(frame, *name)?;
                            self.private_get(&base, id, *name)?
                        }
                        _ => {
                            let key = self.member_prop_key(frame, property)?;
                            self.get_member(&base, &key)?
                        }
                    };
                    if *optional && method.is_nullish() {
                        return Ok(None);
                    }
                    let args = self.eval_arguments(frame, args)?;
                    return Ok(Some(self.call_value(method, base, &args)?));
                }
                // Direct `eval(...)` runs in the caller's scope. The
                // callee must be spelled `eval`; an aliased call goes
                // through `call_value` and runs globally.
                if let ExprKind::Ident(name) = &frame.program.arena.expr(*callee).kind {
                    let callee_value = self.lookup_binding(frame, *name)?;
                    if self.interner.lookup(*name) == "eval"
                        && self.is_eval_function(&callee_value)
                    {
                        let args = self.eval_arguments(frame, args)?;
                        let env = frame.env.clone();
                        return Ok(Some(self.direct_eval(&env, &args)?));
                    }
                    if *optional && callee_value.is_nullish() {
                        return Ok(None);
                    }
                    let args = self.eval_arguments(frame, args)?;
                    return Ok(Some(self.call_value(callee_value, Value::Undefined, &args)?));
                }
                let Some(callee_value) = self.eval_chain(frame, *callee)? else {
                    return Ok(None);
                };
                if *optional && callee_value.is_nullish() {
                    return Ok(None);
                }
                let args = self.eval_arguments(frame, args)?;
                Ok(Some(self.call_value(callee_value, Value::Undefined, &args)?))
            }
            _ => Ok(Some(self.eval_expr(frame, expr)?)),
        }
    }

    fn is_eval_function(&self, value: &Value) -> bool {
        match value.as_object() {
            Some(handle) => matches!(
                self.heap.get(handle).function_data().map(|d| &d.callable),
                Some(Callable::Eval)
            ),
            None => false,
        }
    }

    /// `super.x` in a method: look up from the home object's prototype,
    /// with `this` still bound to the receiver.
    fn super_get(&mut self, frame: &Frame, property: &MemberProp) -> JsResult<Value> {
        let Some(home) = env::home_object_of(&frame.env) else {
            return Err(self.throw_syntax_error("'super' is only valid in methods"));
        };
        let Some(start) = self.heap.get(home).proto else {
            return Ok(Value::Undefined);
        };
        let key = self.member_prop_key(frame, property)?;
        let this = env::this_of(&frame.env);
        self.get_object_property(start, &key, this)
    }
}

/// An assignment target with its base object and property key already
/// evaluated.
enum Reference {
    Ident(Name),
    Member { base: Value, key: PropertyKey },
    SuperMember { key: PropertyKey },
    Private { base: Value, id: PrivateId, name: Name },
}

/// Whether an initializer is an anonymous function literal, making it
/// eligible for named evaluation at its binding site.
pub(crate) fn is_anonymous_fn(program: &Program, expr: ExprId) -> bool {
    match &program.arena.expr(expr).kind {
        ExprKind::Function(func) | ExprKind::Arrow(func) => {
            program.arena.function(*func).name.is_none()
        }
        _ => false,
    }
}
