//! Binding and assignment of destructuring patterns.

use super::{Frame, Interpreter, JsResult};
use crate::env;
use crate::object::{JsObject, Property, PropertyKey};
use crate::value::{number_to_string, Value};
use hibou_ir::{Name, PatternId, PatternKind, PropKey};
use rustc_hash::FxHashSet;

/// How pattern identifiers attach to the environment.
#[derive(Copy, Clone, Eq, PartialEq)]
pub(crate) enum BindMode {
    /// `var`: assign the binding hoisted at scope entry.
    Var,
    /// `let`/`const`: initialize the TDZ binding in the current scope.
    LexicalInit,
    /// Function parameter: declare directly in the function scope.
    Param,
    /// Plain assignment; member targets are allowed.
    Assign,
}

impl Interpreter {
    pub(crate) fn bind_pattern(
        &mut self,
        frame: &Frame,
        pattern: PatternId,
        value: Value,
        mode: BindMode,
    ) -> JsResult<()> {
        match &frame.program.arena.pattern(pattern).kind {
            PatternKind::Ident(name) => self.bind_ident(frame, *name, value, mode),
            PatternKind::Member(expr) => self.assign_to_expr(frame, *expr, value),
            PatternKind::Array { elements, rest } => {
                let mut items = Vec::new();
                self.spread_into(&value, &mut items)?;
                for (index, element) in elements.iter().enumerate() {
                    let Some(element) = element else {
                        continue;
                    };
                    let mut item = items.get(index).cloned().unwrap_or(Value::Undefined);
                    if let Some(default) = element.default {
                        if matches!(item, Value::Undefined) {
                            item = self.eval_expr(frame, default)?;
                        }
                    }
                    self.bind_pattern(frame, element.pattern, item, mode)?;
                }
                if let Some(rest) = rest {
                    let remaining = items.split_off(elements.len().min(items.len()));
                    let array = self.alloc_array(remaining);
                    self.bind_pattern(frame, *rest, Value::Object(array), mode)?;
                }
                Ok(())
            }
            PatternKind::Object { props, rest } => {
                if value.is_nullish() {
                    return Err(self.throw_type_error("cannot destructure a nullish value"));
                }
                let mut consumed: FxHashSet<PropertyKey> = FxHashSet::default();
                for prop in props {
                    let key = self.eval_prop_key(frame, &prop.key)?;
                    let mut item = self.get_member(&value, &key)?;
                    consumed.insert(key);
                    if let Some(default) = prop.default {
                        if matches!(item, Value::Undefined) {
                            item = self.eval_expr(frame, default)?;
                        }
                    }
                    self.bind_pattern(frame, prop.value, item, mode)?;
                }
                if let Some(rest) = rest {
                    let collected = self.collect_rest_props(&value, &consumed)?;
                    self.bind_pattern(frame, *rest, collected, mode)?;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn bind_ident(
        &mut self,
        frame: &Frame,
        name: Name,
        value: Value,
        mode: BindMode,
    ) -> JsResult<()> {
        match mode {
            BindMode::Var => match env::assign(&frame.env, name, value.clone()) {
                env::Assign::Done => Ok(()),
                // The hoisted binding always exists; anything else means a
                // shadowing lexical binding in TDZ.
                _ => {
                    frame.env.borrow_mut().declare(name, value, true);
                    Ok(())
                }
            },
            BindMode::LexicalInit => {
                frame.env.borrow_mut().initialize(name, value);
                Ok(())
            }
            BindMode::Param => {
                frame.env.borrow_mut().declare(name, value, true);
                Ok(())
            }
            BindMode::Assign => match env::assign(&frame.env, name, value.clone()) {
                env::Assign::Done => Ok(()),
                env::Assign::Immutable => {
                    Err(self.throw_type_error("assignment to constant variable"))
                }
                env::Assign::Uninitialized => {
                    let text = self.interner.lookup(name);
                    Err(self.throw_reference_error(format!(
                        "cannot access '{text}' before initialization"
                    )))
                }
                // Assignment to an undeclared name creates a global.
                env::Assign::NotFound => {
                    self.global_env.borrow_mut().declare(name, value, true);
                    Ok(())
                }
            },
        }
    }

    /// Resolve a property key syntax node to a runtime key. Computed keys
    /// evaluate now.
    pub(crate) fn eval_prop_key(&mut self, frame: &Frame, key: &PropKey) -> JsResult<PropertyKey> {
        Ok(match key {
            PropKey::Ident(name) | PropKey::String(name) => {
                PropertyKey::from_str(self.interner.lookup(*name))
            }
            PropKey::Number(n) => PropertyKey::from_str(&number_to_string(*n)),
            PropKey::Computed(expr) => {
                let value = self.eval_expr(frame, *expr)?;
                self.to_property_key(&value)?
            }
        })
    }

    /// Remaining own enumerable properties for an object-pattern rest.
    fn collect_rest_props(
        &mut self,
        source: &Value,
        consumed: &FxHashSet<PropertyKey>,
    ) -> JsResult<Value> {
        let proto = self.intrinsics.object_proto;
        let mut rest = JsObject::ordinary(Some(proto));
        if let Some(handle) = source.as_object() {
            let keys = self.heap.get(handle).own_keys(true);
            for key in keys {
                if consumed.contains(&key) {
                    continue;
                }
                let value = self.get_member(source, &key)?;
                rest.define_own(key, Property::data(value));
            }
        }
        Ok(Value::Object(self.heap.alloc(rest)))
    }
}

/// Collect every identifier a pattern binds, for hoisting.
pub(crate) fn pattern_names(
    arena: &hibou_ir::ProgramArena,
    pattern: PatternId,
    out: &mut Vec<Name>,
) {
    match &arena.pattern(pattern).kind {
        PatternKind::Ident(name) => out.push(*name),
        PatternKind::Member(_) => {}
        PatternKind::Array { elements, rest } => {
            for element in elements.iter().flatten() {
                pattern_names(arena, element.pattern, out);
            }
            if let Some(rest) = rest {
                pattern_names(arena, *rest, out);
            }
        }
        PatternKind::Object { props, rest } => {
            for prop in props {
                pattern_names(arena, prop.value, out);
            }
            if let Some(rest) = rest {
                pattern_names(arena, *rest, out);
            }
        }
    }
}
