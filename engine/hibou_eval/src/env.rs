//! Lexical environments.
//!
//! A chain of `Rc<RefCell<_>>` scopes. Function scopes carry a `this`
//! binding and method metadata; block scopes only carry bindings, so
//! `this`, `super`, and private-name lookups walk up the chain — which is
//! exactly how arrow functions inherit them.

use crate::heap::Handle;
use crate::object::PrivateId;
use crate::value::Value;
use hibou_ir::Name;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutable: bool,
    /// `false` while in the temporal dead zone (`let`/`const`/`class`
    /// before their declaration executes).
    initialized: bool,
}

#[derive(Clone)]
pub struct Environment {
    parent: Option<EnvRef>,
    bindings: FxHashMap<Name, Binding>,
    /// Set on function scopes; block scopes delegate upward.
    this_value: Option<Value>,
    /// Method home object, for `super.m` lookup.
    home_object: Option<Handle>,
    /// Class whose constructor is executing, for `super()` and field
    /// initialization.
    active_class: Option<Handle>,
    /// Private-name table of the enclosing class body.
    private_names: Option<Rc<FxHashMap<Name, PrivateId>>>,
}

impl Environment {
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: None,
            bindings: FxHashMap::default(),
            this_value: Some(Value::Undefined),
            home_object: None,
            active_class: None,
            private_names: None,
        }))
    }

    /// Block scope.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: Some(parent.clone()),
            bindings: FxHashMap::default(),
            this_value: None,
            home_object: None,
            active_class: None,
            private_names: None,
        }))
    }

    /// Function scope with its own `this`.
    pub fn function_scope(
        parent: &EnvRef,
        this_value: Option<Value>,
        home_object: Option<Handle>,
    ) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: Some(parent.clone()),
            bindings: FxHashMap::default(),
            this_value,
            home_object,
            active_class: None,
            private_names: None,
        }))
    }

    pub fn set_active_class(&mut self, class: Handle) {
        self.active_class = Some(class);
    }

    pub fn set_private_names(&mut self, names: Rc<FxHashMap<Name, PrivateId>>) {
        self.private_names = Some(names);
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    /// Declare an initialized binding, overwriting any existing one in
    /// this scope.
    pub fn declare(&mut self, name: Name, value: Value, mutable: bool) {
        self.bindings.insert(
            name,
            Binding {
                value,
                mutable,
                initialized: true,
            },
        );
    }

    /// Declare a binding in its temporal dead zone.
    pub fn declare_uninitialized(&mut self, name: Name, mutable: bool) {
        self.bindings.insert(
            name,
            Binding {
                value: Value::Undefined,
                mutable,
                initialized: false,
            },
        );
    }

    /// `var` hoisting: create only if absent, initialized to `undefined`.
    pub fn declare_var(&mut self, name: Name) {
        self.bindings.entry(name).or_insert(Binding {
            value: Value::Undefined,
            mutable: true,
            initialized: true,
        });
    }

    /// Move a TDZ binding to initialized.
    pub fn initialize(&mut self, name: Name, value: Value) {
        if let Some(binding) = self.bindings.get_mut(&name) {
            binding.value = value;
            binding.initialized = true;
        }
    }

    pub fn has_own(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Fresh scope with copies of this scope's bindings, for per-iteration
    /// `let` semantics in loop heads.
    pub fn fork(env: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(env.borrow().clone()))
    }

    pub(crate) fn for_each_value(&self, mut f: impl FnMut(&Value)) {
        for binding in self.bindings.values() {
            f(&binding.value);
        }
        if let Some(this) = &self.this_value {
            f(this);
        }
        if let Some(home) = self.home_object {
            f(&Value::Object(home));
        }
        if let Some(class) = self.active_class {
            f(&Value::Object(class));
        }
    }
}

/// Outcome of resolving a name through the scope chain.
pub enum Lookup {
    Value(Value),
    /// Found, but still in its temporal dead zone.
    Uninitialized,
    NotFound,
}

pub fn lookup(env: &EnvRef, name: Name) -> Lookup {
    let mut current = env.clone();
    loop {
        let next = {
            let scope = current.borrow();
            if let Some(binding) = scope.bindings.get(&name) {
                return if binding.initialized {
                    Lookup::Value(binding.value.clone())
                } else {
                    Lookup::Uninitialized
                };
            }
            scope.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Lookup::NotFound,
        }
    }
}

/// Outcome of assigning to a name through the scope chain.
pub enum Assign {
    Done,
    Immutable,
    Uninitialized,
    NotFound,
}

pub fn assign(env: &EnvRef, name: Name, value: Value) -> Assign {
    let mut current = env.clone();
    loop {
        let next = {
            let mut scope = current.borrow_mut();
            if let Some(binding) = scope.bindings.get_mut(&name) {
                if !binding.initialized {
                    return Assign::Uninitialized;
                }
                if !binding.mutable {
                    return Assign::Immutable;
                }
                binding.value = value;
                return Assign::Done;
            }
            scope.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Assign::NotFound,
        }
    }
}

/// `this` of the nearest function scope.
pub fn this_of(env: &EnvRef) -> Value {
    let mut current = env.clone();
    loop {
        let next = {
            let scope = current.borrow();
            if let Some(this) = &scope.this_value {
                return this.clone();
            }
            scope.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Value::Undefined,
        }
    }
}

/// Home object of the nearest method scope.
pub fn home_object_of(env: &EnvRef) -> Option<Handle> {
    walk(env, |scope| scope.home_object)
}

/// Class under construction, for `super()`.
pub fn active_class_of(env: &EnvRef) -> Option<Handle> {
    walk(env, |scope| scope.active_class)
}

/// Resolve `#name` through enclosing class bodies.
pub fn resolve_private(env: &EnvRef, name: Name) -> Option<PrivateId> {
    walk(env, |scope| {
        scope
            .private_names
            .as_ref()
            .and_then(|names| names.get(&name).copied())
    })
}

fn walk<T>(env: &EnvRef, select: impl Fn(&Environment) -> Option<T>) -> Option<T> {
    let mut current = env.clone();
    loop {
        let next = {
            let scope = current.borrow();
            if let Some(found) = select(&scope) {
                return Some(found);
            }
            scope.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hibou_ir::StringInterner;
    use pretty_assertions::assert_eq;

    fn number(lookup: Lookup) -> f64 {
        match lookup {
            Lookup::Value(Value::Number(n)) => n,
            Lookup::Value(other) => panic!("expected a number, got {other:?}"),
            Lookup::Uninitialized => panic!("binding still in its dead zone"),
            Lookup::NotFound => panic!("binding not found"),
        }
    }

    #[test]
    fn inner_scopes_shadow_outer_bindings() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let global = Environment::global();
        global.borrow_mut().declare(x, Value::Number(1.0), true);
        let block = Environment::child(&global);
        block.borrow_mut().declare(x, Value::Number(2.0), true);

        assert_eq!(number(lookup(&block, x)), 2.0);
        assert_eq!(number(lookup(&global, x)), 1.0);
    }

    #[test]
    fn assignment_walks_to_the_declaring_scope() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let global = Environment::global();
        global.borrow_mut().declare(x, Value::Number(1.0), true);
        let block = Environment::child(&global);

        assert!(matches!(assign(&block, x, Value::Number(9.0)), Assign::Done));
        assert_eq!(number(lookup(&global, x)), 9.0);
    }

    #[test]
    fn dead_zone_bindings_are_visible_but_unreadable() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let env = Environment::global();
        env.borrow_mut().declare_uninitialized(x, true);

        assert!(matches!(lookup(&env, x), Lookup::Uninitialized));
        assert!(matches!(
            assign(&env, x, Value::Number(1.0)),
            Assign::Uninitialized
        ));

        env.borrow_mut().initialize(x, Value::Number(3.0));
        assert_eq!(number(lookup(&env, x)), 3.0);
    }

    #[test]
    fn const_bindings_reject_assignment() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let env = Environment::global();
        env.borrow_mut().declare(x, Value::Number(1.0), false);

        assert!(matches!(
            assign(&env, x, Value::Number(2.0)),
            Assign::Immutable
        ));
        assert_eq!(number(lookup(&env, x)), 1.0);
    }

    #[test]
    fn var_hoisting_does_not_clobber_an_existing_binding() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let env = Environment::global();
        env.borrow_mut().declare(x, Value::Number(5.0), true);
        env.borrow_mut().declare_var(x);

        assert_eq!(number(lookup(&env, x)), 5.0);
    }

    #[test]
    fn fork_detaches_loop_iteration_bindings() {
        let interner = StringInterner::new();
        let i = interner.intern("i");
        let first = Environment::global();
        first.borrow_mut().declare(i, Value::Number(0.0), true);

        let second = Environment::fork(&first);
        second.borrow_mut().declare(i, Value::Number(1.0), true);

        assert_eq!(number(lookup(&first, i)), 0.0);
        assert_eq!(number(lookup(&second, i)), 1.0);
    }

    #[test]
    fn this_resolves_through_block_scopes() {
        let global = Environment::global();
        let function = Environment::function_scope(&global, Some(Value::Bool(true)), None);
        let block = Environment::child(&function);

        assert!(matches!(this_of(&block), Value::Bool(true)));
    }
}
