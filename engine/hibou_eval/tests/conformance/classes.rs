//! Classes: construction, inheritance, `super`, private members, statics.

use crate::common::{eval, eval_err};
use pretty_assertions::assert_eq;

#[test]
fn methods_live_on_the_prototype() {
    let program = concat!(
        "class Point {\n",
        "  constructor(x, y) { this.x = x; this.y = y; }\n",
        "  norm() { return this.x * this.x + this.y * this.y; }\n",
        "}\n",
        "const p = new Point(3, 4);\n",
        "p.norm() + '|' + p.hasOwnProperty('norm') + '|' + (p instanceof Point)",
    );
    assert_eq!(eval(program), "25|false|true");
}

#[test]
fn calling_a_class_without_new_throws() {
    assert_eq!(
        eval_err("class C {} C()"),
        "TypeError: class constructor cannot be invoked without 'new'"
    );
}

#[test]
fn field_initializers_run_in_order_with_this() {
    assert_eq!(eval("class P { x = 1; y = this.x + 1; } const p = new P(); p.x + p.y"), "3");
}

#[test]
fn getters_and_setters_on_the_prototype() {
    let program = concat!(
        "class Temp {\n",
        "  #c = 25;\n",
        "  get celsius() { return this.#c; }\n",
        "  set celsius(v) { this.#c = v; }\n",
        "}\n",
        "const t = new Temp();\n",
        "t.celsius = 30;\n",
        "t.celsius",
    );
    assert_eq!(eval(program), "30");
}

mod inheritance {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn super_call_and_super_method() {
        let program = concat!(
            "class Animal {\n",
            "  constructor(name) { this.name = name; }\n",
            "  speak() { return this.name + ' makes a sound'; }\n",
            "}\n",
            "class Dog extends Animal {\n",
            "  constructor(name) { super(name); this.kind = 'dog'; }\n",
            "  speak() { return super.speak() + ' (woof)'; }\n",
            "}\n",
            "const d = new Dog('Rex');\n",
            "d.speak() + '|' + d.kind",
        );
        assert_eq!(eval(program), "Rex makes a sound (woof)|dog");
    }

    #[test]
    fn instanceof_walks_the_whole_chain() {
        let program = concat!(
            "class A {}\n",
            "class B extends A {}\n",
            "const b = new B();\n",
            "(b instanceof B) + ',' + (b instanceof A) + ',' + (b instanceof Object)",
        );
        assert_eq!(eval(program), "true,true,true");
    }

    #[test]
    fn derived_class_with_no_constructor_forwards_arguments() {
        let program = concat!(
            "class Base { constructor(v) { this.v = v; } }\n",
            "class Child extends Base {}\n",
            "new Child(7).v",
        );
        assert_eq!(eval(program), "7");
    }

    #[test]
    fn static_members_inherit_through_the_constructor_chain() {
        assert_eq!(eval("class A { static tag() { return 'A'; } } class B extends A {} B.tag()"), "A");
    }

    #[test]
    fn extending_a_plain_function_works() {
        let program = concat!(
            "function Legacy(n) { this.n = n; }\n",
            "Legacy.prototype.get = function () { return this.n; };\n",
            "class Modern extends Legacy {\n",
            "  constructor() { super(42); }\n",
            "}\n",
            "new Modern().get()",
        );
        assert_eq!(eval(program), "42");
    }

    #[test]
    fn extending_a_non_constructor_throws() {
        assert_eq!(
            eval_err("class Broken extends 42 {}"),
            "TypeError: class extends value is not a constructor"
        );
    }
}

mod private_members {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn private_fields_are_invisible_to_normal_lookup() {
        let program = concat!(
            "class Box {\n",
            "  #v = 'secret';\n",
            "  reveal() { return this.#v; }\n",
            "}\n",
            "const b = new Box();\n",
            "b.reveal() + '|' + Object.keys(b).length + '|' + b['#v']",
        );
        assert_eq!(eval(program), "secret|0|undefined");
    }

    #[test]
    fn brand_check_rejects_foreign_objects() {
        let message = eval_err("class Box { #v = 1; peek(o) { return o.#v; } } new Box().peek({})");
        assert!(message.starts_with("TypeError"), "got: {message}");
    }

    #[test]
    fn private_in_tests_the_brand() {
        let program = concat!(
            "class Box {\n",
            "  #v = 1;\n",
            "  static isBox(o) { return #v in o; }\n",
            "}\n",
            "Box.isBox(new Box()) + ',' + Box.isBox({})",
        );
        assert_eq!(eval(program), "true,false");
    }

    #[test]
    fn private_methods_dispatch_without_the_prototype() {
        let program = concat!(
            "class Calc {\n",
            "  #twice(n) { return n * 2; }\n",
            "  run(n) { return this.#twice(n) + 1; }\n",
            "}\n",
            "new Calc().run(10)",
        );
        assert_eq!(eval(program), "21");
    }

    #[test]
    fn each_class_evaluation_mints_fresh_names() {
        let program = concat!(
            "function make() {\n",
            "  return class { #v = 1; static probe(o) { return #v in o; } };\n",
            "}\n",
            "const A = make();\n",
            "const B = make();\n",
            "A.probe(new A()) + ',' + A.probe(new B())",
        );
        assert_eq!(eval(program), "true,false");
    }

    #[test]
    fn undeclared_private_access_is_a_syntax_error() {
        let message = eval_err("const o = {}; o.#missing;");
        assert!(message.starts_with("SyntaxError"), "got: {message}");
    }
}

mod statics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn static_fields_and_methods_live_on_the_constructor() {
        let program = concat!(
            "class Counter {\n",
            "  static total = 0;\n",
            "  constructor() { Counter.total++; }\n",
            "  static reset() { Counter.total = 0; return 'reset'; }\n",
            "}\n",
            "new Counter(); new Counter();\n",
            "Counter.total + '|' + Counter.reset() + '|' + Counter.total",
        );
        assert_eq!(eval(program), "2|reset|0");
    }

    #[test]
    fn static_blocks_run_at_class_evaluation() {
        let program = concat!(
            "class Registry {\n",
            "  static entries = [];\n",
            "  static { Registry.entries.push('core'); Registry.entries.push('extra'); }\n",
            "}\n",
            "Registry.entries.join(',')",
        );
        assert_eq!(eval(program), "core,extra");
    }

    #[test]
    fn static_initializers_see_this_as_the_constructor() {
        assert_eq!(eval("class C { static name2 = 'c'; static copy = this.name2 + '!'; } C.copy"), "c!");
    }
}

#[test]
fn class_declarations_are_in_the_dead_zone_before_evaluation() {
    assert_eq!(
        eval_err("new Later(); class Later {}"),
        "ReferenceError: cannot access 'Later' before initialization"
    );
}

#[test]
fn super_outside_a_derived_constructor_throws() {
    let message = eval_err("class NoParent { constructor() { super(); } } new NoParent()");
    assert!(message.starts_with("SyntaxError"), "got: {message}");
}
