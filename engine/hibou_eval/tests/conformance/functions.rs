//! Closures, `this` binding, parameters, and the function prototype.

use crate::common::{eval, eval_err};
use pretty_assertions::assert_eq;

#[test]
fn closures_capture_by_reference() {
    assert_eq!(
        eval("function counter() { let n = 0; return () => ++n; } const c = counter(); c(); c(); c()"),
        "3"
    );
}

#[test]
fn sibling_closures_share_one_environment() {
    let program = concat!(
        "function pair() {\n",
        "  let n = 0;\n",
        "  return { bump: () => ++n, read: () => n };\n",
        "}\n",
        "const p = pair();\n",
        "p.bump(); p.bump();\n",
        "p.read()",
    );
    assert_eq!(eval(program), "2");
}

#[test]
fn default_parameters_see_earlier_parameters() {
    assert_eq!(eval("function f(a, b = a * 2) { return a + b; } f(3)"), "9");
    assert_eq!(eval("function f(a, b = a * 2) { return a + b; } f(1, 1)"), "2");
    assert_eq!(eval("function f(x = 'absent') { return x; } f(undefined)"), "absent");
    assert_eq!(eval("function f(x = 'absent') { return x; } f(null)"), "null");
}

#[test]
fn rest_parameters_collect_the_tail() {
    assert_eq!(eval("function f(first, ...rest) { return first + rest.length; } f(1, 2, 3)"), "3");
    assert_eq!(eval("function f(...all) { return all.join('-'); } f()"), "");
}

#[test]
fn arguments_object_reflects_the_call() {
    assert_eq!(eval("function f() { return arguments.length; } f(1, 2, 3)"), "3");
    assert_eq!(eval("function f(a) { return arguments[1]; } f('x', 'y')"), "y");
}

#[test]
fn method_call_binds_this_to_the_receiver() {
    assert_eq!(
        eval("const o = { x: 1, double() { return this.x * 2; } }; o.double()"),
        "2"
    );
    assert_eq!(
        eval("const o = { grab() { return typeof this; } }; const f = o.grab; f()"),
        "undefined"
    );
}

#[test]
fn arrows_capture_this_lexically() {
    assert_eq!(
        eval("const o = { n: 10, collect() { const f = () => this.n; return f(); } }; o.collect()"),
        "10"
    );
}

#[test]
fn call_and_apply_supply_this_and_arguments() {
    let sum = "function sum() { let t = 0; for (const a of arguments) t += a; return t; }\n";
    assert_eq!(eval(&format!("{sum}sum.call(null, 4, 5)")), "9");
    assert_eq!(eval(&format!("{sum}sum.apply(null, [1, 2, 3])")), "6");
    assert_eq!(
        eval("function who() { return this.name; } who.call({ name: 'Ada' })"),
        "Ada"
    );
}

#[test]
fn bind_fixes_this_and_prepends_arguments() {
    let program = concat!(
        "function greet(greeting) { return greeting + ', ' + this.name; }\n",
        "const hi = greet.bind({ name: 'Bob' }, 'Hi');\n",
        "hi() + '|' + hi.name + '|' + hi.length",
    );
    assert_eq!(eval(program), "Hi, Bob|bound greet|0");
}

#[test]
fn bound_functions_construct_the_target() {
    let program = concat!(
        "function Point(x, y) { this.x = x; this.y = y; }\n",
        "const OnAxis = Point.bind(null, 0);\n",
        "const p = new OnAxis(5);\n",
        "p.x + ',' + p.y + ',' + (p instanceof Point)",
    );
    assert_eq!(eval(program), "0,5,true");
}

mod named_evaluation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn declarations_name_anonymous_functions() {
        assert_eq!(eval("const f = function () {}; f.name"), "f");
        assert_eq!(eval("const g = () => {}; g.name"), "g");
        assert_eq!(eval("var h = function () {}; h.name"), "h");
    }

    #[test]
    fn chained_assignment_names_once() {
        assert_eq!(
            eval("let a, b; a = b = function () {}; a.name + '&' + b.name"),
            "b&b"
        );
    }

    #[test]
    fn named_expressions_keep_their_own_name() {
        assert_eq!(eval("const f = function original() {}; f.name"), "original");
    }

    #[test]
    fn logical_assignment_names_too() {
        assert_eq!(eval("let f = null; f ??= () => {}; f.name"), "f");
    }

    #[test]
    fn object_properties_name_their_values() {
        assert_eq!(eval("const o = { handler: () => {} }; o.handler.name"), "handler");
    }
}

#[test]
fn function_to_string_marks_natives() {
    assert_eq!(
        eval("Math.max.toString()"),
        "function max() { [native code] }"
    );
}

#[test]
fn deep_recursion_throws_a_range_error() {
    assert_eq!(
        eval_err("function down(n) { return down(n + 1); } down(0)"),
        "RangeError: maximum call stack size exceeded"
    );
}

#[test]
fn recursion_within_the_limit_completes() {
    assert_eq!(
        eval("function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); } fib(15)"),
        "610"
    );
}

#[test]
fn constructors_build_instances() {
    let program = concat!(
        "function Point(x, y) { this.x = x; this.y = y; }\n",
        "Point.prototype.norm = function () { return this.x * this.x + this.y * this.y; };\n",
        "new Point(3, 4).norm()",
    );
    assert_eq!(eval(program), "25");
}

#[test]
fn constructor_returning_an_object_overrides_this() {
    assert_eq!(
        eval("function F() { return { tag: 'override' }; } new F().tag"),
        "override"
    );
    assert_eq!(eval("function F() { this.tag = 'kept'; return 42; } new F().tag"), "kept");
}
