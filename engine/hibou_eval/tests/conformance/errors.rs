//! Exceptions: throw, try/catch/finally, and the Error hierarchy.

use crate::common::{eval, eval_err};
use pretty_assertions::assert_eq;

#[test]
fn thrown_values_reach_the_matching_catch() {
    assert_eq!(eval("let got; try { throw 'flat'; } catch (e) { got = e; } got"), "flat");
    assert_eq!(eval("try { throw { code: 7 }; } catch (e) { e.code }"), "7");
}

#[test]
fn catch_without_a_binding() {
    assert_eq!(eval("let ran = false; try { throw 1; } catch { ran = true; } ran"), "true");
}

#[test]
fn uncaught_primitives_render_as_values() {
    assert_eq!(eval_err("throw 42"), "42");
    assert_eq!(eval_err("throw 'plain text'"), "plain text");
}

#[test]
fn uncaught_errors_render_name_and_message() {
    assert_eq!(eval_err("throw new Error('boom')"), "Error: boom");
    assert_eq!(eval_err("throw new TypeError('bad type')"), "TypeError: bad type");
    assert_eq!(eval_err("throw new Error()"), "Error");
}

#[test]
fn error_hierarchy_and_instanceof() {
    let program = concat!(
        "const e = new TypeError('x');\n",
        "(e instanceof TypeError) + ',' + (e instanceof Error) + ',' + (e instanceof RangeError)",
    );
    assert_eq!(eval(program), "true,true,false");
    assert_eq!(eval("new RangeError('r').name"), "RangeError");
    assert_eq!(eval("new Error('m').message"), "m");
    assert_eq!(eval("new SyntaxError('s').toString()"), "SyntaxError: s");
}

#[test]
fn builtin_operations_throw_typed_errors() {
    assert_eq!(
        eval_err("null.x"),
        "TypeError: cannot read properties of null (reading 'x')"
    );
    assert_eq!(
        eval_err("undefined.anything"),
        "TypeError: cannot read properties of undefined (reading 'anything')"
    );
    assert_eq!(eval_err("const n = 3; n()"), "TypeError: 3 is not a function");
    let message = eval_err("'text' instanceof 5");
    assert!(message.starts_with("TypeError"), "got: {message}");
}

#[test]
fn catch_parameter_destructures() {
    assert_eq!(
        eval("try { throw { detail: 'inner' }; } catch ({ detail }) { detail }"),
        "inner"
    );
}

#[test]
fn rethrow_propagates() {
    assert_eq!(
        eval_err("try { throw new Error('first'); } catch (e) { throw new Error('second'); }"),
        "Error: second"
    );
}

mod finally_clause {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finally_runs_on_both_paths() {
        assert_eq!(
            eval("let log = ''; try { log += 'try '; } finally { log += 'finally'; } log"),
            "try finally"
        );
        assert_eq!(
            eval("let log = ''; try { throw 1; } catch { log += 'catch '; } finally { log += 'finally'; } log"),
            "catch finally"
        );
    }

    #[test]
    fn finally_return_overrides_try_return() {
        assert_eq!(eval("function f() { try { return 1; } finally { return 2; } } f()"), "2");
    }

    #[test]
    fn finally_return_swallows_the_exception() {
        assert_eq!(
            eval("function f() { try { throw new Error('gone'); } finally { return 'caught by finally'; } } f()"),
            "caught by finally"
        );
    }

    #[test]
    fn throwing_finally_wins() {
        assert_eq!(
            eval_err("try { throw new Error('original'); } finally { throw new Error('from finally'); }"),
            "Error: from finally"
        );
    }

    #[test]
    fn finally_break_exits_the_loop() {
        assert_eq!(
            eval("let n = 0; for (let i = 0; i < 10; i++) { try { n++; } finally { break; } } n"),
            "1"
        );
    }
}

#[test]
fn exceptions_unwind_nested_calls() {
    let program = concat!(
        "function inner() { throw new RangeError('deep'); }\n",
        "function middle() { inner(); return 'unreached'; }\n",
        "try { middle(); } catch (e) { e.name + ': ' + e.message }",
    );
    assert_eq!(eval(program), "RangeError: deep");
}

#[test]
fn catch_binding_is_scoped_to_the_clause() {
    assert_eq!(eval("try { throw 1; } catch (e) {} typeof e"), "undefined");
}
