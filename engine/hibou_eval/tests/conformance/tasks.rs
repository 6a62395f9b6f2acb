//! Async functions, promises, the microtask queue, `eval`, and heap reuse.

use crate::common::{eval, eval_err};

mod async_functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn async_results_arrive_through_then() {
        let program = concat!(
            "async function add(a, b) { return a + b; }\n",
            "let result = 0;\n",
            "add(2, 3).then(v => { result = v; });\n",
            "result",
        );
        assert_eq!(eval(program), "5");
    }

    #[test]
    fn await_unwraps_a_settled_promise() {
        let program = concat!(
            "async function outer() { const v = await Promise.resolve(8); return v + 1; }\n",
            "let got;\n",
            "outer().then(v => { got = v; });\n",
            "got",
        );
        assert_eq!(eval(program), "9");
    }

    #[test]
    fn await_of_a_plain_value_passes_through() {
        let program = concat!(
            "async function f() { return (await 1) + (await 2); }\n",
            "let got; f().then(v => { got = v; }); got",
        );
        assert_eq!(eval(program), "3");
    }

    #[test]
    fn throwing_inside_async_rejects_the_promise() {
        let program = concat!(
            "async function boom() { throw new Error('nope'); }\n",
            "let msg = '';\n",
            "boom().catch(e => { msg = e.message; });\n",
            "msg",
        );
        assert_eq!(eval(program), "nope");
    }

    #[test]
    fn await_of_a_rejection_throws_at_the_await() {
        let program = concat!(
            "async function f() {\n",
            "  try { await Promise.reject('bad'); } catch (e) { return 'caught ' + e; }\n",
            "}\n",
            "let r; f().then(v => { r = v; }); r",
        );
        assert_eq!(eval(program), "caught bad");
    }

    #[test]
    fn async_functions_return_promises() {
        assert_eq!(eval("async function f() {} typeof f().then"), "function");
    }
}

mod microtasks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn callbacks_run_after_the_current_statement() {
        let program = concat!(
            "const log = [];\n",
            "function kick() {\n",
            "  Promise.resolve(1).then(v => log.push('then:' + v));\n",
            "  log.push('sync');\n",
            "}\n",
            "kick();\n",
            "log.join('|')",
        );
        assert_eq!(eval(program), "sync|then:1");
    }

    #[test]
    fn queue_drains_in_fifo_order() {
        let program = concat!(
            "const log = [];\n",
            "function kick() {\n",
            "  Promise.resolve('a').then(v => log.push(v));\n",
            "  Promise.resolve('b').then(v => log.push(v));\n",
            "}\n",
            "kick();\n",
            "log.join('')",
        );
        assert_eq!(eval(program), "ab");
    }

    #[test]
    fn finally_runs_for_both_outcomes() {
        let program = concat!(
            "const log = [];\n",
            "function kick() {\n",
            "  Promise.resolve(1).finally(() => log.push('f1'));\n",
            "  Promise.reject(2).catch(() => log.push('c')).finally(() => log.push('f2'));\n",
            "}\n",
            "kick();\n",
            "log.join(',')",
        );
        assert_eq!(eval(program), "f1,c,f2");
    }

    #[test]
    fn executor_constructor_is_rejected() {
        let message = eval_err("new Promise((resolve) => resolve(1))");
        assert!(message.starts_with("TypeError"), "got: {message}");
    }
}

mod eval_builtin {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn direct_eval_reads_the_caller_scope() {
        assert_eq!(eval("function f() { let secret = 41; return eval('secret + 1'); } f()"), "42");
    }

    #[test]
    fn direct_eval_writes_var_into_the_caller_scope() {
        assert_eq!(eval("function f() { eval('var planted = 7;'); return planted; } f()"), "7");
    }

    #[test]
    fn aliased_eval_runs_in_the_global_scope() {
        let program = concat!(
            "function f() { let secret = 1; const ev = eval; return ev('typeof secret'); }\n",
            "f()",
        );
        assert_eq!(eval(program), "undefined");
    }

    #[test]
    fn eval_of_a_non_string_passes_through() {
        assert_eq!(eval("eval(42)"), "42");
    }

    #[test]
    fn eval_syntax_errors_become_thrown_syntax_errors() {
        let message = eval_err("eval('let let = 1;')");
        assert!(message.starts_with("SyntaxError"), "got: {message}");
    }

    #[test]
    fn eval_result_is_the_last_expression() {
        assert_eq!(eval("eval('1 + 1; 2 + 2')"), "4");
    }
}

mod heap {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collection_preserves_closure_captured_objects() {
        let program = concat!(
            "function mk() { const o = { n: 1 }; o.self = o; return () => o.n; }\n",
            "const get = mk();\n",
            "let churn = 0;\n",
            "for (let i = 0; i < 5000; i++) { churn += { filler: i }.filler; }\n",
            "get()",
        );
        assert_eq!(eval(program), "1");
    }

    #[test]
    fn collection_preserves_deep_global_structures() {
        let program = concat!(
            "const root = { list: [] };\n",
            "for (let i = 0; i < 100; i++) root.list.push({ i });\n",
            "let churn = 0;\n",
            "for (let i = 0; i < 5000; i++) { churn += { filler: i }.filler ? 1 : 1; }\n",
            "root.list.length + ',' + root.list[99].i",
        );
        assert_eq!(eval(program), "100,99");
    }

    #[test]
    fn cyclic_garbage_does_not_break_later_allocation() {
        let program = concat!(
            "for (let i = 0; i < 3000; i++) {\n",
            "  const a = {}; const b = { a }; a.b = b;\n",
            "}\n",
            "({ ok: true }).ok",
        );
        assert_eq!(eval(program), "true");
    }
}
