//! Operators, coercion, control flow, and scoping.

use crate::common::{eval, eval_err};

mod operators {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3"), "7");
        assert_eq!(eval("(1 + 2) * 3"), "9");
        assert_eq!(eval("2 ** 10"), "1024");
        assert_eq!(eval("2 ** 3 ** 2"), "512");
    }

    #[test]
    fn modulo_sign_follows_dividend() {
        assert_eq!(eval("(-13) % 5"), "-3");
        assert_eq!(eval("13 % -5"), "3");
        assert_eq!(eval("13 % 5"), "3");
    }

    #[test]
    fn division_produces_doubles() {
        assert_eq!(eval("7 / 2"), "3.5");
        assert_eq!(eval("1 / 0"), "Infinity");
        assert_eq!(eval("-1 / 0"), "-Infinity");
        assert_eq!(eval("0 / 0"), "NaN");
    }

    #[test]
    fn plus_concatenates_when_either_side_is_a_string() {
        assert_eq!(eval("1 + '2'"), "12");
        assert_eq!(eval("'1' + 2"), "12");
        assert_eq!(eval("1 + 2 + '3'"), "33");
        assert_eq!(eval("'3' * '4'"), "12");
        assert_eq!(eval("[] + {}"), "[object Object]");
    }

    #[test]
    fn bitwise_operators_work_on_int32() {
        assert_eq!(eval("5 & 3"), "1");
        assert_eq!(eval("5 | 3"), "7");
        assert_eq!(eval("5 ^ 3"), "6");
        assert_eq!(eval("~0"), "-1");
        assert_eq!(eval("1 << 5"), "32");
        assert_eq!(eval("-8 >> 1"), "-4");
        assert_eq!(eval("-1 >>> 28"), "15");
    }

    #[test]
    fn relational_on_strings_is_lexicographic() {
        assert_eq!(eval("'apple' < 'banana'"), "true");
        assert_eq!(eval("'10' < '9'"), "true");
        assert_eq!(eval("10 < 9"), "false");
    }

    #[test]
    fn loose_equality_table() {
        assert_eq!(eval("0 == false"), "true");
        assert_eq!(eval("'1' == 1"), "true");
        assert_eq!(eval("null == undefined"), "true");
        assert_eq!(eval("null == 0"), "false");
        assert_eq!(eval("'' == 0"), "true");
        assert_eq!(eval("[] == ''"), "true");
        assert_eq!(eval("[0] == false"), "true");
        assert_eq!(eval("NaN == NaN"), "false");
    }

    #[test]
    fn strict_equality_never_coerces() {
        assert_eq!(eval("0 === false"), "false");
        assert_eq!(eval("'1' === 1"), "false");
        assert_eq!(eval("0 === -0"), "true");
        assert_eq!(eval("NaN === NaN"), "false");
        assert_eq!(eval("const o = {}; o === o"), "true");
        assert_eq!(eval("({}) === ({})"), "false");
    }

    #[test]
    fn logical_operators_short_circuit() {
        assert_eq!(
            eval("let hits = 0; function touch() { hits++; return true; } 0 && touch(); hits"),
            "0"
        );
        assert_eq!(
            eval("let hits = 0; function touch() { hits++; return true; } 6 || touch(); hits"),
            "0"
        );
        assert_eq!(eval("0 && 'skipped'"), "0");
        assert_eq!(eval("6 || 'skipped'"), "6");
        assert_eq!(eval("null ?? 'fallback'"), "fallback");
        assert_eq!(eval("0 ?? 'fallback'"), "0");
    }

    #[test]
    fn logical_assignment_operators() {
        assert_eq!(eval("let a = null; a ??= 5; a"), "5");
        assert_eq!(eval("let a = 1; a ??= 5; a"), "1");
        assert_eq!(eval("let a = 0; a ||= 9; a"), "9");
        assert_eq!(eval("let a = 2; a &&= 9; a"), "9");
        assert_eq!(eval("let a = 0; a &&= 9; a"), "0");
    }

    #[test]
    fn update_operators() {
        assert_eq!(eval("let n = 5; n++"), "5");
        assert_eq!(eval("let n = 5; n++; n"), "6");
        assert_eq!(eval("let n = 5; ++n"), "6");
        assert_eq!(eval("let n = 5; --n + n--"), "8");
        assert_eq!(eval("let s = '4'; s++; s"), "5");
    }

    #[test]
    fn update_evaluates_a_computed_key_once() {
        let program = concat!(
            "let calls = 0;\n",
            "function k() { calls++; return 0; }\n",
            "const a = [10];\n",
            "a[k()]++;\n",
            "a[0] + ',' + calls",
        );
        assert_eq!(eval(program), "11,1");
    }

    #[test]
    fn compound_assignment_evaluates_a_computed_key_once() {
        let program = concat!(
            "let calls = 0;\n",
            "function k() { calls++; return 0; }\n",
            "const a = [10];\n",
            "a[k()] += 1;\n",
            "a[0] + ',' + calls",
        );
        assert_eq!(eval(program), "11,1");
    }

    #[test]
    fn logical_assignment_evaluates_a_computed_key_once() {
        let program = concat!(
            "let calls = 0;\n",
            "function k() { calls++; return 0; }\n",
            "const a = [null];\n",
            "a[k()] ??= 4;\n",
            "a[0] + ',' + calls",
        );
        assert_eq!(eval(program), "4,1");
    }

    #[test]
    fn typeof_results() {
        assert_eq!(eval("typeof undefined"), "undefined");
        assert_eq!(eval("typeof null"), "object");
        assert_eq!(eval("typeof 1"), "number");
        assert_eq!(eval("typeof 'x'"), "string");
        assert_eq!(eval("typeof true"), "boolean");
        assert_eq!(eval("typeof {}"), "object");
        assert_eq!(eval("typeof (() => {})"), "function");
        assert_eq!(eval("typeof neverDeclared"), "undefined");
    }

    #[test]
    fn in_and_delete() {
        assert_eq!(eval("'x' in { x: 1 }"), "true");
        assert_eq!(eval("0 in [7]"), "true");
        assert_eq!(eval("1 in [7]"), "false");
        assert_eq!(eval("const o = { a: 1 }; delete o.a; 'a' in o"), "false");
        assert_eq!(eval("delete 42"), "true");
    }

    #[test]
    fn conditional_and_void() {
        assert_eq!(eval("true ? 'yes' : 'no'"), "yes");
        assert_eq!(eval("'' ? 'yes' : 'no'"), "no");
        assert_eq!(eval("void 0"), "undefined");
    }
}

mod templates {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn substitution_uses_to_string() {
        assert_eq!(eval("`sum: ${1 + 2}`"), "sum: 3");
        assert_eq!(eval("const who = 'world'; `hello ${who}!`"), "hello world!");
        assert_eq!(eval("`${null} and ${undefined}`"), "null and undefined");
    }

    #[test]
    fn escaped_backtick_and_dollar_stay_literal() {
        assert_eq!(eval(r"`a\`b`"), "a`b");
        assert_eq!(eval(r"`\${1}`"), "${1}");
        assert_eq!(eval(r"`tab\there`"), "tab\there");
    }

    #[test]
    fn multiline_and_nested() {
        assert_eq!(eval("`a\nb`.length"), "3");
        assert_eq!(eval("`outer ${`inner ${1}`}`"), "outer inner 1");
    }
}

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn if_else_scenario() {
        assert_eq!(eval("var x = 5; if (x == 5) x = 7; else x = 0; x"), "7");
        assert_eq!(eval("var x = 4; if (x == 5) x = 7; else x = 0; x"), "0");
    }

    #[test]
    fn while_and_do_while() {
        assert_eq!(eval("let n = 0; while (n < 5) n++; n"), "5");
        assert_eq!(eval("let n = 10; do n++; while (n < 5); n"), "11");
    }

    #[test]
    fn for_loop_with_break_and_continue() {
        assert_eq!(
            eval("let s = 0; for (let i = 0; i < 10; i++) { if (i % 2) continue; if (i > 6) break; s += i; } s"),
            "12"
        );
    }

    #[test]
    fn labeled_break_and_continue() {
        let program = concat!(
            "let s = '';\n",
            "outer: for (let i = 0; i < 3; i++) {\n",
            "  for (let j = 0; j < 3; j++) {\n",
            "    if (j === 1) continue outer;\n",
            "    if (i === 2) break outer;\n",
            "    s += '' + i + j;\n",
            "  }\n",
            "}\n",
            "s",
        );
        assert_eq!(eval(program), "0010");
    }

    #[test]
    fn labeled_break_on_a_block() {
        assert_eq!(
            eval("let s = 'a'; done: { s += 'b'; if (s) break done; s += 'c'; } s"),
            "ab"
        );
    }

    #[test]
    fn switch_matches_then_falls_through() {
        let program = concat!(
            "function f(x) {\n",
            "  let out = '';\n",
            "  switch (x) {\n",
            "    case 1: out += '1';\n",
            "    default: out += 'd';\n",
            "    case 2: out += '2';\n",
            "  }\n",
            "  return out;\n",
            "}\n",
            "f(1) + '|' + f(2) + '|' + f(3)",
        );
        assert_eq!(eval(program), "1d2|2|d2");
    }

    #[test]
    fn switch_break_stops_fallthrough() {
        let program = concat!(
            "function f(x) {\n",
            "  switch (x) {\n",
            "    case 1: return 'one';\n",
            "    case 2: break;\n",
            "    default: return 'other';\n",
            "  }\n",
            "  return 'after';\n",
            "}\n",
            "f(1) + ',' + f(2) + ',' + f(3)",
        );
        assert_eq!(eval(program), "one,after,other");
    }
}

mod scoping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn var_hoists_to_function_top() {
        assert_eq!(
            eval("function f() { var seen = typeof v; var v = 1; return seen; } f()"),
            "undefined"
        );
        assert_eq!(eval("var before = later; var later = 5; typeof before"), "undefined");
    }

    #[test]
    fn function_declarations_hoist_eagerly() {
        assert_eq!(eval("const r = early(); function early() { return 'hoisted'; } r"), "hoisted");
    }

    #[test]
    fn let_has_a_temporal_dead_zone() {
        assert_eq!(
            eval_err("{ tmp; let tmp = 1; }"),
            "ReferenceError: cannot access 'tmp' before initialization"
        );
    }

    #[test]
    fn const_cannot_be_reassigned() {
        assert_eq!(
            eval_err("const a = 1; a = 2;"),
            "TypeError: assignment to constant variable"
        );
    }

    #[test]
    fn block_scoping_shadows() {
        assert_eq!(eval("let x = 'outer'; { let x = 'inner'; } x"), "outer");
        assert_eq!(eval("var x = 1; { var x = 2; } x"), "2");
    }

    #[test]
    fn undeclared_read_throws_but_typeof_does_not() {
        assert_eq!(eval_err("missing"), "ReferenceError: missing is not defined");
        assert_eq!(eval("typeof missing"), "undefined");
    }

    #[test]
    fn sloppy_assignment_creates_a_global() {
        assert_eq!(eval("function f() { leaked = 7; } f(); leaked"), "7");
    }

    #[test]
    fn per_iteration_let_bindings_are_distinct() {
        assert_eq!(
            eval("const fns = []; for (let i = 0; i < 3; i++) fns.push(() => i); '' + fns[0]() + fns[1]() + fns[2]()"),
            "012"
        );
    }
}
