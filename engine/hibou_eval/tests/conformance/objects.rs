//! Object literals, prototypes, destructuring, spread, and enumeration.

use crate::common::{eval, eval_err, logged};

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shorthand_and_computed_keys() {
        assert_eq!(eval("const x = 1; ({ x }).x"), "1");
        assert_eq!(eval("const k = 'a' + 'b'; ({ [k]: 3 })['ab']"), "3");
        assert_eq!(eval("({ 7: 'seven' })[3 + 4]"), "seven");
    }

    #[test]
    fn getters_and_setters() {
        let program = concat!(
            "const o = {\n",
            "  _v: 0,\n",
            "  get v() { return this._v; },\n",
            "  set v(n) { this._v = n * 2; },\n",
            "};\n",
            "o.v = 21;\n",
            "o.v",
        );
        assert_eq!(eval(program), "42");
    }

    #[test]
    fn spread_copies_own_enumerable_properties() {
        assert_eq!(eval("const o = { ...{ a: 1 }, b: 2 }; o.a + o.b"), "3");
        assert_eq!(eval("const base = { a: 1, b: 2 }; ({ ...base, b: 9 }).b"), "9");
    }

    #[test]
    fn nested_structures_display() {
        assert_eq!(
            logged("console.log({ k: 'v', list: [1, 2] })"),
            vec!["{ k: 'v', list: [ 1, 2 ] }"]
        );
    }

    #[test]
    fn cyclic_graphs_display_without_looping() {
        assert_eq!(logged("const a = []; a.push(a); console.log(a);"), vec!["[ [Circular] ]"]);
    }
}

mod prototypes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chain_walks_to_the_prototype() {
        let program = concat!(
            "function A() {}\n",
            "A.prototype.greet = function () { return 'hi'; };\n",
            "const a = new A();\n",
            "a.greet() + '|' + a.hasOwnProperty('greet') + '|' + ('greet' in a)",
        );
        assert_eq!(eval(program), "hi|false|true");
    }

    #[test]
    fn set_prototype_of_rewires_lookup() {
        let program = concat!(
            "const proto = { ok: 'from proto' };\n",
            "const obj = {};\n",
            "Object.setPrototypeOf(obj, proto);\n",
            "(obj.ok === proto.ok) + '|' + obj.hasOwnProperty('ok')",
        );
        assert_eq!(eval(program), "true|false");
    }

    #[test]
    fn cyclic_prototype_chains_are_rejected() {
        assert_eq!(
            eval_err("const a = {}; const b = {}; Object.setPrototypeOf(a, b); Object.setPrototypeOf(b, a);"),
            "TypeError: cyclic prototype chain is not allowed"
        );
    }

    #[test]
    fn own_writes_shadow_the_prototype() {
        let program = concat!(
            "const proto = { n: 1 };\n",
            "const child = {};\n",
            "Object.setPrototypeOf(child, proto);\n",
            "child.n = 2;\n",
            "child.n + ',' + proto.n",
        );
        assert_eq!(eval(program), "2,1");
    }

    #[test]
    fn mutating_a_prototype_is_visible_through_instances() {
        let program = concat!(
            "function T() {}\n",
            "const t = new T();\n",
            "T.prototype.late = () => 'added later';\n",
            "t.late()",
        );
        assert_eq!(eval(program), "added later");
    }
}

mod destructuring {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_patterns_with_renames_and_rest() {
        let program = concat!(
            "const { a, b: { c }, ...rest } = { a: 1, b: { c: 2 }, d: 3, e: 4 };\n",
            "'' + a + c + rest.d + rest.e",
        );
        assert_eq!(eval(program), "1234");
    }

    #[test]
    fn array_patterns_with_defaults_holes_and_rest() {
        assert_eq!(
            eval("const [x = 10, , z, ...r] = [1, 2, 3, 4, 5]; '' + x + z + r.join('')"),
            "1345"
        );
        assert_eq!(eval("const [x = 10] = []; x"), "10");
    }

    #[test]
    fn swap_through_array_assignment() {
        assert_eq!(eval("let a = 1, b = 2; [a, b] = [b, a]; '' + a + b"), "21");
    }

    #[test]
    fn parameter_destructuring() {
        assert_eq!(
            eval("function dist({ x, y }) { return x * x + y * y; } dist({ x: 3, y: 4 })"),
            "25"
        );
    }

    #[test]
    fn destructuring_null_throws() {
        let message = eval_err("const { a } = null;");
        assert!(message.starts_with("TypeError"), "got: {message}");
    }

    #[test]
    fn strings_destructure_by_character() {
        assert_eq!(eval("const [first, second] = 'ab'; first + second"), "ab");
    }
}

mod enumeration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn for_in_walks_own_then_inherited() {
        let program = concat!(
            "function P() {}\n",
            "P.prototype.p = 1;\n",
            "const o = new P();\n",
            "o.a = 2;\n",
            "const ks = [];\n",
            "for (const k in o) ks.push(k);\n",
            "ks.join(',')",
        );
        assert_eq!(eval(program), "a,p");
    }

    #[test]
    fn for_in_on_nullish_does_nothing() {
        assert_eq!(eval("let n = 0; for (const k in null) n++; n"), "0");
    }

    #[test]
    fn for_of_iterates_arrays_and_strings() {
        assert_eq!(eval("let t = 0; for (const n of [1, 2, 3]) t += n; t"), "6");
        assert_eq!(eval("let s = ''; for (const ch of 'abc') s += ch + '-'; s"), "a-b-c-");
    }

    #[test]
    fn object_keys_orders_indices_first() {
        assert_eq!(eval("Object.keys({ b: 1, a: 2, 2: 3, 1: 4 }).join(',')"), "1,2,b,a");
    }

    #[test]
    fn object_assign_merges_left_to_right() {
        assert_eq!(
            eval("const t = Object.assign({ a: 1 }, { b: 2 }, { a: 9 }); '' + t.a + t.b"),
            "92"
        );
    }
}

mod optional_chaining {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_circuits_on_nullish_bases() {
        assert_eq!(eval("const o = { a: { b: 1 } }; '' + o?.a?.b + o?.x?.y"), "1undefined");
        assert_eq!(eval("null?.anything"), "undefined");
    }

    #[test]
    fn short_circuit_skips_side_effects() {
        assert_eq!(eval("let x = 0; null?.[x++]; x"), "0");
        assert_eq!(eval("let x = 0; const o = {}; o.missing?.(x++); x"), "0");
    }

    #[test]
    fn optional_calls() {
        assert_eq!(eval("const o = { f() { return 'ran'; } }; o.f?.()"), "ran");
        assert_eq!(eval("const o = {}; o.f?.()"), "undefined");
    }

    #[test]
    fn chains_keep_the_method_receiver() {
        assert_eq!(eval("const o = { n: 3, read() { return this.n; } }; o?.read()"), "3");
    }
}

mod arrays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_writes_grow_length() {
        assert_eq!(eval("const a = [1]; a[5] = 9; a.length"), "6");
        assert_eq!(eval("const a = []; a[0] = 'x'; a.length"), "1");
    }

    #[test]
    fn truncating_length_drops_elements() {
        assert_eq!(eval("const a = [1, 2, 3, 4]; a.length = 2; a.join(',')"), "1,2");
    }

    #[test]
    fn invalid_length_writes_throw() {
        assert_eq!(
            eval_err("const a = [1, 2, 3]; a.length = 2.5;"),
            "RangeError: invalid array length"
        );
        assert_eq!(
            eval_err("const a = [1, 2, 3]; a.length = -1;"),
            "RangeError: invalid array length"
        );
        assert_eq!(eval("const a = [1, 2, 3]; a.length = '2'; a.join(',')"), "1,2");
    }

    #[test]
    fn holes_are_skipped_by_join() {
        assert_eq!(eval("const a = [1, , 3]; a.join('-')"), "1--3");
        assert_eq!(eval("[1, , 3].length"), "3");
    }

    #[test]
    fn spread_in_literals_and_calls() {
        assert_eq!(eval("const a = [1, ...[2, 3], 4]; a.join('')"), "1234");
        assert_eq!(eval("function add(a, b, c) { return a + b + c; } add(...[1, 2], 3)"), "6");
        assert_eq!(eval("[...'abc'].length"), "3");
    }

    #[test]
    fn spreading_a_non_iterable_throws() {
        let message = eval_err("[...{ a: 1 }]");
        assert!(message.starts_with("TypeError"), "got: {message}");
    }
}
