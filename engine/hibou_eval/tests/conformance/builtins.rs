//! Global objects and prototype methods.

use crate::common::{eval, eval_err, logged};
use pretty_assertions::assert_eq;

mod arrays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn array_constructor_with_one_number_sets_length() {
        assert_eq!(eval("Array(16).length"), "16");
        assert_eq!(eval("Array(16).join('wat') === 'wat'.repeat(15)"), "true");
        assert_eq!(eval("Array('16').length"), "1");
        assert_eq!(eval_err("Array(1.5)"), "RangeError: invalid array length");
    }

    #[test]
    fn join_defaults_to_comma_and_blanks_nullish() {
        assert_eq!(eval("[1, 2, 3].join()"), "1,2,3");
        assert_eq!(eval("[1, null, undefined, 2].join('-')"), "1---2");
        assert_eq!(eval("[].join('x')"), "");
    }

    #[test]
    fn push_returns_the_new_length() {
        assert_eq!(eval("const a = [1, 2]; a.push(3, 4)"), "4");
        assert_eq!(eval("const a = [1, 2]; a.push(3, 4); a.pop(); a.join('-')"), "1-2-3");
        assert_eq!(eval("[].pop()"), "undefined");
    }

    #[test]
    fn index_of_uses_strict_equality() {
        assert_eq!(eval("[1, 2, 3].indexOf(2)"), "1");
        assert_eq!(eval("['1'].indexOf(1)"), "-1");
        assert_eq!(eval("[NaN].indexOf(NaN)"), "-1");
        assert_eq!(eval("[1, 2, 1].indexOf(1, 1)"), "2");
    }

    #[test]
    fn includes_uses_same_value_zero() {
        assert_eq!(eval("[NaN].includes(NaN)"), "true");
        assert_eq!(eval("[0].includes(-0)"), "true");
        assert_eq!(eval("['a'].includes('b')"), "false");
    }

    #[test]
    fn slice_clamps_negative_indices() {
        assert_eq!(eval("[1, 2, 3, 4].slice(1, -1).join(',')"), "2,3");
        assert_eq!(eval("[1, 2, 3].slice(-2).join(',')"), "2,3");
        assert_eq!(eval("[1, 2, 3].slice(5).length"), "0");
    }

    #[test]
    fn to_string_matches_join() {
        assert_eq!(eval("'' + [1, 2, 3]"), "1,2,3");
    }
}

mod strings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn length_and_indexing_are_character_based() {
        assert_eq!(eval("'héllo'.length"), "5");
        assert_eq!(eval("'héllo'.charAt(1)"), "é");
        assert_eq!(eval("'abc'[1]"), "b");
        assert_eq!(eval("'abc'[9]"), "undefined");
    }

    #[test]
    fn index_of_and_includes() {
        assert_eq!(eval("'hello world'.indexOf('world')"), "6");
        assert_eq!(eval("'hello'.indexOf('z')"), "-1");
        assert_eq!(eval("'hello'.includes('ell')"), "true");
        assert_eq!(eval("'aaa'.indexOf('a', 1)"), "1");
    }

    #[test]
    fn slice_repeat_and_case() {
        assert_eq!(eval("'Hello World'.slice(-5)"), "World");
        assert_eq!(eval("'abcdef'.slice(1, 3)"), "bc");
        assert_eq!(eval("'ab'.repeat(3)"), "ababab");
        assert_eq!(eval("'école'.toUpperCase()"), "ÉCOLE");
        assert_eq!(eval("'LOUD'.toLowerCase()"), "loud");
        assert_eq!(eval("'  x  '.trim()"), "x");
    }

    #[test]
    fn repeat_rejects_bad_counts() {
        assert_eq!(eval_err("'a'.repeat(-1)"), "RangeError: invalid count value");
    }

    #[test]
    fn split_variants() {
        assert_eq!(eval("'a,b,,c'.split(',').length"), "4");
        assert_eq!(eval("'abc'.split('').join('|')"), "a|b|c");
        assert_eq!(eval("'abc'.split()[0]"), "abc");
    }

    #[test]
    fn string_function_coerces() {
        assert_eq!(eval("String(123)"), "123");
        assert_eq!(eval("String(null)"), "null");
        assert_eq!(eval("String([1, [2, 3]])"), "1,2,3");
    }
}

mod numbers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn to_string_shortest_round_trip() {
        assert_eq!(eval("0.1 + 0.2"), "0.30000000000000004");
        assert_eq!(eval("100"), "100");
        assert_eq!(eval("1e21"), "1e+21");
        assert_eq!(eval("(255).toString()"), "255");
    }

    #[test]
    fn number_function_coerces() {
        assert_eq!(eval("Number('42')"), "42");
        assert_eq!(eval("Number('')"), "0");
        assert_eq!(eval("Number('abc')"), "NaN");
        assert_eq!(eval("Number(true)"), "1");
    }

    #[test]
    fn static_predicates_do_not_coerce() {
        assert_eq!(eval("Number.isNaN('abc')"), "false");
        assert_eq!(eval("isNaN('abc')"), "true");
        assert_eq!(eval("Number.isInteger(4)"), "true");
        assert_eq!(eval("Number.isInteger(4.5)"), "false");
        assert_eq!(eval("Number.isFinite('5')"), "false");
        assert_eq!(eval("isFinite('5')"), "true");
    }

    #[test]
    fn to_fixed() {
        assert_eq!(eval("(3.14159).toFixed(2)"), "3.14");
        assert_eq!(eval("(5).toFixed(0)"), "5");
        let message = eval_err("(1).toFixed(101)");
        assert!(message.starts_with("RangeError"), "got: {message}");
    }

    #[test]
    fn constants() {
        assert_eq!(eval("Number.MAX_SAFE_INTEGER"), "9007199254740991");
        assert_eq!(eval("Number.EPSILON > 0"), "true");
    }
}

mod math {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_halves_toward_positive_infinity() {
        assert_eq!(eval("Math.round(2.5)"), "3");
        assert_eq!(eval("Math.round(-2.5)"), "-2");
        assert_eq!(eval("Math.round(2.4)"), "2");
        assert_eq!(eval("Math.round(-0.4)"), "-0");
        assert_eq!(eval("1 / Math.round(-0.4)"), "-Infinity");
    }

    #[test]
    fn max_and_min_propagate_nan() {
        assert_eq!(eval("Math.max(1, NaN, 3)"), "NaN");
        assert_eq!(eval("Math.max()"), "-Infinity");
        assert_eq!(eval("Math.min()"), "Infinity");
        assert_eq!(eval("Math.max(1, 2, 3)"), "3");
        assert_eq!(eval("Math.min(0, -0)"), "-0");
    }

    #[test]
    fn basics() {
        assert_eq!(eval("Math.abs(-4)"), "4");
        assert_eq!(eval("Math.floor(-1.5)"), "-2");
        assert_eq!(eval("Math.ceil(1.1)"), "2");
        assert_eq!(eval("Math.trunc(-1.9)"), "-1");
        assert_eq!(eval("Math.sqrt(81)"), "9");
        assert_eq!(eval("Math.pow(2, 8)"), "256");
        assert_eq!(eval("Math.floor(Math.PI)"), "3");
    }
}

mod global_functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_int() {
        assert_eq!(eval("parseInt('42px')"), "42");
        assert_eq!(eval("parseInt('ff', 16)"), "255");
        assert_eq!(eval("parseInt('0x1A')"), "26");
        assert_eq!(eval("parseInt('  -7  ')"), "-7");
        assert_eq!(eval("parseInt('')"), "NaN");
    }

    #[test]
    fn parse_float() {
        assert_eq!(eval("parseFloat('3.14abc')"), "3.14");
        assert_eq!(eval("parseFloat('.5')"), "0.5");
        assert_eq!(eval("parseFloat('1e2x')"), "100");
        assert_eq!(eval("parseFloat('Infinity')"), "Infinity");
        assert_eq!(eval("parseFloat('nope')"), "NaN");
    }
}

mod console {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn log_joins_arguments_with_spaces() {
        assert_eq!(
            logged("console.log('a', 1, [1, 2], { k: 'v' })"),
            vec!["a 1 [ 1, 2 ] { k: 'v' }"]
        );
    }

    #[test]
    fn log_renders_special_values() {
        assert_eq!(
            logged("console.log(undefined, null, NaN, -0)"),
            vec!["undefined null NaN -0"]
        );
        assert_eq!(logged("console.log([1, , 3])"), vec!["[ 1, <1 empty item>, 3 ]"]);
        assert_eq!(
            logged("function named() {} console.log(named, () => {})"),
            vec!["[Function: named] [Function (anonymous)]"]
        );
    }

    #[test]
    fn error_and_warn_share_the_sink() {
        assert_eq!(logged("console.error('e'); console.warn('w');"), vec!["e", "w"]);
    }
}

#[test]
fn object_to_string_and_value_of() {
    assert_eq!(eval("({}).toString()"), "[object Object]");
    assert_eq!(eval("const o = { a: 1 }; o.valueOf() === o"), "true");
}

#[test]
fn is_prototype_of() {
    let program = concat!(
        "function A() {}\n",
        "const a = new A();\n",
        "A.prototype.isPrototypeOf(a) + ',' + A.prototype.isPrototypeOf({})",
    );
    assert_eq!(eval(program), "true,false");
}
