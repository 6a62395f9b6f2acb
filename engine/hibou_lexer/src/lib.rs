//! Lexer for the hibou engine.
//!
//! [`tokenize`] turns source text into a [`TokenList`]. The scanner is
//! hand-written and context-sensitive: regex-vs-division is decided from
//! the previous token, line terminators are recorded per-token for
//! automatic semicolon insertion, and template literals are lexed as single
//! tokens containing nested substitution streams.

mod cursor;
mod error;
mod scanner;

pub use error::LexError;
pub use scanner::tokenize;

#[cfg(test)]
mod tests {
    use super::*;
    use hibou_ir::{StringInterner, TemplateSegment, TokenKind, TokenList};
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> (TokenList, Vec<LexError>, StringInterner) {
        let interner = StringInterner::default();
        let (tokens, errors) = tokenize(source, &interner);
        (tokens, errors, interner)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors, _interner) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \t\n  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        let (tokens, errors, interner) = lex("let résultat = valeur_1;");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Let);
        match &tokens[1].kind {
            TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "résultat"),
            other => panic!("expected identifier, got {other:?}"),
        }
        assert_eq!(tokens[2].kind, TokenKind::Eq);
        match &tokens[3].kind {
            TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "valeur_1"),
            other => panic!("expected identifier, got {other:?}"),
        }
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    }

    #[test]
    fn number_literals() {
        assert_eq!(kinds("42")[0], TokenKind::Number(42.0));
        assert_eq!(kinds("3.25")[0], TokenKind::Number(3.25));
        assert_eq!(kinds(".5")[0], TokenKind::Number(0.5));
        assert_eq!(kinds("1e3")[0], TokenKind::Number(1000.0));
        assert_eq!(kinds("2.5e-2")[0], TokenKind::Number(0.025));
        assert_eq!(kinds("0xff")[0], TokenKind::Number(255.0));
        assert_eq!(kinds("0b1010")[0], TokenKind::Number(10.0));
        assert_eq!(kinds("0o777")[0], TokenKind::Number(511.0));
        assert_eq!(kinds("1_000_000")[0], TokenKind::Number(1_000_000.0));
        assert_eq!(kinds("0xFF_FF")[0], TokenKind::Number(65535.0));
    }

    #[test]
    fn trailing_dot_number() {
        assert_eq!(kinds("5."), vec![TokenKind::Number(5.0), TokenKind::Eof]);
        // `5..toString` lexes as `5.` `.` `toString`.
        let kinds = kinds("5..toString");
        assert_eq!(kinds[0], TokenKind::Number(5.0));
        assert_eq!(kinds[1], TokenKind::Dot);
        assert!(matches!(kinds[2], TokenKind::Ident(_)));
    }

    #[test]
    fn hex_literal_without_digits_is_an_error() {
        let (tokens, errors, _interner) = lex("0x");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn string_literals_and_escapes() {
        let (tokens, errors, interner) = lex(r#" "a\nb\té\x41\u{1F600}" "#);
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::String(name) => {
                assert_eq!(interner.lookup(*name), "a\nb\té\u{41}\u{1F600}")
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn string_line_continuation() {
        let (tokens, errors, interner) = lex("'ab\\\ncd'");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::String(name) => assert_eq!(interner.lookup(*name), "abcd"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (tokens, errors, _interner) = lex("'abc\nx");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unterminated"));
    }

    #[test]
    fn block_comment_ends_at_first_close() {
        // `/*/*/` is one complete comment; `x` follows it.
        let kinds = kinds("/*/*/ x");
        assert!(matches!(kinds[0], TokenKind::Ident(_)));
        assert_eq!(kinds[1], TokenKind::Eof);
    }

    #[test]
    fn unterminated_block_comment() {
        let (_tokens, errors, _interner) = lex("/* never closed");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn newline_before_flag_for_asi() {
        let (tokens, errors, _interner) = lex("a\nb c");
        assert!(errors.is_empty());
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(!tokens[2].newline_before);
    }

    #[test]
    fn newline_inside_block_comment_counts() {
        let (tokens, _errors, _interner) = lex("a /* x\ny */ b");
        assert!(tokens[1].newline_before);
    }

    #[test]
    fn regex_after_operators_division_after_values() {
        // `a / b / c` is two divisions.
        let kinds_div = kinds("a / b / c");
        assert_eq!(kinds_div[1], TokenKind::Slash);
        assert_eq!(kinds_div[3], TokenKind::Slash);

        // `x = /ab+c/gi` is a regex literal.
        let (tokens, errors, interner) = lex("x = /ab+c/gi");
        assert!(errors.is_empty());
        match &tokens[2].kind {
            TokenKind::Regex { source, flags } => {
                assert_eq!(interner.lookup(*source), "ab+c");
                assert_eq!(interner.lookup(*flags), "gi");
            }
            other => panic!("expected regex, got {other:?}"),
        }
    }

    #[test]
    fn regex_char_class_may_contain_slash() {
        let (tokens, errors, interner) = lex("= /[/]/");
        assert!(errors.is_empty());
        match &tokens[1].kind {
            TokenKind::Regex { source, .. } => assert_eq!(interner.lookup(*source), "[/]"),
            other => panic!("expected regex, got {other:?}"),
        }
    }

    #[test]
    fn regex_after_keyword_and_paren() {
        let kinds = kinds("return /a/; (/b/)");
        assert!(matches!(kinds[1], TokenKind::Regex { .. }));
        assert!(matches!(kinds[4], TokenKind::Regex { .. }));
    }

    #[test]
    fn question_dot_digit_is_conditional() {
        // `a?.5:.25` is `a ? .5 : .25`, not optional chaining.
        let kinds = kinds("a?.5:.25");
        assert!(matches!(kinds[0], TokenKind::Ident(_)));
        assert_eq!(kinds[1], TokenKind::Question);
        assert_eq!(kinds[2], TokenKind::Number(0.5));
        assert_eq!(kinds[3], TokenKind::Colon);
        assert_eq!(kinds[4], TokenKind::Number(0.25));
    }

    #[test]
    fn optional_chaining_token() {
        let kinds = kinds("a?.b");
        assert_eq!(kinds[1], TokenKind::QuestionDot);
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(kinds(">>>=")[0], TokenKind::UShrEq);
        assert_eq!(kinds(">>>")[0], TokenKind::UShr);
        assert_eq!(kinds("**=")[0], TokenKind::StarStarEq);
        assert_eq!(kinds("??=")[0], TokenKind::QuestionQuestionEq);
        assert_eq!(kinds("&&=")[0], TokenKind::AmpAmpEq);
        assert_eq!(kinds("||=")[0], TokenKind::PipePipeEq);
        assert_eq!(kinds("...")[0], TokenKind::DotDotDot);
        assert_eq!(kinds("=>")[0], TokenKind::Arrow);
        assert_eq!(
            kinds("===="),
            vec![TokenKind::EqEqEq, TokenKind::Eq, TokenKind::Eof]
        );
    }

    #[test]
    fn private_names() {
        let (tokens, errors, interner) = lex("this.#compte");
        assert!(errors.is_empty());
        match &tokens[2].kind {
            TokenKind::PrivateIdent(name) => assert_eq!(interner.lookup(*name), "compte"),
            other => panic!("expected private name, got {other:?}"),
        }
    }

    #[test]
    fn template_without_substitutions() {
        let (tokens, errors, interner) = lex("`bonjour`");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::Template(segments) => {
                assert_eq!(segments.len(), 1);
                match &segments[0] {
                    TemplateSegment::Text(name) => {
                        assert_eq!(interner.lookup(*name), "bonjour")
                    }
                    other => panic!("expected text, got {other:?}"),
                }
            }
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn template_substitution_is_a_nested_stream() {
        let (tokens, errors, interner) = lex("`a${1 + b}c`");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::Template(segments) => {
                assert_eq!(segments.len(), 3);
                assert!(matches!(&segments[0], TemplateSegment::Text(name)
                    if interner.lookup(*name) == "a"));
                match &segments[1] {
                    TemplateSegment::Substitution(sub) => {
                        assert_eq!(sub[0].kind, TokenKind::Number(1.0));
                        assert_eq!(sub[1].kind, TokenKind::Plus);
                        assert!(matches!(sub[2].kind, TokenKind::Ident(_)));
                        assert_eq!(sub[3].kind, TokenKind::Eof);
                    }
                    other => panic!("expected substitution, got {other:?}"),
                }
                assert!(matches!(&segments[2], TemplateSegment::Text(name)
                    if interner.lookup(*name) == "c"));
            }
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn template_substitution_with_object_literal() {
        // The `}` of the object literal must not end the substitution.
        let (tokens, errors, _interner) = lex("`${ {a: 1} }`");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::Template(segments) => match &segments[1] {
                TemplateSegment::Substitution(sub) => {
                    assert_eq!(sub[0].kind, TokenKind::LBrace);
                    assert_eq!(sub[4].kind, TokenKind::RBrace);
                    assert_eq!(sub[5].kind, TokenKind::Eof);
                }
                other => panic!("expected substitution, got {other:?}"),
            },
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn nested_template_literal() {
        let (tokens, errors, _interner) = lex("`x${`y${z}`}w`");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::Template(segments) => match &segments[1] {
                TemplateSegment::Substitution(sub) => {
                    assert!(matches!(sub[0].kind, TokenKind::Template(_)));
                }
                other => panic!("expected substitution, got {other:?}"),
            },
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_template_reports_error() {
        let (_tokens, errors, _interner) = lex("`abc${1");
        assert!(!errors.is_empty());
    }

    #[test]
    fn template_escapes() {
        let (tokens, errors, interner) = lex(r"`a\`b\${c`");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenKind::Template(segments) => match &segments[0] {
                TemplateSegment::Text(name) => assert_eq!(interner.lookup(*name), "a`b${c"),
                other => panic!("expected text, got {other:?}"),
            },
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn invalid_character_recovers() {
        let (tokens, errors, _interner) = lex("a § b");
        assert_eq!(errors.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert!(matches!(tokens[2].kind, TokenKind::Ident(_)));
    }

    #[test]
    fn spans_cover_token_text() {
        let (tokens, _errors, _interner) = lex("let x = 10;");
        assert_eq!(tokens[0].span.to_range(), 0..3);
        assert_eq!(tokens[1].span.to_range(), 4..5);
        assert_eq!(tokens[3].span.to_range(), 8..10);
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Lexing must terminate and end in Eof on arbitrary input.
            #[test]
            fn lexing_never_panics(source in "\\PC*") {
                let interner = StringInterner::default();
                let (tokens, _errors) = tokenize(&source, &interner);
                prop_assert!(tokens.len() >= 1);
                prop_assert_eq!(&tokens[tokens.len() - 1].kind, &TokenKind::Eof);
            }

            // Identifier-like inputs lex to a single identifier or keyword.
            #[test]
            fn identifiers_lex_whole(ident in "[a-zA-Zéàû_$][a-zA-Z0-9éàû_$]{0,12}") {
                let interner = StringInterner::default();
                let (tokens, errors) = tokenize(&ident, &interner);
                prop_assert!(errors.is_empty());
                prop_assert_eq!(tokens.len(), 2);
            }
        }
    }
}
