//! CLI subcommand implementations.

use hibou_eval::{EngineError, Interpreter};
use hibou_ir::{SharedInterner, StringInterner};
use std::sync::Arc;

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read '{path}': {error}");
            std::process::exit(1);
        }
    }
}

pub fn run_file(path: &str) {
    let source = read_source(path);
    let mut interp = Interpreter::new();
    if let Err(error) = interp.evaluate(&source) {
        report(&error, &source);
        std::process::exit(1);
    }
}

pub fn eval_source(source: &str) {
    let mut interp = Interpreter::new();
    match interp.evaluate(source) {
        Ok(value) => println!("{}", interp.display(&value)),
        Err(error) => {
            report(&error, source);
            std::process::exit(1);
        }
    }
}

pub fn parse_file(path: &str) {
    let source = read_source(path);
    let interner: SharedInterner = Arc::new(StringInterner::new());
    match hibou_parse::parse_source(&source, &interner) {
        Ok(program) => {
            println!(
                "ok: {} statements, {} expressions",
                program.body.len(),
                program.arena.expr_count()
            );
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprint!("{}", diagnostic.render(&source));
            }
            std::process::exit(1);
        }
    }
}

pub fn lex_file(path: &str) {
    let source = read_source(path);
    let interner: SharedInterner = Arc::new(StringInterner::new());
    let (tokens, errors) = hibou_lexer::tokenize(&source, &interner);
    for token in tokens.iter() {
        println!("{:>4}..{:<4} {:?}", token.span.start, token.span.end, token.kind);
    }
    if !errors.is_empty() {
        for error in &errors {
            eprint!("{}", error.to_diagnostic().render(&source));
        }
        std::process::exit(1);
    }
}

fn report(error: &EngineError, source: &str) {
    match error {
        EngineError::Syntax(diagnostics) => {
            for diagnostic in diagnostics {
                eprint!("{}", diagnostic.render(source));
            }
        }
        EngineError::Uncaught(message) => eprintln!("Uncaught {message}"),
    }
}
