//! hibou engine CLI.

mod commands;

use commands::{eval_source, lex_file, parse_file, run_file};

fn main() {
    // RUST_LOG=hibou_eval=debug etc. enables engine tracing.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: hibou run <file.js>");
                std::process::exit(1);
            }
            run_file(&args[2]);
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: hibou eval <source>");
                std::process::exit(1);
            }
            eval_source(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: hibou parse <file.js>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: hibou lex <file.js>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "--help" | "-h" | "help" => print_usage(),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("hibou - an embeddable script engine");
    println!();
    println!("Usage:");
    println!("  hibou run <file.js>     Evaluate a script file");
    println!("  hibou eval <source>     Evaluate source text and print the result");
    println!("  hibou parse <file.js>   Parse and report diagnostics");
    println!("  hibou lex <file.js>     Dump the token stream");
}
