use std::{fs, process};

use clap::{Parser, ValueEnum};
use opal::{
    Environment, Error, PrecedenceTable, evaluate, interpreter::precedence::Associativity, parse,
};

/// How chained ternaries without parentheses group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TernaryGrouping {
    /// `a ? b : c ? d : e` is `(a ? b : c) ? d : e`.
    Left,
    /// `a ? b : c ? d : e` is `a ? b : (c ? d : e)`.
    Right,
}

/// opal evaluates a single expression with PHP-style operators and prints
/// the result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells opal to read the expression from a file instead of the argument.
    #[arg(short, long)]
    file: bool,

    /// Binds a variable before evaluation, as NAME=EXPR. EXPR is evaluated
    /// with the bindings given before it. May be repeated.
    #[arg(short, long = "bind", value_name = "NAME=EXPR")]
    bindings: Vec<String>,

    /// Associativity of the ternary operator.
    #[arg(long, value_enum, default_value_t = TernaryGrouping::Left)]
    ternary: TernaryGrouping,

    /// Prints the fully parenthesized expression tree instead of its value.
    #[arg(short, long)]
    tree: bool,

    contents: String,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                        .with_target(true)
                                                        .with_level(true))
                                      .with(EnvFilter::from_default_env())
                                      .init();
    }
}

fn run(args: &Args, source: &str) -> Result<String, Error> {
    let associativity = match args.ternary {
        TernaryGrouping::Left => Associativity::Left,
        TernaryGrouping::Right => Associativity::Right,
    };
    let table = PrecedenceTable::new().with_ternary_associativity(associativity);
    let mut env = Environment::new();

    for binding in &args.bindings {
        let Some((name, expr)) = binding.split_once('=') else {
            eprintln!("Invalid binding '{binding}': expected NAME=EXPR.");
            process::exit(2);
        };
        let value = evaluate(&parse(expr, &table)?, &mut env)?;
        env.set(name.trim().trim_start_matches('$'), value);
    }

    let expr = parse(source, &table)?;
    if args.tree {
        return Ok(expr.to_string());
    }

    Ok(evaluate(&expr, &mut env)?.to_string())
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            process::exit(1);
        })
    } else {
        args.contents.clone()
    };

    match run(&args, &source) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    }
}
