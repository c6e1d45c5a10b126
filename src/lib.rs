//! # opal
//!
//! opal is an operator-precedence expression evaluator written in Rust.
//! It tokenizes, parses and evaluates single expressions with PHP-style
//! operator semantics: arithmetic, string, comparison, logical, bitwise,
//! array, type, nullsafe, spread, `match`, error-control and cast operators,
//! all resolved by a 23-level precedence table.
//!
//! ## Example
//! ```
//! use opal::{Environment, PrecedenceTable, Value, evaluate_source};
//!
//! let table = PrecedenceTable::new();
//! let mut env = Environment::new();
//!
//! assert_eq!(evaluate_source("2 + 3 * 4", &table, &mut env).unwrap(), Value::Int(14));
//! assert_eq!(evaluate_source("2 ** 3 ** 2", &table, &mut env).unwrap(), Value::Int(512));
//! assert_eq!(evaluate_source("$x = null ?? 5", &table, &mut env).unwrap(), Value::Int(5));
//! assert_eq!(env.get("x"), Some(&Value::Int(5)));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and the operator, literal and
/// element types that represent an expression as a tree. The tree is built
/// by the parser, walked by the evaluator and printed canonically through
/// `Display`.
///
/// # Responsibilities
/// - Defines expression node types for all language constructs.
/// - Attaches source positions to nodes for error reporting.
/// - Prints trees fully parenthesized so they parse back unchanged.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while turning source
/// text into a value, with their categories and source positions.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches positions and detailed messages for context.
/// - Classifies failures through `ErrorKind`.
pub mod error;
/// Orchestrates the lexer, precedence table, parser, evaluator and values.
pub mod interpreter;
/// General utilities: source positions and numeric conversions.
pub mod util;

pub use crate::{
    ast::Expr,
    error::{Error, ErrorKind},
    interpreter::{
        evaluator::core::Environment,
        lexer::{Lexer, Spanned},
        precedence::PrecedenceTable,
        value::core::Value,
    },
};
use crate::{error::ParseError, interpreter::parser::core::Parser};

/// Returns a lazy iterator over the tokens of `source`.
///
/// The iterator yields `Err` for the first malformed token and then stops.
/// Tokenizing again means calling this function again.
///
/// ## Example
/// ```
/// use opal::tokenize;
///
/// let lexemes: Vec<String> = tokenize("$a **= 2").map(|t| t.unwrap().lexeme).collect();
/// assert_eq!(lexemes, ["$a", "**=", "2"]);
/// assert!(tokenize("'open").any(|t| t.is_err()));
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Tokenizes and parses `source` with the given precedence table.
///
/// ## Example
/// ```
/// use opal::{PrecedenceTable, parse};
///
/// let tree = parse("1 + 2 * 3", &PrecedenceTable::new()).unwrap();
/// assert_eq!(tree.to_string(), "(1 + (2 * 3))");
/// ```
pub fn parse(source: &str, table: &PrecedenceTable) -> Result<Expr, Error> {
    let tokens = tokenize(source).collect::<Result<Vec<_>, _>>()?;
    let expr = parse_tokens(&tokens, table)?;

    tracing::debug!(tree = %expr, "parsed expression");
    Ok(expr)
}

/// Parses an already tokenized expression.
///
/// # Errors
/// Any syntax error, or `UnknownOperator` for an operator the table lacks.
pub fn parse_tokens(tokens: &[Spanned], table: &PrecedenceTable) -> Result<Expr, ParseError> {
    Parser::new(tokens, table).parse()
}

/// Evaluates a parsed expression against an environment.
///
/// Assignments update `env`, so a sequence of evaluations sharing an
/// environment behaves like a sequence of statements.
pub fn evaluate(expr: &Expr, env: &mut Environment) -> Result<Value, Error> {
    let value = env.eval(expr)?;

    tracing::trace!(%value, "evaluated expression");
    Ok(value)
}

/// Parses and evaluates `source` in one step.
pub fn evaluate_source(source: &str,
                       table: &PrecedenceTable,
                       env: &mut Environment)
                       -> Result<Value, Error> {
    let _span = tracing::debug_span!("evaluate_source", source).entered();

    let expr = parse(source, table)?;
    evaluate(&expr, env)
}
