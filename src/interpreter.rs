/// The evaluator module executes expression trees and computes results.
///
/// The evaluator walks the tree over an `Environment`, applying operator
/// semantics: numeric coercion, short-circuiting, null coalescing, casts,
/// assignments into variables, arrays and objects, and function calls.
///
/// # Responsibilities
/// - Evaluates every expression node.
/// - Holds variable bindings and host functions in the `Environment`.
/// - Reports runtime errors such as division by zero or unbound names.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a lazy
/// stream of tokens, each corresponding to a number, string, name, operator
/// or punctuation mark, together with its source position.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Resolves numeric and string literals, including escapes.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the expression tree from tokens.
///
/// The parser consumes the token stream produced by the lexer and uses
/// precedence climbing, driven by a precedence table, to build an `Expr`.
///
/// # Responsibilities
/// - Resolves precedence, associativity and prefix versus infix use.
/// - Validates the grammar, reporting errors with positions.
/// - Builds calls, accesses, literals, assignments and `match` arms.
pub mod parser;
/// The operator precedence table.
///
/// Maps each operator symbol and arity to its precedence level and
/// associativity. The table is an immutable value passed to the parser.
pub mod precedence;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values expressions produce: integers, floats,
/// strings, booleans, `null`, arrays and objects, with their conversions and
/// comparison rules.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements truthiness, numeric and string coercion and casts.
/// - Provides the loose and strict comparisons.
pub mod value;
