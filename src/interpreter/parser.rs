/// Core parser state and the parsing entry points.
///
/// Holds the token stream, the precedence table and the end-of-input
/// position, and checks that a parse consumes every token.
pub mod core;

/// Binary, ternary and assignment parsing.
///
/// Implements the precedence-climbing loop driven by the operator table,
/// including associativity and the non-associative chain check.
pub mod binary;

/// Prefix operators, postfix chains and primary expressions.
///
/// Handles casts, negation, increments, member access, calls, grouping,
/// array literals and `match`.
pub mod unary;

/// Shared parsing helpers.
///
/// Token expectations, comma-separated lists and the mapping from tokens to
/// operators and constants.
pub mod utils;
