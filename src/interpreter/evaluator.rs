/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations: arithmetic, string
/// concatenation, comparisons, bitwise operators, and the short-circuiting
/// logical and null-coalescing operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical and bitwise NOT, casts, `clone`, `@` and the
/// increment and decrement operators.
pub mod unary;

/// Core evaluation logic and the binding environment.
///
/// Contains the main evaluation entry point, the `Environment` that holds
/// variables and host functions, and the dispatch over expression nodes.
pub mod core;

/// Writes through assignable expressions.
///
/// Resolves variables, index and append chains and property chains to a
/// place, then stores into it with copy-on-write.
pub mod assign;

/// Reads through access chains.
///
/// Evaluates variables, index and property accesses, including the quiet
/// mode used by `??` and the nullsafe short-circuit.
pub mod access;

/// Utility functions for evaluation.
///
/// Provides helpers shared by the evaluation logic: literals, `match`,
/// ternaries and key conversions.
pub mod utils;

/// Function evaluation.
///
/// Handles builtin and host function calls and argument checking.
pub mod function;
