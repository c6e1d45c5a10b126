/// Builtin function implementations.
///
/// Numeric, string and array functions available to every expression.
pub mod builtin;

/// Call resolution: the builtin table, arity checks and host functions.
pub mod core;
