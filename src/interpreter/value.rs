/// The `Value` enum and its conversions.
///
/// This module declares the runtime data types: integers, floats, strings,
/// booleans, `null`, arrays and objects. It provides truthiness, numeric and
/// string coercion and the printed form of every value.
pub mod core;

/// Loose and strict comparison.
///
/// Implements the total three-way comparator behind `<=>` and the relational
/// operators, loose equality for `==`, and strict identity for `===`.
pub mod compare;

/// Cast conversions used by `(int)`, `(float)`, `(string)`, `(bool)`,
/// `(array)` and `(object)`, and the increment and decrement rules.
pub mod cast;
