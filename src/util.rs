/// Numeric conversion helpers.
///
/// This module provides the conversions the evaluator needs between strings,
/// integers and floating-point numbers: recognizing numeric strings, turning
/// floats into integers the way casts and bitwise operators expect, and
/// printing floats in a form that reads back as the same number.
pub mod num;
/// Source positions.
///
/// Defines [`position::Position`], the byte offset, line and column attached
/// to every token, tree node and error.
pub mod position;
