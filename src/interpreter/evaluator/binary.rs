/// Dispatch over binary operators, with the short-circuiting forms.
pub mod core;

/// `+ - * / % **`, including array union.
pub mod arithmetic;

/// Relational, equality and spaceship comparisons, and `instanceof`.
pub mod comparison;

/// `&& || and or xor` and `??`.
pub mod logic;

/// `& | ^ << >>` and the integral operand rule they share with `~`.
pub mod bitwise;

/// String concatenation.
pub mod string;
