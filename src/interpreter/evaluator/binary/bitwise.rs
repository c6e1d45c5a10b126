use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::core::Value,
    },
    util::{
        num::{Number, f64_to_i64_exact, format_float},
        position::Position,
    },
};

/// Reads an operand of a bitwise operator as an integer.
///
/// Integral floats and numeric strings are accepted.
///
/// # Errors
/// `TypeError` for fractional or non-finite numbers and for anything
/// [`Value::to_number`] rejects.
pub(crate) fn integral_operand(value: &Value, position: Position) -> EvalResult<i64> {
    match value.to_number(position)? {
        Number::Int(n) => Ok(n),
        Number::Float(r) => f64_to_i64_exact(r).ok_or_else(|| RuntimeError::TypeError {
                                                   details: format!("Bitwise operand {} is not \
                                                                     an integer",
                                                                    format_float(r)),
                                                   position,
                                               }),
    }
}

impl Environment {
    /// Evaluates `&`, `|` or `^` on two integral operands.
    pub(crate) fn eval_bitwise(left: &Value,
                               right: &Value,
                               position: Position,
                               op: fn(i64, i64) -> i64)
                               -> EvalResult<Value> {
        let a = integral_operand(left, position)?;
        let b = integral_operand(right, position)?;
        Ok(Value::Int(op(a, b)))
    }

    /// Evaluates `<<` or `>>`.
    ///
    /// Bits shifted out are lost. Shifting by 64 or more gives `0`, or `-1`
    /// for a right shift of a negative number.
    ///
    /// # Errors
    /// `Arithmetic` for a negative shift count.
    pub(crate) fn eval_shift(op: BinaryOperator,
                             left: &Value,
                             right: &Value,
                             position: Position)
                             -> EvalResult<Value> {
        let value = integral_operand(left, position)?;
        let count = integral_operand(right, position)?;

        let Ok(count) = u32::try_from(count) else {
            return Err(RuntimeError::Arithmetic { details: "Bit shift by negative number"
                                                               .to_string(),
                                                  position });
        };

        let shifted = if op == BinaryOperator::ShiftLeft {
            value.checked_shl(count).unwrap_or(0)
        } else {
            value.checked_shr(count).unwrap_or(if value < 0 { -1 } else { 0 })
        };

        Ok(Value::Int(shifted))
    }
}
