use crate::{
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

impl Environment {
    /// Evaluates `.` by concatenating the string forms of both operands.
    ///
    /// # Errors
    /// `TypeError` when either operand is an array or object.
    pub(crate) fn eval_concat(left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        let mut text = left.to_text(position)?;
        text.push_str(&right.to_text(position)?);
        Ok(Value::String(text))
    }
}
