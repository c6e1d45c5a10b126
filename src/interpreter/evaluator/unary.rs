use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::bitwise::integral_operand,
            core::{Environment, EvalResult},
        },
        value::core::Value,
    },
    util::{
        num::{Number, i64_to_f64},
        position::Position,
    },
};

impl Environment {
    /// Evaluates a unary operation.
    ///
    /// Increments and decrements write back into their operand; every other
    /// operator evaluates the operand and applies
    /// [`apply_unary`](Self::apply_unary).
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                operand: &Expr,
                                position: Position)
                                -> EvalResult<Value> {
        if op.is_mutating() {
            return self.eval_increment(op, operand, position);
        }

        let value = self.eval(operand)?;
        Self::apply_unary(op, &value, position)
    }

    /// Applies a non-mutating unary operator to a value.
    ///
    /// `@` and `clone` yield the value unchanged: values have no identity,
    /// and `@` never hides errors.
    ///
    /// # Errors
    /// - `TypeError` when negating a non-numeric value or applying `~` to a
    ///   fractional one.
    /// - `TypeError` for an increment or decrement, which needs a variable.
    ///
    /// ## Example
    /// ```
    /// use opal::{
    ///     ast::{CastType, UnaryOperator},
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    ///     util::position::Position,
    /// };
    ///
    /// let at = Position::start();
    /// let neg = Environment::apply_unary(UnaryOperator::Negate, &Value::from("4"), at);
    /// assert_eq!(neg, Ok(Value::Int(-4)));
    ///
    /// let cast = UnaryOperator::Cast(CastType::Int);
    /// assert_eq!(Environment::apply_unary(cast, &Value::Float(3.9), at), Ok(Value::Int(3)));
    /// ```
    pub fn apply_unary(op: UnaryOperator, value: &Value, position: Position) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => Ok(match value.to_number(position)? {
                Number::Int(n) => {
                    n.checked_neg().map_or_else(|| Value::Float(-i64_to_f64(n)), Value::Int)
                },
                Number::Float(r) => Value::Float(-r),
            }),
            UnaryOperator::Plus => Ok(Value::from(value.to_number(position)?)),
            UnaryOperator::Not => Ok(Value::Bool(!value.to_bool())),
            UnaryOperator::BitNot => Ok(Value::Int(!integral_operand(value, position)?)),
            UnaryOperator::Cast(cast) => value.cast(cast, position),
            UnaryOperator::Silence | UnaryOperator::Clone => Ok(value.clone()),
            UnaryOperator::PreIncrement
            | UnaryOperator::PreDecrement
            | UnaryOperator::PostIncrement
            | UnaryOperator::PostDecrement => {
                Err(RuntimeError::TypeError { details: format!("{op} requires a variable"),
                                              position })
            },
        }
    }

    /// Evaluates `++$x`, `--$x`, `$x++` and `$x--`.
    ///
    /// The prefix forms yield the updated value, the postfix forms the value
    /// before the update.
    fn eval_increment(&mut self,
                      op: UnaryOperator,
                      target: &Expr,
                      position: Position)
                      -> EvalResult<Value> {
        let place = self.resolve_place(target)?;
        let current = self.read_place(&place, false)?.unwrap_or(Value::Null);

        let updated = match op {
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => {
                current.incremented(position)?
            },
            _ => current.decremented(position)?,
        };
        self.write_place(&place, updated.clone())?;

        Ok(if op.is_postfix() { current } else { updated })
    }
}
