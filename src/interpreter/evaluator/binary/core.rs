use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

impl Environment {
    /// Evaluates a binary operation node.
    ///
    /// `&&`, `and`, `||` and `or` evaluate their right operand only when the
    /// left does not decide the result, and `??` only when the left is
    /// absent or `null`. Every other operator evaluates both operands, left
    /// first, and applies [`apply_binary`](Self::apply_binary).
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 position: Position)
                                 -> EvalResult<Value> {
        use BinaryOperator::{And, Coalesce, KeywordAnd, KeywordOr, Or};

        match op {
            And | KeywordAnd | Or | KeywordOr => self.eval_short_circuit(left, op, right),
            Coalesce => self.eval_coalesce(left, right),
            _ => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::apply_binary(op, &left, &right, position)
            },
        }
    }

    /// Applies a binary operator to two evaluated operands.
    ///
    /// This routes the operation to specialized handlers by operator.
    /// Compound assignments use it with the target's current value on the
    /// left.
    ///
    /// # Errors
    /// Whatever the specialized handler raises: `TypeError` for unsupported
    /// operand types, `DivisionByZero` for zero divisors and `Arithmetic`
    /// for negative shifts.
    ///
    /// # Example
    /// ```
    /// use opal::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    ///     util::position::Position,
    /// };
    ///
    /// let at = Position::start();
    /// let sum = Environment::apply_binary(BinaryOperator::Add, &Value::Int(3), &Value::from("4"), at);
    /// assert_eq!(sum, Ok(Value::Int(7)));
    ///
    /// let cmp = Environment::apply_binary(BinaryOperator::Spaceship, &Value::Int(1), &Value::Int(2), at);
    /// assert_eq!(cmp, Ok(Value::Int(-1)));
    /// ```
    pub fn apply_binary(op: BinaryOperator,
                        left: &Value,
                        right: &Value,
                        position: Position)
                        -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, BitXor, Coalesce, Concat, Div, Equal, Greater, GreaterEqual,
            Identical, InstanceOf, KeywordAnd, KeywordOr, Less, LessEqual, Mod, Mul, NotEqual,
            NotIdentical, Or, Pow, ShiftLeft, ShiftRight, Spaceship, Sub, Xor,
        };

        match op {
            Add => Self::eval_add(left, right, position),
            Sub => Self::eval_numeric(op, left, right, position, i64::checked_sub, |a, b| a - b),
            Mul => Self::eval_numeric(op, left, right, position, i64::checked_mul, |a, b| a * b),
            Div => Self::eval_div(left, right, position),
            Mod => Self::eval_mod(left, right, position),
            Pow => Self::eval_pow(left, right, position),

            Concat => Self::eval_concat(left, right, position),

            BitAnd => Self::eval_bitwise(left, right, position, |a, b| a & b),
            BitOr => Self::eval_bitwise(left, right, position, |a, b| a | b),
            BitXor => Self::eval_bitwise(left, right, position, |a, b| a ^ b),
            ShiftLeft | ShiftRight => Self::eval_shift(op, left, right, position),

            Less | LessEqual | Greater | GreaterEqual | Equal | NotEqual | Identical
            | NotIdentical | Spaceship => Ok(Self::eval_comparison(op, left, right)),
            InstanceOf => Self::eval_instanceof(left, right, position),

            And | KeywordAnd => Ok(Value::Bool(left.to_bool() && right.to_bool())),
            Or | KeywordOr => Ok(Value::Bool(left.to_bool() || right.to_bool())),
            Xor => Ok(Value::Bool(left.to_bool() != right.to_bool())),
            Coalesce => Ok(if left.is_null() { right.clone() } else { left.clone() }),
        }
    }
}
