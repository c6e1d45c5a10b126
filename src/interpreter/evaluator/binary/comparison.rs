use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, CastType},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::{
            compare::{loose_compare, loose_equals, strict_equals},
            core::Value,
        },
    },
    util::position::Position,
};

impl Environment {
    /// Evaluates a comparison operator.
    ///
    /// `<=>` yields `-1`, `0` or `1` from [`loose_compare`]; the relational
    /// operators derive from the same ordering. `===` and `!==` compare
    /// strictly.
    pub(crate) fn eval_comparison(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        let ordering = || loose_compare(left, right);

        let result = match op {
            BinaryOperator::Spaceship => {
                return Value::Int(match ordering() {
                                      Ordering::Less => -1,
                                      Ordering::Equal => 0,
                                      Ordering::Greater => 1,
                                  });
            },
            BinaryOperator::Less => ordering().is_lt(),
            BinaryOperator::LessEqual => ordering().is_le(),
            BinaryOperator::Greater => ordering().is_gt(),
            BinaryOperator::GreaterEqual => ordering().is_ge(),
            BinaryOperator::Equal => loose_equals(left, right),
            BinaryOperator::NotEqual => !loose_equals(left, right),
            BinaryOperator::Identical => strict_equals(left, right),
            _ => !strict_equals(left, right),
        };

        Value::Bool(result)
    }

    /// Evaluates `value instanceof type`.
    ///
    /// The type is named by a string such as `'int'` or `'array'`; the long
    /// aliases `integer`, `double` and `boolean` are accepted. An unknown
    /// type name is simply false.
    ///
    /// # Errors
    /// `TypeError` when the right operand is not a string.
    pub(crate) fn eval_instanceof(value: &Value,
                                  type_name: &Value,
                                  position: Position)
                                  -> EvalResult<Value> {
        let Value::String(name) = type_name else {
            return Err(RuntimeError::TypeError { details: format!("Type name must be a string, {} \
                                                                   given",
                                                                  type_name.type_name()),
                                                 position });
        };

        let actual = value.type_name();
        let matches = actual.eq_ignore_ascii_case(name)
                      || CastType::from_name(name).is_some_and(|cast| {
                                                      CastType::from_name(actual) == Some(cast)
                                                  });

        Ok(Value::Bool(matches))
    }
}
