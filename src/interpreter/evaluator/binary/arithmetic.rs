use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::core::Value,
    },
    util::{
        num::{Number, f64_to_i64_truncating},
        position::Position,
    },
};

/// Keyed view of an array or object, used by the union of mixed operands.
fn keyed(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Array(items) => {
            items.iter().enumerate().map(|(index, item)| (index.to_string(), item.clone())).collect()
        },
        Value::Object(pairs) => pairs.as_ref().clone(),
        _ => Vec::new(),
    }
}

const fn is_collection(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Both operands as numbers.
///
/// # Errors
/// `TypeError` naming the operator when either side is an array or object,
/// or a string with no numeric prefix.
fn numeric_operands(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    position: Position)
                    -> EvalResult<(Number, Number)> {
    if is_collection(left) || is_collection(right) {
        return Err(RuntimeError::TypeError { details: format!("Unsupported operand types: {} {op} \
                                                               {}",
                                                              left.type_name(),
                                                              right.type_name()),
                                             position });
    }

    Ok((left.to_number(position)?, right.to_number(position)?))
}

impl Environment {
    /// Evaluates `+`.
    ///
    /// Two arrays give their union: the left elements, followed by the right
    /// elements at positions past the end of the left. When an object is
    /// involved the union is by key, and keys already on the left win.
    pub(crate) fn eval_add(left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        match (left, right) {
            (Value::Array(a), Value::Array(b)) => {
                let mut items = a.as_ref().clone();
                items.extend(b.iter().skip(a.len()).cloned());
                Ok(Value::from(items))
            },
            _ if is_collection(left) && is_collection(right) => {
                let mut pairs = keyed(left);
                for (key, value) in keyed(right) {
                    if !pairs.iter().any(|(existing, _)| *existing == key) {
                        pairs.push((key, value));
                    }
                }
                Ok(Value::from(pairs))
            },
            _ => Self::eval_numeric(BinaryOperator::Add,
                                    left,
                                    right,
                                    position,
                                    i64::checked_add,
                                    |a, b| a + b),
        }
    }

    /// Evaluates `+`, `-` or `*` on numbers.
    ///
    /// Integer operands stay integers unless the checked integer operation
    /// overflows, in which case the result is computed in floating point.
    pub(crate) fn eval_numeric(op: BinaryOperator,
                               left: &Value,
                               right: &Value,
                               position: Position,
                               int_op: fn(i64, i64) -> Option<i64>,
                               float_op: fn(f64, f64) -> f64)
                               -> EvalResult<Value> {
        let (a, b) = numeric_operands(op, left, right, position)?;

        if let (Number::Int(x), Number::Int(y)) = (a, b) {
            if let Some(result) = int_op(x, y) {
                return Ok(Value::Int(result));
            }
        }

        Ok(Value::Float(float_op(a.to_f64(), b.to_f64())))
    }

    /// Evaluates `/`.
    ///
    /// The quotient of two integers is an integer when the division is
    /// exact, otherwise a float.
    ///
    /// # Errors
    /// `DivisionByZero` for a zero divisor, integer or float.
    pub(crate) fn eval_div(left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        let (a, b) = numeric_operands(BinaryOperator::Div, left, right, position)?;

        if b.to_f64() == 0.0 {
            return Err(RuntimeError::DivisionByZero { position });
        }

        if let (Number::Int(x), Number::Int(y)) = (a, b) {
            if x.checked_rem(y) == Some(0) {
                if let Some(quotient) = x.checked_div(y) {
                    return Ok(Value::Int(quotient));
                }
            }
        }

        Ok(Value::Float(a.to_f64() / b.to_f64()))
    }

    /// Evaluates `%`.
    ///
    /// Both operands are truncated to integers first; the result takes the
    /// sign of the dividend.
    ///
    /// # Errors
    /// `DivisionByZero` when the truncated divisor is zero.
    pub(crate) fn eval_mod(left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        let truncate = |number: Number| match number {
            Number::Int(n) => n,
            Number::Float(r) => f64_to_i64_truncating(r),
        };

        let (a, b) = numeric_operands(BinaryOperator::Mod, left, right, position)?;
        let (x, y) = (truncate(a), truncate(b));

        if y == 0 {
            return Err(RuntimeError::DivisionByZero { position });
        }

        Ok(Value::Int(x.wrapping_rem(y)))
    }

    /// Evaluates `**`.
    ///
    /// An integer raised to a non-negative integer exponent stays an integer
    /// unless it overflows; everything else is computed in floating point.
    pub(crate) fn eval_pow(left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
        let (a, b) = numeric_operands(BinaryOperator::Pow, left, right, position)?;

        if let (Number::Int(base), Number::Int(exponent)) = (a, b) {
            if let Some(result) = u32::try_from(exponent).ok().and_then(|e| base.checked_pow(e)) {
                return Ok(Value::Int(result));
            }
        }

        Ok(Value::Float(a.to_f64().powf(b.to_f64())))
    }
}
