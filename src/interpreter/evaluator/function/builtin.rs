use std::cmp::Ordering;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{Key, name_to_key},
        },
        value::{compare::loose_compare, core::Value},
    },
    util::{
        num::{Number, f64_to_i64_exact},
        position::Position,
    },
};

fn argument_type_error(function: &str,
                       index: usize,
                       expected: &str,
                       given: &Value,
                       position: Position)
                       -> RuntimeError {
    RuntimeError::TypeError { details: format!("{function}(): Argument #{} must be of type \
                                                {expected}, {} given",
                                               index + 1,
                                               given.type_name()),
                              position }
}

/// Reads an argument that must be an integer; integral floats and numeric
/// strings are accepted.
fn integer_argument(function: &str,
                    args: &[Value],
                    index: usize,
                    position: Position)
                    -> EvalResult<i64> {
    let value = &args[index];
    let integer = match value.to_number(position) {
        Ok(Number::Int(n)) => Some(n),
        Ok(Number::Float(r)) => f64_to_i64_exact(r),
        Err(_) => None,
    };

    integer.ok_or_else(|| argument_type_error(function, index, "int", value, position))
}

/// Integer division, truncating toward zero.
///
/// # Errors
/// - `DivisionByZero` when the divisor is zero.
/// - `Arithmetic` for `intdiv(PHP_INT_MIN, -1)`, whose result does not fit.
///
/// # Example
/// ```
/// use opal::{
///     interpreter::{evaluator::function::builtin::intdiv, value::core::Value},
///     util::position::Position,
/// };
///
/// let q = intdiv(&[Value::Int(-7), Value::Int(2)], Position::start()).unwrap();
/// assert_eq!(q, Value::Int(-3));
/// ```
pub fn intdiv(args: &[Value], position: Position) -> EvalResult<Value> {
    let dividend = integer_argument("intdiv", args, 0, position)?;
    let divisor = integer_argument("intdiv", args, 1, position)?;

    if divisor == 0 {
        return Err(RuntimeError::DivisionByZero { position });
    }

    dividend.checked_div(divisor)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Arithmetic { details: "Division of PHP_INT_MIN by -1 \
                                                                is not an integer"
                                                                                  .to_string(),
                                                      position })
}

/// Floating-point remainder with the sign of the dividend.
///
/// A zero divisor gives `NAN` rather than an error.
pub fn fmod(args: &[Value], position: Position) -> EvalResult<Value> {
    let dividend = args[0].to_number(position)?.to_f64();
    let divisor = args[1].to_number(position)?.to_f64();

    Ok(Value::Float(dividend % divisor))
}

/// Absolute value. `abs(PHP_INT_MIN)` overflows to a float.
pub fn abs(args: &[Value], position: Position) -> EvalResult<Value> {
    Ok(match args[0].to_number(position)? {
        Number::Int(n) => n.checked_abs().map_or_else(|| Value::Float(Number::Int(n).to_f64().abs()),
                                                      Value::Int),
        Number::Float(r) => Value::Float(r.abs()),
    })
}

/// Number of elements of an array or object.
pub fn count(args: &[Value], position: Position) -> EvalResult<Value> {
    let len = match &args[0] {
        Value::Array(items) => items.len(),
        Value::Object(pairs) => pairs.len(),
        other => return Err(argument_type_error("count", 0, "array", other, position)),
    };

    Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
}

/// Length of the string form of a value, in bytes.
pub fn strlen(args: &[Value], position: Position) -> EvalResult<Value> {
    let text = args[0].to_text(position)?;
    Ok(Value::Int(i64::try_from(text.len()).unwrap_or(i64::MAX)))
}

/// The long type name of a value: `integer`, `double`, `string`,
/// `boolean`, `NULL`, `array` or `object`.
pub fn gettype(args: &[Value], _position: Position) -> EvalResult<Value> {
    let name = match &args[0] {
        Value::Int(_) => "integer",
        Value::Float(_) => "double",
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Null => "NULL",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };

    Ok(Value::from(name))
}

/// Shared implementation of `min` and `max`.
///
/// With a single array or object argument the candidates are its elements;
/// otherwise they are the arguments. Candidates are compared loosely and
/// the first extreme one wins.
///
/// # Errors
/// `TypeError` for a single argument that is not an array or object, or an
/// empty one.
pub fn min_max(wanted: Ordering, args: &[Value], position: Position) -> EvalResult<Value> {
    let function = if wanted == Ordering::Less { "min" } else { "max" };

    let candidates: Vec<&Value> = match args {
        [Value::Array(items)] => items.iter().collect(),
        [Value::Object(pairs)] => pairs.iter().map(|(_, value)| value).collect(),
        [other] => return Err(argument_type_error(function, 0, "array", other, position)),
        _ => args.iter().collect(),
    };

    let mut candidates = candidates.into_iter();
    let Some(mut best) = candidates.next() else {
        return Err(RuntimeError::TypeError { details: format!("{function}(): Argument #1 must \
                                                               contain at least one element"),
                                             position });
    };

    for candidate in candidates {
        if loose_compare(candidate, best) == wanted {
            best = candidate;
        }
    }

    Ok(best.clone())
}

/// Applies a float function such as `floor` to a numeric argument. The
/// result is always a float.
pub fn rounding(function: fn(f64) -> f64, args: &[Value], position: Position) -> EvalResult<Value> {
    let value = args[0].to_number(position)?.to_f64();
    Ok(Value::Float(function(value)))
}

/// Rounds half away from zero to an optional number of decimal digits,
/// which may be negative.
///
/// # Example
/// ```
/// use opal::{
///     interpreter::{evaluator::function::builtin::round, value::core::Value},
///     util::position::Position,
/// };
///
/// let at = Position::start();
/// assert_eq!(round(&[Value::Float(2.5)], at).unwrap(), Value::Float(3.0));
/// assert_eq!(round(&[Value::Float(3.14159), Value::Int(2)], at).unwrap(), Value::Float(3.14));
/// assert_eq!(round(&[Value::Int(1234), Value::Int(-2)], at).unwrap(), Value::Float(1200.0));
/// ```
pub fn round(args: &[Value], position: Position) -> EvalResult<Value> {
    let value = args[0].to_number(position)?.to_f64();
    let precision = match args.get(1) {
        Some(_) => integer_argument("round", args, 1, position)?,
        None => 0,
    };

    if precision == 0 {
        return Ok(Value::Float(value.round()));
    }

    let factor = 10_f64.powi(i32::try_from(precision.clamp(-308, 308).abs()).unwrap_or(0));
    let rounded = if precision > 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    };

    Ok(Value::Float(if rounded.is_finite() { rounded } else { value }))
}

/// Applies a case mapping to the string form of a value.
pub fn change_case(mapping: fn(&str) -> String,
                   args: &[Value],
                   position: Position)
                   -> EvalResult<Value> {
    Ok(Value::String(mapping(&args[0].to_text(position)?)))
}

/// Repeats a string a number of times.
///
/// # Errors
/// `Arithmetic` for a negative count.
pub fn str_repeat(args: &[Value], position: Position) -> EvalResult<Value> {
    let text = args[0].to_text(position)?;
    let times = integer_argument("str_repeat", args, 1, position)?;

    let Ok(times) = usize::try_from(times) else {
        return Err(RuntimeError::Arithmetic { details: "str_repeat(): Argument #2 must be \
                                                        greater than or equal to 0"
                                                                                   .to_string(),
                                              position });
    };

    Ok(Value::String(text.repeat(times)))
}

/// Joins the string forms of array elements with a separator.
///
/// The separator and the array may be given in either order.
pub fn implode(args: &[Value], position: Position) -> EvalResult<Value> {
    let (separator, pieces) = match (&args[0], &args[1]) {
        (pieces @ (Value::Array(_) | Value::Object(_)), separator)
        | (separator, pieces @ (Value::Array(_) | Value::Object(_))) => (separator, pieces),
        (_, other) => return Err(argument_type_error("implode", 1, "array", other, position)),
    };

    let separator = separator.to_text(position)?;
    let parts: EvalResult<Vec<String>> = match pieces {
        Value::Array(items) => items.iter().map(|item| item.to_text(position)).collect(),
        Value::Object(pairs) => pairs.iter().map(|(_, item)| item.to_text(position)).collect(),
        _ => Ok(Vec::new()),
    };

    Ok(Value::String(parts?.join(&separator)))
}

/// The keys of an array or object, as a list.
///
/// Array keys are the positions. Object keys that are canonical integers
/// come back as integers, the rest as strings.
pub fn array_keys(args: &[Value], position: Position) -> EvalResult<Value> {
    let keys: Vec<Value> = match &args[0] {
        Value::Array(items) => {
            (0..items.len()).map(|index| Value::Int(i64::try_from(index).unwrap_or(i64::MAX)))
                            .collect()
        },
        Value::Object(pairs) => pairs.iter()
                                     .map(|(key, _)| match name_to_key(key) {
                                         Key::Offset(n) => Value::Int(n),
                                         Key::Name(name) => Value::String(name),
                                     })
                                     .collect(),
        other => return Err(argument_type_error("array_keys", 0, "array", other, position)),
    };

    Ok(Value::from(keys))
}

/// The values of an array or object, as a list.
pub fn array_values(args: &[Value], position: Position) -> EvalResult<Value> {
    let values: Vec<Value> = match &args[0] {
        Value::Array(items) => items.as_ref().clone(),
        Value::Object(pairs) => pairs.iter().map(|(_, value)| value.clone()).collect(),
        other => return Err(argument_type_error("array_values", 0, "array", other, position)),
    };

    Ok(Value::from(values))
}
