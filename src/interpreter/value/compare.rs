use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{
    interpreter::value::core::Value,
    util::num::{Number, format_float, i64_to_f64, numeric_prefix},
};

/// Reads a string as a number when the whole string is numeric.
fn whole_number(text: &str) -> Option<Number> {
    numeric_prefix(text).and_then(|(number, whole)| whole.then_some(number))
}

fn compare_numbers(left: Number, right: Number) -> Ordering {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => a.cmp(&b),
        (Number::Int(a), Number::Float(b)) => OrderedFloat(i64_to_f64(a)).cmp(&OrderedFloat(b)),
        (Number::Float(a), Number::Int(b)) => OrderedFloat(a).cmp(&OrderedFloat(i64_to_f64(b))),
        (Number::Float(a), Number::Float(b)) => OrderedFloat(a).cmp(&OrderedFloat(b)),
    }
}

/// A number against a string: numerically when the string is numeric,
/// otherwise as text.
fn compare_number_string(number: Number, text: &str) -> Ordering {
    if let Some(other) = whole_number(text) {
        return compare_numbers(number, other);
    }
    let printed = match number {
        Number::Int(n) => n.to_string(),
        Number::Float(r) => format_float(r),
    };
    printed.as_str().cmp(text)
}

fn compare_strings(left: &str, right: &str) -> Ordering {
    match (whole_number(left), whole_number(right)) {
        (Some(a), Some(b)) => compare_numbers(a, b),
        _ => left.cmp(right),
    }
}

fn sorted_by_key(pairs: &[(String, Value)]) -> Vec<&(String, Value)> {
    let mut refs: Vec<&(String, Value)> = pairs.iter().collect();
    refs.sort_by(|a, b| a.0.cmp(&b.0));
    refs
}

fn compare_objects(left: &[(String, Value)], right: &[(String, Value)]) -> Ordering {
    if left.len() != right.len() {
        return left.len().cmp(&right.len());
    }

    let (left, right) = (sorted_by_key(left), sorted_by_key(right));
    let keys = left.iter().zip(&right).map(|(a, b)| a.0.cmp(&b.0));
    let values = left.iter().zip(&right).map(|(a, b)| loose_compare(&a.1, &b.1));

    keys.chain(values).find(|ordering| ordering.is_ne()).unwrap_or(Ordering::Equal)
}

/// Compares two values the way `<=>` does.
///
/// The comparator is total and antisymmetric: `loose_compare(a, b)` is always
/// the reverse of `loose_compare(b, a)`. The rules, checked in order:
/// - a boolean on either side compares both values as booleans;
/// - `null` against a string compares `""` with the string; `null` against
///   anything else compares both as booleans;
/// - numbers compare numerically, floats by total order (`NAN` sorts above
///   every other float and equals itself);
/// - a number against a string compares numerically if the string is
///   numeric, otherwise the number's text with the string;
/// - two strings compare numerically if both are numeric, otherwise
///   byte-wise;
/// - arrays compare by length, then element by element;
/// - objects compare by size, then sorted keys, then values in key order;
/// - an object is greater than any other value, and an array is greater than
///   anything but an object.
///
/// ## Example
/// ```
/// use std::cmp::Ordering;
///
/// use opal::interpreter::value::{compare::loose_compare, core::Value};
///
/// assert_eq!(loose_compare(&Value::Int(10), &Value::from("10")), Ordering::Equal);
/// assert_eq!(loose_compare(&Value::from("abc"), &Value::Int(0)), Ordering::Greater);
/// assert_eq!(loose_compare(&Value::Null, &Value::Bool(false)), Ordering::Equal);
/// ```
#[must_use]
pub fn loose_compare(left: &Value, right: &Value) -> Ordering {
    use Value::{Array, Bool, Float, Int, Null, Object, String};

    match (left, right) {
        (Bool(_), _) | (_, Bool(_)) => left.to_bool().cmp(&right.to_bool()),

        (Null, Null) => Ordering::Equal,
        (Null, String(s)) => "".cmp(s.as_str()),
        (String(s), Null) => s.as_str().cmp(""),
        (Null, _) | (_, Null) => left.to_bool().cmp(&right.to_bool()),

        (Int(a), Int(b)) => a.cmp(b),
        (Int(a), Float(b)) => compare_numbers(Number::Int(*a), Number::Float(*b)),
        (Float(a), Int(b)) => compare_numbers(Number::Float(*a), Number::Int(*b)),
        (Float(a), Float(b)) => compare_numbers(Number::Float(*a), Number::Float(*b)),

        (Int(a), String(s)) => compare_number_string(Number::Int(*a), s),
        (Float(a), String(s)) => compare_number_string(Number::Float(*a), s),
        (String(s), Int(b)) => compare_number_string(Number::Int(*b), s).reverse(),
        (String(s), Float(b)) => compare_number_string(Number::Float(*b), s).reverse(),

        (String(a), String(b)) => compare_strings(a, b),

        (Array(a), Array(b)) => {
            a.len().cmp(&b.len()).then_with(|| {
                                     a.iter()
                                      .zip(b.iter())
                                      .map(|(x, y)| loose_compare(x, y))
                                      .find(|ordering| ordering.is_ne())
                                      .unwrap_or(Ordering::Equal)
                                 })
        },

        (Object(a), Object(b)) => compare_objects(a, b),
        (Object(_), _) => Ordering::Greater,
        (_, Object(_)) => Ordering::Less,
        (Array(_), _) => Ordering::Greater,
        (_, Array(_)) => Ordering::Less,
    }
}

/// Loose equality, as used by `==`, `!=` and `<>`.
///
/// Equivalent to `loose_compare(left, right) == Ordering::Equal`, so
/// `10 == "10"` and `null == false` hold while `"abc" == 0` does not.
#[must_use]
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    loose_compare(left, right) == Ordering::Equal
}

/// Strict identity, as used by `===`, `!==` and `match`.
///
/// Both values must have the same type and the same value; objects must also
/// have their keys in the same order. `NAN` is not identical to itself.
///
/// ## Example
/// ```
/// use opal::interpreter::value::{compare::strict_equals, core::Value};
///
/// assert!(strict_equals(&Value::Int(10), &Value::Int(10)));
/// assert!(!strict_equals(&Value::Int(10), &Value::from("10")));
/// assert!(!strict_equals(&Value::Int(1), &Value::Float(1.0)));
/// ```
#[must_use]
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        #[allow(clippy::float_cmp)]
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| strict_equals(x, y))
        },
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
            && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| ka == kb && strict_equals(va, vb))
        },
        _ => false,
    }
}
