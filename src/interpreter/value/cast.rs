use std::rc::Rc;

use crate::{
    ast::CastType,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::{
        num::{Number, f64_to_i64_truncating, i64_to_f64, numeric_prefix},
        position::Position,
    },
};

impl Value {
    /// Converts the value to an integer the way `(int)` does.
    ///
    /// Floats truncate toward zero, strings use their numeric prefix (or `0`),
    /// arrays give `0` when empty and `1` otherwise, objects give `1`.
    #[must_use]
    pub fn to_int(&self) -> i64 {
        match self {
            Self::Int(n) => *n,
            Self::Float(r) => f64_to_i64_truncating(*r),
            Self::String(s) => match numeric_prefix(s) {
                Some((Number::Int(n), _)) => n,
                Some((Number::Float(r), _)) => f64_to_i64_truncating(r),
                None => 0,
            },
            Self::Bool(b) => i64::from(*b),
            Self::Null => 0,
            Self::Array(a) => i64::from(!a.is_empty()),
            Self::Object(_) => 1,
        }
    }

    /// Converts the value to a float the way `(float)` does.
    #[must_use]
    pub fn to_float(&self) -> f64 {
        match self {
            Self::Float(r) => *r,
            Self::String(s) => match numeric_prefix(s) {
                Some((Number::Int(n), _)) => i64_to_f64(n),
                Some((Number::Float(r), _)) => r,
                None => 0.0,
            },
            other => i64_to_f64(other.to_int()),
        }
    }

    /// Applies a cast operator.
    ///
    /// `(array)` wraps a scalar in a one-element array and turns `null` into
    /// an empty array; objects are already keyed arrays and stay as they are.
    /// `(object)` keys array elements by their index and wraps a scalar as
    /// the `scalar` property.
    ///
    /// # Errors
    /// `TypeError` when casting an array or object to string.
    pub fn cast(&self, cast: CastType, position: Position) -> EvalResult<Self> {
        Ok(match cast {
            CastType::Int => Self::Int(self.to_int()),
            CastType::Float => Self::Float(self.to_float()),
            CastType::String => Self::String(self.to_text(position)?),
            CastType::Bool => Self::Bool(self.to_bool()),
            CastType::Array => match self {
                Self::Array(_) | Self::Object(_) => self.clone(),
                Self::Null => Self::Array(Rc::new(Vec::new())),
                scalar => Self::Array(Rc::new(vec![scalar.clone()])),
            },
            CastType::Object => match self {
                Self::Object(_) => self.clone(),
                Self::Array(items) => {
                    Self::Object(Rc::new(items.iter()
                                              .enumerate()
                                              .map(|(index, value)| (index.to_string(), value.clone()))
                                              .collect()))
                },
                Self::Null => Self::Object(Rc::new(Vec::new())),
                scalar => Self::Object(Rc::new(vec![("scalar".to_string(), scalar.clone())])),
            },
        })
    }

    /// The value after `++`.
    ///
    /// `null` becomes `1`, numbers grow by one (integers promote to float on
    /// overflow), numeric strings become numbers, the empty string becomes
    /// `"1"`, other strings increment alphanumerically (`"a"` to `"b"`,
    /// `"Az"` to `"Ba"`, `"zz"` to `"aaa"`) and booleans are unchanged.
    ///
    /// # Errors
    /// `TypeError` for arrays and objects.
    pub fn incremented(&self, position: Position) -> EvalResult<Self> {
        match self {
            Self::Null => Ok(Self::Int(1)),
            Self::Int(n) => Ok(n.checked_add(1).map_or_else(|| Self::Float(i64_to_f64(*n) + 1.0),
                                                            Self::Int)),
            Self::Float(r) => Ok(Self::Float(r + 1.0)),
            Self::Bool(_) => Ok(self.clone()),
            Self::String(s) if s.is_empty() => Ok(Self::from("1")),
            Self::String(s) => match numeric_prefix(s) {
                Some((number, true)) => Self::from(number).incremented(position),
                _ => Ok(Self::String(increment_alphanumeric(s))),
            },
            Self::Array(_) | Self::Object(_) => {
                Err(RuntimeError::TypeError { details: format!("Cannot increment {}",
                                                               self.type_name()),
                                              position })
            },
        }
    }

    /// The value after `--`.
    ///
    /// `null` stays `null`, numbers shrink by one, numeric strings become
    /// numbers, the empty string becomes `-1`, and other strings and booleans
    /// are unchanged.
    ///
    /// # Errors
    /// `TypeError` for arrays and objects.
    pub fn decremented(&self, position: Position) -> EvalResult<Self> {
        match self {
            Self::Null | Self::Bool(_) => Ok(self.clone()),
            Self::Int(n) => Ok(n.checked_sub(1).map_or_else(|| Self::Float(i64_to_f64(*n) - 1.0),
                                                            Self::Int)),
            Self::Float(r) => Ok(Self::Float(r - 1.0)),
            Self::String(s) if s.is_empty() => Ok(Self::Int(-1)),
            Self::String(s) => match numeric_prefix(s) {
                Some((number, true)) => Self::from(number).decremented(position),
                _ => Ok(self.clone()),
            },
            Self::Array(_) | Self::Object(_) => {
                Err(RuntimeError::TypeError { details: format!("Cannot decrement {}",
                                                               self.type_name()),
                                              position })
            },
        }
    }
}

/// Increments the trailing alphanumeric run of a string, carrying like an
/// odometer: `z` wraps to `a`, `Z` to `A` and `9` to `0`.
///
/// The carry stops at the first character that is not a letter or digit. A
/// carry out of the first character prepends `a`, `A` or `1`.
fn increment_alphanumeric(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    for index in (0..chars.len()).rev() {
        let (next, carry) = match chars[index] {
            'z' => ('a', true),
            'Z' => ('A', true),
            '9' => ('0', true),
            c if c.is_ascii_alphanumeric() => (char::from(c as u8 + 1), false),
            _ => break,
        };
        chars[index] = next;

        if !carry {
            return chars.into_iter().collect();
        }
        if index == 0 {
            let prefix = match next {
                'a' => 'a',
                'A' => 'A',
                _ => '1',
            };
            chars.insert(0, prefix);
        }
    }

    chars.into_iter().collect()
}
