use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::{
        num::{Number, format_float, numeric_prefix},
        position::Position,
    },
};

/// Represents a runtime value in the interpreter.
///
/// Arrays and objects share their storage through `Rc`; writing through an
/// assignment clones the storage only when it is shared, so values behave as
/// if they were copied on every assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A string of text.
    String(String),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// The absence of a value.
    Null,
    /// An ordered list of values.
    Array(Rc<Vec<Self>>),
    /// An insertion-ordered mapping from property names to values.
    Object(Rc<Vec<(String, Self)>>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(v))
    }
}

impl From<Vec<(String, Self)>> for Value {
    fn from(v: Vec<(String, Self)>) -> Self {
        Self::Object(Rc::new(v))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Int(i) => (*i).into(),
            LiteralValue::Float(n) => (*n).into(),
            LiteralValue::String(s) => s.as_str().into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Null => Self::Null,
        }
    }
}

impl Value {
    /// The name `instanceof` and error messages use for the value's type.
    ///
    /// ## Example
    /// ```
    /// use opal::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Int(1).type_name(), "int");
    /// assert_eq!(Value::Null.type_name(), "null");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Whether the value is `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts the value to a boolean.
    ///
    /// `0`, `0.0`, `""`, `"0"`, `null` and the empty array are false;
    /// everything else, including every object and `NAN`, is true.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Float(r) => *r != 0.0,
            Self::String(s) => !(s.is_empty() || s == "0"),
            Self::Bool(b) => *b,
            Self::Null => false,
            Self::Array(a) => !a.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// Coerces the value to a number for arithmetic.
    ///
    /// Booleans become `0` or `1`, `null` becomes `0` and strings are read
    /// through their numeric prefix, so `"12abc"` is `12`.
    ///
    /// # Errors
    /// `TypeError` for strings with no numeric prefix, arrays and objects.
    pub fn to_number(&self, position: Position) -> EvalResult<Number> {
        match self {
            Self::Int(n) => Ok(Number::Int(*n)),
            Self::Float(r) => Ok(Number::Float(*r)),
            Self::Bool(b) => Ok(Number::Int(i64::from(*b))),
            Self::Null => Ok(Number::Int(0)),
            Self::String(s) => {
                numeric_prefix(s).map(|(number, _)| number)
                                 .ok_or_else(|| RuntimeError::TypeError {
                                     details: format!("Non-numeric string '{s}' used as a number"),
                                     position,
                                 })
            },
            Self::Array(_) | Self::Object(_) => {
                Err(RuntimeError::TypeError { details: format!("Unsupported operand type {}",
                                                               self.type_name()),
                                              position })
            },
        }
    }

    /// Converts the value to a string for concatenation and string functions.
    ///
    /// `true` is `"1"`, `false` and `null` are `""`, and floats use the
    /// shortest form that reads back as the same number.
    ///
    /// # Errors
    /// `TypeError` for arrays and objects.
    pub fn to_text(&self, position: Position) -> EvalResult<String> {
        match self {
            Self::Int(n) => Ok(n.to_string()),
            Self::Float(r) => Ok(format_float(*r)),
            Self::String(s) => Ok(s.clone()),
            Self::Bool(true) => Ok("1".to_string()),
            Self::Bool(false) | Self::Null => Ok(String::new()),
            Self::Array(_) | Self::Object(_) => {
                Err(RuntimeError::TypeError { details: format!("{} to string conversion",
                                                               self.type_name()),
                                              position })
            },
        }
    }

    /// Whether the value is an integer, a float or a numeric string.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Int(_) | Self::Float(_) => true,
            Self::String(s) => numeric_prefix(s).is_some_and(|(_, whole)| whole),
            _ => false,
        }
    }

    /// Looks up a property of an object by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(pairs) => pairs.iter().find(|(key, _)| key == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(n) => Self::Int(n),
            Number::Float(r) => Self::Float(r),
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Prints the value as an expression that evaluates back to it.
///
/// Strings are quoted, floats always show a fraction or exponent, and keyed
/// arrays print with `=>`.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(r) if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e15 => {
                write!(f, "{r:.1}")
            },
            Self::Float(r) => write!(f, "{}", format_float(*r)),
            Self::String(s) => write_quoted(f, s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
            Self::Array(a) => {
                write!(f, "[")?;

                for (index, value) in a.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
            Self::Object(pairs) if pairs.is_empty() => write!(f, "(object) []"),
            Self::Object(pairs) => {
                write!(f, "[")?;

                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write_quoted(f, key)?;
                    write!(f, " => {value}")?;
                }

                write!(f, "]")
            },
        }
    }
}
