use std::rc::Rc;

use crate::{
    ast::{Expr, ListItem, MatchArm, ObjectEntry},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::{compare::strict_equals, core::Value},
    },
    util::{num::f64_to_i64_truncating, position::Position},
};

/// An array offset or object key derived from an index value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Key {
    /// An integer offset.
    Offset(i64),
    /// Any other key.
    Name(String),
}

impl Key {
    /// The key as an object property name.
    pub(crate) fn into_name(self) -> String {
        match self {
            Self::Offset(n) => n.to_string(),
            Self::Name(name) => name,
        }
    }
}

/// Converts an index value into a key.
///
/// Integers, booleans and truncated floats are offsets, as are strings that
/// are the canonical decimal form of an integer (`"7"` but not `"07"`).
/// `null` is the empty key.
///
/// # Errors
/// `TypeError` for arrays and objects.
pub(crate) fn to_key(value: &Value, position: Position) -> EvalResult<Key> {
    match value {
        Value::Int(n) => Ok(Key::Offset(*n)),
        Value::Float(r) => Ok(Key::Offset(f64_to_i64_truncating(*r))),
        Value::Bool(b) => Ok(Key::Offset(i64::from(*b))),
        Value::Null => Ok(Key::Name(String::new())),
        Value::String(s) => Ok(name_to_key(s)),
        Value::Array(_) | Value::Object(_) => {
            Err(RuntimeError::TypeError { details: format!("Illegal offset type {}",
                                                           value.type_name()),
                                          position })
        },
    }
}

/// Reads an object property name back as a key.
pub(crate) fn name_to_key(name: &str) -> Key {
    name.parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == name)
        .map_or_else(|| Key::Name(name.to_string()), Key::Offset)
}

/// Builds the result of an array or keyed array literal.
///
/// Stays a plain list until a named key appears, then switches to keyed
/// storage with the list positions as keys. Positional values after the
/// switch take the next free integer key.
enum Collection {
    List(Vec<Value>),
    Keyed { pairs: Vec<(String, Value)>, next: i64 },
}

impl Collection {
    const fn keyed() -> Self {
        Self::Keyed { pairs: Vec::new(),
                      next:  0, }
    }

    fn push(&mut self, value: Value) {
        match self {
            Self::List(items) => items.push(value),
            Self::Keyed { pairs, next } => {
                let key = next.to_string();
                *next = next.saturating_add(1);
                Self::put(pairs, key, value);
            },
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        if let Self::List(items) = self {
            let next = i64::try_from(items.len()).unwrap_or(i64::MAX);
            let pairs = items.drain(..)
                             .enumerate()
                             .map(|(index, value)| (index.to_string(), value))
                             .collect();
            *self = Self::Keyed { pairs, next };
        }

        if let Self::Keyed { pairs, next } = self {
            if let Key::Offset(offset) = key {
                *next = (*next).max(offset.saturating_add(1));
            }
            Self::put(pairs, key.into_name(), value);
        }
    }

    fn put(pairs: &mut Vec<(String, Value)>, key: String, value: Value) {
        match pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => pairs.push((key, value)),
        }
    }

    /// Unpacks `value` in place: array elements are appended, object
    /// entries with integer keys are appended and named entries are merged.
    fn spread(&mut self, value: Value, position: Position) -> EvalResult<()> {
        match value {
            Value::Array(items) => {
                for item in items.iter() {
                    self.push(item.clone());
                }
                Ok(())
            },
            Value::Object(pairs) => {
                for (name, item) in pairs.iter() {
                    match name_to_key(name) {
                        Key::Offset(_) => self.push(item.clone()),
                        key @ Key::Name(_) => self.insert(key, item.clone()),
                    }
                }
                Ok(())
            },
            other => Err(RuntimeError::TypeError { details: format!("Only arrays can be \
                                                                     unpacked, {} given",
                                                                    other.type_name()),
                                                   position }),
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::List(items) => Value::Array(Rc::new(items)),
            Self::Keyed { pairs, .. } => Value::Object(Rc::new(pairs)),
        }
    }
}

impl Environment {
    /// Evaluates `[a, b, ...rest]`.
    ///
    /// The result is an array unless a spread object contributes a named
    /// key, in which case it is an object.
    pub(crate) fn eval_array_literal(&mut self, items: &[ListItem]) -> EvalResult<Value> {
        let mut collection = Collection::List(Vec::with_capacity(items.len()));

        for item in items {
            match item {
                ListItem::Item(expr) => {
                    let value = self.eval(expr)?;
                    collection.push(value);
                },
                ListItem::Spread(expr) => {
                    let value = self.eval(expr)?;
                    collection.spread(value, expr.position())?;
                },
            }
        }

        Ok(collection.finish())
    }

    /// Evaluates `['key' => value, ...rest]`, which always yields an object.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub(crate) fn eval_object_literal(&mut self, entries: &[ObjectEntry]) -> EvalResult<Value> {
        let mut collection = Collection::keyed();

        for entry in entries {
            match entry {
                ObjectEntry::Pair { key, value } => {
                    let key = to_key(&self.eval(key)?, key.position())?;
                    let value = self.eval(value)?;
                    collection.insert(key, value);
                },
                ObjectEntry::Spread(expr) => {
                    let value = self.eval(expr)?;
                    collection.spread(value, expr.position())?;
                },
            }
        }

        Ok(collection.finish())
    }

    /// Evaluates `condition ? then : else` and `condition ?: else`.
    ///
    /// Only the selected branch is evaluated. The short form yields the
    /// condition's value when it is truthy.
    pub(crate) fn eval_ternary(&mut self,
                               condition: &Expr,
                               then_branch: Option<&Expr>,
                               else_branch: &Expr)
                               -> EvalResult<Value> {
        let value = self.eval(condition)?;

        if !value.to_bool() {
            return self.eval(else_branch);
        }

        match then_branch {
            Some(expr) => self.eval(expr),
            None => Ok(value),
        }
    }

    /// Evaluates a `match` expression.
    ///
    /// Arm conditions are evaluated in order and compared with the subject
    /// strictly; evaluation stops at the first identical one and only that
    /// arm's body runs. The `default` arm applies when nothing matched,
    /// wherever it appears.
    ///
    /// # Errors
    /// `UnhandledMatch` when no condition matches and there is no `default`.
    pub(crate) fn eval_match(&mut self,
                             subject: &Expr,
                             arms: &[MatchArm],
                             position: Position)
                             -> EvalResult<Value> {
        let subject = self.eval(subject)?;

        for arm in arms {
            let Some(conditions) = &arm.conditions else {
                continue;
            };

            for condition in conditions {
                if strict_equals(&subject, &self.eval(condition)?) {
                    return self.eval(&arm.body);
                }
            }
        }

        match arms.iter().find(|arm| arm.conditions.is_none()) {
            Some(default) => self.eval(&default.body),
            None => Err(RuntimeError::UnhandledMatch { value: subject.to_string(),
                                                       position }),
        }
    }
}
