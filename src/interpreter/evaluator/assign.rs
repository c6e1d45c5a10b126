use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, CastType, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            access::{append_read_error, read_index, read_property},
            core::{Environment, EvalResult},
            utils::{Key, name_to_key, to_key},
        },
        value::core::Value,
    },
    util::position::Position,
};

/// One step from a variable into its contents.
enum Segment {
    Index(Value, Position),
    Append(Position),
    Property(String, Position),
}

/// A resolved assignment target: a variable and the path into it, with all
/// index expressions already evaluated.
pub(crate) struct Place<'e> {
    root:     &'e str,
    position: Position,
    segments: Vec<Segment>,
}

impl Environment {
    /// Evaluates `target = value` and the compound forms such as `+=`.
    ///
    /// The target's index expressions are evaluated first, then the value.
    /// `??=` only evaluates the value when the target is absent or `null`.
    /// The result is the value stored.
    pub(crate) fn eval_assign(&mut self,
                              target: &Expr,
                              op: Option<BinaryOperator>,
                              value: &Expr,
                              position: Position)
                              -> EvalResult<Value> {
        let place = self.resolve_place(target)?;

        let stored = match op {
            None => self.eval(value)?,
            Some(BinaryOperator::Coalesce) => match self.read_place(&place, true)? {
                Some(current) if !current.is_null() => return Ok(current),
                _ => self.eval(value)?,
            },
            Some(op) => {
                let current = self.read_place(&place, false)?.unwrap_or(Value::Null);
                let operand = self.eval(value)?;
                Self::apply_binary(op, &current, &operand, position)?
            },
        };

        self.write_place(&place, stored.clone())?;
        Ok(stored)
    }

    /// Resolves an assignable expression to a place.
    ///
    /// # Errors
    /// `TypeError` when the expression cannot be assigned to, and any error
    /// raised by its index expressions.
    pub(crate) fn resolve_place<'e>(&mut self, target: &'e Expr) -> EvalResult<Place<'e>> {
        match target {
            Expr::Variable { name, position } => Ok(Place { root:     name,
                                                            position: *position,
                                                            segments: Vec::new(), }),
            Expr::Index { target,
                          index,
                          position, } => {
                let mut place = self.resolve_place(target)?;
                let segment = match index {
                    Some(index) => Segment::Index(self.eval(index)?, *position),
                    None => Segment::Append(*position),
                };
                place.segments.push(segment);
                Ok(place)
            },
            Expr::Property { target,
                             name,
                             nullsafe: false,
                             position, } => {
                let mut place = self.resolve_place(target)?;
                place.segments.push(Segment::Property(name.clone(), *position));
                Ok(place)
            },
            other => Err(RuntimeError::TypeError { details:  format!("Cannot assign to {}",
                                                                     other.describe()),
                                                   position: other.position(), }),
        }
    }

    /// Reads the current value of a place.
    ///
    /// In quiet mode an unbound variable or missing element is `None`.
    pub(crate) fn read_place(&self, place: &Place<'_>, quiet: bool) -> EvalResult<Option<Value>> {
        let Some(mut current) = self.get(place.root).cloned() else {
            if quiet {
                return Ok(None);
            }
            return Err(RuntimeError::UnknownVariable { name:     place.root.to_string(),
                                                       position: place.position, });
        };

        for segment in &place.segments {
            let next = match segment {
                Segment::Index(key, position) => read_index(&current, key, quiet, *position)?,
                Segment::Property(name, position) => {
                    read_property(&current, name, quiet, *position)?
                },
                Segment::Append(position) => return Err(append_read_error(*position)),
            };

            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    /// Stores `value` at a place, creating the variable when unbound.
    ///
    /// A `null` on the path becomes an empty array when indexed or appended
    /// to. Shared arrays and objects are copied before they are written, so
    /// other variables holding the same value are unaffected. The write is
    /// made on a copy of the variable and only bound on success, so a failed
    /// assignment leaves the variable as it was.
    pub(crate) fn write_place(&mut self, place: &Place<'_>, value: Value) -> EvalResult<()> {
        let mut root = self.get(place.root).cloned().unwrap_or(Value::Null);
        store(&mut root, &place.segments, value)?;

        self.set(place.root, root);
        Ok(())
    }
}

fn store(slot: &mut Value, segments: &[Segment], value: Value) -> EvalResult<()> {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = value;
        return Ok(());
    };

    if slot.is_null() && !matches!(segment, Segment::Property(..)) {
        *slot = Value::Array(Rc::default());
    }

    let child = match segment {
        Segment::Index(key, position) => index_slot(slot, key, *position)?,
        Segment::Append(position) => append_slot(slot, *position)?,
        Segment::Property(name, position) => {
            if !matches!(slot, Value::Object(_)) {
                return Err(RuntimeError::TypeError { details:  format!("Attempt to assign \
                                                                        property '{name}' on {}",
                                                                       slot.type_name()),
                                                     position: *position, });
            }
            object_slot(slot, name.clone(), *position)?
        },
    };

    store(child, rest, value)
}

fn not_indexable(type_name: &str, position: Position) -> RuntimeError {
    RuntimeError::TypeError { details: format!("Cannot use {type_name} as an array"),
                              position }
}

/// The slot at `slot[key]`, created as `null` when missing.
///
/// Writing a named key into an array turns it into an object keyed by the
/// array positions.
fn index_slot<'v>(slot: &'v mut Value, key: &Value, position: Position) -> EvalResult<&'v mut Value> {
    let key = to_key(key, position)?;

    match key {
        Key::Offset(index) if matches!(slot, Value::Array(_)) => array_slot(slot, index, position),
        Key::Name(_) if matches!(slot, Value::Array(_)) => {
            let keyed = slot.cast(CastType::Object, position)?;
            *slot = keyed;
            object_slot(slot, key.into_name(), position)
        },
        key if matches!(slot, Value::Object(_)) => object_slot(slot, key.into_name(), position),
        _ => Err(not_indexable(slot.type_name(), position)),
    }
}

/// The element at `index`; an index one past the end appends.
fn array_slot(slot: &mut Value, index: i64, position: Position) -> EvalResult<&mut Value> {
    let type_name = slot.type_name();
    let Value::Array(items) = slot else {
        return Err(not_indexable(type_name, position));
    };
    let items = Rc::make_mut(items);
    let len = items.len();

    match usize::try_from(index) {
        Ok(i) if i < len => Ok(&mut items[i]),
        Ok(i) if i == len => {
            items.push(Value::Null);
            Ok(&mut items[i])
        },
        _ => Err(RuntimeError::IndexOutOfBounds { index, len, position }),
    }
}

/// The property `name`, inserted as `null` at the end when missing.
fn object_slot(slot: &mut Value, name: String, position: Position) -> EvalResult<&mut Value> {
    let type_name = slot.type_name();
    let Value::Object(pairs) = slot else {
        return Err(not_indexable(type_name, position));
    };
    let pairs = Rc::make_mut(pairs);

    let index = match pairs.iter().position(|(key, _)| *key == name) {
        Some(index) => index,
        None => {
            pairs.push((name, Value::Null));
            pairs.len() - 1
        },
    };

    Ok(&mut pairs[index].1)
}

/// A new slot at the end of an array, or under the next integer key of an
/// object.
fn append_slot(slot: &mut Value, position: Position) -> EvalResult<&mut Value> {
    match slot {
        Value::Array(items) => {
            let items = Rc::make_mut(items);
            items.push(Value::Null);
            let last = items.len() - 1;
            Ok(&mut items[last])
        },
        Value::Object(pairs) => {
            let next = pairs.iter()
                            .filter_map(|(key, _)| match name_to_key(key) {
                                Key::Offset(n) => Some(n.saturating_add(1)),
                                Key::Name(_) => None,
                            })
                            .max()
                            .unwrap_or(0);
            object_slot(slot, next.to_string(), position)
        },
        other => Err(not_indexable(other.type_name(), position)),
    }
}
