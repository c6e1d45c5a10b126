use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Environment, EvalResult},
            utils::{Key, to_key},
        },
        value::core::Value,
    },
    util::position::Position,
};

/// Outcome of reading through an access chain.
enum Lookup {
    Found(Value),
    /// Unbound or missing in quiet mode, or cut short by `?->`.
    Absent,
}

/// Reads `container[key]`.
///
/// Arrays take integer offsets, objects take any key and strings yield the
/// character at an offset. In quiet mode a missing element, or a container
/// that cannot be indexed, is `None` instead of an error.
///
/// # Errors
/// - `IndexOutOfBounds` for an offset outside an array or string.
/// - `UndefinedKey` for a missing object key or a named key on an array.
/// - `TypeError` for containers that cannot be indexed and illegal keys.
pub(crate) fn read_index(container: &Value,
                         key: &Value,
                         quiet: bool,
                         position: Position)
                         -> EvalResult<Option<Value>> {
    let found = match container {
        Value::Array(items) => match to_key(key, position)? {
            Key::Offset(index) => {
                let item = usize::try_from(index).ok().and_then(|i| items.get(i));
                match item {
                    Some(item) => Ok(item.clone()),
                    None => Err(RuntimeError::IndexOutOfBounds { index,
                                                                 len: items.len(),
                                                                 position }),
                }
            },
            Key::Name(key) => Err(RuntimeError::UndefinedKey { key, position }),
        },
        Value::Object(_) => {
            let key = to_key(key, position)?.into_name();
            match container.property(&key) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedKey { key, position }),
            }
        },
        Value::String(text) => match to_key(key, position)? {
            Key::Offset(index) => {
                let character = usize::try_from(index).ok().and_then(|i| text.chars().nth(i));
                match character {
                    Some(c) => Ok(Value::String(c.to_string())),
                    None => Err(RuntimeError::IndexOutOfBounds { index,
                                                                 len: text.chars().count(),
                                                                 position }),
                }
            },
            Key::Name(key) => {
                Err(RuntimeError::TypeError { details: format!("Cannot access offset '{key}' \
                                                                on string"),
                                              position })
            },
        },
        _ if quiet => return Ok(None),
        _ => Err(RuntimeError::TypeError { details: format!("Cannot use {} as an array",
                                                            container.type_name()),
                                           position }),
    };

    match found {
        Ok(value) => Ok(Some(value)),
        Err(RuntimeError::IndexOutOfBounds { .. } | RuntimeError::UndefinedKey { .. }) if quiet => {
            Ok(None)
        },
        Err(error) => Err(error),
    }
}

/// Reads `object->name`.
///
/// # Errors
/// `UndefinedKey` for a missing property and `TypeError` when the target is
/// not an object, both reported as `None` in quiet mode.
pub(crate) fn read_property(object: &Value,
                            name: &str,
                            quiet: bool,
                            position: Position)
                            -> EvalResult<Option<Value>> {
    match object {
        Value::Object(_) => match object.property(name) {
            Some(value) => Ok(Some(value.clone())),
            None if quiet => Ok(None),
            None => Err(RuntimeError::UndefinedKey { key: name.to_string(),
                                                     position }),
        },
        _ if quiet => Ok(None),
        _ => Err(RuntimeError::TypeError { details: format!("Attempt to read property '{name}' \
                                                             on {}",
                                                            object.type_name()),
                                           position }),
    }
}

/// The error for `$a[]` outside an assignment.
pub(crate) fn append_read_error(position: Position) -> RuntimeError {
    RuntimeError::TypeError { details: "Cannot use [] for reading".to_string(),
                              position }
}

impl Environment {
    /// Evaluates a variable, index or property access.
    ///
    /// A chain cut short by `?->` evaluates to `null`.
    pub(crate) fn eval_access(&mut self, expr: &Expr) -> EvalResult<Value> {
        match self.lookup(expr, false)? {
            Lookup::Found(value) => Ok(value),
            Lookup::Absent => Ok(Value::Null),
        }
    }

    /// Evaluates an expression for `??`.
    ///
    /// Unbound variables, missing indices and keys, and nullsafe misses give
    /// `None` rather than an error. Index expressions and anything that is
    /// not an access are evaluated normally, so their errors still surface.
    pub(crate) fn eval_quiet(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        Ok(match self.lookup(expr, true)? {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        })
    }

    fn lookup(&mut self, expr: &Expr, quiet: bool) -> EvalResult<Lookup> {
        match expr {
            Expr::Variable { name, position } => match self.get(name) {
                Some(value) => Ok(Lookup::Found(value.clone())),
                None if quiet => Ok(Lookup::Absent),
                None => Err(RuntimeError::UnknownVariable { name:     name.clone(),
                                                            position: *position, }),
            },
            Expr::Index { target,
                          index,
                          position, } => {
                let Some(index) = index else {
                    return Err(append_read_error(*position));
                };
                let Lookup::Found(container) = self.lookup(target, quiet)? else {
                    return Ok(Lookup::Absent);
                };
                let key = self.eval(index)?;

                Ok(read_index(&container, &key, quiet, *position)?.map_or(Lookup::Absent,
                                                                         Lookup::Found))
            },
            Expr::Property { target,
                             name,
                             nullsafe,
                             position, } => {
                let Lookup::Found(object) = self.lookup(target, quiet)? else {
                    return Ok(Lookup::Absent);
                };

                if *nullsafe && object.is_null() {
                    tracing::trace!(property = %name, "nullsafe access short-circuited");
                    return Ok(Lookup::Absent);
                }

                Ok(read_property(&object, name, quiet, *position)?.map_or(Lookup::Absent,
                                                                         Lookup::Found))
            },
            _ => self.eval(expr).map(Lookup::Found),
        }
    }
}
