use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

use crate::{
    ast::{Expr, ListItem},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Environment, EvalResult},
            function::builtin,
        },
        value::core::Value,
    },
    util::position::Position,
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values and the position
/// of the call.
type BuiltinFn = fn(&[Value], Position) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any count listed in `slice`.
/// - `AtLeast(n)` means `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "intdiv"       => { arity: Arity::Exact(2), func: builtin::intdiv },
    "fmod"         => { arity: Arity::Exact(2), func: builtin::fmod },
    "abs"          => { arity: Arity::Exact(1), func: builtin::abs },
    "count"        => { arity: Arity::Exact(1), func: builtin::count },
    "strlen"       => { arity: Arity::Exact(1), func: builtin::strlen },
    "gettype"      => { arity: Arity::Exact(1), func: builtin::gettype },
    "is_null"      => { arity: Arity::Exact(1), func: |args, _| Ok(Value::Bool(args[0].is_null())) },
    "is_numeric"   => { arity: Arity::Exact(1), func: |args, _| Ok(Value::Bool(args[0].is_numeric())) },
    "min"          => { arity: Arity::AtLeast(1), func: |args, position| builtin::min_max(Ordering::Less, args, position) },
    "max"          => { arity: Arity::AtLeast(1), func: |args, position| builtin::min_max(Ordering::Greater, args, position) },
    "floor"        => { arity: Arity::Exact(1), func: |args, position| builtin::rounding(f64::floor, args, position) },
    "ceil"         => { arity: Arity::Exact(1), func: |args, position| builtin::rounding(f64::ceil, args, position) },
    "round"        => { arity: Arity::OneOf(&[1, 2]), func: builtin::round },
    "sqrt"         => { arity: Arity::Exact(1), func: |args, position| builtin::rounding(f64::sqrt, args, position) },
    "strtoupper"   => { arity: Arity::Exact(1), func: |args, position| builtin::change_case(str::to_ascii_uppercase, args, position) },
    "strtolower"   => { arity: Arity::Exact(1), func: |args, position| builtin::change_case(str::to_ascii_lowercase, args, position) },
    "str_repeat"   => { arity: Arity::Exact(2), func: builtin::str_repeat },
    "implode"      => { arity: Arity::Exact(2), func: builtin::implode },
    "array_keys"   => { arity: Arity::Exact(1), func: builtin::array_keys },
    "array_values" => { arity: Arity::Exact(1), func: builtin::array_values },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(counts) => counts.contains(&n),
            Self::AtLeast(m) => n >= m,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Whether `name` is a builtin function. Function names are
/// case-insensitive.
///
/// ## Example
/// ```
/// use opal::interpreter::evaluator::function::core::is_builtin;
///
/// assert!(is_builtin("strlen"));
/// assert!(is_builtin("StrLen"));
/// assert!(!is_builtin("launch"));
/// ```
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.iter().any(|builtin| builtin.eq_ignore_ascii_case(name))
}

impl Environment {
    /// Evaluates a function call.
    ///
    /// The callee must evaluate to a function name. Arguments are evaluated
    /// left to right, with spread arguments unpacked in place, before the
    /// function runs.
    ///
    /// # Errors
    /// `TypeError` when the callee is not a string or a spread argument is
    /// not an array, and anything [`call_function`](Self::call_function)
    /// raises.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[ListItem],
                            position: Position)
                            -> EvalResult<Value> {
        let name = match self.eval(callee)? {
            Value::String(name) => name,
            other => {
                return Err(RuntimeError::TypeError { details: format!("Function name must be a \
                                                                       string, {} given",
                                                                      other.type_name()),
                                                     position });
            },
        };

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument {
                ListItem::Item(expr) => args.push(self.eval(expr)?),
                ListItem::Spread(expr) => match self.eval(expr)? {
                    Value::Array(items) => args.extend(items.iter().cloned()),
                    Value::Object(pairs) => args.extend(pairs.iter().map(|(_, value)| value.clone())),
                    other => {
                        return Err(RuntimeError::TypeError { details:  format!("Only arrays can \
                                                                                be unpacked, {} \
                                                                                given",
                                                                               other.type_name()),
                                                             position: expr.position(), });
                    },
                },
            }
        }

        self.call_function(&name, &args, position)
    }

    /// Calls a function by name with evaluated arguments.
    ///
    /// The evaluator first checks whether the name matches a builtin.
    /// If so, it verifies arity and executes the builtin.
    /// Otherwise it looks for a registered host function.
    ///
    /// # Errors
    /// - `UnknownFunction` when the name is neither builtin nor registered.
    /// - `ArgumentCountMismatch` when a builtin gets the wrong number of
    ///   arguments.
    /// - Whatever the function itself returns.
    ///
    /// # Example
    /// ```
    /// use opal::{
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    ///     util::position::Position,
    /// };
    ///
    /// let env = Environment::new();
    /// let at = Position::start();
    ///
    /// let length = env.call_function("strlen", &[Value::from("hello")], at);
    /// assert_eq!(length, Ok(Value::Int(5)));
    /// assert!(env.call_function("strlen", &[], at).is_err());
    /// assert!(env.call_function("nope", &[], at).is_err());
    /// ```
    pub fn call_function(&self, name: &str, args: &[Value], position: Position) -> EvalResult<Value> {
        tracing::trace!(function = name, arguments = args.len(), "calling function");

        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name.eq_ignore_ascii_case(name)) {
            if !builtin.arity.check(args.len()) {
                return Err(RuntimeError::ArgumentCountMismatch { name: builtin.name.to_string(),
                                                                 expected: builtin.arity
                                                                                  .to_string(),
                                                                 found: args.len(),
                                                                 position });
            }
            return (builtin.func)(args, position);
        }

        let function = self.host_function(name)
                           .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                          position })?;
        function(args, position)
    }
}
