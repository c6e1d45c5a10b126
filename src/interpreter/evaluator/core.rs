use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{evaluator::function::core::is_builtin, value::core::Value},
    util::position::Position,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A function supplied by the embedding program.
///
/// It receives the evaluated arguments and the position of the call.
pub type HostFunction = Rc<dyn Fn(&[Value], Position) -> EvalResult<Value>>;

/// Stores the runtime evaluation state.
///
/// An environment holds the variable bindings that expressions read and
/// assign, and the host functions callers registered. It is owned by the
/// caller and reused across evaluations, so assignments made by one
/// expression are visible to the next.
///
/// ## Example
/// ```
/// use opal::interpreter::{evaluator::core::Environment, value::core::Value};
///
/// let mut env = Environment::new();
/// env.set("x", Value::Int(2));
/// env.register_function("twice", |args, _| Ok(Value::Int(args[0].to_int() * 2))).unwrap();
///
/// assert_eq!(env.get("x"), Some(&Value::Int(2)));
/// assert!(env.register_function("strlen", |_, _| Ok(Value::Null)).is_err());
/// ```
#[derive(Clone, Default)]
pub struct Environment {
    bindings:  BTreeMap<String, Value>,
    functions: HashMap<String, HostFunction>,
}

impl Environment {
    /// Creates an environment with no bindings and no host functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Removes the binding for `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Iterates over all bindings in name order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Registers a host function callable from expressions.
    ///
    /// Function names are case-insensitive. Registering a name twice replaces
    /// the earlier function.
    ///
    /// # Errors
    /// `BuiltinFunctionRedefinition` when `name` is a builtin function.
    pub fn register_function<F>(&mut self, name: &str, function: F) -> EvalResult<()>
        where F: Fn(&[Value], Position) -> EvalResult<Value> + 'static
    {
        if is_builtin(name) {
            return Err(RuntimeError::BuiltinFunctionRedefinition { name: name.to_string() });
        }

        self.functions.insert(name.to_ascii_lowercase(), Rc::new(function));
        Ok(())
    }

    /// Returns the host function registered under `name`.
    pub(crate) fn host_function(&self, name: &str) -> Option<HostFunction> {
        self.functions.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant; operands are evaluated left to
    /// right, except where an operator short-circuits.
    ///
    /// # Errors
    /// Any `RuntimeError` raised by an operator, a lookup or a function call.
    /// Errors are never suppressed, not even under `@`.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { .. } | Expr::Index { .. } | Expr::Property { .. } => {
                self.eval_access(expr)
            },
            Expr::UnaryOp { op, expr, position } => self.eval_unary_op(*op, expr, *position),
            Expr::BinaryOp { left,
                             op,
                             right,
                             position, } => self.eval_binary_op(left, *op, right, *position),
            Expr::TernaryOp { condition,
                              then_branch,
                              else_branch,
                              .. } => {
                self.eval_ternary(condition, then_branch.as_deref(), else_branch)
            },
            Expr::Call { callee,
                         arguments,
                         position, } => self.eval_call(callee, arguments, *position),
            Expr::Assign { target,
                           op,
                           value,
                           position, } => self.eval_assign(target, *op, value, *position),
            Expr::ArrayLiteral { items, .. } => self.eval_array_literal(items),
            Expr::ObjectLiteral { entries, .. } => self.eval_object_literal(entries),
            Expr::Match { subject,
                          arms,
                          position, } => self.eval_match(subject, arms, *position),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        functions.sort_unstable();

        f.debug_struct("Environment")
         .field("bindings", &self.bindings)
         .field("functions", &functions)
         .finish()
    }
}
