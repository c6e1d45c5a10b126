use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Environment, EvalResult},
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates `&&`, `and`, `||` or `or`.
    ///
    /// The right operand is evaluated only when the left one does not
    /// already decide the result. The result is always a boolean.
    pub(crate) fn eval_short_circuit(&mut self,
                                     left: &Expr,
                                     op: BinaryOperator,
                                     right: &Expr)
                                     -> EvalResult<Value> {
        let conjunction = matches!(op, BinaryOperator::And | BinaryOperator::KeywordAnd);
        let left = self.eval(left)?.to_bool();

        if left != conjunction {
            tracing::trace!(operator = %op, result = left, "short-circuited");
            return Ok(Value::Bool(left));
        }

        Ok(Value::Bool(self.eval(right)?.to_bool()))
    }

    /// Evaluates `left ?? right`.
    ///
    /// The left side is read quietly, so an unbound variable or a missing
    /// element counts as absent instead of raising an error. The right side
    /// is evaluated only when the left is absent or `null`.
    pub(crate) fn eval_coalesce(&mut self, left: &Expr, right: &Expr) -> EvalResult<Value> {
        match self.eval_quiet(left)? {
            Some(value) if !value.is_null() => {
                tracing::trace!("null coalescing kept the left operand");
                Ok(value)
            },
            _ => self.eval(right),
        }
    }
}
