use thiserror::Error;

use crate::{
    error::ErrorKind,
    interpreter::precedence::Arity,
    util::position::Position,
};

/// Represents all errors that can occur while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found a token that cannot appear here.
    #[error("Error at {position}: Unexpected token '{token}', expected {expected}.")]
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// What the parser was looking for.
        expected: String,
        /// Location of the token.
        position: Position,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error at {position}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// Location just past the last token.
        position: Position,
    },
    /// A `(` was never closed.
    #[error("Error at {position}: Unbalanced parenthesis, '(' is never closed.")]
    UnbalancedParenthesis {
        /// Location of the opening parenthesis.
        position: Position,
    },
    /// An operator was not followed by an operand.
    #[error("Error at {position}: Expected an operand but found '{token}'.")]
    ExpectedOperand {
        /// The token found instead.
        token:    String,
        /// Location of the token.
        position: Position,
    },
    /// The left side of an assignment or increment is not assignable.
    #[error("Error at {position}: Cannot assign to {target}.")]
    InvalidAssignmentTarget {
        /// Description of the rejected target.
        target:   String,
        /// Location of the operator.
        position: Position,
    },
    /// Two non-associative operators of the same level were chained.
    #[error("Error at {position}: Operator '{operator}' is non-associative and cannot follow \
             '{previous}' without parentheses.")]
    NonAssociative {
        /// The second operator of the chain.
        operator: String,
        /// The operator it follows.
        previous: String,
        /// Location of the second operator.
        position: Position,
    },
    /// Found extra tokens after a complete expression.
    #[error("Error at {position}: Extra tokens after expression: '{token}'.")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:    String,
        /// Location of the token.
        position: Position,
    },
    /// A construct the language recognizes but does not evaluate.
    #[error("Error at {position}: {construct} is not supported.")]
    Unsupported {
        /// The rejected construct.
        construct: String,
        /// Location of the construct.
        position:  Position,
    },
    /// No precedence table entry exists for the operator and arity.
    #[error("Error{}: Unknown {arity} operator '{symbol}'.", located(.position))]
    UnknownOperator {
        /// The operator symbol.
        symbol:   String,
        /// The arity it was used with.
        arity:    Arity,
        /// Location of the operator, when known.
        position: Option<Position>,
    },
}

fn located(position: &Option<Position>) -> String {
    position.map_or_else(String::new, |position| format!(" at {position}"))
}

impl ParseError {
    /// Attaches a source position to an error that does not have one yet.
    #[must_use]
    pub fn at(self, position: Position) -> Self {
        match self {
            Self::UnknownOperator { symbol, arity, position: None } => {
                Self::UnknownOperator { symbol, arity, position: Some(position) }
            },
            other => other,
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperator { .. } => ErrorKind::UnknownOperator,
            _ => ErrorKind::Syntax,
        }
    }

    /// Returns the location this error refers to.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::UnbalancedParenthesis { position }
            | Self::ExpectedOperand { position, .. }
            | Self::InvalidAssignmentTarget { position, .. }
            | Self::NonAssociative { position, .. }
            | Self::UnexpectedTrailingTokens { position, .. }
            | Self::Unsupported { position, .. } => Some(*position),
            Self::UnknownOperator { position, .. } => *position,
        }
    }
}
