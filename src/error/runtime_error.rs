use thiserror::Error;

use crate::{error::ErrorKind, util::position::Position};

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Operand types unsupported by the operation.
    #[error("Error at {position}: Type error: {details}.")]
    TypeError {
        /// What was wrong with the operands.
        details:  String,
        /// Location of the operation.
        position: Position,
    },
    /// Division or modulo by zero.
    #[error("Error at {position}: Division by zero.")]
    DivisionByZero {
        /// Location of the operation.
        position: Position,
    },
    /// Tried to read a variable that is not bound.
    #[error("Error at {position}: Undefined variable ${name}.")]
    UnknownVariable {
        /// The variable name, without `$`.
        name:     String,
        /// Location of the variable.
        position: Position,
    },
    /// Tried to call a function that is neither builtin nor registered.
    #[error("Error at {position}: Call to undefined function {name}().")]
    UnknownFunction {
        /// The function name.
        name:     String,
        /// Location of the call.
        position: Position,
    },
    /// Tried to register a host function under a builtin name.
    #[error("Error: Cannot redefine builtin function {name}().")]
    BuiltinFunctionRedefinition {
        /// The function name.
        name: String,
    },
    /// A function was called with the wrong number of arguments.
    #[error("Error at {position}: {name}() expects {expected} argument(s), {found} given.")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// Human readable description of the accepted counts.
        expected: String,
        /// Number of arguments passed.
        found:    usize,
        /// Location of the call.
        position: Position,
    },
    /// Read of an array index that does not exist.
    #[error("Error at {position}: Index {index} out of bounds for array of length {len}.")]
    IndexOutOfBounds {
        /// The requested index.
        index:    i64,
        /// Length of the array.
        len:      usize,
        /// Location of the access.
        position: Position,
    },
    /// Read of an object key that does not exist.
    #[error("Error at {position}: Undefined key '{key}'.")]
    UndefinedKey {
        /// The requested key.
        key:      String,
        /// Location of the access.
        position: Position,
    },
    /// A `match` without `default` found no arm for its subject.
    #[error("Error at {position}: Unhandled match case {value}.")]
    UnhandledMatch {
        /// The subject, printed as a value.
        value:    String,
        /// Location of the `match` keyword.
        position: Position,
    },
    /// An arithmetic failure other than division by zero.
    #[error("Error at {position}: Arithmetic error: {details}.")]
    Arithmetic {
        /// What went wrong.
        details:  String,
        /// Location of the operation.
        position: Position,
    },
}

impl RuntimeError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeError { .. } => ErrorKind::Type,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } => ErrorKind::UnboundName,
            Self::BuiltinFunctionRedefinition { .. } => ErrorKind::Redefinition,
            Self::ArgumentCountMismatch { .. } => ErrorKind::ArgumentCount,
            Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            Self::UndefinedKey { .. } => ErrorKind::UndefinedKey,
            Self::UnhandledMatch { .. } => ErrorKind::UnhandledMatch,
            Self::Arithmetic { .. } => ErrorKind::Arithmetic,
        }
    }

    /// Returns the location this error refers to.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::TypeError { position, .. }
            | Self::DivisionByZero { position }
            | Self::UnknownVariable { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::ArgumentCountMismatch { position, .. }
            | Self::IndexOutOfBounds { position, .. }
            | Self::UndefinedKey { position, .. }
            | Self::UnhandledMatch { position, .. }
            | Self::Arithmetic { position, .. } => Some(*position),
            Self::BuiltinFunctionRedefinition { .. } => None,
        }
    }
}
