use thiserror::Error;

use crate::util::position::Position;

/// Lexing errors.
///
/// Raised while turning raw source text into tokens: unrecognized characters,
/// unterminated strings, integer literals that do not fit in 64 bits and
/// malformed escape sequences.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the expression tree
/// from tokens. Parse errors include syntax mistakes, unexpected tokens,
/// invalid assignment targets, chained non-associative operators and operators
/// missing from the precedence table.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include type mismatches, division by zero, unbound names and failed
/// lookups into arrays and objects.
pub mod runtime_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error produced while lexing, parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a valid expression.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation of a well-formed expression failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Coarse classification of an [`Error`].
///
/// Useful for tests and callers that care about the failure category rather
/// than the exact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed source text.
    Lex,
    /// Malformed expression.
    Syntax,
    /// An operator symbol with no entry for the required arity.
    UnknownOperator,
    /// Operand types unsupported by an operator.
    Type,
    /// Division or modulo by zero.
    DivisionByZero,
    /// Unresolved variable or function.
    UnboundName,
    /// Array index outside the array.
    IndexOutOfBounds,
    /// Missing object property.
    UndefinedKey,
    /// No `match` arm applied.
    UnhandledMatch,
    /// Arithmetic failure other than division by zero.
    Arithmetic,
    /// Wrong number of arguments in a call.
    ArgumentCount,
    /// Attempt to shadow a builtin function.
    Redefinition,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lex(_) => ErrorKind::Lex,
            Self::Parse(error) => error.kind(),
            Self::Runtime(error) => error.kind(),
        }
    }

    /// Returns the source position the error refers to, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Lex(error) => Some(error.position),
            Self::Parse(error) => error.position(),
            Self::Runtime(error) => error.position(),
        }
    }
}
