use thiserror::Error;

use crate::util::position::Position;

/// The reason a piece of source text could not be tokenized.
///
/// This is also the error type of the `logos` lexer, which is why it has a
/// default variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// No token starts with this character.
    #[default]
    #[error("Unrecognized character")]
    UnrecognizedCharacter,
    /// A string literal reached the end of input without its closing quote.
    #[error("Unterminated string literal")]
    UnterminatedString,
    /// An integer literal does not fit in a signed 64-bit integer.
    #[error("Integer literal out of range")]
    IntegerOverflow,
    /// A `\u{...}` escape does not name a valid code point.
    #[error("Invalid unicode escape")]
    InvalidEscape,
}

/// A lexing failure together with the offending text and its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error at {position}: {kind}: {lexeme}")]
pub struct LexError {
    /// What went wrong.
    pub kind:     LexErrorKind,
    /// The source text the lexer gave up on.
    pub lexeme:   String,
    /// Where the offending text starts.
    pub position: Position,
}
