use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        precedence::PrecedenceTable,
    },
    util::position::Position,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A precedence-climbing parser over a borrowed token stream.
///
/// The parser never mutates the precedence table; parsing the same tokens with
/// the same table always produces the same tree.
pub struct Parser<'a, I>
    where I: Iterator<Item = &'a Spanned> + Clone
{
    pub(in crate::interpreter::parser) tokens: Peekable<I>,
    pub(in crate::interpreter::parser) table:  &'a PrecedenceTable,
    pub(in crate::interpreter::parser) end:    Position,
}

impl<'a> Parser<'a, std::slice::Iter<'a, Spanned>> {
    /// Creates a parser over a slice of tokens.
    #[must_use]
    pub fn new(tokens: &'a [Spanned], table: &'a PrecedenceTable) -> Self {
        Self { tokens: tokens.iter().peekable(),
               table,
               end: tokens.last().map_or_else(Position::start, Spanned::end) }
    }
}

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a Spanned> + Clone
{
    /// Parses a complete expression and requires that no tokens remain.
    ///
    /// # Errors
    /// - `UnbalancedParenthesis` for a stray `)`.
    /// - `UnexpectedTrailingTokens` for anything else after the expression.
    /// - Any error of [`Parser::parse_expression`].
    pub fn parse(mut self) -> ParseResult<Expr> {
        let expr = self.parse_expression()?;

        match self.tokens.peek() {
            None => Ok(expr),
            Some(spanned) if spanned.token == Token::RParen => {
                Err(ParseError::UnbalancedParenthesis { position: spanned.position })
            },
            Some(spanned) => Err(ParseError::UnexpectedTrailingTokens { token:    spanned.lexeme.clone(),
                                                                         position: spanned.position, }),
        }
    }

    /// Parses a full expression.
    ///
    /// This is the entry point for every nested expression: grouping, array
    /// elements, call arguments and the middle of a ternary all start again
    /// from the loosest-binding level of the table.
    ///
    /// # Errors
    /// Any syntax error in the expression.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_binary(self.table.lowest_level())
    }
}
