use std::f64::consts::{E, PI};

use crate::{
    ast::{BinaryOperator, LiteralValue},
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        parser::core::{ParseResult, Parser},
    },
    util::position::Position,
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a Spanned> + Clone
{
    /// Returns the next token without consuming it.
    pub(in crate::interpreter::parser) fn peek(&mut self) -> Option<&'a Spanned> {
        self.tokens.peek().copied()
    }

    /// Returns the token after the next one without consuming anything.
    pub(in crate::interpreter::parser) fn peek_second(&self) -> Option<&'a Spanned> {
        let mut lookahead = self.tokens.clone();
        lookahead.next();
        lookahead.next()
    }

    /// Whether the next token is `token`.
    pub(in crate::interpreter::parser) fn next_is(&mut self, token: &Token) -> bool {
        self.peek().is_some_and(|spanned| spanned.token == *token)
    }

    /// Consumes the next token.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> Option<&'a Spanned> {
        self.tokens.next()
    }

    /// Consumes the next token, which must be `token`.
    ///
    /// # Errors
    /// `UnexpectedToken` or `UnexpectedEndOfInput` naming `expected`.
    pub(in crate::interpreter::parser) fn expect(&mut self,
                                                 token: &Token,
                                                 expected: &str)
                                                 -> ParseResult<&'a Spanned> {
        match self.peek() {
            Some(spanned) if spanned.token == *token => {
                self.tokens.next();
                Ok(spanned)
            },
            found => Err(self.unexpected(found, expected)),
        }
    }

    /// Builds the error for finding `found` where `expected` was required.
    pub(in crate::interpreter::parser) fn unexpected(&self,
                                                     found: Option<&Spanned>,
                                                     expected: &str)
                                                     -> ParseError {
        match found {
            Some(spanned) => ParseError::UnexpectedToken { token:    spanned.lexeme.clone(),
                                                           expected: expected.to_string(),
                                                           position: spanned.position, },
            None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                       position: self.end, },
        }
    }

    /// Parses a comma-separated list of items until a closing token.
    ///
    /// This utility is shared by array literals and argument lists. An
    /// immediately encountered closing token produces an empty list, and a
    /// trailing comma before the closing token is accepted.
    ///
    /// # Parameters
    /// - `parse_item`: Function used to parse each list element.
    /// - `closing`: The token that terminates the list.
    /// - `opening`: Position of the opening bracket, reported if a `(` is
    ///   never closed.
    ///
    /// # Errors
    /// Returns a `ParseError` if an item fails to parse, an unexpected token
    /// is encountered or the stream ends before the closing token.
    pub(in crate::interpreter::parser) fn parse_comma_separated<T>(
        &mut self,
        parse_item: impl Fn(&mut Self) -> ParseResult<T>,
        closing: &Token,
        opening: Position)
        -> ParseResult<Vec<T>> {
        let closing_text = if *closing == Token::RParen { "')'" } else { "']'" };
        let mut items = Vec::new();

        loop {
            match self.peek() {
                Some(spanned) if spanned.token == *closing => {
                    self.advance();
                    return Ok(items);
                },
                None if *closing == Token::RParen => {
                    return Err(ParseError::UnbalancedParenthesis { position: opening });
                },
                _ => {},
            }

            items.push(parse_item(self)?);

            match self.peek() {
                Some(Spanned { token: Token::Comma, .. }) => {
                    self.advance();
                },
                Some(spanned) if spanned.token == *closing => {},
                None if *closing == Token::RParen => {
                    return Err(ParseError::UnbalancedParenthesis { position: opening });
                },
                found => return Err(self.unexpected(found, &format!("',' or {closing_text}"))),
            }
        }
    }
}

/// Maps a token to the binary operator it denotes in infix position.
///
/// Member access, the ternary `?` and assignments are handled separately and
/// map to `None`.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    let op = match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Percent => BinaryOperator::Mod,
        Token::StarStar => BinaryOperator::Pow,
        Token::Dot => BinaryOperator::Concat,
        Token::ShiftLeft => BinaryOperator::ShiftLeft,
        Token::ShiftRight => BinaryOperator::ShiftRight,
        Token::Ampersand => BinaryOperator::BitAnd,
        Token::Pipe => BinaryOperator::BitOr,
        Token::Caret => BinaryOperator::BitXor,
        Token::Less => BinaryOperator::Less,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::Greater => BinaryOperator::Greater,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual | Token::LessGreater => BinaryOperator::NotEqual,
        Token::Identical => BinaryOperator::Identical,
        Token::NotIdentical => BinaryOperator::NotIdentical,
        Token::Spaceship => BinaryOperator::Spaceship,
        Token::AmpAmp => BinaryOperator::And,
        Token::PipePipe => BinaryOperator::Or,
        Token::And => BinaryOperator::KeywordAnd,
        Token::Or => BinaryOperator::KeywordOr,
        Token::Xor => BinaryOperator::Xor,
        Token::Coalesce => BinaryOperator::Coalesce,
        Token::Instanceof => BinaryOperator::InstanceOf,
        _ => return None,
    };
    Some(op)
}

/// Maps an assignment token to its combining operator.
///
/// Returns `None` for tokens that are not assignments, `Some(None)` for plain
/// `=` and `Some(Some(op))` for compound forms.
#[must_use]
pub const fn token_to_assignment_operator(token: &Token) -> Option<Option<BinaryOperator>> {
    let op = match token {
        Token::Equals => None,
        Token::PlusAssign => Some(BinaryOperator::Add),
        Token::MinusAssign => Some(BinaryOperator::Sub),
        Token::MulAssign => Some(BinaryOperator::Mul),
        Token::PowAssign => Some(BinaryOperator::Pow),
        Token::DivAssign => Some(BinaryOperator::Div),
        Token::ConcatAssign => Some(BinaryOperator::Concat),
        Token::ModAssign => Some(BinaryOperator::Mod),
        Token::BitAndAssign => Some(BinaryOperator::BitAnd),
        Token::BitOrAssign => Some(BinaryOperator::BitOr),
        Token::BitXorAssign => Some(BinaryOperator::BitXor),
        Token::ShiftLeftAssign => Some(BinaryOperator::ShiftLeft),
        Token::ShiftRightAssign => Some(BinaryOperator::ShiftRight),
        Token::CoalesceAssign => Some(BinaryOperator::Coalesce),
        _ => return None,
    };
    Some(op)
}

/// Resolves a predefined constant such as `PHP_INT_MAX` or `M_PI`.
///
/// Constant names are case-sensitive.
#[must_use]
pub fn constant_value(name: &str) -> Option<LiteralValue> {
    let value = match name {
        "PHP_INT_MAX" => LiteralValue::Int(i64::MAX),
        "PHP_INT_MIN" => LiteralValue::Int(i64::MIN),
        "PHP_INT_SIZE" => LiteralValue::Int(8),
        "PHP_FLOAT_EPSILON" => LiteralValue::Float(f64::EPSILON),
        "PHP_FLOAT_MAX" => LiteralValue::Float(f64::MAX),
        "PHP_FLOAT_MIN" => LiteralValue::Float(f64::MIN_POSITIVE),
        "PHP_EOL" => LiteralValue::String("\n".to_string()),
        "NAN" => LiteralValue::Float(f64::NAN),
        "INF" => LiteralValue::Float(f64::INFINITY),
        "M_PI" => LiteralValue::Float(PI),
        "M_E" => LiteralValue::Float(E),
        _ => return None,
    };
    Some(value)
}
