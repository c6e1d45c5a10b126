use crate::{
    ast::{BinaryOperator, Expr, LiteralValue},
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        parser::{
            core::{ParseResult, Parser},
            utils::{token_to_assignment_operator, token_to_binary_operator},
        },
        precedence::{Arity, Associativity, OperatorSpec, PrecedenceTable},
    },
};

/// Level at which the operand to the right of an operator is parsed.
const fn right_operand_level(spec: &OperatorSpec) -> u8 {
    match spec.associativity {
        Associativity::Right => spec.level,
        Associativity::Left | Associativity::None => spec.level - 1,
    }
}

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a Spanned> + Clone
{
    /// Parses an expression whose operators all bind at `max_level` or
    /// tighter.
    ///
    /// This is the precedence-climbing loop. After reading one operand it
    /// keeps folding infix operators into the left side as long as their
    /// level does not exceed `max_level`. The right operand of a
    /// left-associative operator is parsed at `level - 1`, so an operator of
    /// the same level ends it; a right-associative operator parses it at
    /// `level`, so the same operator nests to the right.
    ///
    /// Assignments are the exception: an assignment operator always binds to
    /// an assignable operand immediately to its left, even when `max_level`
    /// is tighter than the assignment level. `$a && $b = 5` therefore parses
    /// as `$a && ($b = 5)`.
    ///
    /// # Errors
    /// - `NonAssociative` when two non-associative operators of one level are
    ///   chained, as in `1 < 2 < 3`.
    /// - `InvalidAssignmentTarget` when an assignment follows something that
    ///   cannot be assigned to.
    /// - `UnknownOperator` for an operator symbol with no binary entry.
    pub(in crate::interpreter::parser) fn parse_binary(&mut self, max_level: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        // The last non-associative operator folded at this depth, with its level.
        let mut chained: Option<(&'a Spanned, u8)> = None;

        while let Some(next) = self.peek() {
            if let Some(op) = token_to_assignment_operator(&next.token) {
                if left.is_assignable() {
                    left = self.parse_assignment(left, op)?;
                    chained = None;
                    continue;
                }
                let spec = self.lookup(next, Arity::Binary)?;
                if spec.level <= max_level {
                    return Err(ParseError::InvalidAssignmentTarget { target:   left.describe()
                                                                                   .to_string(),
                                                                     position: next.position, });
                }
                break;
            }

            if next.token == Token::Question {
                let spec = self.lookup(next, Arity::Ternary)?;
                if spec.level > max_level {
                    break;
                }
                Self::check_chain(chained, next, spec)?;
                left = self.parse_ternary(left, spec)?;
                chained = (spec.associativity == Associativity::None).then_some((next, spec.level));
                continue;
            }

            let Some(op) = token_to_binary_operator(&next.token) else {
                if next.token.symbol().is_some() {
                    // An operator that cannot appear in infix position.
                    self.lookup(next, Arity::Binary)?;
                }
                break;
            };

            let spec = self.lookup(next, Arity::Binary)?;
            if spec.level > max_level {
                break;
            }

            Self::check_chain(chained, next, spec)?;

            self.advance();
            let right = if op == BinaryOperator::InstanceOf {
                self.parse_type_operand(right_operand_level(spec))?
            } else {
                self.parse_binary(right_operand_level(spec))?
            };

            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    position: next.position };
            chained = (spec.associativity == Associativity::None).then_some((next, spec.level));
        }

        Ok(left)
    }

    /// Rejects a non-associative operator that directly follows another of
    /// the same level, as in `1 < 2 > 3`.
    fn check_chain(chained: Option<(&Spanned, u8)>,
                   next: &Spanned,
                   spec: &OperatorSpec)
                   -> ParseResult<()> {
        match chained {
            Some((previous, level))
                if spec.associativity == Associativity::None && level == spec.level =>
            {
                Err(ParseError::NonAssociative { operator: next.lexeme.clone(),
                                                 previous: previous.lexeme.clone(),
                                                 position: next.position, })
            },
            _ => Ok(()),
        }
    }

    /// Looks `token` up in the precedence table with the given arity.
    ///
    /// # Errors
    /// `UnknownOperator` at the token's position.
    pub(in crate::interpreter::parser) fn lookup(&self,
                                                 token: &Spanned,
                                                 arity: Arity)
                                                 -> ParseResult<&'a OperatorSpec> {
        let table: &'a PrecedenceTable = self.table;
        let symbol = token.token.symbol().unwrap_or(token.lexeme.as_str());
        table.lookup(symbol, arity).map_err(|error| error.at(token.position))
    }

    /// Parses the value of an assignment whose target has been parsed.
    ///
    /// Assignment is right-associative: `$a = $b = 3` assigns 3 to both.
    fn parse_assignment(&mut self, target: Expr, op: Option<BinaryOperator>) -> ParseResult<Expr> {
        let Some(operator) = self.advance() else {
            return Err(self.unexpected(None, "an assignment operator"));
        };
        let spec = self.lookup(operator, Arity::Binary)?;
        let value = self.parse_binary(right_operand_level(spec))?;

        Ok(Expr::Assign { target: Box::new(target),
                          op,
                          value: Box::new(value),
                          position: operator.position })
    }

    /// Parses `? then : else` or the short form `?: else` after a condition.
    ///
    /// The middle operand is delimited by `?` and `:`, so it is parsed from
    /// the loosest level. The else branch follows the configured ternary
    /// associativity.
    fn parse_ternary(&mut self, condition: Expr, spec: &OperatorSpec) -> ParseResult<Expr> {
        let Some(question) = self.advance() else {
            return Err(self.unexpected(None, "'?'"));
        };

        let then_branch = if self.next_is(&Token::Colon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(&Token::Colon, "':' in a ternary expression")?;

        let else_branch = self.parse_binary(right_operand_level(spec))?;

        Ok(Expr::TernaryOp { condition: Box::new(condition),
                             then_branch,
                             else_branch: Box::new(else_branch),
                             position: question.position })
    }

    /// Parses the right operand of `instanceof`.
    ///
    /// A bare name such as `int` or `array`, or the keyword `null`, is read
    /// as the type name string; anything else is an ordinary operand that
    /// must evaluate to a type name.
    fn parse_type_operand(&mut self, level: u8) -> ParseResult<Expr> {
        let is_call = self.peek_second().is_some_and(|second| second.token == Token::LParen);

        match self.peek() {
            Some(Spanned { token: Token::Identifier(name), position, .. }) if !is_call => {
                self.advance();
                Ok(Expr::Literal { value:    LiteralValue::String(name.clone()),
                                   position: *position, })
            },
            Some(Spanned { token: Token::Null, position, .. }) => {
                self.advance();
                Ok(Expr::Literal { value:    LiteralValue::from("null"),
                                   position: *position, })
            },
            _ => self.parse_binary(level),
        }
    }
}
