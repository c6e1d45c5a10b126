use crate::{
    ast::{Expr, ListItem, LiteralValue, MatchArm, ObjectEntry, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Spanned, Token},
        parser::{
            core::{ParseResult, Parser},
            utils::constant_value,
        },
        precedence::Arity,
    },
    util::position::Position,
};

/// One element of a bracketed literal before it is known whether the literal
/// is a list or keyed.
enum Element {
    Item(Expr),
    Pair(Expr, Expr),
    Spread(Expr),
}

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a Spanned> + Clone
{
    /// Parses a prefix-operator expression, or a postfix chain when no prefix
    /// operator is present.
    ///
    /// A prefix operator parses its operand at its own precedence level, so
    /// `-2 ** 2` is `-(2 ** 2)` and `!$a instanceof int` is
    /// `!($a instanceof int)`. Prefix `++` and `--` instead take a postfix
    /// chain, which must be assignable.
    ///
    /// # Errors
    /// - `Unsupported` for `new`.
    /// - `InvalidAssignmentTarget` for `++`/`--` on something unassignable.
    /// - `UnknownOperator` for an operator with no unary entry, such as `*`.
    pub(in crate::interpreter::parser) fn parse_unary(&mut self) -> ParseResult<Expr> {
        let Some(next) = self.peek() else {
            return Err(self.unexpected(None, "an operand"));
        };

        let op = match &next.token {
            Token::Bang => UnaryOperator::Not,
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            Token::Tilde => UnaryOperator::BitNot,
            Token::At => UnaryOperator::Silence,
            Token::Clone => UnaryOperator::Clone,
            Token::Cast(cast) => UnaryOperator::Cast(*cast),
            Token::PlusPlus => UnaryOperator::PreIncrement,
            Token::MinusMinus => UnaryOperator::PreDecrement,
            Token::New => {
                return Err(ParseError::Unsupported { construct: "Object instantiation with 'new'"
                                                                .to_string(),
                                                     position:  next.position, });
            },
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix(primary);
            },
        };

        let spec = self.lookup(next, Arity::Unary)?;
        self.advance();

        let expr = if op.is_mutating() {
            let primary = self.parse_primary()?;
            let target = self.parse_postfix(primary)?;
            if !target.is_assignable() {
                return Err(ParseError::InvalidAssignmentTarget { target:   target.describe()
                                                                                 .to_string(),
                                                                 position: next.position, });
            }
            target
        } else {
            self.parse_binary(spec.level)?
        };

        Ok(Expr::UnaryOp { op,
                           expr: Box::new(expr),
                           position: next.position })
    }

    /// Parses postfix operators applied to an expression.
    ///
    /// Handles, in any order and any number:
    /// 1. **Indexing** `expr[index]` and **append** `expr[]`.
    /// 2. **Property access** `expr->name` and **nullsafe access**
    ///    `expr?->name`.
    /// 3. **Calls** `expr(args)`, where arguments may be spread with `...`.
    ///
    /// A postfix `++` or `--` ends the chain.
    ///
    /// # Errors
    /// Returns a `ParseError` if a bracket is not closed, a property name is
    /// missing, or a postfix increment follows something unassignable.
    fn parse_postfix(&mut self, mut node: Expr) -> ParseResult<Expr> {
        while let Some(next) = self.peek() {
            match &next.token {
                Token::LBracket => {
                    self.advance();
                    let index = if self.next_is(&Token::RBracket) {
                        None
                    } else {
                        Some(Box::new(self.parse_expression()?))
                    };
                    self.expect(&Token::RBracket, "']' after an index")?;
                    node = Expr::Index { target: Box::new(node),
                                         index,
                                         position: next.position };
                },

                Token::Arrow | Token::NullsafeArrow => {
                    self.advance();
                    let name = self.parse_property_name()?;
                    node = Expr::Property { target: Box::new(node),
                                            name,
                                            nullsafe: next.token == Token::NullsafeArrow,
                                            position: next.position };
                },

                Token::LParen if is_callable(&node) => {
                    self.advance();
                    let arguments = self.parse_comma_separated(Self::parse_list_item,
                                                               &Token::RParen,
                                                               next.position)?;
                    node = Expr::Call { position: node.position(),
                                        callee: Box::new(node),
                                        arguments };
                },

                Token::PlusPlus | Token::MinusMinus => {
                    if !node.is_assignable() {
                        return Err(ParseError::InvalidAssignmentTarget { target:   node.describe()
                                                                                       .to_string(),
                                                                         position: next.position, });
                    }
                    self.advance();
                    let op = if next.token == Token::PlusPlus {
                        UnaryOperator::PostIncrement
                    } else {
                        UnaryOperator::PostDecrement
                    };
                    return Ok(Expr::UnaryOp { op,
                                              expr: Box::new(node),
                                              position: next.position });
                },

                _ => break,
            }
        }

        Ok(node)
    }

    /// Parses a primary expression: a literal, variable, function name or
    /// constant, parenthesized expression, array literal or `match`.
    ///
    /// # Errors
    /// - `UnexpectedEndOfInput` when the input ends where an operand belongs.
    /// - `UnknownOperator` when an operator with no unary form appears there.
    /// - `ExpectedOperand` for any other token.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(next) = self.peek() else {
            return Err(self.unexpected(None, "an operand"));
        };
        let position = next.position;

        let literal = |value: LiteralValue| Expr::Literal { value, position };

        match &next.token {
            Token::Int(value) => {
                self.advance();
                Ok(literal(LiteralValue::Int(*value)))
            },
            Token::Float(value) => {
                self.advance();
                Ok(literal(LiteralValue::Float(*value)))
            },
            Token::String(text) => {
                self.advance();
                Ok(literal(LiteralValue::String(text.clone())))
            },
            Token::Bool(value) => {
                self.advance();
                Ok(literal(LiteralValue::Bool(*value)))
            },
            Token::Null => {
                self.advance();
                Ok(literal(LiteralValue::Null))
            },
            Token::Variable(name) => {
                self.advance();
                Ok(Expr::Variable { name: name.clone(),
                                    position })
            },
            Token::Identifier(name) => {
                self.advance();
                self.parse_identifier(name, position)
            },
            Token::LParen => self.parse_grouping(),
            Token::LBracket => self.parse_array_literal(),
            Token::Match => self.parse_match(),
            token if token.symbol().is_some() => {
                // Every operator that may start an operand was handled by
                // `parse_unary`.
                self.lookup(next, Arity::Unary)?;
                Err(ParseError::ExpectedOperand { token: next.lexeme.clone(),
                                                  position })
            },
            _ => Err(ParseError::ExpectedOperand { token: next.lexeme.clone(),
                                                   position }),
        }
    }

    /// Resolves a bare name: a function name when a call follows, otherwise a
    /// predefined constant.
    fn parse_identifier(&mut self, name: &str, position: Position) -> ParseResult<Expr> {
        if self.next_is(&Token::LParen) {
            return Ok(Expr::Literal { value: LiteralValue::from(name),
                                      position });
        }

        let found = self.peek();
        constant_value(name).map(|value| Expr::Literal { value, position })
                            .ok_or_else(|| {
                                self.unexpected(found,
                                                &format!("'(' after function name '{name}'"))
                            })
    }

    /// Parses the name after `->` or `?->`. Keywords are valid names there.
    fn parse_property_name(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(spanned)
                if matches!(spanned.token, Token::Identifier(_))
                   || spanned.lexeme.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                self.advance();
                Ok(spanned.lexeme.clone())
            },
            found => Err(self.unexpected(found, "a property name")),
        }
    }

    /// Parses a parenthesized expression.
    ///
    /// The inner expression starts again from the loosest level.
    ///
    /// # Errors
    /// `UnbalancedParenthesis` when the input ends before the closing `)`.
    fn parse_grouping(&mut self) -> ParseResult<Expr> {
        let Some(open) = self.advance() else {
            return Err(self.unexpected(None, "'('"));
        };

        let expr = self.parse_expression()?;

        match self.peek() {
            Some(Spanned { token: Token::RParen, .. }) => {
                self.advance();
                Ok(expr)
            },
            None => Err(ParseError::UnbalancedParenthesis { position: open.position }),
            found => Err(self.unexpected(found, "')'")),
        }
    }

    /// Parses one call argument or list element, which may be spread.
    fn parse_list_item(&mut self) -> ParseResult<ListItem> {
        if self.next_is(&Token::Ellipsis) {
            self.advance();
            return Ok(ListItem::Spread(self.parse_expression()?));
        }
        Ok(ListItem::Item(self.parse_expression()?))
    }

    /// Parses one element of a bracketed literal.
    fn parse_element(&mut self) -> ParseResult<(Element, Option<&'a Spanned>)> {
        let start = self.peek();
        if self.next_is(&Token::Ellipsis) {
            self.advance();
            return Ok((Element::Spread(self.parse_expression()?), start));
        }

        let first = self.parse_expression()?;
        if self.next_is(&Token::FatArrow) {
            let arrow = self.advance();
            let value = self.parse_expression()?;
            return Ok((Element::Pair(first, value), arrow));
        }
        Ok((Element::Item(first), start))
    }

    /// Parses `[a, b, ...c]` into an array literal, or `['k' => v, ...o]`
    /// into an object literal.
    ///
    /// # Errors
    /// `UnexpectedToken` when keyed and unkeyed elements are mixed.
    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let Some(open) = self.advance() else {
            return Err(self.unexpected(None, "'['"));
        };

        let elements = self.parse_comma_separated(Self::parse_element,
                                                  &Token::RBracket,
                                                  open.position)?;

        let keyed = elements.iter().any(|(element, _)| matches!(element, Element::Pair(..)));
        let mut items = Vec::new();
        let mut entries = Vec::new();

        for (element, token) in elements {
            match element {
                Element::Spread(expr) if keyed => entries.push(ObjectEntry::Spread(expr)),
                Element::Spread(expr) => items.push(ListItem::Spread(expr)),
                Element::Pair(key, value) => entries.push(ObjectEntry::Pair { key, value }),
                Element::Item(expr) if keyed => {
                    return Err(ParseError::UnexpectedToken {
                        token:    token.map_or_else(String::new, |t| t.lexeme.clone()),
                        expected: "'key => value' in a keyed array literal".to_string(),
                        position: expr.position(),
                    });
                },
                Element::Item(expr) => items.push(ListItem::Item(expr)),
            }
        }

        Ok(if keyed {
               Expr::ObjectLiteral { entries,
                                     position: open.position }
           } else {
               Expr::ArrayLiteral { items,
                                    position: open.position }
           })
    }

    /// Parses `match (subject) { a, b => x, default => y }`.
    ///
    /// Trailing commas are accepted after conditions and after arms. Only one
    /// `default` arm is allowed.
    fn parse_match(&mut self) -> ParseResult<Expr> {
        let Some(keyword) = self.advance() else {
            return Err(self.unexpected(None, "'match'"));
        };

        let open = self.expect(&Token::LParen, "'(' after 'match'")?;
        let subject = self.parse_expression()?;
        if self.peek().is_none() {
            return Err(ParseError::UnbalancedParenthesis { position: open.position });
        }
        self.expect(&Token::RParen, "')' after the match subject")?;
        self.expect(&Token::LBrace, "'{' to open the match arms")?;

        let mut arms = Vec::new();
        let mut has_default = false;

        loop {
            if self.next_is(&Token::RBrace) {
                self.advance();
                break;
            }

            let conditions = match self.peek() {
                Some(spanned) if spanned.token == Token::Default => {
                    if has_default {
                        return Err(ParseError::UnexpectedToken {
                            token:    spanned.lexeme.clone(),
                            expected: "at most one default arm".to_string(),
                            position: spanned.position,
                        });
                    }
                    has_default = true;
                    self.advance();
                    None
                },
                _ => Some(self.parse_match_conditions()?),
            };

            self.expect(&Token::FatArrow, "'=>' in a match arm")?;
            let body = self.parse_expression()?;
            arms.push(MatchArm { conditions, body });

            match self.peek() {
                Some(Spanned { token: Token::Comma, .. }) => {
                    self.advance();
                },
                Some(Spanned { token: Token::RBrace, .. }) => {},
                found => return Err(self.unexpected(found, "',' or '}' after a match arm")),
            }
        }

        Ok(Expr::Match { subject: Box::new(subject),
                         arms,
                         position: keyword.position })
    }

    /// Parses the comma-separated conditions of one match arm.
    fn parse_match_conditions(&mut self) -> ParseResult<Vec<Expr>> {
        let mut conditions = vec![self.parse_expression()?];
        while self.next_is(&Token::Comma) {
            self.advance();
            if self.next_is(&Token::FatArrow) {
                break;
            }
            conditions.push(self.parse_expression()?);
        }
        Ok(conditions)
    }
}

/// Whether a call may follow `node`.
///
/// Numbers, booleans, `null`, literals of arrays and `match` results cannot
/// name a function.
const fn is_callable(node: &Expr) -> bool {
    !matches!(node,
              Expr::Literal { value:
                                  LiteralValue::Int(_)
                                  | LiteralValue::Float(_)
                                  | LiteralValue::Bool(_)
                                  | LiteralValue::Null,
                              .. }
              | Expr::ArrayLiteral { .. }
              | Expr::ObjectLiteral { .. }
              | Expr::Match { .. })
}
