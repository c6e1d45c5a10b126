use logos::Logos;

use crate::{
    ast::CastType,
    error::{LexError, LexErrorKind},
    util::position::Position,
};

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Where two tokens share a prefix the longest match wins, so `**=` is read
/// before `**` and `*`, and `<=>` before `<=`.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Floating-point literals, such as `3.14`, `.5` or `2.1e-10`.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", parse_float)]
    Float(f64),
    /// Integer literals in decimal, hexadecimal, binary or octal notation.
    #[regex(r"[1-9][0-9_]*|0", |lex| parse_integer(lex.slice(), 10))]
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| parse_integer(&lex.slice()[2..], 16))]
    #[regex(r"0[bB][01_]+", |lex| parse_integer(&lex.slice()[2..], 2))]
    #[regex(r"0[oO][0-7_]+", |lex| parse_integer(&lex.slice()[2..], 8))]
    #[regex(r"0[0-7_]+", |lex| parse_integer(&lex.slice()[1..], 8))]
    Int(i64),
    /// Single- or double-quoted string literal, with escapes resolved.
    #[regex(r"'([^'\\]|\\(.|\n))*'", parse_single_quoted, allow_greedy = true)]
    #[regex(r#""([^"\\]|\\(.|\n))*""#, parse_double_quoted, allow_greedy = true)]
    String(String),
    /// `true` or `false`, in any case.
    #[token("true", |_| true, ignore(case))]
    #[token("false", |_| false, ignore(case))]
    Bool(bool),
    /// `null`
    #[token("null", ignore(case))]
    Null,
    /// Variable tokens such as `$total`; the payload omits the `$`.
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Variable(String),
    /// Bare names: function names, type names and constants.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Cast operators such as `(int)` or `( boolean )`.
    #[regex(r"\([ \t]*(int|integer|float|double|string|bool|boolean|array|object)[ \t]*\)",
            parse_cast,
            ignore(case))]
    Cast(CastType),
    /// `// Comments.` and `# comments.`
    #[regex(r"(//|#)[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip, allow_greedy = true)]
    MultiLineComment,
    /// `and`
    #[token("and", ignore(case))]
    And,
    /// `or`
    #[token("or", ignore(case))]
    Or,
    /// `xor`
    #[token("xor", ignore(case))]
    Xor,
    /// `instanceof`
    #[token("instanceof", ignore(case))]
    Instanceof,
    /// `clone`
    #[token("clone", ignore(case))]
    Clone,
    /// `new`
    #[token("new", ignore(case))]
    New,
    /// `match`
    #[token("match", ignore(case))]
    Match,
    /// `default`
    #[token("default", ignore(case))]
    Default,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `...`
    #[token("...")]
    Ellipsis,
    /// `->`
    #[token("->")]
    Arrow,
    /// `?->`
    #[token("?->")]
    NullsafeArrow,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `??`
    #[token("??")]
    Coalesce,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `**`
    #[token("**")]
    StarStar,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `.`
    #[token(".")]
    Dot,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `@`
    #[token("@")]
    At,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<>`
    #[token("<>")]
    LessGreater,
    /// `===`
    #[token("===")]
    Identical,
    /// `!==`
    #[token("!==")]
    NotIdentical,
    /// `<=>`
    #[token("<=>")]
    Spaceship,
    /// `=`
    #[token("=")]
    Equals,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `**=`
    #[token("**=")]
    PowAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `.=`
    #[token(".=")]
    ConcatAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `&=`
    #[token("&=")]
    BitAndAssign,
    /// `|=`
    #[token("|=")]
    BitOrAssign,
    /// `^=`
    #[token("^=")]
    BitXorAssign,
    /// `<<=`
    #[token("<<=")]
    ShiftLeftAssign,
    /// `>>=`
    #[token(">>=")]
    ShiftRightAssign,
    /// `??=`
    #[token("??=")]
    CoalesceAssign,
}

/// The broad category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Integer and float literals.
    Number,
    /// String literals.
    String,
    /// Variables, bare names and value keywords such as `true` or `match`.
    Identifier,
    /// Anything with an entry in the precedence table.
    Operator,
    /// Brackets, braces, separators and arrows that only structure the input.
    Punctuation,
}

impl Token {
    /// Returns the category of the token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Int(_) | Self::Float(_) => TokenKind::Number,
            Self::String(_) => TokenKind::String,
            Self::Bool(_)
            | Self::Null
            | Self::Variable(_)
            | Self::Identifier(_)
            | Self::Match
            | Self::Default => TokenKind::Identifier,
            Self::LParen
            | Self::RParen
            | Self::RBracket
            | Self::LBrace
            | Self::RBrace
            | Self::Comma
            | Self::FatArrow
            | Self::Ellipsis
            | Self::Colon
            | Self::Comment
            | Self::MultiLineComment => TokenKind::Punctuation,
            _ => TokenKind::Operator,
        }
    }

    /// Returns the canonical operator symbol used to look the token up in the
    /// precedence table, or `None` for tokens that are not operators.
    ///
    /// Keywords are returned in lower case and cast aliases in their short
    /// form, so `(INTEGER)` yields `"(int)"`.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Self::Cast(cast) => cast.symbol(),
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Instanceof => "instanceof",
            Self::Clone => "clone",
            Self::New => "new",
            Self::LBracket => "[",
            Self::Arrow => "->",
            Self::NullsafeArrow => "?->",
            Self::Question => "?",
            Self::Coalesce => "??",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Dot => ".",
            Self::Tilde => "~",
            Self::Bang => "!",
            Self::At => "@",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessGreater => "<>",
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Spaceship => "<=>",
            Self::Equals => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MulAssign => "*=",
            Self::PowAssign => "**=",
            Self::DivAssign => "/=",
            Self::ConcatAssign => ".=",
            Self::ModAssign => "%=",
            Self::BitAndAssign => "&=",
            Self::BitOrAssign => "|=",
            Self::BitXorAssign => "^=",
            Self::ShiftLeftAssign => "<<=",
            Self::ShiftRightAssign => ">>=",
            Self::CoalesceAssign => "??=",
            _ => return None,
        };
        Some(symbol)
    }
}

/// A token together with the text it was read from and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token:    Token,
    /// The exact source text of the token.
    pub lexeme:   String,
    /// The position of the first character.
    pub position: Position,
}

impl Spanned {
    /// Returns the category of the token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    /// The position just past the last character of the token.
    #[must_use]
    pub fn end(&self) -> Position {
        advance(self.position, &self.lexeme)
    }
}

fn advance(mut position: Position, text: &str) -> Position {
    for c in text.chars() {
        if c == '\n' {
            position.line += 1;
            position.column = 1;
        } else {
            position.column += 1;
        }
    }
    position.offset += text.len();
    position
}

/// A lazy tokenizer over a source string.
///
/// Yields `Ok(Spanned)` for each token and stops after the first error. Line
/// and column numbers are computed incrementally as tokens are produced.
///
/// ## Example
/// ```
/// use opal::interpreter::lexer::{Lexer, Token};
///
/// let tokens: Vec<_> = Lexer::new("$a ** 2").map(|t| t.unwrap().token).collect();
/// assert_eq!(tokens, vec![Token::Variable("a".into()), Token::StarStar, Token::Int(2)]);
/// ```
pub struct Lexer<'src> {
    inner:    logos::Lexer<'src, Token>,
    position: Position,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Starts tokenizing `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner:    Token::lexer(source),
               position: Position::start(),
               finished: false, }
    }

    fn position_of(&mut self, offset: usize) -> Position {
        let skipped = &self.inner.source()[self.position.offset..offset];
        self.position = advance(self.position, skipped);
        self.position
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(token) = self.inner.next() else {
            self.finished = true;
            return None;
        };
        let position = self.position_of(self.inner.span().start);
        let lexeme = self.inner.slice().to_string();

        match token {
            Ok(token) => Some(Ok(Spanned { token, lexeme, position })),
            Err(kind) => {
                self.finished = true;
                let kind = if kind == LexErrorKind::UnrecognizedCharacter
                              && lexeme.starts_with(['\'', '"'])
                {
                    LexErrorKind::UnterminatedString
                } else {
                    kind
                };
                tracing::debug!(?kind, %position, "lexing stopped");
                Some(Err(LexError { kind, lexeme, position }))
            },
        }
    }
}

/// Parses a floating-point literal, ignoring digit separators.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

/// Parses the digits of an integer literal in the given radix.
///
/// # Errors
/// `IntegerOverflow` when the value does not fit in an `i64`.
fn parse_integer(digits: &str, radix: u32) -> Result<i64, LexErrorKind> {
    let digits = digits.replace('_', "");
    if digits.is_empty() {
        return Ok(0);
    }
    i64::from_str_radix(&digits, radix).map_err(|_| LexErrorKind::IntegerOverflow)
}

/// Resolves the type name inside a cast token.
fn parse_cast(lex: &logos::Lexer<Token>) -> Option<CastType> {
    let slice = lex.slice();
    CastType::from_name(slice[1..slice.len() - 1].trim())
}

/// Resolves the two escapes of a single-quoted string: `\'` and `\\`.
fn parse_single_quoted(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '\'' || next == '\\' => {
                text.push(next);
                chars.next();
            },
            _ => text.push(c),
        }
    }
    text
}

/// Resolves the escapes of a double-quoted string. Unknown escapes are kept
/// verbatim, backslash included.
///
/// # Errors
/// `InvalidEscape` for a `\u{...}` escape that is unterminated or does not
/// name a Unicode scalar value.
fn parse_double_quoted(lex: &logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some('r') => text.push('\r'),
            Some('v') => text.push('\u{0b}'),
            Some('f') => text.push('\u{0c}'),
            Some('e') => text.push('\u{1b}'),
            Some(escaped @ ('\\' | '$' | '"')) => text.push(escaped),
            Some(first @ '0'..='7') => {
                let mut code = first.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        },
                        None => break,
                    }
                }
                text.push(char::from_u32(code & 0xff).unwrap_or('\0'));
            },
            Some('x') if chars.peek().is_some_and(char::is_ascii_hexdigit) => {
                let mut code = 0;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            code = code * 16 + digit;
                            chars.next();
                        },
                        None => break,
                    }
                }
                text.push(char::from_u32(code).unwrap_or('\0'));
            },
            Some('u') if chars.peek() == Some(&'{') => {
                chars.next();
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => return Err(LexErrorKind::InvalidEscape),
                    }
                }
                let code = u32::from_str_radix(&hex, 16).map_err(|_| LexErrorKind::InvalidEscape)?;
                text.push(char::from_u32(code).ok_or(LexErrorKind::InvalidEscape)?);
            },
            Some(other) => {
                text.push('\\');
                text.push(other);
            },
            None => text.push('\\'),
        }
    }

    Ok(text)
}
