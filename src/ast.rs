use std::fmt::{self, Display, Formatter, Write};

use crate::util::position::Position;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code: numbers, strings, booleans and `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Int(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A string literal with its escapes already resolved.
    String(String),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// The `null` literal.
    Null,
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// The target type of a cast operator such as `(int)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastType {
    /// `(int)` or `(integer)`
    Int,
    /// `(float)` or `(double)`
    Float,
    /// `(string)`
    String,
    /// `(bool)` or `(boolean)`
    Bool,
    /// `(array)`
    Array,
    /// `(object)`
    Object,
}

impl CastType {
    /// Resolves a type name, including the long aliases, to a cast type.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Self::Int),
            "float" | "double" => Some(Self::Float),
            "string" => Some(Self::String),
            "bool" | "boolean" => Some(Self::Bool),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The canonical spelling of the cast operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Int => "(int)",
            Self::Float => "(float)",
            Self::String => "(string)",
            Self::Bool => "(bool)",
            Self::Array => "(array)",
            Self::Object => "(object)",
        }
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Numeric identity (`+x`).
    Plus,
    /// Logical NOT (`!x`).
    Not,
    /// Bitwise NOT (`~x`).
    BitNot,
    /// Type cast (`(int) x`).
    Cast(CastType),
    /// Error control (`@x`). Evaluates its operand unchanged.
    Silence,
    /// `clone x`. Values have no identity, so this yields a copy.
    Clone,
    /// `++$x`
    PreIncrement,
    /// `--$x`
    PreDecrement,
    /// `$x++`
    PostIncrement,
    /// `$x--`
    PostDecrement,
}

impl UnaryOperator {
    /// The operator as written in source.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Cast(cast) => cast.symbol(),
            Self::Silence => "@",
            Self::Clone => "clone",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    /// Whether the operator is written after its operand.
    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }

    /// Whether the operator writes back into its operand.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(self,
                 Self::PreIncrement | Self::PreDecrement | Self::PostIncrement | Self::PostDecrement)
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Represents a binary operator.
///
/// Besides arithmetic and comparisons this includes the string, bitwise,
/// logical, null-coalescing and type operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition, or array union (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Integer remainder (`%`)
    Mod,
    /// Exponentiation (`**`)
    Pow,
    /// String concatenation (`.`)
    Concat,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Arithmetic right shift (`>>`)
    ShiftRight,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Loose equality (`==`)
    Equal,
    /// Loose inequality (`!=` or `<>`)
    NotEqual,
    /// Strict equality (`===`)
    Identical,
    /// Strict inequality (`!==`)
    NotIdentical,
    /// Three-way comparison (`<=>`)
    Spaceship,
    /// Short-circuit and (`&&`)
    And,
    /// Short-circuit or (`||`)
    Or,
    /// Low-precedence short-circuit and (`and`)
    KeywordAnd,
    /// Low-precedence short-circuit or (`or`)
    KeywordOr,
    /// Logical exclusive or (`xor`)
    Xor,
    /// Null coalescing (`??`)
    Coalesce,
    /// Type test (`instanceof`)
    InstanceOf,
}

impl BinaryOperator {
    /// The operator as written in source.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Concat => ".",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Spaceship => "<=>",
            Self::And => "&&",
            Self::Or => "||",
            Self::KeywordAnd => "and",
            Self::KeywordOr => "or",
            Self::Xor => "xor",
            Self::Coalesce => "??",
            Self::InstanceOf => "instanceof",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An element of an array literal or of a call's argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// A single value.
    Item(Expr),
    /// `...expr`, which unpacks an array in place.
    Spread(Expr),
}

/// An entry of a keyed array literal such as `['a' => 1, ...$other]`.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// `key => value`
    Pair {
        /// The key expression.
        key:   Expr,
        /// The value expression.
        value: Expr,
    },
    /// `...expr`, which merges an array or object in place.
    Spread(Expr),
}

/// One arm of a `match` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// The values compared against the subject, or `None` for `default`.
    pub conditions: Option<Vec<Expr>>,
    /// The expression evaluated when the arm is selected.
    pub body:       Expr,
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Each node owns its children and records where in the source it starts.
/// Trees are immutable once built; evaluation only borrows them.
///
/// The [`Display`] implementation is the canonical printer: every unary,
/// binary, ternary and assignment node is printed fully parenthesized, so the
/// output parses back into an equivalent tree under any precedence table.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or `null`).
    Literal {
        /// The constant value.
        value:    LiteralValue,
        /// Location in the source code.
        position: Position,
    },
    /// Reference to a variable by name (`$name`).
    Variable {
        /// Name of the variable, without the `$`.
        name:     String,
        /// Location in the source code.
        position: Position,
    },
    /// A prefix or postfix unary operation.
    UnaryOp {
        /// The unary operator to apply.
        op:       UnaryOperator,
        /// The operand expression.
        expr:     Box<Self>,
        /// Location of the operator.
        position: Position,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Location of the operator.
        position: Position,
    },
    /// `condition ? then : else`, or the short form `condition ?: else`.
    TernaryOp {
        /// The condition.
        condition:   Box<Self>,
        /// The middle operand; `None` for the short form, which yields the
        /// condition itself when it is truthy.
        then_branch: Option<Box<Self>>,
        /// The value when the condition is falsy.
        else_branch: Box<Self>,
        /// Location of the `?`.
        position:    Position,
    },
    /// Function call (`strlen($s)`).
    ///
    /// A bare function name is stored as a string literal callee.
    Call {
        /// Expression yielding the function name.
        callee:    Box<Self>,
        /// Arguments, possibly spread.
        arguments: Vec<ListItem>,
        /// Location of the callee.
        position:  Position,
    },
    /// Plain (`=`) or compound (`+=`, `??=`, ...) assignment.
    Assign {
        /// The assignable target.
        target:   Box<Self>,
        /// The combining operator for compound forms.
        op:       Option<BinaryOperator>,
        /// The assigned expression.
        value:    Box<Self>,
        /// Location of the operator.
        position: Position,
    },
    /// Index access (`$a[0]`), or append (`$a[]`) when `index` is `None`.
    Index {
        /// The indexed expression.
        target:   Box<Self>,
        /// The index; absent for the append form.
        index:    Option<Box<Self>>,
        /// Location of the `[`.
        position: Position,
    },
    /// Property access (`$o->name`) or nullsafe access (`$o?->name`).
    Property {
        /// The accessed expression.
        target:   Box<Self>,
        /// The property name.
        name:     String,
        /// Whether this is `?->`.
        nullsafe: bool,
        /// Location of the arrow.
        position: Position,
    },
    /// Array literal (`[1, 2, ...$rest]`).
    ArrayLiteral {
        /// Elements of the array.
        items:    Vec<ListItem>,
        /// Location of the `[`.
        position: Position,
    },
    /// Keyed array literal (`['a' => 1]`), evaluating to an object.
    ObjectLiteral {
        /// The entries in source order.
        entries:  Vec<ObjectEntry>,
        /// Location of the `[`.
        position: Position,
    },
    /// `match (subject) { a, b => x, default => y }`
    Match {
        /// The value compared against each arm.
        subject:  Box<Self>,
        /// The arms in source order.
        arms:     Vec<MatchArm>,
        /// Location of the `match` keyword.
        position: Position,
    },
}

impl Expr {
    /// Gets the source position from `self`.
    /// ## Example
    /// ```
    /// use opal::{ast::Expr, util::position::Position};
    ///
    /// let expr = Expr::Variable { name:     "x".to_string(),
    ///                             position: Position::new(4, 1, 5), };
    ///
    /// assert_eq!(expr.position().column, 5);
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Literal { position, .. }
            | Self::Variable { position, .. }
            | Self::UnaryOp { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::TernaryOp { position, .. }
            | Self::Call { position, .. }
            | Self::Assign { position, .. }
            | Self::Index { position, .. }
            | Self::Property { position, .. }
            | Self::ArrayLiteral { position, .. }
            | Self::ObjectLiteral { position, .. }
            | Self::Match { position, .. } => *position,
        }
    }

    /// Whether the expression can appear on the left of an assignment.
    ///
    /// Variables, index and append chains rooted at a variable, and property
    /// chains without nullsafe access are assignable.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        match self {
            Self::Variable { .. } => true,
            Self::Index { target, .. } => target.is_assignable(),
            Self::Property { target, nullsafe, .. } => !nullsafe && target.is_assignable(),
            _ => false,
        }
    }

    /// A short description of the node kind, used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "a literal",
            Self::Variable { .. } => "a variable",
            Self::UnaryOp { .. } => "a unary expression",
            Self::BinaryOp { .. } => "a binary expression",
            Self::TernaryOp { .. } => "a ternary expression",
            Self::Call { .. } => "a function call",
            Self::Assign { .. } => "an assignment",
            Self::Index { .. } => "an index expression",
            Self::Property { nullsafe: true, .. } => "a nullsafe property access",
            Self::Property { .. } => "a property access",
            Self::ArrayLiteral { .. } | Self::ObjectLiteral { .. } => "an array literal",
            Self::Match { .. } => "a match expression",
        }
    }
}

/// Words the lexer treats as keywords rather than function names.
pub const KEYWORDS: &[&str] =
    &["true", "false", "null", "and", "or", "xor", "instanceof", "clone", "new", "match", "default"];

fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    && !KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(name))
}

fn write_string_literal(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('\'')
}

fn write_float_literal(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "NAN")
    } else if value.is_infinite() {
        write!(f, "{}", if value > 0.0 { "INF" } else { "(- INF)" })
    } else if value.is_sign_negative() {
        write!(f, "(- {:?})", -value)
    } else {
        write!(f, "{value:?}")
    }
}

fn write_list(f: &mut Formatter<'_>, items: &[ListItem]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        match item {
            ListItem::Item(expr) => write!(f, "{expr}")?,
            ListItem::Spread(expr) => write!(f, "...{expr}")?,
        }
    }
    Ok(())
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i64::MIN) => write!(f, "(- 9223372036854775807 - 1)"),
            Self::Int(value) if *value < 0 => write!(f, "(- {})", value.unsigned_abs()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write_float_literal(f, *value),
            Self::String(text) => write_string_literal(f, text),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),

            Self::Variable { name, .. } => write!(f, "${name}"),

            Self::UnaryOp { op, expr, .. } if op.is_postfix() => write!(f, "({expr} {op})"),

            Self::UnaryOp { op, expr, .. } => write!(f, "({op} {expr})"),

            Self::BinaryOp { left, op, right, .. } => write!(f, "({left} {op} {right})"),

            Self::TernaryOp { condition, then_branch: Some(then_branch), else_branch, .. } => {
                write!(f, "({condition} ? {then_branch} : {else_branch})")
            },

            Self::TernaryOp { condition, then_branch: None, else_branch, .. } => {
                write!(f, "({condition} ?: {else_branch})")
            },

            Self::Call { callee, arguments, .. } => {
                match callee.as_ref() {
                    Self::Literal { value: LiteralValue::String(name), .. } if is_bare_name(name) => {
                        write!(f, "{name}(")?;
                    },
                    other => write!(f, "({other})(")?,
                }
                write_list(f, arguments)?;
                write!(f, ")")
            },

            Self::Assign { target, op, value, .. } => {
                let op = op.map_or("", BinaryOperator::symbol);
                write!(f, "({target} {op}= {value})")
            },

            Self::Index { target, index: Some(index), .. } => write!(f, "{target}[{index}]"),

            Self::Index { target, index: None, .. } => write!(f, "{target}[]"),

            Self::Property { target, name, nullsafe, .. } => {
                write!(f, "{target}{}{name}", if *nullsafe { "?->" } else { "->" })
            },

            Self::ArrayLiteral { items, .. } => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            },

            Self::ObjectLiteral { entries, .. } => {
                // Without a `=>` pair the brackets would read back as a list.
                let keyed = entries.iter().any(|entry| matches!(entry, ObjectEntry::Pair { .. }));
                write!(f, "{}[", if keyed { "" } else { "((object) " })?;
                for (index, entry) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    match entry {
                        ObjectEntry::Pair { key, value } => write!(f, "{key} => {value}")?,
                        ObjectEntry::Spread(expr) => write!(f, "...{expr}")?,
                    }
                }
                write!(f, "]{}", if keyed { "" } else { ")" })
            },

            Self::Match { subject, arms, .. } => {
                write!(f, "match ({subject}) {{")?;
                for (index, arm) in arms.iter().enumerate() {
                    write!(f, "{}", if index > 0 { ", " } else { " " })?;
                    match &arm.conditions {
                        Some(conditions) => {
                            for (position, condition) in conditions.iter().enumerate() {
                                if position > 0 {
                                    write!(f, ", ")?;
                                }
                                write!(f, "{condition}")?;
                            }
                        },
                        None => write!(f, "default")?,
                    }
                    write!(f, " => {}", arm.body)?;
                }
                write!(f, " }}")
            },
        }
    }
}
