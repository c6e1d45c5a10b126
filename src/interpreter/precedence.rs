use std::fmt::{self, Display, Formatter};

use crate::error::ParseError;

/// How operators of equal precedence group when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a op b op c` is `(a op b) op c`.
    Left,
    /// `a op b op c` is `a op (b op c)`.
    Right,
    /// Chaining is a syntax error.
    None,
}

/// The number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Prefix operators such as `!` and casts.
    Unary,
    /// Infix operators.
    Binary,
    /// The conditional operator `? :`.
    Ternary,
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unary => "unary",
            Self::Binary => "binary",
            Self::Ternary => "ternary",
        };
        write!(f, "{name}")
    }
}

/// One entry of the precedence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSpec {
    /// The operator as written, with keywords in lower case.
    pub symbol:        &'static str,
    /// Precedence level; `1` binds tightest.
    pub level:         u8,
    /// Grouping of chained operators of this level.
    pub associativity: Associativity,
    /// Number of operands.
    pub arity:         Arity,
}

/// Declares the operator table one precedence level per line.
///
/// Each line gives the level, the associativity, the arity and the symbols
/// sharing them; the macro expands to a flat static slice of
/// [`OperatorSpec`].
macro_rules! operator_table {
    (
        $(
            $level:literal => $assoc:ident $arity:ident [ $($symbol:literal),+ $(,)? ]
        ),* $(,)?
    ) => {
        &[
            $(
                $(
                    OperatorSpec { symbol:        $symbol,
                                   level:         $level,
                                   associativity: Associativity::$assoc,
                                   arity:         Arity::$arity, },
                )+
            )*
        ]
    };
}

static STANDARD_OPERATORS: &[OperatorSpec] = operator_table! {
    1  => Left  Binary  ["[", "->", "?->"],
    2  => None  Unary   ["clone", "new"],
    3  => Right Binary  ["**"],
    4  => Right Unary   ["++", "--", "~", "+", "-", "@",
                         "(int)", "(float)", "(string)", "(bool)", "(array)", "(object)"],
    5  => Left  Binary  ["instanceof"],
    6  => Right Unary   ["!"],
    7  => Left  Binary  ["*", "/", "%"],
    8  => Left  Binary  ["+", "-"],
    9  => Left  Binary  ["<<", ">>"],
    10 => Left  Binary  ["."],
    11 => None  Binary  ["<", "<=", ">", ">="],
    12 => None  Binary  ["==", "!=", "===", "!==", "<>", "<=>"],
    13 => Left  Binary  ["&"],
    14 => Left  Binary  ["^"],
    15 => Left  Binary  ["|"],
    16 => Left  Binary  ["&&"],
    17 => Left  Binary  ["||"],
    18 => Right Binary  ["??"],
    19 => Left  Ternary ["?"],
    20 => Right Binary  ["=", "+=", "-=", "*=", "**=", "/=", ".=", "%=", "&=", "|=", "^=",
                         "<<=", ">>=", "??="],
    21 => Left  Binary  ["and"],
    22 => Left  Binary  ["xor"],
    23 => Left  Binary  ["or"],
};

/// An immutable registry mapping an operator symbol and arity to its
/// precedence level and associativity.
///
/// The parser only ever reads the table, so one table can be shared by any
/// number of parses.
///
/// ## Example
/// ```
/// use opal::interpreter::precedence::{Arity, Associativity, PrecedenceTable};
///
/// let table = PrecedenceTable::new();
/// let power = table.lookup("**", Arity::Binary).unwrap();
/// assert_eq!(power.level, 3);
/// assert_eq!(power.associativity, Associativity::Right);
/// assert!(table.lookup("**", Arity::Unary).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    operators: Vec<OperatorSpec>,
}

impl PrecedenceTable {
    /// The standard table: 23 levels, with left-associative ternaries.
    #[must_use]
    pub fn new() -> Self {
        Self { operators: STANDARD_OPERATORS.to_vec() }
    }

    /// Returns a copy of the table with the given ternary associativity.
    ///
    /// `Associativity::Right` gives conventional nested conditionals, where
    /// `a ? b : c ? d : e` is `a ? b : (c ? d : e)`.
    #[must_use]
    pub fn with_ternary_associativity(mut self, associativity: Associativity) -> Self {
        self.operators
            .iter_mut()
            .filter(|spec| spec.arity == Arity::Ternary)
            .for_each(|spec| spec.associativity = associativity);
        self
    }

    /// Finds the entry for `symbol` used with `arity`.
    ///
    /// Keyword symbols are matched case-insensitively.
    ///
    /// # Errors
    /// `ParseError::UnknownOperator` (without a position) when the table has
    /// no such entry.
    pub fn lookup(&self, symbol: &str, arity: Arity) -> Result<&OperatorSpec, ParseError> {
        self.operators
            .iter()
            .find(|spec| spec.arity == arity && spec.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| ParseError::UnknownOperator { symbol: symbol.to_string(),
                                                         arity,
                                                         position: None })
    }

    /// The numerically largest, and so loosest-binding, level in the table.
    #[must_use]
    pub fn lowest_level(&self) -> u8 {
        self.operators.iter().map(|spec| spec.level).max().unwrap_or(1)
    }

    /// Iterates over every entry.
    pub fn iter(&self) -> impl Iterator<Item = &OperatorSpec> {
        self.operators.iter()
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self::new()
    }
}
