use opal::{
    Environment, PrecedenceTable, Value,
    ast::CastType,
    evaluate_source,
    interpreter::lexer::{Token, TokenKind},
    tokenize,
    util::position::Position,
};
use pretty_assertions::assert_eq;

fn tokens(source: &str) -> Vec<Token> {
    tokenize(source).map(|t| t.unwrap().token).collect()
}

#[test]
fn token_kinds() {
    let kinds: Vec<TokenKind> = tokenize("$a = [1, 'x'] ?? max(2.5)").map(|t| t.unwrap().kind())
                                                                  .collect();

    assert_eq!(kinds,
               [TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Punctuation,
                TokenKind::String,
                TokenKind::Punctuation,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Number,
                TokenKind::Punctuation]);
}

#[test]
fn positions_span_lines() {
    let spanned: Vec<_> = tokenize("1 +\n  'ab'").map(Result::unwrap).collect();

    assert_eq!(spanned[0].position, Position::new(0, 1, 1));
    assert_eq!(spanned[1].position, Position::new(2, 1, 3));
    assert_eq!(spanned[2].position, Position::new(6, 2, 3));
    assert_eq!(spanned[2].end(), Position::new(10, 2, 7));
}

#[test]
fn numbers() {
    assert_eq!(tokens("42 1_000 0x1f 0b101 0o17 017"),
               [Token::Int(42), Token::Int(1000), Token::Int(31), Token::Int(5), Token::Int(15),
                Token::Int(15)]);
    assert_eq!(tokens("1.5 .5 1e3 1.5e-3"),
               [Token::Float(1.5), Token::Float(0.5), Token::Float(1000.0), Token::Float(0.0015)]);
}

#[test]
fn strings_and_escapes() {
    assert_eq!(tokens(r"'a\'b\\c\n'"), [Token::String("a'b\\c\\n".to_string())]);
    assert_eq!(tokens(r#""a\nb\t\$\"\x41\101\u{263A}""#),
               [Token::String("a\nb\t$\"AA\u{263A}".to_string())]);
}

#[test]
fn keywords_casts_and_comments() {
    assert_eq!(tokens("TRUE and Null // trailing"),
               [Token::Bool(true), Token::And, Token::Null]);
    assert_eq!(tokens("( INTEGER ) $x # note"),
               [Token::Cast(CastType::Int), Token::Variable("x".to_string())]);
    assert_eq!(tokens("1 /* skipped\n */ + 2"), [Token::Int(1), Token::Plus, Token::Int(2)]);
    assert_eq!(Token::Cast(CastType::Float).symbol(), Some("(float)"));
}

#[test]
fn longest_operator_wins() {
    assert_eq!(tokens("**= ?-> ??= <=> !== ..."),
               [Token::PowAssign,
                Token::NullsafeArrow,
                Token::CoalesceAssign,
                Token::Spaceship,
                Token::NotIdentical,
                Token::Ellipsis]);
}

#[test]
fn environment_lists_bindings_in_name_order() {
    let table = PrecedenceTable::new();
    let mut env = Environment::new();
    evaluate_source("$b = 2", &table, &mut env).unwrap();
    evaluate_source("$a = $b + 1", &table, &mut env).unwrap();

    let bindings: Vec<(&str, &Value)> = env.bindings().collect();
    assert_eq!(bindings, [("a", &Value::Int(3)), ("b", &Value::Int(2))]);

    assert_eq!(env.remove("a"), Some(Value::Int(3)));
    assert_eq!(env.get("a"), None);
}
