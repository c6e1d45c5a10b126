use opal::{
    Error, ErrorKind, PrecedenceTable,
    error::ParseError,
    interpreter::precedence::{Arity, Associativity},
    parse, parse_tokens, tokenize,
};
use pretty_assertions::assert_eq;

fn tree(source: &str) -> String {
    parse(source, &PrecedenceTable::new()).unwrap_or_else(|e| panic!("`{source}` failed: {e}"))
                                          .to_string()
}

fn assert_tree(source: &str, expected: &str) {
    assert_eq!(tree(source), expected, "{source}");
}

fn assert_syntax_error(source: &str, kind: ErrorKind) {
    match parse(source, &PrecedenceTable::new()) {
        Ok(expr) => panic!("`{source}` parsed as {expr} but was expected to fail"),
        Err(e) => assert_eq!(e.kind(), kind, "`{source}` failed with: {e}"),
    }
}

#[test]
fn table_covers_every_level() {
    let table = PrecedenceTable::new();

    assert_eq!(table.lowest_level(), 23);
    for level in 1..=23 {
        assert!(table.iter().any(|spec| spec.level == level), "level {level} has no operators");
    }
}

#[test]
fn table_lookup_by_arity() {
    let table = PrecedenceTable::new();

    assert_eq!(table.lookup("+", Arity::Binary).map(|spec| spec.level), Ok(8));
    assert_eq!(table.lookup("+", Arity::Unary).map(|spec| spec.level), Ok(4));
    assert_eq!(table.lookup("!", Arity::Unary).map(|spec| spec.level), Ok(6));
    assert_eq!(table.lookup("AND", Arity::Binary).map(|spec| spec.level), Ok(21));
    assert_eq!(table.lookup("(int)", Arity::Unary).map(|spec| spec.associativity),
               Ok(Associativity::Right));
    assert_eq!(table.lookup("<=>", Arity::Binary).map(|spec| spec.associativity),
               Ok(Associativity::None));
    assert_eq!(table.lookup("?", Arity::Ternary).map(|spec| spec.associativity),
               Ok(Associativity::Left));
    assert!(table.lookup("!", Arity::Binary).is_err());
    assert!(table.lookup("*", Arity::Unary).is_err());
}

#[test]
fn ternary_associativity_is_configurable() {
    let right = PrecedenceTable::new().with_ternary_associativity(Associativity::Right);

    assert_eq!(right.lookup("?", Arity::Ternary).map(|spec| spec.associativity),
               Ok(Associativity::Right));
    assert_eq!(right.lookup("??", Arity::Binary).map(|spec| spec.associativity),
               Ok(Associativity::Right));

    assert_tree("true ? 1 : 2 ? 3 : 4", "((true ? 1 : 2) ? 3 : 4)");
    assert_eq!(parse("true ? 1 : 2 ? 3 : 4", &right).unwrap().to_string(),
               "(true ? 1 : (2 ? 3 : 4))");
}

#[test]
fn non_associative_ternary_rejects_chains() {
    let none = PrecedenceTable::new().with_ternary_associativity(Associativity::None);

    assert!(matches!(parse("1 ? 2 : 3 ? 4 : 5", &none),
                     Err(Error::Parse(ParseError::NonAssociative { .. }))));
    assert!(matches!(parse("1 ?: 2 ?: 3", &none),
                     Err(Error::Parse(ParseError::NonAssociative { .. }))));
    assert_eq!(parse("(1 ? 2 : 3) ? 4 : 5", &none).map(|expr| expr.to_string()),
               Ok("((1 ? 2 : 3) ? 4 : 5)".to_string()));
    assert_eq!(parse("1 ? 2 ? 3 : 4 : 5", &none).map(|expr| expr.to_string()),
               Ok("(1 ? (2 ? 3 : 4) : 5)".to_string()));
}

#[test]
fn binary_levels_and_associativity() {
    assert_tree("1 + 2 * 3", "(1 + (2 * 3))");
    assert_tree("10 - 5 - 2", "((10 - 5) - 2)");
    assert_tree("2 ** 3 ** 2", "(2 ** (3 ** 2))");
    assert_tree("$a . $b + $c", "($a . ($b + $c))");
    assert_tree("$a << 1 + 2", "($a << (1 + 2))");
    assert_tree("$a & $b | $c ^ $d", "(($a & $b) | ($c ^ $d))");
    assert_tree("1 < 2 == true", "((1 < 2) == true)");
    assert_tree("$a ?? $b ?? $c", "($a ?? ($b ?? $c))");
    assert_tree("$a and $b or $c xor $d", "(($a and $b) or ($c xor $d))");
    assert_tree("$a || $b && $c", "($a || ($b && $c))");
}

#[test]
fn unary_operators_bind_by_level() {
    assert_tree("-$a ** 2", "(- ($a ** 2))");
    assert_tree("!$a && $b", "((! $a) && $b)");
    assert_tree("!$a instanceof int", "(! ($a instanceof 'int'))");
    assert_tree("~$a & $b", "((~ $a) & $b)");
    assert_tree("(int) $a + 1", "(((int) $a) + 1)");
    assert_tree("@$a['k']", "(@ $a['k'])");
    assert_tree("clone $a", "(clone $a)");
    assert_tree("$i++ + ++$i", "(($i ++) + (++ $i))");
}

#[test]
fn assignment_binds_to_its_left_operand() {
    assert_tree("$a = $b = 3", "($a = ($b = 3))");
    assert_tree("$a += 1", "($a += 1)");
    assert_tree("$a ??= []", "($a ??= [])");
    assert_tree("$a && $b = 5", "($a && ($b = 5))");
    assert_tree("$x = 1 and 2", "(($x = 1) and 2)");
    assert_tree("$a['k'][] = 1", "($a['k'][] = 1)");
}

#[test]
fn postfix_chains_and_literals() {
    assert_tree("$x?->y[0]", "$x?->y[0]");
    assert_tree("f(...$xs, 2)", "f(...$xs, 2)");
    assert_tree("['a' => 1, ...$o]", "['a' => 1, ...$o]");
    assert_tree("match ($x) { 1, 2 => 'a', default => 'b' }",
                "match ($x) { 1, 2 => 'a', default => 'b' }");
    assert_tree("$x ?: 0", "($x ?: 0)");
    assert_tree("PHP_INT_MAX", "9223372036854775807");
}

#[test]
fn printed_trees_parse_back_unchanged() {
    for source in ["-5 - -5",
                   "'it\\'s' . \"\\n\"",
                   "(object) [1, 2]",
                   "$a['k'] ??= $b?->c ?? -1.5",
                   "1e20 + .5",
                   "strlen(...['abc'])",
                   "$f($x)[0]"]
    {
        let printed = tree(source);
        assert_eq!(tree(&printed), printed, "{source}");
    }
}

#[test]
fn non_associative_operators_do_not_chain() {
    assert_syntax_error("1 < 2 < 3", ErrorKind::Syntax);
    assert_syntax_error("1 == 2 != 3", ErrorKind::Syntax);
    assert_syntax_error("$a <=> $b <=> $c", ErrorKind::Syntax);
    assert_tree("(1 < 2) < 3", "((1 < 2) < 3)");
}

#[test]
fn unknown_and_invalid_operators() {
    assert_syntax_error("* 3", ErrorKind::UnknownOperator);
    assert_syntax_error("1 ! 2", ErrorKind::UnknownOperator);
    assert_syntax_error("5 = 3", ErrorKind::Syntax);
    assert_syntax_error("1++", ErrorKind::Syntax);
    assert_syntax_error("new Widget", ErrorKind::Syntax);
}

#[test]
fn parse_tokens_matches_parse() {
    let table = PrecedenceTable::new();
    let tokens = tokenize("$a ?? 1 + 2").collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(parse_tokens(&tokens, &table).map(|expr| expr.to_string()),
               Ok("($a ?? (1 + 2))".to_string()));
}
