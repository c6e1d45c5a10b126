use opal::{Environment, Error, ErrorKind, PrecedenceTable, Value, evaluate_source, parse};
use proptest::{prelude::*, sample::select};

fn eval_with(source: &str, bindings: &[(&str, Value)]) -> Result<Value, Error> {
    let mut env = Environment::new();
    for (name, value) in bindings {
        env.set(name, value.clone());
    }
    evaluate_source(source, &PrecedenceTable::new(), &mut env)
}

/// Results are compared through their printed form, which treats two `NAN`s
/// as equal, and errors by category, since positions shift when a tree is
/// printed.
fn outcome(result: Result<Value, Error>) -> Result<String, ErrorKind> {
    result.map(|value| value.to_string()).map_err(|e| e.kind())
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![(0i64..100).prop_map(|n| n.to_string()),
                Just("$x".to_string()),
                Just("1.5".to_string()),
                Just("'a'".to_string()),
                Just("'7'".to_string()),
                Just("null".to_string()),
                Just("true".to_string()),
                Just("[1, 2]".to_string()),]
}

fn prefixed_operand() -> impl Strategy<Value = String> {
    (select(vec!["", "-", "!", "~", "(int) ", "(string) ", "@"]), operand())
        .prop_map(|(prefix, operand)| format!("{prefix}{operand}"))
}

fn binary_operator() -> impl Strategy<Value = &'static str> {
    select(vec!["+", "-", "*", "/", "%", "**", ".", "<<", ">>", "&", "|", "^", "<", ">=", "==",
                "!==", "<=>", "&&", "||", "??", "and", "or", "xor", "instanceof"])
}

/// A flat chain of operands and operators, without parentheses, so that
/// grouping is decided entirely by the precedence table.
fn chain() -> impl Strategy<Value = String> {
    (prefixed_operand(), prop::collection::vec((binary_operator(), prefixed_operand()), 0..6))
        .prop_map(|(first, rest)| {
            rest.into_iter()
                .fold(first, |source, (op, operand)| format!("{source} {op} {operand}"))
        })
}

proptest! {
    #[test]
    fn printed_tree_is_stable_and_equivalent(source in chain()) {
        let table = PrecedenceTable::new();
        let Ok(tree) = parse(&source, &table) else {
            return Ok(());
        };

        let printed = tree.to_string();
        let reparsed = parse(&printed, &table).map(|expr| expr.to_string());
        prop_assert_eq!(reparsed, Ok(printed.clone()));

        let bindings = [("x", Value::Int(3))];
        prop_assert_eq!(outcome(eval_with(&source, &bindings)),
                        outcome(eval_with(&printed, &bindings)));
    }

    #[test]
    fn spaceship_is_antisymmetric(a in any::<i64>(), b in any::<i64>()) {
        let bindings = [("a", Value::Int(a)), ("b", Value::Int(b))];
        let forward = eval_with("$a <=> $b", &bindings).unwrap();
        let backward = eval_with("$b <=> $a", &bindings).unwrap();

        match (forward, backward) {
            (Value::Int(f), Value::Int(g)) => prop_assert_eq!(f, -g),
            other => prop_assert!(false, "unexpected results {:?}", other),
        }
    }

    #[test]
    fn integer_arithmetic_matches_i64(a in -1_000_000_000i64..1_000_000_000,
                                      b in -1_000_000_000i64..1_000_000_000) {
        let bindings = [("a", Value::Int(a)), ("b", Value::Int(b))];

        prop_assert_eq!(eval_with("$a + $b", &bindings), Ok(Value::Int(a + b)));
        prop_assert_eq!(eval_with("$a - $b", &bindings), Ok(Value::Int(a - b)));
        prop_assert_eq!(eval_with("$a * $b", &bindings), Ok(Value::Int(a * b)));
        prop_assert_eq!(eval_with("$a & $b | $a ^ $b", &bindings), Ok(Value::Int((a & b) | (a ^ b))));
    }

    #[test]
    fn string_cast_round_trips_integers(n in -1_000_000_000_000_000i64..1_000_000_000_000_000) {
        let bindings = [("n", Value::Int(n))];
        prop_assert_eq!(eval_with("(int) (string) $n === $n", &bindings), Ok(Value::Bool(true)));
        prop_assert_eq!(eval_with("$n . '' == $n", &bindings), Ok(Value::Bool(true)));
    }

    #[test]
    fn loose_equality_is_symmetric(a in operand(), b in operand()) {
        let bindings = [("x", Value::Int(3))];
        let forward = eval_with(&format!("{a} == {b}"), &bindings);
        let backward = eval_with(&format!("{b} == {a}"), &bindings);
        prop_assert_eq!(forward, backward);
    }
}
