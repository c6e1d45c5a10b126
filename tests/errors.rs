use opal::{
    Environment, Error, ErrorKind, PrecedenceTable, Value,
    error::{LexErrorKind, ParseError, RuntimeError},
    evaluate_source,
    util::position::Position,
};
use pretty_assertions::assert_eq;

fn fail(source: &str) -> Error {
    match evaluate_source(source, &PrecedenceTable::new(), &mut Environment::new()) {
        Ok(value) => panic!("`{source}` evaluated to {value} but was expected to fail"),
        Err(e) => e,
    }
}

fn assert_kind(source: &str, kind: ErrorKind) {
    let error = fail(source);
    assert_eq!(error.kind(), kind, "`{source}` failed with: {error}");
}

fn assert_message(source: &str, message: &str) {
    assert_eq!(fail(source).to_string(), message, "{source}");
}

#[test]
fn lexical_errors() {
    assert_kind("1 + `", ErrorKind::Lex);
    assert_kind("'open", ErrorKind::Lex);
    assert_kind("99999999999999999999", ErrorKind::Lex);
    assert_kind(r#""\u{110000}""#, ErrorKind::Lex);

    match fail("1 + `") {
        Error::Lex(e) => {
            assert_eq!(e.kind, LexErrorKind::UnrecognizedCharacter);
            assert_eq!(e.position, Position::new(4, 1, 5));
        },
        other => panic!("expected a lexing error, got {other:?}"),
    }
    match fail("'open") {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::UnterminatedString),
        other => panic!("expected a lexing error, got {other:?}"),
    }
    match fail("99999999999999999999") {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::IntegerOverflow),
        other => panic!("expected a lexing error, got {other:?}"),
    }
}

#[test]
fn syntax_errors() {
    assert_kind("1 +", ErrorKind::Syntax);
    assert_kind("(1 + 2", ErrorKind::Syntax);
    assert_kind("1 + 2)", ErrorKind::Syntax);
    assert_kind("1 2", ErrorKind::Syntax);
    assert_kind("", ErrorKind::Syntax);
    assert_kind("[1, 'a' => 2]", ErrorKind::Syntax);
    assert_kind("match (1) { default => 1, default => 2 }", ErrorKind::Syntax);
    assert_kind("match (1) { }", ErrorKind::UnhandledMatch);
    assert_kind("undefined_constant", ErrorKind::Syntax);

    assert!(matches!(fail("(1 + 2"), Error::Parse(ParseError::UnbalancedParenthesis { .. })));
    assert!(matches!(fail("1 < 2 > 3"), Error::Parse(ParseError::NonAssociative { .. })));
    assert!(matches!(fail("5 = 3"), Error::Parse(ParseError::InvalidAssignmentTarget { .. })));
    assert!(matches!(fail("new Widget"), Error::Parse(ParseError::Unsupported { .. })));
}

#[test]
fn runtime_error_kinds() {
    assert_kind("1 / 0", ErrorKind::DivisionByZero);
    assert_kind("1 % 0", ErrorKind::DivisionByZero);
    assert_kind("$nope", ErrorKind::UnboundName);
    assert_kind("nope()", ErrorKind::UnboundName);
    assert_kind("[1][3]", ErrorKind::IndexOutOfBounds);
    assert_kind("[1][-1]", ErrorKind::IndexOutOfBounds);
    assert_kind("['a' => 1]['b']", ErrorKind::UndefinedKey);
    assert_kind("'abc' * 2", ErrorKind::Type);
    assert_kind("[1] . 'x'", ErrorKind::Type);
    assert_kind("5[0]", ErrorKind::Type);
    assert_kind("(1)[]", ErrorKind::Type);
    assert_kind("1(2)", ErrorKind::Syntax);
    assert_kind("match (1) { 2 => 3 }", ErrorKind::UnhandledMatch);
    assert_kind("1 << -1", ErrorKind::Arithmetic);
    assert_kind("strlen(1, 2)", ErrorKind::ArgumentCount);
}

#[test]
fn error_control_does_not_suppress_errors() {
    assert_kind("@(1 / 0)", ErrorKind::DivisionByZero);
    assert_kind("@$nope", ErrorKind::UnboundName);
}

#[test]
fn messages_carry_positions() {
    assert_message("1 / 0", "Error at line 1, column 3: Division by zero.");
    assert_message("1 +\n  $x", "Error at line 2, column 3: Undefined variable $x.");
    assert_message("nope()", "Error at line 1, column 1: Call to undefined function nope().");
    assert_message("(1 + 2", "Error at line 1, column 1: Unbalanced parenthesis, '(' is never closed.");
    assert_message("match (5) { 1 => 2 }", "Error at line 1, column 1: Unhandled match case 5.");
    assert_message("* 3", "Error at line 1, column 1: Unknown unary operator '*'.");
    assert_message("1 + `", "Error at line 1, column 5: Unrecognized character: `");
}

#[test]
fn runtime_errors_report_the_failing_operator() {
    match fail("$a = 1\n+ 1 / 0") {
        Error::Runtime(RuntimeError::DivisionByZero { position }) => {
            assert_eq!((position.line, position.column), (2, 5));
        },
        other => panic!("expected division by zero, got {other:?}"),
    }
}

#[test]
fn host_function_errors_propagate() {
    let mut env = Environment::new();
    env.register_function("fail", |_, position| {
           Err(RuntimeError::Arithmetic { details: "host failure".to_string(),
                                          position })
       })
       .unwrap();

    let error = evaluate_source("1 + fail()", &PrecedenceTable::new(), &mut env).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Arithmetic);
    assert_eq!(error.to_string(), "Error at line 1, column 5: Arithmetic error: host failure.");
}

#[test]
fn failed_assignments_leave_variables_unchanged() {
    let table = PrecedenceTable::new();
    let mut env = Environment::new();
    let mut run = |source: &str| evaluate_source(source, &table, &mut env);

    run("$a = []").unwrap();
    assert_eq!(run("$a[][3] = 1").unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(run("$a === []").unwrap(), Value::Bool(true));

    run("$b = [1]").unwrap();
    assert_eq!(run("$b['k'][5] = 1").unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(run("$b === [1]").unwrap(), Value::Bool(true));

    run("$c = ['x' => null]").unwrap();
    assert_eq!(run("$c['y'][0]->p = 1").unwrap_err().kind(), ErrorKind::Type);
    assert_eq!(run("$c === ['x' => null]").unwrap(), Value::Bool(true));

    assert_eq!(run("$d[2] = 1").unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(run("$d ?? 'unbound'").unwrap(), Value::from("unbound"));
}
