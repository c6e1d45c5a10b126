use std::{cell::Cell, fs, rc::Rc};

use opal::{Environment, Error, ErrorKind, PrecedenceTable, Value, evaluate_source};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

/// Runs every line of `script` in one environment and returns the value of
/// the last line.
fn run_in(env: &mut Environment, script: &str) -> Result<Value, Error> {
    let table = PrecedenceTable::new();
    let mut last = Value::Null;

    for line in script.lines().map(str::trim).filter(|line| !line.is_empty()) {
        last = evaluate_source(line, &table, env)?;
    }

    Ok(last)
}

fn run(script: &str) -> Result<Value, Error> {
    run_in(&mut Environment::new(), script)
}

fn assert_success(script: &str) {
    match run(script) {
        Ok(Value::Bool(true)) => {},
        Ok(other) => panic!("Script evaluated to {other}, expected true:\n{script}"),
        Err(e) => panic!("Script failed: {e}\n{script}"),
    }
}

fn assert_value(source: &str, expected: Value) {
    match run(source) {
        Ok(value) => assert_eq!(value, expected, "{source}"),
        Err(e) => panic!("`{source}` failed: {e}"),
    }
}

fn assert_failure(source: &str, kind: ErrorKind) {
    match run(source) {
        Ok(value) => panic!("`{source}` evaluated to {value} but was expected to fail"),
        Err(e) => assert_eq!(e.kind(), kind, "`{source}` failed with: {e}"),
    }
}

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, block) in extract_blocks(&content).into_iter().enumerate() {
            count += 1;
            let mut env = Environment::new();
            let code = block.code.trim_end();
            let (setup, last) = code.rsplit_once('\n').unwrap_or(("", code));

            if let Err(e) = run_in(&mut env, setup) {
                panic!("Setup of example {} in {:?} failed:\n{}\nError: {e}",
                       i + 1,
                       path,
                       block.code);
            }

            let result = run_in(&mut env, last);
            match (block.expect_error, result) {
                (false, Ok(Value::Bool(true))) | (true, Err(_)) => {},
                (false, Ok(other)) => {
                    panic!("Example {} in {:?} evaluated to {other}, expected true:\n{}",
                           i + 1,
                           path,
                           block.code)
                },
                (false, Err(e)) => {
                    panic!("Example {} in {:?} failed:\n{}\nError: {e}", i + 1, path, block.code)
                },
                (true, Ok(value)) => {
                    panic!("Example {} in {:?} evaluated to {value} but should fail:\n{}",
                           i + 1,
                           path,
                           block.code)
                },
            }
        }
    }

    assert!(count > 0, "No opal examples found in book/src");
}

struct Block {
    code:         String,
    expect_error: bool,
}

fn extract_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if current.is_none() && trimmed.starts_with("```opal") {
            let expect_error = trimmed.trim_end() == "```opal-error";
            current = Some(Block { code: String::new(),
                                   expect_error });
            continue;
        }
        if trimmed.starts_with("```") {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        if let Some(block) = current.as_mut() {
            block.code.push_str(line);
            block.code.push('\n');
        }
    }

    blocks
}

#[test]
fn arithmetic_and_numeric_coercion() {
    assert_value("2 + 3 * 4", Value::Int(14));
    assert_value("10 - 5 - 2", Value::Int(3));
    assert_value("2 ** 3 ** 2", Value::Int(512));
    assert_value("-2 ** 2", Value::Int(-4));
    assert_value("7 / 2", Value::Float(3.5));
    assert_value("6 / 3", Value::Int(2));
    assert_value("7 % 3", Value::Int(1));
    assert_value("-7 % 3", Value::Int(-1));
    assert_value("7.5 % 2", Value::Int(1));
    assert_value("2 ** -1", Value::Float(0.5));
    assert_value("'5' + '3'", Value::Int(8));
    assert_value("'1.5' + 1", Value::Float(2.5));
    assert_value("'12abc' + 1", Value::Int(13));
    assert_value("null + 1", Value::Int(1));
    assert_value("true + true", Value::Int(2));
    assert_value("0x1F + 0b11 + 0o17", Value::Int(49));
}

#[test]
fn integer_overflow_promotes_to_float() {
    assert_success("gettype(PHP_INT_MAX + 1) === 'double'");
    assert_success("gettype(PHP_INT_MAX * 2) === 'double'");
    assert_success("gettype(2 ** 63) === 'double'");
    assert_success("gettype(2 ** 62) === 'integer'");
    assert_success("PHP_INT_MIN === -PHP_INT_MAX - 1");
}

#[test]
fn string_concatenation() {
    assert_value("'a' . 'b'", Value::from("ab"));
    assert_value("1 . 2", Value::from("12"));
    assert_value("'x' . 2.0", Value::from("x2"));
    assert_value("true . null", Value::from("1"));
    assert_value("'a' . 1 + 2", Value::from("a3"));
    assert_value(r#""a\tb""#, Value::from("a\tb"));
    assert_value(r"'it\'s'", Value::from("it's"));
    assert_value(r#""\u{1F600}""#, Value::from("\u{1F600}"));
}

#[test]
fn loose_and_strict_comparisons() {
    assert_success("10 == '10'");
    assert_success("10 !== '10'");
    assert_success("'abc' != 0");
    assert_success("null == false");
    assert_success("'1e3' == '1000'");
    assert_success("[1, 2] == [1, 2]");
    assert_success("'abc' < 'abd'");
    assert_success("1 < 2 == true");
    assert_success("1 <> 2");
    assert_success("NAN == NAN");
    assert_success("NAN !== NAN");
    assert_value("1 <=> 2", Value::Int(-1));
    assert_value("1.5 <=> 1.5", Value::Int(0));
    assert_value("'b' <=> 'a'", Value::Int(1));
}

#[test]
fn logical_operators() {
    assert_value("true && false", Value::Bool(false));
    assert_value("0 || 'a'", Value::Bool(true));
    assert_value("true xor true", Value::Bool(false));
    assert_value("!0", Value::Bool(true));
    assert_value("false && undefined_function()", Value::Bool(false));
    assert_value("true || undefined_function()", Value::Bool(true));

    let mut env = Environment::new();
    assert_eq!(run_in(&mut env, "$x = true and false"), Ok(Value::Bool(false)));
    assert_eq!(env.get("x"), Some(&Value::Bool(true)));
}

#[test]
fn short_circuit_skips_calls() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);

    let mut env = Environment::new();
    env.register_function("tick", move |_, _| {
           counter.set(counter.get() + 1);
           Ok(Value::Bool(true))
       })
       .unwrap();

    run_in(&mut env, "false && tick()\ntrue || tick()\n1 ?? tick()\nfalse and tick()").unwrap();
    assert_eq!(calls.get(), 0);

    run_in(&mut env, "true && tick()\nnull ?? tick()").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn null_coalescing() {
    assert_value("null ?? null ?? 5", Value::Int(5));
    assert_value("0 ?? 5", Value::Int(0));
    assert_value("$undefined ?? 'default'", Value::from("default"));
    assert_value("[1, 2][5] ?? 'missing'", Value::from("missing"));
    assert_value("['a' => 1]['b'] ?? 2", Value::Int(2));
    assert_value("$o = null\n$o?->x ?? 3", Value::Int(3));
    assert_value("$p = ['a' => ['b' => 7]]\n$p->a->c ?? $p->a->b", Value::Int(7));
}

#[test]
fn bitwise_operators() {
    assert_value("6 & 3", Value::Int(2));
    assert_value("6 | 3", Value::Int(7));
    assert_value("6 ^ 3", Value::Int(5));
    assert_value("~5", Value::Int(-6));
    assert_value("1 << 3", Value::Int(8));
    assert_value("-16 >> 2", Value::Int(-4));
    assert_value("1 << 64", Value::Int(0));
    assert_value("'6' & 3", Value::Int(2));
    assert_failure("1.5 & 1", ErrorKind::Type);
    assert_failure("1 << -1", ErrorKind::Arithmetic);
}

#[test]
fn assignment_forms() {
    let mut env = Environment::new();
    assert_eq!(run_in(&mut env, "$a = $b = 3"), Ok(Value::Int(3)));
    assert_eq!(env.get("a"), Some(&Value::Int(3)));
    assert_eq!(env.get("b"), Some(&Value::Int(3)));

    assert_success("$a = 1\n$a += 2\n$a === 3");
    assert_success("$a = 2\n$a **= 10\n$a === 1024");
    assert_success("$s = 'ab'\n$s .= 'c'\n$s === 'abc'");
    assert_success("$n ??= 5\n$n === 5");
    assert_success("$n = 1\n$n ??= undefined_function()\n$n === 1");
    assert_success("$t = true\n$t && $u = 5\n$u === 5");
    assert_success("$a = 3\n$a + $b = 4\n$b === 4");
}

#[test]
fn array_and_object_writes() {
    assert_success("$arr = [1, 2, 3]\n$arr[] = 4\n$arr === [1, 2, 3, 4]");
    assert_success("$arr = [1, 2]\n$arr[1] = 5\n$arr === [1, 5]");
    assert_success("$m['k'] = 1\n$m === ['k' => 1]");
    assert_success("$grid = []\n$grid[0][] = 5\n$grid === [[5]]");
    assert_success("$o = ['x' => 1]\n$o->x = 2\n$o->x === 2");
    assert_success("$list = [1]\n$list['name'] = 2\n$list === ['0' => 1, 'name' => 2]");
    assert_success("$keys = ['3' => 'a']\n$keys[] = 'b'\n$keys === ['3' => 'a', '4' => 'b']");
    assert_failure("$arr = [1]\n$arr[5] = 2", ErrorKind::IndexOutOfBounds);
    assert_failure("$n = 5\n$n->x = 1", ErrorKind::Type);
}

#[test]
fn values_are_copied_on_assignment() {
    assert_success("$a = [1, 2]\n$b = $a\n$b[0] = 9\n$a[0] === 1");
    assert_success("$a = ['k' => [1]]\n$b = $a\n$b->k[] = 2\ncount($a->k) === 1");
}

#[test]
fn increments_and_decrements() {
    let mut env = Environment::new();
    assert_eq!(run_in(&mut env, "$i = 5\n$i++"), Ok(Value::Int(5)));
    assert_eq!(run_in(&mut env, "$i"), Ok(Value::Int(6)));
    assert_eq!(run_in(&mut env, "++$i"), Ok(Value::Int(7)));
    assert_eq!(run_in(&mut env, "$i--"), Ok(Value::Int(7)));
    assert_eq!(run_in(&mut env, "--$i"), Ok(Value::Int(5)));

    assert_success("$n = null\n$n++\n$n === 1");
    assert_success("$m = null\n--$m\n$m === null");
    assert_success("$s = 'a'\n++$s\n$s === 'b'");
    assert_success("$s = 'Az'\n++$s\n$s === 'Ba'");
    assert_success("$s = 'zz'\n++$s\n$s === 'aaa'");
    assert_success("$q = '5'\n++$q\n$q === 6");
    assert_success("$arr = [1]\n$arr[0]++\n$arr === [2]");
    assert_failure("$never++", ErrorKind::UnboundName);
    assert_failure("$arr = []\n$arr++", ErrorKind::Type);
}

#[test]
fn casts() {
    assert_value("(int) '12abc'", Value::Int(12));
    assert_value("(int) 3.99", Value::Int(3));
    assert_value("(integer) -3.99", Value::Int(-3));
    assert_value("(float) '1.5'", Value::Float(1.5));
    assert_value("(string) 1.0", Value::from("1"));
    assert_value("(bool) '0'", Value::Bool(false));
    assert_value("(bool) '0.0'", Value::Bool(true));
    assert_value("(array) 5", Value::from(vec![Value::Int(5)]));
    assert_value("(array) null", Value::from(Vec::<Value>::new()));
    assert_value("(object) ['a', 'b']",
                 Value::from(vec![("0".to_string(), Value::from("a")),
                                  ("1".to_string(), Value::from("b"))]));
}

#[test]
fn type_operators() {
    assert_success("5 instanceof int");
    assert_success("5 instanceof integer");
    assert_success("'x' instanceof string");
    assert_success("null instanceof null");
    assert_success("[1] instanceof array");
    assert_success("['a' => 1] instanceof object");
    assert_success("!(1.5 instanceof int)");
    assert_success("$t = 'float'\n1.5 instanceof $t");
    assert_success("!(1 instanceof Widget)");
    assert_success("gettype(1.5) === 'double'");
    assert_failure("1 instanceof 2", ErrorKind::Type);
}

#[test]
fn nullsafe_access() {
    assert_value("$o = null\n$o?->a->b", Value::Null);
    assert_value("$p = ['a' => ['b' => 2]]\n$p?->a?->b", Value::Int(2));
    assert_failure("$o = null\n$o->a", ErrorKind::Type);
    assert_failure("$p = ['a' => 1]\n$p?->b", ErrorKind::UndefinedKey);
}

#[test]
fn spread_in_literals_and_calls() {
    assert_success("[1, ...[2, 3], 4] === [1, 2, 3, 4]");
    assert_success("count([...[1, 2], ...[3]]) === 3");
    assert_success("max(...[1, 5, 3]) === 5");
    assert_success("[...['a' => 1], ...['a' => 2, 'b' => 3]] === ['a' => 2, 'b' => 3]");
    assert_success("['x' => 1, ...[5, 6]] === ['x' => 1, '0' => 5, '1' => 6]");
    assert_failure("[...5]", ErrorKind::Type);
    assert_failure("count(...'abc')", ErrorKind::Type);
}

#[test]
fn array_union_with_plus() {
    assert_success("[1, 2] + [3, 4, 5] === [1, 2, 5]");
    assert_success("['a' => 1] + ['a' => 2, 'b' => 3] === ['a' => 1, 'b' => 3]");
    assert_failure("[1] + 1", ErrorKind::Type);
}

#[test]
fn match_expressions() {
    assert_value("match (2) { 1 => 'one', 2, 3 => 'few', default => 'many' }",
                 Value::from("few"));
    assert_value("match ('2') { 2 => 'int', default => 'other' }", Value::from("other"));
    assert_value("match (1) { 1 => 'ok', 2 => undefined_function() }", Value::from("ok"));
    assert_value("match (true) { 1 > 2 => 'a', 2 > 1 => 'b', }", Value::from("b"));
    assert_failure("match (5) { 1 => 'one' }", ErrorKind::UnhandledMatch);
}

#[test]
fn ternary_grouping() {
    assert_value("true ? 'a' : false ? 'b' : 'c'", Value::from("b"));
    assert_value("0 ?: 'fallback'", Value::from("fallback"));
    assert_value("'set' ?: 'x'", Value::from("set"));
    assert_value("true ? 1 : undefined_function()", Value::Int(1));

    let right = PrecedenceTable::new()
        .with_ternary_associativity(opal::interpreter::precedence::Associativity::Right);
    let value = evaluate_source("true ? 'a' : false ? 'b' : 'c'", &right, &mut Environment::new());
    assert_eq!(value, Ok(Value::from("a")));
}

#[test]
fn builtin_functions() {
    assert_success("abs(-5) === 5");
    assert_success("intdiv(7, 2) === 3");
    assert_success("fmod(7.5, 2) === 1.5");
    assert_success("min(3, 1, 2) === 1");
    assert_success("max([4, 9, 2]) === 9");
    assert_success("floor(2.7) === 2.0");
    assert_success("ceil(2.1) === 3.0");
    assert_success("round(2.5) === 3.0");
    assert_success("sqrt(16) === 4.0");
    assert_success("strlen('hello') === 5");
    assert_success("strtoupper('abc') === 'ABC'");
    assert_success("STRTOLOWER('ABC') === 'abc'");
    assert_success("str_repeat('ab', 3) === 'ababab'");
    assert_success("implode(', ', [1, 2, 3]) === '1, 2, 3'");
    assert_success("array_keys(['a' => 1, '7' => 2]) === ['a', 7]");
    assert_success("array_values(['a' => 1]) === [1]");
    assert_success("count([]) === 0");
    assert_success("is_null(null)");
    assert_success("is_numeric('1e3')");
    assert_success("!is_numeric('abc')");
    assert_failure("intdiv(1, 0)", ErrorKind::DivisionByZero);
    assert_failure("strlen()", ErrorKind::ArgumentCount);
    assert_failure("str_repeat('a', -1)", ErrorKind::Arithmetic);
}

#[test]
fn host_functions() {
    let mut env = Environment::new();
    env.register_function("double", |args, position| {
           let n = args.first().map_or(Ok(0), |v| v.to_number(position).map(|n| n.to_f64() as i64))?;
           Ok(Value::Int(n * 2))
       })
       .unwrap();

    assert_eq!(run_in(&mut env, "double(21)"), Ok(Value::Int(42)));
    assert_eq!(run_in(&mut env, "DOUBLE(1)"), Ok(Value::Int(2)));
    assert_eq!(run_in(&mut env, "$f = 'double'\n$f(4)"), Ok(Value::Int(8)));

    let redefined = env.register_function("Count", |_, _| Ok(Value::Null));
    assert!(redefined.is_err());
    assert_eq!(Error::from(redefined.unwrap_err()).kind(), ErrorKind::Redefinition);
}
