use std::io::{self, Write};

use finch::error::{Error, RuntimeError, RuntimeErrorKind};
use finch::Environment;

type TestResult = finch::Result<()>;

// run finch code using a fresh interpreter environment and return a string
// containing the program output
fn run(code: &str) -> finch::Result<String> {
    let mut buffer = Vec::new();
    let mut env = Environment::new(&mut buffer);
    finch::execute(code, &mut env)?;

    Ok(String::from_utf8(buffer).expect("program output should be utf-8"))
}

// run code that is expected to fail at runtime, returning the error and
// whatever was printed before it
fn run_failing(code: &str) -> (RuntimeError, String) {
    let mut buffer = Vec::new();
    let mut env = Environment::new(&mut buffer);
    let error = match finch::execute(code, &mut env) {
        Err(Error::Runtime(error)) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    };

    (error, String::from_utf8(buffer).expect("program output should be utf-8"))
}

#[test]
fn variable_scoping() -> TestResult {
    let code = "\
        var a = \"global a\";\n\
        var b = \"global b\";\n\
        var c = \"global c\";\n\
        {\n\
            var a = \"outer a\";\n\
            var b = \"outer b\";\n\
            {\n\
                var a = \"inner a\";\n\
                print a;\n\
                print b;\n\
                print c;\n\
            }\n\
            print a;\n\
            print b;\n\
            print c;\n\
        }\n\
        print a;\n\
        print b;\n\
        print c;";

    let output = run(code)?;

    let expected = "\
        inner a\n\
        outer b\n\
        global c\n\
        outer a\n\
        outer b\n\
        global c\n\
        global a\n\
        global b\n\
        global c\n";

    assert_eq!(expected, output);

    Ok(())
}

#[test]
fn reassignment() -> TestResult {
    let code = "\
        var a = \"original\";\n\
        a = \"updated\";\n\
        print a;";

    let output = run(code)?;
    assert_eq!("updated\n", output);

    Ok(())
}

#[test]
fn inner_declaration_shadows_without_mutating_outer() -> TestResult {
    let output = run("var a = 1; { var a = 2; print a; } print a;")?;
    assert_eq!("2\n1\n", output);

    Ok(())
}

#[test]
fn assignment_in_block_updates_enclosing_binding() -> TestResult {
    let output = run("var a = 1; { a = 2; { a = a + 1; } } print a;")?;
    assert_eq!("3\n", output);

    Ok(())
}

#[test]
fn redeclaring_a_global_replaces_it() -> TestResult {
    let output = run("var a = 1; var a = \"two\"; print a;")?;
    assert_eq!("two\n", output);

    Ok(())
}

#[test]
fn uninitialized_variable_is_nil() -> TestResult {
    let output = run("var a; print a;")?;
    assert_eq!("nil\n", output);

    Ok(())
}

#[test]
fn assignment_is_an_expression() -> TestResult {
    let code = "\
        var a;\n\
        var b;\n\
        a = b = 3;\n\
        print a;\n\
        print b;\n\
        print a = 5;";

    let output = run(code)?;
    assert_eq!("3\n3\n5\n", output);

    Ok(())
}

#[test]
fn arithmetic_precedence_and_associativity() -> TestResult {
    let code = "\
        print 1 + 2 * 3;\n\
        print (1 + 2) * 3;\n\
        print 10 - 4 - 3;\n\
        print 8 / 4 / 2;\n\
        print -3 + 1;";

    let output = run(code)?;
    assert_eq!("7\n9\n3\n1\n-2\n", output);

    Ok(())
}

#[test]
fn number_rendering() -> TestResult {
    let code = "\
        print 3;\n\
        print 2.5;\n\
        print 10 / 4;\n\
        print 0.1 + 0.2;\n\
        print 1 / 0;\n\
        print -1 / 0;";

    let output = run(code)?;
    assert_eq!("3\n2.5\n2.5\n0.30000000000000004\nInfinity\n-Infinity\n", output);

    Ok(())
}

#[test]
fn string_concatenation() -> TestResult {
    let output = run("var greeting = \"hello\"; print greeting + \", \" + \"world\";")?;
    assert_eq!("hello, world\n", output);

    Ok(())
}

#[test]
fn truthiness() -> TestResult {
    let output = run("print !nil; print !false; print !0; print !\"\"; print !true;")?;
    assert_eq!("true\ntrue\nfalse\nfalse\nfalse\n", output);

    Ok(())
}

#[test]
fn equality_never_errors() -> TestResult {
    let code = "\
        print 1 == \"1\";\n\
        print nil == nil;\n\
        print nil == false;\n\
        print \"a\" == \"a\";\n\
        print 1 != 2;\n\
        print true == true;\n\
        print 0 == false;";

    let output = run(code)?;
    assert_eq!("false\ntrue\nfalse\ntrue\ntrue\ntrue\nfalse\n", output);

    Ok(())
}

#[test]
fn comparison() -> TestResult {
    let output = run("print 1 < 2; print 2 <= 2; print 3 > 4; print 4 >= 5;")?;
    assert_eq!("true\ntrue\nfalse\nfalse\n", output);

    Ok(())
}

#[test]
fn assignment_requires_declaration() {
    let (error, _) = run_failing("x = 5;");
    assert_eq!(RuntimeErrorKind::UndefinedVariable("x".to_string()), error.kind);
    assert_eq!(1, error.line);
    assert_eq!("Undefined variable 'x'.\n[line 1]", error.to_string());
}

#[test]
fn reading_undefined_variable() {
    let (error, _) = run_failing("print 1;\nprint missing;");
    assert_eq!(RuntimeErrorKind::UndefinedVariable("missing".to_string()), error.kind);
    assert_eq!(2, error.line);
}

#[test]
fn addition_type_error() {
    let (error, _) = run_failing("1 + true;");
    assert_eq!(RuntimeErrorKind::AddOperands, error.kind);
    assert_eq!(1, error.line);
    assert!(error.to_string().contains("'+'"));
}

#[test]
fn subtraction_type_error_names_operator_and_line() {
    let (error, _) = run_failing("\n\n\"a\" - 1;");
    assert_eq!(RuntimeErrorKind::NumberOperands("-"), error.kind);
    assert_eq!(3, error.line);
    assert_eq!("Operands of '-' must be numbers.\n[line 3]", error.to_string());
}

#[test]
fn comparison_requires_numbers() {
    let (error, _) = run_failing("\"a\" < \"b\";");
    assert_eq!(RuntimeErrorKind::NumberOperands("<"), error.kind);
}

#[test]
fn negation_requires_number() {
    let (error, _) = run_failing("-\"a\";");
    assert_eq!(RuntimeErrorKind::NumberOperand("-"), error.kind);
    assert_eq!("Operand of '-' must be a number.\n[line 1]", error.to_string());
}

#[test]
fn runtime_error_stops_remaining_statements() {
    let (error, output) = run_failing("print 1;\nprint nope;\nprint 2;");
    assert_eq!(2, error.line);
    assert_eq!("1\n", output);
}

#[test]
fn block_scope_is_released_after_runtime_error() {
    let mut buffer = Vec::new();
    let mut env = Environment::new(&mut buffer);

    let code = "var a = \"global\"; { var a = \"inner\"; var b = 1; print c; }";
    let result = finch::execute(code, &mut env);
    assert!(matches!(result, Err(Error::Runtime(_))));

    assert_eq!(0, env.depth());
    assert_eq!(Some(&finch::value::Value::from("global")), env.get("a"));
    assert_eq!(None, env.get("b"));
}

#[test]
fn environment_persists_between_executions() -> TestResult {
    let mut buffer = Vec::new();
    let mut env = Environment::new(&mut buffer);

    finch::execute("var counter = 1;", &mut env)?;
    finch::execute("counter = counter + 1;", &mut env)?;
    finch::execute("print counter;", &mut env)?;
    drop(env);

    assert_eq!("2\n", String::from_utf8(buffer).expect("program output should be utf-8"));

    Ok(())
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn output_failure_is_a_runtime_error() {
    let mut sink = BrokenPipe;
    let mut env = Environment::new(&mut sink);

    let result = finch::execute("print 1 + 1;", &mut env);
    match result {
        Err(Error::Runtime(error)) => assert!(matches!(error.kind, RuntimeErrorKind::Output(_))),
        other => panic!("expected an output error, got {other:?}"),
    }
}

#[test]
fn output_failure_reports_the_print_line() {
    let mut sink = BrokenPipe;
    let mut env = Environment::new(&mut sink);

    match finch::execute("var a = 1;\n\nprint \"hi\";", &mut env) {
        Err(Error::Runtime(error)) => {
            assert!(matches!(error.kind, RuntimeErrorKind::Output(_)));
            assert_eq!(3, error.line);
            assert!(error.to_string().ends_with("\n[line 3]"));
        }
        other => panic!("expected an output error, got {other:?}"),
    }
}
