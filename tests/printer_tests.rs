use finch::expr::Expr;
use finch::printer::{print_ast, print_rpn, print_source};
use finch::stmt::Stmt;

fn expression(code: &str) -> Expr {
    let statements = finch::parse_source(&format!("{code};")).expect("test source should parse");
    match statements.into_iter().next() {
        Some(Stmt::Expression { expression }) => expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn prefix_form() {
    assert_eq!("(+ 1 (* 2 3))", print_ast(&expression("1 + 2 * 3")));
    assert_eq!("(* (group (+ 1 2.5)) 3)", print_ast(&expression("(1 + 2.5) * 3")));
    assert_eq!("(!= (! nil) false)", print_ast(&expression("!nil != false")));
    assert_eq!("(+ \"a\" \"b\")", print_ast(&expression("\"a\" + \"b\"")));
    assert_eq!("(= total (- total 1))", print_ast(&expression("total = total - 1")));
}

#[test]
fn postfix_form() {
    assert_eq!("1 2 3 * +", print_rpn(&expression("1 + 2 * 3")));
    assert_eq!("1 2 + 3 *", print_rpn(&expression("(1 + 2) * 3")));
    assert_eq!("1 ~ 2 -", print_rpn(&expression("-1 - 2")));
    assert_eq!("done !", print_rpn(&expression("!done")));
    assert_eq!("1 2 + a =", print_rpn(&expression("a = 1 + 2")));
}

#[test]
fn source_form() {
    assert_eq!("1 + 2 * 3", print_source(&expression("1+2*3")));
    assert_eq!("(1 + 2) * -3", print_source(&expression("( 1 + 2 )*-3")));
    assert_eq!("a = b = \"text\"", print_source(&expression("a=b=\"text\"")));
}

#[test]
fn printing_then_parsing_gives_the_same_tree() {
    let sources = [
        "1 + 2 * 3",
        "(1 + 2) * 3",
        "-1 - -2",
        "!(1 == 2) != false",
        "\"left\" + \"right\"",
        "1 < 2 == 3 >= 4",
        "nil == true",
        "2.5 / (4 - 1) / 0.125",
        "((1))",
    ];

    for source in sources {
        let original = expression(source);
        let reparsed = expression(&print_source(&original));

        assert_eq!(original, reparsed, "round trip of {source}");
        assert_eq!(print_ast(&original), print_ast(&reparsed));
    }
}

#[test]
fn overflowing_number_literal_survives_a_round_trip() {
    let huge = format!("1{}", "0".repeat(400));

    for source in [huge.clone(), format!("-{huge} + 1")] {
        let original = expression(&source);
        let printed = print_source(&original);
        let reparsed = expression(&printed);

        assert!(!printed.contains("Infinity"), "printed {printed}");
        assert_eq!(original, reparsed);
    }
}
