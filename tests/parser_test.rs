use rill::parser::{
    AssignTarget, Expression, Parser, ParserErrorKind, Root, Statement,
};

fn parse_program(input: &str) -> Root {
    let mut parser = Parser::new(input);
    let root = parser.parse().expect("no fatal scan errors");
    assert!(
        parser.errors.is_empty(),
        "unexpected parse errors for {input:?}: {:?}",
        parser.errors
    );
    root
}

fn parse_error_kinds(input: &str) -> Vec<ParserErrorKind> {
    let mut parser = Parser::new(input);
    parser.parse().expect("no fatal scan errors");
    assert!(!parser.errors.is_empty(), "expected parse errors for {input:?}");
    parser.errors.into_iter().map(|error| error.kind).collect()
}

fn first_expression(root: &Root) -> &Expression {
    match &root.statements[0] {
        Statement::Expression(statement) => &statement.expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn check_expression(input: &str, expected: &str) {
    let root = parse_program(input);
    assert_eq!(root.statements.len(), 1, "single statement for {input:?}");
    assert_eq!(
        first_expression(&root).to_string(),
        expected,
        "stringified tree for {input:?}"
    );
}

#[test]
fn test_arithmetic_precedence() {
    let cases = [
        ("a + b * c", "(a + (b * c))"),
        ("a - b - c", "((a - b) - c)"),
        ("a * b / c", "((a * b) / c)"),
        ("1 + 1 * 2 / 2", "(1 + ((1 * 2) / 2))"),
        ("(1 + 2) * 3", "((1 + 2) * 3)"),
        ("1 + (2 * 2) / 2", "(1 + ((2 * 2) / 2))"),
        ("-a + b", "(-(a) + b)"),
        ("!x && y", "(!(x) && y)"),
    ];

    for (input, expected) in cases {
        check_expression(input, expected);
    }
}

#[test]
fn test_comparison_and_logical_precedence() {
    let cases = [
        ("a == b && c != d", "((a == b) && (c != d))"),
        ("a || b && c", "(a || (b && c))"),
        ("a < b == c > d", "((a < b) == (c > d))"),
        ("a <= b || a >= c", "((a <= b) || (a >= c))"),
    ];

    for (input, expected) in cases {
        check_expression(input, expected);
    }
}

#[test]
fn test_bitwise_precedence() {
    let cases = [
        // Shifts bind tighter than | and &, looser than +.
        ("1 | 2 & 3", "(1 | (2 & 3))"),
        ("1 & 2 << 3", "(1 & (2 << 3))"),
        ("1 + 2 << 3", "((1 + 2) << 3)"),
        ("256 >> 7 < 256 >> 6", "((256 >> 7) < (256 >> 6))"),
        ("a == b & c", "(a == (b & c))"),
    ];

    for (input, expected) in cases {
        check_expression(input, expected);
    }
}

#[test]
fn test_call_and_index_precedence() {
    let cases = [
        ("add(1, 2 * 3)", "add(1,(2 * 3))"),
        ("a[0][1]", "a[0][1]"),
        ("-a[0]", "-(a[0])"),
        ("f(1)(2)", "f(1)(2)"),
        ("a[1 + 2]", "a[(1 + 2)]"),
    ];

    for (input, expected) in cases {
        check_expression(input, expected);
    }
}

#[test]
fn test_assignment() {
    let cases = [
        ("a = 1 + 2", "a=(1 + 2)"),
        ("a[0] = 10", "a[0]=10"),
        ("counter = counter + 1", "counter=(counter + 1)"),
    ];

    for (input, expected) in cases {
        check_expression(input, expected);
    }

    let root = parse_program("a[0] = 10");
    let Expression::Assign(assign) = first_expression(&root) else {
        panic!("expected an assignment");
    };
    assert!(matches!(assign.target, AssignTarget::Index(_)));
}

#[test]
fn test_let_statement() {
    let root = parse_program("let a = 10;");
    assert_eq!(root.statements.len(), 1);
    let Statement::Let(statement) = &root.statements[0] else {
        panic!("expected a let statement, got {:?}", root.statements[0]);
    };
    assert_eq!(statement.name.name, "a");
    assert!(matches!(statement.value, Expression::Integer(ref lit) if lit.value == 10));
}

#[test]
fn test_bare_return_before_brace_is_nil() {
    let root = parse_program("{ return }");
    let Statement::Block(block) = &root.statements[0] else {
        panic!("expected a block statement");
    };
    let Statement::Return(statement) = &block.statements[0] else {
        panic!("expected a return statement");
    };
    assert!(matches!(statement.value, Expression::Nil(_)));
}

#[test]
fn test_if_else() {
    let root = parse_program("if a > 10 { a } else { a = 2000 a }");
    let Expression::If(expr) = first_expression(&root) else {
        panic!("expected an if expression");
    };
    assert_eq!(expr.condition.to_string(), "(a > 10)");
    assert_eq!(expr.consequence.statements.len(), 1);
    let alternative = expr.alternative.as_ref().expect("else branch parsed");
    assert_eq!(alternative.statements.len(), 2);
}

#[test]
fn test_if_with_parenthesised_condition() {
    let root = parse_program("if (1 == 1) { 10 }");
    let Expression::If(expr) = first_expression(&root) else {
        panic!("expected an if expression");
    };
    assert_eq!(expr.condition.to_string(), "(1 == 1)");
    assert!(expr.alternative.is_none());
}

#[test]
fn test_function_parameters() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn () {}", &[]),
        ("fn (a) { a }", &["a"]),
        ("fn (b, c) {}", &["b", "c"]),
    ];

    for (input, expected) in cases {
        let root = parse_program(input);
        let Expression::Function(function) = first_expression(&root) else {
            panic!("expected a function expression for {input:?}");
        };
        let names: Vec<&str> = function
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        assert_eq!(names, expected, "parameters of {input:?}");
    }
}

#[test]
fn test_array_literal() {
    let root = parse_program("[1, 2 * 2, \"three\"]");
    let Expression::Array(array) = first_expression(&root) else {
        panic!("expected an array literal");
    };
    assert_eq!(array.elements.len(), 3);
    assert_eq!(array.elements[1].to_string(), "(2 * 2)");

    let root = parse_program("[]");
    let Expression::Array(array) = first_expression(&root) else {
        panic!("expected an array literal");
    };
    assert!(array.elements.is_empty());
}

#[test]
fn test_hashmap_literal() {
    let root = parse_program(r#"let a = {"a": "b", 1: 2};"#);
    let Statement::Let(statement) = &root.statements[0] else {
        panic!("expected a let statement");
    };
    let Expression::HashMap(map) = &statement.value else {
        panic!("expected a hashmap literal");
    };
    assert_eq!(map.pairs.len(), 2);
    assert_eq!(map.pairs[0].0.to_string(), "\"a\"");
    assert_eq!(map.pairs[1].1.to_string(), "2");

    let root = parse_program("let a = {};");
    let Statement::Let(statement) = &root.statements[0] else {
        panic!("expected a let statement");
    };
    assert!(matches!(&statement.value, Expression::HashMap(map) if map.pairs.is_empty()));
}

#[test]
fn test_empty_braces_in_statement_position_are_a_block() {
    let root = parse_program("{}");
    assert!(matches!(&root.statements[0], Statement::Block(block) if block.statements.is_empty()));
}

#[test]
fn test_stray_semicolons() {
    let root = parse_program("; ; 5 ;;");
    assert_eq!(root.statements.len(), 1);
    assert_eq!(first_expression(&root).to_string(), "5");
}

#[test]
fn test_statements_without_semicolons() {
    let root = parse_program("let a = 10 if a > 10 { a } a");
    assert_eq!(root.statements.len(), 3);
    assert!(matches!(root.statements[0], Statement::Let(_)));
    assert!(matches!(root.statements[1], Statement::Expression(_)));
    assert!(matches!(root.statements[2], Statement::Expression(_)));
}

#[test]
fn test_restringified_trees_reparse() {
    let cases = [
        "1 + 1 * 2 / 2",
        "let a = 10;\na",
        "let a = [1,2,3]; a[0] = 10; a[0]",
        r#"let a = {"a": "b"}; a["a"] = "c"; a["a"]"#,
        "let factor = fn(n) { if n == 1 { return 1 } return n*factor(n-1) } factor(5)",
        "let count = fn() { let counter = 0; return fn() { counter = counter + 1; return counter } }",
        "if (256 >> 7 < 256 >> 6) { \"shift\" } else { \"no shift\" }",
        "let negated = -5; !true",
    ];

    for input in cases {
        let first = parse_program(input);
        let printed = first.to_string();
        let second = parse_program(&printed);
        assert_eq!(
            printed,
            second.to_string(),
            "reparse of the stringified tree diverged for {input:?}"
        );
    }
}

#[test]
fn test_missing_prefix_parser() {
    let kinds = parse_error_kinds("+ 5");
    assert!(kinds.contains(&ParserErrorKind::MissingPrefixParser), "{kinds:?}");
}

#[test]
fn test_let_requires_identifier() {
    let kinds = parse_error_kinds("let 1 = 2");
    assert!(kinds.contains(&ParserErrorKind::ExpectedIdentifier), "{kinds:?}");
}

#[test]
fn test_invalid_assignment_target() {
    let kinds = parse_error_kinds("1 = 2");
    assert!(
        kinds.contains(&ParserErrorKind::InvalidAssignmentTarget),
        "{kinds:?}"
    );
}

#[test]
fn test_unclosed_block() {
    let kinds = parse_error_kinds("{ let a = 10");
    assert!(kinds.contains(&ParserErrorKind::UnexpectedEof), "{kinds:?}");
}

#[test]
fn test_hashmap_requires_colon() {
    let kinds = parse_error_kinds("let a = {1 2}");
    assert!(kinds.contains(&ParserErrorKind::ExpectedColon), "{kinds:?}");
}

#[test]
fn test_function_parameter_must_be_identifier() {
    let kinds = parse_error_kinds("fn (1) {}");
    assert!(kinds.contains(&ParserErrorKind::ExpectedIdentifier), "{kinds:?}");
}

#[test]
fn test_integer_overflow_is_a_parse_error() {
    let kinds = parse_error_kinds("99999999999999999999");
    assert!(kinds.contains(&ParserErrorKind::InvalidInteger), "{kinds:?}");
}

#[test]
fn test_errors_accumulate_across_statements() {
    let mut parser = Parser::new("let 1 = 2; let 3 = 4");
    parser.parse().expect("no fatal scan errors");
    let identifier_errors = parser
        .errors
        .iter()
        .filter(|error| error.kind == ParserErrorKind::ExpectedIdentifier)
        .count();
    assert_eq!(identifier_errors, 2, "{:?}", parser.errors);
}

#[test]
fn test_parse_errors_carry_positions() {
    let mut parser = Parser::new("let 1 = 2");
    parser.parse().expect("no fatal scan errors");
    let error = &parser.errors[0];
    assert_eq!(error.kind, ParserErrorKind::ExpectedIdentifier);
    assert_eq!(error.token.line, 0);
    assert_eq!(error.token.column, 5);
}

#[test]
fn test_unterminated_string_is_fatal() {
    let mut parser = Parser::new("let a = \"abc");
    let error = parser.parse().expect_err("scan failure aborts the parse");
    assert!(error.is_fatal());
    assert!(matches!(error.kind, ParserErrorKind::Lexical(_)));
}
