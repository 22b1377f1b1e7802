use proptest::prelude::*;
use rill::lexer::{Lexer, LexicalErrorKind, Token, TokenKind};

fn scan_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().expect("input scans without errors");
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}

fn check_kinds(input: &str, expected: &[(TokenKind, &str)]) {
    let tokens = scan_all(input);
    assert_eq!(
        tokens.len(),
        expected.len() + 1,
        "wrong token count for {input:?}: {tokens:?}"
    );
    for (i, (kind, literal)) in expected.iter().enumerate() {
        assert_eq!(tokens[i].kind, *kind, "token {i} of {input:?}");
        assert_eq!(tokens[i].literal, *literal, "token {i} of {input:?}");
    }
    assert_eq!(tokens.last().expect("scan_all yields Eof").kind, TokenKind::Eof);
}

#[test]
fn test_single_tokens() {
    let cases = [
        ("=", TokenKind::Assign),
        (";", TokenKind::Semicolon),
        (":", TokenKind::Colon),
        (",", TokenKind::Comma),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Asterisk),
        ("/", TokenKind::Slash),
        ("!", TokenKind::Bang),
        ("<", TokenKind::LessThan),
        (">", TokenKind::GreaterThan),
        ("&", TokenKind::BitAnd),
        ("|", TokenKind::BitOr),
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        ("{", TokenKind::LeftBrace),
        ("}", TokenKind::RightBrace),
        ("[", TokenKind::LeftBracket),
        ("]", TokenKind::RightBracket),
    ];

    for (input, kind) in cases {
        check_kinds(input, &[(kind, input)]);
    }
}

#[test]
fn test_two_byte_operators() {
    let cases = [
        ("==", TokenKind::Eq),
        ("!=", TokenKind::NotEq),
        ("<=", TokenKind::LessThanEq),
        (">=", TokenKind::GreaterThanEq),
        ("&&", TokenKind::And),
        ("||", TokenKind::Or),
        ("<<", TokenKind::ShiftLeft),
        (">>", TokenKind::ShiftRight),
    ];

    for (input, kind) in cases {
        check_kinds(input, &[(kind, input)]);
    }
}

#[test]
fn test_keywords() {
    check_kinds(
        "fn let if else true false return",
        &[
            (TokenKind::Function, "fn"),
            (TokenKind::Let, "let"),
            (TokenKind::If, "if"),
            (TokenKind::Else, "else"),
            (TokenKind::True, "true"),
            (TokenKind::False, "false"),
            (TokenKind::Return, "return"),
        ],
    );
}

#[test]
fn test_multiple_tokens() {
    check_kinds(
        r#"arr= []; 5/2 true, false "hello world!""#,
        &[
            (TokenKind::Ident, "arr"),
            (TokenKind::Assign, "="),
            (TokenKind::LeftBracket, "["),
            (TokenKind::RightBracket, "]"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Number, "5"),
            (TokenKind::Slash, "/"),
            (TokenKind::Number, "2"),
            (TokenKind::True, "true"),
            (TokenKind::Comma, ","),
            (TokenKind::False, "false"),
            (TokenKind::Str, "hello world!"),
        ],
    );
}

#[test]
fn test_shift_operators_next_to_comparisons() {
    check_kinds(
        "256 >> 7 < 256 >> 6",
        &[
            (TokenKind::Number, "256"),
            (TokenKind::ShiftRight, ">>"),
            (TokenKind::Number, "7"),
            (TokenKind::LessThan, "<"),
            (TokenKind::Number, "256"),
            (TokenKind::ShiftRight, ">>"),
            (TokenKind::Number, "6"),
        ],
    );
}

#[test]
fn test_line_and_column_count() {
    let tokens = scan_all("let a = 10;");
    let positions: Vec<(u32, u32)> = tokens.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(positions, [(0, 3), (0, 5), (0, 7), (0, 10), (0, 11), (0, 11)]);
}

#[test]
fn test_positions_after_comment_line() {
    let tokens = scan_all("//comment a\nlet abc_aaa ==  != 10;");
    let expected = [
        (TokenKind::Let, "let", 1, 3),
        (TokenKind::Ident, "abc_aaa", 1, 11),
        (TokenKind::Eq, "==", 1, 14),
        (TokenKind::NotEq, "!=", 1, 18),
        (TokenKind::Number, "10", 1, 21),
        (TokenKind::Semicolon, ";", 1, 22),
        (TokenKind::Eof, "", 1, 22),
    ];

    assert_eq!(tokens.len(), expected.len());
    for (token, (kind, literal, line, column)) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
        assert_eq!(token.literal, literal);
        assert_eq!((token.line, token.column), (line, column));
    }
}

#[test]
fn test_comment_only_input() {
    let tokens = scan_all("// nothing here");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("1");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number);
    for _ in 0..3 {
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn test_string_literal_drops_quotes() {
    let tokens = scan_all(r#""hello""#);
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].literal, "hello");
    assert_eq!(tokens[0].column, 7);
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new(r#""abc"#);
    let error = lexer.next_token().expect_err("string never closes");
    assert_eq!(error.kind, LexicalErrorKind::UnterminatedString);
}

#[test]
fn test_keyword_prefixed_identifier() {
    check_kinds(
        "letter iffy return_value",
        &[
            (TokenKind::Ident, "letter"),
            (TokenKind::Ident, "iffy"),
            (TokenKind::Ident, "return_value"),
        ],
    );
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = (&'static str, TokenKind)> {
    prop_oneof![
        Just(("+", TokenKind::Plus)),
        Just(("-", TokenKind::Minus)),
        Just(("*", TokenKind::Asterisk)),
        Just(("/", TokenKind::Slash)),
        Just(("==", TokenKind::Eq)),
        Just(("!=", TokenKind::NotEq)),
        Just(("<", TokenKind::LessThan)),
        Just(("<=", TokenKind::LessThanEq)),
        Just((">", TokenKind::GreaterThan)),
        Just((">=", TokenKind::GreaterThanEq)),
        Just(("&&", TokenKind::And)),
        Just(("&", TokenKind::BitAnd)),
        Just(("||", TokenKind::Or)),
        Just(("|", TokenKind::BitOr)),
        Just(("<<", TokenKind::ShiftLeft)),
        Just((">>", TokenKind::ShiftRight)),
        Just(("=", TokenKind::Assign)),
        Just(("!", TokenKind::Bang)),
        Just((";", TokenKind::Semicolon)),
        Just((",", TokenKind::Comma)),
        Just(("(", TokenKind::LeftParen)),
        Just((")", TokenKind::RightParen)),
        Just(("[", TokenKind::LeftBracket)),
        Just(("]", TokenKind::RightBracket)),
    ]
}

proptest! {
    #[test]
    fn scanning_always_reaches_eof(input in "[ -~\t\n]{0,100}") {
        let mut lexer = Lexer::new(&input);
        let mut steps = 0usize;
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Eof => break,
                Ok(_) => {}
                Err(error) => {
                    prop_assert_eq!(error.kind, LexicalErrorKind::UnterminatedString);
                    break;
                }
            }
            steps += 1;
            prop_assert!(steps <= input.len() + 1);
        }
    }

    #[test]
    fn symbol_streams_scan_exactly(symbols in prop::collection::vec(symbol_strategy(), 0..40)) {
        let input = symbols
            .iter()
            .map(|(literal, _)| *literal)
            .collect::<Vec<_>>()
            .join(" ");
        let mut lexer = Lexer::new(&input);
        for (literal, kind) in &symbols {
            let token = lexer.next_token().unwrap();
            prop_assert_eq!(token.kind, *kind);
            prop_assert_eq!(token.literal.as_str(), *literal);
        }
        prop_assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn identifiers_scan_whole(name in "[a-z_][a-z0-9_]{0,12}") {
        let mut lexer = Lexer::new(&name);
        let token = lexer.next_token().unwrap();
        prop_assert_eq!(token.literal.as_str(), name.as_str());
        prop_assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn numbers_scan_whole(digits in "[0-9]{1,18}") {
        let mut lexer = Lexer::new(&digits);
        let token = lexer.next_token().unwrap();
        prop_assert_eq!(token.kind, TokenKind::Number);
        prop_assert_eq!(token.literal.as_str(), digits.as_str());
    }
}
