use compact_str::CompactString;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The hashmap for keywords. Operators are matched as punctuation by the
/// scanner and must never appear here.
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("fn", TokenKind::Function);
    map.insert("let", TokenKind::Let);
    map.insert("if", TokenKind::If);
    map.insert("else", TokenKind::Else);
    map.insert("true", TokenKind::True);
    map.insert("false", TokenKind::False);
    map.insert("return", TokenKind::Return);
    map
});

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Let,
    Function,
    If,
    Else,
    True,
    False,
    Return,

    // Literals
    Ident,
    Number,
    Str,

    // Punctuation
    Semicolon,
    Colon,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // Arithmetic operators
    Plus,
    Minus,
    Asterisk,
    Slash,

    // Comparison operators
    Eq,
    NotEq,
    LessThan,
    LessThanEq,
    GreaterThan,
    GreaterThanEq,

    // Logical operators
    Bang,
    And,
    Or,

    // Bitwise operators
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,

    Assign,

    // End of input.
    Eof,
    // Reserved for unrecoverable scan failures; the scanner currently never
    // produces it because unknown bytes lex as identifier text.
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: CompactString,
    /// 0-based source line of the last byte of the lexeme.
    pub line: u32,
    /// 0-based column counter pointing at the last byte of the lexeme.
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<CompactString>, line: u32, column: u32) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new(TokenKind::Eof, "", 0, 0)
    }
}
