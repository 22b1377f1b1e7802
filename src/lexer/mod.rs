mod error;
mod token;

pub use error::{LexicalError, LexicalErrorKind};
pub use token::{Token, TokenKind, KEYWORD_HASHMAP};

/// Single-pass scanner over a borrowed source string, pulled one token at a
/// time by the parser. Positions follow the convention that a token reports
/// the line/column of the last byte of its lexeme; a newline resets the
/// column counter to 0 and bumps the line.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// Scans the next token. Yields `Eof` tokens indefinitely once the input
    /// is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            self.skip_whitespace();
            let Some(cur) = self.bump() else {
                return Ok(Token::new(TokenKind::Eof, "", self.line, self.column));
            };

            if cur == b'/' && self.peek() == Some(b'/') {
                self.skip_line();
                continue;
            }

            return self.scan_token(cur);
        }
    }

    fn scan_token(&mut self, cur: u8) -> Result<Token, LexicalError> {
        let token = match cur {
            b'*' => self.token(TokenKind::Asterisk, "*"),
            b'/' => self.token(TokenKind::Slash, "/"),
            b'+' => self.token(TokenKind::Plus, "+"),
            b'-' => self.token(TokenKind::Minus, "-"),
            b';' => self.token(TokenKind::Semicolon, ";"),
            b':' => self.token(TokenKind::Colon, ":"),
            b',' => self.token(TokenKind::Comma, ","),
            b'(' => self.token(TokenKind::LeftParen, "("),
            b')' => self.token(TokenKind::RightParen, ")"),
            b'{' => self.token(TokenKind::LeftBrace, "{"),
            b'}' => self.token(TokenKind::RightBrace, "}"),
            b'[' => self.token(TokenKind::LeftBracket, "["),
            b']' => self.token(TokenKind::RightBracket, "]"),
            b'=' => {
                if self.eat(b'=') {
                    self.token(TokenKind::Eq, "==")
                } else {
                    self.token(TokenKind::Assign, "=")
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    self.token(TokenKind::NotEq, "!=")
                } else {
                    self.token(TokenKind::Bang, "!")
                }
            }
            b'<' => {
                if self.eat(b'=') {
                    self.token(TokenKind::LessThanEq, "<=")
                } else if self.eat(b'<') {
                    self.token(TokenKind::ShiftLeft, "<<")
                } else {
                    self.token(TokenKind::LessThan, "<")
                }
            }
            b'>' => {
                if self.eat(b'=') {
                    self.token(TokenKind::GreaterThanEq, ">=")
                } else if self.eat(b'>') {
                    self.token(TokenKind::ShiftRight, ">>")
                } else {
                    self.token(TokenKind::GreaterThan, ">")
                }
            }
            b'&' => {
                if self.eat(b'&') {
                    self.token(TokenKind::And, "&&")
                } else {
                    self.token(TokenKind::BitAnd, "&")
                }
            }
            b'|' => {
                if self.eat(b'|') {
                    self.token(TokenKind::Or, "||")
                } else {
                    self.token(TokenKind::BitOr, "|")
                }
            }
            b'"' => return self.scan_string(),
            _ if is_digit(cur) => self.scan_number(),
            _ => self.scan_identifier(),
        };

        Ok(token)
    }

    /// String literal: the opening quote is already consumed; the lexeme is
    /// everything up to (and excluding) the closing quote.
    fn scan_string(&mut self) -> Result<Token, LexicalError> {
        let start = self.offset;
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(_) => {}
                None => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::UnterminatedString,
                        line: self.line,
                        column: self.column,
                    });
                }
            }
        }

        let literal = &self.source[start..self.offset - 1];
        Ok(self.token(TokenKind::Str, literal))
    }

    fn scan_number(&mut self) -> Token {
        let start = self.offset - 1;
        while self.peek().is_some_and(is_digit) {
            self.bump();
        }

        self.token(TokenKind::Number, &self.source[start..self.offset])
    }

    /// Anything that is not recognized punctuation or a digit starts an
    /// identifier; the lexeme decides between a keyword and a plain `Ident`.
    fn scan_identifier(&mut self) -> Token {
        let start = self.offset - 1;
        while self.peek().is_some_and(is_ident_byte) {
            self.bump();
        }

        let literal = &self.source[start..self.offset];
        let kind = KEYWORD_HASHMAP
            .get(literal)
            .copied()
            .unwrap_or(TokenKind::Ident);
        self.token(kind, literal)
    }

    fn token(&self, kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, self.line, self.column)
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.offset += 1;
        self.column += 1;
        Some(byte)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !is_whitespace(byte) {
                break;
            }
            self.offset += 1;
            self.column += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 0;
            }
        }
    }

    /// Consumes a `//` comment through the end of the line.
    fn skip_line(&mut self) {
        while let Some(byte) = self.peek() {
            self.offset += 1;
            if byte == b'\n' {
                break;
            }
        }
        self.line += 1;
        self.column = 0;
    }
}

fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
