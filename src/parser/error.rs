use crate::lexer::{LexicalError, Token};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("missing prefix parser")]
    MissingPrefixParser,
    #[error("missing infix parser")]
    MissingInfixParser,
    #[error("expected Identifier")]
    ExpectedIdentifier,
    #[error("invalid token encountered")]
    InvalidToken,
    #[error("expected closing bracket")]
    ExpectedClosingBracket,
    #[error("expected closing bracket, got EOF")]
    UnexpectedEof,
    #[error("expected (")]
    ExpectedLeftParen,
    #[error("expected )")]
    ExpectedRightParen,
    #[error("expected proceeding colon")]
    ExpectedColon,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("invalid integer")]
    InvalidInteger,
    #[error("{0}")]
    Lexical(#[from] LexicalError),
}

/// A parser error pinned to the token at point. Recoverable errors accumulate
/// on the parser; lexical failures short-circuit the parse.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "parsing error | line: {}, column: {} | message: {kind} | token: {}",
    .token.line,
    .token.column,
    .token.literal
)]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub token: Token,
}

impl ParserError {
    pub fn new(kind: ParserErrorKind, token: Token) -> Self {
        Self { kind, token }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ParserErrorKind::Lexical(_))
    }
}
