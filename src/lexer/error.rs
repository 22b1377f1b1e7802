use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexicalErrorKind {
    #[error("unterminated string")]
    UnterminatedString,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} | line {line}, column {column}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub line: u32,
    pub column: u32,
}
