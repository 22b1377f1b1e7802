use crate::lexer::Token;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    #[error("identifier is not defined")]
    UndefinedIdentifier,
    #[error("identifier is already defined")]
    RedefinedIdentifier,
    #[error("mismatching number of arguments")]
    MismatchingArguments,
    #[error("expected function expression")]
    NotCallable,
    #[error("zero division")]
    ZeroDivision,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("unexpected index type for expression")]
    UnexpectedIndexType,
    #[error("operator is not supported for int types")]
    UnsupportedIntOperator,
    #[error("unexpected operator")]
    UnexpectedOperator,
    #[error("not supported types")]
    UnsupportedTypes,
    #[error("unexpected prefix operator")]
    UnexpectedPrefixOperator,
    #[error("unexpected object")]
    UnexpectedObject,
    #[error("unexpected node")]
    UnexpectedNode,
    #[error("strings are immutable")]
    ImmutableString,
    #[error("unusable hashmap key")]
    UnusableHashKey,
}

/// A runtime failure pinned to the offending node's token. Evaluation is
/// fail-fast: these propagate unchanged to the top-level driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} | line {}, column {}", .token.line, .token.column)]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub token: Token,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, token: &Token) -> Self {
        Self {
            kind,
            token: token.clone(),
        }
    }
}
