mod ast;
mod error;

pub use ast::{
    ArrayLiteral, AssignExpression, AssignTarget, BlockStatement, BoolLiteral, CallExpression,
    Expression, ExpressionStatement, FunctionExpression, HashMapLiteral, Identifier, IfExpression,
    IndexExpression, InfixExpression, IntegerLiteral, LetStatement, NilLiteral, PrefixExpression,
    ReturnStatement, Root, Statement, StringLiteral,
};
pub use error::{ParserError, ParserErrorKind};

use crate::lexer::{Lexer, Token, TokenKind};

/// The precedence ladder, lowest binding first. `Xor` is a reserved tier with
/// no surface operator yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Relational,
    BinOr,
    Xor,
    BinAnd,
    BinShift,
    Addition,
    Multiplication,
    Prefix,
    Index,
    Call,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::LessThan
        | TokenKind::LessThanEq
        | TokenKind::GreaterThan
        | TokenKind::GreaterThanEq
        | TokenKind::Eq
        | TokenKind::NotEq => Precedence::Relational,
        TokenKind::BitOr => Precedence::BinOr,
        TokenKind::BitAnd => Precedence::BinAnd,
        TokenKind::ShiftLeft | TokenKind::ShiftRight => Precedence::BinShift,
        TokenKind::Plus | TokenKind::Minus => Precedence::Addition,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Multiplication,
        TokenKind::LeftBracket => Precedence::Index,
        TokenKind::LeftParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pratt parser with a one-token lookahead over the scanner.
///
/// Recoverable errors are collected in `errors` and parsing resumes at the
/// next statement, so one input can surface several diagnostics; scan
/// failures abort the parse and come back through the `Err` arm of
/// [`Parser::parse`].
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    peek: Token,
    pub errors: Vec<ParserError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: Token::default(),
            peek: Token::default(),
            errors: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Result<Root, ParserError> {
        // Bootstrap the lookahead slots.
        self.advance()?;
        self.advance()?;

        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::Eof | TokenKind::Illegal) {
            match self.parse_statement() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => self.errors.push(error),
            }
            self.advance()?;
        }

        Ok(Root { statements })
    }

    fn advance(&mut self) -> Result<(), ParserError> {
        let next = self.lexer.next_token().map_err(|error| {
            let token = Token::new(TokenKind::Illegal, "", error.line, error.column);
            ParserError::new(ParserErrorKind::Lexical(error), token)
        })?;
        self.current = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    fn error(&self, kind: ParserErrorKind) -> ParserError {
        ParserError::new(kind, self.current.clone())
    }
}

// Statement parsing
impl<'src> Parser<'src> {
    /// Dispatches on `current`; leaves `current` on the statement's last
    /// token. Stray semicolons parse to no statement at all.
    fn parse_statement(&mut self) -> Result<Option<Statement>, ParserError> {
        let statement = match self.current.kind {
            TokenKind::Let => Some(Statement::Let(self.parse_let()?)),
            TokenKind::Return => Some(Statement::Return(self.parse_return()?)),
            TokenKind::LeftBrace => Some(Statement::Block(self.parse_block()?)),
            TokenKind::Semicolon => None,
            _ => Some(Statement::Expression(self.parse_expression_statement()?)),
        };

        while self.peek.kind == TokenKind::Semicolon {
            self.advance()?;
        }

        Ok(statement)
    }

    fn parse_let(&mut self) -> Result<LetStatement, ParserError> {
        let token = self.current.clone();
        self.advance()?;
        let name = self.parse_identifier()?;
        self.advance()?;
        if self.current.kind != TokenKind::Assign {
            return Err(self.error(ParserErrorKind::InvalidToken));
        }

        self.advance()?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(LetStatement { token, name, value })
    }

    fn parse_return(&mut self) -> Result<ReturnStatement, ParserError> {
        let token = self.current.clone();
        let value = if self.peek.kind == TokenKind::RightBrace {
            Expression::Nil(NilLiteral {
                token: token.clone(),
            })
        } else {
            self.advance()?;
            self.parse_expression(Precedence::Lowest)?
        };

        Ok(ReturnStatement { token, value })
    }

    /// Collects statements until `}`, which is left on `current` for the
    /// enclosing loop to step over.
    fn parse_block(&mut self) -> Result<BlockStatement, ParserError> {
        let token = self.current.clone();
        if self.current.kind != TokenKind::LeftBrace {
            return Err(self.error(ParserErrorKind::InvalidToken));
        }

        self.advance()?;
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::RightBrace | TokenKind::Eof) {
            match self.parse_statement() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => self.errors.push(error),
            }
            self.advance()?;
        }

        if self.current.kind != TokenKind::RightBrace {
            return Err(ParserError::new(ParserErrorKind::UnexpectedEof, token));
        }

        Ok(BlockStatement { token, statements })
    }

    fn parse_expression_statement(&mut self) -> Result<ExpressionStatement, ParserError> {
        let token = self.current.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        Ok(ExpressionStatement { token, expr })
    }
}

// Expression parsing
impl<'src> Parser<'src> {
    fn parse_expression(&mut self, floor: Precedence) -> Result<Expression, ParserError> {
        let mut left = self.parse_prefix()?;
        while self.current.kind != TokenKind::Semicolon && floor < precedence_of(self.peek.kind) {
            self.advance()?;
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParserError> {
        match self.current.kind {
            TokenKind::Ident => Ok(Expression::Identifier(self.parse_identifier()?)),
            TokenKind::Number => self.parse_integer(),
            TokenKind::Str => Ok(Expression::Str(StringLiteral {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            })),
            TokenKind::True | TokenKind::False => Ok(Expression::Bool(BoolLiteral {
                token: self.current.clone(),
                value: self.current.kind == TokenKind::True,
            })),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_operator(),
            TokenKind::LeftParen => self.parse_grouped(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::LeftBrace => self.parse_hashmap(),
            TokenKind::If => self.parse_if(),
            TokenKind::Function => self.parse_function(),
            _ => Err(self.error(ParserErrorKind::MissingPrefixParser)),
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Result<Expression, ParserError> {
        match self.current.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::LessThan
            | TokenKind::LessThanEq
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanEq
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::BitAnd
            | TokenKind::BitOr
            | TokenKind::ShiftLeft
            | TokenKind::ShiftRight => {
                let token = self.current.clone();
                let precedence = precedence_of(token.kind);
                self.advance()?;
                let right = self.parse_expression(precedence)?;
                Ok(Expression::Infix(Box::new(InfixExpression {
                    token,
                    left,
                    right,
                })))
            }
            TokenKind::LeftParen => self.parse_call(left),
            TokenKind::LeftBracket => self.parse_index(left),
            TokenKind::Assign => self.parse_assign(left),
            _ => Err(self.error(ParserErrorKind::MissingInfixParser)),
        }
    }

    fn parse_identifier(&mut self) -> Result<Identifier, ParserError> {
        if self.current.kind != TokenKind::Ident {
            return Err(self.error(ParserErrorKind::ExpectedIdentifier));
        }

        Ok(Identifier {
            token: self.current.clone(),
            name: self.current.literal.clone(),
        })
    }

    fn parse_integer(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let value = token
            .literal
            .parse::<i64>()
            .map_err(|_| ParserError::new(ParserErrorKind::InvalidInteger, token.clone()))?;
        Ok(Expression::Integer(IntegerLiteral { token, value }))
    }

    fn parse_prefix_operator(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.advance()?;
        let operand = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix(Box::new(PrefixExpression {
            token,
            operand,
        })))
    }

    fn parse_grouped(&mut self) -> Result<Expression, ParserError> {
        self.advance()?;
        let inner = self.parse_expression(Precedence::Lowest)?;
        self.advance()?;
        if self.current.kind != TokenKind::RightParen {
            return Err(self.error(ParserErrorKind::ExpectedClosingBracket));
        }

        Ok(inner)
    }

    fn parse_array(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let mut elements = Vec::new();
        self.advance()?;
        if self.current.kind != TokenKind::RightBracket {
            elements = self.parse_comma_separated()?;
            self.advance()?;
        }

        if self.current.kind != TokenKind::RightBracket {
            return Err(self.error(ParserErrorKind::ExpectedClosingBracket));
        }

        Ok(Expression::Array(ArrayLiteral { token, elements }))
    }

    fn parse_hashmap(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let mut pairs = Vec::new();
        self.advance()?;
        if self.current.kind != TokenKind::RightBrace {
            pairs.push(self.parse_pair()?);
            while self.peek.kind == TokenKind::Comma {
                self.advance()?;
                self.advance()?;
                pairs.push(self.parse_pair()?);
            }
            self.advance()?;
        }

        if self.current.kind != TokenKind::RightBrace {
            return Err(self.error(ParserErrorKind::ExpectedClosingBracket));
        }

        Ok(Expression::HashMap(HashMapLiteral { token, pairs }))
    }

    fn parse_pair(&mut self) -> Result<(Expression, Expression), ParserError> {
        let key = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind != TokenKind::Colon {
            return Err(self.error(ParserErrorKind::ExpectedColon));
        }

        self.advance()?;
        self.advance()?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok((key, value))
    }

    fn parse_if(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.advance()?;
        // The condition parentheses are optional.
        if self.current.kind == TokenKind::LeftParen {
            self.advance()?;
        }

        let condition = self.parse_expression(Precedence::Lowest)?;
        self.advance()?;
        if self.current.kind == TokenKind::RightParen {
            self.advance()?;
        }

        let consequence = self.parse_block()?;
        let alternative = if self.peek.kind == TokenKind::Else {
            self.advance()?;
            self.advance()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expression::If(Box::new(IfExpression {
            token,
            condition,
            consequence,
            alternative,
        })))
    }

    fn parse_function(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.advance()?;
        if self.current.kind != TokenKind::LeftParen {
            return Err(self.error(ParserErrorKind::ExpectedLeftParen));
        }

        self.advance()?;
        let mut parameters = Vec::new();
        if self.current.kind != TokenKind::RightParen {
            parameters.push(self.parse_identifier()?);
            while self.peek.kind == TokenKind::Comma {
                self.advance()?;
                self.advance()?;
                parameters.push(self.parse_identifier()?);
            }
            self.advance()?;
        }

        if self.current.kind != TokenKind::RightParen {
            return Err(self.error(ParserErrorKind::ExpectedRightParen));
        }

        self.advance()?;
        let body = self.parse_block()?;
        Ok(Expression::Function(Box::new(FunctionExpression {
            token,
            parameters,
            body,
        })))
    }

    fn parse_call(&mut self, callee: Expression) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let mut arguments = Vec::new();
        self.advance()?;
        if self.current.kind != TokenKind::RightParen {
            arguments = self.parse_comma_separated()?;
            self.advance()?;
        }

        if self.current.kind != TokenKind::RightParen {
            return Err(self.error(ParserErrorKind::ExpectedRightParen));
        }

        Ok(Expression::Call(Box::new(CallExpression {
            token,
            callee,
            arguments,
        })))
    }

    fn parse_index(&mut self, container: Expression) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.advance()?;
        let index = self.parse_expression(Precedence::Lowest)?;
        self.advance()?;
        if self.current.kind != TokenKind::RightBracket {
            return Err(self.error(ParserErrorKind::ExpectedClosingBracket));
        }

        Ok(Expression::Index(Box::new(IndexExpression {
            token,
            container,
            index,
        })))
    }

    fn parse_assign(&mut self, target: Expression) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let target = match target {
            Expression::Identifier(target) => AssignTarget::Identifier(target),
            Expression::Index(target) => AssignTarget::Index(target),
            _ => {
                return Err(ParserError::new(
                    ParserErrorKind::InvalidAssignmentTarget,
                    token,
                ))
            }
        };

        self.advance()?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Expression::Assign(Box::new(AssignExpression {
            token,
            target,
            value,
        })))
    }

    fn parse_comma_separated(&mut self) -> Result<Vec<Expression>, ParserError> {
        let mut expressions = vec![self.parse_expression(Precedence::Lowest)?];
        while self.peek.kind == TokenKind::Comma {
            self.advance()?;
            self.advance()?;
            expressions.push(self.parse_expression(Precedence::Lowest)?);
        }

        Ok(expressions)
    }
}
