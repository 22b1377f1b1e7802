use crate::lexer::Token;
use compact_str::CompactString;
use std::fmt::{self, Display, Formatter};

/// Top of the tree: the ordered statement list of a program.
#[derive(Debug, Clone)]
pub struct Root {
    pub statements: Vec<Statement>,
}

impl Display for Root {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let(stmt) => &stmt.token,
            Statement::Return(stmt) => &stmt.token,
            Statement::Expression(stmt) => &stmt.token,
            Statement::Block(stmt) => &stmt.token,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => stmt.fmt(f),
            Statement::Return(stmt) => stmt.fmt(f),
            Statement::Expression(stmt) => stmt.fmt(f),
            Statement::Block(stmt) => stmt.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "let {}={};", self.name, self.value)
    }
}

/// A bare `return` directly before `}` carries the nil literal as its value.
#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.value {
            Expression::Nil(_) => write!(f, "return"),
            _ => write!(f, "return {};", self.value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expr: Expression,
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    Integer(IntegerLiteral),
    Str(StringLiteral),
    Bool(BoolLiteral),
    Nil(NilLiteral),
    Identifier(Identifier),
    Prefix(Box<PrefixExpression>),
    Infix(Box<InfixExpression>),
    If(Box<IfExpression>),
    Function(Box<FunctionExpression>),
    Call(Box<CallExpression>),
    Index(Box<IndexExpression>),
    Assign(Box<AssignExpression>),
    Array(ArrayLiteral),
    HashMap(HashMapLiteral),
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Integer(expr) => &expr.token,
            Expression::Str(expr) => &expr.token,
            Expression::Bool(expr) => &expr.token,
            Expression::Nil(expr) => &expr.token,
            Expression::Identifier(expr) => &expr.token,
            Expression::Prefix(expr) => &expr.token,
            Expression::Infix(expr) => &expr.token,
            Expression::If(expr) => &expr.token,
            Expression::Function(expr) => &expr.token,
            Expression::Call(expr) => &expr.token,
            Expression::Index(expr) => &expr.token,
            Expression::Assign(expr) => &expr.token,
            Expression::Array(expr) => &expr.token,
            Expression::HashMap(expr) => &expr.token,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Integer(expr) => expr.fmt(f),
            Expression::Str(expr) => expr.fmt(f),
            Expression::Bool(expr) => expr.fmt(f),
            Expression::Nil(expr) => expr.fmt(f),
            Expression::Identifier(expr) => expr.fmt(f),
            Expression::Prefix(expr) => expr.fmt(f),
            Expression::Infix(expr) => expr.fmt(f),
            Expression::If(expr) => expr.fmt(f),
            Expression::Function(expr) => expr.fmt(f),
            Expression::Call(expr) => expr.fmt(f),
            Expression::Index(expr) => expr.fmt(f),
            Expression::Assign(expr) => expr.fmt(f),
            Expression::Array(expr) => expr.fmt(f),
            Expression::HashMap(expr) => expr.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub token: Token,
    pub value: CompactString,
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

#[derive(Debug, Clone)]
pub struct BoolLiteral {
    pub token: Token,
    pub value: bool,
}

impl Display for BoolLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone)]
pub struct NilLiteral {
    pub token: Token,
}

impl Display for NilLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "nil")
    }
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: CompactString,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Prefix operator application; the token is the operator (`!` or `-`).
#[derive(Debug, Clone)]
pub struct PrefixExpression {
    pub token: Token,
    pub operand: Expression,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.token.literal, self.operand)
    }
}

/// Binary operator application; the token is the operator.
#[derive(Debug, Clone)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Expression,
    pub right: Expression,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.token.literal, self.right)
    }
}

#[derive(Debug, Clone)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Expression,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {alternative}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FunctionExpression {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl Display for FunctionExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn (")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ") {}", self.body)
    }
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub token: Token,
    pub callee: Expression,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{argument}")?;
        }
        write!(f, ")")
    }
}

/// `container[index]` over arrays, strings, and hashmaps.
#[derive(Debug, Clone)]
pub struct IndexExpression {
    pub token: Token,
    pub container: Expression,
    pub index: Expression,
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.container, self.index)
    }
}

/// The only structurally legal assignment targets.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    Identifier(Identifier),
    Index(Box<IndexExpression>),
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Identifier(target) => target.fmt(f),
            AssignTarget::Index(target) => target.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignExpression {
    pub token: Token,
    pub target: AssignTarget,
    pub value: Expression,
}

impl Display for AssignExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.target, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}

/// Pairs stay in source order; duplicate keys resolve last-writer-wins at
/// evaluation time.
#[derive(Debug, Clone)]
pub struct HashMapLiteral {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

impl Display for HashMapLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, "}}")
    }
}
