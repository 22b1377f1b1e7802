pub mod environment;
pub mod error;
mod native;
pub mod value;

pub use environment::Environment;
pub use error::{RuntimeError, RuntimeErrorKind};
pub use value::{Function, HashKey, NativeFunction, Value};

use crate::lexer::TokenKind;
use crate::parser::{
    ArrayLiteral, AssignExpression, AssignTarget, BlockStatement, CallExpression, Expression,
    HashMapLiteral, Identifier, IfExpression, IndexExpression, InfixExpression, LetStatement,
    PrefixExpression, Root, Statement,
};
use compact_str::{CompactStringExt, ToCompactString};
use std::collections::HashMap;
use std::sync::Arc;

/// Recursive AST walker. Reduces a node in an environment to a value or a
/// runtime error; errors are fail-fast and carry the offending token.
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates from a fresh root environment.
    pub fn eval(&self, root: &Root) -> Result<Value, RuntimeError> {
        let mut env = Environment::new();
        self.eval_with_env(root, &mut env)
    }

    /// Evaluates against a caller-supplied environment so bindings persist
    /// across inputs (the REPL's mode of operation).
    pub fn eval_with_env(&self, root: &Root, env: &mut Environment) -> Result<Value, RuntimeError> {
        self.eval_statements(&root.statements, env)
    }

    /// Statement-list boundary (program root or function body): a return
    /// sentinel stops the walk and unwraps into the result.
    fn eval_statements(
        &self,
        statements: &[Statement],
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let mut result = Value::Nil;
        for statement in statements {
            result = self.eval_statement(statement, env)?;
            if let Value::Return(inner) = result {
                return Ok(*inner);
            }
        }

        Ok(result)
    }

    /// Block boundary: a return sentinel stops the walk but propagates
    /// unchanged to the enclosing statement list.
    fn eval_block(&self, block: &BlockStatement, env: &mut Environment) -> Result<Value, RuntimeError> {
        let mut result = Value::Nil;
        for statement in &block.statements {
            result = self.eval_statement(statement, env)?;
            if matches!(result, Value::Return(_)) {
                return Ok(result);
            }
        }

        Ok(result)
    }

    fn eval_statement(
        &self,
        statement: &Statement,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        match statement {
            Statement::Let(stmt) => self.eval_let(stmt, env),
            Statement::Return(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                Ok(Value::Return(Box::new(value)))
            }
            Statement::Expression(stmt) => self.eval_expression(&stmt.expr, env),
            Statement::Block(block) => {
                let mut scope = env.new_scope();
                self.eval_block(block, &mut scope)
            }
        }
    }

    fn eval_let(&self, stmt: &LetStatement, env: &mut Environment) -> Result<Value, RuntimeError> {
        if env.contains_local(&stmt.name.name) {
            return Err(RuntimeError::new(
                RuntimeErrorKind::RedefinedIdentifier,
                &stmt.token,
            ));
        }

        let value = self.eval_expression(&stmt.value, env)?;
        env.declare(&stmt.name.name, value.clone());
        Ok(value)
    }

    fn eval_expression(
        &self,
        expression: &Expression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Integer(lit) => Ok(Value::Integer(lit.value)),
            Expression::Str(lit) => Ok(Value::Str(lit.value.clone())),
            Expression::Bool(lit) => Ok(Value::from_bool(lit.value)),
            Expression::Nil(_) => Ok(Value::Nil),
            Expression::Identifier(ident) => self.eval_identifier(ident, env),
            Expression::Prefix(expr) => self.eval_prefix(expr, env),
            Expression::Infix(expr) => self.eval_infix(expr, env),
            Expression::If(expr) => self.eval_if(expr, env),
            Expression::Function(expr) => Ok(Value::Function(Arc::new(Function {
                parameters: expr.parameters.clone(),
                body: expr.body.clone(),
                env: env.new_scope(),
            }))),
            Expression::Call(expr) => self.eval_call(expr, env),
            Expression::Index(expr) => self.eval_index(expr, env),
            Expression::Assign(expr) => self.eval_assign(expr, env),
            Expression::Array(lit) => self.eval_array(lit, env),
            Expression::HashMap(lit) => self.eval_hashmap(lit, env),
        }
    }

    /// Environment chain first, then the built-ins table.
    fn eval_identifier(
        &self,
        ident: &Identifier,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        if let Some(value) = env.get(&ident.name) {
            return Ok(value);
        }

        native::lookup(&ident.name).ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::UndefinedIdentifier, &ident.token)
        })
    }

    fn eval_prefix(
        &self,
        expr: &PrefixExpression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let operand = self.eval_expression(&expr.operand, env)?;
        match expr.token.kind {
            TokenKind::Bang => {
                let truthy = operand
                    .truthy()
                    .map_err(|kind| RuntimeError::new(kind, &expr.token))?;
                Ok(Value::from_bool(!truthy))
            }
            TokenKind::Minus => match operand {
                Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
                _ => Err(RuntimeError::new(
                    RuntimeErrorKind::UnexpectedObject,
                    &expr.token,
                )),
            },
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::UnexpectedPrefixOperator,
                &expr.token,
            )),
        }
    }

    /// Both operands evaluate eagerly; `&&`/`||` do not short-circuit. A bool
    /// mixed with an integer coerces to 0/1 and takes integer semantics.
    fn eval_infix(
        &self,
        expr: &InfixExpression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let left = self.eval_expression(&expr.left, env)?;
        let right = self.eval_expression(&expr.right, env)?;
        match (left, right) {
            (Value::Integer(left), Value::Integer(right)) => {
                self.eval_integer_infix(expr, left, right)
            }
            (Value::Bool(left), Value::Bool(right)) => self.eval_bool_infix(expr, left, right),
            (Value::Integer(left), Value::Bool(right)) => {
                self.eval_integer_infix(expr, left, right as i64)
            }
            (Value::Bool(left), Value::Integer(right)) => {
                self.eval_integer_infix(expr, left as i64, right)
            }
            (Value::Str(left), Value::Str(right)) => {
                if expr.token.kind == TokenKind::Plus {
                    Ok(Value::Str([left, right].concat_compact()))
                } else {
                    Err(RuntimeError::new(
                        RuntimeErrorKind::UnsupportedTypes,
                        &expr.token,
                    ))
                }
            }
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::UnsupportedTypes,
                &expr.token,
            )),
        }
    }

    fn eval_integer_infix(
        &self,
        expr: &InfixExpression,
        left: i64,
        right: i64,
    ) -> Result<Value, RuntimeError> {
        let value = match expr.token.kind {
            TokenKind::Plus => Value::Integer(left.wrapping_add(right)),
            TokenKind::Minus => Value::Integer(left.wrapping_sub(right)),
            TokenKind::Asterisk => Value::Integer(left.wrapping_mul(right)),
            TokenKind::Slash => {
                if right == 0 {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ZeroDivision,
                        expr.right.token(),
                    ));
                }
                Value::Integer(left.wrapping_div(right))
            }
            TokenKind::Eq => Value::from_bool(left == right),
            TokenKind::NotEq => Value::from_bool(left != right),
            TokenKind::LessThan => Value::from_bool(left < right),
            TokenKind::LessThanEq => Value::from_bool(left <= right),
            TokenKind::GreaterThan => Value::from_bool(left > right),
            TokenKind::GreaterThanEq => Value::from_bool(left >= right),
            TokenKind::BitAnd => Value::Integer(left & right),
            TokenKind::BitOr => Value::Integer(left | right),
            TokenKind::ShiftLeft => Value::Integer(left.wrapping_shl(right as u32)),
            TokenKind::ShiftRight => Value::Integer(left.wrapping_shr(right as u32)),
            TokenKind::And => Value::from_bool(left > 0 && right > 0),
            TokenKind::Or => Value::from_bool(left > 0 || right > 0),
            _ => {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::UnsupportedIntOperator,
                    &expr.token,
                ))
            }
        };

        Ok(value)
    }

    fn eval_bool_infix(
        &self,
        expr: &InfixExpression,
        left: bool,
        right: bool,
    ) -> Result<Value, RuntimeError> {
        match expr.token.kind {
            TokenKind::Eq => Ok(Value::from_bool(left == right)),
            TokenKind::NotEq => Ok(Value::from_bool(left != right)),
            TokenKind::And => Ok(Value::from_bool(left && right)),
            TokenKind::Or => Ok(Value::from_bool(left || right)),
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::UnexpectedOperator,
                &expr.token,
            )),
        }
    }

    fn eval_if(&self, expr: &IfExpression, env: &mut Environment) -> Result<Value, RuntimeError> {
        let condition = self.eval_expression(&expr.condition, env)?;
        let truthy = condition
            .truthy()
            .map_err(|kind| RuntimeError::new(kind, expr.condition.token()))?;

        if truthy {
            let mut scope = env.new_scope();
            self.eval_block(&expr.consequence, &mut scope)
        } else if let Some(alternative) = &expr.alternative {
            let mut scope = env.new_scope();
            self.eval_block(alternative, &mut scope)
        } else {
            Ok(Value::Nil)
        }
    }

    /// Arguments evaluate in the caller's environment and bind into a frame
    /// derived from the closure's captured one, so every invocation gets its
    /// own locals; the body's statement list runs there and unwraps any
    /// return sentinel.
    fn eval_call(
        &self,
        expr: &CallExpression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let callee = self.eval_expression(&expr.callee, env)?;
        match callee {
            Value::Function(function) => {
                if function.parameters.len() != expr.arguments.len() {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::MismatchingArguments,
                        &expr.token,
                    ));
                }

                let arguments = self.eval_expressions(&expr.arguments, env)?;
                let mut scope = function.env.new_scope();
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    scope.declare(&parameter.name, argument);
                }

                self.eval_statements(&function.body.statements, &mut scope)
            }
            Value::Builtin(builtin) => {
                let arguments = self.eval_expressions(&expr.arguments, env)?;
                builtin
                    .call(&arguments)
                    .map_err(|kind| RuntimeError::new(kind, &expr.token))
            }
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::NotCallable,
                &expr.token,
            )),
        }
    }

    fn eval_expressions(
        &self,
        expressions: &[Expression],
        env: &mut Environment,
    ) -> Result<Vec<Value>, RuntimeError> {
        expressions
            .iter()
            .map(|expression| self.eval_expression(expression, env))
            .collect()
    }

    fn eval_index(
        &self,
        expr: &IndexExpression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let container = self.eval_expression(&expr.container, env)?;
        let index = self.eval_expression(&expr.index, env)?;
        match (container, index) {
            (Value::Array(handle), Value::Integer(index)) => {
                let elements = handle.lock().unwrap();
                usize::try_from(index)
                    .ok()
                    .and_then(|index| elements.get(index).cloned())
                    .ok_or_else(|| {
                        RuntimeError::new(RuntimeErrorKind::IndexOutOfBounds, &expr.token)
                    })
            }
            (Value::Str(value), Value::Integer(index)) => usize::try_from(index)
                .ok()
                .and_then(|index| value.as_bytes().get(index).copied())
                .map(|byte| Value::Str(char::from(byte).to_compact_string()))
                .ok_or_else(|| RuntimeError::new(RuntimeErrorKind::IndexOutOfBounds, &expr.token)),
            (Value::HashMap(handle), key) => {
                let map = handle.lock().unwrap();
                Ok(HashKey::from_value(&key)
                    .and_then(|key| map.get(&key).cloned())
                    .unwrap_or(Value::Nil))
            }
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::UnexpectedIndexType,
                &expr.token,
            )),
        }
    }

    fn eval_assign(
        &self,
        expr: &AssignExpression,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        match &expr.target {
            AssignTarget::Identifier(target) => {
                let value = self.eval_expression(&expr.value, env)?;
                env.assign(&target.name, value.clone());
                Ok(value)
            }
            AssignTarget::Index(target) => {
                let container = self.eval_expression(&target.container, env)?;
                let key = self.eval_expression(&target.index, env)?;
                let value = self.eval_expression(&expr.value, env)?;
                match (container, key) {
                    (Value::HashMap(handle), key) => {
                        let key = HashKey::from_value(&key).ok_or_else(|| {
                            RuntimeError::new(
                                RuntimeErrorKind::UnusableHashKey,
                                target.index.token(),
                            )
                        })?;
                        handle.lock().unwrap().insert(key, value.clone());
                        Ok(value)
                    }
                    (Value::Array(handle), Value::Integer(index)) => {
                        let mut elements = handle.lock().unwrap();
                        let slot = usize::try_from(index)
                            .ok()
                            .and_then(|index| elements.get_mut(index))
                            .ok_or_else(|| {
                                RuntimeError::new(
                                    RuntimeErrorKind::IndexOutOfBounds,
                                    target.index.token(),
                                )
                            })?;
                        *slot = value.clone();
                        Ok(value)
                    }
                    (Value::Str(_), _) => Err(RuntimeError::new(
                        RuntimeErrorKind::ImmutableString,
                        &expr.token,
                    )),
                    _ => Err(RuntimeError::new(
                        RuntimeErrorKind::UnexpectedIndexType,
                        &expr.token,
                    )),
                }
            }
        }
    }

    fn eval_array(&self, lit: &ArrayLiteral, env: &mut Environment) -> Result<Value, RuntimeError> {
        let elements = self.eval_expressions(&lit.elements, env)?;
        Ok(Value::array(elements))
    }

    fn eval_hashmap(
        &self,
        lit: &HashMapLiteral,
        env: &mut Environment,
    ) -> Result<Value, RuntimeError> {
        let mut map = HashMap::new();
        for (key_expr, value_expr) in &lit.pairs {
            let key = self.eval_expression(key_expr, env)?;
            let value = self.eval_expression(value_expr, env)?;
            let key = HashKey::from_value(&key).ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::UnusableHashKey, key_expr.token())
            })?;
            map.insert(key, value);
        }

        Ok(Value::hashmap(map))
    }
}
