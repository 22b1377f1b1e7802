use super::environment::Environment;
use super::error::RuntimeErrorKind;
use crate::parser::{BlockStatement, Identifier};
use compact_str::CompactString;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex};

/// A host function exposed to interpreted programs.
pub trait NativeFunction: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn call(&self, arguments: &[Value]) -> Result<Value, RuntimeErrorKind>;
}

/// A closure: parameter list, body, and the scope it was created in.
#[derive(Debug, Clone)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Environment,
}

/// The runtime value sum type. Arrays and hashmaps are handles: bindings
/// alias the same underlying storage and in-place mutation is observed by
/// every alias. `Return` is a control-flow carrier that statement-list
/// evaluation unwraps before a value ever reaches user code.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Bool(bool),
    Str(CompactString),
    Nil,
    Array(Arc<Mutex<Vec<Value>>>),
    HashMap(Arc<Mutex<HashMap<HashKey, Value>>>),
    Function(Arc<Function>),
    Return(Box<Value>),
    Builtin(&'static dyn NativeFunction),
}

impl Value {
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);
    pub const NIL: Value = Value::Nil;

    pub fn from_bool(value: bool) -> Value {
        if value {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Arc::new(Mutex::new(elements)))
    }

    pub fn hashmap(map: HashMap<HashKey, Value>) -> Value {
        Value::HashMap(Arc::new(Mutex::new(map)))
    }

    /// The coercion used by `!`, `if`, `&&`, and `||`: nil is false, bools
    /// are themselves, integers are true iff strictly positive. Everything
    /// else has no truth value.
    pub fn truthy(&self) -> Result<bool, RuntimeErrorKind> {
        match self {
            Value::Nil => Ok(false),
            Value::Bool(value) => Ok(*value),
            Value::Integer(value) => Ok(*value >= 1),
            _ => Err(RuntimeErrorKind::UnexpectedNode),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value}"),
            Value::Nil => write!(f, "nil"),
            Value::Array(handle) => {
                let elements = handle.lock().unwrap();
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Value::HashMap(handle) => {
                let map = handle.lock().unwrap();
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => {
                write!(f, "fn (")?;
                for (i, parameter) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {}", function.body)
            }
            Value::Return(inner) => inner.fmt(f),
            Value::Builtin(_) => write!(f, "build in"),
        }
    }
}

/// Normal form of a hashmap key. Only primitives hash; containers and
/// functions are rejected when they are inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Bool(bool),
    Str(CompactString),
    Nil,
}

impl HashKey {
    pub fn from_value(value: &Value) -> Option<HashKey> {
        match value {
            Value::Integer(value) => Some(HashKey::Integer(*value)),
            Value::Bool(value) => Some(HashKey::Bool(*value)),
            Value::Str(value) => Some(HashKey::Str(value.clone())),
            Value::Nil => Some(HashKey::Nil),
            _ => None,
        }
    }
}

impl Display for HashKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(value) => write!(f, "{value}"),
            HashKey::Bool(value) => write!(f, "{value}"),
            HashKey::Str(value) => write!(f, "{value}"),
            HashKey::Nil => write!(f, "nil"),
        }
    }
}
