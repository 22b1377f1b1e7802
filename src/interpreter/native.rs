use super::error::RuntimeErrorKind;
use super::value::{NativeFunction, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// The hashmap for built-in functions, consulted when identifier lookup
/// misses the environment chain.
static BUILTIN_HASHMAP: LazyLock<HashMap<&'static str, Value>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert(LEN.name(), Value::Builtin(&LEN));
    map.insert(PRINT.name(), Value::Builtin(&PRINT));
    map
});

static LEN: Len = Len;
static PRINT: Print = Print;

pub fn lookup(name: &str) -> Option<Value> {
    BUILTIN_HASHMAP.get(name).cloned()
}

#[derive(Debug)]
struct Len;

impl NativeFunction for Len {
    fn name(&self) -> &'static str {
        "len"
    }

    fn call(&self, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
        let [argument] = arguments else {
            return Err(RuntimeErrorKind::MismatchingArguments);
        };

        match argument {
            Value::Str(value) => Ok(Value::Integer(value.len() as i64)),
            Value::Array(handle) => Ok(Value::Integer(handle.lock().unwrap().len() as i64)),
            _ => Err(RuntimeErrorKind::UnexpectedObject),
        }
    }
}

#[derive(Debug)]
struct Print;

impl NativeFunction for Print {
    fn name(&self) -> &'static str {
        "print"
    }

    fn call(&self, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
        for argument in arguments {
            println!("{argument}");
        }

        Ok(Value::Nil)
    }
}
