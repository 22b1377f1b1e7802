use super::value::Value;
use compact_str::ToCompactString;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A scope frame with a parent link, shared behind a cheap-clone handle.
/// Closures hold the handle of their defining frame, so writes through the
/// chain stay visible to every closure that captured it.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<Mutex<Frame>>,
}

#[derive(Debug)]
struct Frame {
    values: HashMap<compact_str::CompactString, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Frame {
                values: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_scope(&self) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Frame {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Walks the chain from the current frame outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.inner.lock().unwrap();
        if let Some(value) = frame.values.get(name) {
            Some(value.clone())
        } else if let Some(parent) = frame.parent.clone() {
            drop(frame);
            parent.get(name)
        } else {
            None
        }
    }

    /// Whether the current frame itself binds `name`; parents are not
    /// consulted. `let` redefinition checking needs exactly this.
    pub fn contains_local(&self, name: &str) -> bool {
        self.inner.lock().unwrap().values.contains_key(name)
    }

    /// Binds in the current frame, shadowing any outer binding.
    pub fn declare(&mut self, name: &str, value: Value) {
        self.inner
            .lock()
            .unwrap()
            .values
            .insert(name.to_compact_string(), value);
    }

    /// Updates the innermost frame that already binds `name`; when none does,
    /// the name is bound in the current frame. Closure counters rely on the
    /// outer-frame update.
    pub fn assign(&mut self, name: &str, value: Value) {
        if !self.try_assign(name, &value) {
            self.declare(name, value);
        }
    }

    fn try_assign(&self, name: &str, value: &Value) -> bool {
        let mut frame = self.inner.lock().unwrap();
        if frame.values.contains_key(name) {
            frame
                .values
                .insert(name.to_compact_string(), value.clone());
            return true;
        }

        let Some(parent) = frame.parent.clone() else {
            return false;
        };
        drop(frame);
        parent.try_assign(name, value)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
