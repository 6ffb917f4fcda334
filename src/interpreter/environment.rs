use std::collections::HashMap;

use super::value::Value;

/// The scope stack: a global table plus one table per active function call.
///
/// Lookups see the top frame (if any) and fall through to the global table.
/// There is no mid-stack search, so a function never sees a caller's
/// locals, and bindings only go out of scope when their frame is popped.
#[derive(Debug, Default)]
pub struct Environment {
    globals: HashMap<String, Value>,
    frames: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(value) = frame.get(name) {
                return Some(value);
            }
        }
        self.globals.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let in_frame = self
            .frames
            .last()
            .map_or(false, |frame| frame.contains_key(name));
        if in_frame {
            return self.frames.last_mut().and_then(|frame| frame.get_mut(name));
        }
        self.globals.get_mut(name)
    }

    /// Bind `name` in the top frame, or globally when no frame is active.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_owned(), value);
        } else {
            self.globals.insert(name.to_owned(), value);
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Number of active call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
