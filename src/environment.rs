use std::collections::HashMap;
use std::io::Write;

use tracing::trace;

use crate::value::Value;

/// Variable bindings for one block (or the global scope).
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Value>,
}

/// Chain of scopes from the global scope outwards to the innermost active block.
///
/// Each scope's parent is the one below it on the stack. Leaving a block pops
/// and drops its scope, so nothing declared inside the block is reachable
/// afterwards. The environment also owns the sink `print` writes to.
pub struct Environment<'a> {
    scopes: Vec<Scope>,
    pub output_writer: &'a mut dyn Write,
}

impl<'a> Environment<'a> {
    pub fn new(output_writer: &'a mut dyn Write) -> Environment<'a> {
        // initialize the global scope as the first entry on the stack
        Environment {
            scopes: vec![Scope::default()],
            output_writer,
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
        trace!(depth = self.depth(), "entered scope");
    }

    pub fn pop(&mut self) {
        // the global scope outlives every block
        if self.scopes.len() > 1 {
            let scope = self.scopes.pop();
            trace!(
                depth = self.depth(),
                released = scope.map_or(0, |scope| scope.bindings.len()),
                "left scope"
            );
        }
    }

    /// Number of active block scopes above the global scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Bind in the innermost scope, replacing a binding of the same name in that scope only.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Update the nearest existing binding. Returns false if the name isn't bound anywhere.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }
}
