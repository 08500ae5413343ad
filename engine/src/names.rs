//! FILENAME: engine/src/names.rs
//! PURPOSE: Named ranges / identifiers resolved during evaluation.
//! CONTEXT: Spec §4.5: "mapping from identifier (string) to a bound
//! expression; cleared at the start of each recalc. Populated during
//! evaluation when a cell defines a named reference (domain-specific;
//! treated as opaque here)." Since defining named references is out of
//! this CORE's scope (it belongs to the Backwards scripting surface we
//! don't implement), this map is exposed as a plain lookup table a host can
//! populate; the engine itself only reads and clears it.

use std::collections::HashMap;
use std::rc::Rc;

use parser::Expression;

#[derive(Debug, Default)]
pub struct NameMap {
    bindings: HashMap<String, Rc<Expression>>,
}

impl NameMap {
    pub fn new() -> Self {
        NameMap::default()
    }

    pub fn get(&self, name: &str) -> Option<Rc<Expression>> {
        self.bindings.get(name).cloned()
    }

    pub fn bind(&mut self, name: String, expr: Rc<Expression>) {
        self.bindings.insert(name, expr);
    }

    /// Spec §4.3 step 1: cleared at the start of every recalc.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
