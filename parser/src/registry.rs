//! FILENAME: parser/src/registry.rs
//! PURPOSE: The getter registry consulted while parsing function calls.
//! CONTEXT: Spec §4.5 describes a "getter registry" populated by the engine
//! before parsing starts and consulted by the parser to turn bare
//! identifiers followed by `(` into resolved built-in calls. The registry
//! only carries names and arities here; the engine owns a separate table
//! keyed by the same `GetterId` that holds the actual callbacks, so this
//! crate never needs to depend on the engine.

use crate::ast::{Arity, GetterId};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct GetterRegistry {
    by_name: HashMap<String, (GetterId, Arity)>,
}

impl GetterRegistry {
    pub fn new() -> Self {
        GetterRegistry {
            by_name: HashMap::new(),
        }
    }

    /// Registers a built-in under `name` (case-insensitive). Returns the id
    /// assigned; the caller (engine side) is expected to use the same id to
    /// index its handler table.
    pub fn register(&mut self, name: &str, id: GetterId, arity: Arity) {
        self.by_name.insert(name.to_ascii_uppercase(), (id, arity));
    }

    pub fn resolve(&self, name: &str) -> Option<(GetterId, Arity)> {
        self.by_name.get(&name.to_ascii_uppercase()).copied()
    }

    /// Reverse lookup, used when rendering an `Expression::Call` back to
    /// source text (persistence's formula serializer needs the name, not
    /// just the id).
    pub fn name_of(&self, id: GetterId) -> Option<&str> {
        self.by_name.iter().find(|(_, &(candidate, _))| candidate == id).map(|(name, _)| name.as_str())
    }
}
