//! FILENAME: engine/src/context.rs
//! PURPOSE: Process-wide evaluation state threaded through every cell
//! computation.
//! CONTEXT: Spec §3 ("CallingContext") and §9's "Singletons (constants
//! pool, big-int context)... replace with a single engine context value
//! carried explicitly through evaluation; no hidden global mutable state."
//! We carry it as `&mut CallingContext` everywhere rather than a pointer
//! bundle, and drop the debugger hook and logger pointer the original
//! keeps here: the per-evaluation logger is scoped locally in
//! `Evaluator::compute_cell` instead (see evaluator.rs), and a debugger
//! hook has no external interface to call into in this CORE.

use parser::GetterRegistry;

use crate::frame::CallFrame;
use crate::getters::GetterTable;
use crate::names::NameMap;

pub struct CallingContext {
    pub generation: i64,
    pub in_user_input: bool,
    pub names: NameMap,
    /// Consulted by the parser on every parse-on-demand (spec §4.5).
    pub registry: GetterRegistry,
    /// The engine-side handler table the same ids dispatch into.
    pub getters: GetterTable,
    pub stack: Vec<CallFrame>,
}

impl CallingContext {
    pub fn new(registry: GetterRegistry, getters: GetterTable) -> Self {
        CallingContext {
            generation: 0,
            in_user_input: false,
            names: NameMap::new(),
            registry,
            getters,
            stack: Vec::new(),
        }
    }

    /// Convenience constructor wiring up the built-in registry/table pair.
    pub fn with_builtins() -> Self {
        let (registry, getters) = GetterTable::with_builtins();
        CallingContext::new(registry, getters)
    }

    pub fn here(&self) -> CallFrame {
        *self.stack.last().expect("evaluation always runs with a frame pushed")
    }

    pub fn getters_registry(&self) -> &GetterRegistry {
        &self.registry
    }
}
