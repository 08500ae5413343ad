//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the fundamental data structure for a single spreadsheet cell.
//! CONTEXT: Spec §3. A `Cell` separates unparsed input text from the parsed
//! expression tree and the last computed value, plus the flags the Evaluator
//! and the cycle detector need. Grounded on `Forwards::Engine::Cell` (see
//! `original_source/Forwards/include/Forwards/Engine/Cell.h`) for the field
//! set, restyled after the teacher's `core/engine/src/cell.rs`.

use std::rc::Rc;

use parser::{Expression, Value};
use serde::{Deserialize, Serialize};

/// Sentinel `previousGeneration` a fresh cell is born with — distinct from
/// any real generation (which starts at 0 and only increases), so a brand
/// new cell never satisfies the memoization check by accident.
pub const NO_GENERATION: i64 = i64::MIN;

/// Spec §3: "one of {VALUE, LABEL, ERROR}".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    /// Holds a formula to parse.
    Value,
    /// Holds literal text, evaluated as a string constant.
    Label,
    /// Holds nothing evaluable; always reports an empty value.
    Error,
}

/// One location in the sheet.
///
/// `value` and `previous_value` skip serialization: `Expression` and
/// `Value` close over parser-internal registry ids and `Rc` sharing that
/// don't round-trip meaningfully through a snapshot. A host restoring a
/// snapshot is expected to re-run `recalc` to repopulate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub current_input: String,
    #[serde(skip)]
    pub value: Option<Rc<Expression>>,
    #[serde(skip)]
    pub previous_value: Option<Rc<Value>>,
    pub previous_generation: i64,
    pub in_evaluation: bool,
    pub recursed: bool,
}

impl Cell {
    /// A freshly `init_cell_at`'d cell: empty VALUE cell, never evaluated.
    pub fn new() -> Self {
        Cell {
            cell_type: CellType::Value,
            current_input: String::new(),
            value: None,
            previous_value: None,
            previous_generation: NO_GENERATION,
            in_evaluation: false,
            recursed: false,
        }
    }

    pub fn new_label(text: String) -> Self {
        Cell {
            cell_type: CellType::Label,
            current_input: text,
            ..Cell::new()
        }
    }

    pub fn new_value(formula: String) -> Self {
        Cell {
            cell_type: CellType::Value,
            current_input: formula,
            ..Cell::new()
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cell_never_satisfies_memoization() {
        let cell = Cell::new();
        assert_ne!(cell.previous_generation, 0);
        assert!(cell.previous_value.is_none());
    }

    #[test]
    fn new_label_preserves_text_as_current_input() {
        let cell = Cell::new_label("hello".to_string());
        assert_eq!(cell.cell_type, CellType::Label);
        assert_eq!(cell.current_input, "hello");
    }

    /// A snapshot (e.g. sent to a UI) must drop the AST/Value fields rather
    /// than fail to serialize their parser-internal contents.
    #[test]
    fn snapshot_skips_the_cached_expression_and_value() {
        let mut cell = Cell::new_value("1+1".to_string());
        cell.value = Some(Rc::new(Expression::Constant(Value::Float(2.0))));
        cell.previous_value = Some(Rc::new(Value::Float(2.0)));
        cell.previous_generation = 3;

        let snapshot = serde_json::to_value(&cell).unwrap();
        assert!(snapshot.get("value").is_none());
        assert!(snapshot.get("previous_value").is_none());
        assert_eq!(snapshot["previous_generation"], 3);

        let restored: Cell = serde_json::from_value(snapshot).unwrap();
        assert_eq!(restored.previous_generation, 3);
        assert!(restored.value.is_none());
    }
}
