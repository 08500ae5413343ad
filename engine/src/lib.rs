//! FILENAME: engine/src/lib.rs
//! PURPOSE: Library root for the spreadsheet evaluation engine.
//! CONTEXT: Exposes `Sheet`, `Cell`, `CallingContext`, the single-cell
//! Evaluator, and the recalc scheduler described across spec §§2-8. This
//! crate depends one-way on `parser` (for `Expression`/`Value` and
//! `parse_full_expression`) and knows nothing about `persistence`.

pub mod cell;
pub mod context;
pub mod coord;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod getters;
pub mod names;
pub mod reference;
pub mod scheduler;
pub mod sheet;

pub use cell::{Cell, CellType, NO_GENERATION};
pub use context::CallingContext;
pub use error::EngineError;
pub use evaluator::{compute_cell, compute_cell_message, eval_expr};
pub use frame::CallFrame;
pub use getters::{GetterTable, Handler};
pub use names::NameMap;
pub use scheduler::recalc;
pub use sheet::Sheet;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_recalc_across_a_dependency() {
        let mut sheet = Sheet::new();
        sheet.init_cell_at(0, 0); // A1
        sheet.get_cell_mut(0, 0).unwrap().current_input = "10".to_string();
        sheet.init_cell_at(1, 0); // B1 = A1 * 2
        sheet.get_cell_mut(1, 0).unwrap().current_input = "A1*2".to_string();

        let mut ctx = CallingContext::with_builtins();
        recalc(&mut sheet, &mut ctx);

        let b1 = sheet.get_cell_at(1, 0).unwrap();
        assert_eq!(*b1.previous_value.clone().unwrap(), parser::Value::Float(20.0));
    }
}
