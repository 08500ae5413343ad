//! FILENAME: engine/src/scheduler.rs
//! PURPOSE: The recalc scheduler: walks every occupied cell once per
//! recalc, in one of eight orders.
//! CONTEXT: Spec §4.3. Ported from `Forwards::Engine::SpreadSheet::recalc`
//! in `original_source/Forwards/src/Parser/SpreadSheet.cpp`, which spells
//! out all eight branches by hand on `(c_major, left_right, top_down)`.
//! Kept as explicit loops rather than a generic iterator combinator so the
//! traversal order stays as directly auditable as the original.

use crate::context::CallingContext;
use crate::evaluator::compute_cell;
use crate::sheet::Sheet;

/// Spec §4.3: one recalc pass. Bumps `context.generation` once at the
/// start and once at the end (the "double-tick", see SPEC_FULL.md's
/// Decisions section on why interactive evaluation never has to worry
/// about landing on either boundary value).
pub fn recalc(sheet: &mut Sheet, ctx: &mut CallingContext) {
    ctx.in_user_input = false;
    ctx.generation += 1;
    ctx.names.clear();

    if sheet.c_major {
        for col in column_order(sheet) {
            for row in row_order_in_column(sheet, col) {
                let _ = compute_cell(sheet, ctx, col, row, false);
            }
        }
    } else {
        for row in row_order(sheet) {
            for col in column_order(sheet) {
                let _ = compute_cell(sheet, ctx, col, row, false);
            }
        }
    }

    ctx.generation += 1;
}

fn column_order(sheet: &Sheet) -> Vec<usize> {
    let mut cols: Vec<usize> = (0..sheet.column_count()).collect();
    if !sheet.left_right {
        cols.reverse();
    }
    cols
}

fn row_order_in_column(sheet: &Sheet, col: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..sheet.column_len(col)).collect();
    if !sheet.top_down {
        rows.reverse();
    }
    rows
}

fn row_order(sheet: &Sheet) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..sheet.max_row).collect();
    if !sheet.top_down {
        rows.reverse();
    }
    rows
}
