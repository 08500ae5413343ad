//! FILENAME: engine/src/reference.rs
//! PURPOSE: Expands a parsed `CellRefSpec`/`CellRangeSpec` against a frame
//! into concrete (col, row) coordinates.
//! CONTEXT: Spec §4.4. The parser only captures *how* a reference is
//! anchored (absolute vs. relative-to-parse-site); resolving it against a
//! frame's (here_col, here_row) is the engine's job, since "here" changes
//! with the call stack at evaluation time, not at parse time.

use parser::{CellRangeSpec, CellRefSpec};

use crate::coord::{MAX_COL, MAX_ROW};
use crate::error::EngineError;
use crate::frame::CallFrame;

/// Resolves one axis: absolute uses the stored value directly, relative
/// adds it to `here`. Spec: "If the computed value is negative or overflows
/// the positive range, clamp to the sentinel 'invalid' and raise on
/// access" — modeled here as returning the out-of-range error immediately
/// rather than deferring to a sentinel, since every caller needs the error
/// anyway.
fn resolve_axis(absolute: bool, reference: i64, here: usize, max: u64) -> Result<usize, (i64, i64)> {
    let target = if absolute { reference } else { here as i64 + reference };
    if target < 0 || target as u64 > max {
        return Err((target, target));
    }
    Ok(target as usize)
}

pub fn resolve_cell_ref(spec: &CellRefSpec, frame: CallFrame) -> Result<(usize, usize), EngineError> {
    let col = resolve_axis(spec.col_absolute, spec.col_ref, frame.col, MAX_COL);
    let row = resolve_axis(spec.row_absolute, spec.row_ref, frame.row, MAX_ROW);
    let result = match (col, row) {
        (Ok(c), Ok(r)) => Ok((c, r)),
        (Err((c, _)), Ok(_)) => Err(EngineError::OutOfRange { col: c, row: frame.row as i64 }),
        (Ok(_), Err((r, _))) => Err(EngineError::OutOfRange { col: frame.col as i64, row: r }),
        (Err((c, _)), Err((r, _))) => Err(EngineError::OutOfRange { col: c, row: r }),
    };
    if let Err(ref e) = result {
        log::debug!("reference out of range at ({}, {}): {}", frame.col, frame.row, e);
    }
    result
}

/// Expands a range into its rectangle of coordinates in column-major
/// sub-traversal order, matching the Sheet's own storage order (spec §4.4
/// leaves the row-major-vs-column-major choice to the range endpoints; we
/// resolve that ambiguity the same way throughout, see DESIGN.md).
pub fn resolve_cell_range(spec: &CellRangeSpec, frame: CallFrame) -> Result<Vec<(usize, usize)>, EngineError> {
    let (c1, r1) = resolve_cell_ref(&spec.start, frame)?;
    let (c2, r2) = resolve_cell_ref(&spec.end, frame)?;
    let (col_lo, col_hi) = (c1.min(c2), c1.max(c2));
    let (row_lo, row_hi) = (r1.min(r2), r1.max(r2));

    let mut coords = Vec::with_capacity((col_hi - col_lo + 1) * (row_hi - row_lo + 1));
    for col in col_lo..=col_hi {
        for row in row_lo..=row_hi {
            coords.push((col, row));
        }
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here(col: usize, row: usize) -> CallFrame {
        CallFrame::new(col, row)
    }

    fn spec(col_absolute: bool, col_ref: i64, row_absolute: bool, row_ref: i64) -> CellRefSpec {
        CellRefSpec { col_absolute, col_ref, row_absolute, row_ref }
    }

    #[test]
    fn absolute_reference_ignores_frame() {
        let (c, r) = resolve_cell_ref(&spec(true, 5, true, 5), here(100, 100)).unwrap();
        assert_eq!((c, r), (5, 5));
    }

    #[test]
    fn relative_reference_offsets_from_frame() {
        let (c, r) = resolve_cell_ref(&spec(false, -1, false, 1), here(5, 5)).unwrap();
        assert_eq!((c, r), (4, 6));
    }

    #[test]
    fn negative_result_is_out_of_range() {
        let err = resolve_cell_ref(&spec(false, -10, true, 0), here(0, 0)).unwrap_err();
        assert!(matches!(err, EngineError::OutOfRange { .. }));
    }

    #[test]
    fn range_expands_in_column_major_order() {
        let range = CellRangeSpec {
            start: spec(true, 0, true, 0),
            end: spec(true, 1, true, 1),
        };
        let coords = resolve_cell_range(&range, here(0, 0)).unwrap();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn range_handles_reversed_corners() {
        let range = CellRangeSpec {
            start: spec(true, 1, true, 1),
            end: spec(true, 0, true, 0),
        };
        let coords = resolve_cell_range(&range, here(0, 0)).unwrap();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
