//! FILENAME: persistence/src/save.rs
//! PURPOSE: Writes a `Sheet` to the HTML-like save format.
//! CONTEXT: Spec §6.3. Ported from `SaveFile` in
//! `original_source/OddsAndEnds/SaveFile.cpp`. Trimming (dropping trailing
//! empty cells per column, then trailing empty columns) is computed over a
//! local view of lengths rather than mutating the live `Sheet` — see
//! SPEC_FULL.md's decision on why `max_row` must stay untouched by save.

use std::io::Write;

use engine::cell::CellType;
use engine::sheet::Sheet;
use parser::GetterRegistry;

use crate::error::FormatError;
use crate::escape::harden;
use crate::render::render;
use crate::width::{ColumnWidthMap, DEF_COLUMN_WIDTH};

const HEADER: &str = "<html><head><style>td { border: 1px solid black; }</style></head><body>";
const HEADER_NO_PREAMBLE: &str = "<html><head><style>td { border: 1px solid black; }</style></head><body><table>";
const FOOTER: &str = "</table></body></html>";

/// Trailing empty slots in a column don't count toward its trimmed length.
fn trimmed_column_len(sheet: &Sheet, col: usize) -> usize {
    let mut len = sheet.column_len(col);
    while len > 0 && sheet.get_cell_at(col, len - 1).is_none() {
        len -= 1;
    }
    len
}

/// Trailing columns that trim to zero length don't count toward the
/// trimmed column count.
fn trimmed_column_count(sheet: &Sheet) -> usize {
    let mut count = sheet.column_count();
    while count > 0 && trimmed_column_len(sheet, count - 1) == 0 {
        count -= 1;
    }
    count
}

pub fn save<W: Write>(
    mut out: W,
    sheet: &Sheet,
    widths: &ColumnWidthMap,
    registry: &GetterRegistry,
    libraries: &[(String, String)],
) -> Result<(), FormatError> {
    if libraries.is_empty() {
        writeln!(out, "{}", HEADER_NO_PREAMBLE)?;
    } else {
        writeln!(out, "{}", HEADER)?;
        for (name, body) in libraries {
            writeln!(out, "<b>{}</b><p>{}</p>", harden(name), harden(body))?;
        }
        writeln!(out, "<table>")?;
    }

    let col_count = trimmed_column_count(sheet);
    for col in 0..col_count {
        let width = widths.get(col);
        if width == DEF_COLUMN_WIDTH {
            write!(out, "   <tr>")?;
        } else {
            write!(out, "   <tr width=\"{}\">", width)?;
        }

        let row_count = trimmed_column_len(sheet, col);
        if row_count == 0 {
            // Insert one cell so that web browsers still render the column.
            write!(out, "<td />")?;
        }
        for row in 0..row_count {
            match sheet.get_cell_at(col, row) {
                None => write!(out, "<td />")?,
                Some(cell) => match cell.cell_type {
                    CellType::Value => match &cell.value {
                        None => write!(out, "<td>={}</td>", harden(&cell.current_input))?,
                        Some(expr) => write!(out, "<td>={}</td>", harden(&render(expr, registry, col, row)))?,
                    },
                    CellType::Label => write!(out, "<td>&lt;{}</td>", harden(&cell.current_input))?,
                    CellType::Error => write!(out, "<td />")?,
                },
            }
        }
        writeln!(out, "</tr>")?;
    }

    writeln!(out, "{}", FOOTER)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::getters::GetterTable;

    #[test]
    fn trims_trailing_empty_cells_and_columns() {
        let mut sheet = Sheet::new();
        sheet.init_cell_at(0, 0);
        sheet.init_cell_at(0, 5);
        sheet.clear_cell_at(0, 5);
        sheet.init_cell_at(3, 0);
        sheet.clear_cell_at(3, 0);

        assert_eq!(trimmed_column_len(&sheet, 0), 1);
        assert_eq!(trimmed_column_count(&sheet), 1);
    }

    #[test]
    fn save_emits_unparsed_formula_cells_with_equals_marker() {
        let mut sheet = Sheet::new();
        sheet.init_cell_at(0, 0);
        sheet.get_cell_mut(0, 0).unwrap().current_input = "1+1".to_string();
        let (registry, _) = GetterTable::with_builtins();
        let widths = ColumnWidthMap::new();

        let mut buf = Vec::new();
        save(&mut buf, &sheet, &widths, &registry, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with(HEADER_NO_PREAMBLE));
        assert!(text.contains("<td>=1+1</td>"));
        assert!(text.trim_end().ends_with(FOOTER));
    }

    #[test]
    fn save_writes_a_column_width_attribute_only_when_non_default() {
        let mut sheet = Sheet::new();
        sheet.init_cell_at(0, 0);
        let mut widths = ColumnWidthMap::new();
        widths.set(0, 20);
        let (registry, _) = GetterTable::with_builtins();

        let mut buf = Vec::new();
        save(&mut buf, &sheet, &widths, &registry, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("<tr width=\"20\">"));
    }
}
