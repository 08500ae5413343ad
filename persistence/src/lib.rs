//! FILENAME: persistence/src/lib.rs
//! PURPOSE: Library root for the HTML-like save/load file format (spec §6.3).

pub mod error;
pub mod escape;
pub mod load;
pub mod render;
pub mod save;
pub mod width;

pub use error::FormatError;
pub use escape::{harden, soften};
pub use load::{load_file, load_str, Loaded};
pub use save::save;
pub use width::ColumnWidthMap;

#[cfg(test)]
mod tests {
    use super::*;
    use engine::getters::GetterTable;
    use engine::sheet::Sheet;
    use tempfile::NamedTempFile;

    #[test]
    fn round_trips_a_sheet_through_a_real_file() {
        let mut sheet = Sheet::new();
        sheet.init_cell_at(0, 0);
        sheet.get_cell_mut(0, 0).unwrap().current_input = "1+1".to_string();
        sheet.init_cell_at(1, 0);
        *sheet.get_cell_mut(1, 0).unwrap() = engine::cell::Cell::new_label("hello".to_string());

        let (registry, _) = GetterTable::with_builtins();
        let widths = ColumnWidthMap::new();

        let file = NamedTempFile::new().unwrap();
        {
            let f = std::fs::File::create(file.path()).unwrap();
            save(f, &sheet, &widths, &registry, &[]).unwrap();
        }

        let loaded = load_file(file.path());
        assert_eq!(loaded.sheet.get_cell_at(0, 0).unwrap().current_input, "1+1");
        assert_eq!(loaded.sheet.get_cell_at(1, 0).unwrap().current_input, "hello");
    }
}
