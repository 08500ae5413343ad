//! FILENAME: persistence/src/load.rs
//! PURPOSE: Reads the HTML-like save format back into a `Sheet`.
//! CONTEXT: Spec §6.3. Ported from `LoadFile` in
//! `original_source/OddsAndEnds/SaveFile.cpp`. Preserves the
//! friendlier-to-the-user "load failure" behavior verbatim (SPEC_FULL.md
//! Supplemented features): a file that can't be opened, or whose first
//! line matches neither accepted header, yields a mostly-empty sheet with
//! A1 set to a LABEL reading the failure message, rather than an error
//! return.

use std::fs;
use std::path::Path;

use engine::sheet::Sheet;

use crate::error::FormatError;
use crate::escape::soften;
use crate::width::ColumnWidthMap;

const HEADER: &str = "<html><head><style>td { border: 1px solid black; }</style></head><body>";
const HEADER_NO_PREAMBLE: &str = "<html><head><style>td { border: 1px solid black; }</style></head><body><table>";
const FOOTER: &str = "</table></body></html>";

pub struct Loaded {
    pub sheet: Sheet,
    pub widths: ColumnWidthMap,
    pub libraries: Vec<(String, String)>,
}

fn failure(message: String) -> Loaded {
    log::warn!("{}", message);
    let mut sheet = Sheet::new();
    sheet.init_cell_at(0, 0);
    *sheet.get_cell_mut(0, 0).unwrap() = engine::cell::Cell::new_label(message);
    Loaded { sheet, widths: ColumnWidthMap::new(), libraries: Vec::new() }
}

pub fn load_file(path: &Path) -> Loaded {
    match fs::read_to_string(path) {
        Ok(content) => load_str(&content, &path.display().to_string()),
        Err(_) => failure(format!("Failed to open file {}", path.display())),
    }
}

pub fn load_str(content: &str, source_name: &str) -> Loaded {
    let mut lines = content.lines();

    let Some(first) = lines.next() else {
        return failure(format!("Failed to open file {}", source_name));
    };
    let first = first.trim_end_matches('\r');

    let mut libraries = Vec::new();
    let body_lines: Vec<&str>;

    if first == HEADER_NO_PREAMBLE {
        body_lines = lines.collect();
    } else if first == HEADER {
        let mut rest = lines;
        loop {
            match rest.next() {
                None => return failure(format!("Failed to open file {}", source_name)),
                Some(line) => {
                    let line = line.trim_end_matches('\r');
                    if line == "<table>" {
                        break;
                    }
                    match parse_preamble_line(line) {
                        Ok(Some(pair)) => libraries.push(pair),
                        Ok(None) => {}
                        Err(e) => log::warn!("{}", e),
                    }
                }
            }
        }
        body_lines = rest.collect();
    } else {
        return failure(format!("Failed to open file {}", source_name));
    }

    let mut sheet = Sheet::new();
    let mut widths = ColumnWidthMap::new();
    let mut col = 0usize;
    for line in body_lines {
        let line = line.trim_end_matches('\r');
        if line == FOOTER {
            break;
        }
        parse_column_line(line, col, &mut sheet, &mut widths);
        col += 1;
    }

    Loaded { sheet, widths, libraries }
}

/// `Ok(None)` means the line isn't a library preamble line at all. Once a
/// line commits to being one (it contains `<b>`), a missing closing tag is
/// reported through `FormatError::MalformedPreamble` rather than silently
/// dropped.
fn parse_preamble_line(line: &str) -> Result<Option<(String, String)>, FormatError> {
    let Some(bn) = line.find("<b>") else { return Ok(None) };
    let malformed = || FormatError::MalformedPreamble(line.to_string());
    let en = line.find("</b>").ok_or_else(malformed)?;
    let bt = line.find("<p>").ok_or_else(malformed)?;
    let et = line.find("</p>").ok_or_else(malformed)?;
    let name = soften(&line[bn + 3..en]);
    let body = soften(&line[bt + 3..et]);
    Ok(Some((name, body)))
}

fn parse_column_line(line: &str, col: usize, sheet: &mut Sheet, widths: &mut ColumnWidthMap) {
    let Some(tag_end) = line.find('>') else { return };
    if let Some(attr_pos) = line.find("width=\"") {
        if attr_pos < tag_end {
            let rest = &line[attr_pos + 7..];
            if let Some(end_quote) = rest.find('"') {
                if let Ok(width) = rest[..end_quote].parse::<i32>() {
                    widths.set(col, width);
                }
            }
        }
    }

    let mut pos = tag_end + 1;
    let mut row = 0usize;
    let bytes = line.as_bytes();
    while pos < bytes.len() {
        if line[pos..].starts_with("</tr>") {
            break;
        } else if line[pos..].starts_with("<td />") {
            pos += "<td />".len();
            row += 1;
        } else if line[pos..].starts_with("<td>") {
            let content_start = pos + "<td>".len();
            let Some(end_rel) = line[content_start..].find("</td>") else { break };
            let content = soften(&line[content_start..content_start + end_rel]);
            if !content.is_empty() {
                sheet.init_cell_at(col, row);
                if let Some(formula) = content.strip_prefix('=') {
                    *sheet.get_cell_mut(col, row).unwrap() = engine::cell::Cell::new_value(formula.to_string());
                } else if let Some(text) = content.strip_prefix('<') {
                    *sheet.get_cell_mut(col, row).unwrap() = engine::cell::Cell::new_label(text.to_string());
                } else {
                    *sheet.get_cell_mut(col, row).unwrap() = engine::cell::Cell::new_label(content);
                }
            }
            pos = content_start + end_rel + "</td>".len();
            row += 1;
        } else {
            // Skip junk; advance to the next tag so an unrecognized sequence
            // can't stall the scan forever.
            match line[pos..].find('<') {
                Some(0) => pos += 1,
                Some(offset) => pos += offset,
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_value_and_a_label_cell() {
        let content = format!(
            "{}\n   <tr><td>=1+1</td><td><hello</td></tr>\n{}\n",
            HEADER_NO_PREAMBLE, FOOTER
        );
        let loaded = load_str(&content, "test");
        let a1 = loaded.sheet.get_cell_at(0, 0).unwrap();
        assert_eq!(a1.current_input, "1+1");
        let a2 = loaded.sheet.get_cell_at(0, 1).unwrap();
        assert_eq!(a2.current_input, "hello");
    }

    #[test]
    fn loads_a_column_width_attribute() {
        let content = format!("{}\n   <tr width=\"20\"><td>=1</td></tr>\n{}\n", HEADER_NO_PREAMBLE, FOOTER);
        let loaded = load_str(&content, "test");
        assert_eq!(loaded.widths.get(0), 20);
    }

    #[test]
    fn loads_a_library_preamble() {
        let content = format!("{}\n<b>mylib</b><p>fn body</p>\n<table>\n   <tr><td /></tr>\n{}\n", HEADER, FOOTER);
        let loaded = load_str(&content, "test");
        assert_eq!(loaded.libraries, vec![("mylib".to_string(), "fn body".to_string())]);
    }

    #[test]
    fn parse_preamble_line_rejects_an_unclosed_tag() {
        let err = parse_preamble_line("<b>mylib</b><p>fn body").unwrap_err();
        assert!(matches!(err, FormatError::MalformedPreamble(_)));
    }

    #[test]
    fn skips_a_malformed_preamble_line_but_still_loads_the_table() {
        let content = format!(
            "{}\n<b>mylib</b><p>fn body\n<table>\n   <tr><td /></tr>\n{}\n",
            HEADER, FOOTER
        );
        let loaded = load_str(&content, "test");
        assert!(loaded.libraries.is_empty());
        assert!(loaded.sheet.get_cell_at(0, 0).is_none());
    }

    #[test]
    fn rejects_an_unrecognized_header_with_a_friendly_label_cell() {
        let loaded = load_str("not a spreadsheet file\n", "bad.txt");
        let a1 = loaded.sheet.get_cell_at(0, 0).unwrap();
        assert_eq!(a1.current_input, "Failed to open file bad.txt");
    }

    #[test]
    fn a_missing_file_produces_the_same_friendly_fallback() {
        let loaded = load_file(Path::new("/does/not/exist.html"));
        let a1 = loaded.sheet.get_cell_at(0, 0).unwrap();
        assert!(a1.current_input.starts_with("Failed to open file"));
    }
}
