//! FILENAME: engine/src/error.rs
//! PURPOSE: The error taxonomy of spec §7, as a Rust sum type.
//! CONTEXT: Replaces the original's exception hierarchy (§9 "Exception-driven
//! control flow for cycle/parse errors") with a `Result` the Evaluator
//! threads explicitly. The cycle-detected case never surfaces as an
//! `EngineError` at all — it's resolved inline by returning the re-entered
//! cell's cached value (§4.2 "Cycle detection") — so it has no variant here.

use thiserror::Error;

/// §7 items 2, 4, and 5. Parse failure (item 1) isn't a variant: it's
/// reported as a plain diagnostic string and the cell is simply left
/// unparsed, matching the protocol in §4.2 step 4.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// §7 item 2: expression evaluated but types didn't line up.
    #[error("type error: {0}")]
    TypeError(String),

    /// §7 item 4: a cell reference resolved outside the grid.
    #[error("reference out of range: col {col}, row {row}")]
    OutOfRange { col: i64, row: i64 },

    /// §7 item 4: a named reference with no binding in the `NameMap`.
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// §7 item 5: an engine invariant was violated. The host is expected to
    /// treat this as unrecoverable.
    #[error("fatal engine invariant violation: {0}")]
    Fatal(String),
}

impl EngineError {
    /// §4.2 step 9 / §7 item 2: truncate at the first newline before
    /// surfacing to a caller that only wants a one-line message.
    pub fn first_line(&self) -> String {
        self.to_string().lines().next().unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_truncates_multiline_messages() {
        let err = EngineError::TypeError("bad\nmore detail".to_string());
        assert_eq!(err.first_line(), "type error: bad");
    }
}
