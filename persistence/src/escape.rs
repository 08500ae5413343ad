//! FILENAME: persistence/src/escape.rs
//! PURPOSE: The `harden`/`soften` text escaping used throughout the saved
//! file format.
//! CONTEXT: Spec §6.3. Ported from the free functions `harden`/`soften` in
//! `original_source/OddsAndEnds/SaveFile.cpp`. `harden` must apply its
//! replacements in order (`&` first, so later-introduced `&lt;`/`&gt;`/
//! `&sect;` sequences aren't re-escaped); `soften` reverses in the opposite
//! order for the same reason.

/// `& -> &amp;`, `< -> &lt;`, `> -> &gt;`, newline -> `&sect;`.
pub fn harden(input: &str) -> String {
    input.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('\n', "&sect;")
}

/// Reverses `harden`, in the opposite order.
pub fn soften(input: &str) -> String {
    input.replace("&sect;", "\n").replace("&gt;", ">").replace("&lt;", "<").replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_inverse_holds_for_arbitrary_text() {
        let samples = ["plain text", "a & b < c > d", "line one\nline two", "&amp;already escaped&amp;", ""];
        for s in samples {
            assert_eq!(soften(&harden(s)), s);
        }
    }

    #[test]
    fn harden_escapes_ampersand_before_introducing_new_ones() {
        assert_eq!(harden("<"), "&lt;");
        assert_eq!(harden("&lt;"), "&amp;lt;");
    }
}
