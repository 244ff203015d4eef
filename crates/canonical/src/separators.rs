//! Separator normalization for file base names.
//!
//! Upload tools disagree on word separators: `planta baixa`, `planta-baixa`,
//! `planta__baixa` and `planta.baixa` all name the same drawing. Every run of
//! separator characters collapses to a single `_`, and separators at either
//! end are dropped.
//!
//! ```rust
//! use canonical::collapse_separators;
//!
//! assert_eq!(collapse_separators("  planta -- baixa__"), "planta_baixa");
//! assert_eq!(collapse_separators("___"), "");
//! ```

/// Returns true for characters treated as word separators in file names.
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '_' | '-' | '.')
}

/// Collapses separator runs into one `_` and trims separators from the edges.
pub fn collapse_separators(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split(is_separator).filter(|s| !s.is_empty()) {
        if !normalized.is_empty() {
            normalized.push('_');
        }
        normalized.push_str(segment);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_separators_collapse() {
        let cases = [
            ("planta baixa", "planta_baixa"),
            ("planta\t-\tbaixa", "planta_baixa"),
            ("memorial.descritivo", "memorial_descritivo"),
            ("-lead-and-trail-", "lead_and_trail"),
            ("single", "single"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(collapse_separators(input), expected, "input {input:?}");
        }
    }
}
