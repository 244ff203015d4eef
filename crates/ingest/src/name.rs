//! File-name sanitization and extension extraction.

/// Sanitizes an uploaded file name.
///
/// Control characters are removed when `strip_control` is set, then the name
/// is trimmed. Returns `None` when nothing usable is left: an empty name, a
/// name that still carries control characters, or one containing a path
/// separator (`a/b.pdf`, `..\\b.pdf`).
pub(crate) fn sanitize_file_name(raw: &str, strip_control: bool) -> Option<String> {
    let filtered = if strip_control {
        raw.chars().filter(|c| !c.is_control()).collect::<String>()
    } else {
        raw.to_string()
    };
    let trimmed = filtered.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_control() || c == '/' || c == '\\') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Lowercased extension including its dot, e.g. `".dwg"`.
///
/// Taken from the last `.` in the name; `None` when the name has no dot or
/// ends with one.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    if idx + 1 == name.len() {
        return None;
    }
    Some(name[idx..].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_chars_removed_when_enabled() {
        assert_eq!(
            sanitize_file_name(" plan\u{0007}.dwg\n", true).as_deref(),
            Some("plan.dwg")
        );
        assert_eq!(sanitize_file_name("plan\u{0007}.dwg", false), None);
    }

    #[test]
    fn paths_and_blank_names_rejected() {
        for raw in ["", "   ", "\u{0003}", "drawings/plan.dwg", "..\\plan.dwg"] {
            assert_eq!(sanitize_file_name(raw, true), None, "raw {raw:?}");
        }
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(extension_of("Plan.DWG").as_deref(), Some(".dwg"));
        assert_eq!(extension_of("a.b.pdf").as_deref(), Some(".pdf"));
        assert_eq!(extension_of(".pdf").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
