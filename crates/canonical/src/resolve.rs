use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::IdentityConfig;
use crate::error::CanonicalError;
use crate::identity::DocumentIdentity;
use crate::separators::{collapse_separators, is_separator};

/// Derives [`DocumentIdentity`] values from project ids and file names.
///
/// Resolution is a pure function of the inputs and the configuration:
///
/// 1. NFKC-normalize (when enabled), lowercase and trim the name
/// 2. strip the extension (the last `.` segment, unless the name starts with it)
/// 3. strip one trailing version token: optional separator, marker, digits
/// 4. collapse separator runs into `_` and trim separators from the ends
///
/// A step that would leave nothing behind is skipped, so `v2.dwg` keeps
/// `v2` as its base name instead of resolving to an empty identity.
///
/// ```rust
/// use canonical::IdentityResolver;
///
/// let resolver = IdentityResolver::default();
/// let a = resolver.resolve("P1", "planta_baixa_v1.dwg");
/// let b = resolver.resolve("P1", "PLANTA_BAIXA.DWG");
/// assert_eq!(a, b);
/// assert_eq!(a.base_name(), "planta_baixa");
/// ```
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    config: IdentityConfig,
    // Lowercased, longest first so "version" wins over "v".
    markers: Vec<String>,
}

impl IdentityResolver {
    /// Build a resolver after validating `config`.
    pub fn new(config: IdentityConfig) -> Result<Self, CanonicalError> {
        config.validate()?;
        let mut markers: Vec<String> = config
            .version_markers
            .iter()
            .map(|m| m.to_ascii_lowercase())
            .collect();
        markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        markers.dedup();
        Ok(Self { config, markers })
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Resolve the lineage identity for `file_name` within `project_id`.
    pub fn resolve(&self, project_id: &str, file_name: &str) -> DocumentIdentity {
        DocumentIdentity::new(project_id, self.base_name(file_name))
    }

    /// The normalized base name alone, without the project component.
    pub fn base_name(&self, file_name: &str) -> String {
        let normalized: Cow<str> = if self.config.normalize_unicode {
            Cow::Owned(file_name.nfkc().collect::<String>())
        } else {
            Cow::Borrowed(file_name)
        };
        let lowered = normalized.trim().to_lowercase();

        // "plan_v2 .dwg" and "plan_v2.dwg" must strip the same token.
        let stem = strip_extension(&lowered).trim_end_matches(is_separator);
        let unversioned = self.strip_version_token(stem);
        let base = collapse_separators(unversioned);
        if !base.is_empty() {
            return base;
        }

        // Names made only of separators and an extension ("__.pdf") still
        // need a stable identity.
        let fallback = collapse_separators(&lowered);
        if fallback.is_empty() {
            lowered
        } else {
            fallback
        }
    }

    fn strip_version_token<'a>(&self, stem: &'a str) -> &'a str {
        let without_digits = stem.trim_end_matches(|c: char| c.is_ascii_digit());
        if without_digits.len() == stem.len() {
            return stem;
        }
        for marker in &self.markers {
            if let Some(before) = without_digits.strip_suffix(marker.as_str()) {
                let before = before.strip_suffix(is_separator).unwrap_or(before);
                if collapse_separators(before).is_empty() {
                    return stem;
                }
                return before;
            }
        }
        stem
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        let config = IdentityConfig::default();
        Self {
            markers: vec!["version".into(), "v".into()],
            config,
        }
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
