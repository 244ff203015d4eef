//! Docflow identity layer.
//!
//! Uploads arrive with whatever name the author's tool produced:
//! `planta_baixa_v1.dwg`, `PLANTA_BAIXA.DWG`, `planta-baixa v2.dwg`. This crate
//! reduces a `(project, file name)` pair to a [`DocumentIdentity`] so every one
//! of those lands in the same version lineage.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC by default, configurable)
//! - Lowercasing and extension stripping
//! - Trailing version-token removal (`_v2`, `-version3`, configurable markers)
//! - Separator collapsing (`planta -- baixa` becomes `planta_baixa`)
//! - A stable SHA-256 key per identity for external storage
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no lookups, no locale dependence. Same project,
//! name and config give the same identity on any machine.

mod config;
mod error;
mod hash;
mod identity;
mod resolve;
mod separators;

pub use crate::config::IdentityConfig;
pub use crate::error::CanonicalError;
pub use crate::hash::hash_identity_parts;
pub use crate::identity::DocumentIdentity;
pub use crate::resolve::IdentityResolver;
pub use crate::separators::{collapse_separators, is_separator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineage_siblings_share_identity() {
        let resolver = IdentityResolver::default();
        let v1 = resolver.resolve("P1", "planta_baixa_v1.dwg");
        let v2 = resolver.resolve("P1", "planta_baixa_v2.dwg");
        let plain = resolver.resolve("P1", "PLANTA_BAIXA.DWG");

        assert_eq!(v1, v2);
        assert_eq!(v2, plain);
        assert_eq!(plain.base_name(), "planta_baixa");
        assert_eq!(plain.project_id(), "P1");
    }

    #[test]
    fn projects_partition_identities() {
        let resolver = IdentityResolver::default();
        let alpha = resolver.resolve("alpha", "memorial_descritivo.pdf");
        let beta = resolver.resolve("beta", "memorial_descritivo.pdf");

        assert_ne!(alpha, beta);
        assert_ne!(alpha.key(), beta.key());
        assert_eq!(alpha.base_name(), beta.base_name());
    }

    #[test]
    fn extension_does_not_split_lineage() {
        let resolver = IdentityResolver::default();
        assert_eq!(
            resolver.resolve("P1", "plan.dwg"),
            resolver.resolve("P1", "plan.pdf")
        );
    }

    #[test]
    fn unicode_equivalence_nfkc() {
        let resolver = IdentityResolver::default();
        let composed = resolver.resolve("P1", "Fachada_Caf\u{00E9}.pdf");
        let decomposed = resolver.resolve("P1", "fachada_cafe\u{0301}.pdf");
        assert_eq!(composed, decomposed);
        assert_eq!(composed.key(), decomposed.key());
    }

    #[test]
    fn disable_unicode_normalization() {
        let resolver = IdentityResolver::new(IdentityConfig {
            normalize_unicode: false,
            ..Default::default()
        })
        .expect("valid config");
        let composed = resolver.resolve("P1", "caf\u{00E9}.pdf");
        let decomposed = resolver.resolve("P1", "cafe\u{0301}.pdf");
        assert_ne!(composed, decomposed);
    }

    #[test]
    fn resolve_is_deterministic() {
        let resolver = IdentityResolver::default();
        let names = ["plan.dwg", "  Plan  V3 .pdf", "corte--AA_version12.dwg", ""];
        for name in names {
            let once = resolver.resolve("P", name);
            let twice = resolver.resolve("P", name);
            assert_eq!(once, twice);
            assert_eq!(once.key(), twice.key());
        }
    }

    #[test]
    fn display_joins_project_and_base() {
        let resolver = IdentityResolver::default();
        let identity = resolver.resolve("Projeto Alpha", "Corte AA_v2.dwg");
        assert_eq!(identity.to_string(), "Projeto Alpha/corte_aa");
    }

    #[test]
    fn invalid_config_rejected() {
        let res = IdentityResolver::new(IdentityConfig {
            version_markers: vec!["v-".into()],
            ..Default::default()
        });
        assert!(matches!(res, Err(CanonicalError::InvalidConfig(_))));
    }
}
