// crates/pixelrts-core/src/meta/reconcile.rs

use crate::error::{Result, RtsError};
use crate::meta::metadata::ContainerMetadata;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataSource {
    Embedded,
    Sidecar,
}

/// Which copy the decoder trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Both present and identical.
    Both,
    EmbeddedOnly,
    SidecarOnly,
    /// Both present, they disagreed, and the caller chose one.
    Preferred(MetadataSource),
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Both => f.write_str("embedded+sidecar"),
            Provenance::EmbeddedOnly => f.write_str("embedded"),
            Provenance::SidecarOnly => f.write_str("sidecar"),
            Provenance::Preferred(MetadataSource::Embedded) => f.write_str("embedded (preferred)"),
            Provenance::Preferred(MetadataSource::Sidecar) => f.write_str("sidecar (preferred)"),
        }
    }
}

/// Pick the authoritative record.
///
/// - one copy present: it wins
/// - both present: they must agree field for field, unless `prefer` names a winner
/// - neither: `MetadataMissing`
///
/// The winner is validated before it is returned.
pub fn reconcile(
    embedded: Option<&ContainerMetadata>,
    sidecar: Option<&ContainerMetadata>,
    prefer: Option<MetadataSource>,
    container: &str,
) -> Result<(ContainerMetadata, Provenance)> {
    let (meta, provenance) = match (embedded, sidecar) {
        (None, None) => {
            return Err(RtsError::MetadataMissing {
                container: container.to_string(),
            })
        }
        (Some(e), None) => (e, Provenance::EmbeddedOnly),
        (None, Some(s)) => (s, Provenance::SidecarOnly),
        (Some(e), Some(s)) => match (e.first_difference(s), prefer) {
            (None, _) => (e, Provenance::Both),
            (Some((field, embedded, sidecar)), None) => {
                return Err(RtsError::MetadataMismatch {
                    field,
                    embedded,
                    sidecar,
                })
            }
            (Some((field, _, _)), Some(source)) => {
                tracing::warn!(field, ?source, "metadata copies disagree; using preferred source");
                let chosen = match source {
                    MetadataSource::Embedded => e,
                    MetadataSource::Sidecar => s,
                };
                (chosen, Provenance::Preferred(source))
            }
        },
    };
    meta.validate()?;
    Ok((meta.clone(), provenance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveOrder;
    use crate::meta::{HashAlgorithm, Mode};

    fn meta(len: u64) -> ContainerMetadata {
        ContainerMetadata::new(
            Mode::Standard,
            CurveOrder::new(4).unwrap(),
            len,
            HashAlgorithm::Sha256,
            &[3; 32],
            Default::default(),
        )
    }

    #[test]
    fn single_copy_is_authoritative() {
        let m = meta(10);
        assert_eq!(reconcile(Some(&m), None, None, "c").unwrap().1, Provenance::EmbeddedOnly);
        assert_eq!(reconcile(None, Some(&m), None, "c").unwrap().1, Provenance::SidecarOnly);
        assert_eq!(reconcile(Some(&m), Some(&m), None, "c").unwrap().1, Provenance::Both);
    }

    #[test]
    fn none_is_missing() {
        assert!(matches!(
            reconcile(None, None, None, "c.png"),
            Err(RtsError::MetadataMissing { .. })
        ));
    }

    #[test]
    fn disagreement_is_fatal_unless_preferred() {
        let (a, b) = (meta(10), meta(11));
        match reconcile(Some(&a), Some(&b), None, "c") {
            Err(RtsError::MetadataMismatch { field, .. }) => assert_eq!(field, "original_length"),
            other => panic!("expected mismatch, got {other:?}"),
        }
        let (m, p) = reconcile(Some(&a), Some(&b), Some(MetadataSource::Sidecar), "c").unwrap();
        assert_eq!(m.original_length, 11);
        assert_eq!(p, Provenance::Preferred(MetadataSource::Sidecar));
    }

    #[test]
    fn winner_is_validated() {
        let mut bad = meta(10);
        bad.grid_size = 3;
        assert!(matches!(
            reconcile(Some(&bad), None, None, "c"),
            Err(RtsError::Format(_))
        ));
    }
}
