// crates/pixelrts-cli/src/io/report.rs

use std::io::Write;

use pixelrts_core::{ContainerMetadata, Provenance};

/// `key = value` lines for a metadata record.
pub fn write_metadata<W: Write>(
    w: &mut W,
    meta: &ContainerMetadata,
    provenance: Option<Provenance>,
) -> std::io::Result<()> {
    writeln!(w, "format          = {} v{}", meta.format, meta.format_version)?;
    writeln!(w, "mode            = {}", meta.mode.name())?;
    writeln!(
        w,
        "grid            = {}x{} (order {})",
        meta.grid_size, meta.grid_size, meta.grid_order
    )?;
    writeln!(w, "original_length = {}", meta.original_length)?;
    writeln!(w, "capacity_used   = {:.3}%", meta.capacity_usage())?;
    writeln!(w, "content_hash    = {}:{}", meta.hash_algorithm, meta.content_hash)?;
    if let Some(p) = provenance {
        writeln!(w, "metadata_source = {p}")?;
    }
    for (k, v) in &meta.extension_fields {
        writeln!(w, "field.{k:<10}= {v}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrts_core::{CurveOrder, HashAlgorithm, Mode};

    #[test]
    fn report_lines() {
        let mut ext = std::collections::BTreeMap::new();
        ext.insert("type".to_string(), "kernel".to_string());
        let meta = ContainerMetadata::new(
            Mode::Standard,
            CurveOrder::new(9).unwrap(),
            1024,
            HashAlgorithm::Sha256,
            &[0xab; 32],
            ext,
        );
        let mut out = Vec::new();
        write_metadata(&mut out, &meta, Some(Provenance::Both)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("grid            = 512x512 (order 9)"));
        assert!(text.contains("original_length = 1024"));
        assert!(text.contains("metadata_source = embedded+sidecar"));
        assert!(text.contains(&format!("content_hash    = sha256:{}", "ab".repeat(32))));
        assert!(text.contains("field.type      = kernel"));
    }
}
