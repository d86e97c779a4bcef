// crates/pixelrts-core/src/meta/sidecar.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::meta::metadata::ContainerMetadata;

pub const SIDECAR_SUFFIX: &str = ".meta.json";

/// `<container path>.meta.json`
pub fn sidecar_path(container: &Path) -> PathBuf {
    let mut s = container.as_os_str().to_owned();
    s.push(SIDECAR_SUFFIX);
    PathBuf::from(s)
}

pub fn write_sidecar(container: &Path, meta: &ContainerMetadata) -> Result<PathBuf> {
    let path = sidecar_path(container);
    let mut json = serde_json::to_string_pretty(meta)?;
    json.push('\n');
    std::fs::write(&path, json)?;
    Ok(path)
}

/// `Ok(None)` when the sidecar is absent or unparseable; other I/O errors propagate.
pub fn read_sidecar(container: &Path) -> Result<Option<ContainerMetadata>> {
    let path = sidecar_path(container);
    let raw = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice(&raw) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable sidecar");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended() {
        assert_eq!(
            sidecar_path(Path::new("out/kernel.rts.png")),
            PathBuf::from("out/kernel.rts.png.meta.json")
        );
    }

    #[test]
    fn missing_and_garbage_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("x.png");
        assert!(read_sidecar(&container).unwrap().is_none());

        std::fs::write(sidecar_path(&container), "{ not json").unwrap();
        assert!(read_sidecar(&container).unwrap().is_none());
    }

    #[test]
    fn non_utf8_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("x.png");
        std::fs::write(sidecar_path(&container), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(read_sidecar(&container).unwrap().is_none());
    }
}
