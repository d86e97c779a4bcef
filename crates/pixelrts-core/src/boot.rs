// crates/pixelrts-core/src/boot.rs
//
// Launch scripts for decoded containers. The core only defines the seam;
// concrete generators (QEMU and friends) live with the caller.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::meta::ContainerMetadata;

pub const BOOT_SCRIPT_SUFFIX: &str = ".boot.sh";

pub trait BootScriptGenerator {
    /// Short identifier, e.g. `"qemu"`.
    fn name(&self) -> &str;

    /// Script text for booting the payload of `container`.
    fn generate(&self, container: &Path, metadata: &ContainerMetadata) -> Result<String>;
}

/// `<container path>.boot.sh`
pub fn boot_script_path(container: &Path) -> PathBuf {
    let mut s = container.as_os_str().to_owned();
    s.push(BOOT_SCRIPT_SUFFIX);
    PathBuf::from(s)
}

/// Generate and write the script beside the container, executable on unix.
pub fn write_boot_script<G>(gen: &G, container: &Path, metadata: &ContainerMetadata) -> Result<PathBuf>
where
    G: BootScriptGenerator + ?Sized,
{
    let script = gen.generate(container, metadata)?;
    let path = boot_script_path(container);
    std::fs::write(&path, script)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    }
    tracing::info!(generator = gen.name(), path = %path.display(), "boot script written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveOrder;
    use crate::meta::{HashAlgorithm, Mode};

    struct Echo;

    impl BootScriptGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate(&self, container: &Path, metadata: &ContainerMetadata) -> Result<String> {
            Ok(format!(
                "#!/bin/sh\necho {} {}\n",
                container.display(),
                metadata.original_length
            ))
        }
    }

    #[test]
    fn script_lands_beside_container() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("os.png");
        let meta = ContainerMetadata::new(
            Mode::Standard,
            CurveOrder::new(0).unwrap(),
            3,
            HashAlgorithm::Sha256,
            &[0; 32],
            Default::default(),
        );
        let path = write_boot_script(&Echo, &container, &meta).unwrap();
        assert_eq!(path, dir.path().join("os.png.boot.sh"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with(" 3\n"));
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
