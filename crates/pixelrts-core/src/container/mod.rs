// crates/pixelrts-core/src/container/mod.rs

pub mod image;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::curve::CurveOrder;
use crate::error::Result;
use crate::meta::{encode_block, read_sidecar, write_sidecar, ContainerMetadata};
use crate::pixel::PixelGrid;

pub use image::{band_rows, read_png, read_png_header, write_png};

pub const CODE_VIEW_SUFFIX: &str = ".code.png";

/// `<container path>.code.png`
pub fn code_view_path(container: &Path) -> PathBuf {
    let mut s = container.as_os_str().to_owned();
    s.push(CODE_VIEW_SUFFIX);
    PathBuf::from(s)
}

/// A freshly encoded container, ready to be written.
#[derive(Clone, Debug)]
pub struct Container {
    pub metadata: ContainerMetadata,
    pub grid: PixelGrid,
    /// Display-only rendering, present for recognised code in code mode.
    pub code_view: Option<PixelGrid>,
}

/// Files produced by [`Container::save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFiles {
    pub image: PathBuf,
    pub sidecar: PathBuf,
    pub code_view: Option<PathBuf>,
}

impl Container {
    /// Write the PNG (with embedded block), the sidecar, and the code view if any.
    pub fn save(&self, path: &Path) -> Result<SavedFiles> {
        let text = encode_block(&self.metadata)?;
        let image = stage(path, |w| write_grid(w, &self.grid, Some(&text)))?;
        let view = match &self.code_view {
            Some(view) => {
                let p = code_view_path(path);
                Some((stage(&p, |w| write_grid(w, view, None))?, p))
            }
            None => None,
        };

        persist(image, path)?;
        let code_view = match view {
            Some((tmp, p)) => {
                persist(tmp, &p)?;
                Some(p)
            }
            None => {
                remove_stale_view(path)?;
                None
            }
        };
        let sidecar = write_sidecar(path, &self.metadata)?;
        tracing::info!(path = %path.display(), order = self.metadata.grid_order, "container written");
        Ok(SavedFiles {
            image: path.to_path_buf(),
            sidecar,
            code_view,
        })
    }
}

/// A container read back from disk: pixels plus whichever metadata copies survived.
#[derive(Clone, Debug)]
pub struct LoadedContainer {
    pub grid: PixelGrid,
    pub embedded: Option<ContainerMetadata>,
    pub sidecar: Option<ContainerMetadata>,
    /// Display name used in errors.
    pub name: String,
}

impl LoadedContainer {
    pub fn open(path: &Path) -> Result<Self> {
        let (grid, embedded) = read_png(BufReader::new(File::open(path)?))?;
        let sidecar = read_sidecar(path)?;
        tracing::debug!(
            path = %path.display(),
            side = grid.side(),
            embedded = embedded.is_some(),
            sidecar = sidecar.is_some(),
            "container loaded"
        );
        Ok(LoadedContainer {
            grid,
            embedded,
            sidecar,
            name: path.display().to_string(),
        })
    }
}

impl From<Container> for LoadedContainer {
    fn from(c: Container) -> Self {
        LoadedContainer {
            grid: c.grid,
            embedded: Some(c.metadata.clone()),
            sidecar: Some(c.metadata),
            name: "<memory>".to_string(),
        }
    }
}

/// Metadata copies and grid order without decoding pixel data.
#[derive(Clone, Debug)]
pub struct ContainerHeader {
    pub order: CurveOrder,
    pub embedded: Option<ContainerMetadata>,
    pub sidecar: Option<ContainerMetadata>,
}

pub fn read_header(path: &Path) -> Result<ContainerHeader> {
    let (order, embedded) = read_png_header(BufReader::new(File::open(path)?))?;
    let sidecar = read_sidecar(path)?;
    Ok(ContainerHeader {
        order,
        embedded,
        sidecar,
    })
}

/// Write a bare grid as a PNG with no metadata block (used for display images).
pub fn save_image(path: &Path, grid: &PixelGrid) -> Result<()> {
    write_atomic(path, |w| write_grid(w, grid, None))
}

fn write_grid<W: Write>(w: W, grid: &PixelGrid, text: Option<&str>) -> Result<()> {
    let row_bytes = grid.side() as usize * 4;
    let rgba = grid.as_rgba();
    write_png(w, grid.order(), text, |rows, out| {
        let start = rows.start as usize * row_bytes;
        out.copy_from_slice(&rgba[start..start + out.len()]);
        Ok(())
    })
}

/// Write through a temporary file in the target directory; the target only
/// appears once `f` has succeeded.
pub(crate) fn write_atomic<F>(path: &Path, f: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    persist(stage(path, f)?, path)
}

/// Fill a temporary file beside `path`. Dropping the result removes it.
pub(crate) fn stage<F>(path: &Path, f: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        f(&mut w)?;
        w.flush()?;
    }
    Ok(tmp)
}

pub(crate) fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Drop a code view left by an earlier encode to the same path.
pub(crate) fn remove_stale_view(container: &Path) -> Result<()> {
    let p = code_view_path(container);
    match std::fs::remove_file(&p) {
        Ok(()) => {
            tracing::debug!(path = %p.display(), "removed stale code view");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_view_suffix() {
        assert_eq!(
            code_view_path(Path::new("a/b.png")),
            PathBuf::from("a/b.png.code.png")
        );
    }

    #[test]
    fn save_without_view_removes_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.png");
        std::fs::write(code_view_path(&target), b"old view").unwrap();

        let c = crate::encode(b"plain", &crate::EncodeOptions::default()).unwrap();
        let saved = c.save(&target).unwrap();
        assert!(saved.code_view.is_none());
        assert!(!code_view_path(&target).exists());
    }

    #[test]
    fn failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.png");
        let r = write_atomic(&target, |_| Err(crate::RtsError::Cancelled));
        assert!(r.is_err());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
