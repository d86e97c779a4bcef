// crates/pixelrts-core/src/codec/stream.rs
//
// File-to-file pipeline. The source is memory-mapped and never copied whole;
// outputs are staged beside their targets and only appear on success.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::codec::{check_digest, check_grid, hash_blocks, DecodeOptions, EncodeOptions, BLOCK_BYTES};
use crate::container::{
    code_view_path, persist, read_header, remove_stale_view, stage, write_png, LoadedContainer,
    SavedFiles,
};
use crate::curve::{plan_with, HilbertCurve};
use crate::error::{Result, RtsError};
use crate::meta::{encode_block, reconcile, write_sidecar, ContainerMetadata, MetadataSource, Mode, Provenance};
use crate::pixel::{pack_rows, unpack_range, BLOCK_PIXELS};
use crate::semantic::{code_view_rows, is_wasm};

#[derive(Clone, Debug)]
pub struct EncodedFile {
    pub metadata: ContainerMetadata,
    pub files: SavedFiles,
}

#[derive(Clone, Debug)]
pub struct DecodedFile {
    pub output: PathBuf,
    pub verified: bool,
    pub metadata: ContainerMetadata,
    pub provenance: Provenance,
}

pub fn encode_file(input: &Path, output: &Path, opts: &EncodeOptions) -> Result<EncodedFile> {
    let file = File::open(input)?;
    let len = file.metadata()?.len();
    // Zero-length files cannot be mapped on every platform.
    let map = if len == 0 {
        None
    } else {
        // SAFETY: read-only mapping; the source is not expected to change underneath us.
        Some(unsafe { Mmap::map(&file)? })
    };
    let data: &[u8] = map.as_deref().unwrap_or(&[]);

    let order = plan_with(len, opts.grid_order)?;
    tracing::debug!(len, order = order.get(), "planned grid");
    let digest = hash_blocks(data, opts.hash, &opts.cancel)?;
    let metadata = ContainerMetadata::new(
        opts.mode,
        order,
        len,
        opts.hash,
        &digest,
        opts.extension_fields.clone(),
    );
    let text = encode_block(&metadata)?;
    let curve = HilbertCurve::new(order);

    let image = stage(output, |w| {
        write_png(w, order, Some(&text), |rows, out| {
            opts.cancel.check()?;
            tracing::trace!(rows = ?rows, "packing band");
            pack_rows(&curve, data, rows, out, |_, px| px);
            Ok(())
        })
    })?;

    let view = match opts.mode {
        Mode::Code if is_wasm(data) => {
            let p = code_view_path(output);
            let tmp = stage(&p, |w| {
                write_png(w, order, None, |rows, out| {
                    opts.cancel.check()?;
                    code_view_rows(&curve, data, rows, out);
                    Ok(())
                })
            })?;
            Some((tmp, p))
        }
        Mode::Code => {
            tracing::warn!(input = %input.display(), "code mode: input is not WebAssembly, skipping code view");
            None
        }
        Mode::Standard => None,
    };

    persist(image, output)?;
    let code_view = match view {
        Some((tmp, p)) => {
            persist(tmp, &p)?;
            Some(p)
        }
        None => {
            remove_stale_view(output)?;
            None
        }
    };
    let sidecar = write_sidecar(output, &metadata)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        len,
        order = order.get(),
        "encoded file"
    );
    Ok(EncodedFile {
        metadata,
        files: SavedFiles {
            image: output.to_path_buf(),
            sidecar,
            code_view,
        },
    })
}

/// Decode `input` into `output`. Bytes are written only if they verify, or
/// unconditionally when `opts.lenient` is set.
pub fn decode_file(input: &Path, output: &Path, opts: &DecodeOptions) -> Result<DecodedFile> {
    let loaded = LoadedContainer::open(input)?;
    let (metadata, provenance) = reconcile(
        loaded.embedded.as_ref(),
        loaded.sidecar.as_ref(),
        opts.prefer,
        &loaded.name,
    )?;
    check_grid(&metadata, &loaded.grid)?;

    let curve = HilbertCurve::new(loaded.grid.order());
    let mut hasher = metadata.hash_algorithm.hasher();
    let tmp = stage(output, |w| {
        let mut buf = vec![0u8; BLOCK_BYTES];
        let mut remaining = metadata.original_length;
        let mut first = 0u64;
        while remaining > 0 {
            opts.cancel.check()?;
            let n = remaining.min(BLOCK_BYTES as u64) as usize;
            let block = &mut buf[..n];
            unpack_range(&curve, &loaded.grid, first, block);
            hasher.update(block);
            w.write_all(block)?;
            tracing::trace!(first, n, "unpacked block");
            first += BLOCK_PIXELS as u64;
            remaining -= n as u64;
        }
        Ok(())
    })?;

    let verified = check_digest(&metadata, &hasher.finalize(), opts.lenient)?;
    persist(tmp, output)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        verified,
        provenance = %provenance,
        "decoded file"
    );
    Ok(DecodedFile {
        output: output.to_path_buf(),
        verified,
        metadata,
        provenance,
    })
}

/// Reconciled metadata from the PNG header chunks and sidecar; pixel data is not read.
pub fn inspect_file(path: &Path, prefer: Option<MetadataSource>) -> Result<(ContainerMetadata, Provenance)> {
    let header = read_header(path)?;
    let (metadata, provenance) = reconcile(
        header.embedded.as_ref(),
        header.sidecar.as_ref(),
        prefer,
        &path.display().to_string(),
    )?;
    if metadata.grid_order != header.order.get() {
        return Err(RtsError::Format(format!(
            "metadata grid_order {} but image side is {}",
            metadata.grid_order,
            header.order.side()
        )));
    }
    Ok((metadata, provenance))
}
