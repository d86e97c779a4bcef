// crates/pixelrts-core/src/codec/mod.rs
//
// encode: plan order -> hash (blocks) -> pack (row bands) -> metadata -> code view
// decode: reconcile metadata -> unpack (k blocks, hashed as they land) -> verify

pub mod cancel;
pub mod stream;

use std::collections::BTreeMap;

use crate::container::{Container, LoadedContainer};
use crate::curve::{plan_with, CurveOrder, HilbertCurve, BYTES_PER_PIXEL};
use crate::error::{Result, RtsError};
use crate::meta::{reconcile, to_hex, ContainerMetadata, HashAlgorithm, MetadataSource, Mode};
use crate::pixel::{pack_rows, unpack_range, PixelGrid, BLOCK_PIXELS};
use crate::semantic::{is_wasm, render_code_view};

pub use crate::meta::Provenance;
pub use cancel::CancelToken;
pub use stream::{decode_file, encode_file, inspect_file, DecodedFile, EncodedFile};

/// Payload bytes per streamed block.
pub(crate) const BLOCK_BYTES: usize = BLOCK_PIXELS * BYTES_PER_PIXEL as usize;

#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    pub mode: Mode,
    pub hash: HashAlgorithm,
    /// Fixed grid order; `None` picks the smallest that fits.
    pub grid_order: Option<CurveOrder>,
    pub extension_fields: BTreeMap<String, String>,
    pub cancel: CancelToken,
}

#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Return bytes that fail the hash check, flagged `verified = false`.
    pub lenient: bool,
    /// Source to trust when the two metadata copies disagree.
    pub prefer: Option<MetadataSource>,
    pub cancel: CancelToken,
}

#[derive(Clone, Debug)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    pub verified: bool,
    pub metadata: ContainerMetadata,
    pub provenance: Provenance,
}

pub fn encode(data: &[u8], opts: &EncodeOptions) -> Result<Container> {
    let order = plan_with(data.len() as u64, opts.grid_order)?;
    let digest = hash_blocks(data, opts.hash, &opts.cancel)?;

    let curve = HilbertCurve::new(order);
    let mut grid = PixelGrid::blank(order);
    fill_bands(&curve, grid.rgba_mut(), &opts.cancel, |c, rows, out| {
        pack_rows(c, data, rows, out, |_, px| px)
    })?;

    let metadata = ContainerMetadata::new(
        opts.mode,
        order,
        data.len() as u64,
        opts.hash,
        &digest,
        opts.extension_fields.clone(),
    );
    let code_view = match opts.mode {
        Mode::Code if is_wasm(data) => Some(render_code_view(data, order)),
        Mode::Code => {
            tracing::warn!("code mode: input is not WebAssembly, skipping code view");
            None
        }
        Mode::Standard => None,
    };
    tracing::info!(
        len = data.len(),
        order = order.get(),
        mode = opts.mode.name(),
        hash = %metadata.content_hash,
        "encoded"
    );
    Ok(Container {
        metadata,
        grid,
        code_view,
    })
}

pub fn decode(container: &LoadedContainer, opts: &DecodeOptions) -> Result<Decoded> {
    let (metadata, provenance) = reconcile(
        container.embedded.as_ref(),
        container.sidecar.as_ref(),
        opts.prefer,
        &container.name,
    )?;
    check_grid(&metadata, &container.grid)?;

    let curve = HilbertCurve::new(container.grid.order());
    let mut bytes = vec![0u8; metadata.original_length as usize];
    let mut hasher = metadata.hash_algorithm.hasher();
    let mut first = 0u64;
    for block in bytes.chunks_mut(BLOCK_BYTES) {
        opts.cancel.check()?;
        unpack_range(&curve, &container.grid, first, block);
        hasher.update(block);
        first += BLOCK_PIXELS as u64;
    }
    let verified = check_digest(&metadata, &hasher.finalize(), opts.lenient)?;
    tracing::info!(
        len = bytes.len(),
        verified,
        provenance = %provenance,
        "decoded"
    );
    Ok(Decoded {
        bytes,
        verified,
        metadata,
        provenance,
    })
}

pub(crate) fn hash_blocks(data: &[u8], alg: HashAlgorithm, cancel: &CancelToken) -> Result<[u8; 32]> {
    let mut hasher = alg.hasher();
    for block in data.chunks(BLOCK_BYTES) {
        cancel.check()?;
        hasher.update(block);
    }
    Ok(hasher.finalize())
}

/// Run `fill` over consecutive row bands of a full-grid buffer, checking `cancel` between bands.
fn fill_bands<F>(curve: &HilbertCurve, rgba: &mut [u8], cancel: &CancelToken, fill: F) -> Result<()>
where
    F: Fn(&HilbertCurve, std::ops::Range<u32>, &mut [u8]),
{
    let side = curve.order().side();
    let step = crate::container::band_rows(side);
    let row_bytes = side as usize * 4;
    for (i, band) in rgba.chunks_mut(step as usize * row_bytes).enumerate() {
        cancel.check()?;
        let y0 = i as u32 * step;
        let y1 = y0 + (band.len() / row_bytes) as u32;
        fill(curve, y0..y1, band);
    }
    Ok(())
}

/// The metadata must describe the grid it travels with.
pub(crate) fn check_grid(meta: &ContainerMetadata, grid: &PixelGrid) -> Result<()> {
    if meta.grid_order != grid.order().get() {
        return Err(RtsError::Format(format!(
            "metadata grid_order {} but image side is {}",
            meta.grid_order,
            grid.side()
        )));
    }
    Ok(())
}

/// `Ok(true)` on match; on mismatch `Integrity` unless lenient.
pub(crate) fn check_digest(meta: &ContainerMetadata, digest: &[u8; 32], lenient: bool) -> Result<bool> {
    let actual = to_hex(digest);
    if actual == meta.content_hash {
        return Ok(true);
    }
    if !lenient {
        return Err(RtsError::Integrity {
            expected: meta.content_hash.clone(),
            actual,
        });
    }
    tracing::warn!(expected = %meta.content_hash, actual = %actual, "hash mismatch; returning unverified bytes");
    Ok(false)
}
