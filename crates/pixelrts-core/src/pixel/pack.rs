// crates/pixelrts-core/src/pixel/pack.rs
//
// Dense packing: bytes 4k..4k+3 of the zero-padded payload are the RGBA channels
// of the pixel at hilbert(k). Packing gathers per output row (each row asks the
// curve which k it holds), unpacking walks k ascending; both split work across
// rayon without shared writes.

use std::ops::Range;

use rayon::prelude::*;

use crate::curve::{CurveOrder, HilbertCurve, BYTES_PER_PIXEL};
use crate::error::{Result, RtsError};
use crate::pixel::PixelGrid;

const CHUNK_PIXELS: usize = 4096;

/// Number of pixels that carry payload for `len` bytes.
pub fn pixels_for(len: u64) -> u64 {
    len.div_ceil(BYTES_PER_PIXEL)
}

pub fn pack(data: &[u8], order: CurveOrder) -> Result<PixelGrid> {
    check_fits(data.len() as u64, order)?;
    let curve = HilbertCurve::new(order);
    let mut grid = PixelGrid::blank(order);
    pack_rows(&curve, data, 0..order.side(), grid.rgba_mut(), |_, px| px);
    Ok(grid)
}

pub fn unpack(grid: &PixelGrid, len: u64) -> Result<Vec<u8>> {
    check_fits(len, grid.order())?;
    let curve = HilbertCurve::new(grid.order());
    let mut out = vec![0u8; (pixels_for(len) * BYTES_PER_PIXEL) as usize];
    unpack_range(&curve, grid, 0, &mut out);
    out.truncate(len as usize);
    Ok(out)
}

/// Fill `out` with raster rows `rows` of the packed image.
///
/// `paint(k, raw)` maps the raw channel bytes of curve index `k` to the stored
/// pixel; the authoritative packing passes them through unchanged. Bytes past the
/// end of `source` read as zero.
pub fn pack_rows<F>(curve: &HilbertCurve, source: &[u8], rows: Range<u32>, out: &mut [u8], paint: F)
where
    F: Fn(u64, [u8; 4]) -> [u8; 4] + Sync,
{
    let row_bytes = curve.order().side() as usize * 4;
    debug_assert_eq!(out.len(), rows.len() * row_bytes);
    let y0 = rows.start;

    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(i, row)| {
            let y = y0 + i as u32;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let k = curve.inverse(x as u32, y);
                px.copy_from_slice(&paint(k, source_pixel(source, k)));
            }
        });
}

/// Read pixels `first..first + out.len() / 4` in curve order into `out`.
/// A trailing partial pixel in `out` takes the leading channels only.
pub fn unpack_range(curve: &HilbertCurve, grid: &PixelGrid, first: u64, out: &mut [u8]) {
    debug_assert_eq!(curve.order(), grid.order());
    let rgba = grid.as_rgba();
    let side = grid.side() as usize;

    out.par_chunks_mut(CHUNK_PIXELS * 4)
        .enumerate()
        .for_each(|(c, chunk)| {
            let base = first + (c * CHUNK_PIXELS) as u64;
            for (j, px) in chunk.chunks_mut(4).enumerate() {
                let (x, y) = curve.forward(base + j as u64);
                let src = (y as usize * side + x as usize) * 4;
                px.copy_from_slice(&rgba[src..src + px.len()]);
            }
        });
}

#[inline]
fn source_pixel(source: &[u8], k: u64) -> [u8; 4] {
    let mut px = [0u8; 4];
    let start = k.saturating_mul(BYTES_PER_PIXEL);
    if start < source.len() as u64 {
        let start = start as usize;
        let end = (start + 4).min(source.len());
        px[..end - start].copy_from_slice(&source[start..end]);
    }
    px
}

fn check_fits(len: u64, order: CurveOrder) -> Result<()> {
    if len > order.capacity() {
        return Err(RtsError::DataTooLarge {
            len,
            capacity: order.capacity(),
        });
    }
    Ok(())
}
