// crates/pixelrts-core/src/container/image.rs
//
// RGBA8 PNG framing. The metadata block goes in an iTXt chunk ahead of IDAT so a
// header-only read sees it; pixel rows are written and read in bands.

use std::io::{Read, Write};
use std::ops::Range;

use png::{BitDepth, ColorType, Decoder, Encoder, Limits, Transformations};

use crate::curve::CurveOrder;
use crate::error::{Result, RtsError};
use crate::meta::{decode_block, ContainerMetadata, TEXT_KEYWORD};
use crate::pixel::{PixelGrid, BLOCK_PIXELS};

/// Rows per band for a grid of the given side (at least one).
pub fn band_rows(side: u32) -> u32 {
    ((BLOCK_PIXELS as u64 / side as u64) as u32).clamp(1, side)
}

/// Write a `side x side` RGBA8 PNG, pulling pixel rows from `fill` one band at a time.
///
/// `fill(rows, out)` receives a buffer of exactly `rows.len() * side * 4` bytes.
pub fn write_png<W, F>(w: W, order: CurveOrder, text: Option<&str>, mut fill: F) -> Result<()>
where
    W: Write,
    F: FnMut(Range<u32>, &mut [u8]) -> Result<()>,
{
    let side = order.side();
    let mut enc = Encoder::new(w, side, side);
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    if let Some(text) = text {
        enc.add_itxt_chunk(TEXT_KEYWORD.to_string(), text.to_string())?;
    }
    let mut writer = enc.write_header()?;
    let mut stream = writer.stream_writer()?;

    let step = band_rows(side);
    let row_bytes = side as usize * 4;
    let mut band = vec![0u8; step as usize * row_bytes];
    let mut y = 0u32;
    while y < side {
        let end = (y + step).min(side);
        let buf = &mut band[..(end - y) as usize * row_bytes];
        fill(y..end, buf)?;
        stream.write_all(buf)?;
        y = end;
    }
    stream.finish()?;
    writer.finish()?;
    Ok(())
}

/// Grid order and embedded metadata, without touching IDAT.
pub fn read_png_header<R: Read>(r: R) -> Result<(CurveOrder, Option<ContainerMetadata>)> {
    let reader = open_reader(r)?;
    let order = check_shape(reader.info())?;
    Ok((order, embedded_metadata(reader.info())))
}

pub fn read_png<R: Read>(r: R) -> Result<(PixelGrid, Option<ContainerMetadata>)> {
    let mut reader = open_reader(r)?;
    let order = check_shape(reader.info())?;
    let embedded = embedded_metadata(reader.info());

    let mut grid = PixelGrid::blank(order);
    let row_bytes = order.side() as usize * 4;
    let rgba = grid.rgba_mut();
    for y in 0..order.side() as usize {
        let row = reader
            .next_row()?
            .ok_or_else(|| RtsError::Format(format!("png ends before row {y}")))?;
        let data = row.data();
        if data.len() != row_bytes {
            return Err(RtsError::Format(format!(
                "png row {y} is {} bytes, expected {row_bytes}",
                data.len()
            )));
        }
        rgba[y * row_bytes..(y + 1) * row_bytes].copy_from_slice(data);
    }
    Ok((grid, embedded))
}

fn open_reader<R: Read>(r: R) -> Result<png::Reader<R>> {
    let mut dec = Decoder::new_with_limits(r, Limits { bytes: usize::MAX });
    dec.set_transformations(Transformations::IDENTITY);
    Ok(dec.read_info()?)
}

fn check_shape(info: &png::Info) -> Result<CurveOrder> {
    if info.color_type != ColorType::Rgba || info.bit_depth != BitDepth::Eight {
        return Err(RtsError::Format(format!(
            "expected 8-bit RGBA, found {:?} at {:?}",
            info.color_type, info.bit_depth
        )));
    }
    if info.width != info.height {
        return Err(RtsError::Format(format!(
            "grid must be square, found {}x{}",
            info.width, info.height
        )));
    }
    CurveOrder::from_side(info.width)
}

/// The embedded block, if present and intact. A damaged block reads as absent.
fn embedded_metadata(info: &png::Info) -> Option<ContainerMetadata> {
    let itxt = info
        .utf8_text
        .iter()
        .filter(|c| c.keyword == TEXT_KEYWORD)
        .filter_map(|c| c.get_text().ok());
    let text = info
        .uncompressed_latin1_text
        .iter()
        .filter(|c| c.keyword == TEXT_KEYWORD)
        .map(|c| c.text.clone());

    let raw = itxt.chain(text).next()?;
    match decode_block(&raw) {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring damaged embedded metadata");
            None
        }
    }
}
