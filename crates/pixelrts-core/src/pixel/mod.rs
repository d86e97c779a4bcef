// crates/pixelrts-core/src/pixel/mod.rs

pub mod grid;
pub mod pack;

pub use grid::PixelGrid;
pub use pack::{pack, pack_rows, pixels_for, unpack, unpack_range};

/// Pixels per streamed block (1 MiB of payload).
pub const BLOCK_PIXELS: usize = 1 << 18;
