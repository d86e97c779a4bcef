// crates/pixelrts-core/src/pixel/grid.rs

use crate::curve::CurveOrder;
use crate::error::{Result, RtsError};

/// Square RGBA8 raster, row-major, `side * side * 4` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    order: CurveOrder,
    rgba: Vec<u8>,
}

impl PixelGrid {
    pub fn blank(order: CurveOrder) -> Self {
        PixelGrid {
            order,
            rgba: vec![0u8; order.capacity() as usize],
        }
    }

    pub fn from_rgba(order: CurveOrder, rgba: Vec<u8>) -> Result<Self> {
        if rgba.len() as u64 != order.capacity() {
            return Err(RtsError::Format(format!(
                "rgba buffer is {} bytes, order {} needs {}",
                rgba.len(),
                order,
                order.capacity()
            )));
        }
        Ok(PixelGrid { order, rgba })
    }

    pub fn order(&self) -> CurveOrder {
        self.order
    }

    pub fn side(&self) -> u32 {
        self.order.side()
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    pub(crate) fn rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.rgba[i..i + 4].copy_from_slice(&px);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.side() && y < self.side(), "pixel ({x}, {y}) outside grid");
        (y as usize * self.side() as usize + x as usize) * 4
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("order", &self.order)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}
