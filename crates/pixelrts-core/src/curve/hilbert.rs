// crates/pixelrts-core/src/curve/hilbert.rs
//
// Hilbert curve index <-> (x, y). Coordinates are transposed relative to the
// textbook d2xy so the first step of every curve runs along x, matching
// containers produced by earlier PixelRTS encoders.

use std::sync::OnceLock;

use rayon::prelude::*;

use crate::curve::CurveOrder;
use crate::error::{Result, RtsError};

/// Orders up to this one get a cached lookup table (4^11 entries, 32 MiB for both directions).
/// Larger orders fall back to the bit-level walk per pixel.
pub const LUT_MAX_ORDER: u8 = 11;

struct HilbertTable {
    /// index -> (x << 16) | y
    coords: Vec<u32>,
    /// (y * side + x) -> index
    index: Vec<u32>,
}

static TABLES: [OnceLock<HilbertTable>; LUT_MAX_ORDER as usize + 1] =
    [const { OnceLock::new() }; LUT_MAX_ORDER as usize + 1];

impl HilbertTable {
    fn build(order: CurveOrder) -> Self {
        let n = order.get();
        let pixels = order.pixels() as usize;
        let side = order.side() as usize;

        let coords: Vec<u32> = (0..pixels)
            .into_par_iter()
            .map(|k| {
                let (x, y) = d2xy(n, k as u64);
                (x << 16) | y
            })
            .collect();

        let mut index = vec![0u32; pixels];
        for (k, &c) in coords.iter().enumerate() {
            let (x, y) = unpack_xy(c);
            index[y as usize * side + x as usize] = k as u32;
        }

        tracing::debug!(order = n, pixels, "built hilbert lookup table");
        HilbertTable { coords, index }
    }
}

fn table_for(order: CurveOrder) -> &'static HilbertTable {
    TABLES[order.get() as usize].get_or_init(|| HilbertTable::build(order))
}

#[inline]
fn unpack_xy(c: u32) -> (u32, u32) {
    (c >> 16, c & 0xFFFF)
}

/// Indexer bound to one order. Cheap to copy; tables are shared process-wide and
/// never mutated after construction.
#[derive(Clone, Copy)]
pub struct HilbertCurve {
    order: CurveOrder,
    table: Option<&'static HilbertTable>,
}

impl std::fmt::Debug for HilbertCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HilbertCurve")
            .field("order", &self.order)
            .field("cached", &self.table.is_some())
            .finish()
    }
}

impl HilbertCurve {
    pub fn new(order: CurveOrder) -> Self {
        let table = (order.get() <= LUT_MAX_ORDER).then(|| table_for(order));
        HilbertCurve { order, table }
    }

    pub fn order(&self) -> CurveOrder {
        self.order
    }

    /// Index -> (x, y). `index` must be below `order.pixels()`.
    #[inline]
    pub fn forward(&self, index: u64) -> (u32, u32) {
        debug_assert!(index < self.order.pixels());
        match self.table {
            Some(t) => unpack_xy(t.coords[index as usize]),
            None => d2xy(self.order.get(), index),
        }
    }

    /// (x, y) -> index. Both coordinates must be below `order.side()`.
    #[inline]
    pub fn inverse(&self, x: u32, y: u32) -> u64 {
        debug_assert!(x < self.order.side() && y < self.order.side());
        match self.table {
            Some(t) => t.index[y as usize * self.order.side() as usize + x as usize] as u64,
            None => xy2d(self.order.get(), x, y),
        }
    }

    pub fn forward_checked(&self, index: u64) -> Result<(u32, u32)> {
        check_index(index, self.order)?;
        Ok(self.forward(index))
    }

    pub fn inverse_checked(&self, x: u32, y: u32) -> Result<u64> {
        check_coord(x, y, self.order)?;
        Ok(self.inverse(x, y))
    }
}

/// Index -> (x, y) without touching the cached tables.
pub fn forward(index: u64, order: CurveOrder) -> Result<(u32, u32)> {
    check_index(index, order)?;
    Ok(d2xy(order.get(), index))
}

/// (x, y) -> index without touching the cached tables.
pub fn inverse(x: u32, y: u32, order: CurveOrder) -> Result<u64> {
    check_coord(x, y, order)?;
    Ok(xy2d(order.get(), x, y))
}

fn check_index(index: u64, order: CurveOrder) -> Result<()> {
    if index >= order.pixels() {
        return Err(RtsError::IndexOutOfRange {
            index,
            order: order.get(),
        });
    }
    Ok(())
}

fn check_coord(x: u32, y: u32, order: CurveOrder) -> Result<()> {
    if x >= order.side() || y >= order.side() {
        return Err(RtsError::CoordOutOfRange {
            x,
            y,
            order: order.get(),
        });
    }
    Ok(())
}

fn d2xy(order: u8, index: u64) -> (u32, u32) {
    let n = 1u64 << order;
    let (mut x, mut y) = (0u64, 0u64);
    let mut t = index;
    let mut s = 1u64;
    while s < n {
        let rx = 1 & (t >> 1);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t >>= 2;
        s <<= 1;
    }
    (y as u32, x as u32)
}

fn xy2d(order: u8, px: u32, py: u32) -> u64 {
    let n = 1u64 << order;
    // undo the transpose applied in d2xy
    let (mut x, mut y) = (py as u64, px as u64);
    let mut d = 0u64;
    let mut s = n >> 1;
    while s > 0 {
        let rx = ((x & s) > 0) as u64;
        let ry = ((y & s) > 0) as u64;
        d += s * s * ((3 * rx) ^ ry);
        rotate(n, &mut x, &mut y, rx, ry);
        s >>= 1;
    }
    d
}

#[inline]
fn rotate(n: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(n: u32) -> CurveOrder {
        CurveOrder::new(n).unwrap()
    }

    #[test]
    fn order1_walks_along_x_first() {
        let pts: Vec<_> = (0..4).map(|k| forward(k, order(1)).unwrap()).collect();
        assert_eq!(pts, vec![(0, 0), (1, 0), (1, 1), (0, 1)]);
    }

    #[test]
    fn order0_is_single_pixel() {
        assert_eq!(forward(0, order(0)).unwrap(), (0, 0));
        assert_eq!(inverse(0, 0, order(0)).unwrap(), 0);
        assert!(forward(1, order(0)).is_err());
    }

    #[test]
    fn cached_and_direct_agree() {
        let o = order(6);
        let curve = HilbertCurve::new(o);
        for k in 0..o.pixels() {
            let (x, y) = curve.forward(k);
            assert_eq!((x, y), forward(k, o).unwrap());
            assert_eq!(curve.inverse(x, y), k);
        }
    }

    #[test]
    fn uncached_order_roundtrips_samples() {
        let o = order(LUT_MAX_ORDER as u32 + 2);
        let curve = HilbertCurve::new(o);
        let step = o.pixels() / 997;
        let mut k = 0;
        while k < o.pixels() {
            let (x, y) = curve.forward(k);
            assert_eq!(curve.inverse(x, y), k);
            k += step;
        }
    }

    #[test]
    fn checked_rejects_out_of_range() {
        let curve = HilbertCurve::new(order(2));
        assert!(matches!(
            curve.forward_checked(16),
            Err(RtsError::IndexOutOfRange { index: 16, order: 2 })
        ));
        assert!(matches!(
            curve.inverse_checked(4, 0),
            Err(RtsError::CoordOutOfRange { .. })
        ));
    }
}
