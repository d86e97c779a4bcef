// crates/pixelrts-core/src/curve/mod.rs

pub mod hilbert;
pub mod planner;

use std::fmt;

use crate::error::{Result, RtsError};

pub use hilbert::{forward, inverse, HilbertCurve, LUT_MAX_ORDER};
pub use planner::{capacity_table, plan, plan_with, CapacityRow};

/// Largest supported order: side 65536, 4^16 pixels, 16 GiB of payload.
pub const MAX_ORDER: u8 = 16;

/// Bytes stored per pixel (one per RGBA channel).
pub const BYTES_PER_PIXEL: u64 = 4;

/// Exponent `n` of a `2^n x 2^n` grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurveOrder(u8);

impl CurveOrder {
    pub const MIN: CurveOrder = CurveOrder(0);
    pub const MAX: CurveOrder = CurveOrder(MAX_ORDER);

    pub fn new(order: u32) -> Result<Self> {
        if order > MAX_ORDER as u32 {
            return Err(RtsError::InvalidOrder {
                order,
                max: MAX_ORDER,
            });
        }
        Ok(CurveOrder(order as u8))
    }

    /// Order of a grid with the given side length. The side must be a power of two.
    pub fn from_side(side: u32) -> Result<Self> {
        if side == 0 || !side.is_power_of_two() {
            return Err(RtsError::Format(format!(
                "grid side must be a non-zero power of two, got {side}"
            )));
        }
        CurveOrder::new(side.trailing_zeros())
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn side(self) -> u32 {
        1u32 << self.0
    }

    pub fn pixels(self) -> u64 {
        1u64 << (2 * self.0 as u32)
    }

    pub fn capacity(self) -> u64 {
        self.pixels() * BYTES_PER_PIXEL
    }
}

impl fmt::Display for CurveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.0, self.side(), self.side())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_bounds() {
        assert!(CurveOrder::new(16).is_ok());
        assert!(matches!(
            CurveOrder::new(17),
            Err(RtsError::InvalidOrder { order: 17, .. })
        ));
    }

    #[test]
    fn side_roundtrip() {
        for n in 0..=MAX_ORDER {
            let o = CurveOrder::new(n as u32).unwrap();
            assert_eq!(CurveOrder::from_side(o.side()).unwrap(), o);
        }
        assert!(CurveOrder::from_side(0).is_err());
        assert!(CurveOrder::from_side(768).is_err());
        assert!(matches!(
            CurveOrder::from_side(1 << 17),
            Err(RtsError::InvalidOrder { .. })
        ));
    }
}
