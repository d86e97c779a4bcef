// crates/pixelrts-core/src/curve/planner.rs

use std::ops::RangeInclusive;

use crate::curve::{CurveOrder, MAX_ORDER};
use crate::error::{Result, RtsError};

/// Smallest order whose capacity (4^n * 4 bytes) holds `data_length` bytes.
/// Zero bytes still get a 1x1 grid.
pub fn plan(data_length: u64) -> Result<CurveOrder> {
    for n in 0..=MAX_ORDER {
        let order = CurveOrder::new(n as u32)?;
        if order.capacity() >= data_length {
            tracing::debug!(data_length, order = n, "planned grid order");
            return Ok(order);
        }
    }
    Err(RtsError::DataTooLarge {
        len: data_length,
        capacity: CurveOrder::MAX.capacity(),
    })
}

/// Like [`plan`], but honours an explicitly requested order when it is large enough.
pub fn plan_with(data_length: u64, requested: Option<CurveOrder>) -> Result<CurveOrder> {
    match requested {
        None => plan(data_length),
        Some(order) if order.capacity() >= data_length => Ok(order),
        Some(order) => Err(RtsError::DataTooLarge {
            len: data_length,
            capacity: order.capacity(),
        }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityRow {
    pub order: CurveOrder,
    pub side: u32,
    pub capacity: u64,
}

pub fn capacity_table(orders: RangeInclusive<u8>) -> Vec<CapacityRow> {
    orders
        .filter(|&n| n <= MAX_ORDER)
        .map(|n| {
            let order = CurveOrder(n);
            CapacityRow {
                order,
                side: order.side(),
                capacity: order.capacity(),
            }
        })
        .collect()
}
