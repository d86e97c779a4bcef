// crates/pixelrts-cli/src/cmd/capacity.rs

use clap::Args;
use pixelrts_core::curve::{capacity_table, CurveOrder, MAX_ORDER};

#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Smallest curve order to list
    #[arg(long, default_value_t = 9)]
    pub min_order: u32,

    /// Largest curve order to list (at most 16)
    #[arg(long, default_value_t = 12)]
    pub max_order: u32,
}

pub fn run(args: CapacityArgs) -> anyhow::Result<()> {
    let lo = CurveOrder::new(args.min_order)?;
    let hi = CurveOrder::new(args.max_order)?;
    if lo > hi {
        anyhow::bail!("--min-order {} is above --max-order {}", lo.get(), hi.get());
    }

    println!("{:>5}  {:>11}  {:>14}  {:>10}", "order", "grid", "bytes", "human");
    for row in capacity_table(lo.get()..=hi.get()) {
        println!(
            "{:>5}  {:>11}  {:>14}  {:>10}",
            row.order.get(),
            format!("{}x{}", row.side, row.side),
            row.capacity,
            human_bytes(row.capacity)
        );
    }
    if hi.get() == MAX_ORDER {
        eprintln!("note: order {MAX_ORDER} is the largest supported grid");
    }
    Ok(())
}

fn human_bytes(n: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut v = n as f64;
    let mut u = 0;
    while v >= 1024.0 && u + 1 < UNITS.len() {
        v /= 1024.0;
        u += 1;
    }
    if v.fract() == 0.0 {
        format!("{} {}", v as u64, UNITS[u])
    } else {
        format!("{:.1} {}", v, UNITS[u])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_units() {
        assert_eq!(human_bytes(4), "4 B");
        assert_eq!(human_bytes(1 << 20), "1 MiB");
        assert_eq!(human_bytes(64 << 20), "64 MiB");
        assert_eq!(human_bytes(16 << 30), "16 GiB");
        assert_eq!(human_bytes(1536), "1.5 KiB");
    }
}
