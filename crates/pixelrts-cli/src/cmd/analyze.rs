// crates/pixelrts-cli/src/cmd/analyze.rs

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pixelrts_core::container::save_image;
use pixelrts_core::curve::plan;
use pixelrts_core::semantic::{analyze_complexity, is_wasm, legend, render_code_view, OpcodeCategory};
use pixelrts_core::{decode, DecodeOptions, LoadedContainer};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Container to analyze (or a raw file with --raw)
    pub input: PathBuf,

    /// Treat the input as raw bytes instead of a container
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    /// Show the top N most frequent bytes
    #[arg(long, default_value_t = 16)]
    pub top: usize,

    /// Skip the zstd compressed-size report
    #[arg(long)]
    pub no_zstd: bool,

    /// Zstd compression level (1..=22 typical). Higher is slower.
    #[arg(long, default_value_t = 3)]
    pub zstd_level: i32,

    /// Render the WebAssembly code view to this PNG
    #[arg(long)]
    pub code_view: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (bytes, order, usage) = if args.raw {
        let bytes = std::fs::read(&args.input)
            .with_context(|| format!("read {}", args.input.display()))?;
        let order = plan(bytes.len() as u64)?;
        (bytes, order, None)
    } else {
        let loaded = LoadedContainer::open(&args.input)
            .with_context(|| format!("open {}", args.input.display()))?;
        let order = loaded.grid.order();
        let lenient = DecodeOptions {
            lenient: true,
            ..Default::default()
        };
        let dec = decode(&loaded, &lenient)?;
        if !dec.verified {
            tracing::warn!(
                input = %args.input.display(),
                "content hash mismatch; analyzing unverified bytes"
            );
        }
        let usage = dec.metadata.capacity_usage();
        (dec.bytes, order, Some(usage))
    };
    let n = bytes.len() as u64;

    let mut h = [0u64; 256];
    for &b in &bytes {
        h[b as usize] += 1;
    }

    let distinct = h.iter().filter(|&&c| c > 0).count();
    let entropy = entropy_bits_256(&h, n);

    let mut rows: Vec<(u8, u64)> = (0u8..=255u8)
        .map(|b| (b, h[b as usize]))
        .filter(|&(_b, c)| c > 0)
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    eprintln!("--- analyze ---");
    eprintln!("file            = {}", args.input.display());
    eprintln!("bytes           = {}", n);
    eprintln!("grid            = {}x{} (order {})", order.side(), order.side(), order.get());
    if let Some(u) = usage {
        eprintln!("capacity_used   = {:.3}%", u);
    }
    eprintln!("distinct_bytes  = {}/256", distinct);
    eprintln!("entropy_bits    = {:.6} (max 8.000000)", entropy);

    if !args.no_zstd {
        let z = zstd_size(&bytes, args.zstd_level)?;
        let ratio = if z == 0 { 0.0 } else { (n as f64) / (z as f64) };
        eprintln!("--- zstd ---");
        eprintln!("zstd_level      = {}", args.zstd_level);
        eprintln!("zstd_bytes      = {}", z);
        eprintln!("ratio_raw/zstd  = {:.4}x", ratio);
    }

    let topn = args.top.min(rows.len());
    eprintln!("--- top {} bytes ---", topn);
    for (i, (b, c)) in rows.iter().take(topn).enumerate() {
        let pct = if n == 0 { 0.0 } else { (*c as f64) * 100.0 / (n as f64) };
        eprintln!(
            "#{:>2} byte=0x{:02X} ({:>3}) count={} ({:.3}%)",
            i + 1,
            b,
            b,
            c,
            pct
        );
    }

    if is_wasm(&bytes) {
        let c = analyze_complexity(&bytes);
        eprintln!("--- wasm ---");
        for cat in OpcodeCategory::ALL {
            eprintln!("{:<15} = {}", cat.name(), c.count(cat));
        }
        eprintln!("{:<15} = {}", "unknown", c.unknown);
        eprintln!("complexity      = {:.1}/100", c.score);

        if let Some(path) = &args.code_view {
            save_image(path, &render_code_view(&bytes, order))
                .with_context(|| format!("write code view {}", path.display()))?;
            eprintln!("code_view       = {}", path.display());
            for (ch, meaning) in legend() {
                eprintln!("  {ch}: {meaning}");
            }
        }
    } else if args.code_view.is_some() {
        eprintln!("code_view       = (skipped: payload is not WebAssembly)");
    }

    Ok(())
}

fn zstd_size(bytes: &[u8], level: i32) -> anyhow::Result<usize> {
    let out = zstd::stream::encode_all(Cursor::new(bytes), level)?;
    Ok(out.len())
}

fn entropy_bits_256(h: &[u64; 256], total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut ent = 0.0;
    for &c in h.iter() {
        if c == 0 {
            continue;
        }
        let p = (c as f64) / (total as f64);
        ent -= p * p.log2();
    }
    ent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_extremes() {
        let mut h = [0u64; 256];
        h[7] = 100;
        assert_eq!(entropy_bits_256(&h, 100), 0.0);

        let h = [1u64; 256];
        assert!((entropy_bits_256(&h, 256) - 8.0).abs() < 1e-9);
        assert_eq!(entropy_bits_256(&[0; 256], 0), 0.0);
    }
}
