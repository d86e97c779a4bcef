// crates/pixelrts-cli/src/main.rs

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod boot;
mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "pixelrts")]
#[command(about = "PixelRTS: lossless binary <-> PNG containers", long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Worker threads for packing/unpacking (default: RAYON_NUM_THREADS or all cores)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a file into a .png container (+ .meta.json sidecar)
    Convert(cmd::convert::ConvertArgs),

    /// Decode a container back to the original bytes, or print its metadata
    Extract(cmd::extract::ExtractArgs),

    /// Analyze a container payload (histogram, entropy, zstd, WASM opcode mix)
    Analyze(cmd::analyze::AnalyzeArgs),

    /// Print grid side and capacity for a range of curve orders
    Capacity(cmd::capacity::CapacityArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configure worker pool")?;
    }

    match cli.cmd {
        Commands::Convert(args) => cmd::convert::run(args),
        Commands::Extract(args) => cmd::extract::run(args),
        Commands::Analyze(args) => cmd::analyze::run(args),
        Commands::Capacity(args) => cmd::capacity::run(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
