// crates/pixelrts-cli/src/cmd/convert.rs

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use pixelrts_core::boot::write_boot_script;
use pixelrts_core::{encode_file, CurveOrder, EncodeOptions, HashAlgorithm, Mode};

use crate::boot::QemuBootScript;
use crate::io::fields::{extension_fields, parse_field, Descriptors};
use crate::io::report::write_metadata;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Standard,
    Code,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Standard => Mode::Standard,
            ModeArg::Code => Mode::Code,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HashArg {
    Sha256,
    Blake3,
}

impl From<HashArg> for HashAlgorithm {
    fn from(h: HashArg) -> Self {
        match h {
            HashArg::Sha256 => HashAlgorithm::Sha256,
            HashArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file (any bytes)
    pub input: PathBuf,

    /// Output container path (e.g. kernel.rts.png)
    pub output: PathBuf,

    /// standard = raw bytes only; code = also render <output>.code.png for WebAssembly
    #[arg(long, value_enum, default_value_t = ModeArg::Standard)]
    pub mode: ModeArg,

    /// Content hash stored in the metadata
    #[arg(long, value_enum, default_value_t = HashArg::Sha256)]
    pub hash: HashArg,

    /// Grid side in pixels (power of two). Default: smallest grid that fits.
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Content type (kernel, os, wasm, binary, ...)
    #[arg(long = "type")]
    pub content_type: Option<String>,

    /// Content name
    #[arg(long)]
    pub name: Option<String>,

    /// Content version
    #[arg(long)]
    pub content_version: Option<String>,

    /// Content description
    #[arg(long)]
    pub description: Option<String>,

    /// Extra metadata field key=value (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Also write <output>.boot.sh for QEMU
    #[arg(long, default_value_t = false)]
    pub generate_boot_script: bool,

    /// QEMU architecture for the boot script
    #[arg(long, default_value = "x86_64")]
    pub qemu_arch: String,

    /// QEMU memory size for the boot script
    #[arg(long, default_value = "2G")]
    pub qemu_memory: String,

    /// QEMU CPU model for the boot script
    #[arg(long, default_value = "host")]
    pub qemu_cpu: String,

    /// Kernel command line for the boot script
    #[arg(long)]
    pub kernel_cmdline: Option<String>,
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let grid_order = args
        .grid_size
        .map(CurveOrder::from_side)
        .transpose()
        .context("--grid-size")?;

    let descriptors = Descriptors {
        content_type: args.content_type.as_deref(),
        name: args.name.as_deref(),
        version: args.content_version.as_deref(),
        description: args.description.as_deref(),
        extra: &args.fields,
    };
    let opts = EncodeOptions {
        mode: args.mode.into(),
        hash: args.hash.into(),
        grid_order,
        extension_fields: extension_fields(&args.input, &descriptors),
        ..Default::default()
    };

    let enc = encode_file(&args.input, &args.output, &opts).with_context(|| {
        format!(
            "convert {} -> {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    eprintln!("--- convert ---");
    eprintln!("input           = {}", args.input.display());
    eprintln!("output          = {}", enc.files.image.display());
    eprintln!("sidecar         = {}", enc.files.sidecar.display());
    write_metadata(&mut std::io::stderr(), &enc.metadata, None)?;

    match &enc.files.code_view {
        Some(p) => eprintln!("code_view       = {}", p.display()),
        None if opts.mode == Mode::Code => {
            eprintln!("code_view       = (skipped: input is not WebAssembly)")
        }
        None => {}
    }

    if args.generate_boot_script {
        let gen = QemuBootScript {
            arch: args.qemu_arch,
            memory: args.qemu_memory,
            cpu: args.qemu_cpu,
            kernel_cmdline: args.kernel_cmdline,
        };
        let script = write_boot_script(&gen, &args.output, &enc.metadata)
            .context("write boot script")?;
        eprintln!("boot_script     = {}", script.display());
    }

    Ok(())
}
