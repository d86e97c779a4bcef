// crates/pixelrts-cli/src/cmd/extract.rs

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use pixelrts_core::{decode_file, inspect_file, DecodeOptions, MetadataSource, RtsError};

use crate::io::report::write_metadata;

pub const EXTRACTED_SUFFIX: &str = ".extracted";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SourceArg {
    Embedded,
    Sidecar,
}

impl From<SourceArg> for MetadataSource {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Embedded => MetadataSource::Embedded,
            SourceArg::Sidecar => MetadataSource::Sidecar,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input container (.png)
    pub input: PathBuf,

    /// Output file (default: <input>.extracted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report the hash check explicitly; a failed check exits non-zero even with --lenient
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Print metadata only (no pixel decode)
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// With --info: print the metadata record as JSON
    #[arg(long, default_value_t = false, requires = "info")]
    pub json: bool,

    /// Write the bytes even if the hash check fails
    #[arg(long, default_value_t = false)]
    pub lenient: bool,

    /// Trust this metadata copy when embedded and sidecar disagree
    #[arg(long, value_enum)]
    pub prefer: Option<SourceArg>,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let prefer = args.prefer.map(MetadataSource::from);

    if args.info {
        let (meta, provenance) = inspect_file(&args.input, prefer)
            .with_context(|| format!("inspect {}", args.input.display()))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&meta)?);
        } else {
            println!("container       = {}", args.input.display());
            write_metadata(&mut std::io::stdout(), &meta, Some(provenance))?;
        }
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    let opts = DecodeOptions {
        lenient: args.lenient,
        prefer,
        ..Default::default()
    };

    let dec = match decode_file(&args.input, &output, &opts) {
        Ok(d) => d,
        Err(e @ RtsError::Integrity { .. }) if args.verify => {
            println!("verified = false");
            return Err(e).with_context(|| format!("extract {}", args.input.display()));
        }
        Err(e) => return Err(e).with_context(|| format!("extract {}", args.input.display())),
    };

    eprintln!("--- extract ---");
    eprintln!("container       = {}", args.input.display());
    eprintln!("output          = {}", dec.output.display());
    eprintln!("bytes           = {}", dec.metadata.original_length);
    eprintln!("metadata_source = {}", dec.provenance);

    if args.verify {
        println!("verified = {}", dec.verified);
    }
    if !dec.verified {
        tracing::warn!(
            output = %dec.output.display(),
            "content hash mismatch; output holds unverified bytes"
        );
        if args.verify {
            bail!("integrity check failed for {}", args.input.display());
        }
    }
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let mut s = input.as_os_str().to_owned();
    s.push(EXTRACTED_SUFFIX);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_appends_suffix() {
        assert_eq!(
            default_output(Path::new("dir/os.rts.png")),
            PathBuf::from("dir/os.rts.png.extracted")
        );
    }
}
