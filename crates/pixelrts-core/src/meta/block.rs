// crates/pixelrts-core/src/meta/block.rs

use crate::error::{Result, RtsError};
use crate::meta::metadata::ContainerMetadata;

/// PNG text keyword carrying the embedded metadata block.
pub const TEXT_KEYWORD: &str = "PixelRTS";

const BLOCK_PREFIX: &str = "PXRTS2";

/// Embedded block text:
/// `PXRTS2:<crc32 of json, 8 hex>:<compact json>`
pub fn encode_block(meta: &ContainerMetadata) -> Result<String> {
    let json = serde_json::to_string(meta)?;
    Ok(format!("{BLOCK_PREFIX}:{:08x}:{json}", crc32(json.as_bytes())))
}

pub fn decode_block(text: &str) -> Result<ContainerMetadata> {
    let rest = text
        .strip_prefix(BLOCK_PREFIX)
        .and_then(|r| r.strip_prefix(':'))
        .ok_or_else(|| RtsError::Format("embedded block: bad prefix".into()))?;
    let (crc_hex, json) = rest
        .split_once(':')
        .ok_or_else(|| RtsError::Format("embedded block: missing crc32".into()))?;
    let want = u32::from_str_radix(crc_hex, 16)
        .map_err(|_| RtsError::Format(format!("embedded block: bad crc32 {crc_hex:?}")))?;
    let got = crc32(json.as_bytes());
    if want != got {
        return Err(RtsError::Format(format!(
            "embedded block: crc32 mismatch (stored {want:08x}, computed {got:08x})"
        )));
    }
    Ok(serde_json::from_str(json)?)
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(bytes);
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveOrder;
    use crate::meta::{HashAlgorithm, Mode};

    fn sample() -> ContainerMetadata {
        ContainerMetadata::new(
            Mode::Code,
            CurveOrder::new(2).unwrap(),
            42,
            HashAlgorithm::Blake3,
            &[9; 32],
            Default::default(),
        )
    }

    #[test]
    fn block_roundtrip() {
        let text = encode_block(&sample()).unwrap();
        assert!(text.starts_with("PXRTS2:"));
        assert_eq!(decode_block(&text).unwrap(), sample());
    }

    #[test]
    fn corrupted_json_fails_crc() {
        let text = encode_block(&sample()).unwrap().replace("\"original_length\":42", "\"original_length\":43");
        let err = decode_block(&text).unwrap_err();
        assert!(format!("{err}").contains("crc32 mismatch"));
    }

    #[test]
    fn foreign_text_is_rejected() {
        assert!(decode_block("Software: something else").is_err());
        assert!(decode_block("PXRTS2:zz:{}").is_err());
    }
}
