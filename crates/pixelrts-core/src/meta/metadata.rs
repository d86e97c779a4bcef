// crates/pixelrts-core/src/meta/metadata.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::curve::CurveOrder;
use crate::error::{Result, RtsError};
use crate::meta::hash::{is_digest_hex, to_hex, HashAlgorithm};

pub const FORMAT_NAME: &str = "PixelRTS";
pub const FORMAT_VERSION: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Raw bytes in RGBA, nothing else.
    #[default]
    Standard,
    /// Standard packing plus a semantically coloured code view.
    Code,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Code => "code",
        }
    }
}

/// Record stored twice per container: in the PNG and in the sidecar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    pub format: String,
    pub format_version: u32,
    pub mode: Mode,
    pub grid_order: u8,
    pub grid_size: u32,
    /// Exact payload length before padding.
    pub original_length: u64,
    pub hash_algorithm: HashAlgorithm,
    /// Lowercase hex digest over the unpadded payload.
    pub content_hash: String,
    /// Opaque pass-through for collaborators (boot scripts, registries).
    #[serde(default)]
    pub extension_fields: BTreeMap<String, String>,
}

impl ContainerMetadata {
    pub fn new(
        mode: Mode,
        order: CurveOrder,
        original_length: u64,
        hash_algorithm: HashAlgorithm,
        digest: &[u8; 32],
        extension_fields: BTreeMap<String, String>,
    ) -> Self {
        ContainerMetadata {
            format: FORMAT_NAME.to_string(),
            format_version: FORMAT_VERSION,
            mode,
            grid_order: order.get(),
            grid_size: order.side(),
            original_length,
            hash_algorithm,
            content_hash: to_hex(digest),
            extension_fields,
        }
    }

    /// Check internal consistency and return the grid order.
    pub fn validate(&self) -> Result<CurveOrder> {
        if self.format != FORMAT_NAME {
            return Err(RtsError::Format(format!(
                "unknown container format {:?}",
                self.format
            )));
        }
        if self.format_version != FORMAT_VERSION {
            return Err(RtsError::Format(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        let order = CurveOrder::new(self.grid_order as u32)?;
        if self.grid_size != order.side() {
            return Err(RtsError::Format(format!(
                "grid_size {} does not match grid_order {}",
                self.grid_size, self.grid_order
            )));
        }
        if self.original_length > order.capacity() {
            return Err(RtsError::Format(format!(
                "original_length {} exceeds capacity {} of order {}",
                self.original_length,
                order.capacity(),
                self.grid_order
            )));
        }
        if !is_digest_hex(&self.content_hash) {
            return Err(RtsError::Format(format!(
                "content_hash is not a 256-bit hex digest: {:?}",
                self.content_hash
            )));
        }
        Ok(order)
    }

    /// First field (in declaration order) whose value differs, as
    /// `(field, self_value, other_value)`.
    pub fn first_difference(&self, other: &Self) -> Option<(&'static str, String, String)> {
        fn diff<T: PartialEq + std::fmt::Debug>(
            name: &'static str,
            a: &T,
            b: &T,
        ) -> Option<(&'static str, String, String)> {
            (a != b).then(|| (name, format!("{a:?}"), format!("{b:?}")))
        }

        diff("format", &self.format, &other.format)
            .or_else(|| diff("format_version", &self.format_version, &other.format_version))
            .or_else(|| diff("mode", &self.mode, &other.mode))
            .or_else(|| diff("grid_order", &self.grid_order, &other.grid_order))
            .or_else(|| diff("grid_size", &self.grid_size, &other.grid_size))
            .or_else(|| diff("original_length", &self.original_length, &other.original_length))
            .or_else(|| diff("hash_algorithm", &self.hash_algorithm, &other.hash_algorithm))
            .or_else(|| diff("content_hash", &self.content_hash, &other.content_hash))
            .or_else(|| diff("extension_fields", &self.extension_fields, &other.extension_fields))
    }

    pub fn capacity_usage(&self) -> f64 {
        let capacity = (self.grid_size as u64).pow(2) * 4;
        if capacity == 0 {
            0.0
        } else {
            self.original_length as f64 * 100.0 / capacity as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContainerMetadata {
        let order = CurveOrder::new(3).unwrap();
        let mut ext = BTreeMap::new();
        ext.insert("type".to_string(), "kernel".to_string());
        ContainerMetadata::new(Mode::Standard, order, 100, HashAlgorithm::Sha256, &[1; 32], ext)
    }

    #[test]
    fn json_shape_is_stable() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["format"], "PixelRTS");
        assert_eq!(v["mode"], "standard");
        assert_eq!(v["hash_algorithm"], "sha256");
        assert_eq!(v["grid_size"], 8);
        assert_eq!(v["extension_fields"]["type"], "kernel");
    }

    #[test]
    fn validate_catches_inconsistency() {
        assert_eq!(sample().validate().unwrap().get(), 3);

        let mut m = sample();
        m.grid_size = 16;
        assert!(m.validate().is_err());

        let mut m = sample();
        m.original_length = 257;
        assert!(m.validate().is_err());

        let mut m = sample();
        m.grid_order = 20;
        m.grid_size = 0;
        assert!(matches!(m.validate(), Err(RtsError::InvalidOrder { order: 20, .. })));

        let mut m = sample();
        m.format_version = 9;
        assert!(m.validate().is_err());
    }

    #[test]
    fn first_difference_names_field() {
        let a = sample();
        assert!(a.first_difference(&a.clone()).is_none());

        let mut b = a.clone();
        b.original_length = 99;
        let (field, x, y) = a.first_difference(&b).unwrap();
        assert_eq!((field, x.as_str(), y.as_str()), ("original_length", "100", "99"));

        let mut c = a.clone();
        c.extension_fields.insert("name".into(), "x".into());
        assert_eq!(a.first_difference(&c).unwrap().0, "extension_fields");
    }
}
