// crates/pixelrts-core/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RtsError>;

#[derive(Debug, Error)]
pub enum RtsError {
    #[error("invalid curve order {order} (supported: 0..={max})")]
    InvalidOrder { order: u32, max: u8 },

    #[error("data too large: {len} bytes exceeds capacity of {capacity} bytes")]
    DataTooLarge { len: u64, capacity: u64 },

    #[error("metadata missing: no embedded block in {container} and no sidecar")]
    MetadataMissing { container: String },

    #[error("metadata mismatch on `{field}`: embedded={embedded} sidecar={sidecar}")]
    MetadataMismatch {
        field: &'static str,
        embedded: String,
        sidecar: String,
    },

    #[error("integrity error: expected {expected}, decoded bytes hash to {actual}")]
    Integrity { expected: String, actual: String },

    #[error("curve index {index} out of range for order {order}")]
    IndexOutOfRange { index: u64, order: u8 },

    #[error("coordinate ({x}, {y}) out of range for order {order}")]
    CoordOutOfRange { x: u32, y: u32, order: u8 },

    #[error("container format error: {0}")]
    Format(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("png encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("png decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("metadata json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
