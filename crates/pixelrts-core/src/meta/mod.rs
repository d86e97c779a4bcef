// crates/pixelrts-core/src/meta/mod.rs

pub mod block;
pub mod hash;
pub mod metadata;
pub mod reconcile;
pub mod sidecar;

pub use block::{decode_block, encode_block, TEXT_KEYWORD};
pub use hash::{to_hex, ContentHasher, HashAlgorithm};
pub use metadata::{ContainerMetadata, Mode, FORMAT_NAME, FORMAT_VERSION};
pub use reconcile::{reconcile, MetadataSource, Provenance};
pub use sidecar::{read_sidecar, sidecar_path, write_sidecar, SIDECAR_SUFFIX};
