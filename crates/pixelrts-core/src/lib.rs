//! PixelRTS: lossless binary <-> PNG containers.
//!
//! Every byte of the source lands in an RGBA channel of a square, power-of-two
//! PNG. Pixels are visited in Hilbert-curve order, so neighbouring bytes stay
//! neighbouring pixels and the container can be eyeballed for structure.
//!
//! - [`curve`]: curve order, Hilbert indexer, capacity planner
//! - [`pixel`]: pixel grid and RGBA packing
//! - [`meta`]: container metadata, content hashing, embedded block, sidecar
//! - [`semantic`]: WebAssembly opcode colouring for the code view
//! - [`container`]: PNG read/write
//! - [`codec`]: encode/decode façade and the streaming file pipeline
//! - [`boot`]: boot-script collaborator interface

pub mod error;

pub mod boot;
pub mod codec;
pub mod container;
pub mod curve;
pub mod meta;
pub mod pixel;
pub mod semantic;

pub use crate::codec::{
    decode, decode_file, encode, encode_file, inspect_file, CancelToken, DecodeOptions, Decoded,
    DecodedFile, EncodeOptions, EncodedFile, Provenance,
};
pub use crate::container::{Container, LoadedContainer, SavedFiles};
pub use crate::curve::{CurveOrder, HilbertCurve};
pub use crate::error::{Result, RtsError};
pub use crate::meta::{ContainerMetadata, HashAlgorithm, MetadataSource, Mode};
pub use crate::pixel::PixelGrid;
