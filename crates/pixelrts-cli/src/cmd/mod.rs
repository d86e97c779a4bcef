// crates/pixelrts-cli/src/cmd/mod.rs

pub mod analyze;
pub mod capacity;
pub mod convert;
pub mod extract;
