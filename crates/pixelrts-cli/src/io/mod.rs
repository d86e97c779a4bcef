// crates/pixelrts-cli/src/io/mod.rs

pub mod fields;
pub mod report;
