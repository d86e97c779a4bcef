// crates/pixelrts-core/src/semantic/mod.rs
//
// Code view for WebAssembly payloads. The view is display-only; the container's
// authoritative pixels are never touched.

pub mod colorize;
pub mod opcodes;

pub use colorize::{analyze_complexity, code_view_rows, colorize, legend, render_code_view, Complexity};
pub use opcodes::{is_wasm, recognize, Opcode, OpcodeCategory, WASM_MAGIC};
