// crates/pixelrts-core/src/semantic/opcodes.rs

use std::fmt;

pub const WASM_MAGIC: &[u8; 4] = b"\0asm";

/// Size of the module preamble (magic + version).
pub const WASM_HEADER_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpcodeCategory {
    ControlFlow,
    Arithmetic,
    /// Loads, stores, memory.size/grow and local/global access.
    Memory,
    Parametric,
    Constant,
}

impl OpcodeCategory {
    pub const ALL: [OpcodeCategory; 5] = [
        OpcodeCategory::ControlFlow,
        OpcodeCategory::Arithmetic,
        OpcodeCategory::Memory,
        OpcodeCategory::Parametric,
        OpcodeCategory::Constant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OpcodeCategory::ControlFlow => "control-flow",
            OpcodeCategory::Arithmetic => "arithmetic",
            OpcodeCategory::Memory => "memory",
            OpcodeCategory::Parametric => "parametric",
            OpcodeCategory::Constant => "constant",
        }
    }
}

impl fmt::Display for OpcodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A byte that names a known single-byte WebAssembly opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub byte: u8,
    pub category: OpcodeCategory,
}

impl Opcode {
    /// Control-flow heat used for the red channel.
    pub fn heat(self) -> u8 {
        match (self.category, self.byte) {
            (OpcodeCategory::ControlFlow, 0x00) => 255,
            (OpcodeCategory::ControlFlow, 0x02..=0x04) => 200,
            (OpcodeCategory::ControlFlow, 0x0c | 0x0d | 0x0f) => 150,
            (OpcodeCategory::ControlFlow, 0x01) => 0,
            (OpcodeCategory::ControlFlow, _) => 100,
            (OpcodeCategory::Arithmetic, _) => 80,
            (OpcodeCategory::Memory, _) => 50,
            (OpcodeCategory::Constant, _) => 30,
            (OpcodeCategory::Parametric, _) => 0,
        }
    }
}

pub fn is_wasm(data: &[u8]) -> bool {
    data.starts_with(WASM_MAGIC)
}

pub fn recognize(byte: u8) -> Option<Opcode> {
    category(byte).map(|category| Opcode { byte, category })
}

fn category(byte: u8) -> Option<OpcodeCategory> {
    use OpcodeCategory::*;
    let c = match byte {
        // unreachable nop block loop if else / end br br_if br_table return call call_indirect
        0x00..=0x05 | 0x0b..=0x11 => ControlFlow,
        // drop select select_t
        0x0a | 0x1b | 0x1c => Parametric,
        // local.get .. global.set, loads, stores, memory.size, memory.grow
        0x20..=0x24 | 0x28..=0x40 => Memory,
        // i32/i64/f32/f64.const
        0x41..=0x44 => Constant,
        // comparisons
        0x45..=0x66 => Arithmetic,
        // i32 and i64 integer ops
        0x6a..=0x78 | 0x7c..=0x8a => Arithmetic,
        // f32 add..max, f64 add..max
        0x92..=0x97 | 0xa0..=0xa5 => Arithmetic,
        _ => return None,
    };
    Some(c)
}
