// crates/pixelrts-core/src/semantic/colorize.rs

use std::ops::Range;

use crate::curve::{CurveOrder, HilbertCurve, BYTES_PER_PIXEL};
use crate::pixel::{pack_rows, PixelGrid};
use crate::semantic::opcodes::{recognize, Opcode, OpcodeCategory, WASM_HEADER_LEN};

/// Display pixel for one packed pixel whose first byte may be an opcode.
///
/// R = control-flow heat, G and B = the next two bytes (operands),
/// A = 255 for a recognised opcode, 0 for data.
pub fn colorize(raw: [u8; 4], opcode: Option<Opcode>) -> [u8; 4] {
    match opcode {
        Some(op) => [op.heat(), raw[1], raw[2], 255],
        None => [0, raw[1], raw[2], 0],
    }
}

fn code_pixel(len: u64, k: u64, raw: [u8; 4]) -> [u8; 4] {
    if k.saturating_mul(BYTES_PER_PIXEL) >= len {
        return [0; 4];
    }
    colorize(raw, recognize(raw[0]))
}

/// Rows `rows` of the code view over `data`, same addressing as the container.
pub fn code_view_rows(curve: &HilbertCurve, data: &[u8], rows: Range<u32>, out: &mut [u8]) {
    let len = data.len() as u64;
    pack_rows(curve, data, rows, out, |k, raw| code_pixel(len, k, raw));
}

pub fn render_code_view(data: &[u8], order: CurveOrder) -> PixelGrid {
    let curve = HilbertCurve::new(order);
    let mut grid = PixelGrid::blank(order);
    code_view_rows(&curve, data, 0..order.side(), grid.rgba_mut());
    grid
}

/// Channel legend for the code view.
pub fn legend() -> [(&'static str, &'static str); 4] {
    [
        ("R", "control-flow heat (unreachable 255, block/loop/if 200, br/br_if/return 150, call 100, arithmetic 80, memory 50, const 30)"),
        ("G", "operand 1"),
        ("B", "operand 2"),
        ("A", "255 = recognised opcode, 0 = data or padding"),
    ]
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Complexity {
    pub control_flow: u64,
    pub arithmetic: u64,
    pub memory: u64,
    pub parametric: u64,
    pub constant: u64,
    pub unknown: u64,
    /// 0..=100, control-flow share scaled by 200.
    pub score: f64,
}

impl Complexity {
    pub fn total(&self) -> u64 {
        self.control_flow + self.arithmetic + self.memory + self.parametric + self.constant + self.unknown
    }

    pub fn count(&self, category: OpcodeCategory) -> u64 {
        match category {
            OpcodeCategory::ControlFlow => self.control_flow,
            OpcodeCategory::Arithmetic => self.arithmetic,
            OpcodeCategory::Memory => self.memory,
            OpcodeCategory::Parametric => self.parametric,
            OpcodeCategory::Constant => self.constant,
        }
    }
}

/// Opcode mix over the bytes after the module preamble.
pub fn analyze_complexity(data: &[u8]) -> Complexity {
    let mut c = Complexity::default();
    for &b in data.iter().skip(WASM_HEADER_LEN) {
        match recognize(b).map(|op| op.category) {
            Some(OpcodeCategory::ControlFlow) => c.control_flow += 1,
            Some(OpcodeCategory::Arithmetic) => c.arithmetic += 1,
            Some(OpcodeCategory::Memory) => c.memory += 1,
            Some(OpcodeCategory::Parametric) => c.parametric += 1,
            Some(OpcodeCategory::Constant) => c.constant += 1,
            None => c.unknown += 1,
        }
    }
    let total = c.total();
    if total > 0 {
        c.score = (c.control_flow as f64 / total as f64 * 200.0).min(100.0);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_recognised_and_data() {
        assert_eq!(colorize([0x02, 64, 7, 9], recognize(0x02)), [200, 64, 7, 255]);
        assert_eq!(colorize([0xfe, 1, 2, 3], recognize(0xfe)), [0, 1, 2, 0]);
    }

    #[test]
    fn code_view_blanks_padding() {
        // 5 bytes: pixel 0 full, pixel 1 partial, pixels 2.. padding.
        let data = [0x00, 1, 2, 3, 0x6a];
        let grid = render_code_view(&data, CurveOrder::new(1).unwrap());
        assert_eq!(grid.pixel(0, 0), [255, 1, 2, 255]);
        assert_eq!(grid.pixel(1, 0), [80, 0, 0, 255]);
        // Pixel 2 would read as 0x00 (unreachable) without the padding rule.
        assert_eq!(grid.pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(grid.pixel(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn complexity_counts_after_header() {
        let mut wasm = b"\0asm\x01\0\0\0".to_vec();
        wasm.extend_from_slice(&[0x02, 0x0c, 0x6a, 0x28, 0x41, 0x1a, 0xff, 0xff]);
        let c = analyze_complexity(&wasm);
        assert_eq!(c.control_flow, 2);
        assert_eq!(c.arithmetic, 1);
        assert_eq!(c.memory, 1);
        assert_eq!(c.constant, 1);
        assert_eq!(c.unknown, 3);
        assert_eq!(c.total(), 8);
        assert!((c.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn complexity_is_capped() {
        let mut wasm = b"\0asm\x01\0\0\0".to_vec();
        wasm.extend_from_slice(&[0x0c; 10]);
        assert_eq!(analyze_complexity(&wasm).score, 100.0);
        assert_eq!(analyze_complexity(b"\0asm").score, 0.0);
    }
}
