//! ALU operations for the Z80.
//!
//! Each operation returns the result together with the complete flag byte
//! it produces. Callers mask in any flags the instruction preserves.

use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF, sz53, sz53p};

/// Result of an 8-bit ALU operation.
#[derive(Debug, Clone, Copy)]
pub struct AluResult {
    pub value: u8,
    pub flags: u8,
}

/// `ADD`/`ADC`.
#[must_use]
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let wide = u16::from(a) + u16::from(b) + u16::from(c);
    let value = wide as u8;
    let mut flags = sz53(value);
    if (a & 0x0F) + (b & 0x0F) + c > 0x0F {
        flags |= HF;
    }
    if (a ^ b) & 0x80 == 0 && (a ^ value) & 0x80 != 0 {
        flags |= PF;
    }
    if wide > 0xFF {
        flags |= CF;
    }
    AluResult { value, flags }
}

/// `SUB`/`SBC`.
#[must_use]
pub fn sub8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let value = a.wrapping_sub(b).wrapping_sub(c);
    let mut flags = sz53(value) | NF;
    if (a & 0x0F) < (b & 0x0F) + c {
        flags |= HF;
    }
    if (a ^ b) & 0x80 != 0 && (a ^ value) & 0x80 != 0 {
        flags |= PF;
    }
    if u16::from(a) < u16::from(b) + u16::from(c) {
        flags |= CF;
    }
    AluResult { value, flags }
}

/// `CP`: a subtraction whose undocumented bits come from the operand.
#[must_use]
pub fn cp8(a: u8, b: u8) -> AluResult {
    let result = sub8(a, b, false);
    AluResult {
        value: a,
        flags: (result.flags & !(YF | XF)) | (b & (YF | XF)),
    }
}

#[must_use]
pub fn and8(a: u8, b: u8) -> AluResult {
    let value = a & b;
    AluResult { value, flags: sz53p(value) | HF }
}

#[must_use]
pub fn or8(a: u8, b: u8) -> AluResult {
    let value = a | b;
    AluResult { value, flags: sz53p(value) }
}

#[must_use]
pub fn xor8(a: u8, b: u8) -> AluResult {
    let value = a ^ b;
    AluResult { value, flags: sz53p(value) }
}

/// Dispatch one of the eight accumulator operations by its opcode field.
#[must_use]
pub fn accumulator_op(op: u8, a: u8, b: u8, carry: bool) -> AluResult {
    match op & 7 {
        0 => add8(a, b, false),
        1 => add8(a, b, carry),
        2 => sub8(a, b, false),
        3 => sub8(a, b, carry),
        4 => and8(a, b),
        5 => xor8(a, b),
        6 => or8(a, b),
        _ => cp8(a, b),
    }
}

/// `INC`. Carry is not produced; callers keep the old one.
#[must_use]
pub fn inc8(a: u8) -> AluResult {
    let value = a.wrapping_add(1);
    let mut flags = sz53(value);
    if a & 0x0F == 0x0F {
        flags |= HF;
    }
    if a == 0x7F {
        flags |= PF;
    }
    AluResult { value, flags }
}

/// `DEC`. Carry is not produced; callers keep the old one.
#[must_use]
pub fn dec8(a: u8) -> AluResult {
    let value = a.wrapping_sub(1);
    let mut flags = sz53(value) | NF;
    if a & 0x0F == 0 {
        flags |= HF;
    }
    if a == 0x80 {
        flags |= PF;
    }
    AluResult { value, flags }
}

/// CB-prefixed rotate and shift group, selected by bits 3-5 of the opcode:
/// RLC RRC RL RR SLA SRA SLL SRL.
#[must_use]
pub fn rotate_shift(op: u8, a: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let (value, out) = match op & 7 {
        0 => (a.rotate_left(1), a >> 7),
        1 => (a.rotate_right(1), a & 1),
        2 => ((a << 1) | c, a >> 7),
        3 => ((a >> 1) | (c << 7), a & 1),
        4 => (a << 1, a >> 7),
        5 => ((a >> 1) | (a & 0x80), a & 1),
        6 => ((a << 1) | 1, a >> 7),
        _ => (a >> 1, a & 1),
    };
    AluResult {
        value,
        flags: sz53p(value) | out,
    }
}

/// `ADD HL,rr`. Only H, C and the undocumented bits are produced.
#[must_use]
pub fn add16(a: u16, b: u16) -> (u16, u8) {
    let wide = u32::from(a) + u32::from(b);
    let value = wide as u16;
    let mut flags = ((value >> 8) as u8) & (YF | XF);
    if (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF {
        flags |= HF;
    }
    if wide > 0xFFFF {
        flags |= CF;
    }
    (value, flags)
}

/// `ADC HL,rr`.
#[must_use]
pub fn adc16(a: u16, b: u16, carry: bool) -> (u16, u8) {
    let c = u16::from(carry);
    let wide = u32::from(a) + u32::from(b) + u32::from(c);
    let value = wide as u16;
    let mut flags = ((value >> 8) as u8) & (SF | YF | XF);
    if value == 0 {
        flags |= ZF;
    }
    if (a & 0x0FFF) + (b & 0x0FFF) + c > 0x0FFF {
        flags |= HF;
    }
    if (a ^ b) & 0x8000 == 0 && (a ^ value) & 0x8000 != 0 {
        flags |= PF;
    }
    if wide > 0xFFFF {
        flags |= CF;
    }
    (value, flags)
}

/// `SBC HL,rr`.
#[must_use]
pub fn sbc16(a: u16, b: u16, carry: bool) -> (u16, u8) {
    let c = u16::from(carry);
    let value = a.wrapping_sub(b).wrapping_sub(c);
    let mut flags = (((value >> 8) as u8) & (SF | YF | XF)) | NF;
    if value == 0 {
        flags |= ZF;
    }
    if (a & 0x0FFF) < (b & 0x0FFF) + c {
        flags |= HF;
    }
    if (a ^ b) & 0x8000 != 0 && (a ^ value) & 0x8000 != 0 {
        flags |= PF;
    }
    if u32::from(a) < u32::from(b) + u32::from(c) {
        flags |= CF;
    }
    (value, flags)
}
