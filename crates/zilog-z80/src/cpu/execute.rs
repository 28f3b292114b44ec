//! Unprefixed and DD/FD-prefixed instruction execution.
//!
//! Opcodes are decoded by their octal fields: `x` (bits 6-7), `y` (bits
//! 3-5), `z` (bits 0-2), with `p = y >> 1` and `q = y & 1`. Every form that
//! names HL also serves the IX and IY prefixes through [`Index`].

use emu_core::{Bus, IoBus};

use super::{Index, Z80};
use crate::alu;
use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF, sz53p};

impl Z80 {
    pub(super) fn execute<B: IoBus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        self.execute_with(bus, opcode, Index::Hl)
    }

    /// DD or FD prefix. A second prefix (or ED) makes this one a NOP.
    fn execute_indexed<B: IoBus>(&mut self, bus: &mut B, index: Index) -> u32 {
        if matches!(bus.read(self.regs.pc), 0xDD | 0xED | 0xFD) {
            return 4;
        }
        let opcode = self.fetch_opcode(bus);
        if opcode == 0xCB {
            return self.execute_index_cb(bus, index);
        }
        4 + self.execute_with(bus, opcode, index)
    }

    // === Register selection ===

    pub(crate) fn index_reg(&self, index: Index) -> u16 {
        match index {
            Index::Hl => self.regs.hl(),
            Index::Ix => self.regs.ix,
            Index::Iy => self.regs.iy,
        }
    }

    pub(crate) fn set_index_reg(&mut self, index: Index, value: u16) {
        match index {
            Index::Hl => self.regs.set_hl(value),
            Index::Ix => self.regs.ix = value,
            Index::Iy => self.regs.iy = value,
        }
    }

    /// 8-bit register by its 3-bit code. Code 6 is `(HL)` and is handled
    /// by the caller.
    pub(crate) fn reg8(&self, r: u8, index: Index) -> u8 {
        match r {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => (self.index_reg(index) >> 8) as u8,
            5 => self.index_reg(index) as u8,
            _ => self.regs.a,
        }
    }

    pub(crate) fn set_reg8(&mut self, r: u8, index: Index, value: u8) {
        match r {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => {
                let low = self.index_reg(index) & 0x00FF;
                self.set_index_reg(index, u16::from(value) << 8 | low);
            }
            5 => {
                let high = self.index_reg(index) & 0xFF00;
                self.set_index_reg(index, high | u16::from(value));
            }
            _ => self.regs.a = value,
        }
    }

    /// Register pair table used by loads and 16-bit arithmetic.
    pub(crate) fn rp(&self, p: u8, index: Index) -> u16 {
        match p {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.index_reg(index),
            _ => self.regs.sp,
        }
    }

    pub(crate) fn set_rp(&mut self, p: u8, index: Index, value: u16) {
        match p {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.set_index_reg(index, value),
            _ => self.regs.sp = value,
        }
    }

    /// Register pair table used by PUSH and POP, with AF in place of SP.
    fn rp2(&self, p: u8, index: Index) -> u16 {
        if p == 3 { self.regs.af() } else { self.rp(p, index) }
    }

    fn set_rp2(&mut self, p: u8, index: Index, value: u16) {
        if p == 3 {
            self.regs.set_af(value);
        } else {
            self.set_rp(p, index, value);
        }
    }

    /// Address of the `(HL)` operand, or `(IX+d)`/`(IY+d)` after fetching
    /// the displacement.
    pub(crate) fn memory_operand<B: Bus>(&mut self, bus: &mut B, index: Index) -> u16 {
        match index {
            Index::Hl => self.regs.hl(),
            Index::Ix | Index::Iy => {
                let d = self.fetch(bus) as i8;
                let address = self.index_reg(index).wrapping_add(d as u16);
                self.regs.wz = address;
                address
            }
        }
    }

    fn condition(&self, y: u8) -> bool {
        let f = self.regs.f;
        match y {
            0 => f & ZF == 0,
            1 => f & ZF != 0,
            2 => f & CF == 0,
            3 => f & CF != 0,
            4 => f & PF == 0,
            5 => f & PF != 0,
            6 => f & SF == 0,
            _ => f & SF != 0,
        }
    }

    fn alu_a(&mut self, op: u8, operand: u8) {
        let result = alu::accumulator_op(op, self.regs.a, operand, self.regs.f & CF != 0);
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    fn jump_relative<B: Bus>(&mut self, bus: &mut B, taken: bool) -> bool {
        let d = self.fetch(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(d as u16);
            self.regs.wz = self.regs.pc;
        }
        taken
    }

    // === Decoder ===

    fn execute_with<B: IoBus>(&mut self, bus: &mut B, opcode: u8, index: Index) -> u32 {
        // Extra cycles spent fetching a displacement and forming IX+d
        let displaced = if index == Index::Hl { 0 } else { 8 };

        let x = opcode >> 6;
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let p = y >> 1;
        let q = y & 1;

        match (x, z) {
            (0, 0) => match y {
                0 => 4,
                1 => {
                    self.regs.ex_af();
                    4
                }
                2 => {
                    self.regs.b = self.regs.b.wrapping_sub(1);
                    let taken = self.regs.b != 0;
                    if self.jump_relative(bus, taken) { 13 } else { 8 }
                }
                3 => {
                    self.jump_relative(bus, true);
                    12
                }
                _ => {
                    let taken = self.condition(y - 4);
                    if self.jump_relative(bus, taken) { 12 } else { 7 }
                }
            },

            (0, 1) => {
                if q == 0 {
                    let value = self.fetch16(bus);
                    self.set_rp(p, index, value);
                    10
                } else {
                    let target = self.index_reg(index);
                    let (value, flags) = alu::add16(target, self.rp(p, index));
                    self.regs.wz = target.wrapping_add(1);
                    self.set_index_reg(index, value);
                    self.regs.f = (self.regs.f & (SF | ZF | PF)) | flags;
                    11
                }
            }

            (0, 2) => match (p, q) {
                (0 | 1, 0) => {
                    let address = if p == 0 { self.regs.bc() } else { self.regs.de() };
                    bus.write(address, self.regs.a);
                    self.regs.wz = u16::from(self.regs.a) << 8 | (address.wrapping_add(1) & 0xFF);
                    7
                }
                (0 | 1, _) => {
                    let address = if p == 0 { self.regs.bc() } else { self.regs.de() };
                    self.regs.a = bus.read(address);
                    self.regs.wz = address.wrapping_add(1);
                    7
                }
                (2, 0) => {
                    let address = self.fetch16(bus);
                    Self::write16(bus, address, self.index_reg(index));
                    self.regs.wz = address.wrapping_add(1);
                    16
                }
                (2, _) => {
                    let address = self.fetch16(bus);
                    let value = Self::read16(bus, address);
                    self.set_index_reg(index, value);
                    self.regs.wz = address.wrapping_add(1);
                    16
                }
                (_, 0) => {
                    let address = self.fetch16(bus);
                    bus.write(address, self.regs.a);
                    self.regs.wz = u16::from(self.regs.a) << 8 | (address.wrapping_add(1) & 0xFF);
                    13
                }
                (_, _) => {
                    let address = self.fetch16(bus);
                    self.regs.a = bus.read(address);
                    self.regs.wz = address.wrapping_add(1);
                    13
                }
            },

            (0, 3) => {
                let value = self.rp(p, index);
                let value = if q == 0 { value.wrapping_add(1) } else { value.wrapping_sub(1) };
                self.set_rp(p, index, value);
                6
            }

            (0, 4 | 5) => {
                let step = |v: u8| if z == 4 { alu::inc8(v) } else { alu::dec8(v) };
                if y == 6 {
                    let address = self.memory_operand(bus, index);
                    let result = step(bus.read(address));
                    bus.write(address, result.value);
                    self.regs.f = (self.regs.f & CF) | result.flags;
                    11 + displaced
                } else {
                    let result = step(self.reg8(y, index));
                    self.set_reg8(y, index, result.value);
                    self.regs.f = (self.regs.f & CF) | result.flags;
                    4
                }
            }

            (0, 6) => {
                if y == 6 {
                    let address = self.memory_operand(bus, index);
                    let value = self.fetch(bus);
                    bus.write(address, value);
                    // The displacement fetch overlaps the operand fetch
                    if index == Index::Hl { 10 } else { 15 }
                } else {
                    let value = self.fetch(bus);
                    self.set_reg8(y, index, value);
                    7
                }
            }

            (0, _) => {
                self.accumulator_misc(y);
                4
            }

            (1, _) => {
                if y == 6 && z == 6 {
                    self.regs.halted = true;
                    4
                } else if y == 6 {
                    let address = self.memory_operand(bus, index);
                    bus.write(address, self.reg8(z, Index::Hl));
                    7 + displaced
                } else if z == 6 {
                    let address = self.memory_operand(bus, index);
                    let value = bus.read(address);
                    self.set_reg8(y, Index::Hl, value);
                    7 + displaced
                } else {
                    let value = self.reg8(z, index);
                    self.set_reg8(y, index, value);
                    4
                }
            }

            (2, _) => {
                if z == 6 {
                    let address = self.memory_operand(bus, index);
                    let value = bus.read(address);
                    self.alu_a(y, value);
                    7 + displaced
                } else {
                    let value = self.reg8(z, index);
                    self.alu_a(y, value);
                    4
                }
            }

            (_, 0) => {
                if self.condition(y) {
                    self.regs.pc = self.pop(bus);
                    self.regs.wz = self.regs.pc;
                    11
                } else {
                    5
                }
            }

            (_, 1) => match (q, p) {
                (0, _) => {
                    let value = self.pop(bus);
                    self.set_rp2(p, index, value);
                    10
                }
                (_, 0) => {
                    self.regs.pc = self.pop(bus);
                    self.regs.wz = self.regs.pc;
                    10
                }
                (_, 1) => {
                    self.regs.exx();
                    4
                }
                (_, 2) => {
                    self.regs.pc = self.index_reg(index);
                    4
                }
                (_, _) => {
                    self.regs.sp = self.index_reg(index);
                    6
                }
            },

            (_, 2) => {
                let target = self.fetch16(bus);
                self.regs.wz = target;
                if self.condition(y) {
                    self.regs.pc = target;
                }
                10
            }

            (_, 3) => match y {
                0 => {
                    let target = self.fetch16(bus);
                    self.regs.pc = target;
                    self.regs.wz = target;
                    10
                }
                1 => self.execute_cb(bus),
                2 => {
                    let n = self.fetch(bus);
                    let port = u16::from(self.regs.a) << 8 | u16::from(n);
                    bus.write_io(port, self.regs.a);
                    self.regs.wz = u16::from(self.regs.a) << 8 | u16::from(n.wrapping_add(1));
                    11
                }
                3 => {
                    let n = self.fetch(bus);
                    let port = u16::from(self.regs.a) << 8 | u16::from(n);
                    self.regs.a = bus.read_io(port);
                    self.regs.wz = port.wrapping_add(1);
                    11
                }
                4 => {
                    let sp = self.regs.sp;
                    let value = Self::read16(bus, sp);
                    Self::write16(bus, sp, self.index_reg(index));
                    self.set_index_reg(index, value);
                    self.regs.wz = value;
                    19
                }
                5 => {
                    let de = self.regs.de();
                    self.regs.set_de(self.regs.hl());
                    self.regs.set_hl(de);
                    4
                }
                6 => {
                    self.regs.iff1 = false;
                    self.regs.iff2 = false;
                    4
                }
                _ => {
                    self.regs.iff1 = true;
                    self.regs.iff2 = true;
                    self.ei_pending = true;
                    4
                }
            },

            (_, 4) => {
                let target = self.fetch16(bus);
                self.regs.wz = target;
                if self.condition(y) {
                    let pc = self.regs.pc;
                    self.push(bus, pc);
                    self.regs.pc = target;
                    17
                } else {
                    10
                }
            }

            (_, 5) => match (q, p) {
                (0, _) => {
                    let value = self.rp2(p, index);
                    self.push(bus, value);
                    11
                }
                (_, 0) => {
                    let target = self.fetch16(bus);
                    let pc = self.regs.pc;
                    self.push(bus, pc);
                    self.regs.pc = target;
                    self.regs.wz = target;
                    17
                }
                (_, 1) => self.execute_indexed(bus, Index::Ix),
                (_, 2) => self.execute_ed(bus),
                (_, _) => self.execute_indexed(bus, Index::Iy),
            },

            (_, 6) => {
                let value = self.fetch(bus);
                self.alu_a(y, value);
                7
            }

            (_, _) => {
                let pc = self.regs.pc;
                self.push(bus, pc);
                self.regs.pc = u16::from(y) * 8;
                self.regs.wz = self.regs.pc;
                11
            }
        }
    }

    /// RLCA, RRCA, RLA, RRA, DAA, CPL, SCF, CCF.
    fn accumulator_misc(&mut self, y: u8) {
        let a = self.regs.a;
        let f = self.regs.f;
        match y {
            0..=3 => {
                let result = alu::rotate_shift(y, a, f & CF != 0);
                self.regs.a = result.value;
                self.regs.f = (f & (SF | ZF | PF)) | (result.value & (YF | XF)) | (result.flags & CF);
            }
            4 => {
                let mut correction = 0;
                let mut carry = f & CF != 0;
                if f & HF != 0 || a & 0x0F > 9 {
                    correction |= 0x06;
                }
                if carry || a > 0x99 {
                    correction |= 0x60;
                    carry = true;
                }
                let subtract = f & NF != 0;
                let value = if subtract { a.wrapping_sub(correction) } else { a.wrapping_add(correction) };
                let half = if subtract { f & HF != 0 && a & 0x0F < 6 } else { a & 0x0F > 9 };
                self.regs.a = value;
                self.regs.f = sz53p(value) | (f & NF) | (if half { HF } else { 0 }) | u8::from(carry);
            }
            5 => {
                self.regs.a = !a;
                self.regs.f = (f & (SF | ZF | PF | CF)) | HF | NF | (self.regs.a & (YF | XF));
            }
            6 => {
                self.regs.f = (f & (SF | ZF | PF)) | (a & (YF | XF)) | CF;
            }
            _ => {
                let half = if f & CF != 0 { HF } else { 0 };
                self.regs.f = (f & (SF | ZF | PF)) | (a & (YF | XF)) | half | (!f & CF);
            }
        }
    }
}
