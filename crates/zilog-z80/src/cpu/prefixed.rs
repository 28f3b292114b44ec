//! CB, indexed CB and ED prefixed instruction execution.

use emu_core::{Bus, IoBus};

use super::{Index, Z80};
use crate::alu;
use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF, parity, sz53, sz53p};

/// Interrupt mode selected by `IM` for each value of the `y` field.
const INTERRUPT_MODES: [u8; 4] = [0, 0, 1, 2];

impl Z80 {
    /// CB prefix: rotates, shifts, BIT, RES and SET.
    pub(super) fn execute_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch_opcode(bus);
        let x = opcode >> 6;
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;

        if z == 6 {
            let address = self.regs.hl();
            let value = bus.read(address);
            if x == 1 {
                self.bit(y, value, (self.regs.wz >> 8) as u8);
                return 12;
            }
            let result = self.bit_op(x, y, value);
            bus.write(address, result);
            15
        } else {
            let value = self.reg8(z, Index::Hl);
            if x == 1 {
                self.bit(y, value, value);
            } else {
                let result = self.bit_op(x, y, value);
                self.set_reg8(z, Index::Hl, result);
            }
            8
        }
    }

    /// DDCB/FDCB: `op (IX+d)`. The displacement comes before the opcode,
    /// and non-BIT forms also copy the result into a register.
    pub(super) fn execute_index_cb<B: Bus>(&mut self, bus: &mut B, index: Index) -> u32 {
        let address = self.memory_operand(bus, index);
        let opcode = self.fetch(bus);
        let x = opcode >> 6;
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;

        let value = bus.read(address);
        if x == 1 {
            self.bit(y, value, (address >> 8) as u8);
            return 20;
        }
        let result = self.bit_op(x, y, value);
        bus.write(address, result);
        if z != 6 {
            self.set_reg8(z, Index::Hl, result);
        }
        23
    }

    /// Rotate/shift (x=0), RES (x=2) or SET (x=3).
    fn bit_op(&mut self, x: u8, y: u8, value: u8) -> u8 {
        match x {
            0 => {
                let result = alu::rotate_shift(y, value, self.regs.f & CF != 0);
                self.regs.f = result.flags;
                result.value
            }
            2 => value & !(1 << y),
            _ => value | (1 << y),
        }
    }

    /// `BIT n`. The undocumented bits come from `undocumented`, which is the
    /// operand for registers and an internal address byte for memory.
    fn bit(&mut self, n: u8, value: u8, undocumented: u8) {
        let tested = value & (1 << n);
        let mut f = (self.regs.f & CF) | HF | (undocumented & (YF | XF));
        if tested == 0 {
            f |= ZF | PF;
        }
        f |= tested & SF;
        self.regs.f = f;
    }

    /// ED prefix. Undefined opcodes execute as 8-cycle NOPs.
    pub(super) fn execute_ed<B: IoBus>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch_opcode(bus);
        let x = opcode >> 6;
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let p = y >> 1;
        let q = y & 1;

        match (x, z) {
            (1, 0) => {
                let bc = self.regs.bc();
                let value = bus.read_io(bc);
                self.regs.wz = bc.wrapping_add(1);
                self.regs.f = (self.regs.f & CF) | sz53p(value);
                if y != 6 {
                    self.set_reg8(y, Index::Hl, value);
                }
                12
            }
            (1, 1) => {
                let bc = self.regs.bc();
                let value = if y == 6 { 0 } else { self.reg8(y, Index::Hl) };
                bus.write_io(bc, value);
                self.regs.wz = bc.wrapping_add(1);
                12
            }
            (1, 2) => {
                let hl = self.regs.hl();
                let operand = self.rp(p, Index::Hl);
                let carry = self.regs.f & CF != 0;
                let (value, flags) = if q == 0 {
                    alu::sbc16(hl, operand, carry)
                } else {
                    alu::adc16(hl, operand, carry)
                };
                self.regs.wz = hl.wrapping_add(1);
                self.regs.set_hl(value);
                self.regs.f = flags;
                15
            }
            (1, 3) => {
                let address = self.fetch16(bus);
                if q == 0 {
                    Self::write16(bus, address, self.rp(p, Index::Hl));
                } else {
                    let value = Self::read16(bus, address);
                    self.set_rp(p, Index::Hl, value);
                }
                self.regs.wz = address.wrapping_add(1);
                20
            }
            (1, 4) => {
                let result = alu::sub8(0, self.regs.a, false);
                self.regs.a = result.value;
                self.regs.f = result.flags;
                8
            }
            (1, 5) => {
                self.regs.pc = self.pop(bus);
                self.regs.wz = self.regs.pc;
                self.regs.iff1 = self.regs.iff2;
                14
            }
            (1, 6) => {
                self.regs.im = INTERRUPT_MODES[usize::from(y & 3)];
                8
            }
            (1, _) => self.execute_ed_misc(bus, y),
            (2, 0..=3) if y >= 4 => self.execute_block(bus, y, z),
            _ => 8,
        }
    }

    /// `LD I,A`, `LD R,A`, `LD A,I`, `LD A,R`, `RRD`, `RLD`.
    fn execute_ed_misc<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        match y {
            0 => {
                self.regs.i = self.regs.a;
                9
            }
            1 => {
                self.regs.r = self.regs.a;
                9
            }
            2 | 3 => {
                self.regs.a = if y == 2 { self.regs.i } else { self.regs.r };
                let iff = if self.regs.iff2 { PF } else { 0 };
                self.regs.f = (self.regs.f & CF) | sz53(self.regs.a) | iff;
                9
            }
            4 | 5 => {
                let address = self.regs.hl();
                let m = bus.read(address);
                let a = self.regs.a;
                let (memory, low) = if y == 4 {
                    ((a << 4) | (m >> 4), m & 0x0F)
                } else {
                    ((m << 4) | (a & 0x0F), m >> 4)
                };
                bus.write(address, memory);
                self.regs.a = (a & 0xF0) | low;
                self.regs.f = (self.regs.f & CF) | sz53p(self.regs.a);
                self.regs.wz = address.wrapping_add(1);
                18
            }
            _ => 8,
        }
    }

    /// LDI/CPI/INI/OUTI and their decrementing and repeating forms.
    fn execute_block<B: IoBus>(&mut self, bus: &mut B, y: u8, z: u8) -> u32 {
        let delta: u16 = if y & 1 == 0 { 1 } else { 0xFFFF };
        let hl = self.regs.hl();

        let again = match z {
            0 => {
                let value = bus.read(hl);
                let de = self.regs.de();
                bus.write(de, value);
                self.regs.set_hl(hl.wrapping_add(delta));
                self.regs.set_de(de.wrapping_add(delta));
                let bc = self.regs.bc().wrapping_sub(1);
                self.regs.set_bc(bc);
                let n = value.wrapping_add(self.regs.a);
                let mut f = (self.regs.f & (SF | ZF | CF)) | (n & XF) | ((n << 4) & YF);
                if bc != 0 {
                    f |= PF;
                }
                self.regs.f = f;
                bc != 0
            }
            1 => {
                let value = bus.read(hl);
                let result = self.regs.a.wrapping_sub(value);
                let half = self.regs.a & 0x0F < value & 0x0F;
                self.regs.set_hl(hl.wrapping_add(delta));
                let bc = self.regs.bc().wrapping_sub(1);
                self.regs.set_bc(bc);
                self.regs.wz = self.regs.wz.wrapping_add(delta);
                let n = result.wrapping_sub(u8::from(half));
                let mut f = (self.regs.f & CF) | NF | (result & SF) | (n & XF) | ((n << 4) & YF);
                if result == 0 {
                    f |= ZF;
                }
                if half {
                    f |= HF;
                }
                if bc != 0 {
                    f |= PF;
                }
                self.regs.f = f;
                bc != 0 && result != 0
            }
            2 => {
                let bc = self.regs.bc();
                let value = bus.read_io(bc);
                self.regs.wz = bc.wrapping_add(delta);
                self.regs.b = self.regs.b.wrapping_sub(1);
                bus.write(hl, value);
                self.regs.set_hl(hl.wrapping_add(delta));
                let k = u16::from(value) + u16::from(self.regs.c.wrapping_add(delta as u8));
                self.block_io_flags(value, k);
                self.regs.b != 0
            }
            _ => {
                self.regs.b = self.regs.b.wrapping_sub(1);
                let value = bus.read(hl);
                let bc = self.regs.bc();
                self.regs.wz = bc.wrapping_add(delta);
                bus.write_io(bc, value);
                self.regs.set_hl(hl.wrapping_add(delta));
                let k = u16::from(value) + u16::from(self.regs.l);
                self.block_io_flags(value, k);
                self.regs.b != 0
            }
        };

        if y >= 6 && again {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
            self.regs.wz = self.regs.pc.wrapping_add(1);
            21
        } else {
            16
        }
    }

    fn block_io_flags(&mut self, value: u8, k: u16) {
        let b = self.regs.b;
        let mut f = sz53(b);
        if value & 0x80 != 0 {
            f |= NF;
        }
        if k > 0xFF {
            f |= HF | CF;
        }
        if parity((k as u8 & 7) ^ b) {
            f |= PF;
        }
        self.regs.f = f;
    }
}
