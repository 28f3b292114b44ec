//! Z80 register set.

/// Z80 registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    // Main registers
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    // Alternate registers
    pub a_alt: u8,
    pub f_alt: u8,
    pub b_alt: u8,
    pub c_alt: u8,
    pub d_alt: u8,
    pub e_alt: u8,
    pub h_alt: u8,
    pub l_alt: u8,

    // Index registers
    pub ix: u16,
    pub iy: u16,

    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,

    /// WZ/MEMPTR, the internal temporary register. Leaks into the
    /// undocumented flags of `BIT n,(HL)`.
    pub wz: u16,

    // Interrupt state
    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,

    pub halted: bool,
}

const fn pair(hi: u8, lo: u8) -> u16 {
    (hi as u16) << 8 | lo as u16
}

const fn split(value: u16) -> (u8, u8) {
    ((value >> 8) as u8, value as u8)
}

impl Registers {
    #[must_use]
    pub const fn af(&self) -> u16 {
        pair(self.a, self.f)
    }

    #[must_use]
    pub const fn bc(&self) -> u16 {
        pair(self.b, self.c)
    }

    #[must_use]
    pub const fn de(&self) -> u16 {
        pair(self.d, self.e)
    }

    #[must_use]
    pub const fn hl(&self) -> u16 {
        pair(self.h, self.l)
    }

    #[must_use]
    pub const fn af_alt(&self) -> u16 {
        pair(self.a_alt, self.f_alt)
    }

    #[must_use]
    pub const fn bc_alt(&self) -> u16 {
        pair(self.b_alt, self.c_alt)
    }

    #[must_use]
    pub const fn de_alt(&self) -> u16 {
        pair(self.d_alt, self.e_alt)
    }

    #[must_use]
    pub const fn hl_alt(&self) -> u16 {
        pair(self.h_alt, self.l_alt)
    }

    pub fn set_af(&mut self, value: u16) {
        (self.a, self.f) = split(value);
    }

    pub fn set_bc(&mut self, value: u16) {
        (self.b, self.c) = split(value);
    }

    pub fn set_de(&mut self, value: u16) {
        (self.d, self.e) = split(value);
    }

    pub fn set_hl(&mut self, value: u16) {
        (self.h, self.l) = split(value);
    }

    pub fn set_af_alt(&mut self, value: u16) {
        (self.a_alt, self.f_alt) = split(value);
    }

    pub fn set_bc_alt(&mut self, value: u16) {
        (self.b_alt, self.c_alt) = split(value);
    }

    pub fn set_de_alt(&mut self, value: u16) {
        (self.d_alt, self.e_alt) = split(value);
    }

    pub fn set_hl_alt(&mut self, value: u16) {
        (self.h_alt, self.l_alt) = split(value);
    }

    /// `EX AF,AF'`
    pub fn ex_af(&mut self) {
        core::mem::swap(&mut self.a, &mut self.a_alt);
        core::mem::swap(&mut self.f, &mut self.f_alt);
    }

    /// `EXX`
    pub fn exx(&mut self) {
        core::mem::swap(&mut self.b, &mut self.b_alt);
        core::mem::swap(&mut self.c, &mut self.c_alt);
        core::mem::swap(&mut self.d, &mut self.d_alt);
        core::mem::swap(&mut self.e, &mut self.e_alt);
        core::mem::swap(&mut self.h, &mut self.h_alt);
        core::mem::swap(&mut self.l, &mut self.l_alt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_big_endian_by_register() {
        let mut regs = Registers::default();
        regs.set_hl(0x1234);
        assert_eq!(regs.h, 0x12);
        assert_eq!(regs.l, 0x34);
        assert_eq!(regs.hl(), 0x1234);
    }

    #[test]
    fn exx_leaves_af_alone() {
        let mut regs = Registers::default();
        regs.set_af(0x1122);
        regs.set_bc(0x3344);
        regs.set_bc_alt(0x5566);
        regs.exx();
        assert_eq!(regs.bc(), 0x5566);
        assert_eq!(regs.bc_alt(), 0x3344);
        assert_eq!(regs.af(), 0x1122);
    }
}
