//! Z80 CPU core with whole-instruction execution.

mod execute;
mod prefixed;

use emu_core::{Bus, Cpu, IoBus, Step};

use crate::registers::Registers;

/// Which register stands in for HL in the current instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Index {
    Hl,
    Ix,
    Iy,
}

/// Z80 CPU.
///
/// The CPU does not own the bus. The bus is passed to each `step()` so the
/// owner can read and patch memory between instructions.
pub struct Z80 {
    pub(crate) regs: Registers,
    /// Unprefixed opcode that stops execution instead of running.
    trap_opcode: Option<u8>,
    /// Level of the maskable interrupt line.
    int_line: bool,
    /// Set by EI: interrupts stay blocked until one more instruction runs.
    ei_pending: bool,
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers {
                a: 0xFF,
                f: 0xFF,
                sp: 0xFFFF,
                ..Registers::default()
            },
            trap_opcode: None,
            int_line: false,
            ei_pending: false,
        }
    }

    /// Direct register access.
    #[must_use]
    pub fn regs(&self) -> &Registers {
        &self.regs
    }

    /// Mutable register access, for loaders and native hook code.
    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Set the opcode that traps when fetched without a prefix.
    pub fn set_trap_opcode(&mut self, opcode: Option<u8>) {
        self.trap_opcode = opcode;
    }

    #[must_use]
    pub fn trap_opcode(&self) -> Option<u8> {
        self.trap_opcode
    }

    #[must_use]
    pub fn int_line(&self) -> bool {
        self.int_line
    }

    /// Execute one instruction, ignoring the trap opcode.
    ///
    /// Used to run the original instruction at a trap address once its
    /// opcode has been restored.
    pub fn step_untrapped<B: IoBus>(&mut self, bus: &mut B) -> u32 {
        let trap = self.trap_opcode.take();
        let step = self.step(bus);
        self.trap_opcode = trap;
        match step {
            Step::Executed(cycles) => cycles,
            Step::Trap(_) => 0,
        }
    }

    // === Bus helpers ===

    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Fetch an opcode byte as an M1 cycle.
    pub(crate) fn fetch_opcode<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.bump_r();
        self.fetch(bus)
    }

    pub(crate) fn read16<B: Bus>(bus: &mut B, address: u16) -> u16 {
        let lo = bus.read(address);
        let hi = bus.read(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn write16<B: Bus>(bus: &mut B, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        bus.write(address, lo);
        bus.write(address.wrapping_add(1), hi);
    }

    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    pub(crate) fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = Self::read16(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// R counts M1 cycles in its low seven bits; bit 7 is preserved.
    pub(crate) fn bump_r(&mut self) {
        let r = self.regs.r;
        self.regs.r = (r & 0x80) | (r.wrapping_add(1) & 0x7F);
    }

    fn accept_interrupt<B: IoBus>(&mut self, bus: &mut B) -> u32 {
        let data = bus.interrupt_data();
        self.regs.halted = false;
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        self.bump_r();
        let pc = self.regs.pc;
        self.push(bus, pc);
        if self.regs.im == 2 {
            let vector = u16::from(self.regs.i) << 8 | u16::from(data);
            self.regs.pc = Self::read16(bus, vector);
            self.regs.wz = self.regs.pc;
            19
        } else {
            // IM 0 executes the byte on the data bus, which floats to RST 38h
            self.regs.pc = 0x0038;
            self.regs.wz = 0x0038;
            13
        }
    }
}

impl Cpu for Z80 {
    type Registers = Registers;

    fn step<B: IoBus>(&mut self, bus: &mut B) -> Step {
        if self.int_line && self.regs.iff1 && !self.ei_pending {
            return Step::Executed(self.accept_interrupt(bus));
        }

        if self.regs.halted {
            self.ei_pending = false;
            self.bump_r();
            return Step::Executed(4);
        }

        let pc = self.regs.pc;
        let opcode = bus.read(pc);
        if Some(opcode) == self.trap_opcode {
            return Step::Trap(pc);
        }

        self.ei_pending = false;
        self.regs.pc = pc.wrapping_add(1);
        self.bump_r();
        Step::Executed(self.execute(bus, opcode))
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.regs.halted
    }

    fn set_int_line(&mut self, active: bool) {
        self.int_line = active;
    }

    fn reset(&mut self) {
        let trap = self.trap_opcode;
        *self = Self::new();
        self.trap_opcode = trap;
    }
}
