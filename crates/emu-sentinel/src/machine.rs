//! CPU plus memory image, with the stack and register helpers hook code
//! uses to redirect the emulated program.

use emu_core::{Cpu, Step};
use zilog_z80::{Registers, Z80};

use crate::memory::MemoryImage;

/// Opcode written over every hooked instruction: `LD H,H`, which the game
/// never uses.
pub const BREAKPOINT_OPCODE: u8 = 0x64;

/// A Z80 wired to a [`MemoryImage`], with a running T-state count.
///
/// `cycles()` is the total T-states executed. `frame_boundary()` is the
/// point the current run is allowed to reach; each run batch moves it by
/// exactly the requested amount, and any overshoot from the last
/// instruction of a batch is carried into the next one.
pub struct Machine {
    cpu: Z80,
    memory: MemoryImage,
    pub(crate) clock: u64,
    pub(crate) deadline: u64,
    pub(crate) end_requested: bool,
}

impl Machine {
    /// Wrap a memory image with a freshly reset CPU that traps on
    /// [`BREAKPOINT_OPCODE`].
    #[must_use]
    pub fn new(memory: MemoryImage) -> Self {
        let mut cpu = Z80::new();
        cpu.set_trap_opcode(Some(BREAKPOINT_OPCODE));
        Self {
            cpu,
            memory,
            clock: 0,
            deadline: 0,
            end_requested: false,
        }
    }

    /// Build a machine from memory and an initial register set.
    #[must_use]
    pub fn with_registers(memory: MemoryImage, registers: Registers) -> Self {
        let mut machine = Self::new(memory);
        *machine.cpu.regs_mut() = registers;
        machine
    }

    #[must_use]
    pub fn cpu(&self) -> &Z80 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Z80 {
        &mut self.cpu
    }

    #[must_use]
    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }

    /// Replace memory and registers in one go, leaving the clock alone.
    pub(crate) fn restore(&mut self, memory: MemoryImage, registers: Registers) {
        self.memory = memory;
        self.cpu.reset();
        self.cpu.set_int_line(false);
        *self.cpu.regs_mut() = registers;
    }

    #[must_use]
    pub fn regs(&self) -> &Registers {
        self.cpu.regs()
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        self.cpu.regs_mut()
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    /// Total T-states executed (including time skipped by `end_frame`).
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.clock
    }

    /// T-state count the current run batch stops at.
    #[must_use]
    pub fn frame_boundary(&self) -> u64 {
        self.deadline
    }

    /// Finish the current run batch early. Takes effect once the running
    /// hook returns: the cycle count jumps to the batch boundary.
    pub fn end_frame(&mut self) {
        self.end_requested = true;
    }

    /// One CPU step against this machine's memory. Time is not counted.
    pub(crate) fn step_cpu(&mut self) -> Step {
        self.cpu.step(&mut self.memory)
    }

    /// Execute exactly one real instruction, even if it is the breakpoint
    /// opcode, and account for its T-states.
    pub fn single_step(&mut self) -> u32 {
        let cycles = self.cpu.step_untrapped(&mut self.memory);
        self.clock += u64::from(cycles);
        cycles
    }

    // === Stack and flow helpers ===

    #[must_use]
    pub fn dpeek(&self, address: u16) -> u16 {
        self.memory.peek16(address)
    }

    pub fn dpoke(&mut self, address: u16, value: u16) {
        self.memory.poke16(address, value);
    }

    pub fn push(&mut self, value: u16) {
        let sp = self.regs().sp.wrapping_sub(2);
        self.regs_mut().sp = sp;
        self.dpoke(sp, value);
    }

    pub fn pop(&mut self) -> u16 {
        let sp = self.regs().sp;
        let value = self.dpeek(sp);
        self.regs_mut().sp = sp.wrapping_add(2);
        value
    }

    pub fn jump(&mut self, address: u16) {
        self.regs_mut().pc = address;
    }

    /// Push the current PC and jump, as `CALL` would.
    pub fn call(&mut self, address: u16) {
        let pc = self.pc();
        self.push(pc);
        self.jump(address);
    }

    /// Return to the address on top of the stack, as `RET` would.
    pub fn ret(&mut self) {
        let address = self.pop();
        self.jump(address);
    }

    /// Move PC past the instruction at PC without running it.
    pub fn skip(&mut self, length: u16) {
        let pc = self.pc().wrapping_add(length);
        self.jump(pc);
    }
}
