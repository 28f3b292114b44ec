//! CPU core trait.

use crate::IoBus;

/// Outcome of a single [`Cpu::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An instruction (or interrupt acknowledge) completed, taking this
    /// many T-states.
    Executed(u32),
    /// The trap opcode was fetched at this address. Nothing was executed,
    /// no time passed, and PC still points at the trapped opcode.
    Trap(u16),
}

/// A CPU core.
///
/// CPUs do not own the bus; it is passed to each step so the owner can
/// inspect and patch memory between instructions.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction, or accept a pending interrupt.
    fn step<B: IoBus>(&mut self, bus: &mut B) -> Step;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a copy of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Drive the maskable interrupt line. The line is level-triggered and
    /// stays asserted until released.
    fn set_int_line(&mut self, active: bool);

    /// Reset the CPU to its power-on state.
    fn reset(&mut self);
}
