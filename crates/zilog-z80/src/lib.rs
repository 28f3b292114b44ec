//! Instruction-stepped Z80 CPU emulator.
//!
//! Each call to `step()` executes one whole instruction (or accepts an
//! interrupt) and reports the T-states it took. A configurable trap opcode
//! stops execution before an unprefixed fetch so the owner can run native
//! code in place of Z80 code.

mod alu;
mod cpu;
mod flags;
mod registers;

pub use cpu::Z80;
pub use flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
pub use registers::Registers;
