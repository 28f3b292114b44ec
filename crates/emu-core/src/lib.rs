//! Core traits and types for instruction-stepped emulation.
//!
//! A CPU executes whole instructions against a bus and reports how many
//! T-states each one took. Frame timing is derived from the master clock.

mod bus;
mod clock;
mod cpu;
mod ticks;

pub use bus::{Bus, IoBus};
pub use clock::MasterClock;
pub use cpu::{Cpu, Step};
pub use ticks::Ticks;
