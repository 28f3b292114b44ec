//! Frame sequencing: fixed T-state budgets with an interrupt pulse.

use emu_core::{Cpu, MasterClock, Step};

use crate::error::Result;
use crate::machine::Machine;

/// The 48K Spectrum's Z80 runs at 3.5 MHz.
pub const CPU_CLOCK: MasterClock = MasterClock::new(3_500_000);
pub const FRAMES_PER_SECOND: u64 = 50;
pub const CYCLES_PER_FRAME: u64 = CPU_CLOCK.ticks_per_frame(FRAMES_PER_SECOND).get();
/// Length of the INT pulse.
pub const CYCLES_PER_INT: u64 = 32;
/// Main execution budget of a frame, before the interrupt.
pub const CYCLES_BEFORE_INT: u64 = CYCLES_PER_FRAME - CYCLES_PER_INT;

impl Machine {
    /// Run for `cycles` T-states, handing every breakpoint trap to
    /// `on_trap`.
    ///
    /// Stops once the cycle count reaches the new frame boundary, or as
    /// soon as a trap handler calls [`Machine::end_frame`].
    pub fn emulate_cycles<F>(&mut self, cycles: u64, on_trap: &mut F) -> Result<()>
    where
        F: FnMut(&mut Machine, u16) -> Result<()>,
    {
        self.deadline += cycles;
        while self.clock < self.deadline {
            match self.step_cpu() {
                Step::Executed(t) => self.clock += u64::from(t),
                Step::Trap(address) => on_trap(self, address)?,
            }
            if self.end_requested {
                self.end_requested = false;
                self.clock = self.clock.max(self.deadline);
            }
        }
        Ok(())
    }

    /// Run one frame's main budget, then the interrupt if requested.
    pub fn run_frame<F>(&mut self, interrupt: bool, on_trap: &mut F) -> Result<()>
    where
        F: FnMut(&mut Machine, u16) -> Result<()>,
    {
        self.emulate_cycles(CYCLES_BEFORE_INT, on_trap)?;
        if interrupt {
            self.run_interrupt(on_trap)?;
        }
        Ok(())
    }

    /// Hold INT for the pulse width, then give the interrupt handler up to
    /// a whole frame. The handler's final `RET` is hooked to end the frame
    /// early.
    pub fn run_interrupt<F>(&mut self, on_trap: &mut F) -> Result<()>
    where
        F: FnMut(&mut Machine, u16) -> Result<()>,
    {
        self.cpu_mut().set_int_line(true);
        let pulse = self.emulate_cycles(CYCLES_PER_INT, on_trap);
        self.cpu_mut().set_int_line(false);
        pulse?;
        self.emulate_cycles(CYCLES_PER_FRAME, on_trap)
    }
}
