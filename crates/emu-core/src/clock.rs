//! Master clock configuration.

use crate::Ticks;

/// Master clock configuration for a system.
///
/// Each system has one clock that drives the CPU. Frame budgets derive
/// from it by integer division.
#[derive(Debug, Clone, Copy)]
pub struct MasterClock {
    /// Clock frequency in Hz (e.g., `3_500_000` for a 48K Spectrum CPU).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Ticks per frame at the given frame rate (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Ticks {
        Ticks::new(self.frequency_hz / frames_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_frame_budget() {
        let clock = MasterClock::new(3_500_000);
        assert_eq!(clock.ticks_per_frame(50), Ticks::new(70_000));
    }
}
