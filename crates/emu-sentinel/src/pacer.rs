//! Wall-clock pacing of the 50Hz frame interrupt.

use std::time::Duration;

use crate::config::{MAX_GAME_SPEED, MIN_GAME_SPEED};
use crate::frame::FRAMES_PER_SECOND;

/// Decides when the next frame interrupt is due. Game speed is a
/// percentage; 100 runs at 50 frames per second.
#[derive(Debug, Clone)]
pub struct InterruptPacer {
    frame_time: Duration,
    elapsed: Duration,
}

impl InterruptPacer {
    #[must_use]
    pub fn new(game_speed: u32) -> Self {
        let speed = game_speed.clamp(MIN_GAME_SPEED, MAX_GAME_SPEED);
        let frame_time = Duration::from_secs(1) * 100 / speed / FRAMES_PER_SECOND as u32;
        Self {
            frame_time,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Adds wall-clock time, returning true if an interrupt is now due.
    /// At most one interrupt is reported per call; any further backlog is
    /// carried over.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.elapsed += elapsed;
        if self.elapsed >= self.frame_time {
            self.elapsed -= self.frame_time;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_speed_is_fifty_hertz() {
        let pacer = InterruptPacer::new(100);
        assert_eq!(pacer.frame_time(), Duration::from_millis(20));
        assert_eq!(InterruptPacer::new(200).frame_time(), Duration::from_millis(10));
    }

    #[test]
    fn speed_is_clamped() {
        let slowest = InterruptPacer::new(0).frame_time();
        assert_eq!(slowest, InterruptPacer::new(MIN_GAME_SPEED).frame_time());
        let fastest = InterruptPacer::new(10_000).frame_time();
        assert_eq!(fastest, InterruptPacer::new(MAX_GAME_SPEED).frame_time());
    }

    #[test]
    fn accumulates_until_due() {
        let mut pacer = InterruptPacer::new(100);
        assert!(!pacer.tick(Duration::from_millis(15)));
        assert!(pacer.tick(Duration::from_millis(10)));
        // 5ms carried over.
        assert!(!pacer.tick(Duration::from_millis(10)));
        assert!(pacer.tick(Duration::from_millis(5)));
    }

    #[test]
    fn one_interrupt_per_tick() {
        let mut pacer = InterruptPacer::new(100);
        assert!(pacer.tick(Duration::from_millis(100)));
        assert!(pacer.tick(Duration::ZERO));
        pacer.reset();
        assert!(!pacer.tick(Duration::ZERO));
    }
}
