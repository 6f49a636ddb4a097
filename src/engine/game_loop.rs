// Fixed-step frame clock
//
// Gameplay runs in fixed 1/60 s steps regardless of the display rate, so the
// collision passes, animation timers and combo windows stay deterministic for
// a given input sequence.
use std::time::{Duration, Instant};

/// Simulation tick in seconds (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Upper bound of simulation steps per rendered frame (prevents the spiral of death)
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Accumulator-based clock driving the update loop
#[derive(Debug)]
pub struct FrameClock {
    /// Unsimulated time carried over between frames
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    frame_count: u64,
    step_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            step_count: 0,
        }
    }

    /// Begin a new frame from the wall clock, returns the number of fixed steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(elapsed)
    }

    /// Feed an explicit frame duration, returns the number of fixed steps to run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop whatever the step cap could not absorb
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator = self.accumulator.min(FIXED_TIMESTEP_DURATION);
        }

        self.step_count += steps as u64;
        steps
    }

    /// Fixed step length in seconds
    pub fn timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / FIXED_TIMESTEP).min(1.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a burst of catch-up steps
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.step_count(), 0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_timestep() {
        let clock = FrameClock::new();
        assert!((clock.timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_one_step_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(FIXED_TIMESTEP_DURATION), 1);
        assert_eq!(clock.advance(Duration::from_millis(5)), 0);
        assert_eq!(clock.step_count(), 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_partial_steps_accumulate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_millis(10)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_step_cap() {
        let mut clock = FrameClock::new();
        let steps = clock.advance(Duration::from_millis(300));
        assert_eq!(steps, MAX_STEPS_PER_FRAME);
        // The backlog beyond the cap is discarded
        assert!(clock.advance(Duration::ZERO) <= 1);
    }

    #[test]
    fn test_paused_runs_no_steps() {
        let mut clock = FrameClock::new();
        clock.pause();
        assert_eq!(clock.advance(Duration::from_millis(50)), 0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = FrameClock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_alpha_range() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_millis(8));
        let alpha = clock.alpha();
        assert!((0.0..=1.0).contains(&alpha));
    }
}
