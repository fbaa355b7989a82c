//! Fixed-timestep accumulator splitting variable frames into fixed ticks.

use kestrel_config::TickConfig;
use tracing::warn;

/// Default fixed rate.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Default clamp on a single frame's duration.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.25;

/// Accumulates real frame time and yields whole fixed ticks.
///
/// Frame time above `max_frame_time` is clamped so a long stall produces a
/// bounded burst of ticks and the simulation slows down instead of trying to
/// catch up forever.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    accumulator_secs: f64,
    tick_duration_secs: f64,
    max_frame_time: f64,
    last_frame_secs: f64,
    total_ticks: u64,
    frame_count: u64,
}

impl TickScheduler {
    /// 60 Hz, 250 ms clamp.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE_HZ)
    }

    /// Custom rate with the default clamp. A rate of zero is treated as 1 Hz.
    pub fn with_tick_rate(hz: u32) -> Self {
        Self {
            accumulator_secs: 0.0,
            tick_duration_secs: 1.0 / f64::from(hz.max(1)),
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            last_frame_secs: 0.0,
            total_ticks: 0,
            frame_count: 0,
        }
    }

    pub fn from_config(config: &TickConfig) -> Self {
        let max_frame_time = if config.max_frame_time.is_finite() && config.max_frame_time > 0.0 {
            config.max_frame_time
        } else {
            DEFAULT_MAX_FRAME_TIME
        };
        Self {
            tick_duration_secs: config.tick_duration_secs(),
            max_frame_time,
            ..Self::new()
        }
    }

    /// Adds one frame's elapsed time and returns the number of ticks now due.
    ///
    /// Negative or non-finite frame times count as zero.
    pub fn accumulate(&mut self, frame_secs: f64) -> u32 {
        let mut frame_secs = if frame_secs.is_finite() { frame_secs.max(0.0) } else { 0.0 };
        if frame_secs > self.max_frame_time {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_secs * 1000.0,
                self.max_frame_time * 1000.0
            );
            frame_secs = self.max_frame_time;
        }
        self.last_frame_secs = frame_secs;
        self.frame_count += 1;

        self.accumulator_secs += frame_secs;
        let mut ticks = 0u32;
        while self.accumulator_secs >= self.tick_duration_secs {
            self.accumulator_secs -= self.tick_duration_secs;
            self.total_ticks += 1;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator_secs > 0.0 {
            self.accumulator_secs / self.tick_duration_secs
        } else {
            0.0
        }
    }

    /// Fixed tick duration in the precision the integrator uses.
    pub fn fixed_dt(&self) -> f32 {
        self.tick_duration_secs as f32
    }

    pub fn tick_duration_secs(&self) -> f64 {
        self.tick_duration_secs
    }

    /// Clamped duration of the most recent frame.
    pub fn last_frame_secs(&self) -> f64 {
        self.last_frame_secs
    }

    /// Ticks yielded since creation.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Frames accumulated since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_exact_frame_yields_one_tick() {
        let mut scheduler = TickScheduler::new();
        assert_eq!(scheduler.accumulate(1.0 / 60.0), 1);
        assert_eq!(scheduler.total_ticks(), 1);
        assert!(scheduler.alpha() < EPSILON);
    }

    #[test]
    fn test_fast_frames_accumulate() {
        let mut scheduler = TickScheduler::new();
        let mut ticks = 0;
        // 144 Hz render for one second.
        for _ in 0..144 {
            ticks += scheduler.accumulate(1.0 / 144.0);
        }
        assert!((59..=60).contains(&ticks), "ticks = {ticks}");
        assert_eq!(scheduler.frame_count(), 144);
    }

    #[test]
    fn test_slow_frame_yields_several_ticks() {
        let mut scheduler = TickScheduler::new();
        assert_eq!(scheduler.accumulate(0.05 + EPSILON), 3);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut scheduler = TickScheduler::with_tick_rate(64);
        let ticks = scheduler.accumulate(2.0);
        assert_eq!(ticks, 16);
        assert!((scheduler.last_frame_secs() - DEFAULT_MAX_FRAME_TIME).abs() < EPSILON);
    }

    #[test]
    fn test_bad_frame_time_counts_as_zero() {
        let mut scheduler = TickScheduler::new();
        assert_eq!(scheduler.accumulate(-1.0), 0);
        assert_eq!(scheduler.accumulate(f64::NAN), 0);
        assert_eq!(scheduler.accumulate(f64::INFINITY), 0);
        assert_eq!(scheduler.total_ticks(), 0);
    }

    #[test]
    fn test_alpha_tracks_remainder() {
        let mut scheduler = TickScheduler::new();
        scheduler.accumulate(1.5 / 60.0);
        assert!((scheduler.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_from_config() {
        let config = TickConfig {
            tick_rate_hz: 32,
            max_frame_time: 0.125,
        };
        let mut scheduler = TickScheduler::from_config(&config);
        assert!((scheduler.tick_duration_secs() - 1.0 / 32.0).abs() < EPSILON);
        assert_eq!(scheduler.accumulate(1.0), 4);

        let zero_rate = TickConfig {
            tick_rate_hz: 0,
            max_frame_time: -1.0,
        };
        let scheduler = TickScheduler::from_config(&zero_rate);
        assert!((scheduler.tick_duration_secs() - 1.0).abs() < EPSILON);
    }
}
