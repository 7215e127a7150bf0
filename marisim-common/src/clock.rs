//! Simulation clock for the driver loop.
//!
//! One clock advances simulated time in fixed ticks; the engine fires due
//! scheduler entries at each tick. In real-time mode the clock paces ticks
//! against the wall clock, scaled by the configured time factor.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Simulation time configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationTimeConfig {
    /// Duration of each tick in simulated milliseconds
    pub tick_duration_ms: u64,
    /// Total simulation duration in seconds (None = run until stopped)
    pub duration_seconds: Option<f64>,
    /// Simulated seconds per wall-clock second (1.0 = real time)
    pub time_factor: f64,
    /// Pace ticks against the wall clock
    pub real_time: bool,
}

impl Default for SimulationTimeConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 1000,
            duration_seconds: None,
            time_factor: 1.0,
            real_time: true,
        }
    }
}

impl SimulationTimeConfig {
    /// Tick duration as a `Duration` of simulated time.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_duration_ms)
    }

    /// Total number of ticks, when a duration is configured.
    pub fn total_ticks(&self) -> Option<u64> {
        self.duration_seconds
            .map(|secs| ((secs * 1000.0) / self.tick_duration_ms as f64).ceil() as u64)
    }
}

/// Clock coordinating the driver's tick loop.
#[derive(Debug)]
pub struct SimulationClock {
    current_tick: u64,
    config: SimulationTimeConfig,
    start_time: Instant,
}

impl SimulationClock {
    /// Creates a new clock at tick 0.
    pub fn new(config: SimulationTimeConfig) -> Self {
        Self {
            current_tick: 0,
            config,
            start_time: Instant::now(),
        }
    }

    /// The current tick index.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// The clock configuration.
    pub fn config(&self) -> &SimulationTimeConfig {
        &self.config
    }

    /// Current simulated time in milliseconds since start.
    pub fn current_time_ms(&self) -> u64 {
        self.current_tick * self.config.tick_duration_ms
    }

    /// Simulated seconds elapsed per tick.
    pub fn tick_seconds(&self) -> f64 {
        self.config.tick_duration_ms as f64 / 1000.0
    }

    /// Advances the clock by one tick.
    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    /// Returns true once the configured duration has elapsed.
    pub fn is_complete(&self) -> bool {
        match self.config.total_ticks() {
            Some(total) => self.current_tick >= total,
            None => false,
        }
    }

    /// Elapsed wall-clock time since the clock was created.
    pub fn elapsed_real_time(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Wall-clock delay until the next tick is due, for real-time pacing.
    ///
    /// Returns `Duration::ZERO` when the loop is behind schedule or pacing
    /// is disabled.
    pub fn delay_until_next_tick(&self) -> Duration {
        if !self.config.real_time || self.config.time_factor <= 0.0 {
            return Duration::ZERO;
        }
        let target_wall_ms =
            (self.current_time_ms() + self.config.tick_duration_ms) as f64 / self.config.time_factor;
        let elapsed_ms = self.elapsed_real_time().as_millis() as f64;
        if target_wall_ms > elapsed_ms {
            Duration::from_millis((target_wall_ms - elapsed_ms) as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(SimulationTimeConfig::default())
    }
}
