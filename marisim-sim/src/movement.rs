//! Vessel movement integration with configurable Gaussian jitter.
//!
//! Each tick the model perturbs speed and course with normally distributed
//! noise, projects the vessel along a great circle for the elapsed time,
//! and adds positional noise. The generator is seedable so a scenario with
//! a fixed seed replays identically.

use marisim_ais::vessel::VesselState;
use marisim_common::config::MovementConfig;
use marisim_common::Speed;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Movement model shared by the whole fleet.
#[derive(Debug)]
pub struct MovementModel {
    rng: StdRng,
}

impl MovementModel {
    /// Creates a model seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a model with a fixed seed for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances one vessel by `elapsed_seconds` of simulated time.
    ///
    /// Speed never goes negative; course stays normalized to [0, 360).
    /// Heading tracks the course when set.
    pub fn update(
        &mut self,
        vessel: &mut VesselState,
        config: &MovementConfig,
        elapsed_seconds: f64,
    ) {
        let nav = &mut vessel.navigation;

        if config.speed_variation > 0.0 {
            if let Ok(noise) = Normal::new(0.0, config.speed_variation) {
                nav.sog_knots = (nav.sog_knots + noise.sample(&mut self.rng)).max(0.0);
            }
        }
        if config.course_variation > 0.0 {
            if let Ok(noise) = Normal::new(0.0, config.course_variation) {
                nav.cog = (nav.cog + noise.sample(&mut self.rng)).rem_euclid(360.0);
            }
        }

        let distance_m = Speed::knots(nav.sog_knots).as_meters_per_second() * elapsed_seconds;
        if distance_m > 0.0 {
            nav.position = nav.position.destination(nav.cog, distance_m);
        }

        if config.position_noise > 0.0 {
            if let Ok(noise) = Normal::new(0.0, config.position_noise) {
                let lat =
                    (nav.position.latitude() + noise.sample(&mut self.rng)).clamp(-90.0, 90.0);
                let lon = nav.position.longitude() + noise.sample(&mut self.rng);
                let lon = if lon > 180.0 {
                    lon - 360.0
                } else if lon < -180.0 {
                    lon + 360.0
                } else {
                    lon
                };
                if let Ok(position) = marisim_common::Position::new(lat, lon) {
                    nav.position = position;
                }
            }
        }

        if nav.heading.is_some() {
            nav.heading = Some(nav.cog.rem_euclid(360.0) as u16 % 360);
        }
    }

    /// Uniform random value, exposed for jittered scheduling offsets.
    pub fn jitter(&mut self, max: f64) -> f64 {
        self.rng.gen_range(0.0..max.max(f64::MIN_POSITIVE))
    }
}

impl Default for MovementModel {
    fn default() -> Self {
        Self::new()
    }
}
