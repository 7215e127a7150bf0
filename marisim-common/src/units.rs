//! Tagged scalar value types for speed, bearing, and distance.
//!
//! Conversions are pure and lossless within f64 precision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Knots to meters-per-second conversion factor.
const KNOTS_TO_MS: f64 = 0.514444;
/// Meters per nautical mile.
const METERS_PER_NM: f64 = 1852.0;

/// Speed unit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    /// Nautical miles per hour
    Knots,
    /// Meters per second
    MetersPerSecond,
}

/// A speed value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    value: f64,
    unit: SpeedUnit,
}

impl Speed {
    /// Creates a new speed value.
    pub fn new(value: f64, unit: SpeedUnit) -> Self {
        Self { value, unit }
    }

    /// Creates a speed in knots.
    pub fn knots(value: f64) -> Self {
        Self::new(value, SpeedUnit::Knots)
    }

    /// The raw scalar in the tagged unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit tag.
    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }

    /// Value expressed in knots.
    pub fn as_knots(&self) -> f64 {
        match self.unit {
            SpeedUnit::Knots => self.value,
            SpeedUnit::MetersPerSecond => self.value / KNOTS_TO_MS,
        }
    }

    /// Value expressed in meters per second.
    pub fn as_meters_per_second(&self) -> f64 {
        match self.unit {
            SpeedUnit::Knots => self.value * KNOTS_TO_MS,
            SpeedUnit::MetersPerSecond => self.value,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SpeedUnit::Knots => write!(f, "{:.1} kn", self.value),
            SpeedUnit::MetersPerSecond => write!(f, "{:.1} m/s", self.value),
        }
    }
}

/// Bearing reference tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BearingType {
    /// Relative to true north
    True,
    /// Relative to magnetic north
    Magnetic,
}

/// A bearing in degrees with its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bearing {
    value: f64,
    bearing_type: BearingType,
}

impl Bearing {
    /// Creates a new bearing, normalized to [0, 360).
    pub fn new(value: f64, bearing_type: BearingType) -> Self {
        Self {
            value: value.rem_euclid(360.0),
            bearing_type,
        }
    }

    /// Creates a true bearing.
    pub fn true_north(value: f64) -> Self {
        Self::new(value, BearingType::True)
    }

    /// Degrees in [0, 360).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The reference tag.
    pub fn bearing_type(&self) -> BearingType {
        self.bearing_type
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.bearing_type {
            BearingType::True => "T",
            BearingType::Magnetic => "M",
        };
        write!(f, "{:.1}°{}", self.value, tag)
    }
}

/// Distance unit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    /// Meters
    Meters,
    /// Nautical miles
    NauticalMiles,
    /// Kilometers
    Kilometers,
}

/// A distance value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    value: f64,
    unit: DistanceUnit,
}

impl Distance {
    /// Creates a new distance value.
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// Creates a distance in meters.
    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    /// The raw scalar in the tagged unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit tag.
    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Value expressed in meters.
    pub fn as_meters(&self) -> f64 {
        match self.unit {
            DistanceUnit::Meters => self.value,
            DistanceUnit::NauticalMiles => self.value * METERS_PER_NM,
            DistanceUnit::Kilometers => self.value * 1000.0,
        }
    }

    /// Value expressed in nautical miles.
    pub fn as_nautical_miles(&self) -> f64 {
        self.as_meters() / METERS_PER_NM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        let speed = Speed::knots(10.0);
        assert!((speed.as_meters_per_second() - 5.14444).abs() < 1e-6);

        let back = Speed::new(speed.as_meters_per_second(), SpeedUnit::MetersPerSecond);
        assert!((back.as_knots() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_normalization() {
        assert_eq!(Bearing::true_north(370.0).value(), 10.0);
        assert_eq!(Bearing::true_north(-90.0).value(), 270.0);
        assert_eq!(Bearing::true_north(359.9).value(), 359.9);
    }

    #[test]
    fn test_distance_conversion() {
        let distance = Distance::new(1.0, DistanceUnit::NauticalMiles);
        assert_eq!(distance.as_meters(), 1852.0);

        let km = Distance::new(1.852, DistanceUnit::Kilometers);
        assert!((km.as_nautical_miles() - 1.0).abs() < 1e-9);
    }
}
