//! Geographic position value type with NMEA text conversion.
//!
//! Positions are immutable: movement produces a new `Position` via
//! [`Position::destination`], never an in-place mutation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Mean Earth radius in meters, used by the great-circle formulas.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Hemisphere indicator used in NMEA latitude/longitude fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    /// North latitude
    North,
    /// South latitude
    South,
    /// East longitude
    East,
    /// West longitude
    West,
}

impl Hemisphere {
    /// Returns the single-letter NMEA indicator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        }
    }

    /// Parses a single-letter NMEA hemisphere indicator.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "N" | "n" => Ok(Hemisphere::North),
            "S" | "s" => Ok(Hemisphere::South),
            "E" | "e" => Ok(Hemisphere::East),
            "W" | "w" => Ok(Hemisphere::West),
            _ => Err(Error::Format(format!("invalid hemisphere: {s:?}"))),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A geographic position in decimal degrees.
///
/// Invariant: −90 ≤ latitude ≤ 90 and −180 ≤ longitude ≤ 180. Violations are
/// rejected at construction, not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    /// Creates a new position, validating the coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::Position(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::Position(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Converts to NMEA text fields: `(lat DDMM.MMMM, lat hemisphere,
    /// lon DDDMM.MMMM, lon hemisphere)`.
    pub fn to_nmea(&self) -> (String, Hemisphere, String, Hemisphere) {
        let lat_str = format_coordinate(self.latitude, 2);
        let lat_hem = if self.latitude >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };

        let lon_str = format_coordinate(self.longitude, 3);
        let lon_hem = if self.longitude >= 0.0 {
            Hemisphere::East
        } else {
            Hemisphere::West
        };

        (lat_str, lat_hem, lon_str, lon_hem)
    }

    /// Parses NMEA latitude/longitude text fields back into a position.
    ///
    /// Accepts `DDMM.MMMM` latitude and `DDDMM.MMMM` longitude with their
    /// hemisphere indicators.
    pub fn from_nmea(
        lat_str: &str,
        lat_hem: &str,
        lon_str: &str,
        lon_hem: &str,
    ) -> Result<Self, Error> {
        let latitude = parse_coordinate(lat_str, 2)?;
        let longitude = parse_coordinate(lon_str, 3)?;

        let latitude = match Hemisphere::parse(lat_hem)? {
            Hemisphere::North => latitude,
            Hemisphere::South => -latitude,
            other => {
                return Err(Error::Format(format!(
                    "expected N/S hemisphere, got {other}"
                )))
            }
        };
        let longitude = match Hemisphere::parse(lon_hem)? {
            Hemisphere::East => longitude,
            Hemisphere::West => -longitude,
            other => {
                return Err(Error::Format(format!(
                    "expected E/W hemisphere, got {other}"
                )))
            }
        };

        Self::new(latitude, longitude)
    }

    /// Great-circle distance to another position in meters (haversine).
    pub fn distance_to(&self, other: &Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing to another position, degrees true [0, 360).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Projects a new position along a great circle.
    ///
    /// `bearing_deg` is degrees true, `distance_m` meters. The result is
    /// normalized so the invariant ranges always hold.
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> Position {
        let brg = bearing_deg.to_radians();
        let d = distance_m / EARTH_RADIUS_M;
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();

        let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brg.cos()).asin();
        let lon2 = lon1
            + (brg.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

        let mut lon_deg = lon2.to_degrees();
        if lon_deg > 180.0 {
            lon_deg -= 360.0;
        } else if lon_deg < -180.0 {
            lon_deg += 360.0;
        }

        Position {
            latitude: lat2.to_degrees().clamp(-90.0, 90.0),
            longitude: lon_deg,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Renders a `D..DMM.MMMM` coordinate with `deg_digits` degree digits.
///
/// Works in ten-thousandths of a minute and rounds once up front, so a
/// value just under a whole degree carries into the degree part instead
/// of printing an illegal `60.0000` minutes field.
fn format_coordinate(value: f64, deg_digits: usize) -> String {
    const TEN_THOUSANDTHS_PER_DEGREE: u64 = 600_000;

    let total = (value.abs() * TEN_THOUSANDTHS_PER_DEGREE as f64).round() as u64;
    let degrees = total / TEN_THOUSANDTHS_PER_DEGREE;
    let remainder = total % TEN_THOUSANDTHS_PER_DEGREE;
    let minutes = remainder / 10_000;
    let fraction = remainder % 10_000;
    format!("{degrees:0deg_digits$}{minutes:02}.{fraction:04}")
}

/// Parses a `D..DMM.MMMM` coordinate with `deg_digits` degree digits.
fn parse_coordinate(s: &str, deg_digits: usize) -> Result<f64, Error> {
    if !s.is_ascii() {
        return Err(Error::Format(format!("non-ASCII coordinate: {s:?}")));
    }
    if s.len() < deg_digits + 2 {
        return Err(Error::Format(format!("coordinate too short: {s:?}")));
    }
    let (deg_part, min_part) = s.split_at(deg_digits);
    let degrees: f64 = deg_part
        .parse()
        .map_err(|_| Error::Format(format!("invalid degrees in {s:?}")))?;
    let minutes: f64 = min_part
        .parse()
        .map_err(|_| Error::Format(format!("invalid minutes in {s:?}")))?;
    if minutes >= 60.0 {
        return Err(Error::Format(format!("minutes out of range in {s:?}")));
    }
    Ok(degrees + minutes / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nmea_conversion() {
        let position = Position::new(60.19253333, 25.03235).unwrap();
        let (lat_str, lat_hem, lon_str, lon_hem) = position.to_nmea();

        assert_eq!(lat_str, "6011.5520");
        assert_eq!(lat_hem, Hemisphere::North);
        assert_eq!(lon_str, "02501.9410");
        assert_eq!(lon_hem, Hemisphere::East);

        let round = Position::from_nmea(&lat_str, "N", &lon_str, "E").unwrap();
        assert!((round.latitude() - position.latitude()).abs() < 1e-6);
        assert!((round.longitude() - position.longitude()).abs() < 1e-6);
    }

    #[test]
    fn test_southern_western_hemispheres() {
        let position = Position::new(-33.8568, -151.2153).unwrap();
        let (lat_str, lat_hem, lon_str, lon_hem) = position.to_nmea();

        assert_eq!(lat_hem, Hemisphere::South);
        assert_eq!(lon_hem, Hemisphere::West);

        let round = Position::from_nmea(&lat_str, "S", &lon_str, "W").unwrap();
        assert!((round.latitude() - position.latitude()).abs() < 1e-6);
        assert!((round.longitude() - position.longitude()).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Position::new(90.1, 0.0).is_err());
        assert!(Position::new(-90.1, 0.0).is_err());
        assert!(Position::new(0.0, 180.5).is_err());
        assert!(Position::new(0.0, -181.0).is_err());
        assert!(Position::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let pos1 = Position::new(60.0, 25.0).unwrap();
        let pos2 = Position::new(61.0, 25.0).unwrap();

        let distance = pos1.distance_to(&pos2);
        // Approximately 111 km for 1 degree of latitude
        assert!(distance > 100_000.0);
        assert!(distance < 120_000.0);
    }

    #[test]
    fn test_bearing_due_north() {
        let pos1 = Position::new(60.0, 25.0).unwrap();
        let pos2 = Position::new(61.0, 25.0).unwrap();
        assert!(pos1.bearing_to(&pos2).abs() < 1e-6);
    }

    #[test]
    fn test_destination_round_trip() {
        let start = Position::new(37.7749, -122.4194).unwrap();
        let dest = start.destination(45.0, 5_000.0);

        let distance = start.distance_to(&dest);
        assert!((distance - 5_000.0).abs() < 1.0);

        let bearing = start.bearing_to(&dest);
        assert!((bearing - 45.0).abs() < 0.1);
    }

    #[test]
    fn test_destination_dateline_wrap() {
        let start = Position::new(0.0, 179.999).unwrap();
        let dest = start.destination(90.0, 10_000.0);
        assert!(dest.longitude() <= 180.0 && dest.longitude() >= -180.0);
    }

    #[test]
    fn test_parse_coordinate_errors() {
        assert!(Position::from_nmea("60", "N", "02501.9410", "E").is_err());
        assert!(Position::from_nmea("6075.0000", "N", "02501.9410", "E").is_err());
        assert!(Position::from_nmea("6011.5520", "E", "02501.9410", "E").is_err());
    }

    #[test]
    fn test_non_ascii_coordinate_rejected() {
        assert!(matches!(
            Position::from_nmea("aé1.0", "N", "02501.9410", "E"),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            Position::from_nmea("6011.5520", "N", "0é501.9410", "E"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_minutes_carry_into_degrees() {
        // Values just under a whole degree must not render a 60.xxxx
        // minutes field
        for (lat, lon) in [
            (59.9999999, 0.0),
            (89.9999999, 0.0),
            (0.0, -179.9999999),
            (-45.9999999, 120.9999999),
        ] {
            let position = Position::new(lat, lon).unwrap();
            let (lat_str, lat_hem, lon_str, lon_hem) = position.to_nmea();
            let round =
                Position::from_nmea(&lat_str, lat_hem.as_str(), &lon_str, lon_hem.as_str())
                    .unwrap();
            assert!(
                (round.latitude() - lat).abs() < 1e-6,
                "latitude {lat} rendered as {lat_str}"
            );
            assert!(
                (round.longitude() - lon).abs() < 1e-6,
                "longitude {lon} rendered as {lon_str}"
            );
        }

        let (lat_str, _, _, _) = Position::new(59.9999999, 0.0).unwrap().to_nmea();
        assert_eq!(lat_str, "6000.0000");
    }
}
