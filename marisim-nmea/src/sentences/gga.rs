//! GGA: global positioning system fix data.

use marisim_common::{Error, NmeaTime, Position};

use crate::parser::{ParsedSentence, SentenceBuilder};
use crate::sentence::{SentenceId, TalkerId};
use crate::sentences::GpsFixQuality;

/// A GGA sentence.
///
/// Field layout:
/// `time, lat, N/S, lon, E/W, quality, satellites, HDOP, altitude, M,
/// geoidal height, M, DGPS age, DGPS station id`.
/// The DGPS fields are routinely empty; absence is a valid state.
#[derive(Debug, Clone, PartialEq)]
pub struct GgaSentence {
    /// Source talker
    pub talker_id: TalkerId,
    /// UTC time of fix
    pub time: Option<NmeaTime>,
    /// Fix position
    pub position: Option<Position>,
    /// Fix quality
    pub fix_quality: GpsFixQuality,
    /// Number of satellites in use
    pub satellites: Option<u32>,
    /// Horizontal dilution of precision
    pub hdop: Option<f64>,
    /// Antenna altitude above mean sea level, meters
    pub altitude: Option<f64>,
    /// Geoidal separation, meters
    pub geoidal_height: Option<f64>,
    /// Age of differential corrections, seconds
    pub dgps_age: Option<f64>,
    /// Differential reference station id
    pub dgps_station: Option<String>,
}

impl GgaSentence {
    /// Creates an empty GGA sentence for the given talker.
    pub fn new(talker_id: TalkerId) -> Self {
        Self {
            talker_id,
            time: None,
            position: None,
            fix_quality: GpsFixQuality::Invalid,
            satellites: None,
            hdop: None,
            altitude: None,
            geoidal_height: None,
            dgps_age: None,
            dgps_station: None,
        }
    }

    /// Parses a GGA sentence from its text form.
    pub fn from_sentence(sentence: &str) -> Result<Self, Error> {
        let parsed = ParsedSentence::parse(sentence)?;
        if parsed.sentence_id != SentenceId::GGA {
            return Err(Error::Format(format!(
                "expected GGA sentence, got {}",
                parsed.sentence_id
            )));
        }

        let time = match parsed.get_field(0) {
            Some(t) => Some(NmeaTime::from_nmea(t)?),
            None => None,
        };

        let position = match (
            parsed.get_field(1),
            parsed.get_field(2),
            parsed.get_field(3),
            parsed.get_field(4),
        ) {
            (Some(lat), Some(lat_hem), Some(lon), Some(lon_hem)) => {
                Some(Position::from_nmea(lat, lat_hem, lon, lon_hem)?)
            }
            _ => None,
        };

        let fix_quality = match parsed.get_int_field(5) {
            Some(code) => GpsFixQuality::parse(code as u8)?,
            None => GpsFixQuality::Invalid,
        };

        Ok(Self {
            talker_id: parsed.talker_id,
            time,
            position,
            fix_quality,
            satellites: parsed.get_int_field(6),
            hdop: parsed.get_float_field(7),
            altitude: parsed.get_float_field(8),
            geoidal_height: parsed.get_float_field(10),
            dgps_age: parsed.get_float_field(12),
            dgps_station: parsed.get_field(13).map(str::to_string),
        })
    }

    /// Renders the sentence to its text form.
    pub fn to_sentence(&self) -> String {
        let (lat, lat_hem, lon, lon_hem) = match &self.position {
            Some(p) => {
                let (lat, lat_hem, lon, lon_hem) = p.to_nmea();
                (lat, lat_hem.to_string(), lon, lon_hem.to_string())
            }
            None => (String::new(), String::new(), String::new(), String::new()),
        };

        SentenceBuilder::new(self.talker_id, SentenceId::GGA)
            .field(self.time.map(|t| t.to_nmea(false)).unwrap_or_default())
            .field(lat)
            .field(lat_hem)
            .field(lon)
            .field(lon_hem)
            .field(self.fix_quality.code().to_string())
            .field(self.satellites.map(|s| format!("{s:02}")).unwrap_or_default())
            .opt_float_field(self.hdop, 1)
            .opt_float_field(self.altitude, 1)
            .field("M")
            .opt_float_field(self.geoidal_height, 1)
            .field("M")
            .opt_float_field(self.dgps_age, 1)
            .field(self.dgps_station.clone().unwrap_or_default())
            .build()
    }
}
