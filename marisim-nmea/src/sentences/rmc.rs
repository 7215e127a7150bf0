//! RMC: recommended minimum navigation information.

use marisim_common::{Error, NmeaDate, NmeaTime, Position};

use crate::parser::{ParsedSentence, SentenceBuilder};
use crate::sentence::{SentenceId, TalkerId};
use crate::sentences::{DataStatus, ModeIndicator};

/// An RMC sentence.
///
/// Field layout:
/// `time, status, lat, N/S, lon, E/W, SOG, COG, date, variation,
/// variation E/W, mode`.
///
/// Course and variation are kept as raw degrees so parse and render
/// preserve the wire value exactly (a `360.0` course stays `360.0`).
/// Variation is signed: east positive, west negative.
#[derive(Debug, Clone, PartialEq)]
pub struct RmcSentence {
    /// Source talker
    pub talker_id: TalkerId,
    /// UTC time of fix
    pub time: Option<NmeaTime>,
    /// Data validity
    pub status: DataStatus,
    /// Fix position
    pub position: Option<Position>,
    /// Speed over ground, knots
    pub speed_knots: Option<f64>,
    /// Course over ground, degrees true
    pub course: Option<f64>,
    /// UTC date of fix
    pub date: Option<NmeaDate>,
    /// Magnetic variation, degrees (east positive)
    pub magnetic_variation: Option<f64>,
    /// Positioning mode
    pub mode: ModeIndicator,
}

impl RmcSentence {
    /// Creates an empty RMC sentence for the given talker.
    pub fn new(talker_id: TalkerId) -> Self {
        Self {
            talker_id,
            time: None,
            status: DataStatus::Void,
            position: None,
            speed_knots: None,
            course: None,
            date: None,
            magnetic_variation: None,
            mode: ModeIndicator::NotValid,
        }
    }

    /// Parses an RMC sentence from its text form.
    pub fn from_sentence(sentence: &str) -> Result<Self, Error> {
        let parsed = ParsedSentence::parse(sentence)?;
        if parsed.sentence_id != SentenceId::RMC {
            return Err(Error::Format(format!(
                "expected RMC sentence, got {}",
                parsed.sentence_id
            )));
        }

        let time = match parsed.get_field(0) {
            Some(t) => Some(NmeaTime::from_nmea(t)?),
            None => None,
        };

        let status = parsed.get_field(1).map(DataStatus::parse).unwrap_or_default();

        let position = match (
            parsed.get_field(2),
            parsed.get_field(3),
            parsed.get_field(4),
            parsed.get_field(5),
        ) {
            (Some(lat), Some(lat_hem), Some(lon), Some(lon_hem)) => {
                Some(Position::from_nmea(lat, lat_hem, lon, lon_hem)?)
            }
            _ => None,
        };

        let date = match parsed.get_field(8) {
            Some(d) => Some(NmeaDate::from_nmea(d)?),
            None => None,
        };

        let magnetic_variation = match (parsed.get_float_field(9), parsed.get_field(10)) {
            (Some(magnitude), Some("W") | Some("w")) => Some(-magnitude),
            (Some(magnitude), _) => Some(magnitude),
            (None, _) => None,
        };

        Ok(Self {
            talker_id: parsed.talker_id,
            time,
            status,
            position,
            speed_knots: parsed.get_float_field(6),
            course: parsed.get_float_field(7),
            date,
            magnetic_variation,
            mode: parsed.get_field(11).map(ModeIndicator::parse).unwrap_or_default(),
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

        let (variation, variation_dir) = match self.magnetic_variation {
            Some(v) if v < 0.0 => (format!("{:.1}", -v), "W".to_string()),
            Some(v) => (format!("{v:.1}"), "E".to_string()),
            None => (String::new(), String::new()),
        };

        SentenceBuilder::new(self.talker_id, SentenceId::RMC)
            .field(self.time.map(|t| t.to_nmea(false)).unwrap_or_default())
            .field(self.status.as_str())
            .field(lat)
            .field(lat_hem)
            .field(lon)
            .field(lon_hem)
            .opt_float_field(self.speed_knots, 1)
            .opt_float_field(self.course, 1)
            .field(self.date.map(|d| d.to_nmea()).unwrap_or_default())
            .field(variation)
            .field(variation_dir)
            .field(self.mode.as_str())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::validate_checksum;

    const SCENARIO: &str =
        "$GPRMC,120044,A,6011.552,N,02501.941,E,000.0,360.0,160705,006.1,E,A*11";

    #[test]
    fn test_parse_scenario_sentence() {
        assert!(validate_checksum(SCENARIO));
        let rmc = RmcSentence::from_sentence(SCENARIO).unwrap();

        let date = rmc.date.unwrap();
        assert_eq!((date.year, date.month, date.day), (2005, 7, 16));

        assert_eq!(rmc.speed_knots, Some(0.0));
        assert_eq!(rmc.course, Some(360.0));
        assert_eq!(rmc.status, DataStatus::Active);
        assert_eq!(rmc.mode, ModeIndicator::Autonomous);
        assert_eq!(rmc.magnetic_variation, Some(6.1));

        let position = rmc.position.unwrap();
        assert!((position.latitude() - 60.19253333).abs() < 1e-4);
        assert!((position.longitude() - 25.03235).abs() < 1e-4);
    }

    #[test]
    fn test_westward_variation_is_negative() {
        let body = "GPRMC,120044,A,6011.552,N,02501.941,E,000.0,360.0,160705,006.1,W,A";
        let text = format!("${}*{}", body, crate::sentence::checksum(body));
        let rmc = RmcSentence::from_sentence(&text).unwrap();
        assert_eq!(rmc.magnetic_variation, Some(-6.1));
    }

    #[test]
    fn test_build_round_trip() {
        let mut rmc = RmcSentence::new(TalkerId::GP);
        rmc.time = Some(NmeaTime::new(12, 0, 44, 0).unwrap());
        rmc.status = DataStatus::Active;
        rmc.position = Some(Position::new(60.19253333, 25.03235).unwrap());
        rmc.speed_knots = Some(12.5);
        rmc.course = Some(89.9);
        rmc.date = Some(NmeaDate::new(2005, 7, 16).unwrap());
        rmc.magnetic_variation = Some(-6.1);
        rmc.mode = ModeIndicator::Autonomous;

        let text = rmc.to_sentence();
        assert!(validate_checksum(&text));
        assert!(text.contains(",6.1,W,"));

        let parsed = RmcSentence::from_sentence(&text).unwrap();
        assert_eq!(parsed.speed_knots, Some(12.5));
        assert_eq!(parsed.course, Some(89.9));
        assert_eq!(parsed.magnetic_variation, Some(-6.1));
        assert_eq!(parsed.date, rmc.date);
    }
}
