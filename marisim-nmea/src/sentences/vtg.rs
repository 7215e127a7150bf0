//! VTG: track made good and ground speed.

use marisim_common::Error;

use crate::parser::{ParsedSentence, SentenceBuilder};
use crate::sentence::{SentenceId, TalkerId};
use crate::sentences::ModeIndicator;

/// Knots to kilometers-per-hour.
const KNOTS_TO_KMH: f64 = 1.852;

/// A VTG sentence.
///
/// Field layout:
/// `course true, T, course magnetic, M, speed knots, N, speed km/h, K, mode`.
/// The km/h field is derived from the knots value on render.
#[derive(Debug, Clone, PartialEq)]
pub struct VtgSentence {
    /// Source talker
    pub talker_id: TalkerId,
    /// Course over ground, degrees true
    pub course_true: Option<f64>,
    /// Course over ground, degrees magnetic
    pub course_magnetic: Option<f64>,
    /// Speed over ground, knots
    pub speed_knots: Option<f64>,
    /// Positioning mode
    pub mode: ModeIndicator,
}

impl VtgSentence {
    /// Creates an empty VTG sentence for the given talker.
    pub fn new(talker_id: TalkerId) -> Self {
        Self {
            talker_id,
            course_true: None,
            course_magnetic: None,
            speed_knots: None,
            mode: ModeIndicator::NotValid,
        }
    }

    /// Parses a VTG sentence from its text form.
    pub fn from_sentence(sentence: &str) -> Result<Self, Error> {
        let parsed = ParsedSentence::parse(sentence)?;
        if parsed.sentence_id != SentenceId::VTG {
            return Err(Error::Format(format!(
                "expected VTG sentence, got {}",
                parsed.sentence_id
            )));
        }

        Ok(Self {
            talker_id: parsed.talker_id,
            course_true: parsed.get_float_field(0),
            course_magnetic: parsed.get_float_field(2),
            speed_knots: parsed.get_float_field(4),
            mode: parsed.get_field(8).map(ModeIndicator::parse).unwrap_or_default(),
        })
    }

    /// Renders the sentence to its text form.
    pub fn to_sentence(&self) -> String {
        SentenceBuilder::new(self.talker_id, SentenceId::VTG)
            .opt_float_field(self.course_true, 1)
            .field("T")
            .opt_float_field(self.course_magnetic, 1)
            .field("M")
            .opt_float_field(self.speed_knots, 1)
            .field("N")
            .opt_float_field(self.speed_knots.map(|kn| kn * KNOTS_TO_KMH), 1)
            .field("K")
            .field(self.mode.as_str())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::validate_checksum;

    #[test]
    fn test_build_round_trip() {
        let mut vtg = VtgSentence::new(TalkerId::GP);
        vtg.course_true = Some(89.9);
        vtg.speed_knots = Some(10.0);
        vtg.mode = ModeIndicator::Autonomous;

        let text = vtg.to_sentence();
        assert!(text.starts_with("$GPVTG,89.9,T,,M,10.0,N,18.5,K,A"));
        assert!(validate_checksum(&text));

        let parsed = VtgSentence::from_sentence(&text).unwrap();
        assert_eq!(parsed.course_true, Some(89.9));
        assert_eq!(parsed.course_magnetic, None);
        assert_eq!(parsed.speed_knots, Some(10.0));
        assert_eq!(parsed.mode, ModeIndicator::Autonomous);
    }

    #[test]
    fn test_parse_rejects_other_types() {
        let body = "GPGLL,6011.552,N,02501.941,E,120044,A,A";
        let text = format!("${}*{}", body, crate::sentence::checksum(body));
        assert!(VtgSentence::from_sentence(&text).is_err());
    }
}
