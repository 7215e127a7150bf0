//! Generic sentence parsing and construction.
//!
//! [`ParsedSentence`] decomposes a raw sentence into talker, type, and
//! positional fields; [`SentenceBuilder`] assembles the same frame from
//! typed values. `parse(build(..))` preserves the field list exactly.

use marisim_common::Error;

use crate::sentence::{
    checksum, SentenceId, TalkerId, BEGIN_CHAR, CHECKSUM_DELIMITER, END_CHARS, FIELD_DELIMITER,
};

/// A parsed NMEA sentence.
///
/// Fields are kept as raw text; the typed accessors convert on demand and
/// treat an empty field as absent rather than an error. Checksum mismatches
/// are rejected during [`ParsedSentence::parse`], so a constructed value
/// always carries a verified checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSentence {
    /// Source talker
    pub talker_id: TalkerId,
    /// Sentence type
    pub sentence_id: SentenceId,
    /// Positional fields after the address field, in order
    pub fields: Vec<String>,
    /// Carried 2-hex-digit checksum
    pub checksum: String,
    /// The raw sentence as received, terminator stripped
    pub raw: String,
}

impl ParsedSentence {
    /// Parses a complete `$TTSSS,...*CK` sentence.
    ///
    /// Fails with [`Error::Format`] on missing framing, [`Error::Checksum`]
    /// on a checksum mismatch, and [`Error::UnknownSentenceType`] when the
    /// 3-letter type tag is outside the supported set.
    pub fn parse(sentence: &str) -> Result<Self, Error> {
        let trimmed = sentence.trim_end_matches(['\r', '\n']);

        let rest = trimmed
            .strip_prefix(BEGIN_CHAR)
            .ok_or_else(|| Error::Format(format!("sentence does not start with '$': {trimmed:?}")))?;

        let (body, carried) = rest.rsplit_once(CHECKSUM_DELIMITER).ok_or_else(|| {
            Error::Format(format!("sentence has no '*checksum' suffix: {trimmed:?}"))
        })?;
        if carried.len() != 2 || !carried.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::Format(format!("invalid checksum field: {carried:?}")));
        }

        let computed = checksum(body);
        if !carried.eq_ignore_ascii_case(&computed) {
            return Err(Error::Checksum {
                expected: carried.to_uppercase(),
                computed,
            });
        }

        let mut parts = body.split(FIELD_DELIMITER);
        let address = parts
            .next()
            .ok_or_else(|| Error::Format("empty sentence body".into()))?;
        // Byte-length check, so non-ASCII must be rejected before slicing
        if address.len() != 5 || !address.is_ascii() {
            return Err(Error::Format(format!("invalid address field: {address:?}")));
        }

        let talker_id = TalkerId::parse(&address[0..2])?;
        let sentence_id = SentenceId::parse(&address[2..5])?;
        let fields = parts.map(str::to_string).collect();

        Ok(Self {
            talker_id,
            sentence_id,
            fields,
            checksum: carried.to_uppercase(),
            raw: trimmed.to_string(),
        })
    }

    /// Raw text of field `index`, or `None` when missing or empty.
    pub fn get_field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str).filter(|f| !f.is_empty())
    }

    /// Field `index` parsed as `f64`, or `None` when absent or non-numeric.
    pub fn get_float_field(&self, index: usize) -> Option<f64> {
        self.get_field(index).and_then(|f| f.parse().ok())
    }

    /// Field `index` parsed as `u32`, or `None` when absent or non-numeric.
    pub fn get_int_field(&self, index: usize) -> Option<u32> {
        self.get_field(index).and_then(|f| f.parse().ok())
    }
}

/// Builder for checksummed NMEA sentences.
#[derive(Debug, Clone)]
pub struct SentenceBuilder {
    talker_id: TalkerId,
    sentence_id: SentenceId,
    fields: Vec<String>,
}

impl SentenceBuilder {
    /// Starts a sentence for the given talker and type.
    pub fn new(talker_id: TalkerId, sentence_id: SentenceId) -> Self {
        Self {
            talker_id,
            sentence_id,
            fields: Vec::new(),
        }
    }

    /// Appends a raw text field.
    pub fn field(mut self, value: impl Into<String>) -> Self {
        self.fields.push(value.into());
        self
    }

    /// Appends a float field with the given number of decimals.
    pub fn float_field(self, value: f64, decimals: usize) -> Self {
        self.field(format!("{value:.decimals$}"))
    }

    /// Appends an optional float field, empty when `None`.
    pub fn opt_float_field(self, value: Option<f64>, decimals: usize) -> Self {
        match value {
            Some(v) => self.float_field(v, decimals),
            None => self.empty_field(),
        }
    }

    /// Appends an empty field.
    pub fn empty_field(self) -> Self {
        self.field("")
    }

    /// Assembles the complete sentence including checksum and `\r\n`.
    pub fn build(self) -> String {
        let mut body = format!("{}{}", self.talker_id, self.sentence_id);
        for field in &self.fields {
            body.push(FIELD_DELIMITER);
            body.push_str(field);
        }
        format!("{BEGIN_CHAR}{body}{CHECKSUM_DELIMITER}{}{END_CHARS}", checksum(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gga_fields() {
        let sentence = "$GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,*71";
        let parsed = ParsedSentence::parse(sentence).unwrap();

        assert_eq!(parsed.talker_id, TalkerId::GP);
        assert_eq!(parsed.sentence_id, SentenceId::GGA);
        assert_eq!(parsed.fields.len(), 14);
        assert_eq!(parsed.get_field(0), Some("120044"));
        assert_eq!(parsed.get_field(1), Some("6011.552"));
        assert_eq!(parsed.get_int_field(6), Some(8));
        assert_eq!(parsed.get_float_field(7), Some(2.0));
        // Empty DGPS fields are absent, not errors
        assert_eq!(parsed.get_field(12), None);
        assert_eq!(parsed.get_field(13), None);
        assert_eq!(parsed.checksum, "71");
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let sentence = "$GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,*78";
        let err = ParsedSentence::parse(sentence).unwrap_err();
        match err {
            marisim_common::Error::Checksum { expected, computed } => {
                assert_eq!(expected, "78");
                assert_eq!(computed, "71");
            }
            other => panic!("expected checksum error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_frame() {
        assert!(ParsedSentence::parse("GPGGA,120044*71").is_err());
        assert!(ParsedSentence::parse("$GPGGA,120044").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        // Body "GPXYZ,1" has checksum 0x68
        let body = "GPXYZ,1";
        let sentence = format!("${}*{}", body, checksum(body));
        let err = ParsedSentence::parse(&sentence).unwrap_err();
        assert!(matches!(err, marisim_common::Error::UnknownSentenceType(_)));
    }

    #[test]
    fn test_parse_rejects_non_ascii_address() {
        // 'é' straddles byte index 2 of the address; must be a Format
        // error, never a slicing panic
        let body = "GéGA,1";
        let sentence = format!("${}*{}", body, checksum(body));
        let err = ParsedSentence::parse(&sentence).unwrap_err();
        assert!(matches!(err, marisim_common::Error::Format(_)));
    }

    #[test]
    fn test_unknown_talker_defaults() {
        let body = "XXRMC,120044,A,,,,,,,160705,,,N";
        let sentence = format!("${}*{}", body, checksum(body));
        let parsed = ParsedSentence::parse(&sentence).unwrap();
        assert_eq!(parsed.talker_id, TalkerId::GP);
        assert_eq!(parsed.sentence_id, SentenceId::RMC);
    }

    #[test]
    fn test_build_parse_round_trip() {
        let built = SentenceBuilder::new(TalkerId::GN, SentenceId::RMC)
            .field("120044.500")
            .field("A")
            .field("6011.5520")
            .field("N")
            .field("02501.9410")
            .field("E")
            .float_field(12.5, 1)
            .float_field(89.9, 1)
            .field("160705")
            .empty_field()
            .empty_field()
            .field("A")
            .build();

        assert!(built.starts_with("$GNRMC,"));
        assert!(built.ends_with("\r\n"));

        let parsed = ParsedSentence::parse(&built).unwrap();
        assert_eq!(parsed.talker_id, TalkerId::GN);
        assert_eq!(
            parsed.fields,
            vec![
                "120044.500",
                "A",
                "6011.5520",
                "N",
                "02501.9410",
                "E",
                "12.5",
                "89.9",
                "160705",
                "",
                "",
                "A"
            ]
        );
    }
}
