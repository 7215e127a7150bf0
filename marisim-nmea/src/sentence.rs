//! Sentence framing primitives: talker/sentence identifiers and checksums.

use std::fmt;

use marisim_common::Error;

/// Leading character of a standard NMEA sentence.
pub const BEGIN_CHAR: char = '$';
/// Leading character of an encapsulated (AIS) sentence.
pub const ENCAPSULATION_CHAR: char = '!';
/// Field separator.
pub const FIELD_DELIMITER: char = ',';
/// Separator between the sentence body and the checksum.
pub const CHECKSUM_DELIMITER: char = '*';
/// Sentence terminator.
pub const END_CHARS: &str = "\r\n";

/// NMEA talker identifier (the 2-letter source tag).
///
/// Parsing is permissive: an unrecognized talker falls back to [`TalkerId::GP`]
/// instead of failing, so sentences from unusual sources still parse.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TalkerId {
    /// Global Positioning System
    GP,
    /// GLONASS
    GL,
    /// Galileo
    GA,
    /// Combined GNSS
    GN,
    /// BeiDou
    BD,
    /// QZSS
    QZ,
    /// Integrated instrumentation
    II,
    /// Integrated navigation
    IN,
    /// Electronic chart display
    EC,
}

impl TalkerId {
    /// The 2-letter wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TalkerId::GP => "GP",
            TalkerId::GL => "GL",
            TalkerId::GA => "GA",
            TalkerId::GN => "GN",
            TalkerId::BD => "BD",
            TalkerId::QZ => "QZ",
            TalkerId::II => "II",
            TalkerId::IN => "IN",
            TalkerId::EC => "EC",
        }
    }

    /// Parses a 2-letter talker tag. Unknown tags default to `GP`.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.len() != 2 {
            return Err(Error::Format(format!("invalid talker id: {s:?}")));
        }
        Ok(match s {
            "GP" => TalkerId::GP,
            "GL" => TalkerId::GL,
            "GA" => TalkerId::GA,
            "GN" => TalkerId::GN,
            "BD" => TalkerId::BD,
            "QZ" => TalkerId::QZ,
            "II" => TalkerId::II,
            "IN" => TalkerId::IN,
            "EC" => TalkerId::EC,
            _ => TalkerId::GP,
        })
    }
}

impl fmt::Display for TalkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// NMEA sentence identifier (the 3-letter type tag).
///
/// Parsing is strict: an identifier outside this set is a hard parse error.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceId {
    /// Global positioning system fix data
    GGA,
    /// Recommended minimum navigation information
    RMC,
    /// DOP and active satellites
    GSA,
    /// Satellites in view
    GSV,
    /// Track made good and ground speed
    VTG,
    /// Geographic position, latitude/longitude
    GLL,
    /// Time and date
    ZDA,
    /// Heading, deviation and variation
    HDG,
}

impl SentenceId {
    /// The 3-letter wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceId::GGA => "GGA",
            SentenceId::RMC => "RMC",
            SentenceId::GSA => "GSA",
            SentenceId::GSV => "GSV",
            SentenceId::VTG => "VTG",
            SentenceId::GLL => "GLL",
            SentenceId::ZDA => "ZDA",
            SentenceId::HDG => "HDG",
        }
    }

    /// Parses a 3-letter sentence tag.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "GGA" => Ok(SentenceId::GGA),
            "RMC" => Ok(SentenceId::RMC),
            "GSA" => Ok(SentenceId::GSA),
            "GSV" => Ok(SentenceId::GSV),
            "VTG" => Ok(SentenceId::VTG),
            "GLL" => Ok(SentenceId::GLL),
            "ZDA" => Ok(SentenceId::ZDA),
            "HDG" => Ok(SentenceId::HDG),
            _ => Err(Error::UnknownSentenceType(s.to_string())),
        }
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the NMEA checksum: XOR of every byte in the sentence body
/// (everything strictly between `$`/`!` and `*`), as uppercase hex.
pub fn checksum(body: &str) -> String {
    let value = body.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{value:02X}")
}

/// Recomputes and compares the checksum of a complete sentence.
///
/// Accepts both `$` and `!` framing. Comparison is case-insensitive.
/// Returns false for any sentence missing the frame characters.
pub fn validate_checksum(sentence: &str) -> bool {
    let trimmed = sentence.trim_end_matches(['\r', '\n']);
    let rest = match trimmed.strip_prefix(BEGIN_CHAR) {
        Some(rest) => rest,
        None => match trimmed.strip_prefix(ENCAPSULATION_CHAR) {
            Some(rest) => rest,
            None => return false,
        },
    };
    match rest.rsplit_once(CHECKSUM_DELIMITER) {
        Some((body, carried)) => carried.eq_ignore_ascii_case(&checksum(body)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_body() {
        let body = "GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,";
        assert_eq!(checksum(body), "71");
    }

    #[test]
    fn test_validate_checksum() {
        let valid = "$GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,*71";
        assert!(validate_checksum(valid));
        assert!(validate_checksum(&format!("{valid}\r\n")));

        let corrupted = "$GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,*78";
        assert!(!validate_checksum(corrupted));
    }

    #[test]
    fn test_validate_checksum_case_insensitive() {
        let body = "GPRMC,120044,A,6011.552,N,02501.941,E,000.0,360.0,160705,006.1,E,A";
        let sentence = format!("${}*{}", body, checksum(body).to_lowercase());
        assert!(validate_checksum(&sentence));
    }

    #[test]
    fn test_validate_checksum_missing_frame() {
        assert!(!validate_checksum(
            "GPGGA,120044,6011.552,N,02501.941,E,1,08,2.0,28.0,M,19.6,M,,*71"
        ));
        assert!(!validate_checksum("$GPGGA,120044"));
    }

    #[test]
    fn test_talker_id_permissive_parse() {
        assert_eq!(TalkerId::parse("GL").unwrap(), TalkerId::GL);
        assert_eq!(TalkerId::parse("XX").unwrap(), TalkerId::GP);
        assert!(TalkerId::parse("GPS").is_err());
    }

    #[test]
    fn test_sentence_id_strict_parse() {
        assert_eq!(SentenceId::parse("RMC").unwrap(), SentenceId::RMC);
        let err = SentenceId::parse("XYZ").unwrap_err();
        assert!(matches!(err, marisim_common::Error::UnknownSentenceType(_)));
    }
}
