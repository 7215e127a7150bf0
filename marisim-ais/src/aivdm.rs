//! `!AIVDM` sentence assembly, fragmentation, and reassembly.
//!
//! A payload longer than [`MAX_PAYLOAD_CHARS`] is split into ordered
//! fragments sharing one sequential message id (0-9, wrapping), so a
//! decoder can reassemble them. Single-fragment sentences carry an empty
//! sequential id. Fill bits are declared only on the final fragment.

use marisim_common::Error;
use marisim_nmea::sentence::{checksum, validate_checksum};

use crate::messages::AisMessage;

/// Maximum armored payload characters per sentence.
pub const MAX_PAYLOAD_CHARS: usize = 60;

/// AIS VHF channel indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// Channel A (161.975 MHz)
    #[default]
    A,
    /// Channel B (162.025 MHz)
    B,
}

impl Channel {
    /// The single-letter wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::A => "A",
            Channel::B => "B",
        }
    }

    /// Parses the channel field.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "A" | "1" => Ok(Channel::A),
            "B" | "2" => Ok(Channel::B),
            _ => Err(Error::Format(format!("invalid AIS channel: {s:?}"))),
        }
    }
}

/// One parsed `!AIVDM` sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AivdmFragment {
    /// Total fragments in the message
    pub fragment_count: u8,
    /// This fragment's 1-based index
    pub fragment_number: u8,
    /// Sequential message id shared by all fragments (None when single)
    pub sequence_id: Option<u8>,
    /// Radio channel
    pub channel: Channel,
    /// Armored payload chunk
    pub payload: String,
    /// Fill bits (meaningful on the final fragment)
    pub fill_bits: u8,
}

impl AivdmFragment {
    /// Parses a complete `!AIVDM,...*CK` sentence.
    pub fn parse(sentence: &str) -> Result<Self, Error> {
        let trimmed = sentence.trim_end_matches(['\r', '\n']);
        let rest = trimmed.strip_prefix('!').ok_or_else(|| {
            Error::Format(format!("sentence does not start with '!': {trimmed:?}"))
        })?;

        let (body, carried) = rest.rsplit_once('*').ok_or_else(|| {
            Error::Format(format!("sentence has no '*checksum' suffix: {trimmed:?}"))
        })?;
        let computed = checksum(body);
        if !carried.eq_ignore_ascii_case(&computed) {
            return Err(Error::Checksum {
                expected: carried.to_uppercase(),
                computed,
            });
        }

        let fields: Vec<&str> = body.split(',').collect();
        if fields.len() != 7 || fields[0] != "AIVDM" {
            return Err(Error::Format(format!("not an AIVDM sentence: {trimmed:?}")));
        }

        let fragment_count: u8 = fields[1]
            .parse()
            .map_err(|_| Error::Format(format!("invalid fragment count: {:?}", fields[1])))?;
        let fragment_number: u8 = fields[2]
            .parse()
            .map_err(|_| Error::Format(format!("invalid fragment number: {:?}", fields[2])))?;
        let sequence_id = if fields[3].is_empty() {
            None
        } else {
            Some(fields[3].parse().map_err(|_| {
                Error::Format(format!("invalid sequential message id: {:?}", fields[3]))
            })?)
        };
        let channel = Channel::parse(fields[4])?;
        let fill_bits: u8 = fields[6]
            .parse()
            .map_err(|_| Error::Format(format!("invalid fill bits: {:?}", fields[6])))?;
        if fill_bits > 5 {
            return Err(Error::Format(format!("fill bits out of range: {fill_bits}")));
        }

        Ok(Self {
            fragment_count,
            fragment_number,
            sequence_id,
            channel,
            payload: fields[5].to_string(),
            fill_bits,
        })
    }
}

/// Encoder holding the sequential message id counter.
///
/// One encoder is shared per output stream so multi-fragment messages get
/// distinct, wrapping ids.
#[derive(Debug, Default)]
pub struct AivdmEncoder {
    next_sequence: u8,
}

impl AivdmEncoder {
    /// Creates an encoder with the sequence counter at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes a message into one or more complete sentences.
    pub fn encode(&mut self, message: &AisMessage, channel: Channel) -> Vec<String> {
        let (payload, fill_bits) = message.encode_payload();
        let chunks: Vec<&str> = payload
            .as_bytes()
            .chunks(MAX_PAYLOAD_CHARS)
            // Armored payloads are pure ASCII
            .map(|c| std::str::from_utf8(c).unwrap_or(""))
            .collect();
        let fragment_count = chunks.len();

        let sequence_id = if fragment_count > 1 {
            let id = self.next_sequence;
            self.next_sequence = (self.next_sequence + 1) % 10;
            Some(id)
        } else {
            None
        };

        chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                let last = index + 1 == fragment_count;
                let seq = sequence_id.map(|id| id.to_string()).unwrap_or_default();
                let body = format!(
                    "AIVDM,{},{},{},{},{},{}",
                    fragment_count,
                    index + 1,
                    seq,
                    channel.as_str(),
                    chunk,
                    if last { fill_bits } else { 0 },
                );
                format!("!{body}*{}\r\n", checksum(&body))
            })
            .collect()
    }
}

/// Reassembles ordered fragments into the full payload and fill bits.
///
/// Fragments must share one sequence id, agree on the count, and arrive
/// in fragment-number order with none missing.
pub fn reassemble(fragments: &[AivdmFragment]) -> Result<(String, u8), Error> {
    let first = fragments
        .first()
        .ok_or_else(|| Error::Format("no fragments to reassemble".into()))?;
    if fragments.len() != usize::from(first.fragment_count) {
        return Err(Error::Format(format!(
            "expected {} fragments, got {}",
            first.fragment_count,
            fragments.len()
        )));
    }

    let mut payload = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if usize::from(fragment.fragment_number) != index + 1 {
            return Err(Error::Format(format!(
                "fragment {} out of order at position {}",
                fragment.fragment_number,
                index + 1
            )));
        }
        if fragment.sequence_id != first.sequence_id {
            return Err(Error::Format("fragments mix sequential message ids".into()));
        }
        payload.push_str(&fragment.payload);
    }

    Ok((payload, fragments[fragments.len() - 1].fill_bits))
}

/// Parses and decodes a complete set of sentences into a message.
pub fn decode_sentences(sentences: &[String]) -> Result<AisMessage, Error> {
    let fragments: Vec<AivdmFragment> = sentences
        .iter()
        .map(|s| AivdmFragment::parse(s))
        .collect::<Result<_, _>>()?;
    let (payload, fill_bits) = reassemble(&fragments)?;
    AisMessage::decode(&payload, fill_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{PositionReport, StaticAndVoyage};
    use crate::vessel::VesselState;
    use marisim_common::Position;

    fn sample_vessel() -> VesselState {
        let mut vessel =
            VesselState::new(367001234, Position::new(37.8, -122.4).unwrap());
        vessel.static_data.name = "PACIFIC TRADER".to_string();
        vessel.navigation.sog_knots = 15.5;
        vessel.navigation.cog = 90.0;
        vessel.navigation.heading = Some(92);
        vessel
    }

    #[test]
    fn test_type1_single_fragment() {
        let message = AisMessage::PositionReport(PositionReport::from_vessel(&sample_vessel()));
        let mut encoder = AivdmEncoder::new();
        let sentences = encoder.encode(&message, Channel::A);

        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].starts_with("!AIVDM,1,1,,A,"));
        assert!(sentences[0].ends_with("\r\n"));
        assert!(validate_checksum(&sentences[0]));

        let decoded = decode_sentences(&sentences).unwrap();
        assert_eq!(decoded.message_type(), 1);
        assert_eq!(decoded.mmsi(), 367001234);
        match decoded {
            AisMessage::PositionReport(report) => {
                assert_eq!(report.sog_knots, Some(15.5));
                assert_eq!(report.cog, Some(90.0));
                assert_eq!(report.heading, Some(92));
            }
            other => panic!("expected position report, got {other:?}"),
        }
    }

    #[test]
    fn test_type5_two_fragments_share_sequence() {
        let message = AisMessage::StaticAndVoyage(StaticAndVoyage::from_vessel(&sample_vessel()));
        let mut encoder = AivdmEncoder::new();
        let sentences = encoder.encode(&message, Channel::B);

        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("!AIVDM,2,1,0,B,"));
        assert!(sentences[1].starts_with("!AIVDM,2,2,0,B,"));
        assert!(sentences.iter().all(|s| validate_checksum(s)));

        // Fill bits declared only on the final fragment
        let first = AivdmFragment::parse(&sentences[0]).unwrap();
        let second = AivdmFragment::parse(&sentences[1]).unwrap();
        assert_eq!(first.fill_bits, 0);
        assert_eq!(second.fill_bits, 2);
        assert_eq!(first.payload.len(), 60);
        assert_eq!(second.payload.len(), 11);

        let decoded = decode_sentences(&sentences).unwrap();
        assert_eq!(decoded.message_type(), 5);
    }

    #[test]
    fn test_sequence_id_wraps() {
        let message = AisMessage::StaticAndVoyage(StaticAndVoyage::from_vessel(&sample_vessel()));
        let mut encoder = AivdmEncoder::new();

        for expected in 0..10 {
            let sentences = encoder.encode(&message, Channel::A);
            let fragment = AivdmFragment::parse(&sentences[0]).unwrap();
            assert_eq!(fragment.sequence_id, Some(expected));
        }
        // Eleventh multi-fragment message reuses id 0
        let sentences = encoder.encode(&message, Channel::A);
        let fragment = AivdmFragment::parse(&sentences[0]).unwrap();
        assert_eq!(fragment.sequence_id, Some(0));
    }

    #[test]
    fn test_parse_rejects_corrupted_checksum() {
        let message = AisMessage::PositionReport(PositionReport::from_vessel(&sample_vessel()));
        let mut encoder = AivdmEncoder::new();
        let sentence = encoder.encode(&message, Channel::A).remove(0);
        let corrupted = sentence.replace("*", "Q*");
        assert!(AivdmFragment::parse(&corrupted).is_err());
    }

    #[test]
    fn test_reassemble_rejects_missing_fragment() {
        let message = AisMessage::StaticAndVoyage(StaticAndVoyage::from_vessel(&sample_vessel()));
        let mut encoder = AivdmEncoder::new();
        let sentences = encoder.encode(&message, Channel::A);

        let only_second = vec![AivdmFragment::parse(&sentences[1]).unwrap()];
        assert!(reassemble(&only_second).is_err());
    }
}
