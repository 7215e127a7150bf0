//! NMEA 0183 sentence codec.
//!
//! Builds and parses checksummed `$TTSSS,f1,f2,...*CK` text sentences. The
//! generic framing lives in [`sentence`] and [`parser`]; typed sentence
//! implementations (GGA, RMC, VTG) live in [`sentences`].

pub mod parser;
pub mod sentence;
pub mod sentences;

pub use parser::{ParsedSentence, SentenceBuilder};
pub use sentence::{checksum, validate_checksum, SentenceId, TalkerId};
pub use sentences::{
    DataStatus, GgaSentence, GpsFixQuality, ModeIndicator, RmcSentence, VtgSentence,
};
