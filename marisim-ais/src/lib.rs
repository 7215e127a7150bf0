//! AIS binary codec per ITU-R M.1371.
//!
//! Vessel state is packed into MSB-first bit fields ([`bits`]), the bit
//! stream is armored as 6-bit ASCII, and the payload is framed into one or
//! more `!AIVDM` sentences ([`aivdm`]). Message schemas live in [`messages`];
//! the entity aggregates they read from live in [`vessel`].

pub mod aivdm;
pub mod bits;
pub mod messages;
pub mod vessel;

pub use aivdm::{decode_sentences, reassemble, AivdmEncoder, AivdmFragment, Channel, MAX_PAYLOAD_CHARS};
pub use bits::{BitReader, BitWriter};
pub use messages::{
    AidToNavigationReport, AisMessage, BaseStationReport, PositionReport, SarAircraftPosition,
    StandardClassBReport, StaticAndVoyage,
};
pub use vessel::{
    AidToNavigationData, BaseStationData, EpfdType, Eta, NavigationData, NavigationStatus,
    SarAircraftData, StaticData, VesselState, VoyageData,
};
