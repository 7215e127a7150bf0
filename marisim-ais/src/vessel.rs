//! Entity aggregates consumed by the message schemas.
//!
//! A [`VesselState`] owns three sub-aggregates: static identity, live
//! navigation data, and voyage data. The MMSI inside [`StaticData`] is the
//! primary key everywhere (scheduler, trace, fleet map). Base stations and
//! aids to navigation are parallel static entities with their own message
//! types and no navigation aggregate.

use chrono::{DateTime, Utc};
use marisim_common::{Position, VesselClass, VesselDimensions};

/// Navigational status carried in position reports (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationStatus {
    /// Under way using engine
    #[default]
    UnderWayUsingEngine,
    /// At anchor
    AtAnchor,
    /// Not under command
    NotUnderCommand,
    /// Restricted maneuverability
    RestrictedManeuverability,
    /// Constrained by draught
    ConstrainedByDraught,
    /// Moored
    Moored,
    /// Aground
    Aground,
    /// Engaged in fishing
    EngagedInFishing,
    /// Under way sailing
    UnderWaySailing,
    /// Not defined
    NotDefined,
}

impl NavigationStatus {
    /// The 4-bit wire code.
    pub fn code(&self) -> u32 {
        match self {
            NavigationStatus::UnderWayUsingEngine => 0,
            NavigationStatus::AtAnchor => 1,
            NavigationStatus::NotUnderCommand => 2,
            NavigationStatus::RestrictedManeuverability => 3,
            NavigationStatus::ConstrainedByDraught => 4,
            NavigationStatus::Moored => 5,
            NavigationStatus::Aground => 6,
            NavigationStatus::EngagedInFishing => 7,
            NavigationStatus::UnderWaySailing => 8,
            NavigationStatus::NotDefined => 15,
        }
    }

    /// Decodes the 4-bit wire code. Reserved codes read as not-defined.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => NavigationStatus::UnderWayUsingEngine,
            1 => NavigationStatus::AtAnchor,
            2 => NavigationStatus::NotUnderCommand,
            3 => NavigationStatus::RestrictedManeuverability,
            4 => NavigationStatus::ConstrainedByDraught,
            5 => NavigationStatus::Moored,
            6 => NavigationStatus::Aground,
            7 => NavigationStatus::EngagedInFishing,
            8 => NavigationStatus::UnderWaySailing,
            _ => NavigationStatus::NotDefined,
        }
    }
}

/// Electronic position fixing device type (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpfdType {
    /// Undefined
    #[default]
    Undefined,
    /// GPS
    Gps,
    /// GLONASS
    Glonass,
    /// Combined GPS/GLONASS
    CombinedGpsGlonass,
    /// Loran-C
    LoranC,
    /// Chayka
    Chayka,
    /// Integrated navigation system
    IntegratedNavigation,
    /// Surveyed
    Surveyed,
    /// Galileo
    Galileo,
}

impl EpfdType {
    /// The 4-bit wire code.
    pub fn code(&self) -> u32 {
        match self {
            EpfdType::Undefined => 0,
            EpfdType::Gps => 1,
            EpfdType::Glonass => 2,
            EpfdType::CombinedGpsGlonass => 3,
            EpfdType::LoranC => 4,
            EpfdType::Chayka => 5,
            EpfdType::IntegratedNavigation => 6,
            EpfdType::Surveyed => 7,
            EpfdType::Galileo => 8,
        }
    }

    /// Decodes the 4-bit wire code. Reserved codes read as undefined.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => EpfdType::Gps,
            2 => EpfdType::Glonass,
            3 => EpfdType::CombinedGpsGlonass,
            4 => EpfdType::LoranC,
            5 => EpfdType::Chayka,
            6 => EpfdType::IntegratedNavigation,
            7 => EpfdType::Surveyed,
            8 => EpfdType::Galileo,
            _ => EpfdType::Undefined,
        }
    }
}

/// Estimated time of arrival (month/day/hour/minute, UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eta {
    /// Month 1-12 (0 = not available)
    pub month: u8,
    /// Day 1-31 (0 = not available)
    pub day: u8,
    /// Hour 0-23 (24 = not available)
    pub hour: u8,
    /// Minute 0-59 (60 = not available)
    pub minute: u8,
}

impl Default for Eta {
    fn default() -> Self {
        // All components "not available"
        Self {
            month: 0,
            day: 0,
            hour: 24,
            minute: 60,
        }
    }
}

/// Static identity of a vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticData {
    /// Maritime Mobile Service Identity, the primary key
    pub mmsi: u32,
    /// Vessel name, up to 20 6-bit characters
    pub name: String,
    /// Radio call sign, up to 7 6-bit characters
    pub call_sign: String,
    /// IMO number (0 = not available)
    pub imo_number: u32,
    /// Ship and cargo type code (0-99)
    pub ship_type: u8,
    /// Transceiver class
    pub vessel_class: VesselClass,
    /// Hull dimensions from the position reference point
    pub dimensions: VesselDimensions,
    /// Position fixing device
    pub epfd_type: EpfdType,
}

impl StaticData {
    /// Creates static data with the given identity and defaults elsewhere.
    pub fn new(mmsi: u32, name: impl Into<String>, call_sign: impl Into<String>) -> Self {
        Self {
            mmsi,
            name: name.into(),
            call_sign: call_sign.into(),
            imo_number: 0,
            ship_type: 0,
            vessel_class: VesselClass::A,
            dimensions: VesselDimensions::default(),
            epfd_type: EpfdType::Gps,
        }
    }
}

/// Live kinematic state, mutated in place every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationData {
    /// Current position
    pub position: Position,
    /// Speed over ground, knots
    pub sog_knots: f64,
    /// Course over ground, degrees true
    pub cog: f64,
    /// True heading, degrees (None = not available)
    pub heading: Option<u16>,
    /// Rate of turn, degrees per minute (None = not available)
    pub rate_of_turn: Option<f64>,
    /// Navigational status
    pub nav_status: NavigationStatus,
    /// High position accuracy (DGPS-quality fix)
    pub position_accuracy: bool,
    /// RAIM in use
    pub raim: bool,
    /// UTC second of the position fix (0-59; 60 = not available)
    pub timestamp_seconds: u8,
}

impl NavigationData {
    /// Creates navigation data at rest at the given position.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            sog_knots: 0.0,
            cog: 0.0,
            heading: None,
            rate_of_turn: None,
            nav_status: NavigationStatus::UnderWayUsingEngine,
            position_accuracy: false,
            raim: false,
            timestamp_seconds: 60,
        }
    }
}

/// Voyage-specific data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoyageData {
    /// Destination, up to 20 6-bit characters
    pub destination: String,
    /// Maximum present static draught, meters
    pub draught: f64,
    /// Estimated time of arrival
    pub eta: Eta,
}

/// Complete state of one simulated vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselState {
    /// Static identity
    pub static_data: StaticData,
    /// Live kinematics
    pub navigation: NavigationData,
    /// Voyage data
    pub voyage: VoyageData,
}

impl VesselState {
    /// Creates a vessel at the given position with default static data.
    pub fn new(mmsi: u32, position: Position) -> Self {
        Self {
            static_data: StaticData::new(mmsi, "", ""),
            navigation: NavigationData::new(position),
            voyage: VoyageData::default(),
        }
    }

    /// The vessel's primary key.
    pub fn mmsi(&self) -> u32 {
        self.static_data.mmsi
    }
}

/// A shore-side base station (AIS message Type 4).
#[derive(Debug, Clone, PartialEq)]
pub struct BaseStationData {
    /// Station MMSI
    pub mmsi: u32,
    /// Fixed station position
    pub position: Position,
    /// Position fixing device
    pub epfd_type: EpfdType,
    /// UTC time broadcast in the report
    pub utc_time: DateTime<Utc>,
    /// High position accuracy
    pub position_accuracy: bool,
    /// RAIM in use
    pub raim: bool,
}

impl BaseStationData {
    /// Creates a base station at the given position.
    pub fn new(mmsi: u32, position: Position, utc_time: DateTime<Utc>) -> Self {
        Self {
            mmsi,
            position,
            epfd_type: EpfdType::Surveyed,
            utc_time,
            position_accuracy: true,
            raim: false,
        }
    }
}

/// An aid to navigation (AIS message Type 21).
#[derive(Debug, Clone, PartialEq)]
pub struct AidToNavigationData {
    /// AtoN MMSI
    pub mmsi: u32,
    /// Aid name, up to 20 6-bit characters
    pub name: String,
    /// Aid type code (0-31)
    pub aid_type: u8,
    /// Charted position
    pub position: Position,
    /// Structure dimensions
    pub dimensions: VesselDimensions,
    /// Position fixing device
    pub epfd_type: EpfdType,
    /// Off its charted position
    pub off_position: bool,
    /// Virtual aid, no physical structure
    pub virtual_aid: bool,
    /// High position accuracy
    pub position_accuracy: bool,
    /// RAIM in use
    pub raim: bool,
}

impl AidToNavigationData {
    /// Creates an aid to navigation at the given position.
    pub fn new(mmsi: u32, name: impl Into<String>, aid_type: u8, position: Position) -> Self {
        Self {
            mmsi,
            name: name.into(),
            aid_type,
            position,
            dimensions: VesselDimensions::default(),
            epfd_type: EpfdType::Surveyed,
            off_position: false,
            virtual_aid: false,
            position_accuracy: true,
            raim: false,
        }
    }
}

/// A search-and-rescue aircraft (AIS message Type 9).
#[derive(Debug, Clone, PartialEq)]
pub struct SarAircraftData {
    /// Aircraft MMSI
    pub mmsi: u32,
    /// Current position
    pub position: Position,
    /// Altitude in meters (None = not available)
    pub altitude: Option<u16>,
    /// Speed over ground, knots
    pub sog_knots: f64,
    /// Course over ground, degrees true
    pub cog: f64,
    /// UTC second of the position fix
    pub timestamp_seconds: u8,
    /// High position accuracy
    pub position_accuracy: bool,
    /// RAIM in use
    pub raim: bool,
}
