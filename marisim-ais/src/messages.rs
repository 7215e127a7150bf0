//! Message schemas: bit layouts for the supported AIS message types.
//!
//! Each message struct encodes to and decodes from the contiguous bit
//! stream defined by ITU-R M.1371: Types 1/3 (position report, 168 bits),
//! 4 (base station, 168), 5 (static and voyage, 424), 9 (SAR aircraft,
//! 168), 18 (Class B position, 168), and 21 (aid to navigation, 272).
//!
//! Out-of-range values are clamped to the representable maximum of their
//! bit field rather than rejected; "not available" sentinels are encoded
//! and detected exactly.

use chrono::{Datelike, Timelike};
use marisim_common::{Error, Position, VesselDimensions};

use crate::bits::{BitReader, BitWriter};
use crate::vessel::{
    AidToNavigationData, BaseStationData, EpfdType, Eta, NavigationStatus, SarAircraftData,
    VesselState,
};

/// Fixed-point scale for latitude/longitude (1/10000 arc-minute).
const COORD_SCALE: f64 = 600_000.0;
/// Longitude "not available" sentinel: 181 degrees east.
const LON_NOT_AVAILABLE: i32 = 0x6791AC0;
/// Latitude "not available" sentinel: 91 degrees north.
const LAT_NOT_AVAILABLE: i32 = 0x3412140;
/// Speed over ground "not available" sentinel (10-bit field).
const SOG_NOT_AVAILABLE: u32 = 1023;
/// Course over ground "not available" sentinel (12-bit field).
const COG_NOT_AVAILABLE: u32 = 3600;
/// Heading "not available" sentinel (9-bit field).
const HEADING_NOT_AVAILABLE: u32 = 511;
/// Rate of turn "not available" sentinel (8-bit signed field).
const ROT_NOT_AVAILABLE: i32 = -128;
/// Altitude "not available" sentinel (12-bit field).
const ALTITUDE_NOT_AVAILABLE: u32 = 4095;

fn encode_position(w: &mut BitWriter, position: Option<&Position>) {
    match position {
        Some(p) => {
            w.write_i32((p.longitude() * COORD_SCALE).round() as i32, 28);
            w.write_i32((p.latitude() * COORD_SCALE).round() as i32, 27);
        }
        None => {
            w.write_i32(LON_NOT_AVAILABLE, 28);
            w.write_i32(LAT_NOT_AVAILABLE, 27);
        }
    }
}

fn decode_position(r: &mut BitReader) -> Result<Option<Position>, Error> {
    let lon = r.read_i32(28)?;
    let lat = r.read_i32(27)?;
    if lon == LON_NOT_AVAILABLE || lat == LAT_NOT_AVAILABLE {
        return Ok(None);
    }
    Ok(Some(Position::new(
        lat as f64 / COORD_SCALE,
        lon as f64 / COORD_SCALE,
    )?))
}

/// Speed in tenths of a knot, clamped to 102.2 kn; 1023 = not available.
fn encode_sog(sog: Option<f64>) -> u32 {
    match sog {
        Some(knots) => ((knots * 10.0).round() as i64).clamp(0, 1022) as u32,
        None => SOG_NOT_AVAILABLE,
    }
}

fn decode_sog(raw: u32) -> Option<f64> {
    (raw != SOG_NOT_AVAILABLE).then(|| raw as f64 / 10.0)
}

/// Course in tenths of a degree; 3600 = not available.
fn encode_cog(cog: Option<f64>) -> u32 {
    match cog {
        Some(degrees) => (((degrees.rem_euclid(360.0)) * 10.0).round() as u32).min(3599),
        None => COG_NOT_AVAILABLE,
    }
}

fn decode_cog(raw: u32) -> Option<f64> {
    (raw < COG_NOT_AVAILABLE).then(|| raw as f64 / 10.0)
}

fn encode_heading(heading: Option<u16>) -> u32 {
    match heading {
        Some(degrees) => u32::from(degrees % 360),
        None => HEADING_NOT_AVAILABLE,
    }
}

fn decode_heading(raw: u32) -> Option<u16> {
    (raw != HEADING_NOT_AVAILABLE).then_some(raw as u16)
}

/// Rate of turn: `4.733 * sqrt(|deg/min|)` with the sign of the turn,
/// clamped to +/-126; -128 = not available.
fn encode_rot(rot: Option<f64>) -> i32 {
    match rot {
        Some(deg_per_min) => {
            let encoded = (4.733 * deg_per_min.abs().sqrt()).round() as i32;
            (encoded.min(126)) * deg_per_min.signum() as i32
        }
        None => ROT_NOT_AVAILABLE,
    }
}

fn decode_rot(raw: i32) -> Option<f64> {
    if raw == ROT_NOT_AVAILABLE {
        return None;
    }
    let magnitude = (raw.abs() as f64 / 4.733).powi(2);
    Some(magnitude * raw.signum() as f64)
}

fn encode_dimensions(w: &mut BitWriter, dimensions: &VesselDimensions) {
    w.write_u32(u32::from(dimensions.to_bow).min(511), 9);
    w.write_u32(u32::from(dimensions.to_stern).min(511), 9);
    w.write_u32(u32::from(dimensions.to_port).min(63), 6);
    w.write_u32(u32::from(dimensions.to_starboard).min(63), 6);
}

fn decode_dimensions(r: &mut BitReader) -> Result<VesselDimensions, Error> {
    Ok(VesselDimensions {
        to_bow: r.read_u32(9)? as u16,
        to_stern: r.read_u32(9)? as u16,
        to_port: r.read_u32(6)? as u8,
        to_starboard: r.read_u32(6)? as u8,
    })
}

/// Types 1 and 3: Class A position report (168 bits).
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    /// 1 (scheduled) or 3 (interrogation response)
    pub message_type: u8,
    /// Repeat indicator
    pub repeat: u8,
    /// Vessel MMSI
    pub mmsi: u32,
    /// Navigational status
    pub nav_status: NavigationStatus,
    /// Rate of turn, degrees per minute
    pub rate_of_turn: Option<f64>,
    /// Speed over ground, knots
    pub sog_knots: Option<f64>,
    /// High position accuracy
    pub position_accuracy: bool,
    /// Position (None = not available)
    pub position: Option<Position>,
    /// Course over ground, degrees true
    pub cog: Option<f64>,
    /// True heading, degrees
    pub heading: Option<u16>,
    /// UTC second of the fix (60 = not available)
    pub timestamp_seconds: u8,
    /// RAIM in use
    pub raim: bool,
    /// SOTDMA/ITDMA radio status
    pub radio_status: u32,
}

impl PositionReport {
    /// Builds a scheduled (Type 1) report from vessel state.
    pub fn from_vessel(vessel: &VesselState) -> Self {
        let nav = &vessel.navigation;
        Self {
            message_type: 1,
            repeat: 0,
            mmsi: vessel.mmsi(),
            nav_status: nav.nav_status,
            rate_of_turn: nav.rate_of_turn,
            sog_knots: Some(nav.sog_knots),
            position_accuracy: nav.position_accuracy,
            position: Some(nav.position),
            cog: Some(nav.cog),
            heading: nav.heading,
            timestamp_seconds: nav.timestamp_seconds,
            raim: nav.raim,
            radio_status: 0,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(u32::from(self.message_type), 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        w.write_u32(self.nav_status.code(), 4);
        w.write_i32(encode_rot(self.rate_of_turn), 8);
        w.write_u32(encode_sog(self.sog_knots), 10);
        w.write(self.position_accuracy);
        encode_position(w, self.position.as_ref());
        w.write_u32(encode_cog(self.cog), 12);
        w.write_u32(encode_heading(self.heading), 9);
        w.write_u32(u32::from(self.timestamp_seconds), 6);
        w.write_u32(0, 2); // maneuver indicator
        w.write_u32(0, 3); // spare
        w.write(self.raim);
        w.write_u32(self.radio_status, 19);
    }

    fn decode(r: &mut BitReader, message_type: u8) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        let nav_status = NavigationStatus::from_code(r.read_u32(4)?);
        let rate_of_turn = decode_rot(r.read_i32(8)?);
        let sog_knots = decode_sog(r.read_u32(10)?);
        let position_accuracy = r.read_u32(1)? != 0;
        let position = decode_position(r)?;
        let cog = decode_cog(r.read_u32(12)?);
        let heading = decode_heading(r.read_u32(9)?);
        let timestamp_seconds = r.read_u32(6)? as u8;
        r.read_u32(2)?; // maneuver indicator
        r.read_u32(3)?; // spare
        let raim = r.read_u32(1)? != 0;
        let radio_status = r.read_u32(19)?;
        Ok(Self {
            message_type,
            repeat,
            mmsi,
            nav_status,
            rate_of_turn,
            sog_knots,
            position_accuracy,
            position,
            cog,
            heading,
            timestamp_seconds,
            raim,
            radio_status,
        })
    }
}

/// Type 4: base station report (168 bits).
#[derive(Debug, Clone, PartialEq)]
pub struct BaseStationReport {
    /// Repeat indicator
    pub repeat: u8,
    /// Station MMSI
    pub mmsi: u32,
    /// UTC year (0 = not available)
    pub year: u16,
    /// UTC month 1-12 (0 = not available)
    pub month: u8,
    /// UTC day 1-31 (0 = not available)
    pub day: u8,
    /// UTC hour 0-23 (24 = not available)
    pub hour: u8,
    /// UTC minute 0-59 (60 = not available)
    pub minute: u8,
    /// UTC second 0-59 (60 = not available)
    pub second: u8,
    /// High position accuracy
    pub position_accuracy: bool,
    /// Station position
    pub position: Option<Position>,
    /// Position fixing device
    pub epfd_type: EpfdType,
    /// RAIM in use
    pub raim: bool,
    /// SOTDMA radio status
    pub radio_status: u32,
}

impl BaseStationReport {
    /// Builds a report from base station data.
    pub fn from_station(station: &BaseStationData) -> Self {
        let utc = &station.utc_time;
        Self {
            repeat: 0,
            mmsi: station.mmsi,
            year: utc.year().clamp(0, 9999) as u16,
            month: utc.month() as u8,
            day: utc.day() as u8,
            hour: utc.hour() as u8,
            minute: utc.minute() as u8,
            second: utc.second().min(59) as u8,
            position_accuracy: station.position_accuracy,
            position: Some(station.position),
            epfd_type: station.epfd_type,
            raim: station.raim,
            radio_status: 0,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(4, 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        w.write_u32(u32::from(self.year).min(9999), 14);
        w.write_u32(u32::from(self.month), 4);
        w.write_u32(u32::from(self.day), 5);
        w.write_u32(u32::from(self.hour), 5);
        w.write_u32(u32::from(self.minute), 6);
        w.write_u32(u32::from(self.second), 6);
        w.write(self.position_accuracy);
        encode_position(w, self.position.as_ref());
        w.write_u32(self.epfd_type.code(), 4);
        w.write_u32(0, 10); // spare
        w.write(self.raim);
        w.write_u32(self.radio_status, 19);
    }

    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        let year = r.read_u32(14)? as u16;
        let month = r.read_u32(4)? as u8;
        let day = r.read_u32(5)? as u8;
        let hour = r.read_u32(5)? as u8;
        let minute = r.read_u32(6)? as u8;
        let second = r.read_u32(6)? as u8;
        let position_accuracy = r.read_u32(1)? != 0;
        let position = decode_position(r)?;
        let epfd_type = EpfdType::from_code(r.read_u32(4)?);
        r.read_u32(10)?; // spare
        let raim = r.read_u32(1)? != 0;
        let radio_status = r.read_u32(19)?;
        Ok(Self {
            repeat,
            mmsi,
            year,
            month,
            day,
            hour,
            minute,
            second,
            position_accuracy,
            position,
            epfd_type,
            raim,
            radio_status,
        })
    }
}

/// Type 5: Class A static and voyage data (424 bits, always 2 fragments).
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAndVoyage {
    /// Repeat indicator
    pub repeat: u8,
    /// Vessel MMSI
    pub mmsi: u32,
    /// AIS version indicator
    pub ais_version: u8,
    /// IMO number (0 = not available)
    pub imo_number: u32,
    /// Call sign, up to 7 characters
    pub call_sign: String,
    /// Vessel name, up to 20 characters
    pub name: String,
    /// Ship and cargo type code
    pub ship_type: u8,
    /// Hull dimensions
    pub dimensions: VesselDimensions,
    /// Position fixing device
    pub epfd_type: EpfdType,
    /// Estimated time of arrival
    pub eta: Eta,
    /// Draught in meters (clamped to 25.5)
    pub draught: f64,
    /// Destination, up to 20 characters
    pub destination: String,
    /// Data terminal equipment ready
    pub dte: bool,
}

impl StaticAndVoyage {
    /// Builds a report from vessel state.
    pub fn from_vessel(vessel: &VesselState) -> Self {
        let stat = &vessel.static_data;
        let voyage = &vessel.voyage;
        Self {
            repeat: 0,
            mmsi: stat.mmsi,
            ais_version: 0,
            imo_number: stat.imo_number,
            call_sign: stat.call_sign.clone(),
            name: stat.name.clone(),
            ship_type: stat.ship_type,
            dimensions: stat.dimensions,
            epfd_type: stat.epfd_type,
            eta: voyage.eta,
            draught: voyage.draught,
            destination: voyage.destination.clone(),
            dte: true,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(5, 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        w.write_u32(u32::from(self.ais_version), 2);
        w.write_u32(self.imo_number, 30);
        w.write_text(&self.call_sign, 7);
        w.write_text(&self.name, 20);
        w.write_u32(u32::from(self.ship_type), 8);
        encode_dimensions(w, &self.dimensions);
        w.write_u32(self.epfd_type.code(), 4);
        w.write_u32(u32::from(self.eta.month), 4);
        w.write_u32(u32::from(self.eta.day), 5);
        w.write_u32(u32::from(self.eta.hour), 5);
        w.write_u32(u32::from(self.eta.minute), 6);
        w.write_u32(((self.draught * 10.0).round() as i64).clamp(0, 255) as u32, 8);
        w.write_text(&self.destination, 20);
        w.write(self.dte);
        w.write_u32(0, 1); // spare
    }

    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        let ais_version = r.read_u32(2)? as u8;
        let imo_number = r.read_u32(30)?;
        let call_sign = r.read_text(7)?;
        let name = r.read_text(20)?;
        let ship_type = r.read_u32(8)? as u8;
        let dimensions = decode_dimensions(r)?;
        let epfd_type = EpfdType::from_code(r.read_u32(4)?);
        let eta = Eta {
            month: r.read_u32(4)? as u8,
            day: r.read_u32(5)? as u8,
            hour: r.read_u32(5)? as u8,
            minute: r.read_u32(6)? as u8,
        };
        let draught = r.read_u32(8)? as f64 / 10.0;
        let destination = r.read_text(20)?;
        let dte = r.read_u32(1)? != 0;
        r.read_u32(1)?; // spare
        Ok(Self {
            repeat,
            mmsi,
            ais_version,
            imo_number,
            call_sign,
            name,
            ship_type,
            dimensions,
            epfd_type,
            eta,
            draught,
            destination,
            dte,
        })
    }
}

/// Type 9: SAR aircraft position report (168 bits).
#[derive(Debug, Clone, PartialEq)]
pub struct SarAircraftPosition {
    /// Repeat indicator
    pub repeat: u8,
    /// Aircraft MMSI
    pub mmsi: u32,
    /// Altitude in meters (clamped to 4094; None = not available)
    pub altitude: Option<u16>,
    /// Speed over ground, knots
    pub sog_knots: Option<f64>,
    /// High position accuracy
    pub position_accuracy: bool,
    /// Position (None = not available)
    pub position: Option<Position>,
    /// Course over ground, degrees true
    pub cog: Option<f64>,
    /// UTC second of the fix
    pub timestamp_seconds: u8,
    /// Data terminal equipment ready
    pub dte: bool,
    /// RAIM in use
    pub raim: bool,
    /// Radio status
    pub radio_status: u32,
}

impl SarAircraftPosition {
    /// Builds a report from SAR aircraft data.
    pub fn from_aircraft(aircraft: &SarAircraftData) -> Self {
        Self {
            repeat: 0,
            mmsi: aircraft.mmsi,
            altitude: aircraft.altitude,
            sog_knots: Some(aircraft.sog_knots),
            position_accuracy: aircraft.position_accuracy,
            position: Some(aircraft.position),
            cog: Some(aircraft.cog),
            timestamp_seconds: aircraft.timestamp_seconds,
            dte: true,
            raim: aircraft.raim,
            radio_status: 0,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(9, 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        let altitude = match self.altitude {
            Some(meters) => u32::from(meters).min(4094),
            None => ALTITUDE_NOT_AVAILABLE,
        };
        w.write_u32(altitude, 12);
        w.write_u32(encode_sog(self.sog_knots), 10);
        w.write(self.position_accuracy);
        encode_position(w, self.position.as_ref());
        w.write_u32(encode_cog(self.cog), 12);
        w.write_u32(u32::from(self.timestamp_seconds), 6);
        w.write_u32(0, 8); // regional reserved
        w.write(self.dte);
        w.write_u32(0, 3); // spare
        w.write_u32(0, 1); // assigned mode
        w.write(self.raim);
        w.write_u32(self.radio_status, 20);
    }

    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        let altitude_raw = r.read_u32(12)?;
        let altitude = (altitude_raw != ALTITUDE_NOT_AVAILABLE).then_some(altitude_raw as u16);
        let sog_knots = decode_sog(r.read_u32(10)?);
        let position_accuracy = r.read_u32(1)? != 0;
        let position = decode_position(r)?;
        let cog = decode_cog(r.read_u32(12)?);
        let timestamp_seconds = r.read_u32(6)? as u8;
        r.read_u32(8)?; // regional reserved
        let dte = r.read_u32(1)? != 0;
        r.read_u32(3)?; // spare
        r.read_u32(1)?; // assigned mode
        let raim = r.read_u32(1)? != 0;
        let radio_status = r.read_u32(20)?;
        Ok(Self {
            repeat,
            mmsi,
            altitude,
            sog_knots,
            position_accuracy,
            position,
            cog,
            timestamp_seconds,
            dte,
            raim,
            radio_status,
        })
    }
}

/// Type 18: standard Class B position report (168 bits).
#[derive(Debug, Clone, PartialEq)]
pub struct StandardClassBReport {
    /// Repeat indicator
    pub repeat: u8,
    /// Vessel MMSI
    pub mmsi: u32,
    /// Speed over ground, knots
    pub sog_knots: Option<f64>,
    /// High position accuracy
    pub position_accuracy: bool,
    /// Position (None = not available)
    pub position: Option<Position>,
    /// Course over ground, degrees true
    pub cog: Option<f64>,
    /// True heading, degrees
    pub heading: Option<u16>,
    /// UTC second of the fix
    pub timestamp_seconds: u8,
    /// Carrier-sense unit flag
    pub cs_unit: bool,
    /// Display available
    pub display: bool,
    /// DSC capability
    pub dsc: bool,
    /// Whole-band operation
    pub band: bool,
    /// Message 22 frequency management
    pub msg22: bool,
    /// RAIM in use
    pub raim: bool,
    /// Radio status
    pub radio_status: u32,
}

impl StandardClassBReport {
    /// Builds a report from vessel state.
    pub fn from_vessel(vessel: &VesselState) -> Self {
        let nav = &vessel.navigation;
        Self {
            repeat: 0,
            mmsi: vessel.mmsi(),
            sog_knots: Some(nav.sog_knots),
            position_accuracy: nav.position_accuracy,
            position: Some(nav.position),
            cog: Some(nav.cog),
            heading: nav.heading,
            timestamp_seconds: nav.timestamp_seconds,
            cs_unit: true,
            display: false,
            dsc: true,
            band: true,
            msg22: true,
            raim: nav.raim,
            radio_status: 0,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(18, 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        w.write_u32(0, 8); // regional reserved
        w.write_u32(encode_sog(self.sog_knots), 10);
        w.write(self.position_accuracy);
        encode_position(w, self.position.as_ref());
        w.write_u32(encode_cog(self.cog), 12);
        w.write_u32(encode_heading(self.heading), 9);
        w.write_u32(u32::from(self.timestamp_seconds), 6);
        w.write_u32(0, 2); // regional reserved
        w.write(self.cs_unit);
        w.write(self.display);
        w.write(self.dsc);
        w.write(self.band);
        w.write(self.msg22);
        w.write_u32(0, 1); // assigned mode
        w.write(self.raim);
        w.write_u32(self.radio_status, 20);
    }

    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        r.read_u32(8)?; // regional reserved
        let sog_knots = decode_sog(r.read_u32(10)?);
        let position_accuracy = r.read_u32(1)? != 0;
        let position = decode_position(r)?;
        let cog = decode_cog(r.read_u32(12)?);
        let heading = decode_heading(r.read_u32(9)?);
        let timestamp_seconds = r.read_u32(6)? as u8;
        r.read_u32(2)?; // regional reserved
        let cs_unit = r.read_u32(1)? != 0;
        let display = r.read_u32(1)? != 0;
        let dsc = r.read_u32(1)? != 0;
        let band = r.read_u32(1)? != 0;
        let msg22 = r.read_u32(1)? != 0;
        r.read_u32(1)?; // assigned mode
        let raim = r.read_u32(1)? != 0;
        let radio_status = r.read_u32(20)?;
        Ok(Self {
            repeat,
            mmsi,
            sog_knots,
            position_accuracy,
            position,
            cog,
            heading,
            timestamp_seconds,
            cs_unit,
            display,
            dsc,
            band,
            msg22,
            raim,
            radio_status,
        })
    }
}

/// Type 21: aid-to-navigation report (272 bits without name extension).
#[derive(Debug, Clone, PartialEq)]
pub struct AidToNavigationReport {
    /// Repeat indicator
    pub repeat: u8,
    /// AtoN MMSI
    pub mmsi: u32,
    /// Aid type code (0-31)
    pub aid_type: u8,
    /// Aid name, up to 20 characters
    pub name: String,
    /// High position accuracy
    pub position_accuracy: bool,
    /// Charted position
    pub position: Option<Position>,
    /// Structure dimensions
    pub dimensions: VesselDimensions,
    /// Position fixing device
    pub epfd_type: EpfdType,
    /// UTC second of the fix
    pub timestamp_seconds: u8,
    /// Off its charted position
    pub off_position: bool,
    /// RAIM in use
    pub raim: bool,
    /// Virtual aid flag
    pub virtual_aid: bool,
}

impl AidToNavigationReport {
    /// Builds a report from aid-to-navigation data.
    pub fn from_aid(aid: &AidToNavigationData) -> Self {
        Self {
            repeat: 0,
            mmsi: aid.mmsi,
            aid_type: aid.aid_type,
            name: aid.name.clone(),
            position_accuracy: aid.position_accuracy,
            position: Some(aid.position),
            dimensions: aid.dimensions,
            epfd_type: aid.epfd_type,
            timestamp_seconds: 60,
            off_position: aid.off_position,
            raim: aid.raim,
            virtual_aid: aid.virtual_aid,
        }
    }

    fn encode(&self, w: &mut BitWriter) {
        w.write_u32(21, 6);
        w.write_u32(u32::from(self.repeat), 2);
        w.write_u32(self.mmsi, 30);
        w.write_u32(u32::from(self.aid_type).min(31), 5);
        w.write_text(&self.name, 20);
        w.write(self.position_accuracy);
        encode_position(w, self.position.as_ref());
        encode_dimensions(w, &self.dimensions);
        w.write_u32(self.epfd_type.code(), 4);
        w.write_u32(u32::from(self.timestamp_seconds), 6);
        w.write(self.off_position);
        w.write_u32(0, 8); // regional reserved
        w.write(self.raim);
        w.write(self.virtual_aid);
        w.write_u32(0, 1); // assigned mode
        w.write_u32(0, 1); // spare
    }

    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        let repeat = r.read_u32(2)? as u8;
        let mmsi = r.read_u32(30)?;
        let aid_type = r.read_u32(5)? as u8;
        let name = r.read_text(20)?;
        let position_accuracy = r.read_u32(1)? != 0;
        let position = decode_position(r)?;
        let dimensions = decode_dimensions(r)?;
        let epfd_type = EpfdType::from_code(r.read_u32(4)?);
        let timestamp_seconds = r.read_u32(6)? as u8;
        let off_position = r.read_u32(1)? != 0;
        r.read_u32(8)?; // regional reserved
        let raim = r.read_u32(1)? != 0;
        let virtual_aid = r.read_u32(1)? != 0;
        r.read_u32(1)?; // assigned mode
        r.read_u32(1)?; // spare
        Ok(Self {
            repeat,
            mmsi,
            aid_type,
            name,
            position_accuracy,
            position,
            dimensions,
            epfd_type,
            timestamp_seconds,
            off_position,
            raim,
            virtual_aid,
        })
    }
}

/// A decoded or to-be-encoded AIS message.
#[derive(Debug, Clone, PartialEq)]
pub enum AisMessage {
    /// Types 1/3
    PositionReport(PositionReport),
    /// Type 4
    BaseStationReport(BaseStationReport),
    /// Type 5
    StaticAndVoyage(StaticAndVoyage),
    /// Type 9
    SarAircraftPosition(SarAircraftPosition),
    /// Type 18
    StandardClassBReport(StandardClassBReport),
    /// Type 21
    AidToNavigationReport(AidToNavigationReport),
}

impl AisMessage {
    /// The numeric message type.
    pub fn message_type(&self) -> u8 {
        match self {
            AisMessage::PositionReport(m) => m.message_type,
            AisMessage::BaseStationReport(_) => 4,
            AisMessage::StaticAndVoyage(_) => 5,
            AisMessage::SarAircraftPosition(_) => 9,
            AisMessage::StandardClassBReport(_) => 18,
            AisMessage::AidToNavigationReport(_) => 21,
        }
    }

    /// The sender's MMSI.
    pub fn mmsi(&self) -> u32 {
        match self {
            AisMessage::PositionReport(m) => m.mmsi,
            AisMessage::BaseStationReport(m) => m.mmsi,
            AisMessage::StaticAndVoyage(m) => m.mmsi,
            AisMessage::SarAircraftPosition(m) => m.mmsi,
            AisMessage::StandardClassBReport(m) => m.mmsi,
            AisMessage::AidToNavigationReport(m) => m.mmsi,
        }
    }

    /// Encodes the message to an armored payload and its fill-bit count.
    pub fn encode_payload(&self) -> (String, u8) {
        let mut writer = BitWriter::new();
        match self {
            AisMessage::PositionReport(m) => m.encode(&mut writer),
            AisMessage::BaseStationReport(m) => m.encode(&mut writer),
            AisMessage::StaticAndVoyage(m) => m.encode(&mut writer),
            AisMessage::SarAircraftPosition(m) => m.encode(&mut writer),
            AisMessage::StandardClassBReport(m) => m.encode(&mut writer),
            AisMessage::AidToNavigationReport(m) => m.encode(&mut writer),
        }
        writer.into_payload()
    }

    /// Decodes a de-armored payload into a message.
    pub fn decode(payload: &str, fill_bits: u8) -> Result<Self, Error> {
        let mut reader = BitReader::from_payload(payload, fill_bits)?;
        let message_type = reader.read_u32(6)? as u8;
        match message_type {
            1 | 3 => Ok(AisMessage::PositionReport(PositionReport::decode(
                &mut reader,
                message_type,
            )?)),
            4 => Ok(AisMessage::BaseStationReport(BaseStationReport::decode(
                &mut reader,
            )?)),
            5 => Ok(AisMessage::StaticAndVoyage(StaticAndVoyage::decode(
                &mut reader,
            )?)),
            9 => Ok(AisMessage::SarAircraftPosition(
                SarAircraftPosition::decode(&mut reader)?,
            )),
            18 => Ok(AisMessage::StandardClassBReport(
                StandardClassBReport::decode(&mut reader)?,
            )),
            21 => Ok(AisMessage::AidToNavigationReport(
                AidToNavigationReport::decode(&mut reader)?,
            )),
            other => Err(Error::SchemaMismatch(format!(
                "unsupported message type {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_vessel() -> VesselState {
        let mut vessel =
            VesselState::new(367001234, Position::new(37.8, -122.4).unwrap());
        vessel.static_data.name = "PACIFIC TRADER".to_string();
        vessel.static_data.call_sign = "WDA1234".to_string();
        vessel.static_data.ship_type = 70;
        vessel.static_data.dimensions = VesselDimensions {
            to_bow: 120,
            to_stern: 30,
            to_port: 10,
            to_starboard: 12,
        };
        vessel.navigation.sog_knots = 15.5;
        vessel.navigation.cog = 90.0;
        vessel.navigation.heading = Some(92);
        vessel.navigation.timestamp_seconds = 30;
        vessel.voyage.destination = "OAKLAND".to_string();
        vessel.voyage.draught = 8.5;
        vessel
    }

    #[test]
    fn test_type1_round_trip() {
        let vessel = sample_vessel();
        let report = PositionReport::from_vessel(&vessel);
        let message = AisMessage::PositionReport(report.clone());

        let (payload, fill) = message.encode_payload();
        // 168 bits = 28 armored characters, no fill
        assert_eq!(payload.len(), 28);
        assert_eq!(fill, 0);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::PositionReport(m) => m,
            other => panic!("expected position report, got {other:?}"),
        };
        assert_eq!(decoded.mmsi, 367001234);
        assert_eq!(decoded.sog_knots, Some(15.5));
        assert_eq!(decoded.cog, Some(90.0));
        assert_eq!(decoded.heading, Some(92));
        assert_eq!(decoded.timestamp_seconds, 30);

        let position = decoded.position.unwrap();
        assert!((position.latitude() - 37.8).abs() < 1e-5);
        assert!((position.longitude() + 122.4).abs() < 1e-5);
    }

    #[test]
    fn test_sog_clamped_to_field_maximum() {
        let mut vessel = sample_vessel();
        vessel.navigation.sog_knots = 150.0;
        let message = AisMessage::PositionReport(PositionReport::from_vessel(&vessel));

        let (payload, fill) = message.encode_payload();
        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::PositionReport(m) => m,
            other => panic!("expected position report, got {other:?}"),
        };
        assert_eq!(decoded.sog_knots, Some(102.2));
    }

    #[test]
    fn test_not_available_sentinels() {
        let mut report = PositionReport::from_vessel(&sample_vessel());
        report.sog_knots = None;
        report.cog = None;
        report.heading = None;
        report.position = None;
        report.rate_of_turn = None;

        let (payload, fill) = AisMessage::PositionReport(report).encode_payload();
        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::PositionReport(m) => m,
            other => panic!("expected position report, got {other:?}"),
        };
        assert_eq!(decoded.sog_knots, None);
        assert_eq!(decoded.cog, None);
        assert_eq!(decoded.heading, None);
        assert_eq!(decoded.position, None);
        assert_eq!(decoded.rate_of_turn, None);
    }

    #[test]
    fn test_type5_round_trip() {
        let vessel = sample_vessel();
        let message = AisMessage::StaticAndVoyage(StaticAndVoyage::from_vessel(&vessel));

        let (payload, fill) = message.encode_payload();
        // 424 bits pad to 426: 71 characters, 2 fill bits
        assert_eq!(payload.len(), 71);
        assert_eq!(fill, 2);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::StaticAndVoyage(m) => m,
            other => panic!("expected static and voyage, got {other:?}"),
        };
        assert_eq!(decoded.mmsi, 367001234);
        assert_eq!(decoded.name, "PACIFIC TRADER");
        assert_eq!(decoded.call_sign, "WDA1234");
        assert_eq!(decoded.ship_type, 70);
        assert_eq!(decoded.destination, "OAKLAND");
        assert_eq!(decoded.draught, 8.5);
        assert_eq!(decoded.dimensions.to_bow, 120);
        assert_eq!(decoded.eta, Eta::default());
    }

    #[test]
    fn test_type4_round_trip() {
        let utc = chrono::Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 44).unwrap();
        let station = BaseStationData::new(
            3669999,
            Position::new(37.81, -122.41).unwrap(),
            utc,
        );
        let message = AisMessage::BaseStationReport(BaseStationReport::from_station(&station));

        let (payload, fill) = message.encode_payload();
        assert_eq!(payload.len(), 28);
        assert_eq!(fill, 0);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::BaseStationReport(m) => m,
            other => panic!("expected base station report, got {other:?}"),
        };
        assert_eq!(decoded.mmsi, 3669999);
        assert_eq!(decoded.year, 2026);
        assert_eq!(decoded.month, 8);
        assert_eq!(decoded.day, 23);
        assert_eq!(decoded.hour, 12);
        assert_eq!(decoded.second, 44);
        assert_eq!(decoded.epfd_type, EpfdType::Surveyed);
    }

    #[test]
    fn test_type18_round_trip() {
        let vessel = sample_vessel();
        let message =
            AisMessage::StandardClassBReport(StandardClassBReport::from_vessel(&vessel));

        let (payload, fill) = message.encode_payload();
        assert_eq!(payload.len(), 28);
        assert_eq!(fill, 0);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::StandardClassBReport(m) => m,
            other => panic!("expected class B report, got {other:?}"),
        };
        assert_eq!(decoded.mmsi, 367001234);
        assert_eq!(decoded.sog_knots, Some(15.5));
        assert!(decoded.cs_unit);
    }

    #[test]
    fn test_type21_round_trip() {
        let aid = AidToNavigationData::new(
            993672085,
            "HARBOR LIGHT",
            1,
            Position::new(37.82, -122.42).unwrap(),
        );
        let message =
            AisMessage::AidToNavigationReport(AidToNavigationReport::from_aid(&aid));

        let (payload, fill) = message.encode_payload();
        // 272 bits pad to 276: 46 characters, 4 fill bits
        assert_eq!(payload.len(), 46);
        assert_eq!(fill, 4);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::AidToNavigationReport(m) => m,
            other => panic!("expected AtoN report, got {other:?}"),
        };
        assert_eq!(decoded.mmsi, 993672085);
        assert_eq!(decoded.name, "HARBOR LIGHT");
        assert_eq!(decoded.aid_type, 1);
        assert!(!decoded.virtual_aid);
    }

    #[test]
    fn test_type9_round_trip() {
        let aircraft = SarAircraftData {
            mmsi: 111232506,
            position: Position::new(38.0, -123.0).unwrap(),
            altitude: Some(500),
            sog_knots: 120.0,
            cog: 180.0,
            timestamp_seconds: 15,
            position_accuracy: true,
            raim: false,
        };
        let message =
            AisMessage::SarAircraftPosition(SarAircraftPosition::from_aircraft(&aircraft));

        let (payload, fill) = message.encode_payload();
        assert_eq!(payload.len(), 28);
        assert_eq!(fill, 0);

        let decoded = match AisMessage::decode(&payload, fill).unwrap() {
            AisMessage::SarAircraftPosition(m) => m,
            other => panic!("expected SAR report, got {other:?}"),
        };
        assert_eq!(decoded.altitude, Some(500));
        // SOG above the 102.2 kn field maximum clamps
        assert_eq!(decoded.sog_knots, Some(102.2));
    }

    #[test]
    fn test_rate_of_turn_encoding() {
        assert_eq!(encode_rot(None), -128);
        assert_eq!(encode_rot(Some(0.0)), 0);
        // 10 deg/min: 4.733 * sqrt(10) = 14.97 -> 15
        assert_eq!(encode_rot(Some(10.0)), 15);
        assert_eq!(encode_rot(Some(-10.0)), -15);
        // Hard-over turns clamp at the field limit
        assert_eq!(encode_rot(Some(100_000.0)), 126);

        let decoded = decode_rot(15).unwrap();
        assert!((decoded - 10.0).abs() < 0.1);
        assert_eq!(decode_rot(-128), None);
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let mut writer = BitWriter::new();
        writer.write_u32(24, 6);
        writer.write_u32(0, 30);
        let (payload, fill) = writer.into_payload();
        let err = AisMessage::decode(&payload, fill).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }
}
