//! Typed sentence implementations.

mod gga;
mod rmc;
mod vtg;

pub use gga::GgaSentence;
pub use rmc::RmcSentence;
pub use vtg::VtgSentence;

use marisim_common::Error;

/// GPS fix quality as carried in GGA field 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsFixQuality {
    /// No fix available
    Invalid,
    /// Standard GPS fix
    #[default]
    Gps,
    /// Differential GPS fix
    Dgps,
    /// Precise positioning service
    Pps,
    /// Real-time kinematic, fixed integers
    Rtk,
    /// Real-time kinematic, float integers
    FloatRtk,
    /// Dead-reckoning estimate
    Estimated,
    /// Manual input
    Manual,
    /// Simulation mode
    Simulation,
}

impl GpsFixQuality {
    /// The numeric wire code.
    pub fn code(&self) -> u8 {
        match self {
            GpsFixQuality::Invalid => 0,
            GpsFixQuality::Gps => 1,
            GpsFixQuality::Dgps => 2,
            GpsFixQuality::Pps => 3,
            GpsFixQuality::Rtk => 4,
            GpsFixQuality::FloatRtk => 5,
            GpsFixQuality::Estimated => 6,
            GpsFixQuality::Manual => 7,
            GpsFixQuality::Simulation => 8,
        }
    }

    /// Parses the numeric wire code.
    pub fn parse(code: u8) -> Result<Self, Error> {
        match code {
            0 => Ok(GpsFixQuality::Invalid),
            1 => Ok(GpsFixQuality::Gps),
            2 => Ok(GpsFixQuality::Dgps),
            3 => Ok(GpsFixQuality::Pps),
            4 => Ok(GpsFixQuality::Rtk),
            5 => Ok(GpsFixQuality::FloatRtk),
            6 => Ok(GpsFixQuality::Estimated),
            7 => Ok(GpsFixQuality::Manual),
            8 => Ok(GpsFixQuality::Simulation),
            _ => Err(Error::Format(format!("invalid fix quality: {code}"))),
        }
    }
}

/// Data validity flag (RMC field 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataStatus {
    /// Data valid
    Active,
    /// Receiver warning, data invalid
    #[default]
    Void,
}

impl DataStatus {
    /// The single-letter wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataStatus::Active => "A",
            DataStatus::Void => "V",
        }
    }

    /// Parses the single-letter flag. Unknown values read as void.
    pub fn parse(s: &str) -> Self {
        match s {
            "A" | "a" => DataStatus::Active,
            _ => DataStatus::Void,
        }
    }
}

/// Positioning-system mode indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeIndicator {
    /// Autonomous mode
    Autonomous,
    /// Differential mode
    Differential,
    /// Dead-reckoning estimate
    Estimated,
    /// Manual input
    Manual,
    /// Simulator mode
    Simulator,
    /// Data not valid
    #[default]
    NotValid,
}

impl ModeIndicator {
    /// The single-letter wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeIndicator::Autonomous => "A",
            ModeIndicator::Differential => "D",
            ModeIndicator::Estimated => "E",
            ModeIndicator::Manual => "M",
            ModeIndicator::Simulator => "S",
            ModeIndicator::NotValid => "N",
        }
    }

    /// Parses the single-letter mode. Unknown values read as not-valid.
    pub fn parse(s: &str) -> Self {
        match s {
            "A" | "a" => ModeIndicator::Autonomous,
            "D" | "d" => ModeIndicator::Differential,
            "E" | "e" => ModeIndicator::Estimated,
            "M" | "m" => ModeIndicator::Manual,
            "S" | "s" => ModeIndicator::Simulator,
            _ => ModeIndicator::NotValid,
        }
    }
}
