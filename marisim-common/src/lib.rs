//! Common types and utilities for marisim
//!
//! This crate provides shared value types, configuration structures, and
//! utilities used across all marisim crates.

pub mod clock;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod position;
pub mod units;

pub use clock::{SimulationClock, SimulationTimeConfig};
pub use config::{
    AidToNavigationConfig, BaseStationConfig, FileOutputConfig, MovementConfig, OutputConfig,
    PositionConfig, ReportConfig, ScenarioConfig, SerialOutputConfig, SimulationConfig,
    TcpOutputConfig, TraceConfig, UdpOutputConfig, VesselClass, VesselConfig, VesselDimensions,
};
pub use datetime::{NmeaDate, NmeaTime};
pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, LogLevel};
pub use position::{Hemisphere, Position};
pub use units::{Bearing, BearingType, Distance, DistanceUnit, Speed, SpeedUnit};
