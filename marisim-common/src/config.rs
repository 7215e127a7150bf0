//! Scenario configuration loaded from YAML.
//!
//! The configuration surface covers the simulation clock, the simulated
//! fleet (vessels, base stations, aids to navigation), output sinks, and
//! trace recording. All structures validate before the simulation starts;
//! a bad scenario never reaches the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clock::SimulationTimeConfig;
use crate::position::Position;
use crate::Error;

fn default_true() -> bool {
    true
}

fn default_time_factor() -> f64 {
    1.0
}

fn default_tick_interval_ms() -> u64 {
    1000
}

/// Top-level scenario configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Simulation clock settings
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Simulated vessels
    #[serde(default)]
    pub vessels: Vec<VesselConfig>,
    /// Shore-side base stations
    #[serde(default)]
    pub base_stations: Vec<BaseStationConfig>,
    /// Aids to navigation
    #[serde(default)]
    pub aids_to_navigation: Vec<AidToNavigationConfig>,
    /// Output sinks
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
    /// Trace recording
    #[serde(default)]
    pub trace: TraceConfig,
}

impl ScenarioConfig {
    /// Loads and validates a scenario from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Parses and validates a scenario from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the scenario, returning the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        self.simulation.validate()?;

        if self.vessels.is_empty()
            && self.base_stations.is_empty()
            && self.aids_to_navigation.is_empty()
        {
            return Err(Error::Config(
                "scenario defines no vessels, base stations, or aids to navigation".into(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for vessel in &self.vessels {
            vessel.validate()?;
            if !seen.insert(vessel.mmsi) {
                return Err(Error::Config(format!("duplicate MMSI {}", vessel.mmsi)));
            }
        }
        for station in &self.base_stations {
            station.validate()?;
            if !seen.insert(station.mmsi) {
                return Err(Error::Config(format!("duplicate MMSI {}", station.mmsi)));
            }
        }
        for aton in &self.aids_to_navigation {
            aton.validate()?;
            if !seen.insert(aton.mmsi) {
                return Err(Error::Config(format!("duplicate MMSI {}", aton.mmsi)));
            }
        }

        for output in &self.outputs {
            output.validate()?;
        }
        self.trace.validate()?;

        Ok(())
    }
}

/// Simulation clock and determinism settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total duration in simulated seconds (None = run until interrupted)
    #[serde(default)]
    pub duration: Option<f64>,
    /// Simulated seconds per wall-clock second
    #[serde(default = "default_time_factor")]
    pub time_factor: f64,
    /// Tick interval in simulated milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pace ticks against the wall clock
    #[serde(default = "default_true")]
    pub real_time: bool,
    /// Seed for the movement noise generator (None = entropy)
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// UTC start of the simulated timeline (None = now)
    #[serde(default)]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: None,
            time_factor: 1.0,
            tick_interval_ms: 1000,
            real_time: true,
            random_seed: None,
            start_time: None,
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be positive".into()));
        }
        if self.time_factor <= 0.0 {
            return Err(Error::Config(format!(
                "time_factor must be positive, got {}",
                self.time_factor
            )));
        }
        if let Some(duration) = self.duration {
            if duration <= 0.0 {
                return Err(Error::Config(format!(
                    "duration must be positive, got {duration}"
                )));
            }
        }
        Ok(())
    }

    /// Converts to the clock's configuration.
    pub fn time_config(&self) -> SimulationTimeConfig {
        SimulationTimeConfig {
            tick_duration_ms: self.tick_interval_ms,
            duration_seconds: self.duration,
            time_factor: self.time_factor,
            real_time: self.real_time,
        }
    }
}

/// Transceiver class of a simulated vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VesselClass {
    /// Class A transceiver (SOLAS vessels)
    #[default]
    A,
    /// Class B transceiver (smaller craft)
    B,
}

/// Geographic coordinate pair as written in scenario files.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl PositionConfig {
    /// Converts to a validated [`Position`].
    pub fn to_position(&self) -> Result<Position, Error> {
        Position::new(self.latitude, self.longitude)
    }
}

/// Hull dimensions relative to the position reference point, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselDimensions {
    /// Distance to the bow
    #[serde(default)]
    pub to_bow: u16,
    /// Distance to the stern
    #[serde(default)]
    pub to_stern: u16,
    /// Distance to the port side
    #[serde(default)]
    pub to_port: u8,
    /// Distance to the starboard side
    #[serde(default)]
    pub to_starboard: u8,
}

impl VesselDimensions {
    fn validate(&self) -> Result<(), Error> {
        if self.to_bow > 511 || self.to_stern > 511 {
            return Err(Error::Config(
                "bow/stern dimensions must be at most 511 m".into(),
            ));
        }
        if self.to_port > 63 || self.to_starboard > 63 {
            return Err(Error::Config(
                "port/starboard dimensions must be at most 63 m".into(),
            ));
        }
        Ok(())
    }
}

/// One simulated vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselConfig {
    /// Maritime Mobile Service Identity
    pub mmsi: u32,
    /// Vessel name (up to 20 characters on the wire)
    #[serde(default)]
    pub name: String,
    /// Radio call sign (up to 7 characters)
    #[serde(default)]
    pub call_sign: String,
    /// Transceiver class
    #[serde(default)]
    pub vessel_class: VesselClass,
    /// Ship and cargo type code (0-99)
    #[serde(default)]
    pub ship_type: u8,
    /// Hull dimensions
    #[serde(default)]
    pub dimensions: VesselDimensions,
    /// Maximum present static draught in meters
    #[serde(default)]
    pub draught: f64,
    /// Voyage destination (up to 20 characters)
    #[serde(default)]
    pub destination: String,
    /// NMEA talker identifier for GPS sentences
    #[serde(default = "default_talker")]
    pub talker_id: String,
    /// Starting position
    pub initial_position: PositionConfig,
    /// Starting speed over ground in knots
    #[serde(default)]
    pub initial_speed: f64,
    /// Starting heading in degrees true
    #[serde(default)]
    pub initial_heading: f64,
    /// Movement noise model
    #[serde(default)]
    pub movement: MovementConfig,
    /// Report scheduling
    #[serde(default)]
    pub reports: ReportConfig,
}

fn default_talker() -> String {
    "GP".to_string()
}

impl VesselConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.mmsi == 0 || self.mmsi > 999_999_999 {
            return Err(Error::Config(format!(
                "MMSI must be a 1-9 digit identifier, got {}",
                self.mmsi
            )));
        }
        self.initial_position.to_position()?;
        if self.initial_speed < 0.0 {
            return Err(Error::Config(format!(
                "initial_speed must be non-negative, got {}",
                self.initial_speed
            )));
        }
        if self.ship_type > 99 {
            return Err(Error::Config(format!(
                "ship_type must be 0-99, got {}",
                self.ship_type
            )));
        }
        if self.draught < 0.0 || self.draught > 25.5 {
            return Err(Error::Config(format!(
                "draught must be 0-25.5 m, got {}",
                self.draught
            )));
        }
        self.dimensions.validate()?;
        self.movement.validate()?;
        self.reports.validate()?;
        Ok(())
    }
}

/// Shore-side base station broadcasting UTC reference reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStationConfig {
    /// Station MMSI (00MIDxxxx series)
    pub mmsi: u32,
    /// Fixed station position
    pub position: PositionConfig,
    /// Report interval in simulated seconds
    #[serde(default = "BaseStationConfig::default_interval")]
    pub report_interval: f64,
}

impl BaseStationConfig {
    fn default_interval() -> f64 {
        10.0
    }

    fn validate(&self) -> Result<(), Error> {
        if self.mmsi == 0 || self.mmsi > 999_999_999 {
            return Err(Error::Config(format!("invalid base station MMSI {}", self.mmsi)));
        }
        self.position.to_position()?;
        if self.report_interval <= 0.0 {
            return Err(Error::Config("report_interval must be positive".into()));
        }
        Ok(())
    }
}

/// An aid to navigation (buoy, beacon, light).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AidToNavigationConfig {
    /// AtoN MMSI (99MIDxxxx series)
    pub mmsi: u32,
    /// Aid name (up to 20 characters)
    #[serde(default)]
    pub name: String,
    /// Aid type code (0-31)
    #[serde(default)]
    pub aid_type: u8,
    /// Charted position
    pub position: PositionConfig,
    /// Virtual aid (no physical structure)
    #[serde(default)]
    pub virtual_aid: bool,
    /// Report interval in simulated seconds
    #[serde(default = "AidToNavigationConfig::default_interval")]
    pub report_interval: f64,
}

impl AidToNavigationConfig {
    fn default_interval() -> f64 {
        180.0
    }

    fn validate(&self) -> Result<(), Error> {
        if self.mmsi == 0 || self.mmsi > 999_999_999 {
            return Err(Error::Config(format!("invalid AtoN MMSI {}", self.mmsi)));
        }
        if self.aid_type > 31 {
            return Err(Error::Config(format!(
                "aid_type must be 0-31, got {}",
                self.aid_type
            )));
        }
        self.position.to_position()?;
        if self.report_interval <= 0.0 {
            return Err(Error::Config("report_interval must be positive".into()));
        }
        Ok(())
    }
}

/// Gaussian noise applied to vessel kinematics each tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Speed standard deviation in knots
    pub speed_variation: f64,
    /// Course standard deviation in degrees
    pub course_variation: f64,
    /// Position noise standard deviation in degrees
    pub position_noise: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed_variation: 0.5,
            course_variation: 2.0,
            position_noise: 0.00001,
        }
    }
}

impl MovementConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.speed_variation < 0.0 || self.course_variation < 0.0 || self.position_noise < 0.0 {
            return Err(Error::Config("movement variations must be non-negative".into()));
        }
        Ok(())
    }
}

/// Per-vessel report intervals in simulated seconds.
///
/// `position` covers the AIS position report (Type 1 or Type 18); left
/// unset it follows the class default of 10 s for Class A and 30 s for
/// Class B. `static_voyage` covers Type 5 (Class A only).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportConfig {
    /// GGA fix sentence interval
    pub gga: f64,
    /// RMC recommended-minimum sentence interval
    pub rmc: f64,
    /// VTG course-and-speed sentence interval
    pub vtg: f64,
    /// AIS position report interval (None = class default)
    #[serde(default)]
    pub position: Option<f64>,
    /// AIS static and voyage report interval
    pub static_voyage: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            gga: 1.0,
            rmc: 1.0,
            vtg: 1.0,
            position: None,
            static_voyage: 360.0,
        }
    }
}

impl ReportConfig {
    /// AIS position report interval for the given class.
    pub fn position_interval(&self, class: VesselClass) -> f64 {
        self.position.unwrap_or(match class {
            VesselClass::A => 10.0,
            VesselClass::B => 30.0,
        })
    }

    fn validate(&self) -> Result<(), Error> {
        let intervals = [self.gga, self.rmc, self.vtg, self.static_voyage];
        if intervals.iter().any(|i| *i <= 0.0) || self.position.is_some_and(|i| i <= 0.0) {
            return Err(Error::Config("report intervals must be positive".into()));
        }
        Ok(())
    }
}

/// One output sink, tagged by `type` in the YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    /// Append sentences to a file
    File(FileOutputConfig),
    /// Serve sentences to connected TCP clients
    Tcp(TcpOutputConfig),
    /// Send sentences as UDP datagrams
    Udp(UdpOutputConfig),
    /// Write sentences to a serial port
    Serial(SerialOutputConfig),
}

impl OutputConfig {
    /// Whether this sink is enabled.
    pub fn enabled(&self) -> bool {
        match self {
            OutputConfig::File(c) => c.enabled,
            OutputConfig::Tcp(c) => c.enabled,
            OutputConfig::Udp(c) => c.enabled,
            OutputConfig::Serial(c) => c.enabled,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        match self {
            OutputConfig::File(c) => {
                if c.path.is_empty() {
                    return Err(Error::Config("file output requires a path".into()));
                }
                if c.rotation_size_mb.is_some_and(|mb| mb <= 0.0) {
                    return Err(Error::Config("rotation_size_mb must be positive".into()));
                }
            }
            OutputConfig::Tcp(c) => {
                if c.port == 0 {
                    return Err(Error::Config("tcp output requires a non-zero port".into()));
                }
                if c.max_clients == 0 {
                    return Err(Error::Config("tcp max_clients must be positive".into()));
                }
            }
            OutputConfig::Udp(c) => {
                if c.port == 0 {
                    return Err(Error::Config("udp output requires a non-zero port".into()));
                }
            }
            OutputConfig::Serial(c) => {
                if c.port.is_empty() {
                    return Err(Error::Config("serial output requires a port name".into()));
                }
                if c.baud_rate == 0 {
                    return Err(Error::Config("serial baud_rate must be positive".into()));
                }
                if c.max_reconnect_attempts < -1 {
                    return Err(Error::Config(
                        "max_reconnect_attempts must be -1, 0, or positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// File sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutputConfig {
    /// Output file path
    pub path: String,
    /// Append instead of truncating
    #[serde(default = "default_true")]
    pub append: bool,
    /// Flush after every sentence
    #[serde(default = "default_true")]
    pub auto_flush: bool,
    /// Rotate once the file exceeds this many MiB (None = never rotate)
    #[serde(default)]
    pub rotation_size_mb: Option<f64>,
    /// Rotated backups kept as `.1` (newest) through `.max_files`
    #[serde(default = "FileOutputConfig::default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl FileOutputConfig {
    fn default_max_files() -> usize {
        10
    }
}

/// TCP server sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpOutputConfig {
    /// Bind address
    #[serde(default = "TcpOutputConfig::default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "TcpOutputConfig::default_port")]
    pub port: u16,
    /// Maximum simultaneous clients
    #[serde(default = "TcpOutputConfig::default_max_clients")]
    pub max_clients: usize,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl TcpOutputConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        10110
    }
    fn default_max_clients() -> usize {
        10
    }
}

/// UDP datagram sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdpOutputConfig {
    /// Destination address
    #[serde(default = "UdpOutputConfig::default_host")]
    pub host: String,
    /// Destination port
    #[serde(default = "UdpOutputConfig::default_port")]
    pub port: u16,
    /// Enable the SO_BROADCAST socket option
    #[serde(default = "default_true")]
    pub broadcast: bool,
    /// Multicast group to join instead of unicast/broadcast
    #[serde(default)]
    pub multicast_group: Option<String>,
    /// Multicast TTL
    #[serde(default = "UdpOutputConfig::default_multicast_ttl")]
    pub multicast_ttl: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl UdpOutputConfig {
    fn default_host() -> String {
        "255.255.255.255".to_string()
    }
    fn default_port() -> u16 {
        10111
    }
    fn default_multicast_ttl() -> u32 {
        1
    }
}

/// Serial port sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialOutputConfig {
    /// Serial device path
    #[serde(default = "SerialOutputConfig::default_port")]
    pub port: String,
    /// Baud rate
    #[serde(default = "SerialOutputConfig::default_baud_rate")]
    pub baud_rate: u32,
    /// Minimum interval between writes in seconds
    #[serde(default = "SerialOutputConfig::default_send_interval")]
    pub send_interval: f64,
    /// Delay before reconnecting in seconds
    #[serde(default = "SerialOutputConfig::default_reconnect_delay")]
    pub reconnect_delay: f64,
    /// Reconnect attempts: -1 = infinite, 0 = never connect
    #[serde(default = "SerialOutputConfig::default_max_reconnect_attempts")]
    pub max_reconnect_attempts: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SerialOutputConfig {
    fn default_port() -> String {
        "/dev/ttyS0".to_string()
    }
    fn default_baud_rate() -> u32 {
        9600
    }
    fn default_send_interval() -> f64 {
        0.1
    }
    fn default_reconnect_delay() -> f64 {
        5.0
    }
    fn default_max_reconnect_attempts() -> i32 {
        5
    }
}

/// Trace recorder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Record a trace file
    #[serde(default)]
    pub enabled: bool,
    /// JSON Lines output path
    #[serde(default = "TraceConfig::default_path")]
    pub path: String,
    /// Bounded queue capacity between engine and writer
    #[serde(default = "TraceConfig::default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: Self::default_path(),
            buffer_size: Self::default_buffer_size(),
        }
    }
}

impl TraceConfig {
    fn default_path() -> String {
        "marisim_trace.jsonl".to_string()
    }
    fn default_buffer_size() -> usize {
        10_000
    }

    fn validate(&self) -> Result<(), Error> {
        if self.enabled && self.buffer_size == 0 {
            return Err(Error::Config("trace buffer_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SCENARIO: &str = r#"
simulation:
  duration: 600
  time_factor: 2.0
  random_seed: 42
vessels:
  - mmsi: 367001234
    name: "PACIFIC TRADER"
    call_sign: "WDA1234"
    vessel_class: A
    ship_type: 70
    draught: 8.5
    destination: "OAKLAND"
    dimensions:
      to_bow: 120
      to_stern: 30
      to_port: 10
      to_starboard: 12
    initial_position:
      latitude: 37.7749
      longitude: -122.4194
    initial_speed: 12.5
    initial_heading: 90.0
    movement:
      speed_variation: 0.3
      course_variation: 1.5
      position_noise: 0.00001
  - mmsi: 367005678
    name: "BAY RUNNER"
    vessel_class: B
    initial_position:
      latitude: 37.8
      longitude: -122.5
base_stations:
  - mmsi: 3669999
    position:
      latitude: 37.81
      longitude: -122.41
aids_to_navigation:
  - mmsi: 993672085
    name: "HARBOR LIGHT"
    aid_type: 1
    position:
      latitude: 37.82
      longitude: -122.42
outputs:
  - type: tcp
    port: 10110
  - type: udp
    host: "255.255.255.255"
    port: 10111
  - type: serial
    port: "/dev/ttyUSB0"
    baud_rate: 38400
    max_reconnect_attempts: -1
  - type: file
    path: "out.nmea"
trace:
  enabled: true
  path: "trace.jsonl"
"#;

    #[test]
    fn test_full_scenario_parses() {
        let config = ScenarioConfig::from_yaml(FULL_SCENARIO).unwrap();

        assert_eq!(config.simulation.duration, Some(600.0));
        assert_eq!(config.simulation.time_factor, 2.0);
        assert_eq!(config.simulation.random_seed, Some(42));
        assert_eq!(config.vessels.len(), 2);
        assert_eq!(config.vessels[0].mmsi, 367001234);
        assert_eq!(config.vessels[0].vessel_class, VesselClass::A);
        assert_eq!(config.vessels[1].vessel_class, VesselClass::B);
        assert_eq!(config.base_stations.len(), 1);
        assert_eq!(config.aids_to_navigation.len(), 1);
        assert_eq!(config.outputs.len(), 4);
        assert!(config.trace.enabled);
    }

    #[test]
    fn test_output_type_tags() {
        let config = ScenarioConfig::from_yaml(FULL_SCENARIO).unwrap();

        assert!(matches!(config.outputs[0], OutputConfig::Tcp(_)));
        assert!(matches!(config.outputs[1], OutputConfig::Udp(_)));
        match &config.outputs[2] {
            OutputConfig::Serial(serial) => {
                assert_eq!(serial.baud_rate, 38400);
                assert_eq!(serial.max_reconnect_attempts, -1);
                assert_eq!(serial.send_interval, 0.1);
            }
            other => panic!("expected serial output, got {other:?}"),
        }
        assert!(matches!(config.outputs[3], OutputConfig::File(_)));
    }

    #[test]
    fn test_report_defaults_by_class() {
        let reports = ReportConfig::default();
        assert_eq!(reports.gga, 1.0);
        assert_eq!(reports.position_interval(VesselClass::A), 10.0);
        assert_eq!(reports.position_interval(VesselClass::B), 30.0);

        let overridden = ReportConfig {
            position: Some(5.0),
            ..Default::default()
        };
        assert_eq!(overridden.position_interval(VesselClass::B), 5.0);
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let err = ScenarioConfig::from_yaml("outputs: []").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_duplicate_mmsi_rejected() {
        let yaml = r#"
vessels:
  - mmsi: 367001234
    initial_position: { latitude: 0.0, longitude: 0.0 }
  - mmsi: 367001234
    initial_position: { latitude: 1.0, longitude: 1.0 }
"#;
        let err = ScenarioConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate MMSI"));
    }

    #[test]
    fn test_bad_position_rejected() {
        let yaml = r#"
vessels:
  - mmsi: 367001234
    initial_position: { latitude: 95.0, longitude: 0.0 }
"#;
        assert!(ScenarioConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ScenarioConfig::from_yaml("vessels: [").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_time_config_conversion() {
        let sim = SimulationConfig {
            duration: Some(60.0),
            tick_interval_ms: 500,
            ..Default::default()
        };
        let time = sim.time_config();
        assert_eq!(time.tick_duration_ms, 500);
        assert_eq!(time.total_ticks(), Some(120));
    }
}
