//! Simulation engine: drives the clock, moves the fleet, and turns due
//! schedule entries into NMEA and AIS sentences on every output sink.
//!
//! A failure while generating one entity's report is counted and traced
//! but never stops the tick; the rest of the fleet reports normally.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use marisim_ais::{
    AidToNavigationData, AidToNavigationReport, AisMessage, AivdmEncoder, BaseStationData,
    BaseStationReport, Channel, PositionReport, StandardClassBReport, StaticAndVoyage,
    VesselState,
};
use marisim_common::config::{ScenarioConfig, TraceConfig, VesselClass, VesselConfig};
use marisim_common::{
    Error, MovementConfig, NmeaDate, NmeaTime, SimulationClock,
};
use marisim_nmea::{
    validate_checksum, DataStatus, GgaSentence, GpsFixQuality, ModeIndicator, RmcSentence,
    TalkerId, VtgSentence,
};
use tracing::{debug, error, info, warn};

use crate::movement::MovementModel;
use crate::outputs::{build_output, OutputHandler, OutputStatus};
use crate::scheduler::{ReportKind, Scheduler};
use crate::trace::{TraceEvent, TraceEventKind, TraceRecorder};

/// One vessel with its per-vessel simulation parameters.
struct SimVessel {
    state: VesselState,
    talker: TalkerId,
    movement: MovementConfig,
}

/// Run counters and per-sink health, reported after a run.
#[derive(Debug, Default)]
pub struct SimulationStatistics {
    /// Ticks processed
    pub ticks: u64,
    /// Wall-clock runtime
    pub elapsed: Duration,
    /// GPS text sentences produced
    pub gps_sentences: u64,
    /// AIS sentences produced (fragments counted individually)
    pub ais_sentences: u64,
    /// Generation and delivery failures
    pub errors: u64,
    /// Trace events dropped because the buffer was full
    pub trace_events_dropped: u64,
    /// Per-sink status snapshots
    pub outputs: Vec<(String, OutputStatus)>,
}

impl SimulationStatistics {
    /// All sentences produced, GPS and AIS combined.
    pub fn total_sentences(&self) -> u64 {
        self.gps_sentences + self.ais_sentences
    }
}

/// The simulation driver.
pub struct SimulationEngine {
    clock: SimulationClock,
    start_time: DateTime<Utc>,
    scheduler: Scheduler,
    movement: MovementModel,
    encoder: AivdmEncoder,
    vessels: BTreeMap<u32, SimVessel>,
    base_stations: BTreeMap<u32, BaseStationData>,
    aids: BTreeMap<u32, AidToNavigationData>,
    outputs: Vec<Box<dyn OutputHandler>>,
    trace_config: TraceConfig,
    trace: Option<TraceRecorder>,
    trace_dropped: u64,
    gps_sent: u64,
    ais_sent: u64,
    errors: u64,
}

impl SimulationEngine {
    /// Builds an engine from a validated scenario.
    pub fn from_scenario(config: &ScenarioConfig) -> Result<Self, Error> {
        config.validate()?;

        let clock = SimulationClock::new(config.simulation.time_config());
        let start_time = config.simulation.start_time.unwrap_or_else(Utc::now);
        let movement = match config.simulation.random_seed {
            Some(seed) => MovementModel::with_seed(seed),
            None => MovementModel::new(),
        };

        let mut scheduler = Scheduler::new();
        let mut vessels = BTreeMap::new();
        for vessel_config in &config.vessels {
            let vessel = build_vessel(vessel_config)?;
            let mmsi = vessel.state.mmsi();
            let reports = &vessel_config.reports;

            scheduler.schedule(mmsi, ReportKind::Gga, reports.gga, 0);
            scheduler.schedule(mmsi, ReportKind::Rmc, reports.rmc, 0);
            scheduler.schedule(mmsi, ReportKind::Vtg, reports.vtg, 0);
            scheduler.schedule(
                mmsi,
                ReportKind::AisPosition,
                reports.position_interval(vessel_config.vessel_class),
                0,
            );
            // Class B static data goes out as Type 24, which this simulator
            // does not generate; only Class A vessels send Type 5
            if vessel_config.vessel_class == VesselClass::A {
                scheduler.schedule(mmsi, ReportKind::AisStaticVoyage, reports.static_voyage, 0);
            }
            vessels.insert(mmsi, vessel);
        }

        let mut base_stations = BTreeMap::new();
        for station_config in &config.base_stations {
            let position = station_config.position.to_position()?;
            let station = BaseStationData::new(station_config.mmsi, position, start_time);
            scheduler.schedule(
                station_config.mmsi,
                ReportKind::BaseStation,
                station_config.report_interval,
                0,
            );
            base_stations.insert(station_config.mmsi, station);
        }

        let mut aids = BTreeMap::new();
        for aid_config in &config.aids_to_navigation {
            let position = aid_config.position.to_position()?;
            let mut aid = AidToNavigationData::new(
                aid_config.mmsi,
                aid_config.name.clone(),
                aid_config.aid_type,
                position,
            );
            aid.virtual_aid = aid_config.virtual_aid;
            scheduler.schedule(
                aid_config.mmsi,
                ReportKind::AidToNavigation,
                aid_config.report_interval,
                0,
            );
            aids.insert(aid_config.mmsi, aid);
        }

        let outputs = config
            .outputs
            .iter()
            .filter(|o| o.enabled())
            .map(build_output)
            .collect();

        Ok(Self {
            clock,
            start_time,
            scheduler,
            movement,
            encoder: AivdmEncoder::new(),
            vessels,
            base_stations,
            aids,
            outputs,
            trace_config: config.trace.clone(),
            trace: None,
            trace_dropped: 0,
            gps_sent: 0,
            ais_sent: 0,
            errors: 0,
        })
    }

    /// Starts every enabled sink and the trace recorder.
    ///
    /// A sink that fails to start is dropped from the run and counted as
    /// an error; the simulation proceeds with the remaining sinks.
    pub async fn start(&mut self) -> Result<(), Error> {
        let mut started = Vec::with_capacity(self.outputs.len());
        for mut output in self.outputs.drain(..) {
            match output.start().await {
                Ok(()) => started.push(output),
                Err(e) => {
                    error!(output = output.name(), error = %e, "output failed to start");
                    self.errors += 1;
                }
            }
        }
        self.outputs = started;

        if self.trace_config.enabled {
            self.trace = Some(TraceRecorder::start(&self.trace_config).await?);
        }

        // Record the initial arming of every schedule entry
        if let Some(trace) = &self.trace {
            for (mmsi, kind, next_due_ms) in self.scheduler.entries() {
                trace.record(
                    TraceEvent::new(next_due_ms, TraceEventKind::MessageScheduled, mmsi)
                        .with_detail(serde_json::json!({
                            "report": kind.as_str(),
                            "next_due_ms": next_due_ms,
                        })),
                );
            }
        }

        info!(
            vessels = self.vessels.len(),
            base_stations = self.base_stations.len(),
            aids_to_navigation = self.aids.len(),
            outputs = self.outputs.len(),
            "simulation started"
        );
        Ok(())
    }

    /// Runs the tick loop until the configured duration elapses.
    ///
    /// Cancellation-safe: select against a shutdown signal and call
    /// [`SimulationEngine::shutdown`] afterwards.
    pub async fn run(&mut self) {
        while !self.clock.is_complete() {
            self.process_tick().await;
            let delay = self.clock.delay_until_next_tick();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.clock.tick();
        }
    }

    /// Stops every sink and the trace recorder, joining their workers.
    pub async fn shutdown(&mut self) {
        for output in &mut self.outputs {
            output.stop().await;
        }
        if let Some(trace) = self.trace.take() {
            self.trace_dropped = trace.dropped();
            let written = trace.stop().await;
            debug!(written, dropped = self.trace_dropped, "trace recorder stopped");
        }
        info!(
            sentences = self.gps_sent + self.ais_sent,
            errors = self.errors,
            "simulation stopped"
        );
    }

    /// Counters and sink health for the run so far.
    pub fn statistics(&self) -> SimulationStatistics {
        SimulationStatistics {
            ticks: self.clock.current_tick(),
            elapsed: self.clock.elapsed_real_time(),
            gps_sentences: self.gps_sent,
            ais_sentences: self.ais_sent,
            errors: self.errors,
            trace_events_dropped: self
                .trace
                .as_ref()
                .map(|t| t.dropped())
                .unwrap_or(self.trace_dropped),
            outputs: self
                .outputs
                .iter()
                .map(|o| (o.name().to_string(), o.status()))
                .collect(),
        }
    }

    async fn process_tick(&mut self) {
        let now_ms = self.clock.current_time_ms();

        // Movement happens between reports, so nothing moves before the
        // initial reports at t=0
        if self.clock.current_tick() > 0 {
            let elapsed = self.clock.tick_seconds();
            for sim in self.vessels.values_mut() {
                self.movement.update(&mut sim.state, &sim.movement, elapsed);
                if let Some(trace) = &self.trace {
                    trace.record(
                        TraceEvent::new(now_ms, TraceEventKind::VesselUpdated, sim.state.mmsi())
                            .with_detail(serde_json::json!({
                                "latitude": sim.state.navigation.position.latitude(),
                                "longitude": sim.state.navigation.position.longitude(),
                                "sog_knots": sim.state.navigation.sog_knots,
                                "cog": sim.state.navigation.cog,
                            })),
                    );
                }
            }
        }

        for (mmsi, kind) in self.scheduler.due(now_ms) {
            match self.generate_report(mmsi, kind, now_ms) {
                Ok((message_type, sentences)) => {
                    if kind.is_gps() {
                        self.gps_sent += sentences.len() as u64;
                    } else {
                        self.ais_sent += sentences.len() as u64;
                    }
                    if let Some(trace) = &self.trace {
                        let mut event =
                            TraceEvent::new(now_ms, TraceEventKind::MessageGenerated, mmsi)
                                .with_sentences(sentences.clone());
                        if let Some(message_type) = message_type {
                            event = event.with_message_type(message_type);
                        }
                        trace.record(event);

                        let all_valid = sentences.iter().all(|s| validate_checksum(s));
                        trace.record(
                            TraceEvent::new(now_ms, TraceEventKind::SentenceValidated, mmsi)
                                .with_detail(serde_json::json!({
                                    "sentences": sentences.len(),
                                    "valid": all_valid,
                                })),
                        );

                        // The firing in due() already re-armed this entry
                        if let Some(next_due_ms) = self.scheduler.next_due(mmsi, kind) {
                            trace.record(
                                TraceEvent::new(now_ms, TraceEventKind::MessageScheduled, mmsi)
                                    .with_detail(serde_json::json!({
                                        "report": kind.as_str(),
                                        "next_due_ms": next_due_ms,
                                    })),
                            );
                        }
                    }
                    for sentence in &sentences {
                        self.broadcast(sentence).await;
                    }
                    if !self.outputs.is_empty() {
                        if let Some(trace) = &self.trace {
                            trace.record(
                                TraceEvent::new(now_ms, TraceEventKind::MessageTransmitted, mmsi)
                                    .with_detail(serde_json::json!({
                                        "sentences": sentences.len(),
                                        "outputs": self.outputs.len(),
                                    })),
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(mmsi, ?kind, error = %e, "report generation failed");
                    self.errors += 1;
                    if let Some(trace) = &self.trace {
                        trace.record(
                            TraceEvent::new(now_ms, TraceEventKind::Error, mmsi)
                                .with_error(e.to_string()),
                        );
                    }
                }
            }
        }
    }

    async fn broadcast(&mut self, sentence: &str) {
        for output in &mut self.outputs {
            if !output.send(sentence).await {
                self.errors += 1;
            }
        }
    }

    fn generate_report(
        &mut self,
        mmsi: u32,
        kind: ReportKind,
        now_ms: u64,
    ) -> Result<(Option<u8>, Vec<String>), Error> {
        let sim_time = self.start_time + chrono::Duration::milliseconds(now_ms as i64);

        match kind {
            ReportKind::Gga | ReportKind::Rmc | ReportKind::Vtg => {
                let sim = self
                    .vessels
                    .get(&mmsi)
                    .ok_or_else(|| Error::Config(format!("unknown vessel MMSI {mmsi}")))?;
                let sentence = gps_sentence(sim, kind, &sim_time)?;
                Ok((None, vec![sentence]))
            }
            ReportKind::AisPosition => {
                let sim = self
                    .vessels
                    .get_mut(&mmsi)
                    .ok_or_else(|| Error::Config(format!("unknown vessel MMSI {mmsi}")))?;
                sim.state.navigation.timestamp_seconds = sim_time.second() as u8;
                let message = match sim.state.static_data.vessel_class {
                    VesselClass::A => {
                        AisMessage::PositionReport(PositionReport::from_vessel(&sim.state))
                    }
                    VesselClass::B => AisMessage::StandardClassBReport(
                        StandardClassBReport::from_vessel(&sim.state),
                    ),
                };
                let sentences = self.encoder.encode(&message, Channel::A);
                Ok((Some(message.message_type()), sentences))
            }
            ReportKind::AisStaticVoyage => {
                let sim = self
                    .vessels
                    .get(&mmsi)
                    .ok_or_else(|| Error::Config(format!("unknown vessel MMSI {mmsi}")))?;
                let message = AisMessage::StaticAndVoyage(StaticAndVoyage::from_vessel(&sim.state));
                let sentences = self.encoder.encode(&message, Channel::A);
                Ok((Some(message.message_type()), sentences))
            }
            ReportKind::BaseStation => {
                let station = self
                    .base_stations
                    .get_mut(&mmsi)
                    .ok_or_else(|| Error::Config(format!("unknown base station MMSI {mmsi}")))?;
                station.utc_time = sim_time;
                let message = AisMessage::BaseStationReport(BaseStationReport::from_station(station));
                let sentences = self.encoder.encode(&message, Channel::A);
                Ok((Some(message.message_type()), sentences))
            }
            ReportKind::AidToNavigation => {
                let aid = self
                    .aids
                    .get(&mmsi)
                    .ok_or_else(|| Error::Config(format!("unknown AtoN MMSI {mmsi}")))?;
                let message =
                    AisMessage::AidToNavigationReport(AidToNavigationReport::from_aid(aid));
                let sentences = self.encoder.encode(&message, Channel::A);
                Ok((Some(message.message_type()), sentences))
            }
        }
    }
}

fn build_vessel(config: &VesselConfig) -> Result<SimVessel, Error> {
    let position = config.initial_position.to_position()?;
    let talker = TalkerId::parse(&config.talker_id)?;

    let mut state = VesselState::new(config.mmsi, position);
    state.static_data.name = config.name.clone();
    state.static_data.call_sign = config.call_sign.clone();
    state.static_data.ship_type = config.ship_type;
    state.static_data.vessel_class = config.vessel_class;
    state.static_data.dimensions = config.dimensions;
    state.navigation.sog_knots = config.initial_speed;
    state.navigation.cog = config.initial_heading.rem_euclid(360.0);
    state.navigation.heading = Some(state.navigation.cog as u16 % 360);
    state.voyage.destination = config.destination.clone();
    state.voyage.draught = config.draught;

    Ok(SimVessel {
        state,
        talker,
        movement: config.movement,
    })
}

fn gps_sentence(
    sim: &SimVessel,
    kind: ReportKind,
    sim_time: &DateTime<Utc>,
) -> Result<String, Error> {
    let nav = &sim.state.navigation;
    let time = NmeaTime::new(
        sim_time.hour() as u8,
        sim_time.minute() as u8,
        sim_time.second() as u8,
        0,
    )?;

    match kind {
        ReportKind::Gga => {
            let mut gga = GgaSentence::new(sim.talker);
            gga.time = Some(time);
            gga.position = Some(nav.position);
            gga.fix_quality = GpsFixQuality::Gps;
            gga.satellites = Some(8);
            gga.hdop = Some(1.2);
            gga.altitude = Some(0.0);
            gga.geoidal_height = Some(19.6);
            Ok(gga.to_sentence())
        }
        ReportKind::Rmc => {
            let mut rmc = RmcSentence::new(sim.talker);
            rmc.time = Some(time);
            rmc.status = DataStatus::Active;
            rmc.position = Some(nav.position);
            rmc.speed_knots = Some(nav.sog_knots);
            rmc.course = Some(nav.cog);
            rmc.date = Some(NmeaDate::new(
                sim_time.year().clamp(0, 9999) as u16,
                sim_time.month() as u8,
                sim_time.day() as u8,
            )?);
            rmc.mode = ModeIndicator::Autonomous;
            Ok(rmc.to_sentence())
        }
        ReportKind::Vtg => {
            let mut vtg = VtgSentence::new(sim.talker);
            vtg.course_true = Some(nav.cog);
            vtg.speed_knots = Some(nav.sog_knots);
            vtg.mode = ModeIndicator::Autonomous;
            Ok(vtg.to_sentence())
        }
        _ => Err(Error::Format(format!("{kind:?} is not a GPS sentence"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceAnalyzer;
    use marisim_ais::decode_sentences;

    fn scenario_yaml(output_path: &str, trace_path: &str) -> String {
        format!(
            r#"
simulation:
  duration: 5
  tick_interval_ms: 1000
  real_time: false
  random_seed: 7
  start_time: "2026-01-01T12:00:00Z"
vessels:
  - mmsi: 367001234
    name: PACIFIC TRADER
    call_sign: WDK2000
    ship_type: 70
    draught: 8.5
    destination: OAKLAND
    initial_position:
      latitude: 37.8
      longitude: -122.4
    initial_speed: 12.0
    initial_heading: 90.0
outputs:
  - type: file
    path: "{output_path}"
    append: false
trace:
  enabled: true
  path: "{trace_path}"
"#
        )
    }

    async fn run_scenario(yaml: &str) -> SimulationStatistics {
        let config = ScenarioConfig::from_yaml(yaml).unwrap();
        let mut engine = SimulationEngine::from_scenario(&config).unwrap();
        engine.start().await.unwrap();
        engine.run().await;
        let stats = engine.statistics();
        engine.shutdown().await;
        stats
    }

    #[tokio::test]
    async fn test_five_second_run_produces_expected_traffic() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out.nmea");
        let trace_path = dir.path().join("trace.jsonl");
        let yaml = scenario_yaml(
            &output_path.to_string_lossy(),
            &trace_path.to_string_lossy(),
        );

        let stats = run_scenario(&yaml).await;

        // 5 ticks of GGA+RMC+VTG, one Type 1 (single fragment), one
        // Type 5 (two fragments)
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.gps_sentences, 15);
        assert_eq!(stats.ais_sentences, 3);
        assert_eq!(stats.errors, 0);

        let contents = std::fs::read_to_string(&output_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 18);
        for line in &lines {
            assert!(validate_checksum(line), "bad checksum: {line}");
        }
        assert!(lines.iter().any(|l| l.starts_with("$GPGGA,120000")));
        assert!(lines.iter().any(|l| l.starts_with("$GPRMC,120001")));
        assert!(lines.iter().any(|l| l.starts_with("!AIVDM,1,1,,A,")));
        assert!(lines.iter().any(|l| l.starts_with("!AIVDM,2,1,")));

        let analyzer = TraceAnalyzer::load(&trace_path).unwrap();
        let summary = analyzer.summary();
        assert_eq!(summary.counts_by_kind["message_generated"], 17);
        assert_eq!(summary.counts_by_kind["message_transmitted"], 17);
        assert_eq!(summary.counts_by_kind["sentence_validated"], 17);
        // 5 schedule entries armed at start, re-armed after each firing
        assert_eq!(summary.counts_by_kind["message_scheduled"], 22);
        for event in analyzer.events() {
            if event.event == TraceEventKind::SentenceValidated {
                let detail = event.detail.as_ref().unwrap();
                assert_eq!(detail["valid"], serde_json::json!(true));
            }
        }
        assert_eq!(summary.counts_by_message_type[&1], 1);
        assert_eq!(summary.counts_by_message_type[&5], 1);
        assert_eq!(summary.error_count, 0);
    }

    #[tokio::test]
    async fn test_class_b_vessel_sends_type_18() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out.nmea");
        let yaml = format!(
            r#"
simulation:
  duration: 1
  tick_interval_ms: 1000
  real_time: false
vessels:
  - mmsi: 338123456
    name: DAY SAILOR
    vessel_class: B
    initial_position:
      latitude: 37.81
      longitude: -122.41
outputs:
  - type: file
    path: "{}"
    append: false
"#,
            output_path.to_string_lossy()
        );

        run_scenario(&yaml).await;

        let contents = std::fs::read_to_string(&output_path).unwrap();
        let aivdm: Vec<String> = contents
            .lines()
            .filter(|l| l.starts_with("!AIVDM"))
            .map(|l| format!("{l}\r\n"))
            .collect();
        assert_eq!(aivdm.len(), 1);

        let message = decode_sentences(&aivdm).unwrap();
        assert_eq!(message.message_type(), 18);
        assert_eq!(message.mmsi(), 338123456);
    }

    #[tokio::test]
    async fn test_base_station_and_aton_report() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out.nmea");
        let yaml = format!(
            r#"
simulation:
  duration: 1
  tick_interval_ms: 1000
  real_time: false
  start_time: "2026-01-01T00:00:00Z"
base_stations:
  - mmsi: 3669999
    position:
      latitude: 37.9
      longitude: -122.5
aids_to_navigation:
  - mmsi: 993672001
    name: ALCATRAZ LIGHT
    aid_type: 5
    position:
      latitude: 37.826
      longitude: -122.423
outputs:
  - type: file
    path: "{}"
    append: false
"#,
            output_path.to_string_lossy()
        );

        let stats = run_scenario(&yaml).await;
        assert_eq!(stats.gps_sentences, 0);
        // Type 4 and Type 21 both fit in a single fragment
        assert_eq!(stats.ais_sentences, 2);

        let contents = std::fs::read_to_string(&output_path).unwrap();
        let type4: Vec<String> = contents
            .lines()
            .filter(|l| l.contains(",A,4"))
            .map(|l| format!("{l}\r\n"))
            .collect();
        assert_eq!(type4.len(), 1);
        let message = decode_sentences(&type4).unwrap();
        assert_eq!(message.message_type(), 4);
        assert_eq!(message.mmsi(), 3669999);
    }

    #[tokio::test]
    async fn test_vessel_moves_between_reports() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out.nmea");
        let yaml = format!(
            r#"
simulation:
  duration: 3
  tick_interval_ms: 1000
  real_time: false
  random_seed: 1
vessels:
  - mmsi: 367001234
    initial_position:
      latitude: 37.8
      longitude: -122.4
    initial_speed: 20.0
    initial_heading: 90.0
    movement:
      speed_variation: 0.0
      course_variation: 0.0
      position_noise: 0.0
    reports:
      gga: 1.0
      rmc: 60.0
      vtg: 60.0
      static_voyage: 360.0
outputs:
  - type: file
    path: "{}"
    append: false
"#,
            output_path.to_string_lossy()
        );

        run_scenario(&yaml).await;

        let contents = std::fs::read_to_string(&output_path).unwrap();
        let positions: Vec<_> = contents
            .lines()
            .filter(|l| l.starts_with("$GPGGA"))
            .filter_map(|l| {
                let gga = GgaSentence::from_sentence(&format!("{l}\r\n")).ok()?;
                gga.position
            })
            .collect();
        assert_eq!(positions.len(), 3);
        // Heading east at 20 knots: longitude strictly increases
        assert!(positions[1].longitude() > positions[0].longitude());
        assert!(positions[2].longitude() > positions[1].longitude());
    }
}
