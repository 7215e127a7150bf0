//! Structured event tracing to a JSONL file.
//!
//! The recorder never blocks the simulation loop: events go through a
//! bounded channel with `try_send`, and a writer task drains them to disk.
//! When the channel is full the event is dropped and counted. The analyzer
//! reads a trace file back for post-run inspection.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use marisim_common::config::TraceConfig;
use marisim_common::Error;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    MessageGenerated,
    MessageTransmitted,
    MessageScheduled,
    VesselUpdated,
    SentenceValidated,
    Error,
}

impl TraceEventKind {
    /// The serialized name, used as a grouping key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceEventKind::MessageGenerated => "message_generated",
            TraceEventKind::MessageTransmitted => "message_transmitted",
            TraceEventKind::MessageScheduled => "message_scheduled",
            TraceEventKind::VesselUpdated => "vessel_updated",
            TraceEventKind::SentenceValidated => "sentence_validated",
            TraceEventKind::Error => "error",
        }
    }
}

/// One line of the trace file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Simulated milliseconds since simulation start
    pub timestamp_ms: u64,
    pub event: TraceEventKind,
    /// Source entity
    pub mmsi: u32,
    /// AIS message type, for AIS events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<u8>,
    /// Complete sentences produced or transmitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<String>>,
    /// Free-form payload (position, speed, intervals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceEvent {
    /// Creates a bare event with no optional payload.
    pub fn new(timestamp_ms: u64, event: TraceEventKind, mmsi: u32) -> Self {
        Self {
            timestamp_ms,
            event,
            mmsi,
            message_type: None,
            sentences: None,
            detail: None,
            error: None,
        }
    }

    pub fn with_message_type(mut self, message_type: u8) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn with_sentences(mut self, sentences: Vec<String>) -> Self {
        self.sentences = Some(sentences);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Non-blocking JSONL trace writer.
pub struct TraceRecorder {
    tx: mpsc::Sender<TraceEvent>,
    dropped: Arc<AtomicU64>,
    writer_task: JoinHandle<u64>,
}

impl TraceRecorder {
    /// Opens the trace file and starts the writer task.
    pub async fn start(config: &TraceConfig) -> Result<Self, Error> {
        let mut file = tokio::fs::File::create(&config.path).await?;
        let (tx, mut rx) = mpsc::channel::<TraceEvent>(config.buffer_size.max(1));

        let path = config.path.clone();
        let writer_task = tokio::spawn(async move {
            let mut written: u64 = 0;
            while let Some(event) = rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(mut line) => {
                        line.push('\n');
                        if let Err(e) = file.write_all(line.as_bytes()).await {
                            warn!(path = %path, error = %e, "trace write failed");
                            break;
                        }
                        written += 1;
                    }
                    Err(e) => {
                        warn!(error = %e, "unserializable trace event skipped");
                    }
                }
            }
            if let Err(e) = file.flush().await {
                warn!(path = %path, error = %e, "trace flush failed");
            }
            written
        });

        Ok(Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            writer_task,
        })
    }

    /// Queues an event. Drops it (and counts the drop) when the buffer
    /// is full.
    pub fn record(&self, event: TraceEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Events dropped so far because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Closes the channel, drains the queue, and returns the number of
    /// events written.
    pub async fn stop(self) -> u64 {
        let Self {
            tx, writer_task, ..
        } = self;
        drop(tx);
        writer_task.await.unwrap_or(0)
    }
}

/// Aggregate view of a trace file.
#[derive(Debug, Default)]
pub struct TraceSummary {
    pub total_events: usize,
    pub counts_by_kind: BTreeMap<&'static str, usize>,
    pub counts_by_message_type: BTreeMap<u8, usize>,
    pub error_count: usize,
}

/// Loads a finished trace file for inspection.
pub struct TraceAnalyzer {
    events: Vec<TraceEvent>,
}

impl TraceAnalyzer {
    /// Parses a JSONL trace file. Blank lines are ignored; a malformed
    /// line is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut events = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: TraceEvent = serde_json::from_str(line)
                .map_err(|e| Error::Format(format!("trace line {}: {e}", index + 1)))?;
            events.push(event);
        }
        Ok(Self { events })
    }

    /// All events in file order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Events for one entity, in file order.
    pub fn vessel_timeline(&self, mmsi: u32) -> Vec<&TraceEvent> {
        self.events.iter().filter(|e| e.mmsi == mmsi).collect()
    }

    /// Counts by kind and AIS message type, plus the error total.
    pub fn summary(&self) -> TraceSummary {
        let mut summary = TraceSummary {
            total_events: self.events.len(),
            ..TraceSummary::default()
        };
        for event in &self.events {
            *summary.counts_by_kind.entry(event.event.as_str()).or_insert(0) += 1;
            if let Some(message_type) = event.message_type {
                *summary
                    .counts_by_message_type
                    .entry(message_type)
                    .or_insert(0) += 1;
            }
            if event.event == TraceEventKind::Error {
                summary.error_count += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_config(path: &std::path::Path) -> TraceConfig {
        TraceConfig {
            enabled: true,
            path: path.to_string_lossy().into_owned(),
            buffer_size: 64,
        }
    }

    #[tokio::test]
    async fn test_record_stop_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let recorder = TraceRecorder::start(&trace_config(&path)).await.unwrap();

        recorder.record(
            TraceEvent::new(0, TraceEventKind::MessageGenerated, 367001234)
                .with_message_type(1)
                .with_sentences(vec!["!AIVDM,1,1,,A,payload,0*00".to_string()]),
        );
        recorder.record(TraceEvent::new(
            1000,
            TraceEventKind::VesselUpdated,
            367001234,
        ));
        recorder.record(
            TraceEvent::new(2000, TraceEventKind::Error, 367005678)
                .with_error("draught out of range"),
        );

        assert_eq!(recorder.dropped(), 0);
        assert_eq!(recorder.stop().await, 3);

        let analyzer = TraceAnalyzer::load(&path).unwrap();
        let summary = analyzer.summary();
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.counts_by_kind["message_generated"], 1);
        assert_eq!(summary.counts_by_message_type[&1], 1);
        assert_eq!(summary.error_count, 1);

        let timeline = analyzer.vessel_timeline(367001234);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].timestamp_ms, 0);
        assert_eq!(timeline[1].timestamp_ms, 1000);
    }

    #[tokio::test]
    async fn test_malformed_line_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        std::fs::write(&path, "{\"not\": \"an event\"}\n").unwrap();
        assert!(TraceAnalyzer::load(&path).is_err());
    }

    #[tokio::test]
    async fn test_blank_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let recorder = TraceRecorder::start(&trace_config(&path)).await.unwrap();
        recorder.record(TraceEvent::new(0, TraceEventKind::MessageScheduled, 1));
        recorder.stop().await;

        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push('\n');
        std::fs::write(&path, contents).unwrap();

        let analyzer = TraceAnalyzer::load(&path).unwrap();
        assert_eq!(analyzer.events().len(), 1);
    }
}
