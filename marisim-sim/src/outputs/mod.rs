//! Output sinks: transport-agnostic handler contract and concrete
//! transports (file, TCP broadcast, UDP, reconnecting serial).
//!
//! Every sink implements [`OutputHandler`]: `start` acquires the resource,
//! `send` delivers one complete sentence returning success, `stop` is
//! idempotent and joins any background worker before returning, so no
//! sends happen after it completes.

mod file;
mod serial;
mod tcp;
mod udp;

pub use file::FileOutput;
pub use serial::SerialOutput;
pub use tcp::TcpOutput;
pub use udp::UdpOutput;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use marisim_common::config::OutputConfig;
use marisim_common::Error;

/// Snapshot of a sink's health and counters.
#[derive(Debug, Clone, Default)]
pub struct OutputStatus {
    /// Sink is started and its resource is usable
    pub running: bool,
    /// Sentences accepted for delivery
    pub sentences_sent: u64,
    /// Time since `start`, while running
    pub uptime: Option<Duration>,
    /// Time since the last successful send
    pub last_send_age: Option<Duration>,
    /// Active connections (TCP clients; 0 or 1 elsewhere)
    pub connections: usize,
}

/// Common contract for all output sinks.
#[async_trait]
pub trait OutputHandler: Send {
    /// Short name for logs and statistics.
    fn name(&self) -> &str;

    /// Acquires the sink's resource. Failure leaves the sink not running.
    async fn start(&mut self) -> Result<(), Error>;

    /// Releases the resource and joins background workers. Idempotent.
    async fn stop(&mut self);

    /// Delivers one complete sentence (terminator included).
    ///
    /// Returns true when the sink accepted the sentence. A failure degrades
    /// the sink, never the caller.
    async fn send(&mut self, sentence: &str) -> bool;

    /// Current status snapshot.
    fn status(&self) -> OutputStatus;
}

/// Builds a sink from its configuration.
pub fn build_output(config: &OutputConfig) -> Box<dyn OutputHandler> {
    match config {
        OutputConfig::File(c) => Box::new(FileOutput::new(c.clone())),
        OutputConfig::Tcp(c) => Box::new(TcpOutput::new(c.clone())),
        OutputConfig::Udp(c) => Box::new(UdpOutput::new(c.clone())),
        OutputConfig::Serial(c) => Box::new(SerialOutput::new(c.clone())),
    }
}

/// Bookkeeping shared by the concrete sinks.
#[derive(Debug, Default)]
pub(crate) struct SinkStats {
    running: bool,
    sentences_sent: u64,
    started_at: Option<Instant>,
    last_send_at: Option<Instant>,
}

impl SinkStats {
    pub(crate) fn mark_started(&mut self) {
        self.running = true;
        self.started_at = Some(Instant::now());
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.running = false;
    }

    pub(crate) fn mark_sent(&mut self) {
        self.sentences_sent += 1;
        self.last_send_at = Some(Instant::now());
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn snapshot(&self, connections: usize) -> OutputStatus {
        OutputStatus {
            running: self.running,
            sentences_sent: self.sentences_sent,
            uptime: self
                .started_at
                .filter(|_| self.running)
                .map(|t| t.elapsed()),
            last_send_age: self.last_send_at.map(|t| t.elapsed()),
            connections,
        }
    }
}
