//! Serial sink: writes sentences to a serial device with pacing and
//! automatic reconnection.
//!
//! Writes are throttled to the configured send interval so slow listeners
//! (chart plotters, AIS displays) are not flooded. When the device
//! disappears a background worker retries the open on a fixed delay,
//! bounded by `max_reconnect_attempts` (-1 retries forever, 0 never
//! retries).

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use marisim_common::config::SerialOutputConfig;
use marisim_common::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

use super::{OutputHandler, OutputStatus, SinkStats};

/// Reconnecting serial port sink.
pub struct SerialOutput {
    config: SerialOutputConfig,
    stream: Arc<Mutex<Option<SerialStream>>>,
    reconnect_task: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
    last_send: Option<Instant>,
    stats: SinkStats,
}

impl SerialOutput {
    /// Creates a serial sink from its configuration.
    pub fn new(config: SerialOutputConfig) -> Self {
        Self {
            config,
            stream: Arc::new(Mutex::new(None)),
            reconnect_task: None,
            shutdown: None,
            last_send: None,
            stats: SinkStats::default(),
        }
    }

    /// Spawns the reconnect worker if none is active and retries are allowed.
    fn trigger_reconnect(&mut self) {
        if self.config.max_reconnect_attempts == 0 {
            debug!(port = %self.config.port, "reconnection disabled");
            return;
        }
        if let Some(task) = &self.reconnect_task {
            if !task.is_finished() {
                return;
            }
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let stream_slot = Arc::clone(&self.stream);
        let config = self.config.clone();

        self.reconnect_task = Some(tokio::spawn(async move {
            let delay = Duration::from_secs_f64(config.reconnect_delay.max(0.0));
            let mut attempt: i32 = 0;
            loop {
                if config.max_reconnect_attempts >= 0
                    && attempt >= config.max_reconnect_attempts
                {
                    warn!(port = %config.port, attempts = attempt, "reconnect attempts exhausted");
                    break;
                }
                attempt += 1;

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown_rx.changed() => break,
                }

                match open_port(&config) {
                    Ok(stream) => {
                        info!(port = %config.port, attempt, "serial port reconnected");
                        *stream_slot.lock().await = Some(stream);
                        break;
                    }
                    Err(e) => {
                        warn!(port = %config.port, attempt, error = %e, "reconnect failed");
                    }
                }
            }
        }));
        self.shutdown = Some(shutdown_tx);
    }
}

fn open_port(config: &SerialOutputConfig) -> Result<SerialStream, tokio_serial::Error> {
    let stream = tokio_serial::new(&config.port, config.baud_rate).open_native_async()?;
    #[cfg(unix)]
    {
        let mut stream = stream;
        stream.set_exclusive(true)?;
        return Ok(stream);
    }
    #[cfg(not(unix))]
    Ok(stream)
}

#[async_trait]
impl OutputHandler for SerialOutput {
    fn name(&self) -> &str {
        "serial"
    }

    async fn start(&mut self) -> Result<(), Error> {
        match open_port(&self.config) {
            Ok(stream) => {
                info!(port = %self.config.port, baud = self.config.baud_rate, "serial output started");
                *self.stream.lock().await = Some(stream);
                self.stats.mark_started();
                Ok(())
            }
            Err(e) if self.config.max_reconnect_attempts != 0 => {
                // Degraded start: the worker keeps trying in the background
                warn!(port = %self.config.port, error = %e, "serial open failed, will retry");
                self.stats.mark_started();
                self.trigger_reconnect();
                Ok(())
            }
            Err(e) => Err(Error::Transport(std::io::Error::new(
                std::io::ErrorKind::Other,
                e,
            ))),
        }
    }

    async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.reconnect_task.take() {
            let _ = task.await;
        }
        if let Some(mut stream) = self.stream.lock().await.take() {
            let _ = stream.flush().await;
        }
        self.stats.mark_stopped();
    }

    async fn send(&mut self, sentence: &str) -> bool {
        if !self.stats.is_running() {
            return false;
        }

        // Pace writes so listeners on slow links are not flooded
        if let Some(last) = self.last_send {
            let interval = Duration::from_secs_f64(self.config.send_interval.max(0.0));
            let elapsed = last.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }

        let mut slot = self.stream.lock().await;
        let Some(stream) = slot.as_mut() else {
            drop(slot);
            self.trigger_reconnect();
            return false;
        };

        match stream.write_all(sentence.as_bytes()).await {
            Ok(()) => {
                self.last_send = Some(Instant::now());
                self.stats.mark_sent();
                true
            }
            Err(e) => {
                warn!(port = %self.config.port, error = %e, "serial write failed");
                *slot = None;
                drop(slot);
                self.trigger_reconnect();
                false
            }
        }
    }

    fn status(&self) -> OutputStatus {
        let connections = self
            .stream
            .try_lock()
            .map(|slot| usize::from(slot.is_some()))
            .unwrap_or(0);
        self.stats.snapshot(connections)
    }
}
