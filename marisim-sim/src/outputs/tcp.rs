//! TCP sink: broadcasts every sentence to all connected clients.
//!
//! A background accept loop admits clients up to the configured maximum.
//! A client whose write fails is pruned without affecting the others;
//! broadcasting with zero listeners succeeds silently.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use marisim_common::config::TcpOutputConfig;
use marisim_common::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{OutputHandler, OutputStatus, SinkStats};

/// TCP broadcast server sink.
pub struct TcpOutput {
    config: TcpOutputConfig,
    clients: Arc<Mutex<Vec<TcpStream>>>,
    accept_task: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
    local_addr: Option<SocketAddr>,
    stats: SinkStats,
}

impl TcpOutput {
    /// Creates a TCP sink from its configuration.
    pub fn new(config: TcpOutputConfig) -> Self {
        Self {
            config,
            clients: Arc::new(Mutex::new(Vec::new())),
            accept_task: None,
            shutdown: None,
            local_addr: None,
            stats: SinkStats::default(),
        }
    }

    /// The bound address, available after `start`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

#[async_trait]
impl OutputHandler for TcpOutput {
    fn name(&self) -> &str {
        "tcp"
    }

    async fn start(&mut self) -> Result<(), Error> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "tcp output listening");
        self.local_addr = Some(local_addr);

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let clients = Arc::clone(&self.clients);
        let max_clients = self.config.max_clients;

        self.accept_task = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            let mut clients = clients.lock().await;
                            if clients.len() >= max_clients {
                                debug!(%peer, "client limit reached, rejecting");
                                continue;
                            }
                            debug!(%peer, total = clients.len() + 1, "client connected");
                            clients.push(stream);
                        }
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                        }
                    },
                    _ = shutdown_rx.changed() => break,
                }
            }
        }));
        self.shutdown = Some(shutdown_tx);
        self.stats.mark_started();
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.accept_task.take() {
            let _ = task.await;
        }
        self.clients.lock().await.clear();
        self.local_addr = None;
        self.stats.mark_stopped();
    }

    async fn send(&mut self, sentence: &str) -> bool {
        if !self.stats.is_running() {
            return false;
        }

        let mut clients = self.clients.lock().await;
        // Zero listeners is a silent success, not an error
        if !clients.is_empty() {
            let mut kept = Vec::with_capacity(clients.len());
            for mut stream in clients.drain(..) {
                match stream.write_all(sentence.as_bytes()).await {
                    Ok(()) => kept.push(stream),
                    Err(e) => {
                        debug!(error = %e, "client write failed, pruning");
                    }
                }
            }
            *clients = kept;
        }
        drop(clients);

        self.stats.mark_sent();
        true
    }

    fn status(&self) -> OutputStatus {
        let connections = self
            .clients
            .try_lock()
            .map(|clients| clients.len())
            .unwrap_or(0);
        self.stats.snapshot(connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    fn ephemeral_config() -> TcpOutputConfig {
        TcpOutputConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_clients: 10,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_send_with_zero_clients_succeeds() {
        let mut output = TcpOutput::new(ephemeral_config());
        output.start().await.unwrap();

        assert!(output.send("$GPGGA,1*00\r\n").await);
        let status = output.status();
        assert!(status.running);
        assert_eq!(status.sentences_sent, 1);
        assert_eq!(status.connections, 0);

        output.stop().await;
    }

    #[tokio::test]
    async fn test_disconnected_client_is_pruned() {
        let mut output = TcpOutput::new(ephemeral_config());
        output.start().await.unwrap();
        let addr = output.local_addr().unwrap();

        let mut survivor = TcpStream::connect(addr).await.unwrap();
        let dropper = TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(output.status().connections, 2);

        assert!(output.send("first\r\n").await);
        drop(dropper);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Writes to the dropped client fail at most once; the survivor
        // keeps receiving
        assert!(output.send("second\r\n").await);
        assert!(output.send("third\r\n").await);

        let mut received = vec![0u8; "first\r\nsecond\r\nthird\r\n".len()];
        survivor.read_exact(&mut received).await.unwrap();
        assert_eq!(received, b"first\r\nsecond\r\nthird\r\n");

        output.stop().await;
        assert_eq!(output.status().connections, 0);
    }

    #[tokio::test]
    async fn test_stop_unblocks_accept_loop() {
        let mut output = TcpOutput::new(ephemeral_config());
        output.start().await.unwrap();
        output.stop().await;
        output.stop().await;
        assert!(!output.status().running);
        assert!(!output.send("late\r\n").await);
    }
}
