//! UDP sink: fire-and-forget datagrams to a broadcast, multicast, or
//! unicast destination. One sentence per datagram.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use marisim_common::config::UdpOutputConfig;
use marisim_common::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use super::{OutputHandler, OutputStatus, SinkStats};

/// Datagram sink. Send failures are logged and not retried.
pub struct UdpOutput {
    config: UdpOutputConfig,
    socket: Option<UdpSocket>,
    stats: SinkStats,
}

impl UdpOutput {
    /// Creates a UDP sink from its configuration.
    pub fn new(config: UdpOutputConfig) -> Self {
        Self {
            config,
            socket: None,
            stats: SinkStats::default(),
        }
    }

    fn destination(&self) -> (String, u16) {
        match &self.config.multicast_group {
            Some(group) => (group.clone(), self.config.port),
            None => (self.config.host.clone(), self.config.port),
        }
    }
}

#[async_trait]
impl OutputHandler for UdpOutput {
    fn name(&self) -> &str {
        "udp"
    }

    async fn start(&mut self) -> Result<(), Error> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;

        if self.config.broadcast {
            socket.set_broadcast(true)?;
        }
        if let Some(group) = &self.config.multicast_group {
            let group: Ipv4Addr = group
                .parse()
                .map_err(|_| Error::Config(format!("invalid multicast group: {group}")))?;
            socket.join_multicast_v4(group, Ipv4Addr::UNSPECIFIED)?;
            socket.set_multicast_ttl_v4(self.config.multicast_ttl)?;
        }

        let (host, port) = self.destination();
        info!(%host, port, "udp output started");
        self.socket = Some(socket);
        self.stats.mark_started();
        Ok(())
    }

    async fn stop(&mut self) {
        self.socket = None;
        self.stats.mark_stopped();
    }

    async fn send(&mut self, sentence: &str) -> bool {
        let Some(socket) = self.socket.as_ref() else {
            return false;
        };

        let destination = self.destination();
        match socket.send_to(sentence.as_bytes(), destination).await {
            Ok(_) => {
                self.stats.mark_sent();
                true
            }
            Err(e) => {
                debug!(error = %e, "udp send failed");
                false
            }
        }
    }

    fn status(&self) -> OutputStatus {
        self.stats.snapshot(usize::from(self.socket.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_datagram_to_receiver() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut output = UdpOutput::new(UdpOutputConfig {
            host: "127.0.0.1".to_string(),
            port,
            broadcast: false,
            multicast_group: None,
            multicast_ttl: 1,
            enabled: true,
        });
        output.start().await.unwrap();
        assert!(output.send("$GPGGA,1*00\r\n").await);

        let mut buf = [0u8; 128];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"$GPGGA,1*00\r\n");

        assert_eq!(output.status().sentences_sent, 1);
        output.stop().await;
    }

    #[tokio::test]
    async fn test_send_before_start_fails() {
        let mut output = UdpOutput::new(UdpOutputConfig {
            host: "127.0.0.1".to_string(),
            port: 10111,
            broadcast: false,
            multicast_group: None,
            multicast_ttl: 1,
            enabled: true,
        });
        assert!(!output.send("x\r\n").await);
        assert!(!output.status().running);
    }

    #[tokio::test]
    async fn test_invalid_multicast_group_rejected() {
        let mut output = UdpOutput::new(UdpOutputConfig {
            host: "127.0.0.1".to_string(),
            port: 10111,
            broadcast: false,
            multicast_group: Some("not-an-address".to_string()),
            multicast_ttl: 1,
            enabled: true,
        });
        assert!(output.start().await.is_err());
        assert!(!output.status().running);
    }
}
