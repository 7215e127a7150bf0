//! File sink: appends sentences to a log file, with optional size-based
//! rotation keeping numbered backups (`.1` newest).

use async_trait::async_trait;
use marisim_common::config::FileOutputConfig;
use marisim_common::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{OutputHandler, OutputStatus, SinkStats};

/// Writes every sentence to a file, optionally flushing per write.
#[derive(Debug)]
pub struct FileOutput {
    config: FileOutputConfig,
    file: Option<File>,
    bytes_written: u64,
    stats: SinkStats,
}

impl FileOutput {
    /// Creates a file sink from its configuration.
    pub fn new(config: FileOutputConfig) -> Self {
        Self {
            config,
            file: None,
            bytes_written: 0,
            stats: SinkStats::default(),
        }
    }

    fn rotation_limit(&self) -> Option<u64> {
        self.config
            .rotation_size_mb
            .map(|mb| (mb * 1024.0 * 1024.0) as u64)
    }

    /// Shifts `.n` backups up by one and moves the live file to `.1`.
    async fn rotate(&mut self) -> std::io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }

        let path = &self.config.path;
        if self.config.max_files == 0 {
            tokio::fs::remove_file(path).await?;
        } else {
            let oldest = format!("{path}.{}", self.config.max_files);
            if tokio::fs::try_exists(&oldest).await? {
                tokio::fs::remove_file(&oldest).await?;
            }
            for index in (1..self.config.max_files).rev() {
                let from = format!("{path}.{index}");
                if tokio::fs::try_exists(&from).await? {
                    tokio::fs::rename(&from, format!("{path}.{}", index + 1)).await?;
                }
            }
            tokio::fs::rename(path, format!("{path}.1")).await?;
        }

        self.file = Some(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await?,
        );
        self.bytes_written = 0;
        info!(%path, "output file rotated");
        Ok(())
    }
}

#[async_trait]
impl OutputHandler for FileOutput {
    fn name(&self) -> &str {
        "file"
    }

    async fn start(&mut self) -> Result<(), Error> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.config.append)
            .truncate(!self.config.append)
            .open(&self.config.path)
            .await?;

        self.bytes_written = if self.config.append {
            file.metadata().await?.len()
        } else {
            0
        };

        debug!(path = %self.config.path, append = self.config.append, "file output started");
        self.file = Some(file);
        self.stats.mark_started();
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush().await {
                warn!(path = %self.config.path, error = %e, "flush on stop failed");
            }
        }
        self.stats.mark_stopped();
    }

    async fn send(&mut self, sentence: &str) -> bool {
        let Some(file) = self.file.as_mut() else {
            return false;
        };

        let result = async {
            file.write_all(sentence.as_bytes()).await?;
            if self.config.auto_flush {
                file.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        }
        .await;

        if let Err(e) = result {
            warn!(path = %self.config.path, error = %e, "file write failed");
            self.file = None;
            self.stats.mark_stopped();
            return false;
        }

        self.bytes_written += sentence.len() as u64;
        self.stats.mark_sent();

        if let Some(limit) = self.rotation_limit() {
            if self.bytes_written >= limit {
                if let Err(e) = self.rotate().await {
                    warn!(path = %self.config.path, error = %e, "rotation failed");
                    self.file = None;
                    self.stats.mark_stopped();
                }
            }
        }
        true
    }

    fn status(&self) -> OutputStatus {
        self.stats.snapshot(usize::from(self.file.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: &std::path::Path) -> FileOutputConfig {
        FileOutputConfig {
            path: path.to_string_lossy().into_owned(),
            append: false,
            auto_flush: true,
            rotation_size_mb: None,
            max_files: 10,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_writes_and_counts_sentences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nmea");
        let mut output = FileOutput::new(config(&path));

        output.start().await.unwrap();
        assert!(output.send("$GPGGA,1*00\r\n").await);
        assert!(output.send("$GPRMC,2*00\r\n").await);
        output.stop().await;

        let status = output.status();
        assert!(!status.running);
        assert_eq!(status.sentences_sent, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "$GPGGA,1*00\r\n$GPRMC,2*00\r\n");
    }

    #[tokio::test]
    async fn test_append_mode_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nmea");
        std::fs::write(&path, "existing\r\n").unwrap();

        let mut output = FileOutput::new(FileOutputConfig {
            append: true,
            ..config(&path)
        });
        output.start().await.unwrap();
        assert!(output.send("new\r\n").await);
        output.stop().await;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "existing\r\nnew\r\n");
    }

    #[tokio::test]
    async fn test_rotation_keeps_numbered_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nmea");
        let mut output = FileOutput::new(FileOutputConfig {
            // ~20 bytes, so every sentence or two triggers a rotation
            rotation_size_mb: Some(20.0 / (1024.0 * 1024.0)),
            max_files: 2,
            ..config(&path)
        });

        output.start().await.unwrap();
        for i in 0..4 {
            assert!(output.send(&format!("$GPGGA,line{i},padpad*00\r\n")).await);
        }
        output.stop().await;

        assert!(path.exists());
        assert!(dir.path().join("out.nmea.1").exists());
        assert!(dir.path().join("out.nmea.2").exists());
        assert!(!dir.path().join("out.nmea.3").exists());

        // Newest backup holds the most recent rotated sentence
        let backup = std::fs::read_to_string(dir.path().join("out.nmea.1")).unwrap();
        assert!(backup.contains("line3"));
    }

    #[tokio::test]
    async fn test_send_before_start_fails() {
        let mut output = FileOutput::new(FileOutputConfig {
            path: "unused".to_string(),
            append: true,
            auto_flush: false,
            rotation_size_mb: None,
            max_files: 10,
            enabled: true,
        });
        assert!(!output.send("x\r\n").await);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nmea");
        let mut output = FileOutput::new(FileOutputConfig {
            auto_flush: false,
            ..config(&path)
        });
        output.start().await.unwrap();
        output.stop().await;
        output.stop().await;
        assert!(!output.status().running);
    }
}
