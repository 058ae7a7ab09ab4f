use anyhow::{bail, Context, Result};
use hound::WavReader;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        Self::from_reader(reader, path.display().to_string())
    }

    /// Decode an in-memory WAV artifact
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader =
            WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV data")?;

        Self::from_reader(reader, "<memory>".to_string())
    }

    fn from_reader<R: Read>(reader: WavReader<R>, path: String) -> Result<Self> {
        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        debug!(
            "Audio loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path,
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Split the file into frames of `frame_ms` milliseconds
    pub fn frames(&self, frame_ms: u64) -> Vec<AudioFrame> {
        let samples_per_frame = (self.sample_rate as u64 * frame_ms / 1000) as usize
            * self.channels.max(1) as usize;
        let samples_per_frame = samples_per_frame.max(1);

        self.samples
            .chunks(samples_per_frame)
            .enumerate()
            .map(|(i, chunk)| AudioFrame {
                samples: chunk.to_vec(),
                sample_rate: self.sample_rate,
                channels: self.channels,
                timestamp_ms: i as u64 * frame_ms,
            })
            .collect()
    }
}

/// Replays a WAV file as a live capture source
pub struct FileBackend {
    file: Arc<AudioFile>,
    config: AudioBackendConfig,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileBackend {
    pub fn open(path: impl AsRef<Path>, config: AudioBackendConfig) -> Result<Self> {
        let file = AudioFile::open(path)?;
        Ok(Self::from_file(file, config))
    }

    pub fn from_file(file: AudioFile, config: AudioBackendConfig) -> Self {
        Self {
            file: Arc::new(file),
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            bail!("Already capturing");
        }

        info!("Starting file replay capture: {}", self.file.path);

        let (tx, rx) = mpsc::channel(100);
        let file = Arc::clone(&self.file);
        let capturing = Arc::clone(&self.capturing);
        let frame_ms = self.config.buffer_duration_ms.max(1);
        let realtime = self.config.realtime;

        capturing.store(true, Ordering::SeqCst);

        self.task = Some(tokio::spawn(async move {
            for frame in file.frames(frame_ms) {
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }
                if tx.send(frame).await.is_err() {
                    break;
                }
                if realtime {
                    tokio::time::sleep(Duration::from_millis(frame_ms)).await;
                }
            }
            capturing.store(false, Ordering::SeqCst);
            debug!("File replay finished");
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);

        // Aborting drops the sender, which closes the frame channel
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }

        info!("File replay capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
