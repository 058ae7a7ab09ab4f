use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::audio::{frames_to_wav, AudioBackend, AudioBackendConfig, AudioFrame};

/// MIME type of artifacts produced by [`BackendCaptureDevice`]
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Opaque binary result of one audio capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Artifact {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn wav(data: Vec<u8>) -> Self {
        Self::new(data, WAV_MIME_TYPE)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Token for one acquisition of a capture device
///
/// Not `Clone`: `release` consumes it, so a handle can be released at most once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CaptureHandle {
    id: u64,
}

impl CaptureHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Audio capture device contract
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the device and begin capturing
    async fn acquire(&self) -> Result<CaptureHandle>;

    /// Stop capturing and produce the artifact recorded under `handle`
    async fn finalize(&self, handle: &CaptureHandle) -> Result<Artifact>;

    /// Release the device
    async fn release(&self, handle: CaptureHandle) -> Result<()>;

    /// Device name for logging
    fn name(&self) -> &str;
}

type BackendBuilder = dyn Fn() -> Result<Box<dyn AudioBackend>> + Send + Sync;

struct ActiveCapture {
    backend: Box<dyn AudioBackend>,
    collector: Option<JoinHandle<Vec<AudioFrame>>>,
}

/// Capture device over any [`AudioBackend`]
///
/// Each acquisition builds a fresh backend, collects its frames in a
/// background task and encodes them as WAV on finalize.
pub struct BackendCaptureDevice {
    builder: Box<BackendBuilder>,
    config: AudioBackendConfig,
    active: Mutex<HashMap<u64, ActiveCapture>>,
    next_id: AtomicU64,
}

impl BackendCaptureDevice {
    pub fn new<F>(config: AudioBackendConfig, builder: F) -> Self
    where
        F: Fn() -> Result<Box<dyn AudioBackend>> + Send + Sync + 'static,
    {
        Self {
            builder: Box::new(builder),
            config,
            active: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn into_shared(self) -> Arc<dyn CaptureDevice> {
        Arc::new(self)
    }

    /// Number of acquisitions not yet released
    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for BackendCaptureDevice {
    async fn acquire(&self) -> Result<CaptureHandle> {
        let mut backend = (self.builder)().context("Failed to create audio backend")?;

        let mut audio_rx = backend
            .start()
            .await
            .context("Failed to start audio capture")?;

        let collector = tokio::spawn(async move {
            let mut frames = Vec::new();
            while let Some(frame) = audio_rx.recv().await {
                frames.push(frame);
            }
            frames
        });

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        info!("Capture {} acquired on backend {}", id, backend.name());

        self.active.lock().await.insert(
            id,
            ActiveCapture {
                backend,
                collector: Some(collector),
            },
        );

        Ok(CaptureHandle::new(id))
    }

    async fn finalize(&self, handle: &CaptureHandle) -> Result<Artifact> {
        let mut active = self.active.lock().await;
        let capture = active
            .get_mut(&handle.id())
            .ok_or_else(|| anyhow!("Unknown capture handle {}", handle.id()))?;

        if capture.backend.is_capturing() {
            capture
                .backend
                .stop()
                .await
                .context("Failed to stop audio backend")?;
        }

        let collector = capture
            .collector
            .take()
            .ok_or_else(|| anyhow!("Capture {} already finalized", handle.id()))?;
        drop(active);

        let frames = collector.await.context("Frame collector task panicked")?;

        let data = frames_to_wav(
            &frames,
            self.config.target_sample_rate,
            self.config.target_channels,
        )?;

        info!(
            "Capture {} finalized: {} frames, {} bytes",
            handle.id(),
            frames.len(),
            data.len()
        );

        Ok(Artifact::wav(data))
    }

    async fn release(&self, handle: CaptureHandle) -> Result<()> {
        let capture = self.active.lock().await.remove(&handle.id());

        match capture {
            Some(mut capture) => {
                if capture.backend.is_capturing() {
                    capture
                        .backend
                        .stop()
                        .await
                        .context("Failed to stop audio backend")?;
                }
                if let Some(collector) = capture.collector.take() {
                    collector.abort();
                }
                info!("Capture {} released", handle.id());
            }
            None => warn!("Release of unknown capture handle {}", handle.id()),
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "backend"
    }
}
