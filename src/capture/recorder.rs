use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

use super::device::{Artifact, CaptureDevice, CaptureHandle};
use crate::error::{InterviewError, Result};

/// Externally visible recorder state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Idle,
    Recording,
    Captured,
}

enum Slot {
    Idle,
    Recording {
        handle: CaptureHandle,
        started_at: Instant,
    },
    Captured {
        artifact: Artifact,
    },
}

/// Owns the single in-progress capture for the displayed question
///
/// `Idle -> Recording -> Captured -> Idle`. Beginning again from `Captured`
/// discards the previous artifact; beginning while `Recording` tears the
/// active acquisition down first so device handles never leak.
pub struct RecordingBuffer {
    device: Arc<dyn CaptureDevice>,
    slot: Slot,
}

impl RecordingBuffer {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            slot: Slot::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        match self.slot {
            Slot::Idle => RecorderState::Idle,
            Slot::Recording { .. } => RecorderState::Recording,
            Slot::Captured { .. } => RecorderState::Captured,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.slot, Slot::Recording { .. })
    }

    /// Whole seconds since the current capture began, for display only
    pub fn elapsed_secs(&self) -> u64 {
        match &self.slot {
            Slot::Recording { started_at, .. } => started_at.elapsed().as_secs(),
            _ => 0,
        }
    }

    /// Artifact of the last completed capture, if still held
    pub fn artifact(&self) -> Option<&Artifact> {
        match &self.slot {
            Slot::Captured { artifact } => Some(artifact),
            _ => None,
        }
    }

    /// Acquire the capture device and start recording
    pub async fn begin(&mut self) -> Result<()> {
        self.reset().await;

        let handle = self.device.acquire().await.map_err(|e| {
            warn!("Capture device {} unavailable: {:#}", self.device.name(), e);
            InterviewError::DeviceUnavailable(e.to_string())
        })?;

        info!("Recording started (capture {})", handle.id());
        self.slot = Slot::Recording {
            handle,
            started_at: Instant::now(),
        };
        Ok(())
    }

    /// Stop recording and hand back the finalized artifact
    ///
    /// Returns `Ok(None)` without touching the device when not recording.
    pub async fn end(&mut self) -> Result<Option<Artifact>> {
        let handle = match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Recording { handle, .. } => handle,
            other => {
                self.slot = other;
                return Ok(None);
            }
        };

        let finalized = self.device.finalize(&handle).await;
        self.release(handle).await;

        match finalized {
            Ok(artifact) => {
                info!("Recording captured ({} bytes)", artifact.len());
                self.slot = Slot::Captured {
                    artifact: artifact.clone(),
                };
                Ok(Some(artifact))
            }
            Err(e) => {
                warn!("Failed to finalize capture: {:#}", e);
                Err(InterviewError::DeviceUnavailable(e.to_string()))
            }
        }
    }

    /// Tear down any active capture and drop any held artifact
    pub async fn reset(&mut self) {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Recording { handle, .. } => {
                info!("Discarding in-progress capture {}", handle.id());
                self.release(handle).await;
            }
            Slot::Captured { .. } | Slot::Idle => {}
        }
    }

    async fn release(&self, handle: CaptureHandle) {
        let id = handle.id();
        if let Err(e) = self.device.release(handle).await {
            warn!("Failed to release capture {}: {:#}", id, e);
        }
    }
}

/// Format elapsed seconds as `m:ss`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(9), "0:09");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(600), "10:00");
    }
}
