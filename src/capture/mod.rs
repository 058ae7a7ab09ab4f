//! Audio capture for interview answers
//!
//! - `CaptureDevice`: acquire / finalize / release contract for a device
//! - `BackendCaptureDevice`: device implementation over an `AudioBackend`
//! - `RecordingBuffer`: one capture at a time for the displayed question

mod device;
mod recorder;

pub use device::{Artifact, BackendCaptureDevice, CaptureDevice, CaptureHandle, WAV_MIME_TYPE};
pub use recorder::{format_elapsed, RecorderState, RecordingBuffer};
