use anyhow::{Context, Result};
use std::io::Cursor;
use tracing::debug;

use super::backend::AudioFrame;

/// Accumulates frames and encodes them as an in-memory WAV file
pub struct WavBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
}

impl WavBuffer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            samples: Vec::new(),
        }
    }

    pub fn write_frame(&mut self, frame: &AudioFrame) {
        self.samples.extend_from_slice(&frame.samples);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Write the WAV header and samples, returning the encoded bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .context("Failed to initialize WAV writer")?;

            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }

            writer.finalize().context("Failed to finalize WAV data")?;
        }

        let bytes = cursor.into_inner();
        debug!(
            "WAV finalized: {} samples, {} bytes",
            self.samples.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Encode frames as a 16-bit PCM WAV file
///
/// Sample rate and channel count come from the first frame, falling back to
/// the given defaults when there are no frames.
pub fn frames_to_wav(frames: &[AudioFrame], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let (rate, chans) = frames
        .first()
        .map(|f| (f.sample_rate, f.channels))
        .unwrap_or((sample_rate, channels));

    let mut buffer = WavBuffer::new(rate, chans);
    for frame in frames {
        buffer.write_frame(frame);
    }
    buffer.finish()
}
