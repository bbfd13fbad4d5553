use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Decoded audio ready for a recognizer: mono, 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    /// Bytes per sample.
    pub sample_width: u16,
    /// Channel count of the upload before downmixing.
    pub source_channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, source_channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            sample_width: 2,
            source_channels,
        }
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|s| *s == 0)
    }

    /// Raw little-endian LINEAR16 bytes, no container.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Re-encode as a mono 16-bit WAV file in memory.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, hound::Error> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut bytes = Vec::with_capacity(44 + self.samples.len() * 2);
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(bytes)
    }
}
