use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use thiserror::Error;
use tracing::debug;

use super::buffer::AudioBuffer;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("audio file is empty")]
    Empty,

    #[error("audio file could not be read as PCM WAV: {0}")]
    Unreadable(#[from] hound::Error),

    #[error("unsupported audio format: {bits}-bit {kind}")]
    UnsupportedFormat { bits: u16, kind: &'static str },
}

/// Decode a whole WAV upload into a mono 16-bit buffer.
///
/// The reader borrows `bytes` through a cursor and is dropped when this
/// function returns, whichever branch it leaves through.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    debug!(
        "WAV spec: channels={}, sample_rate={}, bits={}, format={:?}",
        spec.channels, spec.sample_rate, spec.bits_per_sample, spec.sample_format
    );

    let interleaved: Vec<i16> = match spec.sample_format {
        SampleFormat::Int if (1..=32).contains(&spec.bits_per_sample) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| rescale_int(v, spec.bits_per_sample)))
            .collect::<Result<_, _>>()?,
        SampleFormat::Float if spec.bits_per_sample == 32 => reader
            .samples::<f32>()
            .map(|s| s.map(float_to_i16))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            return Err(DecodeError::UnsupportedFormat {
                bits: spec.bits_per_sample,
                kind: "integer",
            })
        }
        SampleFormat::Float => {
            return Err(DecodeError::UnsupportedFormat {
                bits: spec.bits_per_sample,
                kind: "float",
            })
        }
    };

    let samples = downmix(&interleaved, spec.channels);
    Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
}

fn rescale_int(value: i32, bits: u16) -> i16 {
    let scaled = if bits > 16 {
        value >> (bits - 16)
    } else {
        value << (16 - bits)
    };
    scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn float_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

fn downmix(interleaved: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}
