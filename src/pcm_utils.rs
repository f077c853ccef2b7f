//! PCM marshaling utilities
//!
//! Helpers that validate caller buffers and copy them into the call-scoped
//! scratch buffers handed to libmp3lame.

use crate::error::{BufferSizeError, Result};
use std::os::raw::c_int;

/// Extra bytes added to every output buffer, from `lame.h`
pub const MP3_BUFFER_SLACK: usize = 7200;

/// Factor applied to unit-range float samples before the native call
pub const FLOAT_SCALE: f64 = 32768.0;

/// Worst-case output size for `sample_count` input samples:
/// `ceil(1.25 * sample_count) + 7200`
pub fn mp3_buffer_capacity(sample_count: usize) -> Result<usize> {
    sample_count
        .checked_mul(5)
        .and_then(|n| n.checked_add(3))
        .map(|n| n / 4)
        .and_then(|n| n.checked_add(MP3_BUFFER_SLACK))
        .ok_or_else(|| BufferSizeError::TooLarge(sample_count).into())
}

/// Validate an interleaved byte buffer against its declared sample count
/// and return the number of samples per channel.
pub fn check_interleaved_len(byte_len: usize, sample_count: usize, channels: usize) -> Result<usize> {
    let expected = sample_count
        .checked_mul(2)
        .ok_or(BufferSizeError::TooLarge(sample_count))?;
    if byte_len != expected {
        return Err(BufferSizeError::LengthMismatch {
            expected,
            actual: byte_len,
        }
        .into());
    }
    per_channel(sample_count, channels)
}

/// Samples per channel for an interleaved buffer of `sample_count` samples
pub fn per_channel(sample_count: usize, channels: usize) -> Result<usize> {
    if channels == 0 || sample_count % channels != 0 {
        return Err(BufferSizeError::UnevenChannels {
            samples: sample_count,
            channels,
        }
        .into());
    }
    Ok(sample_count / channels)
}

/// Validate `offset..offset + count` against a channel of length `len`
pub fn check_range(offset: usize, count: usize, len: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(BufferSizeError::OutOfRange { offset, count, len }.into()),
    }
}

/// Convert a length to the C int a native call expects
pub fn to_c_int(n: usize) -> Result<c_int> {
    c_int::try_from(n).map_err(|_| BufferSizeError::TooLarge(n).into())
}

/// Copy little-endian 16-bit PCM bytes into a fresh scratch buffer.
///
/// On little-endian hosts this is a plain copy; on big-endian hosts every
/// sample is byte-swapped.
pub fn decode_le_samples(pcm: &[u8]) -> Result<Vec<i16>> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(pcm.len() / 2)?;
    scratch.extend(
        pcm.chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
    );
    Ok(scratch)
}

/// Copy a typed sample slice into a fresh scratch buffer
pub fn copy_samples(pcm: &[i16]) -> Result<Vec<i16>> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(pcm.len())?;
    scratch.extend_from_slice(pcm);
    Ok(scratch)
}

/// Rescale a unit-range sample to the full-scale range libmp3lame expects
#[inline]
pub fn scale_float(sample: f64) -> f32 {
    (sample * FLOAT_SCALE) as f32
}

/// Copy and rescale a channel range into a fresh `f32` scratch buffer
pub fn scale_channel(channel: &[f64], offset: usize, count: usize) -> Result<Vec<f32>> {
    check_range(offset, count, channel.len())?;
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(count)?;
    scratch.extend(channel[offset..offset + count].iter().map(|&s| scale_float(s)));
    Ok(scratch)
}

/// Zero-filled output scratch buffer of `capacity` bytes
pub fn output_buffer(capacity: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)?;
    buf.resize(capacity, 0);
    Ok(buf)
}
