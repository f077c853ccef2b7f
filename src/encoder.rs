//! Encode and flush entry points
//!
//! Every call follows the same shape: validate the caller's buffers, copy
//! them into call-scoped scratch buffers, size the output buffer from the
//! worst-case formula in `lame.h`, run the native call, and copy exactly
//! the bytes it reports into a `Vec` owned by the caller. Scratch buffers
//! are plain `Vec`s, so every exit path releases them.
//!
//! All of these block the calling thread until libmp3lame returns.

use crate::error::{check_encode, LameError, Result};
use crate::ffi;
use crate::pcm_utils::{
    check_interleaved_len, copy_samples, decode_le_samples, mp3_buffer_capacity, output_buffer,
    per_channel, scale_channel, to_c_int, MP3_BUFFER_SLACK,
};
use crate::session::{Session, SessionState};
use log::{debug, trace};
use std::os::raw::c_int;
use std::ptr;

impl Session {
    /// Encode interleaved little-endian 16-bit PCM.
    ///
    /// `sample_count` is the total number of samples across all channels;
    /// `pcm` must hold exactly `2 * sample_count` bytes and the count must
    /// divide evenly by the session's channel count. Validation failures
    /// return before any encode call reaches libmp3lame.
    pub fn encode_interleaved(&mut self, pcm: &[u8], sample_count: usize) -> Result<Vec<u8>> {
        let gfp = self.encodable()?;
        let channels = self.channels();
        let per_channel = check_interleaved_len(pcm.len(), sample_count, channels)?;
        let mut scratch = decode_le_samples(pcm)?;
        encode_pcm16(gfp, &mut scratch, channels, per_channel, sample_count)
    }

    /// Encode interleaved samples already in host representation
    pub fn encode_samples(&mut self, pcm: &[i16]) -> Result<Vec<u8>> {
        let gfp = self.encodable()?;
        let channels = self.channels();
        let per_channel = per_channel(pcm.len(), channels)?;
        let mut scratch = copy_samples(pcm)?;
        encode_pcm16(gfp, &mut scratch, channels, per_channel, pcm.len())
    }

    /// Encode `sample_count` samples starting at `offset` from two
    /// unit-range channels. Stereo sessions only.
    pub fn encode_float(
        &mut self,
        left: &[f64],
        right: &[f64],
        offset: usize,
        sample_count: usize,
    ) -> Result<Vec<u8>> {
        let gfp = self.encodable()?;
        self.expect_channels(2)?;
        let left = scale_channel(left, offset, sample_count)?;
        let right = scale_channel(right, offset, sample_count)?;
        encode_f32(gfp, &left, Some(right.as_slice()), sample_count)
    }

    /// Encode `sample_count` samples starting at `offset` from one
    /// unit-range channel. Mono sessions only.
    pub fn encode_float_mono(
        &mut self,
        samples: &[f64],
        offset: usize,
        sample_count: usize,
    ) -> Result<Vec<u8>> {
        let gfp = self.encodable()?;
        self.expect_channels(1)?;
        let samples = scale_channel(samples, offset, sample_count)?;
        encode_f32(gfp, &samples, None, sample_count)
    }

    /// Drain the remaining frames and end the stream.
    ///
    /// Any later encode or flush fails with [`LameError::EndOfStream`].
    pub fn flush(&mut self) -> Result<Vec<u8>> {
        let gfp = self.encodable()?;
        if self.gapless {
            return Err(LameError::FlushConflict);
        }
        let capacity = native_len(unsafe { ffi::lame_get_size_mp3buffer(gfp) })
            + native_len(unsafe { ffi::lame_get_encoder_padding(gfp) })
            + MP3_BUFFER_SLACK;
        let out = drain(gfp, capacity, ffi::lame_encode_flush)?;
        self.mark_finished();
        debug!("flushed {} bytes, stream finished", out.len());
        Ok(out)
    }

    /// Drain the remaining frames without padding, for gapless
    /// concatenation.
    ///
    /// Encoding may continue afterwards (optionally after
    /// [`Session::init_bitstream`]); `flush` is refused on this session
    /// from now on.
    pub fn flush_nogap(&mut self) -> Result<Vec<u8>> {
        let gfp = self.handle()?;
        match self.state() {
            SessionState::Configuring => return Err(LameError::NotInitialized),
            SessionState::Finished => return Err(LameError::FlushConflict),
            SessionState::Encoding => {}
        }
        let capacity =
            native_len(unsafe { ffi::lame_get_size_mp3buffer(gfp) }) + MP3_BUFFER_SLACK;
        let out = drain(gfp, capacity, ffi::lame_encode_flush_nogap)?;
        self.gapless = true;
        debug!("flushed {} bytes without gap", out.len());
        Ok(out)
    }

    /// Xing/LAME info frame for the finished stream.
    ///
    /// The first frame of the encoded stream is a placeholder of the same
    /// size; callers that can seek should overwrite it with these bytes.
    /// Empty when the info frame is disabled.
    pub fn lametag_frame(&self) -> Result<Vec<u8>> {
        let gfp = self.handle()?;
        if self.state() != SessionState::Finished {
            return Err(LameError::NotFinished);
        }
        let size = unsafe { ffi::lame_get_lametag_frame(gfp, ptr::null_mut(), 0) };
        if size == 0 {
            return Ok(Vec::new());
        }
        let mut frame = output_buffer(size)?;
        let written = unsafe { ffi::lame_get_lametag_frame(gfp, frame.as_mut_ptr(), frame.len()) };
        frame.truncate(written);
        Ok(frame)
    }

    fn expect_channels(&self, expected: usize) -> Result<()> {
        let actual = self.channels();
        if actual != expected {
            return Err(LameError::ChannelLayout {
                expected: expected as i32,
                actual: actual as i32,
            });
        }
        Ok(())
    }
}

type DrainFn = unsafe extern "C" fn(*mut ffi::LameGlobalFlags, *mut u8, c_int) -> c_int;

fn encode_pcm16(
    gfp: *mut ffi::LameGlobalFlags,
    scratch: &mut [i16],
    channels: usize,
    per_channel: usize,
    sample_count: usize,
) -> Result<Vec<u8>> {
    let nsamples = to_c_int(per_channel)?;
    let capacity = mp3_buffer_capacity(sample_count)?;
    let mut mp3buf = output_buffer(capacity)?;
    let mp3buf_size = to_c_int(capacity)?;

    // lame_encode_buffer_interleaved always reads two channels, so mono
    // input goes through lame_encode_buffer with no right channel.
    let code = unsafe {
        if channels == 1 {
            ffi::lame_encode_buffer(
                gfp,
                scratch.as_ptr(),
                ptr::null(),
                nsamples,
                mp3buf.as_mut_ptr(),
                mp3buf_size,
            )
        } else {
            ffi::lame_encode_buffer_interleaved(
                gfp,
                scratch.as_mut_ptr(),
                nsamples,
                mp3buf.as_mut_ptr(),
                mp3buf_size,
            )
        }
    };
    let out = collect(code, &mp3buf)?;
    trace!("encoded {} samples into {} bytes", sample_count, out.len());
    Ok(out)
}

fn encode_f32(
    gfp: *mut ffi::LameGlobalFlags,
    left: &[f32],
    right: Option<&[f32]>,
    per_channel: usize,
) -> Result<Vec<u8>> {
    let nsamples = to_c_int(per_channel)?;
    // lame.h sizes the float entry points by samples per channel
    let capacity = mp3_buffer_capacity(per_channel)?;
    let mut mp3buf = output_buffer(capacity)?;
    let mp3buf_size = to_c_int(capacity)?;

    let code = unsafe {
        ffi::lame_encode_buffer_float(
            gfp,
            left.as_ptr(),
            right.map_or(ptr::null(), |r| r.as_ptr()),
            nsamples,
            mp3buf.as_mut_ptr(),
            mp3buf_size,
        )
    };
    let out = collect(code, &mp3buf)?;
    trace!("encoded {} float samples per channel into {} bytes", per_channel, out.len());
    Ok(out)
}

fn drain(gfp: *mut ffi::LameGlobalFlags, capacity: usize, call: DrainFn) -> Result<Vec<u8>> {
    let mut mp3buf = output_buffer(capacity)?;
    let mp3buf_size = to_c_int(capacity)?;
    let code = unsafe { call(gfp, mp3buf.as_mut_ptr(), mp3buf_size) };
    collect(code, &mp3buf)
}

/// Copy the reported byte range out of the scratch output buffer
fn collect(code: c_int, mp3buf: &[u8]) -> Result<Vec<u8>> {
    let written = check_encode(code)?;
    let mut out = Vec::new();
    out.try_reserve_exact(written)?;
    out.extend_from_slice(&mp3buf[..written.min(mp3buf.len())]);
    Ok(out)
}

fn native_len(value: c_int) -> usize {
    usize::try_from(value).unwrap_or(0)
}
