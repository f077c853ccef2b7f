//! Scalar parameter accessors
//!
//! Thin get/set shims over the `lame_get_*` / `lame_set_*` pairs. Values
//! are not range-checked here: libmp3lame validates the full configuration
//! in `init_params`. A setter that libmp3lame refuses outright is logged
//! and otherwise ignored, matching the native behaviour of keeping the
//! previous value.

use crate::config::{ChannelMode, VbrMode};
use crate::error::{LameError, Result};
use crate::ffi;
use crate::session::Session;
use log::warn;
use std::fmt::Display;
use std::os::raw::{c_int, c_ulong};

macro_rules! int_param {
    ($(#[$meta:meta])* $get:ident, $set:ident, $native_get:ident, $native_set:ident) => {
        $(#[$meta])*
        pub fn $get(&self) -> Result<i32> {
            let gfp = self.handle()?;
            Ok(unsafe { ffi::$native_get(gfp) })
        }

        $(#[$meta])*
        pub fn $set(&mut self, value: i32) -> Result<()> {
            let gfp = self.handle()?;
            let code = unsafe { ffi::$native_set(gfp, value) };
            self.after_set(stringify!($get), code, value);
            Ok(())
        }
    };
}

macro_rules! float_param {
    ($(#[$meta:meta])* $get:ident, $set:ident, $native_get:ident, $native_set:ident) => {
        $(#[$meta])*
        pub fn $get(&self) -> Result<f32> {
            let gfp = self.handle()?;
            Ok(unsafe { ffi::$native_get(gfp) })
        }

        $(#[$meta])*
        pub fn $set(&mut self, value: f32) -> Result<()> {
            let gfp = self.handle()?;
            let code = unsafe { ffi::$native_set(gfp, value) };
            self.after_set(stringify!($get), code, value);
            Ok(())
        }
    };
}

macro_rules! bool_param {
    ($(#[$meta:meta])* $get:ident, $set:ident, $native_get:ident, $native_set:ident) => {
        $(#[$meta])*
        pub fn $get(&self) -> Result<bool> {
            let gfp = self.handle()?;
            Ok(unsafe { ffi::$native_get(gfp) } != 0)
        }

        $(#[$meta])*
        pub fn $set(&mut self, value: bool) -> Result<()> {
            let gfp = self.handle()?;
            let code = unsafe { ffi::$native_set(gfp, c_int::from(value)) };
            self.after_set(stringify!($get), code, value);
            Ok(())
        }
    };
}

impl Session {
    fn after_set(&self, name: &str, code: c_int, value: impl Display) {
        if code != 0 {
            warn!("libmp3lame refused {} = {} (code {})", name, value, code);
        }
        if self.is_locked() {
            warn!(
                "{} = {} set after init_params; the running encoder keeps its derived settings",
                name, value
            );
        }
    }

    /// Total samples per channel the caller intends to encode
    pub fn num_samples(&self) -> Result<u64> {
        let gfp = self.handle()?;
        Ok(unsafe { ffi::lame_get_num_samples(gfp) } as u64)
    }

    pub fn set_num_samples(&mut self, value: u64) -> Result<()> {
        let gfp = self.handle()?;
        let native = c_ulong::try_from(value).map_err(|_| LameError::InvalidParameter {
            parameter: "num_samples",
            value: value.to_string(),
        })?;
        let code = unsafe { ffi::lame_set_num_samples(gfp, native) };
        self.after_set("num_samples", code, value);
        Ok(())
    }

    int_param!(
        /// Input sample rate in Hz
        in_samplerate, set_in_samplerate, lame_get_in_samplerate, lame_set_in_samplerate
    );
    int_param!(
        /// Output sample rate in Hz, 0 lets libmp3lame choose
        out_samplerate, set_out_samplerate, lame_get_out_samplerate, lame_set_out_samplerate
    );
    int_param!(
        /// Number of input channels. Changing it after `init_params` does
        /// not change the layout the encoder reads.
        num_channels, set_num_channels, lame_get_num_channels, lame_set_num_channels
    );
    int_param!(
        /// Algorithm quality, 0 (best) to 9 (fastest)
        quality, set_quality, lame_get_quality, lame_set_quality
    );
    int_param!(
        /// CBR bitrate in kbps
        brate, set_brate, lame_get_brate, lame_set_brate
    );
    int_param!(vbr_q, set_vbr_q, lame_get_VBR_q, lame_set_VBR_q);
    int_param!(
        /// ABR target bitrate in kbps
        vbr_mean_bitrate_kbps, set_vbr_mean_bitrate_kbps,
        lame_get_VBR_mean_bitrate_kbps, lame_set_VBR_mean_bitrate_kbps
    );
    int_param!(
        vbr_min_bitrate_kbps, set_vbr_min_bitrate_kbps,
        lame_get_VBR_min_bitrate_kbps, lame_set_VBR_min_bitrate_kbps
    );
    int_param!(
        vbr_max_bitrate_kbps, set_vbr_max_bitrate_kbps,
        lame_get_VBR_max_bitrate_kbps, lame_set_VBR_max_bitrate_kbps
    );
    int_param!(
        /// Lowpass cutoff in Hz, 0 = automatic, -1 = disabled
        lowpass_freq, set_lowpass_freq, lame_get_lowpassfreq, lame_set_lowpassfreq
    );
    int_param!(
        /// Highpass cutoff in Hz, 0 = automatic, -1 = disabled
        highpass_freq, set_highpass_freq, lame_get_highpassfreq, lame_set_highpassfreq
    );

    float_param!(
        /// Compression ratio; used to pick a bitrate when none is set
        compression_ratio, set_compression_ratio,
        lame_get_compression_ratio, lame_set_compression_ratio
    );
    float_param!(
        /// Input gain applied before encoding
        scale, set_scale, lame_get_scale, lame_set_scale
    );
    float_param!(
        /// Fractional VBR quality, 0.0 (best) to 9.999
        vbr_quality, set_vbr_quality, lame_get_VBR_quality, lame_set_VBR_quality
    );

    bool_param!(
        /// Enforce the VBR minimum bitrate even for silence
        vbr_hard_min, set_vbr_hard_min, lame_get_VBR_hard_min, lame_set_VBR_hard_min
    );
    bool_param!(
        /// Reserve and finalize the Xing/LAME info frame
        write_vbr_tag, set_write_vbr_tag, lame_get_bWriteVbrTag, lame_set_bWriteVbrTag
    );
    bool_param!(copyright, set_copyright, lame_get_copyright, lame_set_copyright);
    bool_param!(original, set_original, lame_get_original, lame_set_original);
    bool_param!(
        /// Add a CRC to every frame
        error_protection, set_error_protection,
        lame_get_error_protection, lame_set_error_protection
    );
    bool_param!(
        /// Compute ReplayGain while encoding
        find_replay_gain, set_find_replay_gain,
        lame_get_findReplayGain, lame_set_findReplayGain
    );

    /// Stereo mode
    pub fn mode(&self) -> Result<ChannelMode> {
        let gfp = self.handle()?;
        let native = unsafe { ffi::lame_get_mode(gfp) };
        ChannelMode::from_native(native).ok_or_else(|| LameError::InvalidParameter {
            parameter: "mode",
            value: native.to_string(),
        })
    }

    pub fn set_mode(&mut self, mode: ChannelMode) -> Result<()> {
        let gfp = self.handle()?;
        let code = unsafe { ffi::lame_set_mode(gfp, mode.to_native()) };
        self.after_set("mode", code, format_args!("{:?}", mode));
        Ok(())
    }

    /// Variable bit-rate mode
    pub fn vbr(&self) -> Result<VbrMode> {
        let gfp = self.handle()?;
        let native = unsafe { ffi::lame_get_VBR(gfp) };
        VbrMode::from_native(native).ok_or_else(|| LameError::InvalidParameter {
            parameter: "vbr",
            value: native.to_string(),
        })
    }

    pub fn set_vbr(&mut self, mode: VbrMode) -> Result<()> {
        let gfp = self.handle()?;
        let code = unsafe { ffi::lame_set_VBR(gfp, mode.to_native()) };
        self.after_set("vbr", code, format_args!("{:?}", mode));
        Ok(())
    }
}
