//! Read-only encoder statistics and library version information

use crate::config::MpegVersion;
use crate::error::{LameError, Result};
use crate::ffi;
use crate::session::Session;
use lazy_static::lazy_static;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

/// Numeric version of the linked libmp3lame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub struct LameVersion {
    pub major: i32,
    pub minor: i32,
    pub alpha: i32,
    pub beta: i32,
    pub psy_major: i32,
    pub psy_minor: i32,
    pub psy_alpha: i32,
    pub psy_beta: i32,
    /// Compile-time features, e.g. "MMX"
    pub features: String,
}

struct VersionStrings {
    full: String,
    short: String,
    very_short: String,
    psy: String,
    url: String,
    numbers: LameVersion,
}

lazy_static! {
    static ref VERSIONS: VersionStrings = VersionStrings::load();
}

impl VersionStrings {
    fn load() -> Self {
        let mut raw = ffi::LameVersionT {
            major: 0,
            minor: 0,
            alpha: 0,
            beta: 0,
            psy_major: 0,
            psy_minor: 0,
            psy_alpha: 0,
            psy_beta: 0,
            features: std::ptr::null(),
        };
        unsafe { ffi::get_lame_version_numerical(&mut raw) };

        Self {
            full: owned(unsafe { ffi::get_lame_version() }),
            short: owned(unsafe { ffi::get_lame_short_version() }),
            very_short: owned(unsafe { ffi::get_lame_very_short_version() }),
            psy: owned(unsafe { ffi::get_psy_version() }),
            url: owned(unsafe { ffi::get_lame_url() }),
            numbers: LameVersion {
                major: raw.major,
                minor: raw.minor,
                alpha: raw.alpha,
                beta: raw.beta,
                psy_major: raw.psy_major,
                psy_minor: raw.psy_minor,
                psy_alpha: raw.psy_alpha,
                psy_beta: raw.psy_beta,
                features: owned(raw.features),
            },
        }
    }
}

fn owned(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Full version string, e.g. "3.100"
pub fn lame_version() -> &'static str {
    &VERSIONS.full
}

pub fn short_version() -> &'static str {
    &VERSIONS.short
}

pub fn very_short_version() -> &'static str {
    &VERSIONS.very_short
}

/// Version of the psychoacoustic model
pub fn psy_version() -> &'static str {
    &VERSIONS.psy
}

/// LAME project URL
pub fn url() -> &'static str {
    &VERSIONS.url
}

pub fn version_numbers() -> &'static LameVersion {
    &VERSIONS.numbers
}

macro_rules! stat {
    ($(#[$meta:meta])* $name:ident, $native:ident) => {
        $(#[$meta])*
        pub fn $name(&self) -> Result<i32> {
            let gfp = self.handle()?;
            Ok(unsafe { ffi::$native(gfp) })
        }
    };
}

impl Session {
    stat!(
        /// MPEG version ordinal: 0 = MPEG-2, 1 = MPEG-1, 2 = MPEG-2.5
        version, lame_get_version
    );
    stat!(
        /// Samples of delay the encoder adds at the start of the stream
        encoder_delay, lame_get_encoder_delay
    );
    stat!(
        /// Samples of padding appended at the end; final after `flush`
        encoder_padding, lame_get_encoder_padding
    );
    stat!(
        /// Samples per channel in one frame
        framesize, lame_get_framesize
    );
    stat!(
        /// Samples buffered inside the encoder and not yet encoded
        mf_samples_to_encode, lame_get_mf_samples_to_encode
    );
    stat!(
        /// Bytes of encoded data held back by the encoder
        size_mp3buffer, lame_get_size_mp3buffer
    );
    stat!(
        /// Frames encoded so far
        frame_num, lame_get_frameNum
    );
    stat!(
        /// Estimated total frames, from `num_samples`
        total_frames, lame_get_totalframes
    );

    /// Typed MPEG version; meaningful after `init_params`
    pub fn mpeg_version(&self) -> Result<MpegVersion> {
        let native: c_int = self.version()?;
        MpegVersion::from_native(native).ok_or_else(|| LameError::InvalidParameter {
            parameter: "version",
            value: native.to_string(),
        })
    }
}
