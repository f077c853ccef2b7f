//! # lame-rs
//!
//! Safe bindings to the LAME MP3 encoder (libmp3lame).
//!
//! A [`Session`] owns one native encoder. Parameters are set first, then
//! [`Session::init_params`] locks them, PCM is fed through the `encode_*`
//! calls and the stream is closed with [`Session::flush`] (or
//! [`Session::flush_nogap`] between gapless tracks). Each call returns the
//! MP3 bytes produced so far as an owned `Vec<u8>`.
//!
//! ```no_run
//! use lame_rs::{EncoderConfig, Result};
//!
//! fn encode(pcm: &[i16]) -> Result<Vec<u8>> {
//!     let mut session = EncoderConfig::new()
//!         .sample_rate(44100)
//!         .channels(2)
//!         .bitrate(192)
//!         .open()?;
//!     let mut mp3 = session.encode_samples(pcm)?;
//!     mp3.extend(session.flush()?);
//!     Ok(mp3)
//! }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub(crate) mod ffi;
pub mod info;
pub mod params;
pub mod pcm_utils;
pub mod session;
pub mod tags;

#[cfg(feature = "tokio")]
pub mod blocking;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

pub use config::{ChannelMode, EncoderConfig, MpegVersion, VbrMode};
pub use error::{BufferSizeError, LameError, Result, TagError};
pub use info::{
    lame_version, psy_version, short_version, url, version_numbers, very_short_version,
    LameVersion,
};
pub use session::{Session, SessionState};
pub use tags::{TagLayout, TagStatus};

#[cfg(feature = "tokio")]
pub use blocking::AsyncSession;

#[cfg(feature = "diagnostics")]
pub use diagnostics::SessionReport;
