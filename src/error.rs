//! Error types for the LAME bindings
//!
//! Every negative status returned by libmp3lame is turned into a
//! [`LameError`] at the call site; raw codes never leave this crate except
//! as the payload of `InitParams` and `UnknownEncode`.

use std::os::raw::c_int;
use thiserror::Error;

/// Main error type for the LAME bindings
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LameError {
    /// libmp3lame could not allocate an encoder context, or a scratch
    /// buffer could not be reserved
    #[error("Memory allocation error")]
    Allocation,

    /// The session has been closed
    #[error("Session used after close")]
    Closed,

    /// `lame_init_params` rejected the configuration
    #[error("init_params rejected the configuration (code {0})")]
    InitParams(i32),

    /// `init_params` was already called on this session
    #[error("init_params has already been called on this session")]
    AlreadyInitialized,

    /// Encode or flush attempted before `init_params` succeeded
    #[error("Encoder used before init_params")]
    NotInitialized,

    /// Internal psychoacoustic model failure
    #[error("Psychoacoustic model failure")]
    Psychoacoustic,

    /// Unspecified native encode failure
    #[error("Unknown encode error (code {0})")]
    UnknownEncode(i32),

    /// The stream was terminated with `flush`
    #[error("Stream already flushed")]
    EndOfStream,

    /// `flush` and `flush_nogap` were mixed on one session
    #[error("flush and flush_nogap cannot be mixed on one session")]
    FlushConflict,

    /// The operation needs a flushed stream
    #[error("Stream has not been flushed yet")]
    NotFinished,

    /// Input buffer validation errors
    #[error("Buffer size error: {0}")]
    BufferSize(#[from] BufferSizeError),

    /// The entry point does not match the session's channel count
    #[error("Entry point expects {expected} channel(s), session is configured for {actual}")]
    ChannelLayout { expected: i32, actual: i32 },

    /// A value could not be represented in the native parameter type
    #[error("Invalid value {value} for parameter {parameter}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },

    /// ID3 tag errors
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// A diagnostics report could not be serialized
    #[cfg(feature = "diagnostics")]
    #[error("Report serialization failed: {0}")]
    Serialization(String),

    /// The blocking pool shut down before the call ran
    #[cfg(feature = "tokio")]
    #[error("Blocking worker unavailable")]
    WorkerUnavailable,
}

/// Input buffer validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferSizeError {
    /// Byte length does not match the declared sample count
    #[error("expected {expected} bytes for the declared sample count, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Sample count does not split evenly across channels
    #[error("{samples} samples cannot be split across {channels} channels")]
    UnevenChannels { samples: usize, channels: usize },

    /// Requested range lies outside the channel buffer
    #[error("range {offset}..{offset}+{count} exceeds channel length {len}")]
    OutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },

    /// Sample count or output capacity does not fit a C int
    #[error("{0} samples exceed the native call limit")]
    TooLarge(usize),
}

/// ID3 tag errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Text contains an interior NUL byte
    #[error("tag text for {0} contains a NUL byte")]
    InteriorNul(&'static str),

    /// Numeric genre outside the ID3v1 table
    #[error("genre number {0} is out of range")]
    GenreOutOfRange(String),
}

impl LameError {
    /// Translate a negative status from an encode or flush call
    pub fn from_encode_code(code: c_int) -> Self {
        match code {
            -3 => LameError::NotInitialized,
            -4 => LameError::Psychoacoustic,
            other => LameError::UnknownEncode(other),
        }
    }

    /// Translate a negative status from `lame_init_params`
    pub fn from_init_code(code: c_int) -> Self {
        LameError::InitParams(code)
    }

    /// Whether this error reports misuse of the API rather than a native
    /// failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            LameError::Closed
                | LameError::AlreadyInitialized
                | LameError::NotInitialized
                | LameError::EndOfStream
                | LameError::FlushConflict
                | LameError::NotFinished
                | LameError::BufferSize(_)
                | LameError::ChannelLayout { .. }
                | LameError::InvalidParameter { .. }
                | LameError::Tag(_)
        )
    }
}

impl From<std::collections::TryReserveError> for LameError {
    fn from(_: std::collections::TryReserveError) -> Self {
        LameError::Allocation
    }
}

#[cfg(feature = "diagnostics")]
impl From<serde_json::Error> for LameError {
    fn from(err: serde_json::Error) -> Self {
        LameError::Serialization(err.to_string())
    }
}

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, LameError>;

/// Turn an encode/flush return value into a byte count
pub(crate) fn check_encode(code: c_int) -> Result<usize> {
    if code < 0 {
        Err(LameError::from_encode_code(code))
    } else {
        Ok(code as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_code_translation() {
        assert_eq!(LameError::from_encode_code(-3), LameError::NotInitialized);
        assert_eq!(LameError::from_encode_code(-4), LameError::Psychoacoustic);
        assert_eq!(LameError::from_encode_code(-1), LameError::UnknownEncode(-1));
        assert_eq!(LameError::from_encode_code(-2), LameError::UnknownEncode(-2));
        assert_eq!(LameError::from_encode_code(-99), LameError::UnknownEncode(-99));
    }

    #[test]
    fn test_init_code_translation() {
        assert_eq!(LameError::from_init_code(-1), LameError::InitParams(-1));
    }

    #[test]
    fn test_check_encode() {
        assert_eq!(check_encode(0), Ok(0));
        assert_eq!(check_encode(417), Ok(417));
        assert_eq!(check_encode(-3), Err(LameError::NotInitialized));
    }

    #[test]
    fn test_usage_classification() {
        assert!(LameError::Closed.is_usage_error());
        assert!(LameError::BufferSize(BufferSizeError::TooLarge(1)).is_usage_error());
        assert!(!LameError::Psychoacoustic.is_usage_error());
        assert!(!LameError::InitParams(-1).is_usage_error());
        assert!(!LameError::Allocation.is_usage_error());
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    fn test_serialization_is_not_usage() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err = LameError::from(json_err);
        assert!(matches!(err, LameError::Serialization(_)));
        assert!(!err.is_usage_error());
    }

    #[test]
    fn test_error_display() {
        let err = LameError::UnknownEncode(-7);
        assert!(format!("{}", err).contains("-7"));

        let err: LameError = BufferSizeError::LengthMismatch {
            expected: 8,
            actual: 6,
        }
        .into();
        assert!(format!("{}", err).contains("expected 8 bytes"));

        let err: LameError = TagError::InteriorNul("title").into();
        assert!(format!("{}", err).contains("title"));
    }

    #[test]
    fn test_try_reserve_maps_to_allocation() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.try_reserve_exact(usize::MAX).unwrap_err();
        assert_eq!(LameError::from(err), LameError::Allocation);
    }
}
