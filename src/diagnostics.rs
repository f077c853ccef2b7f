//! Serializable snapshots of a session's settings and statistics
//!
//! This module is only available when the "diagnostics" feature is enabled.

use crate::config::{ChannelMode, MpegVersion, VbrMode};
use crate::error::Result;
use crate::info::{self, LameVersion};
use crate::session::{Session, SessionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Parameter values as libmp3lame reports them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub in_samplerate: i32,
    pub out_samplerate: i32,
    pub num_channels: i32,
    pub quality: i32,
    pub brate: i32,
    pub mode: ChannelMode,
    pub vbr: VbrMode,
    pub vbr_quality: f32,
    pub vbr_mean_bitrate_kbps: i32,
    pub write_vbr_tag: bool,
    pub num_samples: u64,
}

/// Encoder counters; populated once the session is past `init_params`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub mpeg_version: Option<MpegVersion>,
    pub encoder_delay: i32,
    pub encoder_padding: i32,
    pub framesize: i32,
    pub frame_num: i32,
    pub total_frames: i32,
    pub mf_samples_to_encode: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub captured_at: DateTime<Utc>,
    pub library: LameVersion,
    pub state: SessionState,
    pub gapless: bool,
    pub parameters: ParameterSnapshot,
    pub stats: Option<StatsSnapshot>,
}

impl SessionReport {
    /// Capture the current state of `session`
    pub fn capture(session: &Session) -> Result<Self> {
        let parameters = ParameterSnapshot {
            in_samplerate: session.in_samplerate()?,
            out_samplerate: session.out_samplerate()?,
            num_channels: session.num_channels()?,
            quality: session.quality()?,
            brate: session.brate()?,
            mode: session.mode()?,
            vbr: session.vbr()?,
            vbr_quality: session.vbr_quality()?,
            vbr_mean_bitrate_kbps: session.vbr_mean_bitrate_kbps()?,
            write_vbr_tag: session.write_vbr_tag()?,
            num_samples: session.num_samples()?,
        };

        let stats = if session.is_locked() {
            Some(StatsSnapshot {
                mpeg_version: session.mpeg_version().ok(),
                encoder_delay: session.encoder_delay()?,
                encoder_padding: session.encoder_padding()?,
                framesize: session.framesize()?,
                frame_num: session.frame_num()?,
                total_frames: session.total_frames()?,
                mf_samples_to_encode: session.mf_samples_to_encode()?,
            })
        } else {
            None
        };

        Ok(Self {
            captured_at: Utc::now(),
            library: info::version_numbers().clone(),
            state: session.state(),
            gapless: session.gapless,
            parameters,
            stats,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::error::LameError;

    #[test]
    fn test_report_before_init() {
        let session = Session::open().unwrap();
        let report = SessionReport::capture(&session).unwrap();
        assert_eq!(report.state, SessionState::Configuring);
        assert!(report.stats.is_none());
        assert_eq!(report.library.major, 3);
    }

    #[test]
    fn test_report_after_encoding() {
        let mut session = EncoderConfig::new().bitrate(128).open().unwrap();
        session.encode_samples(&vec![0i16; 44100 * 2]).unwrap();
        let report = SessionReport::capture(&session).unwrap();

        assert_eq!(report.state, SessionState::Encoding);
        assert_eq!(report.parameters.brate, 128);
        assert_eq!(report.parameters.vbr, VbrMode::Off);
        let stats = report.stats.as_ref().unwrap();
        assert_eq!(stats.mpeg_version, Some(MpegVersion::Mpeg1));
        assert!(stats.frame_num > 0);
    }

    #[test]
    fn test_json_round_trip() {
        let session = EncoderConfig::new().open().unwrap();
        let report = SessionReport::capture(&session).unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"captured_at\""));
        let back: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state, report.state);
        assert_eq!(back.parameters, report.parameters);
    }

    #[test]
    fn test_save_to_file() {
        let session = Session::open().unwrap();
        let report = SessionReport::capture(&session).unwrap();
        let path = std::env::temp_dir().join("lame_rs_session_report.json");
        report.save_to_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Configuring"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_closed_session() {
        let mut session = Session::open().unwrap();
        session.close();
        assert_eq!(
            SessionReport::capture(&session).unwrap_err(),
            LameError::Closed
        );
    }
}
