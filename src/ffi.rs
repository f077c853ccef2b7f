//! The subset of libmp3lame used by this crate.
//!
//! Declarations come from `mp3lame-sys`, which also builds and links the
//! vendored LAME 3.100. Only the names are adapted here.

use mp3lame_sys::{vbr_mode, MPEG_mode};
use std::os::raw::c_int;

pub use mp3lame_sys::lame_global_flags as LameGlobalFlags;
pub use mp3lame_sys::lame_version_t as LameVersionT;

// Lifecycle
pub use mp3lame_sys::{lame_close, lame_init, lame_init_bitstream, lame_init_params};

// Scalar parameters
pub use mp3lame_sys::{
    lame_get_VBR, lame_get_VBR_hard_min, lame_get_VBR_max_bitrate_kbps,
    lame_get_VBR_mean_bitrate_kbps, lame_get_VBR_min_bitrate_kbps, lame_get_VBR_q,
    lame_get_VBR_quality, lame_get_bWriteVbrTag, lame_get_brate, lame_get_compression_ratio,
    lame_get_copyright, lame_get_error_protection, lame_get_findReplayGain,
    lame_get_highpassfreq, lame_get_in_samplerate, lame_get_lowpassfreq, lame_get_mode,
    lame_get_num_channels, lame_get_num_samples, lame_get_original, lame_get_out_samplerate,
    lame_get_quality, lame_get_scale, lame_set_VBR, lame_set_VBR_hard_min,
    lame_set_VBR_max_bitrate_kbps, lame_set_VBR_mean_bitrate_kbps,
    lame_set_VBR_min_bitrate_kbps, lame_set_VBR_q, lame_set_VBR_quality, lame_set_bWriteVbrTag,
    lame_set_brate, lame_set_compression_ratio, lame_set_copyright, lame_set_error_protection,
    lame_set_findReplayGain, lame_set_highpassfreq, lame_set_in_samplerate,
    lame_set_lowpassfreq, lame_set_mode, lame_set_num_channels, lame_set_num_samples,
    lame_set_original, lame_set_out_samplerate, lame_set_quality, lame_set_scale,
};

// Encoding
pub use mp3lame_sys::{
    lame_encode_buffer, lame_encode_buffer_float, lame_encode_buffer_interleaved,
    lame_encode_flush, lame_encode_flush_nogap, lame_get_lametag_frame,
};

// ID3 tags
pub use mp3lame_sys::{
    id3tag_add_v2, id3tag_genre_list, id3tag_init, id3tag_set_album, id3tag_set_artist,
    id3tag_set_comment, id3tag_set_genre, id3tag_set_title, id3tag_set_track, id3tag_set_year,
    id3tag_v1_only, id3tag_v2_only,
};

// Statistics
pub use mp3lame_sys::{
    lame_get_encoder_delay, lame_get_encoder_padding, lame_get_frameNum, lame_get_framesize,
    lame_get_mf_samples_to_encode, lame_get_size_mp3buffer, lame_get_totalframes,
    lame_get_version,
};

// Process-wide version strings
pub use mp3lame_sys::{
    get_lame_short_version, get_lame_url, get_lame_version, get_lame_version_numerical,
    get_lame_very_short_version, get_psy_version,
};

// vbr_mode
pub const VBR_OFF: c_int = vbr_mode::vbr_off;
pub const VBR_MT: c_int = vbr_mode::vbr_mt;
pub const VBR_RH: c_int = vbr_mode::vbr_rh;
pub const VBR_ABR: c_int = vbr_mode::vbr_abr;
pub const VBR_MTRH: c_int = vbr_mode::vbr_mtrh;

// MPEG_mode
pub const STEREO: c_int = MPEG_mode::STEREO;
pub const JOINT_STEREO: c_int = MPEG_mode::JOINT_STEREO;
pub const DUAL_CHANNEL: c_int = MPEG_mode::DUAL_CHANNEL;
pub const MONO: c_int = MPEG_mode::MONO;
pub const NOT_SET: c_int = MPEG_mode::NOT_SET;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_ordinals() {
        assert_eq!(
            [VBR_OFF, VBR_MT, VBR_RH, VBR_ABR, VBR_MTRH],
            [0, 1, 2, 3, 4]
        );
        assert_eq!(
            [STEREO, JOINT_STEREO, DUAL_CHANNEL, MONO, NOT_SET],
            [0, 1, 2, 3, 4]
        );
    }
}
