//! Session lifecycle tests
//!
//! Ordering rules between init_params, encode, flush and close, checked
//! through the public API only.

use lame_rs::{BufferSizeError, EncoderConfig, LameError, MpegVersion, Session, SessionState};
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stereo_session() -> Session {
    EncoderConfig::new()
        .sample_rate(44100)
        .channels(2)
        .bitrate(128)
        .open()
        .expect("Failed to open session")
}

#[test]
fn test_full_lifecycle() {
    init_logging();
    let mut session = Session::open().unwrap();
    assert_eq!(session.state(), SessionState::Configuring);

    session.set_in_samplerate(44100).unwrap();
    session.set_num_channels(2).unwrap();
    session.set_brate(128).unwrap();
    session.init_params().unwrap();
    assert_eq!(session.state(), SessionState::Encoding);

    let mut mp3 = session.encode_samples(&vec![0i16; 44100 * 2]).unwrap();
    mp3.extend(session.flush().unwrap());
    assert_eq!(session.state(), SessionState::Finished);
    assert!(mp3.len() > 1000, "one second at 128 kbps is ~16 KB, got {}", mp3.len());

    session.close();
    assert!(session.is_closed());
}

#[test]
fn test_encode_before_init_params() {
    init_logging();
    let mut session = Session::open().unwrap();
    assert_eq!(
        session.encode_samples(&[0i16; 4]),
        Err(LameError::NotInitialized)
    );
    assert_eq!(
        session.encode_interleaved(&[0u8; 8], 4),
        Err(LameError::NotInitialized)
    );
    assert_eq!(session.flush(), Err(LameError::NotInitialized));
    assert_eq!(session.flush_nogap(), Err(LameError::NotInitialized));
}

#[test]
fn test_init_params_twice() {
    init_logging();
    let mut session = stereo_session();
    assert_eq!(session.init_params(), Err(LameError::AlreadyInitialized));
    // The session is still usable
    assert!(session.encode_samples(&vec![0i16; 2304]).is_ok());
}

#[test]
fn test_low_sample_rate_selects_mpeg25() {
    init_logging();
    let mut session = EncoderConfig::new()
        .sample_rate(8000)
        .channels(1)
        .bitrate(16)
        .open()
        .unwrap();
    assert_eq!(session.mpeg_version().unwrap(), MpegVersion::Mpeg25);
    assert_eq!(session.framesize().unwrap(), 576);
    let mut mp3 = session.encode_samples(&vec![0i16; 8000]).unwrap();
    mp3.extend(session.flush().unwrap());
    assert!(!mp3.is_empty());
}

#[test]
fn test_flush_then_encode_rejected() {
    init_logging();
    let mut session = stereo_session();
    session.encode_samples(&vec![0i16; 4608]).unwrap();
    session.flush().unwrap();

    assert_eq!(session.encode_samples(&[0i16; 2]), Err(LameError::EndOfStream));
    assert_eq!(session.encode_interleaved(&[0u8; 4], 2), Err(LameError::EndOfStream));
    assert_eq!(
        session.encode_float(&[0.0], &[0.0], 0, 1),
        Err(LameError::EndOfStream)
    );
    assert_eq!(session.flush(), Err(LameError::EndOfStream));
}

#[test]
fn test_close_is_idempotent() {
    init_logging();
    let mut session = stereo_session();
    session.close();
    session.close();
    assert_eq!(session.encode_samples(&[0i16; 2]), Err(LameError::Closed));
    assert_eq!(session.brate(), Err(LameError::Closed));
    assert_eq!(session.init_params(), Err(LameError::Closed));
    // Drop after close must not release the handle again
    drop(session);
}

#[test]
fn test_buffer_error_leaves_encoder_untouched() {
    init_logging();
    let mut session = stereo_session();
    session.encode_samples(&vec![0i16; 44100 * 2]).unwrap();
    let frames_before = session.frame_num().unwrap();
    let buffered_before = session.mf_samples_to_encode().unwrap();

    let result = session.encode_interleaved(&[0u8; 6], 4);
    assert_eq!(
        result,
        Err(LameError::BufferSize(BufferSizeError::LengthMismatch {
            expected: 8,
            actual: 6
        }))
    );
    assert_eq!(session.frame_num().unwrap(), frames_before);
    assert_eq!(session.mf_samples_to_encode().unwrap(), buffered_before);
}

#[test]
fn test_channel_setter_after_init_keeps_layout() {
    init_logging();
    let mut session = stereo_session();
    session.set_num_channels(1).unwrap();

    let pcm = vec![1000i16; 88200];
    let first = session.encode_samples(&pcm).unwrap();
    let second = session.encode_samples(&pcm).unwrap();
    assert!(!first.is_empty() || !second.is_empty());
    assert!(session.frame_num().unwrap() > 0);

    let mut mp3 = first;
    mp3.extend(second);
    mp3.extend(session.flush().unwrap());
    // Two seconds at 128 kbps
    assert!(mp3.len() > 25_000, "got {} bytes", mp3.len());
}

#[test]
fn test_sessions_are_independent() {
    init_logging();
    let mut first = stereo_session();
    let mut second = EncoderConfig::new()
        .sample_rate(22050)
        .channels(1)
        .bitrate(64)
        .open()
        .unwrap();

    first.encode_samples(&vec![0i16; 4608]).unwrap();
    second.encode_samples(&vec![0i16; 2304]).unwrap();
    first.flush().unwrap();

    assert_eq!(first.state(), SessionState::Finished);
    assert_eq!(second.state(), SessionState::Encoding);
    assert_eq!(second.brate().unwrap(), 64);
    assert!(second.flush().is_ok());
}

proptest! {
    #[test]
    fn prop_length_mismatch_never_encodes(
        frames in 1usize..2048,
        delta in prop_oneof![Just(-2i64), Just(-1i64), Just(1i64), Just(2i64)],
    ) {
        let mut session = stereo_session();
        let sample_count = frames * 2;
        let byte_len = (sample_count as i64 * 2 + delta) as usize;
        let pcm = vec![0u8; byte_len];

        let result = session.encode_interleaved(&pcm, sample_count);
        prop_assert!(
            matches!(result, Err(LameError::BufferSize(BufferSizeError::LengthMismatch { .. }))),
            "unexpected result {:?}",
            result
        );
        prop_assert_eq!(session.frame_num().unwrap(), 0);
    }

    #[test]
    fn prop_matching_length_accepted(frames in 0usize..4096) {
        let mut session = stereo_session();
        let sample_count = frames * 2;
        let pcm = vec![0u8; sample_count * 2];
        prop_assert!(session.encode_interleaved(&pcm, sample_count).is_ok());
    }
}
