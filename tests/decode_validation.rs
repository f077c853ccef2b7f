//! Decoder validation tests
//!
//! Encoded streams are decoded back with symphonia to check that the
//! output is a valid MP3 stream carrying the expected audio.

use lame_rs::{EncoderConfig, Session, VbrMode};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

struct Decoded {
    sample_rate: u32,
    channels: usize,
    samples: Vec<f32>,
}

fn decode(mp3: Vec<u8>) -> Decoded {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(mp3)), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .expect("Failed to probe MP3 stream");
    let mut format = probed.format;
    let track = format.default_track().expect("No audio track");
    let track_id = track.id;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .expect("Failed to create decoder");

    let mut decoded = Decoded {
        sample_rate: 0,
        channels: 0,
        samples: Vec::new(),
    };
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => panic!("Failed to read packet: {}", e),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(audio) => {
                let spec = *audio.spec();
                let mut buf = SampleBuffer::<f32>::new(audio.capacity() as u64, spec);
                buf.copy_interleaved_ref(audio);
                decoded.sample_rate = spec.rate;
                decoded.channels = spec.channels.count();
                decoded.samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => panic!("Failed to decode packet: {}", e),
        }
    }
    decoded
}

fn encode_all(session: &mut Session, pcm: &[i16]) -> Vec<u8> {
    let mut mp3 = session.encode_samples(pcm).unwrap();
    mp3.extend(session.flush().unwrap());
    mp3
}

fn rms(samples: &[f32]) -> f64 {
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len().max(1) as f64).sqrt()
}

#[test]
fn test_silence_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EncoderConfig::new()
        .sample_rate(44100)
        .channels(2)
        .bitrate(128)
        .open()
        .unwrap();
    let mp3 = encode_all(&mut session, &vec![0i16; 44100 * 2]);

    let decoded = decode(mp3);
    assert_eq!(decoded.sample_rate, 44100);
    assert_eq!(decoded.channels, 2);
    // At least the encoded second comes back, plus encoder delay and padding
    assert!(decoded.samples.len() >= 44100 * 2);
    assert!(
        decoded.samples.iter().all(|s| s.abs() < 1e-3),
        "silence decoded to non-silent samples"
    );
}

#[test]
fn test_sine_level_preserved() {
    let _ = env_logger::builder().is_test(true).try_init();
    let frames = 44100;
    let pcm: Vec<i16> = (0..frames)
        .map(|i| {
            let t = i as f64 / 44100.0;
            ((t * 1000.0 * 2.0 * std::f64::consts::PI).sin() * 16384.0) as i16
        })
        .collect();
    let input_rms = rms(&pcm.iter().map(|&s| s as f32 / 32768.0).collect::<Vec<_>>());

    let mut session = EncoderConfig::new()
        .sample_rate(44100)
        .channels(1)
        .bitrate(128)
        .open()
        .unwrap();
    let decoded = decode(encode_all(&mut session, &pcm));

    assert_eq!(decoded.channels, 1);
    let output_rms = rms(&decoded.samples);
    let ratio = output_rms / input_rms;
    assert!(
        (0.8..1.2).contains(&ratio),
        "level changed: input rms {:.4}, output rms {:.4}",
        input_rms,
        output_rms
    );
}

#[test]
fn test_vbr_stream_decodes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EncoderConfig::new()
        .sample_rate(48000)
        .channels(2)
        .vbr(VbrMode::Mtrh, 2.0)
        .open()
        .unwrap();
    let mp3 = encode_all(&mut session, &vec![0i16; 48000 * 2]);

    let decoded = decode(mp3);
    assert_eq!(decoded.sample_rate, 48000);
    assert_eq!(decoded.channels, 2);
    assert!(!decoded.samples.is_empty());
}

#[test]
fn test_resampled_output_rate() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EncoderConfig::new()
        .sample_rate(44100)
        .out_sample_rate(22050)
        .channels(2)
        .bitrate(64)
        .open()
        .unwrap();
    let mp3 = encode_all(&mut session, &vec![0i16; 44100 * 2]);

    let decoded = decode(mp3);
    assert_eq!(decoded.sample_rate, 22050);
}
