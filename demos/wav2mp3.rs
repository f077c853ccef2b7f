//! WAV to MP3 conversion example
//!
//! Reads a 16-bit integer or 32-bit float WAV file with hound, encodes it
//! in chunks and rewrites the leading info frame once the stream is done.
//!
//! Usage: cargo run --example wav2mp3 <input.wav> <output.mp3> [bitrate|vN]

use lame_rs::{EncoderConfig, Session, VbrMode};
use std::env;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

const CHUNK_FRAMES: usize = 8192;

enum Rate {
    Cbr(i32),
    Vbr(f32),
}

fn parse_rate(arg: Option<&String>) -> Result<Rate, Box<dyn std::error::Error>> {
    match arg {
        None => Ok(Rate::Cbr(192)),
        Some(s) if s.starts_with('v') => Ok(Rate::Vbr(s[1..].parse()?)),
        Some(s) => Ok(Rate::Cbr(s.parse()?)),
    }
}

fn encode_int(
    session: &mut Session,
    reader: &mut hound::WavReader<std::io::BufReader<File>>,
    channels: usize,
    out: &mut File,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    for chunk in samples.chunks(CHUNK_FRAMES * channels) {
        out.write_all(&session.encode_samples(chunk)?)?;
    }
    Ok(())
}

fn encode_float(
    session: &mut Session,
    reader: &mut hound::WavReader<std::io::BufReader<File>>,
    channels: usize,
    out: &mut File,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples: Vec<f32> = reader.samples::<f32>().collect::<Result<_, _>>()?;
    let planes: Vec<Vec<f64>> = (0..channels)
        .map(|ch| samples.iter().skip(ch).step_by(channels).map(|&s| s as f64).collect())
        .collect();
    let frames = planes[0].len();

    let mut offset = 0;
    while offset < frames {
        let count = CHUNK_FRAMES.min(frames - offset);
        let mp3 = if channels == 1 {
            session.encode_float_mono(&planes[0], offset, count)?
        } else {
            session.encode_float(&planes[0], &planes[1], offset, count)?
        };
        out.write_all(&mp3)?;
        offset += count;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input.wav> <output.mp3> [bitrate|vN]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} input.wav output.mp3 128", args[0]);
        eprintln!("  {} input.wav output.mp3 v2", args[0]);
        std::process::exit(1);
    }

    let mut reader = hound::WavReader::open(&args[1])?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 || channels > 2 {
        return Err(format!("{} channels are not supported", channels).into());
    }

    let mut config = EncoderConfig::new()
        .sample_rate(spec.sample_rate as i32)
        .channels(channels as i32)
        .quality(2);
    config = match parse_rate(args.get(3))? {
        Rate::Cbr(kbps) => config.bitrate(kbps),
        Rate::Vbr(quality) => config.vbr(VbrMode::Mtrh, quality),
    };

    let mut session = Session::open()?;
    config.apply(&mut session)?;
    session.set_num_samples(reader.duration() as u64)?;
    let title = std::path::Path::new(&args[1])
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let _ = session.set_title(title)?;
    session.init_params()?;

    println!(
        "Encoding {} ({} Hz, {} ch) with {}",
        args[1],
        spec.sample_rate,
        channels,
        lame_rs::very_short_version()
    );

    let mut out = File::create(&args[2])?;
    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => encode_int(&mut session, &mut reader, channels, &mut out)?,
        (hound::SampleFormat::Float, 32) => {
            encode_float(&mut session, &mut reader, channels, &mut out)?
        }
        (format, bits) => {
            return Err(format!("unsupported sample format {:?}/{} bits", format, bits).into())
        }
    }
    out.write_all(&session.flush()?)?;

    let tag = session.lametag_frame()?;
    if !tag.is_empty() {
        // The placeholder frame follows the ID3v2 tag, if any
        let id3v2_len = id3v2_size(&args[2])?;
        out.seek(SeekFrom::Start(id3v2_len))?;
        out.write_all(&tag)?;
    }

    println!(
        "Wrote {} ({} frames, delay {} / padding {} samples)",
        args[2],
        session.frame_num()?,
        session.encoder_delay()?,
        session.encoder_padding()?
    );
    Ok(())
}

/// Size of a leading ID3v2 tag, 0 when absent
fn id3v2_size(path: &str) -> std::io::Result<u64> {
    let mut head = [0u8; 10];
    if File::open(path)?.read_exact(&mut head).is_err() || &head[..3] != b"ID3" {
        return Ok(0);
    }
    let size = head[6..10]
        .iter()
        .fold(0u64, |acc, &b| (acc << 7) | (b & 0x7f) as u64);
    Ok(size + 10)
}
