use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded PCM, flattened to mono at 16-bit full scale.
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

// Symphonia normalizes to [-1, 1]; the engine quantizes magnitudes to the
// nearest 10, a step sized for raw integer PCM, so rescale on the way out.
const PCM_SCALE: f32 = 32767.0;

/// Decode an uncompressed PCM file into a flat mono sample buffer.
pub fn decode_pcm(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found")?;
    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, *decoded.spec());
        buf.copy_interleaved_ref(decoded);

        // Flatten interleaved frames to mono by channel averaging.
        for frame in buf.samples().chunks(channels.max(1)) {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            samples.push(mono * PCM_SCALE);
        }
    }

    log::info!(
        "Decoded {}: {} samples, {}Hz, {:.1}s",
        path.display(),
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    Ok(AudioData {
        samples,
        sample_rate,
    })
}
