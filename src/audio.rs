use std::{fs::File, path::Path};

use anyhow::Context;
use hound::{SampleFormat, WavSpec, WavWriter};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{
        CodecType, DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F32LE,
        CODEC_TYPE_PCM_F64BE, CODEC_TYPE_PCM_F64LE,
    },
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
    sample::SampleFormat as SymphoniaFormat,
};
use symphonia::default::{get_codecs, get_probe};

use crate::{
    error::Result,
    types::{AudioData, SampleEncoding},
};

const FLOAT_CODECS: [CodecType; 4] = [
    CODEC_TYPE_PCM_F32LE,
    CODEC_TYPE_PCM_F32BE,
    CODEC_TYPE_PCM_F64LE,
    CODEC_TYPE_PCM_F64BE,
];

fn encoding_of(
    codec: CodecType,
    format: Option<SymphoniaFormat>,
    bits: Option<u32>,
) -> SampleEncoding {
    if FLOAT_CODECS.contains(&codec) {
        return SampleEncoding::Float32;
    }
    match (format, bits) {
        (Some(SymphoniaFormat::F32 | SymphoniaFormat::F64), _) => SampleEncoding::Float32,
        (_, Some(24)) => SampleEncoding::Int24,
        (_, Some(32)) => SampleEncoding::Int32,
        _ => SampleEncoding::Int16,
    }
}

pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path: &Path = path.as_ref();

    let file: File =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let encoding = encoding_of(
        track.codec_params.codec,
        track.codec_params.sample_format,
        track.codec_params.bits_per_sample,
    );
    let mut sample_rate: u32 = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels: u16 = track
        .codec_params
        .channels
        .map_or(0, |c| c.count() as u16);

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(anyhow::Error::from(e).into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(anyhow::Error::from(e).into()),
        };

        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    log::info!(
        "Read audio: sample_rate={}, channels={}, samples={}, encoding={:?}",
        sample_rate,
        channels,
        samples.len(),
        encoding
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        encoding,
    })
}

pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioData) -> Result<()> {
    let (bits_per_sample, sample_format) = match audio.encoding {
        SampleEncoding::Int16 => (16, SampleFormat::Int),
        SampleEncoding::Int24 => (24, SampleFormat::Int),
        SampleEncoding::Int32 => (32, SampleFormat::Int),
        SampleEncoding::Float32 => (32, SampleFormat::Float),
    };
    let spec = WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    match audio.encoding {
        SampleEncoding::Float32 => {
            for &sample in &audio.samples {
                writer.write_sample(sample)?;
            }
        }
        SampleEncoding::Int16 => {
            for &sample in &audio.samples {
                writer.write_sample(quantize(sample, 16) as i16)?;
            }
        }
        SampleEncoding::Int24 | SampleEncoding::Int32 => {
            for &sample in &audio.samples {
                writer.write_sample(quantize(sample, bits_per_sample))?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Scales a `[-1, 1]` float to a signed integer of `bits` width, clamping
/// anything the crossfades pushed out of range.
fn quantize(sample: f32, bits: u16) -> i32 {
    let scale = (1i64 << (bits - 1)) as f64;
    (sample as f64 * scale).round().clamp(-scale, scale - 1.0) as i32
}
