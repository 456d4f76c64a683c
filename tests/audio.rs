use approx::assert_abs_diff_eq;
use song_reconstructor_core::pipeline::default_output_path;
use song_reconstructor_core::{
    read_audio, reconstruct_file, write_audio, AudioData, ReconstructOptions, SampleEncoding,
};
use std::f32::consts::PI;
use std::path::Path;
use tempfile::tempdir;

fn tone(frames: usize, channels: u16, sr: u32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sr as f32;
        samples.push((2.0 * PI * 440.0 * t).sin() * 0.2);
        if channels == 2 {
            samples.push((2.0 * PI * 660.0 * t).sin() * 0.2);
        }
    }
    samples
}

#[test]
fn int16_wav_round_trip_keeps_layout() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("in.wav");
    let audio = AudioData {
        samples: tone(2_000, 2, 8_000),
        sample_rate: 8_000,
        channels: 2,
        encoding: SampleEncoding::Int16,
    };
    write_audio(&path, &audio).unwrap();

    let back = read_audio(&path).unwrap();
    assert_eq!(back.sample_rate, 8_000);
    assert_eq!(back.channels, 2);
    assert_eq!(back.encoding, SampleEncoding::Int16);
    assert_eq!(back.samples.len(), audio.samples.len());
    for (a, b) in audio.samples.iter().zip(&back.samples) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1.0 / 16_384.0);
    }
}

#[test]
fn float_wav_is_written_as_float() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("f.wav");
    let audio = AudioData {
        samples: tone(500, 1, 8_000),
        sample_rate: 8_000,
        channels: 1,
        encoding: SampleEncoding::Float32,
    };
    write_audio(&path, &audio).unwrap();

    let r = hound::WavReader::open(&path).unwrap();
    assert_eq!(r.spec().sample_format, hound::SampleFormat::Float);
    assert_eq!(r.spec().bits_per_sample, 32);
    let samples: Vec<f32> = r.into_samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, audio.samples);
}

#[test]
fn out_of_range_samples_are_clamped() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("loud.wav");
    let audio = AudioData {
        samples: vec![1.5, -1.5, 0.0, 1.0],
        sample_rate: 8_000,
        channels: 2,
        encoding: SampleEncoding::Int16,
    };
    write_audio(&path, &audio).unwrap();

    let samples: Vec<i16> = hound::WavReader::open(&path)
        .unwrap()
        .into_samples::<i16>()
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(samples, vec![i16::MAX, i16::MIN, 0, i16::MAX]);
}

#[test]
fn reconstruct_file_writes_same_layout() {
    let tmp = tempdir().unwrap();
    let sr = 8_000u32;

    for channels in [1u16, 2] {
        let input = tmp.path().join(format!("in_{channels}.wav"));
        let output = tmp.path().join(format!("out_{channels}.wav"));
        write_audio(
            &input,
            &AudioData {
                samples: tone(4_000, channels, sr),
                sample_rate: sr,
                channels,
                encoding: SampleEncoding::Int16,
            },
        )
        .unwrap();

        let opts = ReconstructOptions {
            segment_duration: 0.05,
            crossover_samples: 50,
            seed: Some(1),
            ..ReconstructOptions::default()
        };
        let result = reconstruct_file(&input, &output, &opts).unwrap();
        assert_eq!(result.segment_count, 10);

        let r = hound::WavReader::open(&output).unwrap();
        assert_eq!(r.spec().channels, channels);
        assert_eq!(r.spec().sample_rate, sr);
        assert_eq!(r.spec().bits_per_sample, 16);
        assert_eq!(r.duration() as usize, result.waveform.len());
    }
}

#[test]
fn missing_input_is_an_error() {
    let tmp = tempdir().unwrap();
    let err = reconstruct_file(
        &tmp.path().join("nope.wav"),
        &tmp.path().join("out.wav"),
        &ReconstructOptions::default(),
    );
    assert!(err.is_err());
}

#[test]
fn default_output_name_mentions_duration() {
    let out = default_output_path(Path::new("music/song.wav"), 0.1);
    assert_eq!(out, Path::new("music/song_0.1_reconstructed.wav"));
}
