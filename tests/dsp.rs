use approx::assert_abs_diff_eq;
use num_complex::Complex32;
use song_reconstructor_core::core::dsp::{l1_distance, linear_ramps, spectral_features};
use song_reconstructor_core::types::to_planar_stereo;
use song_reconstructor_core::ReconstructError;
use std::f32::consts::PI;

#[test]
fn to_planar_stereo_mono_duplicates_channel() {
    let mono = vec![0.1, -0.2, 0.3, -0.4];
    let planar = to_planar_stereo(&mono, 1);
    assert_eq!(planar.len(), mono.len());
    for i in 0..mono.len() {
        assert_abs_diff_eq!(planar[i][0], mono[i], epsilon = 1e-7);
        assert_abs_diff_eq!(planar[i][1], mono[i], epsilon = 1e-7);
    }
}

#[test]
fn to_planar_stereo_interleaved_ok() {
    let stereo_inter = vec![0.1, 0.2, -0.3, -0.4, 1.0, 0.5, 0.0, -1.0];
    let planar = to_planar_stereo(&stereo_inter, 2);
    assert_eq!(planar.len(), stereo_inter.len() / 2);
    for (i, frame) in planar.iter().enumerate() {
        assert_abs_diff_eq!(frame[0], stereo_inter[2 * i], epsilon = 1e-7);
        assert_abs_diff_eq!(frame[1], stereo_inter[2 * i + 1], epsilon = 1e-7);
    }
}

#[test]
fn feature_keeps_non_negative_frequencies_only() {
    let even = spectral_features(&[vec![0.0; 100], vec![0.0; 100]]).unwrap();
    assert!(even.iter().all(|f| f.len() == 51));

    let odd = spectral_features(&[vec![0.0; 101]]).unwrap();
    assert_eq!(odd[0].len(), 51);
}

#[test]
fn constant_segment_puts_unscaled_energy_in_dc() {
    let features = spectral_features(&[vec![0.5; 64]]).unwrap();
    assert_abs_diff_eq!(features[0][0].re, 32.0, epsilon = 1e-4);
    for bin in &features[0][1..] {
        assert_abs_diff_eq!(bin.norm(), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn sinusoid_peaks_at_its_bin() {
    let n = 64;
    let tone: Vec<f32> = (0..n)
        .map(|t| (2.0 * PI * 4.0 * t as f32 / n as f32).sin())
        .collect();
    let features = spectral_features(&[tone]).unwrap();
    let mags: Vec<f32> = features[0].iter().map(|c| c.norm()).collect();

    let peak = mags
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 4);
    assert_abs_diff_eq!(mags[4], 32.0, epsilon = 1e-3);
}

#[test]
fn mismatched_segment_lengths_are_an_invariant_violation() {
    let err = spectral_features(&[vec![0.0; 10], vec![0.0; 11]]).unwrap_err();
    assert!(matches!(err, ReconstructError::InvariantViolation(_)), "{err}");
}

#[test]
fn no_segments_no_features() {
    assert!(spectral_features(&[]).unwrap().is_empty());
}

#[test]
fn l1_distance_sums_complex_magnitudes() {
    let a = [Complex32::new(1.0, 0.0), Complex32::new(0.0, 3.0)];
    let b = [Complex32::new(0.0, 0.0), Complex32::new(0.0, -1.0)];
    assert_abs_diff_eq!(l1_distance(&a, &b), 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(l1_distance(&b, &a), 5.0, epsilon = 1e-9);
    assert_eq!(l1_distance(&a, &a), 0.0);
}

#[test]
fn ramps_are_complementary() {
    let (fade_in, fade_out) = linear_ramps(200);
    assert_eq!(fade_in.len(), 200);
    assert_eq!(fade_out.len(), 200);
    assert_eq!(fade_in[0], 0.0);
    assert_eq!(fade_out[0], 1.0);
    for k in 0..200 {
        assert_abs_diff_eq!(fade_in[k] + fade_out[k], 1.0, epsilon = 1e-6);
        if k > 0 {
            assert!(fade_in[k] > fade_in[k - 1]);
        }
    }
}
