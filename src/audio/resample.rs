//! Channel downmix and sample-rate conversion.
//!
//! Whisper wants **16 kHz mono `f32`** audio; capture devices rarely deliver
//! that natively.  [`downmix_to_mono`] averages interleaved channels and
//! [`resample`] converts between rates with linear interpolation, which is
//! plenty for speech fed to an STT model.

// ---------------------------------------------------------------------------
// downmix_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging channels.
///
/// The output length is `samples.len() / channels`.  Mono input is returned
/// as-is (owned); zero channels yields an empty vector.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` to `target_rate` Hz using
/// linear interpolation.
///
/// Equal rates are a no-op (the input is cloned).  The output length is
/// approximately `samples.len() * target_rate / source_rate`.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix_to_mono ---------------------------------------------------

    #[test]
    fn mono_passthrough() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&input, 1), input);
    }

    #[test]
    fn stereo_averages_frames() {
        let input = vec![1.0_f32, -1.0, 0.5, 0.5];
        let out = downmix_to_mono(&input, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_channels_is_empty() {
        assert!(downmix_to_mono(&[1.0_f32, 2.0], 0).is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn equal_rates_is_noop() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        let out = resample(&input, 16_000, 16_000);
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }

    #[test]
    fn downsample_48k_to_16k_length() {
        // 480 samples @ 48 kHz = 10 ms → 160 samples @ 16 kHz
        let out = resample(&vec![0.5_f32; 480], 48_000, 16_000);
        assert_eq!(out.len(), 160);
    }

    #[test]
    fn downsample_44100_to_16k_length() {
        let out = resample(&vec![0.0_f32; 44_100], 44_100, 16_000);
        assert!(
            out.len().abs_diff(16_000) <= 1,
            "expected ~16000, got {}",
            out.len()
        );
    }

    #[test]
    fn dc_signal_keeps_amplitude() {
        let out = resample(&vec![0.5_f32; 480], 48_000, 16_000);
        for &s in &out {
            assert!((s - 0.5).abs() < 1e-5, "amplitude drift: {s}");
        }
    }

    #[test]
    fn upsample_doubles_length() {
        let out = resample(&vec![0.0_f32; 80], 8_000, 16_000);
        assert_eq!(out.len(), 160);
    }
}
