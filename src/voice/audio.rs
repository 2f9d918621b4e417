//! WAV decoding, channel downmix, and resampling
//!
//! The STT providers expect 16 kHz mono PCM; input clips arrive at whatever
//! rate and channel count the file or capture device produced, so everything
//! is normalized here before upload.

use std::path::Path;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::{Error, Result};

/// Sample rate expected by the STT providers (16 kHz speech)
pub const STT_SAMPLE_RATE: u32 = 16_000;

/// Read a WAV file as mono f32 samples at [`STT_SAMPLE_RATE`]
///
/// Multi-channel audio is downmixed by averaging; other sample rates are
/// resampled.
///
/// # Errors
///
/// Returns error if the file cannot be opened or decoded
pub fn read_wav(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| Error::Audio(format!("failed to open {}: {e}", path.display())))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("WAV decode error: {e}")))?,
        hound::SampleFormat::Int => {
            #[allow(clippy::cast_precision_loss)]
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| {
                    #[allow(clippy::cast_precision_loss)]
                    s.map(|v| v as f32 / scale)
                })
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Audio(format!("WAV decode error: {e}")))?
        }
    };

    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        frames = samples.len() / usize::from(spec.channels.max(1)),
        "decoded WAV"
    );

    let mono = downmix(&samples, spec.channels);
    resample(&mono, spec.sample_rate, STT_SAMPLE_RATE)
}

/// Average interleaved channels into mono
#[must_use]
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(usize::from(channels))
        .map(|frame| {
            #[allow(clippy::cast_precision_loss)]
            let width = frame.len() as f32;
            frame.iter().sum::<f32>() / width
        })
        .collect()
}

/// Resample mono audio between rates
///
/// # Errors
///
/// Returns error if the resampler cannot be constructed or fails
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        f64::from(to) / f64::from(from),
        2.0,
        params,
        samples.len(),
        1,
    )
    .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    let mut output = resampler
        .process(&[samples], None)
        .map_err(|e| Error::Audio(format!("resampling failed: {e}")))?;

    Ok(output.pop().unwrap_or_default())
}

/// Encode f32 samples as 16-bit PCM mono WAV bytes for the STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::Audio(format!("WAV encode error: {e}")))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let quantized = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| Error::Audio(format!("WAV encode error: {e}")))?;
        }

        writer
            .finalize()
            .map_err(|e| Error::Audio(format!("WAV encode error: {e}")))?;
    }

    Ok(cursor.into_inner())
}

/// Root-mean-square energy of a sample buffer
#[must_use]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum_squares / samples.len() as f32;
    mean.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn downmix_stereo_averages_frames() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix(&samples, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![0.1, -0.1, 0.2];
        assert_eq!(resample(&samples, 16_000, 16_000).unwrap(), samples);
    }

    #[test]
    fn resample_halves_length_for_double_rate() {
        let samples = vec![0.0_f32; 3200];
        let out = resample(&samples, 32_000, 16_000).unwrap();

        // sinc filtering shifts the exact count by a few frames
        let expected = 1600_i64;
        #[allow(clippy::cast_possible_wrap)]
        let actual = out.len() as i64;
        assert!(
            (actual - expected).abs() <= 32,
            "expected ~{expected} frames, got {actual}"
        );
    }

    #[test]
    fn rms_of_silence_is_zero() {
        assert!(rms(&vec![0.0; 100]).abs() < f32::EPSILON);
        assert!(rms(&[]).abs() < f32::EPSILON);
    }

    #[test]
    fn rms_of_constant_signal() {
        let samples = vec![0.5_f32; 64];
        assert!((rms(&samples) - 0.5).abs() < 1e-6);
    }
}
