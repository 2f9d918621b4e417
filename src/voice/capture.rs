//! Audio capture from microphone

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use super::audio::{self, STT_SAMPLE_RATE};
use crate::{Error, Result};

/// Captures audio from the default input device
///
/// Prefers native mono 16 kHz; when the hardware doesn't offer that, captures
/// at the device rate and resamples on the way out.
pub struct AudioCapture {
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns error if no usable input device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let config = input_config(&device)?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Record a clip of roughly `duration`, returned as 16 kHz mono samples
    ///
    /// # Errors
    ///
    /// Returns error if the capture stream fails or resampling fails
    pub async fn record(&mut self, duration: Duration) -> Result<Vec<f32>> {
        self.clear_buffer();
        self.start()?;
        tokio::time::sleep(duration).await;
        self.stop();

        let raw = self.take_buffer();
        let mono = audio::downmix(&raw, self.config.channels);
        audio::resample(&mono, self.config.sample_rate.0, STT_SAMPLE_RATE)
    }

    /// Start capturing into the internal buffer
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let buffer = Arc::clone(&self.buffer);
        let stream = device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("audio capture stopped");
        }
    }

    /// Take the captured samples, leaving the buffer empty
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Copy the captured samples without clearing
    #[must_use]
    pub fn peek_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }

    /// Clear the capture buffer
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Whether a capture stream is currently running
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// The rate the device is actually capturing at
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }
}

/// Pick a mono input config, preferring native 16 kHz
fn input_config(device: &Device) -> Result<StreamConfig> {
    let mono: Vec<_> = device
        .supported_input_configs()
        .map_err(|e| Error::Audio(e.to_string()))?
        .filter(|c| c.channels() == 1)
        .collect();

    if let Some(range) = mono.iter().find(|c| {
        c.min_sample_rate() <= SampleRate(STT_SAMPLE_RATE)
            && c.max_sample_rate() >= SampleRate(STT_SAMPLE_RATE)
    }) {
        return Ok(range
            .clone()
            .with_sample_rate(SampleRate(STT_SAMPLE_RATE))
            .config());
    }

    // no native 16 kHz support: capture at the device's top rate and resample
    mono.into_iter()
        .next()
        .map(|range| {
            let rate = range.max_sample_rate();
            range.with_sample_rate(rate).config()
        })
        .ok_or_else(|| Error::Audio("no mono input config available".to_string()))
}
