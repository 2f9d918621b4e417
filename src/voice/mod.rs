//! Voice processing module
//!
//! Handles audio capture and playback plus the STT/TTS API clients.
//! The conversation loop that ties them together lives in `session`.

pub mod audio;
mod capture;
mod playback;
mod stt;
mod tts;

pub use audio::{STT_SAMPLE_RATE, read_wav, samples_to_wav};
pub use capture::AudioCapture;
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
