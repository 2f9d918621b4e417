//! Conversation session
//!
//! Wires capture → STT → dispatch → TTS → playback. Every collaborator is
//! constructed once at startup and borrowed from here, so there is no global
//! state and tests can build the pieces directly.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::dispatch::{DispatchPolicy, Dispatcher};
use crate::faq::FaqStore;
use crate::search::{SearchBackend, WebSearchTool};
use crate::voice::{AudioCapture, AudioPlayback, SpeechToText, TextToSpeech, audio};
use crate::{Error, Result};

/// Takes with RMS energy below this are treated as silence and skipped
const SILENCE_RMS: f32 = 0.01;

/// One assistant session: a dispatcher plus the optional voice pipeline
pub struct Session {
    config: Config,
    dispatcher: Dispatcher,
    stt: Option<SpeechToText>,
    tts: Option<TextToSpeech>,
}

impl Session {
    /// Build a session from configuration
    ///
    /// Missing credentials degrade features instead of failing: no search key
    /// leaves the search branch unavailable, no STT/TTS key drops the session
    /// to text mode.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let faq = FaqStore::load(&config.faq.path, config.faq.cutoff);
        if faq.is_empty() {
            tracing::warn!("FAQ table is empty, relying on search and default replies");
        }

        let dispatcher = Dispatcher::new(
            faq,
            build_search(&config),
            DispatchPolicy {
                max_results: config.search.max_results,
            },
        );

        let (stt, tts) = if config.voice.enabled {
            (
                SpeechToText::from_config(&config.voice, &config.api_keys),
                TextToSpeech::from_config(&config.voice, &config.api_keys),
            )
        } else {
            (None, None)
        };

        Self {
            config,
            dispatcher,
            stt,
            tts,
        }
    }

    /// Answer a single utterance
    pub async fn respond(&self, utterance: &str) -> String {
        self.dispatcher.respond(utterance).await
    }

    /// Run the interactive loop until a quit utterance or Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if the audio devices cannot be opened
    #[allow(clippy::future_not_send)]
    pub async fn run(&self) -> Result<()> {
        if self.config.voice.enabled && self.stt.is_some() {
            self.run_voice().await
        } else {
            if self.config.voice.enabled {
                tracing::warn!("no STT credentials, falling back to text mode");
            }
            self.run_text().await
        }
    }

    /// Voice loop: record a clip per turn, transcribe, dispatch, speak
    #[allow(clippy::future_not_send)]
    async fn run_voice(&self) -> Result<()> {
        let Some(stt) = self.stt.as_ref() else {
            return Err(Error::Config(
                "voice mode requires STT credentials".to_string(),
            ));
        };

        let mut capture = AudioCapture::new()?;
        let mut playback = AudioPlayback::new()?;
        let record_for = Duration::from_secs(self.config.voice.record_secs);

        tracing::info!(
            record_secs = self.config.voice.record_secs,
            "voice session started, say \"quit\" to exit"
        );

        loop {
            println!("Listening...");

            let samples = tokio::select! {
                result = capture.record(record_for) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    break;
                }
            };

            if audio::rms(&samples) < SILENCE_RMS {
                tracing::debug!("skipping silent take");
                continue;
            }

            let wav = audio::samples_to_wav(&samples, audio::STT_SAMPLE_RATE)?;
            let utterance = match stt.transcribe(&wav).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "transcription failed");
                    self.deliver(&mut playback, "Sorry, I didn't catch that.")
                        .await;
                    continue;
                }
            };

            // no speech recognized: reprompt, never dispatch
            if utterance.is_empty() {
                self.deliver(&mut playback, "I didn't hear anything. Try again?")
                    .await;
                continue;
            }

            println!("[you] {utterance}");

            if is_quit(&utterance) {
                self.deliver(&mut playback, "Goodbye!").await;
                break;
            }

            let reply = self.dispatcher.respond(&utterance).await;
            println!("[aria] {reply}");
            self.deliver(&mut playback, &reply).await;
        }

        Ok(())
    }

    /// Text loop: read stdin lines, dispatch, print
    async fn run_text(&self) -> Result<()> {
        tracing::info!("text session started, type \"quit\" to exit");

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next() else { break };
            let line = line?;
            let utterance = line.trim();

            if utterance.is_empty() {
                continue;
            }
            if is_quit(utterance) {
                break;
            }

            let reply = self.dispatcher.respond(utterance).await;
            println!("{reply}");
        }

        Ok(())
    }

    /// One-shot file mode: WAV in → transcript → reply → MP3 out
    ///
    /// Returns the reply text after writing the spoken version to `output`.
    ///
    /// # Errors
    ///
    /// Returns error if STT/TTS are unconfigured, the input can't be decoded,
    /// or no speech is recognized in it
    pub async fn respond_file(&self, input: &Path, output: &Path) -> Result<String> {
        let stt = self.stt.as_ref().ok_or_else(|| {
            Error::Config("file mode requires STT credentials".to_string())
        })?;
        let tts = self.tts.as_ref().ok_or_else(|| {
            Error::Config("file mode requires TTS credentials".to_string())
        })?;

        let samples = audio::read_wav(input)?;
        let wav = audio::samples_to_wav(&samples, audio::STT_SAMPLE_RATE)?;

        let utterance = stt.transcribe(&wav).await?;
        if utterance.is_empty() {
            return Err(Error::Stt("no speech detected in input".to_string()));
        }
        tracing::info!(utterance = %utterance, "transcribed input clip");

        let reply = self.dispatcher.respond(&utterance).await;

        let mp3 = tts.synthesize(&reply).await?;
        std::fs::write(output, mp3)?;
        tracing::info!(path = %output.display(), "wrote spoken reply");

        Ok(reply)
    }

    /// Speak a reply; TTS or playback failures are logged, not fatal
    async fn deliver(&self, playback: &mut AudioPlayback, text: &str) {
        let Some(tts) = self.tts.as_ref() else {
            return;
        };

        match tts.synthesize(text).await {
            Ok(mp3) => {
                if let Err(e) = playback.play_mp3(&mp3).await {
                    tracing::warn!(error = %e, "playback failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "synthesis failed"),
        }
    }
}

/// Build the search backend for the configured provider, if its key is set
fn build_search(config: &Config) -> Option<Box<dyn SearchBackend>> {
    let provider = config.search.provider.as_str();
    let Some(key) = config.api_keys.search_key(provider) else {
        tracing::warn!(provider, "no search credential, search will be unavailable");
        return None;
    };

    let tool = match provider {
        "brave" => WebSearchTool::new_brave(key.to_string()),
        _ => WebSearchTool::new_serper(key.to_string()),
    };

    Some(Box::new(tool))
}

/// Whether an utterance is an explicit quit command
///
/// Tolerates the punctuation STT likes to append ("Quit.").
fn is_quit(utterance: &str) -> bool {
    let normalized = utterance
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric());

    normalized.eq_ignore_ascii_case("quit") || normalized.eq_ignore_ascii_case("exit")
}
