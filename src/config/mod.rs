//! Configuration management for the Aria assistant

pub mod file;

use std::path::PathBuf;

use crate::faq::DEFAULT_CUTOFF;

/// Runtime configuration, resolved once at startup
///
/// Every value layers env var > config file > default, so a bare environment
/// still produces a working (if degraded) assistant.
#[derive(Debug, Clone)]
pub struct Config {
    /// FAQ table configuration
    pub faq: FaqConfig,

    /// Web search configuration
    pub search: SearchConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// FAQ table configuration
#[derive(Debug, Clone)]
pub struct FaqConfig {
    /// Path to the FAQ JSON file; a missing file yields an empty table
    pub path: PathBuf,

    /// Similarity cutoff for accepting a fuzzy match
    pub cutoff: f32,
}

/// Web search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Provider name ("serper" or "brave")
    pub provider: String,

    /// Maximum results per query
    pub max_results: usize,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: String,

    /// STT model identifier
    pub stt_model: String,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: String,

    /// TTS model identifier
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier
    pub tts_speed: f32,

    /// Seconds of audio recorded per conversation turn
    pub record_secs: u64,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// Serper search API key
    pub serper: Option<String>,

    /// Brave Search API key
    pub brave: Option<String>,
}

impl ApiKeys {
    /// Key for the configured search provider, if present
    #[must_use]
    pub fn search_key(&self, provider: &str) -> Option<&str> {
        match provider {
            "brave" => self.brave.as_deref(),
            _ => self.serper.as_deref(),
        }
    }
}

impl Config {
    /// Load configuration (env > config file > default)
    ///
    /// `faq_override` takes precedence over both env and file; `disable_voice`
    /// forces text-only mode regardless of configuration.
    #[must_use]
    pub fn load(faq_override: Option<PathBuf>, disable_voice: bool) -> Self {
        let fc = file::load_config_file();

        let faq = FaqConfig {
            path: faq_override
                .or_else(|| std::env::var("ARIA_FAQ_PATH").ok().map(PathBuf::from))
                .or_else(|| fc.faq.path.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("faq.json")),
            cutoff: std::env::var("ARIA_FAQ_CUTOFF")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.faq.cutoff)
                .unwrap_or(DEFAULT_CUTOFF),
        };

        let search = SearchConfig {
            provider: std::env::var("ARIA_SEARCH_PROVIDER")
                .ok()
                .or(fc.search.provider)
                .unwrap_or_else(|| "serper".to_string()),
            max_results: std::env::var("ARIA_MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.search.max_results)
                .unwrap_or(5),
        };

        let voice_enabled = if disable_voice {
            false
        } else {
            fc.voice.enabled.unwrap_or(true)
        };
        if disable_voice {
            tracing::info!("voice explicitly disabled, running text-only");
        }

        let stt_provider = std::env::var("ARIA_STT_PROVIDER")
            .ok()
            .or(fc.voice.stt_provider)
            .unwrap_or_else(|| "whisper".to_string());
        let stt_model = std::env::var("ARIA_STT_MODEL")
            .ok()
            .or(fc.voice.stt_model)
            .unwrap_or_else(|| default_stt_model(&stt_provider).to_string());

        let tts_provider = std::env::var("ARIA_TTS_PROVIDER")
            .ok()
            .or(fc.voice.tts_provider)
            .unwrap_or_else(|| "openai".to_string());
        let tts_model = std::env::var("ARIA_TTS_MODEL")
            .ok()
            .or(fc.voice.tts_model)
            .unwrap_or_else(|| default_tts_model(&tts_provider).to_string());

        let voice = VoiceConfig {
            enabled: voice_enabled,
            stt_provider,
            stt_model,
            tts_provider,
            tts_model,
            tts_voice: std::env::var("ARIA_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: std::env::var("ARIA_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.tts_speed)
                .unwrap_or(1.0),
            record_secs: std::env::var("ARIA_RECORD_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.record_secs)
                .unwrap_or(5),
        };

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok().or(fc.api_keys.openai),
            deepgram: std::env::var("DEEPGRAM_API_KEY")
                .ok()
                .or(fc.api_keys.deepgram),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .or(fc.api_keys.elevenlabs),
            serper: std::env::var("SERPER_API_KEY").ok().or(fc.api_keys.serper),
            brave: std::env::var("BRAVE_API_KEY").ok().or(fc.api_keys.brave),
        };

        Self {
            faq,
            search,
            voice,
            api_keys,
        }
    }
}

/// Default STT model for a provider
fn default_stt_model(provider: &str) -> &'static str {
    match provider {
        "deepgram" => "nova-2",
        _ => "whisper-1",
    }
}

/// Default TTS model for a provider
fn default_tts_model(provider: &str) -> &'static str {
    match provider {
        "elevenlabs" => "eleven_monolingual_v1",
        _ => "tts-1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_key_follows_provider() {
        let keys = ApiKeys {
            serper: Some("s-key".to_string()),
            brave: Some("b-key".to_string()),
            ..ApiKeys::default()
        };

        assert_eq!(keys.search_key("serper"), Some("s-key"));
        assert_eq!(keys.search_key("brave"), Some("b-key"));
        // unknown providers fall back to serper
        assert_eq!(keys.search_key("other"), Some("s-key"));
    }

    #[test]
    fn default_models_track_providers() {
        assert_eq!(default_stt_model("whisper"), "whisper-1");
        assert_eq!(default_stt_model("deepgram"), "nova-2");
        assert_eq!(default_tts_model("openai"), "tts-1");
        assert_eq!(default_tts_model("elevenlabs"), "eleven_monolingual_v1");
    }
}
