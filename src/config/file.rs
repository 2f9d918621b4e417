//! TOML configuration file loading
//!
//! Supports `~/.config/aria/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct AriaConfigFile {
    /// FAQ table configuration
    #[serde(default)]
    pub faq: FaqFileConfig,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// FAQ table configuration
#[derive(Debug, Default, Deserialize)]
pub struct FaqFileConfig {
    /// Path to the FAQ JSON file
    pub path: Option<String>,

    /// Similarity cutoff for fuzzy matches (0.0–1.0)
    pub cutoff: Option<f32>,
}

/// Web search configuration
#[derive(Debug, Default, Deserialize)]
pub struct SearchFileConfig {
    /// Provider name ("serper" or "brave")
    pub provider: Option<String>,

    /// Maximum results per query
    pub max_results: Option<usize>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: Option<String>,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,

    /// Seconds of audio recorded per conversation turn
    pub record_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub deepgram: Option<String>,
    pub elevenlabs: Option<String>,
    pub serper: Option<String>,
    pub brave: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `AriaConfigFile::default()` if the file doesn't exist or can't be
/// parsed.
#[must_use]
pub fn load_config_file() -> AriaConfigFile {
    let Some(path) = config_file_path() else {
        return AriaConfigFile::default();
    };

    if !path.exists() {
        return AriaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                AriaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            AriaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/aria/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("aria").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: AriaConfigFile = toml::from_str("").unwrap();
        assert!(config.faq.path.is_none());
        assert!(config.search.provider.is_none());
        assert!(config.api_keys.serper.is_none());
    }

    #[test]
    fn partial_file_parses() {
        let config: AriaConfigFile = toml::from_str(
            r#"
            [faq]
            path = "my-faq.json"
            cutoff = 0.9

            [search]
            provider = "brave"
            "#,
        )
        .unwrap();

        assert_eq!(config.faq.path.as_deref(), Some("my-faq.json"));
        assert_eq!(config.faq.cutoff, Some(0.9));
        assert_eq!(config.search.provider.as_deref(), Some("brave"));
        assert!(config.search.max_results.is_none());
    }
}
