//! Interactive first-run setup wizard (`aria setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::config::file::{
    ApiKeysFileConfig, AriaConfigFile, FaqFileConfig, SearchFileConfig, VoiceFileConfig,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or the config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Aria Setup\n");

    let existing = crate::config::file::load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/aria/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. FAQ file
    let faq_path: String = Input::new()
        .with_prompt("FAQ file path")
        .default(
            existing
                .faq
                .path
                .clone()
                .unwrap_or_else(|| "faq.json".to_string()),
        )
        .interact_text()?;

    // 2. Search provider + API key
    let providers = ["Serper", "Brave", "(none)"];
    let default_provider = existing
        .search
        .provider
        .as_deref()
        .and_then(|p| providers.iter().position(|&l| l.eq_ignore_ascii_case(p)))
        .unwrap_or(0);

    let provider_idx = Select::new()
        .with_prompt("Select a search provider")
        .items(&providers)
        .default(default_provider)
        .interact()?;

    let mut api_keys = ApiKeysFileConfig::default();
    let search_provider = if provider_idx == 2 {
        None
    } else {
        let provider_name = providers[provider_idx].to_lowercase();
        let (env_hint, existing_key) = match provider_name.as_str() {
            "brave" => ("BRAVE_API_KEY", existing.api_keys.brave.as_deref()),
            _ => ("SERPER_API_KEY", existing.api_keys.serper.as_deref()),
        };

        let key = prompt_key(&provider_name, env_hint, existing_key)?;
        match provider_name.as_str() {
            "brave" => api_keys.brave = key,
            _ => api_keys.serper = key,
        }

        Some(provider_name)
    };

    // 3. Voice (optional)
    let enable_voice = Confirm::new()
        .with_prompt("Enable voice (STT/TTS)?")
        .default(existing.voice.enabled.unwrap_or(true))
        .interact()?;

    let voice = if enable_voice {
        api_keys.openai = prompt_key(
            "openai",
            "OPENAI_API_KEY",
            existing.api_keys.openai.as_deref(),
        )?;

        VoiceFileConfig {
            enabled: Some(true),
            stt_model: Some(
                existing
                    .voice
                    .stt_model
                    .unwrap_or_else(|| "whisper-1".to_string()),
            ),
            tts_model: Some(
                existing
                    .voice
                    .tts_model
                    .unwrap_or_else(|| "tts-1".to_string()),
            ),
            tts_voice: Some(
                existing
                    .voice
                    .tts_voice
                    .unwrap_or_else(|| "alloy".to_string()),
            ),
            tts_speed: existing.voice.tts_speed.or(Some(1.0)),
            stt_provider: existing.voice.stt_provider,
            tts_provider: existing.voice.tts_provider,
            record_secs: existing.voice.record_secs,
        }
    } else {
        VoiceFileConfig {
            enabled: Some(false),
            ..VoiceFileConfig::default()
        }
    };

    // 4. Build and write config
    let config_file = AriaConfigFile {
        faq: FaqFileConfig {
            path: Some(faq_path),
            cutoff: existing.faq.cutoff,
        },
        search: SearchFileConfig {
            provider: search_provider,
            max_results: existing.search.max_results,
        },
        voice,
        api_keys,
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `aria -v` to start.");

    Ok(())
}

/// Prompt for an API key, keeping the existing one when left blank
fn prompt_key(
    name: &str,
    env_hint: &str,
    existing: Option<&str>,
) -> anyhow::Result<Option<String>> {
    let masked = existing.map(|k| {
        if k.len() > 8 {
            format!("{}...{}", &k[..4], &k[k.len() - 4..])
        } else {
            "****".to_string()
        }
    });

    let prompt = masked.as_ref().map_or_else(
        || format!("{name} API key ({env_hint})"),
        |m| format!("{name} API key (current: {m}, leave blank to keep)"),
    );

    let input: String = Input::new()
        .with_prompt(&prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.is_empty() {
        Ok(existing.map(str::to_string))
    } else {
        Ok(Some(input))
    }
}

/// Serialize and write the config file
fn write_config(path: &PathBuf, config: &AriaConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serialize_config(config))?;
    Ok(())
}

/// Serialize config to a readable TOML string
fn serialize_config(config: &AriaConfigFile) -> String {
    let mut out = String::new();

    // [faq]
    if config.faq.path.is_some() || config.faq.cutoff.is_some() {
        out.push_str("[faq]\n");
        if let Some(ref path) = config.faq.path {
            out.push_str(&format!("path = \"{path}\"\n"));
        }
        if let Some(cutoff) = config.faq.cutoff {
            out.push_str(&format!("cutoff = {cutoff}\n"));
        }
        out.push('\n');
    }

    // [search]
    if config.search.provider.is_some() || config.search.max_results.is_some() {
        out.push_str("[search]\n");
        if let Some(ref provider) = config.search.provider {
            out.push_str(&format!("provider = \"{provider}\"\n"));
        }
        if let Some(max) = config.search.max_results {
            out.push_str(&format!("max_results = {max}\n"));
        }
        out.push('\n');
    }

    // [voice]
    if config.voice.enabled.is_some() {
        out.push_str("[voice]\n");
        if let Some(enabled) = config.voice.enabled {
            out.push_str(&format!("enabled = {enabled}\n"));
        }
        for (key, val) in [
            ("stt_provider", &config.voice.stt_provider),
            ("stt_model", &config.voice.stt_model),
            ("tts_provider", &config.voice.tts_provider),
            ("tts_model", &config.voice.tts_model),
            ("tts_voice", &config.voice.tts_voice),
        ] {
            if let Some(v) = val {
                out.push_str(&format!("{key} = \"{v}\"\n"));
            }
        }
        if let Some(speed) = config.voice.tts_speed {
            out.push_str(&format!("tts_speed = {speed}\n"));
        }
        if let Some(secs) = config.voice.record_secs {
            out.push_str(&format!("record_secs = {secs}\n"));
        }
        out.push('\n');
    }

    // [api_keys]
    let ak = &config.api_keys;
    let keys = [
        ("openai", &ak.openai),
        ("deepgram", &ak.deepgram),
        ("elevenlabs", &ak.elevenlabs),
        ("serper", &ak.serper),
        ("brave", &ak.brave),
    ];
    if keys.iter().any(|(_, v)| v.is_some()) {
        out.push_str("[api_keys]\n");
        for (key, val) in keys {
            if let Some(v) = val {
                out.push_str(&format!("{key} = \"{v}\"\n"));
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_config_round_trips() {
        let config = AriaConfigFile {
            faq: FaqFileConfig {
                path: Some("faq.json".to_string()),
                cutoff: Some(0.85),
            },
            search: SearchFileConfig {
                provider: Some("serper".to_string()),
                max_results: Some(3),
            },
            voice: VoiceFileConfig {
                enabled: Some(true),
                tts_voice: Some("alloy".to_string()),
                ..VoiceFileConfig::default()
            },
            api_keys: ApiKeysFileConfig {
                serper: Some("key".to_string()),
                ..ApiKeysFileConfig::default()
            },
        };

        let parsed: AriaConfigFile = toml::from_str(&serialize_config(&config)).unwrap();
        assert_eq!(parsed.faq.path.as_deref(), Some("faq.json"));
        assert_eq!(parsed.search.max_results, Some(3));
        assert_eq!(parsed.voice.tts_voice.as_deref(), Some("alloy"));
        assert_eq!(parsed.api_keys.serper.as_deref(), Some("key"));
    }
}
