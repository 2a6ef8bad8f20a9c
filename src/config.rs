use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.65,
            similarity_boost: 0.87,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub provider: ProviderConfig,
    pub default_voice_id: String,
    pub voice_settings: VoiceSettings,
    pub default_pause_seconds: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let defaults = VoiceSettings::default();

        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: parsed(&lookup, "PORT", 3000)?,
            static_dir: text("STATIC_DIR", "./static"),
            provider: ProviderConfig {
                api_key: text("ELEVENLABS_API_KEY", ""),
                base_url: text("ELEVENLABS_API_URL", "https://api.elevenlabs.io")
                    .trim_end_matches('/')
                    .to_string(),
                model_id: text("ELEVENLABS_MODEL_ID", "eleven_multilingual_v2"),
            },
            default_voice_id: text("DEFAULT_VOICE_ID", "oESd0nQBbi2O04iJOxNn"),
            voice_settings: VoiceSettings {
                stability: parsed(&lookup, "VOICE_STABILITY", defaults.stability)?,
                similarity_boost: parsed(
                    &lookup,
                    "VOICE_SIMILARITY_BOOST",
                    defaults.similarity_boost,
                )?,
            },
            default_pause_seconds: parsed(&lookup, "DEFAULT_PAUSE_SECONDS", 1.0)?,
        })
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError { name, value }),
    }
}
