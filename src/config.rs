use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::BackendTimeouts;
use crate::orchestrator::PipelineSettings;
use crate::recorder::CAPTURE_MODES;

/// Environment variable overriding the backend base URL
pub const BACKEND_ENV: &str = "VOXLATE_BACKEND";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_api_token")]
    pub api_token: String,

    #[serde(default = "default_record_seconds")]
    pub record_seconds: u64,

    #[serde(default = "default_capture_mode")]
    pub capture_mode: String,

    #[serde(default = "default_capture_utility")]
    pub capture_utility: String,

    #[serde(default = "default_playback_utility")]
    pub playback_utility: String,

    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,

    #[serde(default = "default_stt_timeout")]
    pub stt_timeout_secs: u64,

    #[serde(default = "default_translate_timeout")]
    pub translate_timeout_secs: u64,

    #[serde(default = "default_tts_timeout")]
    pub tts_timeout_secs: u64,

    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_api_token() -> String {
    "test-token".to_string()
}

fn default_record_seconds() -> u64 {
    4
}

fn default_capture_mode() -> String {
    "auto".to_string()
}

fn default_capture_utility() -> String {
    "arecord".to_string()
}

fn default_playback_utility() -> String {
    "aplay".to_string()
}

fn default_audio_dir() -> String {
    "logs".to_string()
}

fn default_stt_timeout() -> u64 {
    60
}

fn default_translate_timeout() -> u64 {
    30
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_chat_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            api_token: default_api_token(),
            record_seconds: default_record_seconds(),
            capture_mode: default_capture_mode(),
            capture_utility: default_capture_utility(),
            playback_utility: default_playback_utility(),
            audio_dir: default_audio_dir(),
            stt_timeout_secs: default_stt_timeout(),
            translate_timeout_secs: default_translate_timeout(),
            tts_timeout_secs: default_tts_timeout(),
            chat_timeout_secs: default_chat_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    /// (~/.config/voxlate/config.json), then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
            let config: Self = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
            tracing::info!("Loaded config from {:?}", config_path);
            config
        } else {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(url) = std::env::var(BACKEND_ENV) {
            tracing::info!("Backend URL overridden via {}: {}", BACKEND_ENV, url);
            config.backend_url = url;
        }

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {parent:?}"))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("voxlate").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.is_empty() {
            return Err(anyhow::anyhow!("backend_url cannot be empty"));
        }

        if self.record_seconds == 0 {
            return Err(anyhow::anyhow!("record_seconds must be at least 1"));
        }

        if !CAPTURE_MODES.contains(&self.capture_mode.as_str()) {
            return Err(anyhow::anyhow!(
                "capture_mode must be one of: {}",
                CAPTURE_MODES.join(", ")
            ));
        }

        Ok(())
    }

    /// Per-operation deadlines for the remote service client
    pub fn backend_timeouts(&self) -> BackendTimeouts {
        BackendTimeouts {
            stt: Duration::from_secs(self.stt_timeout_secs),
            translate: Duration::from_secs(self.translate_timeout_secs),
            tts: Duration::from_secs(self.tts_timeout_secs),
            chat: Duration::from_secs(self.chat_timeout_secs),
        }
    }

    /// Orchestrator tunables derived from this configuration
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            record_duration: Duration::from_secs(self.record_seconds),
            capture_mode: self.capture_mode.clone(),
            capture_utility: self.capture_utility.clone(),
            format: crate::audio::AudioFormat::default(),
        }
    }
}
