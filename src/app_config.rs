use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Speech engine config
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Video rendering config
    #[serde(default)]
    pub video: VideoConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech engine connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    // @field: Engine base URL
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    // @field: Engine speaker (voice) id
    #[serde(default = "default_speaker_id")]
    pub speaker_id: u32,

    // @field: Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            speaker_id: default_speaker_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Video rendering settings for the composed output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoConfig {
    // @field: Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    // @field: Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    // @field: Solid background color when no clip is supplied
    #[serde(default = "default_background_color")]
    pub background_color: String,

    // @field: Burned-in subtitle font size
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    // @field: Subtitle outline thickness
    #[serde(default = "default_outline")]
    pub outline: u32,

    // @field: Subtitle margin from the bottom edge in pixels
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: u32,

    // @field: Silence kept after the last cue, in seconds
    #[serde(default = "default_trailing_pad_secs")]
    pub trailing_pad_secs: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background_color: default_background_color(),
            font_size: default_font_size(),
            outline: default_outline(),
            margin_bottom: default_margin_bottom(),
            trailing_pad_secs: default_trailing_pad_secs(),
        }
    }
}

/// Log level for application logging
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speech: SpeechConfig::default(),
            video: VideoConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.speech.endpoint)
            .map_err(|e| anyhow!("Invalid speech engine endpoint '{}': {}", self.speech.endpoint, e))?;

        if self.speech.timeout_secs == 0 {
            return Err(anyhow!("Speech engine timeout must be positive"));
        }

        if self.video.width == 0 || self.video.height == 0 {
            return Err(anyhow!(
                "Invalid video resolution {}x{}",
                self.video.width, self.video.height
            ));
        }

        if self.video.font_size == 0 {
            return Err(anyhow!("Subtitle font size must be positive"));
        }

        if self.video.background_color.trim().is_empty() {
            return Err(anyhow!("Background color must not be empty"));
        }

        if self.video.trailing_pad_secs < 0.0 {
            return Err(anyhow!(
                "Trailing pad must be non-negative, got {}",
                self.video.trailing_pad_secs
            ));
        }

        Ok(())
    }
}

fn default_engine_endpoint() -> String {
    "http://localhost:50021".to_string()
}

fn default_speaker_id() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_background_color() -> String {
    "black".to_string()
}

fn default_font_size() -> u32 {
    28
}

fn default_outline() -> u32 {
    1
}

fn default_margin_bottom() -> u32 {
    60
}

fn default_trailing_pad_secs() -> f64 {
    1.0
}
