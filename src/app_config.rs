use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::str::FromStr;

use crate::media::{MAX_FPS_SAMPLE_FRAMES, TextStyle};
use crate::render_config::{Alignment, AspectRatio, CaptionMode, RenderConfig, Resolution};
use crate::word_timing::WordVisual;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Framing and caption settings for every clip
    #[serde(default)]
    pub render: RenderSettings,

    /// Look of burned-in word captions
    #[serde(default)]
    pub caption_style: CaptionStyle,

    /// Speech recognition settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Media tool settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Raw render settings as written in the configuration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RenderSettings {
    // @field: Target resolution, e.g. "1080x1920"
    #[serde(default)]
    pub resolution: Option<String>,

    // @field: Target aspect ratio, e.g. "9:16"; ignored when a resolution is set
    #[serde(default)]
    pub aspect_ratio: Option<String>,

    // @field: Horizontal crop anchor
    #[serde(default)]
    pub alignment: Alignment,

    // @field: Caption output mode
    #[serde(default)]
    pub captions: CaptionMode,

    // @field: Resize the cropped clip to the exact resolution
    #[serde(default)]
    pub scale_to_target: bool,
}

/// Caption look for burned-in words
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionStyle {
    // @field: Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    // @field: Bold face
    #[serde(default = "default_true")]
    pub bold: bool,

    // @field: Pixels between the text and the bottom edge
    #[serde(default = "default_bottom_gap")]
    pub bottom_gap: u32,

    // @field: Font family name
    #[serde(default = "default_font")]
    pub font: String,

    // @field: Explicit font file, overrides the family
    #[serde(default)]
    pub font_file: Option<String>,

    // @field: Text color
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            bold: default_true(),
            bottom_gap: default_bottom_gap(),
            font: default_font(),
            font_file: None,
            color: default_color(),
        }
    }
}

impl CaptionStyle {
    // @returns: Per-cue visual parameters
    pub fn word_visual(&self) -> WordVisual {
        WordVisual {
            font_size: self.font_size,
            bold: self.bold,
            bottom_gap: self.bottom_gap,
        }
    }

    // @returns: Font and color for the overlay
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: self.font.clone(),
            font_file: self.font_file.clone(),
            color: self.color.clone(),
        }
    }
}

/// Speech recognition configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptionConfig {
    // @field: Whisper executable
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Spoken language hint (ISO code); detected when unset
    #[serde(default)]
    pub language: Option<String>,

    // @field: Directory holding downloaded models
    #[serde(default)]
    pub model_dir: Option<String>,

    // @field: Timeout seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            binary: default_whisper_binary(),
            model: default_model(),
            language: None,
            model_dir: None,
            timeout_secs: default_transcription_timeout_secs(),
        }
    }
}

/// ffmpeg / ffprobe configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    // @field: Frame rate used when the source reports none
    #[serde(default = "default_fps")]
    pub default_fps: f64,

    // @field: Frames decoded to estimate a missing frame rate
    #[serde(default = "default_fps_sample_frames")]
    pub fps_sample_frames: usize,

    // @field: Video encoder
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    // @field: Encoder preset
    #[serde(default = "default_preset")]
    pub preset: String,

    // @field: Constant rate factor
    #[serde(default = "default_crf")]
    pub crf: u8,

    // @field: Audio encoder
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    // @field: Output file extension
    #[serde(default = "default_container")]
    pub container: String,

    // @field: Probe timeout seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    // @field: Export timeout seconds
    #[serde(default = "default_export_timeout_secs")]
    pub export_timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            default_fps: default_fps(),
            fps_sample_frames: default_fps_sample_frames(),
            video_codec: default_video_codec(),
            preset: default_preset(),
            crf: default_crf(),
            audio_codec: default_audio_codec(),
            container: default_container(),
            probe_timeout_secs: default_probe_timeout_secs(),
            export_timeout_secs: default_export_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_font_size() -> u32 {
    48
}

fn default_bottom_gap() -> u32 {
    80
}

fn default_true() -> bool {
    true
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_color() -> String {
    "yellow".to_string()
}

fn default_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_transcription_timeout_secs() -> u64 {
    3600
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_fps() -> f64 {
    30.0
}

fn default_fps_sample_frames() -> usize {
    100
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_crf() -> u8 {
    23
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_container() -> String {
    "mp4".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_export_timeout_secs() -> u64 {
    3600
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Framing strings must parse even when the CLI overrides them later
        if let Some(resolution) = self.render.resolution.as_deref().filter(|s| !s.trim().is_empty()) {
            Resolution::from_str(resolution)?;
        }
        if let Some(aspect) = self.render.aspect_ratio.as_deref().filter(|s| !s.trim().is_empty()) {
            AspectRatio::from_str(aspect)?;
        }

        if let Some(language) = &self.transcription.language {
            crate::language_utils::validate_language_code(language)?;
        }

        if self.transcription.model.trim().is_empty() {
            return Err(anyhow!("Transcription model name must not be empty"));
        }

        if self.caption_style.font_size == 0 {
            return Err(anyhow!("Caption font size must be greater than zero"));
        }

        if !(self.media.default_fps.is_finite() && self.media.default_fps > 0.0) {
            return Err(anyhow!(
                "Default frame rate must be positive, got {}",
                self.media.default_fps
            ));
        }

        if !(2..=MAX_FPS_SAMPLE_FRAMES).contains(&self.media.fps_sample_frames) {
            return Err(anyhow!(
                "Frame sample size must be between 2 and {}, got {}",
                MAX_FPS_SAMPLE_FRAMES,
                self.media.fps_sample_frames
            ));
        }

        for (name, tool) in [
            ("ffmpeg", &self.media.ffmpeg_path),
            ("ffprobe", &self.media.ffprobe_path),
            ("whisper", &self.transcription.binary),
        ] {
            if tool.trim().is_empty() {
                return Err(anyhow!("Path to the {} executable must not be empty", name));
            }
        }

        if self.media.container.trim().is_empty() {
            return Err(anyhow!("Output container extension must not be empty"));
        }

        Ok(())
    }

    /// Immutable render settings for a batch run
    pub fn render_config(&self) -> Result<RenderConfig> {
        let config = RenderConfig::parse(
            self.render.resolution.as_deref(),
            self.render.aspect_ratio.as_deref(),
            self.render.alignment,
            self.render.captions,
            self.render.scale_to_target,
        )?;
        Ok(config)
    }
}
