/*!
 * Tests for application configuration
 */

use anyhow::Result;
use clipcut::app_config::{Config, LogLevel};
use clipcut::render_config::{Alignment, CaptionMode, Resolution, TargetShape};
use crate::common;

#[test]
fn test_default_config_shouldMatchDocumentedDefaults() {
    let config = Config::default();
    assert_eq!(config.caption_style.font_size, 48);
    assert!(config.caption_style.bold);
    assert_eq!(config.caption_style.bottom_gap, 80);
    assert_eq!(config.caption_style.color, "yellow");
    assert_eq!(config.transcription.model, "base");
    assert_eq!(config.media.default_fps, 30.0);
    assert_eq!(config.media.fps_sample_frames, 100);
    assert_eq!(config.media.container, "mp4");
    assert_eq!(config.render.captions, CaptionMode::None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "render": {"resolution": "1080x1920", "alignment": "left", "captions": "words"},
        "caption_style": {"font_size": 64},
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.render.alignment, Alignment::Left);
    assert_eq!(config.render.captions, CaptionMode::Words);
    assert_eq!(config.caption_style.font_size, 64);
    assert_eq!(config.caption_style.bottom_gap, 80);
    assert_eq!(config.transcription.binary, "whisper");
    assert_eq!(config.media.ffmpeg_path, "ffmpeg");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_deserialize_withAliases_shouldAcceptCenterAndBurn() -> Result<()> {
    let json = r#"{"render": {"alignment": "center", "captions": "burn"}}"#;
    let config: Config = serde_json::from_str(json)?;
    assert_eq!(config.render.alignment, Alignment::None);
    assert_eq!(config.render.captions, CaptionMode::Words);
    Ok(())
}

#[test]
fn test_serialize_roundTrip_shouldPreserveConfig() -> Result<()> {
    let mut config = Config::default();
    config.render.aspect_ratio = Some("9:16".to_string());
    config.transcription.language = Some("fr".to_string());

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", &serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_validate_withMalformedResolution_shouldFail() {
    let mut config = Config::default();
    config.render.resolution = Some("1080-1920".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("widthxheight"));
}

#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.media.default_fps = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.media.fps_sample_frames = 500;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.caption_style.font_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.transcription.language = Some("xx".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.media.ffprobe_path = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_renderConfig_withResolution_shouldBuildTarget() -> Result<()> {
    let mut config = Config::default();
    config.render.resolution = Some("1080x1920".to_string());
    config.render.scale_to_target = true;

    let render = config.render_config()?;
    assert_eq!(render.target, Some(TargetShape::Resolution(Resolution::new(1080, 1920))));
    assert_eq!(render.scale_resolution(), Some(Resolution::new(1080, 1920)));
    Ok(())
}

#[test]
fn test_captionStyle_conversions_shouldCopyFields() {
    let mut config = Config::default();
    config.caption_style.font_file = Some("/fonts/a.ttf".to_string());
    config.caption_style.bold = false;

    let visual = config.caption_style.word_visual();
    assert_eq!(visual.font_size, 48);
    assert!(!visual.bold);

    let style = config.caption_style.text_style();
    assert_eq!(style.font_file.as_deref(), Some("/fonts/a.ttf"));
    assert_eq!(style.color, "yellow");
}
