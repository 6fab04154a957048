/*!
 * Tests for clip edits, frame rate handling and the ffmpeg filter graph
 */

use std::path::Path;

use clipcut::app_config::MediaConfig;
use clipcut::crop::CropRectangle;
use clipcut::errors::{FrameRateError, MediaError};
use clipcut::media::{
    EditOperation, FfmpegBackend, MediaSource, TextStyle, estimate_fps, filters, validate_fps,
};
use clipcut::render_config::Resolution;
use clipcut::subtitle_processor::CaptionLine;
use clipcut::word_timing::WordTimingSynthesizer;
use crate::common;

fn landscape_source() -> MediaSource {
    MediaSource::new("/videos/talk.mp4", common::landscape_info())
}

#[test]
fn test_extractRange_withEdits_shouldRecordOperationsInOrder() {
    let rect = CropRectangle { x: 0, y: 0, width: 607, height: 1080 };
    let edit = landscape_source()
        .extract_range(10.0, 20.0)
        .crop(rect)
        .scale(Resolution::new(1080, 1920));

    assert_eq!(edit.duration(), 10.0);
    assert_eq!(edit.operations().len(), 2);
    assert_eq!(edit.operations()[0], EditOperation::Crop(rect));
    assert_eq!(edit.frame_size(), (1080, 1920));
}

#[test]
fn test_compose_withNoCues_shouldNotAddOverlay() {
    let edit = landscape_source().extract_range(0.0, 5.0).compose(Vec::new(), TextStyle::default());
    assert!(edit.operations().is_empty());
    assert_eq!(edit.overlay_count(), 0);
    assert_eq!(edit.frame_size(), (1920, 1080));
}

#[test]
fn test_buildFilterChain_withoutOperationsOnEvenFrame_shouldBeNone() {
    let edit = landscape_source().extract_range(0.0, 5.0);
    assert_eq!(filters::build_filter_chain(&edit), None);
}

#[test]
fn test_buildFilterChain_withOddCropWidth_shouldAppendEvenCrop() {
    let edit = landscape_source()
        .extract_range(0.0, 5.0)
        .crop(CropRectangle { x: 0, y: 0, width: 607, height: 1080 });
    assert_eq!(
        filters::build_filter_chain(&edit).unwrap(),
        "crop=607:1080:0:0,crop=606:1080:0:0"
    );
}

#[test]
fn test_buildFilterChain_withWordCues_shouldDrawEachWordInItsWindow() {
    let lines = vec![CaptionLine::new(1, 2.0, 4.0, "go now")];
    let cues = WordTimingSynthesizer::default().synthesize(&lines);
    let edit = landscape_source()
        .extract_range(0.0, 5.0)
        .compose(cues, TextStyle::default());

    assert_eq!(edit.overlay_count(), 2);
    let chain = filters::build_filter_chain(&edit).unwrap();
    let parts: Vec<&str> = chain.split("drawtext=").filter(|p| !p.is_empty()).collect();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].starts_with("text=go:"));
    assert!(parts[0].contains(r"enable=gte(t\,2.000)*lt(t\,3.000)"));
    assert!(parts[1].starts_with("text=now:"));
    assert!(chain.contains("fontcolor=yellow"));
    assert!(chain.contains("x=(w-text_w)/2:y=h-80"));
    assert!(chain.contains(r"font=Arial\\:style=Bold"));
}

#[test]
fn test_drawtextFilter_withFontFile_shouldPreferFile() {
    let lines = vec![CaptionLine::new(1, 0.0, 1.0, "hi")];
    let cues = WordTimingSynthesizer::default().synthesize(&lines);
    let style = TextStyle {
        font: "Arial".to_string(),
        font_file: Some("/fonts/Bold.ttf".to_string()),
        color: "white".to_string(),
    };
    let filter = filters::drawtext_filter(&cues[0], &style);
    assert!(filter.contains("fontfile=/fonts/Bold.ttf"));
    assert!(!filter.contains("font=Arial"));
    assert!(filter.contains("fontcolor=white"));
}

#[test]
fn test_enableExpr_shouldBeHalfOpen() {
    assert_eq!(filters::enable_expr(1.5, 2.25), "gte(t,1.500)*lt(t,2.250)");
}

#[test]
fn test_escapeFilterValue_withSeparators_shouldEscape() {
    assert_eq!(filters::escape_filter_value("a;b[c]"), r"a\;b\[c\]");
    assert_eq!(filters::escape_filter_value("plain"), "plain");
}

#[test]
fn test_estimateFps_withEvenlySpacedFrames_shouldReturnRate() {
    let times: Vec<f64> = (0..100).map(|i| f64::from(i) / 25.0).collect();
    let fps = estimate_fps(&times).unwrap();
    assert!((fps - 25.0).abs() < 1e-9);
}

#[test]
fn test_estimateFps_withTooFewOrIdenticalFrames_shouldFail() {
    assert!(matches!(estimate_fps(&[1.0]), Err(FrameRateError::EstimationFailed(_))));
    assert!(matches!(estimate_fps(&[2.0, 2.0, 2.0]), Err(FrameRateError::EstimationFailed(_))));
}

#[test]
fn test_validateFps_withMissingOrNonPositive_shouldExplainWhy() {
    assert_eq!(validate_fps(Some(29.97)).unwrap(), 29.97);
    assert_eq!(validate_fps(None), Err(FrameRateError::Missing));
    assert_eq!(validate_fps(Some(0.0)), Err(FrameRateError::NotPositive(0.0)));
    assert!(validate_fps(Some(f64::NAN)).is_err());
}

#[test]
fn test_parseProbeOutput_withVideoStream_shouldReadInfo() {
    let json = r#"{
        "streams": [
            {"codec_type": "audio", "duration": "61.0"},
            {"codec_type": "video", "width": 1920, "height": 1080,
             "avg_frame_rate": "0/0", "r_frame_rate": "30000/1001"}
        ],
        "format": {"duration": "60.500000"}
    }"#;
    let info = FfmpegBackend::parse_probe_output(Path::new("talk.mp4"), json).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
    assert_eq!(info.duration, 60.5);
    assert!((info.fps.unwrap() - 29.97).abs() < 0.01);
}

#[test]
fn test_parseProbeOutput_withAudioOnly_shouldReturnNoVideoStream() {
    let json = r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "3.0"}}"#;
    let err = FfmpegBackend::parse_probe_output(Path::new("song.mp3"), json).unwrap_err();
    assert!(matches!(err, MediaError::NoVideoStream(_)));
}

#[test]
fn test_parseProbeOutput_withoutFrameRate_shouldLeaveFpsUnset() {
    let json = r#"{"streams": [{"codec_type": "video", "width": 640, "height": 480,
        "avg_frame_rate": "0/0", "r_frame_rate": "0/0"}]}"#;
    let info = FfmpegBackend::parse_probe_output(Path::new("odd.mkv"), json).unwrap();
    assert_eq!(info.fps, None);
    assert_eq!(info.duration, 0.0);
}

#[test]
fn test_parseFrameTimes_withMixedFields_shouldUseAvailableTimestamp() {
    let json = r#"{"frames": [
        {"pts_time": "0.000000"},
        {"best_effort_timestamp_time": "0.040000"},
        {"pts_time": "N/A"},
        {"pts_time": "0.080000"}
    ]}"#;
    let times = FfmpegBackend::parse_frame_times(json).unwrap();
    assert_eq!(times, vec![0.0, 0.04, 0.08]);
}

#[test]
fn test_exportArgs_withCropAndFps_shouldBuildSingleInvocation() {
    let backend = FfmpegBackend::new(MediaConfig::default());
    let edit = landscape_source()
        .extract_range(10.0, 20.0)
        .crop(CropRectangle { x: 0, y: 0, width: 608, height: 1080 });

    let args: Vec<String> = backend
        .export_args(&edit, Path::new("/out/intro.mp4"), 25.0)
        .iter()
        .map(|a| a.to_string_lossy().to_string())
        .collect();

    let position = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[position("-ss") + 1], "10.000");
    assert_eq!(args[position("-t") + 1], "10.000");
    assert_eq!(args[position("-i") + 1], "/videos/talk.mp4");
    assert_eq!(args[position("-vf") + 1], "crop=608:1080:0:0");
    assert_eq!(args[position("-r") + 1], "25");
    assert_eq!(args[position("-c:v") + 1], "libx264");
    assert_eq!(args[position("-c:a") + 1], "aac");
    assert_eq!(args.last().unwrap(), "/out/intro.mp4");
}
