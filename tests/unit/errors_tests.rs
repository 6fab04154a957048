/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use clipcut::errors::{
    AppError, ClipError, FrameRateError, MediaError, SubtitleError, TranscriptionError, ValidationError,
};

#[test]
fn test_validationError_display_shouldNameClipAndRange() {
    let err = ValidationError::InvalidTimeRange { index: 2, start: 20.0, end: 10.0 };
    let message = err.to_string();
    assert!(message.contains("clip 2"));
    assert!(message.contains("20.000"));
    assert!(message.contains("10.000"));
}

#[test]
fn test_clipError_fromParts_shouldKeepMessage() {
    let from_validation: ClipError = ValidationError::MissingSource.into();
    assert_eq!(from_validation.to_string(), "No source video selected");

    let from_media: ClipError = MediaError::ExportFailed("disk full".to_string()).into();
    assert_eq!(from_media.to_string(), "Export failed: disk full");

    let from_subtitle: ClipError = SubtitleError::InvalidTimestamp("1:2".to_string()).into();
    assert!(matches!(from_subtitle, ClipError::Subtitle(_)));
}

#[test]
fn test_appError_fromTranscription_shouldBeDistinct() {
    let err: AppError = TranscriptionError::Timeout(60).into();
    assert!(matches!(err, AppError::Transcription(_)));
    assert!(err.to_string().starts_with("Transcription error:"));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldWrap() {
    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));

    let other: AppError = anyhow::anyhow!("odd").into();
    assert_eq!(other.to_string(), "Unknown error: odd");
}

#[test]
fn test_mediaError_fromIo_shouldConvert() {
    let err: MediaError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(err, MediaError::Io(_)));
}

#[test]
fn test_frameRateError_display_shouldDescribeReason() {
    assert_eq!(FrameRateError::Missing.to_string(), "Source reports no frame rate");
    assert!(FrameRateError::NotPositive(-1.0).to_string().contains("-1"));
}

#[test]
fn test_sourceNotFound_display_shouldIncludePath() {
    let err = ValidationError::SourceNotFound(PathBuf::from("/tmp/missing.mp4"));
    assert!(err.to_string().contains("missing.mp4"));
}
