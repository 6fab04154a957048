/*!
 * Error types for the clipcut application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The taxonomy follows
 * how far a failure is allowed to reach: validation problems skip one request,
 * media problems fail one clip, frame-rate problems degrade to a default and
 * transcription problems stop the whole batch.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors caused by bad caller input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Clip start is not strictly before its end
    #[error("Invalid timestamp range for clip {index}: start {start:.3}s must be before end {end:.3}s")]
    InvalidTimeRange {
        /// 1-based clip position in the batch
        index: usize,
        /// Requested start in seconds
        start: f64,
        /// Requested end in seconds
        end: f64,
    },

    /// Clip starts at or after the end of the source video
    #[error("Clip {index} starts at {start:.3}s but the source is only {duration:.3}s long")]
    StartBeyondSource {
        /// 1-based clip position in the batch
        index: usize,
        /// Requested start in seconds
        start: f64,
        /// Source duration in seconds
        duration: f64,
    },

    /// A time value could not be parsed
    #[error("Invalid time '{0}': expected HH:MM:SS, MM:SS or seconds")]
    InvalidTime(String),

    /// A clip definition could not be parsed
    #[error("Invalid clip definition '{0}': expected START-END or START-END=TITLE")]
    InvalidClipSpec(String),

    /// Resolution string is not `WIDTHxHEIGHT`
    #[error("Invalid resolution format '{0}'. Please use 'widthxheight' (e.g. 1080x1920)")]
    InvalidResolution(String),

    /// Aspect ratio string is not `W:H`
    #[error("Invalid aspect ratio '{0}'. Please use 'width:height' (e.g. 9:16)")]
    InvalidAspectRatio(String),

    /// Unknown enum value in configuration or on the command line
    #[error("Invalid value '{value}' for {field}: expected one of {expected}")]
    InvalidChoice {
        /// Name of the setting
        field: &'static str,
        /// Offending value
        value: String,
        /// Accepted values
        expected: &'static str,
    },

    /// No source video was given
    #[error("No source video selected")]
    MissingSource,

    /// No output folder was given
    #[error("No output folder selected")]
    MissingOutput,

    /// Source video does not exist
    #[error("Source video not found: {0:?}")]
    SourceNotFound(PathBuf),
}

/// Errors raised by the media library boundary
#[derive(Error, Debug)]
pub enum MediaError {
    /// The external tool could not be started
    #[error("Failed to run {tool}: {message}")]
    ToolUnavailable {
        /// Executable name
        tool: String,
        /// Underlying error
        message: String,
    },

    /// Probing the media file failed
    #[error("Failed to read media information: {0}")]
    ProbeFailed(String),

    /// The file has no video stream
    #[error("No video stream found in {0:?}")]
    NoVideoStream(PathBuf),

    /// Encoding or writing the output failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// The external tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Executable name
        tool: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// Destination could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons the source frame rate could not be used directly
///
/// These are never fatal; the controller recovers and reports them as warnings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameRateError {
    /// The media library reported no frame rate
    #[error("Source reports no frame rate")]
    Missing,

    /// The reported frame rate is zero, negative or not finite
    #[error("Source reports an invalid frame rate of {0}")]
    NotPositive(f64),

    /// Sampling frames did not produce a usable estimate
    #[error("Frame rate estimation failed: {0}")]
    EstimationFailed(String),
}

/// Errors from the speech-to-text engine
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The transcription tool could not be started
    #[error("Transcription engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The model could not be prepared
    #[error("Failed to load transcription model '{model}': {message}")]
    ModelLoad {
        /// Model name
        model: String,
        /// Underlying error
        message: String,
    },

    /// The engine ran but reported failure
    #[error("Transcription failed: {0}")]
    Failed(String),

    /// The engine output could not be read
    #[error("Unreadable transcription output: {0}")]
    InvalidOutput(String),

    /// The engine did not finish in time
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp did not match `H:MM:SS[,mmm]`
    #[error("Invalid subtitle timestamp: {0}")]
    InvalidTimestamp(String),

    /// Reading or writing a subtitle file failed
    #[error("Subtitle file error for {path:?}: {message}")]
    File {
        /// File involved
        path: PathBuf,
        /// Underlying error
        message: String,
    },
}

/// Failure of a single clip; never aborts the batch
#[derive(Error, Debug)]
pub enum ClipError {
    /// Bad request for this clip
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Media library failure for this clip
    #[error("{0}")]
    Media(#[from] MediaError),

    /// Subtitle file failure for this clip
    #[error("{0}")]
    Subtitle(#[from] SubtitleError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Batch-level validation failure
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Source media could not be opened
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Shared transcript could not be produced
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
