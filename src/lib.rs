/*!
 * # clipcut - cut short clips out of a long video
 *
 * A Rust library that extracts several clips from one source video in a
 * single batch, optionally reframing them to a target shape and adding
 * speech captions.
 *
 * ## Features
 *
 * - Cut any number of time ranges from a source video
 * - Crop to a target resolution or aspect ratio, anchored left, right or centered
 * - Transcribe the source once with Whisper and reuse the transcript for every clip
 * - Write an SRT sidecar per clip, or burn word-by-word "pop" captions into the video
 * - Frame-rate fallback chain: container rate, frame sampling, configured default
 * - Per-clip failure isolation with a structured batch report
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Batch orchestration (`Controller::run_batch`)
 * - `clip_request`: Clip requests, time parsing and clip lists
 * - `render_config`: Target shape, alignment and caption mode
 * - `crop`: Aspect-ratio cropping geometry
 * - `subtitle_processor`: SRT formatting and parsing
 * - `word_timing`: Word cue synthesis and the pop-in animation curve
 * - `transcription`: Speech recognition boundary:
 *   - `transcription::segmenter`: Selecting and rebasing segments for a clip
 *   - `transcription::whisper`: Whisper command-line engine
 * - `media`: Media library boundary:
 *   - `media::ffmpeg`: ffmpeg/ffprobe backend
 *   - `media::filters`: Filter graph construction
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod clip_request;
pub mod crop;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod render_config;
pub mod subtitle_processor;
pub mod transcription;
pub mod word_timing;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchJob, BatchReport, ClipOutcome, ClipStatus, Controller};
pub use clip_request::ClipRequest;
pub use crop::{AspectCropper, CropRectangle};
pub use render_config::{Alignment, CaptionMode, RenderConfig};
pub use subtitle_processor::{CaptionLine, SubtitleCodec};
pub use transcription::{Transcript, TranscriptSegment, TranscriptSegmenter};
pub use word_timing::{WordCue, WordTimingSynthesizer, pop_scale};
pub use errors::{AppError, ClipError, FrameRateError, MediaError, SubtitleError, TranscriptionError, ValidationError};
