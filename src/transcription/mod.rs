/*!
 * Speech-to-text boundary.
 *
 * The source video is transcribed once per batch; the resulting `Transcript`
 * is then sliced per clip by the segmenter:
 * - `segmenter`: per-clip selection and time rebasing
 * - `whisper`: engine backed by the `whisper` command-line tool
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::TranscriptionError;

pub mod segmenter;
pub mod whisper;

pub use segmenter::TranscriptSegmenter;
pub use whisper::WhisperCliEngine;

/// Timed text span over the whole source video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start in seconds from the beginning of the source
    pub start: f64,
    /// End in seconds from the beginning of the source
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Whole-video transcript, ordered by segment start
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    segments: Vec<TranscriptSegment>,
    /// Language reported by the engine, if any
    pub language: Option<String>,
}

impl Transcript {
    /// Build a transcript, sorting segments by start time
    pub fn new(mut segments: Vec<TranscriptSegment>, language: Option<String>) -> Self {
        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { segments, language }
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

/// Common trait for speech-to-text engines
///
/// Implementations load their model lazily on the first call and reuse it
/// for every later call.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Transcribe the whole media file
    async fn transcribe(&self, path: &Path) -> Result<Transcript, TranscriptionError>;
}
