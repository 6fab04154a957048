/*!
 * Media library boundary.
 *
 * Clip edits are plain descriptions (`ClipEdit`) built from an opened
 * `MediaSource`; a `MediaBackend` turns them into files. The only backend
 * shipped is `FfmpegBackend`, which compiles an edit into one ffmpeg run:
 * - `ffmpeg`: probing, frame sampling and export through ffmpeg/ffprobe
 * - `filters`: filter-graph construction and escaping
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::crop::CropRectangle;
use crate::errors::{FrameRateError, MediaError};
use crate::render_config::Resolution;
use crate::word_timing::WordCue;

pub mod ffmpeg;
pub mod filters;

pub use ffmpeg::FfmpegBackend;

/// Most frames ever decoded to estimate a missing frame rate
pub const MAX_FPS_SAMPLE_FRAMES: usize = 100;

/// Properties of an opened media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Frame rate as reported by the container, if any
    pub fps: Option<f64>,
}

/// Opened source video
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub path: PathBuf,
    pub info: MediaInfo,
}

impl MediaSource {
    pub fn new(path: impl Into<PathBuf>, info: MediaInfo) -> Self {
        Self {
            path: path.into(),
            info,
        }
    }

    /// Describe the sub-range `[start, end)` of this source
    pub fn extract_range(&self, start: f64, end: f64) -> ClipEdit {
        ClipEdit {
            source: self.path.clone(),
            start,
            end,
            source_width: self.info.width,
            source_height: self.info.height,
            operations: Vec::new(),
        }
    }
}

/// Font and color used to draw word cues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Fontconfig family name
    pub font: String,
    /// Explicit font file; takes precedence over `font`
    pub font_file: Option<String>,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_file: None,
            color: "yellow".to_string(),
        }
    }
}

/// One step applied to a clip, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation {
    Crop(CropRectangle),
    Overlay { cues: Vec<WordCue>, style: TextStyle },
    Scale(Resolution),
}

/// Lazy description of a clip: a time range of a source plus ordered edits
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEdit {
    pub source: PathBuf,
    pub start: f64,
    pub end: f64,
    source_width: u32,
    source_height: u32,
    operations: Vec<EditOperation>,
}

impl ClipEdit {
    /// Crop the current frame
    pub fn crop(mut self, rect: CropRectangle) -> Self {
        self.operations.push(EditOperation::Crop(rect));
        self
    }

    /// Layer word cues, in order, above the current track
    pub fn compose(mut self, cues: Vec<WordCue>, style: TextStyle) -> Self {
        if !cues.is_empty() {
            self.operations.push(EditOperation::Overlay { cues, style });
        }
        self
    }

    /// Resize the current frame
    pub fn scale(mut self, resolution: Resolution) -> Self {
        self.operations.push(EditOperation::Scale(resolution));
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    /// Frame size after all operations
    pub fn frame_size(&self) -> (u32, u32) {
        self.operations
            .iter()
            .fold((self.source_width, self.source_height), |size, op| match op {
                EditOperation::Crop(rect) => (rect.width, rect.height),
                EditOperation::Scale(res) => (res.width, res.height),
                EditOperation::Overlay { .. } => size,
            })
    }

    /// Number of word cues layered on the clip
    pub fn overlay_count(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                EditOperation::Overlay { cues, .. } => cues.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Common trait for media libraries
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Open a media file and read its properties
    async fn open(&self, path: &Path) -> Result<MediaSource, MediaError>;

    /// Presentation times of at most `max_frames` frames from the start
    async fn sample_frame_times(
        &self,
        source: &MediaSource,
        max_frames: usize,
    ) -> Result<Vec<f64>, MediaError>;

    /// Render an edit to `output` at `fps`
    async fn export(&self, edit: &ClipEdit, output: &Path, fps: f64) -> Result<(), MediaError>;

    /// Estimate the frame rate from a bounded frame sample
    async fn estimate_frame_rate(
        &self,
        source: &MediaSource,
        max_frames: usize,
    ) -> Result<f64, FrameRateError> {
        let max_frames = max_frames.clamp(2, MAX_FPS_SAMPLE_FRAMES);
        let times = self
            .sample_frame_times(source, max_frames)
            .await
            .map_err(|e| FrameRateError::EstimationFailed(e.to_string()))?;
        estimate_fps(&times)
    }
}

/// Frame rate implied by a set of frame timestamps
pub fn estimate_fps(times: &[f64]) -> Result<f64, FrameRateError> {
    let mut times: Vec<f64> = times.iter().copied().filter(|t| t.is_finite()).collect();
    if times.len() < 2 {
        return Err(FrameRateError::EstimationFailed(format!(
            "need at least 2 frames, got {}",
            times.len()
        )));
    }
    times.sort_by(f64::total_cmp);

    let span = times[times.len() - 1] - times[0];
    if span <= 0.0 {
        return Err(FrameRateError::EstimationFailed(
            "all sampled frames share one timestamp".to_string(),
        ));
    }

    Ok((times.len() - 1) as f64 / span)
}

/// A reported frame rate, if it is usable
pub fn validate_fps(fps: Option<f64>) -> Result<f64, FrameRateError> {
    match fps {
        None => Err(FrameRateError::Missing),
        Some(f) if f.is_finite() && f > 0.0 => Ok(f),
        Some(f) => Err(FrameRateError::NotPositive(f)),
    }
}
