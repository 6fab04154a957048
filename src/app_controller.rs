use anyhow::{Result, Context};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::clip_request::ClipRequest;
use crate::crop::AspectCropper;
use crate::errors::{AppError, ClipError, ValidationError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::media::{self, FfmpegBackend, MediaBackend, MediaSource};
use crate::render_config::RenderConfig;
use crate::subtitle_processor::SubtitleCodec;
use crate::transcription::{Transcript, TranscriptSegmenter, TranscriptionEngine, WhisperCliEngine};
use crate::word_timing::WordTimingSynthesizer;

// @module: Application controller for clip extraction

/// One batch run: a source video and the clips to cut from it
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    // @field: Source video
    pub source: Option<PathBuf>,
    // @field: Folder receiving the clips
    pub output_dir: Option<PathBuf>,
    // @field: Requested clips, processed in order
    pub clips: Vec<ClipRequest>,
    // @field: Framing and caption settings
    pub render: RenderConfig,
    // @field: Replace clips that already exist
    pub force_overwrite: bool,
}

/// What happened to one clip
#[derive(Debug, Clone, PartialEq)]
pub enum ClipStatus {
    /// Clip written; the subtitle sidecar is present when captions were on
    Exported {
        video: PathBuf,
        subtitles: Option<PathBuf>,
    },
    /// Clip not attempted
    Skipped { reason: String },
    /// Clip attempted and failed
    Failed { error: String },
}

/// Result of one clip request
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutcome {
    pub index: usize,
    pub title: String,
    pub status: ClipStatus,
}

impl ClipOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self.status, ClipStatus::Exported { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ClipStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ClipStatus::Skipped { .. })
    }

    // @returns: One-line human readable summary
    pub fn summary(&self) -> String {
        match &self.status {
            ClipStatus::Exported { video, .. } => {
                format!("Clip {} '{}' exported to {}", self.index, self.title, video.display())
            }
            ClipStatus::Skipped { reason } => {
                format!("Clip {} '{}' skipped: {}", self.index, self.title, reason)
            }
            ClipStatus::Failed { error } => {
                format!("Clip {} '{}' failed: {}", self.index, self.title, error)
            }
        }
    }
}

/// Everything a batch run produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    // @field: Frame rate every clip was exported with
    pub frame_rate: f64,
    // @field: Recovered problems worth showing to the user
    pub warnings: Vec<String>,
    // @field: One entry per request, in request order
    pub outcomes: Vec<ClipOutcome>,
}

impl BatchReport {
    pub fn exported_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_exported()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Batch-wide inputs shared by every clip
#[derive(Clone, Copy)]
struct ClipContext<'a> {
    source: &'a MediaSource,
    job: &'a BatchJob,
    output_dir: &'a Path,
    transcript: Option<&'a Transcript>,
    fps: f64,
}

/// Main application controller for clip extraction
pub struct Controller<M: MediaBackend = FfmpegBackend, T: TranscriptionEngine = WhisperCliEngine> {
    // @field: App configuration
    config: Config,
    // @field: Media library
    media: M,
    // @field: Speech recognition engine, loads its model on first use
    engine: T,
}

impl Controller {
    // @method: Create a controller backed by ffmpeg and the whisper CLI
    pub fn with_config(mut config: Config) -> Result<Self> {
        if let Some(language) = config.transcription.language.take() {
            let normalized = language_utils::normalize_to_part1_or_part2t(&language)
                .with_context(|| format!("Unsupported transcription language '{}'", language))?;
            config.transcription.language = Some(normalized);
        }

        let media = FfmpegBackend::new(config.media.clone());
        let engine = WhisperCliEngine::new(config.transcription.clone());
        Ok(Self::with_backends(config, media, engine))
    }
}

impl<M: MediaBackend, T: TranscriptionEngine> Controller<M, T> {
    // @method: Create a controller with explicit backends
    pub fn with_backends(config: Config, media: M, engine: T) -> Self {
        Self { config, media, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn engine(&self) -> &T {
        &self.engine
    }

    /// Cut every requested clip from the source video.
    ///
    /// Missing or unreadable inputs and transcription failures abort the
    /// batch. Anything that goes wrong with a single clip is recorded in its
    /// outcome and the batch moves on to the next request.
    pub async fn run_batch(&self, job: &BatchJob) -> Result<BatchReport, AppError> {
        let start_time = std::time::Instant::now();

        let source_path = job.source.as_deref().ok_or(ValidationError::MissingSource)?;
        let output_dir = job.output_dir.as_deref().ok_or(ValidationError::MissingOutput)?;

        if !FileManager::file_exists(source_path) {
            return Err(ValidationError::SourceNotFound(source_path.to_path_buf()).into());
        }
        if !FileManager::is_video_file(source_path) {
            warn!("{:?} does not have a known video extension, trying anyway", source_path);
        }
        FileManager::ensure_dir(output_dir).map_err(|e| AppError::File(e.to_string()))?;

        let source = self.media.open(source_path).await?;
        let mut report = BatchReport::default();
        report.frame_rate = self.resolve_frame_rate(&source, &mut report.warnings).await;

        if job.clips.is_empty() {
            Self::push_warning(&mut report.warnings, "No clips requested".to_string());
            return Ok(report);
        }

        // One transcript serves every clip of the batch
        let transcript = if job.render.caption_mode.wants_transcript() {
            info!("Transcribing {:?}", source_path);
            let transcript = self.engine.transcribe(source_path).await?;
            if transcript.is_empty() {
                Self::push_warning(&mut report.warnings, "Transcription produced no speech segments".to_string());
            }
            Some(Arc::new(transcript))
        } else {
            None
        };

        let progress_bar = ProgressBar::new(job.clips.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let context = ClipContext {
            source: &source,
            job,
            output_dir,
            transcript: transcript.as_deref(),
            fps: report.frame_rate,
        };
        let mut used_names = HashSet::new();
        for request in &job.clips {
            progress_bar.set_message(request.title.clone());

            let status = match self
                .process_clip(request, &context, &mut used_names, &mut report.warnings)
                .await
            {
                Ok(status) => status,
                Err(ClipError::Validation(e)) => ClipStatus::Skipped { reason: e.to_string() },
                Err(e) => ClipStatus::Failed { error: e.to_string() },
            };

            let outcome = ClipOutcome {
                index: request.index,
                title: request.title.clone(),
                status,
            };
            match &outcome.status {
                ClipStatus::Exported { .. } => info!("{}", outcome.summary()),
                ClipStatus::Skipped { .. } => warn!("{}", outcome.summary()),
                ClipStatus::Failed { .. } => error!("{}", outcome.summary()),
            }
            report.outcomes.push(outcome);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        info!(
            "Batch finished in {}: {} exported, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            report.exported_count(),
            report.skipped_count(),
            report.failed_count()
        );
        Ok(report)
    }

    /// Frame rate for every export of the batch.
    ///
    /// Prefers the container's rate, then an estimate from a bounded frame
    /// sample, then the configured default. Each fallback adds a warning.
    pub async fn resolve_frame_rate(&self, source: &MediaSource, warnings: &mut Vec<String>) -> f64 {
        let reason = match media::validate_fps(source.info.fps) {
            Ok(fps) => {
                debug!("Using source frame rate {:.3}", fps);
                return fps;
            }
            Err(reason) => reason,
        };

        Self::push_warning(warnings, format!("{}; estimating it from the first frames", reason));
        let sample_size = self.config.media.fps_sample_frames.min(media::MAX_FPS_SAMPLE_FRAMES);
        match self.media.estimate_frame_rate(source, sample_size).await {
            Ok(fps) => {
                info!("Estimated frame rate {:.3}", fps);
                fps
            }
            Err(e) => {
                let fallback = self.config.media.default_fps;
                Self::push_warning(warnings, format!("{}; using {} fps", e, fallback));
                fallback
            }
        }
    }

    /// Cut, frame, caption and export one clip
    async fn process_clip(
        &self,
        request: &ClipRequest,
        context: &ClipContext<'_>,
        used_names: &mut HashSet<String>,
        warnings: &mut Vec<String>,
    ) -> Result<ClipStatus, ClipError> {
        let ClipContext { source, job, output_dir, transcript, fps } = *context;

        request.validate()?;
        let (start, end) = self.clamp_to_source(request, source, warnings)?;

        let file_name = Self::unique_file_name(request, used_names);
        let video_path = FileManager::clip_output_path(output_dir, &file_name, &self.config.media.container);
        let subtitle_path = FileManager::clip_output_path(output_dir, &file_name, "srt");

        if video_path.exists() && !job.force_overwrite {
            return Ok(ClipStatus::Skipped {
                reason: format!("{} already exists (use -f to force overwrite)", video_path.display()),
            });
        }

        let mut edit = source.extract_range(start, end);

        if let Some(target) = &job.render.target {
            let (target_w, target_h) = target.dimensions();
            let rect = AspectCropper::crop(
                source.info.width,
                source.info.height,
                target_w,
                target_h,
                job.render.alignment,
            );
            debug!("Clip {} crop {:?}", request.index, rect);
            edit = edit.crop(rect);
        }

        let mut subtitles = None;
        if let Some(transcript) = transcript {
            let lines = TranscriptSegmenter::select_and_rebase(transcript.segments(), start, end);
            debug!("Clip {} has {} caption line(s)", request.index, lines.len());
            SubtitleCodec::write_to_srt(&subtitle_path, &lines)?;

            if job.render.caption_mode.burns_words() {
                // Words are timed from the sidecar so both outputs agree
                let lines = SubtitleCodec::read_srt(&subtitle_path)?;
                let synthesizer = WordTimingSynthesizer::new(self.config.caption_style.word_visual());
                let cues = synthesizer.synthesize(&lines);
                edit = edit.compose(cues, self.config.caption_style.text_style());
            }
            subtitles = Some(subtitle_path);
        }

        if let Some(resolution) = job.render.scale_resolution() {
            edit = edit.scale(resolution);
        }

        self.media.export(&edit, &video_path, fps).await?;

        Ok(ClipStatus::Exported {
            video: video_path,
            subtitles,
        })
    }

    /// Keep the clip inside the source; an end past the source is clamped
    fn clamp_to_source(
        &self,
        request: &ClipRequest,
        source: &MediaSource,
        warnings: &mut Vec<String>,
    ) -> Result<(f64, f64), ValidationError> {
        let duration = source.info.duration;
        // Unknown duration: trust the request
        if duration <= 0.0 {
            return Ok((request.start, request.end));
        }

        if request.start >= duration {
            return Err(ValidationError::StartBeyondSource {
                index: request.index,
                start: request.start,
                duration,
            });
        }

        if request.end > duration {
            Self::push_warning(
                warnings,
                format!(
                    "Clip {} ends at {:.3}s, past the end of the source; clamped to {:.3}s",
                    request.index, request.end, duration
                ),
            );
            return Ok((request.start, duration));
        }

        Ok((request.start, request.end))
    }

    /// File name for a clip, unique within the batch
    fn unique_file_name(request: &ClipRequest, used_names: &mut HashSet<String>) -> String {
        let fallback = format!("clip_{}", request.index);
        let mut name = FileManager::sanitize_title(&request.title, &fallback);
        if used_names.contains(&name) {
            name = format!("{}_{}", name, request.index);
        }
        used_names.insert(name.clone());
        name
    }

    fn push_warning(warnings: &mut Vec<String>, message: String) {
        warn!("{}", message);
        warnings.push(message);
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
