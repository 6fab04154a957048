use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::MediaConfig;
use crate::errors::MediaError;
use crate::media::{ClipEdit, MediaBackend, MediaInfo, MediaSource, filters};

// @module: ffmpeg/ffprobe media backend

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FrameSample {
    #[serde(default)]
    frames: Vec<SampledFrame>,
}

#[derive(Debug, Deserialize)]
struct SampledFrame {
    pts_time: Option<String>,
    best_effort_timestamp_time: Option<String>,
}

/// Media backend driving the ffmpeg and ffprobe executables
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    config: MediaConfig,
}

impl FfmpegBackend {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Run a command with a timeout, mapping spawn failures and timeouts
    async fn run(&self, mut command: Command, tool: &str, timeout_secs: u64) -> Result<Output, MediaError> {
        let timeout = Duration::from_secs(timeout_secs);
        command.kill_on_drop(true);
        tokio::select! {
            result = command.output() => result.map_err(|e| MediaError::ToolUnavailable {
                tool: tool.to_string(),
                message: e.to_string(),
            }),
            _ = tokio::time::sleep(timeout) => Err(MediaError::Timeout {
                tool: tool.to_string(),
                secs: timeout_secs,
            }),
        }
    }

    /// Parse ffprobe's `-show_streams -show_format` JSON
    pub fn parse_probe_output(path: &Path, json: &str) -> Result<MediaInfo, MediaError> {
        let output: ProbeOutput = serde_json::from_str(json)
            .map_err(|e| MediaError::ProbeFailed(format!("Failed to parse ffprobe output: {}", e)))?;

        let video = output
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;

        let (width, height) = match (video.width, video.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(MediaError::ProbeFailed("video stream has no frame size".to_string())),
        };

        let duration = output
            .format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .or(video.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let fps = video
            .avg_frame_rate
            .as_deref()
            .and_then(Self::parse_frame_rate)
            .or_else(|| video.r_frame_rate.as_deref().and_then(Self::parse_frame_rate));

        Ok(MediaInfo { width, height, duration, fps })
    }

    /// Parse a frame rate such as `30/1` or `30000/1001`; `0/0` means unknown
    pub fn parse_frame_rate(value: &str) -> Option<f64> {
        let (num, den) = match value.trim().split_once('/') {
            Some((n, d)) => (n.parse::<f64>().ok()?, d.parse::<f64>().ok()?),
            None => (value.trim().parse::<f64>().ok()?, 1.0),
        };
        if den == 0.0 {
            return None;
        }
        let fps = num / den;
        (fps.is_finite() && fps > 0.0).then_some(fps)
    }

    /// Parse the frame timestamps printed by `-show_entries frame=...`
    pub fn parse_frame_times(json: &str) -> Result<Vec<f64>, MediaError> {
        let sample: FrameSample = serde_json::from_str(json)
            .map_err(|e| MediaError::ProbeFailed(format!("Failed to parse frame sample: {}", e)))?;

        Ok(sample
            .frames
            .iter()
            .filter_map(|f| f.pts_time.as_deref().or(f.best_effort_timestamp_time.as_deref()))
            .filter_map(|t| t.parse::<f64>().ok())
            .collect())
    }

    /// Arguments for the export run of an edit
    pub fn export_args(&self, edit: &ClipEdit, output: &Path, fps: f64) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-ss".into(),
            format!("{:.3}", edit.start).into(),
            "-t".into(),
            format!("{:.3}", edit.duration()).into(),
            "-i".into(),
            edit.source.clone().into_os_string(),
        ];

        if let Some(chain) = filters::build_filter_chain(edit) {
            args.push("-vf".into());
            args.push(chain.into());
        }

        args.extend(
            [
                "-r".to_string(),
                format!("{}", fps),
                "-map".to_string(),
                "0:v:0".to_string(),
                "-map".to_string(),
                "0:a:0?".to_string(),
                "-c:v".to_string(),
                self.config.video_codec.clone(),
                "-preset".to_string(),
                self.config.preset.clone(),
                "-crf".to_string(),
                self.config.crf.to_string(),
                "-pix_fmt".to_string(),
                "yuv420p".to_string(),
                "-c:a".to_string(),
                self.config.audio_codec.clone(),
                "-movflags".to_string(),
                "+faststart".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_os_string());
        args
    }

    /// Keep only the meaningful lines of ffmpeg's stderr, stripping the
    /// version banner, build configuration and stream metadata noise.
    fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "lib",
            "Input #",
            "Metadata:",
            "Duration:",
            "Stream #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "frame=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            // The cause is almost always in the last few lines
            let tail = meaningful.len().saturating_sub(4);
            meaningful[tail..].join(" | ")
        }
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn open(&self, path: &Path) -> Result<MediaSource, MediaError> {
        if !path.exists() {
            return Err(MediaError::ProbeFailed(format!("File not found: {:?}", path)));
        }

        let mut command = Command::new(&self.config.ffprobe_path);
        command
            .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-show_format"])
            .arg(path);

        let output = self.run(command, &self.config.ffprobe_path, self.config.probe_timeout_secs).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr.trim());
            return Err(MediaError::ProbeFailed(format!("ffprobe exited with {}", output.status)));
        }

        let info = Self::parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))?;
        debug!(
            "Opened {:?}: {}x{}, {:.3}s, fps {:?}",
            path, info.width, info.height, info.duration, info.fps
        );
        Ok(MediaSource::new(path, info))
    }

    async fn sample_frame_times(
        &self,
        source: &MediaSource,
        max_frames: usize,
    ) -> Result<Vec<f64>, MediaError> {
        let mut command = Command::new(&self.config.ffprobe_path);
        command
            .args(["-v", "error", "-select_streams", "v:0"])
            .arg("-read_intervals")
            .arg(format!("%+#{}", max_frames))
            .args(["-show_entries", "frame=pts_time,best_effort_timestamp_time"])
            .args(["-of", "json"])
            .arg(&source.path);

        let output = self.run(command, &self.config.ffprobe_path, self.config.probe_timeout_secs).await?;
        if !output.status.success() {
            return Err(MediaError::ProbeFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut times = Self::parse_frame_times(&String::from_utf8_lossy(&output.stdout))?;
        times.truncate(max_frames);
        Ok(times)
    }

    async fn export(&self, edit: &ClipEdit, output: &Path, fps: f64) -> Result<(), MediaError> {
        let mut command = Command::new(&self.config.ffmpeg_path);
        command.args(self.export_args(edit, output, fps));

        debug!("Exporting {:?} ({} word overlay(s))", output, edit.overlay_count());
        let result = self.run(command, &self.config.ffmpeg_path, self.config.export_timeout_secs).await;

        let failure = match result {
            Ok(out) if out.status.success() => return Ok(()),
            Ok(out) => MediaError::ExportFailed(Self::filter_ffmpeg_stderr(&String::from_utf8_lossy(&out.stderr))),
            Err(e) => e,
        };

        // Do not leave a truncated file behind
        if output.exists() {
            let _ = std::fs::remove_file(output);
        }
        Err(failure)
    }
}
