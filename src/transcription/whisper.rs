use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriptionError;
use crate::language_utils;
use crate::transcription::{Transcript, TranscriptSegment, TranscriptionEngine};

// @module: Whisper command-line transcription engine

/// Whisper JSON output (`--output_format json`)
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Engine handle resolved on first use
#[derive(Debug, Clone)]
struct LoadedModel {
    binary: String,
    model: String,
}

/// Transcription engine that shells out to the `whisper` CLI
pub struct WhisperCliEngine {
    config: TranscriptionConfig,
    model: OnceCell<LoadedModel>,
}

impl WhisperCliEngine {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self {
            config,
            model: OnceCell::new(),
        }
    }

    /// Whether the model has been loaded by an earlier call
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Load the model once; later calls return the cached handle
    async fn loaded_model(&self) -> Result<&LoadedModel, TranscriptionError> {
        self.model
            .get_or_try_init(|| async {
                info!("Loading transcription model '{}'", self.config.model);
                let output = Command::new(&self.config.binary)
                    .arg("--help")
                    .output()
                    .await
                    .map_err(|e| {
                        TranscriptionError::EngineUnavailable(format!("{}: {}", self.config.binary, e))
                    })?;

                if !output.status.success() {
                    return Err(TranscriptionError::ModelLoad {
                        model: self.config.model.clone(),
                        message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    });
                }

                Ok(LoadedModel {
                    binary: self.config.binary.clone(),
                    model: self.config.model.clone(),
                })
            })
            .await
    }

    /// Parse whisper's JSON output into a transcript
    pub fn parse_output(json: &str) -> Result<Transcript, TranscriptionError> {
        let output: WhisperOutput = serde_json::from_str(json)
            .map_err(|e| TranscriptionError::InvalidOutput(e.to_string()))?;

        let segments = output
            .segments
            .into_iter()
            .filter(|s| s.start.is_finite() && s.end.is_finite())
            .map(|s| TranscriptSegment::new(s.start, s.end, s.text.trim()))
            .collect();

        Ok(Transcript::new(segments, output.language))
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperCliEngine {
    async fn transcribe(&self, path: &Path) -> Result<Transcript, TranscriptionError> {
        let model = self.loaded_model().await?;

        let output_dir = tempfile::tempdir()
            .map_err(|e| TranscriptionError::Failed(format!("Failed to create temp dir: {}", e)))?;

        let mut command = Command::new(&model.binary);
        command
            .arg(path)
            .args(["--model", model.model.as_str()])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(output_dir.path())
            .args(["--verbose", "False"])
            .kill_on_drop(true);
        if let Some(language) = &self.config.language {
            command.args(["--language", language.as_str()]);
        }
        if let Some(model_dir) = &self.config.model_dir {
            command.args(["--model_dir", model_dir.as_str()]);
        }

        debug!("Running {} on {:?}", model.binary, path);
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = command.output() => {
                result.map_err(|e| TranscriptionError::EngineUnavailable(format!("{}: {}", model.binary, e)))?
            },
            _ = tokio::time::sleep(timeout) => {
                return Err(TranscriptionError::Timeout(self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::Failed(
                stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("unknown error").to_string(),
            ));
        }

        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let json_path = output_dir.path().join(format!("{}.json", stem));
        let json = std::fs::read_to_string(&json_path)
            .map_err(|e| TranscriptionError::InvalidOutput(format!("{:?}: {}", json_path, e)))?;

        let transcript = Self::parse_output(&json)?;

        if let (Some(requested), Some(detected)) = (&self.config.language, &transcript.language) {
            if !language_utils::language_codes_match(requested, detected) {
                let name = |code: &str| language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string());
                warn!("Requested language '{}' but whisper reported '{}'", name(requested), name(detected));
            }
        }

        info!("Transcribed {} segment(s)", transcript.len());
        Ok(transcript)
    }
}
