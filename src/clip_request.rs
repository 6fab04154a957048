use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ValidationError;

// @module: Clip definitions requested by the caller

/// One requested clip of the source video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipRequest {
    /// 1-based position in the batch
    pub index: usize,
    /// Start in seconds from the beginning of the source
    pub start: f64,
    /// End in seconds from the beginning of the source
    pub end: f64,
    /// Output file stem
    pub title: String,
}

impl ClipRequest {
    /// Creates a request, defaulting a blank title to `clip_<index>`
    pub fn new(index: usize, start: f64, end: f64, title: impl Into<String>) -> Self {
        let title = title.into();
        let trimmed = title.trim();
        let title = if trimmed.is_empty() {
            format!("clip_{}", index)
        } else {
            trimmed.to_string()
        };

        Self { index, start, end, title }
    }

    /// Checks the time range; an invalid request is skipped, not fatal
    pub fn validate(&self) -> Result<(), ValidationError> {
        let in_range = self.start.is_finite()
            && self.end.is_finite()
            && self.start >= 0.0
            && self.start < self.end;
        if !in_range {
            return Err(ValidationError::InvalidTimeRange {
                index: self.index,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Parse a clip definition of the form `START-END` or `START-END=TITLE`
    pub fn parse_spec(index: usize, spec: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidClipSpec(spec.to_string());

        let (range, title) = match spec.split_once('=') {
            Some((range, title)) => (range, title),
            None => (spec, ""),
        };
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(index, parse_time(start)?, parse_time(end)?, title))
    }

    /// Load clip definitions from a JSON file.
    ///
    /// The file holds an array of `{ "start": .., "end": .., "title": .. }`
    /// objects; times may be numbers of seconds or `HH:MM:SS` strings.
    pub fn load_from_file<P: AsRef<Path>>(path: P, first_index: usize) -> Result<Vec<Self>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read clips file: {:?}", path))?;
        let definitions: Vec<ClipDefinition> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse clips file: {:?}", path))?;

        definitions
            .into_iter()
            .enumerate()
            .map(|(offset, def)| {
                let index = first_index + offset;
                let start = def.start.seconds()?;
                let end = def.end.seconds()?;
                Ok(Self::new(index, start, end, def.title.unwrap_or_default()))
            })
            .collect::<Result<Vec<_>, ValidationError>>()
            .with_context(|| format!("Invalid clip in {:?}", path))
    }
}

/// Raw clip entry as stored in a clips file
#[derive(Debug, Deserialize)]
struct ClipDefinition {
    start: TimeValue,
    end: TimeValue,
    #[serde(default)]
    title: Option<String>,
}

/// Time given either as seconds or as a clock string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Seconds(f64),
    Text(String),
}

impl TimeValue {
    fn seconds(&self) -> Result<f64, ValidationError> {
        match self {
            Self::Seconds(s) => Ok(*s),
            Self::Text(t) => parse_time(t),
        }
    }
}

/// Parse `HH:MM:SS[.fff]`, `MM:SS[.fff]` or plain seconds into seconds
pub fn parse_time(value: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidTime(value.to_string());
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(invalid());
    }

    let parts: Vec<&str> = normalized.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [s] => ("0", "0", *s),
        [m, s] => ("0", *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: f64 = seconds.parse().map_err(|_| invalid())?;

    // Only the leading component may exceed its clock range
    if parts.len() > 1 && !(0.0..60.0).contains(&seconds) {
        return Err(invalid());
    }
    if parts.len() > 2 && minutes >= 60 {
        return Err(invalid());
    }
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes.checked_mul(60)?))
        .ok_or_else(invalid)?;
    Ok(whole as f64 + seconds)
}
