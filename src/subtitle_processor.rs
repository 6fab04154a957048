use std::fmt;
use std::fs;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

// @module: SRT formatting and tolerant parsing

// @const: One or more blank (possibly whitespace-only) lines between blocks
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("block separator regex is valid")
});

// @const: Literal arrow between the two timestamps of a timing line
const TIMING_ARROW: &str = " --> ";

// @struct: Caption line relative to one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionLine {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start in seconds from the clip start
    pub start: f64,

    // @field: End in seconds from the clip start
    pub end: f64,

    // @field: Caption text
    pub text: String,
}

impl CaptionLine {
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        CaptionLine {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for CaptionLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{}{}{}",
            SubtitleCodec::format_timestamp(self.start),
            TIMING_ARROW,
            SubtitleCodec::format_timestamp(self.end)
        )?;
        writeln!(f, "{}", self.text.trim())?;
        writeln!(f)
    }
}

/// SRT serializer and parser
pub struct SubtitleCodec;

impl SubtitleCodec {
    /// Format seconds as `HH:MM:SS,mmm`.
    ///
    /// The value is rounded to the nearest millisecond; hours keep growing
    /// past 99 instead of wrapping.
    pub fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }

    /// Parse `H:MM:SS[,mmm]` into fractional seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());
        let parts: Vec<&str> = timestamp.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: f64 = parts[2].replace(',', ".").parse().map_err(|_| invalid())?;
        if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
            return Err(invalid());
        }

        let whole = hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60))
            .ok_or_else(invalid)?;
        Ok(whole as f64 + seconds)
    }

    /// Serialize caption lines to SRT text
    pub fn format(lines: &[CaptionLine]) -> String {
        lines.iter().map(|line| line.to_string()).collect()
    }

    /// Parse SRT text into caption lines.
    ///
    /// Blocks with fewer than three lines or an unreadable timing line are
    /// skipped without error. Multi-line text is joined with single spaces.
    pub fn parse(content: &str) -> Vec<CaptionLine> {
        let mut lines = Vec::new();

        for (block_no, block) in BLOCK_SEPARATOR.split(content.trim()).enumerate() {
            let rows: Vec<&str> = block.lines().map(str::trim_end).collect();
            if rows.len() < 3 {
                debug!("Skipping subtitle block {}: only {} line(s)", block_no + 1, rows.len());
                continue;
            }

            let Some((start, end)) = Self::parse_timing(rows[1]) else {
                debug!("Skipping subtitle block {}: bad timing line '{}'", block_no + 1, rows[1]);
                continue;
            };

            let index = rows[0].trim().parse().unwrap_or(lines.len() + 1);
            let text = rows[2..]
                .iter()
                .map(|row| row.trim())
                .filter(|row| !row.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            lines.push(CaptionLine::new(index, start, end, text));
        }

        lines
    }

    /// Split a timing line on the arrow and parse both sides
    fn parse_timing(row: &str) -> Option<(f64, f64)> {
        let (start, end) = row.split_once(TIMING_ARROW)?;
        // Ignore positioning hints some editors append after the end time
        let end = end.split_whitespace().next()?;
        let start = Self::parse_timestamp(start).ok()?;
        let end = Self::parse_timestamp(end).ok()?;
        Some((start, end))
    }

    /// Write caption lines to an SRT file, creating parent directories
    pub fn write_to_srt<P: AsRef<Path>>(path: P, lines: &[CaptionLine]) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let file_error = |e: std::io::Error| SubtitleError::File {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(file_error)?;
        }
        fs::write(path, Self::format(lines)).map_err(file_error)
    }

    /// Read and parse an SRT file
    pub fn read_srt<P: AsRef<Path>>(path: P) -> Result<Vec<CaptionLine>, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SubtitleError::File {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&content))
    }
}
