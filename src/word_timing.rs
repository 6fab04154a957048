use serde::{Deserialize, Serialize};

use crate::subtitle_processor::CaptionLine;

// @module: Word-by-word caption timing

/// Length of the pop-in animation in seconds
pub const POP_DURATION: f64 = 0.1;

/// Scale factor at the first instant of a cue
pub const POP_START_SCALE: f64 = 1.3;

/// Visual parameters carried by every word cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordVisual {
    /// Font size in pixels
    pub font_size: u32,
    pub bold: bool,
    /// Distance in pixels between the frame's bottom edge and the text
    pub bottom_gap: u32,
}

impl Default for WordVisual {
    fn default() -> Self {
        Self {
            font_size: 48,
            bold: true,
            bottom_gap: 80,
        }
    }
}

/// One word shown on its own, horizontally centered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCue {
    pub text: String,
    /// Start in seconds from the clip start
    pub start: f64,
    /// End in seconds from the clip start
    pub end: f64,
    pub visual: WordVisual,
}

impl WordCue {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the cue is on screen at clip time `t`
    pub fn is_visible_at(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// Scale factor of the cue at clip time `t`
    pub fn scale_at(&self, t: f64) -> f64 {
        pop_scale(t - self.start)
    }
}

/// Pop-in scale as a function of the time elapsed since the cue appeared.
///
/// Decays linearly from 1.3 to 1.0 over the first 100ms, then holds.
pub fn pop_scale(elapsed: f64) -> f64 {
    let elapsed = elapsed.max(0.0);
    if elapsed < POP_DURATION {
        1.0 + (POP_START_SCALE - 1.0) * (1.0 - elapsed / POP_DURATION)
    } else {
        1.0
    }
}

/// Splits caption lines into evenly timed word cues
#[derive(Debug, Clone, Default)]
pub struct WordTimingSynthesizer {
    visual: WordVisual,
}

impl WordTimingSynthesizer {
    pub fn new(visual: WordVisual) -> Self {
        Self { visual }
    }

    /// Give every word of a line an equal share of the line's duration.
    ///
    /// Word length is ignored; lines without words contribute nothing.
    pub fn synthesize(&self, lines: &[CaptionLine]) -> Vec<WordCue> {
        let mut cues = Vec::new();

        for line in lines {
            let words: Vec<&str> = line.text.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }

            let word_duration = (line.end - line.start) / words.len() as f64;
            for (i, word) in words.into_iter().enumerate() {
                let start = line.start + i as f64 * word_duration;
                cues.push(WordCue {
                    text: word.to_string(),
                    start,
                    end: start + word_duration,
                    visual: self.visual,
                });
            }
        }

        cues
    }
}
