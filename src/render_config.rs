use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

// @module: Per-run render settings

/// Output resolution parsed from `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidResolution(s.to_string());
        let normalized = s.trim().to_lowercase();
        let (w, h) = normalized.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Aspect ratio parsed from `W:H` or a plain decimal ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAspectRatio(s.to_string());
        let normalized = s.trim().replace(' ', "");
        let (width, height) = match normalized.split_once(':') {
            Some((w, h)) => (
                w.parse::<f64>().map_err(|_| invalid())?,
                h.parse::<f64>().map_err(|_| invalid())?,
            ),
            None => (normalized.parse::<f64>().map_err(|_| invalid())?, 1.0),
        };
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Shape the cropper should produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetShape {
    /// Explicit output resolution; its ratio drives the crop
    Resolution(Resolution),
    /// Bare aspect ratio
    AspectRatio(AspectRatio),
}

impl TargetShape {
    /// Width and height whose ratio is the target aspect
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Self::Resolution(r) => (f64::from(r.width), f64::from(r.height)),
            Self::AspectRatio(a) => (a.width, a.height),
        }
    }

    pub fn aspect(&self) -> f64 {
        let (w, h) = self.dimensions();
        w / h
    }
}

/// Horizontal anchor used when the crop is narrower than the frame
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Centered
    #[default]
    #[serde(alias = "center", alias = "centre")]
    None,
    Left,
    Right,
}

impl FromStr for Alignment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "center" | "centre" | "" => Ok(Self::None),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ValidationError::InvalidChoice {
                field: "alignment",
                value: s.to_string(),
                expected: "none, left, right",
            }),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        };
        write!(f, "{}", name)
    }
}

/// Which captions to produce for each clip
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionMode {
    /// No transcription, no subtitles
    #[default]
    None,
    /// Sidecar SRT file next to each clip
    #[serde(alias = "srt")]
    Lines,
    /// Sidecar SRT plus word-by-word captions burned into the video
    #[serde(alias = "burn")]
    Words,
}

impl CaptionMode {
    pub fn wants_transcript(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn burns_words(&self) -> bool {
        matches!(self, Self::Words)
    }
}

impl FromStr for CaptionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "lines" | "srt" => Ok(Self::Lines),
            "words" | "burn" => Ok(Self::Words),
            _ => Err(ValidationError::InvalidChoice {
                field: "captions",
                value: s.to_string(),
                expected: "none, lines, words",
            }),
        }
    }
}

impl fmt::Display for CaptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Lines => "lines",
            Self::Words => "words",
        };
        write!(f, "{}", name)
    }
}

/// Immutable render settings for one batch run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderConfig {
    /// Crop target; `None` keeps native framing
    pub target: Option<TargetShape>,
    pub alignment: Alignment,
    pub caption_mode: CaptionMode,
    /// Scale the cropped clip to the exact target resolution
    pub scale_to_target: bool,
}

impl RenderConfig {
    /// Build render settings from the raw caller strings.
    ///
    /// Empty strings count as "not set". When both a resolution and an aspect
    /// ratio are given the resolution wins.
    pub fn parse(
        resolution: Option<&str>,
        aspect_ratio: Option<&str>,
        alignment: Alignment,
        caption_mode: CaptionMode,
        scale_to_target: bool,
    ) -> Result<Self, ValidationError> {
        let resolution = resolution
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Resolution::from_str)
            .transpose()?;
        let aspect_ratio = aspect_ratio
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(AspectRatio::from_str)
            .transpose()?;

        let target = match (resolution, aspect_ratio) {
            (Some(res), Some(aspect)) => {
                let res_ratio = f64::from(res.width) / f64::from(res.height);
                if (res_ratio - aspect.ratio()).abs() > 0.01 {
                    warn!(
                        "Aspect ratio {} does not match resolution {}; using the resolution",
                        aspect, res
                    );
                }
                Some(TargetShape::Resolution(res))
            }
            (Some(res), None) => Some(TargetShape::Resolution(res)),
            (None, Some(aspect)) => Some(TargetShape::AspectRatio(aspect)),
            (None, None) => None,
        };

        if scale_to_target && !matches!(target, Some(TargetShape::Resolution(_))) {
            warn!("scale_to_target needs a resolution; clips keep their cropped size");
        }

        Ok(Self {
            target,
            alignment,
            caption_mode,
            scale_to_target,
        })
    }

    /// Resolution the export should be scaled to, if any
    pub fn scale_resolution(&self) -> Option<Resolution> {
        match self.target {
            Some(TargetShape::Resolution(res)) if self.scale_to_target => Some(res),
            _ => None,
        }
    }
}
