use crate::crop::CropRectangle;
use crate::media::{ClipEdit, EditOperation, TextStyle};
use crate::render_config::Resolution;
use crate::word_timing::{POP_DURATION, POP_START_SCALE, WordCue, WordVisual};

// @module: ffmpeg filter graph construction

// Characters the filter option parser treats specially
const OPTION_SPECIALS: &[char] = &['\\', '\'', ':'];

// Characters the filter graph parser treats specially
const GRAPH_SPECIALS: &[char] = &['\\', '\'', ',', ';', '[', ']'];

fn escape_with(value: &str, specials: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if specials.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape an option value for use inside a `-vf` filter graph.
///
/// Applies both escaping levels: one for the option parser, then one for
/// the graph parser that sees the whole filter description first.
pub fn escape_filter_value(value: &str) -> String {
    escape_with(&escape_with(value, OPTION_SPECIALS), GRAPH_SPECIALS)
}

pub fn crop_filter(rect: &CropRectangle) -> String {
    format!("crop={}:{}:{}:{}", rect.width, rect.height, rect.x, rect.y)
}

pub fn scale_filter(resolution: &Resolution) -> String {
    format!("scale={}:{}", resolution.width, resolution.height)
}

/// `fontsize` expression mirroring `word_timing::pop_scale`
pub fn pop_fontsize_expr(visual: &WordVisual, start: f64) -> String {
    format!(
        "{}*(1+{:.1}*max(0,1-(t-{:.3})/{}))",
        visual.font_size,
        POP_START_SCALE - 1.0,
        start,
        POP_DURATION
    )
}

/// Visibility window `[start, end)` as an `enable` expression
pub fn enable_expr(start: f64, end: f64) -> String {
    format!("gte(t,{:.3})*lt(t,{:.3})", start, end)
}

/// Draw one word cue, horizontally centered, `bottom_gap` above the bottom edge
pub fn drawtext_filter(cue: &WordCue, style: &TextStyle) -> String {
    let font = match &style.font_file {
        Some(file) => format!("fontfile={}", escape_filter_value(file)),
        None if cue.visual.bold => format!("font={}", escape_filter_value(&format!("{}:style=Bold", style.font))),
        None => format!("font={}", escape_filter_value(&style.font)),
    };

    format!(
        "drawtext=text={}:expansion=none:{}:fontcolor={}:fontsize={}:x=(w-text_w)/2:y=h-{}:enable={}",
        escape_filter_value(&cue.text),
        font,
        escape_filter_value(&style.color),
        escape_filter_value(&pop_fontsize_expr(&cue.visual, cue.start)),
        cue.visual.bottom_gap,
        escape_filter_value(&enable_expr(cue.start, cue.end)),
    )
}

/// Compile the edit's operations into a comma-separated filter chain.
///
/// libx264 with yuv420p needs even dimensions, so an odd final frame is
/// trimmed by one pixel on the right or bottom. Returns `None` when the clip
/// needs no filtering.
pub fn build_filter_chain(edit: &ClipEdit) -> Option<String> {
    let mut filters = Vec::new();

    for op in edit.operations() {
        match op {
            EditOperation::Crop(rect) => filters.push(crop_filter(rect)),
            EditOperation::Scale(res) => filters.push(scale_filter(res)),
            EditOperation::Overlay { cues, style } => {
                filters.extend(cues.iter().map(|cue| drawtext_filter(cue, style)));
            }
        }
    }

    let (width, height) = edit.frame_size();
    if width % 2 != 0 || height % 2 != 0 {
        filters.push(crop_filter(&CropRectangle {
            x: 0,
            y: 0,
            width: width - width % 2,
            height: height - height % 2,
        }));
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters.join(","))
    }
}
