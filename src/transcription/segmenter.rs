use crate::subtitle_processor::CaptionLine;
use crate::transcription::TranscriptSegment;

/// Maps the shared transcript onto one clip's timeline
pub struct TranscriptSegmenter;

impl TranscriptSegmenter {
    /// Select the segments overlapping `[clip_start, clip_end)` and rebase them.
    ///
    /// Overlap is half-open: a segment ending exactly at `clip_start` or
    /// starting exactly at `clip_end` is left out. Partially overlapping
    /// segments are clipped to the clip boundaries. Lines are numbered from 1
    /// in transcript order.
    pub fn select_and_rebase(
        segments: &[TranscriptSegment],
        clip_start: f64,
        clip_end: f64,
    ) -> Vec<CaptionLine> {
        let clip_length = clip_end - clip_start;

        segments
            .iter()
            .filter(|segment| segment.end > clip_start && segment.start < clip_end)
            .enumerate()
            .map(|(i, segment)| {
                CaptionLine::new(
                    i + 1,
                    (segment.start - clip_start).max(0.0),
                    (segment.end - clip_start).min(clip_length),
                    segment.text.trim(),
                )
            })
            .collect()
    }
}
