/*!
 * Tests for transcript selection and rebasing
 */

use clipcut::transcription::{Transcript, TranscriptSegment, TranscriptSegmenter};
use crate::common;

#[test]
fn test_selectAndRebase_withSegmentStraddlingStart_shouldClipToZero() {
    let segments = vec![TranscriptSegment::new(5.0, 15.0, "hello world")];
    let lines = TranscriptSegmenter::select_and_rebase(&segments, 10.0, 20.0);

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].index, 1);
    assert_eq!(lines[0].start, 0.0);
    assert_eq!(lines[0].end, 5.0);
    assert_eq!(lines[0].text, "hello world");
}

#[test]
fn test_selectAndRebase_withSegmentStraddlingEnd_shouldClipToClipLength() {
    let segments = vec![TranscriptSegment::new(18.0, 25.0, "tail")];
    let lines = TranscriptSegmenter::select_and_rebase(&segments, 10.0, 20.0);
    assert_eq!(lines[0].start, 8.0);
    assert_eq!(lines[0].end, 10.0);
}

#[test]
fn test_selectAndRebase_withTouchingBoundaries_shouldExcludeThem() {
    let segments = vec![
        TranscriptSegment::new(0.0, 10.0, "ends at clip start"),
        TranscriptSegment::new(20.0, 30.0, "starts at clip end"),
        TranscriptSegment::new(12.0, 14.0, "inside"),
    ];
    let lines = TranscriptSegmenter::select_and_rebase(&segments, 10.0, 20.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "inside");
    assert_eq!(lines[0].index, 1);
}

#[test]
fn test_selectAndRebase_withNoOverlap_shouldBeEmpty() {
    let lines = TranscriptSegmenter::select_and_rebase(&common::sample_segments(), 40.0, 50.0);
    assert!(lines.is_empty());
}

#[test]
fn test_selectAndRebase_withManySegments_shouldStayInsideClipAndNumberFromOne() {
    let (clip_start, clip_end) = (3.0, 24.0);
    let lines = TranscriptSegmenter::select_and_rebase(&common::sample_segments(), clip_start, clip_end);

    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.index, i + 1);
        assert!(line.start >= 0.0);
        assert!(line.end <= clip_end - clip_start);
        assert!(line.start <= line.end);
    }
    assert_eq!(lines[0].text, "Welcome to the show");
    assert_eq!(lines[0].start, 0.0);
    assert_eq!(lines[0].end, 1.0);
}

#[test]
fn test_transcript_new_withUnorderedSegments_shouldSortByStart() {
    let transcript = Transcript::new(
        vec![
            TranscriptSegment::new(5.0, 6.0, "b"),
            TranscriptSegment::new(1.0, 2.0, "a"),
        ],
        None,
    );
    assert_eq!(transcript.segments()[0].text, "a");
    assert_eq!(transcript.len(), 2);
    assert!(!transcript.is_empty());
}
