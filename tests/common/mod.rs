/*!
 * Common test utilities for the clipcut test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use clipcut::TranscriptSegment;
use clipcut::media::MediaInfo;


/// Route library logs to the test output; safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a placeholder source video; the mock media backend never decodes it
pub fn create_test_video(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really a video")
}

/// A sample SRT document with three entries
pub fn sample_srt() -> &'static str {
    "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"
}

/// A 1920x1080, one minute, 25 fps source
pub fn landscape_info() -> MediaInfo {
    MediaInfo {
        width: 1920,
        height: 1080,
        duration: 60.0,
        fps: Some(25.0),
    }
}

/// Transcript segments spread over the first 30 seconds
pub fn sample_segments() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment::new(0.0, 4.0, "Welcome to the show"),
        TranscriptSegment::new(5.0, 15.0, "go now"),
        TranscriptSegment::new(16.0, 22.0, "Today we talk about clips"),
        TranscriptSegment::new(25.0, 30.0, "Thanks for watching"),
    ]
}
