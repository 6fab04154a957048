/*!
 * Tests for file utilities
 */

use anyhow::Result;
use std::path::Path;
use clipcut::file_utils::FileManager;
use crate::common;

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");
    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));
    // Second call is a no-op
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

#[test]
fn test_ensure_dir_withExistingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "clips", "not a folder")?;
    assert!(FileManager::ensure_dir(&file).is_err());
    assert!(!FileManager::dir_exists(&file));
    Ok(())
}

#[test]
fn test_sanitizeTitle_withReservedCharacters_shouldReplaceThem() {
    assert_eq!(FileManager::sanitize_title("part 1/2: intro?", "clip_1"), "part 1_2_ intro_");
    assert_eq!(FileManager::sanitize_title("  ../..  ", "clip_7"), "_");
    assert_eq!(FileManager::sanitize_title("...", "clip_7"), "clip_7");
    assert_eq!(FileManager::sanitize_title("Best moment", "clip_1"), "Best moment");
}

#[test]
fn test_clipOutputPath_shouldJoinNameAndExtension() {
    let path = FileManager::clip_output_path("/out", "intro", ".mp4");
    assert_eq!(path, Path::new("/out/intro.mp4"));
    let srt = FileManager::clip_output_path("/out", "intro", "srt");
    assert_eq!(srt, Path::new("/out/intro.srt"));
}

#[test]
fn test_isVideoFile_shouldCheckExtension() {
    assert!(FileManager::is_video_file("talk.MP4"));
    assert!(FileManager::is_video_file("/x/y/clip.mkv"));
    assert!(!FileManager::is_video_file("notes.srt"));
    assert!(!FileManager::is_video_file("README"));
}

#[test]
fn test_writeAndRead_shouldRoundTripContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("sub").join("file.txt");
    FileManager::write_to_file(&path, "hello")?;
    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "hello");
    Ok(())
}
