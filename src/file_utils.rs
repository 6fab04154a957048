use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// Characters that are not allowed in file names on common filesystems
static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"));

// Video extensions accepted as clip sources
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !Self::dir_exists(path) {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Make a clip title usable as a file name.
    ///
    /// Path separators and reserved characters become `_`; surrounding dots
    /// and whitespace are stripped so a title can never escape the output
    /// folder. Falls back to `fallback` when nothing is left.
    pub fn sanitize_title(title: &str, fallback: &str) -> String {
        let replaced = UNSAFE_FILENAME_CHARS.replace_all(title.trim(), "_");
        let cleaned = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
        if cleaned.is_empty() {
            fallback.to_string()
        } else {
            cleaned.to_string()
        }
    }

    // @generates: Output path `<output_dir>/<file_name>.<extension>`
    pub fn clip_output_path<P: AsRef<Path>>(output_dir: P, file_name: &str, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        output_dir.as_ref().join(format!("{}.{}", file_name, extension))
    }

    // @checks: Extension is a known video container
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
