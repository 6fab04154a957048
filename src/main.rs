// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use clipcut::app_config::{self, Config};
use clipcut::file_utils::FileManager;
use clipcut::render_config::{Alignment, CaptionMode};
use clipcut::{BatchJob, ClipRequest, Controller};

/// CLI Wrapper for Alignment to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliAlignment {
    None,
    Left,
    Right,
}

impl From<CliAlignment> for Alignment {
    fn from(cli_alignment: CliAlignment) -> Self {
        match cli_alignment {
            CliAlignment::None => Alignment::None,
            CliAlignment::Left => Alignment::Left,
            CliAlignment::Right => Alignment::Right,
        }
    }
}

/// CLI Wrapper for CaptionMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliCaptionMode {
    None,
    Lines,
    Words,
}

impl From<CliCaptionMode> for CaptionMode {
    fn from(cli_mode: CliCaptionMode) -> Self {
        match cli_mode {
            CliCaptionMode::None => CaptionMode::None,
            CliCaptionMode::Lines => CaptionMode::Lines,
            CliCaptionMode::Words => CaptionMode::Words,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cut clips from a video (default command)
    Extract(ExtractArgs),

    /// Generate shell completions for clipcut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ExtractArgs {
    /// Source video to cut clips from
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Folder receiving the clips
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Clip to cut, as START-END or START-END=TITLE (repeatable)
    #[arg(long = "clip", value_name = "START-END[=TITLE]")]
    clips: Vec<String>,

    /// JSON file with a list of {start, end, title} clips
    #[arg(long, value_name = "FILE")]
    clips_file: Option<PathBuf>,

    /// Target resolution, e.g. 1080x1920
    #[arg(short, long)]
    resolution: Option<String>,

    /// Target aspect ratio, e.g. 9:16 (ignored when a resolution is given)
    #[arg(short, long)]
    aspect_ratio: Option<String>,

    /// Horizontal crop anchor
    #[arg(long, value_enum)]
    alignment: Option<CliAlignment>,

    /// Caption output
    #[arg(long, value_enum)]
    captions: Option<CliCaptionMode>,

    /// Scale cropped clips to the exact target resolution
    #[arg(long)]
    scale: bool,

    /// Spoken language code (e.g., 'en', 'es', 'fr'); detected when omitted
    #[arg(long)]
    language: Option<String>,

    /// Whisper model name
    #[arg(short, long)]
    model: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// clipcut - cut short clips out of a long video
///
/// Extracts several clips from one source video, optionally cropping them
/// to a vertical or custom shape and adding Whisper-generated captions.
#[derive(Parser, Debug)]
#[command(name = "clipcut")]
#[command(version)]
#[command(about = "Cut several clips from a video, with optional reframing and captions")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "clipcut cuts several clips from one source video in a single run.

EXAMPLES:
    clipcut talk.mp4 -o clips --clip 10-25=intro --clip 1:05-1:40=demo
    clipcut talk.mp4 -o clips --clips-file clips.json -r 1080x1920 --alignment left
    clipcut talk.mp4 -o clips --clip 0-30 -a 9:16 --captions words
    clipcut talk.mp4 -o clips --clip 0-30 --captions lines --language en
    clipcut completions bash > clipcut.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

CAPTIONS:
    none  - no transcription
    lines - one SRT file per clip
    words - SRT file plus word-by-word captions burned into the video")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    extract: ExtractArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => "🎬 ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The global max level is adjusted after the config is read
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @returns: Log filter for a configured level
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "clipcut", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(args).await,
        None => run_extract(cli.extract).await,
    }
}

/// Load the configuration file, writing a default one when it is missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let content = FileManager::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

/// Override config values with CLI options if provided
fn apply_overrides(config: &mut Config, options: &ExtractArgs) {
    if let Some(resolution) = &options.resolution {
        config.render.resolution = Some(resolution.clone());
    }
    if let Some(aspect_ratio) = &options.aspect_ratio {
        config.render.aspect_ratio = Some(aspect_ratio.clone());
    }
    if let Some(alignment) = &options.alignment {
        config.render.alignment = alignment.clone().into();
    }
    if let Some(captions) = &options.captions {
        config.render.captions = captions.clone().into();
    }
    if options.scale {
        config.render.scale_to_target = true;
    }
    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

/// Collect clip requests from `--clip` values, then from the clips file
fn collect_clips(options: &ExtractArgs) -> Result<Vec<ClipRequest>> {
    let mut clips = options
        .clips
        .iter()
        .enumerate()
        .map(|(i, spec)| ClipRequest::parse_spec(i + 1, spec))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(clips_file) = &options.clips_file {
        let from_file = ClipRequest::load_from_file(clips_file, clips.len() + 1)?;
        clips.extend(from_file);
    }

    Ok(clips)
}

async fn run_extract(options: ExtractArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    let render = config.render_config()?;
    let clips = collect_clips(&options)?;
    if clips.is_empty() {
        return Err(anyhow!("No clips requested; use --clip START-END or --clips-file"));
    }

    let job = BatchJob {
        source: options.source.clone(),
        output_dir: options.output_dir.clone(),
        clips,
        render,
        force_overwrite: options.force_overwrite,
    };

    let controller = Controller::with_config(config)?;
    let report = controller.run_batch(&job).await?;

    info!(
        "Done at {:.3} fps: {} exported, {} skipped, {} failed",
        report.frame_rate,
        report.exported_count(),
        report.skipped_count(),
        report.failed_count()
    );
    for outcome in report.outcomes.iter().filter(|o| o.is_failed()) {
        error!("{}", outcome.summary());
    }

    if report.has_failures() {
        return Err(anyhow!("{} clip(s) failed", report.failed_count()));
    }
    Ok(())
}
