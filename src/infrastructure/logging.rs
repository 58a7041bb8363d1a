//! Logging system configuration and initialization
//!
//! - Console (stderr) and/or daily file output
//! - Optional structured JSON lines
//! - KST (Korea Standard Time) timestamps
//! - `RUST_LOG` overrides the configured filter

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{FixedOffset, Utc};
use once_cell::sync::Lazy;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "ko-drink.log";
const KST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Dependency targets that stay quiet unless TRACE is requested
const NOISY_TARGETS: [(&str, &str); 5] = [
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
];

// Global guard to keep the log file writer alive
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Custom time formatter for KST (Korea Standard Time, UTC+9)
struct KstTimeFormatter;

impl FormatTime for KstTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let kst_offset = FixedOffset::east_opt(KST_OFFSET_SECONDS).ok_or(std::fmt::Error)?;
        let kst_time = Utc::now().with_timezone(&kst_offset);
        write!(w, "{}", kst_time.format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Filter from the configured level, noisy dependencies clamped unless TRACE
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in NOISY_TARGETS {
            filter = filter.add_directive(format!("{}={}", target, level).parse()?);
        }
    }

    for (module, level) in &config.module_filters {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .with_context(|| format!("Invalid module filter {}={}", module, level))?,
        );
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// ```bash
/// # Show detailed HTTP logs
/// RUST_LOG="debug,reqwest=debug,hyper=debug" ko-drink search 감향주
/// ```
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(config)?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut log_dir = None;

    if config.file_output {
        let dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;

        let (file_writer, file_guard) = non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(file_guard);
        }

        let file_layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(KstTimeFormatter)
            .with_ansi(false);
        layers.push(if config.json_format {
            file_layer
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            file_layer.with_target(false).boxed()
        });
        log_dir = Some(dir);
    }

    if config.console_output {
        let console_layer = fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(KstTimeFormatter);
        layers.push(if config.json_format {
            console_layer.json().boxed()
        } else {
            console_layer.with_target(false).boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if let Some(dir) = log_dir {
        info!("Log directory: {:?}", dir);
    }

    Ok(())
}
