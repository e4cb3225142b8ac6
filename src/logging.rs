//! File logging via `tracing`. The terminal belongs to the UI, so nothing is
//! written to stdout or stderr while the app runs.

use crate::config::Config;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "course-catalog.log";

/// Installs the global subscriber. The filter comes from `COURSES_LOG`
/// (see [`Config`]), e.g. `COURSES_LOG=course_catalog=debug`.
pub fn init(config: &Config) -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);
    let env_filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(log_dir = %log_dir.display(), api = %config.api_base_url, "Course catalog starting");
    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    ProjectDirs::from("org", "course-catalog", "course-catalog")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
