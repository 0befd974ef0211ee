use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

const LOG_FILE_PREFIX: &str = "bridge.log";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Keeps the non-blocking file writer alive; drop it last.
pub struct LoggingGuard {
    _worker_guard: WorkerGuard,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    if logging_config.filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    if logging_config.dir.as_os_str().is_empty() {
        return Err(anyhow!("logging.dir cannot be empty"));
    }

    let log_dir = resolve_log_dir(&logging_config.dir)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create logging directory {}", log_dir.display()))?;

    let purge_warnings =
        purge_expired_logs(&log_dir, LOG_FILE_PREFIX, logging_config.retention_days);
    let (file_writer, worker_guard) =
        tracing_appender::non_blocking(rolling_appender(&log_dir, &logging_config.rotation));

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_ansi(false)
        .with_writer(file_writer)
        .with_filter(build_env_filter(&logging_config.filter)?);

    let stderr_layer = logging_config.stderr_warn_enabled.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(LevelFilter::WARN)
    });

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %log_dir.display(),
        filter = %logging_config.filter,
        rotation = ?logging_config.rotation,
        retention_days = logging_config.retention_days,
        "logging_initialized"
    );
    for warning in purge_warnings {
        tracing::warn!(target: "logging", warning = %warning, "logging_retention_warning");
    }

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("failed to parse logging.filter '{filter}'"))
}

fn rolling_appender(log_dir: &Path, rotation: &LoggingRotation) -> RollingFileAppender {
    match rotation {
        LoggingRotation::Daily => rolling::daily(log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(log_dir, LOG_FILE_PREFIX),
    }
}

fn resolve_log_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    Ok(std::env::current_dir()
        .context("failed to read current working directory for logging.dir resolution")?
        .join(dir))
}

fn purge_expired_logs(log_dir: &Path, prefix: &str, retention_days: usize) -> Vec<String> {
    purge_expired_logs_at(log_dir, prefix, retention_days, SystemTime::now())
}

/// Removes files named `prefix*` last modified before the retention cutoff.
/// Problems are collected rather than raised, since the subscriber that
/// would report them does not exist yet.
fn purge_expired_logs_at(
    log_dir: &Path,
    prefix: &str,
    retention_days: usize,
    now: SystemTime,
) -> Vec<String> {
    let retention = Duration::from_secs((retention_days as u64).saturating_mul(SECONDS_PER_DAY));
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);
    let mut warnings = Vec::new();

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warnings.push(format!("failed to scan {}: {err}", log_dir.display()));
            return warnings;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warnings.push(format!("failed to read log directory entry: {err}"));
                continue;
            }
        };
        if !entry.file_name().to_string_lossy().starts_with(prefix) {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata().and_then(|metadata| {
            if metadata.is_file() {
                metadata.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(err) => {
                warnings.push(format!("failed to stat {}: {err}", path.display()));
                continue;
            }
        };

        if modified <= cutoff
            && let Err(err) = fs::remove_file(&path)
        {
            warnings.push(format!(
                "failed to remove expired log file {}: {err}",
                path.display()
            ));
        }
    }

    warnings
}
