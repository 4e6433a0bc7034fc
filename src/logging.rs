//! File-based logging. The terminal belongs to the TUI, so log records go to a
//! rotating file inside the data directory instead of stderr.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

const LOG_FILE_BASENAME: &str = "user-desk";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the logger. The returned handle must stay alive for the lifetime of
/// the process or buffered records are lost.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    info!(
        "event=app_start level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_level;

    #[test]
    fn normalize_level_accepts_known_levels() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("warning").unwrap(), "warn");
        assert_eq!(normalize_level("trace").unwrap(), "trace");
    }

    #[test]
    fn normalize_level_rejects_unknown_levels() {
        let err = normalize_level("loud").unwrap_err();
        assert!(err.to_string().contains("unsupported log level"));
    }
}
