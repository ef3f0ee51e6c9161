use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;

/// Overrides the configured log directory with an explicit file
pub const LOG_PATH_ENV: &str = "CLASHDASH_LOG_PATH";

const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Initialize logging, writing to CLASHDASH_LOG_PATH or `log_dir` if given,
/// otherwise stderr.
///
/// Keep the returned guard alive for the life of the process so buffered
/// lines get flushed.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let log_path = std::env::var(LOG_PATH_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(|| log_dir.map(|dir| dir.join("clashdash.log")));

    let mut file_error = None;
    if let Some(path) = log_path {
        match open_appender(&path) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .init();
                return Some(guard);
            }
            Err(e) => file_error = Some((path, e)),
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    if let Some((path, e)) = file_error {
        tracing::warn!(error = %e, path = %path.display(), "Cannot open log file, logging to stderr");
    }
    None
}

fn open_appender(path: &Path) -> std::io::Result<BasicRollingFileAppender> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let condition = RollingConditionBasic::new().max_size(MAX_LOG_BYTES);
    BasicRollingFileAppender::new(path, condition, MAX_LOG_FILES)
}
