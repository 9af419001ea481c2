//! Logging Initialization
//!
//! Sets up:
//! 1. A stdout logger (pretty formatted).
//! 2. A file logger (JSON formatted, daily rolling) in the app data
//!    directory.
//! 3. Redirection of standard `log` crate events to `tracing`; the rest
//!    of the crate logs through the `log` macros.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "caseweaver.log";

/// Initialize the logging system, writing files under the default data
/// directory.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of
/// the application to ensure buffered logs are flushed on shutdown.
pub fn init() -> WorkerGuard {
    // Logs live in the app data directory, not the working tree.
    let log_dir = dirs::data_dir()
        .map(|d| d.join("caseweaver").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    init_with_dir(log_dir)
}

/// Like [`init`], but with an explicit log directory. Embedding
/// applications that resolve their own data directory use this variant.
pub fn init_with_dir(log_dir: PathBuf) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    // Stdout layer: pretty human-readable format
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    tracing::info!(
        log_file = ?log_dir.join(LOG_FILE_PREFIX),
        "Logging initialized (daily rolling)"
    );

    guard
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// ============================================================================
// Tests
// ============================================================================
