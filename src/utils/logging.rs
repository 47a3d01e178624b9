use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

use super::dir::APPLICATION_NAME;

pub const CLI_PREFIX: &str = "cli";
const MAX_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Builds the filter directive. An explicit level wins over `RUST_LOG`. A bare level is scoped to
/// this crate so dependencies stay quiet, a `RUST_LOG` that already names targets is kept as is.
fn log_directive(log_level: Option<LevelFilter>, rust_log: Option<String>) -> String {
    match (log_level, rust_log) {
        (Some(level), _) => format!("{APPLICATION_NAME}={level}"),
        (None, Some(rust_log)) if rust_log.contains('=') => rust_log,
        (None, Some(rust_log)) if !rust_log.trim().is_empty() => {
            format!("{APPLICATION_NAME}={}", rust_log.trim())
        }
        (None, _) => format!("{APPLICATION_NAME}={DEFAULT_LEVEL}"),
    }
}

/// Writes logs into daily rotated `<prefix>.<date>.log` files under `application_data_path/logs`.
/// Stdout only gets a copy when `show_std` is set.
pub fn enable_logging(
    prefix: &str,
    application_data_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(application_data_path.join("logs"))?;

    let stdout = std::io::stdout.with_filter(move |_| show_std);
    let directive = log_directive(log_level, std::env::var("RUST_LOG").ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&directive)?)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_directive(Some(LevelFilter::TRACE), None)))
        .with_test_writer()
        .pretty()
        .init()
});
