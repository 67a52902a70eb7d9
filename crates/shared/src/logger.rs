use std::{
    fs::{File, create_dir_all},
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tracing::{Level, subscriber::set_global_default};
use tracing_subscriber::{layer::SubscriberExt, registry};

/// Create and set the global loggers. Returns the path of the run log so
/// the binary can archive it into the backup destination once the run
/// completes.
pub fn init_logger(log_directory: &Path) -> Result<PathBuf, LoggerError> {
    create_dir_all(log_directory).map_err(LoggerError::CreateDirectory)?;

    let filter = tracing_subscriber::filter::Targets::new().with_default(Level::INFO);

    // File layer. The writer is unbuffered so the log is complete on disk
    // when the run copies it next to the backups.
    let (log_path, file_layer) = {
        let file_name = format!(
            "run-{}.log",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let log_path = log_directory.join(file_name);
        let file = File::create(&log_path).map_err(LoggerError::CreateLogFile)?;

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(false);

        (log_path, layer)
    };

    // Std layer
    let std_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false);

    // Create registry
    let registry = registry().with(file_layer).with(std_layer).with(filter);

    // Set global subscriber
    set_global_default(registry).unwrap();

    Ok(log_path)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create log directory:\n{0}")]
    CreateDirectory(#[source] io::Error),

    #[error("Failed to create log file:\n{0}")]
    CreateLogFile(#[source] io::Error),
}
