//! Logging module for inspection runs
//!
//! Provides a global file logger used to record inspector faults and run
//! summaries for debugging. Logging is off until `init_logger` is called;
//! every entry point is a no-op while the logger is uninitialized.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<InspectLogger>> = Mutex::new(None);

/// Logger for inspection operations
pub struct InspectLogger {
    file: File,
}

impl InspectLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/phpinspect-{}.log", timestamp))
    });

    let logger = InspectLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Log a run summary
pub fn log_run_summary(diagnostics: usize, faults: usize) {
    section("INSPECTION COMPLETE");
    log(&format!("Diagnostics reported: {}", diagnostics));
    log(&format!("Inspector faults contained: {}", faults));
}
