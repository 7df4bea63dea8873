//! Session logger with file output and UI callback support.
//!
//! Each run of the harness gets its own log file. Messages are written
//! to the file and forwarded to an optional UI callback so an embedder
//! can mirror the transcript in its own surface.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogLevel, SessionConfig, UiLogCallback};

/// Logger for a single harness session.
///
/// Writes to a dedicated log file and optionally forwards each line to
/// a UI callback. Callers share it behind an `Arc` when logging from
/// worker threads.
pub struct SessionLog {
    session_name: String,
    log_path: PathBuf,
    file_writer: Mutex<Option<BufWriter<File>>>,
    callback: Mutex<Option<UiLogCallback>>,
    config: SessionConfig,
}

impl SessionLog {
    /// Create a new session logger.
    ///
    /// The log file is created under `log_dir` named after the
    /// sanitized session name.
    pub fn new(
        session_name: &str,
        log_dir: impl AsRef<Path>,
        config: SessionConfig,
        callback: Option<UiLogCallback>,
    ) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        std::fs::create_dir_all(log_dir)?;

        let filename = format!("{}.log", sanitize_filename(session_name));
        let log_path = log_dir.join(filename);
        let file = File::create(&log_path)?;

        tracing::info!("Session log created: {}", log_path.display());

        Ok(Self {
            session_name: session_name.to_string(),
            log_path,
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            callback: Mutex::new(callback),
            config,
        })
    }

    /// Session name this logger was created with.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Path to the log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the given level.
    ///
    /// Messages below the configured level are dropped.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log an informational message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &format!("[WARNING] {}", message));
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &format!("[ERROR] {}", message));
    }

    /// Log a critical message.
    ///
    /// Critical shares the error level but keeps its own tag so it
    /// stands out in the transcript.
    pub fn critical(&self, message: &str) {
        self.log(LogLevel::Error, &format!("[CRITICAL] {}", message));
    }

    /// Format a message with an optional timestamp.
    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    /// Write a formatted line to the file and the UI callback.
    fn output(&self, formatted: &str) {
        {
            let mut writer = self.file_writer.lock();
            if let Some(w) = writer.as_mut() {
                if let Err(e) = writeln!(w, "{}", formatted) {
                    tracing::warn!("Failed to write to session log: {}", e);
                }
            }
        }

        let callback = self.callback.lock();
        if let Some(cb) = callback.as_ref() {
            cb(formatted);
        }
    }

    /// Flush buffered output to disk.
    pub fn flush(&self) {
        let mut writer = self.file_writer.lock();
        if let Some(w) = writer.as_mut() {
            if let Err(e) = w.flush() {
                tracing::warn!("Failed to flush session log: {}", e);
            }
        }
    }

    /// Close the log file, flushing any buffered output.
    pub fn close(&self) {
        let mut writer = self.file_writer.lock();
        if let Some(mut w) = writer.take() {
            if let Err(e) = w.flush() {
                tracing::warn!("Failed to flush session log on close: {}", e);
            }
        }
    }
}

impl Drop for SessionLog {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a session name for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::Arc;

    use super::*;
    use crate::logging::init_test_tracing;

    fn test_config() -> SessionConfig {
        SessionConfig {
            level: LogLevel::Debug,
            show_timestamps: false,
        }
    }

    #[test]
    fn creates_log_file_named_after_the_session() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new("demo-run", dir.path(), test_config(), None).unwrap();

        assert_eq!(log.session_name(), "demo-run");
        assert!(log.log_path().exists());
        assert!(log.log_path().ends_with("demo-run.log"));
    }

    #[test]
    fn writes_leveled_lines_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new("leveled", dir.path(), test_config(), None).unwrap();

        log.info("starting up");
        log.warn("low disk space");
        log.error("handler exploded");
        log.critical("cannot continue");
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("starting up"));
        assert!(contents.contains("[WARNING] low disk space"));
        assert!(contents.contains("[ERROR] handler exploded"));
        assert!(contents.contains("[CRITICAL] cannot continue"));
    }

    #[test]
    fn forwards_lines_to_the_ui_callback() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel::<String>();
        let callback: UiLogCallback = Box::new(move |line| {
            let _ = tx.send(line.to_string());
        });
        let log = SessionLog::new("mirrored", dir.path(), test_config(), Some(callback)).unwrap();

        log.info("hello surface");

        let line = rx.recv().unwrap();
        assert_eq!(line, "hello surface");
    }

    #[test]
    fn flush_writes_buffered_lines_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new("durable", dir.path(), test_config(), None).unwrap();

        log.info("buffered line");
        log.flush();

        // still open for writing; the line is already on disk
        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("buffered line"));

        log.info("a later line");
        log.close();
        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(contents.contains("a later line"));
    }

    #[test]
    fn drops_messages_below_the_configured_level() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            level: LogLevel::Warn,
            show_timestamps: false,
        };
        let log = SessionLog::new("quiet", dir.path(), config, None).unwrap();

        log.debug("you will not see this");
        log.info("nor this");
        log.warn("but this survives");
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(!contents.contains("you will not see this"));
        assert!(!contents.contains("nor this"));
        assert!(contents.contains("[WARNING] but this survives"));
    }

    #[test]
    fn timestamps_prefix_each_line_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            level: LogLevel::Info,
            show_timestamps: true,
        };
        let log = SessionLog::new("stamped", dir.path(), config, None).unwrap();

        log.info("tick");
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        let line = contents.lines().next().unwrap();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] tick"));
    }

    #[test]
    fn sanitizes_awkward_session_names() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new("run: 01/02", dir.path(), test_config(), None).unwrap();

        assert!(log.log_path().ends_with("run__01_02.log"));
    }

    #[test]
    fn is_shareable_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(SessionLog::new("shared", dir.path(), test_config(), None).unwrap());

        let mut handles = Vec::new();
        for i in 0..4 {
            let log = Arc::clone(&log);
            handles.push(std::thread::spawn(move || {
                log.info(&format!("worker {} reporting", i));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        log.close();

        let contents = std::fs::read_to_string(log.log_path()).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }
}
