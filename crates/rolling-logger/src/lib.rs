//! Rolling Logger
//!
//! `log` backend for the browser: every record goes to the devtools console
//! at the matching level and the last `capacity` records are kept in memory
//! for in-app diagnostics.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// One captured log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    /// Single-line rendering used for the console and the diagnostics panel
    pub fn format_line(&self) -> String {
        format!(
            "{} {:<5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Logger with a fixed-size circular buffer
pub struct RollingLogger {
    level: LevelFilter,
    capacity: usize,
    buffer: Mutex<VecDeque<LogEntry>>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self {
            level,
            capacity: capacity.max(1),
            buffer: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Append an entry, evicting the oldest once full
    pub fn push(&self, entry: LogEntry) {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(entry);
    }

    /// Snapshot of buffered entries, oldest first
    pub fn recent(&self) -> Vec<LogEntry> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        write_console(entry.level, &entry.format_line());
        self.push(entry);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    use web_sys::console;
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => console::error_1(&value),
        Level::Warn => console::warn_1(&value),
        Level::Info => console::info_1(&value),
        Level::Debug | Level::Trace => console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, _line: &str) {}

/// Install the global logger. Only the first call takes effect.
pub fn init(level: LevelFilter, capacity: usize) -> Result<&'static RollingLogger, SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, capacity));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(logger)
}

/// The installed logger, if `init` ran
pub fn logger() -> Option<&'static RollingLogger> {
    LOGGER.get()
}

/// Buffered entries of the installed logger (empty before `init`)
pub fn recent_entries() -> Vec<LogEntry> {
    logger().map(RollingLogger::recent).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: Level::Info,
            target: "test".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let logger = RollingLogger::new(LevelFilter::Info, 3);
        for i in 0..5 {
            logger.push(entry(&format!("m{}", i)));
        }
        let messages: Vec<_> = logger.recent().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_level_filter() {
        let logger = RollingLogger::new(LevelFilter::Warn, 10);
        logger.log(&Record::builder().level(Level::Info).args(format_args!("quiet")).build());
        logger.log(&Record::builder().level(Level::Error).target("api").args(format_args!("loud")).build());

        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "loud");
        assert_eq!(recent[0].target, "api");
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let logger = RollingLogger::new(LevelFilter::Trace, 0);
        logger.push(entry("a"));
        logger.push(entry("b"));
        assert_eq!(logger.capacity(), 1);
        assert_eq!(logger.recent()[0].message, "b");
    }

    #[test]
    fn test_format_line() {
        let line = entry("hello").format_line();
        assert!(line.contains("INFO"));
        assert!(line.ends_with("test: hello"));
    }
}
