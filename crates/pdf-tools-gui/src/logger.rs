use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    /// One line for the status bar
    pub fn status_line(&self) -> String {
        match self.level {
            Level::Error | Level::Warn => format!(
                "{} {}: {}",
                self.timestamp.format("%H:%M:%S"),
                self.level,
                self.message
            ),
            _ => format!("{} {}", self.timestamp.format("%H:%M:%S"), self.message),
        }
    }
}

/// In-memory log sink; the status bar shows the newest entry
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    max_entries: usize,
}

impl AppLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            max_entries,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Info);
        Ok(())
    }

    pub fn latest(&self) -> Option<LogEntry> {
        self.entries.lock().ok()?.last().cloned()
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            message: format!("{}", record.args()),
        };

        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.push(entry);

        // Keep only the most recent entries
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(0..excess);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_keeps_most_recent_entries() {
        let logger = AppLogger::new(2);
        for i in 0..3 {
            logger.log(
                &Record::builder()
                    .level(Level::Warn)
                    .args(format_args!("message {i}"))
                    .build(),
            );
        }
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("ignored"))
                .build(),
        );

        let latest = logger.latest().unwrap();
        assert_eq!(latest.message, "message 2");
        assert_eq!(latest.level, Level::Warn);
        assert_eq!(logger.entries.lock().unwrap().len(), 2);
    }
}
