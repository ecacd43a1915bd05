use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to set logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

const SUPPRESS_THRESHOLD: u32 = 10;

/// Gateway chatter that would otherwise drown the command logs.
static NOISY_PATTERNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["do_heartbeat", "recv_event", "recv;", "Received heartbeat ack"]));

#[derive(Debug)]
struct LoggerState {
    file: Option<File>,
    last_entry: Option<String>,
    repeat_count: u32,
}

/// Stdout + optional file logger that folds repeated lines.
pub struct BotLogger {
    level: LevelFilter,
    state: Mutex<LoggerState>,
}

impl BotLogger {
    pub fn new(log_file: Option<&str>, level: LevelFilter) -> Result<BotLogger, std::io::Error> {
        let file = match log_file {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        Ok(BotLogger {
            level,
            state: Mutex::new(LoggerState {
                file,
                last_entry: None,
                repeat_count: 0,
            }),
        })
    }

    pub fn init(log_file: Option<&str>, level: LevelFilter) -> Result<(), LoggerError> {
        let logger = BotLogger::new(log_file, level)?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(())
    }

    fn write_line(state: &mut LoggerState, line: &str) {
        let stamped = format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
        println!("{}", stamped);
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", stamped) {
                eprintln!("Failed to write log entry: {}", e);
            }
        }
    }

    fn flush_repeats(state: &mut LoggerState) {
        if state.repeat_count > 0 {
            let summary = format!("(previous message repeated {} times)", state.repeat_count);
            Self::write_line(state, &summary);
            state.repeat_count = 0;
        }
    }
}

impl Log for BotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        if NOISY_PATTERNS.iter().any(|pattern| message.contains(pattern)) {
            return;
        }

        let entry = format!("[{}] {}: {}", record.level(), record.target(), message);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.last_entry.as_deref() == Some(entry.as_str()) {
            state.repeat_count = state.repeat_count.saturating_add(1);
            if state.repeat_count >= SUPPRESS_THRESHOLD {
                Self::flush_repeats(&mut state);
            }
            return;
        }

        Self::flush_repeats(&mut state);
        Self::write_line(&mut state, &entry);
        state.last_entry = Some(entry);
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Self::flush_repeats(&mut state);
        if let Some(file) = state.file.as_mut() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_logger_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let logger = BotLogger::new(path.to_str(), LevelFilter::Info).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("pet_stats_bot")
                .args(format_args!("Loaded 3 pets"))
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[INFO] pet_stats_bot: Loaded 3 pets"));
    }

    #[test]
    fn test_logger_folds_duplicates() {
        let logger = BotLogger::new(None, LevelFilter::Info).unwrap();
        for _ in 0..6 {
            logger.log(
                &Record::builder()
                    .level(Level::Warn)
                    .target("pet_stats_bot")
                    .args(format_args!("duplicate message"))
                    .build(),
            );
        }

        let state = logger.state.lock().unwrap();
        assert_eq!(
            state.last_entry.as_deref(),
            Some("[WARN] pet_stats_bot: duplicate message")
        );
        assert_eq!(state.repeat_count, 5);
    }

    #[test]
    fn test_logger_respects_level_and_noise() {
        let logger = BotLogger::new(None, LevelFilter::Warn).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("do_heartbeat failed"))
                .build(),
        );

        let state = logger.state.lock().unwrap();
        assert!(state.last_entry.is_none());
    }
}
