// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::OnceLock;

static MAX_LEVEL: OnceLock<LevelFilter> = OnceLock::new();
static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

/// Installs the stderr logger. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  let _ = MAX_LEVEL.set(level);
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// "🔴  File not found"
fn format_line(level: Level, args: &std::fmt::Arguments) -> String {
  let icon = match level {
    Level::Error => "🔴",
    Level::Warn => "🟠",
    Level::Info => "🔵",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  };
  format!("{}  {}\n", icon, args)
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= *MAX_LEVEL.get().unwrap_or(&LevelFilter::Info)
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let msg = format_line(record.level(), record.args());
      // Nothing sensible to do if stderr is gone.
      let _ = std::io::stderr().lock().write_all(msg.as_bytes());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
