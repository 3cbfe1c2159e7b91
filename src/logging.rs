//! Logging setup for stale using `tracing` + `tracing-subscriber`.
//!
//! The log level is chosen from, in order:
//! 1. the `--log-level` flag
//! 2. the `STALE_LOG` environment variable (e.g. "info", "debug")
//! 3. `warn`
//!
//! Log lines go to stderr; stdout carries only the echoed commands.

use clap::ValueEnum;
use tracing::Level;

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_ENV: &str = "STALE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

impl From<LogLevel> for Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Error => Level::ERROR,
			LogLevel::Warn => Level::WARN,
			LogLevel::Info => Level::INFO,
			LogLevel::Debug => Level::DEBUG,
			LogLevel::Trace => Level::TRACE,
		}
	}
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) {
	let level = resolve_level(cli_level, std::env::var(LOG_ENV).ok().as_deref());

	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
	match cli_level {
		Some(level) => level.into(),
		None => env_value.and_then(parse_level_str).unwrap_or(Level::WARN),
	}
}

fn parse_level_str(s: &str) -> Option<Level> {
	match s.trim().to_lowercase().as_str() {
		"error" => Some(Level::ERROR),
		"warn" | "warning" => Some(Level::WARN),
		"info" => Some(Level::INFO),
		"debug" => Some(Level::DEBUG),
		"trace" => Some(Level::TRACE),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_flag_wins_over_env() {
		assert_eq!(resolve_level(Some(LogLevel::Debug), Some("error")), Level::DEBUG);
	}

	#[test]
	fn test_env_fallback() {
		assert_eq!(resolve_level(None, Some(" Info ")), Level::INFO);
		assert_eq!(resolve_level(None, Some("warning")), Level::WARN);
	}

	#[test]
	fn test_default_is_warn() {
		assert_eq!(resolve_level(None, None), Level::WARN);
		assert_eq!(resolve_level(None, Some("loud")), Level::WARN);
	}
}
