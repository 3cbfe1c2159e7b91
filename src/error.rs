use std::path::PathBuf;

/// Library-level structured errors for stale.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum StaleError {
	#[error("No Stalefile.toml found in {start} or any parent directory")]
	BuildfileNotFound { start: PathBuf },

	#[error("Failed to read buildfile: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse buildfile: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Rule {index} has an empty target")]
	EmptyTarget { index: usize },

	#[error("Invalid command template `{template}`: {reason}")]
	InvalidTemplate { template: String, reason: String },

	#[error("Unknown variable `{name}` in command template `{template}`")]
	UnknownVariable { name: String, template: String },

	#[error("Invalid variable assignment `{input}` (expected NAME=VALUE)")]
	InvalidVarAssignment { input: String },

	#[error("No rules declared, nothing to build")]
	NoRules,

	#[error("no rule to make dependency {dependency} needed to make target {target}")]
	UnresolvableDependency { dependency: String, target: String },

	#[error(
		"cannot instantiate `{pattern}`: {wildcards} wildcard(s) but {captures} capture(s)"
	)]
	CaptureArityMismatch {
		pattern: String,
		wildcards: usize,
		captures: usize,
	},

	#[error("dependency cycle detected: {chain}")]
	DependencyCycle { chain: String },

	#[error("Failed to create directory: {path}")]
	CreateDirFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to list directory: {path}")]
	ListDirFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to echo command: {command}")]
	EchoFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error(
		"Command returned non-zero exit code: {command} (exit code: {})",
		describe_exit_code(.exit_code)
	)]
	ActionFailed {
		command: String,
		exit_code: Option<i32>,
	},

	#[error("Action for target {target} failed: {message}")]
	ActionError { target: String, message: String },
}

fn describe_exit_code(code: &Option<i32>) -> String {
	match code {
		Some(code) => code.to_string(),
		None => "killed by signal".to_string(),
	}
}

/// Result type alias using StaleError.
pub type Result<T> = std::result::Result<T, StaleError>;
