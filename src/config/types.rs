use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration from a `Stalefile.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// User variables available to command templates as `${name}`.
	#[serde(default)]
	pub vars: BTreeMap<String, String>,

	/// Rules in declaration order. The first one is the default rule.
	#[serde(default)]
	pub rules: Vec<RuleDecl>,
}

/// A rule as declared in the buildfile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RuleDecl {
	/// Target pattern, may contain `@` wildcards.
	pub target: String,

	/// Dependency patterns, instantiated with the target's captures.
	#[serde(default)]
	pub deps: Vec<String>,

	/// Command line(s) to run when the target is stale.
	pub run: Option<RunSpec>,
}

/// One command line or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RunSpec {
	One(String),
	Many(Vec<String>),
}

impl RunSpec {
	/// The command lines in execution order.
	pub fn commands(&self) -> &[String] {
		match self {
			RunSpec::One(command) => std::slice::from_ref(command),
			RunSpec::Many(commands) => commands,
		}
	}
}

/// The per-user file `~/.stale.toml`; only variables are read from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
	#[serde(default)]
	pub vars: BTreeMap<String, String>,
}

/// A loaded buildfile with the directory it governs.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration, with variables already layered.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,

	/// Directory that target and dependency paths are relative to.
	pub root: PathBuf,
}

impl RuleDecl {
	/// Validate the declaration on its own.
	pub fn validate(&self, index: usize) -> Result<(), crate::error::StaleError> {
		if self.target.trim().is_empty() {
			return Err(crate::error::StaleError::EmptyTarget { index });
		}
		Ok(())
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<(), crate::error::StaleError> {
		for (i, rule) in self.rules.iter().enumerate() {
			rule.validate(i + 1)?;
		}
		Ok(())
	}
}
