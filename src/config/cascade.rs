use crate::config::parser::{parse_config_file, parse_user_config_file};
use crate::config::types::LoadedConfig;
use crate::error::{Result, StaleError};
use crate::rules::template::is_valid_var_name;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up when no explicit buildfile is given.
pub const BUILDFILE_NAME: &str = "Stalefile.toml";

/// Environment variable that, if truthy, skips `~/.stale.toml`.
pub const NO_USER_CONFIG_ENV: &str = "STALE_NO_USER_CONFIG";

/// Find the nearest `Stalefile.toml`, starting at `start_dir` and walking up.
pub fn find_buildfile(start_dir: &Path) -> Option<PathBuf> {
	start_dir
		.ancestors()
		.map(|dir| dir.join(BUILDFILE_NAME))
		.find(|candidate| candidate.is_file())
}

/// Locate, parse and layer the buildfile.
///
/// Variables are layered lowest to highest: `~/.stale.toml`, the buildfile's
/// `[vars]`, then `overrides` (usually from `--var`).
pub fn load_buildfile(
	explicit: Option<&Path>,
	cwd: &Path,
	overrides: &BTreeMap<String, String>,
) -> Result<LoadedConfig> {
	let path = match explicit {
		Some(path) if path.is_absolute() => path.to_path_buf(),
		Some(path) => cwd.join(path),
		None => find_buildfile(cwd).ok_or_else(|| StaleError::BuildfileNotFound {
			start: cwd.to_path_buf(),
		})?,
	};
	debug!(path = %path.display(), "loading buildfile");

	let mut config = parse_config_file(&path)?;

	let mut vars = load_user_vars()?;
	vars.append(&mut config.vars);
	vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
	config.vars = vars;

	let root = path
		.parent()
		.map(Path::to_path_buf)
		.unwrap_or_else(|| cwd.to_path_buf());

	Ok(LoadedConfig { config, path, root })
}

/// Load variables from `~/.stale.toml` if it exists and isn't disabled.
fn load_user_vars() -> Result<BTreeMap<String, String>> {
	if is_env_truthy(NO_USER_CONFIG_ENV) {
		return Ok(BTreeMap::new());
	}

	let Some(path) = user_config_path() else {
		return Ok(BTreeMap::new());
	};

	if path.is_file() {
		debug!(path = %path.display(), "loading user variables");
		Ok(parse_user_config_file(&path)?.vars)
	} else {
		Ok(BTreeMap::new())
	}
}

/// Get the path to the user's config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(".stale.toml"))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Parse a `NAME=VALUE` command-line assignment.
pub fn parse_var_assignment(input: &str) -> Result<(String, String)> {
	let invalid = || StaleError::InvalidVarAssignment {
		input: input.to_string(),
	};

	let (name, value) = input.split_once('=').ok_or_else(invalid)?;
	let name = name.trim();
	if !is_valid_var_name(name) {
		return Err(invalid());
	}

	Ok((name.to_string(), value.to_string()))
}
