use crate::config::types::{Config, UserConfig};
use crate::error::{Result, StaleError};
use std::path::Path;

/// Parse a buildfile from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = read_file(path)?;
	parse_config_str(&content, path)
}

/// Parse a buildfile from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| StaleError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

/// Parse the per-user variables file.
pub fn parse_user_config_file(path: &Path) -> Result<UserConfig> {
	let content = read_file(path)?;
	toml::from_str(&content).map_err(|source| StaleError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

fn read_file(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| StaleError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Contents written by `stale --init`.
pub fn generate_init_template() -> &'static str {
	r#"# Stalefile.toml
#
# Rules are checked in order; the first one is built when no target is given.
# `@` in a target is a wildcard. Whatever it matched is substituted into the
# `@` of each dependency of the same rule.
#
# Command lines may use:
#   $@  the target    $<  the first dependency    $^  all dependencies
#   ${name}  a variable from [vars], ~/.stale.toml or --var name=value

[vars]
cc = "cc"
cflags = "-Wall"

[[rules]]
target = "all"
deps = ["bin/main"]

[[rules]]
target = "bin/@"
deps = ["build/@.o"]
run = "${cc} -o $@ $^"

[[rules]]
target = "build/@.o"
deps = ["src/@.c"]
run = "${cc} ${cflags} -c $< -o $@"
"#
}
