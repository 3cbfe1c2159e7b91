//! Buildfile loading and parsing for stale.
//!
//! This module handles:
//! - TOML buildfile parsing
//! - Buildfile discovery from the working directory upwards
//! - Variable layering (user file, buildfile, command line)

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	BUILDFILE_NAME, find_buildfile, load_buildfile, parse_var_assignment, user_config_path,
};
pub use parser::{generate_init_template, parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, RuleDecl, RunSpec, UserConfig};
