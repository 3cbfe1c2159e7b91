use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stale_cli::build::{BuildOptions, discover_targets, run_build};
use stale_cli::config::{
	BUILDFILE_NAME, LoadedConfig, generate_init_template, load_buildfile, parse_var_assignment,
	user_config_path,
};
use stale_cli::logging::{LogLevel, init_logging};
use stale_cli::rules::RuleSet;
use tracing::debug;

#[derive(Parser)]
#[command(name = "stale")]
#[command(
	author,
	version,
	about = "Rebuild files whose dependencies changed, using @ wildcard rules"
)]
struct Cli {
	/// Rebuild every reached target regardless of timestamps
	/// (with --init, overwrite an existing Stalefile.toml)
	#[arg(short, long)]
	force: bool,

	/// Print the commands that would run without running them
	#[arg(short = 'n', long)]
	dry_run: bool,

	/// Use this buildfile instead of searching for Stalefile.toml
	#[arg(long, value_name = "PATH")]
	file: Option<PathBuf>,

	/// Override a buildfile variable (repeatable)
	#[arg(long = "var", value_name = "NAME=VALUE")]
	vars: Vec<String>,

	/// Print the rules and variables of the buildfile
	#[arg(long, conflicts_with_all = ["validate", "discover", "init"])]
	list: bool,

	/// Check the buildfile for errors without building anything
	#[arg(long, conflicts_with_all = ["discover", "init"])]
	validate: bool,

	/// Print the concrete targets the wildcard rules can produce
	#[arg(long = "targets", conflicts_with = "init")]
	discover: bool,

	/// Create a template Stalefile.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Log verbosity (overrides STALE_LOG)
	#[arg(long, value_enum, value_name = "LEVEL")]
	log_level: Option<LogLevel>,

	/// Targets to build; the first rule is built when none are given
	targets: Vec<String>,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let (args, ignored) = split_unknown_options(std::env::args_os());
	let cli = Cli::parse_from(args);
	init_logging(cli.log_level);
	for option in &ignored {
		debug!(option = %option, "ignoring unrecognised option");
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	if cli.init {
		return handle_init(&cwd, cli.force);
	}

	let loaded = load(&cli, &cwd)?;
	let rules = RuleSet::from_config(&loaded.config)
		.with_context(|| format!("Failed to compile rules in {}", loaded.path.display()))?;

	if cli.list {
		return handle_list(&loaded, &rules);
	}
	if cli.validate {
		println!(
			"Buildfile is valid: {} ({} rules)",
			loaded.path.display(),
			rules.len()
		);
		return Ok(ExitCode::SUCCESS);
	}
	if cli.discover {
		return handle_discover(&loaded, &rules);
	}

	let options = BuildOptions {
		force: cli.force,
		dry_run: cli.dry_run,
	};
	run_build(&rules, &loaded.root, &cli.targets, options)?;
	Ok(ExitCode::SUCCESS)
}

/// How a command-line word relates to the options `Cli` declares.
enum OptionKind {
	NotAnOption,
	Known { takes_value: bool },
	Unknown,
}

/// Separate options `Cli` doesn't declare from the rest of the arguments.
///
/// Unrecognised options are dropped rather than rejected, so a stray flag
/// never stops a build. Values of known options and everything after `--`
/// are passed through untouched.
fn split_unknown_options<I>(args: I) -> (Vec<OsString>, Vec<String>)
where
	I: IntoIterator<Item = OsString>,
{
	let command = Cli::command();
	let mut args = args.into_iter();
	let mut kept: Vec<OsString> = args.next().into_iter().collect();
	let mut ignored = Vec::new();
	let mut pass_through = false;
	let mut expecting_value = false;

	for arg in args {
		if pass_through || expecting_value {
			expecting_value = false;
			kept.push(arg);
			continue;
		}
		let Some(text) = arg.to_str() else {
			kept.push(arg);
			continue;
		};
		if text == "--" {
			pass_through = true;
			kept.push(arg);
			continue;
		}

		match classify_option(&command, text) {
			OptionKind::NotAnOption => kept.push(arg),
			OptionKind::Known { takes_value } => {
				expecting_value = takes_value;
				kept.push(arg);
			}
			OptionKind::Unknown => ignored.push(text.to_string()),
		}
	}

	(kept, ignored)
}

fn classify_option(command: &clap::Command, text: &str) -> OptionKind {
	if let Some(long) = text.strip_prefix("--") {
		let (name, inline_value) = match long.split_once('=') {
			Some((name, _)) => (name, true),
			None => (long, false),
		};
		if name == "help" || name == "version" {
			return OptionKind::Known { takes_value: false };
		}
		return match command.get_arguments().find(|arg| arg.get_long() == Some(name)) {
			Some(arg) => OptionKind::Known {
				takes_value: arg.get_action().takes_values() && !inline_value,
			},
			None => OptionKind::Unknown,
		};
	}

	let Some(shorts) = text.strip_prefix('-').filter(|rest| !rest.is_empty()) else {
		return OptionKind::NotAnOption;
	};
	for (offset, short) in shorts.char_indices() {
		if short == 'h' || short == 'V' {
			continue;
		}
		let Some(arg) = command.get_arguments().find(|arg| arg.get_short() == Some(short)) else {
			return OptionKind::Unknown;
		};
		if arg.get_action().takes_values() {
			// The rest of the word, if any, is the value.
			let rest = &shorts[offset + short.len_utf8()..];
			return OptionKind::Known {
				takes_value: rest.is_empty(),
			};
		}
	}
	OptionKind::Known { takes_value: false }
}

fn load(cli: &Cli, cwd: &Path) -> Result<LoadedConfig> {
	let overrides = cli
		.vars
		.iter()
		.map(|assignment| parse_var_assignment(assignment))
		.collect::<stale_cli::Result<BTreeMap<_, _>>>()?;

	Ok(load_buildfile(cli.file.as_deref(), cwd, &overrides)?)
}

fn handle_init(cwd: &Path, force: bool) -> Result<ExitCode> {
	let path = cwd.join(BUILDFILE_NAME);

	if path.exists() && !force {
		anyhow::bail!("{BUILDFILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&path, generate_init_template())
		.with_context(|| format!("Failed to write {}", path.display()))?;

	println!("Created {BUILDFILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_list(loaded: &LoadedConfig, rules: &RuleSet) -> Result<ExitCode> {
	println!("# Source: {}", loaded.path.display());
	println!("# root: {}", loaded.root.display());
	if let Some(user_path) = user_config_path() {
		let state = if user_path.exists() { "exists" } else { "not found" };
		println!("# user vars: {} ({state})", user_path.display());
	}
	println!();

	if !loaded.config.vars.is_empty() {
		println!("Variables:");
		for (name, value) in &loaded.config.vars {
			println!("  {name} = {value}");
		}
		println!();
	}

	println!("Rules:");
	for (index, rule) in rules.iter().enumerate() {
		let marker = if index == 0 { " (default)" } else { "" };
		println!("  {}{marker}", rule.target());
		for dependency in rule.dependencies() {
			println!("    <- {dependency}");
		}
		if let Some(action) = rule.action() {
			println!("    run: {}", action.describe());
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_discover(loaded: &LoadedConfig, rules: &RuleSet) -> Result<ExitCode> {
	let targets = discover_targets(rules, &loaded.root)
		.with_context(|| format!("Failed to scan {}", loaded.root.display()))?;
	for target in targets {
		println!("{target}");
	}
	Ok(ExitCode::SUCCESS)
}
