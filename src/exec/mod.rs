//! Action execution for stale.
//!
//! This module handles:
//! - The `Action` seam between the orchestrator and whatever builds a target
//! - Shell actions compiled from buildfile command templates
//! - Running command lines with inherited stdio

use crate::error::{Result, StaleError};
use crate::rules::template::CommandTemplate;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Everything an action needs to build one concrete target.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
	/// Resolved dependency paths, in declaration order.
	pub dependencies: &'a [String],

	/// The concrete target path.
	pub target: &'a str,

	/// Build root; all paths above are relative to it.
	pub root: &'a Path,

	/// Report what would run without running it.
	pub dry_run: bool,
}

/// Something that brings a stale target up to date.
pub trait Action {
	/// Build the target. Blocks until done.
	fn run(&self, invocation: &Invocation<'_>) -> Result<()>;

	/// Human readable summary, used by `--list`.
	fn describe(&self) -> String {
		"<callback>".to_string()
	}
}

impl<F> Action for F
where
	F: Fn(&Invocation<'_>) -> Result<()>,
{
	fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
		self(invocation)
	}
}

/// Runs one or more command templates through `sh -c`, in order.
#[derive(Debug, Clone)]
pub struct ShellAction {
	commands: Vec<CommandTemplate>,
}

impl ShellAction {
	pub fn new(commands: Vec<CommandTemplate>) -> Self {
		ShellAction { commands }
	}

	pub fn commands(&self) -> &[CommandTemplate] {
		&self.commands
	}
}

impl Action for ShellAction {
	fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
		for template in &self.commands {
			let line = template.expand(invocation.dependencies, invocation.target);

			// Echo before running so output from the command follows its line.
			echo_line(&mut std::io::stdout().lock(), &line)?;

			if invocation.dry_run {
				continue;
			}
			execute_shell(&line, invocation.root)?;
		}
		Ok(())
	}

	fn describe(&self) -> String {
		self.commands
			.iter()
			.map(CommandTemplate::as_str)
			.collect::<Vec<_>>()
			.join("; ")
	}
}

/// Write `line` to `out` and flush it.
fn echo_line(out: &mut impl Write, line: &str) -> Result<()> {
	writeln!(out, "{line}")
		.and_then(|()| out.flush())
		.map_err(|source| StaleError::EchoFailed {
			command: line.to_string(),
			source,
		})
}

/// Execute a command line with `sh -c` in `cwd`.
///
/// Stdio is passed through to the child. A non-zero exit status is an error.
pub fn execute_shell(command_line: &str, cwd: &Path) -> Result<()> {
	debug!(command = command_line, cwd = %cwd.display(), "executing");

	let status = Command::new("sh")
		.arg("-c")
		.arg(command_line)
		.current_dir(cwd)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit())
		.status()
		.map_err(|source| StaleError::CommandFailed {
			command: command_line.to_string(),
			source,
		})?;

	if !status.success() {
		return Err(StaleError::ActionFailed {
			command: command_line.to_string(),
			exit_code: status.code(),
		});
	}

	Ok(())
}
