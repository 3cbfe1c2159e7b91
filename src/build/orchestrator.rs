use crate::build::staleness::{Staleness, compare};
use crate::error::{Result, StaleError};
use crate::exec::Invocation;
use crate::paths::ensure_parent_dir;
use crate::rules::{Rule, RuleSet};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Switches threaded through a whole build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
	/// Treat every reached rule as stale.
	pub force: bool,

	/// Print actions without running them or creating directories.
	pub dry_run: bool,
}

/// What a finished build did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
	pub actions_run: usize,
}

/// A rule instantiated for one concrete target.
type Frame = (usize, String);

/// Depth-first resolver for one invocation of the tool.
///
/// A (rule, target) pair is resolved at most once per builder; later requests
/// reuse the recorded result. Re-entering a pair that is still being resolved
/// is reported as a dependency cycle.
pub struct Builder<'a> {
	rules: &'a RuleSet,
	root: &'a Path,
	options: BuildOptions,
	in_progress: Vec<Frame>,
	resolved: HashMap<Frame, bool>,
	actions_run: usize,
}

impl<'a> Builder<'a> {
	pub fn new(rules: &'a RuleSet, root: &'a Path, options: BuildOptions) -> Self {
		Builder {
			rules,
			root,
			options,
			in_progress: Vec::new(),
			resolved: HashMap::new(),
			actions_run: 0,
		}
	}

	pub fn summary(&self) -> BuildSummary {
		BuildSummary {
			actions_run: self.actions_run,
		}
	}

	/// Build the first declared rule, its target pattern taken verbatim.
	///
	/// The rule is resolved without captures, so `@` in its dependencies is
	/// kept as written. Requesting the same literal target by name goes
	/// through [`Builder::build_target`] with an empty capture list instead,
	/// and a dependency containing `@` is then a `CaptureArityMismatch`.
	pub fn build_default(&mut self) -> Result<bool> {
		if self.rules.is_empty() {
			return Err(StaleError::NoRules);
		}
		self.resolve(0, None, None)
	}

	/// Build `target` with every rule whose pattern matches it.
	///
	/// A target no rule matches is not an error; nothing happens.
	pub fn build_target(&mut self, target: &str) -> Result<bool> {
		let matches: Vec<_> = self.rules.matching(target).collect();
		if matches.is_empty() {
			debug!(target = %target, "no rule matches target");
		}

		let mut rebuilt = false;
		for (index, captures) in matches {
			rebuilt |= self.resolve(index, Some(target), Some(captures.as_slice()))?;
		}
		Ok(rebuilt)
	}

	/// Resolve rule `rule_index` for `requested` (or its own pattern).
	///
	/// Returns whether the target was considered rebuilt, which is also true
	/// for an action-less rule whose dependencies were stale.
	pub fn resolve(
		&mut self,
		rule_index: usize,
		requested: Option<&str>,
		captures: Option<&[String]>,
	) -> Result<bool> {
		let rules = self.rules;
		let Some(rule) = rules.get(rule_index) else {
			return Ok(false);
		};
		let target = requested.unwrap_or(rule.target().as_str()).to_string();
		let frame = (rule_index, target);

		if let Some(&rebuilt) = self.resolved.get(&frame) {
			debug!(target = %frame.1, "already resolved");
			return Ok(rebuilt);
		}
		if let Some(start) = self.in_progress.iter().position(|f| *f == frame) {
			let mut chain: Vec<&str> = self.in_progress[start..]
				.iter()
				.map(|(_, target)| target.as_str())
				.collect();
			chain.push(&frame.1);
			return Err(StaleError::DependencyCycle {
				chain: chain.join(" -> "),
			});
		}

		self.in_progress.push(frame.clone());
		let result = self.resolve_frame(rule, &frame.1, captures);
		self.in_progress.pop();

		let rebuilt = result?;
		self.resolved.insert(frame, rebuilt);
		Ok(rebuilt)
	}

	fn resolve_frame(
		&mut self,
		rule: &'a Rule,
		target: &str,
		captures: Option<&[String]>,
	) -> Result<bool> {
		debug!(target = %target, rule = %rule.target(), "resolving");

		if !self.options.dry_run {
			ensure_parent_dir(self.root, target)?;
		}

		let target_path = self.root.join(target);
		let mut should_run = self.options.force;
		let mut dependencies = Vec::with_capacity(rule.dependencies().len());

		for pattern in rule.dependencies() {
			let dependency = pattern.substitute(captures)?;
			let staleness = compare(&self.root.join(&dependency), &target_path);
			if staleness == Staleness::TargetMissingOrStale {
				debug!(target = %target, dependency, "target missing or older than dependency");
				should_run = true;
			}

			// A producing rule takes precedence over the file on disk.
			if let Some((producer, produced)) = self.rules.find_producer(&dependency, target) {
				should_run |=
					self.resolve(producer, Some(dependency.as_str()), Some(produced.as_slice()))?;
			} else if staleness == Staleness::SourceMissing {
				return Err(StaleError::UnresolvableDependency {
					dependency,
					target: target.to_string(),
				});
			}

			dependencies.push(dependency);
		}

		if !should_run {
			debug!(target = %target, "up to date");
			return Ok(false);
		}

		if let Some(action) = rule.action() {
			action.run(&Invocation {
				dependencies: &dependencies,
				target,
				root: self.root,
				dry_run: self.options.dry_run,
			})?;
			self.actions_run += 1;
		}
		Ok(true)
	}
}

/// Build `targets`, or the default rule when none are given.
pub fn run_build(
	rules: &RuleSet,
	root: &Path,
	targets: &[String],
	options: BuildOptions,
) -> Result<BuildSummary> {
	let mut builder = Builder::new(rules, root, options);

	if targets.is_empty() {
		builder.build_default()?;
	} else {
		for target in targets {
			builder.build_target(target)?;
		}
	}

	let summary = builder.summary();
	if summary.actions_run == 0 {
		info!("nothing to be done");
	}
	Ok(summary)
}
