use crate::config::types::Config;
use crate::error::Result;
use crate::exec::{Action, Invocation, ShellAction};
use crate::rules::pattern::{Captures, Pattern};
use crate::rules::template::CommandTemplate;
use std::fmt;

/// A declared rule: how to produce targets matching a pattern.
pub struct Rule {
	target: Pattern,
	dependencies: Vec<Pattern>,
	action: Option<Box<dyn Action>>,
}

impl Rule {
	/// A rule with no action, e.g. an aggregate `all` target.
	pub fn new<I, S>(target: &str, dependencies: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Rule {
			target: Pattern::new(target),
			dependencies: dependencies
				.into_iter()
				.map(|d| Pattern::new(d.as_ref()))
				.collect(),
			action: None,
		}
	}

	/// Attach the action run when the target is stale.
	pub fn with_action(mut self, action: impl Action + 'static) -> Self {
		self.action = Some(Box::new(action));
		self
	}

	/// Attach an in-process callback as the action.
	pub fn with_callback<F>(self, callback: F) -> Self
	where
		F: Fn(&Invocation<'_>) -> Result<()> + 'static,
	{
		self.with_action(callback)
	}

	pub fn target(&self) -> &Pattern {
		&self.target
	}

	pub fn dependencies(&self) -> &[Pattern] {
		&self.dependencies
	}

	pub fn action(&self) -> Option<&dyn Action> {
		self.action.as_deref()
	}
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rule")
			.field("target", &self.target.as_str())
			.field(
				"dependencies",
				&self
					.dependencies
					.iter()
					.map(Pattern::as_str)
					.collect::<Vec<_>>(),
			)
			.field("action", &self.action.as_ref().map(|a| a.describe()))
			.finish()
	}
}

/// The ordered, read-only list of rules for one build.
#[derive(Debug, Default)]
pub struct RuleSet {
	rules: Vec<Rule>,
}

impl RuleSet {
	pub fn new(rules: Vec<Rule>) -> Self {
		RuleSet { rules }
	}

	/// Compile the rules of a buildfile, parsing every command template.
	pub fn from_config(config: &Config) -> Result<Self> {
		let mut rules = Vec::with_capacity(config.rules.len());
		for decl in &config.rules {
			let mut rule = Rule::new(&decl.target, &decl.deps);
			if let Some(run) = &decl.run {
				let commands = run
					.commands()
					.iter()
					.map(|command| CommandTemplate::parse(command, &config.vars))
					.collect::<Result<Vec<_>>>()?;
				rule = rule.with_action(ShellAction::new(commands));
			}
			rules.push(rule);
		}
		Ok(RuleSet { rules })
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Rule> {
		self.rules.get(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
		self.rules.iter()
	}

	/// Every rule whose target pattern matches `concrete`, in declaration order.
	pub fn matching<'a>(
		&'a self,
		concrete: &'a str,
	) -> impl Iterator<Item = (usize, Captures)> + 'a {
		self.rules
			.iter()
			.enumerate()
			.filter_map(move |(index, rule)| rule.target.matches(concrete).map(|c| (index, c)))
	}

	/// The first rule able to produce `dependency` while building `current_target`.
	///
	/// Rules whose pattern also matches `current_target` are skipped, so a
	/// rule never directly produces its own dependency.
	pub fn find_producer(&self, dependency: &str, current_target: &str) -> Option<(usize, Captures)> {
		self.rules.iter().enumerate().find_map(|(index, rule)| {
			if rule.target.matches(current_target).is_some() {
				return None;
			}
			rule.target.matches(dependency).map(|captures| (index, captures))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;
	use crate::error::StaleError;
	use std::path::PathBuf;

	fn sample_rules() -> RuleSet {
		RuleSet::new(vec![
			Rule::new("all", ["bin/Foo", "bin/Bar"]),
			Rule::new("bin/@", ["build/@.o"]),
			Rule::new("build/@.o", ["tests/@.c"]),
		])
	}

	#[test]
	fn test_from_config_compiles_actions() {
		let content = r#"
[vars]
cc = "gcc"

[[rules]]
target = "all"
deps = ["bin/app"]

[[rules]]
target = "bin/@"
deps = ["build/@.o"]
run = "${cc} -o $@ $^"
"#;
		let config = parse_config_str(content, &PathBuf::from("Stalefile.toml")).unwrap();
		let rules = RuleSet::from_config(&config).unwrap();

		assert_eq!(rules.len(), 2);
		assert!(rules.get(0).unwrap().action().is_none());

		let link = rules.get(1).unwrap();
		assert_eq!(link.target().as_str(), "bin/@");
		assert_eq!(link.dependencies()[0].as_str(), "build/@.o");
		assert_eq!(link.action().unwrap().describe(), "${cc} -o $@ $^");
	}

	#[test]
	fn test_from_config_unknown_variable() {
		let content = r#"
[[rules]]
target = "bin/@"
run = "${cc} -o $@"
"#;
		let config = parse_config_str(content, &PathBuf::from("Stalefile.toml")).unwrap();
		let result = RuleSet::from_config(&config);

		assert!(matches!(result, Err(StaleError::UnknownVariable { .. })));
	}

	#[test]
	fn test_matching_returns_all_rules_in_order() {
		let rules = RuleSet::new(vec![
			Rule::new("out/@", Vec::<String>::new()),
			Rule::new("out/@.txt", Vec::<String>::new()),
			Rule::new("other", Vec::<String>::new()),
		]);

		let matched: Vec<_> = rules.matching("out/a.txt").collect();
		assert_eq!(
			matched,
			vec![
				(0, vec!["a.txt".to_string()]),
				(1, vec!["a".to_string()])
			]
		);
	}

	#[test]
	fn test_matching_no_rule() {
		let rules = sample_rules();
		assert_eq!(rules.matching("docs/readme").count(), 0);
	}

	#[test]
	fn test_find_producer() {
		let rules = sample_rules();

		assert_eq!(
			rules.find_producer("build/Foo.o", "bin/Foo"),
			Some((2, vec!["Foo".to_string()]))
		);
		assert_eq!(rules.find_producer("tests/Foo.c", "build/Foo.o"), None);
	}

	#[test]
	fn test_find_producer_skips_rules_matching_current_target() {
		let rules = RuleSet::new(vec![
			Rule::new("gen/@", ["gen/@.in"]),
			Rule::new("gen/@.in", ["src/@"]),
		]);

		// `gen/@` matches both the target and the dependency; only the second
		// rule may produce it.
		assert_eq!(
			rules.find_producer("gen/x.in", "gen/x"),
			Some((1, vec!["x".to_string()]))
		);
	}
}
