use crate::error::Result;
use crate::paths::list_files_recursive;
use crate::rules::RuleSet;
use std::collections::BTreeSet;
use std::path::Path;

/// Concrete targets the wildcard rules can produce from files under `root`.
///
/// A dependency pattern with as many wildcards as its rule's target is matched
/// against every file; the captures are substituted into the target. Targets
/// found this way feed the next round, so chains such as
/// `tests/@.c -> build/@.o -> bin/@` are followed. The number of rounds is
/// bounded by the rule count.
pub fn discover_targets(rules: &RuleSet, root: &Path) -> Result<Vec<String>> {
	let mut seen: BTreeSet<String> = list_files_recursive(root)?.into_iter().collect();
	let mut frontier: Vec<String> = seen.iter().cloned().collect();
	let mut discovered = BTreeSet::new();

	for _ in 0..rules.len() {
		let mut next = Vec::new();
		for path in &frontier {
			for rule in rules.iter() {
				let target = rule.target();
				if target.is_literal() {
					continue;
				}
				for dependency in rule.dependencies() {
					if dependency.wildcard_count() != target.wildcard_count() {
						continue;
					}
					let Some(captures) = dependency.matches(path) else {
						continue;
					};
					let candidate = target.substitute(Some(captures.as_slice()))?;
					discovered.insert(candidate.clone());
					if seen.insert(candidate.clone()) {
						next.push(candidate);
					}
				}
			}
		}
		if next.is_empty() {
			break;
		}
		frontier = next;
	}

	Ok(discovered.into_iter().collect())
}
