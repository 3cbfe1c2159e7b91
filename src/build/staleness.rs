use std::path::Path;

/// How a dependency relates to the target that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
	/// The dependency does not exist on disk.
	SourceMissing,

	/// The target does not exist, or the dependency was modified after it.
	TargetMissingOrStale,

	/// Both exist and the target is at least as new as the dependency.
	UpToDate,
}

/// Compare the modification times of `source` and `target`.
///
/// Timestamps are compared at full `SystemTime` resolution, so sub-second
/// differences count. Equal timestamps are up to date. Pure query.
pub fn compare(source: &Path, target: &Path) -> Staleness {
	let Ok(source_meta) = std::fs::metadata(source) else {
		return Staleness::SourceMissing;
	};
	let Ok(target_meta) = std::fs::metadata(target) else {
		return Staleness::TargetMissingOrStale;
	};

	match (source_meta.modified(), target_meta.modified()) {
		(Ok(source_time), Ok(target_time)) if source_time <= target_time => Staleness::UpToDate,
		// No usable timestamp: rebuilding is the only safe answer.
		_ => Staleness::TargetMissingOrStale,
	}
}
