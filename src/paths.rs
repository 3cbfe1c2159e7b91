//! Path helpers shared by the orchestrator and target discovery.

use crate::error::{Result, StaleError};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Separator used in target and dependency strings.
pub const DIR_SEPARATOR: char = '/';

/// Directory portion of a target string, up to its last separator.
///
/// Returns `None` when the string has no directory component.
pub fn parent_dir(target: &str) -> Option<&str> {
	target
		.rfind(DIR_SEPARATOR)
		.map(|index| &target[..index])
		.filter(|dir| !dir.is_empty())
}

/// Create the directory that will hold `target`, relative to `root`.
pub fn ensure_parent_dir(root: &Path, target: &str) -> Result<()> {
	let Some(dir) = parent_dir(target) else {
		return Ok(());
	};
	let path = root.join(dir);
	std::fs::create_dir_all(&path).map_err(|source| StaleError::CreateDirFailed { path, source })
}

/// List every file below `dir`, recursing into sub-directories.
///
/// Paths are returned relative to `dir`, joined with `/`, sorted. Entries whose
/// name starts with a dot are skipped, along with everything beneath them.
pub fn list_files_recursive(dir: &Path) -> Result<Vec<String>> {
	let mut files = Vec::new();

	let walker = WalkDir::new(dir)
		.follow_links(false)
		.sort_by_file_name()
		.into_iter()
		.filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

	for entry in walker {
		let entry = entry.map_err(|err| StaleError::ListDirFailed {
			path: err.path().unwrap_or(dir).to_path_buf(),
			source: err.into(),
		})?;
		if !entry.file_type().is_file() {
			continue;
		}
		let Ok(relative) = entry.path().strip_prefix(dir) else {
			continue;
		};
		files.push(join_components(relative));
	}

	files.sort();
	Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
	entry.file_name().to_string_lossy().starts_with('.')
}

fn join_components(relative: &Path) -> String {
	relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join(&DIR_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_parent_dir() {
		assert_eq!(parent_dir("bin/Foo"), Some("bin"));
		assert_eq!(parent_dir("out/obj/x.o"), Some("out/obj"));
		assert_eq!(parent_dir("all"), None);
		assert_eq!(parent_dir("/rootfile"), None);
	}

	#[test]
	fn test_ensure_parent_dir_creates_nested() {
		let temp_dir = tempfile::tempdir().unwrap();
		ensure_parent_dir(temp_dir.path(), "out/obj/deep/x.o").unwrap();
		assert!(temp_dir.path().join("out/obj/deep").is_dir());

		// Existing directories are fine.
		ensure_parent_dir(temp_dir.path(), "out/obj/y.o").unwrap();
	}

	#[test]
	fn test_ensure_parent_dir_without_directory() {
		let temp_dir = tempfile::tempdir().unwrap();
		ensure_parent_dir(temp_dir.path(), "all").unwrap();
		assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
	}

	#[test]
	fn test_list_files_recursive() {
		let temp_dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(temp_dir.path().join("src/nested")).unwrap();
		fs::create_dir_all(temp_dir.path().join(".git")).unwrap();
		fs::write(temp_dir.path().join("src/a.c"), "").unwrap();
		fs::write(temp_dir.path().join("src/nested/b.c"), "").unwrap();
		fs::write(temp_dir.path().join("top.txt"), "").unwrap();
		fs::write(temp_dir.path().join(".git/HEAD"), "").unwrap();

		let files = list_files_recursive(temp_dir.path()).unwrap();
		assert_eq!(files, vec!["src/a.c", "src/nested/b.c", "top.txt"]);
	}

	#[test]
	fn test_list_files_sorted_as_strings() {
		let temp_dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(temp_dir.path().join("a")).unwrap();
		fs::write(temp_dir.path().join("a/b"), "").unwrap();
		fs::write(temp_dir.path().join("a.txt"), "").unwrap();

		let files = list_files_recursive(temp_dir.path()).unwrap();
		assert_eq!(files, vec!["a.txt", "a/b"]);
	}

	#[test]
	fn test_list_files_skips_hidden_files_in_subdirectories() {
		let temp_dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(temp_dir.path().join("src")).unwrap();
		fs::write(temp_dir.path().join("src/.hidden"), "").unwrap();
		fs::write(temp_dir.path().join("src/main.c"), "").unwrap();

		let files = list_files_recursive(temp_dir.path()).unwrap();
		assert_eq!(files, vec!["src/main.c"]);
	}

	#[test]
	fn test_list_missing_dir() {
		let result = list_files_recursive(Path::new("/nonexistent/stale/dir"));
		assert!(matches!(result, Err(StaleError::ListDirFailed { .. })));
	}
}
