use crate::error::{Result, StaleError};

/// The reserved character marking a capture position in a pattern.
pub const WILDCARD: char = '@';

/// Substrings captured at each wildcard of a pattern, left to right.
pub type Captures = Vec<String>;

/// A generic target or dependency pattern, pre-split into literal segments.
///
/// A pattern with `N` wildcards always has `N + 1` segments; the segments
/// before and after the first and last wildcard may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
	raw: String,
	segments: Vec<String>,
}

impl Pattern {
	/// Split a raw pattern string on the wildcard marker.
	pub fn new(raw: &str) -> Self {
		Pattern {
			raw: raw.to_string(),
			segments: raw.split(WILDCARD).map(str::to_string).collect(),
		}
	}

	/// The pattern as written.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Number of wildcard markers in the pattern.
	pub fn wildcard_count(&self) -> usize {
		self.segments.len() - 1
	}

	/// True if the pattern contains no wildcard marker.
	pub fn is_literal(&self) -> bool {
		self.segments.len() == 1
	}

	/// Match this pattern against a concrete string.
	///
	/// A literal pattern matches only an identical string and yields no
	/// captures. Otherwise the concrete string must start with the first
	/// segment and end with the last one; interior segments are located left
	/// to right with a plain substring search, each gap becoming a capture.
	/// The last wildcard is greedy: it absorbs everything between the end of
	/// the last interior segment and the trailing literal at the very end of
	/// the string, so `substitute(matches(s))` always reproduces `s`.
	pub fn matches(&self, concrete: &str) -> Option<Captures> {
		let (first, rest) = self.segments.split_first()?;
		let Some((last, interior)) = rest.split_last() else {
			return (self.raw == concrete).then(Vec::new);
		};

		// Stripping both ends first keeps the prefix and suffix from overlapping.
		let body = concrete
			.strip_prefix(first.as_str())?
			.strip_suffix(last.as_str())?;

		let mut captures = Vec::with_capacity(self.wildcard_count());
		let mut cursor = 0;
		for segment in interior {
			let offset = body[cursor..].find(segment.as_str())?;
			captures.push(body[cursor..cursor + offset].to_string());
			cursor += offset + segment.len();
		}
		captures.push(body[cursor..].to_string());

		Some(captures)
	}

	/// Instantiate the pattern by interleaving its segments with `captures`.
	///
	/// With no captures at all, or for a literal pattern, the pattern text is
	/// returned unchanged. Otherwise the capture count must equal the wildcard
	/// count.
	pub fn substitute(&self, captures: Option<&[String]>) -> Result<String> {
		let Some(captures) = captures else {
			return Ok(self.raw.clone());
		};
		if self.is_literal() {
			return Ok(self.raw.clone());
		}
		if captures.len() != self.wildcard_count() {
			return Err(StaleError::CaptureArityMismatch {
				pattern: self.raw.clone(),
				wildcards: self.wildcard_count(),
				captures: captures.len(),
			});
		}

		let capacity = self.raw.len() + captures.iter().map(String::len).sum::<usize>();
		let mut literal = String::with_capacity(capacity);
		for (segment, capture) in self.segments.iter().zip(captures) {
			literal.push_str(segment);
			literal.push_str(capture);
		}
		if let Some(last) = self.segments.last() {
			literal.push_str(last);
		}

		Ok(literal)
	}
}

impl std::fmt::Display for Pattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.raw)
	}
}

/// Match a generic pattern string against a concrete string.
pub fn match_pattern(generic: &str, concrete: &str) -> Option<Captures> {
	Pattern::new(generic).matches(concrete)
}

/// Instantiate a generic pattern string with the given captures.
pub fn substitute(generic: &str, captures: Option<&[String]>) -> Result<String> {
	Pattern::new(generic).substitute(captures)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn caps(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[test]
	fn test_literal_pattern_matches_exactly() {
		assert_eq!(match_pattern("all", "all"), Some(vec![]));
		assert_eq!(match_pattern("all", "all2"), None);
		assert_eq!(match_pattern("all", "al"), None);
	}

	#[test]
	fn test_single_wildcard_capture() {
		assert_eq!(
			match_pattern("build/@.o", "build/foo.o"),
			Some(caps(&["foo"]))
		);
		assert_eq!(
			substitute("build/@.o", Some(caps(&["foo"]).as_slice())).unwrap(),
			"build/foo.o"
		);
	}

	#[test]
	fn test_trailing_wildcard() {
		assert_eq!(match_pattern("bin/@", "bin/Foo"), Some(caps(&["Foo"])));
		assert_eq!(match_pattern("bin/@", "build/Foo"), None);
	}

	#[test]
	fn test_prefix_and_suffix_required() {
		assert_eq!(match_pattern("build/@.o", "build/foo.c"), None);
		assert_eq!(match_pattern("build/@.o", "src/foo.o"), None);
	}

	#[test]
	fn test_empty_capture() {
		assert_eq!(match_pattern("aaa@bbb", "aaabbb"), Some(caps(&[""])));
		assert_eq!(
			match_pattern("aaa@bbb", "aaa_hello_bbb"),
			Some(caps(&["_hello_"]))
		);
	}

	#[test]
	fn test_prefix_and_suffix_do_not_overlap() {
		assert_eq!(match_pattern("a@a", "a"), None);
		assert_eq!(match_pattern("a@a", "aa"), Some(caps(&[""])));
	}

	#[test]
	fn test_last_wildcard_is_greedy() {
		// The trailing literal `.o` also occurs earlier; the capture keeps it.
		assert_eq!(
			match_pattern("build/@.o", "build/a.o.o"),
			Some(caps(&["a.o"]))
		);
		assert_eq!(
			match_pattern("@/@.c", "src/sub/dir/main.c"),
			Some(caps(&["src", "sub/dir/main"]))
		);
	}

	#[test]
	fn test_interior_wildcards_are_lazy() {
		assert_eq!(
			match_pattern("@-@-@", "a-b-c-d"),
			Some(caps(&["a", "b", "c-d"]))
		);
	}

	#[test]
	fn test_missing_interior_segment_fails() {
		assert_eq!(match_pattern("out/@/obj/@.o", "out/x/lib/y.o"), None);
		assert_eq!(
			match_pattern("out/@/obj/@.o", "out/x/obj/y.o"),
			Some(caps(&["x", "y"]))
		);
	}

	#[test]
	fn test_substitute_without_captures_returns_pattern() {
		assert_eq!(substitute("build/@.o", None).unwrap(), "build/@.o");
		assert_eq!(
			substitute("tests/main.c", Some(caps(&["x"]).as_slice())).unwrap(),
			"tests/main.c"
		);
	}

	#[test]
	fn test_substitute_arity_mismatch() {
		let err = substitute("@/@.o", Some(caps(&["x"]).as_slice())).unwrap_err();
		match err {
			StaleError::CaptureArityMismatch {
				pattern,
				wildcards,
				captures,
			} => {
				assert_eq!(pattern, "@/@.o");
				assert_eq!(wildcards, 2);
				assert_eq!(captures, 1);
			}
			_ => panic!("Expected CaptureArityMismatch error"),
		}
	}

	#[test]
	fn test_match_then_substitute_reproduces_input() {
		let cases = [
			("bin/@", "bin/Foo"),
			("build/@.o", "build/a.o.o"),
			("@.tar.@", "pkg.tar.gz"),
			("@@", "anything"),
			("x@y@z", "xyz"),
		];
		for (pattern, concrete) in cases {
			let pattern = Pattern::new(pattern);
			let captures = pattern.matches(concrete).unwrap();
			assert_eq!(captures.len(), pattern.wildcard_count());
			assert_eq!(pattern.substitute(Some(captures.as_slice())).unwrap(), concrete);
		}
	}

	#[test]
	fn test_wildcard_count() {
		assert_eq!(Pattern::new("all").wildcard_count(), 0);
		assert!(Pattern::new("all").is_literal());
		assert_eq!(Pattern::new("@/@.o").wildcard_count(), 2);
		assert_eq!(Pattern::new("@").wildcard_count(), 1);
	}
}
