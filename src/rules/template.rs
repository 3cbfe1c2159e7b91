use crate::error::{Result, StaleError};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Matches `${name}`, `$` followed by any single character, or a trailing `$`.
static EXPANSION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)\$(?:\{([^}]*)\}|(.)|$)").expect("expansion regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
	Literal(String),
	Target,
	FirstDependency,
	AllDependencies,
}

/// A shell command line with make-style automatic variables.
///
/// Supported expansions:
/// - `$@` the concrete target
/// - `$<` the first resolved dependency (empty if there is none)
/// - `$^` all resolved dependencies, separated by single spaces
/// - `$$` a literal `$`
/// - `${name}` a user variable, substituted as literal text when parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
	source: String,
	pieces: Vec<Piece>,
}

impl CommandTemplate {
	/// Parse a template, resolving `${name}` against `vars`.
	pub fn parse(template: &str, vars: &BTreeMap<String, String>) -> Result<Self> {
		let invalid = |reason: String| StaleError::InvalidTemplate {
			template: template.to_string(),
			reason,
		};

		let mut pieces = Vec::new();
		let mut literal = String::new();
		let mut last = 0;

		for caps in EXPANSION.captures_iter(template) {
			let Some(whole) = caps.get(0) else {
				continue;
			};
			literal.push_str(&template[last..whole.start()]);
			last = whole.end();

			if let Some(name) = caps.get(1) {
				let name = name.as_str();
				if !is_valid_var_name(name) {
					return Err(invalid(format!("invalid variable name `{name}`")));
				}
				let value = vars.get(name).ok_or_else(|| StaleError::UnknownVariable {
					name: name.to_string(),
					template: template.to_string(),
				})?;
				literal.push_str(value);
				continue;
			}

			let piece = match caps.get(2).map(|m| m.as_str()) {
				Some("$") => {
					literal.push('$');
					continue;
				}
				Some("@") => Piece::Target,
				Some("<") => Piece::FirstDependency,
				Some("^") => Piece::AllDependencies,
				Some("{") => return Err(invalid("unterminated `${`".to_string())),
				Some(other) => return Err(invalid(format!("unsupported expansion `${other}`"))),
				None => return Err(invalid("dangling `$` at end of template".to_string())),
			};
			if !literal.is_empty() {
				pieces.push(Piece::Literal(std::mem::take(&mut literal)));
			}
			pieces.push(piece);
		}

		literal.push_str(&template[last..]);
		if !literal.is_empty() {
			pieces.push(Piece::Literal(literal));
		}

		Ok(CommandTemplate {
			source: template.to_string(),
			pieces,
		})
	}

	/// The template as written in the buildfile.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Produce the command line for one target.
	pub fn expand(&self, dependencies: &[String], target: &str) -> String {
		let mut line = String::new();
		for piece in &self.pieces {
			match piece {
				Piece::Literal(text) => line.push_str(text),
				Piece::Target => line.push_str(target),
				Piece::FirstDependency => {
					if let Some(first) = dependencies.first() {
						line.push_str(first);
					}
				}
				Piece::AllDependencies => line.push_str(&dependencies.join(" ")),
			}
		}
		line
	}
}

/// Variable names follow shell identifier rules.
pub fn is_valid_var_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
