//! Rule declarations and wildcard patterns for stale.
//!
//! This module handles:
//! - Matching `@` wildcard patterns against concrete paths
//! - The ordered rule registry and producer lookup
//! - Command templates for shell actions

pub mod pattern;
pub mod registry;
pub mod template;

pub use pattern::{Captures, Pattern, WILDCARD, match_pattern, substitute};
pub use registry::{Rule, RuleSet};
pub use template::CommandTemplate;
