//! Incremental build driver.
//!
//! This module handles:
//! - Modification-time comparison between a dependency and its target
//! - Recursive resolution of targets through the rule set
//! - Discovery of the concrete targets wildcard rules can produce

pub mod discover;
pub mod orchestrator;
pub mod staleness;

pub use discover::discover_targets;
pub use orchestrator::{BuildOptions, BuildSummary, Builder, run_build};
pub use staleness::{Staleness, compare};
