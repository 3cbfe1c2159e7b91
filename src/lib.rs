//! Stale - a small incremental build tool driven by `@` wildcard rules.
//!
//! This library provides the core functionality for stale, including:
//! - Buildfile parsing, discovery and variable layering
//! - Wildcard patterns and the ordered rule set
//! - Modification-time staleness checks and recursive target resolution
//! - Shell actions built from command templates
//!
//! # Example
//!
//! ```no_run
//! use stale_cli::build::{BuildOptions, run_build};
//! use stale_cli::rules::{Rule, RuleSet};
//! use std::path::Path;
//!
//! let rules = RuleSet::new(vec![
//!     Rule::new("all", ["out/hello.txt"]),
//!     Rule::new("out/@.txt", ["src/@.txt"]).with_callback(|inv| {
//!         println!("copy {} -> {}", inv.dependencies[0], inv.target);
//!         Ok(())
//!     }),
//! ]);
//!
//! let summary = run_build(&rules, Path::new("."), &[], BuildOptions::default()).unwrap();
//! println!("{} actions run", summary.actions_run);
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod rules;

pub use error::{Result, StaleError};
