//! Domain layer: entries, marker rules and content transforms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod rewrite;
pub mod rules;

pub use entities::*;
pub use error::DomainError;
pub use rewrite::{ContentRule, RewriteOutcome};
pub use rules::{MarkerRule, MarkerTable, MarkerTableBuilder, NameMatcher, RuleAction};
