//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent rule and input violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("empty marker pattern in rule set: {0}")]
    EmptyPattern(&'static str),

    #[error("source is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("destination {dest} lies inside source {source_dir}")]
    DestinationInsideSource { source_dir: PathBuf, dest: PathBuf },
}
