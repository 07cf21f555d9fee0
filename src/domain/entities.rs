//! Domain entities: core data structures

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a walked entry is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Outcome of classifying and processing a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// TFVC bookkeeping: not copied, directories not descended into
    Excluded,
    /// Copied verbatim
    PassThrough,
    /// Copied with binding references stripped
    Rewritten,
    /// Destination already existed and was left alone
    Skipped,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Disposition::Excluded => "excluded",
            Disposition::PassThrough => "copied",
            Disposition::Rewritten => "rewritten",
            Disposition::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingPolicy {
    #[default]
    Overwrite,
    Skip,
}

/// A file or directory below the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the source root
    pub relative_path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(relative_path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
        }
    }

    pub fn file(relative_path: impl Into<PathBuf>) -> Self {
        Self::new(relative_path, EntryKind::File)
    }

    pub fn directory(relative_path: impl Into<PathBuf>) -> Self {
        Self::new(relative_path, EntryKind::Directory)
    }

    /// Final path component, lossily converted for pattern matching.
    pub fn name(&self) -> String {
        self.relative_path
            .file_name()
            .map(OsStr::to_string_lossy)
            .map(|n| n.into_owned())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.relative_path
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Directories created (or that would be created) in the destination
    pub directories: usize,
    /// Excluded entries, files and directories alike
    pub excluded: usize,
    pub pass_through: usize,
    pub rewritten: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

impl Summary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Count one processed entry.
    pub fn record(&mut self, kind: EntryKind, disposition: Disposition) {
        match (kind, disposition) {
            (_, Disposition::Excluded) => self.excluded += 1,
            (EntryKind::Directory, _) => self.directories += 1,
            (EntryKind::File, Disposition::PassThrough) => self.pass_through += 1,
            (EntryKind::File, Disposition::Rewritten) => self.rewritten += 1,
            (EntryKind::File, Disposition::Skipped) => self.skipped += 1,
        }
    }

    /// Files that ended up (or would end up) in the destination.
    pub fn files_written(&self) -> usize {
        self.pass_through + self.rewritten
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} rewritten, {} excluded, {} skipped, {} directories",
            self.pass_through, self.rewritten, self.excluded, self.skipped, self.directories
        )
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Falls back to the input unchanged if a variable cannot be resolved.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_path_when_name_then_returns_last_component() {
        let entry = Entry::file("Proj/Sub/App.csproj");
        assert_eq!(entry.name(), "App.csproj");
    }

    #[test]
    fn given_mixed_dispositions_when_recording_then_counts_by_kind() {
        let mut summary = Summary::new(false);
        summary.record(EntryKind::Directory, Disposition::PassThrough);
        summary.record(EntryKind::Directory, Disposition::Excluded);
        summary.record(EntryKind::File, Disposition::Excluded);
        summary.record(EntryKind::File, Disposition::PassThrough);
        summary.record(EntryKind::File, Disposition::Rewritten);
        summary.record(EntryKind::File, Disposition::Skipped);

        assert_eq!(summary.directories, 1);
        assert_eq!(summary.excluded, 2);
        assert_eq!(summary.pass_through, 1);
        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files_written(), 2);
    }

    #[test]
    fn given_unset_variable_when_expanding_then_returns_input() {
        let input = "$TFUNBIND_SURELY_NOT_SET_ANYWHERE/x";
        assert_eq!(expand_env_vars(input), input);
    }
}
