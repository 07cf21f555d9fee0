//! Unbind service
//!
//! Mirrors a source tree into a destination tree, leaving out TFVC
//! bookkeeping entries and stripping binding references from solution and
//! project files. The source tree is only ever read.
//!
//! ```text
//! src/                               dest/
//!   $tf/                  excluded
//!   App.sln               rewritten    App.sln      (no VersionControl section)
//!   App/App.csproj        rewritten    App/App.csproj (no <Scc*> lines)
//!   App/App.csproj.vspscc excluded
//!   App/Program.cs        copied       App/Program.cs
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    ContentRule, Disposition, DomainError, Entry, EntryKind, ExistingPolicy, MarkerTable,
    RuleAction, Summary,
};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::absolutize;

/// Run-time switches for an unbind run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbindOptions {
    pub existing: ExistingPolicy,
    /// Clear the read-only flag TFVC leaves on checked-in files
    pub make_writable: bool,
    /// Classify and count only; nothing is written
    pub dry_run: bool,
}

impl Default for UnbindOptions {
    fn default() -> Self {
        Self {
            existing: ExistingPolicy::Overwrite,
            make_writable: true,
            dry_run: false,
        }
    }
}

/// Tree copy with TFVC bindings removed.
pub struct UnbindService {
    fs: Arc<dyn FileSystem>,
    table: MarkerTable,
    options: UnbindOptions,
}

impl UnbindService {
    /// Create a new unbind service.
    pub fn new(fs: Arc<dyn FileSystem>, table: MarkerTable, options: UnbindOptions) -> Self {
        Self { fs, table, options }
    }

    /// Copy `source` into `dest`, unbinding on the way.
    ///
    /// Entries are visited depth-first in file-name order, each directory
    /// before its children. Symlinks are followed, so a linked folder is
    /// copied as a real directory; link loops fail the walk. The first I/O
    /// failure aborts the run; whatever was written until then stays in place.
    #[instrument(skip(self), fields(dry_run = self.options.dry_run))]
    pub fn unbind(&self, source: &Path, dest: &Path) -> ApplicationResult<Summary> {
        self.validate(source, dest)?;
        info!("unbind: {} -> {}", source.display(), dest.display());

        if !self.options.dry_run {
            self.fs
                .create_dir_all(dest)
                .with_path_context("create directory", dest)?;
        }

        let mut summary = Summary::new(self.options.dry_run);
        let mut walker = WalkDir::new(source)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let dir_entry = next.map_err(|e| {
                let path = e.path().unwrap_or(source).display().to_string();
                ApplicationError::OperationFailed {
                    context: format!("walk {}", path),
                    source: Box::new(e),
                }
            })?;

            let relative = dir_entry
                .path()
                .strip_prefix(source)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("relativize {}", dir_entry.path().display()),
                    source: Box::new(e),
                })?;
            let kind = if dir_entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let entry = Entry::new(relative, kind);
            let target = dest.join(relative);

            let disposition = match (kind, self.table.classify(&entry)) {
                (_, Some(RuleAction::Exclude)) => {
                    if kind == EntryKind::Directory {
                        walker.skip_current_dir();
                    }
                    Disposition::Excluded
                }
                (EntryKind::Directory, _) => self.process_dir(&target)?,
                (EntryKind::File, Some(RuleAction::Rewrite(rule))) => {
                    self.process_file(dir_entry.path(), &target, Some(rule))?
                }
                (EntryKind::File, None) => self.process_file(dir_entry.path(), &target, None)?,
            };

            debug!("{}: {}", disposition, entry.path().display());
            summary.record(kind, disposition);
        }

        info!("unbind: {}", summary);
        Ok(summary)
    }

    /// Source must be an existing, listable directory and dest must not live inside it.
    ///
    /// Runs before anything is written.
    fn validate(&self, source: &Path, dest: &Path) -> ApplicationResult<()> {
        if !self.fs.exists(source) {
            return Err(ApplicationError::InvalidInput {
                path: source.to_path_buf(),
                reason: "no such directory".into(),
            });
        }
        if !self.fs.is_dir(source) {
            return Err(DomainError::SourceNotDirectory(source.to_path_buf()).into());
        }
        self.fs
            .read_dir(source)
            .map_err(|e| ApplicationError::InvalidInput {
                path: source.to_path_buf(),
                reason: format!("cannot list directory: {e}"),
            })?;

        let source_abs = self
            .fs
            .canonicalize(source)
            .map_err(|e| ApplicationError::InvalidInput {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        let dest_abs =
            absolutize(self.fs.as_ref(), dest).with_path_context("resolve destination", dest)?;

        if dest_abs.starts_with(&source_abs) {
            return Err(DomainError::DestinationInsideSource {
                source_dir: source.to_path_buf(),
                dest: dest.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    fn process_dir(&self, target: &Path) -> ApplicationResult<Disposition> {
        if !self.options.dry_run {
            self.fs
                .create_dir_all(target)
                .with_path_context("create directory", target)?;
        }
        Ok(Disposition::PassThrough)
    }

    fn process_file(
        &self,
        source: &Path,
        target: &Path,
        rule: Option<ContentRule>,
    ) -> ApplicationResult<Disposition> {
        let target_exists = self.fs.exists(target);
        if target_exists && self.options.existing == ExistingPolicy::Skip {
            return Ok(Disposition::Skipped);
        }

        let rewritten = match rule {
            Some(rule) => {
                let content = self.fs.read(source).with_path_context("read", source)?;
                let outcome = rule.apply(&content);
                if outcome.is_rewritten() {
                    debug!(
                        "{:?}: dropped {} line(s) from {}",
                        rule,
                        outcome.removed_lines,
                        source.display()
                    );
                    Some(outcome.content)
                } else {
                    None
                }
            }
            None => None,
        };

        if self.options.dry_run {
            return Ok(if rewritten.is_some() {
                Disposition::Rewritten
            } else {
                Disposition::PassThrough
            });
        }

        if target_exists {
            // leftover read-only copy from an earlier run
            self.fs
                .set_readonly(target, false)
                .with_path_context("make writable", target)?;
        }

        let disposition = match rewritten {
            Some(content) => {
                self.fs
                    .write(target, &content)
                    .with_path_context("write", target)?;
                Disposition::Rewritten
            }
            None => {
                self.fs
                    .copy(source, target)
                    .map_err(|e| ApplicationError::OperationFailed {
                        context: format!("copy {} -> {}", source.display(), target.display()),
                        source: Box::new(e),
                    })?;
                Disposition::PassThrough
            }
        };

        self.sync_metadata(source, target)?;
        Ok(disposition)
    }

    /// Carry the source mtime over; keep read-only only when asked to.
    fn sync_metadata(&self, source: &Path, target: &Path) -> ApplicationResult<()> {
        let readonly = self
            .fs
            .is_readonly(source)
            .with_path_context("read metadata", source)?;
        let modified = self
            .fs
            .modified(source)
            .with_path_context("read metadata", source)?;

        // mtime can only be set through a writable handle
        self.fs
            .set_readonly(target, false)
            .with_path_context("make writable", target)?;
        self.fs
            .set_modified(target, modified)
            .with_path_context("set modification time", target)?;

        if readonly && !self.options.make_writable {
            self.fs
                .set_readonly(target, true)
                .with_path_context("restore read-only", target)?;
        }
        Ok(())
    }
}
