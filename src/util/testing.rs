//! Test support: one-time logging setup and source-tree fixtures.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use walkdir::WalkDir;

static TEST_SETUP: Once = Once::new();

/// Install the global test subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `debug` so service traces show up with `--nocapture`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// Create files below `root`, parents included. Paths use `/` separators.
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) -> io::Result<()> {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
    }
    Ok(())
}

/// Snapshot of a tree: relative path to file content, `None` for directories.
pub fn read_tree(root: &Path) -> io::Result<BTreeMap<PathBuf, Option<Vec<u8>>>> {
    let mut snapshot = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?
            .to_path_buf();
        let content = if entry.file_type().is_dir() {
            None
        } else {
            Some(fs::read(entry.path())?)
        };
        snapshot.insert(relative, content);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_written_tree_when_read_back_then_snapshot_matches() {
        init_test_setup();
        let temp = TempDir::new().unwrap();

        write_tree(temp.path(), &[("a/b.txt", b"b"), ("c.txt", b"c")]).unwrap();
        let snapshot = read_tree(temp.path()).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[&PathBuf::from("a")], None);
        assert_eq!(snapshot[&PathBuf::from("a/b.txt")], Some(b"b".to_vec()));
        assert_eq!(snapshot[&PathBuf::from("c.txt")], Some(b"c".to_vec()));
    }
}
