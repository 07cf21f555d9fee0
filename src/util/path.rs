use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::infrastructure::traits::FileSystem;

/// Absolute form of a path that may not exist yet.
///
/// The longest existing ancestor is canonicalized and the missing tail is
/// appended lexically, so `dest/new/dir` resolves through symlinks in `dest`.
pub fn absolutize(fs: &dyn FileSystem, path: &Path) -> io::Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let path = normalize_lexically(&path);

    let mut missing: Vec<OsString> = Vec::new();
    let mut existing = path.as_path();
    while !fs.exists(existing) {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = fs.canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Drop `.` and fold `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
