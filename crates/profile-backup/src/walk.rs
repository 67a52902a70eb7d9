//! Recursive filesystem walks shared by the archive sweep and the file
//! listing.

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::warn;

/// A file found by a walk.
pub(crate) struct FoundFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last write time, when the filesystem reports one.
    pub modified: Option<SystemTime>,
}

/// Collect every file under `root`, depth first. Unreadable entries are
/// warned about and skipped.
pub(crate) fn walk_files(root: &Path) -> Vec<FoundFile> {
    let mut found = Vec::new();
    descend(root, &mut found);
    found
}

fn descend(directory: &Path, found: &mut Vec<FoundFile>) {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) => {
            warn!("Could not read {directory:?}: {error}");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("Could not read entry under {directory:?}: {error}");
                continue;
            }
        };

        let path = entry.path();

        // DirEntry metadata does not traverse symlinks, so a linked
        // directory cannot recurse into a cycle.
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!("Could not get metadata for {path:?}: {error}");
                continue;
            }
        };

        if metadata.is_dir() {
            descend(&path, found);
        } else if metadata.is_file() {
            found.push(FoundFile {
                path,
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }
    }
}

/// Collect files under `root` whose extension case-insensitively matches
/// one of `extensions`.
pub(crate) fn find_by_extension(root: &Path, extensions: &[String]) -> Vec<(PathBuf, u64)> {
    walk_files(root)
        .into_iter()
        .filter(|file| {
            file.path.extension().is_some_and(|found| {
                extensions
                    .iter()
                    .any(|wanted| found.eq_ignore_ascii_case(wanted.as_str()))
            })
        })
        .map(|file| (file.path, file.size))
        .collect()
}
