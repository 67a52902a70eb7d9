//! Backup targets and profile discovery
//!

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

/// Profiles that belong to the OS rather than a user.
const SYSTEM_PROFILES: &[&str] = &[
    "All Users",
    "Default",
    "Default User",
    "Public",
    "WDAGUtilityAccount",
];

/// One unit of work: a user profile to back up. Immutable once enqueued;
/// `user_name` keys the results map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTarget {
    /// The profile's user name.
    pub user_name: String,

    /// The profile's root directory.
    pub source_root: PathBuf,
}

/// Enumerate the user profiles under the profiles root, skipping the
/// well-known system profiles. Unreadable entries are warned about and
/// skipped.
pub fn discover_targets(profiles_root: &Path) -> Result<Vec<BackupTarget>, DiscoverError> {
    let directory = fs::read_dir(profiles_root).map_err(DiscoverError::ReadRoot)?;

    let mut targets = Vec::new();
    for entry in directory {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("Could not read profile entry: {error}");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let user_name = entry.file_name().to_string_lossy().into_owned();
        if SYSTEM_PROFILES
            .iter()
            .any(|profile| profile.eq_ignore_ascii_case(&user_name))
        {
            continue;
        }

        targets.push(BackupTarget {
            user_name,
            source_root: path,
        });
    }

    targets.sort_by(|a, b| a.user_name.cmp(&b.user_name));

    Ok(targets)
}

/// Filter discovered targets down to the requested user names. An empty
/// request or the literal `all` selects every discovered profile; a
/// requested name with no matching profile is warned about.
pub fn select_targets(mut targets: Vec<BackupTarget>, requested: &[String]) -> Vec<BackupTarget> {
    if requested.is_empty() || requested.iter().any(|name| name.eq_ignore_ascii_case("all")) {
        return targets;
    }

    for name in requested {
        let known = targets
            .iter()
            .any(|target| target.user_name.eq_ignore_ascii_case(name));
        if !known {
            warn!("No profile named '{name}' was found");
        }
    }

    targets.retain(|target| {
        requested
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&target.user_name))
    });

    targets
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Failed to read the profiles root:\n{0}")]
    ReadRoot(#[source] io::Error),
}
