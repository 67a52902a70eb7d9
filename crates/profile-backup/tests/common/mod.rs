//! # common
//!

#![allow(dead_code)]

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use profile_backup::{
    config::{Config, CopyToolConfig},
    target::BackupTarget,
};

/// A fresh scratch root under the OS temp dir, unique per test name.
pub fn scratch_root(test_name: &str) -> PathBuf {
    let root = env::temp_dir().join(format!("profile-backup-{test_name}"));
    clear_scratch(&root);
    fs::create_dir_all(&root).unwrap();
    root
}

/// Remove a scratch root and everything under it.
pub fn clear_scratch(root: &Path) {
    if root.exists() {
        fs::remove_dir_all(root).unwrap();
    }
}

/// A config pointing at the scratch profile and destination roots.
pub fn test_config(root: &Path) -> Config {
    Config {
        profiles_root: root.join("profiles"),
        destination_root: root.join("dest"),
        folders: vec![
            "Desktop".to_string(),
            "Documents".to_string(),
            "Downloads".to_string(),
        ],
        skip_large_files: false,
        max_file_bytes: 150,
        max_concurrent_targets: 4,
        archive_extensions: vec!["pst".to_string(), "ost".to_string()],
        copy_tool: CopyToolConfig::default(),
    }
}

/// Create a profile tree with the given subfolders, each holding one
/// small file, and return its target.
pub fn make_profile(root: &Path, user: &str, folders: &[&str]) -> BackupTarget {
    let source_root = root.join("profiles").join(user);
    fs::create_dir_all(&source_root).unwrap();

    for folder in folders {
        let folder_path = source_root.join(folder);
        fs::create_dir_all(&folder_path).unwrap();
        fs::write(folder_path.join("file.txt"), b"data").unwrap();
    }

    BackupTarget {
        user_name: user.to_string(),
        source_root,
    }
}

/// The single timestamped run folder created for a user.
pub fn run_folder(config: &Config, user: &str) -> PathBuf {
    let user_root = config.destination_root.join(user);
    let mut entries: Vec<PathBuf> = fs::read_dir(&user_root)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one run folder");
    entries.remove(0)
}
