use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use super::{CopyEngine, CopyOptions, CopyOutcome, ExitClass};

/// Mock copy engine with scripted outcomes. Tests use it to pin the
/// task's exit-class handling without the external tool.
#[derive(Debug, Default)]
pub struct Mock {
    outcome: CopyOutcome,
    failing_folders: Vec<String>,
    calls: Mutex<Vec<RecordedCopy>>,
}

/// One recorded `copy_directory` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCopy {
    /// The requested source directory.
    pub source: PathBuf,

    /// The requested destination directory.
    pub destination: PathBuf,

    /// The size filter the call carried.
    pub max_file_bytes: Option<u64>,
}

impl Mock {
    /// A mock returning `outcome` for every call.
    pub fn returning(outcome: CopyOutcome) -> Self {
        Self {
            outcome,
            ..Self::default()
        }
    }

    /// Report [`ExitClass::Failure`] for sources whose final path
    /// component is `folder`.
    #[must_use]
    pub fn failing_on(mut self, folder: &str) -> Self {
        self.failing_folders.push(folder.to_string());
        self
    }

    /// The calls made so far.
    pub fn calls(&self) -> Vec<RecordedCopy> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CopyEngine for Mock {
    fn copy_directory(
        &self,
        source: &Path,
        destination: &Path,
        options: &CopyOptions,
    ) -> CopyOutcome {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCopy {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                max_file_bytes: options.max_file_bytes,
            });

        let failed = self.failing_folders.iter().any(|folder| {
            source
                .file_name()
                .is_some_and(|name| name.to_string_lossy() == folder.as_str())
        });

        if failed {
            CopyOutcome {
                class: ExitClass::Failure,
                files_copied: 0,
                bytes_copied: 0,
            }
        } else {
            self.outcome
        }
    }
}
