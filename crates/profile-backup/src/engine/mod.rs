//! The copy engine wrapping the external bulk-copy tool.
//!

use std::path::{Path, PathBuf};

mod mock;
mod robocopy;

pub use mock::{Mock, RecordedCopy};
pub use robocopy::{Robocopy, classify_exit_code, parse_copy_counters};

/// Options for one invocation of the copy tool.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Copy subdirectories, including empty ones.
    pub recursive: bool,

    /// Preserve file data, attributes, and timestamps.
    pub preserve_metadata: bool,

    /// Retries for a failed copy.
    pub retry_count: u32,

    /// Seconds to wait between retries.
    pub retry_wait_seconds: u32,

    /// Copy threads inside the tool.
    pub thread_count: u32,

    /// Skip files over this size. `None` copies regardless of size.
    pub max_file_bytes: Option<u64>,

    /// Where the tool writes its own log for this invocation.
    pub log_file: Option<PathBuf>,
}

/// Classification of one copy invocation's exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    /// Nothing needed copying, or everything copied cleanly.
    #[default]
    Success,

    /// Files copied but the tool saw mismatches or extra files. Not fatal.
    Partial,

    /// The tool reported failures or could not run at all.
    Failure,
}

/// The result of one folder-copy operation. Transient; consumed by the
/// backup task to update its running stats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// The invocation's exit status class.
    pub class: ExitClass,

    /// Files copied, recovered from the tool's own output.
    pub files_copied: u64,

    /// Bytes copied, recovered from the tool's own output.
    pub bytes_copied: u64,
}

/// The seam between the backup task and the bulk-copy tool.
pub trait CopyEngine: Sync {
    /// Copy `source` into `destination`. Never fails outright: a copy
    /// that could not run at all is an outcome with
    /// [`ExitClass::Failure`].
    fn copy_directory(
        &self,
        source: &Path,
        destination: &Path,
        options: &CopyOptions,
    ) -> CopyOutcome;
}
