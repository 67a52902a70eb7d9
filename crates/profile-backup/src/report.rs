//! Result aggregation and report rendering
//!

use core::fmt::Write as _;
use std::{collections::HashMap, fs, io, path::Path};

use chrono::{DateTime, Local};
use shared::host_name;

use crate::{BackupStats, TaskResult, walk::FoundFile};

/// The aggregated outcome of a run.
#[derive(Debug)]
pub struct Summary {
    /// Targets whose task reported success.
    pub success_count: usize,

    /// Targets dispatched.
    pub total_count: usize,

    /// Per-target results, sorted by user name.
    pub per_target: Vec<(String, TaskResult)>,
}

impl Summary {
    /// Whether every dispatched target succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.success_count == self.total_count
    }
}

/// Tally the dispatcher's results into a summary.
pub fn aggregate(results: HashMap<String, TaskResult>) -> Summary {
    let total_count = results.len();
    let success_count = results.values().filter(|result| result.success).count();

    let mut per_target: Vec<(String, TaskResult)> = results.into_iter().collect();
    per_target.sort_by(|a, b| a.0.cmp(&b.0));

    Summary {
        success_count,
        total_count,
        per_target,
    }
}

/// Render the final console report: one definitive verdict per target.
pub fn render(summary: &Summary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Backup finished: {}/{} profiles succeeded",
        summary.success_count, summary.total_count
    );

    for (user_name, result) in &summary.per_target {
        let verdict = if result.success { "OK" } else { "FAILED" };
        let stats = &result.stats;

        let _ = writeln!(out, "  {verdict:<6} {user_name}: {}", result.message);
        let _ = writeln!(
            out,
            "         {} folders, {} files, {} copied, {} skipped, {} errors, took {:?}",
            stats.folders_copied,
            stats.files_copied,
            format_bytes(stats.bytes_copied),
            stats.files_skipped,
            stats.errors,
            result.duration,
        );
    }

    out
}

/// Human-readable byte count for the reports.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Write the per-target file listing: one `path<TAB>bytes<TAB>modified`
/// line per file.
pub(crate) fn write_file_listing(path: &Path, files: &[FoundFile]) -> io::Result<()> {
    let mut contents = String::new();

    for file in files {
        let modified = file
            .modified
            .map(|time| {
                DateTime::<Local>::from(time)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| String::from("unknown"));

        let _ = writeln!(
            contents,
            "{}\t{}\t{}",
            file.path.display(),
            file.size,
            modified
        );
    }

    fs::write(path, contents)
}

/// Write the fixed-template summary report into the target's destination.
pub(crate) fn write_target_summary(
    path: &Path,
    user_name: &str,
    folders: &[String],
    stats: &BackupStats,
) -> io::Result<()> {
    let mut contents = String::new();

    let _ = writeln!(contents, "==============================================");
    let _ = writeln!(contents, " Profile backup summary for {user_name}");
    let _ = writeln!(contents, "==============================================");
    let _ = writeln!(
        contents,
        "Date: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(contents, "Host: {}", host_name());
    let _ = writeln!(contents);
    let _ = writeln!(contents, "Folders copied:  {}", stats.folders_copied);
    let _ = writeln!(contents, "Files copied:    {}", stats.files_copied);
    let _ = writeln!(
        contents,
        "Bytes copied:    {} ({})",
        stats.bytes_copied,
        format_bytes(stats.bytes_copied)
    );
    let _ = writeln!(contents, "Files skipped:   {}", stats.files_skipped);
    let _ = writeln!(
        contents,
        "Bytes skipped:   {} ({})",
        stats.bytes_skipped,
        format_bytes(stats.bytes_skipped)
    );
    let _ = writeln!(contents, "Copy errors:     {}", stats.errors);
    let _ = writeln!(contents);
    let _ = writeln!(contents, "Attempted folders:");
    for folder in folders {
        let _ = writeln!(contents, "  - {folder}");
    }
    let _ = writeln!(contents);
    let _ = writeln!(
        contents,
        "Review the copy logs under logs/ for per-folder detail."
    );

    fs::write(path, contents)
}
