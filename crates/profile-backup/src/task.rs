//! The single-target backup task
//!

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::Local;
use shared::Context;
use tracing::{info, warn};

use crate::{
    BackupStats, TaskResult,
    config::Config,
    engine::{CopyEngine, CopyOptions, ExitClass},
    report,
    target::BackupTarget,
    walk,
};

/// The profile hive file copied alongside the profile folders.
const PROFILE_HIVE: &str = "NTUSER.DAT";

/// The extension of offline mail cache files. They rebuild themselves
/// from the server and are never worth backing up.
const MAIL_CACHE_EXTENSION: &str = "ost";

/// The destination subfolder for swept mail archive files.
const ARCHIVE_FOLDER: &str = "PST";

/// Auxiliary data sets copied best-effort: `(label, path relative to the
/// profile root)`.
const AUX_DATA_SETS: &[(&str, &str)] = &[
    ("Outlook signatures", r"AppData\Roaming\Microsoft\Signatures"),
    ("Sticky notes", r"AppData\Roaming\Microsoft\Sticky Notes"),
    (
        "Chrome bookmarks",
        r"AppData\Local\Google\Chrome\User Data\Default\Bookmarks",
    ),
    (
        "Edge bookmarks",
        r"AppData\Local\Microsoft\Edge\User Data\Default\Bookmarks",
    ),
];

/// Run the backup task for one target. Never fails: every outcome is a
/// [`TaskResult`], including a missing source root. Every step past
/// validation is best-effort; a failure in one does not stop the rest.
pub fn run_one(target: &BackupTarget, config: &Config, engine: &dyn CopyEngine) -> TaskResult {
    let start = Instant::now();
    let mut context = Context {
        user: Some(target.user_name.clone()),
        step: "Validate",
    };

    // A target without a source root is a hard failure with zero stats.
    if !target.source_root.is_dir() {
        warn!(
            "{context}Source root {:?} does not exist",
            target.source_root
        );
        return TaskResult::failed(
            format!("source root {:?} does not exist", target.source_root),
            start.elapsed(),
        );
    }

    // Each run gets its own timestamped folder, so re-runs append next to
    // earlier backups instead of overwriting them.
    context.step = "Prepare";
    let destination = {
        let run_folder = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        config
            .destination_root
            .join(&target.user_name)
            .join(run_folder)
    };

    if let Err(error) = fs::create_dir_all(&destination) {
        warn!("{context}Could not create destination {destination:?}: {error}");
        return TaskResult::failed(
            format!("could not create destination {destination:?}: {error}"),
            start.elapsed(),
        );
    }

    let mut stats = BackupStats::default();

    copy_profile_hive(&mut context, target, &destination);
    copy_profile_folders(&mut context, target, config, engine, &destination, &mut stats);
    copy_aux_data(&mut context, target, config, engine, &destination);
    sweep_archives(&mut context, target, config, &destination, &mut stats);
    write_reports(&mut context, target, config, &destination, &stats);

    context.step = "Finish";
    let duration = start.elapsed();
    info!("{context}Finished in {duration:?}");

    let message = if stats.errors == 0 {
        format!("backed up to {destination:?}")
    } else {
        format!(
            "completed with {} copy errors, backed up to {destination:?}",
            stats.errors
        )
    };

    // A completed task reports success even with copy errors; the count
    // is surfaced in the message and the final report.
    TaskResult {
        success: true,
        message,
        duration,
        stats,
    }
}

/// Best-effort copy of the profile's registry hive. The hive of a logged
/// in user is locked; that is the expected warning case.
fn copy_profile_hive(context: &mut Context, target: &BackupTarget, destination: &Path) {
    context.step = "Hive";

    let hive = target.source_root.join(PROFILE_HIVE);
    if !hive.is_file() {
        info!("{context}No {PROFILE_HIVE} under {:?}", target.source_root);
        return;
    }

    match fs::copy(&hive, destination.join(PROFILE_HIVE)) {
        Ok(_) => info!("{context}Copied {PROFILE_HIVE}"),
        Err(error) => warn!("{context}Could not copy {PROFILE_HIVE}: {error}"),
    }
}

/// Hand each configured profile subfolder to the copy tool. A missing
/// subfolder is skipped; a failed copy increments the error count and the
/// remaining folders still run.
fn copy_profile_folders(
    context: &mut Context,
    target: &BackupTarget,
    config: &Config,
    engine: &dyn CopyEngine,
    destination: &Path,
    stats: &mut BackupStats,
) {
    context.step = "Folders";

    let log_directory = destination.join("logs");
    if let Err(error) = fs::create_dir_all(&log_directory) {
        warn!("{context}Could not create the copy log directory: {error}");
    }

    for folder in &config.folders {
        let source = target.source_root.join(folder);
        if !source.is_dir() {
            info!("{context}{folder} not present, skipping");
            continue;
        }

        let folder_destination = destination.join(folder);
        if let Err(error) = fs::create_dir_all(&folder_destination) {
            warn!("{context}Could not create the destination for {folder}: {error}");
            stats.errors += 1;
            continue;
        }

        let options = copy_options(config, Some(log_directory.join(format!("{folder}.log"))));
        let outcome = engine.copy_directory(&source, &folder_destination, &options);

        match outcome.class {
            ExitClass::Failure => {
                warn!("{context}Copy tool failed for {folder}");
                stats.errors += 1;
            }
            ExitClass::Partial => {
                warn!("{context}Copy tool reported mismatches or extras for {folder}");
                stats.folders_copied += 1;
                stats.files_copied += outcome.files_copied;
                stats.bytes_copied += outcome.bytes_copied;
            }
            ExitClass::Success => {
                info!(
                    "{context}Copied {folder}: {} files, {} bytes",
                    outcome.files_copied, outcome.bytes_copied
                );
                stats.folders_copied += 1;
                stats.files_copied += outcome.files_copied;
                stats.bytes_copied += outcome.bytes_copied;
            }
        }
    }
}

/// The engine options for a profile folder copy.
fn copy_options(config: &Config, log_file: Option<PathBuf>) -> CopyOptions {
    CopyOptions {
        recursive: true,
        preserve_metadata: true,
        retry_count: config.copy_tool.retry_count,
        retry_wait_seconds: config.copy_tool.retry_wait_seconds,
        thread_count: config.copy_tool.thread_count,
        max_file_bytes: config.skip_large_files.then_some(config.max_file_bytes),
        log_file,
    }
}

/// Copy the fixed auxiliary data sets. Each is independently best-effort
/// and failures are log-only; none of them touch the stats.
fn copy_aux_data(
    context: &mut Context,
    target: &BackupTarget,
    config: &Config,
    engine: &dyn CopyEngine,
    destination: &Path,
) {
    context.step = "Aux";

    let aux_root = destination.join("Aux");
    for (label, relative) in AUX_DATA_SETS {
        let source = target.source_root.join(relative);

        if source.is_file() {
            if let Err(error) = fs::create_dir_all(&aux_root) {
                warn!("{context}Could not create the aux destination: {error}");
                continue;
            }
            match fs::copy(&source, aux_root.join(label)) {
                Ok(_) => info!("{context}Copied {label}"),
                Err(error) => warn!("{context}Could not copy {label}: {error}"),
            }
        } else if source.is_dir() {
            let aux_destination = aux_root.join(label);
            if let Err(error) = fs::create_dir_all(&aux_destination) {
                warn!("{context}Could not create the destination for {label}: {error}");
                continue;
            }
            let options = copy_options(config, None);
            let outcome = engine.copy_directory(&source, &aux_destination, &options);
            if outcome.class == ExitClass::Failure {
                warn!("{context}Could not copy {label}");
            } else {
                info!("{context}Copied {label}");
            }
        } else {
            info!("{context}{label} not present");
        }
    }
}

/// Sweep the whole profile for mail data files. Offline caches are
/// skipped unconditionally; oversized archives count as skipped when the
/// size filter is on; surviving matches land in one dedicated subfolder.
fn sweep_archives(
    context: &mut Context,
    target: &BackupTarget,
    config: &Config,
    destination: &Path,
    stats: &mut BackupStats,
) {
    context.step = "Archives";

    let matches = walk::find_by_extension(&target.source_root, &config.archive_extensions);
    if matches.is_empty() {
        return;
    }

    let archive_destination = destination.join(ARCHIVE_FOLDER);
    if let Err(error) = fs::create_dir_all(&archive_destination) {
        warn!("{context}Could not create the {ARCHIVE_FOLDER} destination: {error}");
        stats.errors += 1;
        return;
    }

    for (path, size) in matches {
        if has_extension(&path, MAIL_CACHE_EXTENSION) {
            info!("{context}Skipping mail cache {path:?}");
            continue;
        }

        if config.skip_large_files && size > config.max_file_bytes {
            info!("{context}Skipping {path:?}: {size} bytes is over the size threshold");
            stats.files_skipped += 1;
            stats.bytes_skipped += size;
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };

        match fs::copy(&path, archive_destination.join(file_name)) {
            Ok(copied) => {
                info!("{context}Copied {path:?}");
                stats.files_copied += 1;
                stats.bytes_copied += copied;
            }
            Err(error) => {
                warn!("{context}Could not copy {path:?}: {error}");
                stats.errors += 1;
            }
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|found| found.eq_ignore_ascii_case(extension))
}

/// Write the per-target file listing and summary into the destination.
/// Cosmetic failures: warned about, never flip the task's success flag.
fn write_reports(
    context: &mut Context,
    target: &BackupTarget,
    config: &Config,
    destination: &Path,
    stats: &BackupStats,
) {
    context.step = "Report";

    let mut files = Vec::new();
    for folder in &config.folders {
        let source = target.source_root.join(folder);
        if source.is_dir() {
            files.extend(walk::walk_files(&source));
        }
    }

    if let Err(error) = report::write_file_listing(&destination.join("file_list.txt"), &files) {
        warn!("{context}Could not write the file listing: {error}");
    }

    let summary_path = destination.join("summary.txt");
    if let Err(error) =
        report::write_target_summary(&summary_path, &target.user_name, &config.folders, stats)
    {
        warn!("{context}Could not write the summary: {error}");
    }
}
