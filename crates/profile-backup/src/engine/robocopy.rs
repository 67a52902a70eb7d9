use core::{iter::Peekable, str::SplitWhitespace};
use std::{path::Path, process::Command};

use tracing::warn;

use super::{CopyEngine, CopyOptions, CopyOutcome, ExitClass};

/// Copy engine backed by the system's `robocopy` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Robocopy;

impl CopyEngine for Robocopy {
    fn copy_directory(
        &self,
        source: &Path,
        destination: &Path,
        options: &CopyOptions,
    ) -> CopyOutcome {
        let mut command = Command::new("robocopy");
        command.arg(source).arg(destination);

        if options.recursive {
            command.arg("/E");
        }
        if options.preserve_metadata {
            command.arg("/COPY:DAT").arg("/DCOPY:T");
        }
        command.arg(format!("/R:{}", options.retry_count));
        command.arg(format!("/W:{}", options.retry_wait_seconds));
        command.arg(format!("/MT:{}", options.thread_count));
        if let Some(max_bytes) = options.max_file_bytes {
            command.arg(format!("/MAX:{max_bytes}"));
        }

        // Plain byte counts and no progress keep the summary parseable.
        command.arg("/BYTES").arg("/NP");
        if let Some(log_file) = &options.log_file {
            command.arg("/TEE");
            command.arg(format!("/LOG:{}", log_file.display()));
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(error) => {
                warn!("Could not run the copy tool for {source:?}: {error}");
                return CopyOutcome {
                    class: ExitClass::Failure,
                    files_copied: 0,
                    bytes_copied: 0,
                };
            }
        };

        let class = match output.status.code() {
            Some(code) => classify_exit_code(code),
            None => ExitClass::Failure,
        };

        let text = String::from_utf8_lossy(&output.stdout);
        let (files_copied, bytes_copied) = parse_copy_counters(&text);

        CopyOutcome {
            class,
            files_copied,
            bytes_copied,
        }
    }
}

/// Map the tool's exit code onto an [`ExitClass`]. The tool's code is a
/// bitmask: 1 for copied files, 2 and 4 for extra or mismatched entries,
/// 8 upward for failures.
pub fn classify_exit_code(code: i32) -> ExitClass {
    match code {
        0 | 1 => ExitClass::Success,
        2..=7 => ExitClass::Partial,
        _ => ExitClass::Failure,
    }
}

/// Recover the files-copied and bytes-copied counters from the tool's
/// summary table. Tolerant by contract: anything that does not parse
/// yields zero rather than an error.
pub fn parse_copy_counters(log_text: &str) -> (u64, u64) {
    let mut files_copied = 0;
    let mut bytes_copied = 0;

    for line in log_text.lines() {
        let trimmed = line.trim_start();
        if let Some(row) = trimmed.strip_prefix("Files :") {
            files_copied = copied_column(row).unwrap_or(0);
        } else if let Some(row) = trimmed.strip_prefix("Bytes :") {
            bytes_copied = copied_column(row).unwrap_or(0);
        }
    }

    (files_copied, bytes_copied)
}

/// The summary columns are `Total Copied Skipped Mismatch FAILED Extras`;
/// the copied column is the second.
fn copied_column(row: &str) -> Option<u64> {
    let mut fields = row.split_whitespace().peekable();

    let _total = column_value(&mut fields)?;
    column_value(&mut fields)
}

/// One column value. Byte columns carry a `k`/`m`/`g` unit suffix when
/// the tool was not run with plain byte counts.
fn column_value(fields: &mut Peekable<SplitWhitespace<'_>>) -> Option<u64> {
    let number: f64 = fields.next()?.parse().ok()?;

    let scale = match fields.peek().copied() {
        Some("k") => Some(1024.0),
        Some("m") => Some(1024.0 * 1024.0),
        Some("g") => Some(1024.0 * 1024.0 * 1024.0),
        _ => None,
    };

    match scale {
        Some(scale) => {
            fields.next();
            Some((number * scale) as u64)
        }
        None => Some(number as u64),
    }
}
