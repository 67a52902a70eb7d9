//! The bounded worker pool that fans backup tasks out
//!

use core::time::Duration;
use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    thread,
};

use crossbeam::channel;
use tracing::{error, info};

use crate::{TaskResult, config::Config, engine::CopyEngine, target::BackupTarget, task};

/// Run every target on a bounded worker pool and collect exactly one
/// result per target. Blocks until all tasks complete; completions are
/// logged as they arrive, in whatever order the workers finish.
pub fn run_all(
    targets: Vec<BackupTarget>,
    config: &Config,
    engine: &dyn CopyEngine,
) -> HashMap<String, TaskResult> {
    let total = targets.len();
    let worker_count = worker_count(config, total);

    let (task_sender, task_receiver) = channel::unbounded::<BackupTarget>();
    let (result_sender, result_receiver) = channel::unbounded::<(String, TaskResult)>();

    for target in targets {
        // An unbounded channel cannot refuse a send.
        let _ = task_sender.send(target);
    }
    drop(task_sender);

    info!("Dispatching {total} profiles across {worker_count} workers");

    let mut results = HashMap::with_capacity(total);

    thread::scope(|scope| {
        for _ in 0..worker_count {
            let task_receiver = task_receiver.clone();
            let result_sender = result_sender.clone();

            scope.spawn(move || {
                while let Ok(target) = task_receiver.recv() {
                    let result = run_caught(&target, config, engine);
                    if result_sender.send((target.user_name, result)).is_err() {
                        return;
                    }
                }
            });
        }
        drop(result_sender);

        // Consume completions as they arrive so progress stays visible
        // while the remaining workers run. The loop ends once every
        // worker has dropped its sender.
        let mut completed = 0_usize;
        while let Ok((user_name, result)) = result_receiver.recv() {
            completed += 1;
            let verdict = if result.success { "ok" } else { "failed" };
            info!("[{completed}/{total}] {user_name}: {verdict}");
            results.insert(user_name, result);
        }
    });

    results
}

/// A panicking task must not take the pool down; it becomes a failed
/// result like any other fault.
fn run_caught(target: &BackupTarget, config: &Config, engine: &dyn CopyEngine) -> TaskResult {
    let run = AssertUnwindSafe(|| task::run_one(target, config, engine));

    match panic::catch_unwind(run) {
        Ok(result) => result,
        Err(_) => {
            error!("Backup task for {} panicked", target.user_name);
            TaskResult::failed(
                format!("backup task for {} panicked", target.user_name),
                Duration::ZERO,
            )
        }
    }
}

/// `min(selected targets, configured limit)`, never below one.
fn worker_count(config: &Config, target_count: usize) -> usize {
    config
        .max_concurrent_targets
        .max(1)
        .min(target_count.max(1))
}
