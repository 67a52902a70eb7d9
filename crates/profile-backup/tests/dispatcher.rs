//! Tests for the dispatcher and aggregator
//!

use core::time::Duration;
use std::collections::HashMap;

use common::{clear_scratch, make_profile, scratch_root, test_config};
use profile_backup::{
    BackupStats, TaskResult, dispatcher,
    engine::{CopyOutcome, ExitClass, Mock},
    report,
    target::BackupTarget,
};

mod common;

#[test]
fn every_target_yields_exactly_one_result() {
    let root = scratch_root("one_result_per_target");
    let mut config = test_config(&root);
    config.max_concurrent_targets = 2;

    let users = ["alice", "bob", "carol", "dave", "erin"];
    let targets: Vec<BackupTarget> = users
        .iter()
        .map(|user| make_profile(&root, user, &["Desktop"]))
        .collect();

    let engine = Mock::returning(CopyOutcome {
        class: ExitClass::Success,
        files_copied: 1,
        bytes_copied: 4,
    });

    let results = dispatcher::run_all(targets, &config, &engine);

    assert_eq!(results.len(), users.len());
    for user in users {
        let result = results.get(user).expect("every target has a result");
        assert!(result.success);
    }

    clear_scratch(&root);
}

#[test]
fn worker_limit_above_target_count_is_fine() {
    let root = scratch_root("more_workers_than_targets");
    let mut config = test_config(&root);
    config.max_concurrent_targets = 8;

    let targets = vec![
        make_profile(&root, "alice", &["Desktop"]),
        make_profile(&root, "bob", &["Desktop"]),
    ];

    let engine = Mock::returning(CopyOutcome::default());
    let results = dispatcher::run_all(targets, &config, &engine);

    assert_eq!(results.len(), 2);

    clear_scratch(&root);
}

#[test]
fn missing_source_is_one_failure_among_successes() {
    let root = scratch_root("missing_alice_present_bob");
    let mut config = test_config(&root);
    config.max_concurrent_targets = 2;

    let alice = BackupTarget {
        user_name: "alice".to_string(),
        source_root: root.join("profiles").join("alice"),
    };
    let bob = make_profile(&root, "bob", &["Desktop"]);

    let engine = Mock::returning(CopyOutcome::default());
    let results = dispatcher::run_all(vec![alice, bob], &config, &engine);
    let summary = report::aggregate(results);

    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.success_count, 1);
    assert!(!summary.all_succeeded());

    let (first_user, first_result) = &summary.per_target[0];
    assert_eq!(first_user, "alice");
    assert!(!first_result.success);
    assert_eq!(first_result.stats, BackupStats::default());

    let (second_user, second_result) = &summary.per_target[1];
    assert_eq!(second_user, "bob");
    assert!(second_result.success);

    clear_scratch(&root);
}

#[test]
fn aggregate_sorts_results_by_user_name() {
    let mut results = HashMap::new();
    for user in ["carol", "alice", "bob"] {
        results.insert(
            user.to_string(),
            TaskResult {
                success: true,
                message: String::from("backed up"),
                duration: Duration::from_secs(1),
                stats: BackupStats::default(),
            },
        );
    }

    let summary = report::aggregate(results);

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.success_count, 3);
    assert!(summary.all_succeeded());

    let order: Vec<&str> = summary
        .per_target
        .iter()
        .map(|(user, _)| user.as_str())
        .collect();
    assert_eq!(order, ["alice", "bob", "carol"]);
}

#[test]
fn render_lists_every_target_with_a_verdict() {
    let mut results = HashMap::new();
    results.insert(
        "alice".to_string(),
        TaskResult::failed(String::from("source root missing"), Duration::ZERO),
    );
    results.insert(
        "bob".to_string(),
        TaskResult {
            success: true,
            message: String::from("backed up"),
            duration: Duration::from_secs(2),
            stats: BackupStats {
                folders_copied: 3,
                files_copied: 10,
                bytes_copied: 2048,
                files_skipped: 0,
                bytes_skipped: 0,
                errors: 0,
            },
        },
    );

    let summary = report::aggregate(results);
    let rendered = report::render(&summary);

    assert!(rendered.contains("1/2 profiles succeeded"));
    assert!(rendered.contains("FAILED alice"));
    assert!(rendered.contains("OK     bob"));
}
