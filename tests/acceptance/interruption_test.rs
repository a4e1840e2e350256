//! Early-stop acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - A stop request is honored at the next iteration boundary
//! - An interrupted campaign still produces a complete, consistent report

use super::common::{config, options};
use fuzz_common::state::CampaignState;
use fuzz_gen::TargetSelection;
use fuzz_harness::Campaign;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_stop_before_first_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let mut campaign = Campaign::new(
        &config("accept", dir.path()),
        options(1_000, 7, TargetSelection::All),
    );

    let report = campaign.run(|| true).unwrap();

    assert!(report.interrupted);
    assert_eq!(report.stats.total, 0);
    assert!(report.passed());
    assert_eq!(campaign.state(), CampaignState::Done);
}

#[test]
fn test_stop_from_another_thread() {
    let dir = tempfile::tempdir().unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    let trigger = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            stop.store(true, Ordering::Relaxed);
        })
    };

    let mut campaign = Campaign::new(
        &config("slow", dir.path()),
        options(10_000, 8, TargetSelection::All),
    );
    let report = campaign.run(|| stop.load(Ordering::Relaxed)).unwrap();
    trigger.join().unwrap();

    assert!(report.interrupted);
    assert!(report.stats.total > 0);
    assert!(report.stats.total < 10_000);
    assert!(report.stats.is_consistent());
    assert_eq!(report.stats.tool_errors, report.stats.total);
    assert_eq!(campaign.state(), CampaignState::Done);
}

#[test]
fn test_uninterrupted_run_is_not_marked() {
    let dir = tempfile::tempdir().unwrap();
    let mut campaign = Campaign::new(
        &config("reject", dir.path()),
        options(3, 9, TargetSelection::All),
    );
    let report = campaign.run(|| false).unwrap();
    assert!(!report.interrupted);
    assert_eq!(report.stats.total, 3);
}
