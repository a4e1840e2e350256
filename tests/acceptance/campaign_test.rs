//! Whole-campaign outcome and exit-code acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - A target that accepts or rejects everything yields a passing run and no corpus
//! - Any crash fails the run and leaves one record per crash
//! - Timeouts are recorded, and fail the run only when configured to
//! - A missing target aborts before the first iteration

use super::common::{config, options, record_header, record_payload, run};
use fuzz_common::error::FuzzError;
use fuzz_common::state::CampaignState;
use fuzz_gen::{Stage, TargetSelection};
use fuzz_harness::Campaign;
use std::fs;
use std::time::Duration;

#[test]
fn test_accepting_target_passes_without_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crashes");

    let report = run(&config("accept", &crash_dir), options(50, 1, TargetSelection::All));

    assert_eq!(report.stats.total, 50);
    assert_eq!(report.stats.successes, 50);
    assert!(report.passed());
    assert!(!crash_dir.exists(), "no crash directory without crashes");
}

#[test]
fn test_rejecting_target_is_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crashes");

    let report = run(&config("reject", &crash_dir), options(50, 2, TargetSelection::All));

    assert_eq!(report.stats.tool_errors, 50);
    assert_eq!(report.stats.crashes, 0);
    assert!(report.passed());
    assert!(!crash_dir.exists());
}

#[test]
fn test_crashing_target_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crashes");

    let report = run(&config("crash", &crash_dir), options(10, 3, TargetSelection::All));

    assert_eq!(report.stats.crashes, 10);
    assert!(!report.passed());
    assert_eq!(report.crash_files.len(), 10);
    assert_eq!(fs::read_dir(&crash_dir).unwrap().count(), 10);

    for path in &report.crash_files {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("crash_"), "{name}");
        let header = record_header(path);
        assert!(header.contains("// Stderr: SIGSEGV in parse_expr"));
        assert!(header.contains("// Seed: 3\n"));
    }
}

#[test]
fn test_timeouts_pass_by_default_and_fail_when_strict() {
    let dir = tempfile::tempdir().unwrap();

    let mut lenient = config("hang", &dir.path().join("lenient"));
    lenient.timeout = Duration::from_millis(150);
    let report = run(&lenient, options(2, 4, TargetSelection::Stage(Stage::Types)));
    assert_eq!(report.stats.timeouts, 2);
    assert_eq!(report.crash_files.len(), 2);
    assert!(report.passed());

    let mut strict = config("hang", &dir.path().join("strict"));
    strict.timeout = Duration::from_millis(150);
    strict.fail_on_timeout = true;
    let report = run(&strict, options(1, 4, TargetSelection::Stage(Stage::Types)));
    assert_eq!(report.stats.timeouts, 1);
    assert!(!report.passed());

    let payload = record_payload(&report.crash_files[0]);
    let expected = fuzz_gen::Generator::new(4).next_input(TargetSelection::Stage(Stage::Types));
    assert_eq!(payload, expected.as_bytes());
}

#[test]
fn test_missing_target_aborts_before_first_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crashes");
    let mut cfg = config("accept", &crash_dir);
    cfg.compiler = dir.path().join("bin").join("aetherc");

    let mut campaign = Campaign::new(&cfg, options(100, 5, TargetSelection::All));
    let err = campaign.run(|| false).unwrap_err();

    assert!(matches!(err, FuzzError::Configuration(_)));
    assert!(err.to_string().contains("aetherc"));
    assert_eq!(campaign.state(), CampaignState::Idle);
    assert_eq!(campaign.stats().attempted(), 0);
    assert!(!crash_dir.exists());
}

#[test]
fn test_mixed_outcomes_keep_counters_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crashes");

    let report = run(
        &config("selective", &crash_dir),
        options(200, 6, TargetSelection::Stage(Stage::Types)),
    );

    let stats = &report.stats;
    assert_eq!(stats.total, 200);
    assert!(stats.is_consistent());
    assert_eq!(stats.harness_errors, 0);
    assert!(stats.crashes > 0, "struct-bearing type inputs should crash the target");
    assert!(stats.tool_errors > 0);
    assert_eq!(report.crash_files.len() as u64, stats.crashes);

    for path in &report.crash_files {
        assert!(record_header(path).contains("// Exit status: -11 (SIGSEGV)\n"));
        let payload = record_payload(path);
        assert!(payload.windows(6).any(|w| w == b"struct"));
    }
}
