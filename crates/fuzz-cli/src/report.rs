//! Human-readable and JSON campaign reports.

use anyhow::{Context, Result};
use fuzz_harness::CampaignReport;
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

const RULE: &str = "==================================================";

/// Format the end-of-run summary printed to stdout.
pub fn format_summary(report: &CampaignReport, crash_dir: &Path) -> String {
    let stats = &report.stats;
    let mut output = String::new();

    let _ = writeln!(output);
    let _ = writeln!(output, "{RULE}");
    if report.interrupted {
        let _ = writeln!(output, "FUZZING INTERRUPTED");
    } else {
        let _ = writeln!(output, "FUZZING COMPLETE");
    }
    let _ = writeln!(output, "   Target: {}", report.target);
    let _ = writeln!(output, "   Seed: {}", report.seed);
    let _ = writeln!(output, "   Total: {} / {}", stats.total, report.iterations);
    let _ = writeln!(output, "   Crashes: {}", stats.crashes);
    let _ = writeln!(output, "   Timeouts: {}", stats.timeouts);
    let _ = writeln!(output, "   Errors: {}", stats.tool_errors);
    let _ = writeln!(output, "   Success: {}", stats.successes);
    if stats.harness_errors > 0 {
        let _ = writeln!(output, "   Harness failures: {}", stats.harness_errors);
    }
    let _ = writeln!(
        output,
        "   Time: {:.1}s ({:.1} tests/sec)",
        report.elapsed.as_secs_f64(),
        report.throughput()
    );
    if let (Some(mean), Some(max)) = (stats.mean_exec_time(), stats.max_exec_time()) {
        let _ = writeln!(
            output,
            "   Exec time: mean {}, max {}",
            humantime::format_duration(round_ms(mean)),
            humantime::format_duration(round_ms(max))
        );
    }
    let _ = writeln!(output);

    if stats.crashes > 0 {
        let _ = writeln!(
            output,
            "Found {} crashes! Check {}/",
            stats.crashes,
            crash_dir.display()
        );
    } else if report.fail_on_timeout && stats.timeouts > 0 {
        let _ = writeln!(
            output,
            "Found {} timeouts! Check {}/",
            stats.timeouts,
            crash_dir.display()
        );
    } else {
        let _ = writeln!(output, "No crashes found!");
    }
    for path in &report.crash_files {
        let _ = writeln!(output, "   {}", path.display());
    }
    let _ = writeln!(output, "Replay with: --seed {}", report.seed);

    output
}

fn round_ms(d: Duration) -> Duration {
    Duration::from_millis(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Write the report as pretty-printed JSON.
pub fn write_json(report: &CampaignReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzz_common::outcome::Outcome;
    use fuzz_common::stats::CampaignStats;
    use std::path::PathBuf;

    fn report(outcomes: &[Outcome], fail_on_timeout: bool) -> CampaignReport {
        let mut stats = CampaignStats::new();
        for outcome in outcomes {
            stats.record(*outcome, Duration::from_millis(40));
        }
        CampaignReport {
            target: "parser".into(),
            seed: 42,
            iterations: 10,
            interrupted: false,
            fail_on_timeout,
            elapsed: Duration::from_secs(2),
            stats,
            crash_files: Vec::new(),
        }
    }

    #[test]
    fn test_clean_summary() {
        let out = format_summary(
            &report(&[Outcome::Success, Outcome::ToolError], false),
            Path::new("./crashes"),
        );
        assert!(out.contains("FUZZING COMPLETE"));
        assert!(out.contains("   Target: parser\n"));
        assert!(out.contains("   Total: 2 / 10\n"));
        assert!(out.contains("   Errors: 1\n"));
        assert!(out.contains("   Success: 1\n"));
        assert!(out.contains("(1.0 tests/sec)"));
        assert!(out.contains("No crashes found!"));
        assert!(out.contains("--seed 42"));
        assert!(!out.contains("Harness failures"));
    }

    #[test]
    fn test_crash_summary_lists_files() {
        let mut r = report(&[Outcome::Crash], false);
        r.crash_files.push(PathBuf::from("./crashes/crash_1_000000.aether"));
        r.interrupted = true;

        let out = format_summary(&r, Path::new("./crashes"));
        assert!(out.contains("FUZZING INTERRUPTED"));
        assert!(out.contains("Found 1 crashes! Check ./crashes/"));
        assert!(out.contains("   ./crashes/crash_1_000000.aether\n"));
    }

    #[test]
    fn test_timeout_summary_follows_policy() {
        let lenient = format_summary(&report(&[Outcome::Timeout], false), Path::new("c"));
        assert!(lenient.contains("No crashes found!"));

        let strict = format_summary(&report(&[Outcome::Timeout], true), Path::new("c"));
        assert!(strict.contains("Found 1 timeouts!"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&report(&[Outcome::Crash, Outcome::Success], false), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 42);
        assert_eq!(value["stats"]["crashes"], 1);
        assert_eq!(value["stats"]["total"], 2);
        assert_eq!(value["elapsed"], "2s");
    }
}
