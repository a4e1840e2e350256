//! Common utilities for acceptance tests.
//!
//! Provides helpers for:
//! - Installing scripted fake compilers
//! - Building configurations and running campaigns
//! - Reading crash records back

#![allow(dead_code)]

use fuzz_common::config::FuzzConfig;
use fuzz_gen::TargetSelection;
use fuzz_harness::{Campaign, CampaignOptions, CampaignReport, RECORD_SEPARATOR};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Fake compilers, keyed by name.
///
/// `selective` crashes on any input mentioning `struct` and rejects the
/// rest, so its results depend only on the generated input.
const TARGETS: &[(&str, &str)] = &[
    ("accept", "exit 0"),
    ("reject", "echo 'error: expected expression' >&2\nexit 1"),
    ("crash", "echo 'SIGSEGV in parse_expr' >&2\nexit 1"),
    ("hang", "sleep 10"),
    ("slow", "sleep 0.05\nexit 1"),
    (
        "selective",
        "if grep -q -a struct \"$1\"; then kill -SEGV $$; fi\nexit 1",
    ),
];

/// Path of a fake compiler.
///
/// All scripts are written on first use, before any test spawns a process,
/// so `exec` never races an open write handle.
pub fn target(name: &str) -> PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    let dir = DIR.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("aether-fuzz-acceptance");
        fs::create_dir_all(&dir).unwrap();
        for (name, body) in TARGETS {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    });
    dir.join(name)
}

/// Configuration for `target` writing crash records to `crash_dir`.
pub fn config(target_name: &str, crash_dir: &Path) -> FuzzConfig {
    FuzzConfig {
        compiler: target(target_name),
        crash_dir: crash_dir.to_path_buf(),
        timeout: Duration::from_secs(5),
        ..FuzzConfig::default()
    }
}

/// Options for a seeded run.
pub fn options(iterations: u64, seed: u64, selection: TargetSelection) -> CampaignOptions {
    CampaignOptions {
        iterations,
        selection,
        seed: Some(seed),
        verbose: false,
    }
}

/// Run a campaign to completion.
pub fn run(config: &FuzzConfig, options: CampaignOptions) -> CampaignReport {
    Campaign::new(config, options).run(|| false).unwrap()
}

/// Raw input stored in a crash record.
pub fn record_payload(path: &Path) -> Vec<u8> {
    let body = fs::read(path).unwrap();
    let marker = format!("{RECORD_SEPARATOR}\n");
    let at = body
        .windows(marker.len())
        .position(|w| w == marker.as_bytes())
        .expect("record has a separator");
    body[at + marker.len()..].to_vec()
}

/// Header lines of a crash record.
pub fn record_header(path: &Path) -> String {
    let body = fs::read(path).unwrap();
    let text = String::from_utf8_lossy(&body);
    text.split(RECORD_SEPARATOR).next().unwrap_or_default().to_string()
}
