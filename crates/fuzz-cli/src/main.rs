//! aether-fuzz entry point.
//!
//! Resolves configuration, wires SIGINT/SIGTERM to the campaign's stop
//! predicate, runs the campaign, and turns its report into a summary, an
//! optional JSON file, and the process exit code.

mod report;
mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use fuzz_common::config::FuzzConfig;
use fuzz_gen::TargetSelection;
use fuzz_harness::{Campaign, CampaignOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use crate::report::{format_summary, write_json};
use crate::signals::StopSignal;

/// Environment variable naming a configuration file.
const CONFIG_ENV: &str = "AETHER_FUZZ_CONFIG";

/// Configuration file picked up from the working directory.
const LOCAL_CONFIG: &str = "aether-fuzz.toml";

/// aether-fuzz command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "aether-fuzz",
    about = "Black-box fuzzer for the Aether compiler",
    version,
    long_about = None
)]
struct Args {
    /// Compilation stage to target (lexer, parser, types, codegen, all).
    #[arg(long, short = 't', default_value = "all", value_name = "STAGE")]
    target: TargetSelection,

    /// Number of inputs to try.
    #[arg(long, short = 'n', default_value_t = 1000)]
    iterations: u64,

    /// Random seed; omit for a fresh one (logged for replay).
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Log every iteration.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Path to the compiler under test (overrides config file).
    #[arg(long, value_name = "PATH")]
    compiler: Option<PathBuf>,

    /// Crash corpus directory (overrides config file).
    #[arg(long, value_name = "DIR")]
    crash_dir: Option<PathBuf>,

    /// Per-invocation deadline, e.g. `5s` or `500ms` (overrides config file).
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Exit non-zero when any timeout is recorded.
    #[arg(long)]
    fail_on_timeout: bool,

    /// Path to a fuzzer configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the final report as JSON.
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting aether-fuzz");

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    info!(
        compiler = %config.compiler.display(),
        crash_dir = %config.crash_dir.display(),
        timeout_ms = config.timeout.as_millis(),
        "Configuration loaded"
    );

    let stop = StopSignal::install().context("Failed to set up signal handlers")?;

    let options = CampaignOptions {
        iterations: args.iterations,
        selection: args.target,
        seed: args.seed,
        verbose: args.verbose,
    };
    let report = Campaign::new(&config, options)
        .run(|| stop.requested())
        .context("Fuzzing campaign aborted")?;

    if let Some(kind) = stop.received() {
        info!(signal = %kind, "Campaign stopped by signal");
    }

    print!("{}", format_summary(&report, &config.crash_dir));

    if let Some(path) = &args.report_json {
        write_json(&report, path)?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging with the specified log level.
///
/// Logs go to stderr so the summary on stdout stays clean.
fn init_logging(level: &str) {
    let filter = format!(
        "aether_fuzz={level},fuzz_harness={level},fuzz_gen={level},fuzz_common={level}"
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `AETHER_FUZZ_CONFIG` environment variable
/// 3. `./aether-fuzz.toml`
/// 4. Built-in defaults
fn load_config(explicit: Option<&Path>) -> Result<FuzzConfig> {
    if let Some(config_path) = explicit {
        info!(?config_path, "Loading config from command-line argument");
        return FuzzConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from {CONFIG_ENV}");
            return FuzzConfig::from_file(&config_path)
                .with_context(|| format!("Failed to load config from {CONFIG_ENV}={env_path}"));
        }
        warn!(
            path = %env_path,
            "{CONFIG_ENV} set but file does not exist, checking other locations"
        );
    }

    let local_path = PathBuf::from(LOCAL_CONFIG);
    if local_path.exists() {
        info!(?local_path, "Loading config from working directory");
        return FuzzConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {}", local_path.display()));
    }

    info!("No config file found, using built-in defaults");
    Ok(FuzzConfig::default())
}

/// Command-line flags win over file values.
fn apply_overrides(config: &mut FuzzConfig, args: &Args) {
    if let Some(compiler) = &args.compiler {
        config.compiler.clone_from(compiler);
    }
    if let Some(crash_dir) = &args.crash_dir {
        config.crash_dir.clone_from(crash_dir);
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if args.fail_on_timeout {
        config.fail_on_timeout = true;
    }
}
