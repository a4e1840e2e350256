//! Campaign controller.
//!
//! Drives the generate → execute → classify → record loop for a fixed
//! number of iterations and produces a [`CampaignReport`]:
//!
//! ```text
//! IDLE ──start()──▶ RUNNING ──loop ends or stop requested──▶ REPORTING ──▶ DONE
//! ```
//!
//! Only a missing or unusable target aborts the campaign, and it does so
//! before the first iteration. Harness failures cost one iteration each;
//! corpus write failures are logged and the event still counts.

use crate::classifier::Classifier;
use crate::crash_recorder::{CrashRecorder, RecordContext};
use crate::runner::{ExecutionResult, Harness};
use fuzz_common::config::FuzzConfig;
use fuzz_common::error::{FuzzError, FuzzResult};
use fuzz_common::outcome::Outcome;
use fuzz_common::state::CampaignState;
use fuzz_common::stats::CampaignStats;
use fuzz_gen::{GeneratedInput, Generator, TargetSelection};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Per-run options, usually taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignOptions {
    /// Number of inputs to try.
    pub iterations: u64,
    /// Stages to draw strategies from.
    pub selection: TargetSelection,
    /// Fixed seed, or `None` for a fresh one.
    pub seed: Option<u64>,
    /// Log every iteration at info level.
    pub verbose: bool,
}

impl Default for CampaignOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            selection: TargetSelection::All,
            seed: None,
            verbose: false,
        }
    }
}

/// Final summary of a campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    /// Stage selection, e.g. `all` or `parser`.
    pub target: String,
    /// Seed in effect; replaying it reproduces the input sequence.
    pub seed: u64,
    /// Iterations requested.
    pub iterations: u64,
    /// Whether a stop request ended the loop early.
    pub interrupted: bool,
    /// Whether timeouts count as failures.
    pub fail_on_timeout: bool,
    /// Wall-clock time of the loop.
    #[serde(serialize_with = "serialize_elapsed")]
    pub elapsed: Duration,
    /// Outcome counters.
    pub stats: CampaignStats,
    /// Crash records written, in order.
    pub crash_files: Vec<PathBuf>,
}

impl CampaignReport {
    /// Returns true if the run should exit successfully.
    ///
    /// Any crash fails the run. Timeouts fail it only with `fail_on_timeout`.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.stats.crashes == 0 && !(self.fail_on_timeout && self.stats.timeouts > 0)
    }

    /// Attempts per second over the whole loop.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        self.stats.throughput(self.elapsed)
    }
}

fn serialize_elapsed<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let rounded = Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    serializer.collect_str(&humantime::format_duration(rounded))
}

/// Owns every piece of per-campaign state: generator, harness, classifier,
/// recorder, and statistics.
#[derive(Debug)]
pub struct Campaign {
    options: CampaignOptions,
    harness: Harness,
    classifier: Classifier,
    recorder: CrashRecorder,
    generator: Generator,
    progress_interval: u64,
    fail_on_timeout: bool,
    state: CampaignState,
    stats: CampaignStats,
}

impl Campaign {
    /// Build a campaign from configuration and run options.
    pub fn new(config: &FuzzConfig, options: CampaignOptions) -> Self {
        let harness = Harness::new(&config.compiler, config.timeout)
            .with_extension(&config.source_extension);

        Self {
            options,
            harness,
            classifier: Classifier::new(config.fault_markers.iter().cloned()),
            recorder: CrashRecorder::from_config(config),
            generator: Generator::from_seed(options.seed),
            progress_interval: config.progress_interval,
            fail_on_timeout: config.fail_on_timeout,
            state: CampaignState::Idle,
            stats: CampaignStats::new(),
        }
    }

    /// Replace the harness, e.g. to place scratch directories elsewhere.
    #[must_use]
    pub fn with_harness(mut self, harness: Harness) -> Self {
        self.harness = harness;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CampaignState {
        self.state
    }

    /// Statistics so far.
    pub fn stats(&self) -> &CampaignStats {
        &self.stats
    }

    /// Seed in effect.
    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Validate the target and enter RUNNING.
    ///
    /// # Errors
    ///
    /// [`FuzzError::Configuration`] if the target is missing or not a regular
    /// file; the campaign stays IDLE.
    pub fn start(&mut self) -> FuzzResult<()> {
        if !self.state.can_transition_to(CampaignState::Running) {
            return Err(FuzzError::InvalidStateTransition {
                from: self.state.to_string(),
                to: CampaignState::Running.to_string(),
            });
        }

        self.validate_target()?;
        self.state.transition_to(CampaignState::Running)?;

        info!(
            compiler = %self.harness.compiler().display(),
            target = %self.options.selection,
            iterations = self.options.iterations,
            seed = self.generator.seed(),
            timeout_ms = self.harness.timeout().as_millis(),
            "Starting fuzzing campaign"
        );
        Ok(())
    }

    fn validate_target(&self) -> FuzzResult<()> {
        let compiler = self.harness.compiler();
        let metadata = std::fs::metadata(compiler).map_err(|e| {
            FuzzError::Configuration(format!(
                "target compiler not found at {}: {e}",
                compiler.display()
            ))
        })?;

        if !metadata.is_file() {
            return Err(FuzzError::Configuration(format!(
                "target compiler {} is not a regular file",
                compiler.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(FuzzError::Configuration(format!(
                    "target compiler {} is not executable",
                    compiler.display()
                )));
            }
        }

        Ok(())
    }

    /// Run the whole campaign and produce its report.
    ///
    /// Starts the campaign if it is still IDLE. `should_stop` is polled at
    /// every iteration boundary; once it returns true the loop ends and the
    /// report is marked interrupted.
    ///
    /// # Errors
    ///
    /// Only startup failures ([`FuzzError::Configuration`]) and lifecycle
    /// misuse are returned. Per-iteration failures are absorbed.
    pub fn run(&mut self, should_stop: impl Fn() -> bool) -> FuzzResult<CampaignReport> {
        if self.state == CampaignState::Idle {
            self.start()?;
        }
        if self.state != CampaignState::Running {
            return Err(FuzzError::InvalidStateTransition {
                from: self.state.to_string(),
                to: CampaignState::Running.to_string(),
            });
        }

        let started = Instant::now();
        let mut interrupted = false;

        for iteration in 1..=self.options.iterations {
            if should_stop() {
                info!(
                    completed = iteration - 1,
                    requested = self.options.iterations,
                    "Stop requested, ending campaign early"
                );
                interrupted = true;
                break;
            }

            self.step(iteration);

            if self.progress_interval > 0 && iteration % self.progress_interval == 0 {
                info!(
                    done = iteration,
                    total = self.options.iterations,
                    crashes = self.stats.crashes,
                    timeouts = self.stats.timeouts,
                    tests_per_sec = %format!("{:.1}", self.stats.throughput(started.elapsed())),
                    "Progress"
                );
            }
        }

        self.finish(interrupted, started.elapsed())
    }

    fn step(&mut self, iteration: u64) {
        let input = self.generator.next_input(self.options.selection);

        if self.options.verbose {
            info!(
                iteration,
                total = self.options.iterations,
                strategy = %input.strategy(),
                bytes = input.len(),
                "Testing input"
            );
        } else {
            debug!(
                iteration,
                strategy = %input.strategy(),
                bytes = input.len(),
                "Testing input"
            );
        }

        match self.harness.execute(input.as_bytes()) {
            Ok(result) => {
                let outcome = self.classifier.classify(&result);
                self.stats.record(outcome, result.elapsed);
                debug!(
                    iteration,
                    %outcome,
                    exit_status = result.exit_status,
                    elapsed_ms = result.elapsed.as_millis(),
                    "Classified"
                );

                if outcome.is_recorded() {
                    self.record(outcome, &result, &input, iteration);
                }
            }
            Err(e) => {
                self.stats.record_harness_error();
                error!(
                    iteration,
                    strategy = %input.strategy(),
                    error = %e,
                    "Harness failure, input skipped"
                );
            }
        }
    }

    fn record(
        &mut self,
        outcome: Outcome,
        result: &ExecutionResult,
        input: &GeneratedInput,
        iteration: u64,
    ) {
        let context = RecordContext {
            iteration,
            seed: self.generator.seed(),
        };
        let marker = self.classifier.fault_marker(&result.stderr);

        match self.recorder.record(outcome, result, input, context) {
            Ok(path) => {
                let message = match outcome {
                    Outcome::Timeout => "TIMEOUT recorded",
                    _ => "CRASH recorded",
                };
                warn!(
                    iteration,
                    exit_status = result.exit_status,
                    signal = result.signal_name().unwrap_or("-"),
                    marker = marker.unwrap_or("-"),
                    strategy = %input.strategy(),
                    path = %path.display(),
                    "{message}"
                );
            }
            Err(e) => {
                error!(
                    iteration,
                    %outcome,
                    strategy = %input.strategy(),
                    error = %e,
                    "Failed to persist crash record"
                );
            }
        }
    }

    fn finish(&mut self, interrupted: bool, elapsed: Duration) -> FuzzResult<CampaignReport> {
        self.state.transition_to(CampaignState::Reporting)?;
        debug_assert!(self.stats.is_consistent());

        let report = CampaignReport {
            target: self.options.selection.to_string(),
            seed: self.generator.seed(),
            iterations: self.options.iterations,
            interrupted,
            fail_on_timeout: self.fail_on_timeout,
            elapsed,
            stats: self.stats.clone(),
            crash_files: self.recorder.written().to_vec(),
        };

        self.state.transition_to(CampaignState::Done)?;
        info!(
            total = report.stats.total,
            crashes = report.stats.crashes,
            timeouts = report.stats.timeouts,
            harness_errors = report.stats.harness_errors,
            interrupted,
            passed = report.passed(),
            "Campaign complete"
        );
        Ok(report)
    }
}
