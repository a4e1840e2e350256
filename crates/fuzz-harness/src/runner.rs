//! Deadline-bounded invocation of the target compiler.
//!
//! Each attempt gets its own scratch directory holding the materialized
//! input and the target's output path. The target is spawned with stdin
//! closed and both output pipes drained on helper threads, so a chatty
//! target cannot wedge on a full pipe while we wait on it.
//!
//! On Unix the target runs in its own process group. An operator's Ctrl-C
//! therefore only reaches the fuzzer, and a deadline expiry can kill the
//! target together with anything it spawned.

use fuzz_common::error::{FuzzError, FuzzResult};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};
use wait_timeout::ChildExt;

/// Prefix of every per-attempt scratch directory.
pub const SCRATCH_PREFIX: &str = "aether-fuzz-";

/// How long to wait for pipe readers after the target has been reaped.
///
/// A grandchild that escaped the process group can hold a pipe open
/// forever; whatever was read by then is kept.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Captured result of one target invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, or `-N` when the target was terminated by signal `N`.
    pub exit_status: i32,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
    /// Wall-clock time from spawn to reap.
    pub elapsed: Duration,
    /// Whether the deadline expired and the target was killed.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Signal number that terminated the target, if any.
    #[must_use]
    pub fn signal(&self) -> Option<i32> {
        (self.exit_status < 0).then(|| self.exit_status.saturating_neg())
    }

    /// Conventional name of the terminating signal, e.g. `SIGSEGV`.
    #[must_use]
    pub fn signal_name(&self) -> Option<&'static str> {
        self.signal().and_then(signal_name)
    }
}

#[cfg(unix)]
fn signal_name(signo: i32) -> Option<&'static str> {
    nix::sys::signal::Signal::try_from(signo)
        .ok()
        .map(nix::sys::signal::Signal::as_str)
}

#[cfg(not(unix))]
fn signal_name(_signo: i32) -> Option<&'static str> {
    None
}

/// Runs the target compiler against one input at a time.
#[derive(Debug, Clone)]
pub struct Harness {
    compiler: PathBuf,
    timeout: Duration,
    extension: String,
    scratch_root: Option<PathBuf>,
}

impl Harness {
    /// Create a harness for `compiler` with a hard per-invocation deadline.
    pub fn new(compiler: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            compiler: compiler.into(),
            timeout,
            extension: "aether".to_string(),
            scratch_root: None,
        }
    }

    /// Use `extension` for materialized input files.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Path of the target compiler.
    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    /// Per-invocation deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Materialize `input`, run the target on it, and clean up.
    ///
    /// Target rejections, crashes, and timeouts are reported through the
    /// returned [`ExecutionResult`]. An `Err` means the harness itself
    /// failed and no outcome exists for this input.
    pub fn execute(&self, input: &[u8]) -> FuzzResult<ExecutionResult> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix(SCRATCH_PREFIX);
            builder
        };
        let scratch = match &self.scratch_root {
            Some(root) => builder
                .tempdir_in(root)
                .map_err(|e| FuzzError::harness_io("creating scratch directory", root, e))?,
            None => builder.tempdir().map_err(|e| {
                FuzzError::harness_io("creating scratch directory", std::env::temp_dir(), e)
            })?,
        };

        let input_path = scratch.path().join(format!("input.{}", self.extension));
        let output_path = scratch.path().join("out");

        let result = fs::write(&input_path, input)
            .map_err(|e| FuzzError::harness_io("writing input", &input_path, e))
            .and_then(|()| self.invoke(&input_path, &output_path));

        let scratch_path = scratch.path().to_path_buf();
        settle(result, scratch.close(), &scratch_path)
    }

    fn invoke(&self, input_path: &Path, output_path: &Path) -> FuzzResult<ExecutionResult> {
        let mut command = Command::new(&self.compiler);
        command
            .arg(input_path)
            .arg("-o")
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let start = Instant::now();
        let mut child = command
            .spawn()
            .map_err(|e| FuzzError::harness_io("spawning target", &self.compiler, e))?;
        trace!(pid = child.id(), "Target spawned");

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let (status, timed_out) = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => (status, false),
            Ok(None) => {
                debug!(
                    pid = child.id(),
                    timeout_ms = self.timeout.as_millis(),
                    "Deadline expired, killing target"
                );
                terminate(&mut child);
                let status = child
                    .wait()
                    .map_err(|e| FuzzError::harness_io("reaping target", &self.compiler, e))?;
                (status, true)
            }
            Err(e) => {
                terminate(&mut child);
                let _ = child.wait();
                return Err(FuzzError::harness_io("waiting on target", &self.compiler, e));
            }
        };
        let elapsed = start.elapsed();

        let drain_deadline = Instant::now() + PIPE_DRAIN_GRACE;
        Ok(ExecutionResult {
            exit_status: encode_status(status),
            stdout: collect(&stdout, drain_deadline),
            stderr: collect(&stderr, drain_deadline),
            elapsed,
            timed_out,
        })
    }
}

/// Read `pipe` to completion on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        let spawned = thread::Builder::new()
            .name("target-pipe".into())
            .spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        if let Err(e) = spawned {
            warn!(error = %e, "Failed to spawn pipe reader, output discarded");
        }
    }
    rx
}

/// Take what a pipe reader produced by `deadline`.
///
/// Both pipes share one deadline so the grace period is paid at most once.
fn collect(rx: &mpsc::Receiver<Vec<u8>>, deadline: Instant) -> String {
    let remaining = deadline.saturating_duration_since(Instant::now());
    let bytes = rx.recv_timeout(remaining).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Combine an attempt's result with the scratch cleanup.
///
/// A cleanup failure never discards a result the target produced.
fn settle(
    result: FuzzResult<ExecutionResult>,
    cleanup: std::io::Result<()>,
    scratch: &Path,
) -> FuzzResult<ExecutionResult> {
    if let Err(e) = cleanup {
        warn!(
            path = %scratch.display(),
            error = %e,
            "Failed to remove scratch directory"
        );
    }
    result
}

/// Kill the target and its process group.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id()) {
            match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
                Ok(()) => return,
                Err(e) => debug!(pid, error = %e, "killpg failed, falling back to kill"),
            }
        }
    }

    if let Err(e) = child.kill() {
        warn!(pid = child.id(), error = %e, "Failed to kill target");
    }
}

fn encode_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            return -signo;
        }
    }
    -1
}
