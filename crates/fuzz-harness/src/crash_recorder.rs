//! Durable crash corpus.
//!
//! Every Crash or Timeout becomes one plain-text file: a `//` comment header
//! with the diagnostics needed to triage and regenerate the case, a `// ---`
//! separator, then the offending input byte for byte. Files are written
//! once and never touched again.
//!
//! Filenames are `<tag>_<unix-seconds>_<sequence>.<ext>`. The sequence is a
//! per-recorder counter and the file is opened with `create_new`, so two
//! records written within the same second (or a leftover from an earlier
//! run) never overwrite each other.

use crate::runner::ExecutionResult;
use fuzz_common::config::FuzzConfig;
use fuzz_common::error::{FuzzError, FuzzResult};
use fuzz_common::outcome::Outcome;
use fuzz_gen::GeneratedInput;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Separator between the record header and the raw input.
pub const RECORD_SEPARATOR: &str = "// ---";

/// Give up after this many consecutive name collisions.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Where in the campaign a record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext {
    /// 1-based iteration number.
    pub iteration: u64,
    /// Campaign seed.
    pub seed: u64,
}

/// Writes crash records into a corpus directory.
#[derive(Debug)]
pub struct CrashRecorder {
    dir: PathBuf,
    extension: String,
    stderr_excerpt_len: usize,
    sequence: u64,
    dir_ready: bool,
    written: Vec<PathBuf>,
}

impl CrashRecorder {
    /// Create a recorder. The directory is not touched until the first write.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, stderr_excerpt_len: usize) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            stderr_excerpt_len,
            sequence: 0,
            dir_ready: false,
            written: Vec::new(),
        }
    }

    /// Create a recorder from the corpus settings in `config`.
    pub fn from_config(config: &FuzzConfig) -> Self {
        Self::new(
            &config.crash_dir,
            &config.source_extension,
            config.stderr_excerpt_len,
        )
    }

    /// Corpus directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Records written by this recorder, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Persist one Crash or Timeout.
    pub fn record(
        &mut self,
        outcome: Outcome,
        result: &ExecutionResult,
        input: &GeneratedInput,
        context: RecordContext,
    ) -> FuzzResult<PathBuf> {
        self.record_at(outcome, result, input, context, SystemTime::now())
    }

    pub(crate) fn record_at(
        &mut self,
        outcome: Outcome,
        result: &ExecutionResult,
        input: &GeneratedInput,
        context: RecordContext,
        created: SystemTime,
    ) -> FuzzResult<PathBuf> {
        if !self.dir_ready {
            fs::create_dir_all(&self.dir).map_err(|source| FuzzError::Recorder {
                path: self.dir.clone(),
                source,
            })?;
            self.dir_ready = true;
            debug!(dir = %self.dir.display(), "Crash directory ready");
        }

        let body = render_record(outcome, result, input, context, created, self.stderr_excerpt_len);
        let secs = created
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let mut attempts = 0;
        loop {
            let path = self.dir.join(format!(
                "{}_{}_{:06}.{}",
                outcome.file_tag(),
                secs,
                self.sequence,
                self.extension
            ));
            self.sequence += 1;
            attempts += 1;

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&body)
                        .and_then(|()| file.sync_all())
                        .map_err(|source| FuzzError::Recorder {
                            path: path.clone(),
                            source,
                        })?;
                    self.written.push(path.clone());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    trace!(path = %path.display(), "Record name taken, bumping sequence");
                }
                Err(source) => return Err(FuzzError::Recorder { path, source }),
            }
        }
    }
}

/// Render a complete record: header, separator, raw input.
pub fn render_record(
    outcome: Outcome,
    result: &ExecutionResult,
    input: &GeneratedInput,
    context: RecordContext,
    created: SystemTime,
    stderr_excerpt_len: usize,
) -> Vec<u8> {
    let mut header = String::new();
    let _ = writeln!(header, "// Crash type: {}", outcome.file_tag());
    match result.signal_name() {
        Some(name) => {
            let _ = writeln!(header, "// Exit status: {} ({name})", result.exit_status);
        }
        None => {
            let _ = writeln!(header, "// Exit status: {}", result.exit_status);
        }
    }
    let _ = writeln!(header, "// Strategy: {}", input.strategy());
    let _ = writeln!(header, "// Iteration: {}", context.iteration);
    let _ = writeln!(header, "// Seed: {}", context.seed);
    let _ = writeln!(
        header,
        "// Created: {}",
        humantime::format_rfc3339_seconds(created)
    );

    let excerpt = stderr_excerpt(&result.stderr, stderr_excerpt_len);
    let mut lines = excerpt.trim_end().lines();
    match lines.next() {
        Some(first) => {
            let _ = writeln!(header, "// Stderr: {first}");
            for line in lines {
                let _ = writeln!(header, "//   {line}");
            }
        }
        None => {
            let _ = writeln!(header, "// Stderr: (empty)");
        }
    }
    let _ = writeln!(header, "{RECORD_SEPARATOR}");

    let mut body = header.into_bytes();
    body.extend_from_slice(input.as_bytes());
    body
}

/// At most `max_chars` characters of `stderr`, cut on a char boundary.
pub fn stderr_excerpt(stderr: &str, max_chars: usize) -> &str {
    match stderr.char_indices().nth(max_chars) {
        Some((idx, _)) => &stderr[..idx],
        None => stderr,
    }
}
