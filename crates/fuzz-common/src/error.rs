use std::path::PathBuf;
use thiserror::Error;

/// Fuzzer error types covering configuration, harness I/O, and corpus writes.
///
/// Target rejections, crashes, and timeouts are not errors; they are
/// [`Outcome`](crate::Outcome) values.
#[derive(Debug, Error)]
pub enum FuzzError {
    /// Configuration or startup error. Aborts the campaign before any iteration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Materializing, invoking, or cleaning up a single attempt failed.
    #[error("harness I/O error while {context} ({}): {source}", path.display())]
    HarnessIo {
        /// What the harness was doing.
        context: &'static str,
        /// Artifact involved in the failure.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A crash record could not be written.
    #[error("failed to write crash record {}: {source}", path.display())]
    Recorder {
        /// Path of the record being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Source state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

impl FuzzError {
    /// Build a [`FuzzError::HarnessIo`] from its parts.
    pub fn harness_io(
        context: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::HarnessIo {
            context,
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error must abort the whole campaign.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidStateTransition { .. })
    }
}

/// Convenience type alias for fuzzer operations.
pub type FuzzResult<T> = Result<T, FuzzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(FuzzError::Configuration("missing".into()).is_fatal());

        let io = FuzzError::harness_io(
            "writing input",
            "/tmp/x.aether",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert!(!io.is_fatal());
    }

    #[test]
    fn test_harness_io_message_names_path() {
        let err = FuzzError::harness_io(
            "removing scratch directory",
            "/tmp/aether-fuzz-abc",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/aether-fuzz-abc"), "{msg}");
        assert!(msg.contains("removing scratch directory"), "{msg}");
    }
}
