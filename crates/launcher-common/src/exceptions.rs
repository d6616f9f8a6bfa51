// Error types for the launcher.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Typed failures raised while preparing or running the recorder.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// A configuration value could not be converted to its field type.
    #[error("Invalid value '{value}' for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: String,
    },

    /// The project's test classpath could not be determined.
    #[error("Failed to resolve the test classpath from '{}': {reason}", .path.display())]
    ClasspathResolution { path: PathBuf, reason: String },

    /// The launcher's own jar was not found at any candidate location.
    #[error("Could not locate the launcher jar, looked in: {}", display_paths(.searched))]
    PluginArtifactNotFound { searched: Vec<PathBuf> },

    /// No runtime executable could be resolved for the toolchain.
    #[error("Runtime not found for toolchain '{toolchain}': {reason}")]
    RuntimeNotFound { toolchain: String, reason: String },

    /// A toolchains file exists but could not be read.
    #[error("Failed to read toolchains from '{}': {reason}", .path.display())]
    InvalidToolchains { path: PathBuf, reason: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The single failure surfaced to the caller. Whatever went wrong is kept
/// as the error source.
#[derive(Debug)]
pub struct ExecutionFailed {
    cause: anyhow::Error,
}

impl ExecutionFailed {
    pub fn new(cause: anyhow::Error) -> Self {
        Self { cause }
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.cause
    }
}

impl fmt::Display for ExecutionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Recorder execution failed")
    }
}

impl Error for ExecutionFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}
