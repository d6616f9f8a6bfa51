use std::path::{Path, PathBuf};

/// Locates executables on `PATH`.
pub struct WhichUtil;

impl WhichUtil {
    /// Locate the first occurrence of `command` on the system PATH.
    ///
    /// - If `require` is true and the command is not found, returns an error.
    /// - If `require` is false and the command is not found, returns `Ok(None)`.
    pub fn which(command: &str, require: bool) -> anyhow::Result<Option<PathBuf>> {
        if command.is_empty() {
            if require {
                anyhow::bail!("command must not be empty");
            }
            return Ok(None);
        }

        match which::which(command) {
            Ok(path) => {
                tracing::debug!("Located '{command}' at '{}'", path.display());
                Ok(Some(path))
            }
            Err(e) if require => anyhow::bail!(
                "{command}: command not found ({e}). Make sure '{command}' is installed and its location included in the 'PATH' environment variable."
            ),
            Err(_) => Ok(None),
        }
    }

    /// Whether `path` is an existing file the current user may execute.
    #[cfg(unix)]
    pub fn is_executable(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    pub fn is_executable(path: &Path) -> bool {
        path.is_file()
    }
}
