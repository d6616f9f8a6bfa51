use std::path::{Path, PathBuf};

/// Separator between entries of a path list such as a classpath or `PATH`.
#[cfg(target_os = "windows")]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(target_os = "windows"))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Suffix the platform appends to executable file names.
#[cfg(target_os = "windows")]
pub const EXECUTABLE_SUFFIX: &str = ".exe";
#[cfg(not(target_os = "windows"))]
pub const EXECUTABLE_SUFFIX: &str = "";

/// Path list and executable-name helpers.
pub struct PathUtil;

impl PathUtil {
    /// Join `entries` with the platform path-list separator, keeping order.
    /// Empty entries are skipped so that a stray separator never ends up
    /// meaning "current directory".
    pub fn join_path_list<S: AsRef<str>>(entries: &[S]) -> String {
        let mut joined = String::new();
        for entry in entries.iter().map(AsRef::as_ref).filter(|e| !e.is_empty()) {
            if !joined.is_empty() {
                joined.push(PATH_LIST_SEPARATOR);
            }
            joined.push_str(entry);
        }
        joined
    }

    /// Split a platform path list back into its non-empty entries.
    pub fn split_path_list(value: &str) -> Vec<String> {
        value
            .split(PATH_LIST_SEPARATOR)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The on-disk file name of the executable `tool` (`java` → `java.exe` on Windows).
    pub fn executable_name(tool: &str) -> String {
        if EXECUTABLE_SUFFIX.is_empty() || tool.ends_with(EXECUTABLE_SUFFIX) {
            tool.to_string()
        } else {
            format!("{tool}{EXECUTABLE_SUFFIX}")
        }
    }

    /// `<home>/bin/<tool>` with the platform executable suffix.
    pub fn tool_in_home(home: &Path, tool: &str) -> PathBuf {
        home.join("bin").join(Self::executable_name(tool))
    }

    /// `path` resolved against `base` when relative, unchanged otherwise.
    pub fn absolute(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    /// Render a path for use as a process argument.
    pub fn to_arg(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}
