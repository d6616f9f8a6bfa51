// Runtime lookup by toolchain type.
//
// Toolchains are declared in a YAML file:
//
//   toolchains:
//     - type: jdk
//       provides:
//         version: 17
//         vendor: temurin
//       configuration:
//         jdkHome: /usr/lib/jvm/temurin-17

use crate::constants::{toolchain as names, variables};
use crate::exceptions::LauncherError;

use launcher_sdk::{PathUtil, TraceWriter, WhichUtil};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One declared toolchain.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainModel {
    #[serde(rename = "type")]
    pub toolchain_type: String,

    #[serde(default)]
    pub provides: HashMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub configuration: ToolchainConfiguration,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainConfiguration {
    pub jdk_home: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ToolchainsFile {
    #[serde(default)]
    toolchains: Vec<ToolchainModel>,
}

impl ToolchainModel {
    /// Whether every requirement equals the matching `provides` entry.
    pub fn matches(&self, requirements: &HashMap<String, String>) -> bool {
        requirements.iter().all(|(key, wanted)| {
            self.provides
                .get(key)
                .and_then(scalar_to_string)
                .is_some_and(|provided| provided == *wanted)
        })
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolves runtime executables.
///
/// Lookup order for `find_tool`: explicit home, matching toolchain,
/// `JAVA_HOME`, `PATH`.
pub struct ToolchainManager {
    trace: Arc<dyn TraceWriter>,
    toolchains: Vec<ToolchainModel>,
    explicit_home: Option<PathBuf>,
    java_home_env: Option<PathBuf>,
    search_path: bool,
}

impl ToolchainManager {
    pub fn new(trace: Arc<dyn TraceWriter>) -> Self {
        Self {
            trace,
            toolchains: Vec::new(),
            explicit_home: None,
            java_home_env: None,
            search_path: true,
        }
    }

    /// Parse toolchains from a YAML file.
    pub fn load_toolchains(mut self, path: &Path) -> Result<Self, LauncherError> {
        let invalid = |reason: String| LauncherError::InvalidToolchains {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let file: ToolchainsFile = if content.trim().is_empty() {
            ToolchainsFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
        };

        self.trace.verbose(&format!(
            "Loaded {} toolchain(s) from '{}'",
            file.toolchains.len(),
            path.display()
        ));
        Ok(self.with_toolchains(file.toolchains))
    }

    /// Add toolchains after those already known; earlier entries win.
    pub fn with_toolchains(mut self, toolchains: Vec<ToolchainModel>) -> Self {
        self.toolchains.extend(toolchains);
        self
    }

    /// A runtime home that takes precedence over every other source.
    pub fn with_explicit_home(mut self, home: Option<PathBuf>) -> Self {
        self.explicit_home = home;
        self
    }

    /// Value of `JAVA_HOME` to fall back to.
    pub fn with_java_home_env(mut self, java_home: Option<PathBuf>) -> Self {
        self.java_home_env = java_home.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Whether to fall back to searching `PATH`.
    pub fn with_path_search(mut self, search_path: bool) -> Self {
        self.search_path = search_path;
        self
    }

    /// The first toolchain of `toolchain_type` matching `requirements`.
    pub fn get_toolchain(
        &self,
        toolchain_type: &str,
        requirements: &HashMap<String, String>,
    ) -> Option<&ToolchainModel> {
        self.toolchains
            .iter()
            .filter(|t| t.toolchain_type == toolchain_type)
            .find(|t| t.matches(requirements))
    }

    /// Resolve the path of `tool` for `toolchain_type`.
    ///
    /// When `requirements` are given, a matching toolchain is mandatory:
    /// `JAVA_HOME` and `PATH` are not consulted.
    pub fn find_tool(
        &self,
        toolchain_type: &str,
        tool: &str,
        requirements: &HashMap<String, String>,
    ) -> Result<PathBuf, LauncherError> {
        let not_found = |reason: String| LauncherError::RuntimeNotFound {
            toolchain: toolchain_type.to_string(),
            reason,
        };

        if let Some(home) = &self.explicit_home {
            return self.tool_in_home(home, tool, "explicit home").map_err(not_found);
        }

        if let Some(toolchain) = self.get_toolchain(toolchain_type, requirements) {
            let home = toolchain
                .configuration
                .jdk_home
                .as_deref()
                .ok_or_else(|| not_found("matching toolchain has no jdkHome".to_string()))?;
            return self.tool_in_home(home, tool, "toolchain").map_err(not_found);
        }

        if !requirements.is_empty() {
            let mut wanted: Vec<String> =
                requirements.iter().map(|(k, v)| format!("{k}={v}")).collect();
            wanted.sort();
            return Err(not_found(format!(
                "no toolchain matches requirements [{}]",
                wanted.join(", ")
            )));
        }

        if let Some(home) = &self.java_home_env {
            return self
                .tool_in_home(home, tool, variables::JAVA_HOME)
                .map_err(not_found);
        }

        if self.search_path {
            if let Ok(Some(path)) = WhichUtil::which(tool, false) {
                self.trace
                    .info(&format!("Using {tool} from PATH: '{}'", path.display()));
                return Ok(path);
            }
        }

        Err(not_found(format!(
            "no toolchain configured, {} is not set and '{tool}' is not on PATH",
            variables::JAVA_HOME
        )))
    }

    /// Shortcut for the Java executable of the `jdk` toolchain.
    pub fn find_java(&self, requirements: &HashMap<String, String>) -> Result<PathBuf, LauncherError> {
        self.find_tool(names::JDK, names::JAVA, requirements)
    }

    fn tool_in_home(&self, home: &Path, tool: &str, origin: &str) -> Result<PathBuf, String> {
        let candidate = PathUtil::tool_in_home(home, tool);
        if WhichUtil::is_executable(&candidate) {
            self.trace.info(&format!(
                "Using {tool} from {origin}: '{}'",
                candidate.display()
            ));
            Ok(candidate)
        } else {
            Err(format!(
                "'{}' ({origin}) does not exist or is not executable",
                candidate.display()
            ))
        }
    }
}

/// `~/.m2/toolchains.yaml` when it exists.
pub fn default_toolchains_file(environment: &HashMap<String, String>) -> Option<PathBuf> {
    environment
        .get(variables::HOME)
        .or_else(|| environment.get(variables::USER_PROFILE))
        .filter(|home| !home.is_empty())
        .map(|home| Path::new(home).join(names::DEFAULT_TOOLCHAINS_FILE))
        .filter(|path| path.is_file())
}
