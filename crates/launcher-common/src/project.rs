// Project descriptor: the basedir, groupId and resolved test-scope
// classpath of the project the recorder is launched for.

use crate::constants::project_layout;
use crate::exceptions::LauncherError;

use launcher_sdk::StringUtil;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The project the recorder runs against.
///
/// Loaded from a JSON file such as:
///
/// ```json
/// {
///   "basedir": ".",
///   "groupId": "com.example",
///   "testClasspathElements": ["target/test-classes", "target/classes", "/m2/gatling.jar"]
/// }
/// ```
///
/// Relative paths are resolved against the descriptor's directory (for
/// `basedir`) and against `basedir` (for classpath elements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub basedir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(default)]
    pub test_classpath_elements: Vec<String>,
}

impl ProjectDescriptor {
    /// A project rooted at `basedir` with no groupId and no explicit classpath.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
            group_id: None,
            test_classpath_elements: Vec::new(),
        }
    }

    /// Load a descriptor from a JSON file.
    ///
    /// A missing or malformed file is a classpath resolution failure.
    pub fn load(path: &Path) -> Result<Self, LauncherError> {
        let content = fs::read_to_string(path).map_err(|e| LauncherError::ClasspathResolution {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut descriptor: ProjectDescriptor = StringUtil::convert_from_json(&content)
            .map_err(|e| LauncherError::ClasspathResolution {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if descriptor.basedir.is_relative() {
            let parent = path.parent().unwrap_or_else(|| Path::new(""));
            descriptor.basedir = parent.join(&descriptor.basedir);
        }

        tracing::debug!(
            "Loaded project descriptor '{}' (basedir '{}', {} classpath elements)",
            path.display(),
            descriptor.basedir.display(),
            descriptor.test_classpath_elements.len()
        );
        Ok(descriptor)
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_test_classpath_elements(mut self, elements: Vec<String>) -> Self {
        self.test_classpath_elements = elements;
        self
    }

    /// The resolved test-scope classpath, in precedence order.
    ///
    /// When the descriptor lists no elements, the conventional test and main
    /// output directories under `basedir` are used.
    pub fn test_classpath_elements(&self) -> Vec<String> {
        if self.test_classpath_elements.is_empty() {
            return [project_layout::TEST_CLASSES, project_layout::CLASSES]
                .iter()
                .map(|dir| self.resolve(dir))
                .collect();
        }

        self.test_classpath_elements
            .iter()
            .map(|element| self.resolve(element))
            .collect()
    }

    fn resolve(&self, element: &str) -> String {
        let path = Path::new(element);
        if path.is_absolute() {
            element.to_string()
        } else {
            self.basedir.join(path).to_string_lossy().into_owned()
        }
    }
}
