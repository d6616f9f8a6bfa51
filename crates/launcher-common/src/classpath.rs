// Classpath assembly for the forked recorder.

use crate::exceptions::LauncherError;
use crate::project::ProjectDescriptor;

use launcher_sdk::{LauncherPackage, PathUtil};
use std::path::{Path, PathBuf};

/// Builds the recorder classpath: project test-scope entries first, then the
/// configuration directory, then the launcher jar.
///
/// The launcher jar can only be added by [`ClasspathBuilder::build`], so it
/// always comes after every project entry and never shadows user classes.
#[derive(Debug, Clone, Default)]
pub struct ClasspathBuilder {
    elements: Vec<String>,
}

impl ClasspathBuilder {
    pub fn new(elements: Vec<String>) -> Self {
        Self { elements }
    }

    /// Start from the project's resolved test classpath.
    pub fn from_project(project: &ProjectDescriptor) -> Self {
        Self::new(project.test_classpath_elements())
    }

    /// Append the configuration directory, if any.
    pub fn with_config_folder(mut self, config_folder: Option<&Path>) -> Self {
        if let Some(folder) = config_folder {
            self.elements.push(PathUtil::to_arg(folder));
        }
        self
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Append the launcher jar and join everything with the platform separator.
    pub fn build(mut self, plugin_artifact: &Path) -> String {
        self.elements.push(PathUtil::to_arg(plugin_artifact));
        PathUtil::join_path_list(&self.elements)
    }
}

/// Find the launcher jar.
///
/// Candidates, in order: `explicit`, `env_value` (`GATLING_PLUGIN_JAR`),
/// `<exe dir>/../lib/<jar>`, `<exe dir>/<jar>`. An explicit or environment
/// location that does not exist is an error rather than a fallthrough.
pub fn locate_plugin_artifact(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    current_exe: Option<&Path>,
) -> Result<PathBuf, LauncherError> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from));

    if let Some(path) = configured {
        return if path.is_file() {
            Ok(path)
        } else {
            Err(LauncherError::PluginArtifactNotFound {
                searched: vec![path],
            })
        };
    }

    let mut searched = Vec::new();
    if let Some(bin_dir) = current_exe.and_then(Path::parent) {
        if let Some(root) = bin_dir.parent() {
            searched.push(root.join("lib").join(LauncherPackage::PLUGIN_JAR_NAME));
        }
        searched.push(bin_dir.join(LauncherPackage::PLUGIN_JAR_NAME));
    }

    match searched.iter().find(|candidate| candidate.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(LauncherError::PluginArtifactNotFound { searched }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_sdk::path_util::PATH_LIST_SEPARATOR;
    use std::fs;

    #[test]
    fn plugin_jar_comes_last() {
        let classpath = ClasspathBuilder::new(vec!["/a/classes".into(), "/a/test-classes".into()])
            .with_config_folder(Some(Path::new("/a/config")))
            .build(Path::new("/lib/plugin.jar"));

        let s = PATH_LIST_SEPARATOR;
        assert_eq!(
            classpath,
            format!("/a/classes{s}/a/test-classes{s}/a/config{s}/lib/plugin.jar")
        );
    }

    #[test]
    fn no_config_folder() {
        let classpath = ClasspathBuilder::new(vec!["/a/classes".into()])
            .with_config_folder(None)
            .build(Path::new("/lib/plugin.jar"));
        assert_eq!(classpath, format!("/a/classes{PATH_LIST_SEPARATOR}/lib/plugin.jar"));
    }

    #[test]
    fn project_entries_precede_plugin_jar() {
        let project = ProjectDescriptor::new("/work/app").with_test_classpath_elements(vec![
            "/m2/a.jar".into(),
            "/m2/b.jar".into(),
            "/m2/c.jar".into(),
        ]);
        let builder = ClasspathBuilder::from_project(&project);
        assert_eq!(builder.elements().len(), 3);

        let classpath = builder.build(Path::new("/lib/plugin.jar"));
        let entries: Vec<&str> = classpath.split(PATH_LIST_SEPARATOR).collect();
        assert_eq!(entries.last(), Some(&"/lib/plugin.jar"));
        assert_eq!(entries[..3], ["/m2/a.jar", "/m2/b.jar", "/m2/c.jar"]);
    }

    #[test]
    fn locate_prefers_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("custom.jar");
        fs::write(&jar, b"").unwrap();

        let found = locate_plugin_artifact(Some(&jar), Some("/elsewhere.jar"), None).unwrap();
        assert_eq!(found, jar);
    }

    #[test]
    fn locate_missing_explicit_is_an_error() {
        let err = locate_plugin_artifact(Some(Path::new("/nonexistent_abc123.jar")), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent_abc123.jar"));
    }

    #[test]
    fn locate_uses_environment() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("env.jar");
        fs::write(&jar, b"").unwrap();

        let found = locate_plugin_artifact(None, jar.to_str(), None).unwrap();
        assert_eq!(found, jar);
    }

    #[test]
    fn locate_next_to_executable() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        let lib = dir.path().join("lib");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&lib).unwrap();
        let jar = lib.join(LauncherPackage::PLUGIN_JAR_NAME);
        fs::write(&jar, b"").unwrap();

        let exe = bin.join("gatling-recorder");
        let found = locate_plugin_artifact(None, None, Some(&exe)).unwrap();
        assert_eq!(found, jar);
    }

    #[test]
    fn locate_reports_every_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("bin").join("gatling-recorder");

        match locate_plugin_artifact(None, Some(""), Some(&exe)).unwrap_err() {
            LauncherError::PluginArtifactNotFound { searched } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
