// Runs the Gatling recorder for a project: resolves the configuration and
// the test classpath, picks a Java runtime, then forks the recorder JVM.

use crate::command_settings::RecorderCommand;

use anyhow::{Context, Result};
use launcher_common::classpath::locate_plugin_artifact;
use launcher_common::constants::{self, variables, RECORDER_MAIN_CLASS};
use launcher_common::toolchain::default_toolchains_file;
use launcher_common::{
    recorder_args, ClasspathBuilder, ExecutionFailed, Fork, ProjectDescriptor,
    RecorderConfiguration, ToolchainManager,
};
use launcher_sdk::{PathUtil, TraceWriter};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One recorder launch.
///
/// Built once per invocation from the parsed command line; everything it
/// reads stays unchanged until the forked recorder exits.
pub struct RecorderLauncher {
    command: RecorderCommand,
    environment: HashMap<String, String>,
    current_exe: Option<PathBuf>,
    current_dir: Option<PathBuf>,
    trace: Arc<dyn TraceWriter>,
}

impl RecorderLauncher {
    /// A launcher reading the process environment.
    pub fn new(command: RecorderCommand, trace: Arc<dyn TraceWriter>) -> Self {
        Self {
            command,
            environment: std::env::vars().collect(),
            current_exe: std::env::current_exe().ok(),
            current_dir: std::env::current_dir().ok(),
            trace,
        }
    }

    /// Replace the environment snapshot used for parameter, `JAVA_HOME`,
    /// launcher jar and toolchains-file lookup.
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_current_exe(mut self, current_exe: Option<PathBuf>) -> Self {
        self.current_exe = current_exe;
        self
    }

    /// Directory relative command-line paths are resolved against.
    pub fn with_current_dir(mut self, current_dir: PathBuf) -> Self {
        self.current_dir = Some(current_dir);
        self
    }

    /// Launch the recorder and wait for it. Any failure is reported as a
    /// single [`ExecutionFailed`] carrying the cause.
    pub async fn execute(&self) -> Result<(), ExecutionFailed> {
        self.run().await.map_err(ExecutionFailed::new)
    }

    async fn run(&self) -> Result<()> {
        let cwd = match &self.current_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine the current directory")?,
        };
        // The recorder runs in basedir, so every path handed to it must be absolute.
        let project = self.command.project_descriptor(&cwd)?;
        let source = self.command.parameter_source(&self.environment);
        for name in source.unknown_properties() {
            self.trace
                .warning(&format!("Ignoring unknown property '{name}'"));
        }

        let config = RecorderConfiguration::resolve(&source, &project)?;
        match serde_json::to_string(&config) {
            Ok(json) => self.trace.verbose(&format!("Recorder configuration: {json}")),
            Err(e) => self.trace.verbose(&format!("<serialization error: {e}>")),
        }

        let test_classpath = self.build_test_classpath(&cwd, &project, &config)?;
        self.trace.info(&test_classpath);

        let recorder_args = recorder_args(&config);
        let java = self.toolchain_manager(&cwd)?.find_java(&self.command.toolchain_requirements())?;

        let fork = Fork::new(
            RECORDER_MAIN_CLASS,
            test_classpath,
            constants::gatling_jvm_args(),
            recorder_args,
            java,
            self.command.output_mode(),
        )
        .with_launch_mode(self.command.launch_mode())
        .with_working_directory(project.basedir.clone());

        fork.run(self.trace.clone()).await
    }

    fn build_test_classpath(
        &self,
        cwd: &Path,
        project: &ProjectDescriptor,
        config: &RecorderConfiguration,
    ) -> Result<String> {
        let plugin_jar = self.command.plugin_jar.as_deref().map(|p| PathUtil::absolute(cwd, p));
        let plugin_artifact = locate_plugin_artifact(
            plugin_jar.as_deref(),
            self.environment.get(variables::PLUGIN_JAR).map(String::as_str),
            self.current_exe.as_deref(),
        )
        .context("Failed to build the test classpath")?;
        let plugin_artifact = PathUtil::absolute(cwd, &plugin_artifact);

        Ok(ClasspathBuilder::from_project(project)
            .with_config_folder(config.config_folder.as_deref())
            .build(&plugin_artifact))
    }

    fn toolchain_manager(&self, cwd: &Path) -> Result<ToolchainManager> {
        let java_home = self.command.java_home.as_deref().map(|p| PathUtil::absolute(cwd, p));
        let mut manager = ToolchainManager::new(self.trace.clone())
            .with_explicit_home(java_home)
            .with_java_home_env(
                self.environment
                    .get(variables::JAVA_HOME)
                    .map(|home| PathUtil::absolute(cwd, Path::new(home))),
            );

        let toolchains = self
            .command
            .toolchains
            .as_deref()
            .map(|p| PathUtil::absolute(cwd, p))
            .or_else(|| default_toolchains_file(&self.environment));
        if let Some(path) = toolchains {
            manager = manager.load_toolchains(&path)?;
        }
        Ok(manager)
    }
}
