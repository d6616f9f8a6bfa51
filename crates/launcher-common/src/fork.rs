// Forks the recorder JVM and waits for it.

use crate::constants::ARGS_FILE_MAIN_CLASS;

use anyhow::{Context, Result};
use launcher_sdk::{ArgUtil, OutputMode, PathUtil, ProcessInvoker, TraceWriter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// How the main class receives its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    /// Arguments are written to a temporary file, one per line, and the JVM
    /// runs `MainWithArgsInFile <main class> <file>`. Keeps the command line
    /// short regardless of how many arguments there are.
    #[default]
    ArgsFile,
    /// The JVM runs `<main class> <args...>` directly.
    Direct,
}

/// A single forked JVM run.
#[derive(Debug, Clone)]
pub struct Fork {
    main_class: String,
    classpath: String,
    jvm_args: Vec<String>,
    args: Vec<String>,
    java_executable: PathBuf,
    output: OutputMode,
    launch_mode: LaunchMode,
    working_directory: Option<PathBuf>,
}

impl Fork {
    pub fn new(
        main_class: impl Into<String>,
        classpath: impl Into<String>,
        jvm_args: Vec<String>,
        args: Vec<String>,
        java_executable: PathBuf,
        output: OutputMode,
    ) -> Self {
        let main_class = main_class.into();
        let classpath = classpath.into();
        ArgUtil::not_null_or_empty(&main_class, "main_class");
        ArgUtil::not_null_or_empty(&classpath, "classpath");
        ArgUtil::no_empty_items(&jvm_args, "jvm_args");

        Self {
            main_class,
            classpath,
            jvm_args,
            args,
            java_executable,
            output,
            launch_mode: LaunchMode::default(),
            working_directory: None,
        }
    }

    pub fn with_launch_mode(mut self, launch_mode: LaunchMode) -> Self {
        self.launch_mode = launch_mode;
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// The JVM command line (without the executable itself).
    ///
    /// `args_file` is only used in [`LaunchMode::ArgsFile`].
    pub fn command_line(&self, args_file: Option<&Path>) -> Vec<String> {
        let mut command = self.jvm_args.clone();
        command.push("-cp".to_string());
        command.push(self.classpath.clone());

        match (self.launch_mode, args_file) {
            (LaunchMode::ArgsFile, Some(file)) => {
                command.push(ARGS_FILE_MAIN_CLASS.to_string());
                command.push(self.main_class.clone());
                command.push(PathUtil::to_arg(file));
            }
            _ => {
                command.push(self.main_class.clone());
                command.extend(self.args.iter().cloned());
            }
        }
        command
    }

    /// Start the JVM and block until it exits. A launch failure or non-zero
    /// exit code is an error.
    pub async fn run(&self, trace: Arc<dyn TraceWriter>) -> Result<()> {
        let args_file = match self.launch_mode {
            LaunchMode::ArgsFile => Some(self.write_args_file()?),
            LaunchMode::Direct => None,
        };

        let command = self.command_line(args_file.as_ref().map(NamedTempFile::path));
        trace.verbose(&format!("Recorder arguments: {:?}", self.args));

        let result = ProcessInvoker::new(trace.clone())
            .execute(
                self.working_directory.as_deref(),
                &self.java_executable,
                &command,
                None,
                self.output,
                true,
            )
            .await;

        if let Some(file) = args_file {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                trace.warning(&format!(
                    "Failed to remove arguments file '{}': {e}",
                    path.display()
                ));
            }
        }

        result.with_context(|| format!("Forked JVM running '{}' failed", self.main_class))?;
        Ok(())
    }

    fn write_args_file(&self) -> Result<NamedTempFile> {
        if let Some(arg) = self.args.iter().find(|a| a.contains(&['\n', '\r'][..])) {
            anyhow::bail!("Argument {arg:?} contains a line break and cannot be written to an arguments file");
        }

        let mut file = tempfile::Builder::new()
            .prefix("gatling-recorder-")
            .suffix(".args")
            .tempfile()
            .context("Failed to create the arguments file")?;
        for arg in &self.args {
            writeln!(file, "{arg}").context("Failed to write the arguments file")?;
        }
        file.flush().context("Failed to write the arguments file")?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_sdk::trace::{CollectingTraceWriter, NullTraceWriter, TraceLevel};
    use launcher_sdk::ProcessExitCodeError;

    fn fork(args: &[&str]) -> Fork {
        Fork::new(
            "io.gatling.recorder.GatlingRecorder",
            "/a/classes:/lib/plugin.jar",
            vec!["-Xmx512M".to_string()],
            args.iter().map(|a| a.to_string()).collect(),
            PathBuf::from("java"),
            OutputMode::Capture,
        )
    }

    #[test]
    fn direct_command_line() {
        let command = fork(&["-lp", "8000"])
            .with_launch_mode(LaunchMode::Direct)
            .command_line(None);
        assert_eq!(
            command,
            vec![
                "-Xmx512M",
                "-cp",
                "/a/classes:/lib/plugin.jar",
                "io.gatling.recorder.GatlingRecorder",
                "-lp",
                "8000",
            ]
        );
    }

    #[test]
    fn args_file_command_line() {
        let command = fork(&["-lp", "8000"]).command_line(Some(Path::new("/tmp/x.args")));
        assert_eq!(
            command,
            vec![
                "-Xmx512M",
                "-cp",
                "/a/classes:/lib/plugin.jar",
                ARGS_FILE_MAIN_CLASS,
                "io.gatling.recorder.GatlingRecorder",
                "/tmp/x.args",
            ]
        );
    }

    #[test]
    #[should_panic(expected = "main_class must not be null or empty")]
    fn empty_main_class_panics() {
        Fork::new("", "/cp", Vec::new(), Vec::new(), PathBuf::from("java"), OutputMode::Inherit);
    }

    #[test]
    fn args_file_rejects_line_breaks() {
        let err = fork(&["-cn", "Bad\nName"]).write_args_file().unwrap_err();
        assert!(err.to_string().contains("line break"));
    }

    #[test]
    fn args_file_has_one_argument_per_line() {
        let file = fork(&["-of", "/work/my simulations", "-fr", "true"])
            .write_args_file()
            .unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "-of\n/work/my simulations\n-fr\ntrue\n");
    }

    #[cfg(unix)]
    fn fake_java(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("java");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_passes_args_file_to_child() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(
            dir.path(),
            r#"eval last=\${$#}
echo "main:$4"
while IFS= read -r line; do echo "file:$line"; done < "$last""#,
        );

        let mut fork = fork(&["-lp", "8000", "-cn", "Recorded Simulation"]);
        fork.java_executable = java;
        let trace = Arc::new(CollectingTraceWriter::new());
        fork.run(trace.clone()).await.unwrap();

        let info = trace.messages_at(TraceLevel::Info);
        let child_lines: Vec<&str> = info
            .iter()
            .map(String::as_str)
            .filter(|l| l.starts_with("main:") || l.starts_with("file:"))
            .collect();
        assert_eq!(
            child_lines,
            vec![
                "main:io.gatling.mojo.MainWithArgsInFile",
                "file:-lp",
                "file:8000",
                "file:-cn",
                "file:Recorded Simulation",
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_direct_passes_arguments_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(dir.path(), r#"for a in "$@"; do echo "arg:$a"; done"#);

        let mut fork = fork(&["-of", "/work/my simulations"]).with_launch_mode(LaunchMode::Direct);
        fork.java_executable = java;
        let trace = Arc::new(CollectingTraceWriter::new());
        fork.run(trace.clone()).await.unwrap();

        assert!(trace.contains("arg:/work/my simulations"));
        assert!(trace.contains("arg:io.gatling.recorder.GatlingRecorder"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(dir.path(), "exit 7");

        let mut fork = fork(&[]);
        fork.java_executable = java;
        let err = fork.run(Arc::new(NullTraceWriter)).await.unwrap_err();

        let exit = err.downcast_ref::<ProcessExitCodeError>().unwrap();
        assert_eq!(exit.exit_code, 7);
        assert!(format!("{err:#}").contains("Forked JVM running 'io.gatling.recorder.GatlingRecorder' failed"));
    }

    #[tokio::test]
    async fn missing_executable_is_a_failure() {
        let mut fork = fork(&[]);
        fork.java_executable = PathBuf::from("/nonexistent_dir_abc123/bin/java");
        let err = fork.run(Arc::new(NullTraceWriter)).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to start process"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn args_file_is_removed_after_exit() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(dir.path(), r#"eval last=\${$#}
echo "args-file:$last""#);

        let mut fork = fork(&["-lp", "8000"]);
        fork.java_executable = java;
        let trace = Arc::new(CollectingTraceWriter::new());
        fork.run(trace.clone()).await.unwrap();

        let path = trace
            .messages_at(TraceLevel::Info)
            .iter()
            .find_map(|m| m.strip_prefix("args-file:").map(PathBuf::from))
            .unwrap();
        assert!(path.to_string_lossy().ends_with(".args"));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn args_file_is_removed_after_failed_run() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(dir.path(), r#"eval last=\${$#}
echo "args-file:$last"
exit 3"#);

        let mut fork = fork(&[]);
        fork.java_executable = java;
        let trace = Arc::new(CollectingTraceWriter::new());
        fork.run(trace.clone()).await.unwrap_err();

        let path = trace
            .messages_at(TraceLevel::Info)
            .iter()
            .find_map(|m| m.strip_prefix("args-file:").map(PathBuf::from))
            .unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn inherited_output_still_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let java = fake_java(dir.path(), "exit 4");

        let mut fork = Fork::new(
            "io.gatling.recorder.GatlingRecorder",
            "/a/classes",
            Vec::new(),
            Vec::new(),
            java,
            OutputMode::Inherit,
        );
        let err = fork.run(Arc::new(NullTraceWriter)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ProcessExitCodeError>().unwrap().exit_code, 4);

        fork.java_executable = fake_java(dir.path(), "exit 0");
        fork.run(Arc::new(NullTraceWriter)).await.unwrap();
    }
}
