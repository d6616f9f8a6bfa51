use crate::trace::TraceWriter;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Error type for non-zero process exit codes.
#[derive(Debug, thiserror::Error)]
#[error(
    "Exit code {exit_code} returned from process: file name '{file_name}', arguments '{arguments}'."
)]
pub struct ProcessExitCodeError {
    pub exit_code: i32,
    pub file_name: String,
    pub arguments: String,
}

/// Where the child's standard streams go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The child shares the launcher's stdin, stdout and stderr.
    #[default]
    Inherit,
    /// stdout lines are logged at info level, stderr lines at warning level.
    Capture,
}

/// Spawns one child process and blocks until it exits.
///
/// There is no timeout and no cancellation: the call returns only when the
/// child is gone. Arguments are handed to the OS as a vector, never through
/// a shell, so values with spaces or quotes reach the child unchanged.
pub struct ProcessInvoker {
    trace: Arc<dyn TraceWriter>,
}

impl ProcessInvoker {
    /// Create a new `ProcessInvoker` with the given trace writer.
    pub fn new(trace: Arc<dyn TraceWriter>) -> Self {
        Self { trace }
    }

    /// Execute a process and wait for it to exit.
    ///
    /// # Arguments
    /// * `working_directory` - The working directory for the process, if any.
    /// * `file_name` - The executable to run.
    /// * `arguments` - Command-line arguments, passed verbatim.
    /// * `environment` - Optional environment variable overrides.
    /// * `output` - Whether to inherit or capture the child's output.
    /// * `require_exit_code_zero` - If true, returns an error on non-zero exit.
    ///
    /// Returns the process exit code (`-1` when the child was killed by a signal).
    pub async fn execute(
        &self,
        working_directory: Option<&Path>,
        file_name: &Path,
        arguments: &[String],
        environment: Option<&HashMap<String, String>>,
        output: OutputMode,
        require_exit_code_zero: bool,
    ) -> Result<i32> {
        let display_name = file_name.display().to_string();
        let display_args = arguments.join(" ");

        self.trace.info("Starting process:");
        self.trace.info(&format!("  File name: '{display_name}'"));
        self.trace.verbose(&format!("  Arguments: '{display_args}'"));
        if let Some(dir) = working_directory {
            self.trace
                .info(&format!("  Working directory: '{}'", dir.display()));
        }
        self.trace.verbose(&format!("  Output mode: {output:?}"));
        self.trace.verbose(&format!(
            "  Require exit code zero: '{require_exit_code_zero}'"
        ));

        let mut cmd = Command::new(file_name);
        cmd.args(arguments);

        if let Some(dir) = working_directory.filter(|d| d.is_dir()) {
            cmd.current_dir(dir);
        }

        if let Some(env) = environment {
            cmd.envs(env);
        }

        match output {
            OutputMode::Inherit => {
                cmd.stdin(Stdio::inherit());
                cmd.stdout(Stdio::inherit());
                cmd.stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                cmd.stdin(Stdio::null());
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
            }
        }

        let start = std::time::Instant::now();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to start process '{display_name}'"))?;

        let pid = child.id().unwrap_or(0);
        self.trace.info(&format!(
            "Process started with process id {pid}, waiting for process exit."
        ));

        let stdout_task = child
            .stdout
            .take()
            .map(|s| forward_lines(s, self.trace.clone(), StreamKind::Stdout));
        let stderr_task = child
            .stderr
            .take()
            .map(|s| forward_lines(s, self.trace.clone(), StreamKind::Stderr));

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for process '{display_name}'"))?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            let _ = task.await;
        }

        let exit_code = status.code().unwrap_or(-1);
        let elapsed = start.elapsed();
        self.trace.info(&format!(
            "Finished process {pid} with exit code {exit_code}, and elapsed time {elapsed:.2?}."
        ));

        if exit_code != 0 && require_exit_code_zero {
            return Err(ProcessExitCodeError {
                exit_code,
                file_name: display_name,
                arguments: display_args,
            }
            .into());
        }

        Ok(exit_code)
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

/// Read `stream` line by line on its own task, handing each line to `trace`.
/// Bytes that are not valid UTF-8 are replaced, and reading continues until
/// the stream closes.
fn forward_lines<R>(stream: R, trace: Arc<dyn TraceWriter>, kind: StreamKind) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if buf.ends_with(b"\n") {
                        buf.pop();
                    }
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                    let line = String::from_utf8_lossy(&buf);
                    match kind {
                        StreamKind::Stdout => trace.info(&line),
                        StreamKind::Stderr => trace.warning(&line),
                    }
                }
                Err(e) => {
                    trace.warning(&format!("Failed to read process {kind:?}: {e}"));
                    break;
                }
            }
        }
        trace.verbose(&format!("{kind:?} stream read finished."));
    })
}
