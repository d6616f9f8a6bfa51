// Command-line surface of the launcher.

use anyhow::Result;
use clap::Parser;
use launcher_common::configuration::parameters;
use launcher_common::constants::toolchain;
use launcher_common::{LaunchMode, ParameterSource, ProjectDescriptor};
use launcher_sdk::{OutputMode, PathUtil};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Command-line arguments for the recorder launcher.
///
/// Every recorder option can also be given as `-D <property>=<value>` or
/// through an environment variable named after the property
/// (`gatling.recorder.localPort` → `GATLING_RECORDER_LOCALPORT`).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "gatling-recorder",
    version,
    about = "Launch the Gatling recorder for a project"
)]
pub struct RecorderCommand {
    /// Local port used by the recorder proxy for HTTP.
    #[arg(long = "local-port", alias = "lp", value_name = "PORT")]
    pub local_port: Option<String>,

    /// Outgoing proxy host.
    #[arg(long = "proxy-host", alias = "ph", value_name = "HOST")]
    pub proxy_host: Option<String>,

    /// Outgoing proxy port for HTTP.
    #[arg(long = "proxy-port", alias = "pp", value_name = "PORT")]
    pub proxy_port: Option<String>,

    /// Outgoing proxy port for HTTPS.
    #[arg(long = "proxy-ssl-port", alias = "pps", value_name = "PORT")]
    pub proxy_ssl_port: Option<String>,

    /// Folder where generated simulations are stored [default: <basedir>/src/test/scala].
    #[arg(long = "output-folder", alias = "of", value_name = "DIR")]
    pub output_folder: Option<String>,

    /// Folder where request bodies are stored [default: <basedir>/src/test/resources/bodies].
    #[arg(long = "bodies-folder", alias = "bdf", value_name = "DIR")]
    pub bodies_folder: Option<String>,

    /// Name of the generated class.
    #[arg(long = "class-name", alias = "cn", value_name = "NAME")]
    pub class_name: Option<String>,

    /// Package of the generated class [default: the project groupId].
    #[arg(long = "package", alias = "pkg", value_name = "PACKAGE")]
    pub package_name: Option<String>,

    /// Encoding used by the recorder.
    #[arg(long = "encoding", alias = "enc")]
    pub encoding: Option<String>,

    /// Value of the recorder's "Follow Redirects" option.
    #[arg(long = "follow-redirect", alias = "fr", value_name = "true|false")]
    pub follow_redirect: Option<String>,

    /// Configuration directory added to the classpath [default: <basedir>/src/test/resources].
    #[arg(long = "config-folder", alias = "cd", value_name = "DIR")]
    pub config_folder: Option<String>,

    /// Define a property, e.g. `-D gatling.recorder.localPort=8000`.
    #[arg(short = 'D', value_name = "PROPERTY=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    /// JSON project descriptor with basedir, groupId and testClasspathElements.
    #[arg(long, value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Project base directory [default: descriptor basedir, else the current directory].
    #[arg(long, value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Project groupId, used as the default package.
    #[arg(long = "group-id", value_name = "GROUP")]
    pub group_id: Option<String>,

    /// Test classpath entries, separated by the platform path separator.
    #[arg(long = "test-classpath", value_name = "PATHS")]
    pub test_classpath: Option<String>,

    /// Location of the launcher jar [env: GATLING_PLUGIN_JAR].
    #[arg(long = "plugin-jar", value_name = "FILE")]
    pub plugin_jar: Option<PathBuf>,

    /// Java home to run the recorder with, bypassing toolchain lookup.
    #[arg(long = "java-home", value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Toolchains file [default: ~/.m2/toolchains.yaml when present].
    #[arg(long, value_name = "FILE")]
    pub toolchains: Option<PathBuf>,

    /// Required JDK version, matched against the toolchains' `provides.version`.
    #[arg(long = "jdk-version", value_name = "VERSION")]
    pub jdk_version: Option<String>,

    /// Pass recorder arguments on the command line instead of through an arguments file.
    #[arg(long)]
    pub direct: bool,

    /// Log the recorder's output instead of attaching it to this terminal.
    #[arg(long = "capture-output")]
    pub capture_output: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_define(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected PROPERTY=VALUE, got '{value}'")),
    }
}

impl RecorderCommand {
    /// Raw parameter values from this command line, its `-D` definitions and
    /// `environment`.
    pub fn parameter_source(&self, environment: &HashMap<String, String>) -> ParameterSource {
        let mut source = ParameterSource::new().with_environment(environment.clone());

        let explicit = [
            (&parameters::LOCAL_PORT, &self.local_port),
            (&parameters::PROXY_HOST, &self.proxy_host),
            (&parameters::PROXY_PORT, &self.proxy_port),
            (&parameters::PROXY_SSL_PORT, &self.proxy_ssl_port),
            (&parameters::OUTPUT_FOLDER, &self.output_folder),
            (&parameters::BODIES_FOLDER, &self.bodies_folder),
            (&parameters::CLASS_NAME, &self.class_name),
            (&parameters::PACKAGE_NAME, &self.package_name),
            (&parameters::ENCODING, &self.encoding),
            (&parameters::FOLLOW_REDIRECT, &self.follow_redirect),
            (&parameters::CONFIG_FOLDER, &self.config_folder),
        ];
        for (parameter, value) in explicit {
            if let Some(value) = value {
                source.set_explicit(parameter, value.clone());
            }
        }

        for (name, value) in &self.defines {
            source.define(name.clone(), value.clone());
        }
        source
    }

    /// The project to record for: the descriptor file if given, with
    /// `--basedir`, `--group-id` and `--test-classpath` layered on top.
    ///
    /// Relative paths are resolved against `cwd`, so the basedir is always
    /// absolute.
    pub fn project_descriptor(&self, cwd: &Path) -> Result<ProjectDescriptor> {
        let mut project = match &self.project {
            Some(path) => ProjectDescriptor::load(&PathUtil::absolute(cwd, path))?,
            None => ProjectDescriptor::new(cwd),
        };

        if let Some(basedir) = &self.basedir {
            project.basedir = PathUtil::absolute(cwd, basedir);
        }
        if let Some(group_id) = &self.group_id {
            project = project.with_group_id(group_id.clone());
        }
        if let Some(classpath) = &self.test_classpath {
            project = project.with_test_classpath_elements(PathUtil::split_path_list(classpath));
        }
        Ok(project)
    }

    /// Toolchain requirements from `--jdk-version`.
    pub fn toolchain_requirements(&self) -> HashMap<String, String> {
        self.jdk_version
            .iter()
            .map(|v| (toolchain::VERSION_REQUIREMENT.to_string(), v.clone()))
            .collect()
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.capture_output {
            OutputMode::Capture
        } else {
            OutputMode::Inherit
        }
    }

    pub fn launch_mode(&self) -> LaunchMode {
        if self.direct {
            LaunchMode::Direct
        } else {
            LaunchMode::ArgsFile
        }
    }
}
