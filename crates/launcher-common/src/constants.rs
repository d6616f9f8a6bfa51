// Fixed names, classes and JVM flags shared by the launcher crates.

/// Entry class of the Gatling recorder.
pub const RECORDER_MAIN_CLASS: &str = "io.gatling.recorder.GatlingRecorder";

/// Entry class shipped in the launcher jar. It reads the real main class's
/// arguments from a file, one per line, then delegates to that main class.
pub const ARGS_FILE_MAIN_CLASS: &str = "io.gatling.mojo.MainWithArgsInFile";

/// JVM flags passed to every forked recorder.
pub const GATLING_JVM_ARGS: &[&str] = &[
    "-server",
    "-Xms512M",
    "-Xmx512M",
    "-XX:+HeapDumpOnOutOfMemoryError",
    "-XX:+OptimizeStringConcat",
    "-Djava.net.preferIPv4Stack=true",
    "-Djava.net.preferIPv6Addresses=false",
];

/// Owned copy of [`GATLING_JVM_ARGS`].
pub fn gatling_jvm_args() -> Vec<String> {
    GATLING_JVM_ARGS.iter().map(|a| a.to_string()).collect()
}

pub mod toolchain {
    /// Toolchain type used to look up the Java runtime.
    pub const JDK: &str = "jdk";
    /// Executable provided by a `jdk` toolchain.
    pub const JAVA: &str = "java";
    /// Requirement key matched against a toolchain's `provides` section.
    pub const VERSION_REQUIREMENT: &str = "version";
    /// Toolchains file looked up under the user's home directory.
    pub const DEFAULT_TOOLCHAINS_FILE: &str = ".m2/toolchains.yaml";
}

pub mod variables {
    pub const JAVA_HOME: &str = "JAVA_HOME";
    /// Overrides the location of the launcher jar.
    pub const PLUGIN_JAR: &str = "GATLING_PLUGIN_JAR";
    pub const HOME: &str = "HOME";
    pub const USER_PROFILE: &str = "USERPROFILE";
}

/// Conventional output directories of a project, relative to its basedir.
pub mod project_layout {
    pub const TEST_CLASSES: &str = "target/test-classes";
    pub const CLASSES: &str = "target/classes";
}

pub mod return_code {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}
