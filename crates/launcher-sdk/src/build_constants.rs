/// Build constants for the launcher package, taken from compile-time
/// environment variables with fallbacks.

/// Source control information.
pub struct Source;

impl Source {
    /// The commit hash from which this binary was built.
    /// Set via the `LAUNCHER_COMMIT_HASH` env var at compile time, or "N/A".
    pub const COMMIT_HASH: &'static str = match option_env!("LAUNCHER_COMMIT_HASH") {
        Some(h) => h,
        None => "N/A",
    };
}

/// Launcher package metadata.
#[derive(Debug, Clone)]
pub struct LauncherPackage;

impl LauncherPackage {
    /// The semantic version of the launcher, from `Cargo.toml`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// File name of the packaged launcher jar that carries `MainWithArgsInFile`.
    /// Set via the `LAUNCHER_PLUGIN_JAR_NAME` env var at compile time.
    pub const PLUGIN_JAR_NAME: &'static str = match option_env!("LAUNCHER_PLUGIN_JAR_NAME") {
        Some(n) => n,
        None => "gatling-recorder-launcher.jar",
    };
}
