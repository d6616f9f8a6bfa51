// launcher-common: Recorder configuration, classpath assembly, toolchain
// lookup and the forked recorder JVM. Depends on `launcher-sdk`.

pub mod classpath;
pub mod configuration;
pub mod constants;
pub mod exceptions;
pub mod fork;
pub mod project;
pub mod recorder_args;
pub mod toolchain;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use classpath::ClasspathBuilder;
pub use configuration::{Parameter, ParameterSource, RecorderConfiguration, ValueOrigin};
pub use exceptions::{ExecutionFailed, LauncherError};
pub use fork::{Fork, LaunchMode};
pub use project::ProjectDescriptor;
pub use recorder_args::recorder_args;
pub use toolchain::{ToolchainManager, ToolchainModel};
