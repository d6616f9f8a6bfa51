// recorder-launcher: collects recorder options, assembles the classpath and
// forks the Gatling recorder JVM.

pub mod command_settings;
pub mod recorder;

pub use command_settings::RecorderCommand;
pub use recorder::RecorderLauncher;
