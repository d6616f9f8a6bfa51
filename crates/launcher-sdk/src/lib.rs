// launcher-sdk: Foundation layer for the Gatling recorder launcher.
// This crate has no dependencies on other launcher crates and provides
// tracing, process, path and argument utilities used by the launcher.

pub mod arg_util;
pub mod build_constants;
pub mod path_util;
pub mod process_invoker;
pub mod string_util;
pub mod trace;
pub mod which_util;

// Re-export commonly used items at crate root
pub use arg_util::ArgUtil;
pub use build_constants::{LauncherPackage, Source};
pub use path_util::PathUtil;
pub use process_invoker::{OutputMode, ProcessExitCodeError, ProcessInvoker};
pub use string_util::StringUtil;
pub use trace::TraceWriter;
pub use which_util::WhichUtil;
