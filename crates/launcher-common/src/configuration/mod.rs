// Recorder configuration: the named parameters, where their values come
// from, and the typed record built from them.

mod parameter;
mod recorder_config;

pub use parameter::{interpolate, parameters, Parameter, ParameterSource, ValueOrigin};
pub use recorder_config::RecorderConfiguration;
