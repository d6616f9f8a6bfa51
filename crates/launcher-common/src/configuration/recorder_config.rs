use super::parameter::{parameters, Parameter, ParameterSource, ValueOrigin};
use crate::exceptions::LauncherError;
use crate::project::ProjectDescriptor;

use launcher_sdk::StringUtil;
use serde::Serialize;
use std::path::PathBuf;

/// Options handed to the recorder. Every field is optional: an absent field
/// produces no flag, leaving the recorder to apply its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderConfiguration {
    /// Local port used by the recorder proxy for HTTP.
    pub local_port: Option<u16>,
    /// Outgoing proxy host.
    pub proxy_host: Option<String>,
    /// Outgoing proxy port for HTTP.
    pub proxy_port: Option<u16>,
    /// Outgoing proxy port for HTTPS.
    pub proxy_ssl_port: Option<u16>,
    /// Folder where generated simulations are stored.
    pub output_folder: Option<PathBuf>,
    /// Folder where request bodies are stored.
    pub bodies_folder: Option<PathBuf>,
    /// Name of the generated class.
    pub class_name: Option<String>,
    /// Package of the generated class.
    pub package_name: Option<String>,
    /// Encoding used by the recorder.
    pub encoding: Option<String>,
    /// Value of the recorder's "Follow Redirects" option.
    pub follow_redirect: Option<bool>,
    /// Configuration directory. Only added to the classpath, never passed as a flag.
    pub config_folder: Option<PathBuf>,
}

impl RecorderConfiguration {
    /// Build the configuration from `source`, applying defaults that depend
    /// on `project`. Relative folders are resolved against the project basedir.
    pub fn resolve(
        source: &ParameterSource,
        project: &ProjectDescriptor,
    ) -> Result<Self, LauncherError> {
        let value = |p: &Parameter| -> Option<String> {
            source.resolve(p, project).map(|(v, origin)| {
                if origin != ValueOrigin::Default {
                    tracing::debug!("{} = '{}' ({:?})", p.name, v, origin);
                }
                v
            })
        };

        Ok(Self {
            local_port: parse_port(&parameters::LOCAL_PORT, value(&parameters::LOCAL_PORT))?,
            proxy_host: value(&parameters::PROXY_HOST),
            proxy_port: parse_port(&parameters::PROXY_PORT, value(&parameters::PROXY_PORT))?,
            proxy_ssl_port: parse_port(
                &parameters::PROXY_SSL_PORT,
                value(&parameters::PROXY_SSL_PORT),
            )?,
            output_folder: value(&parameters::OUTPUT_FOLDER).map(|v| project.basedir.join(v)),
            bodies_folder: value(&parameters::BODIES_FOLDER).map(|v| project.basedir.join(v)),
            class_name: value(&parameters::CLASS_NAME),
            package_name: value(&parameters::PACKAGE_NAME),
            encoding: value(&parameters::ENCODING),
            follow_redirect: parse_bool(
                &parameters::FOLLOW_REDIRECT,
                value(&parameters::FOLLOW_REDIRECT),
            )?,
            config_folder: value(&parameters::CONFIG_FOLDER).map(|v| project.basedir.join(v)),
        })
    }

    /// Number of fields that become recorder flags.
    pub fn recorder_option_count(&self) -> usize {
        [
            self.local_port.is_some(),
            self.proxy_host.is_some(),
            self.proxy_port.is_some(),
            self.proxy_ssl_port.is_some(),
            self.output_folder.is_some(),
            self.bodies_folder.is_some(),
            self.class_name.is_some(),
            self.package_name.is_some(),
            self.encoding.is_some(),
            self.follow_redirect.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

fn parse_port(parameter: &Parameter, value: Option<String>) -> Result<Option<u16>, LauncherError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u16>()
                .map_err(|e| LauncherError::InvalidParameter {
                    parameter: parameter.name,
                    value: v.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn parse_bool(parameter: &Parameter, value: Option<String>) -> Result<Option<bool>, LauncherError> {
    value
        .map(|v| {
            StringUtil::convert_to_bool(&v).ok_or_else(|| LauncherError::InvalidParameter {
                parameter: parameter.name,
                value: v.clone(),
                reason: "expected 'true' or 'false'".to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn project() -> ProjectDescriptor {
        ProjectDescriptor::new("/work/app").with_group_id("com.example")
    }

    #[test]
    fn defaults_only() {
        let config = RecorderConfiguration::resolve(&ParameterSource::new(), &project()).unwrap();
        assert_eq!(config.output_folder, Some(PathBuf::from("/work/app/src/test/scala")));
        assert_eq!(
            config.bodies_folder,
            Some(PathBuf::from("/work/app/src/test/resources/bodies"))
        );
        assert_eq!(config.package_name.as_deref(), Some("com.example"));
        assert_eq!(config.config_folder, Some(PathBuf::from("/work/app/src/test/resources")));
        assert_eq!(config.local_port, None);
        assert_eq!(config.follow_redirect, None);
        assert_eq!(config.recorder_option_count(), 3);
    }

    #[test]
    fn typed_values_are_parsed() {
        let mut source = ParameterSource::new();
        source.set_explicit(&parameters::LOCAL_PORT, "8000");
        source.define("gatling.recorder.proxySslPort", " 8443 ");
        source.define("fr", "TRUE");
        source.set_explicit(&parameters::CLASS_NAME, "RecordedSimulation");

        let config = RecorderConfiguration::resolve(&source, &project()).unwrap();
        assert_eq!(config.local_port, Some(8000));
        assert_eq!(config.proxy_ssl_port, Some(8443));
        assert_eq!(config.follow_redirect, Some(true));
        assert_eq!(config.class_name.as_deref(), Some("RecordedSimulation"));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let mut source = ParameterSource::new();
        source.set_explicit(&parameters::PROXY_PORT, "70000");

        let err = RecorderConfiguration::resolve(&source, &project()).unwrap_err();
        match err {
            LauncherError::InvalidParameter { parameter, value, .. } => {
                assert_eq!(parameter, "proxyPort");
                assert_eq!(value, "70000");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_boolean_is_rejected() {
        let mut source = ParameterSource::new();
        source.set_explicit(&parameters::FOLLOW_REDIRECT, "sometimes");

        let err = RecorderConfiguration::resolve(&source, &project()).unwrap_err();
        assert!(err.to_string().contains("followRedirect"));
    }

    #[test]
    fn explicit_value_overrides_default() {
        let mut source = ParameterSource::new();
        source.set_explicit(&parameters::OUTPUT_FOLDER, "/tmp/simulations");

        let config = RecorderConfiguration::resolve(&source, &project()).unwrap();
        assert_eq!(config.output_folder, Some(PathBuf::from("/tmp/simulations")));
    }

    #[test]
    fn relative_folders_resolve_against_basedir() {
        let mut source = ParameterSource::new();
        source.set_explicit(&parameters::OUTPUT_FOLDER, "simulations");
        source.set_explicit(&parameters::CONFIG_FOLDER, "conf");

        let config = RecorderConfiguration::resolve(&source, &project()).unwrap();
        assert_eq!(config.output_folder, Some(Path::new("/work/app").join("simulations")));
        assert_eq!(config.config_folder, Some(Path::new("/work/app").join("conf")));
    }
}
