use crate::project::ProjectDescriptor;

use launcher_sdk::StringUtil;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A named recorder option.
///
/// `alias` doubles as the recorder's command-line flag (without the dash).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub alias: &'static str,
    pub property: &'static str,
    pub default_value: Option<&'static str>,
}

impl Parameter {
    /// Environment variable consulted when neither the command line nor a
    /// property definition sets this parameter.
    pub fn env_name(&self) -> String {
        StringUtil::property_to_env_name(self.property)
    }
}

pub mod parameters {
    use super::Parameter;

    pub const LOCAL_PORT: Parameter = Parameter {
        name: "localPort",
        alias: "lp",
        property: "gatling.recorder.localPort",
        default_value: None,
    };

    pub const PROXY_HOST: Parameter = Parameter {
        name: "proxyHost",
        alias: "ph",
        property: "gatling.recorder.proxyHost",
        default_value: None,
    };

    pub const PROXY_PORT: Parameter = Parameter {
        name: "proxyPort",
        alias: "pp",
        property: "gatling.recorder.proxyPort",
        default_value: None,
    };

    pub const PROXY_SSL_PORT: Parameter = Parameter {
        name: "proxySSLPort",
        alias: "pps",
        property: "gatling.recorder.proxySslPort",
        default_value: None,
    };

    pub const OUTPUT_FOLDER: Parameter = Parameter {
        name: "outputFolder",
        alias: "of",
        property: "gatling.recorder.outputFolder",
        default_value: Some("${basedir}/src/test/scala"),
    };

    pub const BODIES_FOLDER: Parameter = Parameter {
        name: "bodiesFolder",
        alias: "bdf",
        property: "gatling.recorder.bodiesFolder",
        default_value: Some("${basedir}/src/test/resources/bodies"),
    };

    pub const CLASS_NAME: Parameter = Parameter {
        name: "className",
        alias: "cn",
        property: "gatling.recorder.className",
        default_value: None,
    };

    pub const PACKAGE_NAME: Parameter = Parameter {
        name: "packageName",
        alias: "pkg",
        property: "gatling.recorder.package",
        default_value: Some("${project.groupId}"),
    };

    pub const ENCODING: Parameter = Parameter {
        name: "encoding",
        alias: "enc",
        property: "gatling.recorder.encoding",
        default_value: None,
    };

    pub const FOLLOW_REDIRECT: Parameter = Parameter {
        name: "followRedirect",
        alias: "fr",
        property: "gatling.recorder.followRedirect",
        default_value: None,
    };

    pub const CONFIG_FOLDER: Parameter = Parameter {
        name: "configFolder",
        alias: "cd",
        property: "gatling.configFolder",
        default_value: Some("${basedir}/src/test/resources"),
    };

    pub const ALL: [Parameter; 11] = [
        LOCAL_PORT,
        PROXY_HOST,
        PROXY_PORT,
        PROXY_SSL_PORT,
        OUTPUT_FOLDER,
        BODIES_FOLDER,
        CLASS_NAME,
        PACKAGE_NAME,
        ENCODING,
        FOLLOW_REDIRECT,
        CONFIG_FOLDER,
    ];
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Explicit,
    Property,
    Environment,
    Default,
}

/// Raw parameter values gathered from the command line, `-D` property
/// definitions and the environment.
///
/// Precedence: explicit > property > environment > default. Empty values
/// count as unset.
#[derive(Debug, Clone, Default)]
pub struct ParameterSource {
    explicit: HashMap<&'static str, String>,
    properties: HashMap<String, String>,
    environment: HashMap<String, String>,
}

impl ParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given environment snapshot for the environment fallback.
    pub fn with_environment<I>(mut self, environment: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.environment = environment.into_iter().collect();
        self
    }

    /// Set a value given directly for `parameter` (e.g. a CLI option).
    pub fn set_explicit(&mut self, parameter: &Parameter, value: impl Into<String>) {
        self.explicit.insert(parameter.name, value.into());
    }

    /// Record a `-D name=value` definition. `name` may be a parameter's
    /// property name or its alias.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// The raw value of `parameter` and where it came from, without defaults.
    pub fn lookup(&self, parameter: &Parameter) -> Option<(String, ValueOrigin)> {
        if let Some(v) = self.explicit.get(parameter.name).filter(|v| !v.is_empty()) {
            return Some((v.clone(), ValueOrigin::Explicit));
        }

        let property = self
            .properties
            .get(parameter.property)
            .or_else(|| self.properties.get(parameter.alias))
            .filter(|v| !v.is_empty());
        if let Some(v) = property {
            return Some((v.clone(), ValueOrigin::Property));
        }

        self.environment
            .get(&parameter.env_name())
            .filter(|v| !v.is_empty())
            .map(|v| (v.clone(), ValueOrigin::Environment))
    }

    /// The value of `parameter`, falling back to its interpolated default.
    pub fn resolve(
        &self,
        parameter: &Parameter,
        project: &ProjectDescriptor,
    ) -> Option<(String, ValueOrigin)> {
        self.lookup(parameter).or_else(|| {
            parameter
                .default_value
                .and_then(|template| interpolate(template, project))
                .map(|v| (v, ValueOrigin::Default))
        })
    }

    /// Property names that match no known parameter.
    pub fn unknown_properties(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .properties
            .keys()
            .map(String::as_str)
            .filter(|name| {
                !parameters::ALL
                    .iter()
                    .any(|p| p.property == *name || p.alias == *name)
            })
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"));

/// Expand `${basedir}`, `${project.basedir}` and `${project.groupId}` in
/// `template`. Returns `None` when any placeholder has no value.
pub fn interpolate(template: &str, project: &ProjectDescriptor) -> Option<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0)?;
        let value = match &caps[1] {
            "basedir" | "project.basedir" => project.basedir.to_string_lossy().into_owned(),
            "project.groupId" => project.group_id.clone().filter(|g| !g.is_empty())?,
            _ => return None,
        };
        expanded.push_str(&template[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }

    expanded.push_str(&template[last..]);
    Some(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectDescriptor {
        ProjectDescriptor::new("/work/app").with_group_id("com.example")
    }

    #[test]
    fn aliases_are_recorder_flags() {
        let aliases: Vec<&str> = parameters::ALL.iter().map(|p| p.alias).collect();
        assert_eq!(
            aliases,
            vec!["lp", "ph", "pp", "pps", "of", "bdf", "cn", "pkg", "enc", "fr", "cd"]
        );
    }

    #[test]
    fn explicit_beats_property_beats_environment() {
        let env = vec![("GATLING_RECORDER_LOCALPORT".to_string(), "7000".to_string())];
        let mut source = ParameterSource::new().with_environment(env);
        assert_eq!(
            source.lookup(&parameters::LOCAL_PORT),
            Some(("7000".into(), ValueOrigin::Environment))
        );

        source.define("gatling.recorder.localPort", "8000");
        assert_eq!(
            source.lookup(&parameters::LOCAL_PORT),
            Some(("8000".into(), ValueOrigin::Property))
        );

        source.set_explicit(&parameters::LOCAL_PORT, "9000");
        assert_eq!(
            source.lookup(&parameters::LOCAL_PORT),
            Some(("9000".into(), ValueOrigin::Explicit))
        );
    }

    #[test]
    fn property_may_use_alias() {
        let mut source = ParameterSource::new();
        source.define("ph", "proxy.internal");
        assert_eq!(
            source.lookup(&parameters::PROXY_HOST),
            Some(("proxy.internal".into(), ValueOrigin::Property))
        );
    }

    #[test]
    fn empty_values_are_unset() {
        let mut source = ParameterSource::new()
            .with_environment(vec![("GATLING_RECORDER_ENCODING".to_string(), String::new())]);
        source.set_explicit(&parameters::ENCODING, "");
        assert_eq!(source.lookup(&parameters::ENCODING), None);
    }

    #[test]
    fn defaults_are_interpolated() {
        let source = ParameterSource::new();
        assert_eq!(
            source.resolve(&parameters::OUTPUT_FOLDER, &project()),
            Some(("/work/app/src/test/scala".into(), ValueOrigin::Default))
        );
        assert_eq!(
            source.resolve(&parameters::PACKAGE_NAME, &project()),
            Some(("com.example".into(), ValueOrigin::Default))
        );
        assert_eq!(source.resolve(&parameters::LOCAL_PORT, &project()), None);
    }

    #[test]
    fn unresolvable_default_is_absent() {
        let source = ParameterSource::new();
        let project = ProjectDescriptor::new("/work/app");
        assert_eq!(source.resolve(&parameters::PACKAGE_NAME, &project), None);
    }

    #[test]
    fn interpolate_rejects_unknown_placeholders() {
        assert_eq!(interpolate("${user.home}/x", &project()), None);
        assert_eq!(interpolate("plain", &project()), Some("plain".into()));
        assert_eq!(
            interpolate("${project.groupId}.${project.groupId}", &project()),
            Some("com.example.com.example".into())
        );
    }

    #[test]
    fn unknown_properties_are_reported() {
        let mut source = ParameterSource::new();
        source.define("gatling.recorder.localPort", "8000");
        source.define("gatling.recorder.localport", "8000");
        source.define("cn", "Simulation");
        assert_eq!(source.unknown_properties(), vec!["gatling.recorder.localport"]);
    }
}
