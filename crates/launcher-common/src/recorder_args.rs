// Translation of a recorder configuration into recorder command-line flags.

use crate::configuration::{parameters, Parameter, RecorderConfiguration};

use launcher_sdk::PathUtil;
use std::fmt::Display;

/// The recorder arguments for `config`, as `-flag value` pairs.
///
/// Order is fixed: output folder, bodies folder, local port, proxy host,
/// proxy port, proxy TLS port, class name, package, encoding, follow-redirect.
/// Absent fields contribute nothing.
pub fn recorder_args(config: &RecorderConfiguration) -> Vec<String> {
    let mut arguments = Vec::new();
    add_if_present(
        &mut arguments,
        config.output_folder.as_deref().map(PathUtil::to_arg),
        &parameters::OUTPUT_FOLDER,
    );
    add_if_present(
        &mut arguments,
        config.bodies_folder.as_deref().map(PathUtil::to_arg),
        &parameters::BODIES_FOLDER,
    );
    add_if_present(&mut arguments, config.local_port, &parameters::LOCAL_PORT);
    add_if_present(&mut arguments, config.proxy_host.as_ref(), &parameters::PROXY_HOST);
    add_if_present(&mut arguments, config.proxy_port, &parameters::PROXY_PORT);
    add_if_present(&mut arguments, config.proxy_ssl_port, &parameters::PROXY_SSL_PORT);
    add_if_present(&mut arguments, config.class_name.as_ref(), &parameters::CLASS_NAME);
    add_if_present(&mut arguments, config.package_name.as_ref(), &parameters::PACKAGE_NAME);
    add_if_present(&mut arguments, config.encoding.as_ref(), &parameters::ENCODING);
    add_if_present(&mut arguments, config.follow_redirect, &parameters::FOLLOW_REDIRECT);
    arguments
}

fn add_if_present<T: Display>(args: &mut Vec<String>, value: Option<T>, parameter: &Parameter) {
    if let Some(value) = value {
        args.push(format!("-{}", parameter.alias));
        args.push(value.to_string());
    }
}
