use anyhow::Result;
use serde::de::DeserializeOwned;

/// String conversion helpers.
pub struct StringUtil;

impl StringUtil {
    /// Deserialize a JSON string into a value of type `T`.
    pub fn convert_from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
        let value = serde_json::from_str(json)?;
        Ok(value)
    }

    /// Convert a string to a boolean.
    ///
    /// Valid true values: `"1"`, `"true"`, `"yes"` (case-insensitive).
    /// Valid false values: `"0"`, `"false"`, `"no"` (case-insensitive).
    /// Returns `None` for unrecognized values.
    pub fn convert_to_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    }

    /// The environment variable name for a dotted property name:
    /// `gatling.recorder.localPort` → `GATLING_RECORDER_LOCALPORT`.
    pub fn property_to_env_name(property: &str) -> String {
        property
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }
}
