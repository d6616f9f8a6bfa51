/// Presence checks for values that must be supplied by the caller.
/// These panic on failure: a missing value here is a programming error,
/// not a user configuration problem.
pub struct ArgUtil;

impl ArgUtil {
    /// Asserts that the string is not empty.
    pub fn not_null_or_empty(value: &str, name: &str) {
        if value.is_empty() {
            panic!("{name} must not be null or empty");
        }
    }

    /// Asserts that none of the strings in `values` is empty.
    pub fn no_empty_items(values: &[String], name: &str) {
        if let Some(index) = values.iter().position(|v| v.is_empty()) {
            panic!("{name}[{index}] must not be empty");
        }
    }
}
