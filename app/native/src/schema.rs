//! JSON Schema output for the configuration file.

use schemars::schema_for;

use crate::config::Click2HideConfig;

/// Returns the configuration JSON Schema as pretty-printed JSON.
#[must_use]
pub fn print_schema() -> String {
    let schema = schema_for!(Click2HideConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}
