use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How compiler and linker diagnostics are reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Validation", inline)]
#[serde(default)]
pub struct ValidationOptions {
    /// Log diagnostics of successful compiles and links as warnings.
    #[schemars(title = "Report Warnings")]
    pub report_warnings: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            report_warnings: true,
        }
    }
}
