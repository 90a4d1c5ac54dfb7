use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Limits", inline)]
#[serde(default)]
/// Device limits the shader core must respect.
pub struct LimitsOptions {
    /// Number of `outFragData[i]` outputs bound for GLSL 1.50 fragment
    /// stages.
    #[schemars(title = "Color Attachments", range(min = 1, max = 16))]
    pub max_color_attachments: u32,
}

impl Default for LimitsOptions {
    fn default() -> Self {
        Self {
            max_color_attachments: 4,
        }
    }
}
