use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Target profile switches that shape the assembled shader source.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Profile", inline)]
#[serde(default)]
pub struct ProfileOptions {
    /// Only accept GLSL 1.00 and emit ES precision qualifiers.
    #[schemars(title = "Restricted (GLSL ES 1.00)")]
    pub restricted: bool,
    /// Emit `#define SRGB 1` so shaders linearize sRGB inputs.
    #[schemars(title = "Linearize sRGB")]
    pub linearize_srgb: bool,
}
