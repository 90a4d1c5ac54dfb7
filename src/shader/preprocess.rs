//! Final source assembly for a single stage.
//!
//! The text handed to the compiler is built in a fixed order:
//!
//! 1. `#version` header derived from the language tag (see
//!    [`ShaderLanguage::write_header`]),
//! 2. `#define SRGB 1` when color-space linearization is enabled,
//! 3. `#define <TYPE>_SHADER 1`,
//! 4. the stage's own defines text,
//! 5. the stage's own source text, verbatim.

use std::fmt::Write as _;

use super::error::ShaderError;
use super::language::ShaderLanguage;
use super::stage::ShaderStage;

/// Target-dependent switches that affect how sources are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceProfile {
    /// Only GLSL 1.00 is accepted and ES precision qualifiers are emitted.
    pub restricted: bool,
    /// Define `SRGB` so shaders linearize sRGB inputs themselves.
    pub linearize_srgb: bool,
}

/// Build the exact text that will be compiled for `stage`.
pub fn assemble_source(
    stage: &ShaderStage,
    profile: SourceProfile,
) -> Result<String, ShaderError> {
    let language = ShaderLanguage::parse(stage.language())?;

    let capacity = stage.source().len() + stage.defines().len() + 64;
    let mut out = String::with_capacity(capacity);
    language.write_header(stage.ty(), profile.restricted, &mut out)?;
    if profile.linearize_srgb {
        out.push_str("#define SRGB 1\n");
    }
    let _ = writeln!(out, "#define {} 1", stage.ty().define_name());
    out.push_str(stage.defines());
    out.push_str(stage.source());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderType;

    fn stage(
        ty: ShaderType,
        language: &str,
        defines: &str,
        source: &str,
    ) -> ShaderStage {
        let mut stage = ShaderStage::new(ty);
        stage.set_language(language).unwrap();
        stage.set_defines(defines).unwrap();
        stage.set_source(source).unwrap();
        stage
    }

    #[test]
    fn parts_appear_in_fixed_order() {
        let s = stage(
            ShaderType::Fragment,
            "GLSL330",
            "#define HAS_COLOR 1\n",
            "void main() {}\n",
        );
        let text = assemble_source(
            &s,
            SourceProfile {
                restricted: false,
                linearize_srgb: true,
            },
        )
        .unwrap();
        assert_eq!(
            text,
            "#version 330 core\n\
             #define SRGB 1\n\
             #define FRAGMENT_SHADER 1\n\
             #define HAS_COLOR 1\n\
             void main() {}\n"
        );
    }

    #[test]
    fn source_is_kept_verbatim() {
        let source =
            "  // weird   spacing\r\nvoid main(){gl_Position=vec4(0.0);}";
        let s = stage(ShaderType::Vertex, "GLSL110", "", source);
        let text = assemble_source(&s, SourceProfile::default()).unwrap();
        assert!(text.ends_with(source));
        assert!(text.starts_with("#version 110\n#define VERTEX_SHADER 1\n"));
    }

    #[test]
    fn unknown_language_fails() {
        let s = stage(ShaderType::Vertex, "WGSL", "", "fn main() {}");
        assert!(matches!(
            assemble_source(&s, SourceProfile::default()),
            Err(ShaderError::UnsupportedLanguage(_))
        ));
    }
}
