//! Language tags and the `#version` header they imply.

use std::fmt::Write as _;

use super::error::ShaderError;
use super::stage::ShaderType;

/// Oldest GLSL version, the only one a restricted (ES 2) profile accepts.
const GLSL_ES_VERSION: u32 = 100;
/// Strict desktop fallback for sources written against GLSL 1.00.
const DESKTOP_FALLBACK_VERSION: u32 = 110;
/// Versions above this request the core profile.
const CORE_PROFILE_ABOVE: u32 = 150;

/// A parsed language tag such as `GLSL330`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderLanguage {
    version: Option<u32>,
}

impl ShaderLanguage {
    /// Parse a language tag. Accepts `GLSL` optionally followed by a
    /// numeric version (`GLSL100`, `GLSL330`, ...).
    pub fn parse(tag: &str) -> Result<Self, ShaderError> {
        let Some(digits) = tag.strip_prefix("GLSL") else {
            return Err(ShaderError::UnsupportedLanguage(format!(
                "unrecognized language tag '{tag}'"
            )));
        };
        if digits.is_empty() {
            return Ok(Self { version: None });
        }
        let malformed = || {
            ShaderError::UnsupportedLanguage(format!(
                "malformed version in language tag '{tag}'"
            ))
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let version = digits.parse::<u32>().map_err(|_| malformed())?;
        Ok(Self {
            version: Some(version),
        })
    }

    /// Append the `#version` header (and ES precision qualifier, when
    /// needed) for a stage of type `ty` to `out`.
    ///
    /// With `restricted` set only GLSL 1.00 is accepted; a tag without a
    /// version falls back to 1.00 there. On desktop targets an explicit 1.00
    /// is promoted to 1.10 to get strict checking, and a tag without a
    /// version emits no header at all.
    pub fn write_header(
        self,
        ty: ShaderType,
        restricted: bool,
        out: &mut String,
    ) -> Result<(), ShaderError> {
        let version = match (self.version, restricted) {
            (Some(v), true) if v != GLSL_ES_VERSION => {
                return Err(ShaderError::UnsupportedLanguage(format!(
                    "GLSL{v} cannot run under the restricted profile, \
                     only GLSL{GLSL_ES_VERSION} is supported"
                )));
            }
            (None, false) => return Ok(()),
            (Some(v), _) => v,
            (None, true) => GLSL_ES_VERSION,
        };

        if version > GLSL_ES_VERSION {
            let _ = write!(out, "#version {version}");
            if version > CORE_PROFILE_ABOVE {
                out.push_str(" core");
            }
            out.push('\n');
        } else if restricted {
            let _ = writeln!(out, "#version {GLSL_ES_VERSION}");
            if ty == ShaderType::Fragment {
                out.push_str("precision mediump float;\n");
            }
        } else {
            let _ = writeln!(out, "#version {DESKTOP_FALLBACK_VERSION}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(
        tag: &str,
        ty: ShaderType,
        restricted: bool,
    ) -> Result<String, ShaderError> {
        let mut out = String::new();
        ShaderLanguage::parse(tag)?.write_header(ty, restricted, &mut out)?;
        Ok(out)
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(matches!(
            ShaderLanguage::parse("HLSL50"),
            Err(ShaderError::UnsupportedLanguage(_))
        ));
        assert!(matches!(
            ShaderLanguage::parse("GLSLx"),
            Err(ShaderError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn version_must_be_plain_digits() {
        for tag in ["GLSL+330", "GLSL 330", "GLSL-1"] {
            assert!(
                matches!(
                    ShaderLanguage::parse(tag),
                    Err(ShaderError::UnsupportedLanguage(_))
                ),
                "{tag} should be rejected"
            );
        }
        assert!(ShaderLanguage::parse("GLSL330").is_ok());
    }

    #[test]
    fn core_qualifier_only_above_150() {
        assert_eq!(
            header("GLSL330", ShaderType::Vertex, false).unwrap(),
            "#version 330 core\n"
        );
        assert_eq!(
            header("GLSL150", ShaderType::Vertex, false).unwrap(),
            "#version 150\n"
        );
        assert_eq!(
            header("GLSL120", ShaderType::Vertex, false).unwrap(),
            "#version 120\n"
        );
    }

    #[test]
    fn glsl100_on_desktop_uses_strict_fallback() {
        assert_eq!(
            header("GLSL100", ShaderType::Fragment, false).unwrap(),
            "#version 110\n"
        );
    }

    #[test]
    fn restricted_profile_adds_precision_to_fragment_only() {
        assert_eq!(
            header("GLSL100", ShaderType::Fragment, true).unwrap(),
            "#version 100\nprecision mediump float;\n"
        );
        assert_eq!(
            header("GLSL100", ShaderType::Vertex, true).unwrap(),
            "#version 100\n"
        );
    }

    #[test]
    fn versionless_tag() {
        assert_eq!(header("GLSL", ShaderType::Vertex, false).unwrap(), "");
        assert_eq!(
            header("GLSL", ShaderType::Fragment, true).unwrap(),
            "#version 100\nprecision mediump float;\n"
        );
    }

    #[test]
    fn restricted_profile_rejects_newer_versions() {
        assert!(matches!(
            header("GLSL330", ShaderType::Vertex, true),
            Err(ShaderError::UnsupportedLanguage(_))
        ));
    }
}
