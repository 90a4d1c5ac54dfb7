//! TOML program manifests.
//!
//! A manifest names a program and lists its stages:
//!
//! ```toml
//! name = "Unshaded"
//!
//! [[stage]]
//! path = "Unshaded.vert"          # type inferred from the extension
//! language = "GLSL330"
//!
//! [[stage]]
//! type = "fragment"
//! name = "Common/Unshaded.frag"
//! source = "void main() { gl_FragColor = m_Color; }"
//! language = "GLSL330"
//! defines = { HAS_COLOR = "1" }
//! ```
//!
//! `path` is resolved relative to the manifest file. Once loaded, a path
//! stage is inline: its type, name, and source are filled in and `path` is
//! cleared, so the manifest serializes back to self-contained TOML. Defines
//! are rendered as `#define KEY VALUE` lines in key order.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TesseraError;
use crate::shader::{ShaderProgram, ShaderType};

/// One `[[stage]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageManifest {
    /// Stage type. Inferred from the `path` extension when omitted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<ShaderType>,
    /// Debug name. Defaults to `path` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Inline source text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Source file, relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// `GLSL###` language tag.
    pub language: String,
    /// Preprocessor defines.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defines: BTreeMap<String, String>,
}

impl StageManifest {
    /// Defines as source text, or `None` when there are none.
    #[must_use]
    pub fn render_defines(&self) -> Option<String> {
        if self.defines.is_empty() {
            return None;
        }
        let mut out = String::new();
        for (key, value) in &self.defines {
            let _ = writeln!(out, "#define {key} {value}");
        }
        Some(out)
    }

    fn stage_type(&self) -> Result<ShaderType, TesseraError> {
        if let Some(ty) = self.ty {
            return Ok(ty);
        }
        self.path
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .and_then(ShaderType::from_extension)
            .ok_or_else(|| {
                TesseraError::Manifest(format!(
                    "stage {} has no type and no recognizable file extension",
                    self.label()
                ))
            })
    }

    fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.path.as_ref().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "<unnamed>".to_owned())
    }
}

/// A program description loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramManifest {
    /// Program name, used in logs.
    pub name: String,
    /// Stages in link order.
    #[serde(rename = "stage", default)]
    pub stages: Vec<StageManifest>,
}

impl ProgramManifest {
    /// Load a manifest and turn every `path` stage into an inline stage.
    pub fn load(path: &Path) -> Result<Self, TesseraError> {
        let content = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml(&content, base)
    }

    /// Parse manifest text, resolving `path` stages against `base_dir`.
    pub fn from_toml(
        text: &str,
        base_dir: &Path,
    ) -> Result<Self, TesseraError> {
        let mut manifest: Self = toml::from_str(text)
            .map_err(|e| TesseraError::Manifest(e.to_string()))?;

        for stage in &mut manifest.stages {
            let full = match (&stage.source, &stage.path) {
                (Some(_), None) => continue,
                (None, Some(rel)) => base_dir.join(rel),
                (Some(_), Some(_)) => {
                    return Err(TesseraError::Manifest(format!(
                        "stage {} sets both `source` and `path`",
                        stage.label()
                    )));
                }
                (None, None) => {
                    return Err(TesseraError::Manifest(format!(
                        "stage {} needs `source` or `path`",
                        stage.label()
                    )));
                }
            };
            log::debug!("Reading stage source {}", full.display());
            let source = std::fs::read_to_string(&full)?;
            stage.ty = Some(stage.stage_type()?);
            stage.name = Some(stage.label());
            stage.source = Some(source);
            stage.path = None;
        }
        Ok(manifest)
    }

    /// Build a program with one stage per entry.
    pub fn build(&self) -> Result<ShaderProgram, TesseraError> {
        let mut program = ShaderProgram::new();
        for stage in &self.stages {
            let ty = stage.stage_type()?;
            let label = stage.label();
            let defines = stage.render_defines();
            program.add_source(
                ty,
                Some(&label),
                stage.source.as_deref().unwrap_or_default(),
                defines.as_deref(),
                &stage.language,
            )?;
        }
        log::debug!(
            "Built program {} from {} stages",
            self.name,
            self.stages.len()
        );
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderError;

    const INLINE: &str = r#"
name = "Unshaded"

[[stage]]
type = "vertex"
source = "void main() {}"
language = "GLSL330"

[[stage]]
type = "fragment"
name = "Unshaded.frag"
source = "void main() {}"
language = "GLSL330"
defines = { USE_FOG = "1", HAS_COLOR = "1" }
"#;

    #[test]
    fn inline_stages_build_a_program() {
        let manifest =
            ProgramManifest::from_toml(INLINE, Path::new(".")).unwrap();
        assert_eq!(manifest.stages.len(), 2);

        let program = manifest.build().unwrap();
        let frag = &program.stages()[1];
        assert_eq!(frag.ty(), ShaderType::Fragment);
        assert_eq!(frag.name(), Some("Unshaded.frag"));
        assert_eq!(
            frag.defines(),
            "#define HAS_COLOR 1\n#define USE_FOG 1\n"
        );
    }

    #[test]
    fn path_stages_resolve_relative_to_manifest() {
        let dir = std::env::temp_dir()
            .join(format!("tessera-manifest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Lit.vert"), "void main() {}\n").unwrap();
        std::fs::write(
            dir.join("lit.toml"),
            "name = \"Lit\"\n\
             [[stage]]\npath = \"Lit.vert\"\nlanguage = \"GLSL150\"\n",
        )
        .unwrap();

        let manifest = ProgramManifest::load(&dir.join("lit.toml")).unwrap();
        let program = manifest.build().unwrap();
        let vert = &program.stages()[0];
        assert_eq!(vert.ty(), ShaderType::Vertex);
        assert_eq!(vert.source(), "void main() {}\n");
        assert_eq!(vert.name(), Some("Lit.vert"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn loaded_manifest_serializes_as_inline_stages() {
        let dir = std::env::temp_dir()
            .join(format!("tessera-manifest-inline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Sky.frag"), "void main() {}\n").unwrap();
        let text = "name = \"Sky\"\n\
                    [[stage]]\npath = \"Sky.frag\"\nlanguage = \"GLSL330\"\n";

        let manifest = ProgramManifest::from_toml(text, &dir).unwrap();
        let stage = &manifest.stages[0];
        assert_eq!(stage.path, None);
        assert_eq!(stage.ty, Some(ShaderType::Fragment));

        let saved = toml::to_string(&manifest).unwrap();
        let reparsed =
            ProgramManifest::from_toml(&saved, Path::new("/nonexistent"))
                .unwrap();
        assert_eq!(reparsed, manifest);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stage_needs_exactly_one_source() {
        let both = "name = \"x\"\n[[stage]]\ntype = \"vertex\"\n\
                    source = \"a\"\npath = \"a.vert\"\n\
                    language = \"GLSL330\"\n";
        assert!(matches!(
            ProgramManifest::from_toml(both, Path::new(".")),
            Err(TesseraError::Manifest(_))
        ));

        let neither = "name = \"x\"\n[[stage]]\ntype = \"vertex\"\n\
                       language = \"GLSL330\"\n";
        assert!(matches!(
            ProgramManifest::from_toml(neither, Path::new(".")),
            Err(TesseraError::Manifest(_))
        ));
    }

    #[test]
    fn empty_language_surfaces_as_shader_error() {
        let text = "name = \"x\"\n[[stage]]\ntype = \"vertex\"\n\
                    source = \"a\"\nlanguage = \"\"\n";
        let manifest =
            ProgramManifest::from_toml(text, Path::new(".")).unwrap();
        assert!(matches!(
            manifest.build(),
            Err(TesseraError::Shader(ShaderError::InvalidArgument(_)))
        ));
    }
}
