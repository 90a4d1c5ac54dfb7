//! Single pipeline stages and their source text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ShaderError;
use crate::gpu::NativeId;

/// The pipeline step a stage controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderType {
    /// Controls fragment rasterization (e.g. the color of a pixel).
    Fragment,
    /// Controls vertex processing (e.g. model to clip space transform).
    Vertex,
    /// Controls geometry assembly (e.g. building a triangle list from
    /// input primitives).
    Geometry,
    /// Controls the tessellation factor (how often a patch is subdivided).
    TessellationControl,
    /// Controls the tessellation transform (like a vertex stage, but
    /// mixing patch inputs manually).
    TessellationEvaluation,
}

impl ShaderType {
    /// Every stage type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Fragment,
        Self::Vertex,
        Self::Geometry,
        Self::TessellationControl,
        Self::TessellationEvaluation,
    ];

    /// Conventional file extension for sources of this type.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Fragment => "frag",
            Self::Vertex => "vert",
            Self::Geometry => "geom",
            Self::TessellationControl => "tsctrl",
            Self::TessellationEvaluation => "tseval",
        }
    }

    /// Inverse of [`extension`](Self::extension).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.extension() == ext)
    }

    /// Type name as used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fragment => "Fragment",
            Self::Vertex => "Vertex",
            Self::Geometry => "Geometry",
            Self::TessellationControl => "TessellationControl",
            Self::TessellationEvaluation => "TessellationEvaluation",
        }
    }

    /// Preprocessor symbol defined to `1` while compiling a stage of this
    /// type, e.g. `VERTEX_SHADER`.
    #[must_use]
    pub fn define_name(self) -> String {
        format!("{}_SHADER", self.name().to_uppercase())
    }
}

impl fmt::Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One translation unit of a program: source, defines, and language tag.
///
/// A stage is never shared between programs. Its text may be edited freely
/// until a native stage object exists; after that the uploaded text is
/// fixed and edits fail with [`ShaderError::IllegalRecompile`].
#[derive(Debug)]
pub struct ShaderStage {
    ty: ShaderType,
    language: String,
    name: Option<String>,
    source: String,
    defines: String,
    native_id: Option<NativeId>,
    update_needed: bool,
}

impl ShaderStage {
    /// Create an empty stage of the given type.
    #[must_use]
    pub fn new(ty: ShaderType) -> Self {
        Self {
            ty,
            language: String::new(),
            name: None,
            source: String::new(),
            defines: String::new(),
            native_id: None,
            update_needed: true,
        }
    }

    /// The pipeline step this stage controls. Fixed at construction.
    #[must_use]
    pub fn ty(&self) -> ShaderType {
        self.ty
    }

    /// Language tag, e.g. `GLSL330`.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Optional debug name (usually the asset path).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Raw source text, without header or defines.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Preprocessor defines text placed ahead of the source.
    #[must_use]
    pub fn defines(&self) -> &str {
        &self.defines
    }

    /// Native stage object, if one has been created.
    #[must_use]
    pub fn native_id(&self) -> Option<NativeId> {
        self.native_id
    }

    /// Whether the stage must be (re)compiled before the next link.
    #[must_use]
    pub fn is_update_needed(&self) -> bool {
        self.update_needed
    }

    /// Set the debug name. Names are not uploaded, so this is always allowed.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Replace the source text.
    pub fn set_source(
        &mut self,
        source: impl Into<String>,
    ) -> Result<(), ShaderError> {
        self.ensure_editable("source")?;
        self.source = source.into();
        self.update_needed = true;
        Ok(())
    }

    /// Replace the defines text.
    pub fn set_defines(
        &mut self,
        defines: impl Into<String>,
    ) -> Result<(), ShaderError> {
        self.ensure_editable("defines")?;
        self.defines = defines.into();
        self.update_needed = true;
        Ok(())
    }

    /// Replace the language tag.
    pub fn set_language(
        &mut self,
        language: impl Into<String>,
    ) -> Result<(), ShaderError> {
        self.ensure_editable("language")?;
        self.language = language.into();
        self.update_needed = true;
        Ok(())
    }

    fn ensure_editable(&self, what: &str) -> Result<(), ShaderError> {
        match self.native_id {
            Some(id) => Err(ShaderError::IllegalRecompile(format!(
                "cannot replace {what} of {self}: \
                 stage object {id} already uploaded"
            ))),
            None => Ok(()),
        }
    }

    /// Check the fields compilation depends on.
    pub(crate) fn validate(&self) -> Result<(), ShaderError> {
        if self.source.is_empty() {
            return Err(ShaderError::InvalidArgument(format!(
                "{self} has no source text"
            )));
        }
        if self.language.is_empty() {
            return Err(ShaderError::InvalidArgument(format!(
                "{self} has no language tag"
            )));
        }
        Ok(())
    }

    pub(crate) fn set_native_id(&mut self, id: NativeId) {
        self.native_id = Some(id);
    }

    pub(crate) fn clear_update_needed(&mut self) {
        self.update_needed = false;
    }

    /// Forget the native stage object (context loss or deletion).
    pub(crate) fn reset_object(&mut self) {
        self.native_id = None;
        self.update_needed = true;
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShaderStage[")?;
        if let Some(name) = &self.name {
            write!(f, "name={name}, ")?;
        }
        if !self.defines.is_empty() {
            f.write_str("defines, ")?;
        }
        write!(f, "type={}, language={}]", self.ty, self.language)
    }
}
