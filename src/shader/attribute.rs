//! Vertex-input slots of a program.

use super::location::Location;
use crate::gpu::{GpuExecutor, GpuLocation, NativeId};

/// Vertex attribute semantics, each with a small dense index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexAttribute {
    /// Object-space vertex position.
    Position,
    /// Point sprite size.
    Size,
    /// Object-space normal.
    Normal,
    /// Primary texture coordinate.
    TexCoord,
    /// Per-vertex color.
    Color,
    /// Tangent, with handedness in `w`.
    Tangent,
    /// Binormal (bitangent).
    Binormal,
    /// Secondary texture coordinate.
    TexCoord2,
    /// Third texture coordinate.
    TexCoord3,
    /// Fourth texture coordinate.
    TexCoord4,
    /// Bind-pose position for software skinning.
    BindPosePosition,
    /// Bind-pose normal for software skinning.
    BindPoseNormal,
    /// Bone weights for hardware skinning.
    BoneWeight,
    /// Bone indices for hardware skinning.
    BoneIndex,
    /// Per-instance transform data.
    InstanceData,
}

impl VertexAttribute {
    /// Every semantic, ordered by [`index`](Self::index).
    pub const ALL: [Self; 15] = [
        Self::Position,
        Self::Size,
        Self::Normal,
        Self::TexCoord,
        Self::Color,
        Self::Tangent,
        Self::Binormal,
        Self::TexCoord2,
        Self::TexCoord3,
        Self::TexCoord4,
        Self::BindPosePosition,
        Self::BindPoseNormal,
        Self::BoneWeight,
        Self::BoneIndex,
        Self::InstanceData,
    ];

    /// Dense semantic id, usable as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Semantic name, e.g. `TexCoord2`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Size => "Size",
            Self::Normal => "Normal",
            Self::TexCoord => "TexCoord",
            Self::Color => "Color",
            Self::Tangent => "Tangent",
            Self::Binormal => "Binormal",
            Self::TexCoord2 => "TexCoord2",
            Self::TexCoord3 => "TexCoord3",
            Self::TexCoord4 => "TexCoord4",
            Self::BindPosePosition => "BindPosePosition",
            Self::BindPoseNormal => "BindPoseNormal",
            Self::BoneWeight => "BoneWeight",
            Self::BoneIndex => "BoneIndex",
            Self::InstanceData => "InstanceData",
        }
    }

    /// Name of the vertex input in shader source, e.g. `inPosition`.
    #[must_use]
    pub fn shader_name(self) -> String {
        format!("in{}", self.name())
    }
}

/// Cached location of one vertex input.
#[derive(Debug, Clone)]
pub struct AttributeVariable {
    name: String,
    location: Location,
}

impl AttributeVariable {
    pub(crate) fn new(semantic: VertexAttribute) -> Self {
        Self {
            name: semantic.shader_name(),
            location: Location::Unresolved,
        }
    }

    /// Input name as declared in the vertex stage.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cached location for the current link generation.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn reset_location(&mut self) {
        self.location = Location::Unresolved;
    }

    /// Look the location up in `program` unless it is already cached.
    pub(crate) fn resolve(
        &mut self,
        program: NativeId,
        gpu: &mut dyn GpuExecutor,
    ) -> Option<GpuLocation> {
        if self.location == Location::Unresolved {
            let found = gpu.resolve_attribute_location(program, &self.name);
            self.location = Location::from_lookup(found);
            if self.location == Location::NotFound {
                log::debug!(
                    "Attribute {} is not declared in program {program}",
                    self.name
                );
            }
        }
        self.location.resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, semantic) in VertexAttribute::ALL.iter().enumerate() {
            assert_eq!(semantic.index(), i);
        }
    }

    #[test]
    fn shader_names_use_in_prefix() {
        assert_eq!(VertexAttribute::TexCoord2.shader_name(), "inTexCoord2");
        assert_eq!(
            AttributeVariable::new(VertexAttribute::Normal).name(),
            "inNormal"
        );
    }
}
