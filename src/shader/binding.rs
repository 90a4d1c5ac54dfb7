//! Engine-wide uniform bindings.
//!
//! A binding is a uniform whose value the engine supplies automatically
//! (camera matrices, time, viewport size). The program only records which
//! of its uniforms are bound; a [`BindingRegistry`] supplies the values.

use std::fmt;

use super::uniform::BINDING_PREFIX;
use super::value::{UniformKind, UniformValue};

/// Catalog of engine-wide uniform bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformBinding {
    /// Model to world transform.
    WorldMatrix,
    /// World to view transform.
    ViewMatrix,
    /// View to clip transform.
    ProjectionMatrix,
    /// Model to view transform.
    WorldViewMatrix,
    /// Inverse transpose of the world-view matrix, for normals.
    NormalMatrix,
    /// Model to clip transform.
    WorldViewProjectionMatrix,
    /// World to clip transform.
    ViewProjectionMatrix,
    /// Inverse of the world matrix.
    WorldMatrixInverse,
    /// Inverse of the view matrix.
    ViewMatrixInverse,
    /// Inverse of the projection matrix.
    ProjectionMatrixInverse,
    /// Inverse of the view-projection matrix.
    ViewProjectionMatrixInverse,
    /// Viewport as `(x, y, width, height)`.
    ViewPort,
    /// Camera frustum near and far planes.
    FrustumNearFar,
    /// Render target size in pixels.
    Resolution,
    /// Reciprocal of the render target size.
    ResolutionInverse,
    /// Camera aspect ratio.
    Aspect,
    /// Camera position in world space.
    CameraPosition,
    /// Camera forward direction in world space.
    CameraDirection,
    /// Seconds since the application started.
    Time,
    /// Seconds per frame of the previous frame.
    Tpf,
    /// Frames per second.
    FrameRate,
}

impl UniformBinding {
    /// Binding name without prefix, e.g. `WorldMatrix`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::WorldMatrix => "WorldMatrix",
            Self::ViewMatrix => "ViewMatrix",
            Self::ProjectionMatrix => "ProjectionMatrix",
            Self::WorldViewMatrix => "WorldViewMatrix",
            Self::NormalMatrix => "NormalMatrix",
            Self::WorldViewProjectionMatrix => "WorldViewProjectionMatrix",
            Self::ViewProjectionMatrix => "ViewProjectionMatrix",
            Self::WorldMatrixInverse => "WorldMatrixInverse",
            Self::ViewMatrixInverse => "ViewMatrixInverse",
            Self::ProjectionMatrixInverse => "ProjectionMatrixInverse",
            Self::ViewProjectionMatrixInverse => "ViewProjectionMatrixInverse",
            Self::ViewPort => "ViewPort",
            Self::FrustumNearFar => "FrustumNearFar",
            Self::Resolution => "Resolution",
            Self::ResolutionInverse => "ResolutionInverse",
            Self::Aspect => "Aspect",
            Self::CameraPosition => "CameraPosition",
            Self::CameraDirection => "CameraDirection",
            Self::Time => "Time",
            Self::Tpf => "Tpf",
            Self::FrameRate => "FrameRate",
        }
    }

    /// Name of the uniform that receives this binding, e.g. `g_WorldMatrix`.
    #[must_use]
    pub fn uniform_name(self) -> String {
        format!("{BINDING_PREFIX}{}", self.name())
    }

    /// Kind of value the engine supplies for this binding.
    #[must_use]
    pub fn kind(self) -> UniformKind {
        match self {
            Self::WorldMatrix
            | Self::ViewMatrix
            | Self::ProjectionMatrix
            | Self::WorldViewMatrix
            | Self::WorldViewProjectionMatrix
            | Self::ViewProjectionMatrix
            | Self::WorldMatrixInverse
            | Self::ViewMatrixInverse
            | Self::ProjectionMatrixInverse
            | Self::ViewProjectionMatrixInverse => UniformKind::Matrix4,
            Self::NormalMatrix => UniformKind::Matrix3,
            Self::ViewPort => UniformKind::Vector4,
            Self::FrustumNearFar
            | Self::Resolution
            | Self::ResolutionInverse => UniformKind::Vector2,
            Self::CameraPosition | Self::CameraDirection => {
                UniformKind::Vector3
            }
            Self::Aspect | Self::Time | Self::Tpf | Self::FrameRate => {
                UniformKind::Float
            }
        }
    }
}

impl fmt::Display for UniformBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supplies the current value of engine-wide bindings, once per frame.
pub trait BindingRegistry {
    /// Current value for `binding`, or `None` if the registry does not
    /// provide it.
    fn value_of(&self, binding: UniformBinding) -> Option<UniformValue>;
}

impl BindingRegistry for rustc_hash::FxHashMap<UniformBinding, UniformValue> {
    fn value_of(&self, binding: UniformBinding) -> Option<UniformValue> {
        self.get(&binding).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_names_carry_global_prefix() {
        assert_eq!(UniformBinding::Time.uniform_name(), "g_Time");
        assert_eq!(UniformBinding::NormalMatrix.kind(), UniformKind::Matrix3);
    }
}
