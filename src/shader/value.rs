//! Uniform payloads and their mapping to GPU upload calls.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

use super::error::ShaderError;
use crate::gpu::UniformUpload;

/// Kind tag of a uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// `float`
    Float,
    /// `int`, also used for sampler units.
    Int,
    /// `bool`
    Boolean,
    /// `vec2`
    Vector2,
    /// `vec3`
    Vector3,
    /// `vec4`, also used for colors and quaternions.
    Vector4,
    /// `mat3`
    Matrix3,
    /// `mat4`
    Matrix4,
    /// `int[]`
    IntArray,
    /// `float[]`
    FloatArray,
    /// `vec2[]`
    Vector2Array,
    /// `vec3[]`
    Vector3Array,
    /// `vec4[]`
    Vector4Array,
    /// `mat3[]`. Has no upload mapping.
    Matrix3Array,
    /// `mat4[]`
    Matrix4Array,
}

/// A uniform value with its kind carried by the variant.
///
/// Colors and quaternions are stored as [`UniformValue::Vector4`]; every
/// "vec4-compatible" assignment converts to that one payload up front.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `int`
    Int(i32),
    /// `bool`
    Boolean(bool),
    /// `vec2`
    Vector2(Vec2),
    /// `vec3`
    Vector3(Vec3),
    /// `vec4`
    Vector4(Vec4),
    /// `mat3`
    Matrix3(Mat3),
    /// `mat4`
    Matrix4(Mat4),
    /// `int[]`
    IntArray(Vec<i32>),
    /// `float[]`
    FloatArray(Vec<f32>),
    /// `vec2[]`
    Vector2Array(Vec<Vec2>),
    /// `vec3[]`
    Vector3Array(Vec<Vec3>),
    /// `vec4[]`
    Vector4Array(Vec<Vec4>),
    /// `mat3[]`
    Matrix3Array(Vec<Mat3>),
    /// `mat4[]`
    Matrix4Array(Vec<Mat4>),
}

impl UniformValue {
    /// The kind tag of this value.
    #[must_use]
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) => UniformKind::Float,
            Self::Int(_) => UniformKind::Int,
            Self::Boolean(_) => UniformKind::Boolean,
            Self::Vector2(_) => UniformKind::Vector2,
            Self::Vector3(_) => UniformKind::Vector3,
            Self::Vector4(_) => UniformKind::Vector4,
            Self::Matrix3(_) => UniformKind::Matrix3,
            Self::Matrix4(_) => UniformKind::Matrix4,
            Self::IntArray(_) => UniformKind::IntArray,
            Self::FloatArray(_) => UniformKind::FloatArray,
            Self::Vector2Array(_) => UniformKind::Vector2Array,
            Self::Vector3Array(_) => UniformKind::Vector3Array,
            Self::Vector4Array(_) => UniformKind::Vector4Array,
            Self::Matrix3Array(_) => UniformKind::Matrix3Array,
            Self::Matrix4Array(_) => UniformKind::Matrix4Array,
        }
    }

    /// Overwrite the value with its kind's default: zero, `false`, or an
    /// all-zero array of the same length.
    pub fn reset_to_default(&mut self) {
        match self {
            Self::Float(v) => *v = 0.0,
            Self::Int(v) => *v = 0,
            Self::Boolean(v) => *v = false,
            Self::Vector2(v) => *v = Vec2::ZERO,
            Self::Vector3(v) => *v = Vec3::ZERO,
            Self::Vector4(v) => *v = Vec4::ZERO,
            Self::Matrix3(v) => *v = Mat3::ZERO,
            Self::Matrix4(v) => *v = Mat4::ZERO,
            Self::IntArray(v) => v.fill(0),
            Self::FloatArray(v) => v.fill(0.0),
            Self::Vector2Array(v) => v.fill(Vec2::ZERO),
            Self::Vector3Array(v) => v.fill(Vec3::ZERO),
            Self::Vector4Array(v) => v.fill(Vec4::ZERO),
            Self::Matrix3Array(v) => v.fill(Mat3::ZERO),
            Self::Matrix4Array(v) => v.fill(Mat4::ZERO),
        }
    }

    /// Map this value to the GPU call that uploads it.
    pub fn upload(&self) -> Result<UniformUpload<'_>, ShaderError> {
        Ok(match self {
            Self::Float(v) => UniformUpload::Float(*v),
            Self::Int(v) => UniformUpload::Int(*v),
            Self::Boolean(v) => UniformUpload::Int(i32::from(*v)),
            Self::Vector2(v) => UniformUpload::Float2(v.to_array()),
            Self::Vector3(v) => UniformUpload::Float3(v.to_array()),
            Self::Vector4(v) => UniformUpload::Float4(v.to_array()),
            Self::Matrix3(m) => UniformUpload::Matrix3(m.to_cols_array()),
            Self::Matrix4(m) => UniformUpload::Matrix4(m.to_cols_array()),
            Self::IntArray(v) => UniformUpload::IntArray(v),
            Self::FloatArray(v) => UniformUpload::FloatArray(v),
            Self::Vector2Array(v) => {
                UniformUpload::Float2Array(bytemuck::cast_slice(v))
            }
            Self::Vector3Array(v) => {
                UniformUpload::Float3Array(bytemuck::cast_slice(v))
            }
            Self::Vector4Array(v) => {
                UniformUpload::Float4Array(bytemuck::cast_slice(v))
            }
            Self::Matrix4Array(v) => {
                UniformUpload::Matrix4Array(bytemuck::cast_slice(v))
            }
            Self::Matrix3Array(_) => {
                return Err(ShaderError::UnsupportedType(
                    UniformKind::Matrix3Array,
                ))
            }
        })
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    f32 => Float,
    i32 => Int,
    bool => Boolean,
    Vec2 => Vector2,
    Vec3 => Vector3,
    Vec4 => Vector4,
    Mat3 => Matrix3,
    Mat4 => Matrix4,
    Vec<i32> => IntArray,
    Vec<f32> => FloatArray,
    Vec<Vec2> => Vector2Array,
    Vec<Vec3> => Vector3Array,
    Vec<Vec4> => Vector4Array,
    Vec<Mat3> => Matrix3Array,
    Vec<Mat4> => Matrix4Array,
}

impl From<Quat> for UniformValue {
    fn from(q: Quat) -> Self {
        Self::Vector4(Vec4::from(q))
    }
}

/// RGBA colors.
impl From<[f32; 4]> for UniformValue {
    fn from(rgba: [f32; 4]) -> Self {
        Self::Vector4(Vec4::from_array(rgba))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternions_and_colors_share_vector4() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(UniformValue::from(q).kind(), UniformKind::Vector4);
        assert_eq!(
            UniformValue::from([1.0, 0.5, 0.25, 1.0]),
            UniformValue::Vector4(Vec4::new(1.0, 0.5, 0.25, 1.0))
        );
    }

    #[test]
    fn booleans_upload_as_int() {
        assert_eq!(
            UniformValue::Boolean(true).upload().unwrap(),
            UniformUpload::Int(1)
        );
    }

    #[test]
    fn vector_arrays_upload_tightly_packed() {
        let value = UniformValue::Vector3Array(vec![
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::splat(4.0),
        ]);
        assert_eq!(
            value.upload().unwrap(),
            UniformUpload::Float3Array(&[1.0, 2.0, 3.0, 4.0, 4.0, 4.0])
        );

        let value = UniformValue::Matrix4Array(vec![Mat4::IDENTITY]);
        let UniformUpload::Matrix4Array(floats) = value.upload().unwrap() else {
            panic!("expected a matrix array upload");
        };
        assert_eq!(floats, Mat4::IDENTITY.to_cols_array().as_slice());
    }

    #[test]
    fn matrix3_arrays_have_no_upload_mapping() {
        let value = UniformValue::Matrix3Array(vec![Mat3::IDENTITY]);
        assert_eq!(
            value.upload(),
            Err(ShaderError::UnsupportedType(UniformKind::Matrix3Array))
        );
    }

    #[test]
    fn reset_keeps_array_length() {
        let mut value = UniformValue::FloatArray(vec![1.0, 2.0, 3.0]);
        value.reset_to_default();
        assert_eq!(value, UniformValue::FloatArray(vec![0.0; 3]));

        let mut value = UniformValue::Boolean(true);
        value.reset_to_default();
        assert_eq!(value, UniformValue::Boolean(false));
    }
}
