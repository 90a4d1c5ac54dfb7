//! Named shader parameters with cached location and dirty tracking.

use super::binding::UniformBinding;
use super::error::ShaderError;
use super::location::Location;
use super::value::{UniformKind, UniformValue};
use crate::gpu::{GpuExecutor, NativeId};

/// Prefix of uniforms whose value comes from an engine-wide binding.
pub const BINDING_PREFIX: &str = "g_";

/// A single named uniform of one program.
#[derive(Debug, Clone)]
pub struct UniformVariable {
    name: String,
    binding: Option<UniformBinding>,
    location: Location,
    value: Option<UniformValue>,
    update_needed: bool,
    set_by_current_material: bool,
}

impl UniformVariable {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: None,
            location: Location::Unresolved,
            value: None,
            update_needed: false,
            set_by_current_material: false,
        }
    }

    pub(crate) fn bound(binding: UniformBinding) -> Self {
        Self {
            binding: Some(binding),
            ..Self::new(binding.uniform_name())
        }
    }

    pub(crate) fn set_binding(&mut self, binding: UniformBinding) {
        self.binding = Some(binding);
    }

    /// Uniform name as declared in the shader, including its prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine binding that supplies this uniform's value, if any.
    #[must_use]
    pub fn binding(&self) -> Option<UniformBinding> {
        self.binding
    }

    /// Cached location for the current link generation.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Current value, `None` until first set.
    #[must_use]
    pub fn value(&self) -> Option<&UniformValue> {
        self.value.as_ref()
    }

    /// Kind of the current value.
    #[must_use]
    pub fn kind(&self) -> Option<UniformKind> {
        self.value.as_ref().map(UniformValue::kind)
    }

    /// Whether the value must be uploaded on the next bind.
    #[must_use]
    pub fn is_update_needed(&self) -> bool {
        self.update_needed
    }

    /// Whether the active material assigned this uniform since the last
    /// [`clear_set_by_current_material`](Self::clear_set_by_current_material).
    #[must_use]
    pub fn is_set_by_current_material(&self) -> bool {
        self.set_by_current_material
    }

    /// Assign a new value.
    ///
    /// Once a uniform holds a value its kind is fixed; array uniforms may
    /// still change length. Assigning the value it already holds only
    /// refreshes the set-by-current-material flag.
    pub fn set_value(
        &mut self,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaderError> {
        let value = value.into();
        if let Some(current) = &self.value {
            if current.kind() != value.kind() {
                return Err(ShaderError::TypeMismatch {
                    name: self.name.clone(),
                    expected: current.kind(),
                    found: value.kind(),
                });
            }
            self.set_by_current_material = true;
            if *current == value {
                return Ok(());
            }
        }
        self.value = Some(value);
        self.set_by_current_material = true;
        self.update_needed = true;
        Ok(())
    }

    /// Reset the value to its kind's default (zero / `false`).
    pub fn clear_value(&mut self) {
        if let Some(value) = &mut self.value {
            let before = value.clone();
            value.reset_to_default();
            if *value != before {
                self.update_needed = true;
            }
        }
    }

    /// Drop the set-by-current-material flag ahead of a material switch.
    pub fn clear_set_by_current_material(&mut self) {
        self.set_by_current_material = false;
    }

    /// Forget the cached location. A fresh program starts from default
    /// values, so any held value must be uploaded again.
    pub(crate) fn reset_location(&mut self) {
        self.location = Location::Unresolved;
        if self.value.is_some() {
            self.update_needed = true;
        }
    }

    /// Upload the value into `program` if it is dirty.
    ///
    /// The program must already be active. Returns whether an upload call
    /// was issued. Uniforms the linker dropped are skipped silently.
    pub(crate) fn flush(
        &mut self,
        program: NativeId,
        gpu: &mut dyn GpuExecutor,
    ) -> Result<bool, ShaderError> {
        if !self.update_needed {
            return Ok(false);
        }

        let location = match self.location {
            Location::Resolved(loc) => loc,
            Location::NotFound => {
                self.update_needed = false;
                return Ok(false);
            }
            Location::Unresolved => {
                let found = gpu.resolve_uniform_location(program, &self.name);
                self.location = Location::from_lookup(found);
                match self.location.resolved() {
                    Some(loc) => loc,
                    None => {
                        log::debug!(
                            "Uniform {} is not declared in program {program}",
                            self.name
                        );
                        self.update_needed = false;
                        return Ok(false);
                    }
                }
            }
        };

        let Some(value) = &self.value else {
            return Ok(false);
        };
        gpu.upload_uniform(location, value.upload()?);
        self.update_needed = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn set_marks_dirty_and_current() {
        let mut u = UniformVariable::new("m_Color");
        assert!(!u.is_update_needed());
        u.set_value(Vec4::ONE).unwrap();
        assert!(u.is_update_needed());
        assert!(u.is_set_by_current_material());
        assert_eq!(u.kind(), Some(UniformKind::Vector4));
    }

    #[test]
    fn scalar_kind_is_fixed_once_set() {
        let mut u = UniformVariable::new("m_Shininess");
        u.set_value(8.0_f32).unwrap();
        let err = u.set_value(Vec3::ONE).unwrap_err();
        assert_eq!(
            err,
            ShaderError::TypeMismatch {
                name: "m_Shininess".to_owned(),
                expected: UniformKind::Float,
                found: UniformKind::Vector3,
            }
        );
        assert_eq!(u.value(), Some(&UniformValue::Float(8.0)));
    }

    #[test]
    fn arrays_resize_in_place() {
        let mut u = UniformVariable::new("m_Weights");
        u.set_value(vec![1.0_f32, 2.0]).unwrap();
        u.set_value(vec![1.0_f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            u.value(),
            Some(&UniformValue::FloatArray(vec![1.0, 2.0, 3.0, 4.0]))
        );
    }

    #[test]
    fn same_value_is_not_dirty_again() {
        let mut u = UniformVariable::new("m_Alpha");
        u.set_value(0.5_f32).unwrap();
        u.update_needed = false;
        u.clear_set_by_current_material();

        u.set_value(0.5_f32).unwrap();
        assert!(!u.is_update_needed());
        assert!(u.is_set_by_current_material());
    }

    #[test]
    fn clear_value_resets_to_default() {
        let mut u = UniformVariable::new("m_UseFog");
        u.clear_value();
        assert_eq!(u.value(), None);

        u.set_value(true).unwrap();
        u.update_needed = false;
        u.clear_value();
        assert_eq!(u.value(), Some(&UniformValue::Boolean(false)));
        assert!(u.is_update_needed());
    }

    #[test]
    fn bound_uniform_uses_binding_name() {
        let binding = UniformBinding::WorldViewProjectionMatrix;
        let u = UniformVariable::bound(binding);
        assert_eq!(u.name(), "g_WorldViewProjectionMatrix");
        assert_eq!(u.binding(), Some(binding));
    }
}
