//! The thin layer that issues real compile/link/upload calls.
//!
//! The shader core never talks to a graphics API directly. Everything it
//! needs from the driver goes through [`GpuExecutor`], which keeps the
//! program/stage state machine testable without a GPU and lets a backend
//! (GL, GLES, a recording mock) plug in underneath.

use std::fmt;
use std::num::NonZeroU32;

use crate::shader::ShaderType;

/// Identity of a native GPU object (stage object or program object).
///
/// Graphics APIs hand out non-zero object names; the "not yet created"
/// state is modelled as `Option<NativeId>::None` by the owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(NonZeroU32);

impl NativeId {
    /// Wrap a raw object name. Returns `None` for the reserved name `0`.
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw object name as handed out by the driver.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a uniform or vertex attribute inside one linked program.
///
/// Only meaningful for the relink generation it was resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuLocation(pub u32);

/// Outcome of a compile or link request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    /// Whether the driver reported success.
    pub success: bool,
    /// Compiler or linker diagnostics, empty when none were produced.
    pub info_log: String,
}

impl StatusReport {
    /// A successful report without diagnostics.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            info_log: String::new(),
        }
    }

    /// A failed report carrying the given diagnostics.
    #[must_use]
    pub fn failed(info_log: impl Into<String>) -> Self {
        Self {
            success: false,
            info_log: info_log.into(),
        }
    }

    /// The diagnostics log, if it carries anything worth reporting.
    ///
    /// Drivers commonly return a log of a few whitespace or NUL bytes on
    /// success; anything three characters or shorter is treated as empty.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&str> {
        let trimmed = self.info_log.trim_end_matches('\0');
        (trimmed.len() > 3).then_some(trimmed)
    }
}

/// One fixed-arity or vector uniform upload call.
///
/// Produced by [`UniformValue::upload`](crate::shader::UniformValue::upload),
/// which is the single place that maps value kinds to GPU calls. Vector
/// variants borrow tightly packed float/int data straight out of the
/// uniform's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformUpload<'a> {
    /// `uniform1i`.
    Int(i32),
    /// `uniform1f`.
    Float(f32),
    /// `uniform2f`.
    Float2([f32; 2]),
    /// `uniform3f`.
    Float3([f32; 3]),
    /// `uniform4f`.
    Float4([f32; 4]),
    /// `uniformMatrix3fv` with a single column-major matrix.
    Matrix3([f32; 9]),
    /// `uniformMatrix4fv` with a single column-major matrix.
    Matrix4([f32; 16]),
    /// `uniform1iv`.
    IntArray(&'a [i32]),
    /// `uniform1fv`.
    FloatArray(&'a [f32]),
    /// `uniform2fv`, two floats per element.
    Float2Array(&'a [f32]),
    /// `uniform3fv`, three floats per element.
    Float3Array(&'a [f32]),
    /// `uniform4fv`, four floats per element.
    Float4Array(&'a [f32]),
    /// `uniformMatrix4fv` with several column-major matrices.
    Matrix4Array(&'a [f32]),
}

/// Driver-facing operations the shader core relies on.
///
/// All calls happen on the render thread that owns the GPU context and
/// complete synchronously.
pub trait GpuExecutor {
    /// Allocate a stage object of the given pipeline type.
    fn create_stage_object(&mut self, ty: ShaderType) -> Option<NativeId>;

    /// Upload `source` into the stage object and compile it.
    fn compile_stage(&mut self, stage: NativeId, source: &str) -> StatusReport;

    /// Allocate an empty program object.
    fn create_program_object(&mut self) -> Option<NativeId>;

    /// Attach a compiled stage object to a program object.
    fn attach_stage(&mut self, program: NativeId, stage: NativeId);

    /// Detach a stage object from a program object.
    fn detach_stage(&mut self, program: NativeId, stage: NativeId);

    /// Bind a named fragment output to a color attachment index before
    /// linking. Only needed by GLSL 1.50 fragment stages; backends that
    /// rely on layout qualifiers can ignore it.
    fn bind_frag_data_location(
        &mut self,
        program: NativeId,
        index: u32,
        name: &str,
    ) {
        let _ = (program, index, name);
    }

    /// Link every attached stage into an executable program.
    fn link_program(&mut self, program: NativeId) -> StatusReport;

    /// Look up a uniform by name. `None` means the linker did not keep it.
    fn resolve_uniform_location(
        &mut self,
        program: NativeId,
        name: &str,
    ) -> Option<GpuLocation>;

    /// Look up a vertex attribute by name.
    fn resolve_attribute_location(
        &mut self,
        program: NativeId,
        name: &str,
    ) -> Option<GpuLocation>;

    /// Upload one uniform value into the currently active program.
    fn upload_uniform(
        &mut self,
        location: GpuLocation,
        upload: UniformUpload<'_>,
    );

    /// Make `program` the active program for subsequent draws and uploads.
    fn activate_program(&mut self, program: NativeId);

    /// Release a stage object.
    fn delete_stage_object(&mut self, stage: NativeId);

    /// Release a program object.
    fn delete_program_object(&mut self, program: NativeId);
}
