use crate::options::Options;
use crate::shader::SourceProfile;

use super::executor::{GpuExecutor, NativeId};

/// Per-GPU-context state consulted by the shader core.
///
/// Holds the "currently bound program" token so redundant activation calls
/// can be skipped, plus the target settings that shape compilation. One
/// instance exists per GPU context and is passed by reference to
/// [`ShaderProgram::bind`](crate::shader::ShaderProgram::bind).
#[derive(Debug, Clone)]
pub struct RenderContext {
    bound_program: Option<NativeId>,
    profile: SourceProfile,
    report_warnings: bool,
    max_color_attachments: u32,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl RenderContext {
    /// Create a context from configuration options.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            bound_program: None,
            profile: SourceProfile {
                restricted: options.profile.restricted,
                linearize_srgb: options.profile.linearize_srgb,
            },
            report_warnings: options.validation.report_warnings,
            max_color_attachments: options.limits.max_color_attachments,
        }
    }

    /// The program currently active on the GPU, as far as this context knows.
    #[must_use]
    pub fn bound_program(&self) -> Option<NativeId> {
        self.bound_program
    }

    /// Source assembly switches for this target.
    #[must_use]
    pub fn profile(&self) -> SourceProfile {
        self.profile
    }

    /// Whether diagnostics of successful compiles/links are logged.
    #[must_use]
    pub fn report_warnings(&self) -> bool {
        self.report_warnings
    }

    /// Number of `outFragData[i]` outputs bound for GLSL 1.50 fragment
    /// stages.
    #[must_use]
    pub fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    /// Activate `program` unless it is already the bound program.
    ///
    /// Returns `true` if an activation call was issued.
    pub(crate) fn use_program(
        &mut self,
        program: NativeId,
        gpu: &mut dyn GpuExecutor,
    ) -> bool {
        if self.bound_program == Some(program) {
            return false;
        }
        gpu.activate_program(program);
        self.bound_program = Some(program);
        true
    }

    /// Drop the bound-program token if it refers to `program`. Called when
    /// the program object is deleted, since drivers recycle object names.
    pub(crate) fn forget_program(&mut self, program: NativeId) {
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
    }

    /// Forget all GPU-side state after the context was lost or recreated.
    pub fn reset(&mut self) {
        self.bound_program = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::RecordingExecutor;

    #[test]
    fn activation_is_skipped_for_bound_program() {
        let mut ctx = RenderContext::default();
        let mut gpu = RecordingExecutor::new();
        let id = NativeId::new(5).unwrap();

        assert!(ctx.use_program(id, &mut gpu));
        assert!(!ctx.use_program(id, &mut gpu));
        assert_eq!(gpu.activations(), 1);

        ctx.forget_program(id);
        assert!(ctx.use_program(id, &mut gpu));
        assert_eq!(gpu.activations(), 2);
    }

    #[test]
    fn options_flow_into_context() {
        let mut options = Options::default();
        options.profile.restricted = true;
        options.limits.max_color_attachments = 8;
        let ctx = RenderContext::new(&options);
        assert!(ctx.profile().restricted);
        assert_eq!(ctx.max_color_attachments(), 8);
        assert!(ctx.report_warnings());
    }
}
