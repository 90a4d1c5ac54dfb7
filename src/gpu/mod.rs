//! GPU-facing plumbing for the shader core.
//!
//! The core issues driver calls through [`GpuExecutor`], tracks the bound
//! program per context in [`RenderContext`], and hands native ids that
//! outlive their owners to a [`ResourceReclaimer`].

/// Driver call surface and native id types.
pub mod executor;
/// Deferred deletion of native objects.
pub mod reclaimer;
/// In-memory executor that records calls.
pub mod recording;
/// Per-context bound-program token and target settings.
pub mod render_context;

pub use executor::{
    GpuExecutor, GpuLocation, NativeId, StatusReport, UniformUpload,
};
pub use reclaimer::{
    DestructibleProgram, Liveness, LivenessWatch, NativeObjectManager,
    ResourceReclaimer,
};
pub use recording::{GpuCall, RecordingExecutor, UploadData};
pub use render_context::RenderContext;
