//! Shader program object model.
//!
//! Leaves first: [`UniformVariable`] and [`AttributeVariable`] cache
//! locations, [`ShaderStage`] holds one translation unit, and
//! [`ShaderProgram`] ties them together and drives the compile/link/bind
//! protocol through a [`GpuExecutor`](crate::gpu::GpuExecutor).

/// Vertex attribute semantics and their location cache.
pub mod attribute;
/// Engine-wide uniform bindings.
pub mod binding;
/// Shader error taxonomy.
pub mod error;
/// `GLSL###` language tags and version headers.
pub mod language;
/// Tri-state location cache.
pub mod location;
/// Final source assembly.
pub mod preprocess;
/// Program state machine and GPU protocol.
pub mod program;
/// Stage types and per-stage source.
pub mod stage;
/// Named uniforms with dirty tracking.
pub mod uniform;
/// Uniform payloads and upload dispatch.
pub mod value;

pub use attribute::{AttributeVariable, VertexAttribute};
pub use binding::{BindingRegistry, UniformBinding};
pub use error::ShaderError;
pub use language::ShaderLanguage;
pub use location::Location;
pub use preprocess::{assemble_source, SourceProfile};
pub use program::{ProgramState, ShaderProgram};
pub use stage::{ShaderStage, ShaderType};
pub use uniform::{UniformVariable, BINDING_PREFIX};
pub use value::{UniformKind, UniformValue};
