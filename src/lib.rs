// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Shader program lifecycle, compile/link, and uniform binding core for
//! real-time renderers.
//!
//! Tessera owns the logical side of a multi-stage shader program: its
//! stages, its uniform and attribute tables, and the protocol that turns
//! source text into a linked GPU program while tracking exactly which
//! cached state (locations, values) must be invalidated and when. Actual
//! driver calls go through the [`gpu::GpuExecutor`] trait.
//!
//! # Key entry points
//!
//! - [`shader::ShaderProgram`] - program state machine and bind protocol
//! - [`shader::UniformVariable`] - named uniform with dirty tracking
//! - [`gpu::RenderContext`] - per-context bound-program token and settings
//! - [`gpu::NativeObjectManager`] - deferred deletion of native objects
//! - [`options::Options`] - TOML configuration
//! - [`manifest::ProgramManifest`] - TOML program descriptions
//!
//! # Frame protocol
//!
//! ```text
//! program.clear_uniforms_set_by_current_flag();
//! material.apply(&mut program)?;           // get_uniform(..).set_value(..)
//! program.reset_uniforms_not_set_by_current();
//! program.update_bound_uniforms(&bindings)?;
//! program.bind(&mut ctx, &mut gpu, &mut objects)?;
//! // end of frame
//! objects.delete_unused(&mut ctx, &mut gpu);
//! ```
//!
//! On context loss, call [`shader::ShaderProgram::reset_object`] on every
//! program, [`gpu::RenderContext::reset`], and
//! [`gpu::NativeObjectManager::reset_objects`]; the next bind rebuilds
//! everything from the retained sources and values.

pub mod error;
pub mod gpu;
pub mod manifest;
pub mod options;
pub mod shader;
pub mod util;

pub use error::TesseraError;
