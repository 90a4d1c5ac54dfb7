//! The multi-stage shader program and its compile/link/bind protocol.
//!
//! A [`ShaderProgram`] owns its stages, a name-keyed uniform table, an
//! attribute table indexed by [`VertexAttribute`], and the list of uniforms
//! fed by engine bindings. GPU identity (`native_id`) is the only state that
//! is lost on context loss; sources and uniform values survive a
//! [`reset_object`](ShaderProgram::reset_object) and are re-uploaded on the
//! next [`bind`](ShaderProgram::bind).
//!
//! Material switches use a two-phase protocol:
//!
//! ```text
//! program.clear_uniforms_set_by_current_flag();
//! // material writes its values through get_uniform(..).set_value(..)
//! program.reset_uniforms_not_set_by_current();
//! ```
//!
//! Every uniform the new material did not touch is reset to its default, so
//! no value from a previous material survives into the next draw.

use std::fmt;

use super::attribute::{AttributeVariable, VertexAttribute};
use super::binding::{BindingRegistry, UniformBinding};
use super::error::ShaderError;
use super::preprocess::assemble_source;
use super::stage::{ShaderStage, ShaderType};
use super::uniform::UniformVariable;
use crate::gpu::{
    DestructibleProgram, GpuExecutor, GpuLocation, Liveness, NativeId,
    RenderContext, ResourceReclaimer,
};
use crate::util::ListMap;

/// Language tag whose fragment outputs are bound by name before linking.
const FRAG_DATA_LANGUAGE: &str = "GLSL150";

/// Coarse lifecycle state of a program, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramState {
    /// No stages attached.
    Empty,
    /// Stages attached, never linked.
    SourcesAttached,
    /// Linked before, but a stage was added or the GPU object was reset.
    NeedsRelink,
    /// Native program is valid and up to date.
    Linked,
    /// Native objects were deleted explicitly.
    Destroyed,
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::SourcesAttached => "sources attached",
            Self::NeedsRelink => "needs relink",
            Self::Linked => "linked",
            Self::Destroyed => "destroyed",
        })
    }
}

/// A shader program: stages, uniforms, attributes, and native identity.
#[derive(Debug)]
pub struct ShaderProgram {
    stages: Vec<ShaderStage>,
    uniforms: ListMap<UniformVariable>,
    attributes: Vec<Option<AttributeVariable>>,
    bound_uniforms: Vec<UniformBinding>,
    native_id: Option<NativeId>,
    /// Stage objects attached to the current program object.
    attached: Vec<NativeId>,
    update_needed: bool,
    destroyed: bool,
    link_generation: u64,
    liveness: Liveness,
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderProgram {
    /// An empty program with no stages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            uniforms: ListMap::new(),
            attributes: Vec::new(),
            bound_uniforms: Vec::new(),
            native_id: None,
            attached: Vec::new(),
            update_needed: true,
            destroyed: false,
            link_generation: 0,
            liveness: Liveness::new(),
        }
    }


    // -- Construction ------------------------------------------------------

    /// Append a stage built from the given text.
    ///
    /// `language` is a `GLSL###` tag such as `GLSL330`. `defines` is placed
    /// verbatim between the generated header and the source. Revives a
    /// destroyed program.
    pub fn add_source(
        &mut self,
        ty: ShaderType,
        name: Option<&str>,
        source: &str,
        defines: Option<&str>,
        language: &str,
    ) -> Result<(), ShaderError> {
        let mut stage = ShaderStage::new(ty);
        if let Some(name) = name {
            stage.set_name(name);
        }
        stage.set_source(source)?;
        stage.set_language(language)?;
        if let Some(defines) = defines {
            stage.set_defines(defines)?;
        }
        stage.validate()?;

        self.stages.push(stage);
        self.destroyed = false;
        self.set_update_needed();
        Ok(())
    }

    /// The stage at `index`, for editing.
    ///
    /// Text edits are accepted until the stage is uploaded; after that they
    /// fail with [`ShaderError::IllegalRecompile`]. A stage whose compile
    /// failed is editable again.
    pub fn stage_mut(&mut self, index: usize) -> Option<&mut ShaderStage> {
        self.stages.get_mut(index)
    }

    /// Feed the uniform `g_<binding>` from an engine binding. Idempotent.
    pub fn add_uniform_binding(&mut self, binding: UniformBinding) {
        let name = binding.uniform_name();
        let uniform = self
            .uniforms
            .get_or_insert_with(&name, || UniformVariable::bound(binding));
        if uniform.binding().is_none() {
            uniform.set_binding(binding);
        }
        if !self.bound_uniforms.contains(&binding) {
            self.bound_uniforms.push(binding);
        }
    }

    /// The uniform called `name`, created on first reference.
    pub fn get_uniform(&mut self, name: &str) -> &mut UniformVariable {
        self.uniforms
            .get_or_insert_with(name, || UniformVariable::new(name))
    }

    /// The uniform called `name`, if it has been referenced.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&UniformVariable> {
        self.uniforms.get(name)
    }

    /// Drop the uniform called `name`, including its binding association.
    pub fn remove_uniform(&mut self, name: &str) -> Option<UniformVariable> {
        let removed = self.uniforms.remove(name)?;
        if let Some(binding) = removed.binding() {
            self.bound_uniforms.retain(|&b| b != binding);
        }
        Some(removed)
    }

    /// The attribute slot for `semantic`, created on first reference.
    pub fn get_attribute(
        &mut self,
        semantic: VertexAttribute,
    ) -> &mut AttributeVariable {
        let index = semantic.index();
        if self.attributes.len() <= index {
            self.attributes.resize_with(index + 1, || None);
        }
        self.attributes[index]
            .get_or_insert_with(|| AttributeVariable::new(semantic))
    }

    /// Location of the vertex input for `semantic`.
    ///
    /// Resolved at most once per link generation. Returns `None` while the
    /// program is not linked or when the input is not declared.
    pub fn attribute_location(
        &mut self,
        semantic: VertexAttribute,
        gpu: &mut dyn GpuExecutor,
    ) -> Option<GpuLocation> {
        if self.state() != ProgramState::Linked {
            return None;
        }
        let program = self.native_id?;
        self.get_attribute(semantic).resolve(program, gpu)
    }

    // -- Material protocol -------------------------------------------------

    /// Drop the set-by-current-material flag on every uniform. Call once
    /// per material activation, before the material writes its values.
    pub fn clear_uniforms_set_by_current_flag(&mut self) {
        for uniform in self.uniforms.values_mut() {
            uniform.clear_set_by_current_material();
        }
    }

    /// Reset every uniform the current material did not set to its default.
    pub fn reset_uniforms_not_set_by_current(&mut self) {
        for uniform in self.uniforms.values_mut() {
            if !uniform.is_set_by_current_material() {
                uniform.clear_value();
            }
        }
    }

    /// Pull the current value of every bound uniform from `registry`.
    ///
    /// Bindings the registry does not supply are left untouched. A value
    /// of another kind than the binding carries is rejected with
    /// [`ShaderError::TypeMismatch`].
    pub fn update_bound_uniforms(
        &mut self,
        registry: &dyn BindingRegistry,
    ) -> Result<(), ShaderError> {
        for uniform in self.uniforms.values_mut() {
            let Some(binding) = uniform.binding() else {
                continue;
            };
            let Some(value) = registry.value_of(binding) else {
                continue;
            };
            if value.kind() != binding.kind() {
                return Err(ShaderError::TypeMismatch {
                    name: uniform.name().to_owned(),
                    expected: binding.kind(),
                    found: value.kind(),
                });
            }
            uniform.set_value(value)?;
        }
        Ok(())
    }

    // -- GPU protocol ------------------------------------------------------

    /// Make the program current, compiling and linking first if needed,
    /// and upload every dirty uniform.
    ///
    /// Compile and link errors leave the program unlinked and are not
    /// retried until the next call. Binding a destroyed program logs a
    /// warning and does nothing.
    pub fn bind(
        &mut self,
        ctx: &mut RenderContext,
        gpu: &mut dyn GpuExecutor,
        reclaimer: &mut dyn ResourceReclaimer,
    ) -> Result<(), ShaderError> {
        if self.destroyed {
            log::warn!("Cannot bind {self}: program was deleted");
            return Ok(());
        }

        let program = match self.native_id {
            Some(id) if !self.update_needed => id,
            _ => self.compile_and_link(ctx, gpu, reclaimer)?,
        };

        let _ = ctx.use_program(program, gpu);
        for uniform in self.uniforms.values_mut() {
            let _ = uniform.flush(program, gpu)?;
        }
        Ok(())
    }

    /// Compile pending stages and (re)link the program.
    ///
    /// Called by [`bind`](Self::bind); exposed for warm-up passes that want
    /// compile errors early. If a program that never linked fails to build,
    /// every stage object is released again, so no native object outlives
    /// the failed attempt.
    pub fn compile_and_link(
        &mut self,
        ctx: &RenderContext,
        gpu: &mut dyn GpuExecutor,
        reclaimer: &mut dyn ResourceReclaimer,
    ) -> Result<NativeId, ShaderError> {
        if self.stages.is_empty() {
            return Err(ShaderError::InvalidArgument(format!(
                "{self} has no stages to link"
            )));
        }

        let compiled = self
            .stages
            .iter_mut()
            .filter(|s| s.is_update_needed())
            .try_for_each(|stage| compile_stage(stage, ctx, &mut *gpu));
        if let Err(e) = compiled {
            if self.native_id.is_none() {
                self.release_stage_objects(gpu);
            }
            return Err(e);
        }

        let fresh = self.native_id.is_none();
        let program = match self.native_id {
            Some(id) => id,
            None => match gpu.create_program_object() {
                Some(id) => id,
                None => {
                    self.release_stage_objects(gpu);
                    return Err(ShaderError::ResourceCreationFailure(
                        "program object",
                    ));
                }
            },
        };

        for stage in &self.stages {
            let Some(id) = stage.native_id() else {
                continue;
            };
            if !self.attached.contains(&id) {
                gpu.attach_stage(program, id);
                self.attached.push(id);
            }
            if stage.ty() == ShaderType::Fragment
                && stage.language() == FRAG_DATA_LANGUAGE
            {
                gpu.bind_frag_data_location(program, 0, "outFragColor");
                for i in 0..ctx.max_color_attachments() {
                    let name = format!("outFragData[{i}]");
                    gpu.bind_frag_data_location(program, i, &name);
                }
            }
        }

        let report = gpu.link_program(program);
        if !report.success {
            if fresh {
                for stage in self.attached.drain(..) {
                    gpu.detach_stage(program, stage);
                }
                gpu.delete_program_object(program);
                self.release_stage_objects(gpu);
            }
            return Err(ShaderError::LinkError {
                program: self.to_string(),
                log: ShaderError::log_or_placeholder(report.diagnostics()),
            });
        }

        match report.diagnostics() {
            Some(log) if ctx.report_warnings() => {
                log::warn!("{self} linked with diagnostics:\n{log}");
            }
            _ => log::debug!("{self} linked as program {program}"),
        }

        self.native_id = Some(program);
        self.update_needed = false;
        self.link_generation += 1;
        if !fresh {
            self.reset_locations();
        }
        reclaimer
            .register(self.create_destructible_clone(), self.liveness.watch());
        Ok(program)
    }

    /// Forget every native id after the GPU context was lost.
    ///
    /// Sources and uniform values are kept; the next bind compiles and
    /// links from scratch. The caller resets the [`RenderContext`] and the
    /// reclaimer for the lost context.
    pub fn reset_object(&mut self) {
        self.native_id = None;
        self.attached.clear();
        for stage in &mut self.stages {
            stage.reset_object();
        }
        self.set_update_needed();
    }

    /// Delete every native object now and mark the program destroyed.
    ///
    /// A program without a program object logs a warning and is left as
    /// is.
    pub fn delete_object(
        &mut self,
        ctx: &mut RenderContext,
        gpu: &mut dyn GpuExecutor,
        reclaimer: &mut dyn ResourceReclaimer,
    ) {
        let Some(program) = self.native_id else {
            log::warn!("Shader program is not uploaded to GPU, cannot delete.");
            return;
        };
        reclaimer.forget(program);
        self.create_destructible_clone().delete(ctx, gpu);
        self.reset_object();
        self.destroyed = true;
    }

    /// Capture the current native ids for deferred deletion.
    ///
    /// The result shares nothing with `self`; resetting or relinking the
    /// program afterwards does not change it.
    #[must_use]
    pub fn create_destructible_clone(&self) -> DestructibleProgram {
        DestructibleProgram::new(
            self.native_id,
            self.stages.iter().filter_map(ShaderStage::native_id).collect(),
        )
    }

    fn set_update_needed(&mut self) {
        self.update_needed = true;
        self.reset_locations();
    }

    fn reset_locations(&mut self) {
        for uniform in self.uniforms.values_mut() {
            uniform.reset_location();
        }
        for attribute in self.attributes.iter_mut().flatten() {
            attribute.reset_location();
        }
    }

    fn release_stage_objects(&mut self, gpu: &mut dyn GpuExecutor) {
        for stage in &mut self.stages {
            if let Some(id) = stage.native_id() {
                gpu.delete_stage_object(id);
                stage.reset_object();
            }
        }
    }

    // -- Introspection -----------------------------------------------------

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProgramState {
        if self.destroyed {
            ProgramState::Destroyed
        } else if self.stages.is_empty() {
            ProgramState::Empty
        } else if self.native_id.is_some() && !self.update_needed {
            ProgramState::Linked
        } else if self.link_generation == 0 {
            ProgramState::SourcesAttached
        } else {
            ProgramState::NeedsRelink
        }
    }

    /// Native program object, set only while linked.
    #[must_use]
    pub fn native_id(&self) -> Option<NativeId> {
        self.native_id
    }

    /// Whether the next bind must compile and link.
    #[must_use]
    pub fn is_update_needed(&self) -> bool {
        self.update_needed
    }

    /// Number of successful links so far.
    #[must_use]
    pub fn link_generation(&self) -> u64 {
        self.link_generation
    }

    /// Stages in the order they were added.
    #[must_use]
    pub fn stages(&self) -> &[ShaderStage] {
        &self.stages
    }

    /// Uniforms in first-reference order.
    pub fn uniforms(&self) -> impl Iterator<Item = &UniformVariable> {
        self.uniforms.values()
    }

    /// Bindings feeding this program, in the order they were added.
    #[must_use]
    pub fn bound_uniforms(&self) -> &[UniformBinding] {
        &self.bound_uniforms
    }
}

impl fmt::Display for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShaderProgram[numSources={}, numUniforms={}]",
            self.stages.len(),
            self.uniforms.len()
        )
    }
}

/// Assemble and compile one stage, creating its stage object on demand.
///
/// On failure the stage object is deleted again, so the stage accepts new
/// text through [`ShaderProgram::stage_mut`].
fn compile_stage(
    stage: &mut ShaderStage,
    ctx: &RenderContext,
    gpu: &mut dyn GpuExecutor,
) -> Result<(), ShaderError> {
    stage.validate()?;
    let source = assemble_source(stage, ctx.profile())?;

    let id = match stage.native_id() {
        Some(id) => id,
        None => {
            let id = gpu
                .create_stage_object(stage.ty())
                .ok_or(ShaderError::ResourceCreationFailure("stage object"))?;
            stage.set_native_id(id);
            id
        }
    };

    let report = gpu.compile_stage(id, &source);
    if !report.success {
        gpu.delete_stage_object(id);
        stage.reset_object();
        return Err(ShaderError::CompileError {
            stage: stage.to_string(),
            log: ShaderError::log_or_placeholder(report.diagnostics()),
        });
    }

    match report.diagnostics() {
        Some(log) if ctx.report_warnings() => {
            log::warn!("{stage} compiled with diagnostics:\n{log}");
        }
        _ => log::debug!("{stage} compiled"),
    }
    stage.clear_update_needed();
    Ok(())
}
