//! A [`GpuExecutor`] that records calls instead of touching a driver.
//!
//! Used by the test suites, the benches, and `tessera-preprocess` (which
//! runs a real compile/link cycle to print the exact sources a driver would
//! see). Object names and locations are handed out deterministically from 1.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use super::executor::{
    GpuExecutor, GpuLocation, NativeId, StatusReport, UniformUpload,
};
use crate::shader::ShaderType;

/// Payload of a recorded upload, copied out of the borrowed call.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadData {
    /// Integer payload (`Int`, `IntArray`).
    Ints(Vec<i32>),
    /// Float payload (everything else), column-major for matrices.
    Floats(Vec<f32>),
}

impl UploadData {
    fn from_upload(upload: UniformUpload<'_>) -> Self {
        match upload {
            UniformUpload::Int(v) => Self::Ints(vec![v]),
            UniformUpload::IntArray(v) => Self::Ints(v.to_vec()),
            UniformUpload::Float(v) => Self::Floats(vec![v]),
            UniformUpload::Float2(v) => Self::Floats(v.to_vec()),
            UniformUpload::Float3(v) => Self::Floats(v.to_vec()),
            UniformUpload::Float4(v) => Self::Floats(v.to_vec()),
            UniformUpload::Matrix3(v) => Self::Floats(v.to_vec()),
            UniformUpload::Matrix4(v) => Self::Floats(v.to_vec()),
            UniformUpload::FloatArray(v)
            | UniformUpload::Float2Array(v)
            | UniformUpload::Float3Array(v)
            | UniformUpload::Float4Array(v)
            | UniformUpload::Matrix4Array(v) => Self::Floats(v.to_vec()),
        }
    }
}

/// One recorded executor call.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    /// `create_stage_object` and the id it returned.
    CreateStage(ShaderType, NativeId),
    /// `compile_stage`.
    CompileStage(NativeId),
    /// `create_program_object` and the id it returned.
    CreateProgram(NativeId),
    /// `attach_stage(program, stage)`.
    AttachStage(NativeId, NativeId),
    /// `detach_stage(program, stage)`.
    DetachStage(NativeId, NativeId),
    /// `bind_frag_data_location(program, index, name)`.
    BindFragData(NativeId, u32, String),
    /// `link_program`.
    LinkProgram(NativeId),
    /// `resolve_uniform_location(program, name)`.
    ResolveUniform(NativeId, String),
    /// `resolve_attribute_location(program, name)`.
    ResolveAttribute(NativeId, String),
    /// `upload_uniform`, with the uniform name the location was issued for.
    UploadUniform(String, UploadData),
    /// `activate_program`.
    ActivateProgram(NativeId),
    /// `delete_stage_object`.
    DeleteStage(NativeId),
    /// `delete_program_object`.
    DeleteProgram(NativeId),
}

/// Recording executor with switchable failure modes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Vec<GpuCall>,
    next_object: u32,
    next_location: u32,

    stage_types: FxHashMap<NativeId, ShaderType>,
    live_stages: FxHashSet<NativeId>,
    live_programs: FxHashSet<NativeId>,
    uniform_locations: FxHashMap<(NativeId, String), GpuLocation>,
    attribute_locations: FxHashMap<(NativeId, String), GpuLocation>,
    location_names: FxHashMap<GpuLocation, String>,
    compiled_sources: Vec<(ShaderType, String)>,
    recycle_names: bool,
    free_names: BTreeSet<NativeId>,

    failing_stages: FxHashSet<ShaderType>,
    failing_link: bool,
    refuse_objects: bool,
    compile_log: String,
    link_log: String,
    missing_uniforms: FxHashSet<String>,
    missing_attributes: FxHashSet<String>,
}

impl RecordingExecutor {
    /// An executor where everything succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make compiles of `ty` stages fail.
    pub fn fail_compiles_of(&mut self, ty: ShaderType) {
        let _ = self.failing_stages.insert(ty);
    }

    /// Make every link succeed or fail.
    pub fn set_link_failure(&mut self, fail: bool) {
        self.failing_link = fail;
    }

    /// Make object creation return `None`.
    pub fn set_refuse_objects(&mut self, refuse: bool) {
        self.refuse_objects = refuse;
    }

    /// Hand deleted object names out again, lowest first, the way drivers
    /// do.
    pub fn set_recycle_names(&mut self, recycle: bool) {
        self.recycle_names = recycle;
        if !recycle {
            self.free_names.clear();
        }
    }

    /// Clear every configured failure.
    pub fn clear_failures(&mut self) {
        self.failing_stages.clear();
        self.failing_link = false;
        self.refuse_objects = false;
    }

    /// Info log returned by every compile, successful or not.
    pub fn set_compile_log(&mut self, log: impl Into<String>) {
        self.compile_log = log.into();
    }

    /// Info log returned by every link, successful or not.
    pub fn set_link_log(&mut self, log: impl Into<String>) {
        self.link_log = log.into();
    }

    /// Pretend the linker optimized `name` out of every program.
    pub fn drop_uniform(&mut self, name: impl Into<String>) {
        let _ = self.missing_uniforms.insert(name.into());
    }

    /// Pretend no program declares vertex input `name`.
    pub fn drop_attribute(&mut self, name: impl Into<String>) {
        let _ = self.missing_attributes.insert(name.into());
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    /// Forget the recorded calls (object bookkeeping is kept).
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn count(&self, pred: impl Fn(&GpuCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Number of compile calls.
    #[must_use]
    pub fn compiles(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::CompileStage(_)))
    }

    /// Number of link calls.
    #[must_use]
    pub fn links(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::LinkProgram(_)))
    }

    /// Number of activation calls.
    #[must_use]
    pub fn activations(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::ActivateProgram(_)))
    }

    /// Number of uniform location lookups.
    #[must_use]
    pub fn uniform_lookups(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::ResolveUniform(..)))
    }

    /// Number of attribute location lookups.
    #[must_use]
    pub fn attribute_lookups(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::ResolveAttribute(..)))
    }

    /// Number of upload calls.
    #[must_use]
    pub fn uploads(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::UploadUniform(..)))
    }

    /// Payloads uploaded for uniform `name`, oldest first.
    #[must_use]
    pub fn uploads_of(&self, name: &str) -> Vec<&UploadData> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GpuCall::UploadUniform(n, data) if n == name => Some(data),
                _ => None,
            })
            .collect()
    }

    /// Program objects deleted so far.
    #[must_use]
    pub fn deleted_programs(&self) -> Vec<NativeId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GpuCall::DeleteProgram(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Stage and program objects created and not yet deleted.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.live_stages.len() + self.live_programs.len()
    }

    /// Every source handed to the compiler, in order.
    #[must_use]
    pub fn compiled_sources(&self) -> &[(ShaderType, String)] {
        &self.compiled_sources
    }

    /// The most recent source compiled for a stage of type `ty`.
    #[must_use]
    pub fn last_source(&self, ty: ShaderType) -> Option<&str> {
        self.compiled_sources
            .iter()
            .rev()
            .find(|(t, _)| *t == ty)
            .map(|(_, s)| s.as_str())
    }

    fn next_id(&mut self) -> Option<NativeId> {
        if self.refuse_objects {
            return None;
        }
        if let Some(id) = self.free_names.pop_first() {
            return Some(id);
        }
        self.next_object += 1;
        NativeId::new(self.next_object)
    }

    fn location_for(
        &mut self,
        table: Table,
        program: NativeId,
        name: &str,
    ) -> Option<GpuLocation> {
        let (missing, locations) = match table {
            Table::Uniform => {
                (&self.missing_uniforms, &mut self.uniform_locations)
            }
            Table::Attribute => {
                (&self.missing_attributes, &mut self.attribute_locations)
            }
        };
        if missing.contains(name) || !self.live_programs.contains(&program) {
            return None;
        }
        let key = (program, name.to_owned());
        if let Some(&loc) = locations.get(&key) {
            return Some(loc);
        }
        let loc = GpuLocation(self.next_location);
        self.next_location += 1;
        let _ = locations.insert(key, loc);
        let _ = self.location_names.insert(loc, name.to_owned());
        Some(loc)
    }
}

#[derive(Clone, Copy)]
enum Table {
    Uniform,
    Attribute,
}

impl GpuExecutor for RecordingExecutor {
    fn create_stage_object(&mut self, ty: ShaderType) -> Option<NativeId> {
        let id = self.next_id()?;
        let _ = self.stage_types.insert(id, ty);
        let _ = self.live_stages.insert(id);
        self.calls.push(GpuCall::CreateStage(ty, id));
        Some(id)
    }

    fn compile_stage(&mut self, stage: NativeId, source: &str) -> StatusReport {
        self.calls.push(GpuCall::CompileStage(stage));
        let ty = self.stage_types.get(&stage).copied();
        if let Some(ty) = ty {
            self.compiled_sources.push((ty, source.to_owned()));
        }
        let failed = ty.is_some_and(|ty| self.failing_stages.contains(&ty));
        StatusReport {
            success: !failed,
            info_log: self.compile_log.clone(),
        }
    }

    fn create_program_object(&mut self) -> Option<NativeId> {
        let id = self.next_id()?;
        let _ = self.live_programs.insert(id);
        self.calls.push(GpuCall::CreateProgram(id));
        Some(id)
    }

    fn attach_stage(&mut self, program: NativeId, stage: NativeId) {
        self.calls.push(GpuCall::AttachStage(program, stage));
    }

    fn detach_stage(&mut self, program: NativeId, stage: NativeId) {
        self.calls.push(GpuCall::DetachStage(program, stage));
    }

    fn bind_frag_data_location(
        &mut self,
        program: NativeId,
        index: u32,
        name: &str,
    ) {
        self.calls
            .push(GpuCall::BindFragData(program, index, name.to_owned()));
    }

    fn link_program(&mut self, program: NativeId) -> StatusReport {
        self.calls.push(GpuCall::LinkProgram(program));
        // Relinking invalidates every location handed out for this program.
        self.uniform_locations.retain(|(p, _), _| *p != program);
        self.attribute_locations.retain(|(p, _), _| *p != program);
        StatusReport {
            success: !self.failing_link,
            info_log: self.link_log.clone(),
        }
    }

    fn resolve_uniform_location(
        &mut self,
        program: NativeId,
        name: &str,
    ) -> Option<GpuLocation> {
        self.calls
            .push(GpuCall::ResolveUniform(program, name.to_owned()));
        self.location_for(Table::Uniform, program, name)
    }

    fn resolve_attribute_location(
        &mut self,
        program: NativeId,
        name: &str,
    ) -> Option<GpuLocation> {
        self.calls
            .push(GpuCall::ResolveAttribute(program, name.to_owned()));
        self.location_for(Table::Attribute, program, name)
    }

    fn upload_uniform(
        &mut self,
        location: GpuLocation,
        upload: UniformUpload<'_>,
    ) {
        let name = self
            .location_names
            .get(&location)
            .cloned()
            .unwrap_or_default();
        let data = UploadData::from_upload(upload);
        self.calls.push(GpuCall::UploadUniform(name, data));
    }

    fn activate_program(&mut self, program: NativeId) {
        self.calls.push(GpuCall::ActivateProgram(program));
    }

    fn delete_stage_object(&mut self, stage: NativeId) {
        if self.live_stages.remove(&stage) && self.recycle_names {
            let _ = self.free_names.insert(stage);
        }
        self.calls.push(GpuCall::DeleteStage(stage));
    }

    fn delete_program_object(&mut self, program: NativeId) {
        if self.live_programs.remove(&program) && self.recycle_names {
            let _ = self.free_names.insert(program);
        }
        self.uniform_locations.retain(|(p, _), _| *p != program);
        self.attribute_locations.retain(|(p, _), _| *p != program);
        self.calls.push(GpuCall::DeleteProgram(program));
    }
}
