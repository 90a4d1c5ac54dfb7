//! Deferred deletion of native shader objects.
//!
//! A program registers a [`DestructibleProgram`] (just its native ids) plus a
//! [`LivenessWatch`] every time it links. If the owning
//! [`ShaderProgram`](crate::shader::ShaderProgram) is dropped without an
//! explicit delete, the ids are still released on the next
//! [`NativeObjectManager::delete_unused`] pass.

use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;

use super::executor::{GpuExecutor, NativeId};
use super::render_context::RenderContext;

/// The native ids of a program and its stages, detached from the program.
///
/// Shares no state with the live program, so it stays valid while the
/// program is reset, relinked, or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DestructibleProgram {
    program: Option<NativeId>,
    stages: Vec<NativeId>,
}

impl DestructibleProgram {
    /// Capture the given ids.
    #[must_use]
    pub fn new(program: Option<NativeId>, stages: Vec<NativeId>) -> Self {
        Self { program, stages }
    }

    /// Captured program object.
    #[must_use]
    pub fn program(&self) -> Option<NativeId> {
        self.program
    }

    /// Captured stage objects.
    #[must_use]
    pub fn stages(&self) -> &[NativeId] {
        &self.stages
    }

    /// Returns `true` if no native object was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_none() && self.stages.is_empty()
    }

    /// Detach and delete every captured stage object, then the program
    /// object. Nothing captured means nothing was uploaded: warn and return.
    ///
    /// `ctx` drops its bound-program token if it names the deleted program,
    /// because the driver may hand the same name to the next new program.
    pub fn delete(self, ctx: &mut RenderContext, gpu: &mut dyn GpuExecutor) {
        if self.is_empty() {
            log::warn!("Shader program is not uploaded to GPU, cannot delete.");
            return;
        }
        for stage in self.stages {
            if let Some(program) = self.program {
                gpu.detach_stage(program, stage);
            }
            gpu.delete_stage_object(stage);
        }
        if let Some(program) = self.program {
            gpu.delete_program_object(program);
            ctx.forget_program(program);
        }
    }
}

/// Strong half of a liveness pair, held by the owning program.
#[derive(Debug, Default)]
pub struct Liveness(Arc<()>);

impl Liveness {
    /// A fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A weak watch that reports whether this token is still alive.
    #[must_use]
    pub fn watch(&self) -> LivenessWatch {
        LivenessWatch(Arc::downgrade(&self.0))
    }
}

/// Weak half of a liveness pair, held by the reclaimer.
#[derive(Debug, Clone)]
pub struct LivenessWatch(Weak<()>);

impl LivenessWatch {
    /// Returns `true` while the owner has not been dropped.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Receives native ids that must eventually be deleted.
pub trait ResourceReclaimer {
    /// Track a linked program. Registering the same program id again
    /// replaces the previous entry.
    fn register(&mut self, ids: DestructibleProgram, owner: LivenessWatch);

    /// Stop tracking `program` (it was deleted explicitly).
    fn forget(&mut self, program: NativeId);

    /// Schedule orphaned ids for deletion on the next pass, regardless of
    /// any owner. Any registration for the same program id is dropped.
    fn enqueue(&mut self, ids: DestructibleProgram);
}

/// Default [`ResourceReclaimer`]: batches deletions until a GPU pass.
#[derive(Debug, Default)]
pub struct NativeObjectManager {
    registered: FxHashMap<NativeId, (DestructibleProgram, LivenessWatch)>,
    pending: Vec<DestructibleProgram>,
}

impl NativeObjectManager {
    /// An empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered programs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Returns `true` if nothing is registered or pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty() && self.pending.is_empty()
    }

    /// Returns `true` if `program` is registered.
    #[must_use]
    pub fn is_registered(&self, program: NativeId) -> bool {
        self.registered.contains_key(&program)
    }

    /// Number of orphaned id sets waiting for deletion.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Delete everything enqueued plus every registered program whose owner
    /// was dropped. Returns the number of programs deleted.
    pub fn delete_unused(
        &mut self,
        ctx: &mut RenderContext,
        gpu: &mut dyn GpuExecutor,
    ) -> usize {
        let mut deleted = 0;
        for ids in self.pending.drain(..) {
            ids.delete(ctx, gpu);
            deleted += 1;
        }

        let dead: Vec<NativeId> = self
            .registered
            .iter()
            .filter(|(_, (_, owner))| !owner.is_alive())
            .map(|(&id, _)| id)
            .collect();
        for id in dead {
            if let Some((ids, _)) = self.registered.remove(&id) {
                log::trace!(
                    "Reclaiming program {id} after its owner was dropped"
                );
                ids.delete(ctx, gpu);
                deleted += 1;
            }
        }
        deleted
    }

    /// Delete every tracked object, live or not (renderer shutdown).
    /// Returns the number of programs deleted.
    pub fn delete_all(
        &mut self,
        ctx: &mut RenderContext,
        gpu: &mut dyn GpuExecutor,
    ) -> usize {
        let mut deleted = 0;
        let registered = std::mem::take(&mut self.registered);
        for ids in self
            .pending
            .drain(..)
            .chain(registered.into_values().map(|(ids, _)| ids))
        {
            ids.delete(ctx, gpu);
            deleted += 1;
        }
        deleted
    }

    /// Forget every tracked id without GPU calls. Used after context loss,
    /// when the driver has already released the objects.
    pub fn reset_objects(&mut self) {
        self.registered.clear();
        self.pending.clear();
    }
}

impl ResourceReclaimer for NativeObjectManager {
    fn register(&mut self, ids: DestructibleProgram, owner: LivenessWatch) {
        let Some(program) = ids.program() else {
            return;
        };
        log::trace!("Registering program {program} for deferred deletion");
        let _ = self.registered.insert(program, (ids, owner));
    }

    fn forget(&mut self, program: NativeId) {
        let _ = self.registered.remove(&program);
    }

    fn enqueue(&mut self, ids: DestructibleProgram) {
        if let Some(program) = ids.program() {
            self.forget(program);
        }
        self.pending.push(ids);
    }
}
