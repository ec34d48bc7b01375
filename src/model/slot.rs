use std::path::PathBuf;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::backend::{ensure_backend_init, LanguageModel, LoadParams, ModelBackend};
use crate::types::SlotInfo;

/// Exclusive owner of one loaded model and its execution context.
///
/// The `Option` inside the lock makes the load invariant structural: a slot
/// is either fully loaded or fully empty, and no in-between state is
/// observable from outside.
pub struct ModelSlot {
    name: String,
    path: PathBuf,
    state: Mutex<SlotState>,
}

pub(crate) struct SlotState {
    pub(crate) model: Option<Box<dyn LanguageModel>>,
    /// Monotonically increasing; deliberately survives unload and reload.
    pub(crate) usage_count: u64,
    pub(crate) last_used_at: Option<Instant>,
}

impl ModelSlot {
    pub(crate) fn new(path: PathBuf, name: String) -> Self {
        Self {
            name,
            path,
            state: Mutex::new(SlotState {
                model: None,
                usage_count: 0,
                last_used_at: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the slot's model, replacing whatever was loaded before.
    /// Failure leaves the slot empty and reports `false`; it never leaves a
    /// model without its context.
    pub(crate) fn load(&self, backend: &dyn ModelBackend, params: &LoadParams) -> bool {
        let mut state = self.state.lock();

        ensure_backend_init(backend);
        debug!(slot = %self.name, path = %self.path.display(), "loading model");

        match backend.load(&self.path, params) {
            Ok(model) => {
                debug!(slot = %self.name, description = %model.description(), "model loaded");
                state.model = Some(model);
                true
            }
            Err(err) => {
                warn!(slot = %self.name, error = %format!("{err:#}"), "model load failed");
                state.model = None;
                false
            }
        }
    }

    /// Drop the model and context. Unloading an empty slot is a no-op.
    pub(crate) fn unload(&self) {
        let mut state = self.state.lock();
        if state.model.take().is_some() {
            debug!(slot = %self.name, "model unloaded");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().model.is_some()
    }

    pub fn usage_count(&self) -> u64 {
        self.state.lock().usage_count
    }

    /// Exclusive access for a generation call; held for the call's full
    /// duration so usage counters stay consistent with the loaded state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock()
    }

    pub(crate) fn info(&self, task: &str) -> SlotInfo {
        let state = self.state.lock();
        SlotInfo {
            task: task.to_string(),
            name: self.name.clone(),
            loaded: state.model.is_some(),
            usage_count: state.usage_count,
            description: state.model.as_ref().map(|m| m.description()),
        }
    }
}
