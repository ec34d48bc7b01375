use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::backend::{LoadParams, ModelBackend};
use crate::config::{EngineConfig, GenerationConfig};
use crate::generation;
use crate::types::SlotInfo;

use super::{ModelSlot, ModelTask};

/// Manages the fixed set of task-dedicated model slots.
///
/// Construction loads every slot in parallel, one OS thread per slot, and
/// returns only once all loads have settled — slot availability is known
/// deterministically from that point on. `reload_all` serializes against
/// every generation call through the manager-wide gate.
pub struct ModelManager {
    backend: Arc<dyn ModelBackend>,
    slots: [ModelSlot; 3],
    generation: Arc<RwLock<GenerationConfig>>,
    /// Write side: reload. Read side: every generation call. Reload and
    /// generation never interleave.
    reload_gate: RwLock<()>,
}

impl ModelManager {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        config: &EngineConfig,
        generation: Arc<RwLock<GenerationConfig>>,
    ) -> Self {
        let slots = ModelTask::ALL.map(|task| {
            let slot = config.slot(task);
            ModelSlot::new(slot.path.clone(), slot.name.clone())
        });

        let manager = Self {
            backend,
            slots,
            generation,
            reload_gate: RwLock::new(()),
        };

        let params = manager.load_params();
        thread::scope(|scope| {
            for slot in &manager.slots {
                let backend = manager.backend.as_ref();
                scope.spawn(move || {
                    if slot.load(backend, &params) {
                        info!(slot = slot.name(), "model ready");
                    } else {
                        warn!(slot = slot.name(), "model unavailable, slot left inert");
                    }
                });
            }
        });

        manager
    }

    /// Load parameters shared by all slots: the configured context window
    /// and a per-slot share of the machine's cores, so three slots loading
    /// at once do not oversubscribe it.
    fn load_params(&self) -> LoadParams {
        let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        LoadParams {
            context_size: self.generation.read().context_size(),
            n_threads: (cores / self.slots.len()).max(1),
        }
    }

    fn slot(&self, task: ModelTask) -> &ModelSlot {
        &self.slots[task.index()]
    }

    pub fn is_loaded(&self, task: ModelTask) -> bool {
        self.slot(task).is_loaded()
    }

    pub fn all_loaded(&self) -> bool {
        ModelTask::ALL.iter().all(|task| self.is_loaded(*task))
    }

    pub fn slot_name(&self, task: ModelTask) -> &str {
        self.slot(task).name()
    }

    pub fn usage_count(&self, task: ModelTask) -> u64 {
        self.slot(task).usage_count()
    }

    /// Run one generation against the task's slot. Soft-fails to an empty
    /// string; blocked while a reload is in progress.
    pub fn generate(&self, task: ModelTask, prompt: &str) -> String {
        let _gate = self.reload_gate.read();
        let config = self.generation.read().clone();
        generation::generate(self.slot(task), prompt, &config)
    }

    /// Tear down and reload every slot sequentially. Holds the manager-wide
    /// gate for the whole duration but never a slot's own lock across the
    /// full reload, so concurrent `is_loaded` reads only ever observe empty
    /// or loaded.
    pub fn reload_all(&self) -> bool {
        let _gate = self.reload_gate.write();
        info!("reloading all model slots");

        let params = self.load_params();
        let mut all_ok = true;
        for slot in &self.slots {
            slot.unload();
            all_ok &= slot.load(self.backend.as_ref(), &params);
        }
        all_ok
    }

    pub fn slot_infos(&self) -> Vec<SlotInfo> {
        ModelTask::ALL
            .iter()
            .map(|task| self.slot(*task).info(task.key()))
            .collect()
    }
}
