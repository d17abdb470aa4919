//! Saving the plan and the form draft under their fixed keys.
//!
//! Writes go through a background worker that batches rapid edits; loads
//! fall back to "nothing saved" on any error.

use super::model::{FormData, LessonPlan};
use crate::storage::SharedStore;
use std::time::Duration;
use tokio::sync::mpsc;

pub const PLAN_KEY: &str = "currentLessonPlan";
pub const FORM_KEY: &str = "lessonPlanFormData";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// A write queued for the persistence worker.
#[derive(Debug, Clone)]
pub enum PersistCommand {
    SavePlan(LessonPlan),
    SaveForm(FormData),
    ClearAll,
}

/// Net effect of a batch of commands.
#[derive(Debug, Default)]
pub struct PendingWrites {
    pub clear: bool,
    pub plan: Option<LessonPlan>,
    pub form: Option<FormData>,
}

impl PendingWrites {
    /// Fold one more command in. A clear discards saves queued before it.
    pub fn push(&mut self, command: PersistCommand) {
        match command {
            PersistCommand::SavePlan(plan) => self.plan = Some(plan),
            PersistCommand::SaveForm(form) => self.form = Some(form),
            PersistCommand::ClearAll => {
                self.clear = true;
                self.plan = None;
                self.form = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.clear && self.plan.is_none() && self.form.is_none()
    }
}

/// Typed access to the two persisted blobs.
#[derive(Clone)]
pub struct PlanStore {
    store: SharedStore,
}

impl PlanStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn load_plan(&self) -> Option<LessonPlan> {
        self.load(PLAN_KEY).await
    }

    pub async fn load_form(&self) -> FormData {
        self.load(FORM_KEY).await.unwrap_or_default()
    }

    async fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.read(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read '{}', starting without saved data: {}", key, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Saved data under '{}' is corrupt, ignoring it: {}", key, e);
                None
            }
        }
    }

    pub async fn save_plan(&self, plan: &LessonPlan) {
        self.save(PLAN_KEY, plan).await;
    }

    pub async fn save_form(&self, form: &FormData) {
        self.save(FORM_KEY, form).await;
    }

    async fn save<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(json_data) => {
                if let Err(e) = self.store.write(key, &json_data).await {
                    log::error!("Failed to persist '{}': {}", key, e);
                } else {
                    log::debug!("Persisted '{}' ({} bytes)", key, json_data.len());
                }
            }
            Err(e) => log::error!("Failed to serialize '{}' for persistence: {}", key, e),
        }
    }

    /// Remove both blobs.
    pub async fn clear(&self) {
        for key in [PLAN_KEY, FORM_KEY] {
            if let Err(e) = self.store.remove(key).await {
                log::error!("Failed to clear '{}': {}", key, e);
            }
        }
    }

    pub async fn apply(&self, pending: PendingWrites) {
        if pending.clear {
            self.clear().await;
        }
        if let Some(plan) = pending.plan {
            self.save_plan(&plan).await;
        }
        if let Some(form) = pending.form {
            self.save_form(&form).await;
        }
    }
}

/// Runs until every sender is dropped, batching writes that arrive within
/// `debounce` of each other.
pub async fn start_persistence_worker(
    mut receiver: mpsc::Receiver<PersistCommand>,
    store: PlanStore,
    debounce: Duration,
) {
    log::info!("Lesson plan persistence worker started");

    while let Some(command) = receiver.recv().await {
        let mut pending = PendingWrites::default();
        pending.push(command);
        while let Ok(newer) = receiver.try_recv() {
            log::debug!("Batching pending lesson plan write");
            pending.push(newer);
        }

        tokio::time::sleep(debounce).await;

        // Pick up anything that arrived during the delay
        while let Ok(newer) = receiver.try_recv() {
            log::debug!("Batching lesson plan write after debounce delay");
            pending.push(newer);
        }

        store.apply(pending).await;
    }

    log::info!("Lesson plan persistence worker stopped");
}
