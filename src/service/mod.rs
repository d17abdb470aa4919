//! Lesson plan service - every user action goes through here.
//!
//! The current plan and form draft live in memory behind `RwLock`s and are
//! persisted in the background. AI calls are limited to one per section
//! and exports to one per format.

pub mod in_flight;

pub use in_flight::{InFlight, InFlightGuard};

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ai::{AiError, ContentGenerator};
use crate::export::outline::display_text;
use crate::export::preview::{render_fragment, PreviewMode};
use crate::export::{
    build_outline, export, ExportError, ExportFormat, ExportedDocument, ThemeColor, TypstEngine,
};
use crate::lesson_plan::persistence::start_persistence_worker;
use crate::lesson_plan::{
    merge, validate_form, FormData, LessonPlan, PersistCommand, PlanStore, SectionKey,
    SectionValue, UnknownSectionKey,
};
use crate::text::{parse_section, ParsedSection};

const PERSIST_QUEUE: usize = 100;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Belum ada RPP. Silakan isi formulir dan buat RPP terlebih dahulu.")]
    NoPlan,
    #[error(transparent)]
    UnknownSection(#[from] UnknownSectionKey),
    #[error("Bagian \"{0}\" tidak dapat disunting dengan AI")]
    NotEditable(&'static str),
    #[error("Pembuatan RPP sedang berlangsung. Tunggu hingga selesai.")]
    GenerationBusy,
    #[error("Bagian \"{0}\" sedang diproses oleh AI. Tunggu hingga selesai.")]
    SectionBusy(&'static str),
    #[error("Ekspor {0} sedang berjalan. Tunggu hingga selesai.")]
    ExportBusy(ExportFormat),
    #[error("{message}")]
    Ai {
        message: String,
        #[source]
        source: AiError,
    },
    #[error("Gagal membuat dokumen {format}.")]
    Export {
        format: ExportFormat,
        #[source]
        source: ExportError,
    },
    #[error("Tugas latar belakang gagal: {0}")]
    Task(String),
}

pub struct LessonPlanService {
    plan: RwLock<Option<LessonPlan>>,
    form: RwLock<FormData>,
    generator: Arc<dyn ContentGenerator>,
    engine: TypstEngine,
    persist_sender: mpsc::Sender<PersistCommand>,
    generation: InFlight<()>,
    sections: InFlight<SectionKey>,
    exports: InFlight<ExportFormat>,
}

impl LessonPlanService {
    /// Restore saved state and spawn the persistence worker.
    pub async fn start(
        generator: Arc<dyn ContentGenerator>,
        store: PlanStore,
        engine: TypstEngine,
        debounce: Duration,
    ) -> Self {
        let plan = store.load_plan().await;
        let form = store.load_form().await;
        if plan.is_some() {
            log::info!("Restored saved lesson plan");
        }

        let (persist_sender, receiver) = mpsc::channel(PERSIST_QUEUE);
        tokio::spawn(async move {
            start_persistence_worker(receiver, store, debounce).await;
        });

        Self {
            plan: RwLock::new(plan),
            form: RwLock::new(form),
            generator,
            engine,
            persist_sender,
            generation: InFlight::new(),
            sections: InFlight::new(),
            exports: InFlight::new(),
        }
    }

    async fn persist(&self, command: PersistCommand) {
        if let Err(e) = self.persist_sender.send(command).await {
            log::error!("Failed to queue lesson plan data for persistence: {}", e);
        } else {
            log::debug!("Lesson plan data queued for background persistence");
        }
    }

    pub fn current_plan(&self) -> Result<LessonPlan, ServiceError> {
        self.plan.read().clone().ok_or(ServiceError::NoPlan)
    }

    pub fn form_data(&self) -> FormData {
        self.form.read().clone()
    }

    pub async fn save_form(&self, form: FormData) -> FormData {
        *self.form.write() = form.clone();
        self.persist(PersistCommand::SaveForm(form.clone())).await;
        form
    }

    /// Validate the form, ask the AI for every section and replace the plan.
    pub async fn generate(&self, form: FormData) -> Result<LessonPlan, ServiceError> {
        validate_form(&form).map_err(ServiceError::Validation)?;
        let _guard = self
            .generation
            .try_acquire(())
            .ok_or(ServiceError::GenerationBusy)?;

        self.save_form(form.clone()).await;

        let content = self
            .generator
            .generate(&form.core_facts())
            .await
            .map_err(|source| {
                log::error!("AI content generation failed: {}", source);
                ServiceError::Ai {
                    message: "Gagal menghasilkan konten RPP dari AI.".to_string(),
                    source,
                }
            })?;

        let plan = merge(&form, content);
        *self.plan.write() = Some(plan.clone());
        self.persist(PersistCommand::SavePlan(plan.clone())).await;
        log::info!("Generated lesson plan for '{}'", plan.subject);
        Ok(plan)
    }

    /// Replace one section with the teacher's edit.
    pub async fn update_section(
        &self,
        key: SectionKey,
        value: SectionValue,
    ) -> Result<LessonPlan, ServiceError> {
        let plan = {
            let mut guard = self.plan.write();
            let plan = guard.as_mut().ok_or(ServiceError::NoPlan)?;
            plan.set(key, value)
                .map_err(|e| ServiceError::Validation(e.to_string()))?;
            plan.clone()
        };
        self.persist(PersistCommand::SavePlan(plan.clone())).await;
        Ok(plan)
    }

    fn claim_section(&self, key: SectionKey) -> Result<InFlightGuard<SectionKey>, ServiceError> {
        if !key.is_editable() {
            return Err(ServiceError::NotEditable(key.label()));
        }
        self.sections
            .try_acquire(key)
            .ok_or(ServiceError::SectionBusy(key.label()))
    }

    /// Write an AI result into the plan only if the plan still exists.
    async fn store_section_text(
        &self,
        key: SectionKey,
        text: String,
    ) -> Result<LessonPlan, ServiceError> {
        let plan = {
            let mut guard = self.plan.write();
            let plan = guard.as_mut().ok_or(ServiceError::NoPlan)?;
            plan.set_text(key, text);
            plan.clone()
        };
        self.persist(PersistCommand::SavePlan(plan.clone())).await;
        Ok(plan)
    }

    /// Ask the AI to rewrite one section following an instruction.
    pub async fn refine(
        &self,
        key: SectionKey,
        instruction: &str,
    ) -> Result<LessonPlan, ServiceError> {
        if instruction.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Instruksi penyempurnaan tidak boleh kosong".to_string(),
            ));
        }
        let snapshot = self.current_plan()?;
        let _guard = self.claim_section(key)?;
        let label = key.label();
        let current = snapshot.text(key).unwrap_or_default().to_string();

        let text = self
            .generator
            .refine(label, &current, instruction, &snapshot)
            .await
            .map_err(|source| {
                log::error!("AI section refinement failed for {}: {}", key, source);
                ServiceError::Ai {
                    message: format!("Gagal menyempurnakan bagian \"{}\".", label),
                    source,
                }
            })?;

        log::info!("Refined section {}", key);
        self.store_section_text(key, text).await
    }

    /// Ask the AI to write one section again from scratch.
    pub async fn regenerate(&self, key: SectionKey) -> Result<LessonPlan, ServiceError> {
        let snapshot = self.current_plan()?;
        let _guard = self.claim_section(key)?;
        let label = key.label();

        let text = self
            .generator
            .regenerate(label, &snapshot)
            .await
            .map_err(|source| {
                log::error!("AI section regeneration failed for {}: {}", key, source);
                ServiceError::Ai {
                    message: format!("Gagal membuat ulang bagian \"{}\".", label),
                    source,
                }
            })?;

        log::info!("Regenerated section {}", key);
        self.store_section_text(key, text).await
    }

    /// How the renderers see one section.
    pub fn parsed_section(&self, key: SectionKey) -> Result<ParsedSection, ServiceError> {
        let plan = self.current_plan()?;
        Ok(match display_text(&plan, key) {
            Some(text) => parse_section(&text),
            None => ParsedSection::Paragraph(String::new()),
        })
    }

    pub fn preview(&self, theme: &ThemeColor) -> Result<String, ServiceError> {
        let plan = self.current_plan()?;
        Ok(render_fragment(&build_outline(&plan), theme, PreviewMode::Editable))
    }

    /// Render the current plan. Fails fast if the same format is running.
    pub async fn export(
        &self,
        format: ExportFormat,
        theme: ThemeColor,
    ) -> Result<ExportedDocument, ServiceError> {
        let plan = self.current_plan()?;
        let _guard = self
            .exports
            .try_acquire(format)
            .ok_or(ServiceError::ExportBusy(format))?;

        let engine = self.engine.clone();
        let result =
            tokio::task::spawn_blocking(move || export(&plan, format, &theme, &engine)).await;

        match result {
            Ok(Ok(document)) => Ok(document),
            Ok(Err(source)) => {
                log::error!("Export to {} failed: {}", format, source);
                Err(ServiceError::Export { format, source })
            }
            Err(e) => {
                log::error!("Export task for {} panicked or was cancelled: {}", format, e);
                Err(ServiceError::Task(e.to_string()))
            }
        }
    }

    pub fn active_exports(&self) -> Vec<ExportFormat> {
        let mut active = self.exports.active();
        active.sort_by_key(|f| f.extension());
        active
    }

    pub fn active_sections(&self) -> Vec<SectionKey> {
        let mut active = self.sections.active();
        active.sort_by_key(|k| k.as_str());
        active
    }

    /// Drop the plan and the form draft, in memory and in storage.
    pub async fn reset(&self) {
        *self.plan.write() = None;
        *self.form.write() = FormData::default();
        self.persist(PersistCommand::ClearAll).await;
        log::info!("Lesson plan reset");
    }
}
