#![allow(dead_code)]

use async_trait::async_trait;
use rpp_generator::ai::{AiError, ContentGenerator, GeneratedContent};
use rpp_generator::export::TypstEngine;
use rpp_generator::lesson_plan::{merge, CoreFacts, FormData, LessonPlan, PlanStore};
use rpp_generator::storage::MemoryStore;
use rpp_generator::LessonPlanService;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub fn sample_form() -> FormData {
    FormData {
        school_name: "SD Negeri 1 Cakung".to_string(),
        teacher_name: "Siti Aminah".to_string(),
        teacher_nip: "198001012005011001".to_string(),
        subject: "IPAS".to_string(),
        phase_class: "C / V / 1".to_string(),
        time_allocation: "2 x 35 menit".to_string(),
        school_year: "2025/2026".to_string(),
        subject_matter: "Siklus Air".to_string(),
        specific_material: "Penguapan dan kondensasi".to_string(),
        learning_outcomes: "Peserta didik memahami siklus air.".to_string(),
        learning_objectives: String::new(),
        signature_date: "Jakarta, 14 Juli 2025".to_string(),
        principal_name: "Budi Santoso".to_string(),
        principal_nip: "197501012000031002".to_string(),
    }
}

pub fn sample_content() -> GeneratedContent {
    GeneratedContent {
        student_profile: "Siswa aktif dan senang bereksperimen.".to_string(),
        graduate_profile_dimensions: vec![
            "Penalaran Kritis".to_string(),
            "Kolaborasi".to_string(),
        ],
        cross_discipline: "Matematika\nBahasa Indonesia".to_string(),
        learning_objectives: "1. Menjelaskan penguapan.\n2. Menjelaskan kondensasi.".to_string(),
        learning_topic: "Perjalanan Setetes Air".to_string(),
        pedagogical_practices: "1. Inquiry-Based Learning\n2. Diskusi kelompok".to_string(),
        learning_partnership: "Mengundang petugas BMKG.".to_string(),
        learning_environment: "Kelas dan halaman sekolah.".to_string(),
        digital_utilization: "Simulasi siklus air daring.".to_string(),
        initial_activities: "1. Salam dan doa\n2. Apersepsi tentang hujan".to_string(),
        core_activities: "Siswa dibagi menjadi kelompok.\n1. Amati gambar\nlihat detail awan\n2. Diskusi\n4. Presentasi"
            .to_string(),
        closing_activities: "1. Refleksi\n2. Umpan balik".to_string(),
        initial_assessment: "Kuis singkat.".to_string(),
        process_assessment: "1. Observasi\n2. Jurnal".to_string(),
        final_assessment: String::new(),
        student_worksheet: "1. Gambarkan siklus air.\n2. Jelaskan setiap tahap.".to_string(),
    }
}

pub fn sample_plan() -> LessonPlan {
    merge(&sample_form(), sample_content())
}

/// Scripted AI collaborator. A gated generator waits for a permit before
/// answering refine and regenerate calls.
#[derive(Default)]
pub struct MockGenerator {
    failing: AtomicBool,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> Result<(), AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AiError::Status {
                status: 503,
                body: "model overloaded".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, _facts: &CoreFacts) -> Result<GeneratedContent, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AiError::EmptyResponse);
        }
        Ok(sample_content())
    }

    async fn refine(
        &self,
        _section_label: &str,
        _current_text: &str,
        instruction: &str,
        _plan: &LessonPlan,
    ) -> Result<String, AiError> {
        self.answer().await?;
        Ok(format!("1. {}\n2. Langkah tambahan", instruction))
    }

    async fn regenerate(&self, _section_label: &str, _plan: &LessonPlan) -> Result<String, AiError> {
        self.answer().await?;
        Ok("1. Langkah baru\n2. Langkah kedua\n3. Langkah ketiga".to_string())
    }
}

pub async fn start_service(generator: Arc<MockGenerator>, memory: MemoryStore) -> LessonPlanService {
    LessonPlanService::start(
        generator,
        PlanStore::new(Arc::new(memory)),
        TypstEngine::new("typst-binary-that-does-not-exist"),
        Duration::from_millis(5),
    )
    .await
}

/// Polls until the persistence worker has written `key`.
pub async fn wait_for_key(memory: &MemoryStore, key: &str, present: bool) {
    for _ in 0..200 {
        if memory.contains(key).await == present {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("storage key '{}' never became present={}", key, present);
}
