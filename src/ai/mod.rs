//! AI collaborator that writes and rewrites lesson plan sections.
//!
//! The service only sees [`ContentGenerator`]; [`GeminiClient`] is the
//! production implementation and tests plug in their own.

pub mod gemini;
pub mod prompts;
pub mod schema;

pub use gemini::GeminiClient;
pub use schema::{normalize_generated, response_schema, GeneratedContent};

use crate::lesson_plan::{CoreFacts, LessonPlan};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI response contained no text")]
    EmptyResponse,
    #[error("AI response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("AI response has an unexpected shape: {0}")]
    Schema(String),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Write every AI-authored section from the teacher's core facts.
    async fn generate(&self, facts: &CoreFacts) -> Result<GeneratedContent, AiError>;

    /// Rewrite one section following the teacher's instruction.
    async fn refine(
        &self,
        section_label: &str,
        current_text: &str,
        instruction: &str,
        plan: &LessonPlan,
    ) -> Result<String, AiError>;

    /// Write one section again from scratch.
    async fn regenerate(&self, section_label: &str, plan: &LessonPlan) -> Result<String, AiError>;
}
