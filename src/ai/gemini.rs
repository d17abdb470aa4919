//! Gemini `generateContent` over REST.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::prompts::{
    generation_prompt, refine_prompt, regenerate_prompt, GENERATE_TEMPERATURE,
    REFINE_TEMPERATURE, REGENERATE_TEMPERATURE,
};
use super::schema::{normalize_generated, response_schema, GeneratedContent};
use super::{AiError, ContentGenerator};
use crate::config::AiSettings;
use crate::lesson_plan::{CoreFacts, LessonPlan};
use crate::text::sanitize;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent("rpp-generator/1.0")
            .build()?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
        schema: Option<Value>,
    ) -> Result<String, AiError> {
        let mut generation_config = json!({ "temperature": temperature });
        if let Some(schema) = schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseSchema"] = schema;
        }

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        log::debug!("Calling {} (temperature {})", self.model, temperature);
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, facts: &CoreFacts) -> Result<GeneratedContent, AiError> {
        let text = self
            .generate_text(
                &generation_prompt(facts),
                GENERATE_TEMPERATURE,
                Some(response_schema()),
            )
            .await?;
        let value: Value = serde_json::from_str(&text).map_err(AiError::InvalidJson)?;
        normalize_generated(value)
    }

    async fn refine(
        &self,
        section_label: &str,
        current_text: &str,
        instruction: &str,
        plan: &LessonPlan,
    ) -> Result<String, AiError> {
        let prompt = refine_prompt(section_label, current_text, instruction, plan);
        let text = self.generate_text(&prompt, REFINE_TEMPERATURE, None).await?;
        Ok(sanitize(&text))
    }

    async fn regenerate(&self, section_label: &str, plan: &LessonPlan) -> Result<String, AiError> {
        let prompt = regenerate_prompt(section_label, plan);
        let text = self.generate_text(&prompt, REGENERATE_TEMPERATURE, None).await?;
        Ok(sanitize(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "1. A" }, { "text": "\n2. B" }] } }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("1. A\n2. B"));
    }

    #[test]
    fn blank_candidates_are_empty() {
        let response: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(response.text().is_none());

        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn endpoint_uses_model_and_trimmed_base() {
        let client = GeminiClient::new(&AiSettings {
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            base_url: "https://example.test/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
