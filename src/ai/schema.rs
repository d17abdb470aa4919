//! Expected shape of a full-generation response.

use crate::lesson_plan::model::labels_from_value;
use crate::lesson_plan::{SectionKey, GRADUATE_PROFILE_DIMENSIONS};
use crate::text::sanitize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::AiError;

/// The sixteen AI-authored sections, already sanitized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratedContent {
    pub student_profile: String,
    pub graduate_profile_dimensions: Vec<String>,
    pub cross_discipline: String,
    pub learning_objectives: String,
    pub learning_topic: String,
    pub pedagogical_practices: String,
    pub learning_partnership: String,
    pub learning_environment: String,
    pub digital_utilization: String,
    pub initial_activities: String,
    pub core_activities: String,
    pub closing_activities: String,
    pub initial_assessment: String,
    pub process_assessment: String,
    pub final_assessment: String,
    pub student_worksheet: String,
}

const LINE_PER_POINT: &str = "Jika ada beberapa poin, pisahkan dengan baris baru (\\n).";

fn field_description(key: SectionKey) -> String {
    match key {
        SectionKey::StudentProfile => "Deskripsi singkat profil umum siswa kelas ini, termasuk pengetahuan awal mereka yang relevan dengan mata pelajaran.".to_string(),
        SectionKey::GraduateProfileDimensions => format!(
            "Pilih 3 atau 4 dimensi yang paling relevan dari daftar ini: {}.",
            GRADUATE_PROFILE_DIMENSIONS.join(", ")
        ),
        SectionKey::CrossDiscipline => "Sebutkan beberapa disiplin ilmu atau mata pelajaran lain yang relevan dan terkait dengan materi ini.".to_string(),
        SectionKey::LearningObjectives => "Berdasarkan Capaian Pembelajaran, rumuskan beberapa Tujuan Pembelajaran yang spesifik dan terukur dalam format daftar bernomor. Pisahkan setiap tujuan dengan baris baru (\\n). Contoh: 1. Menjelaskan konsep X.\\n2. Menerapkan konsep Y.".to_string(),
        SectionKey::LearningTopic => "Judul atau topik utama pembelajaran yang menarik dan singkat, berdasarkan materi pelajaran.".to_string(),
        SectionKey::PedagogicalPractices => format!("Sarankan model, strategi, atau metode pembelajaran modern yang mendukung pembelajaran mendalam (contoh: Project-Based Learning, Inquiry-Based Learning, Flipped Classroom). {LINE_PER_POINT}"),
        SectionKey::LearningPartnership => format!("Berikan ide kemitraan pembelajaran, misalnya mengundang praktisi atau memanfaatkan sumber daya komunitas. {LINE_PER_POINT}"),
        SectionKey::LearningEnvironment => format!("Jelaskan lingkungan belajar ideal yang mengintegrasikan ruang fisik dan virtual. {LINE_PER_POINT}"),
        SectionKey::DigitalUtilization => format!("Sebutkan pemanfaatan teknologi digital spesifik, seperti platform atau simulasi. {LINE_PER_POINT}"),
        SectionKey::InitialActivities => "Rancang kegiatan awal pembelajaran yang berkesan dan bermakna (apersepsi). Jika ada beberapa langkah, pisahkan dengan baris baru (\\n).".to_string(),
        SectionKey::CoreActivities => "Rancang kegiatan inti yang berpusat pada siswa dan mendorong pemahaman mendalam, bukan hafalan. Sertakan langkah eksplorasi, aplikasi konsep, dan refleksi kritis. Pisahkan setiap langkah dengan baris baru (\\n).".to_string(),
        SectionKey::ClosingActivities => "Rancang kegiatan penutup yang berkesadaran, seperti refleksi atau umpan balik. Jika ada beberapa langkah, pisahkan dengan baris baru (\\n).".to_string(),
        SectionKey::InitialAssessment => "Sarankan asesmen awal (diagnostik) untuk mengukur pemahaman awal dan potensi miskonsepsi siswa. Jika ada beberapa metode, pisahkan dengan baris baru (\\n).".to_string(),
        SectionKey::ProcessAssessment => "Sarankan asesmen proses (formatif) untuk memantau pemahaman dan proses berpikir siswa selama pembelajaran. Jika ada beberapa metode, pisahkan dengan baris baru (\\n).".to_string(),
        SectionKey::FinalAssessment => "Sarankan asesmen akhir (sumatif) yang mengukur pemahaman konseptual dan kemampuan aplikasi, misalnya studi kasus, proyek, atau presentasi. Jika ada beberapa metode, pisahkan dengan baris baru (\\n).".to_string(),
        SectionKey::StudentWorksheet => "Buat Lembar Kerja Peserta Didik (LKPD) berisi aktivitas, pertanyaan, atau tugas yang selaras dengan kegiatan inti dan asesmen. Gunakan daftar bernomor untuk instruksi atau pertanyaan.".to_string(),
        other => other.label().to_string(),
    }
}

/// JSON schema sent with a full-generation request.
pub fn response_schema() -> Value {
    let mut properties = Map::new();
    for key in SectionKey::AI_AUTHORED {
        let property = if key.is_label_list() {
            json!({
                "type": "ARRAY",
                "description": field_description(key),
                "items": { "type": "STRING" }
            })
        } else {
            json!({
                "type": "STRING",
                "description": field_description(key)
            })
        };
        properties.insert(key.as_str().to_string(), property);
    }

    let required: Vec<&str> = SectionKey::AI_AUTHORED.iter().map(|k| k.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required
    })
}

/// Check a parsed response against the schema and clean it up.
///
/// The top level must be an object. Text fields that are missing or not
/// strings become empty, the dimension list keeps only string entries, and
/// every string is sanitized.
pub fn normalize_generated(value: Value) -> Result<GeneratedContent, AiError> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(AiError::Schema(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut cleaned = Map::new();
    for key in SectionKey::AI_AUTHORED {
        let name = key.as_str();
        let raw = object.remove(name).unwrap_or(Value::Null);

        let normalized = if key.is_label_list() {
            if !raw.is_array() {
                log::warn!("AI field '{}' is {}, using an empty list", name, json_kind(&raw));
            }
            let labels: Vec<Value> = labels_from_value(raw)
                .iter()
                .map(|label| sanitize(label))
                .filter(|label| !label.is_empty())
                .map(Value::String)
                .collect();
            Value::Array(labels)
        } else {
            match raw {
                Value::String(text) => Value::String(sanitize(&text)),
                other => {
                    log::warn!("AI field '{}' is {}, using empty text", name, json_kind(&other));
                    Value::String(String::new())
                }
            }
        };
        cleaned.insert(name.to_string(), normalized);
    }

    serde_json::from_value(Value::Object(cleaned)).map_err(AiError::InvalidJson)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_every_ai_section() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 16);
        assert_eq!(schema["properties"]["graduateProfileDimensions"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["coreActivities"]["type"], "STRING");
    }

    #[test]
    fn normalizes_wrong_types() {
        let content = normalize_generated(json!({
            "studentProfile": "**Aktif** dan kritis",
            "graduateProfileDimensions": "Kolaborasi",
            "coreActivities": 12,
            "learningTopic": "Siklus Air 1. Penguapan 2. Kondensasi"
        }))
        .unwrap();

        assert_eq!(content.student_profile, "Aktif dan kritis");
        assert!(content.graduate_profile_dimensions.is_empty());
        assert_eq!(content.core_activities, "");
        assert_eq!(content.learning_topic, "Siklus Air\n1. Penguapan\n2. Kondensasi");
    }

    #[test]
    fn rejects_non_object_response() {
        assert!(matches!(
            normalize_generated(json!(["a"])),
            Err(AiError::Schema(_))
        ));
    }

    #[test]
    fn sanitizes_dimension_labels() {
        let content = normalize_generated(json!({
            "graduateProfileDimensions": ["**Kolaborasi**", 7, "  Kemandirian "]
        }))
        .unwrap();
        assert_eq!(content.graduate_profile_dimensions, vec!["Kolaborasi", "Kemandirian"]);
    }
}
