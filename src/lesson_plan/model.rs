use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Graduate-profile dimensions the AI may choose from.
pub const GRADUATE_PROFILE_DIMENSIONS: [&str; 8] = [
    "Keimanan dan ketaqwaan terhadap tuhan yang Maha Esa",
    "Kewargaan",
    "Penalaran Kritis",
    "Kreatifitas",
    "Kolaborasi",
    "Kemandirian",
    "Kesehatan",
    "Komunikasi",
];

/// The full lesson plan ("RPP").
///
/// Every field is always present; missing keys deserialize to empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonPlan {
    // Identity
    pub school_name: String,
    pub teacher_name: String,
    pub subject: String,
    pub phase_class: String,
    pub time_allocation: String,
    pub school_year: String,

    // Core facts entered by the teacher
    pub subject_matter: String,
    pub specific_material: String,
    pub learning_outcomes: String,

    // AI-authored content
    pub student_profile: String,
    #[serde(deserialize_with = "deserialize_labels")]
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

    // Signature block
    pub signature_date: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub teacher_nip: String,
}

/// Accepts any JSON value and keeps only the string entries of an array.
/// Anything that is not an array becomes an empty list.
pub fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(labels_from_value(value))
}

pub fn labels_from_value(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Every field of [`LessonPlan`], by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    SchoolName,
    TeacherName,
    Subject,
    PhaseClass,
    TimeAllocation,
    SchoolYear,
    SubjectMatter,
    SpecificMaterial,
    LearningOutcomes,
    StudentProfile,
    GraduateProfileDimensions,
    CrossDiscipline,
    LearningObjectives,
    LearningTopic,
    PedagogicalPractices,
    LearningPartnership,
    LearningEnvironment,
    DigitalUtilization,
    InitialActivities,
    CoreActivities,
    ClosingActivities,
    InitialAssessment,
    ProcessAssessment,
    FinalAssessment,
    StudentWorksheet,
    SignatureDate,
    PrincipalName,
    PrincipalNip,
    TeacherNip,
}

impl SectionKey {
    pub const ALL: [SectionKey; 29] = [
        SectionKey::SchoolName,
        SectionKey::TeacherName,
        SectionKey::Subject,
        SectionKey::PhaseClass,
        SectionKey::TimeAllocation,
        SectionKey::SchoolYear,
        SectionKey::SubjectMatter,
        SectionKey::SpecificMaterial,
        SectionKey::LearningOutcomes,
        SectionKey::StudentProfile,
        SectionKey::GraduateProfileDimensions,
        SectionKey::CrossDiscipline,
        SectionKey::LearningObjectives,
        SectionKey::LearningTopic,
        SectionKey::PedagogicalPractices,
        SectionKey::LearningPartnership,
        SectionKey::LearningEnvironment,
        SectionKey::DigitalUtilization,
        SectionKey::InitialActivities,
        SectionKey::CoreActivities,
        SectionKey::ClosingActivities,
        SectionKey::InitialAssessment,
        SectionKey::ProcessAssessment,
        SectionKey::FinalAssessment,
        SectionKey::StudentWorksheet,
        SectionKey::SignatureDate,
        SectionKey::PrincipalName,
        SectionKey::PrincipalNip,
        SectionKey::TeacherNip,
    ];

    /// Sections the AI writes in a full generation.
    pub const AI_AUTHORED: [SectionKey; 16] = [
        SectionKey::StudentProfile,
        SectionKey::GraduateProfileDimensions,
        SectionKey::CrossDiscipline,
        SectionKey::LearningObjectives,
        SectionKey::LearningTopic,
        SectionKey::PedagogicalPractices,
        SectionKey::LearningPartnership,
        SectionKey::LearningEnvironment,
        SectionKey::DigitalUtilization,
        SectionKey::InitialActivities,
        SectionKey::CoreActivities,
        SectionKey::ClosingActivities,
        SectionKey::InitialAssessment,
        SectionKey::ProcessAssessment,
        SectionKey::FinalAssessment,
        SectionKey::StudentWorksheet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::SchoolName => "schoolName",
            SectionKey::TeacherName => "teacherName",
            SectionKey::Subject => "subject",
            SectionKey::PhaseClass => "phaseClass",
            SectionKey::TimeAllocation => "timeAllocation",
            SectionKey::SchoolYear => "schoolYear",
            SectionKey::SubjectMatter => "subjectMatter",
            SectionKey::SpecificMaterial => "specificMaterial",
            SectionKey::LearningOutcomes => "learningOutcomes",
            SectionKey::StudentProfile => "studentProfile",
            SectionKey::GraduateProfileDimensions => "graduateProfileDimensions",
            SectionKey::CrossDiscipline => "crossDiscipline",
            SectionKey::LearningObjectives => "learningObjectives",
            SectionKey::LearningTopic => "learningTopic",
            SectionKey::PedagogicalPractices => "pedagogicalPractices",
            SectionKey::LearningPartnership => "learningPartnership",
            SectionKey::LearningEnvironment => "learningEnvironment",
            SectionKey::DigitalUtilization => "digitalUtilization",
            SectionKey::InitialActivities => "initialActivities",
            SectionKey::CoreActivities => "coreActivities",
            SectionKey::ClosingActivities => "closingActivities",
            SectionKey::InitialAssessment => "initialAssessment",
            SectionKey::ProcessAssessment => "processAssessment",
            SectionKey::FinalAssessment => "finalAssessment",
            SectionKey::StudentWorksheet => "studentWorksheet",
            SectionKey::SignatureDate => "signatureDate",
            SectionKey::PrincipalName => "principalName",
            SectionKey::PrincipalNip => "principalNip",
            SectionKey::TeacherNip => "teacherNip",
        }
    }

    /// Indonesian heading used in documents and AI prompts.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKey::SchoolName => "Nama Sekolah",
            SectionKey::TeacherName => "Nama Guru",
            SectionKey::Subject => "Mapel",
            SectionKey::PhaseClass => "Fase/Kelas/Smt",
            SectionKey::TimeAllocation => "Alokasi Waktu",
            SectionKey::SchoolYear => "Tahun Pelajaran",
            SectionKey::SubjectMatter => "Materi Pelajaran",
            SectionKey::SpecificMaterial => "Tambahan Materi Spesifik",
            SectionKey::LearningOutcomes => "Capaian Pembelajaran",
            SectionKey::StudentProfile => "Peserta Didik",
            SectionKey::GraduateProfileDimensions => "Dimensi Profil Lulusan",
            SectionKey::CrossDiscipline => "Lintas Disiplin Ilmu",
            SectionKey::LearningObjectives => "Tujuan Pembelajaran",
            SectionKey::LearningTopic => "Topik Pembelajaran",
            SectionKey::PedagogicalPractices => "Praktek pedagogis",
            SectionKey::LearningPartnership => "Kemitraan Pembelajaran",
            SectionKey::LearningEnvironment => "Lingkungan Pembelajaran",
            SectionKey::DigitalUtilization => "Pemanfaatan digital",
            SectionKey::InitialActivities => "Kegiatan Awal",
            SectionKey::CoreActivities => "Kegiatan Inti",
            SectionKey::ClosingActivities => "Kegiatan Penutup",
            SectionKey::InitialAssessment => "Asesmen Awal Pembelajaran",
            SectionKey::ProcessAssessment => "Asesmen Proses Pembelajaran",
            SectionKey::FinalAssessment => "Asesmen Akhir Pembelajaran",
            SectionKey::StudentWorksheet => "Lembar Kerja Peserta Didik (LKPD)",
            SectionKey::SignatureDate => "Tanggal Pengesahan",
            SectionKey::PrincipalName => "Nama Kepala Sekolah",
            SectionKey::PrincipalNip => "NIP Kepala Sekolah",
            SectionKey::TeacherNip => "NIP Guru",
        }
    }

    /// Sections shown as editable text areas with refine/regenerate actions.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            SectionKey::StudentProfile
                | SectionKey::LearningOutcomes
                | SectionKey::CrossDiscipline
                | SectionKey::LearningObjectives
                | SectionKey::LearningTopic
                | SectionKey::PedagogicalPractices
                | SectionKey::LearningPartnership
                | SectionKey::LearningEnvironment
                | SectionKey::DigitalUtilization
                | SectionKey::InitialActivities
                | SectionKey::CoreActivities
                | SectionKey::ClosingActivities
                | SectionKey::InitialAssessment
                | SectionKey::ProcessAssessment
                | SectionKey::FinalAssessment
                | SectionKey::StudentWorksheet
        )
    }

    pub fn is_label_list(&self) -> bool {
        matches!(self, SectionKey::GraduateProfileDimensions)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSectionKey(pub String);

impl fmt::Display for UnknownSectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bagian '{}' tidak dikenal", self.0)
    }
}

impl std::error::Error for UnknownSectionKey {}

impl FromStr for SectionKey {
    type Err = UnknownSectionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSectionKey(s.to_string()))
    }
}

/// New value for a single section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SectionValue {
    Text(String),
    Labels(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionValueMismatch {
    ExpectedText(SectionKey),
    ExpectedLabels(SectionKey),
}

impl fmt::Display for SectionValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionValueMismatch::ExpectedText(key) => {
                write!(f, "Bagian '{}' harus berupa teks", key.label())
            }
            SectionValueMismatch::ExpectedLabels(key) => {
                write!(f, "Bagian '{}' harus berupa daftar pilihan", key.label())
            }
        }
    }
}

impl std::error::Error for SectionValueMismatch {}

impl LessonPlan {
    /// Text of a section, or `None` for the label-list section.
    pub fn text(&self, key: SectionKey) -> Option<&str> {
        let value = match key {
            SectionKey::SchoolName => &self.school_name,
            SectionKey::TeacherName => &self.teacher_name,
            SectionKey::Subject => &self.subject,
            SectionKey::PhaseClass => &self.phase_class,
            SectionKey::TimeAllocation => &self.time_allocation,
            SectionKey::SchoolYear => &self.school_year,
            SectionKey::SubjectMatter => &self.subject_matter,
            SectionKey::SpecificMaterial => &self.specific_material,
            SectionKey::LearningOutcomes => &self.learning_outcomes,
            SectionKey::StudentProfile => &self.student_profile,
            SectionKey::GraduateProfileDimensions => return None,
            SectionKey::CrossDiscipline => &self.cross_discipline,
            SectionKey::LearningObjectives => &self.learning_objectives,
            SectionKey::LearningTopic => &self.learning_topic,
            SectionKey::PedagogicalPractices => &self.pedagogical_practices,
            SectionKey::LearningPartnership => &self.learning_partnership,
            SectionKey::LearningEnvironment => &self.learning_environment,
            SectionKey::DigitalUtilization => &self.digital_utilization,
            SectionKey::InitialActivities => &self.initial_activities,
            SectionKey::CoreActivities => &self.core_activities,
            SectionKey::ClosingActivities => &self.closing_activities,
            SectionKey::InitialAssessment => &self.initial_assessment,
            SectionKey::ProcessAssessment => &self.process_assessment,
            SectionKey::FinalAssessment => &self.final_assessment,
            SectionKey::StudentWorksheet => &self.student_worksheet,
            SectionKey::SignatureDate => &self.signature_date,
            SectionKey::PrincipalName => &self.principal_name,
            SectionKey::PrincipalNip => &self.principal_nip,
            SectionKey::TeacherNip => &self.teacher_nip,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, key: SectionKey) -> Option<&mut String> {
        let value = match key {
            SectionKey::SchoolName => &mut self.school_name,
            SectionKey::TeacherName => &mut self.teacher_name,
            SectionKey::Subject => &mut self.subject,
            SectionKey::PhaseClass => &mut self.phase_class,
            SectionKey::TimeAllocation => &mut self.time_allocation,
            SectionKey::SchoolYear => &mut self.school_year,
            SectionKey::SubjectMatter => &mut self.subject_matter,
            SectionKey::SpecificMaterial => &mut self.specific_material,
            SectionKey::LearningOutcomes => &mut self.learning_outcomes,
            SectionKey::StudentProfile => &mut self.student_profile,
            SectionKey::GraduateProfileDimensions => return None,
            SectionKey::CrossDiscipline => &mut self.cross_discipline,
            SectionKey::LearningObjectives => &mut self.learning_objectives,
            SectionKey::LearningTopic => &mut self.learning_topic,
            SectionKey::PedagogicalPractices => &mut self.pedagogical_practices,
            SectionKey::LearningPartnership => &mut self.learning_partnership,
            SectionKey::LearningEnvironment => &mut self.learning_environment,
            SectionKey::DigitalUtilization => &mut self.digital_utilization,
            SectionKey::InitialActivities => &mut self.initial_activities,
            SectionKey::CoreActivities => &mut self.core_activities,
            SectionKey::ClosingActivities => &mut self.closing_activities,
            SectionKey::InitialAssessment => &mut self.initial_assessment,
            SectionKey::ProcessAssessment => &mut self.process_assessment,
            SectionKey::FinalAssessment => &mut self.final_assessment,
            SectionKey::StudentWorksheet => &mut self.student_worksheet,
            SectionKey::SignatureDate => &mut self.signature_date,
            SectionKey::PrincipalName => &mut self.principal_name,
            SectionKey::PrincipalNip => &mut self.principal_nip,
            SectionKey::TeacherNip => &mut self.teacher_nip,
        };
        Some(value)
    }

    /// Current value of a section.
    pub fn get(&self, key: SectionKey) -> SectionValue {
        match self.text(key) {
            Some(text) => SectionValue::Text(text.to_string()),
            None => SectionValue::Labels(self.graduate_profile_dimensions.clone()),
        }
    }

    /// Replace a single section in place.
    pub fn set(&mut self, key: SectionKey, value: SectionValue) -> Result<(), SectionValueMismatch> {
        match (key.is_label_list(), value) {
            (true, SectionValue::Labels(labels)) => {
                self.graduate_profile_dimensions = labels;
                Ok(())
            }
            (true, SectionValue::Text(_)) => Err(SectionValueMismatch::ExpectedLabels(key)),
            (false, SectionValue::Text(text)) => {
                if let Some(slot) = self.text_mut(key) {
                    *slot = text;
                }
                Ok(())
            }
            (false, SectionValue::Labels(_)) => Err(SectionValueMismatch::ExpectedText(key)),
        }
    }

    /// Replace the text of a section. Ignored for the label-list section.
    pub fn set_text(&mut self, key: SectionKey, text: impl Into<String>) {
        if let Some(slot) = self.text_mut(key) {
            *slot = text.into();
        }
    }

    /// True when a section has nothing to display.
    pub fn is_blank(&self, key: SectionKey) -> bool {
        match self.text(key) {
            Some(text) => text.trim().is_empty(),
            None => self.graduate_profile_dimensions.is_empty(),
        }
    }
}

/// The form the teacher fills in before generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    pub school_name: String,
    pub teacher_name: String,
    pub teacher_nip: String,
    pub subject: String,
    pub phase_class: String,
    pub time_allocation: String,
    pub school_year: String,
    pub subject_matter: String,
    pub specific_material: String,
    pub learning_outcomes: String,
    pub learning_objectives: String,
    pub signature_date: String,
    pub principal_name: String,
    pub principal_nip: String,
}

/// The facts the AI expands into a full plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreFacts {
    pub subject: String,
    pub phase_class: String,
    pub subject_matter: String,
    pub specific_material: String,
    pub learning_outcomes: String,
    pub learning_objectives: String,
}

impl FormData {
    pub fn core_facts(&self) -> CoreFacts {
        CoreFacts {
            subject: self.subject.clone(),
            phase_class: self.phase_class.clone(),
            subject_matter: self.subject_matter.clone(),
            specific_material: self.specific_material.clone(),
            learning_outcomes: self.learning_outcomes.clone(),
            learning_objectives: self.learning_objectives.clone(),
        }
    }
}
