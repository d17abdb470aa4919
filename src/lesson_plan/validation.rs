//! Form validation with messages for teachers.

use super::model::FormData;
use std::fmt;

/// A single failed check.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Wire name of the offending field
    pub field: String,
    /// Message in Indonesian
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} tidak boleh kosong", label)).with_suggestion(format!(
            "Mohon isi {} dengan data yang valid",
            label.to_lowercase()
        ))
    }

    pub fn invalid_theme_color(value: &str) -> Self {
        Self::new("theme", format!("Warna tema '{}' tidak valid", value))
            .with_suggestion("Gunakan format heksadesimal, contoh: #343a40")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Every failed check of one submission.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Numbered summary shown to the teacher.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validasi gagal: {} kesalahan ditemukan\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("Mohon perbaiki data di atas dan coba lagi.".to_string());

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// NIP is required but free-form: "-", dotted NIPs and NUPTK numbers all
/// appear on real documents.
pub fn validate_nip(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    validate_required(value, field, label, errors);
}

/// Check everything the form needs before generation.
pub fn validate_form(form: &FormData) -> Result<(), String> {
    let mut errors = ValidationErrors::new();

    validate_required(&form.school_name, "schoolName", "Nama Sekolah", &mut errors);
    validate_required(&form.teacher_name, "teacherName", "Nama Guru", &mut errors);
    validate_nip(&form.teacher_nip, "teacherNip", "NIP Guru", &mut errors);
    validate_required(&form.subject, "subject", "Mata Pelajaran", &mut errors);
    validate_required(&form.phase_class, "phaseClass", "Fase/Kelas/Semester", &mut errors);
    validate_required(&form.time_allocation, "timeAllocation", "Alokasi Waktu", &mut errors);
    validate_required(&form.school_year, "schoolYear", "Tahun Pelajaran", &mut errors);
    validate_required(&form.subject_matter, "subjectMatter", "Materi Pelajaran", &mut errors);
    validate_required(
        &form.learning_outcomes,
        "learningOutcomes",
        "Capaian Pembelajaran",
        &mut errors,
    );
    validate_required(&form.signature_date, "signatureDate", "Tanggal Pengesahan", &mut errors);
    validate_required(&form.principal_name, "principalName", "Nama Kepala Sekolah", &mut errors);
    validate_nip(&form.principal_nip, "principalNip", "NIP Kepala Sekolah", &mut errors);

    errors.into_result()
}
