//! Lesson plan renderers.
//!
//! [`outline`] decides what appears and in which order; each renderer only
//! lays the outline out:
//! - [`preview`] - HTML fragment with editable text areas
//! - [`html`] - standalone HTML page
//! - [`docx`] - WordprocessingML document
//! - [`pdf`] - Typst source compiled by [`engine::TypstEngine`]

pub mod common;
pub mod docx;
pub mod engine;
pub mod html;
pub mod outline;
pub mod pdf;
pub mod preview;

pub use engine::TypstEngine;
pub use outline::{build_outline, Block, Outline, SectionBlock};

use crate::lesson_plan::{LessonPlan, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Base name of every exported file.
pub const FILE_STEM: &str = "Perencanaan_Pembelajaran";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build DOCX package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write DOCX part: {0}")]
    WritePart(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Docx,
    Pdf,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Docx, ExportFormat::Pdf, ExportFormat::Html];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }

    pub fn filename(&self) -> String {
        format!("{}.{}", FILE_STEM, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(format!(
                "Format ekspor '{}' tidak didukung. Gunakan docx, pdf, atau html",
                other
            )),
        }
    }
}

/// Named colours offered for the document header.
pub const THEME_COLORS: [(&str, &str); 12] = [
    ("Arang", "#343a40"),
    ("Biru Laut", "#001f3f"),
    ("Hijau Hutan", "#004d40"),
    ("Ungu Tua", "#311b92"),
    ("Merah Marun", "#800000"),
    ("Abu Batu", "#2f4f4f"),
    ("Biru Malam", "#191970"),
    ("Darah Sapi", "#4a0404"),
    ("Biru Prusia", "#003153"),
    ("Zaitun Tua", "#556b2f"),
    ("Nila", "#4b0082"),
    ("Hijau Toska", "#008080"),
];

/// A validated `#rrggbb` colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColor(String);

impl ThemeColor {
    /// Accepts `#rgb`, `#rrggbb`, with or without the leading `#`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_theme_color(value));
        }

        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(ValidationError::invalid_theme_color(value)),
        };
        Ok(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    /// Missing or blank input falls back to the default colour.
    pub fn from_query(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::parse(v),
            _ => Ok(Self::default()),
        }
    }

    pub fn hex(&self) -> &str {
        &self.0
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self(THEME_COLORS[0].1.to_string())
    }
}

/// A rendered file ready to download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        let filename = format.filename();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }
}

/// Render the plan in one format. PDF output blocks on the Typst CLI.
pub fn export(
    plan: &LessonPlan,
    format: ExportFormat,
    theme: &ThemeColor,
    engine: &TypstEngine,
) -> Result<ExportedDocument, ExportError> {
    let outline = build_outline(plan);
    let bytes = match format {
        ExportFormat::Html => html::render_page(&outline, theme).into_bytes(),
        ExportFormat::Docx => docx::render(&outline)?,
        ExportFormat::Pdf => engine.compile(&pdf::render_source(&outline, theme))?,
    };
    log::info!("Exported lesson plan as {} ({} bytes)", format, bytes.len());
    Ok(ExportedDocument::new(format, bytes))
}
