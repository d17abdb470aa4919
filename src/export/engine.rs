//! Typst rendering engine.
//!
//! Writes Typst source to a temporary directory, invokes the compiler and
//! reads the resulting PDF back.

use std::fs;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::ExportError;

const SOURCE_FILE: &str = "rpp.typ";
const OUTPUT_FILE: &str = "rpp.pdf";

/// Runs the `typst` CLI found at `binary`.
#[derive(Debug, Clone)]
pub struct TypstEngine {
    binary: String,
}

impl TypstEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Compile a complete Typst document to PDF bytes.
    pub fn compile(&self, typst_source: &str) -> Result<Vec<u8>, ExportError> {
        let temp_dir = tempdir().map_err(ExportError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        fs::write(&typ_path, typst_source).map_err(ExportError::WriteTypst)?;

        self.compile_in(&temp_dir)
    }

    fn compile_in(&self, temp_dir: &TempDir) -> Result<Vec<u8>, ExportError> {
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        let output = Command::new(&self.binary)
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .output()
            .map_err(ExportError::TypstIo)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("Typst compilation failed with status {}: {}", code, stderr);
            return Err(ExportError::TypstExit { code, stderr });
        }

        fs::read(&output_path).map_err(ExportError::ReadPdf)
    }
}

impl Default for TypstEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}
