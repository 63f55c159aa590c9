//! Word-processing documents: handed off to an external converter.

use pdfconv_core::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Converts a word-processing document to PDF.
///
/// Implementations own no format logic; they delegate to some external
/// capability and report its failures as [`Error::ConversionError`].
pub trait DocumentConverter {
    fn convert(&self, doc_path: &Path, output_path: &Path) -> Result<()>;
}

/// Converts documents with a headless LibreOffice (`soffice`).
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: OsString,
}

impl SofficeConverter {
    /// Default program name, resolved through `PATH`.
    pub const DEFAULT_PROGRAM: &'static str = "soffice";

    /// Create a converter that runs `soffice` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: OsString::from(Self::DEFAULT_PROGRAM),
        }
    }

    /// Use a specific LibreOffice executable.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Path of the PDF LibreOffice writes for `doc_path` into `out_dir`.
    fn produced_pdf(doc_path: &Path, out_dir: &Path) -> PathBuf {
        let stem = doc_path
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| OsString::from("output"));
        let mut name = stem;
        name.push(".pdf");
        out_dir.join(name)
    }
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for SofficeConverter {
    fn convert(&self, doc_path: &Path, output_path: &Path) -> Result<()> {
        if !doc_path.is_file() {
            return Err(Error::ConversionError(format!(
                "{}: no such file",
                doc_path.display()
            )));
        }

        let out_dir = tempfile::tempdir()?;
        log::debug!(
            "Running {} on {}",
            self.program.to_string_lossy(),
            doc_path.display()
        );

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir.path())
            .arg(doc_path)
            .output()
            .map_err(|e| {
                Error::ConversionError(format!(
                    "Failed to launch {}; ensure LibreOffice is installed: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ConversionError(format!(
                "{} exited with status {}: {}",
                self.program.to_string_lossy(),
                output.status,
                stderr.trim()
            )));
        }

        let produced = Self::produced_pdf(doc_path, out_dir.path());
        if !produced.is_file() {
            return Err(Error::ConversionError(format!(
                "{} produced no PDF for {}",
                self.program.to_string_lossy(),
                doc_path.display()
            )));
        }

        fs::copy(&produced, output_path)
            .map_err(|e| Error::WriteError(format!("{}: {}", output_path.display(), e)))?;
        Ok(())
    }
}
