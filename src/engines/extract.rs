use super::{docx, ConvertEngine, ConvertOptions, EngineType};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::task;
use tracing::info;

/// Pure-Rust fallback engine: in-process text extraction via the pdf-extract
/// crate. Always available, lowest fidelity.
pub struct PdfExtractEngine;

impl PdfExtractEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConvertEngine for PdfExtractEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::PdfExtract
    }

    async fn is_available(&self) -> bool {
        // Compiled in, nothing to probe
        true
    }

    async fn convert(&self, input: &Path, output: &Path, _options: &ConvertOptions) -> Result<()> {
        info!("converting {} with pdf-extract", input.display());

        let input_path = input.to_path_buf();
        let text = task::spawn_blocking(move || pdf_extract::extract_text(&input_path))
            .await
            .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
            .map_err(|e| {
                AppError::ConversionFailed(format!(
                    "pdf-extract could not read {}: {}",
                    input.display(),
                    e
                ))
            })?;

        let pages = docx::split_pages(&text);
        if pages.is_empty() {
            return Err(AppError::ConversionFailed(format!(
                "no extractable text in {}",
                input.display()
            )));
        }

        docx::write_docx(&pages, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_available() {
        assert!(PdfExtractEngine::new().is_available().await);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_a_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"%PDF-1.4\nnot a real pdf").unwrap();

        let err = PdfExtractEngine::new()
            .convert(&input, &dir.path().join("out.docx"), &ConvertOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConversionFailed(_)));
    }
}
