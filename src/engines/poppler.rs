use super::{docx, ConvertEngine, ConvertOptions, EngineType};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// Text-layout engine backed by poppler's pdftotext, paragraphs re-flowed
/// into a DOCX.
pub struct PopplerEngine {
    /// Path to the pdftotext executable
    pdftotext_path: Option<String>,
}

impl PopplerEngine {
    pub fn new() -> Self {
        Self {
            pdftotext_path: None,
        }
    }

    #[cfg(test)]
    pub fn with_pdftotext_path(mut self, path: String) -> Self {
        self.pdftotext_path = Some(path);
        self
    }

    fn get_pdftotext_path(&self) -> String {
        // First check instance config
        if let Some(path) = &self.pdftotext_path {
            return path.clone();
        }

        // Then check environment variable
        if let Ok(path) = std::env::var("PDFTOTEXT_PATH") {
            return path;
        }

        // Fall back to default
        "pdftotext".to_string()
    }

    async fn extract_text(&self, input_path: &Path, limit: Duration) -> Result<String> {
        let pdftotext_path = self.get_pdftotext_path();

        let child = Command::new(pdftotext_path)
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(input_path)
            .arg("-")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::EngineNotAvailable(format!("pdftotext not found: {}", e)))?;

        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => return Err(AppError::Timeout(limit)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ConversionFailed(format!(
                "pdftotext failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PopplerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConvertEngine for PopplerEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Poppler
    }

    async fn is_available(&self) -> bool {
        let pdftotext_path = self.get_pdftotext_path();
        Command::new(pdftotext_path)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
        info!("converting {} with pdftotext", input.display());
        let text = self.extract_text(input, options.timeout).await?;

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
    async fn test_unavailable_when_pdftotext_missing() {
        let engine =
            PopplerEngine::new().with_pdftotext_path("/nonexistent/pdftotext".to_string());
        assert!(!engine.is_available().await);
    }

    #[tokio::test]
    async fn test_convert_reports_missing_executable() {
        let engine =
            PopplerEngine::new().with_pdftotext_path("/nonexistent/pdftotext".to_string());
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let err = engine
            .convert(&input, &dir.path().join("out.docx"), &ConvertOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EngineNotAvailable(_)));
    }
}
