use super::{ConvertEngine, ConvertOptions, EngineType};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// Full-fidelity engine backed by a headless LibreOffice process.
pub struct LibreOfficeEngine {
    /// Path to LibreOffice/soffice executable
    soffice_path: Option<String>,
}

impl LibreOfficeEngine {
    pub fn new() -> Self {
        Self { soffice_path: None }
    }

    #[cfg(test)]
    pub fn with_soffice_path(mut self, path: String) -> Self {
        self.soffice_path = Some(path);
        self
    }

    fn get_soffice_path(&self) -> String {
        // First check instance config
        if let Some(path) = &self.soffice_path {
            return path.clone();
        }

        // Then check environment variable
        if let Ok(path) = std::env::var("SOFFICE_PATH") {
            return path;
        }

        // Fall back to OS-specific defaults
        if cfg!(target_os = "macos") {
            "/Applications/LibreOffice.app/Contents/MacOS/soffice".to_string()
        } else if cfg!(target_os = "windows") {
            r"C:\Program Files\LibreOffice\program\soffice.exe".to_string()
        } else {
            // Try common Linux paths
            for path in &["/usr/bin/soffice", "/usr/bin/libreoffice"] {
                if std::path::Path::new(path).exists() {
                    return path.to_string();
                }
            }
            "soffice".to_string()
        }
    }

    async fn convert_to_docx(
        &self,
        input_path: &Path,
        output_dir: &Path,
        limit: Duration,
    ) -> Result<()> {
        let soffice_path = self.get_soffice_path();

        let child = Command::new(soffice_path)
            .arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg("--outdir")
            .arg(output_dir)
            .arg(input_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::EngineNotAvailable(format!("LibreOffice not found: {}", e)))?;

        // Dropping the future on expiry kills the child via kill_on_drop
        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => return Err(AppError::Timeout(limit)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ConversionFailed(format!(
                "LibreOffice conversion failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for LibreOfficeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConvertEngine for LibreOfficeEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::LibreOffice
    }

    async fn is_available(&self) -> bool {
        let soffice_path = self.get_soffice_path();
        Command::new(soffice_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
        let temp_dir = tempfile::tempdir()?;

        info!("converting {} with LibreOffice", input.display());
        self.convert_to_docx(input, temp_dir.path(), options.timeout)
            .await?;

        // LibreOffice creates a DOCX with the same base name
        let input_stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
        let produced = temp_dir.path().join(format!("{}.docx", input_stem));

        if !produced.is_file() {
            return Err(AppError::OutputNotProduced(produced));
        }

        tokio::fs::copy(&produced, output).await?;

        Ok(())
    }
}
