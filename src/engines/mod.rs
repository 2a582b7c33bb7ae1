pub mod docx;
mod extract;
mod libreoffice;
mod poppler;

pub use extract::PdfExtractEngine;
pub use libreoffice::LibreOfficeEngine;
pub use poppler::PopplerEngine;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Conversion options passed to engines
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Bound on any external converter process
    pub timeout: Duration,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
        }
    }
}

/// Engine identity, also the `strategy_used` value in the result envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineType {
    LibreOffice,
    Poppler,
    PdfExtract,
}

impl EngineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineType::LibreOffice => "libreoffice",
            EngineType::Poppler => "poppler",
            EngineType::PdfExtract => "pdf-extract",
        }
    }
}

/// Trait that all conversion engines must implement
#[async_trait]
pub trait ConvertEngine: Send + Sync {
    /// Get the engine type
    fn engine_type(&self) -> EngineType;

    /// Check if the engine is available (dependencies installed)
    async fn is_available(&self) -> bool;

    /// Convert the input PDF, leaving the document at `output` on success
    async fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()>;
}
