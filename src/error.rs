use crate::engines::EngineType;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One recorded reason for an engine that failed or was skipped
#[derive(Debug, Clone)]
pub struct EngineFailure {
    pub engine: EngineType,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("conversion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("no output file was produced at {}", .0.display())]
    OutputNotProduced(PathBuf),

    #[error("output location is not writable: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("no conversion engine succeeded")]
    AllEnginesFailed(Vec<EngineFailure>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
