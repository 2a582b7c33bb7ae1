use crate::engines::{
    ConvertEngine, ConvertOptions, EngineType, LibreOfficeEngine, PdfExtractEngine, PopplerEngine,
};
use crate::error::{AppError, EngineFailure, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single validated conversion request. Built once per invocation,
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ConvertRequest {
    /// Validate the input path and resolve the output target.
    ///
    /// Missing or non-regular inputs are fatal; no engine is attempted and
    /// no directory is created. With `strict` set, anything without a .pdf
    /// extension (case-insensitive) is rejected as well.
    pub fn new(input: &Path, target: &Path, strict: bool) -> Result<Self> {
        if !input.is_file() {
            return Err(AppError::NotFound(input.to_path_buf()));
        }

        if strict {
            let is_pdf = input
                .extension()
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if !is_pdf {
                return Err(AppError::InvalidInput(format!(
                    "expected a .pdf file: {}",
                    input.display()
                )));
            }
        }

        Ok(Self {
            input: input.to_path_buf(),
            output: resolve_output(input, target),
        })
    }
}

/// Directory targets get the input's base name with a .docx extension;
/// explicit file targets are used unmodified.
fn resolve_output(input: &Path, target: &Path) -> PathBuf {
    if is_dir_target(target) {
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
        target.join(format!("{}.docx", stem))
    } else {
        target.to_path_buf()
    }
}

/// A target counts as a directory if it already is one, or if it was spelled
/// with a trailing separator (it may not exist yet).
fn is_dir_target(target: &Path) -> bool {
    if target.is_dir() {
        return true;
    }
    let s = target.as_os_str().to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output_path: PathBuf,
    pub file_size_bytes: u64,
    pub engine: EngineType,
    /// Output went to the temp-dir fallback because the target was unwritable
    pub redirected: bool,
}

/// Pipeline that attempts conversion engines in order and falls back on
/// failure.
pub struct ConversionPipeline {
    engines: Vec<Arc<dyn ConvertEngine>>,
    /// Cached availability results from startup
    availability: HashMap<EngineType, bool>,
    options: ConvertOptions,
}

impl ConversionPipeline {
    pub async fn new(options: ConvertOptions) -> Self {
        let engines: Vec<Arc<dyn ConvertEngine>> = vec![
            Arc::new(LibreOfficeEngine::new()),
            Arc::new(PopplerEngine::new()),
            Arc::new(PdfExtractEngine::new()),
        ];
        Self::from_engines(engines, options).await
    }

    /// Build a pipeline over an explicit engine list, probing availability
    /// once up front.
    pub async fn from_engines(engines: Vec<Arc<dyn ConvertEngine>>, options: ConvertOptions) -> Self {
        let mut availability = HashMap::new();
        for engine in &engines {
            let available = engine.is_available().await;
            let status = if available { "✓" } else { "✗" };
            info!("{} {:?} engine", status, engine.engine_type());
            availability.insert(engine.engine_type(), available);
        }

        Self {
            engines,
            availability,
            options,
        }
    }

    /// Attempt engines in order until one produces a verified output file.
    ///
    /// Per-engine errors are recorded and trigger fallback to the next
    /// engine; if every engine fails the aggregate error carries one reason
    /// per engine. A success is only reported after the output file has been
    /// re-checked on disk.
    pub async fn convert(&self, request: &ConvertRequest) -> Result<Conversion> {
        let (output_path, redirected) = self.prepare_output(request)?;
        let mut failures: Vec<EngineFailure> = Vec::new();

        for engine in &self.engines {
            let kind = engine.engine_type();

            if !self.availability.get(&kind).copied().unwrap_or(false) {
                debug!("skipping {:?} engine, not available", kind);
                failures.push(EngineFailure {
                    engine: kind,
                    reason: "engine not available".to_string(),
                });
                continue;
            }

            let attempt = engine
                .convert(&request.input, &output_path, &self.options)
                .await
                .and_then(|()| verify_output(&output_path));

            match attempt {
                Ok(file_size_bytes) => {
                    info!(
                        "{:?} engine produced {} ({} bytes)",
                        kind,
                        output_path.display(),
                        file_size_bytes
                    );
                    return Ok(Conversion {
                        output_path,
                        file_size_bytes,
                        engine: kind,
                        redirected,
                    });
                }
                Err(e) => {
                    warn!("{:?} engine failed: {}", kind, e);
                    remove_partial(&output_path);
                    failures.push(EngineFailure {
                        engine: kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(AppError::AllEnginesFailed(failures))
    }

    /// Create the output directory, redirecting to a temp-dir fallback when
    /// the target is unwritable.
    fn prepare_output(&self, request: &ConvertRequest) -> Result<(PathBuf, bool)> {
        let parent = match request.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        match ensure_writable(&parent) {
            Ok(()) => Ok((request.output.clone(), false)),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let fallback = std::env::temp_dir().join("docxmill");
                ensure_writable(&fallback)
                    .map_err(|_| AppError::PermissionDenied(parent.clone()))?;

                let file_name = request
                    .output
                    .file_name()
                    .map(|n| n.to_os_string())
                    .unwrap_or_else(|| OsString::from("output.docx"));
                let redirected = fallback.join(file_name);

                warn!(
                    "output directory {} is not writable, redirecting to {}",
                    parent.display(),
                    redirected.display()
                );
                Ok((redirected, true))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Create `dir` and probe that files can actually be created inside it.
fn ensure_writable(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    tempfile::Builder::new()
        .prefix(".docxmill-probe")
        .tempfile_in(dir)?;
    Ok(())
}

/// Post-hoc check: success only counts if the file exists and is non-empty.
fn verify_output(path: &Path) -> Result<u64> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(meta.len()),
        _ => Err(AppError::OutputNotProduced(path.to_path_buf())),
    }
}

/// Drop whatever a failed engine left at the output path so the next attempt
/// (or the caller) never sees a partial file.
fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove partial output {}: {}", path.display(), e);
        }
    }
}
