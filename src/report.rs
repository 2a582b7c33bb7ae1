use crate::cli::ReportFormat;
use crate::error::{AppError, Result};
use crate::pipeline::Conversion;
use serde::Serialize;

/// Single-line success record, the machine-readable boundary contract.
#[derive(Serialize)]
struct SuccessEnvelope<'a> {
    status: &'static str,
    output_path: String,
    file_size_bytes: u64,
    strategy_used: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirected: Option<bool>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// Print exactly one result line to stdout and return the process exit code.
pub fn emit(outcome: &Result<Conversion>, format: ReportFormat) -> i32 {
    match outcome {
        Ok(conversion) => {
            match format {
                ReportFormat::Json => {
                    let envelope = SuccessEnvelope {
                        status: "success",
                        output_path: conversion.output_path.display().to_string(),
                        file_size_bytes: conversion.file_size_bytes,
                        strategy_used: conversion.engine.as_str(),
                        redirected: conversion.redirected.then_some(true),
                    };
                    println!("{}", to_line(&envelope));
                }
                ReportFormat::Text => {
                    let note = if conversion.redirected {
                        " [redirected to temp dir]"
                    } else {
                        ""
                    };
                    println!(
                        "Conversion completed: {} ({} bytes, {}){}",
                        conversion.output_path.display(),
                        conversion.file_size_bytes,
                        conversion.engine.as_str(),
                        note
                    );
                }
            }
            0
        }
        Err(e) => {
            let detail = failure_detail(e);
            match format {
                ReportFormat::Json => {
                    let envelope = ErrorEnvelope {
                        status: "error",
                        message: e.to_string(),
                        detail,
                    };
                    println!("{}", to_line(&envelope));
                }
                ReportFormat::Text => match detail {
                    Some(detail) => println!("Conversion failed: {} ({})", e, detail),
                    None => println!("Conversion failed: {}", e),
                },
            }
            1
        }
    }
}

/// Per-engine reasons for an aggregate failure, one `engine: reason` pair
/// per attempted or skipped engine.
fn failure_detail(error: &AppError) -> Option<String> {
    match error {
        AppError::AllEnginesFailed(failures) => Some(
            failures
                .iter()
                .map(|f| format!("{}: {}", f.engine.as_str(), f.reason))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}

fn to_line<T: Serialize>(envelope: &T) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|_| {
        r#"{"status":"error","message":"failed to encode result envelope"}"#.to_string()
    })
}
