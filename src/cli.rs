use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docxmill",
    version,
    about = "Convert PDF documents to DOCX with engine fallback",
    long_about = "Converts a PDF file to DOCX by trying conversion engines in order \
                  (LibreOffice, poppler's pdftotext, then a pure-Rust text extractor) \
                  and falling back on failure. Prints a single result line on stdout; \
                  diagnostics go to stderr."
)]
pub struct Cli {
    /// Path to the PDF file to convert
    pub input: PathBuf,

    /// Output .docx file, or a directory to place <input stem>.docx in
    pub output: PathBuf,

    /// Skip the .pdf extension check on the input file
    #[arg(long, default_value_t = false)]
    pub lenient: bool,

    /// Timeout in seconds for external converter processes
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,

    /// Result format printed to stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
