mod cli;
mod engines;
mod error;
mod pipeline;
mod report;

use clap::Parser;
use cli::Cli;
use engines::ConvertOptions;
use pipeline::{ConversionPipeline, ConvertRequest};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries only the result envelope
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docxmill=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = run(&cli).await;
    std::process::exit(code);
}

async fn run(cli: &Cli) -> i32 {
    let options = ConvertOptions {
        timeout: Duration::from_secs(cli.timeout),
    };

    let outcome = match ConvertRequest::new(&cli.input, &cli.output, !cli.lenient) {
        Ok(request) => {
            info!(
                "converting {} -> {}",
                request.input.display(),
                request.output.display()
            );
            let pipeline = ConversionPipeline::new(options).await;
            pipeline.convert(&request).await
        }
        Err(e) => Err(e),
    };

    report::emit(&outcome, cli.format)
}
