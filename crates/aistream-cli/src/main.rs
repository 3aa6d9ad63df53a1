//! aistream - print a streamed response as it arrives

mod cli;
mod config;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use aistream_core::{SessionSnapshot, StreamConsumer, StreamOptions, StreamSource};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use output::{ChunkPrinter, Summary};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?.merge_cli(&cli);
    init_logging(&config);

    let source = open_source(&cli).await?;
    let snapshot = consume(&config, source).await?;

    if config.summary {
        println!("{}", Summary::from(&snapshot).to_json()?);
    }

    match snapshot.error {
        Some(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Stream the source to stdout and return the finished session
async fn consume(config: &Config, source: StreamSource) -> Result<SessionSnapshot> {
    let printer = Arc::new(ChunkPrinter::stdout(config.show_chunks));
    let options = StreamOptions::new()
        .strict_utf8(config.strict_utf8)
        .on_chunk({
            let printer = printer.clone();
            move |chunk| printer.chunk(chunk)
        });
    let consumer = StreamConsumer::with_options(options);

    consumer.start(source).await;

    let snapshot = consumer.snapshot();
    printer
        .finish(&snapshot.text)
        .context("Failed to write output")?;
    info!("Printed {} chunks", printer.printed());
    Ok(snapshot)
}

/// Resolve the byte source from the arguments
async fn open_source(cli: &Cli) -> Result<StreamSource> {
    if let Some(url) = &cli.url {
        info!("Requesting {}", url);
        let response = reqwest::get(url)
            .await
            .with_context(|| format!("Request to {url} failed"))?;
        if !response.status().is_success() {
            warn!("{} returned {}, streaming body anyway", url, response.status());
        }
        return Ok(StreamSource::response(response));
    }

    match cli.input_path() {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(StreamSource::reader(file))
        }
        None => Ok(StreamSource::reader(tokio::io::stdin())),
    }
}

/// Logs go to stderr so stdout carries only the streamed text.
/// A subscriber that is already installed is kept.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
