use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cur_report::render::{render_report, OutputFormat};
use cur_report::server;
use cur_report_core::{
    ingestion::inspect_upload,
    process_parquet_bytes,
    summary::{ReportSummary, DEFAULT_TOP_ITEMS},
    ServiceConfig,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "AWS cost and usage report analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the upload API server
    Serve(ServeArgs),
    /// Build a consumption report from a local Parquet file
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to listen on (overrides CUR_REPORT_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Path to the Parquet export
    path: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Include per-unit totals and top consumers
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Report(args) => report(config, args),
    }
}

async fn serve(mut config: ServiceConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(
        max_file_size = config.upload.max_file_size,
        max_records = config.processing.max_records,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, server::router(config).into_make_service()).await?;
    Ok(())
}

fn report(config: ServiceConfig, args: ReportArgs) -> Result<()> {
    let contents = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let file_name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let digest = inspect_upload(&file_name, &contents, &config.upload)?;
    info!(file_name = %digest.file_name, size = digest.size, hash = %digest.hash, "processing file");

    let records = process_parquet_bytes(&contents, &config.processing)?;
    let summary = args
        .summary
        .then(|| ReportSummary::from_records(&records, DEFAULT_TOP_ITEMS));

    render_report(&records, summary.as_ref(), args.format, std::io::stdout().lock())
}
