use clap::{Parser, Subcommand};
use integra_bridge::application::report::ReportService;
use integra_bridge::application::transformer::IntegraTransformer;
use integra_bridge::config::{ServiceConfig, ZoneConfig};
use integra_bridge::infrastructure::hipalz::HipalzClient;
use integra_bridge::interfaces::http::router;
use integra_bridge::interfaces::json::payment_reader::PaymentReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the Integra export API over HTTP
    Serve(ServiceConfig),
    /// Convert a saved upstream response into an Integra document on stdout
    Transform {
        /// Upstream response body (JSON)
        input: PathBuf,

        #[command(flatten)]
        zone: ZoneConfig,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match Cli::parse().command {
        Command::Serve(config) => serve(config).await,
        Command::Transform { input, zone } => transform(input, zone),
    }
}

async fn serve(config: ServiceConfig) -> Result<()> {
    let client = HipalzClient::new(
        config.upstream_url.clone(),
        config.business_id.clone(),
        config.upstream_timeout(),
    )
    .into_diagnostic()?;
    let transformer = IntegraTransformer::new(config.zone.report_zone());
    let service = ReportService::new(Box::new(client), transformer, config.access_token.clone());

    let listener = TcpListener::bind(config.bind).await.into_diagnostic()?;
    tracing::info!(
        bind = %config.bind,
        upstream = %config.upstream_url,
        zone = %transformer.zone(),
        "Integra export API listening"
    );

    axum::serve(listener, router(Arc::new(service)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .into_diagnostic()
}

fn transform(input: PathBuf, zone: ZoneConfig) -> Result<()> {
    let file = File::open(&input).into_diagnostic()?;
    let records = PaymentReader::new(file).records().into_diagnostic()?;

    let outcome = IntegraTransformer::new(zone.report_zone()).transform(&records);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &outcome.report).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    eprintln!(
        "Exported {} transactions, skipped {} records",
        outcome.report.transactions.len(),
        outcome.rejected.len()
    );
    Ok(())
}
