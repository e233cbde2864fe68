use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use source_corrector::server::SourceCorrector;
use source_corrector::CorrectorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CorrectorConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint,
        model = %config.model,
        char_budget = config.char_budget,
        "using inference endpoint"
    );

    let corrector = SourceCorrector::new(config)?;

    tracing::info!("Starting source corrector MCP server");

    let service = corrector.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
