use anyhow::Result;
use quarry_domain::SmokeReport;
use quarry_services::{BedrockKnowledgeService, BedrockSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries the report for inspection.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarry_smoke=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = BedrockSettings::from_env()?;
    tracing::info!(model = %settings.model, knowledge_base = %settings.knowledge_base, "starting smoke test");

    let service = BedrockKnowledgeService::connect(settings.region.clone()).await?;
    let report = SmokeReport::new(&service, settings.model, settings.knowledge_base);

    // A collaborator fault terminates the run; this is a manual diagnostic,
    // not a production path.
    let mut stdout = std::io::stdout();
    report.run(&mut stdout).await?;

    Ok(())
}
