mod catalog;

use anyhow::Result;
use quarry_domain::{Provisioner, VerificationStatus, succeeded_count};
use quarry_services::{DataApiExecutor, DataApiSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries the provisioning report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarry_provision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = DataApiSettings::from_env()?;
    let bar = "=".repeat(60);

    println!("{bar}");
    println!("Aurora PostgreSQL Database Initialization");
    println!("Using RDS Data API");
    println!("{bar}");
    println!("\nCluster: {}", settings.cluster_arn);
    println!("Database: {}\n", settings.database);

    let executor = DataApiExecutor::connect(settings).await?;
    let provisioner = Provisioner::new(executor);

    let operations = catalog::operations();
    let results = provisioner.apply(&operations).await;
    for result in &results {
        match &result.error {
            None => println!("ok {}", result.operation_name),
            Some(error) => println!("failed {}: {}", result.operation_name, error),
        }
    }
    println!("\n{}/{} statements succeeded", succeeded_count(&results), results.len());

    println!("\nVerifying database setup...");
    for outcome in provisioner.verify(&catalog::checks()).await {
        match outcome.status {
            VerificationStatus::Present { rows } => {
                // The table-listing check reports the discovered names.
                if outcome.description.starts_with("Tables") {
                    println!("ok {}: {rows:?}", outcome.description);
                } else {
                    println!("ok {}", outcome.description);
                }
            }
            VerificationStatus::Absent => println!("missing {}", outcome.description),
            VerificationStatus::Failed(error) => {
                println!("Error during verification: {error}");
            }
        }
    }

    println!("\n{bar}");
    println!("Database initialization complete!");
    println!("{bar}");

    // Partial failure is reported above, never via the exit code; the
    // statement list is idempotent and the operator re-runs it.
    Ok(())
}
