use storyblok_algolia_indexer::{SyncConfig, SyncPipeline, SyncStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = SyncConfig::from_env()?;
    tracing::info!(
        "Syncing {} content (starts_with={:?}, per_page={}) into {:?}",
        config.query.version.as_str(),
        config.query.starts_with,
        config.query.per_page,
        config.mode
    );

    let pipeline = SyncPipeline::from_config(config)?;
    let report = pipeline.run().await?;

    for failure in &report.failed_pages {
        tracing::error!("  - page {} failed: {}", failure.page, failure.error);
    }
    for (partition, error) in report.failures() {
        tracing::error!("  - partition {:?} failed: {}", partition.key, error);
    }

    tracing::info!(
        "Run {}: {} entries, {} records, {} written",
        report.run_id,
        report.total,
        report.records,
        report.written()
    );

    if report.status() == SyncStatus::CompletedWithErrors {
        anyhow::bail!("sync completed with errors");
    }

    Ok(())
}
