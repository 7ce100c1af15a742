use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use informes_common::clock::SystemClock;
use informes_common::config::Config;
use informes_core::git::GitCliPublisher;
use informes_core::service::ReportService;
use informes_core::storage::linker::LinkOutcome;

/// Runs a local file through the write, link and publish steps.
pub async fn publish(cfg: Config, file: PathBuf) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;

    let publisher = GitCliPublisher::from_config(&cfg);
    let service = ReportService::new(&cfg, Box::new(publisher), Box::new(SystemClock));
    let receipt = service.submit(Some(bytes)).await?;

    if receipt.link == LinkOutcome::MarkerMissing {
        info!(
            "{} was published without a link in index.html",
            receipt.report.filename
        );
    }
    info!("Published {}", receipt.report.path.display());
    Ok(())
}
