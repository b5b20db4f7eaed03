//! `agentctl cleanup`: delete the deployed agent and its dedicated bucket.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::cleanup::cleanup_deployment;
use crate::domain::CleanupOutcome;

/// Arguments for the cleanup command.
#[derive(Args)]
pub struct CleanupArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run the cleanup command.
///
/// # Errors
///
/// Returns an error if the record or the confirmation cannot be read, or if
/// any deletion failed.
pub async fn run(app: &AppContext) -> Result<()> {
    let Some(record) = super::load_record(app).await? else {
        return Ok(());
    };

    let renderer = app.renderer();
    renderer.record("Cleanup", &record);

    let cloud = app.cloud(&record.region);
    let outcome = cleanup_deployment(
        &cloud,
        &app.prompt(),
        &app.reporter(),
        &record,
        app.settings.storage.mode,
    )
    .await?;
    renderer.cleanup(&outcome)?;

    if let CleanupOutcome::Completed(report) = &outcome
        && report.has_failures()
    {
        anyhow::bail!("cleanup finished with failures");
    }
    Ok(())
}
