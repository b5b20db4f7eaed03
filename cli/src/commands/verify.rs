//! `agentctl verify`: check account permissions before deploying.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::verify::verify_permissions;

/// Run the verify command.
///
/// Failed checks are part of the report, not an error: the command exits 0
/// whatever the outcome.
///
/// # Errors
///
/// Returns an error only if the JSON report cannot be printed.
pub async fn run(app: &AppContext) -> Result<()> {
    let settings = &app.settings;
    let renderer = app.renderer();
    renderer.target("Permissions Verification", settings);

    let cloud = app.cloud(&settings.region);
    let report = verify_permissions(&cloud, settings, &app.reporter()).await;
    renderer.verification(&report)
}
