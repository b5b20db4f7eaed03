//! `agentctl deploy`: provision storage, create the agent and its alias.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::deploy_agent;

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if the settings are invalid or any deployment stage
/// fails. Resources created before the failing stage are listed on stderr.
pub async fn run(app: &AppContext) -> Result<()> {
    let settings = &app.settings;
    settings.validate()?;

    let renderer = app.renderer();
    renderer.target("Agent Deployment", settings);

    let cloud = app.cloud(&settings.region);
    let store = app.record_store();

    match deploy_agent(&cloud, &store, &app.pause(), &app.reporter(), settings).await {
        Ok(record) => renderer.deployed(&record, settings, store.path()),
        Err(e) => {
            renderer.deploy_failure(&e);
            Err(e.into())
        }
    }
}
