//! Command implementations

pub mod cleanup;
pub mod config;
pub mod deploy;
pub mod verify;
pub mod version;

use agentctl_common::DeploymentRecord;
use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::DeploymentStore as _;

/// Load the deployment record, telling the operator when there is none.
///
/// `Ok(None)` means "nothing deployed", which is not an error.
pub(crate) async fn load_record(app: &AppContext) -> Result<Option<DeploymentRecord>> {
    let store = app.record_store();
    let record = store.load_async().await?;
    if record.is_none() {
        app.renderer().no_record(store.path())?;
    }
    Ok(record)
}
