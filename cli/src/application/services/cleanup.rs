//! Application service: deployment teardown use-case.
//!
//! Nothing is deleted without an explicit `yes` from the operator. The agent
//! and the bucket are handled independently: a failure on one does not stop
//! the attempt on the other.

use agentctl_common::{DeploymentRecord, StorageMode};
use anyhow::{Context, Result};

use crate::application::ports::{
    AgentControlPlane, ObjectStore, OperatorPrompt, ProgressReporter, RemoteResult,
};
use crate::domain::{
    CleanupOutcome, CleanupReport, MAX_DELETE_BATCH, StepOutcome, VersionCursor, is_confirmed,
};

/// Confirm with the operator, then delete the agent and, for dedicated
/// storage, empty and delete its bucket.
///
/// `fallback_mode` decides bucket ownership for records that predate the
/// `storage_mode` field.
///
/// # Errors
///
/// Returns an error only if the confirmation cannot be read. Remote failures
/// are reported in the returned [`CleanupReport`].
pub async fn cleanup_deployment(
    cloud: &(impl AgentControlPlane + ObjectStore),
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    record: &DeploymentRecord,
    fallback_mode: StorageMode,
) -> Result<CleanupOutcome> {
    let bucket = record.owned_bucket(fallback_mode);
    let question = match bucket {
        Some(b) => format!("Delete agent {} and bucket {b}? (yes/no)", record.agent_name),
        None => format!("Delete agent {}? (yes/no)", record.agent_name),
    };
    let answer = prompt.ask(&question).context("reading confirmation")?;
    if !is_confirmed(&answer) {
        return Ok(CleanupOutcome::Cancelled);
    }

    reporter.step(&format!("deleting agent {}...", record.agent_id));
    let agent = match cloud.delete_agent(&record.agent_id, true).await {
        Ok(()) => {
            reporter.success("agent deleted");
            StepOutcome::Deleted
        }
        Err(e) => {
            reporter.error(&format!("cannot delete agent: {e}"));
            StepOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    let mut objects_deleted = 0;
    let bucket_outcome = match bucket {
        None => None,
        Some(b) => {
            reporter.step(&format!("emptying bucket {b}..."));
            let outcome = match empty_bucket(cloud, b).await {
                Ok(count) => {
                    objects_deleted = count;
                    reporter.step(&format!("deleting bucket {b} ({count} versions removed)..."));
                    match cloud.delete_bucket(b).await {
                        Ok(()) => {
                            reporter.success("bucket deleted");
                            StepOutcome::Deleted
                        }
                        Err(e) => {
                            reporter.error(&format!("cannot delete bucket: {e}"));
                            StepOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    }
                }
                Err(e) => {
                    reporter.error(&format!("cannot empty bucket, not deleting it: {e}"));
                    StepOutcome::Skipped {
                        reason: format!("emptying failed: {e}"),
                    }
                }
            };
            Some(outcome)
        }
    };

    Ok(CleanupOutcome::Completed(CleanupReport {
        agent_id: record.agent_id.clone(),
        agent,
        bucket: bucket.map(str::to_string),
        bucket_outcome,
        objects_deleted,
    }))
}

/// Delete every object version and delete marker, page by page, in batches
/// of at most [`MAX_DELETE_BATCH`]. Returns the number of entries deleted.
///
/// # Errors
///
/// Stops at the first failed listing or batch delete.
pub async fn empty_bucket(store: &impl ObjectStore, bucket: &str) -> RemoteResult<usize> {
    let mut cursor = VersionCursor::default();
    let mut deleted = 0;
    loop {
        let page = store.list_object_versions(bucket, &cursor).await?;
        let next = page.next.clone();
        let entries = page.into_entries();
        for batch in entries.chunks(MAX_DELETE_BATCH) {
            store.delete_objects(bucket, batch).await?;
            deleted += batch.len();
        }
        tracing::debug!(bucket, deleted, "emptied version page");
        match next {
            Some(c) => cursor = c,
            None => return Ok(deleted),
        }
    }
}
