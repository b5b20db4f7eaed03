//! Application service: agent deployment use-case.
//!
//! A strict pipeline: bucket (dedicated storage only), agent, prepare, alias,
//! record. Each stage gates the next. Nothing is rolled back; resources created
//! before a failing stage are listed in the returned [`DeployError`].

use agentctl_common::{DeploymentRecord, RECORD_SCHEMA_VERSION, StorageMode};
use chrono::Utc;

use crate::application::ports::{
    AUTO_DELETE_TAG, AgentControlPlane, CreateAgentRequest, DeploymentStore, ObjectStore, Pause,
    ProgressReporter,
};
use crate::domain::config::Settings;
use crate::domain::{DeployError, RemoteError, RemoteErrorKind};

/// Deploy the configured agent and persist its record.
///
/// # Errors
///
/// Returns the [`DeployError`] of the first failing stage. No record is
/// written unless every remote stage succeeded.
pub async fn deploy_agent(
    cloud: &(impl AgentControlPlane + ObjectStore),
    store: &impl DeploymentStore,
    pause: &impl Pause,
    reporter: &impl ProgressReporter,
    settings: &Settings,
) -> Result<DeploymentRecord, DeployError> {
    let mut orphaned = Vec::new();

    // Stage 1: dedicated bucket.
    if settings.storage.mode == StorageMode::Dedicated {
        let bucket = &settings.storage.bucket_name;
        let created = provision_bucket(cloud, settings, reporter)
            .await
            .map_err(|source| DeployError::Bucket {
                bucket: bucket.clone(),
                source,
            })?;
        if created {
            orphaned.push(format!("bucket {bucket}"));
        }
    }

    // Stage 2: agent.
    let agent = &settings.agent;
    reporter.step(&format!("creating agent {}...", agent.name));
    let tags = [AUTO_DELETE_TAG];
    let request = CreateAgentRequest {
        name: &agent.name,
        description: &agent.description,
        instruction: &agent.instruction,
        foundation_model: &agent.foundation_model,
        execution_role_arn: &settings.execution_role_arn,
        idle_session_ttl: agent.idle_session_ttl,
        tags: &tags,
    };
    let created = cloud
        .create_agent(&request)
        .await
        .map_err(|source| DeployError::CreateAgent {
            name: agent.name.clone(),
            source,
            orphaned: orphaned.clone(),
        })?;
    let agent_id = created.agent_id;
    reporter.success(&format!("agent created: {agent_id}"));
    orphaned.push(format!("agent {agent_id}"));

    // Stage 3: prepare.
    reporter.step("preparing agent...");
    let status = cloud
        .prepare_agent(&agent_id)
        .await
        .map_err(|source| DeployError::Prepare {
            agent_id: agent_id.clone(),
            source,
            orphaned: orphaned.clone(),
        })?;
    reporter.success(&format!("agent prepared (status: {status})"));

    // Stage 4: propagation delay.
    let delay = settings.alias_delay();
    if !delay.is_zero() {
        pause
            .pause(delay, "waiting for preparation to propagate")
            .await;
    }

    // Stage 5: alias.
    reporter.step(&format!("creating alias {}...", settings.alias_name));
    let alias_id = cloud
        .create_agent_alias(&agent_id, &settings.alias_name)
        .await
        .map_err(|source| DeployError::Alias {
            agent_id: agent_id.clone(),
            source,
            orphaned: orphaned.clone(),
        })?;
    reporter.success(&format!("alias created: {alias_id}"));

    // Stage 6: record.
    let record = DeploymentRecord {
        schema_version: RECORD_SCHEMA_VERSION,
        agent_id,
        alias_id,
        agent_name: agent.name.clone(),
        region: settings.region.clone(),
        account_id: settings.account_id.clone(),
        s3_bucket: Some(settings.storage.bucket_name.clone()),
        storage_mode: Some(settings.storage.mode),
        deployed_at: Some(Utc::now()),
    };
    store
        .save_async(&record)
        .await
        .map_err(|e| DeployError::Persist {
            message: format!("{e:#}"),
            orphaned,
        })?;
    Ok(record)
}

/// Create and configure the dedicated bucket.
///
/// A bucket this account already owns is accepted as-is; its versioning,
/// encryption and tags are left unchanged.
async fn provision_bucket(
    store: &impl ObjectStore,
    settings: &Settings,
    reporter: &impl ProgressReporter,
) -> Result<bool, RemoteError> {
    let bucket = &settings.storage.bucket_name;
    reporter.step(&format!("creating bucket {bucket}..."));
    match store.create_bucket(bucket).await {
        Ok(()) => {}
        Err(e) if e.is(RemoteErrorKind::BucketAlreadyOwnedByYou) => {
            reporter.warn(&format!(
                "bucket {bucket} already exists and is owned by this account; its configuration was not changed"
            ));
            return Ok(false);
        }
        Err(e) => return Err(e),
    }
    store.put_bucket_versioning(bucket).await?;
    store.put_bucket_encryption(bucket).await?;
    store.put_bucket_tagging(bucket, &[AUTO_DELETE_TAG]).await?;
    for folder in &settings.storage.folders {
        let key = format!("{}/", folder.trim_end_matches('/'));
        store.put_empty_object(bucket, &key).await?;
    }
    reporter.success(&format!("bucket created: {bucket}"));
    Ok(true)
}
