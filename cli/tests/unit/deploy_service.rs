//! Unit tests for the deploy pipeline.

#![allow(clippy::expect_used)]

use std::time::Duration;

use agentctl_cli::application::services::deploy::deploy_agent;
use agentctl_cli::domain::{DeployError, RemoteErrorKind};
use agentctl_common::StorageMode;

use crate::helpers::settings;
use crate::mocks::{AGENT_ID, ALIAS_ID, MemoryStore, MockCloud, RecordingPause, RecordingReporter};

const DEDICATED_BUCKET: &str = "baseball-video-analyzer-data-123456789012";

#[tokio::test]
async fn shared_deploy_creates_agent_then_alias_and_saves_record() {
    let cloud = MockCloud::new();
    let store = MemoryStore::default();
    let pause = RecordingPause::default();
    let s = settings(StorageMode::Shared);

    let record = deploy_agent(&cloud, &store, &pause, &RecordingReporter::default(), &s)
        .await
        .expect("deploy succeeds");

    assert_eq!(
        cloud.operations(),
        ["CreateAgent", "PrepareAgent", "CreateAgentAlias"]
    );
    assert_eq!(
        cloud.calls_to("CreateAgent"),
        ["CreateAgent baseball-video-analyzer ttl=600 tags=auto-delete=no"]
    );
    assert_eq!(
        cloud.calls_to("CreateAgentAlias"),
        [format!("CreateAgentAlias {AGENT_ID} production")]
    );
    assert!(pause.pauses().is_empty(), "shared mode has no alias delay");

    assert_eq!(record.agent_id, AGENT_ID);
    assert_eq!(record.alias_id, ALIAS_ID);
    assert_eq!(record.s3_bucket.as_deref(), Some("company-bedrock-agents"));
    assert_eq!(record.storage_mode, Some(StorageMode::Shared));
    assert!(record.deployed_at.is_some());
    assert_eq!(store.saved(), Some(record));
}

#[tokio::test]
async fn dedicated_deploy_provisions_bucket_before_agent() {
    let cloud = MockCloud::new();
    let store = MemoryStore::default();
    let pause = RecordingPause::default();
    let s = settings(StorageMode::Dedicated);

    let record = deploy_agent(&cloud, &store, &pause, &RecordingReporter::default(), &s)
        .await
        .expect("deploy succeeds");

    assert_eq!(
        cloud.operations(),
        [
            "CreateBucket",
            "PutBucketVersioning",
            "PutBucketEncryption",
            "PutBucketTagging",
            "PutObject",
            "PutObject",
            "CreateAgent",
            "PrepareAgent",
            "CreateAgentAlias",
        ]
    );
    assert_eq!(
        cloud.calls_to("PutObject"),
        [
            format!("PutObject {DEDICATED_BUCKET} videos/"),
            format!("PutObject {DEDICATED_BUCKET} artifacts/"),
        ]
    );
    assert_eq!(
        cloud.calls_to("PutBucketTagging"),
        [format!("PutBucketTagging {DEDICATED_BUCKET} auto-delete=no")]
    );
    assert_eq!(pause.pauses(), [Duration::from_secs(15)]);
    assert_eq!(record.s3_bucket.as_deref(), Some(DEDICATED_BUCKET));
    assert_eq!(record.storage_mode, Some(StorageMode::Dedicated));
}

#[tokio::test]
async fn bucket_already_owned_is_reused_without_reconfiguring() {
    let cloud = MockCloud::new().fail("CreateBucket", RemoteErrorKind::BucketAlreadyOwnedByYou);
    let store = MemoryStore::default();
    let reporter = RecordingReporter::default();
    let s = settings(StorageMode::Dedicated);

    deploy_agent(&cloud, &store, &RecordingPause::default(), &reporter, &s)
        .await
        .expect("an owned bucket is accepted");

    assert_eq!(
        cloud.operations(),
        ["CreateBucket", "CreateAgent", "PrepareAgent", "CreateAgentAlias"]
    );
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("already exists")),
        "{:?}",
        reporter.events()
    );
}

#[tokio::test]
async fn bucket_failure_stops_before_agent_creation() {
    let cloud = MockCloud::new().fail("CreateBucket", RemoteErrorKind::AccessDenied);
    let store = MemoryStore::default();
    let s = settings(StorageMode::Dedicated);

    let err = deploy_agent(
        &cloud,
        &store,
        &RecordingPause::default(),
        &RecordingReporter::default(),
        &s,
    )
    .await
    .expect_err("bucket creation is denied");

    assert!(matches!(err, DeployError::Bucket { .. }), "{err:?}");
    assert!(err.orphaned().is_empty());
    assert!(cloud.calls_to("CreateAgent").is_empty());
    assert!(store.saved().is_none());
}

#[tokio::test]
async fn prepare_failure_reports_agent_and_skips_alias() {
    let cloud = MockCloud::new().fail("PrepareAgent", RemoteErrorKind::Service);
    let store = MemoryStore::default();
    let s = settings(StorageMode::Shared);

    let err = deploy_agent(
        &cloud,
        &store,
        &RecordingPause::default(),
        &RecordingReporter::default(),
        &s,
    )
    .await
    .expect_err("prepare fails");

    assert!(matches!(err, DeployError::Prepare { .. }), "{err:?}");
    assert_eq!(err.orphaned(), [format!("agent {AGENT_ID}")]);
    assert!(cloud.calls_to("CreateAgentAlias").is_empty());
    assert!(store.saved().is_none());
}

#[tokio::test]
async fn alias_failure_lists_bucket_and_agent_as_orphans() {
    let cloud = MockCloud::new().fail("CreateAgentAlias", RemoteErrorKind::Service);
    let store = MemoryStore::default();
    let s = settings(StorageMode::Dedicated);

    let err = deploy_agent(
        &cloud,
        &store,
        &RecordingPause::default(),
        &RecordingReporter::default(),
        &s,
    )
    .await
    .expect_err("alias creation fails");

    assert!(matches!(err, DeployError::Alias { .. }), "{err:?}");
    assert_eq!(
        err.orphaned(),
        [format!("bucket {DEDICATED_BUCKET}"), format!("agent {AGENT_ID}")]
    );
    assert!(store.saved().is_none());
}

#[tokio::test]
async fn reused_bucket_is_not_listed_as_an_orphan() {
    let cloud = MockCloud::new()
        .fail("CreateBucket", RemoteErrorKind::BucketAlreadyOwnedByYou)
        .fail("CreateAgentAlias", RemoteErrorKind::Service);
    let store = MemoryStore::default();
    let s = settings(StorageMode::Dedicated);

    let err = deploy_agent(
        &cloud,
        &store,
        &RecordingPause::default(),
        &RecordingReporter::default(),
        &s,
    )
    .await
    .expect_err("alias creation fails");

    assert!(matches!(err, DeployError::Alias { .. }), "{err:?}");
    assert_eq!(err.orphaned(), [format!("agent {AGENT_ID}")]);
}

#[tokio::test]
async fn save_failure_keeps_orphans() {
    let cloud = MockCloud::new();
    let store = MemoryStore::failing();
    let s = settings(StorageMode::Shared);

    let err = deploy_agent(
        &cloud,
        &store,
        &RecordingPause::default(),
        &RecordingReporter::default(),
        &s,
    )
    .await
    .expect_err("saving fails");

    assert!(matches!(err, DeployError::Persist { .. }), "{err:?}");
    assert!(err.to_string().contains("disk full"));
    assert_eq!(err.orphaned(), [format!("agent {AGENT_ID}")]);
}
