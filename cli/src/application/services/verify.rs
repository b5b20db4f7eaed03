//! Application service: permission verification use-case.
//!
//! Runs the fixed battery of checks against the control plane. Every check is
//! independent; a failing call is recorded in the report and never aborts the
//! remaining checks.

use agentctl_common::StorageMode;

use crate::application::ports::{
    AgentControlPlane, IdentityDirectory, ImageRegistry, ObjectStore, ProgressReporter,
};
use crate::domain::config::Settings;
use crate::domain::verification::{
    CheckKind, CheckResult, DENIED_PROBE_BUCKET, DENIED_PROBE_REPOSITORY, DenialOutcome,
    VerificationReport, create_probe_bucket,
};
use crate::domain::RemoteErrorKind;

/// Run all five checks in presentation order.
pub async fn verify_permissions(
    cloud: &(impl AgentControlPlane + ObjectStore + ImageRegistry + IdentityDirectory),
    settings: &Settings,
    reporter: &impl ProgressReporter,
) -> VerificationReport {
    let mode = settings.storage.mode;
    let bedrock = check_bedrock(cloud, reporter).await;
    let storage = match mode {
        StorageMode::Shared => {
            check_shared_bucket(cloud, &settings.storage.shared_bucket, reporter).await
        }
        StorageMode::Dedicated => {
            check_bucket_create(cloud, &settings.account_id, reporter).await
        }
    };
    let checks = vec![
        bedrock,
        storage,
        check_registry(cloud, &settings.repository, reporter).await,
        check_identity(cloud, &settings.execution_role_name, reporter).await,
        check_denied(cloud, mode, reporter).await,
    ];
    VerificationReport::new(&settings.account_id, &settings.region, mode, checks)
}

async fn check_bedrock(
    cloud: &impl AgentControlPlane,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    reporter.step("checking agent service access...");
    match cloud.list_agents(1).await {
        Ok(agents) => {
            reporter.success(&format!("can list agents ({} returned)", agents.len()));
            CheckResult::pass(CheckKind::Bedrock)
        }
        Err(e) => {
            reporter.error(&format!("cannot list agents: {e}"));
            CheckResult::fail(CheckKind::Bedrock, &e)
        }
    }
}

async fn check_shared_bucket(
    store: &impl ObjectStore,
    bucket: &str,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    reporter.step(&format!("checking access to bucket {bucket}..."));
    if let Err(e) = store.head_bucket(bucket).await {
        reporter.error(&format!("cannot access bucket {bucket}: {e}"));
        return CheckResult::fail(CheckKind::Storage, &e);
    }
    match store.list_objects(bucket, 1).await {
        Ok(_) => {
            reporter.success(&format!("can access bucket {bucket}"));
            CheckResult::pass(CheckKind::Storage).with_detail(format!("s3://{bucket}"))
        }
        Err(e) => {
            reporter.error(&format!("cannot list objects in {bucket}: {e}"));
            CheckResult::fail(CheckKind::Storage, &e)
        }
    }
}

async fn check_bucket_create(
    store: &impl ObjectStore,
    account_id: &str,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    let bucket = create_probe_bucket(account_id);
    reporter.step(&format!("checking bucket creation with {bucket}..."));
    match store.create_bucket(&bucket).await {
        Ok(()) => {
            let mut result = CheckResult::pass(CheckKind::StorageCreate);
            if let Err(e) = store.delete_bucket(&bucket).await {
                let warning = format!("test bucket {bucket} was created but not deleted: {e}");
                reporter.warn(&warning);
                result.warnings.push(warning);
            }
            reporter.success("can create buckets");
            result
        }
        Err(e)
            if e.is(RemoteErrorKind::BucketAlreadyExists)
                || e.is(RemoteErrorKind::BucketAlreadyOwnedByYou) =>
        {
            reporter.success(&format!("bucket creation allowed ({bucket} already exists)"));
            CheckResult::pass(CheckKind::StorageCreate).with_detail(e.code)
        }
        Err(e) => {
            reporter.error(&format!("cannot create buckets: {e}"));
            CheckResult::fail(CheckKind::StorageCreate, &e)
        }
    }
}

async fn check_registry(
    registry: &impl ImageRegistry,
    repository: &str,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    reporter.step(&format!("checking access to repository {repository}..."));
    match registry.describe_repository(repository).await {
        Ok(()) => {
            reporter.success(&format!("can access repository {repository}"));
            CheckResult::pass(CheckKind::Registry)
        }
        Err(e) => {
            reporter.error(&format!("cannot access repository {repository}: {e}"));
            CheckResult::fail(CheckKind::Registry, &e)
        }
    }
}

async fn check_identity(
    identity: &impl IdentityDirectory,
    role: &str,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    reporter.step(&format!("checking access to role {role}..."));
    match identity.get_role(role).await {
        Ok(arn) => {
            reporter.success(&format!("can access role {arn}"));
            CheckResult::pass(CheckKind::Identity).with_detail(arn)
        }
        Err(e) => {
            reporter.error(&format!("cannot access role {role}: {e}"));
            CheckResult::fail(CheckKind::Identity, &e)
        }
    }
}

/// Negative control. Stops at the first creation that is allowed and removes
/// what it created.
async fn check_denied(
    cloud: &(impl ObjectStore + ImageRegistry),
    mode: StorageMode,
    reporter: &impl ProgressReporter,
) -> CheckResult {
    reporter.step("checking that restricted operations are denied...");
    let mut result = CheckResult::pass(CheckKind::Denied);

    if mode == StorageMode::Shared {
        let attempt = cloud.create_bucket(DENIED_PROBE_BUCKET).await;
        match DenialOutcome::classify(&attempt) {
            DenialOutcome::Denied => reporter.success("bucket creation correctly denied"),
            DenialOutcome::Unexpected(message) => {
                let warning = format!("unexpected error creating bucket: {message}");
                reporter.warn(&warning);
                result.warnings.push(warning);
            }
            DenialOutcome::Allowed => {
                let warning = "can create buckets (should be denied)".to_string();
                reporter.error(&warning);
                result.passed = false;
                result.warnings.push(warning);
                if let Err(e) = cloud.delete_bucket(DENIED_PROBE_BUCKET).await {
                    let warning = format!("could not remove {DENIED_PROBE_BUCKET}: {e}");
                    reporter.warn(&warning);
                    result.warnings.push(warning);
                }
                return result;
            }
        }
    }

    let attempt = cloud.create_repository(DENIED_PROBE_REPOSITORY).await;
    match DenialOutcome::classify(&attempt) {
        DenialOutcome::Denied => reporter.success("repository creation correctly denied"),
        DenialOutcome::Unexpected(message) => {
            let warning = format!("unexpected error creating repository: {message}");
            reporter.warn(&warning);
            result.warnings.push(warning);
        }
        DenialOutcome::Allowed => {
            let warning = "can create image repositories (should be denied)".to_string();
            reporter.error(&warning);
            result.passed = false;
            result.warnings.push(warning);
            if let Err(e) = cloud.delete_repository(DENIED_PROBE_REPOSITORY, true).await {
                let warning = format!("could not remove {DENIED_PROBE_REPOSITORY}: {e}");
                reporter.warn(&warning);
                result.warnings.push(warning);
            }
        }
    }
    result
}
