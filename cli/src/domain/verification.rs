//! Permission verification results.

use agentctl_common::StorageMode;
use serde::Serialize;

use crate::domain::error::RemoteError;

/// Bucket the dedicated-mode create check creates and removes again.
#[must_use]
pub fn create_probe_bucket(account_id: &str) -> String {
    format!("test-agent-data-{account_id}").to_ascii_lowercase()
}

/// Bucket the negative control tries to create. Creation must be denied.
pub const DENIED_PROBE_BUCKET: &str = "test-should-fail-bucket";
/// Repository the negative control tries to create. Creation must be denied.
pub const DENIED_PROBE_REPOSITORY: &str = "test-should-fail-repo";

/// One of the five fixed checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Bedrock,
    Storage,
    StorageCreate,
    Registry,
    Identity,
    Denied,
}

impl CheckKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bedrock => "bedrock",
            Self::Storage => "storage",
            Self::StorageCreate => "storage_create",
            Self::Registry => "registry",
            Self::Identity => "identity",
            Self::Denied => "denied",
        }
    }

    /// Human title shown in progress lines and the summary table.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Bedrock => "Bedrock agent access",
            Self::Storage => "Shared bucket access",
            Self::StorageCreate => "Bucket creation",
            Self::Registry => "Image repository access",
            Self::Identity => "Execution role access",
            Self::Denied => "Restricted operations denied",
        }
    }

    /// The storage check that applies to a storage mode.
    #[must_use]
    pub fn storage_for(mode: StorageMode) -> Self {
        match mode {
            StorageMode::Shared => Self::Storage,
            StorageMode::Dedicated => Self::StorageCreate,
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    #[must_use]
    pub fn pass(check: CheckKind) -> Self {
        Self {
            check,
            passed: true,
            warnings: Vec::new(),
            detail: None,
        }
    }

    #[must_use]
    pub fn fail(check: CheckKind, err: &RemoteError) -> Self {
        Self {
            check,
            passed: false,
            warnings: Vec::new(),
            detail: Some(err.to_string()),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Ordered result set of one verifier run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub account_id: String,
    pub region: String,
    pub storage_mode: StorageMode,
    pub checks: Vec<CheckResult>,
    pub all_passed: bool,
}

impl VerificationReport {
    #[must_use]
    pub fn new(
        account_id: &str,
        region: &str,
        storage_mode: StorageMode,
        checks: Vec<CheckResult>,
    ) -> Self {
        let all_passed = checks.iter().all(|c| c.passed);
        Self {
            account_id: account_id.to_string(),
            region: region.to_string(),
            storage_mode,
            checks,
            all_passed,
        }
    }

    /// Policy the infrastructure team must attach when checks fail.
    #[must_use]
    pub fn required_policy(&self) -> &'static str {
        required_policy(self.storage_mode)
    }
}

#[must_use]
pub fn required_policy(mode: StorageMode) -> &'static str {
    match mode {
        StorageMode::Shared => "BedrockAgentDeveloperPolicy",
        StorageMode::Dedicated => "BedrockAgentPolicy",
    }
}

/// How a negative-control attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialOutcome {
    /// The operation was denied, as it should be.
    Denied,
    /// The operation succeeded. Permissions are too broad.
    Allowed,
    /// Failed for another reason; counted as a pass with a warning.
    Unexpected(String),
}

impl DenialOutcome {
    #[must_use]
    pub fn classify<T>(result: &Result<T, RemoteError>) -> Self {
        match result {
            Ok(_) => Self::Allowed,
            Err(e) if e.is_access_denied() => Self::Denied,
            Err(e) => Self::Unexpected(e.to_string()),
        }
    }
}
