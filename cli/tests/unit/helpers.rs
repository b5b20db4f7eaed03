//! Shared test helpers: settings, records and process output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::process::{ExitStatus, Output};

use agentctl_cli::domain::config::{ConfigFile, Overrides, Settings};
use agentctl_common::{DeploymentRecord, RECORD_SCHEMA_VERSION, StorageMode};

use crate::mocks::{AGENT_ID, ALIAS_ID};

pub const ACCOUNT_ID: &str = "123456789012";

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Domain fixtures ──────────────────────────────────────────────────────────

/// Default settings for `mode` with a real-looking account id.
pub fn settings(mode: StorageMode) -> Settings {
    settings_from(&ConfigFile::default(), mode)
}

pub fn settings_from(file: &ConfigFile, mode: StorageMode) -> Settings {
    Settings::resolve(
        file,
        &Overrides {
            account_id: Some(ACCOUNT_ID.to_string()),
            storage_mode: Some(mode),
            ..Overrides::default()
        },
    )
    .expect("default settings resolve")
}

pub fn record(mode: Option<StorageMode>, bucket: Option<&str>) -> DeploymentRecord {
    DeploymentRecord {
        schema_version: RECORD_SCHEMA_VERSION,
        agent_id: AGENT_ID.to_string(),
        alias_id: ALIAS_ID.to_string(),
        agent_name: "baseball-video-analyzer".to_string(),
        region: "us-east-1".to_string(),
        account_id: ACCOUNT_ID.to_string(),
        s3_bucket: bucket.map(str::to_string),
        storage_mode: mode,
        deployed_at: None,
    }
}
