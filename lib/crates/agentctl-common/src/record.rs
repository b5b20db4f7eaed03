//! The deployment record linking `deploy` to the later `test` and `cleanup`
//! runs.
//!
//! Records written before `schema_version` existed carry no version field and
//! are read as version 1. Optional fields use explicit `Option` presence so a
//! shared-bucket record and a dedicated-bucket record share one schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::StorageMode;

/// Current on-disk schema version.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

/// Errors raised while reading or writing a deployment record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("deployment record schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error(
        "deployment record schema mismatch: version {found} is not supported (expected {expected})"
    )]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("cannot serialize deployment record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Identifiers of a deployed agent, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
    pub agent_id: String,
    pub alias_id: String,
    pub agent_name: String,
    pub region: String,
    pub account_id: String,
    /// Bucket holding the agent's data. Absent when no bucket was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    /// How the bucket was provisioned. Absent in legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_mode: Option<StorageMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
}

fn legacy_schema_version() -> u32 {
    1
}

impl DeploymentRecord {
    /// Parse and validate a record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::SchemaMismatch`] when the JSON does not match the
    /// schema or a required identifier is empty, and
    /// [`RecordError::UnsupportedVersion`] for an unknown `schema_version`.
    pub fn from_json(content: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(content)
            .map_err(|e| RecordError::SchemaMismatch(e.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Serialize as pretty-printed JSON (2-space indent).
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.schema_version != RECORD_SCHEMA_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: self.schema_version,
                expected: RECORD_SCHEMA_VERSION,
            });
        }
        for (field, value) in [
            ("agent_id", &self.agent_id),
            ("alias_id", &self.alias_id),
            ("agent_name", &self.agent_name),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(RecordError::SchemaMismatch(format!(
                    "field `{field}` is empty"
                )));
            }
        }
        if self.s3_bucket.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(RecordError::SchemaMismatch(
                "field `s3_bucket` is present but empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The bucket cleanup should empty and delete, if any.
    ///
    /// Legacy records carry no storage mode; `fallback` (the configured mode)
    /// decides for them.
    #[must_use]
    pub fn owned_bucket(&self, fallback: StorageMode) -> Option<&str> {
        let mode = self.storage_mode.unwrap_or(fallback);
        if mode.owns_bucket() {
            self.s3_bucket.as_deref()
        } else {
            None
        }
    }
}
