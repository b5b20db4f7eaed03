//! Teardown types: confirmation, bucket version pages, and outcomes.

use serde::Serialize;

/// The object store accepts at most this many keys per bulk delete.
pub const MAX_DELETE_BATCH: usize = 1000;

/// The operator confirmed a destructive action: `yes`, any case, surrounding
/// whitespace ignored.
#[must_use]
pub fn is_confirmed(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

/// One object version or delete marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectVersion {
    pub key: String,
    pub version_id: String,
}

/// Position in a version listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCursor {
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
}

/// One page of a version listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPage {
    pub versions: Vec<ObjectVersion>,
    pub delete_markers: Vec<ObjectVersion>,
    /// `None` when this is the last page.
    pub next: Option<VersionCursor>,
}

impl VersionPage {
    /// Versions followed by delete markers.
    #[must_use]
    pub fn into_entries(self) -> Vec<ObjectVersion> {
        let mut entries = self.versions;
        entries.extend(self.delete_markers);
        entries
    }
}

/// Outcome of one deletion step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Deleted,
    Failed { error: String },
    /// Not attempted, e.g. the bucket could not be emptied first.
    Skipped { reason: String },
}

impl StepOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Deleted)
    }
}

/// Summary of a confirmed cleanup.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub agent_id: String,
    pub agent: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_outcome: Option<StepOutcome>,
    /// Object versions and delete markers removed while emptying the bucket.
    pub objects_deleted: usize,
}

impl CleanupReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.agent.is_failure() || self.bucket_outcome.as_ref().is_some_and(StepOutcome::is_failure)
    }
}

/// What `cleanup` ended up doing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Cancelled,
    Completed(CleanupReport),
}
