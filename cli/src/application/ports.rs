//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared record crate;
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::process::Output;
use std::time::Duration;

use agentctl_common::DeploymentRecord;
use anyhow::Result;
use futures_util::stream::BoxStream;

use crate::domain::{ObjectVersion, PromptOutcome, RemoteError, VersionCursor, VersionPage};

/// Result of one control-plane call.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Response text of one invocation, in arrival order. Consumed once.
pub type FragmentStream = BoxStream<'static, RemoteResult<String>>;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Tag applied to every resource `deploy` creates.
pub const AUTO_DELETE_TAG: (&str, &str) = ("auto-delete", "no");

/// Parameters for `CreateAgent`.
pub struct CreateAgentRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub instruction: &'a str,
    pub foundation_model: &'a str,
    pub execution_role_arn: &'a str,
    pub idle_session_ttl: u32,
    pub tags: &'a [(&'a str, &'a str)],
}

/// The agent as returned by `CreateAgent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAgent {
    pub agent_id: String,
    pub status: String,
}

/// An entry of `ListAgents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub agent_id: String,
    pub agent_name: String,
    pub status: String,
}

/// Parameters for `InvokeAgent`.
pub struct InvokeRequest<'a> {
    pub agent_id: &'a str,
    pub alias_id: &'a str,
    pub session_id: &'a str,
    pub input_text: &'a str,
}

// ── Control-plane Port Traits ─────────────────────────────────────────────────

/// Agent lifecycle on the managed agent service.
#[allow(async_fn_in_trait)]
pub trait AgentControlPlane {
    async fn list_agents(&self, max_results: u32) -> RemoteResult<Vec<AgentSummary>>;
    async fn create_agent(&self, request: &CreateAgentRequest<'_>) -> RemoteResult<CreatedAgent>;
    /// Prepare the agent's draft version. Returns the reported status.
    async fn prepare_agent(&self, agent_id: &str) -> RemoteResult<String>;
    /// Create a named alias. Returns the alias id.
    async fn create_agent_alias(&self, agent_id: &str, alias_name: &str) -> RemoteResult<String>;
    async fn delete_agent(&self, agent_id: &str, skip_resource_in_use_check: bool)
    -> RemoteResult<()>;
}

/// Agent runtime endpoint.
#[allow(async_fn_in_trait)]
pub trait AgentRuntime {
    /// Open an exchange. Errors that occur mid-response surface as stream items.
    async fn invoke_agent(&self, request: &InvokeRequest<'_>) -> RemoteResult<FragmentStream>;
}

/// Object storage bucket operations.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    async fn head_bucket(&self, bucket: &str) -> RemoteResult<()>;
    /// List up to `max_keys` object keys.
    async fn list_objects(&self, bucket: &str, max_keys: u32) -> RemoteResult<Vec<String>>;
    /// Create a bucket in the adapter's region.
    async fn create_bucket(&self, bucket: &str) -> RemoteResult<()>;
    async fn delete_bucket(&self, bucket: &str) -> RemoteResult<()>;
    async fn put_bucket_versioning(&self, bucket: &str) -> RemoteResult<()>;
    /// Enable AES256 default encryption.
    async fn put_bucket_encryption(&self, bucket: &str) -> RemoteResult<()>;
    async fn put_bucket_tagging(&self, bucket: &str, tags: &[(&str, &str)]) -> RemoteResult<()>;
    async fn put_empty_object(&self, bucket: &str, key: &str) -> RemoteResult<()>;
    async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> RemoteResult<VersionPage>;
    /// Delete at most [`crate::domain::MAX_DELETE_BATCH`] entries.
    async fn delete_objects(&self, bucket: &str, batch: &[ObjectVersion]) -> RemoteResult<()>;
}

/// Container image repositories.
#[allow(async_fn_in_trait)]
pub trait ImageRegistry {
    async fn describe_repository(&self, name: &str) -> RemoteResult<()>;
    async fn create_repository(&self, name: &str) -> RemoteResult<()>;
    async fn delete_repository(&self, name: &str, force: bool) -> RemoteResult<()>;
}

/// Identity roles.
#[allow(async_fn_in_trait)]
pub trait IdentityDirectory {
    /// Fetch a role by name. Returns its ARN.
    async fn get_role(&self, name: &str) -> RemoteResult<String>;
}

/// Composite trait: any type implementing the four control-plane ports is a
/// `CloudProvider`. The agent runtime is served separately.
pub trait CloudProvider: AgentControlPlane + ObjectStore + ImageRegistry + IdentityDirectory {}

/// Blanket implementation for every type implementing the control-plane ports.
impl<T> CloudProvider for T where
    T: AgentControlPlane + ObjectStore + ImageRegistry + IdentityDirectory
{
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
}

// ── Progress Reporting Ports ──────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a failure message. The operation continues unless the caller stops.
    fn error(&self, message: &str);
}

/// Receives invocation output while it streams.
pub trait TranscriptWriter {
    fn begin_prompt(&self, index: usize, total: usize, prompt: &str);
    /// A response fragment, in arrival order.
    fn fragment(&self, text: &str);
    fn end_prompt(&self, outcome: &PromptOutcome);
}

/// Waits between remote calls.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&self, duration: Duration, reason: &str);
}

// ── State and Operator Ports ──────────────────────────────────────────────────

/// Abstracts deployment record persistence (load/save).
#[allow(async_fn_in_trait)]
pub trait DeploymentStore {
    /// Load the record, returning `None` if no record exists.
    async fn load_async(&self) -> Result<Option<DeploymentRecord>>;
    /// Persist the record, replacing any previous one.
    async fn save_async(&self, record: &DeploymentRecord) -> Result<()>;
}

/// Asks the operator a free-text question.
pub trait OperatorPrompt {
    /// Returns the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn ask(&self, question: &str) -> Result<String>;
}
