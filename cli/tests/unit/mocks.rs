//! Shared mock infrastructure for unit tests.
//!
//! `MockCloud` implements every control-plane port with canned successes,
//! records each call as `"<Operation> <args>"`, and fails any operation given
//! to [`MockCloud::fail`]. The remaining mocks cover the presentation and
//! operator ports.

#![allow(clippy::expect_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

use agentctl_cli::application::ports::{
    AgentControlPlane, AgentRuntime, AgentSummary, CommandRunner, CreateAgentRequest, CreatedAgent,
    DeploymentStore, FragmentStream, IdentityDirectory, ImageRegistry, InvokeRequest, ObjectStore,
    OperatorPrompt, Pause, ProgressReporter, RemoteResult, TranscriptWriter,
};
use agentctl_cli::domain::{
    ObjectVersion, PromptOutcome, RemoteError, RemoteErrorKind, VersionCursor, VersionPage,
};
use agentctl_common::DeploymentRecord;
use anyhow::Result;
use futures_util::StreamExt as _;
use futures_util::stream;

pub const AGENT_ID: &str = "AGENT00001";
pub const ALIAS_ID: &str = "ALIAS00001";

pub fn remote_err(operation: &str, kind: RemoteErrorKind) -> RemoteError {
    let code = match kind {
        RemoteErrorKind::AccessDenied => "AccessDeniedException",
        RemoteErrorKind::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
        RemoteErrorKind::BucketAlreadyExists => "BucketAlreadyExists",
        RemoteErrorKind::NotFound => "ResourceNotFoundException",
        RemoteErrorKind::Service => "InternalServerException",
        RemoteErrorKind::Transport => "Transport",
        RemoteErrorKind::Malformed => "Malformed",
    };
    RemoteError::new(operation, kind, code, "scripted failure")
}

// ── Control plane ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockCloud {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, RemoteError>>,
    version_pages: Mutex<VecDeque<VersionPage>>,
    responses: Mutex<VecDeque<Vec<RemoteResult<String>>>>,
    delete_batches: Mutex<Vec<usize>>,
}

impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call to `operation` fails with `kind`.
    #[must_use]
    pub fn fail(self, operation: &str, kind: RemoteErrorKind) -> Self {
        self.failures
            .lock()
            .expect("lock")
            .insert(operation.to_string(), remote_err(operation, kind));
        self
    }

    /// Pages returned by successive `ListObjectVersions` calls.
    #[must_use]
    pub fn with_version_pages(self, pages: Vec<VersionPage>) -> Self {
        self.version_pages.lock().expect("lock").extend(pages);
        self
    }

    /// Fragments streamed by successive `InvokeAgent` calls.
    #[must_use]
    pub fn with_response(self, fragments: Vec<RemoteResult<String>>) -> Self {
        self.responses.lock().expect("lock").push_back(fragments);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Calls whose operation name is `operation`.
    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .collect()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn delete_batches(&self) -> Vec<usize> {
        self.delete_batches.lock().expect("lock").clone()
    }

    fn record(&self, operation: &str, detail: &str) -> RemoteResult<()> {
        let entry = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {detail}")
        };
        self.calls.lock().expect("lock").push(entry);
        match self.failures.lock().expect("lock").get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl AgentControlPlane for MockCloud {
    async fn list_agents(&self, max_results: u32) -> RemoteResult<Vec<AgentSummary>> {
        self.record("ListAgents", &max_results.to_string())?;
        Ok(vec![AgentSummary {
            agent_id: AGENT_ID.to_string(),
            agent_name: "existing".to_string(),
            status: "PREPARED".to_string(),
        }])
    }

    async fn create_agent(&self, request: &CreateAgentRequest<'_>) -> RemoteResult<CreatedAgent> {
        let tags: Vec<String> = request.tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.record(
            "CreateAgent",
            &format!("{} ttl={} tags={}", request.name, request.idle_session_ttl, tags.join(",")),
        )?;
        Ok(CreatedAgent {
            agent_id: AGENT_ID.to_string(),
            status: "CREATING".to_string(),
        })
    }

    async fn prepare_agent(&self, agent_id: &str) -> RemoteResult<String> {
        self.record("PrepareAgent", agent_id)?;
        Ok("PREPARING".to_string())
    }

    async fn create_agent_alias(&self, agent_id: &str, alias_name: &str) -> RemoteResult<String> {
        self.record("CreateAgentAlias", &format!("{agent_id} {alias_name}"))?;
        Ok(ALIAS_ID.to_string())
    }

    async fn delete_agent(&self, agent_id: &str, skip: bool) -> RemoteResult<()> {
        self.record("DeleteAgent", &format!("{agent_id} skip={skip}"))
    }
}

impl AgentRuntime for MockCloud {
    async fn invoke_agent(&self, request: &InvokeRequest<'_>) -> RemoteResult<FragmentStream> {
        self.record(
            "InvokeAgent",
            &format!("{} {} {}", request.agent_id, request.alias_id, request.input_text),
        )?;
        let fragments = self
            .responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_default();
        Ok(stream::iter(fragments).boxed())
    }
}

impl ObjectStore for MockCloud {
    async fn head_bucket(&self, bucket: &str) -> RemoteResult<()> {
        self.record("HeadBucket", bucket)
    }

    async fn list_objects(&self, bucket: &str, max_keys: u32) -> RemoteResult<Vec<String>> {
        self.record("ListObjectsV2", &format!("{bucket} {max_keys}"))?;
        Ok(Vec::new())
    }

    async fn create_bucket(&self, bucket: &str) -> RemoteResult<()> {
        self.record("CreateBucket", bucket)
    }

    async fn delete_bucket(&self, bucket: &str) -> RemoteResult<()> {
        self.record("DeleteBucket", bucket)
    }

    async fn put_bucket_versioning(&self, bucket: &str) -> RemoteResult<()> {
        self.record("PutBucketVersioning", bucket)
    }

    async fn put_bucket_encryption(&self, bucket: &str) -> RemoteResult<()> {
        self.record("PutBucketEncryption", bucket)
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[(&str, &str)]) -> RemoteResult<()> {
        let tags: Vec<String> = tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.record("PutBucketTagging", &format!("{bucket} {}", tags.join(",")))
    }

    async fn put_empty_object(&self, bucket: &str, key: &str) -> RemoteResult<()> {
        self.record("PutObject", &format!("{bucket} {key}"))
    }

    async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> RemoteResult<VersionPage> {
        let marker = cursor.key_marker.as_deref().unwrap_or("-");
        self.record("ListObjectVersions", &format!("{bucket} {marker}"))?;
        Ok(self
            .version_pages
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_default())
    }

    async fn delete_objects(&self, bucket: &str, batch: &[ObjectVersion]) -> RemoteResult<()> {
        self.record("DeleteObjects", &format!("{bucket} {}", batch.len()))?;
        self.delete_batches.lock().expect("lock").push(batch.len());
        Ok(())
    }
}

impl ImageRegistry for MockCloud {
    async fn describe_repository(&self, name: &str) -> RemoteResult<()> {
        self.record("DescribeRepositories", name)
    }

    async fn create_repository(&self, name: &str) -> RemoteResult<()> {
        self.record("CreateRepository", name)
    }

    async fn delete_repository(&self, name: &str, force: bool) -> RemoteResult<()> {
        self.record("DeleteRepository", &format!("{name} force={force}"))
    }
}

impl IdentityDirectory for MockCloud {
    async fn get_role(&self, name: &str) -> RemoteResult<String> {
        self.record("GetRole", name)?;
        Ok(format!("arn:aws:iam::123456789012:role/{name}"))
    }
}

// ── Command runner ────────────────────────────────────────────────────────────

/// Returns queued outputs in order and records every argument list.
#[derive(Default)]
pub struct MockRunner {
    outputs: Mutex<VecDeque<Output>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockRunner {
    pub fn with_outputs(outputs: Vec<Output>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("lock").clone()
    }

    /// Arguments of the only call made.
    pub fn single_call(&self) -> Vec<String> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().map(|(_, args)| args).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::from_secs(30))
            .await
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.calls.lock().expect("lock").push((
            program.to_string(),
            args.iter().map(|a| (*a).to_string()).collect(),
        ));
        self.outputs
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no output queued for {program}"))
    }
}

/// Lets an adapter borrow the runner so the test can inspect calls afterwards.
impl CommandRunner for &MockRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        MockRunner::run(self, program, args).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        MockRunner::run_with_timeout(self, program, args, timeout).await
    }
}

// ── Presentation and operator ports ───────────────────────────────────────────

/// Captures every progress event as `"<level>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }

    fn push(&self, level: &str, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("{level}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

/// Captures the transcript of a test run.
#[derive(Default)]
pub struct RecordingTranscript {
    pub begun: Mutex<Vec<(usize, usize, String)>>,
    pub fragments: Mutex<Vec<String>>,
    pub ended: Mutex<Vec<PromptOutcome>>,
}

impl TranscriptWriter for RecordingTranscript {
    fn begin_prompt(&self, index: usize, total: usize, prompt: &str) {
        self.begun
            .lock()
            .expect("lock")
            .push((index, total, prompt.to_string()));
    }
    fn fragment(&self, text: &str) {
        self.fragments.lock().expect("lock").push(text.to_string());
    }
    fn end_prompt(&self, outcome: &PromptOutcome) {
        self.ended.lock().expect("lock").push(outcome.clone());
    }
}

/// Records requested pauses without sleeping.
#[derive(Default)]
pub struct RecordingPause {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("lock").clone()
    }
}

impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration, _: &str) {
        self.pauses.lock().expect("lock").push(duration);
    }
}

/// Gives a fixed answer and remembers the question.
pub struct ScriptedPrompt {
    answer: String,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.asked.lock().expect("lock").clone()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        self.asked.lock().expect("lock").push(question.to_string());
        Ok(self.answer.clone())
    }
}

/// Keeps the saved record in memory, optionally failing saves.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<DeploymentRecord>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            record: Mutex::new(None),
            fail_saves: true,
        }
    }

    pub fn saved(&self) -> Option<DeploymentRecord> {
        self.record.lock().expect("lock").clone()
    }
}

impl DeploymentStore for MemoryStore {
    async fn load_async(&self) -> Result<Option<DeploymentRecord>> {
        Ok(self.saved())
    }

    async fn save_async(&self, record: &DeploymentRecord) -> Result<()> {
        if self.fail_saves {
            anyhow::bail!("disk full");
        }
        *self.record.lock().expect("lock") = Some(record.clone());
        Ok(())
    }
}
