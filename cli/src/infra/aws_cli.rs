//! Infrastructure implementation of the control-plane port traits.
//!
//! The agent runtime is not reachable through the CLI (its response is an
//! event stream); see `infra::agent_runtime` for that port.
//!
//! `AwsCli<R>` routes every call through the `aws` CLI (v2) via a
//! `CommandRunner`, always with `--region <region> --output json`. Failures
//! are classified from the CLI's stderr into [`RemoteError`] kinds.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{
    AgentControlPlane, AgentSummary, CommandRunner, CreateAgentRequest, CreatedAgent,
    IdentityDirectory, ImageRegistry, ObjectStore, RemoteResult,
};
use crate::domain::{
    MAX_DELETE_BATCH, ObjectVersion, RemoteError, RemoteErrorKind, VersionCursor, VersionPage,
};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Program invoked when `AGENTCTL_AWS` is unset.
pub const DEFAULT_AWS_PROGRAM: &str = "aws";

/// Region in which `CreateBucket` must not carry a location constraint.
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

/// Infrastructure adapter that routes all control-plane calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct AwsCli<R: CommandRunner> {
    runner: R,
    program: String,
    region: String,
}

impl<R: CommandRunner> AwsCli<R> {
    pub fn new(runner: R, region: impl Into<String>) -> Self {
        Self {
            runner,
            program: DEFAULT_AWS_PROGRAM.to_string(),
            region: region.into(),
        }
    }

    /// Use a different executable, e.g. a wrapper script.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run one CLI call and return its stdout.
    async fn call(&self, operation: &str, args: &[String]) -> RemoteResult<Vec<u8>> {
        let mut full: Vec<&str> = args.iter().map(String::as_str).collect();
        full.extend([
            "--region",
            self.region.as_str(),
            "--output",
            "json",
            "--no-cli-pager",
        ]);
        let service = full.first().copied().unwrap_or_default();
        let started = std::time::Instant::now();

        let output = self
            .runner
            .run(&self.program, &full)
            .await
            .map_err(|e| RemoteError::transport(operation, format!("{e:#}")))?;
        tracing::debug!(
            service,
            operation,
            region = %self.region,
            elapsed_ms = started.elapsed().as_millis(),
            status = ?output.status.code(),
            "control-plane call"
        );
        if output.status.success() {
            Ok(output.stdout)
        } else {
            let err =
                RemoteError::from_cli_stderr(operation, &String::from_utf8_lossy(&output.stderr));
            tracing::warn!(
                service,
                operation,
                kind = ?err.kind,
                code = %err.code,
                status = ?output.status.code(),
                "control-plane call failed"
            );
            Err(err)
        }
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        args: &[String],
    ) -> RemoteResult<T> {
        let stdout = self.call(operation, args).await?;
        serde_json::from_slice(&stdout).map_err(|e| {
            tracing::warn!(operation, error = %e, "unparseable control-plane response");
            RemoteError::malformed(operation, e.to_string())
        })
    }
}

impl AwsCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(region: impl Into<String>) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), region)
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

fn shorthand_tags(tags: &[(&str, &str)]) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

// ── Response shapes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAgentsResponse {
    #[serde(default)]
    agent_summaries: Vec<AgentSummaryJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentSummaryJson {
    agent_id: String,
    agent_name: String,
    #[serde(default)]
    agent_status: String,
}

#[derive(Deserialize)]
struct CreateAgentResponse {
    agent: AgentJson,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentJson {
    agent_id: String,
    #[serde(default)]
    agent_status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrepareAgentResponse {
    agent_status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAliasResponse {
    agent_alias: AliasJson,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AliasJson {
    agent_alias_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjectsResponse {
    #[serde(default)]
    contents: Vec<ObjectJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectJson {
    key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListVersionsResponse {
    #[serde(default)]
    versions: Vec<VersionJson>,
    #[serde(default)]
    delete_markers: Vec<VersionJson>,
    #[serde(default)]
    is_truncated: bool,
    next_key_marker: Option<String>,
    next_version_id_marker: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VersionJson {
    key: String,
    version_id: String,
}

impl From<VersionJson> for ObjectVersion {
    fn from(v: VersionJson) -> Self {
        Self {
            key: v.key,
            version_id: v.version_id,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteObjectsResponse {
    #[serde(default)]
    errors: Vec<DeleteErrorJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteErrorJson {
    #[serde(default)]
    key: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetRoleResponse {
    role: RoleJson,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleJson {
    arn: String,
}

// ── Agent service ─────────────────────────────────────────────────────────────

impl<R: CommandRunner> AgentControlPlane for AwsCli<R> {
    async fn list_agents(&self, max_results: u32) -> RemoteResult<Vec<AgentSummary>> {
        let max = max_results.to_string();
        let response: ListAgentsResponse = self
            .call_json(
                "ListAgents",
                &args(["bedrock-agent", "list-agents", "--max-results", &max]),
            )
            .await?;
        Ok(response
            .agent_summaries
            .into_iter()
            .map(|a| AgentSummary {
                agent_id: a.agent_id,
                agent_name: a.agent_name,
                status: a.agent_status,
            })
            .collect())
    }

    async fn create_agent(&self, request: &CreateAgentRequest<'_>) -> RemoteResult<CreatedAgent> {
        let ttl = request.idle_session_ttl.to_string();
        let mut call = args([
            "bedrock-agent",
            "create-agent",
            "--agent-name",
            request.name,
            "--agent-resource-role-arn",
            request.execution_role_arn,
            "--description",
            request.description,
            "--foundation-model",
            request.foundation_model,
            "--instruction",
            request.instruction,
            "--idle-session-ttl-in-seconds",
            &ttl,
        ]);
        if !request.tags.is_empty() {
            call.push("--tags".to_string());
            call.push(shorthand_tags(request.tags));
        }
        let response: CreateAgentResponse = self.call_json("CreateAgent", &call).await?;
        Ok(CreatedAgent {
            agent_id: response.agent.agent_id,
            status: response.agent.agent_status,
        })
    }

    async fn prepare_agent(&self, agent_id: &str) -> RemoteResult<String> {
        let response: PrepareAgentResponse = self
            .call_json(
                "PrepareAgent",
                &args(["bedrock-agent", "prepare-agent", "--agent-id", agent_id]),
            )
            .await?;
        Ok(response.agent_status)
    }

    async fn create_agent_alias(&self, agent_id: &str, alias_name: &str) -> RemoteResult<String> {
        let response: CreateAliasResponse = self
            .call_json(
                "CreateAgentAlias",
                &args([
                    "bedrock-agent",
                    "create-agent-alias",
                    "--agent-id",
                    agent_id,
                    "--agent-alias-name",
                    alias_name,
                ]),
            )
            .await?;
        Ok(response.agent_alias.agent_alias_id)
    }

    async fn delete_agent(
        &self,
        agent_id: &str,
        skip_resource_in_use_check: bool,
    ) -> RemoteResult<()> {
        let mut call = args(["bedrock-agent", "delete-agent", "--agent-id", agent_id]);
        if skip_resource_in_use_check {
            call.push("--skip-resource-in-use-check".to_string());
        }
        self.call("DeleteAgent", &call).await.map(drop)
    }
}

// ── Object storage ────────────────────────────────────────────────────────────

impl<R: CommandRunner> ObjectStore for AwsCli<R> {
    async fn head_bucket(&self, bucket: &str) -> RemoteResult<()> {
        self.call("HeadBucket", &args(["s3api", "head-bucket", "--bucket", bucket]))
            .await
            .map(drop)
    }

    async fn list_objects(&self, bucket: &str, max_keys: u32) -> RemoteResult<Vec<String>> {
        let max = max_keys.to_string();
        let response: ListObjectsResponse = self
            .call_json(
                "ListObjectsV2",
                &args([
                    "s3api",
                    "list-objects-v2",
                    "--bucket",
                    bucket,
                    "--max-items",
                    &max,
                ]),
            )
            .await?;
        Ok(response.contents.into_iter().map(|o| o.key).collect())
    }

    async fn create_bucket(&self, bucket: &str) -> RemoteResult<()> {
        let mut call = args(["s3api", "create-bucket", "--bucket", bucket]);
        if self.region != DEFAULT_BUCKET_REGION {
            call.push("--create-bucket-configuration".to_string());
            call.push(format!("LocationConstraint={}", self.region));
        }
        self.call("CreateBucket", &call).await.map(drop)
    }

    async fn delete_bucket(&self, bucket: &str) -> RemoteResult<()> {
        self.call("DeleteBucket", &args(["s3api", "delete-bucket", "--bucket", bucket]))
            .await
            .map(drop)
    }

    async fn put_bucket_versioning(&self, bucket: &str) -> RemoteResult<()> {
        self.call(
            "PutBucketVersioning",
            &args([
                "s3api",
                "put-bucket-versioning",
                "--bucket",
                bucket,
                "--versioning-configuration",
                "Status=Enabled",
            ]),
        )
        .await
        .map(drop)
    }

    async fn put_bucket_encryption(&self, bucket: &str) -> RemoteResult<()> {
        let config = serde_json::json!({
            "Rules": [{ "ApplyServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" } }]
        })
        .to_string();
        self.call(
            "PutBucketEncryption",
            &args([
                "s3api",
                "put-bucket-encryption",
                "--bucket",
                bucket,
                "--server-side-encryption-configuration",
                &config,
            ]),
        )
        .await
        .map(drop)
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[(&str, &str)]) -> RemoteResult<()> {
        let tag_set: Vec<_> = tags
            .iter()
            .map(|(k, v)| serde_json::json!({ "Key": k, "Value": v }))
            .collect();
        let tagging = serde_json::json!({ "TagSet": tag_set }).to_string();
        self.call(
            "PutBucketTagging",
            &args([
                "s3api",
                "put-bucket-tagging",
                "--bucket",
                bucket,
                "--tagging",
                &tagging,
            ]),
        )
        .await
        .map(drop)
    }

    async fn put_empty_object(&self, bucket: &str, key: &str) -> RemoteResult<()> {
        self.call(
            "PutObject",
            &args(["s3api", "put-object", "--bucket", bucket, "--key", key]),
        )
        .await
        .map(drop)
    }

    async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> RemoteResult<VersionPage> {
        let max = MAX_DELETE_BATCH.to_string();
        let mut call = args([
            "s3api",
            "list-object-versions",
            "--bucket",
            bucket,
            "--max-keys",
            &max,
            "--no-paginate",
        ]);
        if let Some(key) = &cursor.key_marker {
            call.push("--key-marker".to_string());
            call.push(key.clone());
        }
        if let Some(version) = &cursor.version_id_marker {
            call.push("--version-id-marker".to_string());
            call.push(version.clone());
        }
        let response: ListVersionsResponse =
            self.call_json("ListObjectVersions", &call).await?;
        let next = if response.is_truncated {
            Some(VersionCursor {
                key_marker: response.next_key_marker,
                version_id_marker: response.next_version_id_marker,
            })
        } else {
            None
        };
        Ok(VersionPage {
            versions: response.versions.into_iter().map(Into::into).collect(),
            delete_markers: response.delete_markers.into_iter().map(Into::into).collect(),
            next,
        })
    }

    async fn delete_objects(&self, bucket: &str, batch: &[ObjectVersion]) -> RemoteResult<()> {
        const OPERATION: &str = "DeleteObjects";
        if batch.len() > MAX_DELETE_BATCH {
            return Err(RemoteError::new(
                OPERATION,
                RemoteErrorKind::Service,
                "TooManyKeys",
                format!("{} keys exceeds the limit of {MAX_DELETE_BATCH}", batch.len()),
            ));
        }
        let objects: Vec<_> = batch
            .iter()
            .map(|o| serde_json::json!({ "Key": o.key, "VersionId": o.version_id }))
            .collect();
        let delete = serde_json::json!({ "Objects": objects, "Quiet": true }).to_string();
        let stdout = self
            .call(
                OPERATION,
                &args(["s3api", "delete-objects", "--bucket", bucket, "--delete", &delete]),
            )
            .await?;
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let response: DeleteObjectsResponse = serde_json::from_slice(&stdout)
            .map_err(|e| RemoteError::malformed(OPERATION, e.to_string()))?;
        match response.errors.first() {
            None => Ok(()),
            Some(first) => Err(RemoteError::new(
                OPERATION,
                RemoteErrorKind::Service,
                first.code.clone(),
                format!(
                    "{} of {} entries not deleted (first: {}: {})",
                    response.errors.len(),
                    batch.len(),
                    first.key,
                    first.message
                ),
            )),
        }
    }
}

// ── Image registry ────────────────────────────────────────────────────────────

impl<R: CommandRunner> ImageRegistry for AwsCli<R> {
    async fn describe_repository(&self, name: &str) -> RemoteResult<()> {
        self.call(
            "DescribeRepositories",
            &args(["ecr", "describe-repositories", "--repository-names", name]),
        )
        .await
        .map(drop)
    }

    async fn create_repository(&self, name: &str) -> RemoteResult<()> {
        self.call(
            "CreateRepository",
            &args(["ecr", "create-repository", "--repository-name", name]),
        )
        .await
        .map(drop)
    }

    async fn delete_repository(&self, name: &str, force: bool) -> RemoteResult<()> {
        let mut call = args(["ecr", "delete-repository", "--repository-name", name]);
        if force {
            call.push("--force".to_string());
        }
        self.call("DeleteRepository", &call).await.map(drop)
    }
}

// ── Identity ──────────────────────────────────────────────────────────────────

impl<R: CommandRunner> IdentityDirectory for AwsCli<R> {
    async fn get_role(&self, name: &str) -> RemoteResult<String> {
        let response: GetRoleResponse = self
            .call_json("GetRole", &args(["iam", "get-role", "--role-name", name]))
            .await?;
        Ok(response.role.arn)
    }
}
