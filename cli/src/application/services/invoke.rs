//! Application service: agent smoke-test use-case.
//!
//! Sends each prompt in its own session and streams the response fragments
//! to the transcript as they arrive. A failed prompt is recorded with an empty
//! response and the loop moves on.

use std::time::Duration;

use agentctl_common::DeploymentRecord;
use chrono::Utc;
use futures_util::StreamExt;

use crate::application::ports::{AgentRuntime, InvokeRequest, Pause, TranscriptWriter};
use crate::domain::{PromptOutcome, SmokeTestReport, session_id};

/// Send every prompt to the deployed agent, pausing `delay` between prompts.
pub async fn run_prompts(
    runtime: &impl AgentRuntime,
    pause: &impl Pause,
    transcript: &impl TranscriptWriter,
    record: &DeploymentRecord,
    prompts: &[String],
    delay: Duration,
) -> SmokeTestReport {
    let total = prompts.len();
    let mut outcomes = Vec::with_capacity(total);
    for (index, prompt) in prompts.iter().enumerate() {
        transcript.begin_prompt(index + 1, total, prompt);
        let outcome = invoke_once(runtime, transcript, record, prompt).await;
        transcript.end_prompt(&outcome);
        outcomes.push(outcome);

        if index + 1 < total && !delay.is_zero() {
            pause.pause(delay, "waiting before next prompt").await;
        }
    }
    SmokeTestReport {
        agent_id: record.agent_id.clone(),
        alias_id: record.alias_id.clone(),
        agent_name: record.agent_name.clone(),
        outcomes,
    }
}

async fn invoke_once(
    runtime: &impl AgentRuntime,
    transcript: &impl TranscriptWriter,
    record: &DeploymentRecord,
    prompt: &str,
) -> PromptOutcome {
    let session = session_id(Utc::now().timestamp());
    let request = InvokeRequest {
        agent_id: &record.agent_id,
        alias_id: &record.alias_id,
        session_id: &session,
        input_text: prompt,
    };

    let mut response = String::new();
    let error = match runtime.invoke_agent(&request).await {
        Err(e) => Some(e.to_string()),
        Ok(mut fragments) => {
            let mut failure = None;
            while let Some(item) = fragments.next().await {
                match item {
                    Ok(text) => {
                        transcript.fragment(&text);
                        response.push_str(&text);
                    }
                    Err(e) => {
                        failure = Some(e.to_string());
                        break;
                    }
                }
            }
            failure
        }
    };
    if error.is_some() {
        tracing::warn!(agent_id = %record.agent_id, session = %session, "prompt failed");
        response.clear();
    }

    PromptOutcome {
        prompt: prompt.to_string(),
        session_id: session,
        response,
        error,
    }
}
