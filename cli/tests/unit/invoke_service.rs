//! Unit tests for the smoke-test prompt loop.

#![allow(clippy::expect_used)]

use std::time::Duration;

use agentctl_cli::application::services::invoke::run_prompts;
use agentctl_cli::domain::{RemoteErrorKind, SmokeTestReport};
use agentctl_common::StorageMode;

use crate::helpers::record;
use crate::mocks::{MockCloud, RecordingPause, RecordingTranscript, remote_err};

fn prompts(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("prompt {i}")).collect()
}

async fn run(
    cloud: &MockCloud,
    transcript: &RecordingTranscript,
    pause: &RecordingPause,
    prompts: &[String],
    delay: Duration,
) -> SmokeTestReport {
    let record = record(Some(StorageMode::Shared), Some("company-bedrock-agents"));
    run_prompts(cloud, pause, transcript, &record, prompts, delay).await
}

#[tokio::test]
async fn fragments_are_streamed_and_concatenated_in_order() {
    let cloud = MockCloud::new().with_response(vec![
        Ok("The video ".to_string()),
        Ok("shows a ".to_string()),
        Ok("home run.".to_string()),
    ]);
    let transcript = RecordingTranscript::default();

    let report = run(
        &cloud,
        &transcript,
        &RecordingPause::default(),
        &prompts(1),
        Duration::ZERO,
    )
    .await;

    let outcome = &report.outcomes[0];
    assert!(outcome.succeeded());
    assert_eq!(outcome.response, "The video shows a home run.");
    assert!(outcome.session_id.starts_with("test-session-"));
    assert_eq!(
        *transcript.fragments.lock().expect("lock"),
        ["The video ", "shows a ", "home run."]
    );
    assert_eq!(
        *transcript.begun.lock().expect("lock"),
        [(1, 1, "prompt 1".to_string())]
    );
    assert_eq!(transcript.ended.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn pauses_between_prompts_but_not_after_the_last() {
    let cloud = MockCloud::new();
    let pause = RecordingPause::default();

    let report = run(
        &cloud,
        &RecordingTranscript::default(),
        &pause,
        &prompts(3),
        Duration::from_secs(2),
    )
    .await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(pause.pauses(), [Duration::from_secs(2), Duration::from_secs(2)]);
}

#[tokio::test]
async fn zero_delay_never_pauses() {
    let pause = RecordingPause::default();
    run(
        &MockCloud::new(),
        &RecordingTranscript::default(),
        &pause,
        &prompts(3),
        Duration::ZERO,
    )
    .await;
    assert!(pause.pauses().is_empty());
}

#[tokio::test]
async fn mid_stream_failure_discards_partial_response_and_continues() {
    let cloud = MockCloud::new()
        .with_response(vec![
            Ok("partial".to_string()),
            Err(remote_err("InvokeAgent", RemoteErrorKind::Transport)),
            Ok("never read".to_string()),
        ])
        .with_response(vec![Ok("second answer".to_string())]);

    let report = run(
        &cloud,
        &RecordingTranscript::default(),
        &RecordingPause::default(),
        &prompts(2),
        Duration::ZERO,
    )
    .await;

    let first = &report.outcomes[0];
    assert!(!first.succeeded());
    assert!(first.response.is_empty());
    assert!(
        first
            .error
            .as_deref()
            .is_some_and(|e| e.contains("InvokeAgent")),
        "{first:?}"
    );
    assert_eq!(report.outcomes[1].response, "second answer");
    assert_eq!(report.failures(), 1);
}

#[tokio::test]
async fn failure_to_open_the_exchange_still_tries_every_prompt() {
    let cloud = MockCloud::new().fail("InvokeAgent", RemoteErrorKind::AccessDenied);
    let transcript = RecordingTranscript::default();

    let report = run(
        &cloud,
        &transcript,
        &RecordingPause::default(),
        &prompts(3),
        Duration::ZERO,
    )
    .await;

    assert_eq!(cloud.calls_to("InvokeAgent").len(), 3);
    assert_eq!(report.failures(), 3);
    assert_eq!(transcript.ended.lock().expect("lock").len(), 3);
    assert!(transcript.fragments.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn report_carries_the_deployed_identifiers() {
    let cloud = MockCloud::new();
    let report = run(
        &cloud,
        &RecordingTranscript::default(),
        &RecordingPause::default(),
        &prompts(1),
        Duration::ZERO,
    )
    .await;

    assert_eq!(report.agent_id, crate::mocks::AGENT_ID);
    assert_eq!(report.alias_id, crate::mocks::ALIAS_ID);
    assert_eq!(
        cloud.calls_to("InvokeAgent"),
        [format!(
            "InvokeAgent {} {} prompt 1",
            crate::mocks::AGENT_ID,
            crate::mocks::ALIAS_ID
        )]
    );
}
