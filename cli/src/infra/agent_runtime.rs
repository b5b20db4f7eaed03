//! Infrastructure implementation of the `AgentRuntime` port.
//!
//! `InvokeAgent` answers with an event stream, which the `aws` CLI does not
//! expose, so this port goes through the SDK client. Completion chunks are
//! decoded incrementally with [`Utf8Fragments`].

use std::time::Duration;

use aws_sdk_bedrockagentruntime::Client;
use aws_sdk_bedrockagentruntime::config::{BehaviorVersion, Region};
use aws_sdk_bedrockagentruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockagentruntime::primitives::Blob;
use aws_sdk_bedrockagentruntime::types::ResponseStream;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tokio::time::Instant;

use crate::application::ports::{AgentRuntime, FragmentStream, InvokeRequest, RemoteResult};
use crate::domain::{RemoteError, Utf8Fragments};

const OPERATION: &str = "InvokeAgent";

/// Timeout for a whole agent invocation, including the streamed response.
pub const INVOKE_TIMEOUT: Duration = Duration::from_secs(120);

/// One event of an invocation response, reduced to what the smoke test reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// Bytes of the agent's answer. May end inside a multi-byte character.
    Chunk(Vec<u8>),
    /// Trace, return-control and file events.
    Other,
}

/// Agent runtime client backed by the SDK.
pub struct SdkAgentRuntime {
    client: Client,
    timeout: Duration,
}

impl SdkAgentRuntime {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: INVOKE_TIMEOUT,
        }
    }

    /// Client for `region`, with credentials from the default provider chain.
    pub async fn from_env(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AgentRuntime for SdkAgentRuntime {
    async fn invoke_agent(&self, request: &InvokeRequest<'_>) -> RemoteResult<FragmentStream> {
        let deadline = Instant::now() + self.timeout;
        tracing::debug!(
            agent_id = request.agent_id,
            session = request.session_id,
            "invoking agent"
        );
        let send = self
            .client
            .invoke_agent()
            .agent_id(request.agent_id)
            .agent_alias_id(request.alias_id)
            .session_id(request.session_id)
            .input_text(request.input_text)
            .send();
        let output = tokio::time::timeout_at(deadline, send)
            .await
            .map_err(|_| deadline_passed())?
            .map_err(sdk_error)?;

        let events = stream::unfold(output.completion, |mut receiver| async move {
            match receiver.recv().await {
                Ok(Some(event)) => Some((Ok(response_event(event)), receiver)),
                Ok(None) => None,
                Err(e) => Some((Err(sdk_error(e)), receiver)),
            }
        });
        Ok(decode_events(events, deadline))
    }
}

fn response_event(event: ResponseStream) -> ResponseEvent {
    match event {
        ResponseStream::Chunk(part) => {
            ResponseEvent::Chunk(part.bytes.map(Blob::into_inner).unwrap_or_default())
        }
        _ => ResponseEvent::Other,
    }
}

fn sdk_error<E, R>(err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let SdkError::ServiceError(service) = &err {
        let e = service.err();
        return RemoteError::from_code(
            OPERATION,
            e.code().unwrap_or("Unknown"),
            e.message().unwrap_or_default(),
        );
    }
    RemoteError::transport(OPERATION, DisplayErrorContext(&err).to_string())
}

fn deadline_passed() -> RemoteError {
    RemoteError::transport(OPERATION, "no complete response before the invocation deadline")
}

/// Turn response events into text fragments in arrival order.
///
/// The stream ends after the first error. Passing `deadline` is an error.
pub fn decode_events<S>(events: S, deadline: Instant) -> FragmentStream
where
    S: Stream<Item = RemoteResult<ResponseEvent>> + Send + 'static,
{
    let decoder = EventDecoder {
        events: events.boxed(),
        text: Utf8Fragments::new(),
        deadline,
        finished: false,
    };
    stream::unfold(decoder, |mut decoder| async move {
        decoder.next_fragment().await.map(|item| (item, decoder))
    })
    .boxed()
}

struct EventDecoder {
    events: BoxStream<'static, RemoteResult<ResponseEvent>>,
    text: Utf8Fragments,
    deadline: Instant,
    finished: bool,
}

impl EventDecoder {
    async fn next_fragment(&mut self) -> Option<RemoteResult<String>> {
        while !self.finished {
            match tokio::time::timeout_at(self.deadline, self.events.next()).await {
                Err(_) => {
                    self.finished = true;
                    tracing::warn!(operation = OPERATION, "response timed out");
                    return Some(Err(deadline_passed()));
                }
                Ok(Some(Ok(ResponseEvent::Chunk(bytes)))) => {
                    let text = self.text.push(&bytes);
                    if !text.is_empty() {
                        return Some(Ok(text));
                    }
                }
                Ok(Some(Ok(ResponseEvent::Other))) => {}
                Ok(Some(Err(e))) => {
                    self.finished = true;
                    tracing::warn!(kind = ?e.kind, code = %e.code, "invocation failed mid-response");
                    return Some(Err(e));
                }
                Ok(None) => {
                    self.finished = true;
                    let rest = self.text.finish();
                    return (!rest.is_empty()).then_some(Ok(rest));
                }
            }
        }
        None
    }
}
