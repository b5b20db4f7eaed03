//! Smoke-test invocation types and incremental response decoding.

use serde::Serialize;

/// Session id for one prompt: `test-session-{unix_seconds}`.
#[must_use]
pub fn session_id(unix_secs: i64) -> String {
    format!("test-session-{unix_secs}")
}

/// Incremental UTF-8 decoder for response bytes.
///
/// A multi-byte character split across two reads is held back until the
/// rest arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Fragments {
    pending: Vec<u8>,
}

impl Utf8Fragments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning all text that is complete so far.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flush whatever is left at end of stream.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

/// Result of sending one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptOutcome {
    pub prompt: String,
    pub session_id: String,
    /// Concatenated fragments in arrival order. Empty when the prompt failed.
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromptOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// All prompt outcomes of one `test` run.
#[derive(Debug, Clone, Serialize)]
pub struct SmokeTestReport {
    pub agent_id: String,
    pub alias_id: String,
    pub agent_name: String,
    pub outcomes: Vec<PromptOutcome>,
}

impl SmokeTestReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}
