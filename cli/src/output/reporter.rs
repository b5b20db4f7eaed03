//! `TerminalReporter`: presentation-layer implementation of the reporting ports.
//!
//! Wraps `&OutputContext` and implements `ProgressReporter` and
//! `TranscriptWriter` so application services can emit progress events and
//! stream agent responses without depending on any presentation type directly.

use std::io::Write as _;

use owo_colors::OwoColorize as _;

use crate::application::ports::{ProgressReporter, TranscriptWriter};
use crate::domain::PromptOutcome;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
/// - `error()` prints `"  ✗ {message}"` to stderr (never suppressed)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.ctx.error(message);
    }
}

impl TranscriptWriter for TerminalReporter<'_> {
    fn begin_prompt(&self, index: usize, total: usize, prompt: &str) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.banner(&format!("Test {index}/{total}"));
        println!("  {} {prompt}", "Prompt:".style(self.ctx.styles.prompt));
        self.ctx.rule();
    }

    fn fragment(&self, text: &str) {
        if self.ctx.quiet {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn end_prompt(&self, outcome: &PromptOutcome) {
        if let Some(error) = &outcome.error {
            self.ctx.error(&format!("error invoking agent: {error}"));
        }
        if !self.ctx.quiet {
            println!();
            self.ctx.rule();
        }
    }
}
