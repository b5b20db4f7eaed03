//! Infrastructure implementation of the `OperatorPrompt` port.

use std::io::{BufRead as _, IsTerminal as _, Write as _};

use anyhow::{Context, Result};

use crate::application::ports::OperatorPrompt;

/// Reads answers from the terminal, or from piped stdin when not interactive.
pub struct TerminalPrompt {
    /// Answer `yes` without asking (`--yes`, `AGENTCTL_YES`).
    assume_yes: bool,
    /// Never ask; every question gets an empty answer (`CI`).
    non_interactive: bool,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(assume_yes: bool, non_interactive: bool) -> Self {
        Self {
            assume_yes,
            non_interactive,
        }
    }
}

impl OperatorPrompt for TerminalPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        if self.assume_yes {
            tracing::debug!(question, "answering yes without prompting");
            return Ok("yes".to_string());
        }
        if self.non_interactive {
            tracing::debug!(question, "non-interactive, leaving question unanswered");
            return Ok(String::new());
        }
        if std::io::stdin().is_terminal() {
            return dialoguer::Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
                .context("reading answer from terminal");
        }

        // Piped stdin: keep stdout clean for `--json`.
        eprint!("{question}: ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("reading answer from stdin")?;
        Ok(line)
    }
}
