//! User prompts: the yes/no confirmation gate and blocking alerts.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Synchronous confirm/alert collaborator.
pub trait Prompter: Send {
    /// Ask a yes/no question. `true` means go ahead.
    fn confirm(&self, message: &str) -> bool;

    /// Show a notice the user must see.
    fn alert(&self, message: &str);
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N]: ");
        if let Err(e) = io::stdout().flush() {
            warn!("cannot flush prompt: {e}");
        }

        let mut response = String::new();
        match io::stdin().lock().read_line(&mut response) {
            Ok(_) => matches!(response.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("cannot read confirmation: {e}");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠ {message}");
    }
}

/// Answers every confirmation the same way and records what it was shown.
/// Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompter {
    answer: bool,
    log: Arc<Mutex<PromptLog>>,
}

/// Messages a [`FixedPrompter`] has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLog {
    pub confirmations: Vec<String>,
    pub alerts: Vec<String>,
}

impl FixedPrompter {
    /// Confirms everything.
    pub fn yes() -> Self {
        Self::answering(true)
    }

    /// Declines everything.
    pub fn no() -> Self {
        Self::answering(false)
    }

    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            log: Arc::default(),
        }
    }

    pub fn log(&self) -> PromptLog {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, f: impl FnOnce(&mut PromptLog)) {
        let mut log = self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *log);
    }
}

impl Prompter for FixedPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.record(|log| log.confirmations.push(message.to_string()));
        self.answer
    }

    fn alert(&self, message: &str) {
        self.record(|log| log.alerts.push(message.to_string()));
    }
}
