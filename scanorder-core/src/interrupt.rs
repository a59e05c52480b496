use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a yes/no question is waiting for input. Nothing has been
/// renamed at that point, so an interrupt may end the process right away.
static PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Marks the prompt as active until dropped
pub struct PromptGuard;

impl PromptGuard {
    pub fn activate() -> Self {
        PROMPT_ACTIVE.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    }
}

pub fn prompt_active() -> bool {
    PROMPT_ACTIVE.load(Ordering::SeqCst)
}

/// Ask a `[y/N]` question on stderr and read the answer from stdin
pub fn confirm(question: &str) -> Result<bool> {
    confirm_with_input(question, &mut io::stdin().lock())
}

fn confirm_with_input<R: BufRead>(question: &str, reader: &mut R) -> Result<bool> {
    let _guard = PromptGuard::activate();

    eprint!("{} [y/N]: ", question);
    io::stderr().flush().context("Failed to flush stderr")?;

    let mut input = String::new();
    reader
        .read_line(&mut input)
        .context("Failed to read user input")?;
    let input = input.trim().to_lowercase();

    Ok(input == "y" || input == "yes")
}
