//! Interactive secret prompting

use crate::error::{Error, Result};
use std::io::{BufRead, Write};

/// Source of a secret value the store does not have yet
pub trait SecretPrompt: Send + Sync {
    /// Ask for the value of `name`
    fn prompt(&self, name: &str) -> Result<String>;
}

/// Prompts on the terminal and reads one line from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl SecretPrompt for StdinPrompt {
    fn prompt(&self, name: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "Please enter your {name}: ")
            .and_then(|()| stdout.flush())
            .map_err(|e| Error::credential(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::credential(format!("Failed to read {name}: {e}")))?;

        let value = line.trim().to_string();
        if value.is_empty() {
            return Err(Error::credential(format!("No value entered for {name}")));
        }
        Ok(value)
    }
}

/// Never prompts; a missing secret is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl SecretPrompt for NoPrompt {
    fn prompt(&self, name: &str) -> Result<String> {
        Err(Error::credential(format!("Secret '{name}' is not set")))
    }
}
