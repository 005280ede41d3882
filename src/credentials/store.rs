//! File-backed credential store
//!
//! Secrets live in one pretty-printed JSON object. The file (and its
//! directory) is created with `{}` on first access; writes go through a temp
//! file and a rename. There is no locking: concurrent writers race and the
//! last one wins.

use super::prompt::{SecretPrompt, StdinPrompt};
use crate::config::default_credentials_path;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, METABASE_SEARCH_KEY};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Resolves a secret by name
pub trait SecretProvider: Send + Sync {
    /// Return the value of the secret `name`
    fn secret(&self, name: &str) -> Result<String>;
}

/// JSON file of named secrets
pub struct CredentialStore {
    /// Path to the credential file
    path: PathBuf,
    /// Asked when a secret is missing
    prompt: Box<dyn SecretPrompt>,
}

impl CredentialStore {
    /// Create a store at `path` that prompts on stdin for missing secrets
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_prompt(path, StdinPrompt)
    }

    /// Create a store with a custom prompt
    pub fn with_prompt(path: impl AsRef<Path>, prompt: impl SecretPrompt + 'static) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            prompt: Box::new(prompt),
        }
    }

    /// Store at the default location, `~/.lnapi/.cred`
    pub fn default_location() -> Self {
        Self::new(default_credentials_path())
    }

    /// Path of the credential file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory and an empty JSON object if the file is missing
    pub fn ensure_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::credential(format!(
                        "Failed to create credential directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        debug!(path = %self.path.display(), "Creating empty credential file");
        self.write_all(&JsonObject::new())
    }

    /// Read every stored secret
    pub fn all(&self) -> Result<JsonObject> {
        self.ensure_file()?;
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::credential(format!(
                "Failed to read credential file {}: {e}",
                self.path.display()
            ))
        })?;
        if contents.trim().is_empty() {
            return Ok(JsonObject::new());
        }
        match serde_json::from_str(&contents) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(_) => Err(Error::credential(format!(
                "Credential file {} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(Error::credential(format!(
                "Failed to parse credential file {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Look up a secret without prompting
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.all()?.get(name).and_then(secret_string))
    }

    /// Store one secret
    #[instrument(level = "debug", skip(self, value), fields(path = %self.path.display()), err)]
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        self.set_many([(name.to_string(), value.to_string())])
    }

    /// Merge several secrets into the file
    pub fn set_many<I>(&self, secrets: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut all = self.all()?;
        for (name, value) in secrets {
            all.insert(name, JsonValue::String(value));
        }
        self.write_all(&all)
    }

    /// Look up a secret, prompting for it and persisting the answer on a miss
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()), err)]
    pub fn get_or_prompt(&self, name: &str) -> Result<String> {
        if let Some(value) = self.get(name)? {
            return Ok(value);
        }
        info!(name, "Secret not found in credential store, prompting");
        let value = self.prompt.prompt(name)?;
        self.set(name, &value)?;
        Ok(value)
    }

    fn write_all(&self, secrets: &JsonObject) -> Result<()> {
        let contents = serde_json::to_string_pretty(secrets)
            .map_err(|e| Error::credential(format!("Failed to serialize credentials: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, contents).map_err(|e| {
            Error::credential(format!(
                "Failed to write credential file {}: {e}",
                temp_path.display()
            ))
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            Error::credential(format!(
                "Failed to replace credential file {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl SecretProvider for CredentialStore {
    fn secret(&self, name: &str) -> Result<String> {
        self.get_or_prompt(name)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Store the Metabase search key
pub fn set_metabase_search_key(store: &CredentialStore, value: &str) -> Result<()> {
    store.set(METABASE_SEARCH_KEY, value)
}

fn secret_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// In-memory secrets
// ============================================================================

/// Fixed set of secrets, for tests and callers that resolve keys themselves
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, String>,
}

impl StaticSecrets {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretProvider for StaticSecrets {
    fn secret(&self, name: &str) -> Result<String> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::credential(format!("Secret '{name}' is not set")))
    }
}
