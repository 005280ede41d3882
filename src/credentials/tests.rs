//! Tests for the credential store

use super::*;
use crate::error::{Error, Result};
use crate::types::{METABASE_SEARCH_KEY, WSAPI_CLIENT_ID};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Prompt that answers with a fixed value and counts how often it was asked
#[derive(Clone)]
struct CountingPrompt {
    answer: String,
    asked: Arc<AtomicUsize>,
}

impl SecretPrompt for CountingPrompt {
    fn prompt(&self, _name: &str) -> Result<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

// ============================================================================
// File Lifecycle Tests
// ============================================================================

#[test]
fn test_file_created_lazily() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".lnapi").join(".cred");
    let store = CredentialStore::with_prompt(&path, NoPrompt);

    assert!(!path.exists());
    assert!(store.all().unwrap().is_empty());
    assert!(path.exists());
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
}

#[test]
fn test_set_and_get() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::with_prompt(dir.path().join("cred.json"), NoPrompt);

    store.set(METABASE_SEARCH_KEY, "abc123").unwrap();
    assert_eq!(
        store.get(METABASE_SEARCH_KEY).unwrap(),
        Some("abc123".to_string())
    );
    assert_eq!(store.get("missing").unwrap(), None);
}

#[test]
fn test_set_merges_existing() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::with_prompt(dir.path().join("cred.json"), NoPrompt);

    store.set(METABASE_SEARCH_KEY, "one").unwrap();
    store.set(WSAPI_CLIENT_ID, "client").unwrap();
    store.set(METABASE_SEARCH_KEY, "two").unwrap();

    let all = store.all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[METABASE_SEARCH_KEY], "two");
    assert_eq!(all[WSAPI_CLIENT_ID], "client");
}

#[test]
fn test_file_is_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cred.json");
    let store = CredentialStore::with_prompt(&path, NoPrompt);
    store.set("a", "1").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["a"], "1");
}

#[test]
fn test_non_string_values_are_stringified() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cred.json");
    std::fs::write(&path, r#"{"port": 8080, "nested": {"x": 1}}"#).unwrap();
    let store = CredentialStore::with_prompt(&path, NoPrompt);

    assert_eq!(store.get("port").unwrap(), Some("8080".to_string()));
    assert_eq!(store.get("nested").unwrap(), None);
}

#[test]
fn test_corrupt_file_is_credential_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cred.json");
    std::fs::write(&path, "not json").unwrap();
    let store = CredentialStore::with_prompt(&path, NoPrompt);

    let err = store.get("x").unwrap_err();
    assert!(matches!(err, Error::Credential { .. }));
}

#[test]
fn test_non_object_file_is_credential_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cred.json");
    std::fs::write(&path, "[1, 2]").unwrap();
    let store = CredentialStore::with_prompt(&path, NoPrompt);

    assert!(matches!(store.all(), Err(Error::Credential { .. })));
}

// ============================================================================
// Prompting Tests
// ============================================================================

#[test]
fn test_get_or_prompt_persists_answer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cred.json");
    let asked = Arc::new(AtomicUsize::new(0));
    let store = CredentialStore::with_prompt(
        &path,
        CountingPrompt {
            answer: "typed-key".to_string(),
            asked: asked.clone(),
        },
    );

    assert_eq!(store.get_or_prompt(METABASE_SEARCH_KEY).unwrap(), "typed-key");
    assert_eq!(store.get_or_prompt(METABASE_SEARCH_KEY).unwrap(), "typed-key");
    assert_eq!(asked.load(Ordering::SeqCst), 1);

    let reopened = CredentialStore::with_prompt(&path, NoPrompt);
    assert_eq!(
        reopened.secret(METABASE_SEARCH_KEY).unwrap(),
        "typed-key".to_string()
    );
}

#[test]
fn test_no_prompt_missing_secret() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::with_prompt(dir.path().join("cred.json"), NoPrompt);

    let err = store.secret(METABASE_SEARCH_KEY).unwrap_err();
    assert!(matches!(err, Error::Credential { .. }));
    assert!(err.to_string().contains(METABASE_SEARCH_KEY));
}

#[test]
fn test_set_metabase_search_key() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::with_prompt(dir.path().join("cred.json"), NoPrompt);

    set_metabase_search_key(&store, "k").unwrap();
    assert_eq!(store.secret(METABASE_SEARCH_KEY).unwrap(), "k");
}

// ============================================================================
// StaticSecrets Tests
// ============================================================================

#[test]
fn test_static_secrets() {
    let secrets = StaticSecrets::new().with(METABASE_SEARCH_KEY, "static");
    assert_eq!(secrets.secret(METABASE_SEARCH_KEY).unwrap(), "static");
    assert!(matches!(
        secrets.secret("other"),
        Err(Error::Credential { .. })
    ));
}
