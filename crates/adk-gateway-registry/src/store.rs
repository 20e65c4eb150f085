//! JSON file registry.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use adk_gateway_core::{GatewayError, RegistryDocument, RegistryEntry};
use tokio::sync::Mutex;

/// Result of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Document holds at least one entry.
    Entries(Vec<RegistryEntry>),
    /// Document exists but its `agents` array is empty.
    Empty,
}

/// Registry persisted as `{"agents": [...]}` at a fixed path.
///
/// Every operation re-reads the document so external edits are picked up.
/// Mutations hold a process-local lock across their read-modify-write cycle;
/// there is no cross-process file lock, so concurrent writers in other
/// processes can still lose updates.
pub struct JsonFileRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRegistry {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List all entries.
    ///
    /// # Errors
    /// Returns `NotFound` if the document is absent, `Malformed` if it cannot
    /// be parsed.
    pub async fn list(&self) -> Result<Listing, GatewayError> {
        let doc = self.read().await?.ok_or_else(|| self.not_found())?;
        if doc.agents.is_empty() {
            Ok(Listing::Empty)
        } else {
            Ok(Listing::Entries(doc.agents))
        }
    }

    /// Append an entry. Names are not deduplicated.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a bad URL, `Malformed` if the existing
    /// document cannot be parsed, `Io` if it cannot be written.
    pub async fn add(&self, name: &str, url: &str) -> Result<(), GatewayError> {
        let entry = RegistryEntry::new(name, url)?;

        let _guard = self.write_lock.lock().await;
        let mut doc = self.read().await?.unwrap_or_default();
        doc.agents.push(entry);
        self.write(&doc).await?;

        tracing::info!(name, url, path = %self.path.display(), "Added ADK server");
        Ok(())
    }

    /// Remove every entry named `name`, returning how many were removed.
    ///
    /// The document is rewritten even when nothing matched.
    ///
    /// # Errors
    /// Returns `NotFound` if the document is absent (it is not created),
    /// `Malformed` if it cannot be parsed, `Io` if it cannot be written.
    pub async fn remove(&self, name: &str) -> Result<usize, GatewayError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read().await?.ok_or_else(|| self.not_found())?;
        let removed = doc.remove_named(name);
        self.write(&doc).await?;

        tracing::info!(name, removed, path = %self.path.display(), "Removed ADK server");
        Ok(removed)
    }

    async fn read(&self) -> Result<Option<RegistryDocument>, GatewayError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => RegistryDocument::parse(&text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, doc: &RegistryDocument) -> Result<(), GatewayError> {
        tokio::fs::write(&self.path, doc.to_pretty_json()?).await?;
        Ok(())
    }

    fn not_found(&self) -> GatewayError {
        GatewayError::NotFound(self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn registry(dir: &tempfile::TempDir) -> JsonFileRegistry {
        JsonFileRegistry::new(dir.path().join("adk_agent_list.json"))
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);

        registry.add("local", "http://localhost:8000").await.unwrap();
        registry.add("prod", "https://adk.example.com").await.unwrap();

        let Listing::Entries(entries) = registry.list().await.unwrap() else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "local");
        assert_eq!(entries[0].url, "http://localhost:8000");
        assert_eq!(entries[1].name, "prod");
    }

    #[tokio::test]
    async fn test_remove_drops_all_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);

        registry.add("dup", "http://a:1").await.unwrap();
        registry.add("keep", "http://b:2").await.unwrap();
        registry.add("dup", "http://c:3").await.unwrap();

        assert_eq!(registry.remove("dup").await.unwrap(), 2);
        let Listing::Entries(entries) = registry.list().await.unwrap() else {
            panic!("expected entries");
        };
        assert!(entries.iter().all(|e| e.name != "dup"));
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_without_document_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);

        let err = registry.remove("anything").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
        assert!(!registry.path().exists());
    }

    #[tokio::test]
    async fn test_remove_unmatched_still_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        std::fs::write(registry.path(), r#"{"agents":[{"name":"a","url":"http://a"}]}"#).unwrap();

        assert_eq!(registry.remove("zzz").await.unwrap(), 0);
        let text = std::fs::read_to_string(registry.path()).unwrap();
        assert!(text.contains("\n  \"agents\": ["), "rewritten pretty: {text}");
    }

    #[tokio::test]
    async fn test_list_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);

        assert!(matches!(registry.list().await, Err(GatewayError::NotFound(_))));

        registry.add("only", "http://only:1").await.unwrap();
        registry.remove("only").await.unwrap();
        assert_eq!(registry.list().await.unwrap(), Listing::Empty);
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        std::fs::write(registry.path(), r#"{"servers": []}"#).unwrap();

        assert!(matches!(registry.list().await, Err(GatewayError::Malformed(_))));
        assert!(matches!(
            registry.add("x", "http://x").await,
            Err(GatewayError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);

        let err = registry.add("bad", "not-a-url").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
        assert!(!registry.path().exists());
    }

    #[tokio::test]
    async fn test_rewrites_keep_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        std::fs::write(
            registry.path(),
            r#"{"version":2,"agents":[{"name":"a","url":"http://a","description":"prod"}]}"#,
        )
        .unwrap();

        registry.add("b", "http://b").await.unwrap();
        registry.remove("b").await.unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(registry.path()).unwrap()).unwrap();
        assert_eq!(doc["version"], 2);
        assert_eq!(doc["agents"][0]["description"], "prod");
        assert_eq!(doc["agents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_picks_up_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        registry.add("a", "http://a:1").await.unwrap();

        std::fs::write(registry.path(), r#"{"agents":[{"name":"edited","url":"http://e"}]}"#)
            .unwrap();

        let Listing::Entries(entries) = registry.list().await.unwrap() else {
            panic!("expected entries");
        };
        assert_eq!(entries[0].name, "edited");
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(registry(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .add(&format!("server-{i}"), &format!("http://host-{i}:8000"))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let Listing::Entries(entries) = registry.list().await.unwrap() else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 16);
    }
}
