//! FAQ Knowledge Base
//!
//! An ordered, immutable snapshot of FAQ entries plus optional sample questions,
//! and the store that swaps snapshots atomically on reload.
//!
//! ## Ordering
//!
//! Entries keep the order of the source file. The keyword matcher returns the
//! first qualifying entry, so this order is part of the matching behavior and
//! the collection is never re-sorted or keyed.
//!
//! ## Reload
//!
//! `KnowledgeStore::reload()` builds a complete new `KnowledgeBase` and publishes
//! it with a single pointer swap. Readers hold an `Arc` to whatever snapshot was
//! current when they started; they never see a half-loaded one.

pub mod loader;
pub mod watcher;

pub use loader::KnowledgeBaseError;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::types::FaqEntry;

// ============================================================================
// Snapshot
// ============================================================================

/// Ordered knowledge base snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
    samples: Vec<String>,
    loaded_at: DateTime<Utc>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self::with_samples(entries, Vec::new())
    }

    pub fn with_samples(entries: Vec<FaqEntry>, samples: Vec<String>) -> Self {
        Self {
            entries,
            samples,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load from a FAQ JSON file, with an optional samples file.
    pub fn load_json(faq_path: &Path, samples_path: Option<&Path>) -> Result<Self, KnowledgeBaseError> {
        let entries = loader::read_entries(faq_path)?;
        let samples = match samples_path {
            Some(p) => loader::read_samples(p)?,
            None => Vec::new(),
        };
        Ok(Self::with_samples(entries, samples))
    }

    /// Write the entries, in order, as a FAQ JSON file.
    pub fn save_json(&self, path: &Path) -> Result<(), KnowledgeBaseError> {
        loader::write_entries(path, &self.entries)
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries without any keyword; reachable only through full-text matching.
    pub fn keywordless_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.normalized_keywords().next().is_none())
            .count()
    }

    pub fn stats(&self) -> KnowledgeBaseStats {
        KnowledgeBaseStats {
            entries: self.len(),
            samples: self.samples.len(),
            keywordless_entries: self.keywordless_count(),
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }
}

/// Summary served by the admin endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBaseStats {
    pub entries: usize,
    pub samples: usize,
    pub keywordless_entries: usize,
    pub loaded_at: String,
}

// ============================================================================
// Sources
// ============================================================================

/// Where knowledge base snapshots come from.
///
/// Implementations must be thread-safe since the store is shared across
/// request handlers and the watcher task.
pub trait FaqSource: Send + Sync {
    /// Build a fresh snapshot.
    fn load(&self) -> Result<KnowledgeBase, KnowledgeBaseError>;

    /// Source name for logging and stats
    fn source_name(&self) -> String;

    /// Files whose changes should trigger a reload.
    fn watched_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub faq_path: PathBuf,
    pub samples_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(faq_path: impl Into<PathBuf>, samples_path: Option<PathBuf>) -> Self {
        Self {
            faq_path: faq_path.into(),
            samples_path,
        }
    }
}

impl FaqSource for JsonFileSource {
    fn load(&self) -> Result<KnowledgeBase, KnowledgeBaseError> {
        KnowledgeBase::load_json(&self.faq_path, self.samples_path.as_deref())
    }

    fn source_name(&self) -> String {
        self.faq_path.display().to_string()
    }

    fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.faq_path.clone()];
        paths.extend(self.samples_path.clone());
        paths
    }
}

/// Fixed in-memory knowledge base. Reload returns the same content.
#[derive(Debug, Clone)]
pub struct StaticSource(pub KnowledgeBase);

impl FaqSource for StaticSource {
    fn load(&self) -> Result<KnowledgeBase, KnowledgeBaseError> {
        Ok(KnowledgeBase::with_samples(
            self.0.entries.clone(),
            self.0.samples.clone(),
        ))
    }

    fn source_name(&self) -> String {
        "static".to_string()
    }
}

// ============================================================================
// Store
// ============================================================================

/// Holds the current snapshot and knows how to rebuild it.
pub struct KnowledgeStore {
    source: Box<dyn FaqSource>,
    current: ArcSwap<KnowledgeBase>,
}

impl KnowledgeStore {
    /// Load the initial snapshot from `source`.
    pub fn open(source: Box<dyn FaqSource>) -> Result<Self, KnowledgeBaseError> {
        let kb = source.load()?;
        info!(
            source = %source.source_name(),
            entries = kb.len(),
            samples = kb.samples().len(),
            "Knowledge base loaded"
        );
        Ok(Self {
            source,
            current: ArcSwap::from_pointee(kb),
        })
    }

    /// Store over a fixed in-memory knowledge base.
    pub fn from_static(kb: KnowledgeBase) -> Self {
        Self {
            current: ArcSwap::from_pointee(kb.clone()),
            source: Box::new(StaticSource(kb)),
        }
    }

    /// Current snapshot. Cheap; callers keep it for the whole request.
    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        self.current.load_full()
    }

    /// Rebuild from the source and publish. On error the previous snapshot stays.
    pub fn reload(&self) -> Result<Arc<KnowledgeBase>, KnowledgeBaseError> {
        let kb = Arc::new(self.source.load()?);
        self.current.store(Arc::clone(&kb));
        info!(
            source = %self.source.source_name(),
            entries = kb.len(),
            "Knowledge base reloaded"
        );
        Ok(kb)
    }

    pub fn source_name(&self) -> String {
        self.source.source_name()
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.source.watched_paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_faq(path: &Path, answer: &str) {
        let entries = vec![FaqEntry::new("how do I reset my password", &["password"], answer)];
        loader::write_entries(path, &entries).unwrap();
    }

    #[test]
    fn test_stats() {
        let kb = KnowledgeBase::with_samples(
            vec![
                FaqEntry::new("q1", &["a"], "x"),
                FaqEntry::new("q2", &[], "y"),
                FaqEntry::new("q3", &[" "], "z"),
            ],
            vec!["sample".to_string()],
        );
        let stats = kb.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.samples, 1);
        assert_eq!(stats.keywordless_entries, 2);
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        write_faq(&path, "old");

        let store = KnowledgeStore::open(Box::new(JsonFileSource::new(&path, None))).unwrap();
        let before = store.snapshot();
        assert_eq!(before.entries()[0].answer, "old");

        write_faq(&path, "new");
        store.reload().unwrap();

        // The old snapshot held by a reader is untouched.
        assert_eq!(before.entries()[0].answer, "old");
        assert_eq!(store.snapshot().entries()[0].answer, "new");
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        write_faq(&path, "good");
        let store = KnowledgeStore::open(Box::new(JsonFileSource::new(&path, None))).unwrap();

        std::fs::write(&path, "[{broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.snapshot().entries()[0].answer, "good");
    }

    #[test]
    fn test_open_missing_file() {
        let result = KnowledgeStore::open(Box::new(JsonFileSource::new("/nonexistent/faq.json", None)));
        assert!(matches!(result, Err(KnowledgeBaseError::Io(..))));
    }

    #[test]
    fn test_static_store() {
        let store = KnowledgeStore::from_static(KnowledgeBase::new(vec![FaqEntry::new("q", &[], "a")]));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.reload().unwrap().len(), 1);
        assert_eq!(store.source_name(), "static");
        assert!(store.watched_paths().is_empty());
    }

    #[test]
    fn test_json_source_watched_paths() {
        let src = JsonFileSource::new("faq.json", Some(PathBuf::from("samples.json")));
        assert_eq!(src.watched_paths().len(), 2);
    }
}
