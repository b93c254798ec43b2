//! Shared paper list
//!
//! The single in-memory copy of the research library. The backend is the
//! durable source of truth; this store is refreshed wholesale on load and
//! patched as uploads, deletes and searches complete.
//!
//! # Invariants
//! - Paper identifiers are unique. Every write path deduplicates, keeping the
//!   first occurrence in the resulting order.
//! - Writers are last-write-wins; no ordering is imposed between concurrent
//!   callers.

use std::collections::HashSet;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::models::Paper;

/// Default number of buffered change notifications
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Change notification emitted after each successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    /// Whole list replaced
    Replaced { count: usize },
    /// Papers merged to the front (search results)
    Merged { ids: Vec<String> },
    /// One paper inserted at the front (upload)
    Inserted { id: String },
    /// One paper removed (delete)
    Removed { id: String },
}

impl StoreEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::Replaced { .. } => "PapersReplaced",
            StoreEvent::Merged { .. } => "PapersMerged",
            StoreEvent::Inserted { .. } => "PaperInserted",
            StoreEvent::Removed { .. } => "PaperRemoved",
        }
    }
}

/// Owned, observable paper list
pub struct PaperStore {
    papers: RwLock<Vec<Paper>>,
    tx: broadcast::Sender<StoreEvent>,
}

impl PaperStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create an empty store buffering `capacity` change notifications
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            papers: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Copy of the current list
    pub async fn snapshot(&self) -> Vec<Paper> {
        self.papers.read().await.clone()
    }

    /// Look up one paper by id
    pub async fn get(&self, id: &str) -> Option<Paper> {
        self.papers.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.papers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.papers.read().await.is_empty()
    }

    /// Receive all changes made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Replace the whole list
    pub async fn replace(&self, papers: Vec<Paper>) {
        let papers = dedup_by_id(papers);
        let count = papers.len();
        *self.papers.write().await = papers;
        debug!(count, "Paper store replaced");
        self.emit(StoreEvent::Replaced { count });
    }

    /// Put `incoming` at the front, dropping existing entries with the same id
    ///
    /// Returns the number of papers that were not already in the store.
    pub async fn merge_front(&self, incoming: Vec<Paper>) -> usize {
        let incoming = dedup_by_id(incoming);
        if incoming.is_empty() {
            return 0;
        }
        let ids: Vec<String> = incoming.iter().map(|p| p.id.clone()).collect();
        let added = {
            let mut papers = self.papers.write().await;
            let incoming_ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            let before = papers.len();
            papers.retain(|p| !incoming_ids.contains(p.id.as_str()));
            let added = incoming.len() - (before - papers.len());
            let mut merged = incoming;
            merged.append(&mut papers);
            *papers = merged;
            added
        };
        debug!(merged = ids.len(), added, "Papers merged into store");
        self.emit(StoreEvent::Merged { ids });
        added
    }

    /// Insert a single paper at the front, replacing any entry with its id
    pub async fn insert_front(&self, paper: Paper) {
        let id = paper.id.clone();
        {
            let mut papers = self.papers.write().await;
            papers.retain(|p| p.id != id);
            papers.insert(0, paper);
        }
        self.emit(StoreEvent::Inserted { id });
    }

    /// Remove the paper with `id`; true if one was removed
    pub async fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut papers = self.papers.write().await;
            let before = papers.len();
            papers.retain(|p| p.id != id);
            papers.len() != before
        };
        if removed {
            self.emit(StoreEvent::Removed { id: id.to_string() });
        }
        removed
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

impl Default for PaperStore {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup_by_id(papers: Vec<Paper>) -> Vec<Paper> {
    let mut seen = HashSet::new();
    papers
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}
