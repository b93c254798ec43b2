//! Research library view
//!
//! Per-visitor state machine over three modes:
//! - `browsing`: all papers, optionally narrowed by selected tags
//! - `loading`: a search is in flight
//! - `detail`: a single selected paper
//!
//! Tag filtering is an intersection: a paper is shown only if it carries every
//! selected tag. Search results are merged to the front of the shared list.

use std::collections::BTreeSet;
use std::sync::Arc;

use oerc_common::models::Paper;
use oerc_common::store::PaperStore;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use super::in_flight::InFlight;
use crate::services::QueryService;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("A search is already in progress")]
    Busy,

    #[error("Paper not found: {0}")]
    PaperNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LibraryMode {
    #[default]
    Browsing,
    Loading {
        query: String,
    },
    Detail {
        paper_id: String,
    },
}

#[derive(Debug, Default)]
pub struct LibraryView {
    mode: LibraryMode,
    selected_tags: Vec<String>,
    last_search: Option<SearchSummary>,
}

/// Outcome of the last completed search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub results: usize,
    /// Results not already in the shared list
    pub added: usize,
    pub fallback: bool,
}

/// What the library page shows
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySnapshot {
    pub mode: LibraryMode,
    pub selected_tags: Vec<String>,
    pub available_tags: Vec<String>,
    pub total: usize,
    pub papers: Vec<Paper>,
    pub selected: Option<Paper>,
    pub last_search: Option<SearchSummary>,
}

impl LibraryView {
    pub fn mode(&self) -> &LibraryMode {
        &self.mode
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    /// Enter loading for `text`
    ///
    /// Returns the trimmed query, or None for blank input (no state change).
    /// Clears the tag filter and any selection.
    pub fn begin_search(&mut self, text: &str) -> Result<Option<String>, LibraryError> {
        if matches!(self.mode, LibraryMode::Loading { .. }) {
            return Err(LibraryError::Busy);
        }
        let query = text.trim();
        if query.is_empty() {
            return Ok(None);
        }
        self.selected_tags.clear();
        self.mode = LibraryMode::Loading {
            query: query.to_string(),
        };
        Ok(Some(query.to_string()))
    }

    pub fn finish_search(&mut self, summary: SearchSummary) {
        self.mode = LibraryMode::Browsing;
        self.last_search = Some(summary);
    }

    /// Leave loading without a result
    fn abandon_search(&mut self) {
        if matches!(self.mode, LibraryMode::Loading { .. }) {
            self.mode = LibraryMode::Browsing;
        }
    }

    /// Add `tag` to the filter, or remove it if already selected
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }

    /// Show one paper from `papers`
    pub fn select(&mut self, papers: &[Paper], id: &str) -> Result<(), LibraryError> {
        if matches!(self.mode, LibraryMode::Loading { .. }) {
            return Err(LibraryError::Busy);
        }
        if !papers.iter().any(|p| p.id == id) {
            return Err(LibraryError::PaperNotFound(id.to_string()));
        }
        self.mode = LibraryMode::Detail {
            paper_id: id.to_string(),
        };
        Ok(())
    }

    /// Leave detail mode
    pub fn back(&mut self) {
        if matches!(self.mode, LibraryMode::Detail { .. }) {
            self.mode = LibraryMode::Browsing;
        }
    }

    /// Render against the current shared list
    ///
    /// A detail view whose paper has since been deleted reads as browsing.
    pub fn snapshot(&self, papers: &[Paper]) -> LibrarySnapshot {
        let selected = match &self.mode {
            LibraryMode::Detail { paper_id } => {
                papers.iter().find(|p| &p.id == paper_id).cloned()
            }
            _ => None,
        };
        let mode = match (&self.mode, &selected) {
            (LibraryMode::Detail { .. }, None) => LibraryMode::Browsing,
            (mode, _) => mode.clone(),
        };

        LibrarySnapshot {
            mode,
            selected_tags: self.selected_tags.clone(),
            available_tags: available_tags(papers),
            total: papers.len(),
            papers: filter_by_tags(papers, &self.selected_tags),
            selected,
            last_search: self.last_search.clone(),
        }
    }
}

/// Sorted, unique tags across `papers`
pub fn available_tags(papers: &[Paper]) -> Vec<String> {
    papers
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Papers carrying every tag in `selected`
pub fn filter_by_tags(papers: &[Paper], selected: &[String]) -> Vec<Paper> {
    papers
        .iter()
        .filter(|p| selected.iter().all(|tag| p.has_tag(tag)))
        .cloned()
        .collect()
}

/// Run a search for one visitor
///
/// The view lock is released while the query service works, so the visitor's
/// other calls are not blocked. Returns None for blank input. If the caller
/// goes away mid-search the view drops back to browsing.
pub async fn run_search(
    view: &Arc<Mutex<LibraryView>>,
    query_service: &QueryService,
    store: &PaperStore,
    text: &str,
) -> Result<Option<SearchSummary>, LibraryError> {
    let query = match view.lock().await.begin_search(text)? {
        Some(query) => query,
        None => return Ok(None),
    };
    let in_flight = InFlight::new(view, LibraryView::abandon_search);

    let outcome = query_service.search(&query).await;
    let results = outcome.papers.len();
    let added = if results > 0 {
        store.merge_front(outcome.papers).await
    } else {
        0
    };

    info!(query = %query, results, added, fallback = outcome.fallback, "Library search complete");

    let summary = SearchSummary {
        query,
        results,
        added,
        fallback: outcome.fallback,
    };
    let mut v = view.lock().await;
    in_flight.disarm();
    v.finish_search(summary.clone());
    Ok(Some(summary))
}
