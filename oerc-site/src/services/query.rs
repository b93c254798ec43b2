//! Mock research query service
//!
//! Stands in for an external research API: filters a fixed catalog after an
//! artificial delay. Never fails and never returns an empty result for a
//! non-empty query; when nothing matches, the first [`FALLBACK_COUNT`]
//! catalog entries are returned and the outcome is flagged as a fallback.

use std::time::Duration;

use oerc_common::catalog::query_catalog;
use oerc_common::config::Latency;
use oerc_common::models::Paper;
use serde::Serialize;
use tokio::time::sleep;
use tracing::debug;

/// Entries returned when a query matches nothing
pub const FALLBACK_COUNT: usize = 3;

/// Search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOutcome {
    pub papers: Vec<Paper>,
    /// True when nothing matched and the leading catalog entries were returned
    pub fallback: bool,
}

pub struct QueryService {
    catalog: Vec<Paper>,
    search_delay: Duration,
    summary_delay: Duration,
}

impl QueryService {
    /// Service over the standard catalog with the configured delays
    pub fn new(latency: &Latency) -> Self {
        Self::with_catalog(query_catalog(), latency.search, latency.summary)
    }

    pub fn with_catalog(
        catalog: Vec<Paper>,
        search_delay: Duration,
        summary_delay: Duration,
    ) -> Self {
        Self {
            catalog,
            search_delay,
            summary_delay,
        }
    }

    pub fn catalog(&self) -> &[Paper] {
        &self.catalog
    }

    /// Search after the configured delay
    pub async fn search(&self, query: &str) -> QueryOutcome {
        sleep(self.search_delay).await;
        self.search_now(query)
    }

    /// Search without delay
    ///
    /// A blank query yields no papers and no fallback; callers reject blank
    /// input before searching.
    pub fn search_now(&self, query: &str) -> QueryOutcome {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return QueryOutcome {
                papers: Vec::new(),
                fallback: false,
            };
        }

        let matches: Vec<Paper> = self
            .catalog
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .cloned()
            .collect();

        debug!(query = %needle, matches = matches.len(), "Catalog search");

        if matches.is_empty() {
            QueryOutcome {
                papers: self.catalog.iter().take(FALLBACK_COUNT).cloned().collect(),
                fallback: true,
            }
        } else {
            QueryOutcome {
                papers: matches,
                fallback: false,
            }
        }
    }

    /// One-paragraph summary of `paper`, after the configured delay
    pub async fn summarize(&self, paper: &Paper) -> String {
        sleep(self.summary_delay).await;
        summary_text(paper)
    }
}

/// Summary sentence for `paper`
pub fn summary_text(paper: &Paper) -> String {
    format!(
        "This research by {} explores {}. The study presents valuable insights for Ontario educators seeking evidence-based approaches to improving student outcomes.",
        paper.author,
        paper.tags.join(", ").to_lowercase()
    )
}
