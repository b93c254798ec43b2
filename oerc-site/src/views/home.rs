//! Featured carousel on the home page
//!
//! Shows the first few papers of the shared list. The client tracks the
//! active index; this module only normalizes it and names the neighbours.

use oerc_common::models::Paper;
use serde::Serialize;

/// Papers in the carousel
pub const FEATURED_COUNT: usize = 4;

/// Seconds between automatic advances
pub const ROTATE_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedWindow {
    pub papers: Vec<Paper>,
    /// Active slide, always < `papers.len()` when non-empty
    pub index: usize,
    pub current: Option<Paper>,
    pub next_index: usize,
    pub prev_index: usize,
    pub rotate_interval_secs: u64,
}

/// Carousel over `papers` positioned at `index`
///
/// Out-of-range indices wrap, so a client holding a stale index after the
/// list shrank still lands on a real slide.
pub fn featured(papers: &[Paper], index: usize) -> FeaturedWindow {
    let slides: Vec<Paper> = papers.iter().take(FEATURED_COUNT).cloned().collect();
    let len = slides.len();
    if len == 0 {
        return FeaturedWindow {
            papers: slides,
            index: 0,
            current: None,
            next_index: 0,
            prev_index: 0,
            rotate_interval_secs: ROTATE_INTERVAL_SECS,
        };
    }

    let index = index % len;
    FeaturedWindow {
        current: slides.get(index).cloned(),
        next_index: (index + 1) % len,
        prev_index: (index + len - 1) % len,
        index,
        papers: slides,
        rotate_interval_secs: ROTATE_INTERVAL_SECS,
    }
}
