//! # OERC Common Library
//!
//! Shared code for the OERC site including:
//! - Data model (papers, events, chat messages, sessions)
//! - Fixed site content (demo papers, query catalog, events, FAQ)
//! - The shared paper store and its change notifications
//! - Configuration loading
//! - SSE helpers

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod store;

pub use error::{Error, Result};
pub use models::Paper;
pub use store::{PaperStore, StoreEvent};
