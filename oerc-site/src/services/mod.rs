//! External-facing services
//!
//! - `repository`: paper persistence, file storage and auth against the
//!   hosted backend (or the offline stand-in when unconfigured)
//! - `query`: the mock research query service

pub mod offline;
pub mod query;
pub mod repository;

use thiserror::Error;

pub use offline::OfflineRepository;
pub use query::{QueryOutcome, QueryService};
pub use repository::{
    connect, BackendMode, Listing, ListingSource, NewPaper, PaperRepository, SupabaseRepository,
    UploadFile,
};

/// Errors from the hosted backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Auth provider rejected the request; message is the provider's own
    #[error("{0}")]
    Auth(String),

    /// Target row does not exist (or is not visible to this session)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend URL or key missing; writes are rejected
    #[error("Backend not configured")]
    NotConfigured,
}
