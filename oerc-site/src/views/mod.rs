//! Per-visitor page state and the flows that drive it
//!
//! Each view is plain state plus async flow functions that take the view's
//! mutex, so the HTTP layer only extracts, calls and serializes.

pub mod admin;
pub mod chat;
pub mod home;
mod in_flight;
pub mod library;
pub mod membership;

pub use admin::{AdminError, AdminStatus, AdminTab, AdminView, UploadForm};
pub use chat::{ChatError, ChatResponder, ChatTranscript};
pub use home::{featured, FeaturedWindow};
pub use library::{LibraryError, LibraryMode, LibrarySnapshot, LibraryView, SearchSummary};
pub use membership::{MembershipApplication, MembershipError, MembershipReceipt, NewsletterAck};
