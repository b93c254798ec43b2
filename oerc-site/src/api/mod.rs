//! HTTP API handlers for oerc-site

pub mod admin;
pub mod chat;
pub mod error;
pub mod health;
pub mod library;
pub mod membership;
pub mod pages;
pub mod sse;
pub mod visitor;

pub use error::ApiError;
pub use health::health_routes;
pub use sse::paper_stream;
pub use visitor::{create_visitor, CurrentVisitor, VISITOR_HEADER};
