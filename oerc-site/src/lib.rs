//! oerc-site library
//!
//! Back end for the Ontario Educational Research Consortium website: the
//! shared research library, per-visitor library/admin/chat state, and the
//! JSON API over them.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use oerc_common::config::Latency;
use oerc_common::store::PaperStore;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod api;
pub mod services;
pub mod views;
pub mod visitors;

use services::{ListingSource, PaperRepository, QueryService};
use views::ChatResponder;
use visitors::VisitorRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The shared paper list
    pub store: Arc<PaperStore>,
    /// Hosted backend, or the offline stand-in
    pub repository: Arc<dyn PaperRepository>,
    pub query: Arc<QueryService>,
    pub chat: Arc<ChatResponder>,
    pub visitors: Arc<VisitorRegistry>,
    pub latency: Latency,
    source: Arc<RwLock<ListingSource>>,
}

impl AppState {
    /// Create new application state with an empty paper list
    pub fn new(repository: Arc<dyn PaperRepository>, latency: Latency) -> Self {
        Self {
            store: Arc::new(PaperStore::new()),
            repository,
            query: Arc::new(QueryService::new(&latency)),
            chat: Arc::new(ChatResponder::standard(latency.chat)),
            visitors: Arc::new(VisitorRegistry::new()),
            latency,
            source: Arc::new(RwLock::new(ListingSource::Demo)),
        }
    }

    /// Fetch the listing from the repository and replace the shared list
    pub async fn load_papers(&self) -> ListingSource {
        let listing = self.repository.list().await;
        let count = listing.papers.len();
        self.store.replace(listing.papers).await;
        *self.source.write().await = listing.source;

        match listing.source {
            ListingSource::Backend => info!(count, "Loaded papers from backend"),
            ListingSource::Demo => warn!(count, "Serving demo papers"),
        }
        listing.source
    }

    /// Where the last load came from
    pub async fn listing_source(&self) -> ListingSource {
        *self.source.read().await
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let library = Router::new()
        .route("/api/library", get(api::library::get_library))
        .route("/api/library/search", post(api::library::search))
        .route("/api/library/tags/toggle", post(api::library::toggle_tag))
        .route("/api/library/tags/clear", post(api::library::clear_tags))
        .route("/api/library/select", post(api::library::select))
        .route("/api/library/back", post(api::library::back))
        .route("/api/library/papers/:id/summary", get(api::library::summary));

    let admin = Router::new()
        .route("/api/admin/login", post(api::admin::login))
        .route("/api/admin/logout", post(api::admin::logout))
        .route("/api/admin/session", get(api::admin::session))
        .route("/api/admin/tab", post(api::admin::set_tab))
        .route(
            "/api/admin/papers",
            get(api::admin::list_papers)
                .post(api::admin::upload)
                .layer(DefaultBodyLimit::max(api::admin::MAX_UPLOAD_BYTES)),
        )
        .route("/api/admin/papers/:id", delete(api::admin::delete_paper));

    let public = Router::new()
        .route("/api/visitors", post(api::create_visitor))
        .route("/api/papers", get(api::pages::list_papers))
        .route("/api/papers/stream", get(api::paper_stream))
        .route("/api/home/featured", get(api::pages::featured_papers))
        .route("/api/pages/events", get(api::pages::events))
        .route("/api/pages/conferences", get(api::pages::conferences))
        .route("/api/pages/faq", get(api::pages::faq))
        .route("/api/membership/checkout", post(api::membership::checkout))
        .route("/api/newsletter", post(api::membership::newsletter))
        .route("/api/chat", get(api::chat::transcript).post(api::chat::send))
        .merge(api::health_routes());

    Router::new()
        .merge(library)
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
