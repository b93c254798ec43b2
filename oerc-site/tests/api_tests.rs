//! Integration tests for oerc-site API endpoints
//!
//! Runs the full router against an in-memory repository with no artificial
//! latency. Covers:
//! - Health and degraded mode
//! - Visitor identification and isolation
//! - Library search, tag filtering and detail mode
//! - Admin sign-in, upload and confirmed delete
//! - Chat, membership checkout and newsletter

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use oerc_common::catalog::demo_papers;
use oerc_common::config::Latency;
use oerc_common::models::{Paper, Session, User};
use oerc_site::services::{
    BackendError, BackendMode, Listing, ListingSource, NewPaper, OfflineRepository,
    PaperRepository,
};
use oerc_site::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const ADMIN_EMAIL: &str = "admin@oerc.org";
const ADMIN_PASSWORD: &str = "correct horse";
const BOUNDARY: &str = "oerc-test-boundary";

/// Repository backed by a vector; accepts one fixed account
#[derive(Default)]
struct MemoryRepository {
    rows: Mutex<Vec<Paper>>,
}

impl MemoryRepository {
    fn seeded() -> Self {
        Self {
            rows: Mutex::new(demo_papers()),
        }
    }
}

fn admin_session() -> Session {
    Session {
        access_token: "token".into(),
        refresh_token: None,
        expires_in: Some(3600),
        user: User {
            id: "admin-1".into(),
            email: Some(ADMIN_EMAIL.into()),
        },
    }
}

#[async_trait]
impl PaperRepository for MemoryRepository {
    fn mode(&self) -> BackendMode {
        BackendMode::Hosted
    }

    async fn list(&self) -> Listing {
        Listing {
            papers: self.rows.lock().unwrap().clone(),
            source: ListingSource::Backend,
        }
    }

    async fn create(&self, _session: &Session, paper: NewPaper) -> Result<Paper, BackendError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Paper {
            id: format!("row-{}", rows.len() + 1),
            title: paper.title,
            author: paper.author,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            abstract_text: paper.abstract_text,
            tags: paper.tags,
            image_url: Some(match paper.image {
                Some(image) => format!("https://storage.test/images/{}", image.file_name),
                None => "https://picsum.photos/seed/1/800/400".into(),
            }),
            pdf_url: Some(format!("https://storage.test/papers/{}", paper.document.file_name)),
        };
        rows.insert(0, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, _session: &Session, id: &str) -> Result<(), BackendError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            Err(BackendError::NotFound(id.to_string()))
        } else {
            Ok(())
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            Ok(admin_session())
        } else {
            Err(BackendError::Auth("Invalid login credentials".into()))
        }
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), BackendError> {
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<Option<User>, BackendError> {
        Ok(Some(session.user.clone()))
    }
}

/// Test helper: Create app over `repository` with papers loaded
async fn setup_app(repository: Arc<dyn PaperRepository>) -> axum::Router {
    let state = AppState::new(repository, Latency::none());
    state.load_papers().await;
    build_router(state)
}

async fn hosted_app() -> axum::Router {
    setup_app(Arc::new(MemoryRepository::seeded())).await
}

fn request(method: &str, uri: &str, visitor: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = visitor {
        builder = builder.header("x-visitor-id", id);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn call(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

async fn new_visitor(app: &axum::Router) -> String {
    let (status, body) = call(app, request("POST", "/api/visitors", None, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["visitor_id"].as_str().unwrap().to_string()
}

async fn sign_in(app: &axum::Router, visitor: &str) {
    let (status, body) = call(
        app,
        request(
            "POST",
            "/api/admin/login",
            Some(visitor),
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(visitor: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/admin/papers")
        .header("x-visitor-id", visitor)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn ids(papers: &Value) -> Vec<String> {
    papers
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health and degraded mode
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = hosted_app().await;
    let (status, body) = call(&app, request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "oerc-site");
    assert_eq!(body["backend"], "hosted");
    assert_eq!(body["papers"], 6);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_degraded_mode_serves_demo_and_rejects_login() {
    let app = setup_app(Arc::new(OfflineRepository)).await;

    let (_, health) = call(&app, request("GET", "/health", None, None)).await;
    assert_eq!(health["backend"], "offline");

    let (status, body) = call(&app, request("GET", "/api/papers", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "demo");
    assert_eq!(ids(&body["papers"]), ids(&json!(demo_papers())));

    let visitor = new_visitor(&app).await;
    let (status, body) = call(
        &app,
        request(
            "POST",
            "/api/admin/login",
            Some(&visitor),
            Some(json!({ "email": "a@b.c", "password": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Backend not configured");
}

// =============================================================================
// Visitors
// =============================================================================

#[tokio::test]
async fn test_visitor_header_required() {
    let app = hosted_app().await;

    let (status, body) = call(&app, request("GET", "/api/library", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("x-visitor-id"));

    let (status, _) = call(&app, request("GET", "/api/library", Some("not-a-uuid"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, _) = call(&app, request("GET", "/api/library", Some(&unknown), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_visitor_state_is_isolated() {
    let app = hosted_app().await;
    let a = new_visitor(&app).await;
    let b = new_visitor(&app).await;

    call(
        &app,
        request("POST", "/api/library/tags/toggle", Some(&a), Some(json!({ "tag": "Equity" }))),
    )
    .await;

    let (_, lib_a) = call(&app, request("GET", "/api/library", Some(&a), None)).await;
    let (_, lib_b) = call(&app, request("GET", "/api/library", Some(&b), None)).await;
    assert_eq!(lib_a["selected_tags"], json!(["Equity"]));
    assert_eq!(lib_b["selected_tags"], json!([]));
    assert_eq!(lib_b["papers"].as_array().unwrap().len(), 6);
}

// =============================================================================
// Library
// =============================================================================

#[tokio::test]
async fn test_search_merges_results_into_shared_list() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, body) = call(
        &app,
        request(
            "POST",
            "/api/library/search",
            Some(&visitor),
            Some(json!({ "query": "literacy" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search"]["results"], 1);
    assert_eq!(body["search"]["fallback"], false);
    assert_eq!(body["library"]["mode"]["state"], "browsing");
    assert_eq!(body["library"]["papers"][0]["id"], "paper-5");

    // Visible to every visitor
    let (_, papers) = call(&app, request("GET", "/api/papers", None, None)).await;
    assert_eq!(papers["total"], 7);
    assert_eq!(papers["papers"][0]["id"], "paper-5");
}

#[tokio::test]
async fn test_search_without_match_is_flagged_fallback() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (_, body) = call(
        &app,
        request("POST", "/api/library/search", Some(&visitor), Some(json!({ "query": "zzzzz" }))),
    )
    .await;
    assert_eq!(body["search"]["fallback"], true);
    assert_eq!(
        ids(&body["library"]["papers"])[..3],
        ["paper-1", "paper-2", "paper-3"]
    );
}

#[tokio::test]
async fn test_blank_search_does_nothing() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, body) = call(
        &app,
        request("POST", "/api/library/search", Some(&visitor), Some(json!({ "query": "   " }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["search"].is_null());
    assert_eq!(body["library"]["total"], 6);
}

#[tokio::test]
async fn test_disjoint_tags_then_clear() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    for tag in ["Equity", "AI in Education"] {
        call(
            &app,
            request(
                "POST",
                "/api/library/tags/toggle",
                Some(&visitor),
                Some(json!({ "tag": tag })),
            ),
        )
        .await;
    }
    let (_, body) = call(&app, request("GET", "/api/library", Some(&visitor), None)).await;
    assert!(body["papers"].as_array().unwrap().is_empty());

    let clear = request("POST", "/api/library/tags/clear", Some(&visitor), None);
    let (_, body) = call(&app, clear).await;
    assert_eq!(body["papers"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_select_summary_and_back() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, body) = call(
        &app,
        request("POST", "/api/library/select", Some(&visitor), Some(json!({ "id": "demo-2" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"]["state"], "detail");
    assert_eq!(body["selected"]["id"], "demo-2");

    let (status, summary) = call(
        &app,
        request("GET", "/api/library/papers/demo-2/summary", Some(&visitor), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(summary["summary"].as_str().unwrap().starts_with("This research by"));

    let (_, body) = call(&app, request("POST", "/api/library/back", Some(&visitor), None)).await;
    assert_eq!(body["mode"]["state"], "browsing");

    let (status, _) = call(
        &app,
        request("POST", "/api/library/select", Some(&visitor), Some(json!({ "id": "nope" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_login_failure_passes_provider_message() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, body) = call(
        &app,
        request(
            "POST",
            "/api/admin/login",
            Some(&visitor),
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid login credentials");

    let (_, session) = call(&app, request("GET", "/api/admin/session", Some(&visitor), None)).await;
    assert_eq!(session["authenticated"], false);
    assert_eq!(session["auth_error"], "Invalid login credentials");
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, _) = call(&app, request("GET", "/api/admin/papers", Some(&visitor), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        request("DELETE", "/api/admin/papers/demo-1?confirm=true", Some(&visitor), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_prepends_and_switches_to_list() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let (_, status) = call(
        &app,
        request("POST", "/api/admin/tab", Some(&visitor), Some(json!({ "tab": "upload" }))),
    )
    .await;
    assert_eq!(status["tab"], "upload");

    let body = multipart_body(
        &[
            ("title", "Outdoor Learning"),
            ("author", "Dr. Pat Lee"),
            ("abstract", "Effects of outdoor classrooms."),
            ("tags", "Nature, Pedagogy,"),
        ],
        &[("document", "study.pdf", b"%PDF-1.4")],
    );
    let (status, paper) = call(&app, upload_request(&visitor, body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(paper["title"], "Outdoor Learning");
    assert_eq!(paper["tags"], json!(["Nature", "Pedagogy"]));
    assert!(paper["image_url"].as_str().unwrap().contains("picsum.photos"));

    let (_, papers) = call(&app, request("GET", "/api/admin/papers", Some(&visitor), None)).await;
    assert_eq!(papers["papers"][0]["id"], paper["id"]);
    assert_eq!(papers["total"], 7);

    let (_, status) = call(&app, request("GET", "/api/admin/session", Some(&visitor), None)).await;
    assert_eq!(status["tab"], "list");
}

#[tokio::test]
async fn test_upload_uses_supplied_image() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let body = multipart_body(
        &[("title", "T"), ("author", "A"), ("abstract", "X")],
        &[("document", "d.pdf", b"pdf"), ("image", "cover.png", b"png")],
    );
    let (status, paper) = call(&app, upload_request(&visitor, body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(paper["image_url"], "https://storage.test/images/cover.png");
}

#[tokio::test]
async fn test_upload_requires_fields() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let body = multipart_body(&[("title", "T"), ("author", "A"), ("abstract", "X")], &[]);
    let (status, body) = call(&app, upload_request(&visitor, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: document");
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let (status, body) = call(
        &app,
        request("DELETE", "/api/admin/papers/demo-3", Some(&visitor), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Are you sure you want to delete this paper?");

    let (status, body) = call(
        &app,
        request("DELETE", "/api/admin/papers/demo-3?confirm=true", Some(&visitor), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], "demo-3");

    let (_, papers) = call(&app, request("GET", "/api/papers", None, None)).await;
    let remaining = ids(&papers["papers"]);
    assert_eq!(remaining.len(), 5);
    assert!(!remaining.contains(&"demo-3".to_string()));
}

#[tokio::test]
async fn test_delete_unknown_paper_leaves_list() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let (status, _) = call(
        &app,
        request("DELETE", "/api/admin/papers/ghost?confirm=true", Some(&visitor), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, papers) = call(&app, request("GET", "/api/papers", None, None)).await;
    assert_eq!(papers["total"], 6);
}

#[tokio::test]
async fn test_logout_returns_to_gate() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;
    sign_in(&app, &visitor).await;

    let logout = request("POST", "/api/admin/logout", Some(&visitor), None);
    let (status, body) = call(&app, logout).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
}

// =============================================================================
// Chat, pages, membership
// =============================================================================

#[tokio::test]
async fn test_chat_round_trip() {
    let app = hosted_app().await;
    let visitor = new_visitor(&app).await;

    let (status, reply) = call(
        &app,
        request("POST", "/api/chat", Some(&visitor), Some(json!({ "message": "How do I join?" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["role"], "model");
    assert!(reply["text"].as_str().unwrap().contains("$50 CAD/year"));

    let (_, transcript) = call(&app, request("GET", "/api/chat", Some(&visitor), None)).await;
    assert_eq!(transcript["messages"].as_array().unwrap().len(), 2);
    assert_eq!(transcript["pending"], false);

    let (status, _) = call(
        &app,
        request("POST", "/api/chat", Some(&visitor), Some(json!({ "message": "  " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_featured_carousel_wraps() {
    let app = hosted_app().await;
    let (status, body) = call(&app, request("GET", "/api/home/featured?index=5", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["papers"].as_array().unwrap().len(), 4);
    assert_eq!(body["index"], 1);
    assert_eq!(body["current"]["id"], "demo-2");
}

#[tokio::test]
async fn test_content_pages() {
    let app = hosted_app().await;
    for page in ["events", "conferences", "faq"] {
        let uri = format!("/api/pages/{page}");
        let (status, body) = call(&app, request("GET", &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK, "page {page}");
        assert!(!body.as_array().unwrap().is_empty(), "page {page}");
    }
}

#[tokio::test]
async fn test_membership_checkout_and_newsletter() {
    let app = hosted_app().await;

    let (status, receipt) = call(
        &app,
        request(
            "POST",
            "/api/membership/checkout",
            None,
            Some(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.org",
                "accept_privacy": true
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["status"], "active");
    assert_eq!(receipt["tier"], "Standard");
    assert_eq!(receipt["fee_cad"], 50);

    let (status, _) = call(
        &app,
        request("POST", "/api/membership/checkout", None, Some(json!({ "first_name": "Ada" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, ack) = call(
        &app,
        request("POST", "/api/newsletter", None, Some(json!({ "email": "x@y.ca" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["subscribed"], true);
}
