//! Paper repository client
//!
//! Persists paper rows, uploads documents and cover images, and passes
//! authentication through to the hosted backend (a Supabase-style REST API).
//!
//! # Endpoints
//! - Rows: `{url}/rest/v1/papers` (PostgREST filters and ordering)
//! - Objects: `{url}/storage/v1/object/{bucket}/{key}`
//! - Public objects: `{url}/storage/v1/object/public/{bucket}/{key}`
//! - Auth: `{url}/auth/v1/token`, `/auth/v1/logout`, `/auth/v1/user`
//!
//! Listing never fails: any error or an empty table yields the demo set.
//! Create has no compensating rollback; a failed insert leaves the uploaded
//! objects in storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use oerc_common::catalog::demo_papers;
use oerc_common::config::BackendConfig;
use oerc_common::models::{Paper, Session, User};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{BackendError, OfflineRepository};

/// Paper rows table
pub const PAPERS_TABLE: &str = "papers";

/// Storage prefix for uploaded documents
pub const DOCUMENT_PREFIX: &str = "papers";

/// Storage prefix for uploaded cover images
pub const IMAGE_PREFIX: &str = "images";

/// Default timeout for backend requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Which backend the repository talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Hosted,
    Offline,
}

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Backend,
    Demo,
}

/// Result of a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub papers: Vec<Paper>,
    pub source: ListingSource,
}

impl Listing {
    pub fn demo() -> Self {
        Self {
            papers: demo_papers(),
            source: ListingSource::Demo,
        }
    }
}

/// File received from an upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validated input for a new paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaper {
    pub title: String,
    pub author: String,
    pub abstract_text: String,
    pub tags: Vec<String>,
    pub document: UploadFile,
    pub image: Option<UploadFile>,
}

/// Paper persistence and auth pass-through
#[async_trait]
pub trait PaperRepository: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// All papers, newest first; falls back to the demo set
    async fn list(&self) -> Listing;

    /// Upload files and insert a row; returns the stored record
    async fn create(&self, session: &Session, paper: NewPaper) -> Result<Paper, BackendError>;

    /// Delete one row by id
    async fn delete(&self, session: &Session, id: &str) -> Result<(), BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self, session: &Session) -> Result<(), BackendError>;

    /// User behind `session`, or None if the provider no longer accepts it
    async fn current_user(&self, session: &Session) -> Result<Option<User>, BackendError>;
}

/// Build the repository for `config`
///
/// Missing URL or key selects the offline repository.
pub fn connect(config: &BackendConfig) -> Result<Arc<dyn PaperRepository>, BackendError> {
    match config.credentials() {
        Some((url, key)) => Ok(Arc::new(SupabaseRepository::new(url, key, &config.bucket)?)),
        None => Ok(Arc::new(OfflineRepository)),
    }
}

/// Storage key: `{prefix}/{millis}_{file_name}`
///
/// Path separators in the file name are replaced so the key stays under its
/// prefix.
pub fn storage_key(prefix: &str, millis: i64, file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}/{}_{}", prefix, millis, name)
}

/// Cover image used when none was uploaded
pub fn placeholder_image_url(seed: i64) -> String {
    format!("https://picsum.photos/seed/{}/800/400", seed)
}

/// Row as returned by the backend
#[derive(Debug, Deserialize)]
struct PaperRow {
    id: serde_json::Value,
    title: String,
    author: String,
    date: NaiveDate,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    pdf_url: Option<String>,
}

impl From<PaperRow> for Paper {
    fn from(row: PaperRow) -> Self {
        // Ids may be integers or uuids depending on the table definition
        let id = match row.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Paper {
            id,
            title: row.title,
            author: row.author,
            date: row.date,
            abstract_text: row.abstract_text.unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
            image_url: row.image_url,
            pdf_url: row.pdf_url,
        }
    }
}

/// Row sent on insert
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InsertRow {
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub tags: Vec<String>,
    pub date: NaiveDate,
    pub pdf_url: String,
    pub image_url: String,
}

impl InsertRow {
    /// Build the row for `paper`; image URL falls back to the placeholder
    pub fn new(
        paper: &NewPaper,
        pdf_url: String,
        image_url: Option<String>,
        date: NaiveDate,
        placeholder_seed: i64,
    ) -> Self {
        Self {
            title: paper.title.clone(),
            author: paper.author.clone(),
            abstract_text: paper.abstract_text.clone(),
            tags: paper.tags.clone(),
            date,
            pdf_url,
            image_url: image_url.unwrap_or_else(|| placeholder_image_url(placeholder_seed)),
        }
    }
}

/// Client for the hosted backend
pub struct SupabaseRepository {
    http_client: Client,
    base_url: Url,
    anon_key: String,
    bucket: String,
}

impl SupabaseRepository {
    /// Create a client for `base_url` using the public `anon_key`
    pub fn new(base_url: &str, anon_key: &str, bucket: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Parse(format!("Invalid backend URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Parse(format!("Invalid backend URL {}", base_url)));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "apikey",
            header::HeaderValue::from_str(anon_key)
                .map_err(|e| BackendError::Parse(format!("Invalid backend key: {}", e)))?,
        );

        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// `{base}/{segments...}`, each segment percent-encoded
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn table_url(&self) -> Url {
        self.endpoint(["rest", "v1", PAPERS_TABLE])
    }

    fn object_url(&self, key: &str) -> Url {
        self.endpoint(
            ["storage", "v1", "object", self.bucket.as_str()]
                .into_iter()
                .chain(key.split('/')),
        )
    }

    /// Public address of a stored object
    pub fn public_url(&self, key: &str) -> String {
        self.endpoint(
            ["storage", "v1", "object", "public", self.bucket.as_str()]
                .into_iter()
                .chain(key.split('/')),
        )
        .to_string()
    }

    fn with_bearer(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        request.bearer_auth(token.unwrap_or(self.anon_key.as_str()))
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn fetch_rows(&self) -> Result<Vec<Paper>, BackendError> {
        let mut url = self.table_url();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "date.desc");

        let response = Self::send(self.with_bearer(self.http_client.get(url), None)).await?;
        let rows: Vec<PaperRow> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse paper rows: {}", e)))?;
        Ok(rows.into_iter().map(Paper::from).collect())
    }

    /// Upload one file and return its public URL
    async fn upload_object(
        &self,
        session: &Session,
        key: &str,
        file: &UploadFile,
    ) -> Result<String, BackendError> {
        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        debug!(key = %key, bytes = file.bytes.len(), "Uploading object");
        let request = self
            .http_client
            .post(self.object_url(key))
            .header(header::CONTENT_TYPE, content_type)
            .body(file.bytes.clone());
        Self::send(self.with_bearer(request, Some(&session.access_token))).await?;

        Ok(self.public_url(key))
    }

    async fn insert_row(&self, session: &Session, row: &InsertRow) -> Result<Paper, BackendError> {
        let request = self
            .http_client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(row);
        let response = Self::send(self.with_bearer(request, Some(&session.access_token))).await?;

        let mut rows: Vec<PaperRow> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse inserted row: {}", e)))?;
        if rows.is_empty() {
            return Err(BackendError::Parse("Insert returned no row".to_string()));
        }
        Ok(rows.swap_remove(0).into())
    }
}

#[async_trait]
impl PaperRepository for SupabaseRepository {
    fn mode(&self) -> BackendMode {
        BackendMode::Hosted
    }

    async fn list(&self) -> Listing {
        match self.fetch_rows().await {
            Ok(papers) if !papers.is_empty() => {
                debug!(count = papers.len(), "Loaded papers from backend");
                Listing {
                    papers,
                    source: ListingSource::Backend,
                }
            }
            Ok(_) => {
                info!("Backend returned no papers, using demo data");
                Listing::demo()
            }
            Err(e) => {
                warn!(error = %e, "Backend error, using demo data");
                Listing::demo()
            }
        }
    }

    async fn create(&self, session: &Session, paper: NewPaper) -> Result<Paper, BackendError> {
        let millis = Utc::now().timestamp_millis();

        let document_key = storage_key(DOCUMENT_PREFIX, millis, &paper.document.file_name);
        let pdf_url = self
            .upload_object(session, &document_key, &paper.document)
            .await?;

        let image_url = match &paper.image {
            Some(image) => {
                let image_key = storage_key(IMAGE_PREFIX, millis, &image.file_name);
                Some(self.upload_object(session, &image_key, image).await?)
            }
            None => None,
        };

        let row = InsertRow::new(&paper, pdf_url, image_url, Utc::now().date_naive(), millis);
        let stored = self.insert_row(session, &row).await?;
        info!(id = %stored.id, title = %stored.title, "Paper created");
        Ok(stored)
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        let mut url = self.table_url();
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));

        let request = self
            .http_client
            .delete(url)
            .header("Prefer", "return=representation");
        let response = Self::send(self.with_bearer(request, Some(&session.access_token))).await?;

        let deleted: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse delete response: {}", e)))?;
        if deleted.is_empty() {
            return Err(BackendError::NotFound(id.to_string()));
        }
        info!(id = %id, "Paper deleted");
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut url = self.endpoint(["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http_client
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = match error_from_response(response).await {
                BackendError::Api { message, .. } => message,
                other => other.to_string(),
            };
            return Err(BackendError::Auth(message));
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse session: {}", e)))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), BackendError> {
        let request = self.http_client.post(self.endpoint(["auth", "v1", "logout"]));
        Self::send(self.with_bearer(request, Some(&session.access_token))).await?;
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<Option<User>, BackendError> {
        let request = self.http_client.get(self.endpoint(["auth", "v1", "user"]));
        let response = self
            .with_bearer(request, Some(&session.access_token))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => response
                .json::<User>()
                .await
                .map(Some)
                .map_err(|e| BackendError::Parse(format!("Failed to parse user: {}", e))),
            _ => Err(error_from_response(response).await),
        }
    }
}

/// Pull the most specific message the backend offers out of an error body
async fn error_from_response(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    BackendError::Api {
        status,
        message: error_message(&body),
    }
}

/// Message from a backend error body
///
/// Auth errors use `error_description` or `msg`; PostgREST and storage use
/// `message`. Falls back to the raw body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
