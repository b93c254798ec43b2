//! Admin dashboard endpoints
//!
//! Sign-in state is per visitor. Uploads arrive as multipart forms with
//! `title`, `author`, `abstract`, `tags` (comma-separated), a required
//! `document` file and an optional `image` file.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use oerc_common::models::Paper;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, CurrentVisitor};
use crate::services::UploadFile;
use crate::views::admin::{self, AdminTab, UploadForm};
use crate::views::{AdminError, AdminStatus};
use crate::AppState;

/// Upper bound on an upload request body
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminStatus>, ApiError> {
    admin::login(
        &visitor.0.admin,
        state.repository.as_ref(),
        &request.email,
        &request.password,
    )
    .await?;
    Ok(Json(visitor.0.admin.lock().await.status()))
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>, visitor: CurrentVisitor) -> Json<AdminStatus> {
    admin::logout(&visitor.0.admin, state.repository.as_ref()).await;
    Json(visitor.0.admin.lock().await.status())
}

/// GET /api/admin/session
pub async fn session(State(state): State<AppState>, visitor: CurrentVisitor) -> Json<AdminStatus> {
    Json(admin::refresh_session(&visitor.0.admin, state.repository.as_ref()).await)
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: AdminTab,
}

/// POST /api/admin/tab
pub async fn set_tab(
    visitor: CurrentVisitor,
    Json(request): Json<TabRequest>,
) -> Result<Json<AdminStatus>, ApiError> {
    let mut view = visitor.0.admin.lock().await;
    view.set_tab(request.tab)?;
    Ok(Json(view.status()))
}

#[derive(Debug, Serialize)]
pub struct AdminPapersResponse {
    pub total: usize,
    pub papers: Vec<Paper>,
}

/// GET /api/admin/papers
pub async fn list_papers(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
) -> Result<Json<AdminPapersResponse>, ApiError> {
    if !visitor.0.admin.lock().await.is_authenticated() {
        return Err(AdminError::Unauthenticated.into());
    }
    let papers = state.store.snapshot().await;
    Ok(Json(AdminPapersResponse {
        total: papers.len(),
        papers,
    }))
}

/// POST /api/admin/papers (multipart)
pub async fn upload(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Paper>), ApiError> {
    let form = read_upload_form(multipart).await?;
    let paper = admin::upload(
        &visitor.0.admin,
        state.repository.as_ref(),
        &state.store,
        form,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(paper)))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;

        match name.as_str() {
            "title" => form.title = text(bytes.as_ref()),
            "author" => form.author = text(bytes.as_ref()),
            "abstract" => form.abstract_text = text(bytes.as_ref()),
            "tags" => form.tags = text(bytes.as_ref()),
            "document" | "image" => {
                let file = UploadFile {
                    file_name: file_name.unwrap_or_else(|| name.clone()),
                    content_type,
                    bytes: bytes.to_vec(),
                };
                if name == "document" {
                    form.document = Some(file);
                } else {
                    form.image = Some(file);
                }
            }
            other => debug!(field = %other, "Ignoring unknown upload field"),
        }
    }
    Ok(form)
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: String,
}

/// DELETE /api/admin/papers/:id?confirm=true
pub async fn delete_paper(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    admin::delete(
        &visitor.0.admin,
        state.repository.as_ref(),
        &state.store,
        &id,
        query.confirm,
    )
    .await?;
    Ok(Json(DeleteResponse { deleted: id }))
}
