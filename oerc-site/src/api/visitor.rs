//! Visitor identification
//!
//! Stateful endpoints read the visitor id from the `x-visitor-id` header.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::ApiError;
use crate::visitors::Visitor;
use crate::AppState;

pub const VISITOR_HEADER: &str = "x-visitor-id";

/// The visitor making the request
pub struct CurrentVisitor(pub Arc<Visitor>);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentVisitor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(VISITOR_HEADER)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", VISITOR_HEADER)))?
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("Invalid {} header", VISITOR_HEADER)))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::BadRequest(format!("Invalid visitor id: {}", raw)))?;

        state
            .visitors
            .get(&id)
            .await
            .map(CurrentVisitor)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown visitor: {}", id)))
    }
}

#[derive(Debug, Serialize)]
pub struct VisitorResponse {
    pub visitor_id: Uuid,
}

/// POST /api/visitors
pub async fn create_visitor(State(state): State<AppState>) -> (StatusCode, Json<VisitorResponse>) {
    let visitor = state.visitors.create().await;
    (
        StatusCode::CREATED,
        Json(VisitorResponse {
            visitor_id: visitor.id,
        }),
    )
}
