//! Membership checkout and newsletter sign-up

use axum::{extract::State, Json};
use serde::Deserialize;

use super::ApiError;
use crate::views::membership::{checkout as run_checkout, subscribe_newsletter};
use crate::views::{MembershipApplication, MembershipReceipt, NewsletterAck};
use crate::AppState;

/// POST /api/membership/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Json(application): Json<MembershipApplication>,
) -> Result<Json<MembershipReceipt>, ApiError> {
    let receipt = run_checkout(application, state.latency.checkout).await?;
    Ok(Json(receipt))
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

/// POST /api/newsletter
pub async fn newsletter(
    Json(request): Json<NewsletterRequest>,
) -> Result<Json<NewsletterAck>, ApiError> {
    Ok(Json(subscribe_newsletter(&request.email)?))
}
