//! Admin dashboard
//!
//! Gated by a session from the auth provider. Once signed in, a visitor can
//! list, upload and delete papers. Uploads prepend to the shared list and
//! switch to the list tab; deletes remove the paper from the shared list only
//! after the backend confirms.
//!
//! # Invariants
//! - At most one sign-in and one upload in flight per visitor.
//! - At most one delete in flight per paper id per visitor.
//! - View locks are never held across a backend call.
//! - A flow abandoned mid-call (client gone) clears its own in-flight marker.

use std::collections::HashSet;
use std::sync::Arc;

use oerc_common::models::{Paper, Session, User};
use oerc_common::store::PaperStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::in_flight::InFlight;
use crate::services::{BackendError, NewPaper, PaperRepository, UploadFile};

/// Blocking message shown when an upload fails
pub const UPLOAD_FAILED_MESSAGE: &str =
    "Failed to upload paper. Ensure you are logged in and file is valid.";

/// Blocking message shown when a delete fails
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete paper.";

/// Prompt a client must confirm before a delete goes through
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this paper?";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("Sign in required")]
    Unauthenticated,

    /// Provider's message, verbatim
    #[error("{0}")]
    LoginFailed(String),

    #[error("A sign-in is already in progress")]
    SignInInProgress,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("A delete of {0} is already in progress")]
    DeleteInProgress(String),

    #[error("{}", DELETE_CONFIRM_PROMPT)]
    ConfirmationRequired,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{}", UPLOAD_FAILED_MESSAGE)]
    UploadFailed(#[source] BackendError),

    #[error("{}", DELETE_FAILED_MESSAGE)]
    DeleteFailed(#[source] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    #[default]
    List,
    Upload,
}

#[derive(Debug, Default)]
pub struct AdminView {
    session: Option<Session>,
    auth_error: Option<String>,
    tab: AdminTab,
    signing_in: bool,
    uploading: bool,
    deleting: HashSet<String>,
}

/// Client-visible admin state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStatus {
    pub authenticated: bool,
    pub user: Option<User>,
    pub tab: AdminTab,
    pub auth_error: Option<String>,
    pub uploading: bool,
}

impl AdminView {
    pub fn status(&self) -> AdminStatus {
        AdminStatus {
            authenticated: self.session.is_some(),
            user: self.session.as_ref().map(|s| s.user.clone()),
            tab: self.tab,
            auth_error: self.auth_error.clone(),
            uploading: self.uploading,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    /// Switch dashboard tab; requires a session
    pub fn set_tab(&mut self, tab: AdminTab) -> Result<(), AdminError> {
        self.require_session()?;
        self.tab = tab;
        Ok(())
    }

    fn require_session(&self) -> Result<Session, AdminError> {
        self.session.clone().ok_or(AdminError::Unauthenticated)
    }

    /// In-flight upload and delete markers are left to the flows that set them
    fn clear_session(&mut self) {
        self.session = None;
        self.tab = AdminTab::List;
    }
}

/// Upload form as submitted
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub title: String,
    pub author: String,
    pub abstract_text: String,
    /// Comma-separated tags
    pub tags: String,
    pub document: Option<UploadFile>,
    pub image: Option<UploadFile>,
}

impl UploadForm {
    /// Check required fields and parse tags
    pub fn validate(self) -> Result<NewPaper, AdminError> {
        let title = required(&self.title, "title")?;
        let author = required(&self.author, "author")?;
        let abstract_text = required(&self.abstract_text, "abstract")?;
        let document = self
            .document
            .filter(|f| !f.bytes.is_empty())
            .ok_or(AdminError::MissingField("document"))?;
        let image = self.image.filter(|f| !f.bytes.is_empty());

        Ok(NewPaper {
            title,
            author,
            abstract_text,
            tags: parse_tags(&self.tags),
            document,
            image,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, AdminError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AdminError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Split on commas, trim, drop empties
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sign in; on failure the provider's message is kept for the login form
pub async fn login(
    view: &Arc<Mutex<AdminView>>,
    repository: &dyn PaperRepository,
    email: &str,
    password: &str,
) -> Result<User, AdminError> {
    {
        let mut v = view.lock().await;
        if v.signing_in {
            return Err(AdminError::SignInInProgress);
        }
        v.signing_in = true;
        v.auth_error = None;
    }
    let in_flight = InFlight::new(view, |v: &mut AdminView| v.signing_in = false);

    let result = repository.sign_in(email.trim(), password).await;

    let mut v = view.lock().await;
    in_flight.disarm();
    v.signing_in = false;
    match result {
        Ok(session) => {
            let user = session.user.clone();
            info!(user_id = %user.id, "Admin signed in");
            v.session = Some(session);
            v.tab = AdminTab::List;
            Ok(user)
        }
        Err(e) => {
            let message = match e {
                BackendError::Auth(message) => message,
                other => other.to_string(),
            };
            warn!(error = %message, "Admin sign-in failed");
            v.auth_error = Some(message.clone());
            Err(AdminError::LoginFailed(message))
        }
    }
}

/// Sign out and return to the login gate
///
/// Provider errors are logged; the local session is cleared regardless.
pub async fn logout(view: &Arc<Mutex<AdminView>>, repository: &dyn PaperRepository) {
    let session = {
        let mut v = view.lock().await;
        let session = v.session.take();
        v.clear_session();
        session
    };
    if let Some(session) = session {
        if let Err(e) = repository.sign_out(&session).await {
            warn!(error = %e, "Sign-out failed at provider");
        }
        info!(user_id = %session.user.id, "Admin signed out");
    }
}

/// Re-check the session with the provider; locks the view if it is gone
///
/// Transport errors leave the session in place.
pub async fn refresh_session(
    view: &Arc<Mutex<AdminView>>,
    repository: &dyn PaperRepository,
) -> AdminStatus {
    let session = view.lock().await.session.clone();
    let Some(session) = session else {
        return view.lock().await.status();
    };

    match repository.current_user(&session).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            info!(user_id = %session.user.id, "Session no longer valid");
            let mut v = view.lock().await;
            if v.session.as_ref() == Some(&session) {
                v.clear_session();
            }
        }
        Err(e) => warn!(error = %e, "Could not verify session"),
    }
    view.lock().await.status()
}

/// Upload a paper and prepend it to the shared list
///
/// An upload started before a sign-out still completes; the backend already
/// holds the paper, so it is added to the shared list either way.
pub async fn upload(
    view: &Arc<Mutex<AdminView>>,
    repository: &dyn PaperRepository,
    store: &PaperStore,
    form: UploadForm,
) -> Result<Paper, AdminError> {
    let session = {
        let mut v = view.lock().await;
        let session = v.require_session()?;
        if v.uploading {
            return Err(AdminError::UploadInProgress);
        }
        v.uploading = true;
        session
    };
    let in_flight = InFlight::new(view, |v: &mut AdminView| v.uploading = false);

    let result = match form.validate() {
        Ok(new_paper) => repository
            .create(&session, new_paper)
            .await
            .map_err(AdminError::UploadFailed),
        Err(e) => Err(e),
    };

    {
        let mut v = view.lock().await;
        in_flight.disarm();
        v.uploading = false;
        if result.is_ok() && v.session.is_some() {
            v.tab = AdminTab::List;
        }
    }

    match result {
        Ok(paper) => {
            store.insert_front(paper.clone()).await;
            Ok(paper)
        }
        Err(e) => {
            if let AdminError::UploadFailed(source) = &e {
                warn!(error = %source, "Upload failed");
            }
            Err(e)
        }
    }
}

/// Delete a paper after explicit confirmation
pub async fn delete(
    view: &Arc<Mutex<AdminView>>,
    repository: &dyn PaperRepository,
    store: &PaperStore,
    id: &str,
    confirmed: bool,
) -> Result<(), AdminError> {
    let session = {
        let mut v = view.lock().await;
        let session = v.require_session()?;
        if !confirmed {
            return Err(AdminError::ConfirmationRequired);
        }
        if !v.deleting.insert(id.to_string()) {
            return Err(AdminError::DeleteInProgress(id.to_string()));
        }
        session
    };
    let owned_id = id.to_string();
    let in_flight = InFlight::new(view, move |v: &mut AdminView| {
        v.deleting.remove(&owned_id);
    });

    let result = repository.delete(&session, id).await;
    {
        let mut v = view.lock().await;
        in_flight.disarm();
        v.deleting.remove(id);
    }

    match result {
        Ok(()) => {
            store.remove(id).await;
            Ok(())
        }
        Err(e) => {
            warn!(id = %id, error = %e, "Delete failed");
            Err(AdminError::DeleteFailed(e))
        }
    }
}
