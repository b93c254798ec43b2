//! Degraded repository used when the backend is not configured
//!
//! Lists the fixed demo set and rejects every write and sign-in.

use async_trait::async_trait;
use oerc_common::models::{Paper, Session, User};

use super::repository::{BackendMode, Listing, NewPaper, PaperRepository};
use super::BackendError;

/// Repository with no backend behind it
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRepository;

#[async_trait]
impl PaperRepository for OfflineRepository {
    fn mode(&self) -> BackendMode {
        BackendMode::Offline
    }

    async fn list(&self) -> Listing {
        Listing::demo()
    }

    async fn create(&self, _session: &Session, _paper: NewPaper) -> Result<Paper, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn delete(&self, _session: &Session, _id: &str) -> Result<(), BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), BackendError> {
        Ok(())
    }

    async fn current_user(&self, _session: &Session) -> Result<Option<User>, BackendError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::{ListingSource, UploadFile};
    use oerc_common::catalog::demo_papers;

    fn session() -> Session {
        Session {
            access_token: "t".into(),
            refresh_token: None,
            expires_in: None,
            user: User {
                id: "u".into(),
                email: None,
            },
        }
    }

    #[tokio::test]
    async fn test_lists_demo_set() {
        let listing = OfflineRepository.list().await;
        assert_eq!(listing.source, ListingSource::Demo);
        assert_eq!(listing.papers, demo_papers());
    }

    #[tokio::test]
    async fn test_rejects_writes_and_sign_in() {
        let repo = OfflineRepository;
        let paper = NewPaper {
            title: "t".into(),
            author: "a".into(),
            abstract_text: "x".into(),
            tags: vec![],
            document: UploadFile {
                file_name: "d.pdf".into(),
                content_type: None,
                bytes: vec![1],
            },
            image: None,
        };
        assert_eq!(repo.create(&session(), paper).await, Err(BackendError::NotConfigured));
        assert_eq!(repo.delete(&session(), "demo-1").await, Err(BackendError::NotConfigured));
        assert_eq!(
            repo.sign_in("a@b.c", "pw").await.unwrap_err(),
            BackendError::NotConfigured
        );
        assert_eq!(repo.current_user(&session()).await, Ok(None));
    }
}
