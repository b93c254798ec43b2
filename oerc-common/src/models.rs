//! Shared data model
//!
//! Records exchanged between the paper store, the repository client and the
//! HTTP layer. Field names follow the backend's column names so the same
//! serde representation is used on the wire in both directions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A research-summary record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique identifier (backend row id, or a fixed id for catalog entries)
    pub id: String,
    pub title: String,
    pub author: String,
    /// Publication date
    pub date: NaiveDate,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Topical labels in display order
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl Paper {
    /// True if the paper carries `tag` exactly (case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match over title, abstract, author and tags
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.abstract_text.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Consortium event or external conference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: &'static str,
    pub title: &'static str,
    pub date: NaiveDate,
    pub location: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'static str>,
}

/// Frequently asked question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of a visitor's chat transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Signed-in user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Auth provider session
///
/// Tokens never leave the server; only [`User`] is exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, as issued
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> Paper {
        Paper {
            id: "p1".to_string(),
            title: "Early Literacy".to_string(),
            author: "Dr. Emily Watson".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            abstract_text: "Phonics-based programs".to_string(),
            tags: vec!["Literacy".to_string(), "Phonics".to_string()],
            image_url: None,
            pdf_url: None,
        }
    }

    #[test]
    fn test_matches_each_field() {
        let p = paper();
        assert!(p.matches_lowercase("literacy"));
        assert!(p.matches_lowercase("watson"));
        assert!(p.matches_lowercase("programs"));
        assert!(p.matches_lowercase("phon"));
        assert!(!p.matches_lowercase("zzzzz"));
    }

    #[test]
    fn test_has_tag_is_exact() {
        let p = paper();
        assert!(p.has_tag("Literacy"));
        assert!(!p.has_tag("literacy"));
    }

    #[test]
    fn test_paper_uses_backend_column_names() {
        let json = serde_json::to_value(paper()).unwrap();
        assert_eq!(json["abstract"], "Phonics-based programs");
        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_paper_row_without_tags_defaults_empty() {
        let row = r#"{"id":"7","title":"t","author":"a","date":"2024-01-01","abstract":"x","tags":null}"#;
        // null is not a sequence; rows with null tags go through the repository's row type
        assert!(serde_json::from_str::<Paper>(row).is_err());

        let row = r#"{"id":"7","title":"t","author":"a","date":"2024-01-01","abstract":"x"}"#;
        let p: Paper = serde_json::from_str(row).unwrap();
        assert!(p.tags.is_empty());
    }
}
