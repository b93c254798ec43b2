//! Membership registration and newsletter sign-up
//!
//! Payment is simulated: a valid application waits out the checkout delay and
//! is always accepted. Nothing is persisted.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

pub const MEMBERSHIP_TIER: &str = "Standard";
pub const MEMBERSHIP_FEE_CAD: u32 = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("The privacy policy must be accepted")]
    PrivacyNotAccepted,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MembershipApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub institution: Option<String>,
    pub role: Option<String>,
    pub website: Option<String>,
    pub accept_privacy: bool,
    pub subscribe_newsletter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipReceipt {
    pub receipt_id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: &'static str,
    pub fee_cad: u32,
    pub period: &'static str,
    pub status: MembershipStatus,
    pub newsletter: bool,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterAck {
    pub email: String,
    pub subscribed: bool,
}

fn required(value: &str, field: &'static str) -> Result<String, MembershipError> {
    let value = value.trim();
    if value.is_empty() {
        Err(MembershipError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Minimal shape check: something@something.tld
fn checked_email(raw: &str) -> Result<String, MembershipError> {
    let email = required(raw, "email")?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(MembershipError::InvalidEmail)
    }
}

impl MembershipApplication {
    fn validate(&self) -> Result<(String, String), MembershipError> {
        let first = required(&self.first_name, "first_name")?;
        let last = required(&self.last_name, "last_name")?;
        let email = checked_email(&self.email)?;
        if !self.accept_privacy {
            return Err(MembershipError::PrivacyNotAccepted);
        }
        Ok((format!("{} {}", first, last), email))
    }
}

/// Simulated payment; always succeeds for a valid application
pub async fn checkout(
    application: MembershipApplication,
    delay: Duration,
) -> Result<MembershipReceipt, MembershipError> {
    let (name, email) = application.validate()?;
    sleep(delay).await;

    let receipt = MembershipReceipt {
        receipt_id: Uuid::new_v4(),
        name,
        email,
        tier: MEMBERSHIP_TIER,
        fee_cad: MEMBERSHIP_FEE_CAD,
        period: "year",
        status: MembershipStatus::Active,
        newsletter: application.subscribe_newsletter,
        issued_at: Utc::now(),
    };
    info!(receipt_id = %receipt.receipt_id, "Membership activated");
    Ok(receipt)
}

pub fn subscribe_newsletter(email: &str) -> Result<NewsletterAck, MembershipError> {
    let email = checked_email(email)?;
    info!("Newsletter subscription recorded");
    Ok(NewsletterAck {
        email,
        subscribed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> MembershipApplication {
        MembershipApplication {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.org".into(),
            accept_privacy: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_checkout_issues_active_standard_membership() {
        let receipt = checkout(application(), Duration::ZERO).await.unwrap();
        assert_eq!(receipt.name, "Ada Lovelace");
        assert_eq!(receipt.tier, "Standard");
        assert_eq!(receipt.fee_cad, 50);
        assert_eq!(receipt.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn test_checkout_validation() {
        let no_last = MembershipApplication {
            last_name: " ".into(),
            ..application()
        };
        assert_eq!(
            checkout(no_last, Duration::ZERO).await,
            Err(MembershipError::MissingField("last_name"))
        );

        let bad_email = MembershipApplication {
            email: "ada".into(),
            ..application()
        };
        assert_eq!(checkout(bad_email, Duration::ZERO).await, Err(MembershipError::InvalidEmail));

        let no_consent = MembershipApplication {
            accept_privacy: false,
            ..application()
        };
        assert_eq!(
            checkout(no_consent, Duration::ZERO).await,
            Err(MembershipError::PrivacyNotAccepted)
        );
    }

    #[test]
    fn test_newsletter() {
        assert!(subscribe_newsletter(" x@y.ca ").unwrap().subscribed);
        assert_eq!(subscribe_newsletter(""), Err(MembershipError::MissingField("email")));
        assert_eq!(subscribe_newsletter("x@y"), Err(MembershipError::InvalidEmail));
    }
}
