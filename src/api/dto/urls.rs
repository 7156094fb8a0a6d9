//! DTOs for short URL management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Body of `POST /api/urls`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Long URL to shorten (http or https).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Custom alias; a random one is generated when absent.
    pub alias: Option<String>,

    /// After this instant the alias answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/urls/{alias}`.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry
/// - **Timestamp** → set new expiry
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// A short URL as returned by the API.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub alias: String,
    pub short_url: String,
    pub target: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlResponse {
    pub fn new(url: ShortUrl, short_url: String) -> Self {
        Self {
            alias: url.alias,
            short_url,
            target: url.target,
            clicks: url.clicks,
            created_at: url.created_at,
            expires_at: url.expires_at,
        }
    }
}

/// Response of `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub total: usize,
    pub items: Vec<UrlResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_expiry_absent_null_and_set() {
        let absent: UpdateUrlRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.expires_at.is_none());

        let cleared: UpdateUrlRequest = serde_json::from_str(r#"{"expires_at": null}"#).unwrap();
        assert_eq!(cleared.expires_at, Some(None));

        let set: UpdateUrlRequest =
            serde_json::from_str(r#"{"expires_at": "2030-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(set.expires_at, Some(Some(_))));
    }

    #[test]
    fn test_shorten_request_validation() {
        let empty: ShortenRequest = serde_json::from_str(r#"{"url": ""}"#).unwrap();
        assert!(empty.validate().is_err());

        let ok: ShortenRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "alias": "docs"}"#).unwrap();
        assert!(ok.validate().is_ok());
    }
}
