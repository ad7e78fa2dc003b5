//! Restaurant backend HTTP client
//!
//! Every resource handler talks to the backend through [`ApiTransport`], so
//! tests can swap the reqwest client for a mock.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

pub use reqwest::Method;

use crate::api::error_handler::classify_response;
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::error::{RestoError, Result};

/// Header the backend uses to scope public requests to one restaurant
pub const RESTAURANT_SLUG_HEADER: &str = "X-Restaurant-Slug";

/// Transport used by all resource handlers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send a JSON request and return the decoded body (`Null` when empty)
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;

    /// GET a non-JSON body as text (used for CSV exports)
    async fn request_text(&self, path: &str) -> Result<String>;
}

/// reqwest-backed implementation of [`ApiTransport`]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    restaurant_slug: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL
    ///
    /// A path prefix on the base (`https://host/backend`) is kept for every request.
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token,
            restaurant_slug: None,
        })
    }

    /// Create an authenticated client from the stored session and config
    pub fn from_session() -> Result<Self> {
        let config = Config::load()?;
        let token = CredentialStore::require_token()?;
        Self::new(&config.effective_api_url(), Some(token))
    }

    /// Create a client without a bearer token (login, public ordering)
    pub fn anonymous() -> Result<Self> {
        let config = Config::load()?;
        Self::new(&config.effective_api_url(), None)
    }

    /// Scope requests to a restaurant via the slug header
    pub fn with_restaurant_slug(mut self, slug: impl Into<String>) -> Self {
        self.restaurant_slug = Some(slug.into());
        self
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path such as `/api/orders` under the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn builder(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method, url);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(slug) = &self.restaurant_slug {
            builder = builder.header(RESTAURANT_SLUG_HEADER, slug);
        }

        Ok(builder)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend request failed");
            return Err(classify_response(status.as_u16(), &text));
        }

        Ok(text)
    }
}

#[async_trait]
impl ApiTransport for ApiClient {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        tracing::debug!(%method, path, "api request");

        let mut builder = self.builder(method, path)?;
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let text = self.send(builder).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn request_text(&self, path: &str) -> Result<String> {
        tracing::debug!(path, "api download");
        let builder = self.builder(Method::GET, path)?;
        self.send(builder).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a list that is either the body itself or wrapped under `key`
///
/// A missing or null key yields an empty list.
pub(crate) fn list_field<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(inner) => Ok(serde_json::from_value(inner)?),
        },
        _ => Ok(Vec::new()),
    }
}

/// Decode an object wrapped under `key`, falling back to the body itself
pub(crate) fn object_field<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    match value {
        Value::Object(mut map) if map.contains_key(key) => {
            Ok(serde_json::from_value(map.remove(key).unwrap_or(Value::Null))?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

/// Build a missing-field error for a response that lacks a required value
pub(crate) fn missing_field(what: &str) -> RestoError {
    RestoError::Json(<serde_json::Error as serde::de::Error>::custom(format!(
        "response is missing {}",
        what
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_field_accepts_wrapped_and_bare() {
        let wrapped: Vec<u32> = list_field(json!({"items": [1, 2]}), "items").unwrap();
        assert_eq!(wrapped, vec![1, 2]);

        let bare: Vec<u32> = list_field(json!([3]), "items").unwrap();
        assert_eq!(bare, vec![3]);

        let missing: Vec<u32> = list_field(json!({"other": 1}), "items").unwrap();
        assert!(missing.is_empty());

        let null: Vec<u32> = list_field(Value::Null, "items").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_object_field_unwraps_key() {
        let wrapped: String = object_field(json!({"name": "x"}), "name").unwrap();
        assert_eq!(wrapped, "x");

        let bare: u32 = object_field(json!(7), "count").unwrap();
        assert_eq!(bare, 7);
    }

    #[test]
    fn test_client_joins_paths_onto_base() {
        let client = ApiClient::new("http://localhost:5000", None).unwrap();
        let url = client.endpoint("/api/orders").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/orders");
    }

    #[test]
    fn test_client_keeps_base_path_prefix() {
        let client = ApiClient::new("https://example.com/backend", None).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/backend/");

        let url = client.endpoint("/api/orders?status=PENDING").unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/orders?status=PENDING");

        let slashed = ApiClient::new("https://example.com/backend/", None).unwrap();
        assert_eq!(
            slashed.endpoint("api/menu").unwrap().as_str(),
            "https://example.com/backend/api/menu"
        );
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::new("localhost", None),
            Err(RestoError::InvalidUrl(_))
        ));
    }
}
