//! Secure session storage using the system keyring
//!
//! Holds the bearer token issued at login and the signed-in user's profile
//! (stored as JSON). An in-memory cache keeps keychain prompts to one per run.
//!
//! ## Environment Variable Fallback
//!
//! For scripting and CI, `RESTO_TOKEN` overrides the stored token.
//!
//! Priority: env var > cache > keyring

use std::sync::RwLock;

use keyring::Entry;
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};

use crate::api::auth::SessionUser;
use crate::error::{RestoError, Result};

const SERVICE_NAME: &str = "resto-rs";
const SESSION_TOKEN_KEY: &str = "session_token";
const SESSION_USER_KEY: &str = "session_user";

/// Environment variable that overrides the stored token
pub const TOKEN_ENV: &str = "RESTO_TOKEN";

// Option<Option<T>>:
//   - None = not yet fetched from keyring
//   - Some(None) = fetched, nothing stored
//   - Some(Some(value)) = fetched and cached
static TOKEN_CACHE: Lazy<RwLock<Option<Option<SecretString>>>> = Lazy::new(|| RwLock::new(None));
static USER_CACHE: Lazy<RwLock<Option<Option<SessionUser>>>> = Lazy::new(|| RwLock::new(None));

/// Credential store for the login session
pub struct CredentialStore;

impl CredentialStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the token and user returned by a successful login
    pub fn store_session(token: &str, user: &SessionUser) -> Result<()> {
        let json = serde_json::to_string(user)
            .map_err(|e| RestoError::Config(format!("Failed to serialize session user: {}", e)))?;

        Entry::new(SERVICE_NAME, SESSION_TOKEN_KEY)?.set_password(token)?;
        Entry::new(SERVICE_NAME, SESSION_USER_KEY)?.set_password(&json)?;

        if let Ok(mut cache) = TOKEN_CACHE.write() {
            *cache = Some(Some(SecretString::from(token.to_string())));
        }
        if let Ok(mut cache) = USER_CACHE.write() {
            *cache = Some(Some(user.clone()));
        }

        tracing::debug!(role = user.role.as_str(), "session stored");
        Ok(())
    }

    /// Retrieve the bearer token
    ///
    /// Priority: environment variable > cache > keyring
    pub fn get_token() -> Result<Option<SecretString>> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                return Ok(Some(SecretString::from(token)));
            }
        }

        if let Ok(cache) = TOKEN_CACHE.read() {
            if let Some(cached) = cache.as_ref() {
                return Ok(cached.clone());
            }
        }

        let result = Self::read_entry(SESSION_TOKEN_KEY)?.map(SecretString::from);

        if let Ok(mut cache) = TOKEN_CACHE.write() {
            *cache = Some(result.clone());
        }

        Ok(result)
    }

    /// Retrieve the signed-in user
    ///
    /// A corrupt stored profile is treated as no profile.
    pub fn get_user() -> Result<Option<SessionUser>> {
        if let Ok(cache) = USER_CACHE.read() {
            if let Some(cached) = cache.as_ref() {
                return Ok(cached.clone());
            }
        }

        let result = match Self::read_entry(SESSION_USER_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| tracing::warn!(error = %e, "ignoring invalid stored session user"))
                .ok(),
            None => None,
        };

        if let Ok(mut cache) = USER_CACHE.write() {
            *cache = Some(result.clone());
        }

        Ok(result)
    }

    /// Remove the stored session (logout)
    pub fn delete_session() -> Result<()> {
        let token = Self::delete_entry(SESSION_TOKEN_KEY);
        let user = Self::delete_entry(SESSION_USER_KEY);

        if let Ok(mut cache) = TOKEN_CACHE.write() {
            *cache = Some(None);
        }
        if let Ok(mut cache) = USER_CACHE.write() {
            *cache = Some(None);
        }

        token.and(user)
    }

    /// Check if a token is available
    pub fn has_session() -> Result<bool> {
        Ok(Self::get_token()?.is_some())
    }

    /// Get the token, returning an error if not signed in
    pub fn require_token() -> Result<SecretString> {
        Self::get_token()?.ok_or(RestoError::NotAuthenticated)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Utility Methods
    // ─────────────────────────────────────────────────────────────────────────

    fn read_entry(key: &str) -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(RestoError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                e
            ))),
        }
    }

    fn delete_entry(key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(RestoError::Credential(e.to_string())),
        }
    }

    /// Get a masked version of a token for display (first 4 and last 4 chars)
    pub fn mask_token(token: &SecretString) -> String {
        let chars: Vec<char> = token.expose_secret().chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        let short = SecretString::from("abc");
        assert_eq!(CredentialStore::mask_token(&short), "***");

        let jwt = SecretString::from("eyJhbGciOiJIUzI1NiJ9.payload.sig1");
        assert_eq!(CredentialStore::mask_token(&jwt), "eyJh...sig1");
    }
}
