//! Backend error detection and classification
//!
//! Turns non-success HTTP responses into actionable [`RestoError`]s. The
//! backend reports failures as `{"error": ...}` or `{"message": ...}`; a
//! missing route comes back as an HTML page from the framework.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::RestoError;

/// Pulls the text out of framework error pages like `<pre>Cannot GET /x</pre>`
static HTML_PRE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<pre>(.*?)</pre>").expect("Invalid regex pattern for HTML error pages")
});

/// Longest plain-text body echoed back to the user
const MAX_PLAIN_MESSAGE: usize = 200;

/// Classify a failed response by status code and body
pub fn classify_response(status: u16, body: &str) -> RestoError {
    let message = extract_message(body);

    match status {
        401 => RestoError::NotAuthenticated,
        403 => RestoError::AccessDenied(
            message.unwrap_or_else(|| "this action is not allowed for your role".to_string()),
        ),
        404 => RestoError::NotFound(message.unwrap_or_else(|| "resource not found".to_string())),
        429 => RestoError::RateLimited,
        _ => RestoError::Api {
            status,
            message: message.unwrap_or_else(|| "no details returned".to_string()),
        },
    }
}

/// Extract a human readable message from an error body
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(str::to_string);
    }

    if let Some(caps) = HTML_PRE_PATTERN.captures(trimmed) {
        return caps.get(1).map(|m| m.as_str().trim().to_string());
    }

    if trimmed.starts_with('<') || trimmed.len() > MAX_PLAIN_MESSAGE {
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_key() {
        assert_eq!(
            extract_message(r#"{"error": "Email already in use"}"#),
            Some("Email already in use".to_string())
        );
    }

    #[test]
    fn test_extract_message_key() {
        assert_eq!(
            extract_message(r#"{"message": "Table not found"}"#),
            Some("Table not found".to_string())
        );
    }

    #[test]
    fn test_extract_from_html_page() {
        let body = "<!DOCTYPE html><html><body><pre>Cannot GET /api/nope</pre></body></html>";
        assert_eq!(
            extract_message(body),
            Some("Cannot GET /api/nope".to_string())
        );
    }

    #[test]
    fn test_extract_nothing_useful() {
        assert_eq!(extract_message(""), None);
        assert_eq!(extract_message(r#"{"ok": false}"#), None);
        assert_eq!(extract_message("<html></html>"), None);
    }

    #[test]
    fn test_classify_by_status() {
        assert!(matches!(
            classify_response(401, ""),
            RestoError::NotAuthenticated
        ));
        assert!(matches!(classify_response(429, ""), RestoError::RateLimited));

        match classify_response(403, r#"{"error": "Chefs cannot do that"}"#) {
            RestoError::AccessDenied(msg) => assert_eq!(msg, "Chefs cannot do that"),
            other => panic!("unexpected error: {:?}", other),
        }

        match classify_response(500, "boom") {
            RestoError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
