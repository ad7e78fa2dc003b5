//! Broadcast messages from the platform to restaurants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::error::{RestoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    #[default]
    Announcement,
    Notification,
    Alert,
    Update,
    #[serde(other)]
    Other,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Announcement => "ANNOUNCEMENT",
            MessageType::Notification => "NOTIFICATION",
            MessageType::Alert => "ALERT",
            MessageType::Update => "UPDATE",
            MessageType::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ANNOUNCEMENT" => Ok(MessageType::Announcement),
            "NOTIFICATION" => Ok(MessageType::Notification),
            "ALERT" => Ok(MessageType::Alert),
            "UPDATE" => Ok(MessageType::Update),
            _ => Err(format!(
                "unknown message type '{}' (expected announcement, notification, alert or update)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessagePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    #[serde(other)]
    Other,
}

impl MessagePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagePriority::Low => "LOW",
            MessagePriority::Medium => "MEDIUM",
            MessagePriority::High => "HIGH",
            MessagePriority::Urgent => "URGENT",
            MessagePriority::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for MessagePriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(MessagePriority::Low),
            "MEDIUM" => Ok(MessagePriority::Medium),
            "HIGH" => Ok(MessagePriority::High),
            "URGENT" => Ok(MessagePriority::Urgent),
            _ => Err(format!(
                "unknown priority '{}' (expected low, medium, high or urgent)",
                s
            )),
        }
    }
}

/// Who receives a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recipients {
    #[default]
    All,
    Active,
    Trial,
    Specific,
    #[serde(other)]
    Other,
}

impl Recipients {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recipients::All => "ALL",
            Recipients::Active => "ACTIVE",
            Recipients::Trial => "TRIAL",
            Recipients::Specific => "SPECIFIC",
            Recipients::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for Recipients {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Recipients::All),
            "ACTIVE" => Ok(Recipients::Active),
            "TRIAL" => Ok(Recipients::Trial),
            "SPECIFIC" => Ok(Recipients::Specific),
            _ => Err(format!(
                "unknown recipients '{}' (expected all, active, trial or specific)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub name: String,
}

/// A sent message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: MessageType,
    #[serde(default)]
    pub priority: MessagePriority,
    #[serde(default)]
    pub recipients: Recipients,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_by: Option<Sender>,
    #[serde(default)]
    pub read_by: Vec<serde_json::Value>,
}

impl Message {
    pub fn read_count(&self) -> usize {
        self.read_by.len()
    }
}

/// Payload for sending a message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub priority: MessagePriority,
    pub recipients: Recipients,
    pub specific_restaurants: Vec<String>,
}

impl NewMessage {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Title and message are required".to_string(),
            ));
        }
        if self.recipients == Recipients::Specific && self.specific_restaurants.is_empty() {
            return Err(RestoError::InvalidInput(
                "Pick at least one restaurant for a targeted message".to_string(),
            ));
        }
        Ok(())
    }
}

/// Communication operations handler
pub struct CommunicationHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> CommunicationHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Messages sent so far, newest first as returned by the server
    pub async fn list(&self) -> Result<Vec<Message>> {
        let value = self
            .client
            .request(Method::GET, "/api/communication", None)
            .await?;
        list_field(value, "messages")
    }

    /// Send a message
    pub async fn send(&self, message: &NewMessage) -> Result<Message> {
        message.validate()?;
        let mut body = serde_json::to_value(message)?;
        if message.recipients != Recipients::Specific {
            body["specificRestaurants"] = serde_json::json!([]);
        }
        let value = self
            .client
            .request(Method::POST, "/api/communication", Some(body))
            .await?;
        object_field(value, "message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::json;

    fn draft(recipients: Recipients, specific: Vec<String>) -> NewMessage {
        NewMessage {
            title: "Maintenance".to_string(),
            message: "Downtime at 2am".to_string(),
            kind: MessageType::Alert,
            priority: MessagePriority::default(),
            recipients,
            specific_restaurants: specific,
        }
    }

    #[tokio::test]
    async fn test_send_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/api/communication"
                    && *body
                        == Some(json!({
                            "title": "Maintenance",
                            "message": "Downtime at 2am",
                            "type": "ALERT",
                            "priority": "MEDIUM",
                            "recipients": "SPECIFIC",
                            "specificRestaurants": ["r1"]
                        }))
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"message": {"_id": "m1", "title": "Maintenance", "type": "ALERT"}}))
            });

        let sent = CommunicationHandler::new(&mock)
            .send(&draft(Recipients::Specific, vec!["r1".to_string()]))
            .await
            .unwrap();
        assert_eq!(sent.kind, MessageType::Alert);
    }

    #[tokio::test]
    async fn test_specific_requires_restaurants() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let err = CommunicationHandler::new(&mock)
            .send(&draft(Recipients::Specific, Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, RestoError::InvalidInput(_)));
    }

    #[test]
    fn test_message_deserializes() {
        let message: Message = serde_json::from_value(json!({
            "_id": "m1", "title": "Hi", "message": "Welcome", "type": "ANNOUNCEMENT",
            "priority": "LOW", "recipients": "ALL", "sentBy": {"name": "Ops"},
            "readBy": ["r1", "r2"], "sentAt": "2024-06-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(message.read_count(), 2);
        assert_eq!(message.sent_by.unwrap().name, "Ops");
    }
}
