//! Kitchen board: KOTs and kitchen-side order updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{ApiTransport, Method};
use crate::api::de::string_or_number;
use crate::api::orders::{Order, OrderItem, OrderPriority, OrderStatus};
use crate::error::Result;

/// Status of a Kitchen Order Ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KotStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

impl KotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KotStatus::Pending => "PENDING",
            KotStatus::InProgress => "IN_PROGRESS",
            KotStatus::Completed => "COMPLETED",
            KotStatus::Unknown => "UNKNOWN",
        }
    }

    /// Next status on the ticket's button, if any
    pub fn next(&self) -> Option<KotStatus> {
        match self {
            KotStatus::Pending => Some(KotStatus::InProgress),
            KotStatus::InProgress => Some(KotStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for KotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for KotStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(KotStatus::Pending),
            "IN_PROGRESS" => Ok(KotStatus::InProgress),
            "COMPLETED" => Ok(KotStatus::Completed),
            _ => Err(format!(
                "unknown KOT status '{}' (expected pending, in-progress or completed)",
                s
            )),
        }
    }
}

/// Priority printed on a KOT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KotPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
    #[serde(other)]
    Unknown,
}

impl KotPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            KotPriority::Low => "LOW",
            KotPriority::Normal => "NORMAL",
            KotPriority::High => "HIGH",
            KotPriority::Urgent => "URGENT",
            KotPriority::Unknown => "UNKNOWN",
        }
    }
}

/// Kitchen Order Ticket
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kot {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub kot_number: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: String,
    pub status: KotStatus,
    #[serde(default)]
    pub priority: KotPriority,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything the kitchen screen shows
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct KitchenBoard {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub kots: Vec<Kot>,
}

/// Kitchen operations handler
pub struct KitchenHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> KitchenHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Fetch open tickets and orders
    pub async fn board(&self) -> Result<KitchenBoard> {
        let value = self
            .client
            .request(Method::GET, "/api/kitchen/all/kitchen/orders", None)
            .await?;
        if value.is_null() {
            return Ok(KitchenBoard::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Move a ticket to a new status
    pub async fn update_kot_status(&self, kot_id: &str, status: KotStatus) -> Result<()> {
        let path = format!("/api/kitchen/update/kot/status/{}", kot_id);
        self.client
            .request(Method::PATCH, &path, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    /// Move an order to a new status from the kitchen
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<()> {
        let path = format!("/api/kitchen/update/orders/status/{}", order_id);
        self.client
            .request(Method::PATCH, &path, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    /// Change an order's kitchen priority
    pub async fn update_order_priority(
        &self,
        order_id: &str,
        priority: OrderPriority,
    ) -> Result<()> {
        let path = format!("/api/kitchen/update/orders/priority/{}", order_id);
        self.client
            .request(Method::PATCH, &path, Some(json!({ "priority": priority })))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    #[tokio::test]
    async fn test_board_parses_orders_and_kots() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| {
                *method == Method::GET && path == "/api/kitchen/all/kitchen/orders"
            })
            .returning(|_, _, _| {
                Ok(json!({
                    "orders": [{"_id": "o1", "status": "PENDING"}],
                    "kots": [{"_id": "k1", "kotNumber": 7, "orderNumber": "A12",
                              "status": "IN_PROGRESS", "priority": "URGENT",
                              "items": [{"name": "Tea", "quantity": 2}]}]
                }))
            });

        let board = KitchenHandler::new(&mock).board().await.unwrap();
        assert_eq!(board.orders.len(), 1);
        assert_eq!(board.kots[0].kot_number, "7");
        assert_eq!(board.kots[0].priority, KotPriority::Urgent);
        assert_eq!(board.kots[0].status.next(), Some(KotStatus::Completed));
    }

    #[tokio::test]
    async fn test_board_tolerates_missing_lists() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .returning(|_, _, _| Ok(json!({"orders": []})));

        let board = KitchenHandler::new(&mock).board().await.unwrap();
        assert!(board.kots.is_empty());
    }

    #[tokio::test]
    async fn test_kot_status_uses_patch() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PATCH
                    && path == "/api/kitchen/update/kot/status/k1"
                    && *body == Some(json!({"status": "IN_PROGRESS"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        KitchenHandler::new(&mock)
            .update_kot_status("k1", KotStatus::InProgress)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_priority_is_lowercase_on_the_wire() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PATCH
                    && path == "/api/kitchen/update/orders/priority/o3"
                    && *body == Some(json!({"priority": "high"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        KitchenHandler::new(&mock)
            .update_order_priority("o3", OrderPriority::High)
            .await
            .unwrap();
    }

    #[test]
    fn test_kot_status_from_str() {
        assert_eq!("in-progress".parse::<KotStatus>(), Ok(KotStatus::InProgress));
        assert!("done".parse::<KotStatus>().is_err());
    }
}
