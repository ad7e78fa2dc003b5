//! Stock management

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::error::{RestoError, Result};

/// A stocked ingredient or supply
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(default)]
    pub min_stock: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub cost_per_unit: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub is_low_stock: bool,
}

impl InventoryItem {
    /// Low when flagged by the server or at/below the minimum level
    pub fn is_low(&self) -> bool {
        self.is_low_stock || self.current_stock <= self.min_stock
    }

    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        self.current_stock * self.cost_per_unit
    }
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryInput {
    pub name: String,
    pub category: String,
    pub current_stock: f64,
    pub min_stock: f64,
    pub unit: String,
    pub cost_per_unit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl InventoryInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RestoError::InvalidInput("Item name is required".to_string()));
        }
        if self.current_stock < 0.0 || self.min_stock < 0.0 || self.cost_per_unit < 0.0 {
            return Err(RestoError::InvalidInput(
                "Stock levels and cost cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Items at or below their minimum stock
pub fn low_stock(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|item| item.is_low()).collect()
}

/// Inventory operations handler
pub struct InventoryHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> InventoryHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List all items
    pub async fn list(&self) -> Result<Vec<InventoryItem>> {
        let value = self
            .client
            .request(Method::GET, "/api/inventory", None)
            .await?;
        list_field(value, "inventory")
    }

    /// Add an item
    pub async fn create(&self, input: &InventoryInput) -> Result<InventoryItem> {
        input.validate()?;
        let body = serde_json::to_value(input)?;
        let value = self
            .client
            .request(Method::POST, "/api/inventory", Some(body))
            .await?;
        object_field(value, "item")
    }

    /// Replace an item's details
    pub async fn update(&self, id: &str, input: &InventoryInput) -> Result<InventoryItem> {
        input.validate()?;
        let path = format!("/api/inventory/{}", id);
        let body = serde_json::to_value(input)?;
        let value = self.client.request(Method::PUT, &path, Some(body)).await?;
        object_field(value, "item")
    }

    /// Add stock to an item
    pub async fn restock(&self, id: &str, quantity: f64) -> Result<()> {
        if quantity <= 0.0 || !quantity.is_finite() {
            return Err(RestoError::InvalidInput(
                "Please enter a valid quantity".to_string(),
            ));
        }

        let path = format!("/api/inventory/{}/restock", id);
        self.client
            .request(Method::PATCH, &path, Some(json!({ "quantity": quantity })))
            .await?;
        Ok(())
    }

    /// Delete an item
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/api/inventory/{}", id);
        self.client.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    fn item(current: f64, min: f64, flagged: bool) -> InventoryItem {
        InventoryItem {
            id: "i1".to_string(),
            name: "Rice".to_string(),
            category: "Grains".to_string(),
            current_stock: current,
            min_stock: min,
            unit: "kg".to_string(),
            cost_per_unit: 55.0,
            supplier: None,
            is_low_stock: flagged,
        }
    }

    #[test]
    fn test_low_stock_detection() {
        let items = vec![item(2.0, 5.0, false), item(50.0, 5.0, false), item(9.0, 5.0, true)];
        assert_eq!(low_stock(&items).len(), 2);
        assert!((items[1].stock_value() - 2750.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let handler = InventoryHandler::new(&mock);
        assert!(handler.restock("i1", 0.0).await.is_err());
        assert!(handler.restock("i1", -3.0).await.is_err());
    }

    #[tokio::test]
    async fn test_restock_patch() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PATCH
                    && path == "/api/inventory/i1/restock"
                    && *body == Some(json!({"quantity": 12.5}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        InventoryHandler::new(&mock).restock("i1", 12.5).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_path() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::DELETE && path == "/api/inventory/i7" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        InventoryHandler::new(&mock).delete("i7").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let input = InventoryInput {
            name: " ".to_string(),
            category: String::new(),
            current_stock: 1.0,
            min_stock: 0.0,
            unit: "kg".to_string(),
            cost_per_unit: 1.0,
            supplier: None,
        };
        assert!(InventoryHandler::new(&mock).create(&input).await.is_err());
    }
}
