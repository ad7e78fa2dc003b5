//! Menu add-ons (extra cheese, dips, toppings)

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::error::{RestoError, Result};

/// An add-on that can be attached to a dish
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Addon {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub veg: bool,
    #[serde(default)]
    pub available: bool,
}

/// Payload for creating an add-on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAddon {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub veg: bool,
    pub available: bool,
}

/// Add-on operations handler
pub struct AddonHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> AddonHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List add-ons
    pub async fn list(&self) -> Result<Vec<Addon>> {
        let value = self
            .client
            .request(Method::GET, "/api/addon/get/addons", None)
            .await?;
        list_field(value, "addons")
    }

    /// Create an add-on
    pub async fn create(&self, addon: &NewAddon) -> Result<Addon> {
        if addon.name.trim().is_empty() {
            return Err(RestoError::InvalidInput("Add-on name is required".to_string()));
        }
        if addon.price < 0.0 {
            return Err(RestoError::InvalidInput("Price cannot be negative".to_string()));
        }

        let body = serde_json::to_value(addon)?;
        let value = self
            .client
            .request(Method::POST, "/api/addon/add/addon", Some(body))
            .await?;
        object_field(value, "addon")
    }

    /// Set whether an add-on can be ordered
    pub async fn set_available(&self, id: &str, available: bool) -> Result<()> {
        let path = format!("/api/addon/update/addon/{}", id);
        self.client
            .request(Method::PUT, &path, Some(json!({ "available": available })))
            .await?;
        Ok(())
    }

    /// Flip availability, returning the new value
    pub async fn toggle(&self, addon: &Addon) -> Result<bool> {
        let available = !addon.available;
        self.set_available(&addon.id, available).await?;
        Ok(available)
    }

    /// Delete an add-on
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/api/addon/delete/addon/{}", id);
        self.client.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    #[tokio::test]
    async fn test_toggle_sends_inverse() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/addon/update/addon/a1"
                    && *body == Some(json!({"available": false}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        let addon = Addon {
            id: "a1".to_string(),
            name: "Extra cheese".to_string(),
            price: 30.0,
            description: None,
            veg: true,
            available: true,
        };
        let now = AddonHandler::new(&mock).toggle(&addon).await.unwrap();
        assert!(!now);
    }

    #[tokio::test]
    async fn test_delete_path() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| {
                *method == Method::DELETE && path == "/api/addon/delete/addon/a2"
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        AddonHandler::new(&mock).delete("a2").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_parses_addons() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|_, path, _| path == "/api/addon/get/addons")
            .returning(|_, _, _| {
                Ok(json!({"addons": [{"_id": "a1", "name": "Dip", "price": 15, "veg": true, "available": true}]}))
            });

        let addons = AddonHandler::new(&mock).list().await.unwrap();
        assert_eq!(addons.len(), 1);
        assert!(addons[0].veg);
    }
}
