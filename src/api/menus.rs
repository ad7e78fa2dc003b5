//! Menu browsing

use serde::Deserialize;

use crate::api::client::{list_field, ApiTransport, Method};
use crate::error::Result;

/// A dish on the restaurant's menu
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, deserialize_with = "category_name")]
    pub category: String,
    #[serde(default)]
    pub is_available: bool,
}

/// Categories arrive either as a plain name or as a populated document
fn category_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match &value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    })
}

/// Menu operations handler
pub struct MenuHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> MenuHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List every menu item, available or not
    pub async fn list(&self) -> Result<Vec<MenuItem>> {
        let value = self.client.request(Method::GET, "/api/menus", None).await?;
        list_field(value, "menus")
    }

    /// List only the items that can be ordered right now
    pub async fn list_available(&self) -> Result<Vec<MenuItem>> {
        Ok(available_only(self.list().await?))
    }
}

/// Keep the items currently marked available
pub fn available_only(items: Vec<MenuItem>) -> Vec<MenuItem> {
    items.into_iter().filter(|item| item.is_available).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_available_filters_unavailable() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/menus")
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"menus": [
                    {"_id": "m1", "name": "Idli", "price": 40, "category": "Breakfast", "isAvailable": true},
                    {"_id": "m2", "name": "Biryani", "price": 220, "category": {"name": "Mains"}, "isAvailable": false},
                    {"_id": "m3", "name": "Lassi", "price": 60}
                ]}))
            });

        let items = MenuHandler::new(&mock).list_available().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Idli");
        assert_eq!(items[0].category, "Breakfast");
    }

    #[test]
    fn test_populated_category() {
        let item: MenuItem = serde_json::from_value(json!({
            "_id": "m2", "name": "Biryani", "category": {"_id": "c1", "name": "Mains"}
        }))
        .unwrap();
        assert_eq!(item.category, "Mains");
        assert!(!item.is_available);
    }
}
