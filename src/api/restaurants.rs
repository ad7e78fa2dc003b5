//! Restaurant tenants (super-admin overview)

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::api::billing::Plan;
use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::api::de::id_or_object;
use crate::error::{RestoError, Result};

/// Indian postal codes are six digits
static ZIP_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{6}$").expect("Invalid regex pattern for zip codes"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex pattern for emails")
});

/// A restaurant on the platform
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_plan")]
    pub subscription_plan: Option<Plan>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

fn lenient_plan<'de, D>(deserializer: D) -> std::result::Result<Option<Plan>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Per-restaurant order totals
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantAnalytics {
    #[serde(default, deserialize_with = "id_or_object")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

/// Payload for onboarding a restaurant and its first admin
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub cuisine: String,
    pub description: String,
}

impl NewRestaurant {
    /// Check required fields and formats
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("admin email", &self.admin_email),
            ("admin password", &self.admin_password),
            ("admin name", &self.admin_name),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(RestoError::InvalidInput(format!(
                "Restaurant {} is required",
                field
            )));
        }
        if !EMAIL_PATTERN.is_match(self.admin_email.trim()) {
            return Err(RestoError::InvalidInput(format!(
                "'{}' is not a valid email address",
                self.admin_email
            )));
        }
        if !self.zip_code.is_empty() && !is_valid_zip_code(&self.zip_code) {
            return Err(RestoError::InvalidInput(
                "Zip code must be exactly 6 digits".to_string(),
            ));
        }
        Ok(())
    }
}

/// Six-digit postal code check
pub fn is_valid_zip_code(zip: &str) -> bool {
    ZIP_CODE_PATTERN.is_match(zip.trim())
}

/// Case-insensitive match on name or slug
pub fn search<'r>(restaurants: &'r [Restaurant], query: &str) -> Vec<&'r Restaurant> {
    let needle = query.trim().to_lowercase();
    restaurants
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r.slug.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Headline numbers for the super-admin overview
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlatformTotals {
    pub restaurants: usize,
    pub active: usize,
    pub orders: u64,
    pub revenue: f64,
}

impl PlatformTotals {
    pub fn compute(restaurants: &[Restaurant], analytics: &[RestaurantAnalytics]) -> Self {
        Self {
            restaurants: restaurants.len(),
            active: restaurants.iter().filter(|r| r.is_active).count(),
            orders: analytics.iter().map(|a| a.total_orders).sum(),
            revenue: analytics.iter().map(|a| a.total_revenue).sum(),
        }
    }
}

/// Index analytics by restaurant id for table rendering
pub fn analytics_by_restaurant(
    analytics: &[RestaurantAnalytics],
) -> HashMap<&str, &RestaurantAnalytics> {
    analytics
        .iter()
        .filter_map(|a| a.restaurant_id.as_deref().map(|id| (id, a)))
        .collect()
}

/// Restaurant operations handler
pub struct RestaurantHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> RestaurantHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List every restaurant
    pub async fn list(&self) -> Result<Vec<Restaurant>> {
        let value = self
            .client
            .request(Method::GET, "/api/restaurants", None)
            .await?;
        list_field(value, "restaurants")
    }

    /// Order and revenue totals per restaurant
    pub async fn analytics(&self) -> Result<Vec<RestaurantAnalytics>> {
        let value = self
            .client
            .request(Method::GET, "/api/restaurants/analytics", None)
            .await?;
        list_field(value, "analytics")
    }

    /// Onboard a restaurant together with its admin account
    pub async fn create(&self, restaurant: &NewRestaurant) -> Result<Restaurant> {
        restaurant.validate()?;
        let body = serde_json::to_value(restaurant)?;
        let value = self
            .client
            .request(Method::POST, "/api/restaurants", Some(body))
            .await?;
        object_field(value, "restaurant")
    }

    /// Rename a restaurant
    pub async fn rename(&self, id: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Restaurant name cannot be empty".to_string(),
            ));
        }
        let path = format!("/api/restaurants/{}", id);
        self.client
            .request(Method::PUT, &path, Some(json!({ "name": name.trim() })))
            .await?;
        Ok(())
    }

    /// Delete a restaurant
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/api/restaurants/{}", id);
        self.client.request(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Flip a restaurant between active and suspended
    pub async fn toggle_status(&self, id: &str) -> Result<()> {
        let path = format!("/api/restaurants/{}/toggle-status", id);
        self.client.request(Method::PATCH, &path, None).await?;
        Ok(())
    }

    /// Toggle several restaurants concurrently, reporting each outcome
    pub async fn bulk_toggle(&self, ids: &[String]) -> Vec<(String, Result<()>)> {
        let results = join_all(ids.iter().map(|id| self.toggle_status(id))).await;
        ids.iter().cloned().zip(results).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    fn restaurants() -> Vec<Restaurant> {
        serde_json::from_value(json!([
            {"_id": "r1", "name": "Spice Hub", "slug": "spice-hub", "isActive": true,
             "subscriptionPlan": "premium"},
            {"_id": "r2", "name": "Dosa Corner", "slug": "dosa-corner", "isActive": false,
             "subscriptionPlan": "legacy"},
            {"_id": "r3", "name": "Tandoor", "slug": "tandoor-spice", "isActive": true}
        ]))
        .unwrap()
    }

    #[test]
    fn test_search_matches_name_or_slug() {
        let list = restaurants();
        let ids: Vec<&str> = search(&list, "SPICE").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        assert_eq!(search(&list, "").len(), 3);
        assert!(search(&list, "pizza").is_empty());
    }

    #[test]
    fn test_unknown_plan_is_none() {
        let list = restaurants();
        assert_eq!(list[0].subscription_plan, Some(Plan::Premium));
        assert_eq!(list[1].subscription_plan, None);
    }

    #[test]
    fn test_platform_totals() {
        let analytics: Vec<RestaurantAnalytics> = serde_json::from_value(json!([
            {"restaurantId": "r1", "totalOrders": 120, "totalRevenue": 54000.5},
            {"restaurantId": "r3", "totalOrders": 30, "totalRevenue": 9000}
        ]))
        .unwrap();

        let totals = PlatformTotals::compute(&restaurants(), &analytics);
        assert_eq!(totals.restaurants, 3);
        assert_eq!(totals.active, 2);
        assert_eq!(totals.orders, 150);
        assert!((totals.revenue - 63000.5).abs() < 1e-9);

        let index = analytics_by_restaurant(&analytics);
        assert_eq!(index["r3"].total_orders, 30);
    }

    #[test]
    fn test_zip_code_validation() {
        assert!(is_valid_zip_code("560001"));
        assert!(!is_valid_zip_code("56001"));
        assert!(!is_valid_zip_code("56000a"));

        let mut restaurant = NewRestaurant {
            name: "Udupi".to_string(),
            admin_email: "owner@udupi.in".to_string(),
            admin_password: "pw".to_string(),
            admin_name: "Owner".to_string(),
            zip_code: "1234".to_string(),
            ..Default::default()
        };
        assert!(restaurant.validate().is_err());
        restaurant.zip_code = "576101".to_string();
        assert!(restaurant.validate().is_ok());
        restaurant.admin_email = "not-an-email".to_string();
        assert!(restaurant.validate().is_err());
    }

    #[tokio::test]
    async fn test_bulk_toggle_reports_each_result() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, _, _| *method == Method::PATCH)
            .times(2)
            .returning(|_, path, _| {
                if path == "/api/restaurants/r2/toggle-status" {
                    Err(RestoError::NotFound("Restaurant not found".to_string()))
                } else {
                    Ok(Value::Null)
                }
            });

        let ids = vec!["r1".to_string(), "r2".to_string()];
        let results = RestaurantHandler::new(&mock).bulk_toggle(&ids).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "r2");
        assert!(results[1].1.is_err());
    }

    #[tokio::test]
    async fn test_rename_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/restaurants/r1"
                    && *body == Some(json!({"name": "Spice Hub 2"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        RestaurantHandler::new(&mock)
            .rename("r1", " Spice Hub 2 ")
            .await
            .unwrap();
    }
}
