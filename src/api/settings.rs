//! Platform settings and plan limits

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::billing::Plan;
use crate::api::client::{ApiTransport, Method};
use crate::error::{RestoError, Result};

/// Settings group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingCategory {
    System,
    Email,
    Payment,
    Security,
    PlanLimits,
    General,
    #[serde(other)]
    Other,
}

impl SettingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingCategory::System => "SYSTEM",
            SettingCategory::Email => "EMAIL",
            SettingCategory::Payment => "PAYMENT",
            SettingCategory::Security => "SECURITY",
            SettingCategory::PlanLimits => "PLAN_LIMITS",
            SettingCategory::General => "GENERAL",
            SettingCategory::Other => "OTHER",
        }
    }
}

/// One configurable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    pub category: SettingCategory,
    #[serde(default)]
    pub description: String,
}

impl Setting {
    /// Replace the value, keeping the JSON type of the current one
    pub fn set_from_input(&mut self, input: &str) -> Result<()> {
        self.value = coerce_value(&self.value, input)?;
        Ok(())
    }
}

/// Parse user input into the same JSON type as `existing`
///
/// Unparseable numbers become 0.
pub fn coerce_value(existing: &Value, input: &str) -> Result<Value> {
    let input = input.trim();
    match existing {
        Value::Number(n) if n.is_f64() => Ok(json!(input.parse::<f64>().unwrap_or(0.0))),
        Value::Number(_) => Ok(json!(input.parse::<i64>().unwrap_or(0))),
        Value::Bool(_) => match input.to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(RestoError::InvalidInput(format!(
                "'{}' is not a boolean (use true/false)",
                input
            ))),
        },
        _ => Ok(Value::String(input.to_string())),
    }
}

/// Usage limits attached to a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    #[serde(default)]
    pub orders: i64,
    #[serde(default)]
    pub users: i64,
    #[serde(default)]
    pub menu_items: i64,
}

impl PlanLimits {
    /// Set one limit by name; non-numeric input becomes 0
    pub fn set_field(&mut self, field: &str, input: &str) -> Result<()> {
        let value = input.trim().parse::<i64>().unwrap_or(0);
        match field {
            "orders" => self.orders = value,
            "users" => self.users = value,
            "menu-items" | "menuItems" | "menu_items" => self.menu_items = value,
            _ => {
                return Err(RestoError::InvalidInput(format!(
                    "unknown limit '{}' (expected orders, users or menu-items)",
                    field
                )))
            }
        }
        Ok(())
    }
}

/// Settings operations handler
pub struct SettingsHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> SettingsHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// All settings grouped by category
    pub async fn list(&self) -> Result<BTreeMap<SettingCategory, Vec<Setting>>> {
        let value = self
            .client
            .request(Method::GET, "/api/settings", None)
            .await?;
        match value.get("settings") {
            Some(settings) if !settings.is_null() => Ok(serde_json::from_value(settings.clone())?),
            _ => Ok(BTreeMap::new()),
        }
    }

    /// Save one setting
    pub async fn update(&self, setting: &Setting) -> Result<()> {
        let body = serde_json::to_value(setting)?;
        self.client
            .request(Method::PUT, "/api/settings", Some(body))
            .await?;
        Ok(())
    }

    /// Limits for every plan
    pub async fn plan_limits(&self) -> Result<BTreeMap<Plan, PlanLimits>> {
        let value = self
            .client
            .request(Method::GET, "/api/settings/plan-limits", None)
            .await?;
        match value.get("limits") {
            Some(limits) if !limits.is_null() => Ok(serde_json::from_value(limits.clone())?),
            _ => Ok(BTreeMap::new()),
        }
    }

    /// Save the limits of one plan
    pub async fn update_plan_limits(&self, plan: Plan, limits: &PlanLimits) -> Result<()> {
        self.client
            .request(
                Method::PUT,
                "/api/settings/plan-limits",
                Some(json!({ "plan": plan, "limits": limits })),
            )
            .await?;
        Ok(())
    }
}

/// Find a setting by key across all categories
pub fn find_setting<'s>(
    groups: &'s BTreeMap<SettingCategory, Vec<Setting>>,
    key: &str,
) -> Option<&'s Setting> {
    groups.values().flatten().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;

    #[test]
    fn test_coerce_keeps_type() {
        assert_eq!(coerce_value(&json!(10), "25").unwrap(), json!(25));
        assert_eq!(coerce_value(&json!(10), "lots").unwrap(), json!(0));
        assert_eq!(coerce_value(&json!(0.5), "1.25").unwrap(), json!(1.25));
        assert_eq!(coerce_value(&json!(false), "on").unwrap(), json!(true));
        assert!(coerce_value(&json!(true), "maybe").is_err());
        assert_eq!(
            coerce_value(&json!("smtp.a.io"), " smtp.b.io ").unwrap(),
            json!("smtp.b.io")
        );
    }

    #[test]
    fn test_plan_limit_fields() {
        let mut limits = PlanLimits::default();
        limits.set_field("orders", "500").unwrap();
        limits.set_field("menu-items", "x").unwrap();
        assert_eq!(limits.orders, 500);
        assert_eq!(limits.menu_items, 0);
        assert!(limits.set_field("tables", "3").is_err());
    }

    #[tokio::test]
    async fn test_list_groups_by_category() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/settings")
            .returning(|_, _, _| {
                Ok(json!({"settings": {
                    "SYSTEM": [{"key": "maintenanceMode", "value": false, "category": "SYSTEM",
                                "description": "Read-only mode"}],
                    "EMAIL": [{"key": "smtpHost", "value": "smtp.a.io", "category": "EMAIL"}]
                }}))
            });

        let groups = SettingsHandler::new(&mock).list().await.unwrap();
        assert_eq!(groups.len(), 2);
        let smtp = find_setting(&groups, "smtpHost").unwrap();
        assert_eq!(smtp.category, SettingCategory::Email);
    }

    #[tokio::test]
    async fn test_update_plan_limits_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/settings/plan-limits"
                    && *body
                        == Some(json!({"plan": "basic",
                                       "limits": {"orders": 1000, "users": 5, "menuItems": 50}}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        let limits = PlanLimits {
            orders: 1000,
            users: 5,
            menu_items: 50,
        };
        SettingsHandler::new(&mock)
            .update_plan_limits(Plan::Basic, &limits)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_plan_limits_keyed_by_plan() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .returning(|_, _, _| {
                Ok(json!({"limits": {"trial": {"orders": 50, "users": 2, "menuItems": 20}}}))
            });

        let limits = SettingsHandler::new(&mock).plan_limits().await.unwrap();
        assert_eq!(limits[&Plan::Trial].users, 2);
    }
}
