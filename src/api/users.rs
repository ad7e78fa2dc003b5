//! Staff user management across restaurants (super-admin)

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::auth::Role;
use crate::api::client::{list_field, object_field, ApiTransport, Method};
use crate::api::de::id_or_object;
use crate::error::{RestoError, Result};

/// Working shift of a staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
    #[serde(other)]
    Unknown,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "MORNING",
            Shift::Afternoon => "AFTERNOON",
            Shift::Evening => "EVENING",
            Shift::Night => "NIGHT",
            Shift::Unknown => "UNKNOWN",
        }
    }
}

impl std::str::FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MORNING" => Ok(Shift::Morning),
            "AFTERNOON" => Ok(Shift::Afternoon),
            "EVENING" => Ok(Shift::Evening),
            "NIGHT" => Ok(Shift::Night),
            _ => Err(format!(
                "unknown shift '{}' (expected morning, afternoon, evening or night)",
                s
            )),
        }
    }
}

/// A staff account belonging to a restaurant
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "id_or_object")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub shift: Option<Shift>,
    #[serde(default)]
    pub is_active: bool,
}

/// Payload for creating a staff account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub shift: Shift,
    pub permissions: Vec<String>,
    pub restaurant_id: String,
}

impl NewStaffUser {
    fn validate(&self) -> Result<()> {
        if self.restaurant_id.trim().is_empty() {
            return Err(RestoError::InvalidInput(
                "Please select a restaurant".to_string(),
            ));
        }
        if self.email.trim().is_empty() || self.password.is_empty() || self.name.trim().is_empty()
        {
            return Err(RestoError::InvalidInput(
                "Name, email and password are required".to_string(),
            ));
        }
        if !Role::STAFF.contains(&self.role) {
            return Err(RestoError::InvalidInput(format!(
                "Role {} cannot be assigned to restaurant staff",
                self.role
            )));
        }
        Ok(())
    }
}

/// Users belonging to one restaurant
pub fn filter_by_restaurant<'u>(users: &'u [StaffUser], restaurant_id: &str) -> Vec<&'u StaffUser> {
    users
        .iter()
        .filter(|u| u.restaurant_id.as_deref() == Some(restaurant_id))
        .collect()
}

/// User management operations handler
pub struct UserHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> UserHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// List staff across all restaurants
    pub async fn list(&self) -> Result<Vec<StaffUser>> {
        let value = self
            .client
            .request(Method::GET, "/api/user-management", None)
            .await?;
        list_field(value, "users")
    }

    /// Create a staff account in a restaurant
    pub async fn create(&self, user: &NewStaffUser) -> Result<StaffUser> {
        user.validate()?;
        let path = format!("/api/user-management/restaurant/{}", user.restaurant_id);
        let body = serde_json::to_value(user)?;
        let value = self.client.request(Method::POST, &path, Some(body)).await?;
        object_field(value, "user")
    }

    /// Activate or deactivate a staff account
    pub async fn set_active(&self, user: &StaffUser, active: bool) -> Result<()> {
        let restaurant_id = user.restaurant_id.as_deref().ok_or_else(|| {
            RestoError::InvalidInput(format!("{} is not attached to a restaurant", user.email))
        })?;
        let path = format!(
            "/api/user-management/restaurant/{}/user/{}",
            restaurant_id, user.id
        );
        self.client
            .request(
                Method::PUT,
                &path,
                Some(json!({ "name": user.name, "role": user.role, "isActive": active })),
            )
            .await?;
        Ok(())
    }

    /// Flip a user's active flag, returning the new value
    pub async fn toggle_active(&self, user: &StaffUser) -> Result<bool> {
        let active = !user.is_active;
        self.set_active(user, active).await?;
        Ok(active)
    }

    /// Delete a staff account
    pub async fn delete(&self, restaurant_id: &str, user_id: &str) -> Result<()> {
        let path = format!(
            "/api/user-management/restaurant/{}/user/{}",
            restaurant_id, user_id
        );
        self.client.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    fn new_user(restaurant_id: &str, role: Role) -> NewStaffUser {
        NewStaffUser {
            email: "w@x.io".to_string(),
            password: "secret".to_string(),
            name: "Wasim".to_string(),
            role,
            shift: Shift::default(),
            permissions: Vec::new(),
            restaurant_id: restaurant_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_posts_to_restaurant() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                let body = body.as_ref().unwrap();
                *method == Method::POST
                    && path == "/api/user-management/restaurant/r1"
                    && body["role"] == "WAITER"
                    && body["shift"] == "MORNING"
                    && body["restaurantId"] == "r1"
                    && body["permissions"] == json!([])
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"user": {"_id": "u1", "name": "Wasim", "role": "WAITER", "isActive": true}}))
            });

        let user = UserHandler::new(&mock)
            .create(&new_user("r1", Role::Waiter))
            .await
            .unwrap();
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_create_requires_restaurant_and_staff_role() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);
        let handler = UserHandler::new(&mock);

        let err = handler.create(&new_user("", Role::Waiter)).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select a restaurant");

        assert!(handler
            .create(&new_user("r1", Role::SuperAdmin))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_toggle_active_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/user-management/restaurant/r1/user/u1"
                    && *body == Some(json!({"name": "Asha", "role": "CHEF", "isActive": false}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        let user = StaffUser {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "a@x.io".to_string(),
            restaurant_id: Some("r1".to_string()),
            restaurant_name: None,
            role: Role::Chef,
            shift: None,
            is_active: true,
        };
        assert!(!UserHandler::new(&mock).toggle_active(&user).await.unwrap());
    }

    #[test]
    fn test_filter_by_restaurant() {
        let users: Vec<StaffUser> = serde_json::from_value(json!([
            {"_id": "1", "role": "CHEF", "restaurantId": "r1"},
            {"_id": "2", "role": "WAITER", "restaurantId": {"_id": "r2"}},
            {"_id": "3", "role": "CASHIER", "restaurantId": "r1"}
        ]))
        .unwrap();

        let ids: Vec<&str> = filter_by_restaurant(&users, "r1")
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
