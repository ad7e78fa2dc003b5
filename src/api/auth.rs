//! Login and the signed-in user

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{missing_field, ApiTransport, Method};
use crate::api::de::id_or_object;
use crate::error::{RestoError, Result};

/// Platform role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    RestaurantAdmin,
    Manager,
    Chef,
    Waiter,
    Cashier,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles a super-admin can assign to restaurant staff
    pub const STAFF: [Role; 5] = [
        Role::RestaurantAdmin,
        Role::Manager,
        Role::Chef,
        Role::Waiter,
        Role::Cashier,
    ];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::RestaurantAdmin => "RESTAURANT_ADMIN",
            Role::Manager => "MANAGER",
            Role::Chef => "CHEF",
            Role::Waiter => "WAITER",
            Role::Cashier => "CASHIER",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::RestaurantAdmin => "Restaurant Admin",
            Role::Manager => "Manager",
            Role::Chef => "Chef",
            Role::Waiter => "Waiter",
            Role::Cashier => "Cashier",
            Role::Unknown => "Unknown",
        }
    }

    /// Whether the role can see every staff member's attendance
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Role::SuperAdmin | Role::RestaurantAdmin | Role::Manager
        )
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "RESTAURANT_ADMIN" => Ok(Role::RestaurantAdmin),
            "MANAGER" => Ok(Role::Manager),
            "CHEF" => Ok(Role::Chef),
            "WAITER" => Ok(Role::Waiter),
            "CASHIER" => Ok(Role::Cashier),
            _ => Err(format!(
                "unknown role '{}' (expected one of: restaurant-admin, manager, chef, waiter, cashier)",
                s
            )),
        }
    }
}

/// The user returned by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default, deserialize_with = "id_or_object")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub restaurant_slug: Option<String>,
}

/// Token and user returned by the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Login operations handler
pub struct AuthHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> AuthHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Sign in with email and password
    ///
    /// Restaurant staff pass their restaurant slug; super-admins leave it out.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        restaurant_slug: Option<&str>,
    ) -> Result<LoginResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(RestoError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let mut body = json!({
            "email": email.trim(),
            "password": password,
        });
        if let Some(slug) = restaurant_slug.filter(|s| !s.trim().is_empty()) {
            body["restaurantSlug"] = json!(slug.trim());
        }

        let value = self
            .client
            .request(Method::POST, "/api/auth/login", Some(body))
            .await
            .map_err(|e| match e {
                RestoError::NotAuthenticated => {
                    RestoError::LoginFailed("invalid email or password".to_string())
                }
                RestoError::Api { message, .. } | RestoError::NotFound(message) => {
                    RestoError::LoginFailed(message)
                }
                other => other,
            })?;

        if value.get("token").is_none() {
            return Err(missing_field("a session token"));
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;

    #[tokio::test]
    async fn test_login_sends_restaurant_slug() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path == "/api/auth/login"
                    && body.as_ref().map(|b| b["restaurantSlug"] == "spice-hub") == Some(true)
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({
                    "token": "jwt",
                    "user": {"_id": "u1", "name": "Ravi", "email": "r@x.io", "role": "CHEF",
                             "restaurantId": {"_id": "r1", "name": "Spice Hub"}}
                }))
            });

        let response = AuthHandler::new(&mock)
            .login("r@x.io", "pw", Some("spice-hub"))
            .await
            .unwrap();

        assert_eq!(response.token, "jwt");
        assert_eq!(response.user.role, Role::Chef);
        assert_eq!(response.user.restaurant_id.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_super_admin_login_omits_slug() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|_, _, body| {
                body.as_ref()
                    .map(|b| b.get("restaurantSlug").is_none())
                    .unwrap_or(false)
            })
            .returning(|_, _, _| {
                Ok(json!({"token": "t", "user": {"_id": "a", "role": "SUPER_ADMIN"}}))
            });

        let response = AuthHandler::new(&mock)
            .login("admin@x.io", "pw", Some("  "))
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_rejected_login_is_login_failed() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .returning(|_, _, _| Err(RestoError::NotAuthenticated));

        let err = AuthHandler::new(&mock)
            .login("x@y.z", "bad", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RestoError::LoginFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_credentials_never_hit_backend() {
        let mut mock = MockApiTransport::new();
        mock.expect_request().times(0);

        let err = AuthHandler::new(&mock).login("", "", None).await.unwrap_err();
        assert!(matches!(err, RestoError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_role_deserializes() {
        let user: SessionUser =
            serde_json::from_value(json!({"_id": "1", "role": "OWNER"})).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("restaurant-admin".parse::<Role>(), Ok(Role::RestaurantAdmin));
        assert_eq!("waiter".parse::<Role>(), Ok(Role::Waiter));
        assert!("owner".parse::<Role>().is_err());
    }
}
