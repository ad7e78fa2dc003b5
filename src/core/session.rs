//! Signed-in session and role routing

use secrecy::SecretString;

use crate::api::auth::{Role, SessionUser};
use crate::core::credentials::CredentialStore;
use crate::error::{RestoError, Result};

/// Dashboard shown after login, chosen by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    SuperAdmin,
    Restaurant,
    Kitchen,
    Waiter,
    Cashier,
    AccessDenied,
}

/// A screen reachable from a dashboard menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Orders,
    NewOrder,
    Kitchen,
    Tables,
    Inventory,
    Menu,
    Restaurants,
    Users,
    Analytics,
    SystemHealth,
    Attendance,
    Messages,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Orders => "Orders",
            Section::NewOrder => "New Order",
            Section::Kitchen => "Kitchen Board",
            Section::Tables => "Tables",
            Section::Inventory => "Inventory",
            Section::Menu => "Menu",
            Section::Restaurants => "Restaurants",
            Section::Users => "Users",
            Section::Analytics => "Analytics",
            Section::SystemHealth => "System Health",
            Section::Attendance => "Attendance",
            Section::Messages => "Messages",
        }
    }
}

impl Dashboard {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Dashboard::SuperAdmin,
            Role::RestaurantAdmin | Role::Manager => Dashboard::Restaurant,
            Role::Chef => Dashboard::Kitchen,
            Role::Waiter => Dashboard::Waiter,
            Role::Cashier => Dashboard::Cashier,
            Role::Unknown => Dashboard::AccessDenied,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dashboard::SuperAdmin => "Platform Administration",
            Dashboard::Restaurant => "Restaurant Dashboard",
            Dashboard::Kitchen => "Kitchen",
            Dashboard::Waiter => "Waiter",
            Dashboard::Cashier => "Cashier",
            Dashboard::AccessDenied => "Access Denied",
        }
    }

    /// Menu entries, in display order
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Dashboard::SuperAdmin => &[
                Section::Restaurants,
                Section::Users,
                Section::Analytics,
                Section::SystemHealth,
                Section::Messages,
                Section::Attendance,
            ],
            Dashboard::Restaurant => &[
                Section::Orders,
                Section::Kitchen,
                Section::Tables,
                Section::Inventory,
                Section::Menu,
                Section::Attendance,
            ],
            Dashboard::Kitchen => &[Section::Kitchen, Section::Attendance],
            Dashboard::Waiter => &[
                Section::Orders,
                Section::NewOrder,
                Section::Tables,
                Section::Menu,
                Section::Attendance,
            ],
            Dashboard::Cashier => &[Section::Orders, Section::Attendance],
            Dashboard::AccessDenied => &[],
        }
    }

    pub fn allows(&self, section: Section) -> bool {
        self.sections().contains(&section)
    }
}

/// Token plus the user it was issued to
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: Option<SessionUser>,
}

impl Session {
    /// Load the stored session, if any
    pub fn load() -> Result<Option<Self>> {
        let Some(token) = CredentialStore::get_token()? else {
            return Ok(None);
        };
        let user = CredentialStore::get_user()?;
        Ok(Some(Self { token, user }))
    }

    /// A token without a stored profile (e.g. from the environment) has no role
    pub fn role(&self) -> Role {
        self.user.as_ref().map(|u| u.role).unwrap_or(Role::Unknown)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::for_role(self.role())
    }

    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) if !user.name.is_empty() => user.name.clone(),
            Some(user) => user.email.clone(),
            None => "unknown user".to_string(),
        }
    }

    /// Checking in and out is for roles that manage staff attendance
    pub fn require_attendance_admin(&self, action: &str) -> Result<()> {
        if self.role().is_admin() {
            Ok(())
        } else {
            Err(RestoError::AccessDenied(format!(
                "{} cannot {}",
                self.role().display_name(),
                action
            )))
        }
    }

    /// Fail unless the role's dashboard offers `section`
    pub fn require(&self, section: Section) -> Result<()> {
        if self.dashboard().allows(section) {
            Ok(())
        } else {
            Err(RestoError::AccessDenied(format!(
                "{} cannot open {}",
                self.role().display_name(),
                section.title()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            token: SecretString::from("token"),
            user: Some(SessionUser {
                id: "u1".to_string(),
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                role,
                restaurant_id: Some("r1".to_string()),
                restaurant_slug: Some("spice-hub".to_string()),
            }),
        }
    }

    #[test]
    fn test_role_routing() {
        assert_eq!(Dashboard::for_role(Role::SuperAdmin), Dashboard::SuperAdmin);
        assert_eq!(Dashboard::for_role(Role::RestaurantAdmin), Dashboard::Restaurant);
        assert_eq!(Dashboard::for_role(Role::Manager), Dashboard::Restaurant);
        assert_eq!(Dashboard::for_role(Role::Chef), Dashboard::Kitchen);
        assert_eq!(Dashboard::for_role(Role::Waiter), Dashboard::Waiter);
        assert_eq!(Dashboard::for_role(Role::Cashier), Dashboard::Cashier);
        assert_eq!(Dashboard::for_role(Role::Unknown), Dashboard::AccessDenied);
    }

    #[test]
    fn test_require_section() {
        assert!(session(Role::Chef).require(Section::Kitchen).is_ok());
        assert!(matches!(
            session(Role::Chef).require(Section::Restaurants),
            Err(RestoError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_attendance_check_in_is_admin_only() {
        for role in [Role::SuperAdmin, Role::RestaurantAdmin, Role::Manager] {
            assert!(session(role).require_attendance_admin("check in").is_ok());
        }
        for role in [Role::Chef, Role::Waiter, Role::Cashier, Role::Unknown] {
            assert!(matches!(
                session(role).require_attendance_admin("check in"),
                Err(RestoError::AccessDenied(msg)) if msg.ends_with("cannot check in")
            ));
        }
    }

    #[test]
    fn test_token_without_user_is_denied() {
        let session = Session {
            token: SecretString::from("env-token"),
            user: None,
        };
        assert_eq!(session.dashboard(), Dashboard::AccessDenied);
        assert!(session.dashboard().sections().is_empty());
        assert_eq!(session.display_name(), "unknown user");
    }
}
