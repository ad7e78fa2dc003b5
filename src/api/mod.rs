//! Restaurant backend REST integration
//!
//! One handler per backend resource, all speaking through [`ApiTransport`]:
//! - Authentication and session user
//! - Orders, menus and the kitchen board
//! - Tables, inventory, addons and attendance
//! - Super-admin restaurants, users, billing, analytics, settings,
//!   system health and broadcast messages
//! - Background polling for live screens

pub mod addons;
pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod billing;
pub mod client;
pub mod communication;
pub mod de;
pub mod error_handler;
pub mod inventory;
pub mod kitchen;
pub mod menus;
pub mod orders;
pub mod polling;
pub mod restaurants;
pub mod settings;
pub mod system;
pub mod tables;
pub mod users;

pub use auth::{AuthHandler, Role, SessionUser};
pub use client::{ApiClient, ApiTransport, Method};
pub use error_handler::classify_response;
pub use kitchen::{KitchenBoard, KitchenHandler, Kot, KotStatus};
pub use orders::{Order, OrderHandler, OrderStatus, PaymentMethod};
pub use polling::{spawn_poller, PollEvent, PollHandle, PollTarget};
pub use tables::{Table, TableHandler, TableStatus};
