//! Core functionality for resto-rs
//!
//! This module contains shared client-side logic:
//! - Application configuration
//! - Credential management
//! - Session and role routing
//! - Order cart, table merging and the kitchen board layout

pub mod config;
pub mod credentials;
pub mod kitchen_board;
pub mod order_draft;
pub mod session;
pub mod table_merge;

pub use config::Config;
pub use credentials::CredentialStore;
pub use order_draft::OrderDraft;
pub use session::{Dashboard, Section, Session};
pub use table_merge::MergePlanner;
