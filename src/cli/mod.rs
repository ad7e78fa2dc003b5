//! CLI module for resto
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod commands;
pub mod config;
pub mod inventory;
pub mod kitchen;
pub mod orders;
pub mod prompt;
pub mod restaurants;
pub mod system;
pub mod tables;
pub mod users;

pub use commands::{Cli, Commands};
