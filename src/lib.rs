//! resto-rs - operator console for a multi-tenant restaurant backend
//!
//! This library provides both CLI and TUI interfaces for running restaurants
//! on the platform: order taking, the kitchen board, tables, stock, staff
//! attendance and the super-admin platform tools.

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod tui;

pub use error::{RestoError, Result};
