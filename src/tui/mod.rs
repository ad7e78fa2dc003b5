//! Terminal user interface
//!
//! Role dashboards built on ratatui. Background requests report back to
//! the render loop over an mpsc channel.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
