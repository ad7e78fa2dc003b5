//! TUI theme and styles

use ratatui::style::{Color, Modifier, Style};

use crate::api::orders::OrderStatus;
use crate::api::tables::TableStatus;
use crate::core::kitchen_board::Urgency;

/// Application color theme
pub struct Theme;

impl Theme {
    /// Primary accent color
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color
    pub const SECONDARY: Color = Color::Yellow;

    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Warning color
    pub const WARNING: Color = Color::Yellow;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGray;

    /// Header style
    pub fn header() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().bg(Color::DarkGray)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default().bg(Self::PRIMARY).fg(Color::Black)
    }

    /// Normal text style
    pub fn normal() -> Style {
        Style::default()
    }

    /// Muted text style
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Section heading inside a panel
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn order_status(status: OrderStatus) -> Color {
        match status {
            OrderStatus::Pending => Self::WARNING,
            OrderStatus::Preparing => Color::Blue,
            OrderStatus::Ready => Self::SUCCESS,
            OrderStatus::Delivered => Color::Magenta,
            OrderStatus::Paid => Self::MUTED,
            OrderStatus::Unknown => Color::Gray,
        }
    }

    pub fn table_status(status: TableStatus) -> Color {
        match status {
            TableStatus::Available => Self::SUCCESS,
            TableStatus::Occupied => Self::ERROR,
            TableStatus::Reserved => Self::SECONDARY,
            TableStatus::Maintenance => Self::MUTED,
            TableStatus::Unknown => Color::Gray,
        }
    }

    pub fn urgency(urgency: Urgency) -> Color {
        match urgency {
            Urgency::Urgent => Self::ERROR,
            Urgency::Elevated => Self::WARNING,
            Urgency::Normal => Color::White,
        }
    }
}
