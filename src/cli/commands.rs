//! CLI command definitions using clap
//!
//! Defines the command structure for the `resto` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::analytics::ExportFormat;
use crate::api::attendance::AttendanceFilter;
use crate::api::auth::Role;
use crate::api::billing::Plan;
use crate::api::communication::{MessagePriority, MessageType, Recipients};
use crate::api::kitchen::KotStatus;
use crate::api::orders::{OrderPriority, OrderStatus, PaymentMethod};
use crate::api::tables::TableStatus;
use crate::api::users::Shift;

/// resto - restaurant operations console
///
/// Dashboards for super-admins, owners, waiters, chefs and cashiers.
/// Run without arguments to launch the TUI mode.
#[derive(Parser, Debug)]
#[command(name = "resto", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in to the restaurant backend
    Auth(AuthArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Take, track and settle orders
    Orders(OrdersArgs),

    /// Browse the menu
    Menu(MenuArgs),

    /// Work the kitchen board (KOTs)
    Kitchen(KitchenArgs),

    /// Manage dining tables
    Tables(TablesArgs),

    /// Manage stock
    Inventory(InventoryArgs),

    /// Manage menu add-ons
    Addons(AddonsArgs),

    /// Check in, check out and review attendance
    Attendance(AttendanceArgs),

    /// Manage staff accounts (super-admin)
    Users(UsersArgs),

    /// Manage restaurants on the platform (super-admin)
    Restaurants(RestaurantsArgs),

    /// Subscription plans (super-admin)
    Billing(BillingArgs),

    /// Platform analytics (super-admin)
    Analytics(AnalyticsArgs),

    /// Platform settings and plan limits (super-admin)
    Settings(SettingsArgs),

    /// Backend health (super-admin)
    System(SystemArgs),

    /// Broadcast messages to restaurants (super-admin)
    Messages(MessagesArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication commands
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Login with email and password (the password is prompted)
    Login {
        /// Account email
        #[arg(long, short)]
        email: Option<String>,

        /// Restaurant slug (staff accounts); defaults to the configured slug
        #[arg(long, short)]
        restaurant: Option<String>,
    },
    /// Logout and remove the stored session
    Logout,
    /// Show current session status
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Backend base URL
    #[value(name = "api-url")]
    ApiUrl,

    /// Refresh interval for live screens, in seconds
    #[value(name = "poll-interval")]
    PollInterval,

    /// Default restaurant slug
    #[value(name = "restaurant-slug")]
    RestaurantSlug,

    /// Currency symbol for amounts
    #[value(name = "currency")]
    Currency,
}

// ─────────────────────────────────────────────────────────────────────────────
// Order Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Order commands
#[derive(Parser, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// List orders
    List {
        /// Only show orders in this status
        #[arg(long, short)]
        status: Option<OrderStatus>,
    },

    /// Cashier summary: counts by status and revenue
    Summary,

    /// Create an order for a customer
    Create {
        /// Customer name
        #[arg(long, short)]
        customer: String,

        /// Customer phone
        #[arg(long, short)]
        phone: Option<String>,

        /// Menu item as `<id or name>[:quantity]`, repeatable
        #[arg(long = "item", short = 'i', required = true)]
        items: Vec<String>,
    },

    /// Move an order to a new status
    Status {
        /// Order ID
        id: String,

        /// New status
        status: OrderStatus,
    },

    /// Record payment for a ready or delivered order
    Pay {
        /// Order ID
        id: String,

        /// Payment method (cash, card, digital)
        #[arg(long, short, default_value = "cash")]
        method: PaymentMethod,
    },

    /// Place an order from a restaurant's public menu
    Place {
        /// Restaurant slug; defaults to the configured slug
        #[arg(long, short)]
        restaurant: Option<String>,

        /// Customer name
        #[arg(long, short)]
        customer: String,

        /// Customer phone
        #[arg(long, short)]
        phone: Option<String>,

        /// Menu item as `<id or name>[:quantity]`, repeatable
        #[arg(long = "item", short = 'i', required = true)]
        items: Vec<String>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Menu Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Menu commands
#[derive(Parser, Debug)]
pub struct MenuArgs {
    #[command(subcommand)]
    pub command: MenuCommand,
}

#[derive(Subcommand, Debug)]
pub enum MenuCommand {
    /// List menu items
    List {
        /// Include items that are currently unavailable
        #[arg(long, short)]
        all: bool,

        /// Browse another restaurant's public menu by slug
        #[arg(long, short)]
        restaurant: Option<String>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Kitchen Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Kitchen commands
#[derive(Parser, Debug)]
pub struct KitchenArgs {
    #[command(subcommand)]
    pub command: KitchenCommand,
}

#[derive(Subcommand, Debug)]
pub enum KitchenCommand {
    /// Show the KOT board
    Board,

    /// Keep refreshing the board until interrupted
    Watch,

    /// Move a KOT to a new status
    Kot {
        /// KOT ID
        id: String,

        /// New status (pending, in-progress, completed)
        status: KotStatus,
    },

    /// Move an order to a new kitchen status
    Status {
        /// Order ID
        id: String,

        /// New status
        status: OrderStatus,
    },

    /// Change an order's kitchen priority
    Priority {
        /// Order ID
        id: String,

        /// Priority (normal, medium, high)
        priority: OrderPriority,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Table Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Table commands
#[derive(Parser, Debug)]
pub struct TablesArgs {
    #[command(subcommand)]
    pub command: TablesCommand,
}

#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    /// List tables
    List,

    /// Add a table
    Add {
        /// Table number
        number: String,

        /// Seats
        #[arg(long, short)]
        capacity: u32,

        /// Location (e.g. "Patio")
        #[arg(long, short, default_value = "Main hall")]
        location: String,
    },

    /// Change a table's status (applies to its merged group)
    Status {
        /// Table ID
        id: String,

        /// New status
        status: TableStatus,
    },

    /// Merge tables to seat a large party
    Merge {
        /// Table IDs (at least two)
        #[arg(required = true, num_args = 2..)]
        ids: Vec<String>,

        /// Party size
        #[arg(long, short)]
        guests: u32,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Inventory Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Inventory commands
#[derive(Parser, Debug)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// List stock
    List {
        /// Only show items at or below their minimum
        #[arg(long)]
        low: bool,
    },

    /// Add a stock item
    Add {
        /// Item name
        name: String,

        #[arg(long, default_value = "General")]
        category: String,

        /// Current stock
        #[arg(long, default_value_t = 0.0)]
        stock: f64,

        /// Minimum stock before the item is flagged low
        #[arg(long, default_value_t = 0.0)]
        min: f64,

        /// Unit (kg, l, pcs, ...)
        #[arg(long, default_value = "pcs")]
        unit: String,

        /// Cost per unit
        #[arg(long, default_value_t = 0.0)]
        cost: f64,

        #[arg(long)]
        supplier: Option<String>,
    },

    /// Edit an item's details; omitted fields keep their current value
    Update {
        /// Item ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Minimum stock before the item is flagged low
        #[arg(long)]
        min: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        /// Cost per unit
        #[arg(long)]
        cost: Option<f64>,

        #[arg(long)]
        supplier: Option<String>,
    },

    /// Add stock to an item
    Restock {
        /// Item ID
        id: String,

        /// Quantity to add
        quantity: f64,
    },

    /// Delete a stock item
    Delete {
        /// Item ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Addon Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Add-on commands
#[derive(Parser, Debug)]
pub struct AddonsArgs {
    #[command(subcommand)]
    pub command: AddonsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AddonsCommand {
    /// List add-ons
    List,

    /// Create an add-on
    Add {
        /// Add-on name
        name: String,

        /// Price
        #[arg(long, short)]
        price: f64,

        #[arg(long, short)]
        description: Option<String>,

        /// Mark as non-vegetarian
        #[arg(long)]
        non_veg: bool,
    },

    /// Flip an add-on's availability
    Toggle {
        /// Add-on ID
        id: String,
    },

    /// Delete an add-on
    Delete {
        /// Add-on ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Attendance Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Attendance commands
#[derive(Parser, Debug)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// List records (admins see everyone, staff see their own)
    List {
        /// Filter by status (all, present, absent)
        #[arg(long, short, default_value = "all")]
        filter: AttendanceFilter,

        /// Only today's records
        #[arg(long, short)]
        today: bool,
    },

    /// Start your shift
    CheckIn,

    /// End your shift
    CheckOut,
}

// ─────────────────────────────────────────────────────────────────────────────
// User Commands
// ─────────────────────────────────────────────────────────────────────────────

/// User management commands
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List staff accounts
    List {
        /// Only show staff of this restaurant ID
        #[arg(long, short)]
        restaurant: Option<String>,
    },

    /// Create a staff account (the password is prompted)
    Add {
        /// Restaurant ID
        #[arg(long, short)]
        restaurant: String,

        /// Full name
        #[arg(long, short)]
        name: String,

        /// Email
        #[arg(long, short)]
        email: String,

        /// Role (restaurant-admin, manager, chef, waiter, cashier)
        #[arg(long)]
        role: Role,

        /// Shift (morning, afternoon, evening, night)
        #[arg(long, default_value = "morning")]
        shift: Shift,
    },

    /// Activate or deactivate a staff account
    Toggle {
        /// User ID
        id: String,
    },

    /// Delete a staff account
    Delete {
        /// User ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Restaurant Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Restaurant commands
#[derive(Parser, Debug)]
pub struct RestaurantsArgs {
    #[command(subcommand)]
    pub command: RestaurantsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RestaurantsCommand {
    /// List restaurants with order totals
    List {
        /// Case-insensitive search on name or slug
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Onboard a restaurant and its admin (the admin password is prompted)
    Add {
        /// Restaurant name
        name: String,

        #[arg(long)]
        admin_name: String,

        #[arg(long)]
        admin_email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        city: String,

        #[arg(long, default_value = "")]
        state: String,

        /// Six-digit postal code
        #[arg(long, default_value = "")]
        zip_code: String,

        #[arg(long, default_value = "")]
        cuisine: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Rename a restaurant
    Rename {
        /// Restaurant ID
        id: String,

        /// New name
        name: String,
    },

    /// Activate or suspend one or more restaurants
    Toggle {
        /// Restaurant IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete a restaurant
    Delete {
        /// Restaurant ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Billing Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Billing commands
#[derive(Parser, Debug)]
pub struct BillingArgs {
    #[command(subcommand)]
    pub command: BillingCommand,
}

#[derive(Subcommand, Debug)]
pub enum BillingCommand {
    /// Show available plans
    Plans,

    /// Change a restaurant's plan
    SetPlan {
        /// Restaurant ID
        restaurant: String,

        /// Plan (trial, basic, premium, enterprise)
        plan: Plan,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Analytics commands
#[derive(Parser, Debug)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    /// Show the advanced analytics report
    Show,

    /// Export the report to a file
    Export {
        /// File format (csv, json)
        #[arg(long, short, default_value = "csv")]
        format: ExportFormat,

        /// Output path (defaults to restaurant-analytics.<format>)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Settings commands
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List settings by category
    List,

    /// Change a setting (the value keeps the setting's type)
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },

    /// Show plan limits
    Limits,

    /// Change one limit of a plan
    SetLimit {
        /// Plan
        plan: Plan,

        /// Limit name (orders, users, menu-items)
        field: String,

        /// New value
        value: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// System Commands
// ─────────────────────────────────────────────────────────────────────────────

/// System health commands
#[derive(Parser, Debug)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Subcommand, Debug)]
pub enum SystemCommand {
    /// Show current health
    Health,

    /// Show health history
    History {
        /// Hours to look back
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Keep refreshing health until interrupted
    Watch,
}

// ─────────────────────────────────────────────────────────────────────────────
// Message Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Communication commands
#[derive(Parser, Debug)]
pub struct MessagesArgs {
    #[command(subcommand)]
    pub command: MessagesCommand,
}

#[derive(Subcommand, Debug)]
pub enum MessagesCommand {
    /// List sent messages
    List,

    /// Send a message
    Send {
        /// Title
        #[arg(long, short)]
        title: String,

        /// Body
        #[arg(long, short)]
        message: String,

        /// Type (announcement, notification, alert, update)
        #[arg(long = "type", default_value = "announcement")]
        kind: MessageType,

        /// Priority (low, medium, high, urgent)
        #[arg(long, default_value = "medium")]
        priority: MessagePriority,

        /// Recipients (all, active, trial, specific)
        #[arg(long, default_value = "all")]
        to: Recipients,

        /// Restaurant ID for specific recipients, repeatable
        #[arg(long = "restaurant", short = 'r')]
        restaurants: Vec<String>,
    },
}
