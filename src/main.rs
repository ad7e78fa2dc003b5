//! resto-rs - restaurant operations console
//!
//! A terminal application for restaurant owners, staff and platform admins.
//! Run without arguments to launch the TUI, or use subcommands for CLI mode.
//!
//! Available as the `resto` command.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use resto_rs::cli::commands::{Cli, Commands};
use resto_rs::cli::{
    analytics, attendance, auth, config, inventory, kitchen, orders, restaurants, system, tables,
    users,
};
use resto_rs::core::credentials::{CredentialStore, TOKEN_ENV};
use resto_rs::error::{RestoError, Result};
use resto_rs::tui::App;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Print the error, dropping a session the backend no longer accepts
fn handle_error(e: RestoError) {
    if let RestoError::NotAuthenticated = e {
        let stored =
            std::env::var(TOKEN_ENV).is_err() && CredentialStore::has_session().unwrap_or(false);
        if stored {
            if let Err(err) = CredentialStore::delete_session() {
                tracing::warn!(error = %err, "failed to clear expired session");
            }
            eprintln!("Your session has expired and was signed out.");
            eprintln!();
        }
    }
    eprintln!("Error: {}", e);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // No subcommand - launch TUI mode
        None => run_tui().await,

        Some(Commands::Auth(args)) => auth::handle_auth(args.command).await,
        Some(Commands::Config(args)) => config::handle_config(args.command),
        Some(Commands::Orders(args)) => orders::handle_orders(args.command).await,
        Some(Commands::Menu(args)) => orders::handle_menu(args.command).await,
        Some(Commands::Kitchen(args)) => kitchen::handle_kitchen(args.command).await,
        Some(Commands::Tables(args)) => tables::handle_tables(args.command).await,
        Some(Commands::Inventory(args)) => inventory::handle_inventory(args.command).await,
        Some(Commands::Addons(args)) => inventory::handle_addons(args.command).await,
        Some(Commands::Attendance(args)) => attendance::handle_attendance(args.command).await,
        Some(Commands::Users(args)) => users::handle_users(args.command).await,
        Some(Commands::Restaurants(args)) => restaurants::handle_restaurants(args.command).await,
        Some(Commands::Billing(args)) => restaurants::handle_billing(args.command).await,
        Some(Commands::Analytics(args)) => analytics::handle_analytics(args.command).await,
        Some(Commands::Settings(args)) => analytics::handle_settings(args.command).await,
        Some(Commands::System(args)) => system::handle_system(args.command).await,
        Some(Commands::Messages(args)) => system::handle_messages(args.command).await,
    }
}

/// Run the TUI application
async fn run_tui() -> Result<()> {
    let mut app = App::new()?;
    app.run().await
}
