//! Authentication CLI command handlers

use crate::api::auth::AuthHandler;
use crate::api::client::ApiClient;
use crate::cli::commands::AuthCommand;
use crate::cli::prompt::{prompt, prompt_secret};
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::core::session::{Dashboard, Session};
use crate::error::Result;

/// Handle authentication commands
pub async fn handle_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { email, restaurant } => handle_login(email, restaurant).await,
        AuthCommand::Logout => handle_logout(),
        AuthCommand::Status => handle_status(),
    }
}

async fn handle_login(email: Option<String>, restaurant: Option<String>) -> Result<()> {
    if CredentialStore::has_session()? {
        println!("✓ Already logged in.");
        println!();
        println!("  To switch accounts, first run: resto auth logout");
        return Ok(());
    }

    let config = Config::load()?;
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_secret("Password: ")?;
    let slug = restaurant.or_else(|| config.restaurant_slug.clone());

    let client = ApiClient::new(&config.effective_api_url(), None)?;
    let response = AuthHandler::new(&client)
        .login(&email, &password, slug.as_deref())
        .await?;

    CredentialStore::store_session(&response.token, &response.user)?;

    let user = &response.user;
    println!();
    println!(
        "✓ Logged in as {} ({})",
        if user.name.is_empty() { &user.email } else { &user.name },
        user.role.display_name()
    );
    if let Some(slug) = &user.restaurant_slug {
        println!("  Restaurant: {}", slug);
    }
    if Dashboard::for_role(user.role) == Dashboard::AccessDenied {
        println!();
        println!("  This account has no dashboard. Ask an admin to assign a role.");
    }
    Ok(())
}

fn handle_logout() -> Result<()> {
    if !CredentialStore::has_session()? {
        println!("Not logged in.");
        return Ok(());
    }

    CredentialStore::delete_session()?;
    println!("✓ Logged out. Stored session removed.");
    if std::env::var(crate::core::credentials::TOKEN_ENV).is_ok() {
        println!("  Note: RESTO_TOKEN is still set in your environment.");
    }
    Ok(())
}

fn handle_status() -> Result<()> {
    let config = Config::load()?;
    println!("Backend: {}", config.effective_api_url());

    match Session::load()? {
        None => {
            println!("✗ Not logged in");
            println!();
            println!("  Run: resto auth login");
        }
        Some(session) => {
            println!("✓ Logged in");
            println!("  User:      {}", session.display_name());
            println!("  Role:      {}", session.role().display_name());
            println!("  Dashboard: {}", session.dashboard().title());
            if let Some(restaurant) = session
                .user
                .as_ref()
                .and_then(|u| u.restaurant_slug.as_deref())
            {
                println!("  Restaurant: {}", restaurant);
            }
            println!("  Token:     {}", CredentialStore::mask_token(&session.token));
        }
    }
    Ok(())
}
