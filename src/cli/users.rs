//! User management CLI command handlers

use crate::api::client::ApiClient;
use crate::api::users::{filter_by_restaurant, NewStaffUser, StaffUser, UserHandler};
use crate::cli::commands::UsersCommand;
use crate::cli::prompt::{confirm_or_cancel, prompt_secret};
use crate::error::{RestoError, Result};

/// Handle user management commands
pub async fn handle_users(command: UsersCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = UserHandler::new(&client);

    match command {
        UsersCommand::List { restaurant } => {
            let users = handler.list().await?;
            let shown: Vec<&StaffUser> = match restaurant.as_deref() {
                Some(id) => filter_by_restaurant(&users, id),
                None => users.iter().collect(),
            };

            if shown.is_empty() {
                println!("No staff accounts found.");
                return Ok(());
            }

            println!("{} staff accounts:\n", shown.len());
            for user in shown {
                println!(
                    "  {:<24} {:<20} {:<28} {:<17} {:<10} {:<20} {}",
                    user.id,
                    user.name,
                    user.email,
                    user.role.display_name(),
                    user.shift.map(|s| s.as_str()).unwrap_or("-"),
                    user.restaurant_name.as_deref().unwrap_or("-"),
                    if user.is_active { "active" } else { "inactive" }
                );
            }
        }
        UsersCommand::Add {
            restaurant,
            name,
            email,
            role,
            shift,
        } => {
            let password = prompt_secret("Password for the new account: ")?;
            let user = handler
                .create(&NewStaffUser {
                    email,
                    password,
                    name,
                    role,
                    shift,
                    permissions: Vec::new(),
                    restaurant_id: restaurant,
                })
                .await?;
            println!("✓ Created {} ({}) as {}", user.name, user.email, user.role.display_name());
        }
        UsersCommand::Toggle { id } => {
            let user = find_user(&handler.list().await?, &id)?;
            let active = handler.toggle_active(&user).await?;
            println!(
                "✓ {} is now {}",
                user.email,
                if active { "active" } else { "inactive" }
            );
        }
        UsersCommand::Delete { id, yes } => {
            let user = find_user(&handler.list().await?, &id)?;
            let restaurant_id = user.restaurant_id.clone().ok_or_else(|| {
                RestoError::InvalidInput(format!("{} is not attached to a restaurant", user.email))
            })?;
            confirm_or_cancel(&format!("Delete user '{}'?", user.email), yes)?;
            handler.delete(&restaurant_id, &user.id).await?;
            println!("✓ Deleted {}", user.email);
        }
    }
    Ok(())
}

fn find_user(users: &[StaffUser], id: &str) -> Result<StaffUser> {
    users
        .iter()
        .find(|u| u.id == id || u.email.eq_ignore_ascii_case(id))
        .cloned()
        .ok_or_else(|| RestoError::NotFound(format!("user '{}'", id)))
}
