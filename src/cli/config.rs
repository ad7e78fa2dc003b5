//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::{Config, API_URL_ENV};
use crate::error::{RestoError, Result};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
    }
}

fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        ConfigKey::ApiUrl => {
            config.set_api_url(&value)?;
            println!("API URL set to: {}", config.api_url);
        }
        ConfigKey::PollInterval => {
            config.set_poll_interval(&value)?;
            println!("Poll interval set to: {}s", config.poll_interval_secs);
        }
        ConfigKey::RestaurantSlug => {
            let slug = value.trim();
            if slug.is_empty() || slug.contains(char::is_whitespace) {
                return Err(RestoError::InvalidInput(format!(
                    "Invalid restaurant slug '{}'",
                    value
                )));
            }
            config.restaurant_slug = Some(slug.to_string());
            println!("Restaurant slug set to: {}", slug);
        }
        ConfigKey::Currency => {
            if value.trim().is_empty() {
                return Err(RestoError::InvalidInput(
                    "Currency symbol cannot be empty".to_string(),
                ));
            }
            config.currency = value.trim().to_string();
            println!("Currency set to: {}", config.currency);
        }
    }
    config.save()
}

fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    match key {
        ConfigKey::ApiUrl => {
            println!("API URL: {}", config.effective_api_url());
            if std::env::var(API_URL_ENV).is_ok() {
                println!("  (from {})", API_URL_ENV);
            }
        }
        ConfigKey::PollInterval => println!("Poll interval: {}s", config.poll_interval_secs),
        ConfigKey::RestaurantSlug => match &config.restaurant_slug {
            Some(slug) => println!("Restaurant slug: {}", slug),
            None => println!("Restaurant slug: Not configured"),
        },
        ConfigKey::Currency => println!("Currency: {}", config.currency),
    }
    Ok(())
}

fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    let defaults = Config::default();
    match key {
        ConfigKey::ApiUrl => config.api_url = defaults.api_url,
        ConfigKey::PollInterval => config.poll_interval_secs = defaults.poll_interval_secs,
        ConfigKey::RestaurantSlug => config.restaurant_slug = None,
        ConfigKey::Currency => config.currency = defaults.currency,
    }
    config.save()?;
    println!("Configuration value reset to default.");
    Ok(())
}
