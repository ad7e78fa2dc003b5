//! Analytics and settings CLI command handlers

use crate::api::analytics::{AdvancedAnalytics, AnalyticsHandler};
use crate::api::client::ApiClient;
use crate::api::settings::{find_setting, SettingsHandler};
use crate::cli::commands::{AnalyticsCommand, SettingsCommand};
use crate::core::config::Config;
use crate::error::{RestoError, Result};

const BAR_WIDTH: usize = 30;

/// Handle analytics commands
pub async fn handle_analytics(command: AnalyticsCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = AnalyticsHandler::new(&client);

    match command {
        AnalyticsCommand::Show => {
            let config = Config::load()?;
            print_report(&handler.advanced().await?, &config);
        }
        AnalyticsCommand::Export { format, output } => {
            let content = handler.export(format).await?;
            let path = output.unwrap_or_else(|| format.default_file_name().into());
            std::fs::write(&path, content)?;
            println!("✓ Exported {} report to {}", format.as_str(), path.display());
        }
    }
    Ok(())
}

fn print_report(report: &AdvancedAnalytics, config: &Config) {
    println!("Revenue:             {}", config.format_amount(report.total_revenue));
    println!("Orders:              {}", report.total_orders);
    println!(
        "Average order value: {}",
        config.format_amount(report.average_order_value())
    );
    println!("Peak hour:           {}:00", report.peak_hour());

    let intensity = report.hour_intensity();
    if intensity.iter().any(|(_, share)| *share > 0.0) {
        println!("\nOrders by hour:");
        for (hour, share) in intensity {
            if share == 0.0 {
                continue;
            }
            let filled = ((share * BAR_WIDTH as f64).round() as usize).max(1);
            println!("  {:02}:00 {}", hour, "█".repeat(filled));
        }
    }

    if !report.revenue_by_day.is_empty() {
        println!("\nRevenue by day:");
        for day in &report.revenue_by_day {
            println!("  {:<12} {:>12}", day.date, config.format_amount(day.revenue));
        }
    }

    if !report.top_performing_restaurants.is_empty() {
        println!("\nTop restaurants:");
        for (rank, top) in report.top_performing_restaurants.iter().enumerate() {
            println!(
                "  {}. {:<24} {:>6} orders {:>12}  avg {}",
                rank + 1,
                top.name,
                top.orders,
                config.format_amount(top.revenue),
                config.format_amount(top.average_order_value)
            );
        }
    }
}

/// Handle platform settings commands
pub async fn handle_settings(command: SettingsCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = SettingsHandler::new(&client);

    match command {
        SettingsCommand::List => {
            let groups = handler.list().await?;
            if groups.is_empty() {
                println!("No settings found.");
                return Ok(());
            }
            for (category, settings) in &groups {
                println!("{}", category.as_str());
                for setting in settings {
                    println!(
                        "  {:<32} {:<16} {}",
                        setting.key,
                        setting.value.to_string(),
                        setting.description
                    );
                }
                println!();
            }
        }
        SettingsCommand::Set { key, value } => {
            let groups = handler.list().await?;
            let mut setting = find_setting(&groups, &key)
                .cloned()
                .ok_or_else(|| RestoError::NotFound(format!("setting '{}'", key)))?;
            setting.set_from_input(&value)?;
            handler.update(&setting).await?;
            println!("✓ {} = {}", setting.key, setting.value);
        }
        SettingsCommand::Limits => {
            let limits = handler.plan_limits().await?;
            if limits.is_empty() {
                println!("No plan limits configured.");
                return Ok(());
            }
            println!("  {:<12} {:>10} {:>8} {:>12}", "PLAN", "ORDERS", "USERS", "MENU ITEMS");
            for (plan, limit) in &limits {
                println!(
                    "  {:<12} {:>10} {:>8} {:>12}",
                    plan.display_name(),
                    limit.orders,
                    limit.users,
                    limit.menu_items
                );
            }
        }
        SettingsCommand::SetLimit { plan, field, value } => {
            let limits = handler.plan_limits().await?;
            let mut limit = limits.get(&plan).copied().unwrap_or_default();
            limit.set_field(&field, &value)?;
            handler.update_plan_limits(plan, &limit).await?;
            println!(
                "✓ {} plan limits: {} orders, {} users, {} menu items",
                plan.display_name(),
                limit.orders,
                limit.users,
                limit.menu_items
            );
        }
    }
    Ok(())
}
