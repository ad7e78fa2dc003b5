//! Restaurant and billing CLI command handlers

use crate::api::billing::{BillingHandler, Plan};
use crate::api::client::ApiClient;
use crate::api::restaurants::{
    analytics_by_restaurant, search, NewRestaurant, PlatformTotals, RestaurantHandler,
};
use crate::cli::commands::{BillingCommand, RestaurantsCommand};
use crate::cli::prompt::{confirm_or_cancel, prompt_secret};
use crate::core::config::Config;
use crate::error::Result;

/// Handle restaurant commands
pub async fn handle_restaurants(command: RestaurantsCommand) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let handler = RestaurantHandler::new(&client);

    match command {
        RestaurantsCommand::List { search: query } => {
            let (restaurants, analytics) = tokio::try_join!(handler.list(), handler.analytics())?;
            let totals = PlatformTotals::compute(&restaurants, &analytics);
            let by_id = analytics_by_restaurant(&analytics);
            let shown = search(&restaurants, query.as_deref().unwrap_or(""));

            println!(
                "Restaurants: {} ({} active) · Orders: {} · Revenue: {}\n",
                totals.restaurants,
                totals.active,
                totals.orders,
                config.format_amount(totals.revenue)
            );

            if shown.is_empty() {
                println!("No restaurants match.");
                return Ok(());
            }

            for restaurant in shown {
                let stats = by_id.get(restaurant.id.as_str());
                println!(
                    "  {:<24} {:<24} {:<20} {:<10} {:<10} {:>6} orders {:>12}",
                    restaurant.id,
                    restaurant.name,
                    restaurant.slug,
                    if restaurant.is_active { "active" } else { "suspended" },
                    restaurant
                        .subscription_plan
                        .map(|p| p.display_name())
                        .unwrap_or("-"),
                    stats.map(|s| s.total_orders).unwrap_or(0),
                    config.format_amount(stats.map(|s| s.total_revenue).unwrap_or(0.0))
                );
            }
        }
        RestaurantsCommand::Add {
            name,
            admin_name,
            admin_email,
            phone,
            address,
            city,
            state,
            zip_code,
            cuisine,
            description,
        } => {
            let restaurant = NewRestaurant {
                name,
                admin_email,
                admin_password: prompt_secret("Admin password: ")?,
                admin_name,
                phone,
                address,
                city,
                state,
                zip_code,
                cuisine,
                description,
            };

            let created = handler.create(&restaurant).await?;
            println!("✓ Restaurant {} created (slug: {})", created.name, created.slug);
            println!("  Admin login: {}", restaurant.admin_email);
        }
        RestaurantsCommand::Rename { id, name } => {
            handler.rename(&id, &name).await?;
            println!("✓ Restaurant renamed to {}", name.trim());
        }
        RestaurantsCommand::Toggle { ids } => {
            let results = handler.bulk_toggle(&ids).await;
            let mut failed = 0;
            for (id, result) in &results {
                match result {
                    Ok(()) => println!("✓ Toggled {}", id),
                    Err(e) => {
                        failed += 1;
                        eprintln!("✗ {}: {}", id, e);
                    }
                }
            }
            if failed > 0 {
                println!("\n{} of {} restaurants could not be toggled.", failed, results.len());
            }
        }
        RestaurantsCommand::Delete { id, yes } => {
            confirm_or_cancel(
                &format!("Delete restaurant '{}' and all of its data?", id),
                yes,
            )?;
            handler.delete(&id).await?;
            println!("✓ Deleted restaurant {}", id);
        }
    }
    Ok(())
}

/// Handle billing commands
pub async fn handle_billing(command: BillingCommand) -> Result<()> {
    match command {
        BillingCommand::Plans => {
            println!("Subscription plans:\n");
            for plan in Plan::ALL {
                println!("  {:<12} ${}/month", plan.display_name(), plan.monthly_price());
            }
        }
        BillingCommand::SetPlan { restaurant, plan } => {
            let client = ApiClient::from_session()?;
            BillingHandler::new(&client)
                .change_plan(&restaurant, plan)
                .await?;
            println!("✓ Restaurant {} moved to the {} plan", restaurant, plan.display_name());
        }
    }
    Ok(())
}
