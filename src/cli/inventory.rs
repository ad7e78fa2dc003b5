//! Inventory and add-on CLI command handlers

use crate::api::addons::{AddonHandler, NewAddon};
use crate::api::client::ApiClient;
use crate::api::inventory::{low_stock, InventoryHandler, InventoryInput, InventoryItem};
use crate::cli::commands::{AddonsCommand, InventoryCommand};
use crate::cli::prompt::confirm_or_cancel;
use crate::core::config::Config;
use crate::error::{RestoError, Result};

/// Handle inventory commands
pub async fn handle_inventory(command: InventoryCommand) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let handler = InventoryHandler::new(&client);

    match command {
        InventoryCommand::List { low } => {
            let items = handler.list().await?;
            let shown: Vec<&InventoryItem> = if low {
                low_stock(&items)
            } else {
                items.iter().collect()
            };

            if shown.is_empty() {
                println!("{}", if low { "Nothing is low on stock." } else { "No inventory items." });
                return Ok(());
            }

            let total: f64 = shown.iter().map(|i| i.stock_value()).sum();
            println!("{} items:\n", shown.len());
            for item in shown {
                let flag = if item.is_low() { " ⚠ low" } else { "" };
                println!(
                    "  {:<24} {:<24} {:>8.2} {:<5} (min {:.2})  {:>10}{}",
                    item.id,
                    item.name,
                    item.current_stock,
                    item.unit,
                    item.min_stock,
                    config.format_amount(item.stock_value()),
                    flag
                );
            }
            println!("\nStock value: {}", config.format_amount(total));
        }
        InventoryCommand::Add {
            name,
            category,
            stock,
            min,
            unit,
            cost,
            supplier,
        } => {
            let item = handler
                .create(&InventoryInput {
                    name,
                    category,
                    current_stock: stock,
                    min_stock: min,
                    unit,
                    cost_per_unit: cost,
                    supplier,
                })
                .await?;
            println!("✓ Added {} ({})", item.name, item.id);
        }
        InventoryCommand::Update {
            id,
            name,
            category,
            min,
            unit,
            cost,
            supplier,
        } => {
            let items = handler.list().await?;
            let item = items
                .iter()
                .find(|i| i.id == id)
                .ok_or_else(|| RestoError::NotFound(format!("inventory item '{}'", id)))?;

            let input = InventoryInput {
                name: name.unwrap_or_else(|| item.name.clone()),
                category: category.unwrap_or_else(|| item.category.clone()),
                current_stock: item.current_stock,
                min_stock: min.unwrap_or(item.min_stock),
                unit: unit.unwrap_or_else(|| item.unit.clone()),
                cost_per_unit: cost.unwrap_or(item.cost_per_unit),
                supplier: supplier.or_else(|| item.supplier.clone()),
            };
            let updated = handler.update(&id, &input).await?;
            println!("✓ Updated {} ({})", updated.name, updated.id);
        }
        InventoryCommand::Restock { id, quantity } => {
            handler.restock(&id, quantity).await?;
            println!("✓ Restocked {} by {}", id, quantity);
        }
        InventoryCommand::Delete { id, yes } => {
            confirm_or_cancel(&format!("Delete inventory item '{}'?", id), yes)?;
            handler.delete(&id).await?;
            println!("✓ Deleted inventory item {}", id);
        }
    }
    Ok(())
}

/// Handle add-on commands
pub async fn handle_addons(command: AddonsCommand) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let handler = AddonHandler::new(&client);

    match command {
        AddonsCommand::List => {
            let addons = handler.list().await?;
            if addons.is_empty() {
                println!("No add-ons found.");
                return Ok(());
            }
            for addon in &addons {
                println!(
                    "  {:<24} {:<24} {:>8} {:<8} {}",
                    addon.id,
                    addon.name,
                    config.format_amount(addon.price),
                    if addon.veg { "veg" } else { "non-veg" },
                    if addon.available { "available" } else { "unavailable" }
                );
            }
        }
        AddonsCommand::Add {
            name,
            price,
            description,
            non_veg,
        } => {
            let addon = handler
                .create(&NewAddon {
                    name,
                    price,
                    description,
                    veg: !non_veg,
                    available: true,
                })
                .await?;
            println!("✓ Added add-on {} ({})", addon.name, addon.id);
        }
        AddonsCommand::Toggle { id } => {
            let addons = handler.list().await?;
            let addon = addons
                .iter()
                .find(|a| a.id == id)
                .ok_or_else(|| RestoError::NotFound(format!("add-on '{}'", id)))?;
            let available = handler.toggle(addon).await?;
            println!(
                "✓ {} is now {}",
                addon.name,
                if available { "available" } else { "unavailable" }
            );
        }
        AddonsCommand::Delete { id, yes } => {
            confirm_or_cancel(&format!("Delete add-on '{}'?", id), yes)?;
            handler.delete(&id).await?;
            println!("✓ Deleted add-on {}", id);
        }
    }
    Ok(())
}
