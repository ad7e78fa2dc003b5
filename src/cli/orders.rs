//! Order and menu CLI command handlers

use crate::api::client::ApiClient;
use crate::api::menus::{MenuHandler, MenuItem};
use crate::api::orders::{
    filter_by_status, kitchen_queue, Order, OrderHandler, OrderStatus, OrderSummary,
};
use crate::cli::commands::{MenuCommand, OrdersCommand};
use crate::core::config::Config;
use crate::core::order_draft::OrderDraft;
use crate::error::{RestoError, Result};

/// Handle order commands
pub async fn handle_orders(command: OrdersCommand) -> Result<()> {
    match command {
        OrdersCommand::List { status } => handle_list(status).await,
        OrdersCommand::Summary => handle_summary().await,
        OrdersCommand::Create {
            customer,
            phone,
            items,
        } => handle_create(customer, phone, items).await,
        OrdersCommand::Status { id, status } => {
            let client = ApiClient::from_session()?;
            OrderHandler::new(&client).update_status(&id, status).await?;
            println!("✓ Order {} is now {}", id, status);
            Ok(())
        }
        OrdersCommand::Pay { id, method } => {
            let client = ApiClient::from_session()?;
            let handler = OrderHandler::new(&client);
            let order = find_order(&handler.list().await?, &id)?;
            handler.process_payment(&order, method).await?;

            let config = Config::load()?;
            println!(
                "✓ Payment of {} recorded for {} ({})",
                config.format_amount(order.total_amount),
                order.label(),
                method
            );
            Ok(())
        }
        OrdersCommand::Place {
            restaurant,
            customer,
            phone,
            items,
        } => handle_place(restaurant, customer, phone, items).await,
    }
}

/// Handle menu commands
pub async fn handle_menu(command: MenuCommand) -> Result<()> {
    match command {
        MenuCommand::List { all, restaurant } => {
            let config = Config::load()?;
            let client = match restaurant {
                Some(slug) => ApiClient::anonymous()?.with_restaurant_slug(slug),
                None => ApiClient::from_session()?,
            };
            let handler = MenuHandler::new(&client);
            let items = if all {
                handler.list().await?
            } else {
                handler.list_available().await?
            };

            if items.is_empty() {
                println!("No menu items found.");
                return Ok(());
            }

            println!("{} menu items:\n", items.len());
            for item in &items {
                let unavailable = if item.is_available { "" } else { " (unavailable)" };
                println!(
                    "  {:<24} {:<30} {:<14} {:>10}{}",
                    item.id,
                    item.name,
                    item.category,
                    config.format_amount(item.price),
                    unavailable
                );
            }
            Ok(())
        }
    }
}

async fn handle_list(status: Option<OrderStatus>) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let orders = OrderHandler::new(&client).list().await?;

    let shown: Vec<&Order> = match status {
        Some(status) => filter_by_status(&orders, status),
        None => orders.iter().collect(),
    };

    if shown.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!("{} orders:\n", shown.len());
    for order in shown {
        println!(
            "  {:<10} {:<10} {:<20} {:>10}  {}",
            order.label(),
            order.status.as_str(),
            order.customer_name,
            config.format_amount(order.total_amount),
            order.id
        );
        for item in &order.items {
            println!("      {}", item.kitchen_label());
        }
    }
    Ok(())
}

async fn handle_summary() -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let orders = OrderHandler::new(&client).list().await?;
    let summary = OrderSummary::from_orders(&orders);

    println!("Orders:    {}", summary.total);
    println!("Pending:   {}", summary.pending);
    println!("Kitchen:   {}", kitchen_queue(&orders).len());
    println!("Ready:     {}", summary.ready);
    println!("Completed: {}", summary.completed);
    println!("Revenue:   {}", config.format_amount(summary.revenue));
    Ok(())
}

async fn handle_create(customer: String, phone: Option<String>, items: Vec<String>) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_session()?;
    let menu = MenuHandler::new(&client).list_available().await?;

    let mut draft = build_draft(&menu, &items)?;
    draft.customer_name = customer;
    draft.customer_phone = phone.unwrap_or_default();

    let order = OrderHandler::new(&client)
        .create(&draft.to_new_order()?)
        .await?;

    println!(
        "✓ Order {} created for {} ({} items, {})",
        order.label(),
        draft.customer_name,
        draft.item_count(),
        config.format_amount(draft.total())
    );
    Ok(())
}

async fn handle_place(
    restaurant: Option<String>,
    customer: String,
    phone: Option<String>,
    items: Vec<String>,
) -> Result<()> {
    let config = Config::load()?;
    let slug = restaurant
        .or_else(|| config.restaurant_slug.clone())
        .ok_or_else(|| {
            RestoError::InvalidInput(
                "No restaurant given. Pass --restaurant or run 'resto config set restaurant-slug <slug>'"
                    .to_string(),
            )
        })?;

    let client = ApiClient::anonymous()?.with_restaurant_slug(slug.clone());
    let menu = MenuHandler::new(&client).list_available().await?;

    let mut draft = build_draft(&menu, &items)?;
    draft.customer_name = customer;
    draft.customer_phone = phone.unwrap_or_default();

    let order = OrderHandler::new(&client)
        .place_public(&slug, &draft.to_public_order()?)
        .await?;

    println!("✓ Order {} placed at {}", order.label(), slug);
    println!("  Estimated total: {}", config.format_amount(draft.total()));
    Ok(())
}

fn find_order(orders: &[Order], id: &str) -> Result<Order> {
    orders
        .iter()
        .find(|o| o.id == id || o.order_number == id.trim_start_matches('#'))
        .cloned()
        .ok_or_else(|| RestoError::NotFound(format!("order '{}'", id)))
}

/// Split `<id or name>[:quantity]`
fn parse_item_spec(spec: &str) -> Result<(&str, u32)> {
    match spec.rsplit_once(':') {
        Some((name, qty)) => {
            let quantity: u32 = qty.trim().parse().map_err(|_| {
                RestoError::InvalidInput(format!("Invalid quantity in '{}'", spec))
            })?;
            if quantity == 0 {
                return Err(RestoError::InvalidInput(format!(
                    "Quantity must be at least 1 in '{}'",
                    spec
                )));
            }
            Ok((name.trim(), quantity))
        }
        None => Ok((spec.trim(), 1)),
    }
}

/// Resolve item specs against the menu into a cart
fn build_draft(menu: &[MenuItem], specs: &[String]) -> Result<OrderDraft> {
    let mut draft = OrderDraft::new();
    for spec in specs {
        let (key, quantity) = parse_item_spec(spec)?;
        let item = menu
            .iter()
            .find(|m| m.id == key)
            .or_else(|| menu.iter().find(|m| m.name.eq_ignore_ascii_case(key)))
            .ok_or_else(|| {
                RestoError::NotFound(format!("menu item '{}' (or it is unavailable)", key))
            })?;

        let current = draft
            .lines()
            .iter()
            .find(|l| l.menu_id == item.id)
            .map(|l| l.quantity)
            .unwrap_or(0);
        draft.add(item);
        draft.set_quantity(&item.id, current + quantity);
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem {
                id: "m1".to_string(),
                name: "Masala Dosa".to_string(),
                description: String::new(),
                price: 90.0,
                category: "South Indian".to_string(),
                is_available: true,
            },
            MenuItem {
                id: "m2".to_string(),
                name: "Filter Coffee".to_string(),
                description: String::new(),
                price: 30.0,
                category: "Beverages".to_string(),
                is_available: true,
            },
        ]
    }

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(parse_item_spec("m1").unwrap(), ("m1", 1));
        assert_eq!(parse_item_spec("Masala Dosa:3").unwrap(), ("Masala Dosa", 3));
        assert!(parse_item_spec("m1:0").is_err());
        assert!(parse_item_spec("m1:two").is_err());
    }

    #[test]
    fn test_build_draft_by_id_and_name() {
        let specs = vec![
            "m1:2".to_string(),
            "filter coffee".to_string(),
            "m1".to_string(),
        ];
        let draft = build_draft(&menu(), &specs).unwrap();

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.lines()[0].quantity, 3);
        assert_eq!(draft.total(), 300.0);
    }

    #[test]
    fn test_build_draft_unknown_item() {
        let specs = vec!["Pizza".to_string()];
        assert!(matches!(
            build_draft(&menu(), &specs),
            Err(RestoError::NotFound(_))
        ));
    }
}
