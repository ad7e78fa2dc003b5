//! Kitchen CLI command handlers

use std::sync::Arc;

use chrono::Utc;

use crate::api::client::{ApiClient, ApiTransport};
use crate::api::kitchen::{KitchenBoard, KitchenHandler};
use crate::api::polling::{spawn_poller, PollEvent, PollTarget};
use crate::cli::commands::KitchenCommand;
use crate::core::config::Config;
use crate::core::kitchen_board::{cards, Urgency};
use crate::error::{RestoError, Result};

/// Handle kitchen commands
pub async fn handle_kitchen(command: KitchenCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    if let KitchenCommand::Watch = command {
        return watch(client).await;
    }
    let handler = KitchenHandler::new(&client);

    match command {
        KitchenCommand::Board | KitchenCommand::Watch => print_board(&handler.board().await?),
        update => {
            let (message, board) = apply_update(&handler, update).await?;
            println!("✓ {}", message);
            print_board(&board);
        }
    }
    Ok(())
}

/// Apply one board change, then re-fetch the board
async fn apply_update(
    handler: &KitchenHandler<'_>,
    command: KitchenCommand,
) -> Result<(String, KitchenBoard)> {
    let message = match command {
        KitchenCommand::Kot { id, status } => {
            handler.update_kot_status(&id, status).await?;
            format!("KOT {} is now {}", id, status)
        }
        KitchenCommand::Status { id, status } => {
            handler.update_order_status(&id, status).await?;
            format!("Order {} is now {}", id, status)
        }
        KitchenCommand::Priority { id, priority } => {
            handler.update_order_priority(&id, priority).await?;
            format!("Order {} priority set to {}", id, priority)
        }
        KitchenCommand::Board | KitchenCommand::Watch => "Board refreshed".to_string(),
    };
    Ok((message, handler.board().await?))
}

async fn watch(client: ApiClient) -> Result<()> {
    let config = Config::load()?;
    let transport: Arc<dyn ApiTransport> = Arc::new(client);
    let (_handle, mut rx) = spawn_poller(transport, PollTarget::Kitchen, config.poll_interval());

    println!(
        "Watching the kitchen board every {}s. Press Ctrl+C to stop.\n",
        config.poll_interval_secs
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped.");
                return Ok(());
            }
            event = rx.recv() => match event {
                Some(PollEvent::Kitchen(board)) => {
                    println!("── {} ──", Utc::now().format("%H:%M:%S"));
                    print_board(&board);
                    println!();
                }
                Some(PollEvent::Error(message)) => eprintln!("Refresh failed: {}", message),
                Some(PollEvent::Unauthorized) => return Err(RestoError::NotAuthenticated),
                Some(PollEvent::Health(_)) => {}
                None => return Ok(()),
            }
        }
    }
}

fn print_board(board: &KitchenBoard) {
    let cards = cards(board);
    if cards.is_empty() {
        println!("Kitchen is clear. No open tickets.");
        return;
    }

    let now = Utc::now();
    for card in &cards {
        let marker = match card.urgency {
            Urgency::Urgent => "!!",
            Urgency::Elevated => " !",
            Urgency::Normal => "  ",
        };
        let age = card
            .age_minutes(now)
            .map(|m| format!(" · {}m ago", m))
            .unwrap_or_default();
        println!("{} {} [{}]{}", marker, card.title, card.status, age);
        for item in &card.items {
            println!("     {}", item);
        }
        if let Some(action) = &card.action {
            println!("     → {}", action.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{Method, MockApiTransport};
    use crate::api::orders::OrderPriority;
    use mockall::Sequence;
    use serde_json::json;

    #[tokio::test]
    async fn test_priority_change_refetches_board() {
        let mut mock = MockApiTransport::new();
        let mut seq = Sequence::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PATCH
                    && path == "/api/kitchen/update/orders/priority/o1"
                    && body.as_ref() == Some(&json!({"priority": "high"}))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(json!({})));
        mock.expect_request()
            .withf(|method, path, _| {
                *method == Method::GET && path == "/api/kitchen/all/kitchen/orders"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| {
                Ok(json!({"kots": [], "orders": [
                    {"_id": "o1", "orderNumber": 5, "customerName": "A", "status": "PENDING", "priority": "high"}
                ]}))
            });

        let handler = KitchenHandler::new(&mock);
        let command = KitchenCommand::Priority {
            id: "o1".to_string(),
            priority: OrderPriority::High,
        };
        let (message, board) = apply_update(&handler, command).await.unwrap();

        assert!(message.starts_with("Order o1 priority set to"));
        assert_eq!(board.orders.len(), 1);
    }
}
