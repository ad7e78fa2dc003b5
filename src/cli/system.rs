//! System health and messaging CLI command handlers

use std::sync::Arc;

use chrono::Utc;

use crate::api::client::{ApiClient, ApiTransport};
use crate::api::communication::{CommunicationHandler, NewMessage};
use crate::api::polling::{spawn_poller, PollEvent, PollTarget};
use crate::api::system::{format_bytes, format_uptime, SystemHandler, SystemHealth};
use crate::cli::commands::{MessagesCommand, SystemCommand};
use crate::core::config::Config;
use crate::error::Result;

/// Handle system health commands
pub async fn handle_system(command: SystemCommand) -> Result<()> {
    let client = ApiClient::from_session()?;

    match command {
        SystemCommand::Health => {
            let health = SystemHandler::new(&client).health().await?;
            print_health(&health);
        }
        SystemCommand::History { hours } => {
            let samples = SystemHandler::new(&client).history(hours).await?;
            if samples.is_empty() {
                println!("No health samples in the last {}h.", hours);
                return Ok(());
            }
            println!("  {:<26} {:>7} {:>12} {:>8} {:>8}", "TIME", "CPU", "HEAP", "DB", "ERRORS");
            for sample in &samples {
                let h = &sample.health;
                println!(
                    "  {:<26} {:>6.1}% {:>12} {:>8} {:>7.2}%",
                    sample.timestamp.as_deref().unwrap_or("-"),
                    h.server_status.cpu_usage,
                    format_bytes(h.server_status.memory_usage.heap_used),
                    if h.database_status.connected { "up" } else { "down" },
                    h.api_metrics.error_rate
                );
            }
        }
        SystemCommand::Watch => watch(client).await?,
    }
    Ok(())
}

async fn watch(client: ApiClient) -> Result<()> {
    let config = Config::load()?;
    let transport: Arc<dyn ApiTransport> = Arc::new(client);
    let (_handle, mut rx) =
        spawn_poller(transport, PollTarget::SystemHealth, config.poll_interval());

    println!(
        "Watching system health every {}s. Press Ctrl+C to stop.\n",
        config.poll_interval_secs
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped.");
                return Ok(());
            }
            event = rx.recv() => match event {
                Some(PollEvent::Health(health)) => {
                    println!("── {} ──", Utc::now().format("%H:%M:%S"));
                    print_health(&health);
                    println!();
                }
                Some(PollEvent::Error(message)) => eprintln!("Refresh failed: {}", message),
                Some(PollEvent::Kitchen(_)) => {}
                None => return Ok(()),
            }
        }
    }
}

fn print_health(health: &SystemHealth) {
    let server = &health.server_status;
    let db = &health.database_status;
    let api = &health.api_metrics;

    println!("Server");
    println!("  Uptime:      {}", format_uptime(server.uptime));
    println!("  CPU:         {:.1}%", server.cpu_usage);
    println!(
        "  Memory:      {} RSS, {} / {} heap",
        format_bytes(server.memory_usage.rss),
        format_bytes(server.memory_usage.heap_used),
        format_bytes(server.memory_usage.heap_total)
    );
    println!("Database");
    println!(
        "  Status:      {}",
        if db.connected { "✓ connected" } else { "✗ disconnected" }
    );
    println!("  Response:    {:.0}ms", db.response_time);
    println!("  Connections: {}", db.active_connections);
    println!("API");
    println!("  Requests:    {}", api.total_requests);
    println!("  Avg time:    {:.0}ms", api.average_response_time);
    println!("  Error rate:  {:.2}%", api.error_rate);
}

/// Handle platform messaging commands
pub async fn handle_messages(command: MessagesCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = CommunicationHandler::new(&client);

    match command {
        MessagesCommand::List => {
            let messages = handler.list().await?;
            if messages.is_empty() {
                println!("No messages sent yet.");
                return Ok(());
            }
            for message in &messages {
                let sent = message
                    .sent_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "[{}] {} · {} → {} · {} · read by {}",
                    message.priority.as_str(),
                    message.title,
                    message.kind.as_str(),
                    message.recipients.as_str(),
                    sent,
                    message.read_count()
                );
                println!("    {}", message.message);
                if let Some(sender) = &message.sent_by {
                    println!("    from {}", sender.name);
                }
            }
        }
        MessagesCommand::Send {
            title,
            message,
            kind,
            priority,
            to,
            restaurants,
        } => {
            let sent = handler
                .send(&NewMessage {
                    title,
                    message,
                    kind,
                    priority,
                    recipients: to,
                    specific_restaurants: restaurants,
                })
                .await?;
            println!(
                "✓ Sent \"{}\" to {} restaurants",
                sent.title,
                sent.recipients.as_str()
            );
        }
    }
    Ok(())
}
