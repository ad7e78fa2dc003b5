//! Table CLI command handlers

use crate::api::client::ApiClient;
use crate::api::tables::{NewTable, Table, TableHandler};
use crate::cli::commands::TablesCommand;
use crate::core::table_merge::{
    apply_status, merge_summary, merged_group, merged_label, MergePlanner,
};
use crate::error::{RestoError, Result};

/// Handle table commands
pub async fn handle_tables(command: TablesCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = TableHandler::new(&client);

    match command {
        TablesCommand::List => {
            let tables = handler.list().await?;
            print_tables(&tables);
        }
        TablesCommand::Add {
            number,
            capacity,
            location,
        } => {
            let table = handler
                .create(&NewTable {
                    table_number: number,
                    capacity,
                    location,
                })
                .await?;
            println!(
                "✓ Table {} added ({} seats, {})",
                table.table_number, table.capacity, table.location
            );
        }
        TablesCommand::Status { id, status } => {
            let mut tables = handler.list().await?;
            if !tables.iter().any(|t| t.id == id) {
                return Err(RestoError::NotFound(format!("table '{}'", id)));
            }

            handler.update_status(&id, status).await?;
            let group = merged_group(&tables, &id);
            apply_status(&mut tables, &id, status);

            println!("✓ Table status set to {}", status);
            if group.len() > 1 {
                let numbers: Vec<String> = tables
                    .iter()
                    .filter(|t| group.contains(&t.id))
                    .map(|t| format!("T{}", t.table_number))
                    .collect();
                println!("  Merged group: {}", numbers.join(", "));
            }
        }
        TablesCommand::Merge { ids, guests } => {
            let tables = handler.list().await?;

            let mut planner = MergePlanner::new();
            planner.set_guest_count(guests, &tables);
            if !planner.merge_offered(&tables) {
                println!(
                    "A single free table seats {} guests; no merge needed.",
                    MergePlanner::max_available_capacity(&tables)
                );
                return Ok(());
            }
            for id in &ids {
                if !tables.iter().any(|t| t.id == *id) {
                    return Err(RestoError::NotFound(format!("table '{}'", id)));
                }
                planner.toggle(id);
            }
            if !planner.capacity_met(&tables) {
                println!(
                    "Warning: selected tables seat {} but the party is {}.",
                    planner.selected_capacity(&tables),
                    guests
                );
            }

            let (table_ids, guest_count) = planner.request()?;
            let merged_id = handler.merge(&table_ids, guest_count).await?;
            println!(
                "✓ {} (table {})",
                merge_summary(table_ids.len(), guest_count),
                merged_id
            );
        }
    }
    Ok(())
}

fn print_tables(tables: &[Table]) {
    if tables.is_empty() {
        println!("No tables found.");
        return;
    }

    println!("{} tables:\n", tables.len());
    for table in tables {
        let merged = merged_label(tables, table)
            .map(|label| format!("  ({})", label))
            .unwrap_or_default();
        println!(
            "  T{:<6} {:<12} {:>2} seats  {:<14} {}{}",
            table.table_number, table.status.as_str(), table.capacity, table.location, table.id, merged
        );
    }
    println!(
        "\nLargest free table seats {}.",
        MergePlanner::max_available_capacity(tables)
    );
}
