//! Attendance CLI command handlers

use crate::api::attendance::{filter_records, AttendanceFilter, AttendanceHandler};
use crate::api::client::ApiClient;
use crate::cli::commands::AttendanceCommand;
use crate::core::session::Session;
use crate::error::{RestoError, Result};

/// Handle attendance commands
pub async fn handle_attendance(command: AttendanceCommand) -> Result<()> {
    let client = ApiClient::from_session()?;
    let handler = AttendanceHandler::new(&client);
    let session = Session::load()?.ok_or(RestoError::NotAuthenticated)?;

    match command {
        AttendanceCommand::List { filter, today } => {
            let admin = session.role().is_admin();

            let records = match (admin, today) {
                (true, true) => handler.today().await?,
                (true, false) => handler.all().await?,
                (false, _) => handler.mine().await?,
            };
            let shown = filter_records(&records, filter);

            if shown.is_empty() {
                println!("No attendance records.");
                return Ok(());
            }

            let scope = if admin { "Staff" } else { "Your" };
            let label = match filter {
                AttendanceFilter::All => String::new(),
                other => format!(" ({})", other.as_str()),
            };
            println!("{} attendance{}:\n", scope, label);
            for record in shown {
                println!(
                    "  {:<20} {:<12} {:<8} in {:<8} out {:<8} {:>6}",
                    record.staff_name(),
                    record.date_display(),
                    record.status.as_str(),
                    record.check_in_display(),
                    record.check_out_display(),
                    record.hours_display()
                );
            }
        }
        AttendanceCommand::CheckIn => {
            session.require_attendance_admin("check in")?;
            handler.check_in().await?;
            println!("✓ Checked in. Have a good shift!");
        }
        AttendanceCommand::CheckOut => {
            session.require_attendance_admin("check out")?;
            handler.check_out().await?;
            println!("✓ Checked out.");
        }
    }
    Ok(())
}
