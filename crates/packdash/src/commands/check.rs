use clap::ArgMatches;
use tracing::{error, info};

use packdash_core::config::PackdashConfig;
use packdash_core::QueryOutcome;

use super::{build_executor, runtime};

const IDENTITY_STATEMENT: &str =
    "SELECT CURRENT_USER() AS USER_NAME, CURRENT_WAREHOUSE() AS WAREHOUSE_NAME, CURRENT_DATABASE() AS DATABASE_NAME";

pub(crate) fn handle_check_command(
    _matches: &ArgMatches,
    config: &PackdashConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.check_started");

    let executor = build_executor(config)?;
    let outcome = runtime()?.block_on(executor.run(IDENTITY_STATEMENT));

    match outcome {
        QueryOutcome::Rows(table) => {
            let Some(row) = table.first() else {
                return Err("Warehouse returned no identity row".into());
            };
            println!("Connected to the warehouse.");
            println!("  User:      {}", row.text("USER_NAME").unwrap_or("-"));
            println!("  Warehouse: {}", row.text("WAREHOUSE_NAME").unwrap_or("-"));
            println!("  Database:  {}", row.text("DATABASE_NAME").unwrap_or("-"));
            info!(event = "cli.check_completed");
            Ok(())
        }
        QueryOutcome::Empty => {
            eprintln!("Connected, but the warehouse returned no identity row.");
            error!(event = "cli.check_failed", reason = "empty");
            Err("Warehouse returned no identity row".into())
        }
        QueryOutcome::Failed(reason) => {
            eprintln!("Warehouse check failed: {}", reason);
            error!(event = "cli.check_failed", reason = %reason);
            Err(reason.into())
        }
    }
}
