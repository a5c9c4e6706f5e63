use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, warn};

use packdash_core::config::PackdashConfig;
use packdash_core::warehouse::{Connector, SnowflakeConnector};
use packdash_core::{
    ConnectionProvider, Dashboard, PayloadBuilder, QueryExecutor, Selector, WarehouseCredentials,
    events,
};

mod check;
mod show;
mod tv;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    events::log_app_startup(&config);

    match matches.subcommand() {
        Some(("check", sub_matches)) => check::handle_check_command(sub_matches, &config),
        Some(("show", sub_matches)) => show::handle_show_command(sub_matches, &config),
        Some(("tv", sub_matches)) => tv::handle_tv_command(sub_matches, config),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load config, falling back to defaults on error.
fn load_config_with_warning() -> PackdashConfig {
    match PackdashConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.packdash/config.toml and ./.packdash/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            PackdashConfig::default()
        }
    }
}

/// Parse the `--date` argument into a selector.
fn selector_arg(matches: &ArgMatches) -> Result<Selector, Box<dyn std::error::Error>> {
    let raw = matches
        .get_one::<String>("date")
        .map(String::as_str)
        .unwrap_or("today");

    raw.parse::<Selector>().map_err(|e| {
        eprintln!("{}", e);
        error!(event = "cli.selector_invalid", value = raw, error = %e);
        e.into()
    })
}

/// Read credentials from the environment, reporting a missing variable to
/// the user.
fn load_credentials() -> Result<WarehouseCredentials, Box<dyn std::error::Error>> {
    WarehouseCredentials::from_env().map_err(|e| {
        eprintln!("Cannot connect to the warehouse: {}", e);
        error!(event = "cli.credentials_missing", error = %e);
        events::log_app_error(&e);
        e.into()
    })
}

fn build_executor(
    config: &PackdashConfig,
) -> Result<QueryExecutor, Box<dyn std::error::Error>> {
    let credentials = load_credentials()?;
    let connector: Arc<dyn Connector> = Arc::new(SnowflakeConnector::new(
        credentials,
        config.warehouse.clone(),
    ));
    Ok(QueryExecutor::new(ConnectionProvider::new(connector)))
}

fn build_dashboard(config: &PackdashConfig) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let executor = build_executor(config)?;
    Ok(Dashboard::new(PayloadBuilder::new(executor, &config.views)))
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
