use clap::ArgMatches;
use tracing::info;

use packdash_core::config::PackdashConfig;

use super::{build_dashboard, runtime, selector_arg};
use crate::render;

pub(crate) fn handle_show_command(
    matches: &ArgMatches,
    config: &PackdashConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let selector = selector_arg(matches)?;
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.show_started",
        selector = %selector,
        json_output = json_output
    );

    let dashboard = build_dashboard(config)?;
    let payload = runtime()?.block_on(dashboard.payload(selector));

    if json_output {
        println!("{}", serde_json::to_string_pretty(&*payload)?);
    } else {
        render::print_payload(&payload, render::use_color());
    }

    info!(
        event = "cli.show_completed",
        selector = %selector,
        ready = payload.is_ready()
    );

    if payload.is_unavailable() {
        return Err("Data source unavailable".into());
    }
    Ok(())
}
