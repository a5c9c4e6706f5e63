use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("packdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Packing-shift KPI dashboard backed by the Snowflake warehouse")
        .long_about("packdash reads shift totals, ten-minute KPI buckets and active packing runs from the warehouse, rates every measure against its target and renders cards, charts and a run table. The 'tv' mode keeps the current shift refreshed in the background for a wall display.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Connect to the warehouse and print the session identity")
        )
        .subcommand(
            Command::new("show")
                .about("Build the dashboard once and print it")
                .arg(date_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the payload in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("tv")
                .about("Run the wall display: refresh the current shift in the background and redraw on a timer")
                .arg(date_arg())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .help("Seconds between background refreshes (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("tick")
                        .long("tick")
                        .help("Seconds between redraws (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
        )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .short('d')
        .help("Shift date as YYYY-MM-DD, or 'today' for the active shift")
        .default_value("today")
}
