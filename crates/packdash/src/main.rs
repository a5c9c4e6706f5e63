use packdash_core::config::load_dotenv;
use packdash_core::init_logging;

mod app;
mod commands;
mod render;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Logging is quiet unless -v is given
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    load_dotenv();

    commands::run_command(&matches)?;

    Ok(())
}
