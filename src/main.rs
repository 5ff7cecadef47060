use boring_tasks::{Config, Database, Profile, cli::{self, Cli, Commands}, logging};
use clap::Parser;
use color_eyre::Result;
use mockable::DefaultClock;
use std::path::Path;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config, database and log apart from real data
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(Path::new(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    logging::init(&config.get_log_path(), &config.log_level)?;
    tracing::info!(?profile, database = %config.database_path, "starting");

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path.to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?
    )?;

    let clock = DefaultClock;

    match cli.command {
        None | Some(Commands::Tui) => {
            let app = boring_tasks::tui::App::new(config, db, clock)?;
            boring_tasks::tui::run_event_loop(app)?;
        }
        Some(Commands::Lists { json }) => cli::handle_lists(json, &db, &clock)?,
        Some(Commands::AddList { title }) => cli::handle_add_list(title, &db, &clock)?,
        Some(Commands::DeleteList { positions }) => cli::handle_delete_list(positions, &db, &clock)?,
        Some(Commands::Items { list, json }) => cli::handle_items(list, json, &db, &clock)?,
        Some(Commands::AddItem { list, title, period }) => {
            cli::handle_add_item(list, title, period, &db, &clock)?
        }
        Some(Commands::DeleteItem { list, positions }) => {
            cli::handle_delete_item(list, positions, &db, &clock)?
        }
        Some(Commands::Done { list, item }) => cli::handle_complete(list, item, false, &db, &clock)?,
        Some(Commands::Skip { list, item }) => cli::handle_complete(list, item, true, &db, &clock)?,
        Some(Commands::History { list, item }) => cli::handle_history(list, item, &db, &clock)?,
        Some(Commands::Score { list, item, score }) => {
            cli::handle_score(list, item, score, &db, &clock)?
        }
    }

    Ok(())
}
