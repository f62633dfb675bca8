use clap::{Parser, Subcommand};

mod db;
mod food;
mod user;

/// Connections used by one-shot admin commands.
const CLI_MAX_CONNECTIONS: u32 = 2;

#[derive(Debug, Parser)]
#[command(name = "tiffin-app", about = "Tiffin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Food(food::FoodCommand),
    User(user::UserCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Food(command) => food::run(command).await,
            Commands::User(command) => user::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<tiffin_app::database::Db, String> {
    let pool = tiffin_app::database::connect(database_url, CLI_MAX_CONNECTIONS)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(tiffin_app::database::Db::new(pool))
}
