use clap::{Args, Subcommand};

mod create;
mod list;

#[derive(Debug, Args)]
pub(crate) struct FoodCommand {
    #[command(subcommand)]
    command: FoodSubcommand,
}

#[derive(Debug, Subcommand)]
enum FoodSubcommand {
    Create(create::CreateFoodArgs),
    List(list::ListFoodsArgs),
}

pub(crate) async fn run(command: FoodCommand) -> Result<(), String> {
    match command.command {
        FoodSubcommand::Create(args) => create::run(args).await,
        FoodSubcommand::List(args) => list::run(args).await,
    }
}
