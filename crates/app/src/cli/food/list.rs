use clap::Args;
use tiffin_app::domain::foods::{FoodsService, PgFoodsService};

#[derive(Debug, Args)]
pub(crate) struct ListFoodsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListFoodsArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let foods = PgFoodsService::new(db)
        .list_foods()
        .await
        .map_err(|error| format!("failed to list foods: {error}"))?;

    if foods.is_empty() {
        println!("no foods on the menu");
        return Ok(());
    }

    for food in foods {
        println!(
            "{}\t{}\t{}\t{}",
            food.uuid,
            food.category.as_deref().unwrap_or("-"),
            food.name,
            food.price
        );
    }

    Ok(())
}
