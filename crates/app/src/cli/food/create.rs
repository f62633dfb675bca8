use clap::Args;
use tiffin_app::domain::foods::{
    FoodsService, PgFoodsService,
    data::NewFood,
    records::FoodUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateFoodArgs {
    /// Menu item name
    #[arg(long)]
    name: String,

    /// Unit price in minor units
    #[arg(long)]
    price: u64,

    /// Menu section, e.g. "Mains"
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Image URL or asset path
    #[arg(long)]
    image: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional food UUID; generated when omitted
    #[arg(long)]
    food_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateFoodArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let food = PgFoodsService::new(db)
        .create_food(NewFood {
            uuid: args
                .food_uuid
                .map_or_else(FoodUuid::new, FoodUuid::from_uuid),
            name: args.name,
            description: args.description,
            category: args.category,
            price: args.price,
            image_ref: args.image,
        })
        .await
        .map_err(|error| format!("failed to create food: {error}"))?;

    println!("food_uuid: {}", food.uuid);
    println!("name: {}", food.name);
    println!("price: {}", food.price);

    Ok(())
}
