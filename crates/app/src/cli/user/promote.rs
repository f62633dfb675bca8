use clap::Args;
use tiffin_app::{
    auth::PasswordHasher,
    domain::users::{PgUsersService, UsersService, records::Role},
};

#[derive(Debug, Args)]
pub(crate) struct PromoteArgs {
    /// Email of the account to change
    #[arg(long)]
    email: String,

    /// Role to assign: `admin` or `customer`
    #[arg(long, default_value = "admin")]
    role: Role,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: PromoteArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let user = PgUsersService::new(db, PasswordHasher::default())
        .set_role(&args.email, args.role)
        .await
        .map_err(|error| format!("failed to update role: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
