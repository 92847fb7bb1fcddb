use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::users::{PgUsersService, UsersService, records::Role},
};

#[derive(Debug, Args)]
pub(crate) struct PromoteUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email of the account to promote
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(args: PromoteUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(Db::new(pool))
        .set_role(args.email, Role::Admin)
        .await
        .map_err(|error| format!("failed to promote user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_role: {}", user.role);

    Ok(())
}
