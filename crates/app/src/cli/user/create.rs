use clap::Args;
use storefront_app::{
    auth::{AuthService, AuthSettings, Credentials, NewAccount, PgAuthService},
    database::{self, Db},
    domain::users::records::Role,
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Initial password (at least 8 characters)
    #[arg(long, env = "STOREFRONT_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Create the account with the admin role
    #[arg(long)]
    admin: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(Db::new(pool), AuthSettings::default());

    let role = if args.admin { Role::Admin } else { Role::User };

    let user = service
        .register(NewAccount {
            credentials: Credentials {
                email: args.email,
                password: args.password,
            },
            role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    Ok(())
}
