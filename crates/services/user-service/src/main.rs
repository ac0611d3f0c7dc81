//! User Service - administrative CLI for user accounts.

use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{AppError, AppResult};
use domain::{NewUser, UpdateUser, UserExport, UserRole};
use user_service_lib::{config::UserServiceConfig, service::UserService};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User account administration")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user and print its export
    Create(CreateArgs),
    /// Print one user's export
    Show(Target),
    /// Print every user's export
    List,
    /// Assign fields on an existing user and print its export
    Update(UpdateArgs),
    /// Replace a user's password
    SetPassword {
        #[arg(long)]
        id: i32,
        #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check a password against the stored hash
    CheckPassword {
        #[arg(long)]
        email: String,
        #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete a user
    Delete {
        #[arg(long)]
        id: i32,
    },
    /// Check database connectivity
    Ping,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    contact_number: Option<String>,
    #[arg(long)]
    position: Option<String>,
    /// user, employee or admin (default: user)
    #[arg(long, value_parser = parse_role)]
    role: Option<UserRole>,
    #[arg(long)]
    department_id: Option<i32>,
    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl From<CreateArgs> for NewUser {
    fn from(args: CreateArgs) -> Self {
        NewUser {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            contact_number: args.contact_number,
            position: args.position,
            role: args.role,
            department_id: args.department_id,
            password: args.password,
        }
    }
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    id: i32,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, conflicts_with = "clear_contact_number")]
    contact_number: Option<String>,
    #[arg(long)]
    clear_contact_number: bool,
    #[arg(long, conflicts_with = "clear_position")]
    position: Option<String>,
    #[arg(long)]
    clear_position: bool,
    /// user, employee or admin
    #[arg(long, value_parser = parse_role)]
    role: Option<UserRole>,
    #[arg(long, conflicts_with = "clear_department")]
    department_id: Option<i32>,
    #[arg(long)]
    clear_department: bool,
}

impl From<UpdateArgs> for UpdateUser {
    fn from(args: UpdateArgs) -> Self {
        UpdateUser {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            contact_number: clearable(args.contact_number, args.clear_contact_number),
            position: clearable(args.position, args.clear_position),
            role: args.role,
            department_id: clearable(args.department_id, args.clear_department),
        }
    }
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "email"])))]
struct Target {
    #[arg(long)]
    id: Option<i32>,
    #[arg(long)]
    email: Option<String>,
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    value.parse().map_err(|e: domain::DomainError| e.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("JSON encoding failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// `--clear-*` wins over a value; neither leaves the field untouched.
fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(code = e.code(), "Command failed: {}", e);
            eprintln!("error [{}]: {}", e.code(), e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> AppResult<ExitCode> {
    let config = UserServiceConfig::from_env();
    let (db, users) = user_service_lib::connect(&config).await?;

    match command {
        Commands::Create(args) => {
            let user = users.register(args.into()).await?;
            print_json(&user.to_export())?;
        }
        Commands::Show(target) => {
            let user = match (target.id, target.email) {
                (Some(id), _) => users.get_user(id).await?,
                (None, Some(email)) => users.get_user_by_email(&email).await?,
                (None, None) => return Err(AppError::validation("either --id or --email is required")),
            };
            print_json(&user.to_export())?;
        }
        Commands::List => {
            let exports: Vec<UserExport> = users
                .list_users()
                .await?
                .iter()
                .map(UserExport::from)
                .collect();
            print_json(&exports)?;
        }
        Commands::Update(args) => {
            let id = args.id;
            let user = users.update_user(id, args.into()).await?;
            print_json(&user.to_export())?;
        }
        Commands::SetPassword { id, password } => {
            users.reset_password(id, &password).await?;
        }
        Commands::CheckPassword { email, password } => {
            let matches = users.check_password(&email, &password).await?;
            println!("{}", matches);
            if !matches {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Delete { id } => {
            users.delete_user(id).await?;
        }
        Commands::Ping => {
            db.ping().await?;
            println!("ok");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("user-service").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_update_args_map_to_clearing_update() {
        let cli = parse(&["update", "--id", "4", "--position", "CTO", "--clear-contact-number"]);
        let Commands::Update(args) = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(args.id, 4);

        let changes = UpdateUser::from(args);
        assert_eq!(changes.position, Some(Some("CTO".to_string())));
        assert_eq!(changes.contact_number, Some(None));
        assert_eq!(changes.department_id, None);
        assert_eq!(changes.first_name, None);
    }

    #[test]
    fn test_update_rejects_value_with_clear() {
        let result = Cli::try_parse_from([
            "user-service",
            "update",
            "--id",
            "1",
            "--department-id",
            "3",
            "--clear-department",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_role_flag_is_strict() {
        let cli = parse(&["update", "--id", "1", "--role", "employee"]);
        let Commands::Update(args) = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(args.role, Some(UserRole::Employee));

        assert!(Cli::try_parse_from(["user-service", "update", "--id", "1", "--role", "root"]).is_err());
    }
}
