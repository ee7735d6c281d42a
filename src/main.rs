use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rbac_console::client::HttpBackend;
use rbac_console::config::ConsoleConfig;
use rbac_console::commands::{self, CommandError};
use rbac_console::models::*;
use rbac_console::notifier::ConsoleNotifier;
use rbac_console::store::EntityStore;
use rbac_console::{api, db};

#[derive(Parser)]
#[command(name = "rbacctl")]
#[command(about = "Manage users and roles held by an RBAC console backend")]
struct Cli {
    /// Backend base URL (overrides RBAC_CONSOLE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the in-memory development backend
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage roles
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,
    /// Add a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
    },
    /// Edit a user's fields
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a user
    Delete { id: String },
}

#[derive(Subcommand)]
enum RoleAction {
    /// List all roles
    List,
    /// Add a role
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        permissions: String,
    },
    /// Edit a role's fields
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        permissions: Option<String>,
    },
    /// Delete a role
    Delete { id: String },
}

/// Initialize tracing. Client commands log to stderr so listings stay clean.
fn init_tracing(use_stderr: bool) {
    let default_filter = if use_stderr {
        "rbac_console=error"
    } else {
        "rbac_console=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Client commands print listings on stdout; keep logs off it
    let use_stderr = !matches!(cli.command, Commands::Serve { .. });
    init_tracing(use_stderr);

    let mut config = ConsoleConfig::from_env();
    if let Some(url) = cli.url {
        config = config.with_base_url(url);
    }

    match cli.command {
        Commands::Serve { port } => {
            let app = api::create_router(db::Database::new());

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Development backend listening on http://127.0.0.1:{}", port);

            axum::serve(listener, app).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Users { action } => {
            let store = connect(&config)?;
            let ok = match action {
                UserAction::List => match commands::list::<User, _>(&store).await {
                    Some(users) => {
                        print_users(&users);
                        true
                    }
                    None => false,
                },
                UserAction::Add { name, role } => {
                    let fields = vec![(UserField::Name, name), (UserField::Role, role)];
                    report(commands::add::<User, _>(&store, fields).await)?
                }
                UserAction::Edit { id, name, role } => {
                    let mut fields = Vec::new();
                    fields.extend(name.map(|v| (UserField::Name, v)));
                    fields.extend(role.map(|v| (UserField::Role, v)));
                    report(commands::edit::<User, _>(&store, &EntityId::from(id), fields).await)?
                }
                UserAction::Delete { id } => {
                    commands::delete::<User, _>(&store, &EntityId::from(id)).await
                }
            };
            Ok(exit_code(ok))
        }
        Commands::Roles { action } => {
            let store = connect(&config)?;
            let ok = match action {
                RoleAction::List => match commands::list::<Role, _>(&store).await {
                    Some(roles) => {
                        print_roles(&roles);
                        true
                    }
                    None => false,
                },
                RoleAction::Add { name, permissions } => {
                    let fields = vec![(RoleField::Name, name), (RoleField::Permissions, permissions)];
                    report(commands::add::<Role, _>(&store, fields).await)?
                }
                RoleAction::Edit {
                    id,
                    name,
                    permissions,
                } => {
                    let mut fields = Vec::new();
                    fields.extend(name.map(|v| (RoleField::Name, v)));
                    fields.extend(permissions.map(|v| (RoleField::Permissions, v)));
                    report(commands::edit::<Role, _>(&store, &EntityId::from(id), fields).await)?
                }
                RoleAction::Delete { id } => {
                    commands::delete::<Role, _>(&store, &EntityId::from(id)).await
                }
            };
            Ok(exit_code(ok))
        }
    }
}

fn connect(config: &ConsoleConfig) -> anyhow::Result<EntityStore<HttpBackend>> {
    let backend = HttpBackend::new(config)?;
    Ok(EntityStore::new(backend, Arc::new(ConsoleNotifier)))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// A missing target is the user's mistake, not a crash.
fn report(result: Result<bool, CommandError>) -> anyhow::Result<bool> {
    match result {
        Ok(ok) => Ok(ok),
        Err(e @ CommandError::NotFound { .. }) => {
            eprintln!("{}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_users(users: &[User]) {
    println!("{:<8} {:<24} ROLE", "ID", "NAME");
    for user in users {
        println!("{:<8} {:<24} {}", user.id.to_string(), user.name, user.role);
    }
}

fn print_roles(roles: &[Role]) {
    println!("{:<8} {:<24} PERMISSIONS", "ID", "ROLE");
    for role in roles {
        println!("{:<8} {:<24} {}", role.id.to_string(), role.name, role.permissions);
    }
}
