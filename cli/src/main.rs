use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use trailhead::{
    FederatedSignIn, FileStorage, IdentityConfig, IdentityError, ProfileUpdate, RegistrationDetails, RoleSelection,
    SessionConfig, SessionError, SessionSnapshot, SessionStore, UserRecord, identity,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.user_message())]
    Session(#[from] SessionError),
    #[error("identity provider setup failed: {0}")]
    Identity(#[from] IdentityError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "trailhead", about = "Trailhead session console: sign in, inspect and edit the local session")]
struct Cli {
    /// Directory holding the durable session slot.
    #[arg(long, env = "TRAILHEAD_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Name of the durable slot.
    #[arg(long, env = "TRAILHEAD_SESSION_SLOT")]
    slot: Option<String>,

    /// Simulated sign-in latency in milliseconds.
    #[arg(long, env = "TRAILHEAD_AUTH_DELAY_MS")]
    delay_ms: Option<u64>,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the restored session.
    Whoami,
    /// Print which dashboard the current role gets.
    Dashboard,
    Login(LoginArgs),
    LoginFederated(FederatedArgs),
    Signup(SignupArgs),
    Logout,
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Not verified by the development provider.
    #[arg(long, default_value = "")]
    password: String,
    /// guest, vendor or hotel-owner
    #[arg(long, default_value = "guest")]
    role: RoleSelection,
}

#[derive(Args, Debug)]
struct FederatedArgs {
    #[arg(long, default_value = "google.com")]
    provider: String,
    #[arg(long)]
    id_token: String,
    #[arg(long)]
    email_hint: Option<String>,
    #[arg(long, default_value = "guest")]
    role: RoleSelection,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    password: String,
    #[arg(long, default_value = "guest")]
    role: RoleSelection,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    store_name: Option<String>,
    #[arg(long)]
    store_description: Option<String>,
    #[arg(long)]
    property_name: Option<String>,
    #[arg(long)]
    property_type: Option<String>,
    #[arg(long)]
    rooms: Option<u32>,
}

#[derive(Args, Debug, Default)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    avatar: Option<String>,
    /// Replaces the guest's favorites; repeat for several.
    #[arg(long = "favorite")]
    favorites: Vec<String>,
    #[arg(long)]
    store_name: Option<String>,
    #[arg(long)]
    store_description: Option<String>,
    #[arg(long)]
    property_name: Option<String>,
    #[arg(long)]
    property_type: Option<String>,
    #[arg(long)]
    rooms: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = session_config(&cli, SessionConfig::from_env());
    let provider = identity::from_config(&IdentityConfig::from_env()?)?;
    let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
    let store = SessionStore::new(storage, provider, config);

    store.restore().await;

    match cli.command {
        Command::Whoami => print_json(&snapshot_json(&store.snapshot())),
        Command::Dashboard => {
            let user = store.current_user().ok_or(CliError::NotSignedIn)?;
            print_json(&json!({ "dashboard": user.dashboard(), "name": user.profile.name }))
        }
        Command::Login(args) => {
            let user = store.login(&args.email, &args.password, args.role).await?;
            print_user(&user)
        }
        Command::LoginFederated(args) => {
            let request = FederatedSignIn {
                provider_id: args.provider,
                id_token: args.id_token,
                email_hint: args.email_hint,
            };
            let user = store.login_federated(&request, args.role).await?;
            print_user(&user)
        }
        Command::Signup(args) => {
            let user = store.signup(&registration(args)).await?;
            print_user(&user)
        }
        Command::Logout => {
            store.logout().await?;
            print_json(&json!({ "signed_in": false }))
        }
        Command::Update(args) => {
            let update = profile_update(args);
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            let user = store
                .update_profile(&update)
                .await?
                .ok_or(CliError::NotSignedIn)?;
            print_user(&user)
        }
    }
}

/// Environment-derived config with command-line flags layered on top.
fn session_config(cli: &Cli, base: SessionConfig) -> SessionConfig {
    SessionConfig {
        storage_dir: cli.storage_dir.clone().unwrap_or(base.storage_dir),
        slot_key: cli.slot.clone().unwrap_or(base.slot_key),
        auth_delay: cli.delay_ms.map_or(base.auth_delay, Duration::from_millis),
    }
}

fn registration(args: SignupArgs) -> RegistrationDetails {
    RegistrationDetails {
        phone: args.phone,
        location: args.location,
        store_name: args.store_name,
        store_description: args.store_description,
        property_name: args.property_name,
        property_type: args.property_type,
        room_count: args.rooms,
        ..RegistrationDetails::new(args.first_name, args.last_name, args.email, args.password, args.role)
    }
}

fn profile_update(args: UpdateArgs) -> ProfileUpdate {
    ProfileUpdate {
        name: args.name,
        email: args.email,
        phone: args.phone,
        location: args.location,
        bio: args.bio,
        avatar: args.avatar,
        favorite_destinations: if args.favorites.is_empty() { None } else { Some(args.favorites) },
        store_name: args.store_name,
        store_description: args.store_description,
        property_name: args.property_name,
        property_type: args.property_type,
        total_rooms: args.rooms,
    }
}

fn snapshot_json(snapshot: &SessionSnapshot) -> Value {
    json!({
        "signed_in": snapshot.current_user.is_some(),
        "user": snapshot.current_user,
    })
}

fn print_user(user: &UserRecord) -> Result<(), CliError> {
    print_json(&json!({ "user": user, "dashboard": user.dashboard() }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
