use super::*;
use trailhead::HostKind;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("trailhead").chain(args.iter().copied())).unwrap()
}

#[test]
fn login_parses_host_role() {
    let cli = parse(&["login", "--email", "ravi@example.com", "--role", "hotel-owner"]);
    let Command::Login(args) = cli.command else { panic!("expected login") };
    assert_eq!(args.email, "ravi@example.com");
    assert_eq!(args.role, RoleSelection::Host(HostKind::HotelOwner));
    assert_eq!(args.password, "");
}

#[test]
fn login_role_defaults_to_guest() {
    let cli = parse(&["login", "--email", "a@b.co"]);
    let Command::Login(args) = cli.command else { panic!("expected login") };
    assert_eq!(args.role, RoleSelection::Guest);
}

#[test]
fn unknown_role_is_rejected() {
    let result = Cli::try_parse_from(["trailhead", "login", "--email", "a@b.co", "--role", "admin"]);
    assert!(result.is_err());
}

#[test]
fn flags_override_environment_config() {
    let cli = parse(&["--storage-dir", "/tmp/th", "--delay-ms", "5", "whoami"]);
    let config = session_config(&cli, SessionConfig::default());
    assert_eq!(config.storage_dir, PathBuf::from("/tmp/th"));
    assert_eq!(config.auth_delay, Duration::from_millis(5));
    assert_eq!(config.slot_key, SessionConfig::default().slot_key);
}

#[test]
fn update_without_flags_is_empty() {
    assert!(profile_update(UpdateArgs::default()).is_empty());
}

#[test]
fn update_collects_repeated_favorites() {
    let cli = parse(&["update", "--favorite", "Netarhat", "--favorite", "Betla National Park", "--bio", "hi"]);
    let Command::Update(args) = cli.command else { panic!("expected update") };
    let update = profile_update(args);
    assert_eq!(
        update.favorite_destinations,
        Some(vec!["Netarhat".to_owned(), "Betla National Park".to_owned()])
    );
    assert_eq!(update.bio.as_deref(), Some("hi"));
    assert_eq!(update.name, None);
}

#[test]
fn signup_carries_role_extras() {
    let cli = parse(&[
        "signup",
        "--first-name",
        "Meera",
        "--email",
        "meera@example.com",
        "--role",
        "vendor",
        "--store-name",
        "Dokra Corner",
    ]);
    let Command::Signup(args) = cli.command else { panic!("expected signup") };
    let details = registration(args);
    assert_eq!(details.role, RoleSelection::Host(HostKind::Vendor));
    assert_eq!(details.store_name.as_deref(), Some("Dokra Corner"));
    assert_eq!(details.last_name, "");
    assert_eq!(details.room_count, None);
}

#[test]
fn snapshot_json_reports_signed_out() {
    let value = snapshot_json(&SessionSnapshot::default());
    assert_eq!(value["signed_in"], false);
    assert!(value["user"].is_null());
}
