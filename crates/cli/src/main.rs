use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rentals_api::{RentalsApi, RentalsClient};
use rentals_types::{RentalField, RentalId, RentalPayload};
use rentals_util::{AppConfig, ErrorMessageFormatter, FieldErrorFormatter, config::default_log_path, field_validators, validate_value};
use tracing_subscriber::EnvFilter;

/// Admin console for the rentals service.
///
/// Without a subcommand the interactive terminal UI starts.
#[derive(Debug, Parser)]
#[command(name = "rentals", version, about)]
struct Cli {
    /// Base URL of the rentals service
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log file used while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Start with the sidebar collapsed
    #[arg(long)]
    collapsed: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print all rentals as JSON
    List,
    /// Create a rental
    Create(RentalArgs),
    /// Update an existing rental
    Update {
        /// Identifier of the rental to update
        id: String,
        #[command(flatten)]
        rental: RentalArgs,
    },
}

#[derive(Debug, Args)]
struct RentalArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    owner: String,
}

impl RentalArgs {
    /// Validates with the same rules as the form and builds the payload.
    fn into_payload(self) -> Result<RentalPayload> {
        let formatter = FieldErrorFormatter;
        let checks = [
            (RentalField::Name, self.name.as_str()),
            (RentalField::Email, self.email.as_str()),
            (RentalField::Owner, self.owner.as_str()),
        ];
        let messages: Vec<String> = checks
            .iter()
            .map(|(field, value)| (field, validate_value(value, field_validators(*field))))
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(field, errors)| formatter.format(field.key(), &errors))
            .collect();
        if !messages.is_empty() {
            bail!("Error saving rental\n{}", messages.join("\n"));
        }
        Ok(RentalPayload {
            email: self.email,
            name: self.name,
            owner: self.owner,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let client: Arc<dyn RentalsApi> = Arc::new(RentalsClient::from_config(&config)?);

    match cli.command {
        None => {
            let log_file = cli.log_file.unwrap_or_else(default_log_path);
            init_file_tracing(&log_file)?;
            tracing::info!(api_base_url = %config.api_base_url, "starting rentals TUI");
            rentals_tui::run(config, client).await
        }
        Some(command) => {
            init_stderr_tracing();
            run_command(client.as_ref(), command).await
        }
    }
}

/// File, then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path).with_context(|| format!("load config from {}", path.display()))?,
        None => AppConfig::load().context("load config")?,
    };
    if let Some(api_base) = &cli.api_base {
        config.api_base_url = api_base.clone();
    }
    if cli.collapsed {
        config.sidebar_open = false;
    }
    config.validate()?;
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The TUI owns the terminal, so logs go to a file.
fn init_file_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_command(client: &dyn RentalsApi, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let rentals = client.list_rentals().await?;
            println!("{}", serde_json::to_string_pretty(&rentals)?);
        }
        Command::Create(rental) => {
            let saved = client.create_rental(&rental.into_payload()?).await?;
            print_saved(saved.as_ref().and_then(|rental| rental.rental_id.as_ref()), "created")?;
        }
        Command::Update { id, rental } => {
            let id = RentalId::new(id);
            if id.is_empty() {
                bail!("rental id must not be empty");
            }
            let payload = rental.into_payload()?;
            client.update_rental(&id, &payload).await?;
            print_saved(Some(&id), "updated")?;
        }
    }
    Ok(())
}

fn print_saved(id: Option<&RentalId>, verb: &str) -> Result<()> {
    let summary = serde_json::json!({ "status": verb, "rentalId": id });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: &str, email: &str, owner: &str) -> RentalArgs {
        RentalArgs {
            name: name.into(),
            email: email.into(),
            owner: owner.into(),
        }
    }

    #[test]
    fn payload_requires_valid_fields() {
        let error = args("", "not-an-email", "Bob").into_payload().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error saving rental\nname: is required\nemail: must be a valid email address"
        );
    }

    #[test]
    fn valid_args_build_the_payload() {
        let payload = args("Alice", "a@b.com", "Bob").into_payload().unwrap();
        assert_eq!(payload.email, "a@b.com");
        assert_eq!(payload.owner, "Bob");
    }

    #[test]
    fn flags_parse_into_overrides() {
        let cli = Cli::try_parse_from(["rentals", "--api-base", "http://localhost:4000", "--collapsed"]).unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:4000"));
        assert!(cli.collapsed);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["rentals", "update", "42", "--name", "A", "--email", "a@b.com", "--owner", "B"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Update { ref id, .. }) if id == "42"));
    }
}
