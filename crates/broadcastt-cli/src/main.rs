//! broadcastt: trigger events and issue channel auth tokens from the shell.

mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use broadcastt::{BatchEvent, Broadcastt, QueryParams, TriggerOptions, ENV_VAR_NAME};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{Overrides, Settings};

#[derive(Parser, Debug)]
#[command(name = "broadcastt", version)]
#[command(about = "Trigger Broadcastt events and issue channel auth tokens")]
struct Cli {
    /// Config file (default: ~/.config/broadcastt/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the {cluster}.broadcastt.xyz host
    #[arg(long, global = true)]
    cluster: Option<String>,

    /// API host, without scheme
    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    port: Option<u16>,

    /// Use https
    #[arg(long, global = true)]
    tls: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log requests (-v) or everything (-vv) to stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trigger an event on one or more channels
    Trigger {
        #[arg(required = true)]
        channels: Vec<String>,

        /// Event name
        #[arg(short, long)]
        event: String,

        /// Event data as JSON; anything else is sent as a string
        #[arg(short, long)]
        data: String,

        /// Exclude this subscriber
        #[arg(long)]
        socket_id: Option<String>,

        /// Send --data as-is, without encoding it again
        #[arg(long)]
        raw: bool,
    },

    /// Trigger a batch of events from a JSON file
    Batch {
        /// Array of {"channel", "name", "data", "socket_id"?} objects
        file: PathBuf,

        /// Entries' data are already JSON strings
        #[arg(long)]
        raw: bool,
    },

    /// GET an API path below /apps/{appId}
    Get {
        path: String,

        /// Query parameter as key=value
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Generate channel auth tokens
    Auth {
        #[command(subcommand)]
        kind: AuthCommand,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Token for a private channel
    Private {
        channel: String,
        socket_id: String,

        /// Custom data to sign along
        #[arg(long)]
        channel_data: Option<String>,
    },

    /// Token for a presence channel
    Presence {
        channel: String,
        socket_id: String,

        #[arg(long)]
        user_id: String,

        /// User info as JSON
        #[arg(long)]
        user_info: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration with the secret redacted
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "warn,broadcastt=debug",
        _ => "debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a command; `Ok(false)` means the API refused an event.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };

    let mut settings = Settings::load(&config_path)?.with_env_url(env::var(ENV_VAR_NAME).ok());
    debug!(path = %config_path.display(), "loaded config");

    settings.apply(Overrides {
        cluster: cli.cluster,
        host: cli.host,
        port: cli.port,
        tls: cli.tls,
        timeout_secs: cli.timeout,
    });

    // Config commands must work without credentials
    let client = || -> Result<Broadcastt> { Ok(settings.builder()?.build()?) };

    match cli.command {
        Command::Trigger {
            channels,
            event,
            data,
            socket_id,
            raw,
        } => {
            let mut options = TriggerOptions::new().json_encoded(raw);
            if let Some(socket_id) = socket_id {
                options = options.socket_id(socket_id);
            }

            let client = client()?;
            let delivered = if raw {
                client
                    .trigger_with_options(channels.clone(), &event, data.as_str(), options)
                    .await?
            } else {
                client
                    .trigger_with_options(channels.clone(), &event, &parse_data(data), options)
                    .await?
            };

            report(delivered, &format!("{} on {}", event, channels.join(", ")));
            Ok(delivered)
        }

        Command::Batch { file, raw } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read batch file '{}'", file.display()))?;
            let batch: Vec<BatchEvent> = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse batch file '{}'", file.display()))?;

            let delivered = client()?.trigger_batch(&batch, raw).await?;

            report(delivered, &format!("{} events", batch.len()));
            Ok(delivered)
        }

        Command::Get { path, params } => {
            let query = parse_params(&params)?;
            let response = client()?.get(&path, &query).await?;

            let status = if response.is_success() {
                response.status.to_string().green()
            } else {
                response.status.to_string().red()
            };
            eprintln!("{} {}", "status:".dimmed(), status);

            match serde_json::from_str::<Value>(&response.body) {
                Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
                Err(_) => println!("{}", response.body),
            }

            Ok(response.is_success())
        }

        Command::Auth { kind } => {
            let client = client()?;
            let token = match kind {
                AuthCommand::Private {
                    channel,
                    socket_id,
                    channel_data,
                } => client.private_auth(&channel, &socket_id, channel_data.as_deref())?,
                AuthCommand::Presence {
                    channel,
                    socket_id,
                    user_id,
                    user_info,
                } => {
                    let user_info = user_info
                        .map(|info| serde_json::from_str::<Value>(&info))
                        .transpose()
                        .context("--user-info must be valid JSON")?;
                    client.presence_auth(&channel, &socket_id, &user_id, user_info.as_ref())?
                }
            };

            println!("{}", token);
            Ok(true)
        }

        Command::Config { action } => {
            match action {
                ConfigCommand::Path => println!("{}", config_path.display()),
                ConfigCommand::Show => print!("{}", toml::to_string_pretty(&settings.redacted())?),
            }
            Ok(true)
        }
    }
}

/// JSON if it parses as JSON, otherwise a plain string.
fn parse_data(data: String) -> Value {
    serde_json::from_str(&data).unwrap_or(Value::String(data))
}

fn parse_params(params: &[String]) -> Result<QueryParams> {
    params
        .iter()
        .map(|param| match param.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key, value)),
            _ => bail!("invalid --param {:?}, expected key=value", param),
        })
        .collect()
}

fn report(delivered: bool, what: &str) {
    if delivered {
        println!("{} {}", "✓ Triggered".green(), what);
    } else {
        eprintln!("{} {}", "✗ Not delivered:".red(), what);
    }
}
