//! `heatpump-console`: dispatch heat-pump commands and follow their progress.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use heatpump_console::config::{ENV_BASE_URL, ENV_HEATPUMP_ID};
use heatpump_console::dashboard::{HeatpumpStatus, Scene};
use heatpump_console::display::WriterSurface;
use heatpump_console::{
    CommandForm, CommandId, CommandName, CommandPicker, Error, HeatpumpClient, Result, StreamState,
    TrailingLine,
};

#[derive(Debug, Parser)]
#[command(name = "heatpump-console", version, about)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

// Client settings shared by every subcommand.
#[derive(Debug, Args)]
struct Settings {
    /// Backend base URL (the directory containing `api/`)
    #[arg(long, global = true, env = ENV_BASE_URL)]
    base_url: Option<String>,

    /// Heat pump to send commands to
    #[arg(long, global = true, env = ENV_HEATPUMP_ID)]
    heatpump_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// What to do with an unterminated last progress line (drop or flush)
    #[arg(long, global = true)]
    trailing_line: Option<TrailingLine>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available commands
    Commands,

    /// List the fields of a command
    Fields {
        /// Command name (case-insensitive)
        command: String,
    },

    /// Dispatch a command and stream its progress to stdout
    Send {
        /// Command name (case-insensitive)
        command: String,

        /// Field value as name=value
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Stream the progress of an already dispatched command
    Progress {
        /// Command id returned by the dispatch
        command_id: String,
    },

    /// Print the dashboard scene for a status snapshot as JSON
    Dashboard {
        /// A URL query containing `data=...`, or the JSON snapshot itself
        input: String,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heatpump_console=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_usage_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let client = || build_client(&cli.settings);

    match cli.command {
        Command::Commands => {
            for command in client()?.list_commands().await? {
                println!("{command}");
            }
        }
        Command::Fields { command } => {
            let client = client()?;
            let command = resolve_command(&client, &command).await?;
            let form = CommandForm::from_fields(client.command_fields(&command).await?);
            for input in form.inputs() {
                println!("{}\t{}", input.name(), input.label());
            }
        }
        Command::Send { command, fields } => {
            let client = client()?;
            let command = resolve_command(&client, &command).await?;
            let mut form = CommandForm::from_fields(client.command_fields(&command).await?);
            for (name, value) in fields {
                form.set(&name, value);
            }

            let request = form.into_request(command, client.config().heatpump_id().cloned());
            let stream = client.send(&request).await?;
            if let Some(id) = stream.command_id() {
                eprintln!("command id: {id}");
            }
            return Ok(render(stream).await);
        }
        Command::Progress { command_id } => {
            let stream = client()?.stream_progress(&CommandId::new(command_id));
            return Ok(render(stream).await);
        }
        Command::Dashboard { input } => return dashboard(&input),
    }

    Ok(ExitCode::SUCCESS)
}

fn build_client(settings: &Settings) -> Result<HeatpumpClient> {
    let mut builder = HeatpumpClient::builder();
    if let Some(url) = &settings.base_url {
        builder = builder.base_url(url);
    }
    if let Some(id) = &settings.heatpump_id {
        builder = builder.heatpump_id(id);
    }
    if let Some(secs) = settings.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(policy) = settings.trailing_line {
        builder = builder.trailing_line(policy);
    }
    builder.build()
}

/// Normalize user input to a known command name.
async fn resolve_command(client: &HeatpumpClient, input: &str) -> Result<CommandName> {
    let picker = CommandPicker::new(client.list_commands().await?);
    picker
        .commit(input)
        .ok_or_else(|| Error::InvalidConfig(format!("unknown command: {}", input.trim())))
}

async fn render(stream: heatpump_console::ProgressStream) -> ExitCode {
    let mut surface = WriterSurface::stdout();
    match stream.render_to(&mut surface).await {
        StreamState::Complete => ExitCode::SUCCESS,
        state => {
            tracing::warn!(%state, "progress stream did not complete");
            ExitCode::FAILURE
        }
    }
}

fn dashboard(input: &str) -> Result<ExitCode> {
    let trimmed = input.trim();
    let status = if trimmed.starts_with('{') {
        HeatpumpStatus::from_json(trimmed)?
    } else {
        HeatpumpStatus::from_query(trimmed)?
    };

    let mut scene = Scene::initial();
    if let Some(status) = status {
        scene.extend(Scene::render(&status));
    }
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(ExitCode::SUCCESS)
}
