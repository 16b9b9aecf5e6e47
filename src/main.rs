//! chat-tui - Terminal chat prototype
//!
//! A conversation roster and a per-conversation message screen over local
//! mock data. No network, no persistence of chat state.

mod config;
mod models;
mod picker;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser)]
#[command(name = "chat-tui")]
#[command(about = "Terminal chat prototype over mock data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface (default)
    Tui,

    /// Print the seed conversation roster
    Conversations {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Set the local display name shown in the header
    SetName {
        /// New display name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    match command {
        Commands::Tui => {
            // TUI mode installs its own subscriber writing into the
            // in-app log pane; stderr would corrupt the alternate screen.
            tui::run(cli.verbose).await?;
        }
        Commands::Conversations { json } => {
            init_stderr_logging(cli.verbose);
            print_conversations(json)?;
        }
        Commands::SetName { name } => {
            init_stderr_logging(cli.verbose);
            let mut config = Config::load()?;
            config.display_name = Some(name);
            config.save()?;
            tracing::info!("display name saved");
        }
    }

    Ok(())
}

/// Logging for non-TUI subcommands.
fn init_stderr_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Dump the seed roster to stdout.
fn print_conversations(json: bool) -> Result<()> {
    let conversations = models::fixtures::seed_conversations();

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    for c in &conversations {
        println!(
            "{:<3} {:<14} {:<10} {}",
            c.id, c.display_name, c.timestamp_label, c.last_message_preview
        );
    }
    Ok(())
}
