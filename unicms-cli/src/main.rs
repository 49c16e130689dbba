//! Main entry point for the UniCMS command-line client.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

use commands::GlobalArgs;

/// UniCMS CLI
#[derive(Parser)]
#[command(name = "unicms")]
#[command(about = "Command-line client for the UniCMS dashboard backend", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the UniCMS CLI
#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Backend(commands::BackendCommand),

    /// Locale prefix helpers for dashboard paths
    #[command(subcommand)]
    Path(commands::path::PathCommand),

    /// List the supported locales
    Locales,

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },
}

fn initialize_tracing(level: &str) {
    let default_level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    });

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Backend(command) => {
            let config = cli.global.load_config()?;
            initialize_tracing(&config.log_level);
            commands::dispatch(&cli.global, &config, command).await?;
        }
        Commands::Path(command) => {
            let config = cli.global.load_config()?;
            initialize_tracing(&config.log_level);
            commands::path::run(&command, &config)?;
        }
        Commands::Locales => commands::path::list_locales(),
        Commands::Config { format } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            commands::config::generate_config(&format)?;
        }
        Commands::Completion { shell } => commands::completion::generate_completion(shell),
    }

    Ok(())
}
