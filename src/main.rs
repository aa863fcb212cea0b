use clap::{Parser, Subcommand};
use provision::config::Config;
use provision::core::ProvisionResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "provision")]
#[command(about = "Provision model files and extensions from a manifest")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the model files listed in the models manifest
    Models {
        /// Manifest to read (defaults to `models_manifest` from config)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Install the extensions listed in the extensions manifest
    Extensions {
        /// Manifest to read (defaults to `extensions_manifest` from config)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Install extensions, then fetch models
    All,
    /// Verify and store an artifact hub token in the system keychain
    Login {
        /// Token to store (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored artifact hub token
    Logout,
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

async fn dispatch(command: Commands, config: Config) -> ProvisionResult<ExitCode> {
    match command {
        Commands::Models { manifest } => cli::provision::models(&config, manifest).await,
        Commands::Extensions { manifest } => cli::provision::extensions(&config, manifest).await,
        Commands::All => cli::provision::all(&config).await,
        Commands::Login { token } => cli::login::run(&config, token)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Logout => cli::login::logout().map(|()| ExitCode::SUCCESS),
        Commands::Config(ConfigCommands::Show) => {
            cli::config::show(&config).map(|()| ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = match config {
        Ok(config) => dispatch(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
