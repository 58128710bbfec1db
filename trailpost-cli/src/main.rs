//! # trailpost CLI
//!
//! Command-line interface for the trailpost site tooling.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trailpost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "trailpost.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every template of the site into the output directory
    Build,

    /// Serve the site, binding content on each request
    Serve {
        /// Server port
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Refresh the album file from the photo library
    FetchAlbums,

    /// One-time authorization to obtain a refresh token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Print the consent URL to visit
    Url,

    /// Redeem the authorization code for a refresh token
    Token {
        /// The code, or the whole redirect URL it was returned in
        code: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Secrets may come from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build => commands::build_site(&cli.config).await,
        Commands::Serve { port } => commands::serve_site(&cli.config, port).await,
        Commands::FetchAlbums => commands::fetch_albums(&cli.config).await,
        Commands::Auth { command } => match command {
            AuthCommands::Url => commands::auth_url(&cli.config),
            AuthCommands::Token { code } => commands::auth_token(&cli.config, &code).await,
        },
    }
}
