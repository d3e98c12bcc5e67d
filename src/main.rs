//! Zipcode weather services.
//!
//! ```text
//!                  POST /zipcode {"cep"}           GET /zipcode?zipcode=
//!     Client ───────────────────────▶ entry ───────────────────────▶ resolution
//!                                  (service-a)                     (service-b)
//!                                                                    │     │
//!                                              location provider ◀───┘     └──▶ weather provider
//! ```
//!
//! Both services run from this binary; the subcommand picks one.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use zipcode_weather::config::ServiceRole;
use zipcode_weather::lifecycle::run_service;

#[derive(Parser)]
#[command(name = "zipcode-weather")]
#[command(about = "Postal code to current temperature, traced across two services", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /zipcode and forward to the resolution service
    Entry,
    /// Serve GET /zipcode and call the location and weather providers
    Resolution,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let role = match cli.command {
        Commands::Entry => ServiceRole::Entry,
        Commands::Resolution => ServiceRole::Resolution,
    };

    run_service(role, cli.config.as_deref()).await?;
    Ok(())
}
